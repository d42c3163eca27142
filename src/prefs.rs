//! ユーザー設定（名前はCookieに30日、フォントはセッション中のみ）

use crate::error::Result;
use crate::utils::cookies::{CookieJar, PREFERENCE_TTL_DAYS};
use crate::utils::log_trace::{log_error, log_info};
use crate::utils::storage::KeyValueStore;

pub const USERNAME_COOKIE: &str = "username";
pub const FONT_KEY: &str = "preferredFont";

pub fn welcome_message(name: &str) -> String {
    format!("Welcome back, {}!", name)
}

/// 保存済みユーザー名を削除（カートクリア時）
pub fn forget_user<C: CookieJar>(cookies: &C) {
    if let Err(e) = cookies.delete(USERNAME_COOKIE) {
        log_error("prefs", &format!("ユーザー名Cookieを削除できません: {}", e));
    }
}

// ============================================
// 名前
// ============================================

pub struct NamePreference<C> {
    cookies: C,
}

impl<C: CookieJar> NamePreference<C> {
    pub fn new(cookies: C) -> Self {
        Self { cookies }
    }

    pub fn saved(&self) -> Option<String> {
        self.cookies.get(USERNAME_COOKIE)
    }

    /// 入力欄の値を保存（前後の空白を除き、空なら保存しない）
    pub fn save_input(&self, raw: &str) -> Option<String> {
        let name = raw.trim();
        if name.is_empty() {
            return None;
        }
        match self.cookies.set(USERNAME_COOKIE, name, PREFERENCE_TTL_DAYS) {
            Ok(()) => {
                log_info("prefs", &format!("名前をCookieに保存: {}", name));
                Some(name.to_string())
            }
            Err(e) => {
                log_error("prefs", &format!("名前を保存できません: {}", e));
                None
            }
        }
    }
}

// ============================================
// フォント
// ============================================

pub struct FontPreference<S> {
    session: S,
}

impl<S: KeyValueStore> FontPreference<S> {
    pub fn new(session: S) -> Self {
        Self { session }
    }

    pub fn saved(&self) -> Option<String> {
        self.session.get_item(FONT_KEY).filter(|f| !f.trim().is_empty())
    }

    pub fn save(&self, font: &str) -> Result<()> {
        self.session.set_item(FONT_KEY, font)
    }
}
