//! Cookie管理（ユーザー名・通貨設定の30日保存）

use std::cell::RefCell;
use std::rc::Rc;

use crate::error::{Result, StorefrontError};

/// 設定Cookieの有効期限（日）
pub const PREFERENCE_TTL_DAYS: u32 = 30;

const SECONDS_PER_DAY: u64 = 24 * 60 * 60;

pub trait CookieJar {
    fn get(&self, name: &str) -> Option<String>;
    fn set(&self, name: &str, value: &str, days: u32) -> Result<()>;
    fn delete(&self, name: &str) -> Result<()>;
}

// ============================================
// Cookie文字列の組み立て・解析
// ============================================

/// `document.cookie` 形式の文字列から値を取り出す（空値は未設定扱い）
pub fn find_cookie(header: &str, name: &str) -> Option<String> {
    let prefix = format!("{}=", name);
    header
        .split(';')
        .map(str::trim)
        .find_map(|c| c.strip_prefix(prefix.as_str()))
        .map(decode_value)
        .filter(|v| !v.is_empty())
}

/// サイト全体に有効な期限付きCookie
pub fn set_cookie_string(name: &str, value: &str, days: u32) -> String {
    format!(
        "{}={}; max-age={}; path=/",
        name,
        encode_value(value),
        u64::from(days) * SECONDS_PER_DAY
    )
}

/// 期限を過去にして削除する
pub fn delete_cookie_string(name: &str) -> String {
    format!("{}=; expires=Thu, 01 Jan 1970 00:00:00 UTC; max-age=0; path=/", name)
}

fn encode_value(value: &str) -> String {
    value.replace('%', "%25").replace(';', "%3B").replace(',', "%2C")
}

fn decode_value(raw: &str) -> String {
    let mut out = String::with_capacity(raw.len());
    let mut rest = raw;
    while let Some(pos) = rest.find('%') {
        out.push_str(&rest[..pos]);
        let tail = &rest[pos..];
        let (ch, len) = match tail.get(..3) {
            Some("%25") => ('%', 3),
            Some("%3B") | Some("%3b") => (';', 3),
            Some("%2C") | Some("%2c") => (',', 3),
            _ => ('%', 1),
        };
        out.push(ch);
        rest = &tail[len..];
    }
    out.push_str(rest);
    out
}

// ============================================
// document.cookie
// ============================================

#[derive(Debug, Clone, Copy, Default)]
pub struct DocumentCookies;

#[cfg(target_arch = "wasm32")]
fn html_document() -> Option<web_sys::HtmlDocument> {
    use wasm_bindgen::JsCast;
    web_sys::window()?.document()?.dyn_into::<web_sys::HtmlDocument>().ok()
}

impl DocumentCookies {
    fn write(&self, cookie: &str) -> Result<()> {
        #[cfg(target_arch = "wasm32")]
        {
            let document = html_document()
                .ok_or_else(|| StorefrontError::StorageUnavailable("document.cookie".to_string()))?;
            document
                .set_cookie(cookie)
                .map_err(|e| StorefrontError::Storage(format!("cookie write failed: {:?}", e)))
        }

        #[cfg(not(target_arch = "wasm32"))]
        {
            let _ = cookie;
            Err(StorefrontError::StorageUnavailable("document.cookie".to_string()))
        }
    }
}

impl CookieJar for DocumentCookies {
    fn get(&self, name: &str) -> Option<String> {
        #[cfg(target_arch = "wasm32")]
        {
            let header = html_document()?.cookie().ok()?;
            find_cookie(&header, name)
        }

        #[cfg(not(target_arch = "wasm32"))]
        {
            let _ = name;
            None
        }
    }

    fn set(&self, name: &str, value: &str, days: u32) -> Result<()> {
        self.write(&set_cookie_string(name, value, days))
    }

    fn delete(&self, name: &str) -> Result<()> {
        self.write(&delete_cookie_string(name))
    }
}

// ============================================
// メモリ上のCookie（テスト・ブラウザ外用）
// ============================================

#[derive(Debug, Clone, Default)]
pub struct MemoryCookies {
    jar: Rc<RefCell<Vec<(String, String, u32)>>>,
}

impl MemoryCookies {
    pub fn new() -> Self {
        Self::default()
    }

    /// `document.cookie` と同じ形式
    pub fn header(&self) -> String {
        self.jar
            .borrow()
            .iter()
            .map(|(name, value, _)| format!("{}={}", name, encode_value(value)))
            .collect::<Vec<_>>()
            .join("; ")
    }

    pub fn ttl_days(&self, name: &str) -> Option<u32> {
        self.jar
            .borrow()
            .iter()
            .find(|(n, _, _)| n == name)
            .map(|(_, _, days)| *days)
    }
}

impl CookieJar for MemoryCookies {
    fn get(&self, name: &str) -> Option<String> {
        find_cookie(&self.header(), name)
    }

    fn set(&self, name: &str, value: &str, days: u32) -> Result<()> {
        let mut jar = self.jar.borrow_mut();
        match jar.iter_mut().find(|(n, _, _)| n == name) {
            Some(entry) => {
                entry.1 = value.to_string();
                entry.2 = days;
            }
            None => jar.push((name.to_string(), value.to_string(), days)),
        }
        Ok(())
    }

    fn delete(&self, name: &str) -> Result<()> {
        self.jar.borrow_mut().retain(|(n, _, _)| n != name);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_find_cookie_matches_exact_name() {
        let header = "theme=dark; username=Thabo; currency=USD";
        assert_eq!(find_cookie(header, "username").as_deref(), Some("Thabo"));
        assert_eq!(find_cookie(header, "currency").as_deref(), Some("USD"));
        assert_eq!(find_cookie(header, "name"), None);
        assert_eq!(find_cookie("username=", "username"), None);
        assert_eq!(find_cookie("", "username"), None);
    }

    #[test]
    fn test_set_cookie_string_uses_thirty_day_max_age() {
        assert_eq!(
            set_cookie_string("currency", "EUR", PREFERENCE_TTL_DAYS),
            "currency=EUR; max-age=2592000; path=/"
        );
        assert!(delete_cookie_string("username").starts_with("username=; expires=Thu, 01 Jan 1970"));
    }

    #[test]
    fn test_values_with_separators_survive() {
        let cookies = MemoryCookies::new();
        cookies.set("username", "Smith; Jr, 100%", PREFERENCE_TTL_DAYS).unwrap();
        assert_eq!(cookies.get("username").as_deref(), Some("Smith; Jr, 100%"));
        assert_eq!(cookies.ttl_days("username"), Some(30));
        assert_eq!(decode_value("50%off"), "50%off");
    }

    #[test]
    fn test_memory_cookies_delete() {
        let cookies = MemoryCookies::new();
        cookies.set("username", "Lerato", 30).unwrap();
        cookies.set("currency", "ZAR", 30).unwrap();
        cookies.delete("username").unwrap();
        assert_eq!(cookies.get("username"), None);
        assert_eq!(cookies.get("currency").as_deref(), Some("ZAR"));
    }
}
