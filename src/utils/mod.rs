//! ユーティリティモジュール

pub mod cache;
pub mod cookies;
pub mod log_trace;
pub mod storage;
pub mod sw;

// 共通ヘルパー

/// body の font-family を変更
pub fn apply_body_font(font: &str) {
    let Some(body) = web_sys::window().and_then(|w| w.document()).and_then(|d| d.body()) else {
        return;
    };
    if let Err(e) = body.style().set_property("font-family", font) {
        log_trace::log_warn("prefs", &format!("フォントを適用できません: {:?}", e));
    }
}
