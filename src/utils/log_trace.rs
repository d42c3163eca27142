//! 時系列トレースログシステム
//! カート操作・通貨切替・Service Workerのイベントを記録し、後から確認できるようにする

use serde::{Deserialize, Serialize};
use std::collections::VecDeque;

use super::storage::{BrowserStorage, KeyValueStore};

const MAX_LOG_ENTRIES: usize = 500;
const STORAGE_KEY: &str = "storefront_log_trace";

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LogEntry {
    pub timestamp: String,
    pub level: String, // "info", "warn", "error"
    pub category: String, // "cart", "currency", "prefs", "storage", "sw"
    pub message: String,
    #[serde(default)]
    pub data: Option<serde_json::Value>,
}

pub struct LogTrace {
    logs: VecDeque<LogEntry>,
    storage: Option<BrowserStorage>,
}

impl LogTrace {
    pub fn new() -> Self {
        let mut trace = LogTrace {
            logs: VecDeque::with_capacity(MAX_LOG_ENTRIES),
            storage: persistent_storage(),
        };
        trace.load_from_storage();
        trace
    }

    pub fn log(&mut self, level: &str, category: &str, message: &str, data: Option<serde_json::Value>) {
        let entry = LogEntry {
            timestamp: now_timestamp(),
            level: level.to_string(),
            category: category.to_string(),
            message: message.to_string(),
            data,
        };

        // コンソールにも出力
        write_console(level, &format!("[{}] {}", category, message));

        if self.logs.len() >= MAX_LOG_ENTRIES {
            self.logs.pop_front();
        }
        self.logs.push_back(entry);

        self.save_to_storage();
    }

    pub fn info(&mut self, category: &str, message: &str) {
        self.log("info", category, message, None);
    }

    pub fn info_with_data(&mut self, category: &str, message: &str, data: serde_json::Value) {
        self.log("info", category, message, Some(data));
    }

    pub fn warn(&mut self, category: &str, message: &str) {
        self.log("warn", category, message, None);
    }

    pub fn error(&mut self, category: &str, message: &str) {
        self.log("error", category, message, None);
    }

    pub fn get_logs(&self) -> Vec<LogEntry> {
        self.logs.iter().cloned().collect()
    }

    pub fn get_logs_json(&self) -> String {
        let logs: Vec<&LogEntry> = self.logs.iter().collect();
        serde_json::to_string_pretty(&logs).unwrap_or_else(|_| "[]".to_string())
    }

    pub fn clear(&mut self) {
        self.logs.clear();
        self.save_to_storage();
    }

    fn load_from_storage(&mut self) {
        let Some(storage) = self.storage else {
            return;
        };
        if let Some(json_str) = storage.get_item(STORAGE_KEY) {
            if let Ok(logs) = serde_json::from_str::<Vec<LogEntry>>(&json_str) {
                let skip = logs.len().saturating_sub(MAX_LOG_ENTRIES);
                self.logs = logs.into_iter().skip(skip).collect();
            }
        }
    }

    fn save_to_storage(&self) {
        let Some(storage) = self.storage else {
            return;
        };
        let json_str = serde_json::to_string(&self.logs).unwrap_or_else(|_| "[]".to_string());
        // ログ保存の失敗はログに残さない（再帰防止）
        let _ = storage.set_item(STORAGE_KEY, &json_str);
    }
}

impl Default for LogTrace {
    fn default() -> Self {
        Self::new()
    }
}

/// ブラウザ上でのみトレースを永続化する
fn persistent_storage() -> Option<BrowserStorage> {
    if cfg!(target_arch = "wasm32") {
        Some(BrowserStorage::Local)
    } else {
        None
    }
}

fn now_timestamp() -> String {
    #[cfg(target_arch = "wasm32")]
    {
        js_sys::Date::new_0().to_iso_string().as_string().unwrap_or_default()
    }

    #[cfg(not(target_arch = "wasm32"))]
    {
        std::time::SystemTime::now()
            .duration_since(std::time::UNIX_EPOCH)
            .map(|d| d.as_secs().to_string())
            .unwrap_or_default()
    }
}

fn write_console(level: &str, line: &str) {
    #[cfg(target_arch = "wasm32")]
    {
        match level {
            "error" => gloo::console::error!(line.to_string()),
            "warn" => gloo::console::warn!(line.to_string()),
            _ => gloo::console::log!(line.to_string()),
        }
    }

    #[cfg(not(target_arch = "wasm32"))]
    {
        let _ = (level, line);
    }
}

// グローバルなログトレースインスタンス
thread_local! {
    static LOG_TRACE: std::cell::RefCell<LogTrace> = std::cell::RefCell::new(LogTrace::new());
}

pub fn log_info(category: &str, message: &str) {
    LOG_TRACE.with(|trace| {
        trace.borrow_mut().info(category, message);
    });
}

pub fn log_info_with_data(category: &str, message: &str, data: serde_json::Value) {
    LOG_TRACE.with(|trace| {
        trace.borrow_mut().info_with_data(category, message, data);
    });
}

pub fn log_warn(category: &str, message: &str) {
    LOG_TRACE.with(|trace| {
        trace.borrow_mut().warn(category, message);
    });
}

pub fn log_error(category: &str, message: &str) {
    LOG_TRACE.with(|trace| {
        trace.borrow_mut().error(category, message);
    });
}

pub fn clear_logs() {
    LOG_TRACE.with(|trace| {
        trace.borrow_mut().clear();
    });
}

pub fn get_logs_json() -> String {
    LOG_TRACE.with(|trace| trace.borrow().get_logs_json())
}

/// 指定カテゴリ・レベルの直近ログ
pub fn recent_logs(category: &str, level: &str) -> Vec<LogEntry> {
    LOG_TRACE.with(|trace| {
        trace
            .borrow()
            .logs
            .iter()
            .filter(|e| e.category == category && e.level == level)
            .cloned()
            .collect()
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_ring_buffer_drops_oldest() {
        let mut trace = LogTrace::new();
        for i in 0..(MAX_LOG_ENTRIES + 3) {
            trace.info("cart", &format!("entry {}", i));
        }
        let logs = trace.get_logs();
        assert_eq!(logs.len(), MAX_LOG_ENTRIES);
        assert_eq!(logs[0].message, "entry 3");
    }

    #[test]
    fn test_recent_logs_filters_by_category_and_level() {
        clear_logs();
        log_error("cart", "bad price");
        log_info("cart", "added");
        log_error("sw", "fetch failed");

        let errors = recent_logs("cart", "error");
        assert_eq!(errors.len(), 1);
        assert_eq!(errors[0].message, "bad price");
        assert!(get_logs_json().contains("fetch failed"));
    }
}
