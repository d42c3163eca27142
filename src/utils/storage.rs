//! キー・バリューストレージ（localStorage / sessionStorage）

use std::cell::RefCell;
use std::collections::HashMap;
use std::rc::Rc;

use crate::error::{Result, StorefrontError};

/// 同期的なキー・バリューストア
pub trait KeyValueStore {
    fn get_item(&self, key: &str) -> Option<String>;
    fn set_item(&self, key: &str, value: &str) -> Result<()>;
    fn remove_item(&self, key: &str) -> Result<()>;
}

/// ブラウザのWeb Storage
/// `Local` はセッションを跨いで保持、`Session` はタブを閉じると消える
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BrowserStorage {
    Local,
    Session,
}

impl BrowserStorage {
    fn label(self) -> &'static str {
        match self {
            BrowserStorage::Local => "localStorage",
            BrowserStorage::Session => "sessionStorage",
        }
    }

    #[cfg(target_arch = "wasm32")]
    fn handle(self) -> Option<web_sys::Storage> {
        let window = web_sys::window()?;
        match self {
            BrowserStorage::Local => window.local_storage().ok()?,
            BrowserStorage::Session => window.session_storage().ok()?,
        }
    }
}

impl KeyValueStore for BrowserStorage {
    fn get_item(&self, key: &str) -> Option<String> {
        #[cfg(target_arch = "wasm32")]
        {
            self.handle()?.get_item(key).ok()?
        }

        #[cfg(not(target_arch = "wasm32"))]
        {
            let _ = key;
            None
        }
    }

    fn set_item(&self, key: &str, value: &str) -> Result<()> {
        #[cfg(target_arch = "wasm32")]
        {
            let storage = self
                .handle()
                .ok_or_else(|| StorefrontError::StorageUnavailable(self.label().to_string()))?;
            storage
                .set_item(key, value)
                .map_err(|e| StorefrontError::Storage(format!("{} set_item failed: {:?}", self.label(), e)))
        }

        #[cfg(not(target_arch = "wasm32"))]
        {
            let _ = (key, value);
            Err(StorefrontError::StorageUnavailable(self.label().to_string()))
        }
    }

    fn remove_item(&self, key: &str) -> Result<()> {
        #[cfg(target_arch = "wasm32")]
        {
            let storage = self
                .handle()
                .ok_or_else(|| StorefrontError::StorageUnavailable(self.label().to_string()))?;
            storage
                .remove_item(key)
                .map_err(|e| StorefrontError::Storage(format!("{} remove_item failed: {:?}", self.label(), e)))
        }

        #[cfg(not(target_arch = "wasm32"))]
        {
            let _ = key;
            Err(StorefrontError::StorageUnavailable(self.label().to_string()))
        }
    }
}

/// メモリ上のストア（ブラウザ外での実行・テスト用）
/// クローンは同じ中身を共有する
#[derive(Debug, Clone, Default)]
pub struct MemoryStorage {
    entries: Rc<RefCell<HashMap<String, String>>>,
}

impl MemoryStorage {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.borrow().is_empty()
    }
}

impl KeyValueStore for MemoryStorage {
    fn get_item(&self, key: &str) -> Option<String> {
        self.entries.borrow().get(key).cloned()
    }

    fn set_item(&self, key: &str, value: &str) -> Result<()> {
        self.entries.borrow_mut().insert(key.to_string(), value.to_string());
        Ok(())
    }

    fn remove_item(&self, key: &str) -> Result<()> {
        self.entries.borrow_mut().remove(key);
        Ok(())
    }
}
