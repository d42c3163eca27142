//! エラー型

use thiserror::Error;

#[derive(Error, Debug)]
pub enum StorefrontError {
    #[error("Invalid price for item {name}: {price}")]
    InvalidPrice { name: String, price: f64 },

    #[error("Unknown currency code: {0}")]
    UnknownCurrency(String),

    #[error("Storage unavailable: {0}")]
    StorageUnavailable(String),

    #[error("Storage write failed: {0}")]
    Storage(String),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("Cache error: {0}")]
    Cache(String),

    #[error("Network error: {0}")]
    Network(String),

    #[error("Service worker registration failed: {0}")]
    Registration(String),
}

pub type Result<T> = std::result::Result<T, StorefrontError>;
