//! ストアフロント（カート・通貨・設定・オフラインキャッシュ）

pub mod app;
pub mod cart;
pub mod components;
pub mod currency;
pub mod error;
pub mod models;
pub mod prefs;
pub mod utils;
pub mod views;
pub mod worker;

pub use app::{App, StorefrontContext};
pub use cart::CartManager;
pub use currency::{Currency, CurrencySelector};
pub use error::StorefrontError;
