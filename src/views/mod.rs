//! ビューモジュール

pub mod storefront;

pub use storefront::{ProductGrid, StorefrontHeader};
