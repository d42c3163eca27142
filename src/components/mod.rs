//! UIコンポーネントモジュール

pub mod banner;
pub mod cart_modal;
pub mod preferences;
pub mod product_card;

pub use banner::Banner;
pub use cart_modal::{CartIcon, CartModal};
pub use preferences::{CurrencySelect, FontSelect, NameField, PreferenceBar};
pub use product_card::ProductCard;
