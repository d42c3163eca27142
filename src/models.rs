//! データ構造体モジュール

use serde::{Deserialize, Deserializer, Serialize};

// ============================================
// カート
// ============================================

/// カートの1行（価格は基準通貨ZARのまま保持する）
/// 保存データの価格が数値でない場合は NaN として読み込み、描画時にスキップする
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CartItem {
    pub name: String,
    #[serde(default = "missing_price", deserialize_with = "lenient_price")]
    pub price: f64,
    #[serde(default = "default_quantity", deserialize_with = "lenient_quantity")]
    pub quantity: u32,
}

fn missing_price() -> f64 {
    f64::NAN
}

fn default_quantity() -> u32 {
    1
}

// null や "abc" もエラーにせず NaN にする（カート全体を失わないため）
fn lenient_price<'de, D: Deserializer<'de>>(deserializer: D) -> Result<f64, D::Error> {
    let value = serde_json::Value::deserialize(deserializer)?;
    Ok(match value {
        serde_json::Value::Number(n) => n.as_f64().unwrap_or(f64::NAN),
        serde_json::Value::String(s) => s.trim().parse().unwrap_or(f64::NAN),
        _ => f64::NAN,
    })
}

fn lenient_quantity<'de, D: Deserializer<'de>>(deserializer: D) -> Result<u32, D::Error> {
    let value = serde_json::Value::deserialize(deserializer)?;
    let quantity = match value.as_u64() {
        Some(q) => u32::try_from(q).unwrap_or(u32::MAX),
        None => value.as_f64().filter(|q| q.is_finite() && *q >= 1.0).map_or(1, |q| q as u32),
    };
    Ok(quantity.max(1))
}

impl CartItem {
    pub fn new(name: &str, price: f64) -> Self {
        Self {
            name: name.to_string(),
            price,
            quantity: 1,
        }
    }
}

/// 表示用の行
#[derive(Debug, Clone, PartialEq)]
pub struct CartRow {
    pub name: String,
    pub quantity: u32,
    pub line_total: String,
}

pub const EMPTY_CART_TEXT: &str = "Your cart is empty";

/// レンダリング結果
/// `badge` が `None` のときは件数バッジを隠す
#[derive(Debug, Clone, PartialEq, Default)]
pub struct CartView {
    pub rows: Vec<CartRow>,
    pub total: String,
    pub badge: Option<u32>,
}

impl CartView {
    pub fn is_empty(&self) -> bool {
        self.badge.is_none()
    }
}

// ============================================
// 商品一覧
// ============================================

/// 商品カード
/// `base_price` は data-zar 属性の生の文字列
#[derive(Debug, Clone, PartialEq)]
pub struct ProductListing {
    pub name: String,
    pub image: String,
    pub base_price: String,
    pub label: String,
}

/// (商品名, 画像, ZAR価格)
const CATALOGUE: &[(&str, &str, &str)] = &[
    ("RTX 2080", "/Images/2080.jpg", "8999"),
    ("Beats Studio", "/Images/beats.jpg", "4299"),
    ("White Controller", "/Images/controller-white.jpg", "1199"),
    ("Headphones", "/Images/headphones.jpg", "1899"),
    ("iMac", "/Images/iMac.jpg", "27999"),
    ("MacBook", "/Images/macbook.jpg", "23999"),
    ("Mouse", "/Images/mouse 2.jpg", "100"),
    ("PS5 Bag", "/Images/ps5-bag.jpg", "649"),
    ("Nintendo Switch", "/Images/switch.jpg", "6499"),
    ("Xbox Controller", "/Images/xbox-controller.jpg", "1299"),
];

impl ProductListing {
    pub fn new(name: &str, image: &str, base_price: &str) -> Self {
        Self {
            name: name.to_string(),
            image: image.to_string(),
            base_price: base_price.to_string(),
            label: String::new(),
        }
    }

    /// 全商品（ラベルは未設定。`currency::relabel_listing` で付与する）
    pub fn catalogue() -> Vec<ProductListing> {
        CATALOGUE
            .iter()
            .map(|(name, image, price)| ProductListing::new(name, image, price))
            .collect()
    }
}

// ============================================
// フォント
// ============================================

pub const FONT_CHOICES: &[(&str, &str)] = &[
    ("Arial, sans-serif", "Arial"),
    ("Georgia, serif", "Georgia"),
    ("'Courier New', monospace", "Courier New"),
    ("Verdana, sans-serif", "Verdana"),
    ("'Trebuchet MS', sans-serif", "Trebuchet MS"),
];

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cart_item_json_shape() {
        let item = CartItem::new("Mouse", 100.0);
        let json = serde_json::to_string(&item).unwrap();
        assert_eq!(json, r#"{"name":"Mouse","price":100.0,"quantity":1}"#);
    }

    #[test]
    fn test_non_numeric_price_reads_as_nan() {
        let item: CartItem = serde_json::from_str(r#"{"name":"Broken","price":null,"quantity":1}"#).unwrap();
        assert!(item.price.is_nan());
        assert_eq!(item.quantity, 1);

        let item: CartItem = serde_json::from_str(r#"{"name":"Text","price":"abc"}"#).unwrap();
        assert!(item.price.is_nan());

        let item: CartItem = serde_json::from_str(r#"{"name":"Mouse","price":"100","quantity":0}"#).unwrap();
        assert_eq!(item.price, 100.0);
        assert_eq!(item.quantity, 1);
    }

    #[test]
    fn test_catalogue_images_are_unique() {
        let products = ProductListing::catalogue();
        assert_eq!(products.len(), 10);
        let mut images: Vec<_> = products.iter().map(|p| p.image.as_str()).collect();
        images.sort();
        images.dedup();
        assert_eq!(images.len(), 10);
    }
}
