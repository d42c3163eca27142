//! カートの永続化（localStorage の "cart" キー）

use crate::error::Result;
use crate::models::CartItem;

use super::log_trace::log_warn;
use super::storage::KeyValueStore;

pub const CART_KEY: &str = "cart";

/// カート全体を保存（前回の値は上書き）
pub fn save_cart<S: KeyValueStore>(store: &S, items: &[CartItem]) -> Result<()> {
    let json = serde_json::to_string(items)?;
    store.set_item(CART_KEY, &json)
}

/// 保存済みカートを読み込み
/// 未保存・壊れたJSONは空のカートとして扱う
/// 要素単位で読み込み、読めない要素だけを捨てる（価格が壊れた行は NaN で残し、描画時にスキップ）
pub fn load_cart<S: KeyValueStore>(store: &S) -> Vec<CartItem> {
    let Some(json) = store.get_item(CART_KEY) else {
        return Vec::new();
    };
    let values = match serde_json::from_str::<Option<Vec<serde_json::Value>>>(&json) {
        Ok(values) => values.unwrap_or_default(),
        Err(e) => {
            log_warn("storage", &format!("保存済みカートを読み込めません（空で開始）: {}", e));
            return Vec::new();
        }
    };
    values
        .into_iter()
        .enumerate()
        .filter_map(|(index, value)| match serde_json::from_value::<CartItem>(value) {
            Ok(item) => Some(item),
            Err(e) => {
                log_warn("storage", &format!("カートの {} 件目を読み込めません: {}", index, e));
                None
            }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::utils::storage::MemoryStorage;

    #[test]
    fn test_round_trip_preserves_order_and_quantities() {
        let store = MemoryStorage::new();
        let items = vec![
            CartItem { name: "iMac".into(), price: 27999.0, quantity: 1 },
            CartItem { name: "Mouse".into(), price: 100.0, quantity: 3 },
            CartItem { name: "PS5 Bag".into(), price: 649.5, quantity: 2 },
        ];
        save_cart(&store, &items).unwrap();
        assert_eq!(load_cart(&store), items);
    }

    #[test]
    fn test_missing_and_malformed_cart_load_empty() {
        let store = MemoryStorage::new();
        assert!(load_cart(&store).is_empty());

        store.set_item(CART_KEY, "[{\"name\": \"Mouse\",").unwrap();
        assert!(load_cart(&store).is_empty());

        store.set_item(CART_KEY, "null").unwrap();
        assert!(load_cart(&store).is_empty());
    }

    #[test]
    fn test_null_price_keeps_other_items() {
        let store = MemoryStorage::new();
        store
            .set_item(
                CART_KEY,
                r#"[{"name":"Broken","price":null,"quantity":1},{"name":"Mouse","price":100,"quantity":2}]"#,
            )
            .unwrap();
        let items = load_cart(&store);
        assert_eq!(items.len(), 2);
        assert_eq!(items[0].name, "Broken");
        assert!(items[0].price.is_nan());
        assert_eq!(items[1], CartItem { name: "Mouse".into(), price: 100.0, quantity: 2 });
    }

    #[test]
    fn test_unreadable_elements_are_dropped() {
        let store = MemoryStorage::new();
        store
            .set_item(CART_KEY, r#"[42, {"price":5}, {"name":"Mouse","price":100,"quantity":1}]"#)
            .unwrap();
        let items = load_cart(&store);
        assert_eq!(items, vec![CartItem::new("Mouse", 100.0)]);
    }
}
