//! カート管理
//!
//! ページごとに1つの `CartManager` を持ち、変更は `&mut self` 経由のみ。
//! 変更のたびに表示を再計算し、localStorage に保存する。

use crate::currency::{is_valid_price, Currency};
use crate::error::{Result, StorefrontError};
use crate::models::{CartItem, CartRow, CartView};
use crate::prefs::forget_user;
use crate::utils::cache::{load_cart, save_cart};
use crate::utils::cookies::CookieJar;
use crate::utils::log_trace::{log_error, log_info};
use crate::utils::storage::KeyValueStore;

/// 現在の通貨でカートを描画する
/// 価格が不正な行はスキップしてログに残す（合計にも含めない）
pub fn render_cart(items: &[CartItem], currency: Currency) -> CartView {
    if items.is_empty() {
        return CartView {
            rows: Vec::new(),
            total: currency.zero_label(),
            badge: None,
        };
    }

    let mut rows = Vec::with_capacity(items.len());
    let mut total = 0.0;
    let mut total_items: u32 = 0;

    for item in items {
        if !is_valid_price(item.price) {
            log_error("cart", &format!("価格が不正な商品: {} ({})", item.name, item.price));
            continue;
        }

        let line_total = currency.convert(item.price) * f64::from(item.quantity);
        rows.push(CartRow {
            name: item.name.clone(),
            quantity: item.quantity,
            line_total: currency.format_amount(line_total),
        });

        total += line_total;
        total_items = total_items.saturating_add(item.quantity);
    }

    CartView {
        rows,
        total: currency.format_amount(total),
        badge: Some(total_items),
    }
}

pub struct CartManager<S, C> {
    store: S,
    cookies: C,
    items: Vec<CartItem>,
    currency: Currency,
    view: CartView,
}

impl<S: KeyValueStore, C: CookieJar> CartManager<S, C> {
    /// 保存済みカートを読み込んで初回描画する
    pub fn load(store: S, cookies: C) -> Self {
        let items = load_cart(&store);
        let currency = Currency::default();
        let view = render_cart(&items, currency);
        Self {
            store,
            cookies,
            items,
            currency,
            view,
        }
    }

    pub fn items(&self) -> &[CartItem] {
        &self.items
    }

    pub fn currency(&self) -> Currency {
        self.currency
    }

    pub fn view(&self) -> &CartView {
        &self.view
    }

    /// 商品を追加する。既にあれば数量+1
    pub fn add_item(&mut self, name: &str, unit_price: f64) -> Result<()> {
        if !is_valid_price(unit_price) {
            log_error("cart", &format!("価格が不正なため追加しません: {} ({})", name, unit_price));
            return Err(StorefrontError::InvalidPrice {
                name: name.to_string(),
                price: unit_price,
            });
        }

        match self.items.iter_mut().find(|item| item.name == name) {
            Some(existing) => existing.quantity = existing.quantity.saturating_add(1),
            None => self.items.push(CartItem::new(name, unit_price)),
        }

        self.render();
        self.persist_or_log();
        Ok(())
    }

    /// カートを空にし、保存済みユーザー名も削除する
    pub fn clear_cart(&mut self) {
        self.items.clear();
        self.render();
        self.persist_or_log();
        forget_user(&self.cookies);
        log_info("cart", "カートを空にし、ユーザー名Cookieを削除しました");
    }

    pub fn set_currency(&mut self, currency: Currency) {
        self.currency = currency;
        self.render();
    }

    pub fn render(&mut self) -> &CartView {
        self.view = render_cart(&self.items, self.currency);
        &self.view
    }

    pub fn persist(&self) -> Result<()> {
        save_cart(&self.store, &self.items)
    }

    fn persist_or_log(&self) {
        if let Err(e) = self.persist() {
            log_error("storage", &format!("カートを保存できません: {}", e));
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::EMPTY_CART_TEXT;
    use crate::prefs::USERNAME_COOKIE;
    use crate::utils::cache::CART_KEY;
    use crate::utils::cookies::MemoryCookies;
    use crate::utils::log_trace::{clear_logs, recent_logs};
    use crate::utils::storage::MemoryStorage;

    fn new_cart() -> (CartManager<MemoryStorage, MemoryCookies>, MemoryStorage, MemoryCookies) {
        let store = MemoryStorage::new();
        let cookies = MemoryCookies::new();
        (CartManager::load(store.clone(), cookies.clone()), store, cookies)
    }

    #[test]
    fn test_repeated_add_increments_single_entry() {
        let (mut cart, _, _) = new_cart();
        for _ in 0..5 {
            cart.add_item("Mouse", 100.0).unwrap();
        }
        cart.add_item("iMac", 27999.0).unwrap();
        cart.add_item("Mouse", 100.0).unwrap();

        let mice: Vec<_> = cart.items().iter().filter(|i| i.name == "Mouse").collect();
        assert_eq!(mice.len(), 1);
        assert_eq!(mice[0].quantity, 6);
        assert_eq!(cart.items()[1].name, "iMac");
        assert_eq!(cart.view().badge, Some(7));
    }

    #[test]
    fn test_invalid_price_is_rejected_without_change() {
        clear_logs();
        let (mut cart, store, _) = new_cart();
        for price in [0.0, -10.0, f64::NAN, f64::INFINITY] {
            let err = cart.add_item("Ghost", price).unwrap_err();
            assert!(matches!(err, StorefrontError::InvalidPrice { .. }));
        }
        assert!(cart.items().is_empty());
        assert_eq!(store.get_item(CART_KEY), None);
        assert_eq!(recent_logs("cart", "error").len(), 4);
    }

    #[test]
    fn test_add_persists_immediately() {
        let (mut cart, store, cookies) = new_cart();
        cart.add_item("Mouse", 100.0).unwrap();
        cart.add_item("PS5 Bag", 649.0).unwrap();

        let reloaded = CartManager::load(store, cookies);
        assert_eq!(reloaded.items(), cart.items());
    }

    #[test]
    fn test_clear_empties_cart_and_forgets_user() {
        let (mut cart, store, cookies) = new_cart();
        cookies.set(USERNAME_COOKIE, "Thabo", 30).unwrap();
        cookies.set("currency", "USD", 30).unwrap();
        cart.add_item("Mouse", 100.0).unwrap();

        cart.clear_cart();

        assert!(cart.items().is_empty());
        assert!(cart.view().is_empty());
        assert_eq!(store.get_item(CART_KEY).as_deref(), Some("[]"));
        assert_eq!(cookies.get(USERNAME_COOKIE), None);
        assert_eq!(cookies.get("currency").as_deref(), Some("USD"));

        // 空のカートでも同じ結果
        cart.clear_cart();
        assert!(cart.items().is_empty());
    }

    #[test]
    fn test_render_usd_line_and_total() {
        let items = vec![CartItem { name: "Mouse".into(), price: 100.0, quantity: 2 }];
        let view = render_cart(&items, Currency::Usd);
        assert_eq!(view.rows.len(), 1);
        assert_eq!(view.rows[0].line_total, "$10.80");
        assert_eq!(view.rows[0].quantity, 2);
        assert_eq!(view.total, "$10.80");
        assert_eq!(view.badge, Some(2));
    }

    #[test]
    fn test_render_empty_cart() {
        let view = render_cart(&[], Currency::Eur);
        assert!(view.rows.is_empty());
        assert_eq!(view.total, "€0");
        assert_eq!(view.badge, None);
        assert!(view.is_empty());
        assert!(!EMPTY_CART_TEXT.is_empty());
    }

    #[test]
    fn test_render_skips_corrupted_items() {
        clear_logs();
        let items = vec![
            CartItem { name: "Broken".into(), price: -5.0, quantity: 4 },
            CartItem { name: "Mouse".into(), price: 100.0, quantity: 1 },
        ];
        let view = render_cart(&items, Currency::Zar);
        assert_eq!(view.rows.len(), 1);
        assert_eq!(view.rows[0].name, "Mouse");
        assert_eq!(view.total, "R100.00");
        assert_eq!(view.badge, Some(1));
        assert_eq!(recent_logs("cart", "error").len(), 1);
    }

    #[test]
    fn test_stored_prices_stay_in_reference_currency() {
        let (mut cart, store, _) = new_cart();
        cart.add_item("Mouse", 100.0).unwrap();
        cart.set_currency(Currency::Usd);
        cart.add_item("Mouse", 100.0).unwrap();

        assert_eq!(cart.items()[0].price, 100.0);
        assert_eq!(
            store.get_item(CART_KEY).as_deref(),
            Some(r#"[{"name":"Mouse","price":100.0,"quantity":2}]"#)
        );
        assert_eq!(cart.view().total, "$10.80");
    }

    #[test]
    fn test_load_starts_empty_on_malformed_storage() {
        let store = MemoryStorage::new();
        store.set_item(CART_KEY, "not json").unwrap();
        let cart = CartManager::load(store, MemoryCookies::new());
        assert!(cart.items().is_empty());
        assert_eq!(cart.view().total, "R0");
    }

    #[test]
    fn test_load_renders_valid_items_next_to_null_price() {
        clear_logs();
        let store = MemoryStorage::new();
        store
            .set_item(
                CART_KEY,
                r#"[{"name":"Broken","price":null,"quantity":1},{"name":"Mouse","price":100,"quantity":2}]"#,
            )
            .unwrap();
        let cart = CartManager::load(store, MemoryCookies::new());

        assert_eq!(cart.items().len(), 2);
        assert_eq!(cart.view().rows.len(), 1);
        assert_eq!(cart.view().rows[0].name, "Mouse");
        assert_eq!(cart.view().rows[0].line_total, "R200.00");
        assert_eq!(cart.view().total, "R200.00");
        assert_eq!(cart.view().badge, Some(2));
        assert_eq!(recent_logs("cart", "error").len(), 1);
    }
}
