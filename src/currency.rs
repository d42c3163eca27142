//! 通貨換算と通貨選択
//!
//! 商品価格は基準通貨（ZAR）で保持し、表示時にのみ固定レートで換算する。

use crate::cart::CartManager;
use crate::error::{Result, StorefrontError};
use crate::models::ProductListing;
use crate::utils::cookies::{CookieJar, PREFERENCE_TTL_DAYS};
use crate::utils::log_trace::{log_error, log_info, log_warn};
use crate::utils::storage::KeyValueStore;

pub const CURRENCY_COOKIE: &str = "currency";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Currency {
    #[default]
    Zar,
    Usd,
    Eur,
}

impl Currency {
    pub const ALL: [Currency; 3] = [Currency::Zar, Currency::Usd, Currency::Eur];

    pub fn code(self) -> &'static str {
        match self {
            Currency::Zar => "ZAR",
            Currency::Usd => "USD",
            Currency::Eur => "EUR",
        }
    }

    pub fn from_code(code: &str) -> Option<Self> {
        let code = code.trim();
        Self::ALL.into_iter().find(|c| c.code() == code)
    }

    /// ZARからの換算レート
    pub fn rate(self) -> f64 {
        match self {
            Currency::Zar => 1.0,
            Currency::Usd => 0.054,
            Currency::Eur => 0.050,
        }
    }

    pub fn symbol(self) -> &'static str {
        match self {
            Currency::Zar => "R",
            Currency::Usd => "$",
            Currency::Eur => "€",
        }
    }

    pub fn convert(self, reference_price: f64) -> f64 {
        reference_price * self.rate()
    }

    /// カート用 "R12.50"
    pub fn format_amount(self, amount: f64) -> String {
        format!("{}{:.2}", self.symbol(), amount)
    }

    /// 商品カード用 "R 12.50"
    pub fn format_label(self, amount: f64) -> String {
        format!("{} {:.2}", self.symbol(), amount)
    }

    /// 空カートの合計表示
    pub fn zero_label(self) -> String {
        format!("{}0", self.symbol())
    }
}

/// data-zar 属性の価格を読む
pub fn parse_price(raw: &str) -> Option<f64> {
    raw.trim().parse::<f64>().ok().filter(|p| p.is_finite())
}

pub fn is_valid_price(price: f64) -> bool {
    price.is_finite() && price > 0.0
}

/// 全商品の価格ラベルを書き換える。基準価格が読めない商品はそのまま
pub fn relabel_listing(listing: &mut [ProductListing], currency: Currency) {
    for product in listing.iter_mut() {
        match parse_price(&product.base_price) {
            Some(base) => product.label = currency.format_label(currency.convert(base)),
            None => log_error(
                "currency",
                &format!("商品の基準価格が不正です: {} ({:?})", product.name, product.base_price),
            ),
        }
    }
}

// ============================================
// 通貨セレクタ
// ============================================

pub struct CurrencySelector<C> {
    cookies: C,
}

impl<C: CookieJar> CurrencySelector<C> {
    pub fn new(cookies: C) -> Self {
        Self { cookies }
    }

    /// 保存済みの通貨（認識できるコードのみ）
    pub fn saved(&self) -> Option<Currency> {
        self.cookies.get(CURRENCY_COOKIE).and_then(|code| Currency::from_code(&code))
    }

    /// 通貨を切り替え、商品ラベルとカート表示を更新する
    /// 不明なコードは何も変更しない
    pub fn select<S: KeyValueStore, J: CookieJar>(
        &self,
        code: &str,
        listing: &mut [ProductListing],
        cart: &mut CartManager<S, J>,
    ) -> Result<Currency> {
        let Some(currency) = Currency::from_code(code) else {
            log_warn("currency", &format!("不明な通貨コード: {:?}", code));
            return Err(StorefrontError::UnknownCurrency(code.to_string()));
        };

        if let Err(e) = self.cookies.set(CURRENCY_COOKIE, currency.code(), PREFERENCE_TTL_DAYS) {
            log_error("currency", &format!("通貨設定を保存できません: {}", e));
        }

        relabel_listing(listing, currency);
        cart.set_currency(currency);
        log_info("currency", &format!("通貨を {} に変更", currency.code()));
        Ok(currency)
    }

    /// 起動時に保存済み通貨を復元する。なければ基準通貨
    pub fn restore<S: KeyValueStore, J: CookieJar>(
        &self,
        listing: &mut [ProductListing],
        cart: &mut CartManager<S, J>,
    ) -> Currency {
        let currency = self.saved().unwrap_or_default();
        relabel_listing(listing, currency);
        cart.set_currency(currency);
        currency
    }
}
