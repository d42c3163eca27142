//! アプリケーションのルートとページコンテキスト

use leptos::*;

use crate::cart::CartManager;
use crate::components::Banner;
use crate::currency::CurrencySelector;
use crate::models::ProductListing;
use crate::utils::cookies::DocumentCookies;
use crate::utils::log_trace::{log_info, log_warn};
use crate::utils::storage::BrowserStorage;
use crate::utils::sw::register_service_worker;
use crate::views::{ProductGrid, StorefrontHeader};
use crate::components::CartModal;

pub type BrowserCart = CartManager<BrowserStorage, DocumentCookies>;

/// ページ全体で共有する状態
/// カートへの書き込みは `cart.update` の中だけで行う
#[derive(Clone, Copy)]
pub struct StorefrontContext {
    pub cart: RwSignal<BrowserCart>,
    pub listing: RwSignal<Vec<ProductListing>>,
    pub cart_open: RwSignal<bool>,
}

#[component]
pub fn App() -> impl IntoView {
    // 保存済みカートと通貨を復元
    let mut cart = CartManager::load(BrowserStorage::Local, DocumentCookies);
    let mut listing = ProductListing::catalogue();
    let currency = CurrencySelector::new(DocumentCookies).restore(&mut listing, &mut cart);
    log_info(
        "cart",
        &format!("カート読み込み: {} 件 ({})", cart.items().len(), currency.code()),
    );

    let ctx = StorefrontContext {
        cart: create_rw_signal(cart),
        listing: create_rw_signal(listing),
        cart_open: create_rw_signal(false),
    };
    provide_context(ctx);

    // オフライン対応（登録できなくてもページはそのまま動く）
    let (cache_banner, set_cache_banner) = create_signal(false);
    spawn_local(async move {
        match register_service_worker().await {
            Ok(scope) => {
                log_info("sw", &format!("Service Worker 登録完了: {}", scope));
                set_cache_banner.set(true);
            }
            Err(e) => log_warn("sw", &format!("Service Worker 登録失敗: {}", e)),
        }
    });

    view! {
        <div class="storefront">
            <StorefrontHeader />
            <ProductGrid />
            <CartModal />

            {move || cache_banner.get().then(|| view! {
                <Banner
                    id="cache-banner"
                    message="This site now works offline. Pages and images are cached."
                    on_close=move |_: ()| set_cache_banner.set(false)
                />
            })}
        </div>
    }
}
