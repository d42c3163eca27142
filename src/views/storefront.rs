//! ストアフロント画面（ヘッダーと商品一覧）

use leptos::*;

use crate::components::{CartIcon, PreferenceBar, ProductCard};
use crate::StorefrontContext;

#[component]
pub fn StorefrontHeader() -> impl IntoView {
    view! {
        <header class="site-header">
            <img class="logo" src="/Images/logo.jpg" alt="Tech Store" />
            <h1>"Tech Store"</h1>
            <PreferenceBar />
            <CartIcon />
        </header>
    }
}

/// 商品一覧（通貨変更でラベルが書き換わると再描画）
#[component]
pub fn ProductGrid() -> impl IntoView {
    let ctx = use_context::<StorefrontContext>().expect("StorefrontContext not found");

    view! {
        <section class="product-grid">
            {move || ctx.listing.get().into_iter().map(|product| view! {
                <ProductCard product=product />
            }).collect_view()}
        </section>
    }
}
