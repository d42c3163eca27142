//! 商品カードコンポーネント

use leptos::*;

use crate::currency::parse_price;
use crate::models::ProductListing;
use crate::utils::log_trace::log_warn;
use crate::StorefrontContext;

/// 商品カード
/// 価格は data-zar 属性の基準価格から換算済みのラベルを表示する
#[component]
pub fn ProductCard(product: ProductListing) -> impl IntoView {
    let ctx = use_context::<StorefrontContext>().expect("StorefrontContext not found");

    let name = product.name.clone();
    let base_price = product.base_price.clone();
    let on_add = move |_| {
        // 読めない価格は add_item 側で拒否される
        let price = parse_price(&base_price).unwrap_or(f64::NAN);
        ctx.cart.update(|cart| {
            if let Err(e) = cart.add_item(&name, price) {
                log_warn("cart", &format!("カートに追加できません: {}", e));
            }
        });
    };

    view! {
        <div class="product-box">
            <img class="product-image" src=product.image.clone() alt=product.name.clone() />
            <h3 class="product-name">{product.name.clone()}</h3>
            <p class="product-price" data-zar=product.base_price.clone()>{product.label.clone()}</p>
            <button class="product-btn" on:click=on_add>"Add to cart"</button>
        </div>
    }
}
