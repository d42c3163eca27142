//! カートアイコンとカートモーダル

use leptos::*;

use crate::models::EMPTY_CART_TEXT;
use crate::StorefrontContext;

/// ヘッダーのカートアイコン（件数バッジ付き、クリックでモーダル開閉）
#[component]
pub fn CartIcon() -> impl IntoView {
    let ctx = use_context::<StorefrontContext>().expect("StorefrontContext not found");
    let badge = move || ctx.cart.with(|cart| cart.view().badge);

    view! {
        <div id="cart" class="cart-icon" on:click=move |_| ctx.cart_open.update(|open| *open = !*open)>
            <span class="cart-symbol">"🛒"</span>
            <span
                id="cart-count"
                class="badge"
                style:display=move || if badge().is_some() { "inline-block" } else { "none" }
            >
                {move || badge().unwrap_or(0)}
            </span>
        </div>
    }
}

#[component]
pub fn CartModal() -> impl IntoView {
    let ctx = use_context::<StorefrontContext>().expect("StorefrontContext not found");
    let cart_view = move || ctx.cart.with(|cart| cart.view().clone());

    let on_clear = move |_| ctx.cart.update(|cart| cart.clear_cart());
    let on_close = move |ev: web_sys::MouseEvent| {
        ev.stop_propagation();
        ctx.cart_open.set(false);
    };

    view! {
        <div
            id="cart-modal"
            class="cart-modal"
            class:show=move || ctx.cart_open.get()
            on:click=|ev: web_sys::MouseEvent| ev.stop_propagation()
        >
            <div class="cart-header">
                <h2>"Your Cart"</h2>
                <button class="close-btn" on:click=on_close>"×"</button>
            </div>

            <ul id="cart-items" class="list-group">
                {move || {
                    let current = cart_view();
                    if current.is_empty() {
                        view! { <li class="list-group-item">{EMPTY_CART_TEXT}</li> }.into_view()
                    } else {
                        current.rows.into_iter().map(|row| view! {
                            <li class="list-group-item d-flex justify-content-between align-items-center">
                                <span>{row.name} " x " {row.quantity}</span>
                                <span>{row.line_total}</span>
                            </li>
                        }).collect_view()
                    }
                }}
            </ul>

            <p class="cart-total-line">
                "Total: " <span id="cart-total">{move || cart_view().total}</span>
            </p>
            <button id="clear-cart" class="clear-btn" on:click=on_clear>"Clear cart"</button>
        </div>
    }
}
