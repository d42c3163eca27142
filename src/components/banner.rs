//! お知らせバナー（「Got it!」で閉じる）

use leptos::*;

#[component]
pub fn Banner(
    #[prop(into)] id: String,
    #[prop(into)] message: String,
    #[prop(into)] on_close: Callback<()>,
) -> impl IntoView {
    view! {
        <div id=id class="info-banner">
            <p class="banner-message">{message}</p>
            <button class="banner-close" on:click=move |_| on_close.call(())>"Got it!"</button>
        </div>
    }
}
