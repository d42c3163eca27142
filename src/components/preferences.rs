//! 設定コントロール（名前・フォント・通貨）

use leptos::*;

use crate::components::Banner;
use crate::currency::{Currency, CurrencySelector};
use crate::models::FONT_CHOICES;
use crate::prefs::{welcome_message, FontPreference, NamePreference};
use crate::utils::apply_body_font;
use crate::utils::cookies::DocumentCookies;
use crate::utils::log_trace::log_warn;
use crate::utils::storage::BrowserStorage;
use crate::StorefrontContext;

#[component]
pub fn PreferenceBar() -> impl IntoView {
    view! {
        <div class="preference-bar">
            <NameField />
            <FontSelect />
            <CurrencySelect />
        </div>
    }
}

/// 名前入力欄
/// 保存済みの名前があれば入力欄に入れ、一度だけ歓迎バナーを出す
#[component]
pub fn NameField() -> impl IntoView {
    let saved = NamePreference::new(DocumentCookies).saved();
    let (welcome, set_welcome) = create_signal(saved.clone());
    let (name, set_name) = create_signal(saved.unwrap_or_default());

    let on_input = move |ev: web_sys::Event| {
        let value = event_target_value(&ev);
        NamePreference::new(DocumentCookies).save_input(&value);
        set_name.set(value);
    };

    view! {
        <div class="name-field">
            <label for="name">"Your name"</label>
            <input
                id="name"
                type="text"
                placeholder="Enter your name"
                prop:value=move || name.get()
                on:input=on_input
            />
            {move || welcome.get().map(|n| view! {
                <Banner
                    id="welcome-banner"
                    message=welcome_message(&n)
                    on_close=move |_: ()| set_welcome.set(None)
                />
            })}
        </div>
    }
}

/// フォント選択（sessionStorage に保存）
#[component]
pub fn FontSelect() -> impl IntoView {
    let saved = FontPreference::new(BrowserStorage::Session).saved();
    if let Some(font) = &saved {
        apply_body_font(font);
    }
    let initial = saved.unwrap_or_else(|| FONT_CHOICES[0].0.to_string());
    let (font, set_font) = create_signal(initial);

    let on_change = move |ev: web_sys::Event| {
        let selected = event_target_value(&ev);
        apply_body_font(&selected);
        if let Err(e) = FontPreference::new(BrowserStorage::Session).save(&selected) {
            log_warn("prefs", &format!("フォント設定を保存できません: {}", e));
        }
        set_font.set(selected);
    };

    view! {
        <select id="font-select" on:change=on_change>
            {FONT_CHOICES.iter().map(|&(value, label)| view! {
                <option value=value selected=move || font.get() == value>{label}</option>
            }).collect_view()}
        </select>
    }
}

/// 通貨選択
#[component]
pub fn CurrencySelect() -> impl IntoView {
    let ctx = use_context::<StorefrontContext>().expect("StorefrontContext not found");

    let on_change = move |ev: web_sys::Event| {
        let code = event_target_value(&ev);
        let selector = CurrencySelector::new(DocumentCookies);
        let mut listing = ctx.listing.get_untracked();
        match ctx.cart.try_update(|cart| selector.select(&code, &mut listing, cart)) {
            Some(Ok(_)) => ctx.listing.set(listing),
            Some(Err(e)) => log_warn("currency", &e.to_string()),
            None => {}
        }
    };

    view! {
        <select id="currency" on:change=on_change>
            {Currency::ALL.into_iter().map(|c| view! {
                <option
                    value=c.code()
                    selected=move || ctx.cart.with(|cart| cart.currency() == c)
                >
                    {c.code()}
                </option>
            }).collect_view()}
        </select>
    }
}
