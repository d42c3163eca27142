//! ページ側の Service Worker 登録

use wasm_bindgen::{JsCast, JsValue};
use wasm_bindgen_futures::JsFuture;
use web_sys::ServiceWorkerRegistration;

use crate::error::{Result, StorefrontError};

/// Trunk が service-worker バイナリ用に出力するローダー
pub const SERVICE_WORKER_URL: &str = "service-worker_loader.js";

/// Service Worker を登録し、スコープを返す
pub async fn register_service_worker() -> Result<String> {
    let window = web_sys::window()
        .ok_or_else(|| StorefrontError::Registration("windowが利用できません".to_string()))?;
    let navigator = window.navigator();

    let supported = js_sys::Reflect::has(&navigator, &JsValue::from_str("serviceWorker")).unwrap_or(false);
    if !supported {
        return Err(StorefrontError::Registration("serviceWorker 非対応のブラウザ".to_string()));
    }

    let registration = JsFuture::from(navigator.service_worker().register(SERVICE_WORKER_URL))
        .await
        .map_err(|e| StorefrontError::Registration(format!("{:?}", e)))?;
    let registration: ServiceWorkerRegistration = registration.unchecked_into();
    Ok(registration.scope())
}
