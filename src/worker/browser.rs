//! Service Worker 側のブラウザ連携
//! CacheStorage / fetch のバインディングと、install・activate・fetch ハンドラ登録

use std::rc::Rc;

use js_sys::{Array, Promise};
use wasm_bindgen::prelude::*;
use wasm_bindgen::JsCast;
use wasm_bindgen_futures::{future_to_promise, JsFuture};
use web_sys::{ExtendableEvent, FetchEvent, Response, ServiceWorkerGlobalScope};

use super::{CacheBackend, FetchOutcome, Network, OfflineWorker};
use crate::error::{Result, StorefrontError};
use crate::utils::log_trace::{log_error, log_info};

#[wasm_bindgen]
extern "C" {
    /// `self.caches`
    pub type JsCacheStorage;

    #[wasm_bindgen(method)]
    fn open(this: &JsCacheStorage, cache_name: &str) -> Promise;

    #[wasm_bindgen(method, js_name = "match")]
    fn match_url(this: &JsCacheStorage, url: &str) -> Promise;

    #[wasm_bindgen(method)]
    fn keys(this: &JsCacheStorage) -> Promise;

    #[wasm_bindgen(method)]
    fn delete(this: &JsCacheStorage, cache_name: &str) -> Promise;

    pub type JsCache;

    #[wasm_bindgen(method)]
    fn put(this: &JsCache, url: &str, response: &Response) -> Promise;
}

fn cache_err(action: &str, e: JsValue) -> StorefrontError {
    StorefrontError::Cache(format!("{} failed: {:?}", action, e))
}

// ============================================
// CacheStorage
// ============================================

pub struct BrowserCaches {
    storage: JsCacheStorage,
}

impl BrowserCaches {
    pub fn from_scope(scope: &ServiceWorkerGlobalScope) -> Result<Self> {
        let caches = js_sys::Reflect::get(&JsValue::from(scope.clone()), &JsValue::from_str("caches"))
            .map_err(|e| cache_err("self.caches", e))?;
        if caches.is_undefined() || caches.is_null() {
            return Err(StorefrontError::Cache("CacheStorage is not available".to_string()));
        }
        Ok(Self {
            storage: caches.unchecked_into::<JsCacheStorage>(),
        })
    }

    async fn open_cache(&self, bucket: &str) -> Result<JsCache> {
        let cache = JsFuture::from(self.storage.open(bucket))
            .await
            .map_err(|e| cache_err("caches.open", e))?;
        Ok(cache.unchecked_into::<JsCache>())
    }
}

impl CacheBackend for BrowserCaches {
    type Response = Response;

    async fn open(&self, bucket: &str) -> Result<()> {
        self.open_cache(bucket).await.map(|_| ())
    }

    async fn put(&self, bucket: &str, url: &str, response: Response) -> Result<()> {
        let cache = self.open_cache(bucket).await?;
        JsFuture::from(cache.put(url, &response))
            .await
            .map_err(|e| cache_err("cache.put", e))?;
        Ok(())
    }

    async fn match_any(&self, url: &str) -> Result<Option<Response>> {
        let found = JsFuture::from(self.storage.match_url(url))
            .await
            .map_err(|e| cache_err("caches.match", e))?;
        if found.is_undefined() || found.is_null() {
            return Ok(None);
        }
        found
            .dyn_into::<Response>()
            .map(Some)
            .map_err(|e| cache_err("caches.match", e))
    }

    async fn keys(&self) -> Result<Vec<String>> {
        let names = JsFuture::from(self.storage.keys())
            .await
            .map_err(|e| cache_err("caches.keys", e))?;
        Ok(Array::from(&names).iter().filter_map(|v| v.as_string()).collect())
    }

    async fn delete(&self, bucket: &str) -> Result<bool> {
        let deleted = JsFuture::from(self.storage.delete(bucket))
            .await
            .map_err(|e| cache_err("caches.delete", e))?;
        Ok(deleted.as_bool().unwrap_or(false))
    }
}

// ============================================
// fetch
// ============================================

pub struct BrowserNetwork {
    scope: ServiceWorkerGlobalScope,
}

impl BrowserNetwork {
    pub fn new(scope: ServiceWorkerGlobalScope) -> Self {
        Self { scope }
    }
}

impl Network for BrowserNetwork {
    type Response = Response;

    async fn fetch(&self, url: &str) -> Result<Response> {
        let value = JsFuture::from(self.scope.fetch_with_str(url))
            .await
            .map_err(|e| StorefrontError::Network(format!("{}: {:?}", url, e)))?;
        let response: Response = value
            .dyn_into()
            .map_err(|e| StorefrontError::Network(format!("{}: not a Response: {:?}", url, e)))?;
        if !response.ok() {
            return Err(StorefrontError::Network(format!("{}: HTTP {}", url, response.status())));
        }
        Ok(response)
    }
}

// ============================================
// ライフサイクルハンドラ
// ============================================

type BrowserWorker = OfflineWorker<BrowserCaches, BrowserNetwork>;

/// Service Worker のエントリポイントから呼ぶ
pub fn start() -> Result<()> {
    let scope: ServiceWorkerGlobalScope = js_sys::global().unchecked_into();
    let caches = BrowserCaches::from_scope(&scope)?;
    let worker: Rc<BrowserWorker> = Rc::new(OfflineWorker::new(caches, BrowserNetwork::new(scope.clone())));

    register_install(&scope, worker.clone());
    register_activate(&scope, worker.clone());
    register_fetch(&scope, worker);
    Ok(())
}

fn register_install(scope: &ServiceWorkerGlobalScope, worker: Rc<BrowserWorker>) {
    let on_install = Closure::wrap(Box::new(move |event: ExtendableEvent| {
        let worker = worker.clone();
        // キャッシュ完了まで install を終わらせない
        let promise = future_to_promise(async move {
            let report = worker.install().await;
            if !report.is_complete() {
                log_error("sw", &format!("{} 件のアセットをキャッシュできませんでした", report.failed.len()));
            }
            Ok(JsValue::UNDEFINED)
        });
        if let Err(e) = event.wait_until(&promise) {
            log_error("sw", &format!("install waitUntil 失敗: {:?}", e));
        }
    }) as Box<dyn FnMut(ExtendableEvent)>);

    scope.set_oninstall(Some(on_install.as_ref().unchecked_ref()));
    on_install.forget();
}

fn register_activate(scope: &ServiceWorkerGlobalScope, worker: Rc<BrowserWorker>) {
    let clients_scope = scope.clone();
    let on_activate = Closure::wrap(Box::new(move |event: ExtendableEvent| {
        let worker = worker.clone();
        let scope = clients_scope.clone();
        let promise = future_to_promise(async move {
            worker.activate().await;
            // 既に開いているページも制御下に置く
            if let Err(e) = JsFuture::from(scope.clients().claim()).await {
                log_error("sw", &format!("clients.claim 失敗: {:?}", e));
            }
            Ok(JsValue::UNDEFINED)
        });
        if let Err(e) = event.wait_until(&promise) {
            log_error("sw", &format!("activate waitUntil 失敗: {:?}", e));
        }
    }) as Box<dyn FnMut(ExtendableEvent)>);

    scope.set_onactivate(Some(on_activate.as_ref().unchecked_ref()));
    on_activate.forget();
}

fn register_fetch(scope: &ServiceWorkerGlobalScope, worker: Rc<BrowserWorker>) {
    let fetch_scope = scope.clone();
    let on_fetch = Closure::wrap(Box::new(move |event: FetchEvent| {
        let worker = worker.clone();
        let scope = fetch_scope.clone();
        let request = event.request();
        let promise = future_to_promise(async move {
            match worker.handle_fetch(&request.method(), &request.url()).await {
                FetchOutcome::Cached(response) => Ok(JsValue::from(response)),
                // 元のリクエストのまま転送し、結果はキャッシュしない
                FetchOutcome::Network => JsFuture::from(scope.fetch_with_request(&request)).await,
            }
        });
        if let Err(e) = event.respond_with(&promise) {
            log_error("sw", &format!("respondWith 失敗: {:?}", e));
        }
    }) as Box<dyn FnMut(FetchEvent)>);

    scope.set_onfetch(Some(on_fetch.as_ref().unchecked_ref()));
    on_fetch.forget();
    log_info("sw", "install / activate / fetch ハンドラを登録しました");
}
