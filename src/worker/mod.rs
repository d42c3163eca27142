//! オフラインキャッシュ（Service Worker）
//!
//! install 時に静的アセットを1件ずつキャッシュし（失敗しても残りは続行）、
//! activate 時に旧バージョンのキャッシュを削除する。
//! fetch はキャッシュ優先で、無ければネットワークへそのまま流す（結果はキャッシュしない）。

pub mod browser;

use crate::error::Result;
use crate::utils::log_trace::{log_error, log_info, log_info_with_data, log_warn};

pub const CACHE_PREFIX: &str = "static-assets-cache-";

/// インストール時にキャッシュするアセット
pub const CACHE_ASSETS: &[&str] = &[
    "/",
    "/index.html",
    "/styles.css",
    "/storefront.js",
    "/storefront_bg.wasm",
    "/Images/2080.jpg",
    "/Images/beats.jpg",
    "/Images/controller-white.jpg",
    "/Images/headphones.jpg",
    "/Images/iMac.jpg",
    "/Images/logo.jpg",
    "/Images/macbook.jpg",
    "/Images/mouse 2.jpg",
    "/Images/ps5-bag.jpg",
    "/Images/switch.jpg",
    "/Images/xbox-controller.jpg",
];

/// 現在のキャッシュバケット名（ビルド時の STOREFRONT_CACHE_VERSION で切り替え）
pub fn cache_name() -> String {
    format!("{}{}", CACHE_PREFIX, option_env!("STOREFRONT_CACHE_VERSION").unwrap_or("v1"))
}

#[allow(async_fn_in_trait)]
pub trait CacheBackend {
    type Response;

    async fn open(&self, bucket: &str) -> Result<()>;
    async fn put(&self, bucket: &str, url: &str, response: Self::Response) -> Result<()>;
    /// 全バケットから検索
    async fn match_any(&self, url: &str) -> Result<Option<Self::Response>>;
    async fn keys(&self) -> Result<Vec<String>>;
    async fn delete(&self, bucket: &str) -> Result<bool>;
}

#[allow(async_fn_in_trait)]
pub trait Network {
    type Response;

    async fn fetch(&self, url: &str) -> Result<Self::Response>;
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct InstallReport {
    pub cached: Vec<String>,
    pub failed: Vec<(String, String)>,
}

impl InstallReport {
    pub fn is_complete(&self) -> bool {
        self.failed.is_empty()
    }
}

#[derive(Debug)]
pub enum FetchOutcome<R> {
    Cached(R),
    Network,
}

pub struct OfflineWorker<B, N> {
    caches: B,
    network: N,
    cache_name: String,
    manifest: Vec<String>,
}

impl<B, N> OfflineWorker<B, N>
where
    B: CacheBackend,
    N: Network<Response = B::Response>,
{
    pub fn new(caches: B, network: N) -> Self {
        let manifest = CACHE_ASSETS.iter().map(|url| url.to_string()).collect();
        Self::with_manifest(caches, network, cache_name(), manifest)
    }

    pub fn with_manifest(caches: B, network: N, cache_name: impl Into<String>, manifest: Vec<String>) -> Self {
        Self {
            caches,
            network,
            cache_name: cache_name.into(),
            manifest,
        }
    }

    pub fn cache_name(&self) -> &str {
        &self.cache_name
    }

    pub fn manifest(&self) -> &[String] {
        &self.manifest
    }

    /// install: アセットを1件ずつキャッシュする
    pub async fn install(&self) -> InstallReport {
        log_info("sw", &format!("Service Worker インストール中 ({})", self.cache_name));
        let mut report = InstallReport::default();

        if let Err(e) = self.caches.open(&self.cache_name).await {
            log_error("sw", &format!("キャッシュを開けません: {}", e));
            report.failed = self
                .manifest
                .iter()
                .map(|url| (url.clone(), e.to_string()))
                .collect();
            return report;
        }

        for url in &self.manifest {
            match self.cache_asset(url).await {
                Ok(()) => report.cached.push(url.clone()),
                Err(e) => {
                    log_error("sw", &format!("アセットをキャッシュできません: {}: {}", url, e));
                    report.failed.push((url.clone(), e.to_string()));
                }
            }
        }

        log_info_with_data(
            "sw",
            "静的アセットのキャッシュ完了",
            serde_json::json!({
                "cache": self.cache_name,
                "cached": report.cached.len(),
                "failed": report.failed.len(),
            }),
        );
        report
    }

    async fn cache_asset(&self, url: &str) -> Result<()> {
        let response = self.network.fetch(url).await?;
        self.caches.put(&self.cache_name, url, response).await
    }

    /// activate: 現在以外のキャッシュバケットを削除する
    pub async fn activate(&self) -> Vec<String> {
        let names = match self.caches.keys().await {
            Ok(names) => names,
            Err(e) => {
                log_error("sw", &format!("キャッシュ一覧を取得できません: {}", e));
                return Vec::new();
            }
        };

        let mut purged = Vec::new();
        for name in names.into_iter().filter(|n| *n != self.cache_name) {
            match self.caches.delete(&name).await {
                Ok(true) => {
                    log_info("sw", &format!("旧キャッシュを削除: {}", name));
                    purged.push(name);
                }
                Ok(false) => {}
                Err(e) => log_error("sw", &format!("旧キャッシュを削除できません: {}: {}", name, e)),
            }
        }

        log_info("sw", "Service Worker 有効化");
        purged
    }

    /// fetch: キャッシュにあればそのまま返し、無ければネットワークへ
    /// キャッシュは GET のレスポンスしか持たないので、GET 以外は検索せずネットワークへ
    pub async fn handle_fetch(&self, method: &str, url: &str) -> FetchOutcome<B::Response> {
        if !method.eq_ignore_ascii_case("GET") {
            return FetchOutcome::Network;
        }
        match self.caches.match_any(url).await {
            Ok(Some(response)) => FetchOutcome::Cached(response),
            Ok(None) => FetchOutcome::Network,
            Err(e) => {
                log_warn("sw", &format!("キャッシュ検索に失敗（ネットワークへ）: {}: {}", url, e));
                FetchOutcome::Network
            }
        }
    }
}
