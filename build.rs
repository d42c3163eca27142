use std::env;

fn main() {
    // キャッシュバケットのバージョン（変更すると旧キャッシュは activate 時に削除される）
    let version = env::var("STOREFRONT_CACHE_VERSION")
        .ok()
        .filter(|v| !v.trim().is_empty())
        .unwrap_or_else(|| "v1".to_string());

    if version.contains(char::is_whitespace) {
        println!("cargo:warning=STOREFRONT_CACHE_VERSION contains whitespace: {:?}", version);
    }
    println!("cargo:rustc-env=STOREFRONT_CACHE_VERSION={}", version.trim());

    // 環境変数変更時に再ビルド
    println!("cargo:rerun-if-env-changed=STOREFRONT_CACHE_VERSION");
    println!("cargo:rerun-if-changed=build.rs");
}
