use storefront::utils::log_trace::log_error;
use storefront::worker::browser;

fn main() {
    console_error_panic_hook::set_once();
    if let Err(e) = browser::start() {
        log_error("sw", &format!("Service Worker を開始できません: {}", e));
    }
}
