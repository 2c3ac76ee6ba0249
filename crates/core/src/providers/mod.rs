pub mod registry;
pub mod traits;

// Provider implementations
pub mod dashboard_proxy;
#[cfg(not(target_arch = "wasm32"))]
pub mod yahoo_finance;
