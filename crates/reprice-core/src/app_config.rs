use crate::pricing::PricePolicy;

/// Runtime configuration for a repricing run, read once at startup.
#[derive(Clone)]
pub struct AppConfig {
    /// Store domain, e.g. `"my-shop.myshopify.com"`.
    pub store: String,
    /// Admin API access token sent as `X-Shopify-Access-Token`.
    pub access_token: String,
    /// Admin API version segment, e.g. `"2024-04"`.
    pub api_version: String,
    /// Pause after each successful price write.
    pub write_delay_ms: u64,
    pub request_timeout_secs: u64,
    pub log_level: String,
    pub price_policy: PricePolicy,
}

impl std::fmt::Debug for AppConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AppConfig")
            .field("store", &self.store)
            .field("access_token", &"[redacted]")
            .field("api_version", &self.api_version)
            .field("write_delay_ms", &self.write_delay_ms)
            .field("request_timeout_secs", &self.request_timeout_secs)
            .field("log_level", &self.log_level)
            .field("price_policy", &self.price_policy)
            .finish()
    }
}
