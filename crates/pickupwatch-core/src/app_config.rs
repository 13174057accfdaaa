use std::path::PathBuf;

use chrono_tz::Tz;

/// Application configuration, loaded from environment variables.
#[derive(Clone)]
pub struct AppConfig {
    /// Monitored SKU (e.g., `MFYQ4KH/A`).
    pub sku: String,
    /// Seed store code from which the nearby search expands.
    pub seed_store: String,
    /// Whether to expand the query to stores near the seed store.
    pub search_nearby: bool,
    /// Base URL of the retailer pickup endpoint.
    pub pickup_api_base: String,
    /// Inclusive random sleep range between polls, in seconds.
    pub poll_min_secs: u64,
    pub poll_max_secs: u64,
    /// Path of the append-only CSV transition log.
    pub log_path: PathBuf,
    /// Bark device key. When unset, pushes are skipped.
    pub notify_device_key: Option<String>,
    pub notify_server_base: String,
    pub notify_group: String,
    pub notify_sound: String,
    /// URL opened when the push notification is tapped.
    pub notify_click_url: Option<String>,
    /// Timezone used for human-readable timestamps.
    pub market_tz: Tz,
    pub request_timeout_secs: u64,
    pub user_agent: String,
    pub log_level: String,
}

impl std::fmt::Debug for AppConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AppConfig")
            .field("sku", &self.sku)
            .field("seed_store", &self.seed_store)
            .field("search_nearby", &self.search_nearby)
            .field("pickup_api_base", &self.pickup_api_base)
            .field("poll_min_secs", &self.poll_min_secs)
            .field("poll_max_secs", &self.poll_max_secs)
            .field("log_path", &self.log_path)
            .field(
                "notify_device_key",
                &self.notify_device_key.as_ref().map(|_| "[redacted]"),
            )
            .field("notify_server_base", &self.notify_server_base)
            .field("notify_group", &self.notify_group)
            .field("notify_sound", &self.notify_sound)
            .field("notify_click_url", &self.notify_click_url)
            .field("market_tz", &self.market_tz)
            .field("request_timeout_secs", &self.request_timeout_secs)
            .field("user_agent", &self.user_agent)
            .field("log_level", &self.log_level)
            .finish()
    }
}
