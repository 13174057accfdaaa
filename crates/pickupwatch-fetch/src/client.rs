//! HTTP client for the retailer's pickup-availability endpoint.

use std::time::Duration;

use chrono::Utc;
use reqwest::{Client, Url};

use pickupwatch_core::{AppConfig, AvailabilitySnapshot};

use crate::error::FetchError;
use crate::parse::parse_stores;
use crate::types::PickupMessageResponse;

/// Client for the retailer's pickup-message endpoint.
///
/// Issues exactly one GET per [`PickupClient::fetch_availability`] call — no
/// internal retries; the caller's next polling cycle is the retry. Use
/// [`PickupClient::new`] for production or [`PickupClient::with_base_url`]
/// to point at a mock server in tests.
pub struct PickupClient {
    client: Client,
    url: Url,
    referer: String,
    sku: String,
}

impl PickupClient {
    /// Creates a client for the configured SKU, seed store, and endpoint.
    ///
    /// # Errors
    ///
    /// Returns [`FetchError::Http`] if the underlying `reqwest::Client`
    /// cannot be constructed, or [`FetchError::InvalidBaseUrl`] if the
    /// configured base does not parse as a URL.
    pub fn new(config: &AppConfig) -> Result<Self, FetchError> {
        Self::with_base_url(
            &config.pickup_api_base,
            &config.sku,
            &config.seed_store,
            config.search_nearby,
            config.request_timeout_secs,
            &config.user_agent,
        )
    }

    /// Creates a client with an explicit base URL (for testing with
    /// wiremock).
    ///
    /// # Errors
    ///
    /// Same as [`PickupClient::new`].
    pub fn with_base_url(
        base_url: &str,
        sku: &str,
        seed_store: &str,
        search_nearby: bool,
        timeout_secs: u64,
        user_agent: &str,
    ) -> Result<Self, FetchError> {
        let client = Client::builder()
            .timeout(Duration::from_secs(timeout_secs))
            .connect_timeout(Duration::from_secs(10))
            .user_agent(user_agent)
            .build()?;

        let base = base_url.trim_end_matches('/');
        let url = Self::pickup_url(base, sku, seed_store, search_nearby)?;

        Ok(Self {
            client,
            url,
            referer: format!("{base}/shop"),
            sku: sku.to_owned(),
        })
    }

    /// The fully-built endpoint URL this client polls.
    #[must_use]
    pub fn endpoint(&self) -> &str {
        self.url.as_str()
    }

    /// Fetches the current per-store availability snapshot.
    ///
    /// # Errors
    ///
    /// - [`FetchError::Http`] — connection failure or timeout.
    /// - [`FetchError::UnexpectedStatus`] — any non-2xx status.
    /// - [`FetchError::Format`] — response body is not valid JSON.
    /// - [`FetchError::MissingStoreList`] — JSON without `body.stores`.
    pub async fn fetch_availability(&self) -> Result<AvailabilitySnapshot, FetchError> {
        let response = self
            .client
            .get(self.url.clone())
            .header(
                reqwest::header::ACCEPT,
                "application/json, text/javascript, */*; q=0.01",
            )
            .header(reqwest::header::REFERER, &self.referer)
            .send()
            .await?;

        let status = response.status();
        tracing::debug!(status = status.as_u16(), url = %self.url, "pickup response");

        if !status.is_success() {
            return Err(FetchError::UnexpectedStatus {
                status: status.as_u16(),
                url: self.url.to_string(),
            });
        }

        let body = response.text().await?;
        let parsed =
            serde_json::from_str::<PickupMessageResponse>(&body).map_err(|e| {
                FetchError::Format {
                    context: format!("pickup message for {}", self.sku),
                    source: e,
                }
            })?;

        let stores = parse_stores(&parsed, &self.sku)?;
        Ok(AvailabilitySnapshot::new(Utc::now(), stores))
    }

    /// Builds the pickup-message URL for the given base, SKU, and seed store.
    fn pickup_url(
        base: &str,
        sku: &str,
        seed_store: &str,
        search_nearby: bool,
    ) -> Result<Url, FetchError> {
        let mut url = Url::parse(&format!("{base}/shop/retail/pickup-message")).map_err(|e| {
            FetchError::InvalidBaseUrl {
                base: base.to_owned(),
                reason: e.to_string(),
            }
        })?;

        url.query_pairs_mut()
            .append_pair("pl", "true")
            .append_pair("searchNearby", if search_nearby { "true" } else { "false" })
            .append_pair("store", seed_store)
            .append_pair("parts.0", sku);

        Ok(url)
    }
}

#[cfg(test)]
#[path = "client_test.rs"]
mod tests;
