//! Bark-compatible push notification client.
//!
//! Bark deployments answer `{"code": 200, ...}` on success; self-hosted
//! instances have been observed returning `{"code": 0}` or plain text.
//! Anything else parseable with a non-OK code is surfaced as
//! [`NotifyError::Rejected`].

use std::time::Duration;

use reqwest::{Client, Url};
use serde::Serialize;

use pickupwatch_core::AppConfig;

use crate::error::NotifyError;

const PUSH_TIMEOUT_SECS: u64 = 10;

/// Result of a push attempt.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NotifyOutcome {
    Sent,
    /// No device key configured; nothing was sent.
    Skipped,
}

#[derive(Serialize)]
struct BarkPayload<'a> {
    title: &'a str,
    body: &'a str,
    group: &'a str,
    sound: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    url: Option<&'a str>,
}

/// Push client for a Bark-compatible notification server.
///
/// Constructed without a device key the client is a configured no-op: every
/// [`BarkClient::push`] returns [`NotifyOutcome::Skipped`]. Use
/// [`BarkClient::with_endpoint`] to point at a mock server in tests.
pub struct BarkClient {
    client: Client,
    endpoint: Option<Url>,
    group: String,
    sound: String,
    click_url: Option<String>,
}

impl BarkClient {
    /// Creates a client from the application configuration.
    ///
    /// # Errors
    ///
    /// Returns [`NotifyError::Http`] if the underlying `reqwest::Client`
    /// cannot be constructed, or [`NotifyError::InvalidEndpoint`] if the
    /// server base plus device key does not parse as a URL.
    pub fn new(config: &AppConfig) -> Result<Self, NotifyError> {
        Self::with_endpoint(
            &config.notify_server_base,
            config.notify_device_key.as_deref(),
            &config.notify_group,
            &config.notify_sound,
            config.notify_click_url.as_deref(),
        )
    }

    /// Creates a client with an explicit server base (for testing with
    /// wiremock).
    ///
    /// # Errors
    ///
    /// Same as [`BarkClient::new`].
    pub fn with_endpoint(
        server_base: &str,
        device_key: Option<&str>,
        group: &str,
        sound: &str,
        click_url: Option<&str>,
    ) -> Result<Self, NotifyError> {
        let client = Client::builder()
            .timeout(Duration::from_secs(PUSH_TIMEOUT_SECS))
            .build()?;

        let endpoint = device_key
            .map(|key| {
                let raw = format!("{}/{key}", server_base.trim_end_matches('/'));
                Url::parse(&raw).map_err(|e| NotifyError::InvalidEndpoint {
                    endpoint: raw,
                    reason: e.to_string(),
                })
            })
            .transpose()?;

        Ok(Self {
            client,
            endpoint,
            group: group.to_owned(),
            sound: sound.to_owned(),
            click_url: click_url.map(str::to_owned),
        })
    }

    /// `true` when a device key is configured and pushes will be attempted.
    #[must_use]
    pub fn is_configured(&self) -> bool {
        self.endpoint.is_some()
    }

    /// Sends one push. Fire-and-forget from the caller's perspective: a
    /// failure here is logged by the polling loop and never retried.
    ///
    /// # Errors
    ///
    /// - [`NotifyError::Http`] — network failure or timeout.
    /// - [`NotifyError::UnexpectedStatus`] — non-2xx response.
    /// - [`NotifyError::Rejected`] — 2xx response carrying a non-OK
    ///   application code.
    pub async fn push(&self, title: &str, body: &str) -> Result<NotifyOutcome, NotifyError> {
        let Some(endpoint) = &self.endpoint else {
            tracing::info!("push not configured (set NOTIFY_DEVICE_KEY) — skipping");
            return Ok(NotifyOutcome::Skipped);
        };

        let payload = BarkPayload {
            title,
            body,
            group: &self.group,
            sound: &self.sound,
            url: self.click_url.as_deref(),
        };

        let response = self
            .client
            .post(endpoint.clone())
            .json(&payload)
            .send()
            .await?;

        let status = response.status();
        let text = response.text().await?;

        if !status.is_success() {
            return Err(NotifyError::UnexpectedStatus {
                status: status.as_u16(),
                body_prefix: text.chars().take(200).collect(),
            });
        }

        // Some deployments return plain text on success; only a parseable
        // envelope with a non-OK code counts as a rejection.
        if let Ok(value) = serde_json::from_str::<serde_json::Value>(&text) {
            if let Some(code) = value.get("code").and_then(serde_json::Value::as_i64) {
                if code != 200 && code != 0 {
                    return Err(NotifyError::Rejected { code });
                }
            }
        }

        Ok(NotifyOutcome::Sent)
    }
}
