use thiserror::Error;

/// Errors returned by the pickup-availability fetcher.
///
/// `Http` and `UnexpectedStatus` are transport-level failures; `Format` and
/// `MissingStoreList` mean the endpoint answered with something other than
/// the expected shape. The polling loop treats every variant the same way:
/// skip the cycle and leave the stored snapshot untouched.
#[derive(Debug, Error)]
pub enum FetchError {
    /// Network, TLS, or timeout failure from the underlying HTTP client.
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("unexpected HTTP status {status} from {url}")]
    UnexpectedStatus { status: u16, url: String },

    /// The response body could not be deserialized into the expected type.
    #[error("JSON deserialization error for {context}: {source}")]
    Format {
        context: String,
        #[source]
        source: serde_json::Error,
    },

    /// The response parsed as JSON but the store-list field is absent.
    #[error("pickup response is missing the store list")]
    MissingStoreList,

    #[error("invalid pickup API base \"{base}\": {reason}")]
    InvalidBaseUrl { base: String, reason: String },
}
