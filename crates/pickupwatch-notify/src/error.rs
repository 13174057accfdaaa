use thiserror::Error;

/// Errors returned by the Bark push client.
///
/// Pushes are best-effort: callers log these and continue the cycle.
#[derive(Debug, Error)]
pub enum NotifyError {
    /// Network or TLS failure from the underlying HTTP client.
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("push endpoint returned HTTP {status}: {body_prefix}")]
    UnexpectedStatus { status: u16, body_prefix: String },

    /// The server answered 200 but reported a non-OK application code.
    #[error("push rejected by server (code {code})")]
    Rejected { code: i64 },

    #[error("invalid push endpoint \"{endpoint}\": {reason}")]
    InvalidEndpoint { endpoint: String, reason: String },
}
