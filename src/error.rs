use thiserror::Error;

/// Failures of a single upstream request.
#[derive(Debug, Error)]
pub enum FetchError {
    #[error("request to {url} timed out after {timeout_ms}ms")]
    UpstreamTimeout { url: String, timeout_ms: u64 },

    #[error("request to {url} failed: {reason}")]
    UpstreamUnreachable { url: String, reason: String },

    #[error("request to {url} returned status {status}")]
    UpstreamStatus { url: String, status: u16 },
}

impl FetchError {
    pub fn url(&self) -> &str {
        match self {
            FetchError::UpstreamTimeout { url, .. }
            | FetchError::UpstreamUnreachable { url, .. }
            | FetchError::UpstreamStatus { url, .. } => url,
        }
    }

    pub fn is_timeout(&self) -> bool {
        matches!(self, FetchError::UpstreamTimeout { .. })
    }
}
