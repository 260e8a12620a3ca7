//! Error types for the Spoonacular API client.
//!
//! URLs carried by these errors are always credential-redacted; the API key
//! never appears in an error message or a log line.

#[derive(Debug, thiserror::Error)]
pub enum SpoonacularError {
    /// The API answered with a status the caller does not handle.
    #[error("the API returned status {status} for {url}")]
    Api {
        status: u16,
        /// Sanitized request URL (path plus non-secret query).
        url: String,
        /// Response headers, kept for quota/diagnostic inspection.
        headers: Vec<(String, String)>,
    },
    #[error("failed to parse response from {url}")]
    ParseFailed {
        status: u16,
        url: String,
        #[source]
        source: anyhow::Error,
    },
    #[error(transparent)]
    RequestFailed(#[from] anyhow::Error),
}

impl SpoonacularError {
    /// The upstream HTTP status, when one was received.
    pub fn status(&self) -> Option<u16> {
        match self {
            Self::Api { status, .. } | Self::ParseFailed { status, .. } => Some(*status),
            Self::RequestFailed(_) => None,
        }
    }
}
