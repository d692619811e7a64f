/// Failure of one catalog API call.
///
/// The response body of a failed call is never inspected: every variant
/// shows the user the same static text ([`ApiError::user_message`]). The
/// status code is kept for logs.
#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    #[error("HTTP {status}")]
    Http { status: u16 },

    #[error("network: {0}")]
    Network(#[from] reqwest::Error),

    #[error("decode: {0}")]
    Decode(String),
}

impl ApiError {
    /// HTTP status of a non-2xx response.
    pub fn status(&self) -> Option<u16> {
        match self {
            ApiError::Http { status } => Some(*status),
            ApiError::Network(e) => e.status().map(|s| s.as_u16()),
            ApiError::Decode(_) => None,
        }
    }

    /// Transport failures and 5xx responses may succeed on another attempt.
    pub fn is_retryable(&self) -> bool {
        match self {
            ApiError::Http { status } => *status >= 500,
            ApiError::Network(_) => true,
            ApiError::Decode(_) => false,
        }
    }

    pub fn user_message(&self) -> &'static str {
        "The request to the catalog server failed."
    }
}
