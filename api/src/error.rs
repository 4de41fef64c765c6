use thiserror::Error;

/// Failures surfaced by the comparison client.
///
/// Carries plain strings rather than transport errors so the value can be cloned
/// into reactive UI state.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ApiError {
    /// The file was rejected locally before any request was made.
    #[error("{0}")]
    Validation(String),

    #[error("Network error occurred: {0}")]
    Network(String),

    #[error("Request timeout")]
    Timeout,

    #[error("Invalid response format: {0}")]
    InvalidResponse(String),

    /// Non-2xx response; `message` is the server's `detail` when it sent one.
    #[error("{message}")]
    Remote { status: u16, message: String },
}

impl ApiError {
    pub fn validation(msg: impl Into<String>) -> Self {
        Self::Validation(msg.into())
    }

    pub fn network(msg: impl Into<String>) -> Self {
        Self::Network(msg.into())
    }

    pub fn invalid_response(msg: impl Into<String>) -> Self {
        Self::InvalidResponse(msg.into())
    }

    pub fn is_validation(&self) -> bool {
        matches!(self, Self::Validation(_))
    }
}

impl From<reqwest::Error> for ApiError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_timeout() {
            return Self::Timeout;
        }
        if err.is_decode() {
            return Self::InvalidResponse(err.to_string());
        }
        Self::Network(err.to_string())
    }
}
