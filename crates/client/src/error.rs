use asmakam_core::error::CoreError;

/// Errors from the feedback API client.
#[derive(Debug, thiserror::Error)]
pub enum ClientError {
    /// The call did not finish within the client's timeout.
    #[error("Request took too long. Please try again.")]
    Timeout,

    /// The admin password was missing or wrong (HTTP 401).
    #[error("{0}")]
    Unauthorized(String),

    /// The targeted record does not exist (HTTP 404).
    #[error("{0}")]
    NotFound(String),

    /// Any other non-2xx response. `message` is the server's own text.
    #[error("{message}")]
    Rejected {
        /// HTTP status code.
        status: u16,
        message: String,
    },

    /// The HTTP request itself failed (connect, DNS, TLS, etc.).
    #[error("HTTP request failed: {0}")]
    Http(#[source] reqwest::Error),

    /// A 2xx response whose body did not have the expected shape.
    #[error("Unexpected response body: {0}")]
    Decode(String),

    /// The local wizard refused to submit.
    #[error(transparent)]
    Invalid(#[from] CoreError),
}

impl ClientError {
    /// Classify a transport-level [`reqwest::Error`].
    pub(crate) fn from_reqwest(err: reqwest::Error) -> Self {
        if err.is_timeout() {
            Self::Timeout
        } else if err.is_decode() {
            Self::Decode(err.to_string())
        } else {
            Self::Http(err)
        }
    }
}
