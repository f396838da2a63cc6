/// Errors from calling an upstream service.
#[derive(Debug, thiserror::Error)]
pub enum UpstreamError {
    /// The HTTP request itself failed (network, DNS, TLS, timeout).
    #[error("HTTP request failed: {0}")]
    Request(#[from] reqwest::Error),

    /// The service answered but refused the request.
    #[error(
        "{service} rejected the request ({status}): {}",
        .message.as_deref().unwrap_or("<no message>")
    )]
    Rejected {
        service: &'static str,
        /// HTTP status of the reply.
        status: u16,
        /// Human-readable reason supplied by the service, if any.
        message: Option<String>,
    },

    /// A successful reply whose body was not JSON.
    #[error("{service} returned an unreadable body: {detail}")]
    Decode {
        service: &'static str,
        detail: String,
    },

    /// A configured base URL cannot carry path segments.
    #[error("Invalid base URL {0:?}")]
    InvalidBaseUrl(String),
}

impl UpstreamError {
    /// The message the service itself gave, safe to show to the caller.
    ///
    /// Transport and decode failures return `None`; their detail belongs in
    /// the log only.
    pub fn service_message(&self) -> Option<&str> {
        match self {
            UpstreamError::Rejected { message, .. } => message.as_deref(),
            _ => None,
        }
    }
}
