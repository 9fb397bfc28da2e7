//! Darwin client error types.

/// Failures reported by a transport.
///
/// [`TransportError::Fault`] is the service-fault signal: Darwin answered but
/// rejected the request. Every other variant is a failure to get an answer.
#[derive(Debug, thiserror::Error)]
pub enum TransportError {
    /// The service rejected the request (unknown station, expired service
    /// ID, bad credential, ...).
    #[error("service fault {status}: {message}")]
    Fault { status: u16, message: String },

    /// HTTP request failed (network error, timeout, etc.)
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// The response body was not a JSON document.
    #[error("JSON parse error: {message}")]
    Decode {
        message: String,
        body: Option<String>,
    },

    /// The request could not be built.
    #[error("invalid request: {0}")]
    Request(String),

    /// The mock transport could not load its canned responses.
    #[error("mock transport: {0}")]
    Mock(String),
}

/// Errors surfaced to callers of [`Session`](super::Session).
#[derive(Debug, thiserror::Error)]
pub enum DarwinError {
    /// Endpoint or access credential missing or unusable.
    #[error("configuration error: {0}")]
    Configuration(String),

    /// The request was rejected before any network I/O.
    #[error("invalid argument: {0}")]
    InvalidArgument(String),

    /// The web service returned a fault.
    #[error("web service error: {message}")]
    WebService { message: String },

    /// Network, timeout and decoding failures, passed through as is.
    #[error(transparent)]
    Transport(TransportError),
}

impl From<TransportError> for DarwinError {
    fn from(err: TransportError) -> Self {
        match err {
            TransportError::Fault { status, message } => DarwinError::WebService {
                message: format!("{status}: {message}"),
            },
            other => DarwinError::Transport(other),
        }
    }
}
