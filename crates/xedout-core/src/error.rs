//! Error types for XedOut

/// Result type alias using XedOut's Error type
pub type Result<T> = std::result::Result<T, Error>;

/// Message reported to the extension when a request lacks a required field
pub const MISSING_PARAMETERS: &str = "Missing required parameters";

/// Core error type for XedOut operations
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// Request failed local validation; no remote call was made
    #[error("{0}")]
    Validation(String),

    /// The moderation API rejected the request or replied with an error
    #[error(transparent)]
    Api(#[from] ApiError),

    /// The API reply was JSON but not shaped like a chat completion
    #[error("Invalid API response structure: {0}")]
    MalformedResponse(String),

    /// Network failure below the HTTP layer (DNS, TLS, connect, timeout)
    #[error("transport error: {0}")]
    Transport(String),

    /// Native messaging framing errors
    #[error("protocol error: {0}")]
    Protocol(String),

    /// Configuration errors
    #[error("configuration error: {0}")]
    Config(String),

    /// Network/IO errors
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    /// Serialization errors
    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

/// Failures reported by the remote chat-completion endpoint
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ApiError {
    /// HTTP status outside 200..=299
    #[error("HTTP {status}: {body}")]
    Status { status: u16, body: String },

    /// The payload carried an `error` object
    #[error("{message}")]
    Reported { message: String },

    /// The body of a successful response was not JSON
    #[error("invalid JSON in API response (HTTP {status}): {detail}")]
    InvalidJson { status: u16, detail: String },
}

impl Error {
    /// Create the validation error for a request with a missing field
    pub fn missing_parameters() -> Self {
        Self::Validation(MISSING_PARAMETERS.to_string())
    }

    /// Create a new malformed response error
    pub fn malformed(msg: impl Into<String>) -> Self {
        Self::MalformedResponse(msg.into())
    }

    /// Create a new transport error
    pub fn transport(msg: impl Into<String>) -> Self {
        Self::Transport(msg.into())
    }

    /// Create a new protocol error
    pub fn protocol(msg: impl Into<String>) -> Self {
        Self::Protocol(msg.into())
    }

    /// Create a new configuration error
    pub fn config(msg: impl Into<String>) -> Self {
        Self::Config(msg.into())
    }

    /// Short label used in log fields
    pub fn kind(&self) -> &'static str {
        match self {
            Self::Validation(_) => "validation",
            Self::Api(_) => "api",
            Self::MalformedResponse(_) => "malformed_response",
            Self::Transport(_) => "transport",
            Self::Protocol(_) => "protocol",
            Self::Config(_) => "config",
            Self::Io(_) => "io",
            Self::Serialization(_) => "serialization",
        }
    }
}
