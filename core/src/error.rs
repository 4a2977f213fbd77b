use std::fmt;

use http::StatusCode;
use thiserror::Error;

/// The error type for sassign operations
#[derive(Error, Debug)]
#[error("{kind}: {message}{}", render_tail(.status, .context))]
pub struct Error {
    kind: ErrorKind,
    message: String,
    status: Option<StatusCode>,
    context: Vec<String>,
    #[source]
    source: Option<anyhow::Error>,
}

/// The kind of error that occurred
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    /// The OAuth2 token endpoint answered with a non-success status.
    TokenRequestFailed,

    /// The storage service rejected the bearer token.
    ///
    /// Only used to drive the single renewal retry of the delegation key
    /// request; callers see it turned into `DelegationKeyRequestFailed`
    /// once the retry is spent.
    Unauthorized,

    /// The delegation key endpoint answered with a non-success status.
    DelegationKeyRequestFailed,

    /// Credentials exist but are invalid/malformed
    CredentialInvalid,

    /// Request cannot be signed (missing required fields, etc.)
    RequestInvalid,

    /// Configuration error (missing fields, invalid values)
    ConfigInvalid,

    /// Unexpected errors (network, I/O, service errors, etc.)
    Unexpected,
}

impl Error {
    /// Create a new error with the given kind and message
    pub fn new(kind: ErrorKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
            status: None,
            context: Vec::new(),
            source: None,
        }
    }

    /// Add a source error
    pub fn with_source(mut self, source: impl Into<anyhow::Error>) -> Self {
        self.source = Some(source.into());
        self
    }

    /// Attach the HTTP status returned by the remote service.
    pub fn with_status(mut self, status: StatusCode) -> Self {
        self.status = Some(status);
        self
    }

    /// Add a line of context, rendered after the message.
    pub fn with_context(mut self, context: impl Into<String>) -> Self {
        self.context.push(context.into());
        self
    }

    /// Get the error kind
    pub fn kind(&self) -> ErrorKind {
        self.kind
    }

    /// Get the HTTP status returned by the remote service, if any.
    pub fn status(&self) -> Option<StatusCode> {
        self.status
    }

    /// Get the attached context lines.
    pub fn context(&self) -> &[String] {
        &self.context
    }
}

// Convenience constructors
impl Error {
    /// Create a token request failed error carrying the endpoint status.
    pub fn token_request_failed(status: StatusCode) -> Self {
        Self::new(
            ErrorKind::TokenRequestFailed,
            "token endpoint returned non-success status",
        )
        .with_status(status)
    }

    /// Create an unauthorized error.
    pub fn unauthorized(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::Unauthorized, message).with_status(StatusCode::UNAUTHORIZED)
    }

    /// Create a delegation key request failed error carrying the endpoint status.
    pub fn delegation_key_request_failed(status: StatusCode) -> Self {
        Self::new(
            ErrorKind::DelegationKeyRequestFailed,
            "delegation key endpoint returned non-success status",
        )
        .with_status(status)
    }

    /// Create a credential invalid error
    pub fn credential_invalid(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::CredentialInvalid, message)
    }

    /// Create a request invalid error
    pub fn request_invalid(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::RequestInvalid, message)
    }

    /// Create a config invalid error
    pub fn config_invalid(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::ConfigInvalid, message)
    }

    /// Create an unexpected error
    pub fn unexpected(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::Unexpected, message)
    }
}

impl fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ErrorKind::TokenRequestFailed => write!(f, "token request failed"),
            ErrorKind::Unauthorized => write!(f, "unauthorized"),
            ErrorKind::DelegationKeyRequestFailed => write!(f, "delegation key request failed"),
            ErrorKind::CredentialInvalid => write!(f, "invalid credentials"),
            ErrorKind::RequestInvalid => write!(f, "invalid request"),
            ErrorKind::ConfigInvalid => write!(f, "invalid configuration"),
            ErrorKind::Unexpected => write!(f, "unexpected error"),
        }
    }
}

fn render_tail(status: &Option<StatusCode>, context: &[String]) -> String {
    let mut s = String::new();
    if let Some(status) = status {
        s.push_str(&format!(" (status: {status})"));
    }
    for ctx in context {
        s.push_str(", ");
        s.push_str(ctx);
    }
    s
}

/// Convenience type alias for Results
pub type Result<T> = std::result::Result<T, Error>;

// Common From implementations
impl From<http::Error> for Error {
    fn from(err: http::Error) -> Self {
        Self::request_invalid(err.to_string()).with_source(anyhow::Error::from(err))
    }
}

impl From<http::header::InvalidHeaderValue> for Error {
    fn from(err: http::header::InvalidHeaderValue) -> Self {
        Self::request_invalid(err.to_string()).with_source(anyhow::Error::from(err))
    }
}
