//! Structured error handling for docshare operations.

use strum::{AsRefStr, Display, EnumString, IntoStaticStr};
use thiserror::Error;

/// Type alias for boxed dynamic errors that can be sent across threads.
pub type BoxedError = Box<dyn std::error::Error + Send + Sync>;

/// Type alias for Results with our custom Error type.
pub type Result<T, E = Error> = std::result::Result<T, E>;

/// Categories of errors that can occur in docshare operations.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[derive(AsRefStr, Display, EnumString, IntoStaticStr)]
#[strum(serialize_all = "snake_case")]
pub enum ErrorKind {
    /// No session token is held, or the backend rejected it.
    Unauthenticated,
    /// The backend rejected the supplied login credentials.
    InvalidCredentials,
    /// A preview was requested for a document without a sharing handle.
    NotShareable,
    /// Transport failure, timeout, or non-success HTTP status.
    NetworkError,
    /// Fetching an access URL returned a non-success status.
    FetchError,
    /// Content was fetched but contained zero bytes.
    EmptyBody,
    /// Content was fetched but could not be decoded.
    DecodeError,
    /// Local input constraints were violated.
    ValidationError,
    /// The request was replaced by a newer one before it settled.
    Superseded,
    /// Configuration error.
    Configuration,
    /// Serialization/deserialization error.
    Serialization,
    /// Unknown error occurred.
    #[default]
    Unknown,
}

/// Structured error type with classification and context tracking.
#[must_use]
#[derive(Debug, Error)]
#[error("[{kind}]{}{}",
    status.map(|s| format!(" (status {s})")).unwrap_or_default(),
    message.as_ref().map(|m| format!(": {m}")).unwrap_or_default()
)]
pub struct Error {
    /// The kind of error that occurred.
    pub kind: ErrorKind,
    /// Primary error message.
    pub message: Option<String>,
    /// HTTP status code, when the failure came from a response.
    pub status: Option<u16>,
    /// Underlying source error, if any.
    #[source]
    pub source: Option<BoxedError>,
}

impl Error {
    /// Creates a new error with the given kind.
    pub fn new(kind: ErrorKind) -> Self {
        Self {
            kind,
            message: None,
            status: None,
            source: None,
        }
    }

    /// Creates a new error from a source error.
    pub fn from_source(kind: ErrorKind, source: impl Into<BoxedError>) -> Self {
        Self {
            kind,
            message: None,
            status: None,
            source: Some(source.into()),
        }
    }

    /// Adds a message to this error.
    pub fn with_message(mut self, message: impl Into<String>) -> Self {
        self.message = Some(message.into());
        self
    }

    /// Attaches the HTTP status code that caused this error.
    pub fn with_status(mut self, status: u16) -> Self {
        self.status = Some(status);
        self
    }

    /// Sets the source of the error.
    pub fn with_source(mut self, source: impl Into<BoxedError>) -> Self {
        self.source = Some(source.into());
        self
    }

    /// Creates a new unauthenticated error.
    pub fn unauthenticated() -> Self {
        Self::new(ErrorKind::Unauthenticated)
    }

    /// Creates a new invalid credentials error.
    pub fn invalid_credentials() -> Self {
        Self::new(ErrorKind::InvalidCredentials)
    }

    /// Creates a new not shareable error.
    pub fn not_shareable() -> Self {
        Self::new(ErrorKind::NotShareable)
    }

    /// Creates a new network error.
    pub fn network_error() -> Self {
        Self::new(ErrorKind::NetworkError)
    }

    /// Creates a new fetch error for the given HTTP status.
    pub fn fetch_error(status: u16) -> Self {
        Self::new(ErrorKind::FetchError)
            .with_status(status)
            .with_message(format!("HTTP error! status: {status}"))
    }

    /// Creates a new empty body error.
    pub fn empty_body() -> Self {
        Self::new(ErrorKind::EmptyBody)
    }

    /// Creates a new decode error.
    pub fn decode_error() -> Self {
        Self::new(ErrorKind::DecodeError)
    }

    /// Creates a new validation error.
    pub fn validation() -> Self {
        Self::new(ErrorKind::ValidationError)
    }

    /// Creates a new superseded error.
    pub fn superseded() -> Self {
        Self::new(ErrorKind::Superseded)
    }

    /// Creates a new configuration error.
    pub fn configuration() -> Self {
        Self::new(ErrorKind::Configuration)
    }

    /// Creates a new serialization error.
    pub fn serialization() -> Self {
        Self::new(ErrorKind::Serialization)
    }

    /// Returns the error kind.
    pub fn kind(&self) -> ErrorKind {
        self.kind
    }

    /// Returns the error kind as a string.
    pub fn kind_str(&self) -> &'static str {
        self.kind.into()
    }

    /// Returns the HTTP status code, if any.
    pub fn status(&self) -> Option<u16> {
        self.status
    }
}

impl From<std::io::Error> for Error {
    fn from(error: std::io::Error) -> Self {
        Self::from_source(ErrorKind::Unknown, error).with_message("I/O operation failed")
    }
}

impl From<std::string::FromUtf8Error> for Error {
    fn from(error: std::string::FromUtf8Error) -> Self {
        Self::from_source(ErrorKind::DecodeError, error).with_message("Invalid UTF-8 encoding")
    }
}

impl From<serde_json::Error> for Error {
    fn from(error: serde_json::Error) -> Self {
        Self::from_source(ErrorKind::Serialization, error)
    }
}

impl From<validator::ValidationErrors> for Error {
    fn from(errors: validator::ValidationErrors) -> Self {
        Self::validation().with_message(errors.to_string())
    }
}
