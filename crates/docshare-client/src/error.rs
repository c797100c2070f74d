//! Conversion of transport errors into the docshare error taxonomy.

use thiserror::Error;

/// Transport-level error raised while talking to the backend.
#[derive(Debug, Error)]
pub(crate) enum Error {
    /// HTTP request failed.
    #[error("HTTP error: {0}")]
    Reqwest(#[from] reqwest::Error),
    /// Serialization error.
    #[error("Serialization error: {0}")]
    Serde(#[from] serde_json::Error),
}

impl From<Error> for docshare_core::Error {
    fn from(err: Error) -> Self {
        match err {
            Error::Reqwest(e) => {
                let status = e.status().map(|s| s.as_u16());
                let error = if e.is_timeout() {
                    docshare_core::Error::network_error()
                        .with_message("Request timed out")
                        .with_source(e)
                } else if e.is_connect() {
                    docshare_core::Error::network_error()
                        .with_message("Connection failed")
                        .with_source(e)
                } else if e.is_decode() {
                    docshare_core::Error::serialization()
                        .with_message(e.to_string())
                        .with_source(e)
                } else {
                    docshare_core::Error::network_error()
                        .with_message(e.to_string())
                        .with_source(e)
                };

                match status {
                    Some(status) => error.with_status(status),
                    None => error,
                }
            }
            Error::Serde(e) => docshare_core::Error::serialization()
                .with_message(e.to_string())
                .with_source(e),
        }
    }
}

/// Converts any transport error into the public error type.
pub(crate) fn transport(err: impl Into<Error>) -> docshare_core::Error {
    err.into().into()
}
