//! Error types and HTTP response conversion

use axum::response::{IntoResponse, Response};
use thiserror::Error;

use crate::builder::ResponseBuilder;

/// Result type alias using the library error
pub type Result<T> = std::result::Result<T, Error>;

/// Main error type for the library
///
/// Large error variants are boxed to reduce stack size
#[derive(Debug, Error)]
pub enum Error {
    /// A pagination mapper is neither callable nor a registered transformer
    #[error("Invalid mapper provided: {0}")]
    InvalidMapper(String),

    /// Response data could not be turned into JSON
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(Box<figment::Error>),

    /// I/O error
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl Error {
    /// Machine-readable code used when logging the failure
    #[must_use]
    pub const fn code(&self) -> &'static str {
        match self {
            Self::InvalidMapper(_) => "INVALID_MAPPER",
            Self::Serialization(_) => "SERIALIZATION_ERROR",
            Self::Config(_) => "CONFIG_ERROR",
            Self::Io(_) => "IO_ERROR",
        }
    }
}

impl IntoResponse for Error {
    fn into_response(self) -> Response {
        // Details stay in the logs; the client only sees a generic failure.
        tracing::error!(code = self.code(), "Request failed: {}", self);

        ResponseBuilder::new()
            .message("Internal server error")
            .as_server_error()
            .send()
            .into_response()
    }
}

// Manual From implementations for boxed errors
impl From<figment::Error> for Error {
    fn from(err: figment::Error) -> Self {
        Error::Config(Box::new(err))
    }
}
