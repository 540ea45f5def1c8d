//! Error types for the HTTP server.

use thiserror::Error;

use crate::parser::Error as ParserError;
use crate::server::response::StatusCode;
use crate::server::store::StoreError;

/// Errors that can occur while serving a request.
#[derive(Debug, Error)]
pub enum Error {
    /// Error parsing an HTTP request.
    #[error("Parse error: {0}")]
    ParseError(#[from] ParserError),

    /// A header the route depends on is absent.
    #[error("Required header is missing: {0}")]
    MissingHeader(&'static str),

    /// `Content-Length` does not describe the body that was received.
    #[error("Content-Length {declared} does not match body length {actual}")]
    ContentLengthMismatch { declared: String, actual: usize },

    /// The file name would resolve outside the store root.
    #[error("Invalid file name: {0}")]
    InvalidFileName(String),

    /// Requested resource not found.
    #[error("Not found: {0}")]
    NotFound(String),

    /// The method is not served on this path.
    #[error("Method {0} not allowed for path: {1}")]
    MethodNotAllowed(String, String),

    /// The file store failed.
    #[error("Storage error: {0}")]
    Store(#[source] StoreError),

    /// Compressing the response body failed.
    #[error("Encoding error: {0}")]
    Encoding(#[source] std::io::Error),

    /// The request grew past the configured size bound.
    #[error("Request exceeds {0} bytes")]
    MessageTooLarge(usize),

    /// The header block grew past the configured bound without terminating.
    #[error("Request head exceeds {0} bytes")]
    HeaderTooLarge(usize),

    /// The client did not finish sending its request in time.
    #[error("Timed out reading request")]
    Timeout,

    /// I/O error on the connection.
    #[error("I/O error: {0}")]
    IoError(#[from] std::io::Error),
}

impl From<StoreError> for Error {
    fn from(err: StoreError) -> Self {
        match err {
            StoreError::NotFound(name) => Error::NotFound(name),
            other => Error::Store(other),
        }
    }
}

impl Error {
    /// The status code a client sees for this error.
    pub fn status(&self) -> StatusCode {
        match self {
            Error::ParseError(_)
            | Error::MissingHeader(_)
            | Error::ContentLengthMismatch { .. }
            | Error::InvalidFileName(_) => StatusCode::BadRequest,
            Error::NotFound(_) => StatusCode::NotFound,
            Error::MethodNotAllowed(..) => StatusCode::MethodNotAllowed,
            Error::MessageTooLarge(_) => StatusCode::PayloadTooLarge,
            Error::HeaderTooLarge(_) => StatusCode::RequestHeaderFieldsTooLarge,
            Error::Timeout => StatusCode::RequestTimeout,
            Error::Store(_) | Error::Encoding(_) | Error::IoError(_) => StatusCode::InternalServerError,
        }
    }
}
