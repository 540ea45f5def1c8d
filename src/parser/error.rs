//! Error types for the HTTP parser.

use thiserror::Error;

/// Errors that can occur while framing or parsing an HTTP request.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum Error {
    /// The request is empty.
    #[error("Empty request")]
    EmptyRequest,

    /// No CRLF CRLF terminator was found, so the header block is not complete.
    #[error("Incomplete message: header block is not terminated")]
    IncompleteMessage,

    /// The request line is malformed (wrong format or missing components).
    #[error("Malformed request line: {0}")]
    MalformedRequestLine(String),

    /// A header line has no colon, an empty name, or is not valid UTF-8.
    #[error("Malformed header line: {0}")]
    MalformedHeaderLine(String),

    /// The request target does not start with a slash.
    #[error("Invalid request target: {0}")]
    InvalidPath(String),

    /// The HTTP version in the request is not supported.
    #[error("Invalid HTTP version: {0}")]
    InvalidVersion(String),
}
