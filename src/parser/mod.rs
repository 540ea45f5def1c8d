//! HTTP parser module.
//!
//! This module turns the raw bytes read from a connection into an
//! [`HttpRequest`]: framing first, then the request line, then the headers.

mod error;
mod framer;
mod headers;
mod method;
mod request;
mod tests;
mod version;

// Re-export public items
pub use error::Error;
pub use framer::{frame, Frame};
pub use headers::HeaderMap;
pub use method::Method;
pub use request::{parse_headers, parse_request, parse_request_line, HttpRequest};
pub use version::HttpVersion;
