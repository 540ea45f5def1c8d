//! HTTP server implementation for filehttp.
//!
//! This module wires the parser to the fixed route table, the file store and
//! the encoding negotiator, and runs the accept loop around them.

mod config;
mod encoding;
mod error;
mod http_server;
mod response;
mod router;
mod store;

// Re-export public items
pub use config::{ServerConfig, DEFAULT_PORT};
pub use encoding::{ContentEncoding, EncodingNegotiator};
pub use error::Error;
pub use http_server::{HttpServer, ReadLimits};
pub use response::{HttpResponse, StatusCode};
pub use router::Router;
pub use store::{DirectoryStore, FileStore, StoreError};
