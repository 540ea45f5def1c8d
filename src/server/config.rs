//! Server configuration.

use std::net::{Ipv4Addr, SocketAddr};
use std::path::PathBuf;
use std::time::Duration;

use crate::server::encoding::ContentEncoding;

/// Port the server listens on unless told otherwise.
pub const DEFAULT_PORT: u16 = 4221;

/// HTTP server configuration.
#[derive(Debug, Clone)]
pub struct ServerConfig {
    /// The address to bind to.
    pub addr: SocketAddr,
    /// The maximum number of concurrent connections.
    pub max_connections: usize,
    /// The read buffer size.
    pub read_buffer_size: usize,
    /// Upper bound on the bytes read for one request.
    pub max_message_size: usize,
    /// Upper bound on the request line and header block.
    pub max_head_size: usize,
    /// How long to wait for the client to finish sending its request.
    pub read_timeout: Duration,
    /// Root directory for `/files`.
    pub directory: PathBuf,
    /// Encodings offered to clients, in server preference order.
    pub encodings: Vec<ContentEncoding>,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            addr: SocketAddr::from((Ipv4Addr::LOCALHOST, DEFAULT_PORT)),
            max_connections: 1024,
            read_buffer_size: 8192,
            max_message_size: 16 * 1024 * 1024,
            max_head_size: 64 * 1024,
            read_timeout: Duration::from_secs(10),
            directory: PathBuf::from("./"),
            encodings: vec![ContentEncoding::Gzip],
        }
    }
}
