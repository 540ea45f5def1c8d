//! A minimal HTTP/1.1 server built directly on TCP sockets.
//!
//! Each connection carries one request. The bytes are framed and parsed into
//! an [`HttpRequest`], dispatched to a small fixed route table, optionally
//! compressed according to `Accept-Encoding`, and written back as an
//! [`HttpResponse`] before the connection is closed.
//!
//! # Routes
//!
//! - `/` answers `200 OK` with an empty body.
//! - `/echo/{value}` answers with `value` as `text/plain`.
//! - `/user-agent` answers with the request's `User-Agent` header.
//! - `GET /files/{name}` serves a file from the configured directory.
//! - `POST /files/{name}` stores the request body under that name.
//!
//! # Examples
//!
//! ## Parsing a request
//!
//! ```
//! use filehttp::{parse_request, Method};
//!
//! let request = parse_request(b"GET /echo/abc HTTP/1.1\r\nUser-Agent: curl\r\n\r\n").unwrap();
//! assert_eq!(request.method, Method::GET);
//! assert_eq!(request.segments().collect::<Vec<_>>(), vec!["echo", "abc"]);
//! assert_eq!(request.get_header("user-agent"), Some("curl"));
//! ```
//!
//! ## Error handling
//!
//! ```
//! use filehttp::{parse_request, ParserError};
//!
//! match parse_request(b"GET /index.html\r\n\r\n") {
//!     Err(ParserError::MalformedRequestLine(line)) => println!("Malformed request line: {line}"),
//!     Err(ParserError::IncompleteMessage) => println!("Still waiting for the header block"),
//!     Err(err) => println!("Other error: {err}"),
//!     Ok(_) => println!("Request parsed successfully"),
//! }
//! ```
//!
//! ## Building a response
//!
//! ```
//! use filehttp::{HttpResponse, StatusCode};
//!
//! let response = HttpResponse::new(StatusCode::Ok)
//!     .with_content_type("text/plain")
//!     .with_body_string("abc");
//!
//! assert_eq!(
//!     response.to_bytes(),
//!     b"HTTP/1.1 200 OK\r\nContent-Type: text/plain\r\nContent-Length: 3\r\n\r\nabc".to_vec()
//! );
//! ```

// Export the parser module
pub mod parser;

// Export the server module
pub mod server;

// Re-export commonly used items for convenience
pub use parser::{parse_request, Error as ParserError, HeaderMap, HttpRequest, HttpVersion, Method};
pub use server::{
    ContentEncoding, DirectoryStore, EncodingNegotiator, Error as ServerError, FileStore, HttpResponse, HttpServer,
    Router, ServerConfig, StatusCode, StoreError, DEFAULT_PORT,
};
