//! HTTP request parsing and representation.

use std::str::FromStr;

use crate::parser::error::Error;
use crate::parser::framer::frame;
use crate::parser::headers::HeaderMap;
use crate::parser::method::Method;
use crate::parser::version::HttpVersion;

/// Represents an HTTP request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HttpRequest {
    /// The HTTP method (GET, POST, etc.)
    pub method: Method,
    /// The raw request target, including the leading slash
    pub path: String,
    /// The HTTP version
    pub version: HttpVersion,
    /// The HTTP headers
    pub headers: HeaderMap,
    /// The request body, verbatim
    pub body: Vec<u8>,
}

impl HttpRequest {
    /// Create a new HTTP request with an empty body.
    pub fn new(method: Method, path: impl Into<String>, version: HttpVersion, headers: HeaderMap) -> Self {
        Self {
            method,
            path: path.into(),
            version,
            headers,
            body: Vec::new(),
        }
    }

    /// Create a new HTTP request with a body.
    pub fn with_body(
        method: Method,
        path: impl Into<String>,
        version: HttpVersion,
        headers: HeaderMap,
        body: Vec<u8>,
    ) -> Self {
        let mut request = Self::new(method, path, version, headers);
        request.body = body;
        request
    }

    /// Get a header value (case-insensitive).
    pub fn get_header(&self, name: &str) -> Option<&str> {
        self.headers.get_ignore_case(name)
    }

    /// Check if a header exists (case-insensitive).
    pub fn has_header(&self, name: &str) -> bool {
        self.headers.contains(name)
    }

    /// The non-empty `/`-separated segments of the path.
    ///
    /// `/echo//abc/` yields `["echo", "abc"]` and `/` yields nothing.
    pub fn segments(&self) -> impl Iterator<Item = &str> {
        self.path.split('/').filter(|segment| !segment.is_empty())
    }
}

/// Parse an HTTP request line into method, target and version.
///
/// The line must consist of exactly three tokens separated by single spaces.
pub fn parse_request_line(line: &str) -> Result<(Method, String, HttpVersion), Error> {
    let parts: Vec<&str> = line.split(' ').collect();
    let [method, target, version] = parts.as_slice() else {
        return Err(Error::MalformedRequestLine(line.to_string()));
    };
    if method.is_empty() {
        return Err(Error::MalformedRequestLine(line.to_string()));
    }
    if !target.starts_with('/') {
        return Err(Error::InvalidPath(target.to_string()));
    }

    let method = Method::from(*method);
    let version = HttpVersion::from_str(version)?;

    Ok((method, target.to_string(), version))
}

/// Parse a header block into a [`HeaderMap`].
///
/// Each non-empty line is split on its first colon only, so values may carry
/// colons themselves.
pub fn parse_headers(block: &str) -> Result<HeaderMap, Error> {
    let mut headers = HeaderMap::new();
    for line in block.lines() {
        if line.is_empty() {
            continue;
        }

        let Some((name, value)) = line.split_once(':') else {
            return Err(Error::MalformedHeaderLine(line.to_string()));
        };
        let name = name.trim();
        if name.is_empty() {
            return Err(Error::MalformedHeaderLine(line.to_string()));
        }

        headers.insert(name, value);
    }
    Ok(headers)
}

/// Parse an HTTP request from a byte slice.
///
/// Only the first message in the buffer is framed; the body is everything
/// after its header block.
pub fn parse_request(input: &[u8]) -> Result<HttpRequest, Error> {
    let frame = frame(input)?;

    let request_line = std::str::from_utf8(frame.request_line)
        .map_err(|_| Error::MalformedRequestLine("Invalid UTF-8".to_string()))?;
    let (method, path, version) = parse_request_line(request_line)?;

    let header_block = std::str::from_utf8(frame.header_block)
        .map_err(|_| Error::MalformedHeaderLine("Invalid UTF-8".to_string()))?;
    let headers = parse_headers(header_block)?;

    Ok(HttpRequest::with_body(method, path, version, headers, frame.body.to_vec()))
}
