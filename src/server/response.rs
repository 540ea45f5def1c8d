//! HTTP response types and utilities.

use tokio::io::{AsyncWrite, AsyncWriteExt};

use crate::parser::{HeaderMap, HttpVersion};

/// HTTP status codes with their standard reason phrases.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StatusCode {
    Ok = 200,
    Created = 201,
    BadRequest = 400,
    NotFound = 404,
    MethodNotAllowed = 405,
    RequestTimeout = 408,
    PayloadTooLarge = 413,
    RequestHeaderFieldsTooLarge = 431,
    InternalServerError = 500,
    ServiceUnavailable = 503,
}

impl StatusCode {
    /// Get the reason phrase for this status code.
    pub fn reason_phrase(&self) -> &'static str {
        match self {
            StatusCode::Ok => "OK",
            StatusCode::Created => "Created",
            StatusCode::BadRequest => "Bad Request",
            StatusCode::NotFound => "Not Found",
            StatusCode::MethodNotAllowed => "Method Not Allowed",
            StatusCode::RequestTimeout => "Request Timeout",
            StatusCode::PayloadTooLarge => "Payload Too Large",
            StatusCode::RequestHeaderFieldsTooLarge => "Request Header Fields Too Large",
            StatusCode::InternalServerError => "Internal Server Error",
            StatusCode::ServiceUnavailable => "Service Unavailable",
        }
    }

    /// The numeric code.
    pub fn as_u16(&self) -> u16 {
        *self as u16
    }
}

/// Represents an HTTP response.
///
/// A fresh response is `200 OK` with no headers and an empty body. Every body
/// change goes through [`HttpResponse::set_body`], which keeps
/// `Content-Length` in step with the body.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HttpResponse {
    /// The HTTP version written on the status line
    pub version: HttpVersion,
    /// The HTTP status code
    pub status: StatusCode,
    /// The HTTP headers
    pub headers: HeaderMap,
    body: Vec<u8>,
}

impl Default for HttpResponse {
    fn default() -> Self {
        Self::new(StatusCode::Ok)
    }
}

impl HttpResponse {
    /// Create a new HTTP response with the given status code.
    pub fn new(status: StatusCode) -> Self {
        Self {
            version: HttpVersion::Http11,
            status,
            headers: HeaderMap::new(),
            body: Vec::new(),
        }
    }

    /// The response body.
    pub fn body(&self) -> &[u8] {
        &self.body
    }

    /// Replace the body and recompute `Content-Length`.
    pub fn set_body(&mut self, body: impl Into<Vec<u8>>) {
        self.body = body.into();
        self.set_header("Content-Length", self.body.len().to_string());
    }

    /// Add or replace a header.
    pub fn set_header(&mut self, name: impl Into<String>, value: impl AsRef<str>) {
        self.headers.insert(name, value);
    }

    /// Remove a header. Returns whether it was present.
    pub fn remove_header(&mut self, name: &str) -> bool {
        self.headers.remove(name)
    }

    /// Set the response body with a string.
    pub fn with_body_string(mut self, body: impl Into<String>) -> Self {
        self.set_body(body.into().into_bytes());
        self
    }

    /// Add or replace a header.
    pub fn with_header(mut self, name: impl Into<String>, value: impl AsRef<str>) -> Self {
        self.set_header(name, value);
        self
    }

    /// Set the content type.
    pub fn with_content_type(self, content_type: impl AsRef<str>) -> Self {
        self.with_header("Content-Type", content_type)
    }

    /// Serialize the status line and headers, including the blank line.
    ///
    /// `Content-Length` is written from the actual body length: an existing
    /// field is overwritten in place and one is added when the body is not
    /// empty, so a stale value never reaches the wire.
    pub fn head_bytes(&self) -> Vec<u8> {
        let mut head = format!(
            "{version} {code} {reason}\r\n",
            version = self.version,
            code = self.status.as_u16(),
            reason = self.status.reason_phrase()
        );

        let mut wrote_length = false;
        for (name, value) in self.headers.iter() {
            if name.eq_ignore_ascii_case("Content-Length") {
                head.push_str(&format!("{name}: {len}\r\n", len = self.body.len()));
                wrote_length = true;
            } else {
                head.push_str(&format!("{name}: {value}\r\n"));
            }
        }
        if !wrote_length && !self.body.is_empty() {
            head.push_str(&format!("Content-Length: {len}\r\n", len = self.body.len()));
        }

        head.push_str("\r\n");
        head.into_bytes()
    }

    /// Convert the response to bytes.
    pub fn to_bytes(&self) -> Vec<u8> {
        let mut bytes = self.head_bytes();
        bytes.extend_from_slice(&self.body);
        bytes
    }

    /// Write the response as two writes: status line and headers, then body.
    pub async fn write_to<W>(&self, writer: &mut W) -> std::io::Result<()>
    where
        W: AsyncWrite + Unpin,
    {
        writer.write_all(&self.head_bytes()).await?;
        if !self.body.is_empty() {
            writer.write_all(&self.body).await?;
        }
        writer.flush().await
    }
}
