//! `Accept-Encoding` negotiation and body compression.

use std::fmt;
use std::io::Write;
use std::str::FromStr;

use flate2::write::{GzEncoder, ZlibEncoder};
use flate2::Compression;
use log::debug;

use crate::parser::HeaderMap;
use crate::server::error::Error;
use crate::server::response::HttpResponse;

/// Content codings the server knows how to produce.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ContentEncoding {
    Gzip,
    Deflate,
}

impl ContentEncoding {
    /// The token used in `Accept-Encoding` and `Content-Encoding`.
    pub fn token(&self) -> &'static str {
        match self {
            ContentEncoding::Gzip => "gzip",
            ContentEncoding::Deflate => "deflate",
        }
    }

    /// Compress `data` with this coding.
    pub fn encode(&self, data: &[u8]) -> std::io::Result<Vec<u8>> {
        match self {
            ContentEncoding::Gzip => {
                let mut encoder = GzEncoder::new(Vec::new(), Compression::default());
                encoder.write_all(data)?;
                encoder.finish()
            }
            ContentEncoding::Deflate => {
                let mut encoder = ZlibEncoder::new(Vec::new(), Compression::default());
                encoder.write_all(data)?;
                encoder.finish()
            }
        }
    }
}

impl FromStr for ContentEncoding {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim() {
            "gzip" => Ok(ContentEncoding::Gzip),
            "deflate" => Ok(ContentEncoding::Deflate),
            other => Err(format!("unsupported content encoding: {other}")),
        }
    }
}

impl fmt::Display for ContentEncoding {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.token())
    }
}

/// Picks a response encoding from the client's `Accept-Encoding` list.
#[derive(Debug, Clone)]
pub struct EncodingNegotiator {
    supported: Vec<ContentEncoding>,
}

impl Default for EncodingNegotiator {
    fn default() -> Self {
        Self::new(vec![ContentEncoding::Gzip])
    }
}

impl EncodingNegotiator {
    pub fn new(supported: Vec<ContentEncoding>) -> Self {
        Self { supported }
    }

    /// The first acceptable token in client order that the server supports.
    ///
    /// Parameters after `;` are ignored for matching, except that `q=0`
    /// refuses the coding.
    pub fn select(&self, accept_encoding: &str) -> Option<ContentEncoding> {
        accept_encoding.split(',').find_map(|candidate| {
            let mut parts = candidate.split(';').map(str::trim);
            let token = parts.next()?;
            if parts.any(is_zero_quality) {
                return None;
            }
            self.supported
                .iter()
                .copied()
                .find(|encoding| encoding.token().eq_ignore_ascii_case(token))
        })
    }

    /// Compress the response body if the request accepts a supported coding.
    ///
    /// Responses are returned untouched when there is no `Accept-Encoding`
    /// header, no supported coding is listed, or the body is empty.
    pub fn negotiate(&self, mut response: HttpResponse, request_headers: &HeaderMap) -> Result<HttpResponse, Error> {
        let Some(accept) = request_headers.get_ignore_case("Accept-Encoding") else {
            return Ok(response);
        };
        let Some(encoding) = self.select(accept) else {
            debug!("No supported encoding in Accept-Encoding: {accept}");
            return Ok(response);
        };
        if response.body().is_empty() {
            return Ok(response);
        }

        let encoded = encoding.encode(response.body()).map_err(Error::Encoding)?;
        debug!(
            "Encoded body with {encoding}: {before} -> {after} bytes",
            before = response.body().len(),
            after = encoded.len()
        );
        response.set_body(encoded);
        response.set_header("Content-Encoding", encoding.token());
        Ok(response)
    }
}

fn is_zero_quality(param: &str) -> bool {
    param
        .split_once('=')
        .filter(|(key, _)| key.trim().eq_ignore_ascii_case("q"))
        .and_then(|(_, value)| value.trim().parse::<f32>().ok())
        .is_some_and(|q| q == 0.0)
}
