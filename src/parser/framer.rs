//! Splitting a raw byte buffer into request line, header block and body.
//!
//! The framer knows nothing about methods or header semantics. It walks the
//! buffer with a single cursor and only ever looks for the first terminator
//! at or after that cursor, so text in the body that repeats the request line
//! or a header cannot move the boundaries.

use crate::parser::error::Error;

const CRLF: &[u8] = b"\r\n";
const HEADER_END: &[u8] = b"\r\n\r\n";

/// The three regions of one HTTP message, borrowed from the input buffer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Frame<'a> {
    /// Request line without its CRLF.
    pub request_line: &'a [u8],
    /// Header lines joined by CRLF, without the terminating blank line.
    /// Empty when the request carries no headers.
    pub header_block: &'a [u8],
    /// Every byte after the blank line.
    pub body: &'a [u8],
    /// Offset of the first body byte in the input.
    pub head_len: usize,
}

/// Frame a single HTTP message.
///
/// # Errors
///
/// `EmptyRequest` for an empty buffer and `IncompleteMessage` when the buffer
/// does not yet contain the end of the header block.
pub fn frame(raw: &[u8]) -> Result<Frame<'_>, Error> {
    if raw.is_empty() {
        return Err(Error::EmptyRequest);
    }

    let line_end = find(raw, CRLF, 0).ok_or(Error::IncompleteMessage)?;
    let request_line = &raw[..line_end];
    let cursor = line_end + CRLF.len();

    // A request without headers ends right after its request line.
    if raw[cursor..].starts_with(CRLF) {
        let head_len = cursor + CRLF.len();
        return Ok(Frame {
            request_line,
            header_block: &raw[cursor..cursor],
            body: &raw[head_len..],
            head_len,
        });
    }

    let block_end = find(raw, HEADER_END, cursor).ok_or(Error::IncompleteMessage)?;
    let head_len = block_end + HEADER_END.len();

    Ok(Frame {
        request_line,
        header_block: &raw[cursor..block_end],
        body: &raw[head_len..],
        head_len,
    })
}

/// Position of the first `needle` in `haystack` starting at `from`.
fn find(haystack: &[u8], needle: &[u8], from: usize) -> Option<usize> {
    haystack
        .get(from..)?
        .windows(needle.len())
        .position(|window| window == needle)
        .map(|pos| pos + from)
}
