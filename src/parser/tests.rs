//! Tests for the HTTP parser.

#[cfg(test)]
mod tests {
    use crate::parser::{
        frame, parse_headers, parse_request, parse_request_line, Error, HeaderMap, HttpVersion, Method,
    };

    #[test]
    fn test_frame_splits_request_line_headers_and_body() {
        let raw = b"POST /files/a HTTP/1.1\r\nHost: localhost\r\nContent-Length: 5\r\n\r\nhello";
        let frame = frame(raw).unwrap();
        assert_eq!(frame.request_line, b"POST /files/a HTTP/1.1");
        assert_eq!(frame.header_block, b"Host: localhost\r\nContent-Length: 5");
        assert_eq!(frame.body, b"hello");
        assert_eq!(frame.head_len, raw.len() - 5);
    }

    #[test]
    fn test_frame_request_without_headers() {
        let frame = frame(b"GET / HTTP/1.1\r\n\r\n").unwrap();
        assert_eq!(frame.request_line, b"GET / HTTP/1.1");
        assert!(frame.header_block.is_empty());
        assert!(frame.body.is_empty());
    }

    #[test]
    fn test_frame_incomplete_header_block() {
        assert_eq!(frame(b"GET / HTTP/1.1\r\nHost: localhost\r\n"), Err(Error::IncompleteMessage));
        assert_eq!(frame(b"GET / HTTP/1.1"), Err(Error::IncompleteMessage));
        assert_eq!(frame(b"GET / HTTP/1.1\r\n"), Err(Error::IncompleteMessage));
    }

    #[test]
    fn test_frame_empty_input() {
        assert_eq!(frame(b""), Err(Error::EmptyRequest));
    }

    #[test]
    fn test_frame_body_repeating_head_text_is_untouched() {
        let raw = b"POST /files/x HTTP/1.1\r\nHost: a\r\n\r\nPOST /files/x HTTP/1.1\r\nHost: a\r\n\r\n";
        let frame = frame(raw).unwrap();
        assert_eq!(frame.header_block, b"Host: a");
        assert_eq!(frame.body, b"POST /files/x HTTP/1.1\r\nHost: a\r\n\r\n");
    }

    #[test]
    fn test_parse_simple_get_request() {
        let request = b"GET /index.html HTTP/1.1\r\nHost: example.com\r\n\r\n";
        let result = parse_request(request).unwrap();
        assert_eq!(result.method, Method::GET);
        assert_eq!(result.path, "/index.html");
        assert_eq!(result.version, HttpVersion::Http11);
        assert_eq!(result.headers.get("Host"), Some("example.com"));
        assert!(result.body.is_empty());
    }

    #[test]
    fn test_parse_request_with_multiple_headers() {
        let request = b"GET /index.html HTTP/1.1\r\nHost: example.com\r\nUser-Agent: test\r\nAccept: */*\r\n\r\n";
        let result = parse_request(request).unwrap();
        let names: Vec<&str> = result.headers.iter().map(|(name, _)| name).collect();
        assert_eq!(names, vec!["Host", "User-Agent", "Accept"]);
        assert_eq!(result.headers.get("User-Agent"), Some("test"));
        assert_eq!(result.headers.get("Accept"), Some("*/*"));
    }

    #[test]
    fn test_header_value_keeps_colons_and_is_trimmed() {
        let headers = parse_headers("Host:   localhost:4221  \r\nX-Time: 12:30:00").unwrap();
        assert_eq!(headers.get("Host"), Some("localhost:4221"));
        assert_eq!(headers.get("X-Time"), Some("12:30:00"));
    }

    #[test]
    fn test_header_case_is_preserved() {
        let result = parse_request(b"GET / HTTP/1.1\r\nuser-agent: curl/8.0\r\n\r\n").unwrap();
        assert_eq!(result.headers.get("user-agent"), Some("curl/8.0"));
        assert_eq!(result.headers.get("User-Agent"), None);
        assert_eq!(result.get_header("User-Agent"), Some("curl/8.0"));
        assert!(result.has_header("USER-AGENT"));
    }

    #[test]
    fn test_duplicate_header_last_write_wins_in_place() {
        let headers = parse_headers("A: 1\r\nB: 2\r\nA: 3").unwrap();
        let fields: Vec<(&str, &str)> = headers.iter().collect();
        assert_eq!(fields, vec![("A", "3"), ("B", "2")]);
    }

    #[test]
    fn test_invalid_header_format() {
        let request = b"GET /index.html HTTP/1.1\r\nInvalidHeader\r\n\r\n";
        let result = parse_request(request);
        assert!(matches!(result, Err(Error::MalformedHeaderLine(ref line)) if line == "InvalidHeader"));
    }

    #[test]
    fn test_header_with_empty_name() {
        assert!(matches!(parse_headers(": value"), Err(Error::MalformedHeaderLine(_))));
    }

    #[test]
    fn test_unknown_method_is_kept() {
        let result = parse_request(b"PATCH /echo/x HTTP/1.1\r\n\r\n").unwrap();
        assert_eq!(result.method, Method::Other("PATCH".to_string()));
        assert_eq!(result.method.to_string(), "PATCH");
        assert_eq!(Method::from("GET"), Method::GET);
        assert_eq!(Method::from("POST"), Method::POST);
        assert_eq!(Method::from("get"), Method::Other("get".to_string()));
    }

    #[test]
    fn test_invalid_http_version() {
        let request = b"GET /index.html HTTP/9.9\r\nHost: example.com\r\n\r\n";
        let result = parse_request(request);
        assert!(matches!(result, Err(Error::InvalidVersion(ref v)) if v == "HTTP/9.9"));
    }

    #[test]
    fn test_http10_request() {
        let result = parse_request(b"GET / HTTP/1.0\r\n\r\n").unwrap();
        assert_eq!(result.version, HttpVersion::Http10);
    }

    #[test]
    fn test_incomplete_request_line() {
        assert!(matches!(parse_request_line("GET"), Err(Error::MalformedRequestLine(_))));
        assert!(matches!(parse_request_line("GET /"), Err(Error::MalformedRequestLine(_))));
    }

    #[test]
    fn test_request_line_requires_single_spaces() {
        assert!(matches!(
            parse_request_line("GET  / HTTP/1.1"),
            Err(Error::MalformedRequestLine(_))
        ));
        assert!(matches!(
            parse_request_line("GET / HTTP/1.1 extra"),
            Err(Error::MalformedRequestLine(_))
        ));
    }

    #[test]
    fn test_request_target_must_be_absolute_path() {
        assert!(matches!(
            parse_request_line("GET index.html HTTP/1.1"),
            Err(Error::InvalidPath(ref p)) if p == "index.html"
        ));
    }

    #[test]
    fn test_invalid_utf8_request_line() {
        let result = parse_request(b"GET /\xff HTTP/1.1\r\n\r\n");
        assert!(matches!(result, Err(Error::MalformedRequestLine(_))));
    }

    #[test]
    fn test_body_is_verbatim_bytes() {
        let raw = b"POST /files/bin HTTP/1.1\r\nContent-Length: 6\r\n\r\n \x00\xff\r\n ";
        let result = parse_request(raw).unwrap();
        assert_eq!(result.body, b" \x00\xff\r\n ");
    }

    #[test]
    fn test_trailing_bytes_after_message_belong_to_body() {
        let raw = b"GET / HTTP/1.1\r\n\r\nGET /other HTTP/1.1\r\n\r\n";
        let result = parse_request(raw).unwrap();
        assert_eq!(result.path, "/");
        assert_eq!(result.body, b"GET /other HTTP/1.1\r\n\r\n");
    }

    #[test]
    fn test_segments_skip_empty_components() {
        let result = parse_request(b"GET /echo//abc/ HTTP/1.1\r\n\r\n").unwrap();
        assert_eq!(result.segments().collect::<Vec<_>>(), vec!["echo", "abc"]);

        let root = parse_request(b"GET / HTTP/1.1\r\n\r\n").unwrap();
        assert_eq!(root.segments().count(), 0);
    }

    #[test]
    fn test_header_map_remove_ignores_case() {
        let mut headers: HeaderMap = [("Content-Length", "3"), ("Content-Type", "text/plain")]
            .into_iter()
            .collect();
        assert!(headers.remove("content-length"));
        assert!(!headers.remove("content-length"));
        assert_eq!(headers.len(), 1);
        assert_eq!(headers.get("Content-Type"), Some("text/plain"));
    }
}
