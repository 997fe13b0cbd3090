use crate::http::request::{Method, Request};
use std::collections::HashMap;
use std::sync::OnceLock;

/// Failures while turning raw bytes into a [`Request`].
///
/// Every variant is BadRequest-class: the connection answers with 400.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ParseError {
    #[error("malformed request line: {0:?}")]
    MalformedRequestLine(String),
    #[error("malformed header line: {0:?}")]
    MalformedHeader(String),
    #[error("request has no blank line ending the header block")]
    MissingHeaderTerminator,
}

/// Parses one complete request buffer.
///
/// The buffer is split at the first `CRLF CRLF`: the first line is the
/// request line, the remaining lines are headers and everything after the
/// blank line is the body, taken verbatim. `Content-Length` is not
/// consulted.
pub fn parse_http_request(buf: &[u8]) -> Result<Request, ParseError> {
    let headers_end = find_headers_end(buf).ok_or(ParseError::MissingHeaderTerminator)?;
    let head = &buf[..headers_end];
    let body = &buf[headers_end + 4..];

    let mut lines = split_crlf(head).into_iter();

    // Request line
    let request_line = lines.next().unwrap_or_default();
    let request_line = std::str::from_utf8(request_line)
        .map_err(|_| ParseError::MalformedRequestLine(lossy(request_line)))?;
    let (method, path, query, version) = parse_request_line(request_line)?;

    // Headers
    let mut headers = HashMap::new();

    for line in lines {
        let line = std::str::from_utf8(line)
            .map_err(|_| ParseError::MalformedHeader(lossy(line)))?;
        let (key, value) = parse_header_line(line)?;
        headers.insert(key.to_string(), value.to_string());
    }

    Ok(Request {
        method,
        path,
        query,
        version: version.to_string(),
        headers,
        body: body.to_vec(),
        params: HashMap::new(),
        cookies: OnceLock::new(),
    })
}

/// Total number of bytes the request in `buf` announces, if its header
/// block is complete.
///
/// Without a `Content-Length` header that is just the header block. The
/// connection uses this to know when to stop reading; the parser itself
/// never validates the body length.
pub fn expected_request_len(buf: &[u8]) -> Option<usize> {
    let headers_end = find_headers_end(buf)?;
    let head = std::str::from_utf8(&buf[..headers_end]).ok()?;

    let content_length = head
        .split("\r\n")
        .skip(1)
        .filter_map(|line| line.split_once(':'))
        .find(|(name, _)| name.trim().eq_ignore_ascii_case("Content-Length"))
        .and_then(|(_, value)| value.trim().parse::<usize>().ok())
        .unwrap_or(0);

    // Saturates so an absurd Content-Length is bounded by the size cap
    Some((headers_end + 4).saturating_add(content_length))
}

fn parse_request_line(
    line: &str,
) -> Result<(Method, String, Option<String>, &str), ParseError> {
    let malformed = || ParseError::MalformedRequestLine(line.to_string());

    let parts: Vec<&str> = line.split(' ').collect();
    let [method, target, version] = parts.as_slice() else {
        return Err(malformed());
    };

    let method = Method::from_str(method).ok_or_else(malformed)?;
    if !target.starts_with('/') || version.is_empty() {
        return Err(malformed());
    }

    let (path, query) = match target.split_once('?') {
        Some((path, query)) => (path.to_string(), Some(query.to_string())),
        None => (target.to_string(), None),
    };

    Ok((method, path, query, *version))
}

/// Splits on the first `:`; spaces after the colon are not part of the value.
fn parse_header_line(line: &str) -> Result<(&str, &str), ParseError> {
    let (key, value) = line
        .split_once(':')
        .ok_or_else(|| ParseError::MalformedHeader(line.to_string()))?;

    if key.is_empty() {
        return Err(ParseError::MalformedHeader(line.to_string()));
    }

    Ok((key, value.trim_start_matches(' ')))
}

fn find_headers_end(buf: &[u8]) -> Option<usize> {
    buf.windows(4).position(|w| w == b"\r\n\r\n")
}

fn split_crlf(mut buf: &[u8]) -> Vec<&[u8]> {
    let mut lines = Vec::new();
    while let Some(pos) = buf.windows(2).position(|w| w == b"\r\n") {
        lines.push(&buf[..pos]);
        buf = &buf[pos + 2..];
    }
    lines.push(buf);
    lines
}

fn lossy(bytes: &[u8]) -> String {
    String::from_utf8_lossy(bytes).into_owned()
}
