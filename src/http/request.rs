//! HTTP request-line parsing.
//!
//! Only the first line of the request matters to the prop:
//! `METHOD SP target SP HTTP/1.x`.  Headers and body are ignored.

use core::fmt;

/// Longest request target we accept.
pub const MAX_TARGET_LEN: usize = 128;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RequestLine<'a> {
    pub method: &'a str,
    /// Target with the query string removed.
    pub path: &'a str,
    pub query: Option<&'a str>,
}

impl RequestLine<'_> {
    pub fn is_get(&self) -> bool {
        self.method == "GET"
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ParseError {
    /// No request line yet.
    Empty,
    /// Wrong number of tokens or a target that is not a path.
    Malformed,
    /// Not HTTP/1.x.
    UnsupportedVersion,
    TargetTooLong,
}

impl fmt::Display for ParseError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Empty => write!(f, "empty request"),
            Self::Malformed => write!(f, "malformed request line"),
            Self::UnsupportedVersion => write!(f, "unsupported HTTP version"),
            Self::TargetTooLong => write!(f, "request target too long"),
        }
    }
}

/// Parse the request line at the start of `text`.
pub fn parse_request_line(text: &str) -> Result<RequestLine<'_>, ParseError> {
    let line = text.split('\n').next().unwrap_or_default().trim_end_matches('\r');
    if line.trim().is_empty() {
        return Err(ParseError::Empty);
    }

    let mut parts = line.split_ascii_whitespace();
    let (Some(method), Some(target), Some(version), None) =
        (parts.next(), parts.next(), parts.next(), parts.next())
    else {
        return Err(ParseError::Malformed);
    };

    if !version.starts_with("HTTP/1.") {
        return Err(ParseError::UnsupportedVersion);
    }
    if !target.starts_with('/') {
        return Err(ParseError::Malformed);
    }
    if target.len() > MAX_TARGET_LEN {
        return Err(ParseError::TargetTooLong);
    }

    let (path, query) = match target.split_once('?') {
        Some((path, query)) => (path, Some(query)),
        None => (target, None),
    };

    Ok(RequestLine { method, path, query })
}

/// True once `buf` holds a complete request line.
pub fn has_request_line(buf: &[u8]) -> bool {
    buf.contains(&b'\n')
}
