//! Request reception and parsing (spec.md §4.4).
//!
//! Reading the header and parsing it are split in two: [`read_header`]
//! owns the bounded buffer and the `\r\n\r\n` scan (including the case
//! where the terminator straddles two reads, spec.md §9's third open
//! question), [`parse_header`] is pure and synchronous so it can be unit
//! tested without a socket.

use tokio::io::{AsyncRead, AsyncReadExt};

use crate::error::CoreError;
use crate::percent::decode_in_place;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Method {
    Get,
    Head,
}

impl Method {
    pub const fn as_str(self) -> &'static str {
        match self {
            Method::Get => "GET",
            Method::Head => "HEAD",
        }
    }
}

/// A fully parsed, immutable request (spec.md §3).
#[derive(Debug, Clone)]
pub struct Request {
    pub method: Method,
    /// Percent-decoded request target, as received (possibly non-canonical).
    pub target: Vec<u8>,
    pub range: Vec<u8>,
    pub if_modified_since: Vec<u8>,
}

const TERMINATOR: &[u8] = b"\r\n\r\n";

/// Read the request header from `stream` into a buffer bounded by
/// `header_max`, stopping at the first `\r\n\r\n`. The scan re-examines
/// the whole accumulated buffer on every read, so a terminator split
/// across two `read()` calls is still found.
pub async fn read_header<S>(stream: &mut S, header_max: usize) -> Result<Vec<u8>, CoreError>
where
    S: AsyncRead + Unpin,
{
    let mut buf = Vec::with_capacity(header_max.min(4096));
    let mut chunk = [0u8; 4096];

    loop {
        if let Some(end) = find(&buf, TERMINATOR) {
            buf.truncate(end + TERMINATOR.len());
            return Ok(buf);
        }
        if buf.len() >= header_max {
            return Err(CoreError::Oversized);
        }

        let max_read = chunk.len().min(header_max - buf.len());
        let n = stream
            .read(&mut chunk[..max_read])
            .await
            .map_err(|_| CoreError::StreamFailure)?;

        if n == 0 {
            return if buf.len() < 2 {
                Err(CoreError::Malformed)
            } else {
                Err(CoreError::StreamFailure)
            };
        }
        buf.extend_from_slice(&chunk[..n]);
    }
}

fn find(haystack: &[u8], needle: &[u8]) -> Option<usize> {
    haystack
        .windows(needle.len())
        .position(|window| window == needle)
}

fn split_lines(buf: &[u8]) -> Vec<&[u8]> {
    let mut lines = Vec::new();
    let mut start = 0;
    let mut i = 0;
    while i + 1 < buf.len() {
        if buf[i] == b'\r' && buf[i + 1] == b'\n' {
            lines.push(&buf[start..i]);
            i += 2;
            start = i;
        } else {
            i += 1;
        }
    }
    lines
}

/// A parse failure together with whatever of the target was recovered
/// before the failure, for the session driver's log line (spec.md §4.9:
/// "If parsing failed before target extraction, the target field logged
/// is empty").
#[derive(Debug)]
pub struct ParseFailure {
    pub error: CoreError,
    pub partial_target: Vec<u8>,
}

impl ParseFailure {
    fn new(error: CoreError, partial_target: Vec<u8>) -> Self {
        ParseFailure { error, partial_target }
    }
}

/// Parse a complete header buffer (as returned by [`read_header`]) into a
/// [`Request`], per spec.md §4.4.
pub fn parse_header(header: &[u8], field_max: usize, path_max: usize) -> Result<Request, ParseFailure> {
    if header.len() < 2 {
        return Err(ParseFailure::new(CoreError::Malformed, Vec::new()));
    }
    let lines = split_lines(header);
    let mut lines = lines.into_iter();
    let request_line = match lines.next() {
        Some(l) => l,
        None => return Err(ParseFailure::new(CoreError::Malformed, Vec::new())),
    };

    let (method, mut target) = parse_request_line(request_line, path_max)
        .map_err(|e| ParseFailure::new(e, Vec::new()))?;
    decode_in_place(&mut target);
    if target.len() > path_max {
        return Err(ParseFailure::new(CoreError::Oversized, target));
    }

    let mut range = Vec::new();
    let mut if_modified_since = Vec::new();

    for line in lines {
        if line.is_empty() {
            break;
        }
        if let Some(value) = strip_field(line, b"Range") {
            if value.len() > field_max {
                return Err(ParseFailure::new(CoreError::Oversized, target));
            }
            range = value.to_vec();
        } else if let Some(value) = strip_field(line, b"If-Modified-Since") {
            if value.len() > field_max {
                return Err(ParseFailure::new(CoreError::Oversized, target));
            }
            if_modified_since = value.to_vec();
        }
        // unrecognized fields are dropped, matching spec.md §3's invariant
    }

    Ok(Request {
        method,
        target,
        range,
        if_modified_since,
    })
}

/// If `line` starts with `name` followed by `:`, return the value with
/// leading spaces trimmed. Matching is exact-case, mirroring quark.c's
/// `strncmp` against its fixed field-name table.
fn strip_field<'a>(line: &'a [u8], name: &[u8]) -> Option<&'a [u8]> {
    if line.len() <= name.len() || &line[..name.len()] != name || line[name.len()] != b':' {
        return None;
    }
    let mut value = &line[name.len() + 1..];
    while value.first() == Some(&b' ') {
        value = &value[1..];
    }
    Some(value)
}

fn parse_request_line(line: &[u8], path_max: usize) -> Result<(Method, Vec<u8>), CoreError> {
    let sp1 = line.iter().position(|&b| b == b' ');
    let method_bytes = match sp1 {
        Some(p) => &line[..p],
        None => line,
    };
    let method = match method_bytes {
        b"GET" => Method::Get,
        b"HEAD" => Method::Head,
        _ => return Err(CoreError::UnsupportedMethod),
    };
    let Some(sp1) = sp1 else {
        return Err(CoreError::Malformed);
    };

    let rest = &line[sp1 + 1..];
    let sp2 = rest.iter().position(|&b| b == b' ').ok_or(CoreError::Malformed)?;
    let target = &rest[..sp2];
    if target.is_empty() {
        return Err(CoreError::Malformed);
    }
    if target.len() > path_max {
        return Err(CoreError::Oversized);
    }

    let version = &rest[sp2 + 1..];
    match version {
        b"HTTP/1.0" | b"HTTP/1.1" => {}
        v if v.starts_with(b"HTTP/") => return Err(CoreError::UnsupportedVersion),
        _ => return Err(CoreError::Malformed),
    }

    Ok((method, target.to_vec()))
}
