//! Closed status enum and the core's typed error taxonomy (spec.md §3, §7).

use std::fmt;

/// The response codes this server ever emits.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[repr(u16)]
pub enum Status {
    Ok = 200,
    PartialContent = 206,
    MovedPermanently = 301,
    NotModified = 304,
    BadRequest = 400,
    Forbidden = 403,
    NotFound = 404,
    MethodNotAllowed = 405,
    RequestTimeout = 408,
    RequestHeaderFieldsTooLarge = 431,
    InternalServerError = 500,
    HttpVersionNotSupported = 505,
}

impl Status {
    pub const fn code(self) -> u16 {
        self as u16
    }

    pub const fn reason_phrase(self) -> &'static str {
        match self {
            Status::Ok => "OK",
            Status::PartialContent => "Partial Content",
            Status::MovedPermanently => "Moved Permanently",
            Status::NotModified => "Not Modified",
            Status::BadRequest => "Bad Request",
            Status::Forbidden => "Forbidden",
            Status::NotFound => "Not Found",
            Status::MethodNotAllowed => "Method Not Allowed",
            Status::RequestTimeout => "Request Time-out",
            Status::RequestHeaderFieldsTooLarge => "Request Header Fields Too Large",
            Status::InternalServerError => "Internal Server Error",
            Status::HttpVersionNotSupported => "HTTP Version not supported",
        }
    }
}

impl fmt::Display for Status {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {}", self.code(), self.reason_phrase())
    }
}

/// The error kinds a request can fail with, closed over spec.md §7's taxonomy.
///
/// Every variant maps to exactly one [`Status`]; the mapping is what the
/// response writer uses to turn a propagated error into bytes on the wire.
#[derive(Debug, thiserror::Error)]
pub enum CoreError {
    #[error("malformed request")]
    Malformed,
    #[error("unsupported method")]
    UnsupportedMethod,
    #[error("unsupported http version")]
    UnsupportedVersion,
    #[error("request exceeds a configured bound")]
    Oversized,
    #[error("access to the target is denied")]
    Forbidden,
    #[error("target does not exist")]
    NotFound,
    #[error("the stream failed or timed out")]
    StreamFailure,
    #[error("an internal operation failed")]
    Internal,
}

impl CoreError {
    pub const fn status(&self) -> Status {
        match self {
            CoreError::Malformed => Status::BadRequest,
            CoreError::UnsupportedMethod => Status::MethodNotAllowed,
            CoreError::UnsupportedVersion => Status::HttpVersionNotSupported,
            CoreError::Oversized => Status::RequestHeaderFieldsTooLarge,
            CoreError::Forbidden => Status::Forbidden,
            CoreError::NotFound => Status::NotFound,
            CoreError::StreamFailure => Status::RequestTimeout,
            CoreError::Internal => Status::InternalServerError,
        }
    }
}
