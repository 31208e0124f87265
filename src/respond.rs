//! Canonical error/status responses (spec.md §4.8), grounded on quark.c's
//! `sendstatus`.

use tokio::io::{AsyncWrite, AsyncWriteExt};

use crate::error::Status;
use crate::timestamp::now_rfc1123;

/// Emit the fixed-shape HTML error body for `status`. Returns `status`
/// on success, or `408` if the write itself failed — a write failure is
/// a stream failure regardless of what we were trying to send.
pub async fn send_status<W>(stream: &mut W, status: Status) -> Status
where
    W: AsyncWrite + Unpin,
{
    let allow = if status == Status::MethodNotAllowed {
        "Allow: HEAD, GET\r\n"
    } else {
        ""
    };
    let body = format!(
        "<!DOCTYPE html>\n<html>\n\t<head>\n\t\t<title>{} {}</title>\n\t</head>\n\t<body>\n\t\t<h1>{} {}</h1>\n\t</body>\n</html>\n",
        status.code(), status.reason_phrase(), status.code(), status.reason_phrase(),
    );
    let response = format!(
        "HTTP/1.1 {} {}\r\nDate: {}\r\nConnection: close\r\n{}Content-Type: text/html\r\n\r\n{}",
        status.code(),
        status.reason_phrase(),
        now_rfc1123(),
        allow,
        body,
    );

    if stream.write_all(response.as_bytes()).await.is_err() || stream.flush().await.is_err() {
        return Status::RequestTimeout;
    }
    status
}

/// Emit a bare `301` with a `Location` header (spec.md §4.5 step 5).
/// `encoded_location` is the percent-encoded canonical target.
pub async fn send_redirect<W>(stream: &mut W, encoded_location: &[u8]) -> Status
where
    W: AsyncWrite + Unpin,
{
    let mut response = format!(
        "HTTP/1.1 {} {}\r\nDate: {}\r\nConnection: close\r\nLocation: ",
        Status::MovedPermanently.code(),
        Status::MovedPermanently.reason_phrase(),
        now_rfc1123(),
    )
    .into_bytes();
    response.extend_from_slice(encoded_location);
    response.extend_from_slice(b"\r\n\r\n");

    if stream.write_all(&response).await.is_err() || stream.flush().await.is_err() {
        return Status::RequestTimeout;
    }
    Status::MovedPermanently
}

/// Emit a bare `304` with no body (spec.md §4.5 step 7).
pub async fn send_not_modified<W>(stream: &mut W) -> Status
where
    W: AsyncWrite + Unpin,
{
    let response = format!(
        "HTTP/1.1 {} {}\r\nDate: {}\r\nConnection: close\r\n\r\n",
        Status::NotModified.code(),
        Status::NotModified.reason_phrase(),
        now_rfc1123(),
    );
    if stream.write_all(response.as_bytes()).await.is_err() || stream.flush().await.is_err() {
        return Status::RequestTimeout;
    }
    Status::NotModified
}

/// Emit the `200`/`206`-free directory listing response: headers then
/// the HTML body produced by [`crate::dirlist::render_index`], body
/// suppressed for `HEAD` (spec.md §4.6).
pub async fn send_directory<W>(stream: &mut W, body: Option<&[u8]>) -> Status
where
    W: AsyncWrite + Unpin,
{
    let headers = format!(
        "HTTP/1.1 {} {}\r\nDate: {}\r\nConnection: close\r\nContent-Type: text/html\r\n\r\n",
        Status::Ok.code(),
        Status::Ok.reason_phrase(),
        now_rfc1123(),
    );
    if stream.write_all(headers.as_bytes()).await.is_err() {
        return Status::RequestTimeout;
    }
    if let Some(body) = body {
        if stream.write_all(body).await.is_err() {
            return Status::RequestTimeout;
        }
    }
    if stream.flush().await.is_err() {
        return Status::RequestTimeout;
    }
    Status::Ok
}
