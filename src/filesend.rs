//! Streaming a byte window of a regular file (spec.md §4.7), grounded on
//! quark.c's `sendfile`.

use std::path::Path;
use std::time::SystemTime;

use tokio::fs::File;
use tokio::io::{AsyncReadExt, AsyncSeekExt, AsyncWrite, AsyncWriteExt, SeekFrom};

use crate::error::{CoreError, Status};
use crate::request::Method;
use crate::timestamp::{format_rfc1123, now_rfc1123};

const CHUNK_SIZE: usize = 64 * 1024;

#[allow(clippy::too_many_arguments)]
pub async fn send_file<W>(
    stream: &mut W,
    method: Method,
    fs_path: &Path,
    size: u64,
    mtime: SystemTime,
    mime: &str,
    lower: u64,
    upper: u64,
    was_range_request: bool,
) -> Result<Status, CoreError>
where
    W: AsyncWrite + Unpin,
{
    let mut file = File::open(fs_path).await.map_err(|_| CoreError::Forbidden)?;
    file.seek(SeekFrom::Start(lower))
        .await
        .map_err(|_| CoreError::Internal)?;

    let status = if was_range_request {
        Status::PartialContent
    } else {
        Status::Ok
    };

    let mut headers = format!(
        "HTTP/1.1 {} {}\r\nDate: {}\r\nConnection: close\r\nLast-Modified: {}\r\nContent-Type: {}\r\nContent-Length: {}\r\n",
        status.code(),
        status.reason_phrase(),
        now_rfc1123(),
        format_rfc1123(mtime),
        mime,
        upper - lower,
    );
    if was_range_request {
        headers.push_str(&format!(
            "Content-Range: bytes {}-{}/{}\r\n",
            lower,
            upper.saturating_sub(1),
            size,
        ));
    }
    headers.push_str("\r\n");

    if write_all(stream, headers.as_bytes()).await.is_err() {
        return Ok(Status::RequestTimeout);
    }

    if method == Method::Head {
        return Ok(status);
    }

    let mut remaining = upper - lower;
    let mut buf = vec![0u8; CHUNK_SIZE];
    while remaining > 0 {
        let to_read = (buf.len() as u64).min(remaining) as usize;
        let read = match file.read(&mut buf[..to_read]).await {
            Ok(0) => break,
            Ok(n) => n,
            Err(_) => return Err(CoreError::Internal),
        };
        if write_all(stream, &buf[..read]).await.is_err() {
            return Ok(Status::RequestTimeout);
        }
        remaining -= read as u64;
    }

    Ok(status)
}

async fn write_all<W: AsyncWrite + Unpin>(stream: &mut W, buf: &[u8]) -> std::io::Result<()> {
    stream.write_all(buf).await?;
    stream.flush().await
}
