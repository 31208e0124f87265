//! Per-connection session driver (spec.md §4.9): parse, plan, send,
//! always producing a final [`Status`] for the log.

use tokio::io::{AsyncRead, AsyncWrite};

use crate::config::Config;
use crate::error::Status;
use crate::log::LogSink;
use crate::plan::{plan, Resolution};
use crate::request::{parse_header, read_header, Method};
use crate::{dirlist, filesend, respond};

/// Handle exactly one request on `stream` and return the final status
/// for the caller to log (the caller also owns the peer-address string
/// and the decision to shut down the stream, both host responsibilities
/// outside the core per spec.md §1).
pub async fn serve_connection<S>(stream: &mut S, peer: &str, config: &Config, log: &dyn LogSink) -> Status
where
    S: AsyncRead + AsyncWrite + Unpin,
{
    let header = match read_header(stream, config.header_max).await {
        Ok(h) => h,
        Err(e) => {
            let status = respond::send_status(stream, e.status()).await;
            log.record(peer, status, b"");
            return status;
        }
    };

    let request = match parse_header(&header, config.field_max, config.path_max) {
        Ok(r) => r,
        Err(failure) => {
            let status = respond::send_status(stream, failure.error.status()).await;
            log.record(peer, status, &failure.partial_target);
            return status;
        }
    };

    let status = match plan(&request, config).await {
        Ok(Resolution::Redirect(location)) => respond::send_redirect(stream, &location).await,
        Ok(Resolution::NotModified) => respond::send_not_modified(stream).await,
        Ok(Resolution::Directory(fs_path)) => match dirlist::list_entries(&fs_path).await {
            Ok(entries) => {
                let body = if request.method == Method::Head {
                    None
                } else {
                    let display_path = String::from_utf8_lossy(&request.target);
                    Some(dirlist::render_index(&display_path, &entries))
                };
                respond::send_directory(stream, body.as_deref()).await
            }
            Err(e) => respond::send_status(stream, e.status()).await,
        },
        Ok(Resolution::File {
            fs_path,
            size,
            mtime,
            mime,
            lower,
            upper,
        }) => {
            let was_range_request = !request.range.is_empty();
            match filesend::send_file(
                stream,
                request.method,
                &fs_path,
                size,
                mtime,
                mime,
                lower,
                upper,
                was_range_request,
            )
            .await
            {
                Ok(status) => status,
                Err(e) => respond::send_status(stream, e.status()).await,
            }
        }
        Err(e) => respond::send_status(stream, e.status()).await,
    };

    log.record(peer, status, &request.target);
    status
}
