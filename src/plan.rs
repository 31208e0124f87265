//! Response planning (spec.md §4.5): turns a parsed [`Request`] plus a
//! stat of the served root into a [`Resolution`] the session driver then
//! hands to the directory lister or file sender.

use std::path::{Path, PathBuf};
use std::time::SystemTime;

use tokio::fs;

use crate::config::Config;
use crate::error::CoreError;
use crate::mime;
use crate::path::{has_hidden_segment, normalize_abs_path};
use crate::request::Request;
use crate::timestamp::{parse_rfc1123, truncate_to_secs};

/// What the planner decided to do with a request; consumed immediately
/// by the session driver (spec.md §3).
pub enum Resolution {
    /// Canonical target differs from what the client sent; encode and
    /// send as a `Location` header with `301`.
    Redirect(Vec<u8>),
    NotModified,
    Directory(PathBuf),
    File {
        fs_path: PathBuf,
        size: u64,
        mtime: SystemTime,
        mime: &'static str,
        lower: u64,
        upper: u64,
    },
}

/// Join a normalized, already-contained request path onto the served
/// root. `normalized` always starts with `/`; stripping that leading
/// slash keeps the join from being treated as an absolute path override.
fn fs_path(root: &Path, normalized: &[u8]) -> PathBuf {
    root.join(rel_os_str(normalized))
}

#[cfg(unix)]
fn rel_os_str(normalized: &[u8]) -> &std::ffi::OsStr {
    use std::os::unix::ffi::OsStrExt;
    std::ffi::OsStr::from_bytes(&normalized[1.min(normalized.len())..])
}

pub async fn plan(req: &Request, config: &Config) -> Result<Resolution, CoreError> {
    let mut normalized = normalize_abs_path(&req.target)?;
    if has_hidden_segment(&normalized) {
        return Err(CoreError::Forbidden);
    }

    let mut target_path = fs_path(&config.root, &normalized);
    let meta = match fs::metadata(&target_path).await {
        Ok(m) => m,
        Err(e) => {
            return Err(match e.kind() {
                std::io::ErrorKind::PermissionDenied => CoreError::Forbidden,
                _ => CoreError::NotFound,
            });
        }
    };

    if meta.is_dir() && normalized.last() != Some(&b'/') {
        if normalized.len() + 1 > config.path_max {
            return Err(CoreError::Oversized);
        }
        normalized.push(b'/');
    }

    if normalized != req.target {
        let canonical = crate::percent::encode(&normalized);
        return Ok(Resolution::Redirect(canonical));
    }

    let (served_path, served_meta) = if meta.is_dir() {
        let mut index_path = normalized.clone();
        index_path.extend_from_slice(config.index_name.as_bytes());
        target_path = fs_path(&config.root, &index_path);

        match fs::metadata(&target_path).await {
            Ok(m) if m.is_file() => (target_path.clone(), m),
            Ok(_) => {
                return reject_or_list(config, &normalized, CoreError::Forbidden);
            }
            Err(e) if e.kind() == std::io::ErrorKind::PermissionDenied => {
                return reject_or_list(config, &normalized, CoreError::Forbidden);
            }
            Err(_) => {
                return reject_or_list(config, &normalized, CoreError::NotFound);
            }
        }
    } else {
        (target_path.clone(), meta)
    };

    let mtime = truncate_to_secs(served_meta.modified().unwrap_or(SystemTime::UNIX_EPOCH));
    let size = served_meta.len();

    if !req.if_modified_since.is_empty() {
        let since = parse_rfc1123(&req.if_modified_since)?;
        if mtime <= since {
            return Ok(Resolution::NotModified);
        }
    }

    let (lower, upper) = parse_range(&req.range, size)?;

    let file_mime = mime::lookup(config.mime_table, &served_path_file_name(&served_path));

    Ok(Resolution::File {
        fs_path: served_path,
        size,
        mtime,
        mime: file_mime,
        lower,
        upper,
    })
}

/// The index file is missing (ENOENT) or not a regular file: either fall
/// back to a directory listing when allowed, or reject with a status
/// that distinguishes "index missing" from "index present but not a
/// regular file" as spec.md §9's second open question requires.
fn reject_or_list(
    config: &Config,
    normalized_dir: &[u8],
    index_miss: CoreError,
) -> Result<Resolution, CoreError> {
    if config.list_dirs {
        Ok(Resolution::Directory(fs_path(&config.root, normalized_dir)))
    } else {
        Err(index_miss)
    }
}

fn served_path_file_name(path: &Path) -> Vec<u8> {
    #[cfg(unix)]
    {
        use std::os::unix::ffi::OsStrExt;
        path.file_name()
            .map(|n| n.as_bytes().to_vec())
            .unwrap_or_default()
    }
}

/// Parse the `Range` field per spec.md §4.5 step 8: `bytes=A-B`,
/// `bytes=A-`, `bytes=-B`. Preserved bug-for-bug per spec.md §9's first
/// open question: an absent first number is treated as `0`, not as a
/// suffix length, so `bytes=-500` means "from 0", not "last 500 bytes".
fn parse_range(range: &[u8], size: u64) -> Result<(u64, u64), CoreError> {
    if range.is_empty() {
        return Ok((0, size));
    }
    let rest = range.strip_prefix(b"bytes=").ok_or(CoreError::Malformed)?;
    let dash = rest.iter().position(|&b| b == b'-').ok_or(CoreError::Malformed)?;
    let (first, last) = (&rest[..dash], &rest[dash + 1..]);

    let lower: u64 = if first.is_empty() {
        0
    } else {
        parse_decimal(first)?
    };
    let default_upper = size.saturating_sub(1);
    let upper_incl: u64 = if last.is_empty() {
        default_upper
    } else {
        parse_decimal(last)?
    };
    if lower > upper_incl {
        return Err(CoreError::Malformed);
    }
    let upper_incl = upper_incl.min(default_upper);
    Ok((lower, upper_incl.saturating_add(1).min(size)))
}

fn parse_decimal(bytes: &[u8]) -> Result<u64, CoreError> {
    if bytes.is_empty() || !bytes.iter().all(|b| b.is_ascii_digit()) {
        return Err(CoreError::Malformed);
    }
    std::str::from_utf8(bytes)
        .ok()
        .and_then(|s| s.parse().ok())
        .ok_or(CoreError::Malformed)
}
