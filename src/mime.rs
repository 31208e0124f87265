//! Extension-to-MIME lookup (spec.md §3 `Config.mime_table`, §4.5 step 9).
//!
//! Adapted from the teacher's `MimeType` enum in `src/lib.rs`: the table
//! shape is kept (a flat, compile-time list, scanned in order) but
//! expressed as the ordered `(extension, type)` pairs the spec's `Config`
//! calls for, since the table is a first-match-wins sequence rather than
//! a fixed enum index once `Config` may one day carry a host-supplied
//! table.

/// First match wins; order matters only in that earlier entries shadow
/// later ones for the same extension (none currently collide).
pub const DEFAULT_MIME_TABLE: &[(&str, &str)] = &[
    ("html", "text/html; charset=utf-8"),
    ("htm", "text/html; charset=utf-8"),
    ("css", "text/css; charset=utf-8"),
    ("js", "text/javascript; charset=utf-8"),
    ("mjs", "text/javascript; charset=utf-8"),
    ("json", "application/json; charset=utf-8"),
    ("xml", "application/xml; charset=utf-8"),
    ("txt", "text/plain; charset=utf-8"),
    ("md", "text/plain; charset=utf-8"),
    ("ico", "image/x-icon"),
    ("png", "image/png"),
    ("jpg", "image/jpeg"),
    ("jpeg", "image/jpeg"),
    ("gif", "image/gif"),
    ("svg", "image/svg+xml"),
    ("webp", "image/webp"),
    ("pdf", "application/pdf"),
    ("woff", "font/woff"),
    ("woff2", "font/woff2"),
    ("ttf", "font/ttf"),
    ("eot", "application/vnd.ms-fontobject"),
    ("wasm", "application/wasm"),
];

pub const DEFAULT_MIME_TYPE: &str = "application/octet-stream";

/// Match the final extension of `file_name` against `table` in order;
/// the match is case-insensitive (browsers send both), the default is
/// `application/octet-stream` when nothing matches or there is no
/// extension at all.
pub fn lookup(table: &[(&'static str, &'static str)], file_name: &[u8]) -> &'static str {
    let ext = match file_name.rsplit(|&b| b == b'.').next() {
        Some(ext) if ext.len() != file_name.len() => ext,
        _ => return DEFAULT_MIME_TYPE,
    };
    let Ok(ext) = std::str::from_utf8(ext) else {
        return DEFAULT_MIME_TYPE;
    };
    for &(candidate, mime) in table {
        if candidate.eq_ignore_ascii_case(ext) {
            return mime;
        }
    }
    DEFAULT_MIME_TYPE
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn matches_known_extensions() {
        assert_eq!(lookup(DEFAULT_MIME_TABLE, b"index.html"), "text/html; charset=utf-8");
        assert_eq!(lookup(DEFAULT_MIME_TABLE, b"app.js"), "text/javascript; charset=utf-8");
        assert_eq!(lookup(DEFAULT_MIME_TABLE, b"photo.JPG"), "image/jpeg");
    }

    #[test]
    fn falls_back_to_octet_stream() {
        assert_eq!(lookup(DEFAULT_MIME_TABLE, b"Dockerfile"), DEFAULT_MIME_TYPE);
        assert_eq!(lookup(DEFAULT_MIME_TABLE, b"archive.tar.gz"), DEFAULT_MIME_TYPE);
        assert_eq!(lookup(DEFAULT_MIME_TABLE, b".hidden"), DEFAULT_MIME_TYPE);
    }
}
