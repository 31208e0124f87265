//! Directory index generation (spec.md §4.6), grounded on quark.c's
//! `senddir`/`compareent`/`filetype`.

use std::os::unix::fs::FileTypeExt;
use std::path::Path;

use tokio::fs;

use crate::error::CoreError;

struct Entry {
    name: Vec<u8>,
    is_dir: bool,
    glyph: &'static str,
}

/// Enumerate `dir`, dropping entries whose name starts with `.`, and
/// return them sorted with directories first, then lexicographically by
/// name within each group.
pub async fn list_entries(dir: &Path) -> Result<Vec<(Vec<u8>, &'static str)>, CoreError> {
    let mut read_dir = fs::read_dir(dir).await.map_err(|_| CoreError::Forbidden)?;
    let mut entries = Vec::new();

    loop {
        let next = read_dir.next_entry().await.map_err(|_| CoreError::Forbidden)?;
        let Some(dir_entry) = next else { break };

        let name = dir_entry.file_name();
        let name_bytes = {
            use std::os::unix::ffi::OsStrExt;
            name.as_bytes().to_vec()
        };
        if name_bytes.first() == Some(&b'.') {
            continue;
        }

        let file_type = dir_entry.file_type().await.map_err(|_| CoreError::Forbidden)?;
        let glyph = if file_type.is_dir() {
            "/"
        } else if file_type.is_symlink() {
            "@"
        } else if file_type.is_fifo() {
            "|"
        } else if file_type.is_socket() {
            "="
        } else {
            ""
        };

        entries.push(Entry {
            name: name_bytes,
            is_dir: file_type.is_dir(),
            glyph,
        });
    }

    entries.sort_by(|a, b| match (b.is_dir, a.is_dir) {
        (true, false) => std::cmp::Ordering::Greater,
        (false, true) => std::cmp::Ordering::Less,
        _ => a.name.cmp(&b.name),
    });

    Ok(entries.into_iter().map(|e| (e.name, e.glyph)).collect())
}

/// Render the `Index of <path>` HTML page body described in spec.md §4.6.
/// `display_path` is the canonical, percent-decoded request path shown
/// in the title (not HTML-escaped beyond the minimal set quark.c itself
/// does not escape either, matching the teacher/original's plain style).
pub fn render_index(display_path: &str, entries: &[(Vec<u8>, &'static str)]) -> Vec<u8> {
    let mut html = Vec::new();
    html.extend_from_slice(
        format!(
            "<!DOCTYPE html>\n<html>\n\t<head><title>Index of {display_path}</title></head>\n\t<body>\n\t\t<a href=\"..\">..</a>"
        )
        .into_bytes()
        .as_slice(),
    );
    for (name, glyph) in entries {
        let name_str = String::from_utf8_lossy(name);
        html.extend_from_slice(
            format!("<br />\n\t\t<a href=\"{name_str}\">{name_str}{glyph}</a>").as_bytes(),
        );
    }
    html.extend_from_slice(b"\n\t</body>\n</html>\n");
    html
}
