//! Lexical path normalization (spec.md §4.2), grounded on quark.c's
//! `normabspath`. Never touches the filesystem.

use crate::error::CoreError;

/// Reduce a request target to `/` or `/seg1/seg2/...`, collapsing `.` and
/// `..` segments. `..` above root is clamped, never escapes. Trailing
/// slash is preserved only when the input ended with one.
pub fn normalize_abs_path(path: &[u8]) -> Result<Vec<u8>, CoreError> {
    if path.first() != Some(&b'/') {
        return Err(CoreError::Malformed);
    }

    let had_trailing_slash = path.len() > 1 && path.last() == Some(&b'/');

    let mut kept: Vec<&[u8]> = Vec::new();
    for seg in path[1..].split(|&b| b == b'/') {
        match seg {
            b"" | b"." => continue,
            b".." => {
                kept.pop();
            }
            _ => kept.push(seg),
        }
    }

    let mut out = Vec::with_capacity(path.len());
    out.push(b'/');
    for (i, seg) in kept.iter().enumerate() {
        if i > 0 {
            out.push(b'/');
        }
        out.extend_from_slice(seg);
    }
    if had_trailing_slash && out.last() != Some(&b'/') {
        out.push(b'/');
    }
    Ok(out)
}

/// True when any segment of an already-normalized path begins with `.`,
/// the containment rule applied by the planner after normalization
/// (spec.md §4.2, "Additional containment rule").
pub fn has_hidden_segment(normalized: &[u8]) -> bool {
    normalized[1..]
        .split(|&b| b == b'/')
        .any(|seg| seg.first() == Some(&b'.'))
}
