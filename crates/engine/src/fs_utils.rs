use crate::Result;
use crate::error::{InlayError, IoOp};
use log::debug;
use path_clean::PathClean;
use similar::{ChangeTag, TextDiff};
use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};
use tempfile::NamedTempFile;

/// Lines longer than this are shortened in previews; base64 payloads run to
/// hundreds of kilobytes on a single line.
const PREVIEW_LINE_WIDTH: usize = 120;

pub fn read_bytes(path: &Path) -> Result<Vec<u8>> {
    fs::read(path).map_err(|e| InlayError::io(IoOp::Read, path, e))
}

/// Reads `path` as UTF-8. Invalid UTF-8 surfaces as an `InvalidData` I/O error.
pub fn read_text(path: &Path) -> Result<String> {
    fs::read_to_string(path).map_err(|e| InlayError::io(IoOp::Read, path, e))
}

/// Plain create-or-truncate write. A failure can leave a partial file behind.
pub fn write_text(path: &Path, text: &str) -> Result<()> {
    fs::write(path, text).map_err(|e| InlayError::io(IoOp::Write, path, e))
}

/// Drops one trailing `\n` or `\r\n`, the line break editors append to
/// block files.
pub fn strip_line_break(text: &str) -> &str {
    text.strip_suffix('\n')
        .map(|t| t.strip_suffix('\r').unwrap_or(t))
        .unwrap_or(text)
}

/// Writes `text` to a temporary file next to `path` and renames it over
/// `path`, so readers see either the old or the new content.
///
/// A symlinked `path` is followed: the file it points to is replaced and
/// the link stays in place.
pub fn write_atomic(path: &Path, text: &str) -> Result<()> {
    let resolved = fs::canonicalize(path).unwrap_or_else(|_| path.to_path_buf());
    let dest = resolved.as_path();
    let dir = match dest.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent,
        _ => Path::new("."),
    };
    let write_err = |e: std::io::Error| InlayError::io(IoOp::Write, path, e);

    let mut tmp = NamedTempFile::new_in(dir).map_err(write_err)?;
    tmp.write_all(text.as_bytes()).map_err(write_err)?;
    tmp.as_file().sync_all().map_err(write_err)?;

    // NamedTempFile is created 0600; keep whatever mode the target had.
    if let Ok(meta) = fs::metadata(dest) {
        if let Err(e) = fs::set_permissions(tmp.path(), meta.permissions()) {
            debug!("Could not copy permissions onto {:?}: {}", tmp.path(), e);
        }
    }

    tmp.persist(dest)
        .map_err(|e| InlayError::io(IoOp::Persist, path, e.error))?;
    Ok(())
}

/// Joins `path` onto `base` unless it is already absolute.
pub fn resolve_path(base: &Path, path: &Path) -> PathBuf {
    if path.is_absolute() {
        path.to_path_buf().clean()
    } else {
        base.join(path).clean()
    }
}

fn elide(line: &str) -> String {
    let total = line.chars().count();
    if total <= PREVIEW_LINE_WIDTH {
        return line.to_string();
    }
    let head: String = line.chars().take(PREVIEW_LINE_WIDTH).collect();
    format!("{}... (+{} chars)", head, total - PREVIEW_LINE_WIDTH)
}

/// Line diff between `old` and `new` with one line of context per hunk.
pub fn unified_preview(old: &str, new: &str) -> String {
    let diff = TextDiff::from_lines(old, new);
    let mut out = String::new();
    for (idx, group) in diff.grouped_ops(1).iter().enumerate() {
        if idx > 0 {
            out.push_str("...\n");
        }
        for op in group {
            for change in diff.iter_changes(op) {
                let sign = match change.tag() {
                    ChangeTag::Delete => "-",
                    ChangeTag::Insert => "+",
                    ChangeTag::Equal => " ",
                };
                let line = change.value().trim_end_matches(['\n', '\r']);
                out.push_str(sign);
                out.push_str(&elide(line));
                out.push('\n');
            }
        }
    }
    out
}
