//! File naming for generated documents and ZIP packaging of a batch.

use crate::error::MergeError;
use std::io::{Cursor, Write};
use zip::write::FileOptions;
use zip::{CompressionMethod, DateTime, ZipWriter};

const MAX_STEM_CHARS: usize = 64;
const FALLBACK_STEM: &str = "row";

/// Makes a row identifier safe to use as a file name stem.
///
/// Path separators, control characters and characters that are reserved on
/// common file systems are dropped, whitespace runs become `_`, and leading
/// dots are removed so the stem can never name a parent directory. An empty
/// result falls back to `row`.
pub fn sanitize_stem(identifier: &str) -> String {
    let mut out = String::new();
    let mut pending_sep = false;
    for c in identifier.chars() {
        if c.is_whitespace() {
            pending_sep = !out.is_empty();
            continue;
        }
        if c.is_control() || matches!(c, '/' | '\\' | ':' | '*' | '?' | '"' | '<' | '>' | '|') {
            continue;
        }
        if c == '.' && out.is_empty() {
            continue;
        }
        let needed = if pending_sep { 2 } else { 1 };
        if out.chars().count() + needed > MAX_STEM_CHARS {
            break;
        }
        if pending_sep {
            out.push('_');
            pending_sep = false;
        }
        out.push(c);
    }
    if out.is_empty() {
        FALLBACK_STEM.to_string()
    } else {
        out
    }
}

/// `{sanitized identifier}_{row number}.pdf`; the row number keeps names unique.
pub fn entry_name(identifier: &str, row_number: usize) -> String {
    format!("{}_{}.pdf", sanitize_stem(identifier), row_number)
}

/// Packs `(name, bytes)` entries into a ZIP, in the given order.
///
/// Entries get a fixed 1980-01-01 timestamp so the archive only depends on
/// its contents.
pub fn build_archive<'a, I>(entries: I) -> Result<Vec<u8>, MergeError>
where
    I: IntoIterator<Item = (&'a str, &'a [u8])>,
{
    let options = FileOptions::default()
        .compression_method(CompressionMethod::Deflated)
        .last_modified_time(DateTime::default());
    let mut writer = ZipWriter::new(Cursor::new(Vec::new()));
    for (name, bytes) in entries {
        writer.start_file(name, options)?;
        writer
            .write_all(bytes)
            .map_err(|e| MergeError::Archive(e.into()))?;
    }
    Ok(writer.finish()?.into_inner())
}
