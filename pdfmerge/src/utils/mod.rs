//! Utilities for input expansion, output naming and size formatting.

use crate::{PdfMergeError, Result};
use std::path::{Path, PathBuf};

/// Expand input patterns into paths, keeping the pattern order.
///
/// Each pattern is expanded with `glob`; its matches come back in
/// alphabetical order. A pattern that matches nothing is kept as a literal
/// path so the missing file is reported against its entry at merge time.
///
/// # Errors
///
/// Returns an error if a pattern is malformed or a matched entry cannot be
/// read from the filesystem.
pub fn expand_input_patterns<T>(patterns: T) -> Result<Vec<PathBuf>>
where
    T: IntoIterator,
    T::Item: AsRef<str>,
{
    let mut resolved_paths = Vec::new();

    for pattern in patterns {
        let pattern = pattern.as_ref();
        let matches = expand_pattern(pattern)?;
        if matches.is_empty() {
            resolved_paths.push(PathBuf::from(pattern));
        } else {
            resolved_paths.extend(matches);
        }
    }

    Ok(resolved_paths)
}

fn expand_pattern(pattern: &str) -> Result<Vec<PathBuf>> {
    let paths = glob::glob(pattern).map_err(|err| {
        PdfMergeError::invalid_config(format!("Invalid input pattern '{pattern}': {err}"))
    })?;

    let mut resolved_paths = Vec::new();
    for entry in paths {
        let path = entry.map_err(|err| PdfMergeError::other(err.to_string()))?;
        resolved_paths.push(path);
    }

    Ok(resolved_paths)
}

/// Give `path` a `.pdf` extension unless it already has one.
///
/// The check is case-insensitive, so `Report.PDF` is left alone, while
/// `notes.txt` becomes `notes.txt.pdf`.
pub fn ensure_pdf_extension(path: &Path) -> PathBuf {
    let has_pdf_extension = path
        .extension()
        .is_some_and(|ext| ext.eq_ignore_ascii_case("pdf"));

    if has_pdf_extension {
        return path.to_path_buf();
    }

    let mut with_extension = path.as_os_str().to_owned();
    with_extension.push(".pdf");
    PathBuf::from(with_extension)
}

/// Format a byte count as a human-readable string.
pub fn format_file_size(size: u64) -> String {
    const KB: u64 = 1024;
    const MB: u64 = KB * 1024;
    const GB: u64 = MB * 1024;

    if size >= GB {
        format!("{:.2} GB", size as f64 / GB as f64)
    } else if size >= MB {
        format!("{:.2} MB", size as f64 / MB as f64)
    } else if size >= KB {
        format!("{:.2} KB", size as f64 / KB as f64)
    } else {
        format!("{size} bytes")
    }
}
