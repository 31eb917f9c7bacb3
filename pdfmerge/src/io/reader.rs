//! PDF reading and loading operations.
//!
//! Documents are parsed on tokio's blocking pool and awaited, so the
//! caller still sees one load at a time in plan order.
//!
//! # Examples
//!
//! ```no_run
//! use pdfmerge::io::reader::PdfReader;
//! use std::path::Path;
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let reader = PdfReader::new();
//! let loaded = reader.load(Path::new("a.pdf")).await?;
//! println!("{} has {} pages", loaded.path.display(), loaded.page_count);
//! # Ok(())
//! # }
//! ```

use lopdf::Document;
use std::path::{Path, PathBuf};
use std::time::{Duration, Instant};
use tokio::task;
use tracing::debug;

use crate::error::{PdfMergeError, Result};

/// A loaded PDF document with metadata.
#[derive(Debug)]
pub struct LoadedPdf {
    /// The PDF document.
    pub document: Document,

    /// Path to the source file.
    pub path: PathBuf,

    /// Number of pages in the document.
    pub page_count: usize,

    /// Time taken to load the document.
    pub load_time: Duration,

    /// File size in bytes.
    pub file_size: u64,
}

/// PDF reader with configurable loading behavior.
#[derive(Debug, Clone)]
pub struct PdfReader {
    /// Reject documents without pages.
    verify: bool,
}

impl PdfReader {
    /// Create a new PDF reader with default settings.
    pub fn new() -> Self {
        Self { verify: true }
    }

    /// Create a reader that accepts documents with an empty page tree.
    pub fn without_verification() -> Self {
        Self { verify: false }
    }

    /// Check that `path` names an existing regular file.
    ///
    /// # Errors
    ///
    /// Returns `FileNotFound` or `NotAFile`, or `FailedToLoadPdf` when the
    /// path cannot be inspected at all.
    pub fn check_path(path: &Path) -> Result<()> {
        let exists = path
            .try_exists()
            .map_err(|e| PdfMergeError::failed_to_load_pdf(path.to_path_buf(), e.to_string()))?;
        if !exists {
            return Err(PdfMergeError::file_not_found(path.to_path_buf()));
        }

        if !path.is_file() {
            return Err(PdfMergeError::not_a_file(path.to_path_buf()));
        }

        Ok(())
    }

    /// Load a single PDF document.
    ///
    /// # Errors
    ///
    /// Returns an error if:
    /// - The file does not exist or is not a file
    /// - The file is not a valid PDF
    /// - The PDF is encrypted
    /// - The PDF has no pages (unless verification is off)
    pub async fn load(&self, path: &Path) -> Result<LoadedPdf> {
        Self::check_path(path)?;

        let path_buf = path.to_path_buf();
        let verify = self.verify;

        task::spawn_blocking(move || Self::load_blocking(path_buf, verify))
            .await
            .map_err(|e| PdfMergeError::other(format!("Load task failed: {e}")))?
    }

    fn load_blocking(path: PathBuf, verify: bool) -> Result<LoadedPdf> {
        let start = Instant::now();

        let document = Document::load(&path).map_err(|e| {
            let err_msg = e.to_string();
            if err_msg.contains("encrypt") || err_msg.contains("password") {
                PdfMergeError::encrypted_pdf(path.clone())
            } else {
                PdfMergeError::failed_to_load_pdf(path.clone(), err_msg)
            }
        })?;

        let page_count = document.get_pages().len();
        if verify && page_count == 0 {
            return Err(PdfMergeError::corrupted_pdf(path, "PDF has no pages"));
        }

        let load_time = start.elapsed();
        let file_size = std::fs::metadata(&path).map(|m| m.len()).unwrap_or(0);

        debug!(path = %path.display(), page_count, ?load_time, "loaded source");

        Ok(LoadedPdf {
            document,
            path,
            page_count,
            load_time,
            file_size,
        })
    }
}

impl Default for PdfReader {
    fn default() -> Self {
        Self::new()
    }
}
