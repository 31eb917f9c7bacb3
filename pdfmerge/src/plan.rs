//! The merge plan: an ordered list of documents and their page ranges.
//!
//! The plan is what the user edits before merging. Entries are replaced
//! wholesale when files are selected, reordered one step at a time around a
//! selection cursor, and optionally restricted to a page span. The order of
//! the entries is the page order of the merged output.
//!
//! # Examples
//!
//! ```
//! use pdfmerge::plan::MergePlan;
//!
//! let mut plan = MergePlan::new();
//! plan.replace(["intro.pdf", "body.pdf", "appendix.pdf"]);
//!
//! plan.select(2).unwrap();
//! plan.move_up();
//! assert_eq!(plan.cursor(), Some(1));
//! assert_eq!(plan.entries()[1].path.to_str(), Some("appendix.pdf"));
//!
//! plan.set_page_range(0, "2", "4").unwrap();
//! assert!(plan.entries()[0].page_range.is_some());
//! ```

use serde::Serialize;
use std::path::{Path, PathBuf};

use crate::config::PageSpan;
use crate::error::{PdfMergeError, Result};

/// One source document in the plan.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PlanEntry {
    /// Path of the source PDF. Not checked until merge time.
    pub path: PathBuf,

    /// Pages to take from the source, or `None` for the whole document.
    pub page_range: Option<PageSpan>,
}

impl PlanEntry {
    /// Entry covering the whole document at `path`.
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            page_range: None,
        }
    }

    /// Entry restricted to `span`.
    pub fn with_range(path: impl Into<PathBuf>, span: PageSpan) -> Self {
        Self {
            path: path.into(),
            page_range: Some(span),
        }
    }

    /// File name used when listing the entry.
    pub fn display_name(&self) -> String {
        self.path
            .file_name()
            .map(|name| name.to_string_lossy().into_owned())
            .unwrap_or_else(|| self.path.display().to_string())
    }
}

/// Ordered merge plan with a selection cursor.
///
/// The cursor is `None` exactly when the plan is empty and always points at
/// an existing entry otherwise.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MergePlan {
    entries: Vec<PlanEntry>,
    cursor: Option<usize>,
}

impl MergePlan {
    /// Create an empty plan.
    pub fn new() -> Self {
        Self::default()
    }

    /// Replace the whole plan with one entry per path.
    ///
    /// An empty selection leaves the current plan untouched and returns
    /// `false`. Otherwise every previous entry and page range is discarded and
    /// the cursor goes back to the first entry.
    pub fn replace<I, P>(&mut self, paths: I) -> bool
    where
        I: IntoIterator<Item = P>,
        P: Into<PathBuf>,
    {
        let entries: Vec<PlanEntry> = paths.into_iter().map(PlanEntry::new).collect();
        if entries.is_empty() {
            return false;
        }

        self.entries = entries;
        self.cursor = Some(0);
        true
    }

    /// Append an entry at the end of the plan.
    pub fn push(&mut self, entry: PlanEntry) {
        self.entries.push(entry);
        if self.cursor.is_none() {
            self.cursor = Some(0);
        }
    }

    /// Move the selected entry one position towards the front.
    ///
    /// Returns `false` without changing anything when the first entry is
    /// selected or the plan is empty.
    pub fn move_up(&mut self) -> bool {
        match self.cursor {
            Some(cursor) if cursor > 0 => {
                self.entries.swap(cursor, cursor - 1);
                self.cursor = Some(cursor - 1);
                true
            }
            _ => false,
        }
    }

    /// Move the selected entry one position towards the back.
    ///
    /// Returns `false` without changing anything when the last entry is
    /// selected or the plan is empty.
    pub fn move_down(&mut self) -> bool {
        match self.cursor {
            Some(cursor) if cursor + 1 < self.entries.len() => {
                self.entries.swap(cursor, cursor + 1);
                self.cursor = Some(cursor + 1);
                true
            }
            _ => false,
        }
    }

    /// Put the selection cursor on `index`.
    pub fn select(&mut self, index: usize) -> Result<()> {
        self.check_index(index)?;
        self.cursor = Some(index);
        Ok(())
    }

    /// Attach a page range to the entry at `index` from free-form text.
    ///
    /// Both bounds must be positive integers for the range to apply. Anything
    /// else silently resets the entry to the whole document. Bounds are not
    /// checked against each other or against the document length here.
    pub fn set_page_range(&mut self, index: usize, start: &str, end: &str) -> Result<()> {
        self.check_index(index)?;
        self.entries[index].page_range = PageSpan::parse_bounds(start, end);
        Ok(())
    }

    /// Reset the entry at `index` to the whole document.
    pub fn clear_page_range(&mut self, index: usize) -> Result<()> {
        self.check_index(index)?;
        self.entries[index].page_range = None;
        Ok(())
    }

    /// Entries in merge order.
    pub fn entries(&self) -> &[PlanEntry] {
        &self.entries
    }

    /// Current cursor position.
    pub fn cursor(&self) -> Option<usize> {
        self.cursor
    }

    /// Entry under the cursor.
    pub fn selected(&self) -> Option<&PlanEntry> {
        self.cursor.and_then(|cursor| self.entries.get(cursor))
    }

    /// Number of entries.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether the plan has no entries.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Whether any entry refers to `path`.
    pub fn contains_path(&self, path: &Path) -> bool {
        self.entries.iter().any(|entry| entry.path == path)
    }

    fn check_index(&self, index: usize) -> Result<()> {
        if index < self.entries.len() {
            Ok(())
        } else {
            Err(PdfMergeError::InvalidEntryIndex {
                index,
                len: self.entries.len(),
            })
        }
    }
}
