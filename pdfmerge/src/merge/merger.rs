//! Core PDF merging implementation.
//!
//! The merger folds the plan into a fresh output document one entry at a
//! time. An entry that cannot be opened or spliced is recorded in the report
//! and skipped, so a single bad file does not cost the user the rest of the
//! merge.

use lopdf::{Document, ObjectId};
use serde::{Serialize, Serializer};
use std::path::PathBuf;
use std::time::{Duration, Instant};
use tracing::{debug, info, warn};

use crate::config::{CompressionLevel, Config, PageSpan};
use crate::error::{PdfMergeError, Result};
use crate::io::PdfReader;
use crate::merge::pages::{PageExtractor, empty_document};
use crate::plan::{MergePlan, PlanEntry};
use crate::utils::format_file_size;

/// Options that change how a plan is merged.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct MergeOptions {
    /// Compression applied to the output.
    pub compression: CompressionLevel,

    /// Abort on the first entry that cannot be merged.
    pub strict: bool,
}

impl From<&Config> for MergeOptions {
    fn from(config: &Config) -> Self {
        Self {
            compression: config.compression,
            strict: config.strict,
        }
    }
}

/// What happened to one plan entry.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "status", rename_all = "camelCase", rename_all_fields = "camelCase")]
pub enum EntryStatus {
    /// The entry was opened and its selected pages appended.
    Merged {
        /// Pages appended to the output.
        pages_added: usize,
        /// Pages in the source document.
        source_pages: usize,
        /// The page range selected nothing.
        empty_selection: bool,
    },
    /// The entry was skipped.
    Failed {
        /// Why the entry could not be merged.
        reason: String,
    },
}

/// Outcome of one plan entry.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct EntryReport {
    /// Zero-based position in the plan.
    pub index: usize,

    /// Source path as it appeared in the plan.
    pub path: PathBuf,

    /// Page range the entry carried.
    pub page_range: Option<PageSpan>,

    /// Merged or skipped, with details.
    #[serde(flatten)]
    pub status: EntryStatus,
}

impl EntryReport {
    /// Whether the entry was skipped.
    pub fn is_failure(&self) -> bool {
        matches!(self.status, EntryStatus::Failed { .. })
    }
}

/// Report of a merge run.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MergeReport {
    /// One report per plan entry, in plan order.
    pub entries: Vec<EntryReport>,

    /// Pages in the merged document.
    pub total_pages: usize,

    /// Entries that were merged, including ones that contributed no pages.
    pub files_merged: usize,

    /// Total size of the sources that could be read.
    pub input_size: u64,

    /// Time spent loading sources.
    #[serde(rename = "loadTimeMs", serialize_with = "serialize_millis")]
    pub load_time: Duration,

    /// Time for the whole merge, loading included.
    #[serde(rename = "mergeTimeMs", serialize_with = "serialize_millis")]
    pub merge_time: Duration,

    /// Whether stream compression was applied.
    pub compressed: bool,
}

impl MergeReport {
    /// Entries that were skipped.
    pub fn failures(&self) -> impl Iterator<Item = &EntryReport> {
        self.entries.iter().filter(|entry| entry.is_failure())
    }

    /// Whether any entry was skipped.
    pub fn has_failures(&self) -> bool {
        self.failures().next().is_some()
    }

    /// Format input size as human-readable string.
    pub fn format_input_size(&self) -> String {
        format_file_size(self.input_size)
    }

    /// Pretty-printed JSON form of the report.
    pub fn to_json(&self) -> Result<String> {
        serde_json::to_string_pretty(self)
            .map_err(|e| PdfMergeError::other(format!("Failed to serialise report: {e}")))
    }
}

fn serialize_millis<S>(duration: &Duration, serializer: S) -> std::result::Result<S::Ok, S::Error>
where
    S: Serializer,
{
    serializer.serialize_u64(duration.as_millis().try_into().unwrap_or(u64::MAX))
}

/// Result of a merge operation.
pub struct MergeOutcome {
    /// The merged PDF document. May have zero pages.
    pub document: Document,

    /// Per-entry outcome and totals.
    pub report: MergeReport,
}

struct AppendedEntry {
    pages_added: usize,
    source_pages: usize,
    load_time: Duration,
    file_size: u64,
}

/// PDF merger that combines the entries of a plan.
pub struct Merger {
    /// Reader for loading PDFs.
    reader: PdfReader,

    /// Page extractor for page operations.
    page_extractor: PageExtractor,

    options: MergeOptions,
}

impl Merger {
    /// Create a new merger with default settings.
    pub fn new() -> Self {
        Self::with_options(MergeOptions::default())
    }

    /// Create a merger with custom options.
    pub fn with_options(options: MergeOptions) -> Self {
        Self {
            // Sources with an empty page tree contribute nothing rather than fail.
            reader: PdfReader::without_verification(),
            page_extractor: PageExtractor::new(),
            options,
        }
    }

    /// Merge the entries of `plan`, in order, into a new document.
    ///
    /// Each entry contributes the pages its range selects, or all of its
    /// pages when it has none. Entries are loaded one after another.
    ///
    /// # Errors
    ///
    /// Returns `NoFilesToMerge` for an empty plan. A failing entry is only an
    /// error in strict mode; otherwise it is recorded in the report.
    ///
    /// # Examples
    ///
    /// ```no_run
    /// # use pdfmerge::merge::Merger;
    /// # use pdfmerge::plan::MergePlan;
    /// # async fn example(plan: MergePlan) -> Result<(), Box<dyn std::error::Error>> {
    /// let outcome = Merger::new().merge(&plan).await?;
    /// println!("Merged {} files into {} pages",
    ///          outcome.report.files_merged,
    ///          outcome.report.total_pages);
    /// # Ok(())
    /// # }
    /// ```
    pub async fn merge(&self, plan: &MergePlan) -> Result<MergeOutcome> {
        if plan.is_empty() {
            return Err(PdfMergeError::NoFilesToMerge);
        }

        let merge_start = Instant::now();
        let mut merged = empty_document();
        let mut entries = Vec::with_capacity(plan.len());
        let mut load_time = Duration::ZERO;
        let mut input_size = 0;

        for (index, entry) in plan.entries().iter().enumerate() {
            let status = match self.append_entry(&mut merged, entry).await {
                Ok(appended) => {
                    load_time += appended.load_time;
                    input_size += appended.file_size;
                    debug!(
                        index,
                        path = %entry.path.display(),
                        pages = appended.pages_added,
                        "appended entry"
                    );
                    EntryStatus::Merged {
                        pages_added: appended.pages_added,
                        source_pages: appended.source_pages,
                        empty_selection: appended.pages_added == 0,
                    }
                }
                Err(err) if self.options.strict => return Err(err),
                Err(err) => {
                    warn!(index, path = %entry.path.display(), error = %err, "skipping entry");
                    EntryStatus::Failed {
                        reason: err.to_string(),
                    }
                }
            };

            entries.push(EntryReport {
                index,
                path: entry.path.clone(),
                page_range: entry.page_range,
                status,
            });
        }

        self.finish(&mut merged);

        let report = MergeReport {
            total_pages: self.page_extractor.page_count(&merged),
            files_merged: entries.iter().filter(|e| !e.is_failure()).count(),
            entries,
            input_size,
            load_time,
            merge_time: merge_start.elapsed(),
            compressed: self.options.compression != CompressionLevel::None,
        };

        info!(
            files = report.files_merged,
            pages = report.total_pages,
            failures = report.failures().count(),
            "merge finished"
        );

        Ok(MergeOutcome {
            document: merged,
            report,
        })
    }

    /// Load one entry and splice its selected pages onto `merged`.
    async fn append_entry(&self, merged: &mut Document, entry: &PlanEntry) -> Result<AppendedEntry> {
        let loaded = self.reader.load(&entry.path).await?;
        let mut source = loaded.document;

        // Renumber objects to avoid ID conflicts
        source.renumber_objects_with(merged.max_id + 1);

        let page_ids = self
            .page_extractor
            .select_pages(&source, entry.page_range.as_ref());
        for &page_id in &page_ids {
            self.page_extractor.flatten_inherited(&mut source, page_id)?;
        }

        merged.max_id = merged.max_id.max(source.max_id);
        merged.objects.extend(source.objects);
        self.page_extractor.append_to_tree(merged, &page_ids)?;

        Ok(AppendedEntry {
            pages_added: page_ids.len(),
            source_pages: loaded.page_count,
            load_time: loaded.load_time,
            file_size: loaded.file_size,
        })
    }

    /// Drop what no page references any more, then compress and renumber.
    fn finish(&self, merged: &mut Document) {
        if self.options.compression == CompressionLevel::Maximum {
            strip_thumbnails(merged);
        }

        // Unselected pages and the source page trees are unreachable now.
        merged.prune_objects();

        if self.options.compression != CompressionLevel::None {
            merged.compress();
        }

        merged.renumber_objects();
    }
}

impl Default for Merger {
    fn default() -> Self {
        Self::new()
    }
}

fn strip_thumbnails(doc: &mut Document) {
    let page_ids: Vec<ObjectId> = doc.get_pages().into_values().collect();
    for page_id in page_ids {
        if let Ok(page) = doc.get_dictionary_mut(page_id) {
            page.remove(b"Thumb");
        }
    }
}

/// Merge `plan` with the given options.
pub async fn merge_plan(plan: &MergePlan, options: MergeOptions) -> Result<MergeOutcome> {
    Merger::with_options(options).merge(plan).await
}
