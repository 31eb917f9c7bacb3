//! Configuration module for pdfmerge.
//!
//! This module turns command-line input into a validated configuration that
//! drives a merge. It handles:
//! - Page span parsing with silent fallback to the whole document
//! - `N:FROM-TO` range assignments given on the command line
//! - Plan files listing entries one per line
//! - Validation of option combinations

use anyhow::{Context, bail};
use serde::Serialize;
use std::path::{Path, PathBuf};
use std::str::FromStr;
use tokio::io::{AsyncBufReadExt, BufReader};

use crate::PdfMergeError;
use crate::plan::{MergePlan, PlanEntry};

/// Compression level for the output PDF.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum CompressionLevel {
    /// Keep streams as they come from the sources.
    None,
    /// Compress uncompressed streams.
    #[default]
    Standard,
    /// Compress streams and drop embedded page thumbnails.
    Maximum,
}

impl FromStr for CompressionLevel {
    type Err = PdfMergeError;

    fn from_str(s: &str) -> crate::Result<Self> {
        match s.to_lowercase().as_str() {
            "none" => Ok(Self::None),
            "standard" => Ok(Self::Standard),
            "maximum" => Ok(Self::Maximum),
            _ => Err(PdfMergeError::invalid_config(format!(
                "Invalid compression level: {s}. Must be one of: none, standard, maximum"
            ))),
        }
    }
}

/// A 1-based inclusive page span attached to a plan entry.
///
/// `start` and `end` are both at least 1. Nothing else is guaranteed: a span
/// may end before it starts or past the end of its document, in which case
/// it selects fewer pages (possibly none) when applied.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub struct PageSpan {
    /// First page, 1-based.
    pub start: u32,
    /// Last page, 1-based and inclusive.
    pub end: u32,
}

impl PageSpan {
    /// Parse span bounds typed by the user.
    ///
    /// Returns `None` unless both bounds are positive base-10 integers.
    /// Only ASCII digits count: whitespace, signs, `0` and anything else
    /// are not accepted.
    ///
    /// # Examples
    ///
    /// ```
    /// use pdfmerge::config::PageSpan;
    ///
    /// assert_eq!(PageSpan::parse_bounds("2", "4"), Some(PageSpan { start: 2, end: 4 }));
    /// assert_eq!(PageSpan::parse_bounds("2", ""), None);
    /// assert_eq!(PageSpan::parse_bounds("x", "4"), None);
    /// ```
    pub fn parse_bounds(start: &str, end: &str) -> Option<Self> {
        Some(Self {
            start: parse_page_number(start)?,
            end: parse_page_number(end)?,
        })
    }

    /// Zero-based half-open page indices selected from a document.
    ///
    /// The start is clamped to the first page and the end to `page_count`.
    /// An empty range means the span selects nothing.
    pub fn clamp_to(&self, page_count: usize) -> std::ops::Range<usize> {
        let start = (self.start as usize).saturating_sub(1);
        let end = (self.end as usize).min(page_count);
        if start >= end { start..start } else { start..end }
    }
}

impl std::fmt::Display for PageSpan {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}-{}", self.start, self.end)
    }
}

/// Zero-based page indices an entry contributes, given its optional span.
pub fn page_selection(span: Option<&PageSpan>, page_count: usize) -> std::ops::Range<usize> {
    match span {
        Some(span) => span.clamp_to(page_count),
        None => 0..page_count,
    }
}

fn is_plain_number(text: &str) -> bool {
    !text.is_empty() && text.bytes().all(|b| b.is_ascii_digit())
}

fn parse_page_number(text: &str) -> Option<u32> {
    if !is_plain_number(text) {
        return None;
    }
    text.parse::<u32>().ok().filter(|&page| page > 0)
}

/// Turn a 1-based entry number typed by the user into a zero-based index.
///
/// Accepts the same plain digit strings as page bounds.
pub(crate) fn parse_entry_number(text: &str) -> anyhow::Result<usize> {
    if !is_plain_number(text) {
        bail!("Invalid entry number: {text}");
    }
    let number: usize = text
        .parse()
        .with_context(|| format!("Invalid entry number: {text}"))?;
    if number == 0 {
        bail!("Entry numbers start at 1");
    }
    Ok(number - 1)
}

/// A page range typed for one entry on the command line, `N:FROM-TO`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RangeAssignment {
    /// Zero-based entry index.
    pub index: usize,
    /// Raw start text.
    pub from: String,
    /// Raw end text.
    pub to: String,
}

impl RangeAssignment {
    /// Parse an `N:FROM-TO` assignment.
    ///
    /// `N` is the 1-based entry number and must be valid. `FROM` and `TO` are
    /// free text and are only interpreted when applied to a plan.
    ///
    /// # Examples
    ///
    /// ```
    /// use pdfmerge::config::RangeAssignment;
    ///
    /// let assignment = RangeAssignment::parse("2:3-7").unwrap();
    /// assert_eq!(assignment.index, 1);
    /// assert_eq!(assignment.from, "3");
    /// assert_eq!(assignment.to, "7");
    /// ```
    pub fn parse(s: &str) -> anyhow::Result<Self> {
        let Some((entry, span)) = s.split_once(':') else {
            bail!("Invalid range assignment: {s}. Expected format like '2:3-7'");
        };

        let index = parse_entry_number(entry)?;

        let Some((from, to)) = span.split_once('-') else {
            bail!("Invalid page span: {span}. Expected format like '3-7'");
        };

        Ok(Self {
            index,
            from: from.to_string(),
            to: to.to_string(),
        })
    }

    /// Apply the assignment to `plan`.
    pub fn apply(&self, plan: &mut MergePlan) -> crate::Result<()> {
        plan.set_page_range(self.index, &self.from, &self.to)
    }
}

/// Output file overwrite behavior.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum OverwriteMode {
    /// Prompt the user before overwriting (default).
    #[default]
    Prompt,
    /// Always overwrite without prompting.
    Force,
    /// Never overwrite, error if file exists.
    NoClobber,
}

/// Complete configuration for a merge run.
#[derive(Debug, Clone)]
pub struct Config {
    /// Entries to merge, in order.
    pub plan: MergePlan,

    /// Output PDF file path.
    pub output: PathBuf,

    /// Merge in memory and report, without writing.
    pub dry_run: bool,

    /// Verbose output mode.
    pub verbose: bool,

    /// Quiet mode - suppress non-error output.
    pub quiet: bool,

    /// File overwrite behavior.
    pub overwrite_mode: OverwriteMode,

    /// Compression level for output.
    pub compression: CompressionLevel,

    /// Abort on the first entry that cannot be merged.
    pub strict: bool,

    /// Where to write a JSON merge report, if anywhere.
    pub report: Option<PathBuf>,
}

impl Config {
    /// Configuration with defaults for everything but the plan and output.
    pub fn new(plan: MergePlan, output: impl Into<PathBuf>) -> Self {
        Self {
            plan,
            output: output.into(),
            dry_run: false,
            verbose: false,
            quiet: false,
            overwrite_mode: OverwriteMode::default(),
            compression: CompressionLevel::default(),
            strict: false,
            report: None,
        }
    }

    /// Validate the configuration.
    ///
    /// # Errors
    ///
    /// Returns an error if:
    /// - The plan is empty
    /// - Verbose and quiet modes are both enabled
    /// - The output path is also one of the inputs
    pub fn validate(&self) -> crate::Result<()> {
        if self.plan.is_empty() {
            return Err(PdfMergeError::NoFilesToMerge);
        }

        if self.verbose && self.quiet {
            return Err(PdfMergeError::invalid_config(
                "Cannot use both --verbose and --quiet",
            ));
        }

        if self.plan.contains_path(&self.output) {
            return Err(PdfMergeError::invalid_config(format!(
                "Output file cannot be the same as an input file: {}",
                self.output.display()
            )));
        }

        Ok(())
    }

    /// Check if output should be displayed.
    ///
    /// Returns false if in quiet mode and not doing a dry run.
    pub fn should_print(&self) -> bool {
        !self.quiet || self.dry_run
    }
}

/// Read plan entries from a file.
///
/// Each non-empty line that does not start with `#` holds a path, optionally
/// followed by the start and end of a page range: `chapter1.pdf 3 10`. Lines
/// are split like a shell would, so paths with spaces can be quoted. Range
/// bounds follow the same silent fallback as [`MergePlan::set_page_range`].
///
/// # Errors
///
/// Returns an error if the file cannot be read, a line has unbalanced
/// quotes, or a line has a number of fields other than one or three.
pub async fn read_plan_file(path: &Path) -> crate::Result<Vec<PlanEntry>> {
    let read_err = |source| PdfMergeError::FailedToReadPlanFile {
        path: path.to_path_buf(),
        source,
    };

    let file = tokio::fs::File::open(path).await.map_err(read_err)?;
    let mut lines = BufReader::new(file).lines();
    let mut entries = Vec::new();
    let mut line_number = 0;

    while let Some(line) = lines.next_line().await.map_err(read_err)? {
        line_number += 1;
        let line = line.trim();

        if line.is_empty() || line.starts_with('#') {
            continue;
        }

        let entry = parse_plan_line(line).map_err(|err| PdfMergeError::InvalidPlanFile {
            path: path.to_path_buf(),
            line_number,
            details: format!("{err:#}"),
        })?;
        entries.push(entry);
    }

    Ok(entries)
}

fn parse_plan_line(line: &str) -> anyhow::Result<PlanEntry> {
    let fields = shell_words::split(line).context("Unbalanced quotes")?;

    match fields.as_slice() {
        [path] => Ok(PlanEntry::new(path)),
        [path, from, to] => Ok(PlanEntry {
            path: PathBuf::from(path),
            page_range: PageSpan::parse_bounds(from, to),
        }),
        _ => bail!(
            "Expected 'PATH' or 'PATH FROM TO', found {} fields",
            fields.len()
        ),
    }
}
