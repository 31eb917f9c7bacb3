//! Output formatting and display for pdfmerge.
//!
//! This module handles all user-facing output including:
//! - Formatted status messages
//! - Plan listings
//! - Merge summaries and skipped-entry warnings
//! - Quiet and verbose modes
//!
//! # Examples
//!
//! ```no_run
//! use pdfmerge::output::OutputFormatter;
//! use pdfmerge::config::Config;
//!
//! # fn example(config: Config) {
//! let formatter = OutputFormatter::from_config(&config);
//! formatter.info("Starting merge operation");
//! formatter.success("Merge completed successfully");
//! # }
//! ```

pub mod formatter;

pub use formatter::{MessageLevel, OutputFormatter};

use crate::io::WriteStatistics;
use crate::merge::{EntryStatus, MergeReport};
use crate::plan::{MergePlan, PlanEntry};

/// One-line description of a plan entry.
pub fn describe_entry(entry: &PlanEntry) -> String {
    match entry.page_range {
        Some(span) => format!("{} (pages {span})", entry.display_name()),
        None => format!("{} (all pages)", entry.display_name()),
    }
}

/// List the entries of a plan, flagging the selected one.
pub fn display_plan(formatter: &OutputFormatter, plan: &MergePlan) {
    if plan.is_empty() {
        formatter.info("The plan is empty");
        return;
    }

    for (index, entry) in plan.entries().iter().enumerate() {
        let marker = if plan.cursor() == Some(index) { '>' } else { ' ' };
        formatter.list_item(marker, index + 1, &describe_entry(entry));
    }
}

/// Display the outcome of a merge to the user.
///
/// Skipped entries are warned about even in quiet mode.
pub fn display_merge_report(formatter: &OutputFormatter, report: &MergeReport) {
    for entry in &report.entries {
        match &entry.status {
            EntryStatus::Failed { reason } => formatter.warning(&format!(
                "Skipped entry {} ({}): {reason}",
                entry.index + 1,
                entry.path.display()
            )),
            EntryStatus::Merged {
                empty_selection: true,
                source_pages,
                ..
            } => formatter.warning(&format!(
                "Entry {} ({}) selected no pages; the document has {source_pages}",
                entry.index + 1,
                entry.path.display()
            )),
            EntryStatus::Merged { pages_added, .. } => formatter.debug(&format!(
                "{}: {pages_added} page(s)",
                entry.path.display()
            )),
        }
    }

    formatter.info(&format!(
        "Merged {} file(s) into {} pages in {:.2}s",
        report.files_merged,
        report.total_pages,
        report.merge_time.as_secs_f64()
    ));
}

/// Display detailed statistics for a written merge.
///
/// Only shown in verbose mode.
pub fn display_statistics(
    formatter: &OutputFormatter,
    report: &MergeReport,
    write_stats: &WriteStatistics,
) {
    if !formatter.is_verbose() {
        return;
    }

    formatter.section("Statistics");
    formatter.detail("Input files", &report.files_merged.to_string());
    formatter.detail("Skipped entries", &report.failures().count().to_string());
    formatter.detail("Total pages", &report.total_pages.to_string());
    formatter.detail("Input size", &report.format_input_size());
    formatter.detail("Output size", &write_stats.format_file_size());
    formatter.detail(
        "Load time",
        &format!("{:.2}s", report.load_time.as_secs_f64()),
    );
    formatter.detail(
        "Merge time",
        &format!("{:.2}s", report.merge_time.as_secs_f64()),
    );
    formatter.detail(
        "Write time",
        &format!("{:.2}s", write_stats.write_time.as_secs_f64()),
    );
    formatter.detail(
        "Compression",
        if report.compressed { "Yes" } else { "No" },
    );
}
