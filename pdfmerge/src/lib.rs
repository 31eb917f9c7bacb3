//! pdfmerge - Combine selected pages of several PDF files into one document.
//!
//! The user builds a merge plan: an ordered list of source documents, each
//! optionally restricted to a page range. The plan can be reordered around a
//! selection cursor, previewed page by page, and finally merged into a single
//! PDF. It supports:
//!
//! - Plan editing (replace, move up, move down, page ranges)
//! - Merging with per-entry failure reporting
//! - Page previews rendered to PNG
//! - An interactive line-based session
//!
//! # Examples
//!
//! ## Basic Merge
//!
//! ```no_run
//! use pdfmerge::io::PdfWriter;
//! use pdfmerge::merge::Merger;
//! use pdfmerge::plan::MergePlan;
//! use std::path::Path;
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let mut plan = MergePlan::new();
//! plan.replace(["cover.pdf", "report.pdf"]);
//! plan.set_page_range(1, "3", "10")?;
//!
//! let outcome = Merger::new().merge(&plan).await?;
//! for failure in outcome.report.failures() {
//!     eprintln!("skipped {}", failure.path.display());
//! }
//!
//! PdfWriter::new()
//!     .save(outcome.document, Path::new("merged.pdf"))
//!     .await?;
//! # Ok(())
//! # }
//! ```
//!
//! ## Previewing an Entry
//!
//! ```no_run
//! use pdfmerge::preview::PreviewRenderer;
//! use std::path::Path;
//!
//! # fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let renderer = PreviewRenderer::system()?;
//! let pages = renderer.render(Path::new("report.pdf"), None)?;
//! PreviewRenderer::write_png(&pages, Path::new("previews"), "report")?;
//! # Ok(())
//! # }
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod config;
pub mod error;
pub mod io;
pub mod merge;
pub mod output;
pub mod plan;
pub mod preview;
pub mod session;
pub mod utils;

// Re-export commonly used types
pub use config::Config;
pub use error::{PdfMergeError, Result};
pub use plan::{MergePlan, PlanEntry};

/// Library version.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Library name.
pub const NAME: &str = env!("CARGO_PKG_NAME");
