//! PDF merge operations.
//!
//! This module contains the merge executor that folds a [`MergePlan`] into a
//! single output document, and the page tree helpers it is built on.
//!
//! [`MergePlan`]: crate::plan::MergePlan

pub mod merger;
pub mod pages;

pub use merger::{
    EntryReport, EntryStatus, MergeOptions, MergeOutcome, MergeReport, Merger, merge_plan,
};
pub use pages::PageExtractor;
