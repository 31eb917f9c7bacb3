//! Integration tests for error handling and edge cases.

use pdfmerge::config::Config;
use pdfmerge::error::PdfMergeError;
use pdfmerge::io::PdfWriter;
use pdfmerge::merge::{EntryStatus, MergeOptions, Merger};
use pdfmerge::plan::MergePlan;

use crate::common::{page_markers, scratch_dir, write_pdf};

#[tokio::test]
async fn test_empty_plan_is_rejected() {
    let result = Merger::new().merge(&MergePlan::new()).await;
    assert!(matches!(result, Err(PdfMergeError::NoFilesToMerge)));

    let config = Config::new(MergePlan::new(), "out.pdf");
    assert!(matches!(
        config.validate(),
        Err(PdfMergeError::NoFilesToMerge)
    ));
}

#[tokio::test]
async fn test_missing_file_is_skipped_and_named() {
    let dir = scratch_dir();
    let valid = write_pdf(dir.path(), "valid.pdf", "v", 2);
    let missing = dir.path().join("does-not-exist.pdf");

    let mut plan = MergePlan::new();
    plan.replace([valid, missing.clone()]);
    let outcome = Merger::new().merge(&plan).await.unwrap();

    assert_eq!(page_markers(&outcome.document), vec!["v-1", "v-2"]);

    let failures: Vec<_> = outcome.report.failures().collect();
    assert_eq!(failures.len(), 1);
    assert_eq!(failures[0].index, 1);
    assert_eq!(failures[0].path, missing);
    let EntryStatus::Failed { reason } = &failures[0].status else {
        panic!("expected a failure");
    };
    assert!(reason.contains("does-not-exist.pdf"));
}

#[tokio::test]
async fn test_invalid_pdf_is_skipped() {
    let dir = scratch_dir();
    let garbage = dir.path().join("garbage.pdf");
    std::fs::write(&garbage, b"this is not a pdf at all").unwrap();
    let valid = write_pdf(dir.path(), "valid.pdf", "v", 1);

    let mut plan = MergePlan::new();
    plan.replace([garbage, valid]);
    let outcome = Merger::new().merge(&plan).await.unwrap();

    assert_eq!(outcome.report.files_merged, 1);
    assert_eq!(page_markers(&outcome.document), vec!["v-1"]);
    assert!(outcome.report.entries[0].is_failure());
}

#[tokio::test]
async fn test_directory_entry_is_skipped() {
    let dir = scratch_dir();
    let valid = write_pdf(dir.path(), "valid.pdf", "v", 1);

    let mut plan = MergePlan::new();
    plan.replace([dir.path().to_path_buf(), valid]);
    let outcome = Merger::new().merge(&plan).await.unwrap();

    assert_eq!(outcome.report.total_pages, 1);
    let EntryStatus::Failed { reason } = &outcome.report.entries[0].status else {
        panic!("expected a failure");
    };
    assert!(reason.contains("Not a file"));
}

#[tokio::test]
async fn test_path_below_a_file_is_skipped_and_named() {
    let dir = scratch_dir();
    let valid = write_pdf(dir.path(), "valid.pdf", "v", 1);
    let below_file = valid.join("child.pdf");

    let mut plan = MergePlan::new();
    plan.replace([below_file, valid]);
    let outcome = Merger::new().merge(&plan).await.unwrap();

    assert_eq!(page_markers(&outcome.document), vec!["v-1"]);
    let EntryStatus::Failed { reason } = &outcome.report.entries[0].status else {
        panic!("expected a failure");
    };
    assert!(reason.contains("child.pdf"));
}

#[tokio::test]
async fn test_strict_merge_stops_at_first_failure() {
    let dir = scratch_dir();
    let missing = dir.path().join("missing.pdf");
    let valid = write_pdf(dir.path(), "valid.pdf", "v", 1);

    let mut plan = MergePlan::new();
    plan.replace([missing, valid]);
    let result = Merger::with_options(MergeOptions {
        strict: true,
        ..Default::default()
    })
    .merge(&plan)
    .await;

    assert!(matches!(result, Err(PdfMergeError::FileNotFound { .. })));
}

#[tokio::test]
async fn test_save_failure_names_output_path() {
    let dir = scratch_dir();
    let valid = write_pdf(dir.path(), "valid.pdf", "v", 1);
    let output = dir.path().join("no-such-dir").join("out.pdf");

    let mut plan = MergePlan::new();
    plan.replace([valid]);
    let outcome = Merger::new().merge(&plan).await.unwrap();

    let err = PdfWriter::new()
        .save(outcome.document, &output)
        .await
        .unwrap_err();

    assert!(err.is_save_failure());
    assert!(err.to_string().contains("out.pdf"));
    assert!(!output.exists());
}

#[test]
fn test_out_of_range_entry_index() {
    let mut plan = MergePlan::new();
    plan.replace(["a.pdf", "b.pdf"]);

    assert!(matches!(
        plan.set_page_range(2, "1", "2"),
        Err(PdfMergeError::InvalidEntryIndex { index: 2, len: 2 })
    ));
    assert!(plan.select(5).is_err());
    assert_eq!(plan.cursor(), Some(0));
}

#[test]
fn test_output_must_differ_from_inputs() {
    let mut plan = MergePlan::new();
    plan.replace(["a.pdf", "b.pdf"]);

    let config = Config::new(plan, "b.pdf");
    assert!(matches!(
        config.validate(),
        Err(PdfMergeError::InvalidConfig { .. })
    ));
}
