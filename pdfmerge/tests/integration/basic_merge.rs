//! Integration tests for basic PDF merging operations.

use lopdf::Document;
use pdfmerge::config::CompressionLevel;
use pdfmerge::io::PdfWriter;
use pdfmerge::merge::{MergeOptions, Merger, merge_plan};
use pdfmerge::plan::MergePlan;

use crate::common::{markers_in_file, page_markers, scratch_dir, write_pdf};

#[tokio::test]
async fn test_merge_and_save_single_page_files() {
    let dir = scratch_dir();
    let inputs: Vec<_> = ["a", "b", "c"]
        .iter()
        .map(|label| write_pdf(dir.path(), &format!("{label}.pdf"), label, 1))
        .collect();
    let output = dir.path().join("merged.pdf");

    let mut plan = MergePlan::new();
    plan.replace(inputs);
    let outcome = Merger::new().merge(&plan).await.unwrap();
    assert_eq!(outcome.report.total_pages, 3);

    let stats = PdfWriter::new()
        .save_with_stats(outcome.document, &output)
        .await
        .unwrap();

    assert!(stats.file_size > 0);
    assert_eq!(markers_in_file(&output), vec!["a-1", "b-1", "c-1"]);
}

#[tokio::test]
async fn test_merge_multi_page_files() {
    let dir = scratch_dir();
    let first = write_pdf(dir.path(), "first.pdf", "f", 3);
    let second = write_pdf(dir.path(), "second.pdf", "s", 2);

    let mut plan = MergePlan::new();
    plan.replace([first, second]);
    let outcome = Merger::new().merge(&plan).await.unwrap();

    assert_eq!(outcome.report.files_merged, 2);
    assert_eq!(
        page_markers(&outcome.document),
        vec!["f-1", "f-2", "f-3", "s-1", "s-2"]
    );
}

#[tokio::test]
async fn test_reordering_changes_output_order() {
    let dir = scratch_dir();
    let a = write_pdf(dir.path(), "a.pdf", "a", 1);
    let b = write_pdf(dir.path(), "b.pdf", "b", 1);
    let c = write_pdf(dir.path(), "c.pdf", "c", 1);

    let mut plan = MergePlan::new();
    plan.replace([a, b, c]);
    plan.move_down();
    plan.move_down();
    plan.move_down();

    let outcome = Merger::new().merge(&plan).await.unwrap();
    assert_eq!(page_markers(&outcome.document), vec!["b-1", "c-1", "a-1"]);
}

#[tokio::test]
async fn test_merge_without_compression_round_trips() {
    let dir = scratch_dir();
    let a = write_pdf(dir.path(), "a.pdf", "a", 2);
    let output = dir.path().join("plain.pdf");

    let mut plan = MergePlan::new();
    plan.replace([a.clone(), a]);
    let outcome = merge_plan(
        &plan,
        MergeOptions {
            compression: CompressionLevel::None,
            strict: false,
        },
    )
    .await
    .unwrap();
    assert!(!outcome.report.compressed);

    PdfWriter::new().save(outcome.document, &output).await.unwrap();

    let reloaded = Document::load(&output).unwrap();
    assert_eq!(page_markers(&reloaded), vec!["a-1", "a-2", "a-1", "a-2"]);
    for page_id in reloaded.get_pages().into_values() {
        let page = reloaded.get_dictionary(page_id).unwrap();
        assert!(page.has(b"MediaBox"), "inherited MediaBox was lost");
        assert!(page.has(b"Resources"), "inherited Resources were lost");
    }
}
