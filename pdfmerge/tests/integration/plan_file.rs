//! Integration tests for plan files.

use pdfmerge::config::{PageSpan, read_plan_file};
use pdfmerge::error::PdfMergeError;
use pdfmerge::merge::Merger;
use pdfmerge::plan::MergePlan;

use crate::common::{page_markers, scratch_dir, write_pdf};

#[tokio::test]
async fn test_plan_file_drives_merge_order_and_ranges() {
    let dir = scratch_dir();
    write_pdf(dir.path(), "cover.pdf", "c", 1);
    write_pdf(dir.path(), "chapter one.pdf", "one", 5);
    write_pdf(dir.path(), "appendix.pdf", "x", 3);

    let plan_path = dir.path().join("book.plan");
    let base = dir.path().display();
    std::fs::write(
        &plan_path,
        format!(
            "# book layout\n\
             {base}/appendix.pdf 3 3\n\
             \n\
             '{base}/chapter one.pdf' 2 3\n\
             {base}/cover.pdf\n"
        ),
    )
    .unwrap();

    let entries = read_plan_file(&plan_path).await.unwrap();
    assert_eq!(entries.len(), 3);
    assert_eq!(entries[1].page_range, Some(PageSpan { start: 2, end: 3 }));
    assert_eq!(entries[2].page_range, None);

    let mut plan = MergePlan::new();
    for entry in entries {
        plan.push(entry);
    }
    let outcome = Merger::new().merge(&plan).await.unwrap();

    assert_eq!(
        page_markers(&outcome.document),
        vec!["x-3", "one-2", "one-3", "c-1"]
    );
}

#[tokio::test]
async fn test_plan_file_invalid_bounds_mean_whole_document() {
    let dir = scratch_dir();
    let plan_path = dir.path().join("loose.plan");
    std::fs::write(&plan_path, "a.pdf first last\nb.pdf 0 2\n").unwrap();

    let entries = read_plan_file(&plan_path).await.unwrap();
    assert!(entries.iter().all(|entry| entry.page_range.is_none()));
}

#[tokio::test]
async fn test_plan_file_reports_offending_line() {
    let dir = scratch_dir();
    let plan_path = dir.path().join("broken.plan");
    std::fs::write(&plan_path, "# header\na.pdf\nb.pdf 1\n").unwrap();

    let err = read_plan_file(&plan_path).await.unwrap_err();

    match &err {
        PdfMergeError::InvalidPlanFile { line_number, .. } => assert_eq!(*line_number, 3),
        other => panic!("unexpected error: {other}"),
    }
    assert!(err.to_string().contains("line 3"));
}

#[tokio::test]
async fn test_plan_file_unbalanced_quotes() {
    let dir = scratch_dir();
    let plan_path = dir.path().join("quotes.plan");
    std::fs::write(&plan_path, "'a.pdf\n").unwrap();

    assert!(matches!(
        read_plan_file(&plan_path).await,
        Err(PdfMergeError::InvalidPlanFile { line_number: 1, .. })
    ));
}

#[tokio::test]
async fn test_missing_plan_file() {
    let dir = scratch_dir();
    let err = read_plan_file(&dir.path().join("absent.plan"))
        .await
        .unwrap_err();

    assert!(matches!(err, PdfMergeError::FailedToReadPlanFile { .. }));
    assert_eq!(err.exit_code(), 2);
}
