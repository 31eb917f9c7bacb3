//! Integration tests for per-entry page ranges.

use pdfmerge::config::RangeAssignment;
use pdfmerge::merge::{EntryStatus, Merger};
use pdfmerge::plan::MergePlan;
use rstest::rstest;

use crate::common::{page_markers, scratch_dir, write_pdf};

#[rstest]
#[case::inside("2", "4", &["t-2", "t-3", "t-4"])]
#[case::single_page("5", "5", &["t-5"])]
#[case::end_clamped("9", "40", &["t-9", "t-10"])]
#[tokio::test]
async fn test_range_selects_pages(
    #[case] from: &str,
    #[case] to: &str,
    #[case] expected: &[&str],
) {
    let dir = scratch_dir();
    let path = write_pdf(dir.path(), "ten.pdf", "t", 10);

    let mut plan = MergePlan::new();
    plan.replace([path]);
    plan.set_page_range(0, from, to).unwrap();

    let outcome = Merger::new().merge(&plan).await.unwrap();
    assert_eq!(page_markers(&outcome.document), expected);
}

#[rstest]
#[case::non_numeric("abc", "3")]
#[case::empty_end("2", "")]
#[case::zero("0", "3")]
#[case::negative("-1", "3")]
#[case::decimal("1.5", "3")]
#[case::padded(" 3", "4 ")]
#[case::plus_sign("+2", "3")]
#[tokio::test]
async fn test_invalid_bounds_merge_whole_document(#[case] from: &str, #[case] to: &str) {
    let dir = scratch_dir();
    let path = write_pdf(dir.path(), "five.pdf", "f", 5);

    let mut plan = MergePlan::new();
    plan.replace([path]);
    plan.set_page_range(0, from, to).unwrap();
    assert_eq!(plan.entries()[0].page_range, None);

    let outcome = Merger::new().merge(&plan).await.unwrap();
    assert_eq!(outcome.report.total_pages, 5);
}

#[rstest]
#[case::start_past_end("7", "9")]
#[case::reversed("4", "2")]
#[tokio::test]
async fn test_empty_selection_is_not_an_error(#[case] from: &str, #[case] to: &str) {
    let dir = scratch_dir();
    let short = write_pdf(dir.path(), "short.pdf", "s", 5);
    let other = write_pdf(dir.path(), "other.pdf", "o", 1);

    let mut plan = MergePlan::new();
    plan.replace([short, other]);
    plan.set_page_range(0, from, to).unwrap();

    let outcome = Merger::new().merge(&plan).await.unwrap();

    assert_eq!(page_markers(&outcome.document), vec!["o-1"]);
    assert!(!outcome.report.has_failures());
    assert!(matches!(
        outcome.report.entries[0].status,
        EntryStatus::Merged {
            pages_added: 0,
            empty_selection: true,
            ..
        }
    ));
}

#[tokio::test]
async fn test_ranges_follow_their_entries_when_reordered() {
    let dir = scratch_dir();
    let a = write_pdf(dir.path(), "a.pdf", "a", 4);
    let b = write_pdf(dir.path(), "b.pdf", "b", 4);

    let mut plan = MergePlan::new();
    plan.replace([a, b]);
    plan.set_page_range(0, "1", "2").unwrap();
    plan.set_page_range(1, "4", "4").unwrap();
    plan.select(1).unwrap();
    plan.move_up();

    let outcome = Merger::new().merge(&plan).await.unwrap();
    assert_eq!(page_markers(&outcome.document), vec!["b-4", "a-1", "a-2"]);
}

#[tokio::test]
async fn test_replace_discards_previous_ranges() {
    let dir = scratch_dir();
    let a = write_pdf(dir.path(), "a.pdf", "a", 3);

    let mut plan = MergePlan::new();
    plan.replace([a.clone()]);
    plan.set_page_range(0, "2", "2").unwrap();
    plan.replace([a]);

    let outcome = Merger::new().merge(&plan).await.unwrap();
    assert_eq!(outcome.report.total_pages, 3);
}

#[tokio::test]
async fn test_range_assignment_from_command_line_text() {
    let dir = scratch_dir();
    let a = write_pdf(dir.path(), "a.pdf", "a", 2);
    let b = write_pdf(dir.path(), "b.pdf", "b", 6);

    let mut plan = MergePlan::new();
    plan.replace([a, b]);
    RangeAssignment::parse("2:5-6")
        .unwrap()
        .apply(&mut plan)
        .unwrap();

    let outcome = Merger::new().merge(&plan).await.unwrap();
    assert_eq!(
        page_markers(&outcome.document),
        vec!["a-1", "a-2", "b-5", "b-6"]
    );
}
