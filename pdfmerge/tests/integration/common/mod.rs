//! Shared helpers for the integration tests.
//!
//! PDFs are generated on the fly. Every page carries a `Marker` string such as
//! `b-2` (document label, page number) so tests can check which pages ended up
//! in a merged document and in which order.

#![allow(dead_code)]

use lopdf::{Document, Object, dictionary};
use std::path::{Path, PathBuf};
use tempfile::TempDir;

/// Create a scratch directory that is removed when dropped.
pub fn scratch_dir() -> TempDir {
    TempDir::new().expect("Failed to create temp dir")
}

/// Write a PDF with `pages` pages labelled `label` into `dir`.
pub fn write_pdf(dir: &Path, name: &str, label: &str, pages: usize) -> PathBuf {
    let mut doc = Document::with_version("1.5");
    let pages_id = doc.new_object_id();
    let resources_id = doc.add_object(dictionary! {
        "ProcSet" => vec![Object::Name(b"PDF".to_vec())],
    });

    let kids: Vec<Object> = (1..=pages)
        .map(|number| {
            let page = dictionary! {
                "Type" => "Page",
                "Parent" => pages_id,
                "Marker" => Object::string_literal(format!("{label}-{number}")),
            };
            doc.add_object(page).into()
        })
        .collect();

    doc.objects.insert(
        pages_id,
        dictionary! {
            "Type" => "Pages",
            "Kids" => kids,
            "Count" => pages as i64,
            "MediaBox" => vec![0.into(), 0.into(), 595.into(), 842.into()],
            "Resources" => resources_id,
        }
        .into(),
    );

    let catalog_id = doc.add_object(dictionary! {
        "Type" => "Catalog",
        "Pages" => pages_id,
    });
    doc.trailer.set("Root", catalog_id);

    let path = dir.join(name);
    doc.save(&path).expect("Failed to write test PDF");
    path
}

/// Page markers of a document, in page order.
pub fn page_markers(doc: &Document) -> Vec<String> {
    doc.get_pages()
        .values()
        .map(|&id| match doc.get_dictionary(id).and_then(|d| d.get(b"Marker")) {
            Ok(Object::String(bytes, _)) => String::from_utf8_lossy(bytes).into_owned(),
            _ => String::new(),
        })
        .collect()
}

/// Page markers of the PDF saved at `path`.
pub fn markers_in_file(path: &Path) -> Vec<String> {
    let doc = Document::load(path).expect("Failed to reload merged PDF");
    page_markers(&doc)
}
