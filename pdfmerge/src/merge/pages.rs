//! Page selection and page tree surgery.
//!
//! This module handles page-level operations including:
//! - Picking the pages an entry contributes
//! - Pulling inherited attributes down onto individual pages
//! - Building and extending the output page tree

use lopdf::{Dictionary, Document, Object, ObjectId, dictionary};

use crate::config::{PageSpan, page_selection};
use crate::error::{PdfMergeError, Result};

/// Page attributes a page may inherit from its ancestors in the page tree.
const INHERITABLE_KEYS: [&[u8]; 4] = [b"Resources", b"MediaBox", b"CropBox", b"Rotate"];

/// Guards against cyclic `Parent` chains in damaged files.
const MAX_TREE_DEPTH: usize = 64;

/// Picks pages out of source documents and grafts them onto an output tree.
pub struct PageExtractor;

impl PageExtractor {
    /// Create a new page extractor.
    pub fn new() -> Self {
        Self
    }

    /// Object ids of the pages `span` selects from `doc`, in page order.
    ///
    /// Without a span every page is selected. A span reaching past the end
    /// of the document is clamped; one that starts past it selects nothing.
    pub fn select_pages(&self, doc: &Document, span: Option<&PageSpan>) -> Vec<ObjectId> {
        let pages: Vec<ObjectId> = doc.get_pages().into_values().collect();
        let selection = page_selection(span, pages.len());
        pages[selection].to_vec()
    }

    /// Copy inherited attributes onto the page itself.
    ///
    /// Once a page is moved under a different parent it can no longer inherit
    /// `Resources`, `MediaBox`, `CropBox` or `Rotate` from its old ancestors,
    /// so any value it relied on is written onto the page dictionary.
    pub fn flatten_inherited(&self, doc: &mut Document, page_id: ObjectId) -> Result<()> {
        let mut inherited = Dictionary::new();
        let mut parent = parent_of(doc.get_dictionary(page_id).map_err(|e| {
            PdfMergeError::merge_failed(format!("Failed to get page {page_id:?}: {e}"))
        })?);

        let mut depth = 0;
        while let Some(parent_id) = parent {
            depth += 1;
            if depth > MAX_TREE_DEPTH {
                return Err(PdfMergeError::merge_failed("Page tree is too deep or cyclic"));
            }

            let Ok(node) = doc.get_dictionary(parent_id) else {
                break;
            };
            for key in INHERITABLE_KEYS {
                if !inherited.has(key)
                    && let Ok(value) = node.get(key)
                {
                    inherited.set(key.to_vec(), value.clone());
                }
            }
            parent = parent_of(node);
        }

        let page = doc.get_dictionary_mut(page_id).map_err(|e| {
            PdfMergeError::merge_failed(format!("Failed to get page {page_id:?}: {e}"))
        })?;
        for (key, value) in inherited.into_iter() {
            if !page.has(&key) {
                page.set(key, value);
            }
        }

        Ok(())
    }

    /// Append pages to the root page tree node of `doc`.
    ///
    /// Every page is re-parented to the root node and `Count` is updated.
    pub fn append_to_tree(&self, doc: &mut Document, page_ids: &[ObjectId]) -> Result<()> {
        let pages_id = root_pages_id(doc)?;

        for &page_id in page_ids {
            let page = doc.get_dictionary_mut(page_id).map_err(|e| {
                PdfMergeError::merge_failed(format!("Failed to get page {page_id:?}: {e}"))
            })?;
            page.set("Parent", pages_id);
        }

        let pages_dict = doc.get_dictionary_mut(pages_id).map_err(|e| {
            PdfMergeError::merge_failed(format!("Failed to get pages object: {e}"))
        })?;

        let kids = pages_dict
            .get_mut(b"Kids")
            .map_err(|_| PdfMergeError::merge_failed("Pages dictionary missing Kids array"))?;

        let Object::Array(kids_array) = kids else {
            return Err(PdfMergeError::merge_failed("Kids is not an array"));
        };
        kids_array.extend(page_ids.iter().map(|&id| Object::Reference(id)));

        let current_count = pages_dict
            .get(b"Count")
            .and_then(|c| c.as_i64())
            .unwrap_or(0);
        pages_dict.set("Count", current_count + page_ids.len() as i64);

        Ok(())
    }

    /// Get the number of pages in a document.
    pub fn page_count(&self, doc: &Document) -> usize {
        doc.get_pages().len()
    }
}

impl Default for PageExtractor {
    fn default() -> Self {
        Self::new()
    }
}

/// A new document with a catalog and an empty page tree.
pub fn empty_document() -> Document {
    let mut doc = Document::with_version("1.7");
    let pages_id = doc.add_object(dictionary! {
        "Type" => "Pages",
        "Kids" => Vec::<Object>::new(),
        "Count" => 0,
    });
    let catalog_id = doc.add_object(dictionary! {
        "Type" => "Catalog",
        "Pages" => pages_id,
    });
    doc.trailer.set("Root", catalog_id);
    doc
}

fn root_pages_id(doc: &Document) -> Result<ObjectId> {
    doc.catalog()
        .map_err(|e| PdfMergeError::merge_failed(format!("Failed to get catalog: {e}")))?
        .get(b"Pages")
        .and_then(|p| p.as_reference())
        .map_err(|e| PdfMergeError::merge_failed(format!("Failed to get pages reference: {e}")))
}

fn parent_of(node: &Dictionary) -> Option<ObjectId> {
    node.get(b"Parent").and_then(|p| p.as_reference()).ok()
}
