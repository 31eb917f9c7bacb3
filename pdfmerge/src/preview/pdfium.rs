//! PDFium rasterisation backend.
//!
//! Binds to the PDFium shared library installed on the system at runtime.

use image::{DynamicImage, RgbaImage};
use pdfium_render::prelude::*;
use std::path::{Path, PathBuf};

use crate::error::{PdfMergeError, Result};
use crate::preview::{RasterBackend, RasterDocument};

/// Renders pages with the system PDFium library.
pub struct PdfiumBackend {
    pdfium: Pdfium,
}

impl PdfiumBackend {
    /// Bind to the system PDFium library.
    ///
    /// # Errors
    ///
    /// Returns `PreviewUnavailable` if the library cannot be loaded.
    pub fn new() -> Result<Self> {
        let bindings =
            Pdfium::bind_to_system_library().map_err(|e| PdfMergeError::PreviewUnavailable {
                reason: format!("Failed to load the PDFium library: {e}"),
            })?;

        Ok(Self {
            pdfium: Pdfium::new(bindings),
        })
    }
}

struct PdfiumDocument<'a> {
    document: PdfDocument<'a>,
    path: PathBuf,
}

impl RasterBackend for PdfiumBackend {
    fn load<'a>(&'a self, path: &Path) -> Result<Box<dyn RasterDocument + 'a>> {
        let document = self
            .pdfium
            .load_pdf_from_file(path, None)
            .map_err(|e| PdfMergeError::preview_failed(path.to_path_buf(), e.to_string()))?;

        Ok(Box::new(PdfiumDocument {
            document,
            path: path.to_path_buf(),
        }))
    }
}

impl RasterDocument for PdfiumDocument<'_> {
    fn page_count(&self) -> usize {
        self.document.pages().len() as usize
    }

    fn render_page(&self, index: usize, scale: f32) -> Result<DynamicImage> {
        let failed = |reason: String| PdfMergeError::preview_failed(self.path.clone(), reason);

        let page = page_index(index)
            .and_then(|page_index| self.document.pages().get(page_index).ok())
            .ok_or_else(|| failed(format!("Page {} does not exist", index + 1)))?;

        let config = PdfRenderConfig::new().scale_page_by_factor(scale);
        let bitmap = page
            .render_with_config(&config)
            .map_err(|e| failed(format!("Failed to render page {}: {e}", index + 1)))?;

        let width = bitmap.width() as u32;
        let height = bitmap.height() as u32;
        let pixels = RgbaImage::from_raw(width, height, bitmap.as_rgba_bytes())
            .ok_or_else(|| failed(format!("Page {} produced a malformed bitmap", index + 1)))?;

        Ok(DynamicImage::ImageRgba8(pixels))
    }
}

/// PDFium page index for a zero-based page number, if it fits.
fn page_index(index: usize) -> Option<PdfPageIndex> {
    PdfPageIndex::try_from(index).ok()
}
