//! Page previews.
//!
//! Previews rasterise the pages a plan entry would contribute so the user can
//! check a page range before merging. Rasterisation sits behind the
//! [`RasterBackend`] and [`RasterDocument`] traits; the PDFium backend is
//! compiled in with the `pdfium` feature.
//!
//! Every page is rendered at [`PREVIEW_SCALE`] and then resized to
//! [`DISPLAY_WIDTH`] pixels wide, keeping its aspect ratio.

#[cfg(feature = "pdfium")]
pub mod pdfium;

use image::DynamicImage;
use image::imageops::FilterType;
use std::path::{Path, PathBuf};
use tracing::debug;

use crate::config::{PageSpan, page_selection};
use crate::error::{PdfMergeError, Result};

/// Scale factor pages are rasterised at.
pub const PREVIEW_SCALE: f32 = 0.5;

/// Width in pixels of every preview image.
pub const DISPLAY_WIDTH: u32 = 300;

/// Something that can open PDFs for rasterisation.
pub trait RasterBackend {
    /// Open the document at `path`.
    fn load<'a>(&'a self, path: &Path) -> Result<Box<dyn RasterDocument + 'a>>;
}

/// An open document that can rasterise its pages.
pub trait RasterDocument {
    /// Number of pages in the document.
    fn page_count(&self) -> usize;

    /// Rasterise the page at zero-based `index`, scaled by `scale`.
    fn render_page(&self, index: usize, scale: f32) -> Result<DynamicImage>;
}

/// One rendered page.
#[derive(Debug, Clone)]
pub struct PreviewPage {
    /// 1-based page number in the source document.
    pub number: usize,

    /// The page, [`DISPLAY_WIDTH`] pixels wide.
    pub image: DynamicImage,
}

/// Renders the pages a plan entry selects.
pub struct PreviewRenderer {
    backend: Box<dyn RasterBackend>,
}

impl PreviewRenderer {
    /// Create a renderer on top of `backend`.
    pub fn new(backend: Box<dyn RasterBackend>) -> Self {
        Self { backend }
    }

    /// Create a renderer on the backend compiled into this build.
    ///
    /// # Errors
    ///
    /// Returns `PreviewUnavailable` if no backend was compiled in or the
    /// PDFium library cannot be found.
    pub fn system() -> Result<Self> {
        default_backend().map(Self::new)
    }

    /// Render the pages `span` selects from the document at `path`.
    ///
    /// The selection follows the merge rule: no span means every page, the
    /// end is clamped, and a span outside the document yields no pages.
    ///
    /// # Errors
    ///
    /// Returns `PreviewFailed` if the document cannot be opened or a page
    /// cannot be rendered.
    pub fn render(&self, path: &Path, span: Option<&PageSpan>) -> Result<Vec<PreviewPage>> {
        let document = self.backend.load(path)?;
        let selection = page_selection(span, document.page_count());

        debug!(path = %path.display(), ?selection, "rendering preview");

        selection
            .map(|index| {
                let raster = document.render_page(index, PREVIEW_SCALE)?;
                Ok(PreviewPage {
                    number: index + 1,
                    image: fit_to_display_width(&raster),
                })
            })
            .collect()
    }

    /// Write `pages` as `<stem>-page-<n>.png` files in `dir`.
    ///
    /// The directory is created if needed. Returns the written paths in page
    /// order.
    pub fn write_png(pages: &[PreviewPage], dir: &Path, stem: &str) -> Result<Vec<PathBuf>> {
        std::fs::create_dir_all(dir)?;

        pages
            .iter()
            .map(|page| {
                let path = dir.join(format!("{stem}-page-{}.png", page.number));
                page.image
                    .save_with_format(&path, image::ImageFormat::Png)
                    .map_err(|e| PdfMergeError::preview_failed(path.clone(), e.to_string()))?;
                Ok(path)
            })
            .collect()
    }
}

fn fit_to_display_width(raster: &DynamicImage) -> DynamicImage {
    let (width, height) = (raster.width().max(1), raster.height());
    let scaled_height = (u64::from(height) * u64::from(DISPLAY_WIDTH) / u64::from(width)).max(1);
    raster.resize_exact(
        DISPLAY_WIDTH,
        u32::try_from(scaled_height).unwrap_or(u32::MAX),
        FilterType::Triangle,
    )
}

/// The rasterisation backend compiled into this build.
#[cfg(feature = "pdfium")]
pub fn default_backend() -> Result<Box<dyn RasterBackend>> {
    Ok(Box::new(pdfium::PdfiumBackend::new()?))
}

/// The rasterisation backend compiled into this build.
#[cfg(not(feature = "pdfium"))]
pub fn default_backend() -> Result<Box<dyn RasterBackend>> {
    Err(PdfMergeError::PreviewUnavailable {
        reason: "pdfmerge was built without the `pdfium` feature".to_string(),
    })
}
