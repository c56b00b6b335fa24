//! PDF engine abstraction.
//!
//! The pipeline needs four things from a PDF library: load a document from a
//! buffer, fetch a page by index, size a viewport from a scale, and paint the
//! page into a 2D context. [`PdfEngine`] exposes exactly that.
//!
//! Documents are scoped to a closure ([`PdfEngine::with_document`]) rather
//! than returned: native engines such as pdfium hand out documents that
//! borrow the library binding and must not leave the thread that created
//! them. The closure runs on a blocking thread inside
//! [`crate::pipeline::render`].

pub mod pdfium;

use crate::error::ConvertError;
use crate::host::RenderingContext2d;

pub use self::pdfium::PdfiumEngine;

/// Pixel-space rectangle a page is rendered into.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Viewport {
    /// Width in CSS pixels (page points × scale).
    pub width: f32,
    /// Height in CSS pixels (page points × scale).
    pub height: f32,
    pub scale: f32,
}

impl Viewport {
    /// Viewport for a page of `width_pt` × `height_pt` points at `scale`.
    pub fn from_page_size(width_pt: f32, height_pt: f32, scale: f32) -> Self {
        Self {
            width: width_pt * scale,
            height: height_pt * scale,
            scale,
        }
    }

    /// Surface width: fractional pixels are truncated, as canvas sizing does.
    pub fn pixel_width(&self) -> u32 {
        self.width.max(0.0) as u32
    }

    pub fn pixel_height(&self) -> u32 {
        self.height.max(0.0) as u32
    }
}

/// A PDF library able to parse documents.
pub trait PdfEngine: Send + Sync + 'static {
    /// Point the engine at its runtime. Called on every conversion; must be
    /// idempotent and cheap after the first call.
    fn configure_runtime(&self) -> Result<(), ConvertError>;

    /// Parse `bytes` and run `f` against the loaded document. The document is
    /// released when `f` returns.
    fn with_document<R, F>(&self, bytes: Vec<u8>, f: F) -> Result<R, ConvertError>
    where
        F: FnOnce(&dyn LoadedDocument) -> Result<R, ConvertError>;
}

/// A parsed document.
pub trait LoadedDocument {
    fn page_count(&self) -> usize;

    /// Page at 0-based `index`.
    fn page(&self, index: usize) -> Result<Box<dyn LoadedPage + '_>, ConvertError>;
}

/// A single page borrowed from a [`LoadedDocument`].
pub trait LoadedPage {
    /// Native page size in PDF points, after the page's own rotation.
    fn size_pt(&self) -> (f32, f32);

    fn viewport(&self, scale: f32) -> Viewport {
        let (w, h) = self.size_pt();
        Viewport::from_page_size(w, h, scale)
    }

    /// Paint the page into `ctx`, filling `viewport`.
    fn render(
        &self,
        ctx: &mut dyn RenderingContext2d,
        viewport: &Viewport,
    ) -> Result<(), ConvertError>;
}
