//! [`PdfEngine`] backed by the pdfium C++ library via `pdfium-render`.
//!
//! The library location is resolved once per engine and reused by every
//! conversion; [`PdfEngine::configure_runtime`] only re-checks it. A fresh
//! [`Pdfium`] binding is created for each document so nothing pdfium-owned
//! ever crosses threads.

use super::{LoadedDocument, LoadedPage, PdfEngine, Viewport};
use crate::config::{LibrarySource, ResolvedLibrary};
use crate::error::ConvertError;
use crate::host::RenderingContext2d;
use pdfium_render::prelude::*;
use std::sync::OnceLock;
use tracing::{debug, info};

/// pdfium-backed engine.
#[derive(Debug, Default)]
pub struct PdfiumEngine {
    source: LibrarySource,
    resolved: OnceLock<ResolvedLibrary>,
}

impl PdfiumEngine {
    pub fn new(source: LibrarySource) -> Self {
        Self {
            source,
            resolved: OnceLock::new(),
        }
    }

    fn library(&self) -> &ResolvedLibrary {
        self.resolved.get_or_init(|| self.source.resolve())
    }

    fn bind(&self) -> Result<Pdfium, ConvertError> {
        let bindings = match self.library() {
            ResolvedLibrary::File(path) => Pdfium::bind_to_library(path),
            ResolvedLibrary::System => Pdfium::bind_to_system_library(),
        }
        .map_err(|e| ConvertError::EngineUnavailable(format!("{:?}", e)))?;

        Ok(Pdfium::new(bindings))
    }
}

impl PdfEngine for PdfiumEngine {
    fn configure_runtime(&self) -> Result<(), ConvertError> {
        match self.library() {
            ResolvedLibrary::File(path) if !path.exists() => Err(ConvertError::EngineUnavailable(
                format!("pdfium library not found at '{}'", path.display()),
            )),
            ResolvedLibrary::File(path) => {
                debug!("pdfium runtime: {}", path.display());
                Ok(())
            }
            ResolvedLibrary::System => {
                debug!("pdfium runtime: system library");
                Ok(())
            }
        }
    }

    fn with_document<R, F>(&self, bytes: Vec<u8>, f: F) -> Result<R, ConvertError>
    where
        F: FnOnce(&dyn LoadedDocument) -> Result<R, ConvertError>,
    {
        let pdfium = self.bind()?;

        let document = pdfium
            .load_pdf_from_byte_vec(bytes, None)
            .map_err(|e| load_error(format!("{:?}", e)))?;

        let loaded = PdfiumDocument { document };
        info!("PDF loaded: {} pages", loaded.page_count());

        f(&loaded)
    }
}

/// Classify a pdfium load failure from its debug rendering. pdfium reports
/// encrypted documents as `PasswordError`.
fn load_error(detail: String) -> ConvertError {
    if detail.contains("Password") || detail.contains("password") {
        ConvertError::PasswordRequired
    } else {
        ConvertError::LoadFailed { detail }
    }
}

struct PdfiumDocument<'a> {
    document: PdfDocument<'a>,
}

impl LoadedDocument for PdfiumDocument<'_> {
    fn page_count(&self) -> usize {
        self.document.pages().len() as usize
    }

    fn page(&self, index: usize) -> Result<Box<dyn LoadedPage + '_>, ConvertError> {
        let total = self.page_count();
        if index >= total {
            return Err(ConvertError::PageUnavailable {
                index,
                detail: format!("document has {} pages", total),
            });
        }

        let page = self
            .document
            .pages()
            .get(index as u16)
            .map_err(|e| ConvertError::PageUnavailable {
                index,
                detail: format!("{:?}", e),
            })?;

        Ok(Box::new(PdfiumPage { page }))
    }
}

struct PdfiumPage<'a> {
    page: PdfPage<'a>,
}

impl LoadedPage for PdfiumPage<'_> {
    fn size_pt(&self) -> (f32, f32) {
        (self.page.width().value, self.page.height().value)
    }

    fn render(
        &self,
        ctx: &mut dyn RenderingContext2d,
        viewport: &Viewport,
    ) -> Result<(), ConvertError> {
        let width = viewport.pixel_width();
        let height = viewport.pixel_height();
        if width == 0 || height == 0 {
            return Err(ConvertError::RenderFailed {
                detail: format!("page has no drawable area ({}x{} px)", width, height),
            });
        }

        let render_config = PdfRenderConfig::new()
            .set_target_width(width as i32)
            .set_maximum_height(height as i32)
            .set_image_smoothing(ctx.image_smoothing_enabled());

        let bitmap = self
            .page
            .render_with_config(&render_config)
            .map_err(|e| ConvertError::RenderFailed {
                detail: format!("{:?}", e),
            })?;

        let image = bitmap.as_image().to_rgba8();
        debug!(
            "Rendered page → {}x{} px (viewport {}x{})",
            image.width(),
            image.height(),
            width,
            height
        );

        // pdfium keeps the aspect ratio, so its output can be a pixel off the
        // truncated viewport; stretch it onto the surface exactly.
        ctx.draw_image_scaled(&image, 0, 0, width, height);
        Ok(())
    }
}
