//! Conversion entry points.
//!
//! [`Converter`] pairs a [`PdfEngine`] with a [`Host`] and runs the pipeline.
//! Its [`Converter::convert`] never fails: every error is folded into the
//! returned [`PdfConversionResult`], so callers branch on
//! [`PdfConversionResult::error`] instead of handling `Err`.

use crate::config::LibrarySource;
use crate::engine::{PdfEngine, PdfiumEngine};
use crate::error::ConvertError;
use crate::file::InputFile;
use crate::host::{Host, OffscreenHost};
use crate::output::PdfConversionResult;
use crate::pipeline::{encode, load, render};
use once_cell::sync::Lazy;
use std::sync::Arc;
use std::time::Instant;
use tracing::{error, info, warn};

static DEFAULT_CONVERTER: Lazy<Converter> = Lazy::new(Converter::default);

/// Converts the first page of a PDF into a PNG.
pub struct Converter<E = PdfiumEngine, H = OffscreenHost> {
    engine: Arc<E>,
    host: Arc<H>,
}

impl<E, H> Clone for Converter<E, H> {
    fn clone(&self) -> Self {
        Self {
            engine: Arc::clone(&self.engine),
            host: Arc::clone(&self.host),
        }
    }
}

impl Default for Converter {
    fn default() -> Self {
        Self::new(PdfiumEngine::default(), OffscreenHost::new())
    }
}

impl Converter {
    /// pdfium loaded from `source`, rendering on an [`OffscreenHost`].
    pub fn pdfium(source: LibrarySource) -> Self {
        Self::new(PdfiumEngine::new(source), OffscreenHost::new())
    }
}

impl<E: PdfEngine, H: Host> Converter<E, H> {
    pub fn new(engine: E, host: H) -> Self {
        Self::from_shared(Arc::new(engine), Arc::new(host))
    }

    /// Build from engine and host handles the caller keeps sharing.
    pub fn from_shared(engine: Arc<E>, host: Arc<H>) -> Self {
        Self { engine, host }
    }

    pub fn engine(&self) -> &E {
        &self.engine
    }

    pub fn host(&self) -> &H {
        &self.host
    }

    /// Render page 1 of `file` to PNG.
    ///
    /// On success the result holds an object URL registered with the host and
    /// a `<stem>.png` file. The URL stays live until [`Converter::release`].
    pub async fn convert(&self, file: &InputFile) -> PdfConversionResult {
        let start = Instant::now();
        info!("Starting conversion: {}", file.name());

        match self.try_convert(file).await {
            Ok(result) => {
                info!(
                    "Conversion complete: {} in {}ms",
                    file.name(),
                    start.elapsed().as_millis()
                );
                result
            }
            Err(ConvertError::BrowserRequired) => {
                warn!("Conversion refused: host has no document context");
                PdfConversionResult::from_error(&ConvertError::BrowserRequired)
            }
            Err(e) => {
                error!("PDF conversion error: {}", e);
                PdfConversionResult::from_error(&e)
            }
        }
    }

    async fn try_convert(&self, file: &InputFile) -> Result<PdfConversionResult, ConvertError> {
        // ── Step 1: Environment check ────────────────────────────────────────
        if !self.host.has_document_context() {
            return Err(ConvertError::BrowserRequired);
        }

        // ── Step 2: Load ─────────────────────────────────────────────────────
        self.engine.configure_runtime()?;
        let bytes = load::read_input(file).await?;

        // ── Step 3: Render page 1 ────────────────────────────────────────────
        let rendered =
            render::render_first_page(Arc::clone(&self.engine), Arc::clone(&self.host), bytes)
                .await?;
        info!(
            "Rendered page 1 of {} at {}x{} px",
            rendered.page_count,
            rendered.viewport.pixel_width(),
            rendered.viewport.pixel_height()
        );

        // ── Step 4: Serialize ────────────────────────────────────────────────
        let blob = encode::export_png(rendered.surface).await?;
        let image_file = encode::image_file_for(file.name(), blob);
        let image_url = self.host.create_object_url(image_file.blob());

        Ok(PdfConversionResult::success(image_url, image_file))
    }

    /// Revoke the object URL of a successful result. Returns `false` for
    /// failed results and URLs already released.
    pub fn release(&self, result: &PdfConversionResult) -> bool {
        let url = result.image_url();
        !url.is_empty() && self.host.revoke_object_url(url)
    }
}

/// The process-wide converter used by [`convert`] and [`convert_sync`]:
/// pdfium located via [`LibrarySource::Auto`] and a shared [`OffscreenHost`],
/// so object URLs it returns can later be resolved or released through it.
pub fn default_converter() -> &'static Converter {
    &DEFAULT_CONVERTER
}

/// Convert page 1 of `file` with the [`default_converter`].
pub async fn convert(file: &InputFile) -> PdfConversionResult {
    default_converter().convert(file).await
}

/// Synchronous wrapper around [`convert`].
///
/// Creates a temporary tokio runtime internally; do not call from inside one.
pub fn convert_sync(file: &InputFile) -> PdfConversionResult {
    match tokio::runtime::Runtime::new() {
        Ok(rt) => rt.block_on(convert(file)),
        Err(e) => {
            let err = ConvertError::Internal(format!("Failed to create tokio runtime: {}", e));
            error!("PDF conversion error: {}", err);
            PdfConversionResult::from_error(&err)
        }
    }
}
