//! Page rasterisation: draw page 1 onto a host surface at 4× scale.
//!
//! Parsing and painting run inside `spawn_blocking`: native engines are
//! CPU-bound and not async-safe, and their document handles must stay on the
//! thread that created them. Only the finished surface leaves the task.

use crate::config::RENDER_SCALE;
use crate::engine::{PdfEngine, Viewport};
use crate::error::ConvertError;
use crate::host::{DrawingSurface, Host, SmoothingQuality};
use std::sync::Arc;
use tracing::debug;

/// The page that is always rendered, regardless of document length.
pub const FIRST_PAGE: usize = 0;

/// A painted surface ready for export.
pub struct RenderedPage {
    pub surface: Box<dyn DrawingSurface>,
    pub viewport: Viewport,
    /// Total pages in the source document.
    pub page_count: usize,
}

impl std::fmt::Debug for RenderedPage {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RenderedPage")
            .field("surface", &format_args!("{}x{}", self.surface.width(), self.surface.height()))
            .field("viewport", &self.viewport)
            .field("page_count", &self.page_count)
            .finish()
    }
}

/// Parse `bytes` and render the first page on the blocking pool.
pub async fn render_first_page<E, H>(
    engine: Arc<E>,
    host: Arc<H>,
    bytes: Vec<u8>,
) -> Result<RenderedPage, ConvertError>
where
    E: PdfEngine,
    H: Host,
{
    tokio::task::spawn_blocking(move || render_page_blocking(&*engine, &*host, bytes, FIRST_PAGE))
        .await
        .map_err(|e| ConvertError::Internal(format!("Render task panicked: {}", e)))?
}

/// Blocking implementation of page rendering.
fn render_page_blocking<E, H>(
    engine: &E,
    host: &H,
    bytes: Vec<u8>,
    index: usize,
) -> Result<RenderedPage, ConvertError>
where
    E: PdfEngine,
    H: Host,
{
    engine.with_document(bytes, |document| {
        let page = document.page(index)?;
        let viewport = page.viewport(RENDER_SCALE);
        debug!(
            "Page {} viewport {}x{} at scale {}",
            index + 1,
            viewport.width,
            viewport.height,
            viewport.scale
        );

        let mut surface = host.create_surface();
        surface.set_size(viewport.pixel_width(), viewport.pixel_height());

        let ctx = surface
            .context_2d()
            .ok_or(ConvertError::ContextUnavailable)?;
        ctx.set_image_smoothing_enabled(true);
        ctx.set_image_smoothing_quality(SmoothingQuality::High);

        page.render(ctx, &viewport)?;

        Ok(RenderedPage {
            surface,
            viewport,
            page_count: document.page_count(),
        })
    })
}
