//! Host platform capabilities: drawing surfaces and object URLs.
//!
//! The conversion never inspects ambient globals to decide whether it can
//! run. It asks the injected [`Host`] through
//! [`Host::has_document_context`]. A host without a document context rejects
//! every conversion up front.
//!
//! [`DrawingSurface::to_blob`] is deliberately callback-based, like a canvas
//! export: the host decides when and on which thread encoding happens.
//! [`crate::pipeline::encode`] adapts it back into the async flow.

pub mod object_url;
pub mod offscreen;

use crate::file::Blob;
use image::{Rgba, RgbaImage};

pub use self::object_url::ObjectUrlStore;
pub use self::offscreen::{OffscreenHost, OffscreenSurface, MAX_SURFACE_AREA, MAX_SURFACE_SIDE};

/// Resampling quality used when drawing scaled images.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SmoothingQuality {
    #[default]
    Low,
    Medium,
    High,
}

/// Receives the exported blob, or `None` when export failed.
pub type BlobCallback = Box<dyn FnOnce(Option<Blob>) + Send + 'static>;

/// The environment a conversion runs in.
pub trait Host: Send + Sync + 'static {
    /// Whether surfaces and object URLs are available at all.
    fn has_document_context(&self) -> bool;

    /// Allocate a new, zero-sized off-screen surface.
    fn create_surface(&self) -> Box<dyn DrawingSurface>;

    /// Register `blob` and return a URL that addresses it.
    fn create_object_url(&self, blob: &Blob) -> String;

    /// Release a URL from [`Host::create_object_url`]. Returns `false` if the
    /// URL was unknown or already revoked.
    fn revoke_object_url(&self, url: &str) -> bool;
}

/// An off-screen raster canvas.
pub trait DrawingSurface: Send {
    fn width(&self) -> u32;
    fn height(&self) -> u32;

    /// Resize the surface, clearing its contents.
    fn set_size(&mut self, width: u32, height: u32);

    /// The 2D context, or `None` if the host cannot provide one.
    fn context_2d(&mut self) -> Option<&mut dyn RenderingContext2d>;

    /// Encode the surface and hand the result to `callback`, possibly later
    /// and on another thread.
    fn to_blob(self: Box<Self>, mime_type: &str, quality: f32, callback: BlobCallback);
}

/// The subset of 2D drawing operations page renderers need.
pub trait RenderingContext2d {
    fn image_smoothing_enabled(&self) -> bool;
    fn set_image_smoothing_enabled(&mut self, enabled: bool);

    fn image_smoothing_quality(&self) -> SmoothingQuality;
    fn set_image_smoothing_quality(&mut self, quality: SmoothingQuality);

    /// Fill a rectangle with a solid colour (source-over).
    fn fill_rect(&mut self, x: i64, y: i64, width: u32, height: u32, color: Rgba<u8>);

    /// Draw `image` at its natural size with its top-left corner at (`dx`, `dy`).
    fn draw_image(&mut self, image: &RgbaImage, dx: i64, dy: i64);

    /// Draw `image` scaled into the `dw` × `dh` rectangle at (`dx`, `dy`),
    /// resampling according to the smoothing settings.
    fn draw_image_scaled(&mut self, image: &RgbaImage, dx: i64, dy: i64, dw: u32, dh: u32);
}
