//! Image-backed host: RGBA canvases in memory plus an object URL store.
//!
//! Surfaces follow canvas semantics where they matter to the pipeline:
//! resizing clears pixels and resets context state, zero-sized surfaces
//! export no blob, and every export is PNG whatever type was asked for.

use super::{BlobCallback, DrawingSurface, Host, ObjectUrlStore, RenderingContext2d, SmoothingQuality};
use crate::config::OUTPUT_MIME;
use crate::file::Blob;
use image::imageops::{self, FilterType};
use image::{DynamicImage, ImageFormat, Pixel, Rgba, RgbaImage};
use std::io::Cursor;
use tracing::{debug, warn};

/// In-process host with a document context.
#[derive(Debug)]
pub struct OffscreenHost {
    document_context: bool,
    urls: ObjectUrlStore,
}

impl Default for OffscreenHost {
    fn default() -> Self {
        Self::new()
    }
}

impl OffscreenHost {
    pub fn new() -> Self {
        Self {
            document_context: true,
            urls: ObjectUrlStore::default(),
        }
    }

    /// Mint object URLs under `origin`.
    pub fn with_origin(origin: impl Into<String>) -> Self {
        Self {
            document_context: true,
            urls: ObjectUrlStore::new(origin),
        }
    }

    /// A host without a document context; every conversion is refused.
    pub fn detached() -> Self {
        Self {
            document_context: false,
            urls: ObjectUrlStore::default(),
        }
    }

    /// The blob behind a live object URL.
    pub fn resolve_object_url(&self, url: &str) -> Option<Blob> {
        self.urls.get(url)
    }

    pub fn object_urls(&self) -> &ObjectUrlStore {
        &self.urls
    }
}

impl Host for OffscreenHost {
    fn has_document_context(&self) -> bool {
        self.document_context
    }

    fn create_surface(&self) -> Box<dyn DrawingSurface> {
        Box::new(OffscreenSurface::new())
    }

    fn create_object_url(&self, blob: &Blob) -> String {
        self.urls.create(blob)
    }

    fn revoke_object_url(&self, url: &str) -> bool {
        self.urls.revoke(url)
    }
}

/// Largest width or height a surface accepts.
pub const MAX_SURFACE_SIDE: u32 = 32_767;

/// Largest pixel count a surface accepts (16384²).
pub const MAX_SURFACE_AREA: u32 = 268_435_456;

/// Whether a `width` × `height` surface can be backed by pixels.
fn fits_surface_limits(width: u32, height: u32) -> bool {
    width <= MAX_SURFACE_SIDE
        && height <= MAX_SURFACE_SIDE
        && width
            .checked_mul(height)
            .is_some_and(|area| area <= MAX_SURFACE_AREA)
}

/// An RGBA canvas plus its 2D context state.
///
/// Sizes beyond [`MAX_SURFACE_SIDE`] or [`MAX_SURFACE_AREA`] leave the
/// surface without pixels: it reports the requested size, hands out no
/// context and exports no blob.
#[derive(Debug)]
pub struct OffscreenSurface {
    ctx: OffscreenContext,
    width: u32,
    height: u32,
    oversized: bool,
}

impl Default for OffscreenSurface {
    fn default() -> Self {
        Self::new()
    }
}

impl OffscreenSurface {
    pub fn new() -> Self {
        Self {
            ctx: OffscreenContext::new(0, 0),
            width: 0,
            height: 0,
            oversized: false,
        }
    }

    /// Current pixels.
    pub fn pixels(&self) -> &RgbaImage {
        &self.ctx.canvas
    }
}

impl DrawingSurface for OffscreenSurface {
    fn width(&self) -> u32 {
        self.width
    }

    fn height(&self) -> u32 {
        self.height
    }

    fn set_size(&mut self, width: u32, height: u32) {
        self.width = width;
        self.height = height;
        self.oversized = !fits_surface_limits(width, height);
        if self.oversized {
            warn!(
                "Surface {}x{} exceeds the {} px side / {} px area limit",
                width, height, MAX_SURFACE_SIDE, MAX_SURFACE_AREA
            );
            self.ctx = OffscreenContext::new(0, 0);
        } else {
            self.ctx = OffscreenContext::new(width, height);
        }
    }

    fn context_2d(&mut self) -> Option<&mut dyn RenderingContext2d> {
        if self.oversized {
            return None;
        }
        Some(&mut self.ctx)
    }

    /// PNG is lossless, so `quality` has nothing to tune.
    fn to_blob(self: Box<Self>, mime_type: &str, _quality: f32, callback: BlobCallback) {
        let canvas = self.ctx.canvas;
        let mime_type = mime_type.to_string();
        let job = move || callback(encode_canvas(canvas, &mime_type));

        match tokio::runtime::Handle::try_current() {
            Ok(handle) => {
                handle.spawn_blocking(job);
            }
            Err(_) => job(),
        }
    }
}

#[derive(Debug)]
struct OffscreenContext {
    canvas: RgbaImage,
    smoothing_enabled: bool,
    smoothing_quality: SmoothingQuality,
}

impl OffscreenContext {
    fn new(width: u32, height: u32) -> Self {
        Self {
            canvas: RgbaImage::new(width, height),
            smoothing_enabled: true,
            smoothing_quality: SmoothingQuality::default(),
        }
    }

    fn resize_filter(&self) -> FilterType {
        if !self.smoothing_enabled {
            return FilterType::Nearest;
        }
        match self.smoothing_quality {
            SmoothingQuality::Low => FilterType::Triangle,
            SmoothingQuality::Medium => FilterType::CatmullRom,
            SmoothingQuality::High => FilterType::Lanczos3,
        }
    }
}

impl RenderingContext2d for OffscreenContext {
    fn image_smoothing_enabled(&self) -> bool {
        self.smoothing_enabled
    }

    fn set_image_smoothing_enabled(&mut self, enabled: bool) {
        self.smoothing_enabled = enabled;
    }

    fn image_smoothing_quality(&self) -> SmoothingQuality {
        self.smoothing_quality
    }

    fn set_image_smoothing_quality(&mut self, quality: SmoothingQuality) {
        self.smoothing_quality = quality;
    }

    fn fill_rect(&mut self, x: i64, y: i64, width: u32, height: u32, color: Rgba<u8>) {
        let cw = self.canvas.width() as i64;
        let ch = self.canvas.height() as i64;
        let x0 = x.clamp(0, cw);
        let y0 = y.clamp(0, ch);
        let x1 = (x + width as i64).clamp(0, cw);
        let y1 = (y + height as i64).clamp(0, ch);

        let opaque = color[3] == u8::MAX;
        for py in y0..y1 {
            for px in x0..x1 {
                let pixel = self.canvas.get_pixel_mut(px as u32, py as u32);
                if opaque {
                    *pixel = color;
                } else {
                    pixel.blend(&color);
                }
            }
        }
    }

    fn draw_image(&mut self, image: &RgbaImage, dx: i64, dy: i64) {
        imageops::overlay(&mut self.canvas, image, dx, dy);
    }

    fn draw_image_scaled(&mut self, image: &RgbaImage, dx: i64, dy: i64, dw: u32, dh: u32) {
        if dw == 0 || dh == 0 {
            return;
        }
        if image.dimensions() == (dw, dh) {
            self.draw_image(image, dx, dy);
            return;
        }
        let scaled = imageops::resize(image, dw, dh, self.resize_filter());
        imageops::overlay(&mut self.canvas, &scaled, dx, dy);
    }
}

/// Encode `canvas` as PNG, the only type this host produces; canvases fall
/// back to it for unsupported types. `None` for empty canvases or encoder
/// failures.
fn encode_canvas(canvas: RgbaImage, mime_type: &str) -> Option<Blob> {
    if canvas.width() == 0 || canvas.height() == 0 {
        debug!("Refusing to export an empty {}x{} surface", canvas.width(), canvas.height());
        return None;
    }
    if mime_type != OUTPUT_MIME {
        debug!("Unsupported export type '{}', falling back to PNG", mime_type);
    }

    let mut buf = Vec::new();
    match DynamicImage::ImageRgba8(canvas).write_to(&mut Cursor::new(&mut buf), ImageFormat::Png) {
        Ok(()) => {
            debug!("Encoded surface → {} bytes {}", buf.len(), OUTPUT_MIME);
            Some(Blob::new(buf, OUTPUT_MIME))
        }
        Err(e) => {
            warn!("Surface export failed: {}", e);
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::mpsc;

    const RED: Rgba<u8> = Rgba([255, 0, 0, 255]);
    const BLUE: Rgba<u8> = Rgba([0, 0, 255, 255]);

    fn export_blocking(surface: OffscreenSurface, mime: &str) -> Option<Blob> {
        // No Tokio runtime here, so to_blob runs the encoder inline.
        let (tx, rx) = mpsc::channel();
        Box::new(surface).to_blob(mime, 1.0, Box::new(move |b: Option<Blob>| tx.send(b).unwrap()));
        rx.recv().unwrap()
    }

    #[test]
    fn set_size_clears_and_resets_state() {
        let mut s = OffscreenSurface::new();
        s.set_size(4, 3);
        {
            let ctx = s.context_2d().unwrap();
            ctx.set_image_smoothing_enabled(false);
            ctx.set_image_smoothing_quality(SmoothingQuality::High);
            ctx.fill_rect(0, 0, 4, 3, RED);
        }
        s.set_size(2, 2);
        assert_eq!((s.width(), s.height()), (2, 2));
        assert_eq!(*s.pixels().get_pixel(0, 0), Rgba([0, 0, 0, 0]));
        let ctx = s.context_2d().unwrap();
        assert!(ctx.image_smoothing_enabled());
        assert_eq!(ctx.image_smoothing_quality(), SmoothingQuality::Low);
    }

    #[test]
    fn fill_rect_is_clipped_to_canvas() {
        let mut s = OffscreenSurface::new();
        s.set_size(4, 4);
        s.context_2d().unwrap().fill_rect(-2, 2, 4, 10, BLUE);
        assert_eq!(*s.pixels().get_pixel(0, 2), BLUE);
        assert_eq!(*s.pixels().get_pixel(1, 3), BLUE);
        assert_eq!(*s.pixels().get_pixel(2, 2), Rgba([0, 0, 0, 0]));
        assert_eq!(*s.pixels().get_pixel(0, 1), Rgba([0, 0, 0, 0]));
    }

    #[test]
    fn draw_image_at_natural_size() {
        let mut s = OffscreenSurface::new();
        s.set_size(3, 3);
        let tile = RgbaImage::from_pixel(2, 2, RED);
        s.context_2d().unwrap().draw_image(&tile, 1, 1);
        assert_eq!(*s.pixels().get_pixel(2, 2), RED);
        assert_eq!(*s.pixels().get_pixel(0, 0), Rgba([0, 0, 0, 0]));
    }

    #[test]
    fn scaled_draw_without_smoothing_is_nearest_neighbour() {
        let mut checker = RgbaImage::new(2, 1);
        checker.put_pixel(0, 0, RED);
        checker.put_pixel(1, 0, BLUE);

        let mut s = OffscreenSurface::new();
        s.set_size(4, 2);
        let ctx = s.context_2d().unwrap();
        ctx.set_image_smoothing_enabled(false);
        ctx.draw_image_scaled(&checker, 0, 0, 4, 2);

        assert_eq!(*s.pixels().get_pixel(0, 1), RED);
        assert_eq!(*s.pixels().get_pixel(1, 0), RED);
        assert_eq!(*s.pixels().get_pixel(2, 0), BLUE);
        assert_eq!(*s.pixels().get_pixel(3, 1), BLUE);
    }

    #[test]
    fn empty_surface_exports_no_blob() {
        assert!(export_blocking(OffscreenSurface::new(), "image/png").is_none());
    }

    #[test]
    fn png_export_round_trips_dimensions() {
        let mut s = OffscreenSurface::new();
        s.set_size(5, 7);
        s.context_2d().unwrap().fill_rect(0, 0, 5, 7, RED);
        let blob = export_blocking(s, "image/png").expect("blob");
        assert_eq!(blob.mime_type(), "image/png");
        let decoded = image::load_from_memory(blob.bytes()).unwrap();
        assert_eq!((decoded.width(), decoded.height()), (5, 7));
        assert_eq!(decoded.to_rgba8().get_pixel(4, 6), &RED);
    }

    #[test]
    fn other_types_fall_back_to_png() {
        for mime in ["image/jpeg", "image/x-unknown"] {
            let mut s = OffscreenSurface::new();
            s.set_size(8, 8);
            let blob = export_blocking(s, mime).expect("png blob");
            assert_eq!(blob.mime_type(), "image/png");
            assert_eq!(&blob.bytes()[..4], &[0x89, b'P', b'N', b'G']);
        }
    }

    #[test]
    fn surface_limits() {
        assert!(fits_surface_limits(MAX_SURFACE_SIDE, 4));
        assert!(fits_surface_limits(16_384, 16_384));
        assert!(!fits_surface_limits(MAX_SURFACE_SIDE + 1, 1));
        assert!(!fits_surface_limits(1, MAX_SURFACE_SIDE + 1));
        assert!(!fits_surface_limits(16_385, 16_384));
        assert!(!fits_surface_limits(u32::MAX, u32::MAX));
    }

    #[test]
    fn oversized_surface_has_no_context_and_no_blob() {
        let mut s = OffscreenSurface::new();
        s.set_size(57_600, 57_600);
        assert_eq!((s.width(), s.height()), (57_600, 57_600));
        assert_eq!(s.pixels().dimensions(), (0, 0));
        assert!(s.context_2d().is_none());
        assert!(export_blocking(s, "image/png").is_none());
    }

    #[test]
    fn resizing_back_within_limits_restores_the_context() {
        let mut s = OffscreenSurface::new();
        s.set_size(40_000, 1);
        assert!(s.context_2d().is_none());
        s.set_size(3, 2);
        s.context_2d().expect("context").fill_rect(0, 0, 3, 2, BLUE);
        assert_eq!(*s.pixels().get_pixel(2, 1), BLUE);
    }

    #[tokio::test]
    async fn export_inside_runtime_uses_blocking_pool() {
        let mut s = OffscreenSurface::new();
        s.set_size(2, 2);
        let (tx, rx) = tokio::sync::oneshot::channel();
        Box::new(s).to_blob("image/png", 1.0, Box::new(move |b: Option<Blob>| {
            let _ = tx.send(b);
        }));
        let blob = rx.await.unwrap().expect("blob");
        assert!(!blob.is_empty());
    }

    #[test]
    fn host_capabilities() {
        assert!(OffscreenHost::new().has_document_context());
        assert!(!OffscreenHost::detached().has_document_context());

        let host = OffscreenHost::with_origin("https://app.example");
        let url = host.create_object_url(&Blob::new(vec![1u8], "image/png"));
        assert!(url.starts_with("blob:https://app.example/"));
        assert!(host.resolve_object_url(&url).is_some());
        assert!(host.revoke_object_url(&url));
        assert!(host.resolve_object_url(&url).is_none());
    }
}
