//! Test doubles shared by the integration tests.
//!
//! `ScriptedEngine` understands a tiny text format standing in for PDF:
//!
//! ```text
//! %SCRIPTED-PDF
//! <width_pt> <height_pt> <r> <g> <b>     ← one line per page
//! ```
//!
//! Each page paints its whole viewport in its colour, so the exported PNG
//! tells which page was rendered and at what size.

#![allow(dead_code)]

use image::Rgba;
use pdf2img::{
    Blob, BlobCallback, ConvertError, DrawingSurface, Host, LoadedDocument, LoadedPage,
    OffscreenHost, OffscreenSurface, PdfEngine, RenderingContext2d, Viewport,
};
use std::sync::atomic::{AtomicUsize, Ordering};
use tracing_subscriber::EnvFilter;

pub const HEADER: &str = "%SCRIPTED-PDF";

/// Route pipeline logs through the test harness; `RUST_LOG` picks the level.
pub fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_test_writer()
        .try_init();
}

/// Build a scripted document from `(width_pt, height_pt, [r, g, b])` pages.
pub fn scripted_pdf(pages: &[(f32, f32, [u8; 3])]) -> Vec<u8> {
    let mut out = String::from(HEADER);
    out.push('\n');
    for (w, h, [r, g, b]) in pages {
        out.push_str(&format!("{w} {h} {r} {g} {b}\n"));
    }
    out.into_bytes()
}

#[derive(Debug, Clone, Copy)]
struct PageDef {
    width: f32,
    height: f32,
    color: Rgba<u8>,
}

#[derive(Debug, Default)]
pub struct ScriptedEngine {
    runtime_configured: AtomicUsize,
    pages_rendered: AtomicUsize,
}

impl ScriptedEngine {
    pub fn runtime_configured(&self) -> usize {
        self.runtime_configured.load(Ordering::SeqCst)
    }

    pub fn pages_rendered(&self) -> usize {
        self.pages_rendered.load(Ordering::SeqCst)
    }
}

fn parse(bytes: &[u8]) -> Result<Vec<PageDef>, ConvertError> {
    let invalid = |detail: &str| ConvertError::LoadFailed {
        detail: detail.to_string(),
    };
    let text = std::str::from_utf8(bytes).map_err(|_| invalid("not UTF-8"))?;
    let mut lines = text.lines();
    if lines.next() != Some(HEADER) {
        return Err(invalid("missing header"));
    }

    lines
        .filter(|l| !l.trim().is_empty())
        .map(|line| {
            let fields: Vec<&str> = line.split_whitespace().collect();
            if fields.len() != 5 {
                return Err(invalid("malformed page line"));
            }
            let num = |i: usize| fields[i].parse::<f32>().map_err(|_| invalid("bad number"));
            let byte = |i: usize| fields[i].parse::<u8>().map_err(|_| invalid("bad colour"));
            Ok(PageDef {
                width: num(0)?,
                height: num(1)?,
                color: Rgba([byte(2)?, byte(3)?, byte(4)?, 255]),
            })
        })
        .collect()
}

struct ScriptedDocument<'e> {
    engine: &'e ScriptedEngine,
    pages: Vec<PageDef>,
}

struct ScriptedPage<'e> {
    engine: &'e ScriptedEngine,
    def: PageDef,
}

impl PdfEngine for ScriptedEngine {
    fn configure_runtime(&self) -> Result<(), ConvertError> {
        self.runtime_configured.fetch_add(1, Ordering::SeqCst);
        Ok(())
    }

    fn with_document<R, F>(&self, bytes: Vec<u8>, f: F) -> Result<R, ConvertError>
    where
        F: FnOnce(&dyn LoadedDocument) -> Result<R, ConvertError>,
    {
        let pages = parse(&bytes)?;
        f(&ScriptedDocument {
            engine: self,
            pages,
        })
    }
}

impl LoadedDocument for ScriptedDocument<'_> {
    fn page_count(&self) -> usize {
        self.pages.len()
    }

    fn page(&self, index: usize) -> Result<Box<dyn LoadedPage + '_>, ConvertError> {
        let def = self
            .pages
            .get(index)
            .copied()
            .ok_or_else(|| ConvertError::PageUnavailable {
                index,
                detail: format!("document has {} pages", self.pages.len()),
            })?;
        Ok(Box::new(ScriptedPage {
            engine: self.engine,
            def,
        }))
    }
}

impl LoadedPage for ScriptedPage<'_> {
    fn size_pt(&self) -> (f32, f32) {
        (self.def.width, self.def.height)
    }

    fn render(
        &self,
        ctx: &mut dyn RenderingContext2d,
        viewport: &Viewport,
    ) -> Result<(), ConvertError> {
        self.engine.pages_rendered.fetch_add(1, Ordering::SeqCst);
        ctx.fill_rect(
            0,
            0,
            viewport.pixel_width(),
            viewport.pixel_height(),
            self.def.color,
        );
        Ok(())
    }
}

// ── Hosts ────────────────────────────────────────────────────────────────────

/// How surfaces from [`FaultyHost`] misbehave.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Fault {
    /// `context_2d` returns `None`.
    NoContext,
    /// `to_blob` calls back with `None`.
    NullBlob,
}

/// An [`OffscreenHost`] whose surfaces fail in one specific way.
#[derive(Debug)]
pub struct FaultyHost {
    inner: OffscreenHost,
    fault: Fault,
}

impl FaultyHost {
    pub fn new(fault: Fault) -> Self {
        Self {
            inner: OffscreenHost::new(),
            fault,
        }
    }

    pub fn live_urls(&self) -> usize {
        self.inner.object_urls().len()
    }
}

impl Host for FaultyHost {
    fn has_document_context(&self) -> bool {
        true
    }

    fn create_surface(&self) -> Box<dyn DrawingSurface> {
        Box::new(FaultySurface {
            inner: OffscreenSurface::new(),
            fault: self.fault,
        })
    }

    fn create_object_url(&self, blob: &Blob) -> String {
        self.inner.create_object_url(blob)
    }

    fn revoke_object_url(&self, url: &str) -> bool {
        self.inner.revoke_object_url(url)
    }
}

struct FaultySurface {
    inner: OffscreenSurface,
    fault: Fault,
}

impl DrawingSurface for FaultySurface {
    fn width(&self) -> u32 {
        self.inner.width()
    }

    fn height(&self) -> u32 {
        self.inner.height()
    }

    fn set_size(&mut self, width: u32, height: u32) {
        self.inner.set_size(width, height);
    }

    fn context_2d(&mut self) -> Option<&mut dyn RenderingContext2d> {
        match self.fault {
            Fault::NoContext => None,
            Fault::NullBlob => self.inner.context_2d(),
        }
    }

    fn to_blob(self: Box<Self>, mime_type: &str, quality: f32, callback: BlobCallback) {
        match self.fault {
            Fault::NullBlob => callback(None),
            Fault::NoContext => Box::new(self.inner).to_blob(mime_type, quality, callback),
        }
    }
}
