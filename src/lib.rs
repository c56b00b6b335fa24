//! # pdf2img
//!
//! Render the first page of a PDF to a PNG image, returning both an object
//! URL for immediate display and a downloadable `<name>.png` file.
//!
//! ## Pipeline Overview
//!
//! ```text
//! PDF
//!  │
//!  ├─ 1. Check   host must expose a document context
//!  ├─ 2. Load    configure the engine runtime, read the file's bytes
//!  ├─ 3. Render  page 1 at 4× onto an off-screen surface (spawn_blocking)
//!  └─ 4. Encode  surface → PNG blob → object URL + image file
//! ```
//!
//! Every failure is reported in-band: [`Converter::convert`] always returns a
//! [`PdfConversionResult`], never an `Err`.
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use pdf2img::{convert, InputFile};
//!
//! #[tokio::main]
//! async fn main() {
//!     let file = InputFile::from_path("report.pdf");
//!     let result = convert(&file).await;
//!     match result.error() {
//!         None => println!("{} → {}", result.file().unwrap().name(), result.image_url()),
//!         Some(e) => eprintln!("{e}"),
//!     }
//! }
//! ```
//!
//! ## Feature Flags
//!
//! | Feature | Default | Description |
//! |---------|---------|-------------|
//! | `cli`   | on      | Enables the `pdf2img` binary (clap + anyhow + tracing-subscriber) |

// ── Modules ──────────────────────────────────────────────────────────────

pub mod config;
pub mod convert;
pub mod engine;
pub mod error;
pub mod file;
pub mod host;
pub mod output;
pub mod pipeline;

// ── Re-exports ───────────────────────────────────────────────────────────

pub use config::{LibrarySource, EXPORT_QUALITY, OUTPUT_MIME, RENDER_SCALE};
pub use convert::{convert, convert_sync, default_converter, Converter};
pub use engine::{LoadedDocument, LoadedPage, PdfEngine, PdfiumEngine, Viewport};
pub use error::ConvertError;
pub use file::{output_file_name, Blob, ImageFile, InputFile};
pub use host::{
    BlobCallback, DrawingSurface, Host, OffscreenHost, OffscreenSurface, RenderingContext2d,
    SmoothingQuality, MAX_SURFACE_AREA, MAX_SURFACE_SIDE,
};
pub use output::PdfConversionResult;
