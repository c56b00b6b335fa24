//! Error type for the pdf2img library.
//!
//! [`ConvertError`] is the internal failure currency of the pipeline: every
//! stage returns `Result<_, ConvertError>` and propagates with `?`. It never
//! reaches the caller of [`crate::convert::Converter::convert`] directly.
//! Instead it is folded into [`crate::output::PdfConversionResult`] by
//! [`crate::output::PdfConversionResult::from_error`], which decides the exact
//! caller-facing message for each kind.

use thiserror::Error;

/// Every way a conversion can fail.
#[derive(Debug, Error)]
pub enum ConvertError {
    // ── Precondition ──────────────────────────────────────────────────────
    /// The host has no document context (no surfaces, no object URLs).
    #[error("PDF to image must run in the browser")]
    BrowserRequired,

    // ── Input ─────────────────────────────────────────────────────────────
    /// Reading the input file's contents failed.
    #[error("Failed to read '{name}': {source}")]
    ReadFailed {
        name: String,
        #[source]
        source: std::io::Error,
    },

    // ── Engine ────────────────────────────────────────────────────────────
    /// The PDF engine runtime could not be located or bound.
    #[error("PDF engine unavailable: {0}")]
    EngineUnavailable(String),

    /// The document is encrypted; conversions never supply a password.
    #[error("PDF is encrypted and requires a password")]
    PasswordRequired,

    /// The buffer could not be parsed as a PDF document.
    #[error("Invalid PDF structure: {detail}")]
    LoadFailed { detail: String },

    /// The requested page does not exist or could not be opened.
    #[error("Page {index} unavailable: {detail}")]
    PageUnavailable { index: usize, detail: String },

    /// The engine failed while painting the page.
    #[error("Rendering failed: {detail}")]
    RenderFailed { detail: String },

    // ── Host ──────────────────────────────────────────────────────────────
    /// The drawing surface could not provide a 2D context.
    #[error("Canvas 2D context not available")]
    ContextUnavailable,

    /// The surface export produced no (or an empty) blob.
    #[error("Failed to create image blob")]
    BlobCreationFailed,

    // ── Catch-all ─────────────────────────────────────────────────────────
    /// Unexpected internal error (e.g. a panicked render task).
    #[error("Internal error: {0}")]
    Internal(String),
}
