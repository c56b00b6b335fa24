//! Pipeline stages for PDF-to-image conversion.
//!
//! Each submodule implements exactly one step; [`crate::convert`] sequences
//! them and owns the failure policy.
//!
//! ## Data Flow
//!
//! ```text
//! load ──▶ render ──▶ encode
//! (bytes)  (engine + surface)  (to_blob → PNG file)
//! ```
//!
//! 1. [`load`]   — read the input file into a buffer
//! 2. [`render`] — parse, pick page 1, size a 4× viewport and paint it onto a
//!    host surface; runs in `spawn_blocking`
//! 3. [`encode`] — export the surface through the host's callback API and
//!    name the resulting PNG

pub mod encode;
pub mod load;
pub mod render;
