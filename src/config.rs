//! Fixed conversion constants and PDF engine runtime location.
//!
//! The conversion itself has no knobs: page 1 is always rendered at 4× the
//! page's native size and exported as PNG at quality 1.0. The only thing a
//! caller can choose is where the pdfium shared library comes from, via
//! [`LibrarySource`].

use std::path::{Path, PathBuf};
use tracing::debug;

/// Magnification applied to the page's native size (1 unit = 1 PDF point).
///
/// 4× is roughly 288 DPI, high enough for downstream OCR and vision models.
pub const RENDER_SCALE: f32 = 4.0;

/// Quality hint passed to blob export. PNG is lossless so this is a no-op
/// for the default output, but it is forwarded unchanged to the host.
pub const EXPORT_QUALITY: f32 = 1.0;

/// Media type of the exported image.
pub const OUTPUT_MIME: &str = "image/png";

/// Environment variable naming an existing pdfium library.
pub const PDFIUM_LIB_PATH_ENV: &str = "PDFIUM_LIB_PATH";

/// Where the pdfium shared library is loaded from.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum LibrarySource {
    /// `PDFIUM_LIB_PATH`, then the working directory, then next to the
    /// executable, then the system library. (default)
    #[default]
    Auto,
    /// An explicit library file.
    Path(PathBuf),
    /// The system library only.
    System,
}

/// A concrete library location after [`LibrarySource::resolve`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ResolvedLibrary {
    File(PathBuf),
    System,
}

impl LibrarySource {
    /// Build a source from a CLI/env value; `None` means [`LibrarySource::Auto`].
    pub fn from_option(path: Option<PathBuf>) -> Self {
        match path {
            Some(p) => LibrarySource::Path(p),
            None => LibrarySource::Auto,
        }
    }

    /// Resolve to a concrete location. Missing explicit paths are kept as-is
    /// so the bind error names the file the caller asked for.
    pub fn resolve(&self) -> ResolvedLibrary {
        match self {
            LibrarySource::Path(p) => ResolvedLibrary::File(p.clone()),
            LibrarySource::System => ResolvedLibrary::System,
            LibrarySource::Auto => {
                let found = search_paths().into_iter().find(|p| p.exists());
                match found {
                    Some(p) => {
                        debug!("Using pdfium library at {}", p.display());
                        ResolvedLibrary::File(p)
                    }
                    None => {
                        debug!("No local pdfium library found; using system library");
                        ResolvedLibrary::System
                    }
                }
            }
        }
    }
}

/// Candidate library files for [`LibrarySource::Auto`], in priority order.
fn search_paths() -> Vec<PathBuf> {
    let mut paths = Vec::new();

    if let Ok(p) = std::env::var(PDFIUM_LIB_PATH_ENV) {
        if !p.is_empty() {
            paths.push(PathBuf::from(p));
        }
    }

    if let Ok(cwd) = std::env::current_dir() {
        paths.push(platform_library_in(&cwd));
    }

    if let Ok(exe) = std::env::current_exe() {
        if let Some(parent) = exe.parent() {
            paths.push(platform_library_in(parent));
            paths.push(platform_library_in(&parent.join("lib")));
        }
    }

    paths
}

/// `dir/libpdfium.so`, `dir/libpdfium.dylib` or `dir\pdfium.dll`.
fn platform_library_in(dir: &Path) -> PathBuf {
    let name = if cfg!(target_os = "windows") {
        "pdfium.dll"
    } else if cfg!(target_os = "macos") {
        "libpdfium.dylib"
    } else {
        "libpdfium.so"
    };
    dir.join(name)
}
