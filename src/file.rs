//! File and blob handles exchanged with the caller.
//!
//! [`InputFile`] is a lazy handle: constructing one from a path does not touch
//! the filesystem, mirroring how a picked file behaves until its bytes are
//! requested. [`Blob`] is the immutable encoded output; [`ImageFile`] names it.

use base64::{engine::general_purpose::STANDARD, Engine as _};
use once_cell::sync::Lazy;
use regex::Regex;
use serde::Serialize;
use std::path::{Path, PathBuf};
use std::sync::Arc;

static PDF_SUFFIX: Lazy<Regex> = Lazy::new(|| Regex::new(r"(?i)\.pdf$").unwrap());

/// Derive the output image name: strip one trailing `.pdf` (any case) and
/// append `.png`.
pub fn output_file_name(input_name: &str) -> String {
    format!("{}.png", PDF_SUFFIX.replace(input_name, ""))
}

#[derive(Debug, Clone)]
enum Source {
    Memory(Arc<[u8]>),
    Disk(PathBuf),
}

/// A named, readable input file.
#[derive(Debug, Clone)]
pub struct InputFile {
    name: String,
    media_type: String,
    source: Source,
}

impl InputFile {
    /// Wrap bytes already in memory.
    pub fn from_bytes(
        name: impl Into<String>,
        media_type: impl Into<String>,
        bytes: impl Into<Arc<[u8]>>,
    ) -> Self {
        Self {
            name: name.into(),
            media_type: media_type.into(),
            source: Source::Memory(bytes.into()),
        }
    }

    /// Refer to a file on disk. The name is the path's final component.
    pub fn from_path(path: impl AsRef<Path>) -> Self {
        let path = path.as_ref();
        let name = path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_default();
        Self {
            name,
            media_type: "application/pdf".to_string(),
            source: Source::Disk(path.to_path_buf()),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn media_type(&self) -> &str {
        &self.media_type
    }

    /// Read the full contents.
    pub async fn array_buffer(&self) -> std::io::Result<Vec<u8>> {
        match &self.source {
            Source::Memory(bytes) => Ok(bytes.to_vec()),
            Source::Disk(path) => tokio::fs::read(path).await,
        }
    }
}

/// Immutable encoded bytes with a MIME type. Clones share the buffer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Blob {
    data: Arc<[u8]>,
    mime_type: String,
}

impl Blob {
    pub fn new(data: impl Into<Arc<[u8]>>, mime_type: impl Into<String>) -> Self {
        Self {
            data: data.into(),
            mime_type: mime_type.into(),
        }
    }

    pub fn bytes(&self) -> &[u8] {
        &self.data
    }

    pub fn mime_type(&self) -> &str {
        &self.mime_type
    }

    pub fn size(&self) -> usize {
        self.data.len()
    }

    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }
}

/// The downloadable image produced by a successful conversion.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ImageFile {
    name: String,
    #[serde(rename = "type")]
    media_type: String,
    size: usize,
    #[serde(skip)]
    blob: Blob,
}

impl ImageFile {
    /// Wrap `blob` under `name`, typed as `media_type`.
    pub fn new(blob: Blob, name: impl Into<String>, media_type: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            media_type: media_type.into(),
            size: blob.size(),
            blob,
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn media_type(&self) -> &str {
        &self.media_type
    }

    pub fn bytes(&self) -> &[u8] {
        self.blob.bytes()
    }

    pub fn blob(&self) -> &Blob {
        &self.blob
    }

    /// `data:<type>;base64,<payload>` for embedding outside the host.
    pub fn to_data_url(&self) -> String {
        format!("data:{};base64,{}", self.media_type, STANDARD.encode(self.bytes()))
    }

    /// Write the image to `path` atomically (temp file + rename).
    pub async fn write_to(&self, path: impl AsRef<Path>) -> std::io::Result<()> {
        let path = path.as_ref();
        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() {
                tokio::fs::create_dir_all(parent).await?;
            }
        }
        let tmp_path = path.with_extension("png.tmp");
        tokio::fs::write(&tmp_path, self.bytes()).await?;
        tokio::fs::rename(&tmp_path, path).await
    }
}
