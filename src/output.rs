//! The value every conversion returns.

use crate::error::ConvertError;
use crate::file::ImageFile;
use serde::Serialize;

/// Outcome of [`crate::convert::Converter::convert`].
///
/// Exactly one side is populated: either `image_url` + `file` (success), or
/// `error` with `image_url == ""` and `file == None` (failure). The fields are
/// private so that invariant cannot be broken after construction.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PdfConversionResult {
    image_url: String,
    file: Option<ImageFile>,
    #[serde(skip_serializing_if = "Option::is_none")]
    error: Option<String>,
}

impl PdfConversionResult {
    pub(crate) fn success(image_url: String, file: ImageFile) -> Self {
        Self {
            image_url,
            file: Some(file),
            error: None,
        }
    }

    /// A failed result carrying `message` verbatim.
    pub fn failure(message: impl Into<String>) -> Self {
        Self {
            image_url: String::new(),
            file: None,
            error: Some(message.into()),
        }
    }

    /// Map a pipeline error to its caller-facing message.
    ///
    /// The environment and blob failures keep their fixed text; everything
    /// else is prefixed with `Failed to convert PDF:`.
    pub fn from_error(err: &ConvertError) -> Self {
        match err {
            ConvertError::BrowserRequired | ConvertError::BlobCreationFailed => {
                Self::failure(err.to_string())
            }
            other => Self::failure(format!("Failed to convert PDF: {other}")),
        }
    }

    /// Object URL for the rendered image; empty on failure.
    pub fn image_url(&self) -> &str {
        &self.image_url
    }

    pub fn file(&self) -> Option<&ImageFile> {
        self.file.as_ref()
    }

    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }

    pub fn is_success(&self) -> bool {
        self.error.is_none()
    }

    /// Take ownership of the image file, if any.
    pub fn into_file(self) -> Option<ImageFile> {
        self.file
    }
}
