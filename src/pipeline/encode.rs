//! Surface export: callback-style `to_blob` → awaited PNG [`Blob`].
//!
//! Hosts report the export result through a one-shot callback, possibly from
//! another thread. A `tokio::sync::oneshot` channel turns that back into a
//! value the async pipeline can await. A callback that is dropped without
//! firing counts as "no blob".

use crate::config::{EXPORT_QUALITY, OUTPUT_MIME};
use crate::error::ConvertError;
use crate::file::{output_file_name, Blob, ImageFile};
use crate::host::DrawingSurface;
use tokio::sync::oneshot;
use tracing::{debug, warn};

/// Export `surface` as PNG at [`EXPORT_QUALITY`].
pub async fn export_png(surface: Box<dyn DrawingSurface>) -> Result<Blob, ConvertError> {
    let (tx, rx) = oneshot::channel();
    surface.to_blob(
        OUTPUT_MIME,
        EXPORT_QUALITY,
        Box::new(move |blob: Option<Blob>| {
            let _ = tx.send(blob);
        }),
    );

    match rx.await {
        Ok(Some(blob)) if !blob.is_empty() => {
            debug!("Exported {} bytes {}", blob.size(), blob.mime_type());
            Ok(blob)
        }
        Ok(_) => Err(ConvertError::BlobCreationFailed),
        Err(_) => {
            warn!("Surface dropped its export callback without a result");
            Err(ConvertError::BlobCreationFailed)
        }
    }
}

/// Wrap an exported blob as the downloadable `<stem>.png` file.
pub fn image_file_for(input_name: &str, blob: Blob) -> ImageFile {
    ImageFile::new(blob, output_file_name(input_name), OUTPUT_MIME)
}
