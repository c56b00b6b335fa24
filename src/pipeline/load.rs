//! Input loading: pull the caller's file into a byte buffer for the engine.

use crate::error::ConvertError;
use crate::file::InputFile;
use tracing::debug;

/// Read the whole input. Parsing happens later, on the render thread.
pub async fn read_input(file: &InputFile) -> Result<Vec<u8>, ConvertError> {
    let bytes = file
        .array_buffer()
        .await
        .map_err(|source| ConvertError::ReadFailed {
            name: file.name().to_string(),
            source,
        })?;

    debug!("Read {} bytes from '{}'", bytes.len(), file.name());
    Ok(bytes)
}
