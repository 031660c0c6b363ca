//! Async file encoder: user-selected file → [`MediaPayload`].
//!
//! Reads the file off the caller's thread of control, sniffs the image
//! format from its magic bytes, and produces one payload per call. No
//! retry happens here; retry policy belongs to the caller.

use std::path::Path;

use lumiere_core::error::GenerationError;
use lumiere_core::media::MediaPayload;

/// Read an image file and produce a transport-safe payload.
///
/// Fails with [`GenerationError::Read`] when the file cannot be read
/// or its content is not a recognized image format.
pub async fn encode_file(path: impl AsRef<Path>) -> Result<MediaPayload, GenerationError> {
    let path = path.as_ref();
    let bytes = tokio::fs::read(path)
        .await
        .map_err(|e| GenerationError::Read(format!("{}: {e}", path.display())))?;
    let format = image::guess_format(&bytes).map_err(|_| {
        GenerationError::Read(format!("{} is not a supported image format", path.display()))
    })?;
    MediaPayload::from_bytes(bytes, format.to_mime_type())
}
