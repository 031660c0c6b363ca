//! Media payloads and generation artifacts.
//!
//! [`MediaPayload`] is the transport-safe form of a user-selected
//! image: raw bytes plus a base64 encoding computed once at
//! construction. [`Artifact`] is what a successful generation hands
//! back to the presentation layer, which owns the buffer until it
//! drops it.

use base64::engine::general_purpose::STANDARD as BASE64;
use base64::Engine as _;

use crate::error::GenerationError;

// ---------------------------------------------------------------------------
// MediaPayload
// ---------------------------------------------------------------------------

/// An image ready for submission to the generation service.
///
/// Fields are private so the encoded form can never drift from the
/// bytes it was derived from; a different image means a new payload.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MediaPayload {
    bytes: Vec<u8>,
    mime_type: String,
    encoded: String,
}

impl MediaPayload {
    /// Build a payload from raw image bytes and their declared MIME type.
    ///
    /// Encoding is deterministic: the same bytes always produce the
    /// same encoded form. Empty input fails with
    /// [`GenerationError::Read`].
    pub fn from_bytes(
        bytes: Vec<u8>,
        mime_type: impl Into<String>,
    ) -> Result<Self, GenerationError> {
        if bytes.is_empty() {
            return Err(GenerationError::Read("the file is empty".into()));
        }
        let encoded = BASE64.encode(&bytes);
        Ok(Self {
            bytes,
            mime_type: mime_type.into(),
            encoded,
        })
    }

    /// Raw image bytes.
    pub fn bytes(&self) -> &[u8] {
        &self.bytes
    }

    /// Declared MIME type, e.g. `image/png`.
    pub fn mime_type(&self) -> &str {
        &self.mime_type
    }

    /// Base64 (standard alphabet) encoding of the bytes.
    pub fn encoded(&self) -> &str {
        &self.encoded
    }
}

// ---------------------------------------------------------------------------
// Artifacts
// ---------------------------------------------------------------------------

/// An edited image returned by the remote service.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImageArtifact {
    /// Decoded image bytes.
    pub bytes: Vec<u8>,
    /// MIME type reported by the service.
    pub mime_type: String,
}

impl ImageArtifact {
    /// Render the image as a `data:` URI, the form an `<img>` tag
    /// consumes directly.
    pub fn to_data_uri(&self) -> String {
        format!(
            "data:{};base64,{}",
            self.mime_type,
            BASE64.encode(&self.bytes)
        )
    }
}

/// A generated video downloaded from the remote service.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VideoArtifact {
    /// Raw video container bytes.
    pub bytes: Vec<u8>,
    /// MIME type of the container.
    pub mime_type: String,
}

/// The final result of a successful generation.
///
/// Owned by whoever holds the succeeded state; releasing the buffer is
/// an ordinary drop.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Artifact {
    /// Edit flow result.
    Image(ImageArtifact),
    /// Video flow result.
    Video(VideoArtifact),
}
