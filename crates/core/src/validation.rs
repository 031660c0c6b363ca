//! Pre-network submission validation.
//!
//! Runs synchronously inside `submit` so an invalid request fails
//! before any network activity is observed.

use crate::error::GenerationError;
use crate::media::MediaPayload;

/// Validate the `(image, prompt)` pair for either flow and hand back
/// the payload for submission.
///
/// - The image must be present (a constructed [`MediaPayload`] is
///   already guaranteed non-empty).
/// - The prompt must contain something other than whitespace.
pub fn validate_submission(
    payload: Option<MediaPayload>,
    prompt: &str,
) -> Result<MediaPayload, GenerationError> {
    let Some(payload) = payload else {
        return Err(GenerationError::Validation(
            "Upload an image before submitting.".to_string(),
        ));
    };
    if prompt.trim().is_empty() {
        return Err(GenerationError::Validation(
            "Describe what you want before submitting.".to_string(),
        ));
    }
    Ok(payload)
}
