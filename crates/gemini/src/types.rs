//! Wire types for the remote service's JSON responses.
//!
//! Request bodies are built inline with `serde_json::json!`; responses
//! are deserialized into the strongly-typed structs here. Field names
//! follow the service's camelCase JSON, with snake_case aliases where
//! the service has been observed emitting either.

use serde::Deserialize;

// ---------------------------------------------------------------------------
// generateContent (image edit)
// ---------------------------------------------------------------------------

/// Response of a `models/{model}:generateContent` call.
#[derive(Debug, Clone, Deserialize)]
pub struct GenerateContentResponse {
    #[serde(default)]
    pub candidates: Vec<Candidate>,
}

/// One generated candidate.
#[derive(Debug, Clone, Deserialize)]
pub struct Candidate {
    pub content: Option<Content>,
}

/// Ordered content parts of a candidate.
#[derive(Debug, Clone, Deserialize)]
pub struct Content {
    #[serde(default)]
    pub parts: Vec<Part>,
}

/// A single content part: text, inline media, or something newer this
/// client does not model (both fields `None`).
#[derive(Debug, Clone, Default, Deserialize)]
pub struct Part {
    #[serde(default)]
    pub text: Option<String>,
    #[serde(rename = "inlineData", alias = "inline_data", default)]
    pub inline_data: Option<InlineData>,
}

/// Base64-encoded inline media.
#[derive(Debug, Clone, Deserialize)]
pub struct InlineData {
    #[serde(rename = "mimeType", alias = "mime_type")]
    pub mime_type: String,
    pub data: String,
}

impl GenerateContentResponse {
    /// First part across all candidates whose declared type marks image
    /// data and that actually carries data.
    pub fn first_image_part(&self) -> Option<&InlineData> {
        self.candidates
            .iter()
            .filter_map(|c| c.content.as_ref())
            .flat_map(|content| content.parts.iter())
            .filter_map(|part| part.inline_data.as_ref())
            .find(|inline| inline.mime_type.starts_with("image/") && !inline.data.is_empty())
    }
}

// ---------------------------------------------------------------------------
// Long-running operations (video generation)
// ---------------------------------------------------------------------------

/// A long-running operation, as returned by `predictLongRunning` and by
/// polling the operation name.
#[derive(Debug, Clone, Deserialize)]
pub struct Operation {
    /// Server-assigned operation name, used as the poll path.
    #[serde(default)]
    pub name: String,
    /// Whether the operation has finished (success or failure).
    #[serde(default)]
    pub done: bool,
    /// Error status, set when the operation finished unsuccessfully.
    #[serde(default)]
    pub error: Option<OperationStatus>,
    /// Result payload, set when the operation finished successfully.
    #[serde(default)]
    pub response: Option<OperationResponse>,
}

/// Service-reported failure of an operation.
#[derive(Debug, Clone, Deserialize)]
pub struct OperationStatus {
    #[serde(default)]
    pub code: i32,
    #[serde(default)]
    pub message: String,
}

/// Result payload of a finished video operation.
#[derive(Debug, Clone, Deserialize)]
pub struct OperationResponse {
    #[serde(rename = "generateVideoResponse", default)]
    pub generate_video_response: Option<GenerateVideoResponse>,
}

/// The generated videos of one job.
#[derive(Debug, Clone, Deserialize)]
pub struct GenerateVideoResponse {
    #[serde(rename = "generatedSamples", alias = "generatedVideos", default)]
    pub generated_samples: Vec<GeneratedSample>,
}

/// One generated video sample.
#[derive(Debug, Clone, Deserialize)]
pub struct GeneratedSample {
    #[serde(default)]
    pub video: Option<VideoRef>,
}

/// Reference to a downloadable video file.
#[derive(Debug, Clone, Deserialize)]
pub struct VideoRef {
    #[serde(default)]
    pub uri: Option<String>,
}

impl Operation {
    /// Download URI of the first generated video, if any.
    pub fn first_video_uri(&self) -> Option<&str> {
        self.response
            .as_ref()?
            .generate_video_response
            .as_ref()?
            .generated_samples
            .iter()
            .filter_map(|sample| sample.video.as_ref())
            .filter_map(|video| video.uri.as_deref())
            .next()
    }
}
