//! REST client for the generative-media service.
//!
//! One [`GeminiClient`] serves both flows: `edit_image` is a single
//! round trip, `start_video_job` / `poll_video_job` /
//! `download_artifact` are the three legs of the long-running video
//! path. Every method performs exactly one round trip; looping and
//! retry policy belong to the caller.

use base64::engine::general_purpose::STANDARD as BASE64;
use base64::Engine as _;
use serde_json::json;

use lumiere_core::error::GenerationError;
use lumiere_core::job::{JobHandle, PollStatus};
use lumiere_core::media::{ImageArtifact, MediaPayload};

use crate::config::GeminiConfig;
use crate::types::{GenerateContentResponse, Operation};

/// HTTP client for the generative-media service.
pub struct GeminiClient {
    client: reqwest::Client,
    config: GeminiConfig,
}

impl GeminiClient {
    /// Create a client from validated startup configuration.
    pub fn new(config: GeminiConfig) -> Self {
        Self {
            client: reqwest::Client::new(),
            config,
        }
    }

    /// Create a client reusing an existing [`reqwest::Client`]
    /// (useful for connection pooling across clients).
    pub fn with_client(client: reqwest::Client, config: GeminiConfig) -> Self {
        Self { client, config }
    }

    /// The configuration this client was built with.
    pub fn config(&self) -> &GeminiConfig {
        &self.config
    }

    /// Ask the service for an edited version of `payload`.
    ///
    /// Scans all returned content parts and returns the first one whose
    /// declared type marks image data. A successful response with no
    /// such part is `Ok(None)` — a different outcome from a transport
    /// or protocol failure, which is `Err(Service)`.
    pub async fn edit_image(
        &self,
        payload: &MediaPayload,
        prompt: &str,
    ) -> Result<Option<ImageArtifact>, GenerationError> {
        let url = format!(
            "{}/models/{}:generateContent",
            self.config.api_base, self.config.image_model
        );
        let body = json!({
            "contents": [{
                "role": "user",
                "parts": [
                    { "inlineData": {
                        "mimeType": payload.mime_type(),
                        "data": payload.encoded(),
                    }},
                    { "text": prompt },
                ],
            }],
            "generationConfig": {
                "responseModalities": ["IMAGE", "TEXT"],
            },
        });

        let response = self
            .client
            .post(url)
            .query(&[("key", self.config.api_key.as_str())])
            .json(&body)
            .send()
            .await
            .map_err(request_error)?;
        let parsed: GenerateContentResponse = Self::parse_response(response).await?;

        match parsed.first_image_part() {
            Some(inline) => {
                let bytes = BASE64.decode(inline.data.as_bytes()).map_err(|e| {
                    GenerationError::service(None, format!("could not decode image data: {e}"))
                })?;
                Ok(Some(ImageArtifact {
                    bytes,
                    mime_type: inline.mime_type.clone(),
                }))
            }
            None => {
                tracing::warn!(model = %self.config.image_model, "Edit response contained no image part");
                Ok(None)
            }
        }
    }

    /// Submit a video-generation job and return its handle.
    ///
    /// Returns as soon as the service has accepted the job; completion
    /// is observed through [`poll_video_job`](Self::poll_video_job).
    pub async fn start_video_job(
        &self,
        payload: &MediaPayload,
        prompt: &str,
    ) -> Result<JobHandle, GenerationError> {
        let url = format!(
            "{}/models/{}:predictLongRunning",
            self.config.api_base, self.config.video_model
        );
        let video = &self.config.video;
        let mut parameters = serde_json::Map::new();
        parameters.insert("numberOfVideos".into(), json!(video.count));
        if let Some(resolution) = &video.resolution {
            parameters.insert("resolution".into(), json!(resolution));
        }
        if let Some(aspect_ratio) = &video.aspect_ratio {
            parameters.insert("aspectRatio".into(), json!(aspect_ratio));
        }
        let body = json!({
            "instances": [{
                "prompt": prompt,
                "image": {
                    "bytesBase64Encoded": payload.encoded(),
                    "mimeType": payload.mime_type(),
                },
            }],
            "parameters": parameters,
        });

        let response = self
            .client
            .post(url)
            .query(&[("key", self.config.api_key.as_str())])
            .json(&body)
            .send()
            .await
            .map_err(request_error)?;
        let operation: Operation = Self::parse_response(response).await?;

        if operation.name.is_empty() {
            return Err(GenerationError::service(
                None,
                "the service accepted the video job but returned no operation name",
            ));
        }
        tracing::info!(operation = %operation.name, "Video job submitted");
        Ok(JobHandle::new(operation.name))
    }

    /// Check a video job once. Never loops or waits.
    pub async fn poll_video_job(&self, handle: &JobHandle) -> Result<PollStatus, GenerationError> {
        let url = format!("{}/{}", self.config.api_base, handle.as_str());
        let response = self
            .client
            .get(url)
            .query(&[("key", self.config.api_key.as_str())])
            .send()
            .await
            .map_err(request_error)?;
        let operation: Operation = Self::parse_response(response).await?;

        if let Some(status) = operation.error {
            return Err(GenerationError::service(
                None,
                format!(
                    "the video job failed (code {}): {}",
                    status.code, status.message
                ),
            ));
        }
        tracing::debug!(operation = %handle.as_str(), done = operation.done, "Polled video job");
        Ok(PollStatus {
            result_uri: operation.first_video_uri().map(str::to_string),
            done: operation.done,
        })
    }

    /// Download the finished artifact from its result URI.
    ///
    /// The download endpoint is authenticated with the same credential
    /// used for submission, passed as a query parameter.
    pub async fn download_artifact(&self, uri: &str) -> Result<Vec<u8>, GenerationError> {
        let response = self
            .client
            .get(uri)
            .query(&[("key", self.config.api_key.as_str())])
            .send()
            .await
            .map_err(request_error)?;

        let status = response.status();
        if !status.is_success() {
            return Err(GenerationError::service(
                Some(status.as_u16()),
                format!("video download failed with status {}", status.as_u16()),
            ));
        }
        let bytes = response.bytes().await.map_err(request_error)?;
        tracing::info!(size = bytes.len(), "Downloaded video artifact");
        Ok(bytes.to_vec())
    }

    // ---- private helpers ----

    /// Ensure the response has a success status code. Returns the
    /// response unchanged on success, or a [`GenerationError::Service`]
    /// carrying the status and body text on failure.
    async fn ensure_success(
        response: reqwest::Response,
    ) -> Result<reqwest::Response, GenerationError> {
        let status = response.status();
        if !status.is_success() {
            let body = response
                .text()
                .await
                .unwrap_or_else(|_| "<unreadable body>".to_string());
            return Err(GenerationError::service(
                Some(status.as_u16()),
                format!("the service responded with status {status}: {body}"),
            ));
        }
        Ok(response)
    }

    /// Parse a successful JSON response body into the expected type.
    async fn parse_response<T: serde::de::DeserializeOwned>(
        response: reqwest::Response,
    ) -> Result<T, GenerationError> {
        let response = Self::ensure_success(response).await?;
        response.json::<T>().await.map_err(|e| {
            GenerationError::service(None, format!("could not decode the service response: {e}"))
        })
    }
}

/// Map a transport-level [`reqwest::Error`] into the flow taxonomy.
fn request_error(error: reqwest::Error) -> GenerationError {
    GenerationError::service(
        error.status().map(|s| s.as_u16()),
        format!("request to the service failed: {error}"),
    )
}
