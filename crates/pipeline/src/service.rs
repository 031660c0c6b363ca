//! The seam between the flows and the remote client.
//!
//! Flows are generic over [`MediaService`] so they can run against a
//! scripted stub in tests; [`lumiere_gemini::client::GeminiClient`] is
//! the production implementation.

use async_trait::async_trait;

use lumiere_core::error::GenerationError;
use lumiere_core::job::{JobHandle, PollStatus};
use lumiere_core::media::{ImageArtifact, MediaPayload};
use lumiere_gemini::client::GeminiClient;

/// The four remote operations the generation flows need.
///
/// Every method is a single round trip; looping, intervals, and retry
/// policy belong to the caller.
#[async_trait]
pub trait MediaService: Send + Sync + 'static {
    /// One edit round trip. `Ok(None)` means the service succeeded but
    /// returned no image content.
    async fn edit_image(
        &self,
        payload: &MediaPayload,
        prompt: &str,
    ) -> Result<Option<ImageArtifact>, GenerationError>;

    /// Submit a video job and return its handle.
    async fn start_video_job(
        &self,
        payload: &MediaPayload,
        prompt: &str,
    ) -> Result<JobHandle, GenerationError>;

    /// Check a submitted job once.
    async fn poll_video_job(&self, handle: &JobHandle) -> Result<PollStatus, GenerationError>;

    /// Download the finished artifact from its result URI.
    async fn download_artifact(&self, uri: &str) -> Result<Vec<u8>, GenerationError>;
}

#[async_trait]
impl MediaService for GeminiClient {
    async fn edit_image(
        &self,
        payload: &MediaPayload,
        prompt: &str,
    ) -> Result<Option<ImageArtifact>, GenerationError> {
        GeminiClient::edit_image(self, payload, prompt).await
    }

    async fn start_video_job(
        &self,
        payload: &MediaPayload,
        prompt: &str,
    ) -> Result<JobHandle, GenerationError> {
        GeminiClient::start_video_job(self, payload, prompt).await
    }

    async fn poll_video_job(&self, handle: &JobHandle) -> Result<PollStatus, GenerationError> {
        GeminiClient::poll_video_job(self, handle).await
    }

    async fn download_artifact(&self, uri: &str) -> Result<Vec<u8>, GenerationError> {
        GeminiClient::download_artifact(self, uri).await
    }
}
