//! Scripted [`MediaService`] stub shared by the flow tests.

#![allow(dead_code)]

use std::collections::VecDeque;
use std::sync::Mutex;

use async_trait::async_trait;

use lumiere_core::error::GenerationError;
use lumiere_core::job::{JobHandle, PollStatus};
use lumiere_core::media::{ImageArtifact, MediaPayload};
use lumiere_pipeline::service::MediaService;

type Script<T> = Mutex<VecDeque<Result<T, GenerationError>>>;

/// Replays pre-scripted results for each operation, in order, and
/// records which operations were called.
#[derive(Default)]
pub struct ScriptedService {
    edit_results: Script<Option<ImageArtifact>>,
    submit_results: Script<JobHandle>,
    poll_results: Script<PollStatus>,
    download_results: Script<Vec<u8>>,
    calls: Mutex<Vec<&'static str>>,
}

impl ScriptedService {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push_edit(&self, result: Result<Option<ImageArtifact>, GenerationError>) {
        self.edit_results.lock().unwrap().push_back(result);
    }

    pub fn push_submit(&self, result: Result<JobHandle, GenerationError>) {
        self.submit_results.lock().unwrap().push_back(result);
    }

    pub fn push_poll(&self, result: Result<PollStatus, GenerationError>) {
        self.poll_results.lock().unwrap().push_back(result);
    }

    pub fn push_download(&self, result: Result<Vec<u8>, GenerationError>) {
        self.download_results.lock().unwrap().push_back(result);
    }

    /// Names of the operations called so far, in order.
    pub fn calls(&self) -> Vec<&'static str> {
        self.calls.lock().unwrap().clone()
    }

    pub fn call_count(&self) -> usize {
        self.calls.lock().unwrap().len()
    }

    fn record(&self, name: &'static str) {
        self.calls.lock().unwrap().push(name);
    }
}

#[async_trait]
impl MediaService for ScriptedService {
    async fn edit_image(
        &self,
        _payload: &MediaPayload,
        _prompt: &str,
    ) -> Result<Option<ImageArtifact>, GenerationError> {
        self.record("edit");
        self.edit_results
            .lock()
            .unwrap()
            .pop_front()
            .expect("edit script exhausted")
    }

    async fn start_video_job(
        &self,
        _payload: &MediaPayload,
        _prompt: &str,
    ) -> Result<JobHandle, GenerationError> {
        self.record("submit");
        self.submit_results
            .lock()
            .unwrap()
            .pop_front()
            .expect("submit script exhausted")
    }

    async fn poll_video_job(&self, _handle: &JobHandle) -> Result<PollStatus, GenerationError> {
        self.record("poll");
        self.poll_results
            .lock()
            .unwrap()
            .pop_front()
            .expect("poll script exhausted")
    }

    async fn download_artifact(&self, _uri: &str) -> Result<Vec<u8>, GenerationError> {
        self.record("download");
        self.download_results
            .lock()
            .unwrap()
            .pop_front()
            .expect("download script exhausted")
    }
}

/// A payload that passes validation.
pub fn payload() -> MediaPayload {
    MediaPayload::from_bytes(vec![1, 2, 3], "image/png").unwrap()
}
