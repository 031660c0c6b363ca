//! Driver for one video-generation job.
//!
//! [`run_video_job`] feeds real events (submission result, poll
//! results, download result) into the pure transition function in
//! [`lumiere_core::job`], sleeping a fixed interval between polls and
//! reporting every phase through a callback.

use std::time::Duration;

use lumiere_core::job::{advance, JobEvent, VideoJobPhase};
use lumiere_core::media::MediaPayload;

use crate::service::MediaService;

/// Tunable timing for the video flow.
///
/// Both values are UX tuning, not protocol requirements.
#[derive(Debug, Clone)]
pub struct PollerConfig {
    /// Pause between consecutive polls of a running job.
    pub poll_interval: Duration,
    /// Cadence of the rotating progress label.
    pub message_rotation: Duration,
}

impl Default for PollerConfig {
    fn default() -> Self {
        Self {
            poll_interval: Duration::from_secs(10),
            message_rotation: Duration::from_secs(5),
        }
    }
}

/// Run one video job from submission to a terminal phase.
///
/// Polls are single-flight: the next one is not issued until the
/// previous response has been processed. No upper bound is placed on
/// the number of polls — the remote service is trusted to terminate
/// every operation, and a caller that wants a wall-clock cap can drop
/// or supersede the task driving this future.
///
/// `on_phase` is invoked after every transition, including the
/// terminal one.
pub async fn run_video_job<S>(
    service: &S,
    payload: &MediaPayload,
    prompt: &str,
    config: &PollerConfig,
    mut on_phase: impl FnMut(&VideoJobPhase),
) -> VideoJobPhase
where
    S: MediaService + ?Sized,
{
    let event = match service.start_video_job(payload, prompt).await {
        Ok(handle) => JobEvent::SubmitSucceeded { handle },
        Err(error) => JobEvent::SubmitFailed { error },
    };
    let mut phase = advance(VideoJobPhase::NotStarted, event);
    on_phase(&phase);

    loop {
        match &phase {
            VideoJobPhase::Submitted { handle } | VideoJobPhase::Polling { handle, .. } => {
                let handle = handle.clone();
                tokio::time::sleep(config.poll_interval).await;
                let event = match service.poll_video_job(&handle).await {
                    Ok(status) => JobEvent::PollSucceeded { status },
                    Err(error) => JobEvent::PollFailed { error },
                };
                phase = advance(phase, event);
                on_phase(&phase);
            }
            VideoJobPhase::Ready { uri } => {
                let uri = uri.clone();
                phase = advance(phase, JobEvent::FetchStarted);
                on_phase(&phase);
                let event = match service.download_artifact(&uri).await {
                    Ok(bytes) => JobEvent::FetchSucceeded { bytes },
                    Err(error) => JobEvent::FetchFailed { error },
                };
                phase = advance(phase, event);
                on_phase(&phase);
            }
            VideoJobPhase::Complete { .. } | VideoJobPhase::Failed { .. } => break,
            // Submission always moves off NotStarted, and the Ready arm
            // runs Fetching through to a terminal phase.
            VideoJobPhase::NotStarted | VideoJobPhase::Fetching { .. } => break,
        }
    }

    match &phase {
        VideoJobPhase::Complete { bytes } => {
            tracing::info!(size = bytes.len(), "Video job complete");
        }
        VideoJobPhase::Failed { error } => {
            tracing::warn!(error = %error, "Video job failed");
        }
        _ => {}
    }
    phase
}
