//! Per-view generation state machine.
//!
//! One [`GenerationSession`] backs one view (editor or video). It owns
//! the single authoritative [`GenerationState`], publishes it through a
//! watch channel, and enforces supersession: submitting again while a
//! request is in flight abandons the old request, and any state writes
//! the abandoned task still attempts are dropped by an epoch guard.

use std::sync::atomic::{AtomicU64, AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::{Duration, Instant};

use tokio::sync::watch;
use tokio_util::sync::CancellationToken;

use lumiere_core::error::GenerationError;
use lumiere_core::job::VideoJobPhase;
use lumiere_core::media::{Artifact, MediaPayload, VideoArtifact};
use lumiere_core::progress::loading_message;
use lumiere_core::state::GenerationState;
use lumiere_core::validation::validate_submission;

use crate::poller::{run_video_job, PollerConfig};
use crate::service::MediaService;

/// MIME type assigned to downloaded video artifacts.
const VIDEO_MIME_TYPE: &str = "video/mp4";

/// Shown when the edit flow succeeds without producing an image.
const NO_IMAGE_MESSAGE: &str = "The AI could not generate an image. Try a different prompt.";

/// State machine for one generation view.
///
/// The editor and video flows never share a session; a failure in one
/// cannot touch the other's state.
pub struct GenerationSession<S: MediaService> {
    service: Arc<S>,
    config: PollerConfig,
    shared: Arc<SessionShared>,
    /// Cancellation token of the in-flight request, if any.
    active: Option<CancellationToken>,
}

struct SessionShared {
    state_tx: watch::Sender<GenerationState>,
    /// Bumped on every submit; stale tasks fail the epoch check and
    /// their writes are dropped.
    epoch: AtomicU64,
}

impl<S: MediaService> GenerationSession<S> {
    /// Create an idle session over the given service.
    pub fn new(service: Arc<S>, config: PollerConfig) -> Self {
        let (state_tx, _) = watch::channel(GenerationState::Idle);
        Self {
            service,
            config,
            shared: Arc::new(SessionShared {
                state_tx,
                epoch: AtomicU64::new(0),
            }),
            active: None,
        }
    }

    /// Snapshot of the current state.
    pub fn state(&self) -> GenerationState {
        self.shared.state_tx.borrow().clone()
    }

    /// Subscribe to state changes. The receiver always starts at the
    /// current value.
    pub fn subscribe(&self) -> watch::Receiver<GenerationState> {
        self.shared.state_tx.subscribe()
    }

    /// Submit an image-edit request.
    ///
    /// Validation runs synchronously before any network activity: a
    /// missing image or blank prompt pins the state to
    /// `Failed(Validation)` and returns the error immediately. A valid
    /// request supersedes whatever was in flight and moves the state to
    /// `Submitting` before this call returns.
    pub fn submit_edit(
        &mut self,
        payload: Option<MediaPayload>,
        prompt: impl Into<String>,
    ) -> Result<(), GenerationError> {
        let prompt = prompt.into();
        let (sink, cancel) = self.supersede();
        let payload = match validate_submission(payload, &prompt) {
            Ok(payload) => payload,
            Err(error) => {
                sink.set(GenerationState::Failed {
                    error: error.clone(),
                });
                return Err(error);
            }
        };
        sink.set(GenerationState::Submitting);

        let service = Arc::clone(&self.service);
        tokio::spawn(async move {
            tokio::select! {
                _ = cancel.cancelled() => {
                    tracing::debug!("Edit request superseded");
                }
                state = edit_outcome(service.as_ref(), &payload, &prompt) => {
                    sink.set(state);
                }
            }
        });
        Ok(())
    }

    /// Submit a video-generation request.
    ///
    /// Same contract as [`submit_edit`](Self::submit_edit); on success
    /// the spawned task walks the job through submission, polling,
    /// download, and a terminal state, rotating the progress label on
    /// its own timer.
    pub fn submit_video(
        &mut self,
        payload: Option<MediaPayload>,
        prompt: impl Into<String>,
    ) -> Result<(), GenerationError> {
        let prompt = prompt.into();
        let (sink, cancel) = self.supersede();
        let payload = match validate_submission(payload, &prompt) {
            Ok(payload) => payload,
            Err(error) => {
                sink.set(GenerationState::Failed {
                    error: error.clone(),
                });
                return Err(error);
            }
        };
        sink.set(GenerationState::Submitting);

        let service = Arc::clone(&self.service);
        let config = self.config.clone();
        tokio::spawn(async move {
            tokio::select! {
                _ = cancel.cancelled() => {
                    tracing::debug!("Video request superseded");
                }
                () = drive_video(service.as_ref(), payload, prompt, config, &sink) => {}
            }
        });
        Ok(())
    }

    /// Abandon any in-flight request and return to `Idle`.
    pub fn reset(&mut self) {
        let (sink, _cancel) = self.supersede();
        sink.set(GenerationState::Idle);
    }

    /// Invalidate the previous request and hand out the epoch-guarded
    /// sink and cancellation token for the next one.
    fn supersede(&mut self) -> (StateSink, CancellationToken) {
        if let Some(previous) = self.active.take() {
            previous.cancel();
        }
        let epoch = self.shared.epoch.fetch_add(1, Ordering::SeqCst) + 1;
        let cancel = CancellationToken::new();
        self.active = Some(cancel.clone());
        let sink = StateSink {
            shared: Arc::clone(&self.shared),
            epoch,
        };
        (sink, cancel)
    }
}

impl<S: MediaService> Drop for GenerationSession<S> {
    fn drop(&mut self) {
        if let Some(active) = self.active.take() {
            active.cancel();
        }
    }
}

// ---------------------------------------------------------------------------
// Epoch-guarded state sink
// ---------------------------------------------------------------------------

/// Write handle for one request generation.
///
/// Writes are dropped once the session has moved on to a newer epoch,
/// so a late result from an abandoned task cannot corrupt the state of
/// its successor.
struct StateSink {
    shared: Arc<SessionShared>,
    epoch: u64,
}

impl StateSink {
    fn set(&self, state: GenerationState) {
        self.shared.state_tx.send_if_modified(|current| {
            if self.shared.epoch.load(Ordering::SeqCst) != self.epoch {
                return false;
            }
            *current = state;
            true
        });
    }

    /// Update the elapsed time and rotating label of a `Polling` state;
    /// does nothing in any other state.
    fn refresh_progress(&self, elapsed: Duration, message: &'static str) {
        self.shared.state_tx.send_if_modified(|current| {
            if self.shared.epoch.load(Ordering::SeqCst) != self.epoch {
                return false;
            }
            match current {
                GenerationState::Polling {
                    elapsed: current_elapsed,
                    message: current_message,
                    ..
                } => {
                    *current_elapsed = elapsed;
                    *current_message = message;
                    true
                }
                _ => false,
            }
        });
    }
}

// ---------------------------------------------------------------------------
// Flow bodies
// ---------------------------------------------------------------------------

async fn edit_outcome<S>(service: &S, payload: &MediaPayload, prompt: &str) -> GenerationState
where
    S: MediaService + ?Sized,
{
    match service.edit_image(payload, prompt).await {
        Ok(Some(artifact)) => GenerationState::Succeeded {
            artifact: Artifact::Image(artifact),
        },
        Ok(None) => GenerationState::Failed {
            error: GenerationError::EmptyResult(NO_IMAGE_MESSAGE.to_string()),
        },
        Err(error) => GenerationState::Failed { error },
    }
}

async fn drive_video<S>(
    service: &S,
    payload: MediaPayload,
    prompt: String,
    config: PollerConfig,
    sink: &StateSink,
) where
    S: MediaService + ?Sized,
{
    let started = Instant::now();
    let tick = AtomicUsize::new(0usize);

    let job = run_video_job(service, &payload, &prompt, &config, |phase| {
        sink.set(phase_state(phase, started.elapsed(), tick.load(Ordering::Relaxed)));
    });
    tokio::pin!(job);

    let mut rotation = tokio::time::interval(config.message_rotation);
    rotation.set_missed_tick_behavior(tokio::time::MissedTickBehavior::Delay);
    // The first tick of an interval resolves immediately; consume it so
    // the label starts rotating one period in.
    rotation.tick().await;

    loop {
        tokio::select! {
            _ = &mut job => break,
            _ = rotation.tick() => {
                tick.store(tick.load(Ordering::Relaxed) + 1, Ordering::Relaxed);
                sink.refresh_progress(started.elapsed(), loading_message(tick.load(Ordering::Relaxed)));
            }
        }
    }
}

/// Map a poller phase to the view-level state.
fn phase_state(phase: &VideoJobPhase, elapsed: Duration, tick: usize) -> GenerationState {
    match phase {
        VideoJobPhase::NotStarted | VideoJobPhase::Submitted { .. } => GenerationState::Submitting,
        VideoJobPhase::Polling { attempts, .. } => GenerationState::Polling {
            attempts: *attempts,
            elapsed,
            message: loading_message(tick),
        },
        VideoJobPhase::Ready { .. } | VideoJobPhase::Fetching { .. } => {
            GenerationState::Downloading
        }
        VideoJobPhase::Complete { bytes } => GenerationState::Succeeded {
            artifact: Artifact::Video(VideoArtifact {
                bytes: bytes.clone(),
                mime_type: VIDEO_MIME_TYPE.to_string(),
            }),
        },
        VideoJobPhase::Failed { error } => GenerationState::Failed {
            error: error.clone(),
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use lumiere_core::job::JobHandle;

    fn shared() -> Arc<SessionShared> {
        let (state_tx, _) = watch::channel(GenerationState::Idle);
        Arc::new(SessionShared {
            state_tx,
            epoch: AtomicU64::new(1),
        })
    }

    #[test]
    fn sink_writes_at_the_current_epoch() {
        let shared = shared();
        let sink = StateSink {
            shared: Arc::clone(&shared),
            epoch: 1,
        };
        sink.set(GenerationState::Submitting);
        assert_eq!(*shared.state_tx.borrow(), GenerationState::Submitting);
    }

    #[test]
    fn stale_sink_writes_are_dropped() {
        let shared = shared();
        let stale = StateSink {
            shared: Arc::clone(&shared),
            epoch: 1,
        };
        let current = StateSink {
            shared: Arc::clone(&shared),
            epoch: 2,
        };
        shared.epoch.store(2, Ordering::SeqCst);

        current.set(GenerationState::Submitting);
        stale.set(GenerationState::Failed {
            error: GenerationError::service(None, "late failure from an abandoned job"),
        });
        assert_eq!(*shared.state_tx.borrow(), GenerationState::Submitting);
    }

    #[test]
    fn refresh_progress_only_touches_polling() {
        let shared = shared();
        let sink = StateSink {
            shared: Arc::clone(&shared),
            epoch: 1,
        };
        sink.set(GenerationState::Downloading);
        sink.refresh_progress(Duration::from_secs(15), "still at it");
        assert_eq!(*shared.state_tx.borrow(), GenerationState::Downloading);

        sink.set(GenerationState::Polling {
            attempts: 2,
            elapsed: Duration::from_secs(20),
            message: "first",
        });
        sink.refresh_progress(Duration::from_secs(25), "second");
        assert_eq!(
            *shared.state_tx.borrow(),
            GenerationState::Polling {
                attempts: 2,
                elapsed: Duration::from_secs(25),
                message: "second",
            }
        );
    }

    #[test]
    fn phase_state_maps_terminal_phases() {
        let complete = VideoJobPhase::Complete {
            bytes: vec![0x00, 0x01],
        };
        let state = phase_state(&complete, Duration::ZERO, 0);
        assert_eq!(
            state.artifact(),
            Some(&Artifact::Video(VideoArtifact {
                bytes: vec![0x00, 0x01],
                mime_type: VIDEO_MIME_TYPE.to_string(),
            }))
        );

        let submitted = VideoJobPhase::Submitted {
            handle: JobHandle::new("operations/x"),
        };
        assert_eq!(
            phase_state(&submitted, Duration::ZERO, 0),
            GenerationState::Submitting
        );
    }
}
