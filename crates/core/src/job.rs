//! Video-job state machine.
//!
//! A video generation is a multi-step remote operation: submit, poll
//! until the service reports completion, then fetch the result bytes.
//! [`advance`] performs exactly one transition per external event, so
//! the whole lifecycle is testable without a network. The async driver
//! that feeds it real events lives in `lumiere-pipeline`.

use crate::error::GenerationError;

// ---------------------------------------------------------------------------
// Handles and poll results
// ---------------------------------------------------------------------------

/// Opaque token for a submitted video-generation operation.
///
/// Wraps the operation name the remote service assigns. The poller owns
/// it while the job is in flight; terminal phases no longer carry it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct JobHandle(String);

impl JobHandle {
    /// Wrap a server-assigned operation name.
    pub fn new(operation_name: impl Into<String>) -> Self {
        Self(operation_name.into())
    }

    /// The raw operation name.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

/// Outcome of a single poll round trip.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PollStatus {
    /// Whether the remote operation has finished.
    pub done: bool,
    /// Download URI for the result, present on a productive completion.
    pub result_uri: Option<String>,
}

// ---------------------------------------------------------------------------
// Phases and events
// ---------------------------------------------------------------------------

/// Lifecycle phase of one video-generation job.
///
/// `Complete` and `Failed` are terminal; `Failed` is reachable from
/// every non-terminal phase.
#[derive(Debug, Clone, PartialEq)]
pub enum VideoJobPhase {
    /// Nothing submitted yet.
    NotStarted,
    /// The job was accepted by the service; no poll has resolved yet.
    Submitted { handle: JobHandle },
    /// At least one poll came back with the job still running.
    Polling { handle: JobHandle, attempts: u32 },
    /// The service reported completion with a result URI.
    Ready { uri: String },
    /// The result bytes are being downloaded.
    Fetching { uri: String },
    /// The artifact bytes were retrieved.
    Complete { bytes: Vec<u8> },
    /// The job failed; `error` says how.
    Failed { error: GenerationError },
}

impl VideoJobPhase {
    /// Whether this phase ends the job.
    pub fn is_terminal(&self) -> bool {
        matches!(self, Self::Complete { .. } | Self::Failed { .. })
    }
}

/// One external observation about a job.
#[derive(Debug, Clone, PartialEq)]
pub enum JobEvent {
    /// Submission round trip succeeded.
    SubmitSucceeded { handle: JobHandle },
    /// Submission round trip failed.
    SubmitFailed { error: GenerationError },
    /// A poll round trip resolved.
    PollSucceeded { status: PollStatus },
    /// A poll round trip failed at the transport level.
    PollFailed { error: GenerationError },
    /// The result download was started.
    FetchStarted,
    /// The result download finished with these bytes.
    FetchSucceeded { bytes: Vec<u8> },
    /// The result download failed.
    FetchFailed { error: GenerationError },
}

// ---------------------------------------------------------------------------
// Transition function
// ---------------------------------------------------------------------------

/// Apply one event to a phase, producing the next phase.
///
/// An event that does not apply to the current phase leaves it
/// unchanged; in particular nothing moves a terminal phase, so a
/// late-arriving poll result cannot corrupt a finished job.
///
/// A completion without a result URI becomes
/// `Failed(EmptyResult)` — the service succeeded and produced nothing,
/// which is not a transport error.
pub fn advance(phase: VideoJobPhase, event: JobEvent) -> VideoJobPhase {
    use JobEvent as E;
    use VideoJobPhase as P;

    match (phase, event) {
        (P::NotStarted, E::SubmitSucceeded { handle }) => P::Submitted { handle },
        (P::NotStarted, E::SubmitFailed { error }) => P::Failed { error },

        (P::Submitted { handle }, E::PollSucceeded { status }) => poll_outcome(handle, 0, status),
        (P::Polling { handle, attempts }, E::PollSucceeded { status }) => {
            poll_outcome(handle, attempts, status)
        }
        (P::Submitted { .. } | P::Polling { .. }, E::PollFailed { error }) => P::Failed { error },

        (P::Ready { uri }, E::FetchStarted) => P::Fetching { uri },
        (P::Fetching { .. }, E::FetchSucceeded { bytes }) => P::Complete { bytes },
        (P::Fetching { .. }, E::FetchFailed { error }) => P::Failed { error },

        // Anything else is stale or out of order; hold the phase.
        (phase, _) => phase,
    }
}

fn poll_outcome(handle: JobHandle, attempts: u32, status: PollStatus) -> VideoJobPhase {
    if !status.done {
        return VideoJobPhase::Polling {
            handle,
            attempts: attempts + 1,
        };
    }
    match status.result_uri {
        Some(uri) => VideoJobPhase::Ready { uri },
        None => VideoJobPhase::Failed {
            error: GenerationError::EmptyResult(
                "The service finished the video job without producing a result. \
                 Try a different image or prompt."
                    .into(),
            ),
        },
    }
}
