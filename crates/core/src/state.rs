//! View-level generation state.
//!
//! [`GenerationState`] is the single value a presentation layer renders
//! from: exactly one of inactive, in-progress (with a progress label),
//! succeeded (with the artifact), or failed (with a message) holds at
//! any time. Both the edit and the video flow publish this type; the
//! edit flow simply never enters the polling or downloading variants.

use std::time::Duration;

use crate::error::GenerationError;
use crate::media::Artifact;

/// Current state of one generation flow.
#[derive(Debug, Clone, PartialEq)]
pub enum GenerationState {
    /// No request submitted yet (or the session was reset).
    Idle,
    /// The request is being validated/encoded/submitted.
    Submitting,
    /// A video job is being polled.
    Polling {
        /// Poll round trips completed so far.
        attempts: u32,
        /// Time since the request was submitted.
        elapsed: Duration,
        /// Current rotating progress label.
        message: &'static str,
    },
    /// The finished result is being downloaded.
    Downloading,
    /// The flow produced an artifact.
    Succeeded { artifact: Artifact },
    /// The flow failed; `error` renders as the user-visible message.
    Failed { error: GenerationError },
}

impl GenerationState {
    /// Whether a request is currently in flight.
    pub fn is_in_progress(&self) -> bool {
        matches!(
            self,
            Self::Submitting | Self::Polling { .. } | Self::Downloading
        )
    }

    /// Whether the flow has reached a terminal outcome.
    pub fn is_terminal(&self) -> bool {
        matches!(self, Self::Succeeded { .. } | Self::Failed { .. })
    }

    /// The artifact, if the flow succeeded.
    pub fn artifact(&self) -> Option<&Artifact> {
        match self {
            Self::Succeeded { artifact } => Some(artifact),
            _ => None,
        }
    }

    /// The failure, if the flow failed.
    pub fn error(&self) -> Option<&GenerationError> {
        match self {
            Self::Failed { error } => Some(error),
            _ => None,
        }
    }
}
