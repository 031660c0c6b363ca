//! Orchestration of the generation flows.
//!
//! [`service::MediaService`] is the seam over the remote client,
//! [`poller::run_video_job`] drives one video job from submission to a
//! terminal phase, and [`session::GenerationSession`] is the per-view
//! state machine the presentation layer talks to.

pub mod poller;
pub mod service;
pub mod session;
