//! Error taxonomy shared by both generation flows.
//!
//! Every failure a flow can surface to the user is one of these
//! variants. `Display` strings are user-presentable: the flow boundary
//! converts an error into a single message with `to_string()` and
//! nothing escapes past it.

/// A failure in the image-edit or video-generation flow.
///
/// The variants are deliberately coarse. What matters to the caller is
/// which of four situations it is in: the request never left the
/// process (`Validation`), the local file was unusable (`Read`), the
/// remote service misbehaved (`Service`), or the remote service
/// succeeded while producing nothing usable (`EmptyResult`).
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum GenerationError {
    /// The request was rejected before any network activity.
    #[error("{0}")]
    Validation(String),

    /// The local media file could not be read or is not an image.
    #[error("Failed to read the image file: {0}")]
    Read(String),

    /// The remote service failed at the transport or protocol level.
    #[error("Service error: {message}")]
    Service {
        /// HTTP status code, when the failure got far enough to have one.
        status: Option<u16>,
        /// Human-readable description, including the status where relevant.
        message: String,
    },

    /// The remote call succeeded but produced no usable artifact.
    ///
    /// Distinct from `Service`: nothing went wrong on the wire, the
    /// model simply returned no media. The user should retry with a
    /// different prompt or image.
    #[error("{0}")]
    EmptyResult(String),
}

impl GenerationError {
    /// Shorthand for a [`GenerationError::Service`].
    pub fn service(status: Option<u16>, message: impl Into<String>) -> Self {
        Self::Service {
            status,
            message: message.into(),
        }
    }
}
