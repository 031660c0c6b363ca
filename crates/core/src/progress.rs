//! Rotating progress labels for the video flow.
//!
//! The labels carry no semantic weight: they cycle on a timer while a
//! job is polled, purely so the user sees movement during a wait that
//! can run for minutes. Rotation cadence is a tuning knob owned by the
//! poller configuration, not by this module.

/// Ordered labels shown while a video job is in flight, wrapping back
/// to the first once exhausted.
pub const LOADING_MESSAGES: &[&str] = &[
    "Reaching the AI director...",
    "The storyboard is in progress...",
    "The AI is setting up the camera...",
    "Rendering the first frames...",
    "Adding special effects...",
    "This can take a few minutes, hang tight...",
    "Finishing the video...",
];

/// Label shown while the finished video is being downloaded.
pub const DOWNLOAD_MESSAGE: &str = "Almost there! Downloading the video...";

/// The label for the given rotation tick (tick 0 is the first label).
pub fn loading_message(tick: usize) -> &'static str {
    LOADING_MESSAGES[tick % LOADING_MESSAGES.len()]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn tick_zero_is_the_first_message() {
        assert_eq!(loading_message(0), LOADING_MESSAGES[0]);
    }

    #[test]
    fn rotation_wraps_to_the_first_message() {
        let n = LOADING_MESSAGES.len();
        assert_eq!(loading_message(n), LOADING_MESSAGES[0]);
        assert_eq!(loading_message(n + 2), LOADING_MESSAGES[2]);
    }

    #[test]
    fn consecutive_ticks_walk_the_list_in_order() {
        for (i, expected) in LOADING_MESSAGES.iter().enumerate() {
            assert_eq!(loading_message(i), *expected);
        }
    }
}
