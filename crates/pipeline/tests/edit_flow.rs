//! Integration tests for the image-edit flow.

mod common;

use std::sync::Arc;

use assert_matches::assert_matches;
use tokio::sync::watch;

use common::{payload, ScriptedService};
use lumiere_core::error::GenerationError;
use lumiere_core::media::{Artifact, ImageArtifact};
use lumiere_core::state::GenerationState;
use lumiere_pipeline::poller::PollerConfig;
use lumiere_pipeline::session::GenerationSession;

/// Wait until the session reaches a terminal state and return it.
async fn wait_terminal(rx: &mut watch::Receiver<GenerationState>) -> GenerationState {
    loop {
        {
            let state = rx.borrow_and_update();
            if state.is_terminal() {
                return state.clone();
            }
        }
        rx.changed().await.unwrap();
    }
}

// ---------------------------------------------------------------------------
// Test: a response with one image part succeeds with that image
// ---------------------------------------------------------------------------

#[tokio::test]
async fn edit_with_one_image_part_succeeds() {
    let service = Arc::new(ScriptedService::new());
    service.push_edit(Ok(Some(ImageArtifact {
        bytes: vec![9, 9],
        mime_type: "image/png".into(),
    })));

    let mut session = GenerationSession::new(Arc::clone(&service), PollerConfig::default());
    let mut rx = session.subscribe();
    session.submit_edit(Some(payload()), "sunset glow").unwrap();

    let state = wait_terminal(&mut rx).await;
    let artifact = state.artifact().expect("edit should succeed");
    assert_matches!(
        artifact,
        Artifact::Image(image) if image.to_data_uri().starts_with("data:image/png;base64,")
    );
}

// ---------------------------------------------------------------------------
// Test: a response with zero image parts is a non-fatal "no image" outcome
// ---------------------------------------------------------------------------

#[tokio::test]
async fn edit_with_no_image_parts_is_empty_result_not_service_failure() {
    let service = Arc::new(ScriptedService::new());
    service.push_edit(Ok(None));

    let mut session = GenerationSession::new(Arc::clone(&service), PollerConfig::default());
    let mut rx = session.subscribe();
    session.submit_edit(Some(payload()), "sunset glow").unwrap();

    let state = wait_terminal(&mut rx).await;
    assert_matches!(
        state,
        GenerationState::Failed {
            error: GenerationError::EmptyResult(_)
        }
    );
}

// ---------------------------------------------------------------------------
// Test: a transport failure surfaces as a service error
// ---------------------------------------------------------------------------

#[tokio::test]
async fn edit_transport_failure_is_a_service_error() {
    let service = Arc::new(ScriptedService::new());
    service.push_edit(Err(GenerationError::service(Some(500), "boom")));

    let mut session = GenerationSession::new(Arc::clone(&service), PollerConfig::default());
    let mut rx = session.subscribe();
    session.submit_edit(Some(payload()), "sunset glow").unwrap();

    let state = wait_terminal(&mut rx).await;
    assert_matches!(
        state,
        GenerationState::Failed {
            error: GenerationError::Service {
                status: Some(500),
                ..
            }
        }
    );
}

// ---------------------------------------------------------------------------
// Test: validation precedes any network activity
// ---------------------------------------------------------------------------

#[tokio::test]
async fn missing_image_fails_validation_without_a_network_call() {
    let service = Arc::new(ScriptedService::new());
    let mut session = GenerationSession::new(Arc::clone(&service), PollerConfig::default());

    let error = session.submit_edit(None, "sunset glow").unwrap_err();
    assert_matches!(error, GenerationError::Validation(_));
    assert_matches!(
        session.state(),
        GenerationState::Failed {
            error: GenerationError::Validation(_)
        }
    );

    tokio::task::yield_now().await;
    assert_eq!(service.call_count(), 0);
}

#[tokio::test]
async fn blank_prompt_fails_validation_without_a_network_call() {
    let service = Arc::new(ScriptedService::new());
    let mut session = GenerationSession::new(Arc::clone(&service), PollerConfig::default());

    let error = session.submit_edit(Some(payload()), "   ").unwrap_err();
    assert_matches!(error, GenerationError::Validation(_));

    tokio::task::yield_now().await;
    assert_eq!(service.call_count(), 0);
}

// ---------------------------------------------------------------------------
// Test: reset abandons the outcome and returns to Idle
// ---------------------------------------------------------------------------

#[tokio::test]
async fn reset_returns_the_session_to_idle() {
    let service = Arc::new(ScriptedService::new());
    service.push_edit(Ok(Some(ImageArtifact {
        bytes: vec![9, 9],
        mime_type: "image/png".into(),
    })));

    let mut session = GenerationSession::new(Arc::clone(&service), PollerConfig::default());
    let mut rx = session.subscribe();
    session.submit_edit(Some(payload()), "sunset glow").unwrap();
    wait_terminal(&mut rx).await;

    session.reset();
    assert_eq!(session.state(), GenerationState::Idle);
}

// ---------------------------------------------------------------------------
// Test: submit reaches Submitting before the network call is observed
// ---------------------------------------------------------------------------

#[tokio::test]
async fn submit_moves_to_submitting_before_the_network_call() {
    let service = Arc::new(ScriptedService::new());
    let mut session = GenerationSession::new(Arc::clone(&service), PollerConfig::default());

    session.submit_edit(Some(payload()), "sunset glow").unwrap();

    // On the current-thread test runtime the spawned flow task cannot
    // have run yet, so the state change strictly precedes any call.
    assert_eq!(session.state(), GenerationState::Submitting);
    assert_eq!(service.call_count(), 0);
}
