// Integration tests for capture acquisition and failure classification

use cam_recorder::capture::{AudioConstraints, TrackKind};
use cam_recorder::{
    CaptureConstraints, CaptureError, CaptureSource, PlatformError, PromptResponse,
    SyntheticCamera, PERMISSION_DENIED_MESSAGE,
};

#[test]
fn test_default_constraints_request_video_and_echo_cancelled_audio() {
    let constraints = CaptureConstraints::default();

    assert!(constraints.video);
    assert_eq!(
        constraints.audio,
        AudioConstraints {
            echo_cancellation: true
        }
    );
}

#[test]
fn test_permission_denied_classification_is_exact() {
    assert!(PlatformError::permission_denied().is_permission_denied());
    assert!(!PlatformError::new("NotAllowedError", "Permission dismissed").is_permission_denied());
    assert!(!PlatformError::new("SecurityError", "Permission denied").is_permission_denied());
}

#[tokio::test]
async fn test_source_maps_denial_to_fixed_message() {
    let source = CaptureSource::new(
        Box::new(SyntheticCamera::with_responses(vec![PromptResponse::Deny])),
        CaptureConstraints::default(),
    );

    let err = source.acquire().await.unwrap_err();
    assert_eq!(err, CaptureError::PermissionDenied);
    assert_eq!(err.user_message(), PERMISSION_DENIED_MESSAGE);
}

#[tokio::test]
async fn test_source_keeps_platform_details_of_other_failures() {
    let source = CaptureSource::new(
        Box::new(SyntheticCamera::with_responses(vec![PromptResponse::Fail {
            name: "NotAllowedError".to_string(),
            message: "Permission dismissed".to_string(),
        }])),
        CaptureConstraints::default(),
    );

    let err = source.acquire().await.unwrap_err();
    assert_eq!(
        err,
        CaptureError::Unclassified {
            name: "NotAllowedError".to_string(),
            message: "Permission dismissed".to_string(),
        }
    );
}

#[tokio::test]
async fn test_every_acquire_is_a_fresh_request() {
    let camera = SyntheticCamera::new();
    let live = camera.live_streams();
    let source = CaptureSource::new(Box::new(camera), CaptureConstraints::default());

    let first = source.acquire().await.unwrap();
    let second = source.acquire().await.unwrap();

    assert_ne!(first.id(), second.id());
    assert_eq!(live.load(std::sync::atomic::Ordering::SeqCst), 2);

    let kinds: Vec<TrackKind> = second.tracks().iter().map(|t| t.kind).collect();
    assert_eq!(kinds, vec![TrackKind::Video, TrackKind::Audio]);
}
