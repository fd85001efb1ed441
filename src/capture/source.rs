use tracing::{error, info, warn};

use super::backend::{CaptureBackend, CaptureConstraints, CaptureSession};
use crate::error::CaptureError;

/// Requests live streams from a backend and classifies its failures
pub struct CaptureSource {
    backend: Box<dyn CaptureBackend>,
    constraints: CaptureConstraints,
}

impl CaptureSource {
    pub fn new(backend: Box<dyn CaptureBackend>, constraints: CaptureConstraints) -> Self {
        info!(
            "Capture source initialized: {} (video={}, echo_cancellation={})",
            backend.name(),
            constraints.video,
            constraints.audio.echo_cancellation
        );

        Self {
            backend,
            constraints,
        }
    }

    pub fn constraints(&self) -> &CaptureConstraints {
        &self.constraints
    }

    /// Acquire a fresh capture session
    ///
    /// Every call is a new platform request; nothing is cached or retried.
    pub async fn acquire(&self) -> Result<CaptureSession, CaptureError> {
        match self.backend.acquire(&self.constraints).await {
            Ok(session) => {
                info!(
                    "Acquired capture session {} ({} tracks)",
                    session.id(),
                    session.tracks().len()
                );
                Ok(session)
            }
            Err(e) if e.is_permission_denied() => {
                warn!("Capture permission denied by {}", self.backend.name());
                Err(CaptureError::PermissionDenied)
            }
            Err(e) => {
                error!("Capture request failed on {}: {}", self.backend.name(), e);
                Err(CaptureError::Unclassified {
                    name: e.name,
                    message: e.message,
                })
            }
        }
    }
}
