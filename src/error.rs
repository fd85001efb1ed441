use thiserror::Error;

/// Fixed message shown when the user refuses camera/microphone access
pub const PERMISSION_DENIED_MESSAGE: &str =
    "Permission denied. Please allow camera and audio permissions";

/// Failure to acquire a capture session, classified for display
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum CaptureError {
    #[error("Permission denied. Please allow camera and audio permissions")]
    PermissionDenied,

    #[error("Could not access camera and microphone: {message}")]
    Unclassified { name: String, message: String },
}

impl CaptureError {
    /// Message rendered to the user until the next successful acquisition
    pub fn user_message(&self) -> String {
        self.to_string()
    }
}

/// Errors returned by recorder operations
#[derive(Debug, Error)]
pub enum RecorderError {
    #[error(transparent)]
    Capture(#[from] CaptureError),

    #[error("encoder failure: {0:#}")]
    Encoder(anyhow::Error),

    #[error("no recording is available for download")]
    NotDownloadable,

    #[error("export failed: {0:#}")]
    Export(anyhow::Error),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_permission_denied_message_is_fixed() {
        assert_eq!(
            CaptureError::PermissionDenied.user_message(),
            PERMISSION_DENIED_MESSAGE
        );
    }

    #[test]
    fn test_unclassified_message_includes_platform_text() {
        let err = CaptureError::Unclassified {
            name: "NotFoundError".to_string(),
            message: "Requested device not found".to_string(),
        };

        assert!(err.user_message().contains("Requested device not found"));
    }
}
