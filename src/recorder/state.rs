use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Recording lifecycle
///
/// ```text
/// idle → camera-ready → recording ⇄ paused
///             ↑  ↓           ↓        ↓
///             stopped ←──────┴────────┘
/// ```
/// CameraReady and Stopped are re-enterable through setup/start.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RecordingState {
    #[default]
    Idle,
    CameraReady,
    Recording,
    Paused,
    Stopped,
}

impl RecordingState {
    pub fn as_str(&self) -> &'static str {
        match self {
            RecordingState::Idle => "idle",
            RecordingState::CameraReady => "camera_ready",
            RecordingState::Recording => "recording",
            RecordingState::Paused => "paused",
            RecordingState::Stopped => "stopped",
        }
    }

    /// A recording is in progress (possibly paused)
    pub fn is_recording(&self) -> bool {
        matches!(self, RecordingState::Recording | RecordingState::Paused)
    }

    pub fn can_setup(&self) -> bool {
        matches!(
            self,
            RecordingState::Idle | RecordingState::CameraReady | RecordingState::Stopped
        )
    }

    pub fn can_start(&self) -> bool {
        matches!(self, RecordingState::CameraReady | RecordingState::Stopped)
    }
}

/// Snapshot of the recorder rendered by the UI
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RecorderStatus {
    pub state: RecordingState,
    pub is_camera_setup_done: bool,
    pub is_recording: bool,
    pub is_paused: bool,
    pub is_downloadable: bool,
    pub elapsed_seconds: u64,
    /// User-facing error, kept until the next successful acquisition
    pub error: Option<String>,
    /// Session currently shown as the live preview
    pub preview_session: Option<Uuid>,
}

impl RecorderStatus {
    /// Elapsed time label; hidden while the counter is zero
    pub fn recording_time_label(&self) -> Option<String> {
        (self.elapsed_seconds > 0).then(|| format!("Recording time: {}", self.elapsed_seconds))
    }

    /// Actions the UI should offer for this status
    pub fn controls(&self) -> Controls {
        Controls {
            show_setup: !self.is_camera_setup_done,
            show_pause_toggle: self.is_recording,
            pause_toggle_label: if self.is_paused {
                "Resume Recording"
            } else {
                "Pause Recording"
            },
            record_toggle_enabled: self.is_camera_setup_done,
            record_toggle_label: if self.is_recording {
                "Stop Recording"
            } else {
                "Start Recording"
            },
            show_download: self.is_downloadable,
        }
    }
}

/// Which controls are offered, and with which labels
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Controls {
    pub show_setup: bool,
    pub show_pause_toggle: bool,
    pub pause_toggle_label: &'static str,
    pub record_toggle_enabled: bool,
    pub record_toggle_label: &'static str,
    pub show_download: bool,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn status(state: RecordingState) -> RecorderStatus {
        RecorderStatus {
            state,
            is_camera_setup_done: state != RecordingState::Idle,
            is_recording: state.is_recording(),
            is_paused: state == RecordingState::Paused,
            is_downloadable: false,
            elapsed_seconds: 0,
            error: None,
            preview_session: None,
        }
    }

    #[test]
    fn test_idle_offers_only_setup() {
        let controls = status(RecordingState::Idle).controls();

        assert!(controls.show_setup);
        assert!(!controls.record_toggle_enabled);
        assert!(!controls.show_pause_toggle);
        assert!(!controls.show_download);
    }

    #[test]
    fn test_paused_offers_resume_and_stop() {
        let controls = status(RecordingState::Paused).controls();

        assert!(!controls.show_setup);
        assert!(controls.show_pause_toggle);
        assert_eq!(controls.pause_toggle_label, "Resume Recording");
        assert_eq!(controls.record_toggle_label, "Stop Recording");
    }

    #[test]
    fn test_stopped_with_data_offers_download() {
        let mut stopped = status(RecordingState::Stopped);
        stopped.is_downloadable = true;
        let controls = stopped.controls();

        assert!(controls.show_download);
        assert_eq!(controls.record_toggle_label, "Start Recording");
        assert!(!controls.show_pause_toggle);
    }

    #[test]
    fn test_recording_time_label_hidden_at_zero() {
        let mut recording = status(RecordingState::Recording);
        assert_eq!(recording.recording_time_label(), None);

        recording.elapsed_seconds = 7;
        assert_eq!(
            recording.recording_time_label().as_deref(),
            Some("Recording time: 7")
        );
    }

    #[test]
    fn test_state_serializes_snake_case() {
        let json = serde_json::to_string(&RecordingState::CameraReady).unwrap();
        assert_eq!(json, "\"camera_ready\"");
        assert_eq!(RecordingState::CameraReady.as_str(), "camera_ready");
    }
}
