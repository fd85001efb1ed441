// Synthetic capture backend producing test-pattern streams
//
// Stands in for the platform camera so recordings can be driven end to end
// without real devices. Prompt answers can be scripted to exercise denial
// and failure paths.

use std::collections::VecDeque;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex, PoisonError};
use tracing::{debug, info};

use super::backend::{
    CaptureBackend, CaptureConstraints, CaptureSession, LiveStream, PlatformError, TrackInfo,
    TrackKind,
};

/// How the simulated permission prompt is answered
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PromptResponse {
    /// User allows access
    Grant,
    /// User refuses access
    Deny,
    /// Platform fails with an arbitrary error
    Fail { name: String, message: String },
    /// User never answers; the request stays pending
    NeverAnswer,
}

/// Synthetic camera + microphone
///
/// Answers prompts from a scripted queue, then grants by default.
pub struct SyntheticCamera {
    responses: Mutex<VecDeque<PromptResponse>>,
    live_streams: Arc<AtomicUsize>,
    requests: AtomicUsize,
}

impl SyntheticCamera {
    pub fn new() -> Self {
        Self::with_responses(Vec::new())
    }

    /// Script the answers of the next prompts, in order
    pub fn with_responses(responses: impl IntoIterator<Item = PromptResponse>) -> Self {
        Self {
            responses: Mutex::new(responses.into_iter().collect()),
            live_streams: Arc::new(AtomicUsize::new(0)),
            requests: AtomicUsize::new(0),
        }
    }

    /// Counter of streams whose tracks are still running
    pub fn live_streams(&self) -> Arc<AtomicUsize> {
        Arc::clone(&self.live_streams)
    }

    /// Number of acquisition requests received so far
    pub fn request_count(&self) -> usize {
        self.requests.load(Ordering::SeqCst)
    }

    fn next_response(&self) -> PromptResponse {
        self.responses
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .pop_front()
            .unwrap_or(PromptResponse::Grant)
    }
}

impl Default for SyntheticCamera {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait::async_trait]
impl CaptureBackend for SyntheticCamera {
    async fn acquire(
        &self,
        constraints: &CaptureConstraints,
    ) -> Result<CaptureSession, PlatformError> {
        self.requests.fetch_add(1, Ordering::SeqCst);

        match self.next_response() {
            PromptResponse::Grant => {
                let stream = SyntheticStream::open(constraints, Arc::clone(&self.live_streams));
                Ok(CaptureSession::new(Box::new(stream)))
            }
            PromptResponse::Deny => Err(PlatformError::permission_denied()),
            PromptResponse::Fail { name, message } => Err(PlatformError::new(name, message)),
            PromptResponse::NeverAnswer => {
                info!("Synthetic prompt left unanswered");
                futures::future::pending().await
            }
        }
    }

    fn name(&self) -> &str {
        "Synthetic camera"
    }
}

struct SyntheticStream {
    tracks: Vec<TrackInfo>,
    live: bool,
    live_streams: Arc<AtomicUsize>,
}

impl SyntheticStream {
    fn open(constraints: &CaptureConstraints, live_streams: Arc<AtomicUsize>) -> Self {
        let mut tracks = Vec::with_capacity(2);
        if constraints.video {
            tracks.push(TrackInfo {
                kind: TrackKind::Video,
                label: "Synthetic test pattern".to_string(),
            });
        }
        let label = if constraints.audio.echo_cancellation {
            "Synthetic microphone (echo cancelled)"
        } else {
            "Synthetic microphone"
        };
        tracks.push(TrackInfo {
            kind: TrackKind::Audio,
            label: label.to_string(),
        });

        live_streams.fetch_add(1, Ordering::SeqCst);
        debug!("Synthetic stream opened with {} tracks", tracks.len());

        Self {
            tracks,
            live: true,
            live_streams,
        }
    }
}

impl LiveStream for SyntheticStream {
    fn tracks(&self) -> Vec<TrackInfo> {
        self.tracks.clone()
    }

    fn stop_tracks(&mut self) {
        if self.live {
            self.live = false;
            self.live_streams.fetch_sub(1, Ordering::SeqCst);
        }
    }

    fn is_live(&self) -> bool {
        self.live
    }
}
