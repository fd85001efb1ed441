use tokio::sync::mpsc::{self, error::TryRecvError};
use tracing::{debug, error, info, warn};

use super::state::{Controls, RecorderStatus, RecordingState};
use crate::artifact::{ArtifactBuffer, RecordingArtifact};
use crate::capture::{CaptureBackend, CaptureSession, CaptureSource};
use crate::config::RecorderConfig;
use crate::encoder::{ChunkReceiver, EncoderFactory, EncoderOptions, MediaEncoder};
use crate::error::{CaptureError, RecorderError};
use crate::export::{ExportGateway, ExportReceipt, SaveTarget};
use crate::timer::ElapsedTimer;

/// Camera recorder: owns the capture session, encoder, artifact buffer and
/// elapsed timer, and is the only way to mutate them.
///
/// Calls made from a state where they are not offered (see
/// [`RecorderStatus::controls`]) are logged and ignored.
pub struct VideoRecorder {
    capture: CaptureSource,
    encoders: Box<dyn EncoderFactory>,
    export: ExportGateway,
    encoder_options: EncoderOptions,
    surface_unclassified_errors: bool,

    state: RecordingState,
    session: Option<CaptureSession>,
    encoder: Option<Box<dyn MediaEncoder>>,
    chunks: Option<ChunkReceiver>,
    buffer: ArtifactBuffer,
    timer: ElapsedTimer,
    error: Option<String>,
}

impl VideoRecorder {
    pub fn new(
        config: &RecorderConfig,
        capture: Box<dyn CaptureBackend>,
        encoders: Box<dyn EncoderFactory>,
        save_target: Box<dyn SaveTarget>,
    ) -> Self {
        info!(
            "Video recorder created ({}, {:?} buffering)",
            config.encoder.mime_type, config.buffer.policy
        );

        Self {
            capture: CaptureSource::new(capture, config.capture.constraints()),
            encoders,
            export: ExportGateway::new(save_target, config.export.file_prefix.clone()),
            encoder_options: config.encoder.options(),
            surface_unclassified_errors: config.surface_unclassified_errors,
            state: RecordingState::Idle,
            session: None,
            encoder: None,
            chunks: None,
            buffer: ArtifactBuffer::new(
                config.buffer.policy,
                config.encoder.artifact_media_type.clone(),
            ),
            timer: ElapsedTimer::new(),
            error: None,
        }
    }

    /// Acquire the camera and show it as preview
    pub async fn setup_camera(&mut self) -> Result<RecordingState, RecorderError> {
        if !self.state.can_setup() {
            warn!("Camera setup ignored while {}", self.state.as_str());
            return Ok(self.state);
        }
        self.drain_chunks();

        let session = self.acquire().await?;
        self.replace_session(session);
        self.buffer.mark_stale();
        self.state = RecordingState::CameraReady;

        info!("Camera ready");
        Ok(self.state)
    }

    /// Begin a new recording on a freshly acquired session
    pub async fn start_recording(&mut self) -> Result<RecordingState, RecorderError> {
        if !self.state.can_start() {
            warn!("Start ignored while {}", self.state.as_str());
            return Ok(self.state);
        }
        self.drain_chunks();

        let session = self.acquire().await?;

        let (tx, rx) = mpsc::unbounded_channel();
        let mut encoder = self
            .encoders
            .open(&session, &self.encoder_options, tx)
            .map_err(RecorderError::Encoder)?;
        encoder.start().map_err(|e| {
            error!("Failed to start {}: {:#}", encoder.name(), e);
            RecorderError::Encoder(e)
        })?;

        self.replace_session(session);
        self.encoder = Some(encoder);
        self.chunks = Some(rx);
        self.buffer.begin_session();
        self.timer.start();
        self.state = RecordingState::Recording;

        info!("Recording started ({})", self.encoder_options.mime_type);
        Ok(self.state)
    }

    pub fn pause_recording(&mut self) -> Result<RecordingState, RecorderError> {
        if self.state != RecordingState::Recording {
            warn!("Pause ignored while {}", self.state.as_str());
            return Ok(self.state);
        }
        let Some(encoder) = self.encoder.as_mut() else {
            warn!("Pause ignored: no active encoder");
            return Ok(self.state);
        };

        encoder.pause().map_err(RecorderError::Encoder)?;
        self.timer.pause();
        self.state = RecordingState::Paused;

        info!("Recording paused at {}s", self.timer.elapsed_seconds());
        Ok(self.state)
    }

    pub fn resume_recording(&mut self) -> Result<RecordingState, RecorderError> {
        if self.state != RecordingState::Paused {
            warn!("Resume ignored while {}", self.state.as_str());
            return Ok(self.state);
        }
        let Some(encoder) = self.encoder.as_mut() else {
            warn!("Resume ignored: no active encoder");
            return Ok(self.state);
        };

        encoder.resume().map_err(RecorderError::Encoder)?;
        self.timer.resume();
        self.state = RecordingState::Recording;

        info!("Recording resumed at {}s", self.timer.elapsed_seconds());
        Ok(self.state)
    }

    /// Stop the recording; the final chunk arrives asynchronously
    ///
    /// The preview stream stays live until it is replaced or the recorder
    /// shuts down.
    pub fn stop_recording(&mut self) -> Result<RecordingState, RecorderError> {
        if !self.state.is_recording() {
            warn!("Stop ignored while {}", self.state.as_str());
            return Ok(self.state);
        }

        let stopped = match self.encoder.take() {
            Some(mut encoder) => encoder.stop(),
            None => {
                warn!("Stop without an active encoder");
                Ok(())
            }
        };

        let elapsed = self.timer.elapsed_seconds();
        self.timer.stop();
        self.state = RecordingState::Stopped;

        stopped.map_err(|e| {
            error!("Encoder failed to stop cleanly: {:#}", e);
            RecorderError::Encoder(e)
        })?;

        info!("Recording stopped after {}s", elapsed);
        Ok(self.state)
    }

    /// Start if idle-ready, stop if recording
    pub async fn toggle_recording(&mut self) -> Result<RecordingState, RecorderError> {
        if self.state.is_recording() {
            self.stop_recording()
        } else {
            self.start_recording().await
        }
    }

    /// Pause if recording, resume if paused
    pub fn toggle_pause(&mut self) -> Result<RecordingState, RecorderError> {
        match self.state {
            RecordingState::Paused => self.resume_recording(),
            _ => self.pause_recording(),
        }
    }

    /// Save the latest recording through the export gateway
    pub async fn download_artifact(&mut self) -> Result<ExportReceipt, RecorderError> {
        self.drain_chunks();

        if !self.buffer.is_downloadable() {
            warn!("Download requested but no recording is available");
            return Err(RecorderError::NotDownloadable);
        }
        let artifact = self
            .buffer
            .finalize()
            .ok_or(RecorderError::NotDownloadable)?;

        let receipt = self
            .export
            .export(&artifact)
            .await
            .map_err(RecorderError::Export)?;

        info!(
            "Downloaded {} ({} bytes)",
            receipt.location.display(),
            receipt.bytes
        );
        Ok(receipt)
    }

    /// Apply every chunk already delivered by the encoder; never waits
    pub fn drain_chunks(&mut self) -> usize {
        let Some(rx) = self.chunks.as_mut() else {
            return 0;
        };

        let mut applied = 0;
        let mut closed = false;
        loop {
            match rx.try_recv() {
                Ok(chunk) => {
                    if self.buffer.on_chunk(chunk) {
                        applied += 1;
                    }
                }
                Err(TryRecvError::Empty) => break,
                Err(TryRecvError::Disconnected) => {
                    closed = true;
                    break;
                }
            }
        }

        if closed {
            debug!("Encoder chunk channel closed");
            self.chunks = None;
        }
        applied
    }

    /// Wait for the stopped encoder to deliver its remaining chunks
    ///
    /// While a recording is still running this only drains what is pending.
    pub async fn flush(&mut self) -> usize {
        if self.encoder.is_some() {
            warn!("Flush while recording; draining pending chunks only");
            return self.drain_chunks();
        }

        let mut applied = 0;
        if let Some(mut rx) = self.chunks.take() {
            while let Some(chunk) = rx.recv().await {
                if self.buffer.on_chunk(chunk) {
                    applied += 1;
                }
            }
            debug!("Flushed {} chunks", applied);
        }
        applied
    }

    /// Stop everything and release the capture session
    ///
    /// The last artifact is kept but withdrawn from download.
    pub fn shutdown(&mut self) {
        if let Some(mut encoder) = self.encoder.take() {
            if let Err(e) = encoder.stop() {
                error!("Failed to stop {} during shutdown: {:#}", encoder.name(), e);
            }
        }
        self.timer.stop();
        self.drain_chunks();
        self.buffer.mark_stale();

        if let Some(mut session) = self.session.take() {
            session.stop();
            info!("Released capture session {}", session.id());
        }
        self.state = RecordingState::Idle;
    }

    pub fn state(&self) -> RecordingState {
        self.state
    }

    pub fn elapsed_seconds(&self) -> u64 {
        self.timer.elapsed_seconds()
    }

    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }

    /// Current preview/recording session, if any
    pub fn session(&self) -> Option<&CaptureSession> {
        self.session.as_ref()
    }

    /// Latest artifact, downloadable or not
    pub fn artifact(&mut self) -> Option<RecordingArtifact> {
        self.drain_chunks();
        self.buffer.finalize()
    }

    pub fn status(&mut self) -> RecorderStatus {
        self.drain_chunks();

        RecorderStatus {
            state: self.state,
            is_camera_setup_done: self.state != RecordingState::Idle,
            is_recording: self.state.is_recording(),
            is_paused: self.state == RecordingState::Paused,
            is_downloadable: self.buffer.is_downloadable(),
            elapsed_seconds: self.timer.elapsed_seconds(),
            error: self.error.clone(),
            preview_session: self.session.as_ref().map(CaptureSession::id),
        }
    }

    pub fn controls(&mut self) -> Controls {
        self.status().controls()
    }

    async fn acquire(&mut self) -> Result<CaptureSession, RecorderError> {
        match self.capture.acquire().await {
            Ok(session) => {
                self.error = None;
                Ok(session)
            }
            Err(e) => {
                self.record_capture_error(&e);
                Err(e.into())
            }
        }
    }

    fn record_capture_error(&mut self, e: &CaptureError) {
        match e {
            CaptureError::PermissionDenied => self.error = Some(e.user_message()),
            CaptureError::Unclassified { .. } if self.surface_unclassified_errors => {
                self.error = Some(e.user_message())
            }
            CaptureError::Unclassified { .. } => {
                debug!("Unclassified capture failure not shown to the user");
            }
        }
    }

    fn replace_session(&mut self, session: CaptureSession) {
        if let Some(mut previous) = self.session.replace(session) {
            previous.stop();
            debug!("Replaced capture session {}", previous.id());
        }
    }
}
