// Synthetic encoder emitting placeholder WebM payloads
//
// Mirrors the platform contract without timeslicing: a single chunk is
// emitted when the encoder stops, sized from the active (unpaused)
// recording time.

use anyhow::{bail, Result};
use tokio::time::{Duration, Instant};
use tracing::{debug, info};
use uuid::Uuid;

use super::backend::{
    ChunkSender, EncodedChunk, EncoderFactory, EncoderOptions, EncoderState, MediaEncoder,
};
use crate::capture::CaptureSession;

/// EBML magic that opens every WebM/Matroska file
const EBML_MAGIC: [u8; 4] = [0x1A, 0x45, 0xDF, 0xA3];

/// Opens [`SyntheticEncoder`]s
#[derive(Debug, Clone)]
pub struct SyntheticEncoderFactory {
    /// Payload bytes produced per second of active recording
    pub bytes_per_second: usize,
}

impl Default for SyntheticEncoderFactory {
    fn default() -> Self {
        Self {
            bytes_per_second: 64 * 1024,
        }
    }
}

impl EncoderFactory for SyntheticEncoderFactory {
    fn open(
        &self,
        session: &CaptureSession,
        options: &EncoderOptions,
        chunks: ChunkSender,
    ) -> Result<Box<dyn MediaEncoder>> {
        if options.container() != Some("webm") {
            bail!("Unsupported container for synthetic encoder: {}", options.mime_type);
        }

        info!(
            "Synthetic encoder opened for session {} ({})",
            session.id(),
            options.mime_type
        );

        Ok(Box::new(SyntheticEncoder {
            session_id: session.id(),
            bytes_per_second: self.bytes_per_second,
            state: EncoderState::Inactive,
            chunks: Some(chunks),
            active: Duration::ZERO,
            resumed_at: None,
        }))
    }
}

/// Encoder producing a single synthetic chunk on stop
pub struct SyntheticEncoder {
    session_id: Uuid,
    bytes_per_second: usize,
    state: EncoderState,
    chunks: Option<ChunkSender>,
    active: Duration,
    resumed_at: Option<Instant>,
}

impl SyntheticEncoder {
    fn bank_active_time(&mut self) {
        if let Some(resumed_at) = self.resumed_at.take() {
            self.active += resumed_at.elapsed();
        }
    }

    fn payload(&self) -> Vec<u8> {
        let body = (self.active.as_secs_f64() * self.bytes_per_second as f64) as usize;
        let mut data = Vec::with_capacity(EBML_MAGIC.len() + body);
        data.extend_from_slice(&EBML_MAGIC);
        data.resize(EBML_MAGIC.len() + body, 0);
        data
    }
}

impl MediaEncoder for SyntheticEncoder {
    fn start(&mut self) -> Result<()> {
        if self.state != EncoderState::Inactive {
            bail!("Synthetic encoder already started");
        }
        if self.chunks.is_none() {
            bail!("Synthetic encoder cannot restart after stop");
        }

        self.state = EncoderState::Recording;
        self.resumed_at = Some(Instant::now());
        debug!("Synthetic encoder started for session {}", self.session_id);
        Ok(())
    }

    fn pause(&mut self) -> Result<()> {
        match self.state {
            EncoderState::Inactive => bail!("Cannot pause an inactive encoder"),
            EncoderState::Paused => Ok(()),
            EncoderState::Recording => {
                self.bank_active_time();
                self.state = EncoderState::Paused;
                Ok(())
            }
        }
    }

    fn resume(&mut self) -> Result<()> {
        match self.state {
            EncoderState::Inactive => bail!("Cannot resume an inactive encoder"),
            EncoderState::Recording => Ok(()),
            EncoderState::Paused => {
                self.resumed_at = Some(Instant::now());
                self.state = EncoderState::Recording;
                Ok(())
            }
        }
    }

    fn stop(&mut self) -> Result<()> {
        if self.state == EncoderState::Inactive {
            return Ok(());
        }

        self.bank_active_time();
        self.state = EncoderState::Inactive;

        let chunk = EncodedChunk {
            data: self.payload(),
            timestamp_ms: self.active.as_millis() as u64,
        };
        debug!(
            "Synthetic encoder flushing {} bytes for session {}",
            chunk.data.len(),
            self.session_id
        );

        // The recorder may already be gone; losing the chunk is fine then.
        if let Some(chunks) = self.chunks.take() {
            let _ = chunks.send(chunk);
        }
        Ok(())
    }

    fn state(&self) -> EncoderState {
        self.state
    }

    fn name(&self) -> &str {
        "Synthetic WebM encoder"
    }
}
