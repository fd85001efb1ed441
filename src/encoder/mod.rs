pub mod backend;
pub mod synthetic;

pub use backend::{
    ChunkReceiver, ChunkSender, EncodedChunk, EncoderFactory, EncoderOptions, EncoderState,
    MediaEncoder, WEBM_MEDIA_TYPE, WEBM_VP9_OPUS,
};
pub use synthetic::{SyntheticEncoder, SyntheticEncoderFactory};
