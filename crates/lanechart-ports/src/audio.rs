use crate::types::*;
use std::sync::Arc;

#[derive(thiserror::Error, Debug)]
pub enum AudioError {
    #[error("decode failed: {0}")]
    Decode(String),
    #[error("no audio buffer loaded")]
    NoBuffer,
    #[error("backend error: {0}")]
    Backend(String),
}

#[derive(Clone, Debug, PartialEq)]
pub struct DecodedAudio {
    pub duration: Seconds,
    /// Mono channel samples, used for waveform peaks. Backends may omit them.
    pub samples: Option<Vec<f32>>,
}

/// Identifies one started source so that late `ended` notifications can be told apart.
pub type SourceGeneration = u64;

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct StartRequest {
    /// Position inside the source to start from.
    pub source_offset: Seconds,
    /// Audio clock time at which the source begins sounding.
    pub when: ClockTime,
    pub generation: SourceGeneration,
}

pub type EndedCallback = Arc<dyn Fn(SourceGeneration) + Send + Sync + 'static>;

/// Thread model:
/// - all calls come from the editor thread, between frames
/// - the ended callback may be invoked from a backend thread
pub trait AudioPlaybackPort: Send {
    /// Replaces the loaded buffer on success; on failure the previous buffer is kept.
    fn decode(&mut self, bytes: &[u8]) -> Result<DecodedAudio, AudioError>;
    fn has_buffer(&self) -> bool;

    fn start(&mut self, request: StartRequest) -> Result<(), AudioError>;
    /// Idempotent.
    fn stop(&mut self);

    /// Monotonic audio clock, seconds.
    fn now(&self) -> ClockTime;

    fn set_ended_callback(&mut self, cb: EndedCallback);
    fn set_volume(&mut self, volume: Volume01);
}
