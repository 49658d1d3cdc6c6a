#![allow(dead_code)]

use lanechart_ports::audio::{
    AudioError, AudioPlaybackPort, DecodedAudio, EndedCallback, SourceGeneration, StartRequest,
};
use lanechart_ports::project::ProjectSnapshot;
use lanechart_ports::storage::{EditorSettingsDto, StorageError, StoragePort};
use lanechart_ports::types::{ClockTime, Volume01};
use parking_lot::Mutex;
use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::Arc;

#[derive(Default)]
pub struct MockAudioInner {
    pub now: ClockTime,
    pub has_buffer: bool,
    pub fail_decode: bool,
    pub fail_start: bool,
    pub decoded_duration: f64,
    pub starts: Vec<StartRequest>,
    pub stops: usize,
    pub volume: Option<Volume01>,
    pub ended: Option<EndedCallback>,
}

/// Manual-clock audio port. Clones share state so tests can drive it after boxing.
#[derive(Clone, Default)]
pub struct MockAudio {
    pub inner: Arc<Mutex<MockAudioInner>>,
}

impl MockAudio {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_buffer(duration: f64) -> Self {
        let audio = Self::new();
        {
            let mut inner = audio.inner.lock();
            inner.has_buffer = true;
            inner.decoded_duration = duration;
        }
        audio
    }

    pub fn advance(&self, seconds: f64) {
        self.inner.lock().now += seconds;
    }

    pub fn starts(&self) -> Vec<StartRequest> {
        self.inner.lock().starts.clone()
    }

    pub fn stops(&self) -> usize {
        self.inner.lock().stops
    }

    /// Every later `start` fails, as when the output device disappears.
    pub fn fail_starts(&self) {
        self.inner.lock().fail_start = true;
    }

    pub fn fire_ended(&self, generation: SourceGeneration) {
        let callback = self.inner.lock().ended.clone();
        if let Some(callback) = callback {
            callback(generation);
        }
    }
}

impl AudioPlaybackPort for MockAudio {
    fn decode(&mut self, bytes: &[u8]) -> Result<DecodedAudio, AudioError> {
        let mut inner = self.inner.lock();
        if inner.fail_decode || bytes.is_empty() {
            return Err(AudioError::Decode("unsupported format".to_string()));
        }
        inner.has_buffer = true;
        let samples = bytes.iter().map(|b| *b as f32 / 255.0).collect();
        Ok(DecodedAudio {
            duration: inner.decoded_duration,
            samples: Some(samples),
        })
    }

    fn has_buffer(&self) -> bool {
        self.inner.lock().has_buffer
    }

    fn start(&mut self, request: StartRequest) -> Result<(), AudioError> {
        let mut inner = self.inner.lock();
        if inner.fail_start {
            return Err(AudioError::Backend("output device lost".to_string()));
        }
        inner.starts.push(request);
        Ok(())
    }

    fn stop(&mut self) {
        self.inner.lock().stops += 1;
    }

    fn now(&self) -> ClockTime {
        self.inner.lock().now
    }

    fn set_ended_callback(&mut self, cb: EndedCallback) {
        self.inner.lock().ended = Some(cb);
    }

    fn set_volume(&mut self, volume: Volume01) {
        self.inner.lock().volume = Some(volume);
    }
}

#[derive(Clone, Default)]
pub struct MemoryStorage {
    pub settings: Arc<Mutex<Option<EditorSettingsDto>>>,
    pub projects: Arc<Mutex<HashMap<PathBuf, ProjectSnapshot>>>,
}

impl StoragePort for MemoryStorage {
    fn load_settings(&self) -> Result<EditorSettingsDto, StorageError> {
        Ok(self.settings.lock().clone().unwrap_or_default())
    }

    fn save_settings(&self, s: &EditorSettingsDto) -> Result<(), StorageError> {
        *self.settings.lock() = Some(s.clone());
        Ok(())
    }

    fn load_project(&self, path: &Path) -> Result<ProjectSnapshot, StorageError> {
        self.projects
            .lock()
            .get(path)
            .cloned()
            .ok_or_else(|| StorageError::Io(format!("{} not found", path.display())))
    }

    fn save_project(&self, path: &Path, project: &ProjectSnapshot) -> Result<(), StorageError> {
        self.projects
            .lock()
            .insert(path.to_path_buf(), project.clone());
        Ok(())
    }
}
