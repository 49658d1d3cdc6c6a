use lanechart_ports::audio::{AudioError, AudioPlaybackPort, SourceGeneration, StartRequest};
use lanechart_ports::types::{ClockTime, Seconds};
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

/// Placeholder length used until audio has been decoded.
pub const DEFAULT_DURATION: Seconds = 300.0;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum TransportState {
    Stopped,
    Playing,
}

/// Reconciles the audio clock with the user's pause/scrub offset.
///
/// Stopped: position is `pause_offset`. Playing: position is `now - start_time`,
/// where `now` comes from the audio collaborator.
#[derive(Clone, Debug)]
pub struct PlaybackClock {
    state: TransportState,
    pause_offset: Seconds,
    start_time: ClockTime,
    audio_offset: Seconds,
    duration: Seconds,
    generation: SourceGeneration,
}

impl Default for PlaybackClock {
    fn default() -> Self {
        Self::new()
    }
}

impl PlaybackClock {
    pub fn new() -> Self {
        Self {
            state: TransportState::Stopped,
            pause_offset: 0.0,
            start_time: 0.0,
            audio_offset: 0.0,
            duration: DEFAULT_DURATION,
            generation: 0,
        }
    }

    pub fn state(&self) -> TransportState {
        self.state
    }

    pub fn is_playing(&self) -> bool {
        self.state == TransportState::Playing
    }

    pub fn pause_offset(&self) -> Seconds {
        self.pause_offset
    }

    pub fn audio_offset(&self) -> Seconds {
        self.audio_offset
    }

    pub fn duration(&self) -> Seconds {
        self.duration
    }

    /// Generation of the most recently started source.
    pub fn generation(&self) -> SourceGeneration {
        self.generation
    }

    pub fn set_duration(&mut self, duration: Seconds) {
        self.duration = duration.max(0.0);
        self.pause_offset = self.clamp(self.pause_offset);
    }

    /// Upper bound for scrubbing and seeking.
    pub fn max_position(&self) -> Seconds {
        self.duration + self.audio_offset.abs()
    }

    /// Pure read. Sample once per frame.
    pub fn position(&self, now: ClockTime) -> Seconds {
        match self.state {
            TransportState::Playing => (now - self.start_time).max(0.0),
            TransportState::Stopped => self.pause_offset.max(0.0),
        }
    }

    pub fn play(&mut self, audio: &mut dyn AudioPlaybackPort) -> Result<(), AudioError> {
        if self.is_playing() {
            return Ok(());
        }
        let now = audio.now();
        if audio.has_buffer() {
            self.start_source(audio, now)?;
        } else {
            debug!("no audio buffer, playing silently");
        }
        self.start_time = now - self.pause_offset;
        self.state = TransportState::Playing;
        info!(position = self.pause_offset, "playback started");
        Ok(())
    }

    /// Returns false when already stopped. `at_end` rewinds to the chart start.
    pub fn pause(&mut self, audio: &mut dyn AudioPlaybackPort, at_end: bool) -> bool {
        if !self.is_playing() {
            return false;
        }
        audio.stop();
        self.pause_offset = if at_end {
            0.0
        } else {
            (audio.now() - self.start_time).max(0.0)
        };
        self.state = TransportState::Stopped;
        info!(position = self.pause_offset, at_end, "playback paused");
        true
    }

    pub fn scrub(
        &mut self,
        delta: Seconds,
        audio: &mut dyn AudioPlaybackPort,
    ) -> Result<Seconds, AudioError> {
        let base = self.position(audio.now());
        self.seek(base + delta, audio)
    }

    /// Moves to an absolute chart time, clamped to `[0, max_position]`. While playing the
    /// reference point is rebased and the source restarted there; playback continues.
    pub fn seek(
        &mut self,
        target: Seconds,
        audio: &mut dyn AudioPlaybackPort,
    ) -> Result<Seconds, AudioError> {
        let target = self.clamp(target);
        self.pause_offset = target;
        if self.is_playing() {
            self.rebase(audio)?;
        }
        Ok(target)
    }

    /// Shifts chart/source alignment. While playing the chart position is kept and the
    /// source restarts with the new offset.
    pub fn nudge_audio_offset(
        &mut self,
        delta: Seconds,
        audio: &mut dyn AudioPlaybackPort,
    ) -> Result<(), AudioError> {
        self.set_audio_offset(self.audio_offset + delta, audio)
    }

    pub fn set_audio_offset(
        &mut self,
        offset: Seconds,
        audio: &mut dyn AudioPlaybackPort,
    ) -> Result<(), AudioError> {
        if self.is_playing() {
            self.pause_offset = self.position(audio.now());
            self.audio_offset = offset;
            self.rebase(audio)?;
        } else {
            self.audio_offset = offset;
            self.pause_offset = self.clamp(self.pause_offset);
        }
        debug!(audio_offset = self.audio_offset, "audio offset changed");
        Ok(())
    }

    fn rebase(&mut self, audio: &mut dyn AudioPlaybackPort) -> Result<(), AudioError> {
        let now = audio.now();
        self.start_time = now - self.pause_offset;
        if audio.has_buffer() {
            audio.stop();
            if let Err(err) = self.start_source(audio, now) {
                self.state = TransportState::Stopped;
                return Err(err);
            }
        }
        Ok(())
    }

    fn start_source(
        &mut self,
        audio: &mut dyn AudioPlaybackPort,
        now: ClockTime,
    ) -> Result<(), AudioError> {
        self.generation += 1;
        let request = StartRequest {
            source_offset: (self.pause_offset - self.audio_offset).max(0.0),
            when: now + (self.audio_offset - self.pause_offset).max(0.0),
            generation: self.generation,
        };
        audio.start(request)
    }

    fn clamp(&self, position: Seconds) -> Seconds {
        position.clamp(0.0, self.max_position())
    }
}
