use crate::decode::DecodedTrack;
use lanechart_ports::audio::SourceGeneration;
use std::sync::Arc;

pub enum VoiceCommand {
    Load(Arc<DecodedTrack>),
    Start {
        /// Source frame to begin from, at the track's own rate.
        source_frame: f64,
        /// Device frame at which the source starts sounding.
        start_frame: u64,
        generation: SourceGeneration,
    },
    Stop,
    Gain(f32),
}

/// Audio-thread side of the playback port: one source, played at most once per start.
pub struct Voice {
    track: Option<Arc<DecodedTrack>>,
    device_rate: u32,
    position: f64,
    start_frame: u64,
    active: Option<SourceGeneration>,
    gain: f32,
}

impl Voice {
    pub fn new(device_rate: u32) -> Self {
        Self {
            track: None,
            device_rate: device_rate.max(1),
            position: 0.0,
            start_frame: 0,
            active: None,
            gain: 1.0,
        }
    }

    pub fn is_active(&self) -> bool {
        self.active.is_some()
    }

    pub fn apply(&mut self, cmd: VoiceCommand) {
        match cmd {
            VoiceCommand::Load(track) => {
                self.track = Some(track);
                self.active = None;
            }
            VoiceCommand::Start {
                source_frame,
                start_frame,
                generation,
            } => {
                self.position = source_frame.max(0.0);
                self.start_frame = start_frame;
                self.active = Some(generation);
            }
            VoiceCommand::Stop => self.active = None,
            VoiceCommand::Gain(gain) => self.gain = gain,
        }
    }

    /// Renders one block whose first frame is device frame `block_start`.
    /// Returns the generation of a source that ran out inside this block.
    pub fn render(
        &mut self,
        block_start: u64,
        left: &mut [f32],
        right: &mut [f32],
    ) -> Option<SourceGeneration> {
        left.fill(0.0);
        right.fill(0.0);
        let generation = self.active?;
        let Some(track) = self.track.as_ref() else {
            self.active = None;
            return Some(generation);
        };

        let step = track.sample_rate as f64 / self.device_rate as f64;
        let frames = left.len().min(right.len());
        for i in 0..frames {
            if block_start + (i as u64) < self.start_frame {
                continue;
            }
            let index = self.position as usize;
            if index >= track.frames() {
                self.active = None;
                return Some(generation);
            }
            left[i] = track.left[index] * self.gain;
            right[i] = track.right[index] * self.gain;
            self.position += step;
        }
        None
    }
}
