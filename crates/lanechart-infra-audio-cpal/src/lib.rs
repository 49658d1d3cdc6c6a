mod decode;
mod voice;

pub use decode::{decode_track, DecodedTrack};
pub use voice::{Voice, VoiceCommand};

use cpal::traits::{DeviceTrait, HostTrait, StreamTrait};
use cpal::{FromSample, SampleFormat, SizedSample, StreamConfig};
use lanechart_ports::audio::{
    AudioError, AudioPlaybackPort, DecodedAudio, EndedCallback, StartRequest,
};
use lanechart_ports::types::{ClockTime, Volume01};
use parking_lot::Mutex;
use rtrb::{Consumer, Producer, RingBuffer};
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{mpsc, Arc};
use std::thread;
use tracing::{error, info, warn};

const COMMAND_QUEUE: usize = 64;
const INITIAL_BLOCK_FRAMES: usize = 8192;

/// Plays one decoded track on the default output device. The device frame counter is
/// the audio clock.
pub struct CpalPlaybackPort {
    commands: Producer<VoiceCommand>,
    frames_rendered: Arc<AtomicU64>,
    device_rate: u32,
    ended: Arc<Mutex<Option<EndedCallback>>>,
    track: Option<Arc<DecodedTrack>>,
    stop_tx: mpsc::Sender<()>,
    join_handle: Option<thread::JoinHandle<()>>,
}

struct Renderer {
    commands: Consumer<VoiceCommand>,
    voice: Voice,
    frames_rendered: Arc<AtomicU64>,
    ended: Arc<Mutex<Option<EndedCallback>>>,
    left: Vec<f32>,
    right: Vec<f32>,
}

impl Renderer {
    fn process<T: SizedSample + FromSample<f32>>(&mut self, data: &mut [T], channels: usize) {
        while let Ok(cmd) = self.commands.pop() {
            self.voice.apply(cmd);
        }
        let frames = data.len() / channels.max(1);
        if frames > self.left.len() {
            self.left.resize(frames, 0.0);
            self.right.resize(frames, 0.0);
        }

        let block_start = self.frames_rendered.load(Ordering::Acquire);
        let finished = self.voice.render(
            block_start,
            &mut self.left[..frames],
            &mut self.right[..frames],
        );
        write_interleaved(data, channels, &self.left[..frames], &self.right[..frames]);
        self.frames_rendered
            .fetch_add(frames as u64, Ordering::AcqRel);

        if let Some(generation) = finished {
            if let Some(guard) = self.ended.try_lock() {
                if let Some(cb) = guard.as_ref() {
                    cb(generation);
                }
            }
        }
    }
}

impl CpalPlaybackPort {
    pub fn open_default() -> Result<Self, AudioError> {
        let (producer, consumer) = RingBuffer::new(COMMAND_QUEUE);
        let frames_rendered = Arc::new(AtomicU64::new(0));
        let ended: Arc<Mutex<Option<EndedCallback>>> = Arc::new(Mutex::new(None));
        let (ready_tx, ready_rx) = mpsc::sync_channel(1);
        let (stop_tx, stop_rx) = mpsc::channel::<()>();

        let thread_frames = Arc::clone(&frames_rendered);
        let thread_ended = Arc::clone(&ended);
        let join_handle = thread::spawn(move || {
            let host = cpal::default_host();
            let Some(device) = host.default_output_device() else {
                let _ = ready_tx.send(Err(AudioError::Backend("no output device".to_string())));
                return;
            };
            let supported = match device.default_output_config() {
                Ok(config) => config,
                Err(err) => {
                    let _ = ready_tx.send(Err(AudioError::Backend(err.to_string())));
                    return;
                }
            };
            let sample_format = supported.sample_format();
            let config: StreamConfig = supported.config();
            let device_rate = config.sample_rate.0;

            let renderer = Renderer {
                commands: consumer,
                voice: Voice::new(device_rate),
                frames_rendered: thread_frames,
                ended: thread_ended,
                left: vec![0.0; INITIAL_BLOCK_FRAMES],
                right: vec![0.0; INITIAL_BLOCK_FRAMES],
            };
            let stream = match sample_format {
                SampleFormat::F32 => build_stream::<f32>(&device, &config, renderer),
                SampleFormat::I16 => build_stream::<i16>(&device, &config, renderer),
                SampleFormat::U16 => build_stream::<u16>(&device, &config, renderer),
                other => Err(AudioError::Backend(format!(
                    "unsupported sample format {other:?}"
                ))),
            };
            let stream = match stream {
                Ok(stream) => stream,
                Err(err) => {
                    let _ = ready_tx.send(Err(err));
                    return;
                }
            };
            if let Err(err) = stream.play() {
                let _ = ready_tx.send(Err(AudioError::Backend(err.to_string())));
                return;
            }

            let _ = ready_tx.send(Ok(device_rate));
            let _ = stop_rx.recv();
            drop(stream);
        });

        let device_rate = ready_rx
            .recv()
            .map_err(|e| AudioError::Backend(e.to_string()))??;
        info!(device_rate, "audio output opened");

        Ok(Self {
            commands: producer,
            frames_rendered,
            device_rate,
            ended,
            track: None,
            stop_tx,
            join_handle: Some(join_handle),
        })
    }

    pub fn device_rate(&self) -> u32 {
        self.device_rate
    }

    fn send(&mut self, cmd: VoiceCommand) -> Result<(), AudioError> {
        self.commands
            .push(cmd)
            .map_err(|_| AudioError::Backend("audio command queue full".to_string()))
    }

    fn frames_now(&self) -> u64 {
        self.frames_rendered.load(Ordering::Acquire)
    }
}

impl Drop for CpalPlaybackPort {
    fn drop(&mut self) {
        let _ = self.stop_tx.send(());
        if let Some(handle) = self.join_handle.take() {
            let _ = handle.join();
        }
    }
}

impl AudioPlaybackPort for CpalPlaybackPort {
    fn decode(&mut self, bytes: &[u8]) -> Result<DecodedAudio, AudioError> {
        let track = Arc::new(decode_track(bytes)?);
        self.send(VoiceCommand::Load(Arc::clone(&track)))?;
        let decoded = DecodedAudio {
            duration: track.duration(),
            samples: Some(track.mono()),
        };
        self.track = Some(track);
        Ok(decoded)
    }

    fn has_buffer(&self) -> bool {
        self.track.is_some()
    }

    fn start(&mut self, request: StartRequest) -> Result<(), AudioError> {
        let track = self.track.as_ref().ok_or(AudioError::NoBuffer)?;
        let source_frame = request.source_offset * track.sample_rate as f64;
        let requested = (request.when * self.device_rate as f64).round().max(0.0) as u64;
        let start_frame = requested.max(self.frames_now());
        self.send(VoiceCommand::Start {
            source_frame,
            start_frame,
            generation: request.generation,
        })
    }

    fn stop(&mut self) {
        if let Err(err) = self.send(VoiceCommand::Stop) {
            warn!(error = %err, "stop dropped");
        }
    }

    fn now(&self) -> ClockTime {
        self.frames_now() as f64 / self.device_rate as f64
    }

    fn set_ended_callback(&mut self, cb: EndedCallback) {
        *self.ended.lock() = Some(cb);
    }

    fn set_volume(&mut self, volume: Volume01) {
        if let Err(err) = self.send(VoiceCommand::Gain(volume.get())) {
            warn!(error = %err, "volume change dropped");
        }
    }
}

fn build_stream<T: SizedSample + FromSample<f32>>(
    device: &cpal::Device,
    config: &StreamConfig,
    mut renderer: Renderer,
) -> Result<cpal::Stream, AudioError> {
    let channels = config.channels as usize;
    device
        .build_output_stream(
            config,
            move |data: &mut [T], _info: &cpal::OutputCallbackInfo| {
                renderer.process(data, channels);
            },
            |err| error!(error = %err, "audio stream error"),
            None,
        )
        .map_err(|e| AudioError::Backend(e.to_string()))
}

fn write_interleaved<T: SizedSample + FromSample<f32>>(
    data: &mut [T],
    channels: usize,
    left: &[f32],
    right: &[f32],
) {
    if channels == 0 {
        return;
    }
    for (frame, out) in data.chunks_exact_mut(channels).enumerate() {
        let l = left.get(frame).copied().unwrap_or(0.0).clamp(-1.0, 1.0);
        let r = right.get(frame).copied().unwrap_or(0.0).clamp(-1.0, 1.0);
        if channels == 1 {
            out[0] = T::from_sample((l + r) * 0.5);
            continue;
        }
        out[0] = T::from_sample(l);
        out[1] = T::from_sample(r);
        for sample in &mut out[2..] {
            *sample = T::EQUILIBRIUM;
        }
    }
}
