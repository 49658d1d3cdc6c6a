use crate::clock::TransportState;
use crate::dispatcher::Trigger;
use crate::interaction::{Gesture, InteractionMode, InteractionRouter, ScrubSource};
use crate::ipc::{Command, Event, PointerButton};
use crate::state::EngineState;
use crate::view::{
    editor_grid, editor_notes, preview_notes, EditorNote, EditorWindow, PreviewNote, Viewport,
};
use lanechart_domain_chart::{
    format_offset_ms, format_time, snap_time_to_tick, ChartError, GridLine, WaveformPeaks,
    PEAK_RESOLUTION,
};
use lanechart_ports::audio::{AudioError, AudioPlaybackPort, SourceGeneration};
use lanechart_ports::project::ProjectSnapshot;
use lanechart_ports::storage::{EditorSettingsDto, StorageError, StoragePort};
use lanechart_ports::types::{Bpm, GridSnap, LaneId, Seconds, Tick, Volume01};
use parking_lot::Mutex;
use rtrb::{Consumer, RingBuffer};
use std::collections::VecDeque;
use std::path::Path;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use std::time::{Duration, Instant};
use tracing::{debug, warn};

const WHEEL_SECONDS_PER_UNIT: f64 = 0.002;
const TRANSPORT_EMIT_INTERVAL: Duration = Duration::from_millis(33);
const ENDED_QUEUE_CAPACITY: usize = 64;

#[derive(thiserror::Error, Debug)]
pub enum EditorError {
    #[error("audio error: {0}")]
    Audio(#[from] AudioError),
    #[error("storage error: {0}")]
    Storage(#[from] StorageError),
    #[error("chart error: {0}")]
    Chart(#[from] ChartError),
}

/// Grid-snapped placement target under the pointer.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct GhostEvent {
    pub lane_id: LaneId,
    pub tick: Tick,
}

/// Everything derived from one position sample.
#[derive(Clone, Debug)]
pub struct FrameView {
    pub position: Seconds,
    /// Position inside the audio source, for waveform lookups.
    pub source_position: Seconds,
    pub display: String,
    pub playing: bool,
    pub grid: Vec<GridLine>,
    pub editor_notes: Vec<EditorNote>,
    pub preview_notes: Vec<PreviewNote>,
    pub ghost: Option<GhostEvent>,
    pub triggers: Vec<Trigger>,
}

pub struct ChartEditor {
    audio: Box<dyn AudioPlaybackPort>,
    storage: Option<Box<dyn StoragePort>>,
    settings: EditorSettingsDto,
    state: EngineState,
    interaction: InteractionRouter,
    viewport: Viewport,
    ghost: Option<GhostEvent>,
    last_pointer_y: f32,
    waveform: Option<WaveformPeaks>,
    ended_rx: Consumer<SourceGeneration>,
    /// Newest generation that missed the queue; 0 when none.
    ended_overflow: Arc<AtomicU64>,
    events: VecDeque<Event>,
    last_transport_emit: Option<Instant>,
}

impl ChartEditor {
    pub fn new(
        mut audio: Box<dyn AudioPlaybackPort>,
        storage: Option<Box<dyn StoragePort>>,
    ) -> Self {
        let settings = match storage.as_ref() {
            Some(storage) => storage.load_settings().unwrap_or_else(|err| {
                warn!(error = %err, "settings unreadable, using defaults");
                EditorSettingsDto::default()
            }),
            None => EditorSettingsDto::default(),
        };

        let (producer, consumer) = RingBuffer::new(ENDED_QUEUE_CAPACITY);
        let producer = Arc::new(Mutex::new(producer));
        let ended_overflow = Arc::new(AtomicU64::new(0));
        let overflow = Arc::clone(&ended_overflow);
        audio.set_ended_callback(Arc::new(move |generation: SourceGeneration| {
            let pushed = match producer.try_lock() {
                Some(mut guard) => guard.push(generation).is_ok(),
                None => false,
            };
            if !pushed {
                // Generations only grow, so the newest missed one is all a frame needs.
                overflow.fetch_max(generation, Ordering::AcqRel);
                warn!(generation, "ended queue unavailable, notification kept in overflow slot");
            }
        }));
        audio.set_volume(settings.volume);

        let state = EngineState::new(settings.bpm, settings.grid_snap);

        Self {
            audio,
            storage,
            settings,
            state,
            interaction: InteractionRouter::new(),
            viewport: Viewport::default(),
            ghost: None,
            last_pointer_y: 0.0,
            waveform: None,
            ended_rx: consumer,
            ended_overflow,
            events: VecDeque::new(),
            last_transport_emit: None,
        }
    }

    pub fn state(&self) -> &EngineState {
        &self.state
    }

    pub fn settings(&self) -> &EditorSettingsDto {
        &self.settings
    }

    pub fn interaction_mode(&self) -> InteractionMode {
        self.interaction.mode()
    }

    pub fn waveform(&self) -> Option<&WaveformPeaks> {
        self.waveform.as_ref()
    }

    pub fn ghost(&self) -> Option<GhostEvent> {
        self.ghost
    }

    pub fn snapshot(&self) -> ProjectSnapshot {
        self.state.snapshot()
    }

    pub fn drain_events(&mut self) -> Vec<Event> {
        self.events.drain(..).collect()
    }

    pub fn handle_command(&mut self, cmd: Command) -> Result<(), EditorError> {
        match cmd {
            Command::LoadAudio { bytes } => self.load_audio(&bytes)?,
            Command::TogglePlayback => {
                if self.state.clock.is_playing() {
                    self.pause(false);
                } else {
                    self.play()?;
                }
            }
            Command::Play => self.play()?,
            Command::Pause => self.pause(false),
            Command::ScrubBy { seconds } => self.scrub_by(seconds)?,
            Command::SeekTo { seconds } => {
                let result = self.state.clock.seek(seconds, self.audio.as_mut());
                self.after_jump();
                result?;
            }
            Command::Wheel { delta_y } => {
                if self.interaction.permits(Gesture::Wheel) {
                    let delta = delta_y * WHEEL_SECONDS_PER_UNIT * self.settings.scroll_direction();
                    self.scrub_by(delta)?;
                }
            }
            Command::NudgeAudioOffset { seconds } => {
                let result = self
                    .state
                    .clock
                    .nudge_audio_offset(seconds, self.audio.as_mut());
                self.after_jump();
                self.emit_audio_offset();
                result?;
            }
            Command::SetBpm { text } => {
                self.state.bpm = Bpm::parse_or(&text, self.state.bpm);
                self.settings.bpm = self.state.bpm;
                self.settings_changed();
            }
            Command::SetGridSnap { ticks } => {
                self.state.grid_snap = GridSnap::new(ticks);
                self.settings.grid_snap = self.state.grid_snap;
                self.settings_changed();
            }
            Command::SetVolume { volume } => {
                let volume = Volume01::new(volume.get());
                self.audio.set_volume(volume);
                self.settings.volume = volume;
                self.settings_changed();
            }
            Command::SetEditorZoom { pixels_per_second } => {
                self.settings.pixels_per_second_editor = pixels_per_second.max(1.0);
                self.settings_changed();
            }
            Command::SetLiveSpeed { pixels_per_second } => {
                self.settings.pixels_per_second_live = pixels_per_second.max(1.0);
                self.settings_changed();
            }
            Command::SetSpeedLerp { amount } => {
                self.settings.speed_lerp = amount.clamp(0.0, 1.0);
                self.settings_changed();
            }
            Command::SetInvertedScroll { inverted } => {
                self.settings.inverted_scroll = inverted;
                self.settings_changed();
            }
            Command::SetViewport { width, height } => {
                self.viewport = Viewport { width, height };
            }
            Command::EditorPointerDown { button, y } => self.editor_pointer_down(button, y),
            Command::EditorPointerMoved { x, y } => self.editor_pointer_moved(x, y)?,
            Command::WaveformPointerDown { y } => {
                if self.interaction.begin(Gesture::Scrub(ScrubSource::Waveform)) {
                    self.last_pointer_y = y;
                    self.emit_interaction_mode();
                }
            }
            Command::WaveformPointerMoved { y } => self.waveform_pointer_moved(y)?,
            Command::PointerUp | Command::FocusLost => {
                self.interaction.end_drag();
                self.emit_interaction_mode();
            }
            Command::AddLane => {
                let lane_id = self.state.lanes.add()?;
                debug!(lane_id, "lane added");
                self.emit_lanes();
            }
            Command::OpenLaneEditor { lane_id } => {
                self.state
                    .lanes
                    .get(lane_id)
                    .ok_or(ChartError::LaneNotFound(lane_id))?;
                self.interaction.open_lane_editor(lane_id);
                self.emit_interaction_mode();
            }
            Command::SetLaneNote { lane_id } => {
                self.state.lanes.set_note(lane_id)?;
                self.lane_edit_done();
            }
            Command::SetLaneEffect { lane_id, effect } => {
                self.state.lanes.set_effect(lane_id, effect)?;
                self.lane_edit_done();
            }
            Command::DeleteLane { lane_id } => {
                self.state.delete_lane(lane_id)?;
                if self.ghost.is_some_and(|ghost| ghost.lane_id == lane_id) {
                    self.ghost = None;
                }
                self.lane_edit_done();
            }
            Command::OpenSpriteEditor => {
                self.interaction.open_sprite_editor();
                self.emit_interaction_mode();
            }
            Command::CloseModal => {
                self.interaction.close_modal();
                self.emit_interaction_mode();
            }
            Command::ReplaceProject { snapshot } => self.replace_project(snapshot)?,
            Command::ImportProject { path } => {
                let snapshot = self.storage()?.load_project(Path::new(&path))?;
                self.replace_project(snapshot)?;
            }
            Command::ExportProject { path } => {
                let snapshot = self.state.snapshot();
                self.storage()?.save_project(Path::new(&path), &snapshot)?;
            }
        }
        Ok(())
    }

    /// One animation frame. Position is sampled exactly once; every derivation and
    /// the dispatch pass read that same value.
    pub fn frame(&mut self, wall_now: Instant) -> FrameView {
        self.process_ended_sources();

        let position = self.state.clock.position(self.audio.now());
        let playing = self.state.clock.is_playing();

        let window = EditorWindow::around(
            position,
            self.viewport,
            self.settings.pixels_per_second_editor,
        );
        let grid = editor_grid(window, self.state.bpm);
        let notes = editor_notes(window, &self.state.lanes, &self.state.events, self.state.bpm);
        let preview = preview_notes(
            position,
            self.viewport.lookahead(self.settings.pixels_per_second_live),
            self.settings.speed_lerp,
            &self.state.lanes,
            &self.state.events,
            self.state.bpm,
        );

        let triggers = if playing {
            let triggers = self.state.dispatcher.dispatch(
                position,
                &self.state.lanes,
                &self.state.events,
                self.state.bpm,
            );
            for trigger in &triggers {
                self.state.vfx.apply(*trigger, wall_now);
            }
            triggers
        } else {
            self.state.dispatcher.observe(position);
            Vec::new()
        };
        self.state.vfx.prune(wall_now);

        self.emit_transport_throttled(position, wall_now);

        FrameView {
            position,
            source_position: position - self.state.clock.audio_offset(),
            display: format_time(position),
            playing,
            grid,
            editor_notes: notes,
            preview_notes: preview,
            ghost: self.ghost,
            triggers,
        }
    }

    fn load_audio(&mut self, bytes: &[u8]) -> Result<(), EditorError> {
        let decoded = match self.audio.decode(bytes) {
            Ok(decoded) => decoded,
            Err(err) => {
                warn!(error = %err, "audio decode failed, staying in silent mode");
                self.events.push_back(Event::AudioDecodeFailed {
                    message: err.to_string(),
                });
                return Err(err.into());
            }
        };
        self.pause(false);
        self.state.clock.set_duration(decoded.duration);
        self.waveform = decoded
            .samples
            .as_deref()
            .map(|samples| WaveformPeaks::from_samples(samples, decoded.duration, PEAK_RESOLUTION));
        debug!(duration = decoded.duration, "audio loaded");
        self.events.push_back(Event::AudioLoaded {
            duration: decoded.duration,
        });
        Ok(())
    }

    fn play(&mut self) -> Result<(), EditorError> {
        if self.state.clock.is_playing() {
            return Ok(());
        }
        self.state.clock.play(self.audio.as_mut())?;
        self.state.dispatcher.rebase(self.state.clock.pause_offset());
        self.emit_transport_now();
        Ok(())
    }

    /// Stop transition: also drops every live effect.
    fn pause(&mut self, at_end: bool) {
        if !self.state.clock.pause(self.audio.as_mut(), at_end) {
            return;
        }
        self.state.vfx.clear();
        self.state.dispatcher.rebase(self.state.clock.pause_offset());
        self.emit_transport_now();
    }

    fn scrub_by(&mut self, delta: Seconds) -> Result<(), EditorError> {
        let result = self.state.clock.scrub(delta, self.audio.as_mut());
        self.after_jump();
        result?;
        Ok(())
    }

    /// Runs after the clock moved or restarted its source. While playing the dispatch
    /// window stays anchored at the last frame, so a forward jump fires the events it
    /// crossed on the next frame and a backward jump fires nothing.
    fn after_jump(&mut self) {
        let position = self.state.clock.position(self.audio.now());
        if self.state.clock.state() == TransportState::Stopped {
            // A failed restart leaves the clock stopped; drop the effects with it.
            self.state.vfx.clear();
            self.state.dispatcher.rebase(position);
        }
        self.push_transport(position);
    }

    fn process_ended_sources(&mut self) {
        while let Ok(generation) = self.ended_rx.pop() {
            self.source_ended(generation);
        }
        let missed = self.ended_overflow.swap(0, Ordering::AcqRel);
        if missed != 0 {
            self.source_ended(missed);
        }
    }

    fn source_ended(&mut self, generation: SourceGeneration) {
        if self.state.clock.is_playing() && generation == self.state.clock.generation() {
            self.pause(true);
        } else {
            debug!(generation, "ignoring end of stale source");
        }
    }

    fn editor_pointer_down(&mut self, button: PointerButton, y: f32) {
        let gesture = match button {
            PointerButton::Primary => Gesture::PlaceDrag,
            PointerButton::Secondary => Gesture::EraseDrag,
            PointerButton::Middle => Gesture::Scrub(ScrubSource::Editor),
        };
        if !self.interaction.begin(gesture) {
            return;
        }
        self.last_pointer_y = y;
        match gesture {
            Gesture::PlaceDrag => self.place_at_ghost(),
            Gesture::EraseDrag => self.remove_at_ghost(),
            _ => {}
        }
        self.emit_interaction_mode();
    }

    fn editor_pointer_moved(&mut self, x: f32, y: f32) -> Result<(), EditorError> {
        self.update_ghost(x, y);
        match self.interaction.mode() {
            InteractionMode::PlacingEvents => self.place_at_ghost(),
            InteractionMode::RemovingEvents => self.remove_at_ghost(),
            InteractionMode::ScrubbingTimeline(ScrubSource::Editor) => {
                let delta = ((y - self.last_pointer_y) / self.settings.pixels_per_second_editor) as f64;
                self.last_pointer_y = y;
                self.scrub_by(-delta)?;
            }
            _ => {}
        }
        Ok(())
    }

    fn waveform_pointer_moved(&mut self, y: f32) -> Result<(), EditorError> {
        if self.interaction.mode() != InteractionMode::ScrubbingTimeline(ScrubSource::Waveform) {
            return Ok(());
        }
        let delta = ((y - self.last_pointer_y) / self.settings.pixels_per_second_editor) as f64;
        self.last_pointer_y = y;
        self.scrub_by(delta * self.settings.scroll_direction())
    }

    fn update_ghost(&mut self, x: f32, y: f32) {
        let Some(lane) = self
            .viewport
            .lane_index_at_x(x, self.state.lanes.len())
            .and_then(|index| self.state.lanes.at_index(index))
        else {
            self.ghost = None;
            return;
        };
        let position = self.state.clock.position(self.audio.now());
        let time = self
            .viewport
            .time_at_y(position, y, self.settings.pixels_per_second_editor);
        self.ghost = Some(GhostEvent {
            lane_id: lane.id,
            tick: snap_time_to_tick(time, self.state.bpm, self.state.grid_snap),
        });
    }

    fn place_at_ghost(&mut self) {
        if let Some(ghost) = self.ghost {
            self.state.events.place(ghost.lane_id, ghost.tick);
        }
    }

    fn remove_at_ghost(&mut self) {
        if let Some(ghost) = self.ghost {
            self.state.events.remove(ghost.lane_id, ghost.tick);
        }
    }

    fn replace_project(&mut self, snapshot: ProjectSnapshot) -> Result<(), EditorError> {
        self.pause(false);
        self.state.replace_chart(&snapshot);
        let result = self
            .state
            .clock
            .set_audio_offset(snapshot.audio_offset, self.audio.as_mut());
        self.after_jump();
        self.ghost = None;
        self.settings.bpm = self.state.bpm;
        self.events.push_back(Event::ProjectReplaced {
            lanes: self.state.lanes.len(),
            events: self.state.events.len(),
        });
        self.emit_lanes();
        self.emit_audio_offset();
        result?;
        Ok(())
    }

    fn lane_edit_done(&mut self) {
        self.interaction.close_modal();
        self.emit_lanes();
        self.emit_interaction_mode();
    }

    fn storage(&self) -> Result<&dyn StoragePort, StorageError> {
        self.storage
            .as_deref()
            .ok_or_else(|| StorageError::Io("no storage configured".to_string()))
    }

    fn settings_changed(&mut self) {
        self.events.push_back(Event::SettingsUpdated {
            settings: self.settings.clone(),
        });
        if let Some(storage) = self.storage.as_ref() {
            if let Err(err) = storage.save_settings(&self.settings) {
                warn!(error = %err, "saving settings failed");
            }
        }
    }

    fn emit_lanes(&mut self) {
        self.events.push_back(Event::LanesUpdated {
            lanes: self.state.lanes.to_snapshots(),
        });
    }

    fn emit_audio_offset(&mut self) {
        let offset = self.state.clock.audio_offset();
        self.events.push_back(Event::AudioOffsetUpdated {
            offset,
            display: format_offset_ms(offset),
        });
    }

    fn emit_interaction_mode(&mut self) {
        self.events.push_back(Event::InteractionModeChanged {
            mode: self.interaction.mode(),
        });
    }

    fn emit_transport_now(&mut self) {
        let position = self.state.clock.position(self.audio.now());
        self.push_transport(position);
    }

    /// Frame-driven updates, rate limited on the frame's own wall clock.
    fn emit_transport_throttled(&mut self, position: Seconds, wall_now: Instant) {
        if self.last_transport_emit.is_some_and(|last| {
            wall_now.saturating_duration_since(last) < TRANSPORT_EMIT_INTERVAL
        }) {
            return;
        }
        self.push_transport(position);
        self.last_transport_emit = Some(wall_now);
    }

    fn push_transport(&mut self, position: Seconds) {
        self.events.push_back(Event::TransportUpdated {
            position,
            display: format_time(position),
            playing: self.state.clock.is_playing(),
        });
    }
}
