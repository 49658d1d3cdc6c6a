use crate::interaction::InteractionMode;
use lanechart_ports::project::{LaneSnapshot, ProjectSnapshot};
use lanechart_ports::storage::EditorSettingsDto;
use lanechart_ports::types::{LaneId, Seconds, Volume01};
use lanechart_ports::vfx::VfxEffect;
use serde::{Deserialize, Serialize};

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum PointerButton {
    Primary,
    Secondary,
    Middle,
}

#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(tag = "type", content = "payload")]
pub enum Command {
    LoadAudio { bytes: Vec<u8> },
    TogglePlayback,
    Play,
    Pause,
    ScrubBy { seconds: Seconds },
    SeekTo { seconds: Seconds },
    Wheel { delta_y: f64 },
    NudgeAudioOffset { seconds: Seconds },
    SetBpm { text: String },
    SetGridSnap { ticks: u32 },
    SetVolume { volume: Volume01 },
    SetEditorZoom { pixels_per_second: f32 },
    SetLiveSpeed { pixels_per_second: f32 },
    SetSpeedLerp { amount: f32 },
    SetInvertedScroll { inverted: bool },
    SetViewport { width: f32, height: f32 },
    EditorPointerDown { button: PointerButton, y: f32 },
    EditorPointerMoved { x: f32, y: f32 },
    WaveformPointerDown { y: f32 },
    WaveformPointerMoved { y: f32 },
    PointerUp,
    FocusLost,
    AddLane,
    OpenLaneEditor { lane_id: LaneId },
    SetLaneNote { lane_id: LaneId },
    SetLaneEffect { lane_id: LaneId, effect: VfxEffect },
    DeleteLane { lane_id: LaneId },
    OpenSpriteEditor,
    CloseModal,
    ReplaceProject { snapshot: ProjectSnapshot },
    ImportProject { path: String },
    ExportProject { path: String },
}

#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(tag = "type", content = "payload")]
pub enum Event {
    TransportUpdated {
        position: Seconds,
        display: String,
        playing: bool,
    },
    AudioLoaded { duration: Seconds },
    AudioDecodeFailed { message: String },
    AudioOffsetUpdated { offset: Seconds, display: String },
    LanesUpdated { lanes: Vec<LaneSnapshot> },
    SettingsUpdated { settings: EditorSettingsDto },
    InteractionModeChanged { mode: InteractionMode },
    ProjectReplaced { lanes: usize, events: usize },
}
