use crate::types::*;
use crate::vfx::VfxEffect;
use serde::{Deserialize, Serialize};

pub const PROJECT_SCHEMA_VERSION: &str = "4.2";

fn default_ticks_per_bar() -> Tick {
    TICKS_PER_BAR
}

fn default_version() -> String {
    PROJECT_SCHEMA_VERSION.to_string()
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LaneKindTag {
    Note,
    Vfx,
}

/// Older project files spell the fields `type` / `vfxType`.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct LaneSnapshot {
    pub id: LaneId,
    #[serde(alias = "type")]
    pub kind: LaneKindTag,
    #[serde(
        default,
        alias = "vfxType",
        skip_serializing_if = "Option::is_none"
    )]
    pub effect: Option<VfxEffect>,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EventSnapshot {
    pub id: EventId,
    pub lane_id: LaneId,
    pub tick: Tick,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProjectSnapshot {
    #[serde(default)]
    pub lanes: Vec<LaneSnapshot>,
    #[serde(default)]
    pub events: Vec<EventSnapshot>,
    #[serde(default)]
    pub audio_offset: Seconds,
    #[serde(default)]
    pub bpm: Bpm,
    #[serde(default = "default_ticks_per_bar")]
    pub ticks_per_bar: Tick,
    #[serde(default = "default_version")]
    pub version: String,
}

impl Default for ProjectSnapshot {
    fn default() -> Self {
        Self {
            lanes: Vec::new(),
            events: Vec::new(),
            audio_offset: 0.0,
            bpm: Bpm::default(),
            ticks_per_bar: TICKS_PER_BAR,
            version: default_version(),
        }
    }
}
