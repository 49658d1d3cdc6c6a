use serde::{Deserialize, Serialize};
use std::fmt;

pub type Tick = i64; // musical grid position, never wall-clock time
pub type LaneId = u32;
pub type EventId = u64;
pub type Seconds = f64; // chart time
pub type ClockTime = f64; // audio collaborator's monotonic clock, seconds

pub const TICKS_PER_BAR: Tick = 96;
pub const BEATS_PER_BAR: Tick = 4;
pub const HOLD_GAP_THRESHOLD: Tick = 3; // 1/32 bar

pub const DEFAULT_BPM: f64 = 120.0;
pub const DEFAULT_GRID_SNAP: u32 = 6;

/// Tempo in beats per minute. Always >= 1, so it is safe as a divisor.
#[derive(Clone, Copy, Debug, PartialEq, PartialOrd, Serialize, Deserialize)]
#[serde(from = "f64", into = "f64")]
pub struct Bpm(f64);

impl Bpm {
    pub fn new(value: f64) -> Self {
        if value.is_finite() {
            Self(value.max(1.0))
        } else {
            Self(DEFAULT_BPM)
        }
    }

    /// Parses user text, keeping `last_good` when the text is not a positive number.
    pub fn parse_or(text: &str, last_good: Bpm) -> Self {
        match text.trim().parse::<f64>() {
            Ok(value) if value.is_finite() && value > 0.0 => Self::new(value),
            _ => last_good,
        }
    }

    pub fn get(self) -> f64 {
        self.0
    }
}

impl Default for Bpm {
    fn default() -> Self {
        Self(DEFAULT_BPM)
    }
}

impl From<f64> for Bpm {
    fn from(value: f64) -> Self {
        Self::new(value)
    }
}

impl From<Bpm> for f64 {
    fn from(value: Bpm) -> Self {
        value.0
    }
}

impl fmt::Display for Bpm {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Grid snap denominator in ticks (6 = 1/16 bar at 96 ticks per bar).
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "u32", into = "u32")]
pub struct GridSnap(u32);

impl GridSnap {
    pub fn new(ticks: u32) -> Self {
        Self(ticks.max(1))
    }

    pub fn ticks(self) -> Tick {
        self.0 as Tick
    }
}

impl Default for GridSnap {
    fn default() -> Self {
        Self(DEFAULT_GRID_SNAP)
    }
}

impl From<u32> for GridSnap {
    fn from(value: u32) -> Self {
        Self::new(value)
    }
}

impl From<GridSnap> for u32 {
    fn from(value: GridSnap) -> Self {
        value.0
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize, Default)]
pub struct Volume01(pub f32);

impl Volume01 {
    pub fn new(value: f32) -> Self {
        Self(value.clamp(0.0, 1.0))
    }

    pub fn get(self) -> f32 {
        self.0
    }
}
