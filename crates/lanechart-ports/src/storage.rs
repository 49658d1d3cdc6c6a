use crate::project::ProjectSnapshot;
use crate::types::*;
use serde::{Deserialize, Serialize};
use std::path::Path;

fn default_pixels_per_second_editor() -> f32 {
    300.0
}

fn default_pixels_per_second_live() -> f32 {
    625.0
}

fn default_note_thickness_live() -> f32 {
    18.0
}

fn default_note_width_scale() -> f32 {
    0.8
}

fn default_vfx_alpha() -> f32 {
    0.25
}

fn default_inverted_scroll() -> bool {
    true
}

fn default_volume() -> Volume01 {
    Volume01::new(0.5)
}

#[derive(thiserror::Error, Debug)]
pub enum StorageError {
    #[error("io error: {0}")]
    Io(String),
    #[error("serialization error: {0}")]
    Serde(String),
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EditorSettingsDto {
    pub bpm: Bpm,
    pub grid_snap: GridSnap,
    #[serde(default = "default_pixels_per_second_editor")]
    pub pixels_per_second_editor: f32,
    #[serde(default = "default_pixels_per_second_live")]
    pub pixels_per_second_live: f32,
    #[serde(default = "default_note_thickness_live")]
    pub note_thickness_live: f32,
    #[serde(default = "default_note_width_scale")]
    pub note_width_scale: f32,
    #[serde(default = "default_vfx_alpha")]
    pub vfx_alpha: f32,
    pub speed_lerp: f32,
    #[serde(default = "default_inverted_scroll")]
    pub inverted_scroll: bool,
    #[serde(default = "default_volume")]
    pub volume: Volume01,
}

impl Default for EditorSettingsDto {
    fn default() -> Self {
        Self {
            bpm: Bpm::default(),
            grid_snap: GridSnap::default(),
            pixels_per_second_editor: 300.0,
            pixels_per_second_live: 625.0,
            note_thickness_live: 18.0,
            note_width_scale: 0.8,
            vfx_alpha: 0.25,
            speed_lerp: 0.0,
            inverted_scroll: true,
            volume: Volume01::new(0.5),
        }
    }
}

impl EditorSettingsDto {
    /// Scroll direction multiplier for wheel and waveform drags.
    pub fn scroll_direction(&self) -> f64 {
        if self.inverted_scroll {
            1.0
        } else {
            -1.0
        }
    }
}

pub trait StoragePort: Send + Sync {
    fn load_settings(&self) -> Result<EditorSettingsDto, StorageError>;
    fn save_settings(&self, s: &EditorSettingsDto) -> Result<(), StorageError>;

    fn load_project(&self, path: &Path) -> Result<ProjectSnapshot, StorageError>;
    fn save_project(&self, path: &Path, project: &ProjectSnapshot) -> Result<(), StorageError>;
}
