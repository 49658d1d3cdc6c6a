use lanechart_domain_chart::{
    build_segments, grid_lines, is_part_of_long_segment, tick_to_time, EventStore, GridLine,
    LaneSlot, Lanes,
};
use lanechart_ports::types::{Bpm, EventId, LaneId, Seconds, Tick};
use serde::{Deserialize, Serialize};

/// The hit line sits at this fraction of a panel's height, measured from the top.
pub const HIT_ZONE_RATIO: f32 = 0.8;

#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct Viewport {
    pub width: f32,
    pub height: f32,
}

impl Default for Viewport {
    fn default() -> Self {
        Self {
            width: 800.0,
            height: 600.0,
        }
    }
}

impl Viewport {
    pub fn hit_zone_y(&self) -> f32 {
        self.height * HIT_ZONE_RATIO
    }

    /// Chart time under a vertical pointer position in the editor panel.
    pub fn time_at_y(&self, position: Seconds, y: f32, pixels_per_second: f32) -> Seconds {
        position + ((self.hit_zone_y() - y) / pixels_per_second) as f64
    }

    pub fn lane_index_at_x(&self, x: f32, lane_count: usize) -> Option<usize> {
        if lane_count == 0 || self.width <= 0.0 || x < 0.0 {
            return None;
        }
        let lane_width = self.width / lane_count as f32;
        let index = (x / lane_width).floor() as usize;
        (index < lane_count).then_some(index)
    }

    /// Seconds of chart time between the top of the live preview and the hit line.
    pub fn lookahead(&self, pixels_per_second_live: f32) -> Seconds {
        (self.hit_zone_y() / pixels_per_second_live) as f64
    }
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct EditorWindow {
    pub time_min: Seconds,
    pub time_max: Seconds,
}

impl EditorWindow {
    pub fn around(position: Seconds, viewport: Viewport, pixels_per_second: f32) -> Self {
        let below = (viewport.height - viewport.hit_zone_y()) / pixels_per_second;
        let above = viewport.hit_zone_y() / pixels_per_second;
        Self {
            time_min: position - below as f64,
            time_max: position + above as f64,
        }
    }

    pub fn contains(&self, time: Seconds) -> bool {
        time >= self.time_min && time <= self.time_max
    }
}

#[derive(Clone, Debug, PartialEq)]
pub struct EditorNote {
    pub lane_index: usize,
    pub event_id: EventId,
    pub tick: Tick,
    pub time: Seconds,
    pub is_long: bool,
}

#[derive(Clone, Debug, PartialEq)]
pub struct PreviewNote {
    pub lane_id: LaneId,
    pub slot: LaneSlot,
    /// Approach progress at the segment head/tail: 0 at the top edge, 1 on the hit line.
    pub start_progress: f32,
    pub end_progress: f32,
    pub is_long: bool,
}

pub fn editor_grid(window: EditorWindow, bpm: Bpm) -> Vec<GridLine> {
    grid_lines(window.time_min, window.time_max, bpm)
}

pub fn editor_notes(
    window: EditorWindow,
    lanes: &Lanes,
    events: &EventStore,
    bpm: Bpm,
) -> Vec<EditorNote> {
    let mut notes = Vec::new();
    for (lane_index, lane) in lanes.iter().enumerate() {
        let segments = if lane.is_note() {
            build_segments(lane.id, events)
        } else {
            Vec::new()
        };
        for event in events.on_lane(lane.id) {
            let time = tick_to_time(event.tick, bpm);
            if !window.contains(time) {
                continue;
            }
            notes.push(EditorNote {
                lane_index,
                event_id: event.id,
                tick: event.tick,
                time,
                is_long: is_part_of_long_segment(&segments, event.tick),
            });
        }
    }
    notes
}

/// Approach progress for an event at `time`, blended between a linear and a
/// quadratic curve by `speed_lerp`.
pub fn approach_progress(time: Seconds, position: Seconds, lookahead: Seconds, speed_lerp: f32) -> f32 {
    let linear = (1.0 - (time - position) / lookahead).max(0.0) as f32;
    let quadratic = linear * linear;
    linear + (quadratic - linear) * speed_lerp
}

pub fn preview_notes(
    position: Seconds,
    lookahead: Seconds,
    speed_lerp: f32,
    lanes: &Lanes,
    events: &EventStore,
    bpm: Bpm,
) -> Vec<PreviewNote> {
    let horizon = position + lookahead;
    let mut notes = Vec::new();
    for lane in lanes.note_lanes() {
        let Some(slot) = lanes.note_slot(lane.id) else {
            continue;
        };
        for segment in build_segments(lane.id, events) {
            let start = tick_to_time(segment.start_tick, bpm);
            let end = tick_to_time(segment.end_tick, bpm);
            if end < position || start > horizon {
                continue;
            }
            notes.push(PreviewNote {
                lane_id: lane.id,
                slot,
                start_progress: approach_progress(start, position, lookahead, speed_lerp),
                end_progress: approach_progress(end, position, lookahead, speed_lerp),
                is_long: segment.is_long(),
            });
        }
    }
    notes
}
