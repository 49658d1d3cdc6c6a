use lanechart_ports::types::LaneId;
use serde::{Deserialize, Serialize};
use tracing::debug;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum ScrubSource {
    /// Dragging the waveform panel; follows the scroll-direction setting.
    Waveform,
    /// Middle-dragging the editor panel.
    Editor,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum InteractionMode {
    Idle,
    PlacingEvents,
    RemovingEvents,
    ScrubbingTimeline(ScrubSource),
    EditingLane { lane_id: LaneId },
    EditingSprite,
}

impl InteractionMode {
    pub fn is_modal(self) -> bool {
        matches!(self, Self::EditingLane { .. } | Self::EditingSprite)
    }
}

/// Input streams the router can admit or reject.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Gesture {
    Hover,
    PlaceDrag,
    EraseDrag,
    Scrub(ScrubSource),
    Wheel,
    SpriteDrag,
}

/// Owns which gesture streams are live. Modals swallow timeline input.
#[derive(Clone, Debug)]
pub struct InteractionRouter {
    mode: InteractionMode,
}

impl Default for InteractionRouter {
    fn default() -> Self {
        Self {
            mode: InteractionMode::Idle,
        }
    }
}

impl InteractionRouter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn mode(&self) -> InteractionMode {
        self.mode
    }

    pub fn permits(&self, gesture: Gesture) -> bool {
        use InteractionMode as M;
        match (self.mode, gesture) {
            (_, Gesture::Hover) => true,
            (M::EditingSprite, Gesture::SpriteDrag) => true,
            (_, Gesture::SpriteDrag) => false,
            (mode, _) if mode.is_modal() => false,
            (_, Gesture::Wheel) => true,
            (M::Idle, _) => true,
            (M::PlacingEvents, Gesture::PlaceDrag) => true,
            (M::RemovingEvents, Gesture::EraseDrag) => true,
            (M::ScrubbingTimeline(active), Gesture::Scrub(source)) => active == source,
            _ => false,
        }
    }

    /// Starts a drag gesture. Returns false when the current mode rejects it.
    pub fn begin(&mut self, gesture: Gesture) -> bool {
        if !self.permits(gesture) {
            debug!(?gesture, mode = ?self.mode, "gesture rejected");
            return false;
        }
        let next = match gesture {
            Gesture::PlaceDrag => InteractionMode::PlacingEvents,
            Gesture::EraseDrag => InteractionMode::RemovingEvents,
            Gesture::Scrub(source) => InteractionMode::ScrubbingTimeline(source),
            Gesture::Hover | Gesture::Wheel | Gesture::SpriteDrag => return true,
        };
        self.mode = next;
        true
    }

    /// Pointer released or focus lost: drags end, modals stay open.
    pub fn end_drag(&mut self) {
        if !self.mode.is_modal() {
            self.mode = InteractionMode::Idle;
        }
    }

    pub fn open_lane_editor(&mut self, lane_id: LaneId) {
        self.mode = InteractionMode::EditingLane { lane_id };
    }

    pub fn open_sprite_editor(&mut self) {
        self.mode = InteractionMode::EditingSprite;
    }

    pub fn close_modal(&mut self) {
        if self.mode.is_modal() {
            self.mode = InteractionMode::Idle;
        }
    }

    pub fn editing_lane(&self) -> Option<LaneId> {
        match self.mode {
            InteractionMode::EditingLane { lane_id } => Some(lane_id),
            _ => None,
        }
    }
}
