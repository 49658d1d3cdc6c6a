use lanechart_domain_chart::{tick_to_time, EventStore, LaneKind, LaneSlot, Lanes, TimelineEvent};
use lanechart_ports::types::{Bpm, LaneId, Seconds};
use lanechart_ports::vfx::{EffectCategory, VfxEffect};
use tracing::debug;

#[derive(Clone, Copy, Debug, PartialEq)]
pub enum Trigger {
    NoteHit { lane_id: LaneId, slot: LaneSlot },
    Burst { lane_id: LaneId, effect: VfxEffect },
    IdleToggle { lane_id: LaneId, effect: VfxEffect },
}

/// Fires each event once when playback crosses it.
///
/// An event at time `t` crosses a frame when `previous < t <= current`; the
/// interval is half-open so a boundary event fires on exactly one frame.
#[derive(Clone, Debug, Default)]
pub struct TriggerDispatcher {
    previous_frame_time: Seconds,
}

impl TriggerDispatcher {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn previous_frame_time(&self) -> Seconds {
        self.previous_frame_time
    }

    /// Restarts crossing detection at `time`. Events at or before it will not fire.
    pub fn rebase(&mut self, time: Seconds) {
        self.previous_frame_time = time;
    }

    /// Tracks the position on frames where nothing should fire.
    pub fn observe(&mut self, current_frame_time: Seconds) {
        self.previous_frame_time = current_frame_time;
    }

    pub fn dispatch(
        &mut self,
        current_frame_time: Seconds,
        lanes: &Lanes,
        events: &EventStore,
        bpm: Bpm,
    ) -> Vec<Trigger> {
        let previous = self.previous_frame_time;
        self.previous_frame_time = current_frame_time;
        if current_frame_time <= previous {
            return Vec::new();
        }

        let mut crossed: Vec<&TimelineEvent> = events
            .iter()
            .filter(|event| {
                let event_time = tick_to_time(event.tick, bpm);
                previous < event_time && event_time <= current_frame_time
            })
            .collect();
        // Same-lane idle toggles must apply in chart order.
        crossed.sort_by_key(|event| (event.tick, event.id));

        let mut triggers = Vec::with_capacity(crossed.len());
        for event in crossed {
            let Some(lane) = lanes.get(event.lane_id) else {
                debug!(event_id = event.id, lane_id = event.lane_id, "skipping event on missing lane");
                continue;
            };
            let trigger = match lane.kind {
                LaneKind::Note => {
                    let Some(slot) = lanes.note_slot(lane.id) else {
                        continue;
                    };
                    Trigger::NoteHit {
                        lane_id: lane.id,
                        slot,
                    }
                }
                LaneKind::Vfx(effect) => match effect.category() {
                    EffectCategory::Burst => Trigger::Burst {
                        lane_id: lane.id,
                        effect,
                    },
                    EffectCategory::Idle => Trigger::IdleToggle {
                        lane_id: lane.id,
                        effect,
                    },
                },
            };
            triggers.push(trigger);
        }
        triggers
    }
}
