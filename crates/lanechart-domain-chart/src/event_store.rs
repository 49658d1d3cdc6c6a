use crate::model::TimelineEvent;
use lanechart_ports::types::{EventId, LaneId, Tick};
use std::collections::HashSet;
use tracing::{debug, warn};

/// Insertion-ordered events, unique per `(lane_id, tick)`.
#[derive(Clone, Debug, Default)]
pub struct EventStore {
    events: Vec<TimelineEvent>,
    next_id: EventId,
}

impl EventStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.events.len()
    }

    pub fn is_empty(&self) -> bool {
        self.events.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &TimelineEvent> {
        self.events.iter()
    }

    pub fn next_id(&self) -> EventId {
        self.next_id
    }

    pub fn find(&self, lane_id: LaneId, tick: Tick) -> Option<&TimelineEvent> {
        self.events
            .iter()
            .find(|event| event.lane_id == lane_id && event.tick == tick)
    }

    pub fn on_lane(&self, lane_id: LaneId) -> impl Iterator<Item = &TimelineEvent> {
        self.events.iter().filter(move |event| event.lane_id == lane_id)
    }

    /// Returns the new event id, or `None` when the coordinate is already occupied.
    pub fn place(&mut self, lane_id: LaneId, tick: Tick) -> Option<EventId> {
        if tick < 0 {
            debug!(lane_id, tick, "ignoring placement before chart start");
            return None;
        }
        if self.find(lane_id, tick).is_some() {
            return None;
        }
        let id = self.next_id;
        let Some(next_id) = id.checked_add(1) else {
            warn!(lane_id, tick, "event ids exhausted, placement refused");
            return None;
        };
        self.next_id = next_id;
        self.events.push(TimelineEvent { id, lane_id, tick });
        debug!(lane_id, tick, event_id = id, "event placed");
        Some(id)
    }

    /// Returns how many events were removed (0 or 1).
    pub fn remove(&mut self, lane_id: LaneId, tick: Tick) -> usize {
        let before = self.events.len();
        self.events
            .retain(|event| !(event.lane_id == lane_id && event.tick == tick));
        before - self.events.len()
    }

    pub fn remove_lane(&mut self, lane_id: LaneId) -> usize {
        let before = self.events.len();
        self.events.retain(|event| event.lane_id != lane_id);
        before - self.events.len()
    }

    /// Bulk reset. Later duplicates of an occupied `(lane_id, tick)` are dropped, and
    /// the id counter continues past every imported id. An id with no successor is
    /// dropped too.
    pub fn replace_all(&mut self, events: Vec<TimelineEvent>, next_id_hint: Option<EventId>) {
        let mut seen = HashSet::with_capacity(events.len());
        let mut kept = Vec::with_capacity(events.len());
        for event in events {
            if event.tick < 0
                || event.id == EventId::MAX
                || !seen.insert((event.lane_id, event.tick))
            {
                warn!(
                    event_id = event.id,
                    lane_id = event.lane_id,
                    tick = event.tick,
                    "dropping invalid or duplicate imported event"
                );
                continue;
            }
            kept.push(event);
        }
        let after_max = kept
            .iter()
            .filter_map(|event| event.id.checked_add(1))
            .max()
            .unwrap_or(0);
        self.next_id = after_max.max(next_id_hint.unwrap_or(0));
        self.events = kept;
    }
}
