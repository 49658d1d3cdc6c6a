use crate::event_store::EventStore;
use lanechart_ports::types::{EventId, LaneId, Tick, HOLD_GAP_THRESHOLD};

/// A run of same-lane events whose neighbouring ticks are at most the hold gap apart.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Segment {
    pub lane_id: LaneId,
    pub start_tick: Tick,
    pub end_tick: Tick,
    pub event_ids: Vec<EventId>,
}

impl Segment {
    fn open(lane_id: LaneId, tick: Tick, id: EventId) -> Self {
        Self {
            lane_id,
            start_tick: tick,
            end_tick: tick,
            event_ids: vec![id],
        }
    }

    pub fn is_long(&self) -> bool {
        self.event_ids.len() > 1
    }

    pub fn contains_tick(&self, tick: Tick) -> bool {
        tick >= self.start_tick && tick <= self.end_tick
    }
}

pub fn build_segments(lane_id: LaneId, store: &EventStore) -> Vec<Segment> {
    build_segments_with_gap(lane_id, store, HOLD_GAP_THRESHOLD)
}

/// Recomputed from scratch on every call; the gap comparison is inclusive.
pub fn build_segments_with_gap(lane_id: LaneId, store: &EventStore, gap: Tick) -> Vec<Segment> {
    let mut lane_events: Vec<_> = store.on_lane(lane_id).collect();
    // Ties cannot occur (one event per tick), id keeps the order total anyway.
    lane_events.sort_by_key(|event| (event.tick, event.id));

    let mut iter = lane_events.into_iter();
    let Some(first) = iter.next() else {
        return Vec::new();
    };

    let mut segments = Vec::new();
    let mut current = Segment::open(lane_id, first.tick, first.id);
    for event in iter {
        if event.tick - current.end_tick <= gap {
            current.end_tick = event.tick;
            current.event_ids.push(event.id);
        } else {
            let next = Segment::open(lane_id, event.tick, event.id);
            segments.push(std::mem::replace(&mut current, next));
        }
    }
    segments.push(current);
    segments
}

/// Whether `tick` falls inside a long segment on the lane.
pub fn is_part_of_long_segment(segments: &[Segment], tick: Tick) -> bool {
    segments
        .iter()
        .find(|segment| segment.contains_tick(tick))
        .is_some_and(Segment::is_long)
}
