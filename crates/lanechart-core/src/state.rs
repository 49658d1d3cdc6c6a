use crate::clock::PlaybackClock;
use crate::dispatcher::TriggerDispatcher;
use crate::vfx::VfxState;
use lanechart_domain_chart::{ChartError, EventStore, Lanes, TimelineEvent};
use lanechart_ports::project::{EventSnapshot, ProjectSnapshot, PROJECT_SCHEMA_VERSION};
use lanechart_ports::types::{Bpm, GridSnap, LaneId, TICKS_PER_BAR};
use tracing::{info, warn};

/// Everything the frame loop reads and mutates, owned by one controller.
#[derive(Debug)]
pub struct EngineState {
    pub lanes: Lanes,
    pub events: EventStore,
    pub clock: PlaybackClock,
    pub dispatcher: TriggerDispatcher,
    pub vfx: VfxState,
    pub bpm: Bpm,
    pub grid_snap: GridSnap,
}

impl EngineState {
    pub fn new(bpm: Bpm, grid_snap: GridSnap) -> Self {
        Self {
            lanes: Lanes::default(),
            events: EventStore::new(),
            clock: PlaybackClock::new(),
            dispatcher: TriggerDispatcher::new(),
            vfx: VfxState::new(),
            bpm,
            grid_snap,
        }
    }

    /// Removes the lane, its events and its idle loop.
    pub fn delete_lane(&mut self, lane_id: LaneId) -> Result<(), ChartError> {
        self.lanes
            .remove(lane_id)
            .ok_or(ChartError::LaneNotFound(lane_id))?;
        let removed = self.events.remove_lane(lane_id);
        self.vfx.clear_lane(lane_id);
        info!(lane_id, removed_events = removed, "lane deleted");
        Ok(())
    }

    pub fn snapshot(&self) -> ProjectSnapshot {
        ProjectSnapshot {
            lanes: self.lanes.to_snapshots(),
            events: self.events.iter().map(EventSnapshot::from).collect(),
            audio_offset: self.clock.audio_offset(),
            bpm: self.bpm,
            ticks_per_bar: TICKS_PER_BAR,
            version: PROJECT_SCHEMA_VERSION.to_string(),
        }
    }

    /// Swaps in lanes, events and bpm. Audio offset is applied by the caller through
    /// the clock, which needs the audio port.
    pub fn replace_chart(&mut self, snapshot: &ProjectSnapshot) {
        if snapshot.ticks_per_bar != TICKS_PER_BAR {
            warn!(
                ticks_per_bar = snapshot.ticks_per_bar,
                "project uses a different tick resolution, ticks are kept as-is"
            );
        }
        self.lanes = Lanes::from_snapshots(&snapshot.lanes);
        let events = snapshot
            .events
            .iter()
            .copied()
            .map(TimelineEvent::from)
            .collect();
        self.events.replace_all(events, None);
        self.bpm = snapshot.bpm;
        self.vfx.clear();
        info!(
            lanes = self.lanes.len(),
            events = self.events.len(),
            bpm = self.bpm.get(),
            "project replaced"
        );
    }
}
