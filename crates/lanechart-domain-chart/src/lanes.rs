use crate::model::{ChartError, Lane, LaneKind};
use lanechart_ports::project::LaneSnapshot;
use lanechart_ports::types::LaneId;
use lanechart_ports::vfx::VfxEffect;
use tracing::warn;

pub const DEFAULT_LANE_COUNT: u32 = 4;

/// Where a note lane sits among the note lanes, left to right.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct LaneSlot {
    pub index: usize,
    pub count: usize,
}

impl LaneSlot {
    /// Horizontal centre in `[0, 1]`.
    pub fn center_x(self) -> f32 {
        (self.index as f32 + 0.5) / self.count as f32
    }
}

/// Ordered lane list. Ids grow monotonically and are not handed out twice per session.
#[derive(Clone, Debug)]
pub struct Lanes {
    lanes: Vec<Lane>,
    next_id: LaneId,
}

impl Default for Lanes {
    fn default() -> Self {
        let lanes = (0..DEFAULT_LANE_COUNT).map(Lane::note).collect();
        Self {
            lanes,
            next_id: DEFAULT_LANE_COUNT,
        }
    }
}

impl Lanes {
    pub fn empty() -> Self {
        Self {
            lanes: Vec::new(),
            next_id: 0,
        }
    }

    /// Builds from an imported snapshot. Vfx lanes without an effect are dropped;
    /// their events become dangling and are filtered by readers.
    pub fn from_snapshots(snapshots: &[LaneSnapshot]) -> Self {
        let mut lanes = Vec::with_capacity(snapshots.len());
        for snapshot in snapshots {
            match Lane::try_from(snapshot) {
                Ok(lane) if lane.id == LaneId::MAX => {
                    warn!(lane_id = lane.id, "lane id out of range, skipping lane");
                }
                Ok(lane) if lanes.iter().any(|l: &Lane| l.id == lane.id) => {
                    warn!(lane_id = lane.id, "duplicate lane id in project, keeping first");
                }
                Ok(lane) => lanes.push(lane),
                Err(err) => warn!(lane_id = snapshot.id, error = %err, "skipping lane"),
            }
        }
        let next_id = lanes
            .iter()
            .filter_map(|l| l.id.checked_add(1))
            .max()
            .unwrap_or(0);
        Self { lanes, next_id }
    }

    pub fn to_snapshots(&self) -> Vec<LaneSnapshot> {
        self.lanes.iter().map(LaneSnapshot::from).collect()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Lane> {
        self.lanes.iter()
    }

    pub fn len(&self) -> usize {
        self.lanes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.lanes.is_empty()
    }

    pub fn get(&self, id: LaneId) -> Option<&Lane> {
        self.lanes.iter().find(|lane| lane.id == id)
    }

    pub fn at_index(&self, index: usize) -> Option<&Lane> {
        self.lanes.get(index)
    }

    pub fn add(&mut self) -> Result<LaneId, ChartError> {
        let max_next = self
            .lanes
            .iter()
            .filter_map(|l| l.id.checked_add(1))
            .max()
            .unwrap_or(0);
        let id = self.next_id.max(max_next);
        self.next_id = id.checked_add(1).ok_or(ChartError::LaneIdsExhausted)?;
        self.lanes.push(Lane::note(id));
        Ok(id)
    }

    pub fn set_kind(&mut self, id: LaneId, kind: LaneKind) -> Result<(), ChartError> {
        let lane = self
            .lanes
            .iter_mut()
            .find(|lane| lane.id == id)
            .ok_or(ChartError::LaneNotFound(id))?;
        lane.kind = kind;
        Ok(())
    }

    pub fn set_note(&mut self, id: LaneId) -> Result<(), ChartError> {
        self.set_kind(id, LaneKind::Note)
    }

    pub fn set_effect(&mut self, id: LaneId, effect: VfxEffect) -> Result<(), ChartError> {
        self.set_kind(id, LaneKind::Vfx(effect))
    }

    pub fn remove(&mut self, id: LaneId) -> Option<Lane> {
        let index = self.lanes.iter().position(|lane| lane.id == id)?;
        Some(self.lanes.remove(index))
    }

    pub fn note_lanes(&self) -> impl Iterator<Item = &Lane> {
        self.lanes.iter().filter(|lane| lane.is_note())
    }

    pub fn note_slot(&self, id: LaneId) -> Option<LaneSlot> {
        let count = self.note_lanes().count();
        self.note_lanes()
            .position(|lane| lane.id == id)
            .map(|index| LaneSlot { index, count })
    }
}
