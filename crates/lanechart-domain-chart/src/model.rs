use lanechart_ports::project::{EventSnapshot, LaneKindTag, LaneSnapshot};
use lanechart_ports::types::{EventId, LaneId, Tick};
use lanechart_ports::vfx::VfxEffect;
use serde::{Deserialize, Serialize};

#[derive(thiserror::Error, Debug, PartialEq, Eq)]
pub enum ChartError {
    #[error("lane not found: {0}")]
    LaneNotFound(LaneId),
    #[error("vfx lane {0} has no effect assigned")]
    MissingEffect(LaneId),
    #[error("no lane ids left")]
    LaneIdsExhausted,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum LaneKind {
    Note,
    Vfx(VfxEffect),
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Lane {
    pub id: LaneId,
    pub kind: LaneKind,
}

impl Lane {
    pub fn note(id: LaneId) -> Self {
        Self {
            id,
            kind: LaneKind::Note,
        }
    }

    pub fn is_note(&self) -> bool {
        self.kind == LaneKind::Note
    }

    pub fn effect(&self) -> Option<VfxEffect> {
        match self.kind {
            LaneKind::Note => None,
            LaneKind::Vfx(effect) => Some(effect),
        }
    }

    /// Header label shown above the lane.
    pub fn label(&self) -> &'static str {
        match self.kind {
            LaneKind::Note => "NOTE",
            LaneKind::Vfx(effect) => effect.id(),
        }
    }
}

impl TryFrom<&LaneSnapshot> for Lane {
    type Error = ChartError;

    fn try_from(snapshot: &LaneSnapshot) -> Result<Self, Self::Error> {
        let kind = match (snapshot.kind, snapshot.effect) {
            (LaneKindTag::Note, _) => LaneKind::Note,
            (LaneKindTag::Vfx, Some(effect)) => LaneKind::Vfx(effect),
            (LaneKindTag::Vfx, None) => return Err(ChartError::MissingEffect(snapshot.id)),
        };
        Ok(Self {
            id: snapshot.id,
            kind,
        })
    }
}

impl From<&Lane> for LaneSnapshot {
    fn from(lane: &Lane) -> Self {
        match lane.kind {
            LaneKind::Note => LaneSnapshot {
                id: lane.id,
                kind: LaneKindTag::Note,
                effect: None,
            },
            LaneKind::Vfx(effect) => LaneSnapshot {
                id: lane.id,
                kind: LaneKindTag::Vfx,
                effect: Some(effect),
            },
        }
    }
}

/// A placed event. `lane_id` may dangle; readers skip events whose lane is gone.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct TimelineEvent {
    pub id: EventId,
    pub lane_id: LaneId,
    pub tick: Tick,
}

impl From<EventSnapshot> for TimelineEvent {
    fn from(snapshot: EventSnapshot) -> Self {
        Self {
            id: snapshot.id,
            lane_id: snapshot.lane_id,
            tick: snapshot.tick,
        }
    }
}

impl From<&TimelineEvent> for EventSnapshot {
    fn from(event: &TimelineEvent) -> Self {
        Self {
            id: event.id,
            lane_id: event.lane_id,
            tick: event.tick,
        }
    }
}
