use lanechart_domain_chart::{ChartError, Lane, LaneKind, LaneSlot, Lanes};
use lanechart_ports::{LaneKindTag, LaneSnapshot, VfxEffect};
use pretty_assertions::assert_eq;

#[test]
fn default_has_four_note_lanes() {
    let lanes = Lanes::default();
    let ids: Vec<_> = lanes.iter().map(|lane| lane.id).collect();
    assert_eq!(ids, vec![0, 1, 2, 3]);
    assert!(lanes.iter().all(Lane::is_note));
}

#[test]
fn added_lane_ids_are_never_reused() {
    let mut lanes = Lanes::default();
    assert_eq!(lanes.add(), Ok(4));
    lanes.remove(4);
    assert_eq!(lanes.add(), Ok(5));
}

#[test]
fn first_lane_in_empty_set_is_zero() {
    let mut lanes = Lanes::empty();
    assert_eq!(lanes.add(), Ok(0));
}

#[test]
fn kind_changes_in_place() {
    let mut lanes = Lanes::default();
    lanes.set_effect(2, VfxEffect::Heart2).expect("lane exists");
    assert_eq!(lanes.get(2).map(|lane| lane.kind), Some(LaneKind::Vfx(VfxEffect::Heart2)));
    assert_eq!(lanes.get(2).map(Lane::label), Some("heart2"));
    lanes.set_note(2).expect("lane exists");
    assert_eq!(lanes.get(2).map(Lane::label), Some("NOTE"));
    assert_eq!(lanes.set_note(9), Err(ChartError::LaneNotFound(9)));
}

#[test]
fn note_slots_skip_vfx_lanes() {
    let mut lanes = Lanes::default();
    lanes.set_effect(1, VfxEffect::Sparkle1).expect("lane exists");
    assert_eq!(lanes.note_slot(2), Some(LaneSlot { index: 1, count: 3 }));
    assert_eq!(lanes.note_slot(1), None);
    assert_eq!(LaneSlot { index: 1, count: 4 }.center_x(), 0.375);
}

#[test]
fn snapshot_import_skips_vfx_lanes_without_effect() {
    let snapshots = vec![
        LaneSnapshot { id: 0, kind: LaneKindTag::Note, effect: None },
        LaneSnapshot { id: 1, kind: LaneKindTag::Vfx, effect: None },
        LaneSnapshot { id: 5, kind: LaneKindTag::Vfx, effect: Some(VfxEffect::Flames1) },
    ];
    let mut lanes = Lanes::from_snapshots(&snapshots);
    assert_eq!(lanes.len(), 2);
    assert_eq!(lanes.add(), Ok(6));
    assert_eq!(lanes.to_snapshots()[1], snapshots[2]);
}

#[test]
fn snapshot_import_skips_lane_ids_without_successor() {
    let snapshots = vec![
        LaneSnapshot { id: 2, kind: LaneKindTag::Note, effect: None },
        LaneSnapshot { id: u32::MAX, kind: LaneKindTag::Note, effect: None },
    ];
    let mut lanes = Lanes::from_snapshots(&snapshots);
    let ids: Vec<_> = lanes.iter().map(|lane| lane.id).collect();
    assert_eq!(ids, vec![2]);
    assert_eq!(lanes.add(), Ok(3));
}

#[test]
fn adding_past_the_last_lane_id_fails() {
    let snapshots = vec![LaneSnapshot { id: u32::MAX - 1, kind: LaneKindTag::Note, effect: None }];
    let mut lanes = Lanes::from_snapshots(&snapshots);
    assert_eq!(lanes.add(), Err(ChartError::LaneIdsExhausted));
    assert_eq!(lanes.len(), 1);
}
