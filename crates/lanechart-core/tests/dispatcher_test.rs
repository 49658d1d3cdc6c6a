use lanechart_core::{Trigger, TriggerDispatcher};
use lanechart_domain_chart::{EventStore, LaneSlot, Lanes};
use lanechart_ports::types::Bpm;
use lanechart_ports::vfx::VfxEffect;
use pretty_assertions::assert_eq;

// 120 bpm: 48 ticks per second.
fn bpm() -> Bpm {
    Bpm::new(120.0)
}

#[test]
fn event_fires_once_across_consecutive_frames() {
    let lanes = Lanes::default();
    let mut events = EventStore::new();
    events.place(0, 48);
    let mut dispatcher = TriggerDispatcher::new();

    assert!(dispatcher.dispatch(0.5, &lanes, &events, bpm()).is_empty());
    let fired = dispatcher.dispatch(1.0, &lanes, &events, bpm());
    assert_eq!(
        fired,
        vec![Trigger::NoteHit {
            lane_id: 0,
            slot: LaneSlot { index: 0, count: 4 },
        }]
    );
    assert!(dispatcher.dispatch(1.0, &lanes, &events, bpm()).is_empty());
    assert!(dispatcher.dispatch(1.5, &lanes, &events, bpm()).is_empty());
}

#[test]
fn event_on_previous_frame_time_does_not_fire() {
    let lanes = Lanes::default();
    let mut events = EventStore::new();
    events.place(1, 48);
    let mut dispatcher = TriggerDispatcher::new();
    dispatcher.rebase(1.0);

    assert!(dispatcher.dispatch(1.2, &lanes, &events, bpm()).is_empty());
}

#[test]
fn backward_jump_fires_nothing() {
    let lanes = Lanes::default();
    let mut events = EventStore::new();
    events.place(0, 24);
    let mut dispatcher = TriggerDispatcher::new();
    dispatcher.rebase(2.0);

    assert!(dispatcher.dispatch(0.1, &lanes, &events, bpm()).is_empty());
    assert_eq!(dispatcher.previous_frame_time(), 0.1);
}

#[test]
fn observe_moves_the_window_without_firing() {
    let lanes = Lanes::default();
    let mut events = EventStore::new();
    events.place(0, 48);
    let mut dispatcher = TriggerDispatcher::new();

    dispatcher.observe(3.0);
    assert!(dispatcher.dispatch(3.5, &lanes, &events, bpm()).is_empty());
}

#[test]
fn lane_kind_selects_the_trigger() {
    let mut lanes = Lanes::default();
    lanes.set_effect(1, VfxEffect::Explode2).unwrap();
    lanes.set_effect(2, VfxEffect::Flames1).unwrap();
    let mut events = EventStore::new();
    events.place(2, 12);
    events.place(1, 6);
    events.place(3, 18);
    let mut dispatcher = TriggerDispatcher::new();

    let fired = dispatcher.dispatch(1.0, &lanes, &events, bpm());

    assert_eq!(
        fired,
        vec![
            Trigger::Burst {
                lane_id: 1,
                effect: VfxEffect::Explode2,
            },
            Trigger::IdleToggle {
                lane_id: 2,
                effect: VfxEffect::Flames1,
            },
            // Lane 3 is the second of the two remaining note lanes.
            Trigger::NoteHit {
                lane_id: 3,
                slot: LaneSlot { index: 1, count: 2 },
            },
        ]
    );
}

#[test]
fn events_on_missing_lanes_are_skipped() {
    let mut lanes = Lanes::default();
    let mut events = EventStore::new();
    events.place(2, 12);
    events.place(0, 24);
    lanes.remove(2);
    let mut dispatcher = TriggerDispatcher::new();

    let fired = dispatcher.dispatch(1.0, &lanes, &events, bpm());

    assert_eq!(fired.len(), 1);
    assert!(matches!(fired[0], Trigger::NoteHit { lane_id: 0, .. }));
}

#[test]
fn bpm_change_moves_event_times() {
    let lanes = Lanes::default();
    let mut events = EventStore::new();
    events.place(0, 96);
    let mut dispatcher = TriggerDispatcher::new();

    // One bar is 2s at 120 bpm and 1s at 240 bpm.
    assert!(dispatcher.dispatch(1.5, &lanes, &events, bpm()).is_empty());
    dispatcher.rebase(0.0);
    assert_eq!(
        dispatcher
            .dispatch(1.5, &lanes, &events, Bpm::new(240.0))
            .len(),
        1
    );
}
