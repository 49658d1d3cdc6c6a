use lanechart_core::{Gesture, InteractionMode, InteractionRouter, ScrubSource};
use pretty_assertions::assert_eq;

#[test]
fn idle_admits_every_timeline_gesture() {
    let router = InteractionRouter::new();
    for gesture in [
        Gesture::Hover,
        Gesture::PlaceDrag,
        Gesture::EraseDrag,
        Gesture::Scrub(ScrubSource::Waveform),
        Gesture::Scrub(ScrubSource::Editor),
        Gesture::Wheel,
    ] {
        assert!(router.permits(gesture), "{gesture:?}");
    }
    assert!(!router.permits(Gesture::SpriteDrag));
}

#[test]
fn a_drag_excludes_other_drags_until_released() {
    let mut router = InteractionRouter::new();
    assert!(router.begin(Gesture::PlaceDrag));
    assert_eq!(router.mode(), InteractionMode::PlacingEvents);

    assert!(!router.begin(Gesture::EraseDrag));
    assert!(!router.begin(Gesture::Scrub(ScrubSource::Editor)));
    assert!(router.permits(Gesture::Wheel));
    assert_eq!(router.mode(), InteractionMode::PlacingEvents);

    router.end_drag();
    assert_eq!(router.mode(), InteractionMode::Idle);
    assert!(router.begin(Gesture::Scrub(ScrubSource::Waveform)));
    assert!(!router.permits(Gesture::Scrub(ScrubSource::Editor)));
}

#[test]
fn modals_block_timeline_input() {
    let mut router = InteractionRouter::new();
    router.open_lane_editor(2);
    assert_eq!(router.editing_lane(), Some(2));

    assert!(!router.begin(Gesture::PlaceDrag));
    assert!(!router.permits(Gesture::Wheel));
    assert!(router.permits(Gesture::Hover));

    // Releasing the pointer leaves the modal open.
    router.end_drag();
    assert_eq!(router.mode(), InteractionMode::EditingLane { lane_id: 2 });

    router.close_modal();
    assert_eq!(router.mode(), InteractionMode::Idle);
}

#[test]
fn sprite_drags_only_inside_the_sprite_editor() {
    let mut router = InteractionRouter::new();
    router.open_sprite_editor();
    assert!(router.begin(Gesture::SpriteDrag));
    assert_eq!(router.mode(), InteractionMode::EditingSprite);
    assert!(!router.permits(Gesture::Scrub(ScrubSource::Waveform)));

    router.close_modal();
    assert!(!router.permits(Gesture::SpriteDrag));
}
