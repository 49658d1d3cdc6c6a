use lanechart_domain_chart::{build_segments, is_part_of_long_segment, EventStore};
use pretty_assertions::assert_eq;

fn store_with(lane_id: u32, ticks: &[i64]) -> EventStore {
    let mut store = EventStore::new();
    for &tick in ticks {
        store.place(lane_id, tick);
    }
    store
}

#[test]
fn gap_equal_to_threshold_merges() {
    let segments = build_segments(0, &store_with(0, &[0, 3]));
    assert_eq!(segments.len(), 1);
    assert!(segments[0].is_long());
    assert_eq!((segments[0].start_tick, segments[0].end_tick), (0, 3));
}

#[test]
fn gap_above_threshold_splits() {
    let segments = build_segments(0, &store_with(0, &[0, 4]));
    assert_eq!(segments.len(), 2);
    assert!(segments.iter().all(|segment| !segment.is_long()));
}

#[test]
fn empty_lane_has_no_segments() {
    assert!(build_segments(0, &EventStore::new()).is_empty());
    assert!(build_segments(5, &store_with(0, &[0, 1])).is_empty());
}

#[test]
fn segments_follow_tick_order_not_insertion_order() {
    let mut store = store_with(1, &[30, 3, 0, 6, 27]);
    store.place(2, 4);
    let segments = build_segments(1, &store);

    let spans: Vec<_> = segments
        .iter()
        .map(|segment| (segment.start_tick, segment.end_tick, segment.event_ids.clone()))
        .collect();
    assert_eq!(spans, vec![(0, 6, vec![2, 1, 3]), (27, 30, vec![4, 0])]);
}

#[test]
fn building_is_deterministic() {
    let store = store_with(0, &[12, 0, 2, 48, 50, 100]);
    assert_eq!(build_segments(0, &store), build_segments(0, &store));
}

#[test]
fn long_membership_lookup() {
    let segments = build_segments(0, &store_with(0, &[0, 3, 24]));
    assert!(is_part_of_long_segment(&segments, 0));
    assert!(is_part_of_long_segment(&segments, 2));
    assert!(!is_part_of_long_segment(&segments, 24));
    assert!(!is_part_of_long_segment(&segments, 12));
}
