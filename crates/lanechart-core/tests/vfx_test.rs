use lanechart_core::{
    Trigger, VfxState, BURST_DURATION, HIT_LINE_Y, NOTE_EXPLOSION_DURATION,
    PARTICLES_PER_EXPLOSION,
};
use lanechart_domain_chart::LaneSlot;
use lanechart_ports::vfx::VfxEffect;
use pretty_assertions::assert_eq;
use std::time::{Duration, Instant};

#[test]
fn idle_toggle_latches_and_releases() {
    let mut vfx = VfxState::with_seed(7);
    let now = Instant::now();
    let toggle = Trigger::IdleToggle {
        lane_id: 4,
        effect: VfxEffect::Sparkle2,
    };

    vfx.apply(toggle, now);
    assert_eq!(vfx.idle_effect(4), Some(VfxEffect::Sparkle2));

    vfx.apply(toggle, now);
    assert_eq!(vfx.idle_effect(4), None);
    assert!(vfx.is_empty());
}

#[test]
fn idle_toggle_with_other_effect_replaces_loop() {
    let mut vfx = VfxState::with_seed(7);
    vfx.toggle_idle(1, VfxEffect::Flames1);
    vfx.toggle_idle(1, VfxEffect::Confetti3);
    assert_eq!(
        vfx.idle_loops().collect::<Vec<_>>(),
        vec![(1, VfxEffect::Confetti3)]
    );
}

#[test]
fn bursts_expire_after_their_duration() {
    let mut vfx = VfxState::with_seed(1);
    let start = Instant::now();
    vfx.apply(
        Trigger::Burst {
            lane_id: 2,
            effect: VfxEffect::WipeUp,
        },
        start,
    );
    vfx.push_burst(VfxEffect::Light1, None, start + Duration::from_millis(400));

    vfx.prune(start + Duration::from_millis(350));
    assert_eq!(vfx.bursts().len(), 2);
    let halfway = vfx.bursts()[0].progress(start + Duration::from_millis(350));
    assert!((halfway - 0.5).abs() < 1e-6);

    vfx.prune(start + BURST_DURATION);
    assert_eq!(vfx.bursts().len(), 1);
    assert_eq!(vfx.bursts()[0].effect, VfxEffect::Light1);
    assert!((0.0..1.0).contains(&vfx.bursts()[0].seed));
}

#[test]
fn note_hit_spawns_explosion_on_the_hit_line() {
    let mut vfx = VfxState::with_seed(3);
    let now = Instant::now();
    vfx.apply(
        Trigger::NoteHit {
            lane_id: 0,
            slot: LaneSlot { index: 1, count: 4 },
        },
        now,
    );

    let explosion = &vfx.explosions()[0];
    assert_eq!(explosion.origin, (0.375, HIT_LINE_Y));
    assert_eq!(explosion.particles.len(), PARTICLES_PER_EXPLOSION);

    vfx.prune(now + NOTE_EXPLOSION_DURATION);
    assert!(vfx.explosions().is_empty());
}

#[test]
fn clear_drops_everything() {
    let mut vfx = VfxState::with_seed(9);
    let now = Instant::now();
    vfx.push_burst(VfxEffect::Heart1, Some(0), now);
    vfx.toggle_idle(1, VfxEffect::Sparkle1);
    vfx.spawn_explosion(2, LaneSlot { index: 0, count: 1 }, now);

    vfx.clear_lane(1);
    assert_eq!(vfx.idle_effect(1), None);
    assert!(!vfx.is_empty());

    vfx.clear();
    assert!(vfx.is_empty());
}
