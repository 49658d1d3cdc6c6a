use crate::dispatcher::Trigger;
use lanechart_domain_chart::LaneSlot;
use lanechart_ports::types::LaneId;
use lanechart_ports::vfx::VfxEffect;
use std::collections::BTreeMap;
use std::f32::consts::TAU;
use std::time::{Duration, Instant};

pub const BURST_DURATION: Duration = Duration::from_millis(700);
pub const NOTE_EXPLOSION_DURATION: Duration = Duration::from_millis(1000);
pub const PARTICLES_PER_EXPLOSION: usize = 24;
/// Vertical position of the hit line, as a fraction of the preview height.
pub const HIT_LINE_Y: f32 = 0.8;

fn progress(started_at: Instant, now: Instant, duration: Duration) -> f32 {
    now.saturating_duration_since(started_at).as_secs_f32() / duration.as_secs_f32()
}

#[derive(Clone, Debug, PartialEq)]
pub struct BurstInstance {
    pub effect: VfxEffect,
    pub lane_id: Option<LaneId>,
    pub started_at: Instant,
    /// Layout variation in `[0, 1)`.
    pub seed: f32,
}

impl BurstInstance {
    pub fn progress(&self, now: Instant) -> f32 {
        progress(self.started_at, now, BURST_DURATION)
    }
}

/// Velocities are in preview pixels per 60 Hz frame; gravity is left to the renderer.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Particle {
    pub vx: f32,
    pub vy: f32,
    pub size: f32,
}

#[derive(Clone, Debug, PartialEq)]
pub struct NoteExplosion {
    pub lane_id: LaneId,
    /// Normalized origin: lane slot centre on the hit line.
    pub origin: (f32, f32),
    pub started_at: Instant,
    pub particles: Vec<Particle>,
}

impl NoteExplosion {
    pub fn progress(&self, now: Instant) -> f32 {
        progress(self.started_at, now, NOTE_EXPLOSION_DURATION)
    }
}

/// Live effect instances read by the renderer.
#[derive(Debug)]
pub struct VfxState {
    bursts: Vec<BurstInstance>,
    idle: BTreeMap<LaneId, VfxEffect>,
    explosions: Vec<NoteExplosion>,
    rng: fastrand::Rng,
}

impl Default for VfxState {
    fn default() -> Self {
        Self::new()
    }
}

impl VfxState {
    pub fn new() -> Self {
        Self::with_rng(fastrand::Rng::new())
    }

    pub fn with_seed(seed: u64) -> Self {
        Self::with_rng(fastrand::Rng::with_seed(seed))
    }

    fn with_rng(rng: fastrand::Rng) -> Self {
        Self {
            bursts: Vec::new(),
            idle: BTreeMap::new(),
            explosions: Vec::new(),
            rng,
        }
    }

    pub fn bursts(&self) -> &[BurstInstance] {
        &self.bursts
    }

    pub fn explosions(&self) -> &[NoteExplosion] {
        &self.explosions
    }

    pub fn idle_effect(&self, lane_id: LaneId) -> Option<VfxEffect> {
        self.idle.get(&lane_id).copied()
    }

    pub fn idle_loops(&self) -> impl Iterator<Item = (LaneId, VfxEffect)> + '_ {
        self.idle.iter().map(|(lane, effect)| (*lane, *effect))
    }

    pub fn is_empty(&self) -> bool {
        self.bursts.is_empty() && self.idle.is_empty() && self.explosions.is_empty()
    }

    pub fn apply(&mut self, trigger: Trigger, now: Instant) {
        match trigger {
            Trigger::NoteHit { lane_id, slot } => self.spawn_explosion(lane_id, slot, now),
            Trigger::Burst { lane_id, effect } => self.push_burst(effect, Some(lane_id), now),
            Trigger::IdleToggle { lane_id, effect } => self.toggle_idle(lane_id, effect),
        }
    }

    pub fn push_burst(&mut self, effect: VfxEffect, lane_id: Option<LaneId>, now: Instant) {
        self.bursts.push(BurstInstance {
            effect,
            lane_id,
            started_at: now,
            seed: self.rng.f32(),
        });
    }

    /// Same effect again switches the loop off; a different effect replaces it.
    pub fn toggle_idle(&mut self, lane_id: LaneId, effect: VfxEffect) {
        if self.idle.get(&lane_id) == Some(&effect) {
            self.idle.remove(&lane_id);
        } else {
            self.idle.insert(lane_id, effect);
        }
    }

    pub fn spawn_explosion(&mut self, lane_id: LaneId, slot: LaneSlot, now: Instant) {
        let particles = (0..PARTICLES_PER_EXPLOSION)
            .map(|_| {
                let angle = self.rng.f32() * TAU;
                let speed = 1.0 + self.rng.f32() * 3.0;
                Particle {
                    vx: angle.cos() * speed,
                    vy: angle.sin() * speed - 1.0,
                    size: 1.0 + self.rng.f32() * 4.0,
                }
            })
            .collect();
        self.explosions.push(NoteExplosion {
            lane_id,
            origin: (slot.center_x(), HIT_LINE_Y),
            started_at: now,
            particles,
        });
    }

    /// Drops instances whose progress reached 1.
    pub fn prune(&mut self, now: Instant) {
        self.bursts.retain(|burst| burst.progress(now) < 1.0);
        self.explosions.retain(|explosion| explosion.progress(now) < 1.0);
    }

    pub fn clear_lane(&mut self, lane_id: LaneId) {
        self.idle.remove(&lane_id);
    }

    pub fn clear(&mut self) {
        self.bursts.clear();
        self.idle.clear();
        self.explosions.clear();
    }
}
