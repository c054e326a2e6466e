//! Explosion and tank-destruction animations
//!
//! Effects are purely cosmetic and purely time-based: each one is Active from
//! spawn until its duration elapses, then Complete. Damage has already been
//! applied by the time an effect spawns.
//!
//! Every tick builds new effect collections (completed ones dropped) instead
//! of editing the old ones in place.

use std::collections::BTreeSet;

use glam::Vec2;
use serde::{Deserialize, Serialize};

use super::state::TankId;
use super::weapon::WeaponKind;

/// Stable id for an effect instance
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct EffectId(pub u32);

/// Lifecycle of a timed effect
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum EffectPhase {
    Active,
    Complete,
}

/// Shared shape of explosions and destructions
pub trait TimedEffect: Clone {
    fn id(&self) -> EffectId;
    fn spawn_time(&self) -> f32;
    fn duration(&self) -> f32;

    /// Next cosmetic state; never touches gameplay
    fn update(&self, now: f32, dt: f32) -> Self;

    fn age(&self, now: f32) -> f32 {
        (now - self.spawn_time()).max(0.0)
    }

    /// 0..=1 through the animation
    fn progress(&self, now: f32) -> f32 {
        if self.duration() <= 0.0 {
            return 1.0;
        }
        (self.age(now) / self.duration()).clamp(0.0, 1.0)
    }

    fn is_complete(&self, now: f32) -> bool {
        self.age(now) >= self.duration()
    }

    fn phase(&self, now: f32) -> EffectPhase {
        if self.is_complete(now) {
            EffectPhase::Complete
        } else {
            EffectPhase::Active
        }
    }
}

/// A blast animation at an impact point
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExplosionState {
    pub id: EffectId,
    pub origin: Vec2,
    pub weapon: WeaponKind,
    pub blast_radius: f32,
    pub spawn_time: f32,
    pub duration: f32,
    pub active: bool,
    /// Animation progress 0..=1
    pub progress: f32,
    /// Current drawn radius (fast expansion, then hold)
    pub radius_now: f32,
}

impl TimedEffect for ExplosionState {
    fn id(&self) -> EffectId {
        self.id
    }

    fn spawn_time(&self) -> f32 {
        self.spawn_time
    }

    fn duration(&self) -> f32 {
        self.duration
    }

    fn update(&self, now: f32, _dt: f32) -> Self {
        let progress = self.progress(now);
        // Ease-out: reach full size in the first ~third
        let grow = (progress * 3.0).min(1.0);
        let eased = 1.0 - (1.0 - grow) * (1.0 - grow);
        Self {
            progress,
            radius_now: self.blast_radius * eased,
            active: !self.is_complete(now),
            ..self.clone()
        }
    }
}

/// A debris fragment thrown by a dying tank
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Fragment {
    pub offset: Vec2,
    pub velocity: Vec2,
}

const FRAGMENT_COUNT: usize = 6;
const FRAGMENT_GRAVITY: f32 = 220.0;

/// The wreck sequence for a destroyed tank
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DestructionState {
    pub id: EffectId,
    pub tank: TankId,
    pub position: Vec2,
    pub spawn_time: f32,
    pub duration: f32,
    pub active: bool,
    pub progress: f32,
    pub fragments: Vec<Fragment>,
}

impl DestructionState {
    fn fragments() -> Vec<Fragment> {
        use std::f32::consts::PI;
        (0..FRAGMENT_COUNT)
            .map(|i| {
                // Fan upward between 20° and 160°
                let t = i as f32 / (FRAGMENT_COUNT - 1) as f32;
                let angle = PI * (0.11 + 0.78 * t);
                let speed = 90.0 + 25.0 * (i % 3) as f32;
                Fragment {
                    offset: Vec2::ZERO,
                    velocity: Vec2::new(angle.cos(), angle.sin()) * speed,
                }
            })
            .collect()
    }
}

impl TimedEffect for DestructionState {
    fn id(&self) -> EffectId {
        self.id
    }

    fn spawn_time(&self) -> f32 {
        self.spawn_time
    }

    fn duration(&self) -> f32 {
        self.duration
    }

    fn update(&self, now: f32, dt: f32) -> Self {
        let fragments = self
            .fragments
            .iter()
            .map(|f| {
                let velocity = f.velocity - Vec2::Y * FRAGMENT_GRAVITY * dt;
                Fragment {
                    offset: f.offset + velocity * dt,
                    velocity,
                }
            })
            .collect();
        Self {
            progress: self.progress(now),
            active: !self.is_complete(now),
            fragments,
            ..self.clone()
        }
    }
}

/// Ordered set of live effects of one kind
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EffectArena<T> {
    items: Vec<T>,
}

impl<T> Default for EffectArena<T> {
    fn default() -> Self {
        Self { items: Vec::new() }
    }
}

impl<T: TimedEffect> EffectArena<T> {
    pub fn spawn(&mut self, effect: T) {
        self.items.push(effect);
    }

    /// The next generation: completed effects dropped, the rest updated.
    /// Also returns the ids that completed.
    pub fn advanced(&self, now: f32, dt: f32) -> (Self, Vec<EffectId>) {
        let mut completed = Vec::new();
        let items = self
            .items
            .iter()
            .filter_map(|e| {
                if e.is_complete(now) {
                    completed.push(e.id());
                    None
                } else {
                    Some(e.update(now, dt))
                }
            })
            .collect();
        (Self { items }, completed)
    }

    pub fn iter(&self) -> impl Iterator<Item = &T> {
        self.items.iter()
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }
}

/// What finished during an `EffectAnimator::update`
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Completed {
    pub explosions: Vec<EffectId>,
    pub destructions: Vec<EffectId>,
}

/// Owns all visual effects for the match
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct EffectAnimator {
    explosions: EffectArena<ExplosionState>,
    destructions: EffectArena<DestructionState>,
    /// Tanks that already got their destruction sequence this match
    wrecked: BTreeSet<TankId>,
    next_id: u32,
    explosion_duration: f32,
    destruction_duration: f32,
}

impl EffectAnimator {
    pub fn new(explosion_duration: f32, destruction_duration: f32) -> Self {
        Self {
            explosion_duration,
            destruction_duration,
            ..Self::default()
        }
    }

    fn next_effect_id(&mut self) -> EffectId {
        let id = EffectId(self.next_id);
        self.next_id += 1;
        id
    }

    pub fn spawn_explosion(
        &mut self,
        origin: Vec2,
        weapon: WeaponKind,
        blast_radius: f32,
        now: f32,
    ) -> EffectId {
        let id = self.next_effect_id();
        self.explosions.spawn(ExplosionState {
            id,
            origin,
            weapon,
            blast_radius,
            spawn_time: now,
            duration: self.explosion_duration,
            active: true,
            progress: 0.0,
            radius_now: 0.0,
        });
        id
    }

    /// Start the wreck sequence for `tank`; `None` if it already had one
    pub fn spawn_destruction(&mut self, tank: TankId, position: Vec2, now: f32) -> Option<EffectId> {
        if !self.wrecked.insert(tank) {
            log::warn!("Ignoring second destruction for {:?}", tank);
            return None;
        }
        let id = self.next_effect_id();
        self.destructions.spawn(DestructionState {
            id,
            tank,
            position,
            spawn_time: now,
            duration: self.destruction_duration,
            active: true,
            progress: 0.0,
            fragments: DestructionState::fragments(),
        });
        Some(id)
    }

    /// Advance every effect, replacing both collections
    pub fn update(&mut self, now: f32, dt: f32) -> Completed {
        let (explosions, done_explosions) = self.explosions.advanced(now, dt);
        let (destructions, done_destructions) = self.destructions.advanced(now, dt);
        self.explosions = explosions;
        self.destructions = destructions;
        Completed {
            explosions: done_explosions,
            destructions: done_destructions,
        }
    }

    /// Nothing left to animate
    pub fn is_idle(&self) -> bool {
        self.explosions.is_empty() && self.destructions.is_empty()
    }

    pub fn explosions(&self) -> &EffectArena<ExplosionState> {
        &self.explosions
    }

    pub fn destructions(&self) -> &EffectArena<DestructionState> {
        &self.destructions
    }

    pub fn has_wreck(&self, tank: TankId) -> bool {
        self.wrecked.contains(&tank)
    }

    /// Drop in-flight animations between rounds (the wreck ledger persists)
    pub fn clear_round(&mut self) {
        self.explosions = EffectArena::default();
        self.destructions = EffectArena::default();
    }
}
