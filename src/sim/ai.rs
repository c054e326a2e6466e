//! AI shot planning
//!
//! Every AI tank runs the same procedure, parameterized by its tier:
//! 1. pick the nearest living enemy
//! 2. solve for an aim that would land on it (searching power per elevation)
//! 3. pick a weapon suited to the engagement
//! 4. blur the aim by the tier's error and attach a thinking delay
//!
//! Randomness only enters through the caller's seeded RNG.

use std::cmp::Ordering;

use rand::Rng;
use rand_pcg::Pcg32;
use serde::{Deserialize, Serialize};

use super::projectile::{Ballistics, predict_landing};
use super::state::{Aim, TankId, TankState};
use super::terrain::Terrain;
use super::weapon::WeaponKind;
use crate::consts::*;
use crate::inventory::WeaponInventory;

/// Flight time considered when searching for an aim
const AIM_SEARCH_MAX_FLIGHT: f32 = 20.0;
/// Bisection steps on power per candidate elevation
const POWER_SEARCH_STEPS: u32 = 20;
/// Misses under this (world units) end the elevation search early
const GOOD_ENOUGH_MISS: f32 = 2.0;
/// Elevations tried, in preference order (degrees above the horizon)
const CANDIDATE_ELEVATIONS: [f32; 6] = [45.0, 60.0, 35.0, 70.0, 25.0, 80.0];
/// Enemies this close to the target make a cluster shell worthwhile
const CLUSTER_GROUP_RADIUS: f32 = 120.0;
/// Targets further than this (horizontally) justify a homing missile
const HOMING_MIN_DISTANCE: f32 = 350.0;
/// Random extra latency on top of the tier's thinking time
const THINKING_JITTER_MS: u32 = 250;

/// AI skill ladder, weakest first
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default, Serialize, Deserialize,
)]
pub enum DifficultyTier {
    Novice,
    Apprentice,
    #[default]
    Veteran,
    Elite,
    Expert,
}

/// Rank badge drawn next to an AI tank
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
pub struct Insignia {
    pub chevrons: u8,
    pub stars: u8,
}

/// Maximum aim perturbation for a tier
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AimError {
    /// Degrees either side of the solved angle
    pub angle: f32,
    /// Power points either side of the solved power
    pub power: f32,
}

impl DifficultyTier {
    pub const LADDER: [DifficultyTier; 5] = [
        DifficultyTier::Novice,
        DifficultyTier::Apprentice,
        DifficultyTier::Veteran,
        DifficultyTier::Elite,
        DifficultyTier::Expert,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            DifficultyTier::Novice => "Novice",
            DifficultyTier::Apprentice => "Apprentice",
            DifficultyTier::Veteran => "Veteran",
            DifficultyTier::Elite => "Elite",
            DifficultyTier::Expert => "Expert",
        }
    }

    /// Position on the ladder (0 = weakest)
    pub fn index(&self) -> usize {
        *self as usize
    }

    /// One step up the ladder, saturating at the top
    pub fn next(&self) -> Self {
        Self::LADDER
            .get(self.index() + 1)
            .copied()
            .unwrap_or(DifficultyTier::Expert)
    }

    /// Three chevrons, then stars
    pub fn insignia(&self) -> Insignia {
        let rank = self.index() as u8 + 1;
        Insignia {
            chevrons: rank.min(3),
            stars: rank.saturating_sub(3),
        }
    }

    pub fn aim_error(&self) -> AimError {
        let (angle, power) = match self {
            DifficultyTier::Novice => (10.0, 12.0),
            DifficultyTier::Apprentice => (7.0, 8.0),
            DifficultyTier::Veteran => (4.5, 5.0),
            DifficultyTier::Elite => (2.5, 2.5),
            DifficultyTier::Expert => (1.0, 1.0),
        };
        AimError { angle, power }
    }

    /// Base decision latency before jitter
    pub fn thinking_time_ms(&self) -> u32 {
        match self {
            DifficultyTier::Novice => 2400,
            DifficultyTier::Apprentice => 1900,
            DifficultyTier::Veteran => 1500,
            DifficultyTier::Elite => 1100,
            DifficultyTier::Expert => 800,
        }
    }

    /// Chance of even considering a special munition
    pub fn special_weapon_chance(&self) -> f32 {
        match self {
            DifficultyTier::Novice => 0.0,
            DifficultyTier::Apprentice => 0.2,
            DifficultyTier::Veteran => 0.45,
            DifficultyTier::Elite => 0.7,
            DifficultyTier::Expert => 0.9,
        }
    }

    /// Starting ammo for an AI tank of this tier
    pub fn loadout(&self) -> WeaponInventory {
        let mut inv = WeaponInventory::unlimited_base();
        let extra = match self {
            DifficultyTier::Novice => return inv,
            DifficultyTier::Apprentice => 0,
            DifficultyTier::Veteran => 1,
            DifficultyTier::Elite => 2,
            DifficultyTier::Expert => 3,
        };
        inv.add(WeaponKind::HeavyShell, 1 + extra);
        if extra >= 1 {
            inv.add(WeaponKind::Cluster, extra);
            inv.add(WeaponKind::Bouncer, extra);
        }
        if extra >= 2 {
            inv.add(WeaponKind::Emp, extra - 1);
            inv.add(WeaponKind::Homing, extra - 1);
            inv.add(WeaponKind::Concussion, extra - 1);
        }
        inv
    }
}

/// Free-function form of [`DifficultyTier::next`]
pub fn next_tier(tier: DifficultyTier) -> DifficultyTier {
    tier.next()
}

/// A solved-and-blurred aim plus its decision latency
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PlannedAim {
    pub aim: Aim,
    pub thinking_time_ms: u32,
}

/// Everything an AI tank commits to for one round
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ShotPlan {
    pub target: TankId,
    pub aim: Aim,
    pub weapon: WeaponKind,
    pub thinking_time_ms: u32,
}

fn compare_f32(a: f32, b: f32) -> Ordering {
    a.partial_cmp(&b).unwrap_or(Ordering::Equal)
}

/// Nearest living enemy; ties go to the weaker tank, then the lower id
pub fn select_target(shooter: &TankState, tanks: &[TankState]) -> Option<TankId> {
    let origin = shooter.body_center();
    tanks
        .iter()
        .filter(|t| t.is_alive() && t.id != shooter.id)
        .min_by(|a, b| {
            compare_f32(
                a.body_center().distance(origin),
                b.body_center().distance(origin),
            )
            .then_with(|| compare_f32(a.health, b.health))
            .then_with(|| a.id.cmp(&b.id))
        })
        .map(|t| t.id)
}

/// Signed miss along the firing direction (positive = long)
fn miss_for(
    shooter: &TankState,
    aim: Aim,
    target_x: f32,
    facing: f32,
    ballistics: &Ballistics,
    terrain: &Terrain,
) -> f32 {
    let origin = shooter.muzzle(aim);
    let velocity = ballistics.launch_velocity(aim);
    match predict_landing(origin, velocity, ballistics, terrain, AIM_SEARCH_MAX_FLIGHT) {
        Some(hit) => (hit.x - target_x) * facing,
        // Still climbing off the top of the map: treat as long
        None => f32::MAX,
    }
}

/// Best aim at `target_x` ignoring skill error.
///
/// For each candidate elevation, bisects power on the signed miss, then keeps
/// the elevation with the smallest miss.
pub fn solve_aim(
    shooter: &TankState,
    target_x: f32,
    ballistics: &Ballistics,
    terrain: &Terrain,
) -> Aim {
    let facing = if target_x >= shooter.pos.x { 1.0 } else { -1.0 };
    let mut best: Option<(Aim, f32)> = None;

    for elevation in CANDIDATE_ELEVATIONS {
        let angle = if facing > 0.0 {
            elevation
        } else {
            MAX_ANGLE - elevation
        };

        let (mut lo, mut hi) = (MIN_POWER, MAX_POWER);
        for _ in 0..POWER_SEARCH_STEPS {
            let mid = 0.5 * (lo + hi);
            let miss = miss_for(shooter, Aim::new(angle, mid), target_x, facing, ballistics, terrain);
            if miss > 0.0 {
                hi = mid;
            } else {
                lo = mid;
            }
        }
        let aim = Aim::new(angle, 0.5 * (lo + hi));
        let miss = miss_for(shooter, aim, target_x, facing, ballistics, terrain).abs();

        if best.is_none_or(|(_, m)| miss < m) {
            best = Some((aim, miss));
        }
        if miss < GOOD_ENOUGH_MISS {
            break;
        }
    }

    best.map(|(aim, _)| aim)
        .unwrap_or_else(|| Aim::new(if facing > 0.0 { 45.0 } else { 135.0 }, 50.0))
}

/// Blur a solved aim by the tier's error envelope
pub fn perturb_aim(ideal: Aim, tier: DifficultyTier, rng: &mut Pcg32) -> Aim {
    let err = tier.aim_error();
    Aim::new(
        ideal.angle + rng.random_range(-err.angle..=err.angle),
        ideal.power + rng.random_range(-err.power..=err.power),
    )
}

/// Aim at `target` with tier-dependent error and latency
pub fn plan_shot(
    shooter: &TankState,
    target: &TankState,
    terrain: &Terrain,
    ballistics: &Ballistics,
    tier: DifficultyTier,
    rng: &mut Pcg32,
) -> PlannedAim {
    let ideal = solve_aim(shooter, target.pos.x, ballistics, terrain);
    let aim = perturb_aim(ideal, tier, rng);
    let thinking_time_ms = tier.thinking_time_ms() + rng.random_range(0..THINKING_JITTER_MS);
    PlannedAim {
        aim,
        thinking_time_ms,
    }
}

/// Pick a munition; always falls back to the base weapon
pub fn select_weapon(
    tier: DifficultyTier,
    shooter: &TankState,
    target: &TankState,
    tanks: &[TankState],
    rng: &mut Pcg32,
) -> WeaponKind {
    let roll: f32 = rng.random();
    if roll >= tier.special_weapon_chance() {
        return WeaponKind::Standard;
    }

    let ammo = &shooter.inventory;
    let grouped = tanks
        .iter()
        .filter(|t| t.is_alive() && t.id != shooter.id)
        .filter(|t| t.pos.distance(target.pos) <= CLUSTER_GROUP_RADIUS)
        .count();

    if target.shield > 0.0 && ammo.has(WeaponKind::Emp) {
        WeaponKind::Emp
    } else if grouped >= 2 && ammo.has(WeaponKind::Cluster) {
        WeaponKind::Cluster
    } else if (target.pos.x - shooter.pos.x).abs() > HOMING_MIN_DISTANCE
        && ammo.has(WeaponKind::Homing)
    {
        WeaponKind::Homing
    } else if target.health > 50.0 && ammo.has(WeaponKind::HeavyShell) {
        WeaponKind::HeavyShell
    } else if target.stun_turns == 0 && ammo.has(WeaponKind::Concussion) {
        WeaponKind::Concussion
    } else if ammo.has(WeaponKind::Bouncer) {
        WeaponKind::Bouncer
    } else {
        WeaponKind::Standard
    }
}

/// Full decision for one AI tank, `None` when there is nobody to shoot
pub fn plan_turn(
    shooter: &TankState,
    tanks: &[TankState],
    terrain: &Terrain,
    ballistics: &Ballistics,
    tier: DifficultyTier,
    rng: &mut Pcg32,
) -> Option<ShotPlan> {
    let target_id = select_target(shooter, tanks)?;
    let target = tanks.iter().find(|t| t.id == target_id)?;
    let weapon = select_weapon(tier, shooter, target, tanks, rng);
    let planned = plan_shot(shooter, target, terrain, ballistics, tier, rng);
    Some(ShotPlan {
        target: target_id,
        aim: planned.aim,
        weapon,
        thinking_time_ms: planned.thinking_time_ms,
    })
}
