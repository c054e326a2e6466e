//! Blast resolution
//!
//! Finds the tanks caught in an explosion and applies the shield/health
//! split. Damage is applied once, when the explosion spawns.

use glam::Vec2;

use super::state::{TankId, TankState};
use super::weapon::{WeaponEffects, WeaponKind};
use crate::world_to_canvas;

/// What a single `apply_damage` call did to a tank
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DamageOutcome {
    pub tank: TankId,
    pub shield_absorbed: f32,
    pub health_lost: f32,
    pub health_after: f32,
    pub direct_hit: bool,
    /// Health crossed from >0 to <=0 in this call
    pub killed: bool,
    /// Stun rounds applied by this hit
    pub stunned: u8,
}

/// A resolved explosion ready to be applied
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Blast {
    pub point: Vec2,
    pub weapon: WeaponKind,
    pub effects: WeaponEffects,
    pub damage: f32,
    pub radius: f32,
}

/// Living tanks whose body center lies within `radius` of `impact`.
///
/// Distances are measured in canvas space (y flipped), matching what the
/// player sees on screen. Results keep the order of `tanks`.
pub fn find_hits(
    impact: Vec2,
    radius: f32,
    tanks: &[TankState],
    playfield_height: f32,
) -> Vec<TankId> {
    let impact = world_to_canvas(impact, playfield_height);
    tanks
        .iter()
        .filter(|t| t.is_alive())
        .filter(|t| {
            let center = world_to_canvas(t.body_center(), playfield_height);
            center.distance(impact) <= radius
        })
        .map(|t| t.id)
        .collect()
}

/// Apply one hit to one tank.
///
/// Dead tanks are left untouched: no damage, no shield change, and their
/// killed-by stamp is never rewritten.
pub fn apply_damage(
    tank: &mut TankState,
    raw_damage: f32,
    weapon: WeaponKind,
    effects: WeaponEffects,
    direct_hit: bool,
) -> DamageOutcome {
    let mut outcome = DamageOutcome {
        tank: tank.id,
        shield_absorbed: 0.0,
        health_lost: 0.0,
        health_after: tank.health,
        direct_hit,
        killed: false,
        stunned: 0,
    };
    if !tank.is_alive() {
        return outcome;
    }

    let mut remaining = raw_damage.max(0.0);

    if effects.bypasses_shield {
        tank.shield = 0.0;
    } else if !direct_hit {
        let absorbed = tank.shield.min(remaining);
        tank.shield -= absorbed;
        remaining -= absorbed;
        outcome.shield_absorbed = absorbed;
    }

    let before = tank.health;
    tank.health = (tank.health - remaining).max(0.0);
    outcome.health_lost = before - tank.health;
    outcome.health_after = tank.health;

    if before > 0.0 && tank.health <= 0.0 {
        tank.mark_killed(weapon);
        outcome.killed = true;
    }

    outcome
}

/// Apply a blast to every tank it reaches, in tank order
pub fn resolve_blast(
    blast: &Blast,
    tanks: &mut [TankState],
    direct_hit_radius: f32,
    playfield_height: f32,
) -> Vec<DamageOutcome> {
    let hits = find_hits(blast.point, blast.radius, tanks, playfield_height);
    let impact = world_to_canvas(blast.point, playfield_height);

    let mut outcomes = Vec::with_capacity(hits.len());
    for tank in tanks.iter_mut().filter(|t| hits.contains(&t.id)) {
        let center = world_to_canvas(tank.body_center(), playfield_height);
        let direct = center.distance(impact) <= direct_hit_radius;
        let mut outcome = apply_damage(tank, blast.damage, blast.weapon, blast.effects, direct);

        if tank.is_alive() && blast.effects.stun_turns > 0 {
            tank.stun_turns = tank.stun_turns.max(blast.effects.stun_turns);
            outcome.stunned = blast.effects.stun_turns;
        }
        outcomes.push(outcome);
    }
    outcomes
}

/// Ids of tanks still alive
pub fn survivors(tanks: &[TankState]) -> Vec<TankId> {
    tanks.iter().filter(|t| t.is_alive()).map(|t| t.id).collect()
}
