//! Discrete events emitted by the simulation
//!
//! The host drains these each frame and forwards them to audio, the
//! persistence layer (ammo consumption) or the screen-flow shell (match over).

use glam::Vec2;
use serde::{Deserialize, Serialize};

use super::state::TankId;
use super::weapon::WeaponKind;

/// How the match ended
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum MatchOutcome {
    Winner(TankId),
    /// The last tanks died in the same round
    Draw,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum GameEvent {
    RoundStarted {
        round: u32,
        wind: f32,
    },
    WeaponFired {
        tank: TankId,
        weapon: WeaponKind,
    },
    ClusterSplit {
        owner: TankId,
        point: Vec2,
        count: u8,
    },
    Bounced {
        owner: TankId,
        point: Vec2,
    },
    Explosion {
        point: Vec2,
        weapon: WeaponKind,
        blast_radius: f32,
    },
    TankHit {
        tank: TankId,
        by: TankId,
        weapon: WeaponKind,
        damage: f32,
        shield_absorbed: f32,
        direct: bool,
    },
    TankDestroyed {
        tank: TankId,
        weapon: WeaponKind,
    },
    /// Ammo spent; `remaining` is `None` for the unlimited base weapon
    AmmoConsumed {
        tank: TankId,
        weapon: WeaponKind,
        remaining: Option<u32>,
    },
    RoundComplete {
        round: u32,
    },
    MatchOver {
        outcome: MatchOutcome,
    },
}
