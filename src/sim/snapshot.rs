//! Read-only view of a match for renderers and HUDs
//!
//! Built on demand from `GameState`; holds no references back into it.

use glam::Vec2;
use serde::{Deserialize, Serialize};

use super::ai::Insignia;
use super::effects::{DestructionState, ExplosionState};
use super::events::MatchOutcome;
use super::state::{Aim, Controller, GameState, RoundPhase, TankId};
use super::terrain::Playfield;
use super::weapon::WeaponKind;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TankView {
    pub id: TankId,
    pub pos: Vec2,
    pub health: f32,
    pub shield: f32,
    pub fuel: f32,
    pub aim: Aim,
    pub weapon: WeaponKind,
    pub alive: bool,
    pub ready: bool,
    pub stunned: bool,
    pub ai: bool,
    /// Rank badge for AI tanks
    pub insignia: Option<Insignia>,
    /// Seconds until a pending AI decision commits
    pub thinking: Option<f32>,
    pub color: [u8; 3],
    pub killed_by: Option<WeaponKind>,
    /// Ammo for every weapon on hand (`None` = unlimited)
    pub ammo: Vec<(WeaponKind, Option<u32>)>,
}

/// One drawable shell (primary or cluster child)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ShellView {
    pub projectile: u32,
    pub owner: TankId,
    pub weapon: WeaponKind,
    pub position: Vec2,
    pub trace: Vec<Vec2>,
    pub sub_index: Option<u8>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Snapshot {
    pub time_ticks: u64,
    pub time: f32,
    pub round: u32,
    pub phase: RoundPhase,
    pub paused: bool,
    pub wind: f32,
    pub outcome: Option<MatchOutcome>,
    pub playfield: Playfield,
    pub terrain: Vec<f32>,
    pub tanks: Vec<TankView>,
    pub shells: Vec<ShellView>,
    pub explosions: Vec<ExplosionState>,
    pub destructions: Vec<DestructionState>,
}

impl Snapshot {
    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string(self)
    }

    pub fn tank(&self, id: TankId) -> Option<&TankView> {
        self.tanks.iter().find(|t| t.id == id)
    }
}

impl GameState {
    /// Capture everything a frame needs to draw
    pub fn snapshot(&self) -> Snapshot {
        let tanks = self
            .tanks
            .iter()
            .map(|t| TankView {
                id: t.id,
                pos: t.pos,
                health: t.health,
                shield: t.shield,
                fuel: t.fuel,
                aim: t.aim,
                weapon: t.weapon,
                alive: t.is_alive(),
                ready: t.has_ready_shot(),
                stunned: t.stun_turns > 0,
                ai: t.is_ai(),
                insignia: match t.controller {
                    Controller::Ai(tier) => Some(tier.insignia()),
                    Controller::Human => None,
                },
                thinking: self.scheduler.remaining(t.id, self.time),
                color: t.color,
                killed_by: t.killed_by(),
                ammo: t
                    .inventory
                    .available()
                    .into_iter()
                    .map(|k| (k, t.inventory.remaining(k)))
                    .collect(),
            })
            .collect();

        let mut shells = Vec::new();
        for p in &self.projectiles {
            if p.active {
                shells.push(ShellView {
                    projectile: p.id,
                    owner: p.owner,
                    weapon: p.weapon,
                    position: p.position,
                    trace: p.trace.clone(),
                    sub_index: None,
                });
            }
            shells.extend(p.sub_projectiles.iter().filter(|s| s.active).map(|s| ShellView {
                projectile: p.id,
                owner: p.owner,
                weapon: p.weapon,
                position: s.position,
                trace: s.trace.clone(),
                sub_index: Some(s.index),
            }));
        }

        Snapshot {
            time_ticks: self.time_ticks,
            time: self.time,
            round: self.round,
            phase: self.phase,
            paused: self.paused,
            wind: self.wind,
            outcome: self.outcome,
            playfield: self.terrain.playfield(),
            terrain: self.terrain.heights().to_vec(),
            tanks,
            shells,
            explosions: self.effects.explosions().iter().cloned().collect(),
            destructions: self.effects.destructions().iter().cloned().collect(),
        }
    }
}
