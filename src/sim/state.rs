//! Match state and core simulation types
//!
//! `GameState` is the simulation context: everything a round needs is owned
//! here and passed explicitly, with `new` / `reset_match` as the only
//! lifecycle entry points.

use std::collections::BTreeSet;

use glam::Vec2;
use rand::{Rng, SeedableRng};
use rand_pcg::Pcg32;
use serde::{Deserialize, Serialize};

use super::ai::DifficultyTier;
use super::effects::EffectAnimator;
use super::events::{GameEvent, MatchOutcome};
use super::projectile::{Ballistics, ProjectileState};
use super::scheduler::DecisionScheduler;
use super::terrain::{Playfield, Terrain};
use super::weapon::{WeaponCatalog, WeaponKind};
use crate::config::{EngineTuning, MatchConfig};
use crate::consts::*;
use crate::inventory::WeaponInventory;

/// Stable tank identity (index order = spawn order)
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct TankId(pub u32);

/// Barrel angle (degrees) and power (percent)
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Aim {
    pub angle: f32,
    pub power: f32,
}

impl Aim {
    /// Build an aim, clamped to the legal range
    pub fn new(angle: f32, power: f32) -> Self {
        let (angle, power) = crate::clamp_aim(angle, power);
        Self { angle, power }
    }
}

/// A pending shot for the next launch
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct QueuedShot {
    pub aim: Aim,
    pub weapon: WeaponKind,
    /// Committed (fire pressed / AI finished thinking)
    pub ready: bool,
}

/// Who decides a tank's shots
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Controller {
    Human,
    Ai(DifficultyTier),
}

/// A tank on the field
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TankState {
    pub id: TankId,
    pub controller: Controller,
    /// Bottom-center of the hull (world space, y up from the baseline)
    pub pos: Vec2,
    pub health: f32,
    pub shield: f32,
    pub fuel: f32,
    pub aim: Aim,
    /// Currently selected weapon
    pub weapon: WeaponKind,
    pub queued_shot: Option<QueuedShot>,
    /// Rounds this tank still has to sit out
    pub stun_turns: u8,
    pub inventory: WeaponInventory,
    pub color: [u8; 3],
    killed_by: Option<WeaponKind>,
}

impl TankState {
    pub fn new(
        id: TankId,
        controller: Controller,
        pos: Vec2,
        health: f32,
        shield: f32,
        fuel: f32,
        inventory: WeaponInventory,
    ) -> Self {
        Self {
            id,
            controller,
            pos,
            health: health.clamp(0.0, MAX_HEALTH),
            shield: shield.max(0.0),
            fuel,
            aim: Aim::new(90.0, 50.0),
            weapon: WeaponKind::Standard,
            queued_shot: None,
            stun_turns: 0,
            inventory,
            color: [200, 200, 200],
            killed_by: None,
        }
    }

    #[inline]
    pub fn is_alive(&self) -> bool {
        self.health > 0.0
    }

    pub fn is_ai(&self) -> bool {
        matches!(self.controller, Controller::Ai(_))
    }

    /// Center of the hull, used for blast distance
    pub fn body_center(&self) -> Vec2 {
        self.pos + Vec2::new(0.0, TANK_HEIGHT * 0.5)
    }

    /// Barrel tip for a given aim
    pub fn muzzle(&self, aim: Aim) -> Vec2 {
        self.pos + Vec2::new(0.0, TANK_HEIGHT) + crate::aim_direction(aim.angle) * BARREL_LENGTH
    }

    /// Weapon that destroyed this tank, if any
    pub fn killed_by(&self) -> Option<WeaponKind> {
        self.killed_by
    }

    /// Stamp the killing weapon; later calls never overwrite it
    pub fn mark_killed(&mut self, weapon: WeaponKind) {
        if self.killed_by.is_none() {
            self.killed_by = Some(weapon);
        }
    }

    /// Holds a committed shot
    pub fn has_ready_shot(&self) -> bool {
        self.queued_shot.is_some_and(|s| s.ready)
    }
}

/// Round coordinator phases.
///
/// `Launching` and `RoundComplete` are passed through within a single tick;
/// between ticks the observable phases are `WaitingForShots`, `Resolving`
/// and `MatchOver`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum RoundPhase {
    /// Collecting a committed shot from every living tank
    WaitingForShots,
    /// Turning every queued shot into a projectile
    Launching,
    /// Shells in flight, explosions/destructions animating
    Resolving,
    /// Everything settled; bookkeeping before the next round
    RoundComplete,
    /// A winner (or draw) has been decided
    MatchOver,
}

/// AI tank tint, cycled by tank index
const AI_COLORS: [[u8; 3]; 7] = [
    [200, 64, 64],
    [64, 96, 200],
    [220, 180, 40],
    [160, 64, 200],
    [40, 180, 180],
    [230, 120, 40],
    [120, 120, 120],
];

/// Complete match state (the simulation context)
#[derive(Debug, Clone)]
pub struct GameState {
    pub config: MatchConfig,
    pub tuning: EngineTuning,
    pub catalog: WeaponCatalog,
    pub terrain: Terrain,
    /// Sorted by id
    pub tanks: Vec<TankState>,
    pub phase: RoundPhase,
    /// 1-based round counter
    pub round: u32,
    /// Wind for the current round
    pub wind: f32,
    /// Simulation clock (seconds)
    pub time: f32,
    pub time_ticks: u64,
    pub paused: bool,
    pub projectiles: Vec<ProjectileState>,
    pub effects: EffectAnimator,
    pub scheduler: DecisionScheduler,
    /// Latched as soon as damage leaves fewer than two tanks alive
    pub outcome: Option<MatchOutcome>,
    pub(crate) rng: Pcg32,
    /// AI tanks with no target this round (they hold fire)
    pub(crate) holding: BTreeSet<TankId>,
    pub(crate) events: Vec<GameEvent>,
    /// Fixed terrain override (tests, custom maps); regenerated from the seed otherwise
    fixed_terrain: Option<Terrain>,
    player_inventory: WeaponInventory,
    next_id: u32,
}

impl GameState {
    /// New match with generated terrain and round 1 waiting for shots
    pub fn new(
        config: MatchConfig,
        tuning: EngineTuning,
        catalog: WeaponCatalog,
        player_inventory: WeaponInventory,
    ) -> Self {
        Self::build(config, tuning, catalog, player_inventory, None)
    }

    /// New match on a caller-supplied terrain
    pub fn with_terrain(
        config: MatchConfig,
        tuning: EngineTuning,
        catalog: WeaponCatalog,
        player_inventory: WeaponInventory,
        terrain: Terrain,
    ) -> Self {
        Self::build(config, tuning, catalog, player_inventory, Some(terrain))
    }

    fn build(
        config: MatchConfig,
        tuning: EngineTuning,
        catalog: WeaponCatalog,
        player_inventory: WeaponInventory,
        fixed_terrain: Option<Terrain>,
    ) -> Self {
        let mut rng = Pcg32::seed_from_u64(config.seed);
        let (width, height) = config.terrain_size.dimensions();
        let terrain = match &fixed_terrain {
            Some(t) => t.clone(),
            None => Terrain::generate(Playfield::new(width, height), &mut rng),
        };

        let effects = EffectAnimator::new(tuning.explosion_duration, tuning.destruction_duration);
        let mut state = Self {
            config,
            tuning,
            catalog,
            terrain,
            tanks: Vec::new(),
            phase: RoundPhase::WaitingForShots,
            round: 1,
            wind: 0.0,
            time: 0.0,
            time_ticks: 0,
            paused: false,
            projectiles: Vec::new(),
            effects,
            scheduler: DecisionScheduler::new(),
            outcome: None,
            rng,
            holding: BTreeSet::new(),
            events: Vec::new(),
            fixed_terrain,
            player_inventory,
            next_id: 1,
        };
        state.spawn_tanks();
        log::info!(
            "New match: {} tanks, {} AI, seed {}",
            state.tanks.len(),
            state.config.difficulty.as_str(),
            state.config.seed
        );
        state.begin_round();
        state
    }

    /// Place the player and every AI tank on the terrain
    fn spawn_tanks(&mut self) {
        let count = self.config.tank_count();
        let columns = self.terrain.spawn_columns(count, &mut self.rng);
        let mid = self.terrain.playfield().width * 0.5;

        self.tanks = columns
            .iter()
            .enumerate()
            .map(|(i, &x)| {
                let id = TankId(i as u32);
                let pos = Vec2::new(x, self.terrain.height_at(x));
                let human = i == 0 && self.config.human_player;
                let (controller, inventory, color) = if human {
                    (
                        Controller::Human,
                        self.player_inventory.clone(),
                        self.config.player_color,
                    )
                } else {
                    let tier = self.config.difficulty;
                    let color = if i == 0 {
                        self.config.player_color
                    } else {
                        AI_COLORS[(i - 1) % AI_COLORS.len()]
                    };
                    (Controller::Ai(tier), tier.loadout(), color)
                };
                let mut tank = TankState::new(
                    id,
                    controller,
                    pos,
                    MAX_HEALTH,
                    self.tuning.starting_shield.min(self.tuning.max_shield),
                    self.tuning.starting_fuel,
                    inventory,
                );
                tank.aim = Aim::new(if x < mid { 45.0 } else { 135.0 }, 50.0);
                tank.color = color;
                tank
            })
            .collect();
    }

    /// Throw everything away and start over with the same configuration
    pub fn reset_match(&mut self) {
        let cancelled = self.scheduler.cancel_all();
        log::info!("Match reset ({} pending AI decisions cancelled)", cancelled);
        *self = Self::build(
            self.config.clone(),
            self.tuning.clone(),
            self.catalog.clone(),
            self.player_inventory.clone(),
            self.fixed_terrain.clone(),
        );
    }

    /// Allocate a new entity ID
    pub fn next_entity_id(&mut self) -> u32 {
        let id = self.next_id;
        self.next_id += 1;
        id
    }

    /// Ballistic environment for the current round
    pub fn ballistics(&self) -> Ballistics {
        Ballistics::new(&self.tuning, self.terrain.playfield(), self.wind)
    }

    pub fn tank(&self, id: TankId) -> Option<&TankState> {
        self.tanks.iter().find(|t| t.id == id)
    }

    pub fn tank_mut(&mut self, id: TankId) -> Option<&mut TankState> {
        self.tanks.iter_mut().find(|t| t.id == id)
    }

    /// The host-controlled tank, if any
    pub fn human_tank(&self) -> Option<TankId> {
        self.tanks
            .iter()
            .find(|t| t.controller == Controller::Human)
            .map(|t| t.id)
    }

    /// Take every event emitted since the last drain
    pub fn drain_events(&mut self) -> Vec<GameEvent> {
        std::mem::take(&mut self.events)
    }

    /// Peek at undrained events
    pub fn pending_events(&self) -> &[GameEvent] {
        &self.events
    }

    pub(crate) fn emit(&mut self, event: GameEvent) {
        self.events.push(event);
    }

    /// Fresh wind draw for a round
    pub(crate) fn roll_wind(&mut self) -> f32 {
        let max = self.tuning.max_wind;
        if max <= 0.0 {
            return 0.0;
        }
        self.rng.random_range(-max..=max)
    }
}
