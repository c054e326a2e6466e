//! Fixed timestep round coordinator
//!
//! Drives a match through its rounds: every living tank commits a shot, all
//! shots launch together, then the round resolves until the last shell lands
//! and the last animation finishes.

use glam::Vec2;

use super::ai::plan_turn;
use super::damage::{Blast, resolve_blast};
use super::events::{GameEvent, MatchOutcome};
use super::projectile::{FlightContext, FlightEvent, Landing, ProjectileState};
use super::state::{Aim, Controller, GameState, QueuedShot, RoundPhase, TankId};
use super::weapon::WeaponKind;
use crate::error::ShotError;

/// Input commands for a single tick (deterministic)
#[derive(Debug, Clone, Default)]
pub struct TickInput {
    /// New aim for the human tank (clamped)
    pub aim: Option<Aim>,
    /// Weapon switch for the human tank
    pub weapon: Option<WeaponKind>,
    /// Commit the human tank's shot
    pub fire: bool,
    /// Pause toggle
    pub pause: bool,
    /// Idle/demo mode - AI plays the human tank
    pub idle_mode: bool,
}

/// Advance the match by one fixed timestep
pub fn tick(state: &mut GameState, input: &TickInput, dt: f32) {
    if input.pause {
        state.paused = !state.paused;
    }
    if state.paused || state.phase == RoundPhase::MatchOver {
        return;
    }

    state.time_ticks += 1;
    state.time += dt;
    let now = state.time;

    match state.phase {
        RoundPhase::WaitingForShots => {
            apply_player_input(state, input, now);
            commit_due_decisions(state, now);
            if state.all_committed() {
                state.phase = RoundPhase::Launching;
                launch_all(state, now);
            }
        }
        RoundPhase::Resolving => resolve(state, now, dt),
        // Transitional phases never persist across ticks
        RoundPhase::Launching | RoundPhase::RoundComplete | RoundPhase::MatchOver => {}
    }
}

fn apply_player_input(state: &mut GameState, input: &TickInput, now: f32) {
    let Some(player) = state.human_tank() else {
        return;
    };

    if input.idle_mode {
        schedule_idle_player(state, player, now);
        return;
    }
    // Host took control back before the demo decision came due
    if state.scheduler.cancel(player) {
        log::debug!("Idle mode off, dropped demo decision for {:?}", player);
    }

    if let Some(weapon) = input.weapon {
        if let Err(e) = state.select_weapon(player, weapon) {
            log::debug!("Weapon switch rejected: {}", e);
        }
    }
    if let Some(aim) = input.aim {
        if let Err(e) = state.set_aim(player, aim) {
            log::debug!("Aim rejected: {}", e);
        }
    }
    if input.fire {
        if let Err(e) = state.fire(player) {
            log::debug!("Fire rejected: {}", e);
        }
    }
}

/// Demo mode: let the AI think for the human tank
fn schedule_idle_player(state: &mut GameState, player: TankId, now: f32) {
    let Some(idx) = state.tanks.iter().position(|t| t.id == player) else {
        return;
    };
    let tank = &state.tanks[idx];
    if !tank.is_alive()
        || tank.stun_turns > 0
        || tank.has_ready_shot()
        || state.scheduler.is_pending(player)
        || state.holding.contains(&player)
    {
        return;
    }

    let ballistics = state.ballistics();
    let tier = state.config.difficulty;
    match plan_turn(
        &state.tanks[idx],
        &state.tanks,
        &state.terrain,
        &ballistics,
        tier,
        &mut state.rng,
    ) {
        Some(plan) => {
            state.scheduler.schedule(player, now, plan);
        }
        None => {
            state.holding.insert(player);
        }
    }
}

/// Turn every AI decision whose thinking time has elapsed into a ready shot
fn commit_due_decisions(state: &mut GameState, now: f32) {
    for (id, plan) in state.scheduler.poll(now) {
        let Some(tank) = state.tank_mut(id) else {
            continue;
        };
        if !tank.is_alive() || tank.stun_turns > 0 {
            continue;
        }
        let weapon = if tank.inventory.has(plan.weapon) {
            plan.weapon
        } else {
            WeaponKind::Standard
        };
        tank.aim = plan.aim;
        tank.weapon = weapon;
        tank.queued_shot = Some(QueuedShot {
            aim: plan.aim,
            weapon,
            ready: true,
        });
        log::debug!(
            "{:?} committed {} at {:.1}°/{:.1}% on {:?}",
            id,
            weapon.as_str(),
            plan.aim.angle,
            plan.aim.power,
            plan.target
        );
    }
}

/// Launch every committed shot at once.
///
/// All queued shots are cleared in the same pass, so no tank can end up
/// with a stale queued shot after the batch.
fn launch_all(state: &mut GameState, now: f32) {
    let ballistics = state.ballistics();
    let mut launched = Vec::new();

    for idx in 0..state.tanks.len() {
        let id = state.tanks[idx].id;
        if !state.tanks[idx].is_alive() {
            state.tanks[idx].queued_shot = None;
            continue;
        }
        if state.tanks[idx].stun_turns > 0 {
            state.tanks[idx].stun_turns -= 1;
            state.tanks[idx].queued_shot = None;
            log::debug!("{:?} sits out round {} (stunned)", id, state.round);
            continue;
        }
        let Some(shot) = state.tanks[idx].queued_shot.take() else {
            continue;
        };
        if !shot.ready {
            continue;
        }

        let weapon = match state.tanks[idx].inventory.consume(shot.weapon) {
            Ok(remaining) => {
                if remaining.is_some() {
                    state.emit(GameEvent::AmmoConsumed {
                        tank: id,
                        weapon: shot.weapon,
                        remaining,
                    });
                }
                shot.weapon
            }
            Err(e) => {
                log::warn!("{:?}: {}, firing standard shell", id, e);
                WeaponKind::Standard
            }
        };

        let effects = state.catalog.get(weapon).effects;
        let projectile_id = state.next_entity_id();
        let projectile = ProjectileState::launch(
            projectile_id,
            &state.tanks[idx],
            shot.aim,
            weapon,
            effects,
            now,
            &ballistics,
        );
        state.emit(GameEvent::WeaponFired { tank: id, weapon });
        launched.push(projectile);
    }

    log::info!(
        "Round {}: launched {} shell(s), wind {:+.1}",
        state.round,
        launched.len(),
        state.wind
    );
    state.projectiles = launched;
    state.holding.clear();
    state.phase = RoundPhase::Resolving;
}

/// Fly shells, detonate landings, animate, and close the round once idle
fn resolve(state: &mut GameState, now: f32, dt: f32) {
    let targets: Vec<(TankId, Vec2)> = state
        .tanks
        .iter()
        .filter(|t| t.is_alive())
        .map(|t| (t.id, t.body_center()))
        .collect();

    let mut flight_events = Vec::new();
    let mut in_flight = Vec::with_capacity(state.projectiles.len());
    {
        let ctx = FlightContext {
            terrain: &state.terrain,
            tuning: &state.tuning,
            tanks: &targets,
        };
        for mut projectile in std::mem::take(&mut state.projectiles) {
            let owner = projectile.owner;
            let events = projectile.advance(now, dt, &ctx);
            flight_events.extend(events.into_iter().map(|e| (owner, e)));
            if !projectile.is_finished() {
                in_flight.push(projectile);
            }
        }
    }
    state.projectiles = in_flight;

    let mut landings = Vec::new();
    for (owner, event) in flight_events {
        match event {
            FlightEvent::Landed(landing) => landings.push(landing),
            FlightEvent::Split { point, count, .. } => {
                state.emit(GameEvent::ClusterSplit {
                    owner,
                    point,
                    count,
                })
            }
            FlightEvent::Bounced { point, .. } => state.emit(GameEvent::Bounced { owner, point }),
            FlightEvent::Expired { projectile } => {
                log::debug!("Projectile {} expired without landing", projectile);
            }
        }
    }

    // Same-tick impacts resolve by owner, then primary before sub-munitions
    landings.sort_by_key(|l| (l.owner, l.projectile, l.sub_index.map_or(0, |i| u16::from(i) + 1)));
    for landing in landings {
        detonate(state, &landing, now);
    }

    state.latch_outcome();
    let completed = state.effects.update(now, dt);
    if !completed.destructions.is_empty() {
        log::debug!("{} destruction sequence(s) finished", completed.destructions.len());
    }

    if state.projectiles.is_empty() && state.effects.is_idle() {
        finish_round(state, now);
    }
}

fn detonate(state: &mut GameState, landing: &Landing, now: f32) {
    let config = state.catalog.get(landing.weapon);
    let blast = Blast {
        point: landing.point,
        weapon: landing.weapon,
        effects: config.effects,
        damage: config.damage * landing.scale,
        radius: config.blast_radius * landing.scale,
    };

    state
        .effects
        .spawn_explosion(blast.point, blast.weapon, blast.radius, now);
    state.emit(GameEvent::Explosion {
        point: blast.point,
        weapon: blast.weapon,
        blast_radius: blast.radius,
    });

    let height = state.terrain.playfield().height;
    let outcomes = resolve_blast(&blast, &mut state.tanks, state.tuning.direct_hit_radius, height);
    for hit in outcomes {
        state.emit(GameEvent::TankHit {
            tank: hit.tank,
            by: landing.owner,
            weapon: landing.weapon,
            damage: hit.health_lost,
            shield_absorbed: hit.shield_absorbed,
            direct: hit.direct_hit,
        });
        if !hit.killed {
            continue;
        }

        state.scheduler.cancel(hit.tank);
        let Some(tank) = state.tank_mut(hit.tank) else {
            continue;
        };
        tank.queued_shot = None;
        let pos = tank.pos;
        let weapon = tank.killed_by().unwrap_or(landing.weapon);
        if state.effects.spawn_destruction(hit.tank, pos, now).is_some() {
            log::info!(
                "{:?} destroyed by {:?} ({})",
                hit.tank,
                landing.owner,
                weapon.as_str()
            );
            state.emit(GameEvent::TankDestroyed {
                tank: hit.tank,
                weapon,
            });
        }
    }
}

fn finish_round(state: &mut GameState, now: f32) {
    state.phase = RoundPhase::RoundComplete;
    state.emit(GameEvent::RoundComplete { round: state.round });

    if let Some(outcome) = state.outcome {
        end_match(state, outcome);
        return;
    }

    state.round += 1;
    state.begin_round_at(now);
}

fn end_match(state: &mut GameState, outcome: MatchOutcome) {
    let cancelled = state.scheduler.cancel_all();
    if cancelled > 0 {
        log::debug!("Dropped {} pending decisions at match end", cancelled);
    }
    state.phase = RoundPhase::MatchOver;
    match outcome {
        MatchOutcome::Winner(id) => log::info!("Match over after {} rounds: {:?} wins", state.round, id),
        MatchOutcome::Draw => log::info!("Match over after {} rounds: draw", state.round),
    }
    state.emit(GameEvent::MatchOver { outcome });
}

impl GameState {
    /// Open round `self.round`: new wind, fresh AI decisions
    pub(crate) fn begin_round(&mut self) {
        let now = self.time;
        self.begin_round_at(now);
    }

    fn begin_round_at(&mut self, now: f32) {
        self.scheduler.cancel_all();
        self.projectiles.clear();
        self.effects.clear_round();
        self.holding.clear();
        for tank in &mut self.tanks {
            tank.queued_shot = None;
        }

        self.latch_outcome();
        if let Some(outcome) = self.outcome {
            end_match(self, outcome);
            return;
        }

        self.wind = self.roll_wind();
        self.phase = RoundPhase::WaitingForShots;
        self.emit(GameEvent::RoundStarted {
            round: self.round,
            wind: self.wind,
        });
        log::info!("Round {} begins, wind {:+.1}", self.round, self.wind);

        let ballistics = self.ballistics();
        let mut plans = Vec::new();
        for tank in &self.tanks {
            let Controller::Ai(tier) = tank.controller else {
                continue;
            };
            if !tank.is_alive() || tank.stun_turns > 0 {
                continue;
            }
            plans.push((
                tank.id,
                plan_turn(tank, &self.tanks, &self.terrain, &ballistics, tier, &mut self.rng),
            ));
        }
        for (id, plan) in plans {
            match plan {
                Some(plan) => {
                    self.scheduler.schedule(id, now, plan);
                }
                None => {
                    self.holding.insert(id);
                }
            }
        }
    }

    /// Restart the current round from `WaitingForShots`.
    ///
    /// In-flight shells and animations are dropped and AI decisions are
    /// re-planned. Returns false once the match is over.
    pub fn start_round(&mut self) -> bool {
        if self.phase == RoundPhase::MatchOver {
            return false;
        }
        self.begin_round();
        self.phase == RoundPhase::WaitingForShots
    }

    /// Record the outcome as soon as fewer than two tanks remain
    pub(crate) fn latch_outcome(&mut self) {
        if self.outcome.is_some() {
            return;
        }
        let mut alive = self.tanks.iter().filter(|t| t.is_alive());
        self.outcome = match (alive.next(), alive.next()) {
            (Some(_), Some(_)) => None,
            (Some(winner), None) => Some(MatchOutcome::Winner(winner.id)),
            (None, _) => Some(MatchOutcome::Draw),
        };
        if let Some(outcome) = self.outcome {
            log::debug!("Outcome decided: {:?}", outcome);
        }
    }

    /// Every living tank has committed, is stunned, or is holding fire
    pub fn all_committed(&self) -> bool {
        if self.outcome.is_some() {
            return false;
        }
        self.tanks.iter().filter(|t| t.is_alive()).all(|t| {
            t.stun_turns > 0 || t.has_ready_shot() || self.holding.contains(&t.id)
        })
    }

    /// Index of a tank that may act right now
    fn shooter_index(&self, id: TankId) -> Result<usize, ShotError> {
        if self.outcome.is_some() || self.phase == RoundPhase::MatchOver {
            return Err(ShotError::MatchOver);
        }
        if self.phase != RoundPhase::WaitingForShots {
            return Err(ShotError::NotAcceptingShots);
        }
        let idx = self
            .tanks
            .iter()
            .position(|t| t.id == id)
            .ok_or(ShotError::UnknownTank(id))?;
        let tank = &self.tanks[idx];
        if !tank.is_alive() {
            return Err(ShotError::TankDestroyed(id));
        }
        if tank.stun_turns > 0 {
            return Err(ShotError::TankStunned(id));
        }
        Ok(idx)
    }

    /// Adjust aim; leaves an uncommitted shot queued
    pub fn set_aim(&mut self, id: TankId, aim: Aim) -> Result<(), ShotError> {
        let idx = self.shooter_index(id)?;
        let aim = Aim::new(aim.angle, aim.power);
        let tank = &mut self.tanks[idx];
        tank.aim = aim;
        tank.queued_shot = Some(QueuedShot {
            aim,
            weapon: tank.weapon,
            ready: false,
        });
        Ok(())
    }

    /// Switch the selected weapon (must have ammo)
    pub fn select_weapon(&mut self, id: TankId, weapon: WeaponKind) -> Result<(), ShotError> {
        let idx = self.shooter_index(id)?;
        let tank = &mut self.tanks[idx];
        if !tank.inventory.has(weapon) {
            return Err(ShotError::OutOfAmmo(id, weapon));
        }
        tank.weapon = weapon;
        if let Some(shot) = tank.queued_shot.as_mut() {
            shot.weapon = weapon;
        }
        Ok(())
    }

    /// Commit the queued shot for the next launch.
    ///
    /// With nothing queued (a new round, barrel untouched) the tank's current
    /// aim and weapon are committed.
    pub fn fire(&mut self, id: TankId) -> Result<(), ShotError> {
        let idx = self.shooter_index(id)?;
        let tank = &mut self.tanks[idx];
        let (aim, weapon) = (tank.aim, tank.weapon);
        let shot = tank.queued_shot.get_or_insert(QueuedShot {
            aim,
            weapon,
            ready: false,
        });
        if !tank.inventory.has(shot.weapon) {
            return Err(ShotError::OutOfAmmo(id, shot.weapon));
        }
        shot.ready = true;
        Ok(())
    }

    /// Aim, pick a weapon and commit in one step
    pub fn queue_shot(&mut self, id: TankId, aim: Aim, weapon: WeaponKind) -> Result<(), ShotError> {
        let idx = self.shooter_index(id)?;
        if !self.tanks[idx].inventory.has(weapon) {
            return Err(ShotError::OutOfAmmo(id, weapon));
        }
        self.scheduler.cancel(id);
        let aim = Aim::new(aim.angle, aim.power);
        let tank = &mut self.tanks[idx];
        tank.aim = aim;
        tank.weapon = weapon;
        tank.queued_shot = Some(QueuedShot {
            aim,
            weapon,
            ready: true,
        });
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{EngineTuning, MatchConfig};
    use crate::consts::SIM_DT;
    use crate::inventory::WeaponInventory;
    use crate::sim::ai::solve_aim;
    use crate::sim::terrain::{Playfield, Terrain};
    use crate::sim::weapon::{WeaponCatalog, WeaponConfig};
    use std::collections::BTreeMap;

    const MAX_TICKS: usize = 60 * 60;
    /// Lands a few dozen pixels ahead of a left-side tank, clear of everyone
    const LOB: Aim = Aim {
        angle: 60.0,
        power: 20.0,
    };

    fn calm() -> EngineTuning {
        EngineTuning {
            max_wind: 0.0,
            ..EngineTuning::default()
        }
    }

    fn duel(enemy_count: u8) -> GameState {
        let config = MatchConfig {
            enemy_count,
            seed: 4242,
            ..MatchConfig::default()
        };
        let terrain = Terrain::flat(Playfield::new(960.0, 540.0), 100.0);
        GameState::with_terrain(
            config,
            calm(),
            WeaponCatalog::default(),
            WeaponInventory::unlimited_base(),
            terrain,
        )
    }

    fn run_until(state: &mut GameState, done: impl Fn(&GameState) -> bool) {
        let input = TickInput::default();
        for _ in 0..MAX_TICKS {
            if done(state) {
                return;
            }
            tick(state, &input, SIM_DT);
        }
        panic!("condition not reached in {} ticks", MAX_TICKS);
    }

    fn perfect_aim(state: &GameState, from: TankId, at: TankId) -> Aim {
        let shooter = state.tank(from).unwrap();
        let target_x = state.tank(at).unwrap().pos.x;
        solve_aim(shooter, target_x, &state.ballistics(), &state.terrain)
    }

    #[test]
    fn test_waits_for_every_living_tank() {
        let mut state = duel(1);
        state.scheduler.cancel(TankId(1));

        for _ in 0..120 {
            tick(&mut state, &TickInput::default(), SIM_DT);
        }
        assert_eq!(state.phase, RoundPhase::WaitingForShots);
        assert!(state.projectiles.is_empty());

        // Aim alone does not commit
        let aim = TickInput {
            aim: Some(Aim::new(45.0, 60.0)),
            ..Default::default()
        };
        tick(&mut state, &aim, SIM_DT);
        assert!(!state.tanks[0].has_ready_shot());

        state.queue_shot(TankId(1), Aim::new(135.0, 60.0), WeaponKind::Standard).unwrap();
        let fire = TickInput {
            fire: true,
            ..Default::default()
        };
        tick(&mut state, &fire, SIM_DT);
        assert_eq!(state.phase, RoundPhase::Resolving);
        assert_eq!(state.projectiles.len(), 2);
        assert!(state.tanks.iter().all(|t| t.queued_shot.is_none()));
    }

    #[test]
    fn test_direct_kill_ends_match() {
        let mut weapons = BTreeMap::new();
        weapons.insert(
            WeaponKind::Standard,
            WeaponConfig {
                damage: 100.0,
                ..WeaponConfig::builtin(WeaponKind::Standard)
            },
        );
        let config = MatchConfig {
            seed: 4242,
            ..MatchConfig::default()
        };
        let mut state = GameState::with_terrain(
            config,
            calm(),
            WeaponCatalog::from_table(weapons),
            WeaponInventory::unlimited_base(),
            Terrain::flat(Playfield::new(960.0, 540.0), 100.0),
        );
        state.tanks[0].pos = Vec2::new(200.0, 100.0);
        state.tanks[1].pos = Vec2::new(700.0, 100.0);
        state.scheduler.cancel(TankId(1));
        state.tanks[1].stun_turns = 3;
        assert_eq!(state.tanks[1].health, 100.0);

        let aim = perfect_aim(&state, TankId(0), TankId(1));
        state.queue_shot(TankId(0), aim, WeaponKind::Standard).unwrap();
        tick(&mut state, &TickInput::default(), SIM_DT);
        assert_eq!(state.phase, RoundPhase::Resolving);

        run_until(&mut state, |s| s.outcome.is_some());
        assert_eq!(state.outcome, Some(MatchOutcome::Winner(TankId(0))));
        // Still animating the wreck
        assert_eq!(state.phase, RoundPhase::Resolving);
        assert!(state.queue_shot(TankId(0), aim, WeaponKind::Standard).is_err());

        run_until(&mut state, |s| s.phase == RoundPhase::MatchOver);
        assert_eq!(state.tanks[1].health, 0.0);
        assert_eq!(state.tanks[1].killed_by(), Some(WeaponKind::Standard));

        let events = state.drain_events();
        assert!(events.iter().any(|e| matches!(
            e,
            GameEvent::TankHit {
                tank: TankId(1),
                by: TankId(0),
                direct: true,
                ..
            }
        )));
        let destroyed = events
            .iter()
            .filter(|e| matches!(e, GameEvent::TankDestroyed { tank: TankId(1), .. }))
            .count();
        assert_eq!(destroyed, 1);
        assert!(matches!(
            events.last(),
            Some(GameEvent::MatchOver {
                outcome: MatchOutcome::Winner(TankId(0))
            })
        ));

        // Nothing moves after the match
        let ticks = state.time_ticks;
        tick(&mut state, &TickInput::default(), SIM_DT);
        assert_eq!(state.time_ticks, ticks);
    }

    #[test]
    fn test_stunned_tank_sits_out_one_round() {
        let mut state = duel(1);
        state.scheduler.cancel(TankId(1));
        state.tanks[1].stun_turns = 1;
        assert_eq!(
            state.queue_shot(TankId(1), Aim::new(90.0, 10.0), WeaponKind::Standard),
            Err(ShotError::TankStunned(TankId(1)))
        );

        state.queue_shot(TankId(0), LOB, WeaponKind::Standard).unwrap();
        tick(&mut state, &TickInput::default(), SIM_DT);
        assert_eq!(state.projectiles.len(), 1);
        assert_eq!(state.tanks[1].stun_turns, 0);

        run_until(&mut state, |s| s.round == 2);
        assert_eq!(state.phase, RoundPhase::WaitingForShots);
        assert!(state.scheduler.is_pending(TankId(1)));
    }

    #[test]
    fn test_three_tank_round_with_ai() {
        let mut state = duel(2);
        assert_eq!(state.scheduler.len(), 2);

        state.queue_shot(TankId(0), LOB, WeaponKind::Standard).unwrap();
        // AI tanks are still thinking: nothing launches yet
        tick(&mut state, &TickInput::default(), SIM_DT);
        assert_eq!(state.phase, RoundPhase::WaitingForShots);
        assert_eq!(state.scheduler.len(), 2);
        assert!(state.projectiles.is_empty());
        assert!(state.tanks[0].has_ready_shot());

        run_until(&mut state, |s| s.phase == RoundPhase::Resolving);
        assert_eq!(state.projectiles.len(), 3);

        let fired: Vec<TankId> = state
            .drain_events()
            .into_iter()
            .filter_map(|e| match e {
                GameEvent::WeaponFired { tank, .. } => Some(tank),
                _ => None,
            })
            .collect();
        assert_eq!(fired, vec![TankId(0), TankId(1), TankId(2)]);

        run_until(&mut state, |s| {
            s.round == 2 || s.phase == RoundPhase::MatchOver
        });
    }

    #[test]
    fn test_limited_ammo_consumed_on_launch() {
        let config = MatchConfig {
            seed: 7,
            ..MatchConfig::default()
        };
        let mut state = GameState::with_terrain(
            config,
            calm(),
            WeaponCatalog::default(),
            WeaponInventory::from_counts([(WeaponKind::HeavyShell, 1)]),
            Terrain::flat(Playfield::new(960.0, 540.0), 100.0),
        );
        state.scheduler.cancel(TankId(1));
        state.tanks[1].stun_turns = 2;

        state.queue_shot(TankId(0), LOB, WeaponKind::HeavyShell).unwrap();
        tick(&mut state, &TickInput::default(), SIM_DT);
        assert_eq!(state.tanks[0].inventory.remaining(WeaponKind::HeavyShell), Some(0));
        assert!(!state.tanks[0].inventory.has(WeaponKind::HeavyShell));
        assert!(state.pending_events().contains(&GameEvent::AmmoConsumed {
            tank: TankId(0),
            weapon: WeaponKind::HeavyShell,
            remaining: Some(0),
        }));

        run_until(&mut state, |s| s.round == 2);
        assert_eq!(
            state.select_weapon(TankId(0), WeaponKind::HeavyShell),
            Err(ShotError::OutOfAmmo(TankId(0), WeaponKind::HeavyShell))
        );
    }

    #[test]
    fn test_fire_commits_current_aim() {
        let mut state = duel(1);
        state.tanks[0].queued_shot = None;
        state.tanks[0].aim = LOB;
        assert_eq!(state.fire(TankId(0)), Ok(()));
        assert_eq!(
            state.tanks[0].queued_shot,
            Some(QueuedShot {
                aim: LOB,
                weapon: WeaponKind::Standard,
                ready: true,
            })
        );
        assert_eq!(
            state.set_aim(TankId(9), Aim::new(45.0, 50.0)),
            Err(ShotError::UnknownTank(TankId(9)))
        );
    }

    #[test]
    fn test_reset_cancels_pending_decisions() {
        let mut state = duel(3);
        state.queue_shot(TankId(0), LOB, WeaponKind::Standard).unwrap();
        run_until(&mut state, |s| s.phase == RoundPhase::Resolving);
        state.reset_match();
        assert_eq!(state.phase, RoundPhase::WaitingForShots);
        assert_eq!(state.round, 1);
        assert!(state.projectiles.is_empty());
        assert_eq!(state.scheduler.len(), 3);
        assert!(state.tanks.iter().all(|t| t.queued_shot.is_none()));
    }

    #[test]
    fn test_idle_mode_plays_itself() {
        let config = MatchConfig {
            human_player: true,
            seed: 99,
            ..MatchConfig::default()
        };
        let mut state = GameState::new(
            config,
            EngineTuning::default(),
            WeaponCatalog::default(),
            WeaponInventory::unlimited_base(),
        );
        let idle = TickInput {
            idle_mode: true,
            ..Default::default()
        };
        for _ in 0..MAX_TICKS {
            if state.round > 1 || state.phase == RoundPhase::MatchOver {
                break;
            }
            tick(&mut state, &idle, SIM_DT);
        }
        assert!(state.round > 1 || state.phase == RoundPhase::MatchOver);
    }

    #[test]
    fn test_fire_again_without_reaiming() {
        let mut state = duel(1);
        state.scheduler.cancel(TankId(1));
        state.tanks[1].stun_turns = 1;

        let aim = TickInput {
            aim: Some(LOB),
            ..Default::default()
        };
        let fire = TickInput {
            fire: true,
            ..Default::default()
        };
        tick(&mut state, &aim, SIM_DT);
        tick(&mut state, &fire, SIM_DT);
        assert_eq!(state.phase, RoundPhase::Resolving);
        run_until(&mut state, |s| s.round == 2);

        // Round 2: the barrel is where it was, just press fire
        assert!(state.tanks[0].queued_shot.is_none());
        state.scheduler.cancel(TankId(1));
        state.tanks[1].stun_turns = 1;
        tick(&mut state, &fire, SIM_DT);
        assert_eq!(state.phase, RoundPhase::Resolving);
        assert_eq!(state.projectiles.len(), 1);
        assert_eq!(state.projectiles[0].launch.aim, LOB);
    }

    #[test]
    fn test_leaving_idle_mode_drops_demo_decision() {
        let mut state = duel(1);
        let idle = TickInput {
            idle_mode: true,
            ..Default::default()
        };
        tick(&mut state, &idle, SIM_DT);
        assert!(state.scheduler.is_pending(TankId(0)));

        tick(&mut state, &TickInput::default(), SIM_DT);
        assert!(!state.scheduler.is_pending(TankId(0)));
        assert!(state.scheduler.is_pending(TankId(1)));

        // Long past the demo thinking time: the player never auto-commits
        for _ in 0..300 {
            tick(&mut state, &TickInput::default(), SIM_DT);
        }
        assert!(!state.tanks[0].has_ready_shot());
        assert_eq!(state.phase, RoundPhase::WaitingForShots);
    }

    #[test]
    fn test_determinism() {
        let make = || {
            let config = MatchConfig {
                human_player: false,
                enemy_count: 3,
                seed: 31337,
                ..MatchConfig::default()
            };
            GameState::new(
                config,
                EngineTuning::default(),
                WeaponCatalog::default(),
                WeaponInventory::unlimited_base(),
            )
        };
        let mut state1 = make();
        let mut state2 = make();
        let input = TickInput::default();

        for _ in 0..1200 {
            tick(&mut state1, &input, SIM_DT);
            tick(&mut state2, &input, SIM_DT);
        }

        assert_eq!(state1.time_ticks, state2.time_ticks);
        assert_eq!(state1.round, state2.round);
        assert_eq!(state1.drain_events(), state2.drain_events());
        for (a, b) in state1.tanks.iter().zip(&state2.tanks) {
            assert_eq!(a.health, b.health);
            assert_eq!(a.pos, b.pos);
        }
    }
}
