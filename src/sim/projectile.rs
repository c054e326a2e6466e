//! Projectile flight
//!
//! Base flight is the closed-form parabola under gravity plus a constant wind
//! acceleration, so `position_at` needs no integration. Weapon behaviors are
//! layered on top:
//! - homing adds an accumulated lateral correction
//! - bouncing restarts the parabola from the contact point
//! - cluster shells split into plain sub-munitions after the arming delay

use glam::Vec2;
use serde::{Deserialize, Serialize};

use super::state::{Aim, TankId, TankState};
use super::terrain::{Playfield, Terrain, is_out_of_bounds};
use super::weapon::{WeaponEffects, WeaponKind};
use crate::config::EngineTuning;
use crate::consts::*;

/// Bisection steps used to pin down the terrain contact between two ticks
const CONTACT_REFINE_STEPS: u32 = 10;
/// Bounces slower than this (vertical, after restitution) detonate instead
const MIN_BOUNCE_SPEED: f32 = 25.0;
/// Homing only steers while this far (horizontally) from the target
const HOMING_DEADZONE: f32 = 2.0;

/// Physical environment for one round
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Ballistics {
    pub gravity: f32,
    /// Round wind (signed, positive pushes right)
    pub wind: f32,
    /// Lateral acceleration per unit of wind
    pub wind_acceleration: f32,
    pub muzzle_speed_factor: f32,
    pub playfield: Playfield,
}

impl Ballistics {
    pub fn new(tuning: &EngineTuning, playfield: Playfield, wind: f32) -> Self {
        Self {
            gravity: tuning.gravity,
            wind,
            wind_acceleration: tuning.wind_acceleration,
            muzzle_speed_factor: tuning.muzzle_speed_factor,
            playfield,
        }
    }

    /// Constant acceleration acting on every shell this round
    #[inline]
    pub fn acceleration(&self) -> Vec2 {
        Vec2::new(self.wind * self.wind_acceleration, -self.gravity)
    }

    /// Muzzle speed for a power percentage.
    ///
    /// Full power on flat ground without wind carries a little further than
    /// the playfield width, whatever its size.
    pub fn muzzle_speed(&self, power: f32) -> f32 {
        let full = (self.gravity * self.playfield.width.max(1.0)).sqrt() * self.muzzle_speed_factor;
        full * (power / MAX_POWER).clamp(0.0, 1.0)
    }

    /// Initial velocity for an aim (standard angle/power decomposition)
    pub fn launch_velocity(&self, aim: Aim) -> Vec2 {
        crate::aim_direction(aim.angle) * self.muzzle_speed(aim.power)
    }
}

/// One parabolic flight segment
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Trajectory {
    pub origin: Vec2,
    pub velocity: Vec2,
    pub acceleration: Vec2,
    /// Sim time at which this segment starts
    pub start: f32,
}

impl Trajectory {
    pub fn new(origin: Vec2, velocity: Vec2, acceleration: Vec2, start: f32) -> Self {
        Self {
            origin,
            velocity,
            acceleration,
            start,
        }
    }

    /// Closed-form position; times before `start` clamp to the origin
    #[inline]
    pub fn position_at(&self, now: f32) -> Vec2 {
        let t = (now - self.start).max(0.0);
        self.origin + self.velocity * t + 0.5 * self.acceleration * t * t
    }

    #[inline]
    pub fn velocity_at(&self, now: f32) -> Vec2 {
        let t = (now - self.start).max(0.0);
        self.velocity + self.acceleration * t
    }
}

/// Check whether a shell at `p` has landed
#[inline]
pub fn check_landing(p: Vec2, playfield: Playfield, terrain_height: f32) -> bool {
    is_out_of_bounds(p, playfield.width, terrain_height)
}

#[inline]
fn landed(terrain: &Terrain, p: Vec2) -> bool {
    check_landing(p, terrain.playfield(), terrain.height_at(p.x))
}

/// Earliest time in (t_in, t_out] at which `pos` is out of bounds
fn refine_contact(
    pos: impl Fn(f32) -> Vec2,
    terrain: &Terrain,
    mut t_in: f32,
    mut t_out: f32,
) -> f32 {
    for _ in 0..CONTACT_REFINE_STEPS {
        let mid = 0.5 * (t_in + t_out);
        if landed(terrain, pos(mid)) {
            t_out = mid;
        } else {
            t_in = mid;
        }
    }
    t_out
}

/// Impact point for a shell that went out of bounds at `p`.
///
/// Below-surface contacts snap up to the surface; side exits keep their
/// altitude.
fn impact_point(p: Vec2, terrain: &Terrain) -> Vec2 {
    let x = p.x.clamp(0.0, terrain.playfield().width);
    Vec2::new(x, p.y.max(terrain.height_at(x)).max(0.0))
}

fn record_trace(trace: &mut Vec<Vec2>, p: Vec2) {
    trace.insert(0, p);
    if trace.len() > TRACE_LENGTH {
        trace.pop();
    }
}

/// Predict where a plain (no homing/bounce/split) shell comes down.
///
/// Steps the closed form at the sim rate and refines the contact. Returns
/// `None` if it is still airborne after `max_time` seconds.
pub fn predict_landing(
    origin: Vec2,
    velocity: Vec2,
    ballistics: &Ballistics,
    terrain: &Terrain,
    max_time: f32,
) -> Option<Vec2> {
    let trajectory = Trajectory::new(origin, velocity, ballistics.acceleration(), 0.0);
    let mut prev = 0.0;
    let mut t = SIM_DT;
    while t <= max_time {
        if landed(terrain, trajectory.position_at(t)) {
            let hit = refine_contact(|s| trajectory.position_at(s), terrain, prev, t);
            return Some(impact_point(trajectory.position_at(hit), terrain));
        }
        prev = t;
        t += SIM_DT;
    }
    None
}

/// Launch parameters captured when the shell leaves the barrel
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct LaunchParams {
    pub aim: Aim,
    /// Wind in effect for the round
    pub wind: f32,
    pub origin: Vec2,
    pub velocity: Vec2,
}

/// Accumulated homing correction layered over the base parabola
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct HomingState {
    pub offset: Vec2,
    pub velocity: Vec2,
    /// Last known target position
    pub target: Option<Vec2>,
}

/// Cluster child: plain ballistic flight, never splits again
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SubProjectile {
    pub index: u8,
    pub trajectory: Trajectory,
    pub position: Vec2,
    pub trace: Vec<Vec2>,
    pub active: bool,
}

impl SubProjectile {
    fn advance(&mut self, now: f32, prev_time: f32, terrain: &Terrain) -> Option<Vec2> {
        if !self.active {
            return None;
        }
        let pos = self.trajectory.position_at(now);
        self.position = pos;
        record_trace(&mut self.trace, pos);
        if !landed(terrain, pos) {
            return None;
        }
        self.active = false;
        let traj = self.trajectory;
        let t_in = prev_time.max(traj.start);
        let hit = if landed(terrain, traj.position_at(t_in)) {
            now
        } else {
            refine_contact(|s| traj.position_at(s), terrain, t_in, now)
        };
        let point = impact_point(traj.position_at(hit), terrain);
        self.position = point;
        Some(point)
    }
}

/// A shell coming down
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Landing {
    pub projectile: u32,
    pub owner: TankId,
    pub weapon: WeaponKind,
    pub point: Vec2,
    /// Blast radius and damage multiplier (1.0 for primaries)
    pub scale: f32,
    /// Sub-munition index for cluster children
    pub sub_index: Option<u8>,
}

/// Things that happened to a projectile during one tick
#[derive(Debug, Clone, PartialEq)]
pub enum FlightEvent {
    Landed(Landing),
    Split { projectile: u32, point: Vec2, count: u8 },
    Bounced { projectile: u32, point: Vec2 },
    /// Flew past the lifetime ceiling without landing
    Expired { projectile: u32 },
}

/// Per-tick inputs a projectile needs besides its own state
pub struct FlightContext<'a> {
    pub terrain: &'a Terrain,
    pub tuning: &'a EngineTuning,
    /// Body centers of living tanks (homing targets)
    pub tanks: &'a [(TankId, Vec2)],
}

/// A shell in flight
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProjectileState {
    pub id: u32,
    pub owner: TankId,
    pub weapon: WeaponKind,
    pub effects: WeaponEffects,
    pub launch_time: f32,
    pub launch: LaunchParams,
    /// Current flight segment (replaced on bounce)
    pub trajectory: Trajectory,
    pub homing: Option<HomingState>,
    pub bounces: u8,
    pub position: Vec2,
    /// Recent positions, newest first (rendering only)
    pub trace: Vec<Vec2>,
    pub active: bool,
    pub has_split: bool,
    pub sub_projectiles: Vec<SubProjectile>,
    /// Sim time of the previous advance
    last_time: f32,
}

impl ProjectileState {
    /// Launch a shell from a tank's muzzle using its current aim
    pub fn launch(
        id: u32,
        tank: &TankState,
        aim: Aim,
        weapon: WeaponKind,
        effects: WeaponEffects,
        launch_time: f32,
        ballistics: &Ballistics,
    ) -> Self {
        let origin = tank.muzzle(aim);
        let velocity = ballistics.launch_velocity(aim);
        let trajectory = Trajectory::new(origin, velocity, ballistics.acceleration(), launch_time);
        Self {
            id,
            owner: tank.id,
            weapon,
            effects,
            launch_time,
            launch: LaunchParams {
                aim,
                wind: ballistics.wind,
                origin,
                velocity,
            },
            trajectory,
            homing: effects.homing.then(HomingState::default),
            bounces: 0,
            position: origin,
            trace: vec![origin],
            active: true,
            has_split: false,
            sub_projectiles: Vec::new(),
            last_time: launch_time,
        }
    }

    /// Position of the primary shell at `now`
    pub fn position_at(&self, now: f32) -> Vec2 {
        let offset = self.homing.map(|h| h.offset).unwrap_or(Vec2::ZERO);
        self.trajectory.position_at(now) + offset
    }

    fn velocity_at(&self, now: f32) -> Vec2 {
        let extra = self.homing.map(|h| h.velocity).unwrap_or(Vec2::ZERO);
        self.trajectory.velocity_at(now) + extra
    }

    /// True once the primary and every sub-munition are down
    pub fn is_finished(&self) -> bool {
        !self.active && self.sub_projectiles.iter().all(|s| !s.active)
    }

    /// Advance the shell (and any sub-munitions) to `now`
    pub fn advance(&mut self, now: f32, dt: f32, ctx: &FlightContext) -> Vec<FlightEvent> {
        let mut events = Vec::new();
        let prev_time = self.last_time;
        self.last_time = now;

        if now - self.launch_time >= ctx.tuning.projectile_lifetime {
            if !self.is_finished() {
                log::warn!(
                    "Projectile {} exceeded {:.0}s flight ceiling, dropping it",
                    self.id,
                    ctx.tuning.projectile_lifetime
                );
                self.active = false;
                for sub in &mut self.sub_projectiles {
                    sub.active = false;
                }
                events.push(FlightEvent::Expired {
                    projectile: self.id,
                });
            }
            return events;
        }

        if self.active {
            self.advance_primary(now, dt, prev_time, ctx, &mut events);
        }

        let scale = ctx.tuning.cluster.scale;
        for sub in &mut self.sub_projectiles {
            if let Some(point) = sub.advance(now, prev_time, ctx.terrain) {
                events.push(FlightEvent::Landed(Landing {
                    projectile: self.id,
                    owner: self.owner,
                    weapon: self.weapon,
                    point,
                    scale,
                    sub_index: Some(sub.index),
                }));
            }
        }

        events
    }

    fn advance_primary(
        &mut self,
        now: f32,
        dt: f32,
        prev_time: f32,
        ctx: &FlightContext,
        events: &mut Vec<FlightEvent>,
    ) {
        let cluster = ctx.tuning.cluster;
        if self.effects.splits && !self.has_split && now - self.launch_time >= cluster.arming_delay {
            let point = self.position_at(now);
            if !landed(ctx.terrain, point) {
                self.split(now, point, ctx);
                events.push(FlightEvent::Split {
                    projectile: self.id,
                    point,
                    count: cluster.count,
                });
                return;
            }
        }

        if self.homing.is_some() {
            self.steer(now, dt, ctx);
        }

        let pos = self.position_at(now);
        self.position = pos;
        record_trace(&mut self.trace, pos);

        if !landed(ctx.terrain, pos) {
            return;
        }

        let t_in = prev_time.max(self.trajectory.start);
        let hit_time = if landed(ctx.terrain, self.position_at(t_in)) {
            now
        } else {
            refine_contact(|s| self.position_at(s), ctx.terrain, t_in, now)
        };
        let point = impact_point(self.position_at(hit_time), ctx.terrain);
        let width = ctx.terrain.playfield().width;
        let on_terrain = pos.x >= 0.0 && pos.x <= width;

        if on_terrain && self.bounces < self.effects.max_bounces {
            let incoming = self.velocity_at(hit_time);
            let rebound = incoming.y.abs() * ctx.tuning.bounce_restitution;
            if rebound >= MIN_BOUNCE_SPEED {
                self.bounce(point, Vec2::new(incoming.x, rebound), now);
                events.push(FlightEvent::Bounced {
                    projectile: self.id,
                    point,
                });
                return;
            }
        }

        self.active = false;
        self.position = point;
        events.push(FlightEvent::Landed(Landing {
            projectile: self.id,
            owner: self.owner,
            weapon: self.weapon,
            point,
            scale: 1.0,
            sub_index: None,
        }));
    }

    /// Restart the parabola from a terrain contact
    fn bounce(&mut self, point: Vec2, velocity: Vec2, now: f32) {
        // Lift clear of the surface so the next tick doesn't re-trigger contact
        let origin = point + Vec2::Y * 0.5;
        self.trajectory = Trajectory::new(origin, velocity, self.trajectory.acceleration, now);
        if let Some(homing) = &mut self.homing {
            homing.offset = Vec2::ZERO;
            homing.velocity = Vec2::ZERO;
        }
        self.bounces += 1;
        self.position = origin;
    }

    /// Nudge the homing correction toward the nearest other living tank
    fn steer(&mut self, now: f32, dt: f32, ctx: &FlightContext) {
        let pos = self.position_at(now);
        let descending = self.trajectory.velocity_at(now).y < 0.0;
        let owner = self.owner;
        let nearest = ctx
            .tanks
            .iter()
            .filter(|(id, _)| *id != owner)
            .map(|(_, center)| *center)
            .min_by(|a, b| {
                a.distance_squared(pos)
                    .partial_cmp(&b.distance_squared(pos))
                    .unwrap_or(std::cmp::Ordering::Equal)
            });

        let Some(homing) = &mut self.homing else {
            return;
        };
        if let Some(target) = nearest {
            homing.target = Some(target);
        }
        let Some(target) = homing.target else {
            return;
        };
        if !descending {
            return;
        }

        let dx = target.x - pos.x;
        if dx.abs() > HOMING_DEADZONE {
            let strength = (dx.abs() / 50.0).min(1.0);
            homing.velocity.x += dx.signum() * ctx.tuning.homing_acceleration * strength * dt;
        } else {
            homing.velocity.x *= 0.5;
        }
        let max = ctx.tuning.homing_max_speed;
        homing.velocity.x = homing.velocity.x.clamp(-max, max);
        homing.offset += homing.velocity * dt;
    }

    /// Retire the primary and fan out sub-munitions from `point`
    fn split(&mut self, now: f32, point: Vec2, ctx: &FlightContext) {
        let cluster = ctx.tuning.cluster;
        let velocity = self.velocity_at(now);
        let acceleration = self.trajectory.acceleration;
        let center = (cluster.count as f32 - 1.0) * 0.5;

        self.sub_projectiles = (0..cluster.count)
            .map(|i| {
                let spread = (i as f32 - center) * cluster.spread;
                let v = velocity + Vec2::new(spread, -spread.abs() * 0.2);
                SubProjectile {
                    index: i,
                    trajectory: Trajectory::new(point, v, acceleration, now),
                    position: point,
                    trace: vec![point],
                    active: true,
                }
            })
            .collect();

        self.has_split = true;
        self.active = false;
        self.position = point;
        log::debug!(
            "Projectile {} split into {} at ({:.1}, {:.1})",
            self.id,
            cluster.count,
            point.x,
            point.y
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sim::state::Controller;
    use crate::sim::weapon::WeaponConfig;
    use crate::inventory::WeaponInventory;
    use proptest::prelude::*;

    fn playfield() -> Playfield {
        Playfield::new(960.0, 540.0)
    }

    fn ballistics(wind: f32) -> Ballistics {
        Ballistics::new(&EngineTuning::default(), playfield(), wind)
    }

    fn tank_at(x: f32, ground: f32) -> TankState {
        TankState::new(
            TankId(0),
            Controller::Human,
            Vec2::new(x, ground),
            100.0,
            0.0,
            100.0,
            WeaponInventory::unlimited_base(),
        )
    }

    fn fire(
        kind: WeaponKind,
        aim: Aim,
        terrain: &Terrain,
        tuning: &EngineTuning,
        tanks: &[(TankId, Vec2)],
    ) -> (ProjectileState, Vec<FlightEvent>) {
        let tank = tank_at(100.0, terrain.height_at(100.0));
        let b = Ballistics::new(tuning, terrain.playfield(), 0.0);
        let effects = WeaponConfig::builtin(kind).effects;
        let mut p = ProjectileState::launch(1, &tank, aim, kind, effects, 0.0, &b);
        let ctx = FlightContext {
            terrain,
            tuning,
            tanks,
        };
        let mut events = Vec::new();
        let mut now = 0.0;
        while !p.is_finished() && now < 60.0 {
            now += SIM_DT;
            events.extend(p.advance(now, SIM_DT, &ctx));
        }
        (p, events)
    }

    fn landings(events: &[FlightEvent]) -> Vec<Landing> {
        events
            .iter()
            .filter_map(|e| match e {
                FlightEvent::Landed(l) => Some(*l),
                _ => None,
            })
            .collect()
    }

    #[test]
    fn test_position_at_launch_is_origin() {
        let tank = tank_at(200.0, 100.0);
        let aim = Aim::new(60.0, 70.0);
        let b = ballistics(3.0);
        let p = ProjectileState::launch(
            1,
            &tank,
            aim,
            WeaponKind::Standard,
            WeaponEffects::default(),
            5.0,
            &b,
        );
        assert_eq!(p.position_at(5.0), tank.muzzle(aim));
    }

    #[test]
    fn test_flat_shot_drops_under_gravity() {
        let b = ballistics(0.0);
        let traj = Trajectory::new(
            Vec2::new(0.0, 100.0),
            b.launch_velocity(Aim::new(0.0, 50.0)),
            b.acceleration(),
            0.0,
        );
        let p1 = traj.position_at(0.5);
        let p2 = traj.position_at(1.0);
        assert!(p2.x > p1.x && p1.x > 0.0);
        assert!(p2.y < p1.y && p1.y < 100.0);
        // Exact parabola
        assert!((p1.y - (100.0 - 0.5 * b.gravity * 0.25)).abs() < 1e-3);
    }

    #[test]
    fn test_landing_x_monotonic_in_power() {
        let terrain = Terrain::flat(playfield(), 50.0);
        let b = ballistics(0.0);
        let origin = Vec2::new(50.0, 70.0);
        let mut last = f32::MIN;
        for power in (10..=100).step_by(10) {
            let v = b.launch_velocity(Aim::new(45.0, power as f32));
            if let Some(hit) = predict_landing(origin, v, &b, &terrain, 30.0) {
                assert!(hit.x >= last, "power {power} landed at {} < {last}", hit.x);
                last = hit.x;
            }
        }
    }

    #[test]
    fn test_wind_pushes_landing_downwind() {
        let terrain = Terrain::flat(playfield(), 50.0);
        let origin = Vec2::new(400.0, 70.0);
        let aim = Aim::new(80.0, 50.0);
        let calm = ballistics(0.0);
        let windy = ballistics(8.0);
        let a = predict_landing(origin, calm.launch_velocity(aim), &calm, &terrain, 30.0).unwrap();
        let b = predict_landing(origin, windy.launch_velocity(aim), &windy, &terrain, 30.0).unwrap();
        assert!(b.x > a.x);
    }

    #[test]
    fn test_check_landing_bounds() {
        let pf = playfield();
        assert!(!check_landing(Vec2::new(100.0, 51.0), pf, 50.0));
        assert!(check_landing(Vec2::new(100.0, 50.0), pf, 50.0));
        assert!(check_landing(Vec2::new(-1.0, 200.0), pf, 50.0));
        assert!(check_landing(Vec2::new(pf.width + 1.0, 200.0), pf, 50.0));
        // Above the top edge is still in flight
        assert!(!check_landing(Vec2::new(100.0, pf.height * 3.0), pf, 50.0));
    }

    #[test]
    fn test_landing_snaps_to_surface() {
        let terrain = Terrain::flat(playfield(), 50.0);
        let (p, events) = fire(
            WeaponKind::Standard,
            Aim::new(60.0, 40.0),
            &terrain,
            &EngineTuning::default(),
            &[],
        );
        let hits = landings(&events);
        assert_eq!(hits.len(), 1);
        assert!((hits[0].point.y - 50.0).abs() < 1e-3);
        assert_eq!(hits[0].scale, 1.0);
        assert!(p.is_finished());
    }

    #[test]
    fn test_cluster_splits_and_children_do_not_split() {
        let terrain = Terrain::flat(playfield(), 50.0);
        let tuning = EngineTuning::default();
        let (p, events) = fire(WeaponKind::Cluster, Aim::new(70.0, 70.0), &terrain, &tuning, &[]);

        let splits = events
            .iter()
            .filter(|e| matches!(e, FlightEvent::Split { .. }))
            .count();
        assert_eq!(splits, 1);
        assert!(p.has_split);

        let hits = landings(&events);
        assert_eq!(hits.len(), tuning.cluster.count as usize);
        for hit in &hits {
            assert!(hit.sub_index.is_some());
            assert!((hit.scale - 0.6).abs() < 1e-6);
        }
        // No primary explosion
        assert!(hits.iter().all(|h| h.sub_index.is_some()));
    }

    #[test]
    fn test_cluster_landing_before_arming_is_primary() {
        let terrain = Terrain::flat(playfield(), 50.0);
        let (p, events) = fire(
            WeaponKind::Cluster,
            Aim::new(10.0, 15.0),
            &terrain,
            &EngineTuning::default(),
            &[],
        );
        let hits = landings(&events);
        assert_eq!(hits.len(), 1);
        assert_eq!(hits[0].sub_index, None);
        assert!(!p.has_split);
    }

    #[test]
    fn test_bouncer_bounces_then_lands_once() {
        let terrain = Terrain::flat(playfield(), 50.0);
        let (p, events) = fire(
            WeaponKind::Bouncer,
            Aim::new(60.0, 45.0),
            &terrain,
            &EngineTuning::default(),
            &[],
        );
        let bounces = events
            .iter()
            .filter(|e| matches!(e, FlightEvent::Bounced { .. }))
            .count();
        assert!(bounces >= 1 && bounces <= 2);
        assert_eq!(p.bounces as usize, bounces);
        assert_eq!(landings(&events).len(), 1);
    }

    #[test]
    fn test_homing_lands_closer_than_plain_shot() {
        let terrain = Terrain::flat(playfield(), 50.0);
        let tuning = EngineTuning::default();
        let aim = Aim::new(55.0, 45.0);
        let (_, plain) = fire(WeaponKind::Standard, aim, &terrain, &tuning, &[]);
        let plain_x = landings(&plain)[0].point.x;

        let target = Vec2::new(plain_x + 80.0, 56.0);
        let (_, homed) = fire(
            WeaponKind::Homing,
            aim,
            &terrain,
            &tuning,
            &[(TankId(1), target)],
        );
        let homed_x = landings(&homed)[0].point.x;
        assert!((homed_x - target.x).abs() < (plain_x - target.x).abs());
    }

    #[test]
    fn test_lifetime_ceiling_expires_shell() {
        let terrain = Terrain::flat(playfield(), 50.0);
        let tuning = EngineTuning {
            projectile_lifetime: 0.2,
            ..EngineTuning::default()
        };
        let (p, events) = fire(WeaponKind::Standard, Aim::new(90.0, 100.0), &terrain, &tuning, &[]);
        assert!(p.is_finished());
        assert!(events
            .iter()
            .any(|e| matches!(e, FlightEvent::Expired { .. })));
        assert!(landings(&events).is_empty());
    }

    proptest! {
        #[test]
        fn prop_position_at_launch_time_is_origin(
            angle in 0.0f32..180.0,
            power in 0.0f32..100.0,
            wind in -10.0f32..10.0,
            start in 0.0f32..100.0,
        ) {
            let b = ballistics(wind);
            let origin = Vec2::new(300.0, 200.0);
            let traj = Trajectory::new(origin, b.launch_velocity(Aim::new(angle, power)), b.acceleration(), start);
            prop_assert_eq!(traj.position_at(start), origin);
        }

        #[test]
        fn prop_position_continuous_in_time(
            angle in 0.0f32..180.0,
            power in 0.0f32..100.0,
            wind in -10.0f32..10.0,
            t in 0.0f32..5.0,
        ) {
            let b = ballistics(wind);
            let traj = Trajectory::new(Vec2::ZERO, b.launch_velocity(Aim::new(angle, power)), b.acceleration(), 0.0);
            let eps = 1e-3;
            let d = traj.position_at(t + eps).distance(traj.position_at(t));
            let speed = traj.velocity_at(t).length() + traj.acceleration.length() * eps;
            prop_assert!(d <= speed * eps * 1.01 + 1e-2);
        }
    }
}
