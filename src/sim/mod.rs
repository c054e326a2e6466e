//! Deterministic simulation module
//!
//! All gameplay logic lives here. This module must be pure and deterministic:
//! - Fixed timestep only
//! - Seeded RNG only
//! - Stable iteration order (by tank ID, then projectile ID)
//! - No rendering, audio or platform dependencies

pub mod ai;
pub mod damage;
pub mod effects;
pub mod events;
pub mod projectile;
pub mod scheduler;
pub mod snapshot;
pub mod state;
pub mod terrain;
pub mod tick;
pub mod weapon;

pub use ai::{DifficultyTier, Insignia, ShotPlan, next_tier, plan_turn, select_target, solve_aim};
pub use damage::{Blast, DamageOutcome, apply_damage, find_hits, resolve_blast, survivors};
pub use effects::{DestructionState, EffectAnimator, EffectId, EffectPhase, ExplosionState, TimedEffect};
pub use events::{GameEvent, MatchOutcome};
pub use projectile::{Ballistics, FlightEvent, Landing, ProjectileState, Trajectory, predict_landing};
pub use scheduler::DecisionScheduler;
pub use snapshot::{ShellView, Snapshot, TankView};
pub use state::{Aim, Controller, GameState, QueuedShot, RoundPhase, TankId, TankState};
pub use terrain::{Playfield, Terrain};
pub use tick::{TickInput, tick};
pub use weapon::{WeaponCatalog, WeaponConfig, WeaponEffects, WeaponKind};
