//! Artillery Duel - combat simulation engine for a simultaneous-fire tank duel
//!
//! Core modules:
//! - `sim`: Simulation (terrain, ballistics, damage, AI, effects, round flow)
//! - `config`: Match configuration and engine tuning
//! - `inventory`: Per-match weapon ammo accounting
//! - `audio`: Event → sound cue mapping for the host's audio layer

pub mod audio;
pub mod config;
pub mod error;
pub mod inventory;
pub mod sim;

pub use config::{EngineTuning, MatchConfig, TerrainSize};
pub use error::{ConfigError, ShotError};
pub use inventory::WeaponInventory;

use glam::Vec2;

/// Game configuration constants
pub mod consts {
    /// Fixed simulation timestep (60 Hz, one pass per animation frame)
    pub const SIM_DT: f32 = 1.0 / 60.0;
    /// Maximum substeps per frame to prevent spiral of death
    pub const MAX_SUBSTEPS: u32 = 8;

    /// Tank body dimensions (world units)
    pub const TANK_WIDTH: f32 = 24.0;
    pub const TANK_HEIGHT: f32 = 12.0;
    /// Barrel length measured from the top-center of the hull
    pub const BARREL_LENGTH: f32 = 16.0;

    /// Health is always in 0..=MAX_HEALTH
    pub const MAX_HEALTH: f32 = 100.0;

    /// Aim limits (degrees, 0 = right, 90 = straight up, 180 = left)
    pub const MIN_ANGLE: f32 = 0.0;
    pub const MAX_ANGLE: f32 = 180.0;
    /// Power limits (percent of the playfield's muzzle velocity)
    pub const MIN_POWER: f32 = 0.0;
    pub const MAX_POWER: f32 = 100.0;

    /// Number of trace points kept per projectile for trail rendering
    pub const TRACE_LENGTH: usize = 32;
}

/// Unit direction vector for an aim angle in degrees (world space, y up)
#[inline]
pub fn aim_direction(angle_deg: f32) -> Vec2 {
    let rad = angle_deg.to_radians();
    Vec2::new(rad.cos(), rad.sin())
}

/// Convert a world-space point (y up from baseline) to canvas space (y down)
#[inline]
pub fn world_to_canvas(p: Vec2, playfield_height: f32) -> Vec2 {
    Vec2::new(p.x, playfield_height - p.y)
}

/// Clamp an aim to the legal angle/power range
#[inline]
pub fn clamp_aim(angle: f32, power: f32) -> (f32, f32) {
    (
        angle.clamp(consts::MIN_ANGLE, consts::MAX_ANGLE),
        power.clamp(consts::MIN_POWER, consts::MAX_POWER),
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_aim_direction_cardinals() {
        assert!((aim_direction(0.0) - Vec2::X).length() < 1e-5);
        assert!((aim_direction(90.0) - Vec2::Y).length() < 1e-5);
        assert!((aim_direction(180.0) + Vec2::X).length() < 1e-5);
    }

    #[test]
    fn test_world_to_canvas_flips_y() {
        let p = world_to_canvas(Vec2::new(10.0, 30.0), 400.0);
        assert_eq!(p, Vec2::new(10.0, 370.0));
    }

    #[test]
    fn test_clamp_aim() {
        assert_eq!(clamp_aim(-5.0, 150.0), (0.0, 100.0));
        assert_eq!(clamp_aim(45.0, 60.0), (45.0, 60.0));
    }
}
