//! Match configuration and engine tuning
//!
//! Handed over by the screen-flow shell when a match starts. Both structs are
//! plain serde data so the shell can persist or ship them however it likes.

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::ConfigError;
use crate::sim::DifficultyTier;

/// Maximum number of AI opponents in a single match
pub const MAX_ENEMIES: u8 = 7;

/// Playfield size presets
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
pub enum TerrainSize {
    Small,
    #[default]
    Medium,
    Large,
}

impl TerrainSize {
    pub fn as_str(&self) -> &'static str {
        match self {
            TerrainSize::Small => "Small",
            TerrainSize::Medium => "Medium",
            TerrainSize::Large => "Large",
        }
    }

    pub fn from_str(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "small" | "s" => Some(TerrainSize::Small),
            "medium" | "med" | "m" => Some(TerrainSize::Medium),
            "large" | "l" => Some(TerrainSize::Large),
            _ => None,
        }
    }

    /// Playfield (width, height) in world units
    pub fn dimensions(&self) -> (f32, f32) {
        match self {
            TerrainSize::Small => (640.0, 360.0),
            TerrainSize::Medium => (960.0, 540.0),
            TerrainSize::Large => (1280.0, 720.0),
        }
    }
}

/// Per-match configuration from the screen-flow shell
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct MatchConfig {
    /// Playfield size preset
    pub terrain_size: TerrainSize,
    /// Number of AI opponents
    pub enemy_count: u8,
    /// Skill tier of every AI opponent
    pub difficulty: DifficultyTier,
    /// Player tank color (RGB), passed through to snapshots
    pub player_color: [u8; 3],
    /// Seed for terrain, spawn jitter, wind and AI error
    pub seed: u64,
    /// Whether tank 0 waits for host input (false = AI plays it too)
    pub human_player: bool,
}

impl Default for MatchConfig {
    fn default() -> Self {
        Self {
            terrain_size: TerrainSize::Medium,
            enemy_count: 1,
            difficulty: DifficultyTier::Veteran,
            player_color: [64, 160, 64],
            seed: 0x5eed,
            human_player: true,
        }
    }
}

impl MatchConfig {
    /// Parse from JSON (missing fields take defaults) and validate
    pub fn from_json(json: &str) -> Result<Self, ConfigError> {
        let config: Self = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    /// Load from a JSON file on disk
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let json = std::fs::read_to_string(path)?;
        Self::from_json(&json)
    }

    /// Load from disk, falling back to defaults on any failure
    pub fn load_or_default(path: impl AsRef<Path>) -> Self {
        let path = path.as_ref();
        match Self::load(path) {
            Ok(config) => {
                log::info!("Loaded match config from {}", path.display());
                config
            }
            Err(err) => {
                log::warn!("Using default match config ({}): {}", path.display(), err);
                Self::default()
            }
        }
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.enemy_count == 0 {
            return Err(ConfigError::Invalid("enemy_count must be at least 1".into()));
        }
        if self.enemy_count > MAX_ENEMIES {
            return Err(ConfigError::Invalid(format!(
                "enemy_count must be at most {MAX_ENEMIES}"
            )));
        }
        Ok(())
    }

    /// Total tanks in the match (player + enemies)
    pub fn tank_count(&self) -> usize {
        1 + self.enemy_count as usize
    }
}

/// Cluster munition tuning
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ClusterTuning {
    /// Seconds after launch before a cluster shell may split
    pub arming_delay: f32,
    /// Sub-munitions spawned per split
    pub count: u8,
    /// Horizontal velocity spread between neighbouring sub-munitions
    pub spread: f32,
    /// Blast radius and damage multiplier for sub-munition explosions
    pub scale: f32,
}

impl Default for ClusterTuning {
    fn default() -> Self {
        Self {
            arming_delay: 0.9,
            count: 5,
            spread: 28.0,
            scale: 0.6,
        }
    }
}

/// Physics and effect knobs for the simulation
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineTuning {
    /// Downward acceleration (world units/s²)
    pub gravity: f32,
    /// Wind is drawn per round in [-max_wind, max_wind]
    pub max_wind: f32,
    /// Lateral acceleration per unit of wind (world units/s²)
    pub wind_acceleration: f32,
    /// Muzzle speed at 100% power, relative to the flat-ground range speed
    pub muzzle_speed_factor: f32,
    /// Maximum shield charge
    pub max_shield: f32,
    /// Shield charge every tank starts the match with
    pub starting_shield: f32,
    /// Fuel every tank starts the match with
    pub starting_fuel: f32,
    /// Hard ceiling on a projectile's flight time (seconds)
    pub projectile_lifetime: f32,
    /// Explosion animation length (seconds)
    pub explosion_duration: f32,
    /// Tank destruction animation length (seconds)
    pub destruction_duration: f32,
    /// Impacts closer than this to a tank's body center count as direct hits
    pub direct_hit_radius: f32,
    /// Lateral steering acceleration of homing shells (world units/s²)
    pub homing_acceleration: f32,
    /// Cap on the accumulated homing correction speed
    pub homing_max_speed: f32,
    /// Fraction of vertical speed kept on each bounce
    pub bounce_restitution: f32,
    pub cluster: ClusterTuning,
}

impl Default for EngineTuning {
    fn default() -> Self {
        Self {
            gravity: 300.0,
            max_wind: 10.0,
            wind_acceleration: 6.0,
            muzzle_speed_factor: 1.1,
            max_shield: 100.0,
            starting_shield: 0.0,
            starting_fuel: 100.0,
            projectile_lifetime: 30.0,
            explosion_duration: 0.9,
            destruction_duration: 2.0,
            direct_hit_radius: 10.0,
            homing_acceleration: 180.0,
            homing_max_speed: 120.0,
            bounce_restitution: 0.6,
            cluster: ClusterTuning::default(),
        }
    }
}

impl EngineTuning {
    /// Parse from JSON (missing fields take defaults) and validate
    pub fn from_json(json: &str) -> Result<Self, ConfigError> {
        let tuning: Self = serde_json::from_str(json)?;
        tuning.validate()?;
        Ok(tuning)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.gravity <= 0.0 {
            return Err(ConfigError::Invalid("gravity must be positive".into()));
        }
        if self.max_wind < 0.0 {
            return Err(ConfigError::Invalid("max_wind must not be negative".into()));
        }
        if self.projectile_lifetime <= 0.0 {
            return Err(ConfigError::Invalid(
                "projectile_lifetime must be positive".into(),
            ));
        }
        if !(0.0..=1.0).contains(&self.bounce_restitution) {
            return Err(ConfigError::Invalid(
                "bounce_restitution must be within 0..=1".into(),
            ));
        }
        if self.cluster.count == 0 {
            return Err(ConfigError::Invalid("cluster.count must be at least 1".into()));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_terrain_size_from_str() {
        assert_eq!(TerrainSize::from_str("LARGE"), Some(TerrainSize::Large));
        assert_eq!(TerrainSize::from_str("med"), Some(TerrainSize::Medium));
        assert_eq!(TerrainSize::from_str("huge"), None);
    }

    #[test]
    fn test_partial_json_takes_defaults() {
        let config = MatchConfig::from_json(r#"{ "enemy_count": 3, "difficulty": "Expert" }"#)
            .expect("valid config");
        assert_eq!(config.enemy_count, 3);
        assert_eq!(config.difficulty, DifficultyTier::Expert);
        assert_eq!(config.terrain_size, TerrainSize::Medium);
        assert_eq!(config.tank_count(), 4);
    }

    #[test]
    fn test_invalid_enemy_count_rejected() {
        let err = MatchConfig::from_json(r#"{ "enemy_count": 0 }"#).unwrap_err();
        assert!(matches!(err, ConfigError::Invalid(_)));
        let err = MatchConfig::from_json(r#"{ "enemy_count": 12 }"#).unwrap_err();
        assert!(matches!(err, ConfigError::Invalid(_)));
    }

    #[test]
    fn test_malformed_json_is_parse_error() {
        let err = EngineTuning::from_json("{ gravity: ").unwrap_err();
        assert!(matches!(err, ConfigError::Parse(_)));
    }

    #[test]
    fn test_tuning_validation() {
        let err = EngineTuning::from_json(r#"{ "gravity": -1.0 }"#).unwrap_err();
        assert!(matches!(err, ConfigError::Invalid(_)));
        let tuning = EngineTuning::from_json(r#"{ "cluster": { "count": 3 } }"#).unwrap();
        assert_eq!(tuning.cluster.count, 3);
        assert!((tuning.cluster.scale - 0.6).abs() < 1e-6);
    }

    #[test]
    fn test_load_or_default_missing_file() {
        let config = MatchConfig::load_or_default("/nonexistent/artillery/config.json");
        assert_eq!(config.enemy_count, MatchConfig::default().enemy_count);
    }
}
