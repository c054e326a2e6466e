//! Weapon archetypes
//!
//! A closed set of weapon kinds, each carrying plain behavior flags that the
//! projectile simulator and damage resolver consume generically.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::error::ConfigError;

/// Weapon kinds
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default, Serialize, Deserialize,
)]
pub enum WeaponKind {
    /// Base shell, always available and unlimited
    #[default]
    Standard,
    HeavyShell,
    /// Splits into sub-munitions after the arming delay
    Cluster,
    /// Steers toward the nearest enemy while descending
    Homing,
    /// Bounces off terrain before detonating
    Bouncer,
    /// Strips shields and ignores shield absorption
    Emp,
    /// Stuns everything caught in the blast
    Concussion,
}

impl WeaponKind {
    pub const ALL: [WeaponKind; 7] = [
        WeaponKind::Standard,
        WeaponKind::HeavyShell,
        WeaponKind::Cluster,
        WeaponKind::Homing,
        WeaponKind::Bouncer,
        WeaponKind::Emp,
        WeaponKind::Concussion,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            WeaponKind::Standard => "Standard Shell",
            WeaponKind::HeavyShell => "Heavy Shell",
            WeaponKind::Cluster => "Cluster Bomb",
            WeaponKind::Homing => "Homing Missile",
            WeaponKind::Bouncer => "Bouncer",
            WeaponKind::Emp => "EMP",
            WeaponKind::Concussion => "Concussion Shell",
        }
    }

    /// True for the weapon every tank can always fire
    pub fn is_base(&self) -> bool {
        *self == WeaponKind::Standard
    }
}

/// Special behavior flags for a weapon
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct WeaponEffects {
    /// Splits into sub-munitions mid-flight
    pub splits: bool,
    /// Corrects course toward the nearest enemy
    pub homing: bool,
    /// Terrain bounces before detonation (0 = detonate on first contact)
    pub max_bounces: u8,
    /// Zeroes shields and skips shield absorption
    pub bypasses_shield: bool,
    /// Rounds a hit tank must sit out
    pub stun_turns: u8,
}

/// Static stats for one weapon kind
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct WeaponConfig {
    pub damage: f32,
    pub blast_radius: f32,
    pub cost: u32,
    #[serde(default)]
    pub effects: WeaponEffects,
}

impl WeaponConfig {
    /// Built-in stats for a kind
    pub fn builtin(kind: WeaponKind) -> Self {
        let plain = WeaponEffects::default();
        match kind {
            WeaponKind::Standard => Self {
                damage: 35.0,
                blast_radius: 30.0,
                cost: 0,
                effects: plain,
            },
            WeaponKind::HeavyShell => Self {
                damage: 60.0,
                blast_radius: 45.0,
                cost: 400,
                effects: plain,
            },
            WeaponKind::Cluster => Self {
                damage: 30.0,
                blast_radius: 30.0,
                cost: 600,
                effects: WeaponEffects {
                    splits: true,
                    ..plain
                },
            },
            WeaponKind::Homing => Self {
                damage: 40.0,
                blast_radius: 28.0,
                cost: 750,
                effects: WeaponEffects {
                    homing: true,
                    ..plain
                },
            },
            WeaponKind::Bouncer => Self {
                damage: 40.0,
                blast_radius: 32.0,
                cost: 350,
                effects: WeaponEffects {
                    max_bounces: 2,
                    ..plain
                },
            },
            WeaponKind::Emp => Self {
                damage: 10.0,
                blast_radius: 55.0,
                cost: 500,
                effects: WeaponEffects {
                    bypasses_shield: true,
                    ..plain
                },
            },
            WeaponKind::Concussion => Self {
                damage: 15.0,
                blast_radius: 40.0,
                cost: 450,
                effects: WeaponEffects {
                    stun_turns: 1,
                    ..plain
                },
            },
        }
    }
}

/// Immutable weapon table keyed by kind.
///
/// Lookups for a kind missing from the table fall back to the base weapon.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WeaponCatalog {
    weapons: BTreeMap<WeaponKind, WeaponConfig>,
}

impl Default for WeaponCatalog {
    fn default() -> Self {
        Self {
            weapons: WeaponKind::ALL
                .iter()
                .map(|&kind| (kind, WeaponConfig::builtin(kind)))
                .collect(),
        }
    }
}

impl WeaponCatalog {
    /// Build from an explicit (possibly partial) table
    pub fn from_table(weapons: BTreeMap<WeaponKind, WeaponConfig>) -> Self {
        Self { weapons }
    }

    /// Parse a JSON object of `{ "Kind": { damage, blast_radius, cost, effects } }`
    pub fn from_json(json: &str) -> Result<Self, ConfigError> {
        let weapons: BTreeMap<WeaponKind, WeaponConfig> = serde_json::from_str(json)?;
        for (kind, config) in &weapons {
            if config.damage < 0.0 || config.blast_radius < 0.0 {
                return Err(ConfigError::Invalid(format!(
                    "{} has negative damage or blast radius",
                    kind.as_str()
                )));
            }
        }
        Ok(Self::from_table(weapons))
    }

    /// Stats for `kind`, falling back to the base weapon when absent
    pub fn get(&self, kind: WeaponKind) -> WeaponConfig {
        if let Some(config) = self.weapons.get(&kind) {
            return *config;
        }
        log::warn!("No config for {}, using base weapon", kind.as_str());
        self.weapons
            .get(&WeaponKind::Standard)
            .copied()
            .unwrap_or_else(|| WeaponConfig::builtin(WeaponKind::Standard))
    }

    pub fn contains(&self, kind: WeaponKind) -> bool {
        self.weapons.contains_key(&kind)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_catalog_has_every_kind() {
        let catalog = WeaponCatalog::default();
        for kind in WeaponKind::ALL {
            assert!(catalog.contains(kind));
        }
        assert!(catalog.get(WeaponKind::Cluster).effects.splits);
        assert!(catalog.get(WeaponKind::Emp).effects.bypasses_shield);
        assert_eq!(catalog.get(WeaponKind::Standard).cost, 0);
    }

    #[test]
    fn test_missing_kind_falls_back_to_base() {
        let catalog = WeaponCatalog::from_json(
            r#"{ "Standard": { "damage": 20.0, "blast_radius": 25.0, "cost": 0 } }"#,
        )
        .expect("valid catalog");
        let homing = catalog.get(WeaponKind::Homing);
        assert_eq!(homing.damage, 20.0);
        assert!(!homing.effects.homing);
    }

    #[test]
    fn test_empty_catalog_uses_builtin_base() {
        let catalog = WeaponCatalog::from_table(BTreeMap::new());
        assert_eq!(
            catalog.get(WeaponKind::Emp),
            WeaponConfig::builtin(WeaponKind::Standard)
        );
    }

    #[test]
    fn test_negative_damage_rejected() {
        let err = WeaponCatalog::from_json(
            r#"{ "HeavyShell": { "damage": -5.0, "blast_radius": 10.0, "cost": 1 } }"#,
        )
        .unwrap_err();
        assert!(matches!(err, ConfigError::Invalid(_)));
    }
}
