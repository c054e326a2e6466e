//! Error types
//!
//! The simulation itself never fails: every degenerate input is replaced by a
//! safe default. Errors only surface at the edges, when loading configuration
//! or when a host submits a shot that cannot be accepted.

use thiserror::Error;

use crate::sim::{TankId, WeaponKind};

/// Failure to load or validate configuration
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config file: {0}")]
    Io(#[from] std::io::Error),

    #[error("failed to parse config JSON: {0}")]
    Parse(#[from] serde_json::Error),

    #[error("invalid config: {0}")]
    Invalid(String),
}

/// Why a shot (or aim adjustment) was rejected
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum ShotError {
    #[error("match is over")]
    MatchOver,

    #[error("shots are only accepted while waiting for shots")]
    NotAcceptingShots,

    #[error("unknown tank {0:?}")]
    UnknownTank(TankId),

    #[error("tank {0:?} is destroyed")]
    TankDestroyed(TankId),

    #[error("tank {0:?} is stunned this round")]
    TankStunned(TankId),

    #[error("tank {0:?} has no {1:?} ammo left")]
    OutOfAmmo(TankId, WeaponKind),
}
