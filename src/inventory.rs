//! Weapon inventory
//!
//! A snapshot of remaining ammo per weapon kind, copied into the match when
//! the shop is confirmed. The engine decrements it as shots launch and
//! reports each consumption as an event; committing the new counts back to
//! the player profile is the persistence layer's job.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::sim::WeaponKind;

/// Tried to spend a weapon with no ammo left
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
#[error("no {0:?} ammo left")]
pub struct OutOfAmmo(pub WeaponKind);

/// Remaining ammo per weapon kind (the base weapon is always unlimited)
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
pub struct WeaponInventory {
    counts: BTreeMap<WeaponKind, u32>,
}

impl WeaponInventory {
    /// Only the base weapon
    pub fn unlimited_base() -> Self {
        Self::default()
    }

    /// Build from a persisted snapshot; entries for the base weapon are ignored
    pub fn from_counts(counts: impl IntoIterator<Item = (WeaponKind, u32)>) -> Self {
        Self {
            counts: counts
                .into_iter()
                .filter(|(kind, count)| !kind.is_base() && *count > 0)
                .collect(),
        }
    }

    /// Remaining count, `None` meaning unlimited
    pub fn remaining(&self, kind: WeaponKind) -> Option<u32> {
        if kind.is_base() {
            return None;
        }
        Some(self.counts.get(&kind).copied().unwrap_or(0))
    }

    /// Whether at least one shot of `kind` is available
    pub fn has(&self, kind: WeaponKind) -> bool {
        self.remaining(kind).is_none_or(|n| n > 0)
    }

    /// Spend one shot, returning the new remaining count (`None` = unlimited)
    pub fn consume(&mut self, kind: WeaponKind) -> Result<Option<u32>, OutOfAmmo> {
        if kind.is_base() {
            return Ok(None);
        }
        match self.counts.get_mut(&kind) {
            Some(count) if *count > 0 => {
                *count -= 1;
                let left = *count;
                if left == 0 {
                    self.counts.remove(&kind);
                }
                Ok(Some(left))
            }
            _ => Err(OutOfAmmo(kind)),
        }
    }

    /// Add ammo (AI loadouts, pickups from the shell)
    pub fn add(&mut self, kind: WeaponKind, count: u32) {
        if kind.is_base() || count == 0 {
            return;
        }
        *self.counts.entry(kind).or_insert(0) += count;
    }

    /// Weapon kinds with ammo left, base weapon first
    pub fn available(&self) -> Vec<WeaponKind> {
        std::iter::once(WeaponKind::Standard)
            .chain(self.counts.keys().copied())
            .collect()
    }

    /// Snapshot for the persistence layer
    pub fn counts(&self) -> &BTreeMap<WeaponKind, u32> {
        &self.counts
    }
}
