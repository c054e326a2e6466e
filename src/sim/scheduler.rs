//! Pending AI decisions
//!
//! Each AI tank gets at most one pending decision, due once its thinking time
//! has elapsed. Decisions are polled from the frame tick; nothing blocks.
//! Resets and deaths must cancel explicitly.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use super::ai::ShotPlan;
use super::state::TankId;

#[derive(Debug, Clone, Serialize, Deserialize)]
struct PendingDecision {
    due: f32,
    plan: ShotPlan,
}

/// Cancellable per-tank decision timers
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct DecisionScheduler {
    pending: BTreeMap<TankId, PendingDecision>,
}

impl DecisionScheduler {
    pub fn new() -> Self {
        Self::default()
    }

    /// Schedule `plan` to commit after its thinking time.
    ///
    /// Replaces (cancels) any decision already pending for `tank`.
    pub fn schedule(&mut self, tank: TankId, now: f32, plan: ShotPlan) {
        let due = now + plan.thinking_time_ms as f32 / 1000.0;
        if self.pending.insert(tank, PendingDecision { due, plan }).is_some() {
            log::debug!("Replaced pending decision for {:?}", tank);
        }
    }

    /// Cancel whatever is pending for `tank`
    pub fn cancel(&mut self, tank: TankId) -> bool {
        let cancelled = self.pending.remove(&tank).is_some();
        if cancelled {
            log::debug!("Cancelled pending decision for {:?}", tank);
        }
        cancelled
    }

    /// Drop every pending decision (match reset)
    pub fn cancel_all(&mut self) -> usize {
        let n = self.pending.len();
        self.pending.clear();
        n
    }

    pub fn is_pending(&self, tank: TankId) -> bool {
        self.pending.contains_key(&tank)
    }

    pub fn len(&self) -> usize {
        self.pending.len()
    }

    pub fn is_empty(&self) -> bool {
        self.pending.is_empty()
    }

    /// Seconds until `tank`'s decision is due
    pub fn remaining(&self, tank: TankId, now: f32) -> Option<f32> {
        self.pending.get(&tank).map(|p| (p.due - now).max(0.0))
    }

    /// Remove and return every decision due at `now`, earliest first
    /// (ties broken by tank id)
    pub fn poll(&mut self, now: f32) -> Vec<(TankId, ShotPlan)> {
        let mut due: Vec<(f32, TankId)> = self
            .pending
            .iter()
            .filter(|(_, p)| p.due <= now)
            .map(|(id, p)| (p.due, *id))
            .collect();
        due.sort_by(|a, b| {
            a.0.partial_cmp(&b.0)
                .unwrap_or(std::cmp::Ordering::Equal)
                .then(a.1.cmp(&b.1))
        });
        due.into_iter()
            .filter_map(|(_, id)| self.pending.remove(&id).map(|p| (id, p.plan)))
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sim::state::Aim;
    use crate::sim::weapon::WeaponKind;

    fn plan(ms: u32) -> ShotPlan {
        ShotPlan {
            target: TankId(9),
            aim: Aim::new(45.0, 50.0),
            weapon: WeaponKind::Standard,
            thinking_time_ms: ms,
        }
    }

    #[test]
    fn test_poll_fires_in_due_order() {
        let mut s = DecisionScheduler::new();
        s.schedule(TankId(1), 0.0, plan(1500));
        s.schedule(TankId(2), 0.0, plan(500));
        s.schedule(TankId(3), 0.0, plan(500));

        assert!(s.poll(0.4).is_empty());
        let fired: Vec<TankId> = s.poll(0.6).into_iter().map(|(id, _)| id).collect();
        assert_eq!(fired, vec![TankId(2), TankId(3)]);
        assert_eq!(s.len(), 1);
        let fired: Vec<TankId> = s.poll(2.0).into_iter().map(|(id, _)| id).collect();
        assert_eq!(fired, vec![TankId(1)]);
        assert!(s.is_empty());
    }

    #[test]
    fn test_at_most_one_pending_per_tank() {
        let mut s = DecisionScheduler::new();
        s.schedule(TankId(1), 0.0, plan(100));
        s.schedule(TankId(1), 0.0, plan(900));
        assert_eq!(s.len(), 1);
        // The replacement's due time wins
        assert!(s.poll(0.5).is_empty());
        assert!((s.remaining(TankId(1), 0.5).unwrap() - 0.4).abs() < 1e-5);
        assert_eq!(s.poll(1.0).len(), 1);
        assert!(s.is_empty());
    }

    #[test]
    fn test_cancelled_decision_never_fires() {
        let mut s = DecisionScheduler::new();
        s.schedule(TankId(1), 0.0, plan(100));
        s.schedule(TankId(2), 0.0, plan(100));
        assert!(s.cancel(TankId(1)));
        assert!(!s.cancel(TankId(1)));
        let fired = s.poll(1.0);
        assert_eq!(fired.len(), 1);
        assert_eq!(fired[0].0, TankId(2));
    }

    #[test]
    fn test_cancel_all() {
        let mut s = DecisionScheduler::new();
        s.schedule(TankId(1), 0.0, plan(100));
        s.schedule(TankId(2), 0.0, plan(100));
        assert_eq!(s.cancel_all(), 2);
        assert!(s.poll(10.0).is_empty());
        assert_eq!(s.remaining(TankId(1), 0.0), None);
    }
}
