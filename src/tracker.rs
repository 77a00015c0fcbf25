//! Recording of tracked decisions and the rewards later attached to them.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::collections::HashMap;
use std::sync::{Mutex, MutexGuard, PoisonError};
use crate::errors::{DecisionError, Result};

pub const DEFAULT_MAX_RUNNERS_UP: usize = 50;

/// What gets recorded when a decision is tracked.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct DecisionRecord {
    pub id: String,
    pub model: String,
    pub variant: Value,
    pub count: usize,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub givens: Option<Map<String, Value>>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub runners_up: Vec<Value>,
    /// One variant drawn at random from those ranked below the runners up.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sample: Option<Value>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct RewardRecord {
    pub decision_id: String,
    pub model: String,
    pub reward: f64,
}

pub trait Tracker: Send + Sync {
    fn track(&self, record: &DecisionRecord) -> Result<()>;
    fn add_reward(&self, record: &RewardRecord) -> Result<()>;
}

/// Keeps everything in memory. Rewards for unknown decisions are refused.
///
/// A panic in another thread while holding the lock does not lose records:
/// the state is recovered and used as is.
#[derive(Debug, Default)]
pub struct MemoryTracker {
    state: Mutex<MemoryState>,
}

#[derive(Debug, Default)]
struct MemoryState {
    decisions: Vec<DecisionRecord>,
    rewards: HashMap<String, f64>,
}

impl MemoryTracker {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn decisions(&self) -> Vec<DecisionRecord> {
        self.lock().decisions.clone()
    }

    /// Sum of rewards added to `decision_id`, if it was tracked here.
    pub fn total_reward(&self, decision_id: &str) -> Option<f64> {
        let state = self.lock();
        if !state.decisions.iter().any(|d| d.id == decision_id) {
            return None;
        }
        Some(state.rewards.get(decision_id).copied().unwrap_or(0.0))
    }

    fn lock(&self) -> MutexGuard<'_, MemoryState> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

impl Tracker for MemoryTracker {
    fn track(&self, record: &DecisionRecord) -> Result<()> {
        self.lock().decisions.push(record.clone());
        Ok(())
    }

    fn add_reward(&self, record: &RewardRecord) -> Result<()> {
        let mut state = self.lock();
        if !state.decisions.iter().any(|d| d.id == record.decision_id) {
            return Err(DecisionError::Tracking(format!(
                "unknown decision {}",
                record.decision_id
            )));
        }
        *state.rewards.entry(record.decision_id.clone()).or_insert(0.0) += record.reward;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn record(id: &str) -> DecisionRecord {
        DecisionRecord {
            id: id.into(),
            model: "m".into(),
            variant: json!("a"),
            count: 1,
            givens: None,
            runners_up: vec![],
            sample: None,
        }
    }

    #[test]
    fn rewards_accumulate() {
        let t = MemoryTracker::new();
        t.track(&record("d1")).unwrap();
        for r in [1.0, 0.5] {
            t.add_reward(&RewardRecord { decision_id: "d1".into(), model: "m".into(), reward: r })
                .unwrap();
        }
        assert_eq!(t.total_reward("d1"), Some(1.5));
        assert_eq!(t.total_reward("d2"), None);
    }

    #[test]
    fn reward_for_unknown_decision_fails() {
        let t = MemoryTracker::new();
        let err = t
            .add_reward(&RewardRecord { decision_id: "nope".into(), model: "m".into(), reward: 1.0 })
            .unwrap_err();
        assert!(matches!(err, DecisionError::Tracking(_)));
    }

    #[test]
    fn poisoned_lock_keeps_records() {
        let t = MemoryTracker::new();
        t.track(&record("d1")).unwrap();
        let poisoned = std::panic::catch_unwind(std::panic::AssertUnwindSafe(|| {
            let _guard = t.state.lock().unwrap();
            panic!("boom");
        }));
        assert!(poisoned.is_err());
        assert!(t.state.is_poisoned());

        assert_eq!(t.decisions().len(), 1);
        assert_eq!(t.total_reward("d1"), Some(0.0));
        t.add_reward(&RewardRecord { decision_id: "d1".into(), model: "m".into(), reward: 2.0 })
            .unwrap();
        assert_eq!(t.total_reward("d1"), Some(2.0));
    }

    #[test]
    fn record_serializes_without_empty_fields() {
        let v = serde_json::to_value(record("d1")).unwrap();
        assert_eq!(v, json!({"id": "d1", "model": "m", "variant": "a", "count": 1}));
    }
}
