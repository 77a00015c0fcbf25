use rand::seq::SliceRandom;
use serde_json::{Map, Value};
use tracing::debug;
use ulid::Ulid;
use crate::errors::{DecisionError, Result};
use crate::tracker::{DecisionRecord, RewardRecord, Tracker};

/// Outcome of a choice: the caller's variants, their scores and ranking.
///
/// Always holds at least one variant, so `best()` cannot fail.
#[derive(Debug, Clone)]
pub struct Decision<T> {
    model: String,
    variants: Vec<T>,
    encoded: Vec<Value>,
    givens: Option<Map<String, Value>>,
    scores: Vec<f64>,
    ranking: Vec<usize>,
    max_runners_up: usize,
    id: Option<String>,
}

impl<T> Decision<T> {
    pub(crate) fn new(
        model: String,
        variants: Vec<T>,
        encoded: Vec<Value>,
        givens: Option<Map<String, Value>>,
        scores: Vec<f64>,
        ranking: Vec<usize>,
        max_runners_up: usize,
    ) -> Self {
        debug_assert!(!variants.is_empty());
        debug_assert_eq!(variants.len(), ranking.len());
        Self { model, variants, encoded, givens, scores, ranking, max_runners_up, id: None }
    }

    pub fn model_name(&self) -> &str {
        &self.model
    }

    /// Variants in the order they were passed in.
    pub fn variants(&self) -> &[T] {
        &self.variants
    }

    /// Provider givens merged with context givens, as used for scoring.
    pub fn givens(&self) -> Option<&Map<String, Value>> {
        self.givens.as_ref()
    }

    /// Aligned with `variants()`.
    pub fn scores(&self) -> &[f64] {
        &self.scores
    }

    pub fn ranked(&self) -> impl Iterator<Item = &T> + '_ {
        self.ranking.iter().map(move |&i| &self.variants[i])
    }

    pub fn best(&self) -> &T {
        &self.variants[self.ranking[0]]
    }

    pub fn into_best(mut self) -> T {
        self.variants.swap_remove(self.ranking[0])
    }

    /// Set once the decision has been tracked.
    pub fn id(&self) -> Option<&str> {
        self.id.as_deref()
    }

    /// Hand this decision to `tracker` and return its new id.
    pub fn track(&mut self, tracker: &dyn Tracker) -> Result<String> {
        if let Some(id) = &self.id {
            return Err(DecisionError::AlreadyTracked(id.clone()));
        }
        let record = self.record(Ulid::new().to_string());
        tracker.track(&record)?;
        debug!(model = %self.model, id = %record.id, count = record.count, "decision tracked");
        self.id = Some(record.id.clone());
        Ok(record.id)
    }

    pub fn add_reward(&self, reward: f64, tracker: &dyn Tracker) -> Result<()> {
        let id = self.id.as_ref().ok_or(DecisionError::NotTracked)?;
        if !reward.is_finite() {
            return Err(DecisionError::invalid(format!("reward must be finite, got {reward}")));
        }
        tracker.add_reward(&RewardRecord {
            decision_id: id.clone(),
            model: self.model.clone(),
            reward,
        })
    }

    fn record(&self, id: String) -> DecisionRecord {
        let encoded = |i: &usize| self.encoded[*i].clone();
        let rest = &self.ranking[1..];
        let cut = rest.len().min(self.max_runners_up);
        let (runners_up, remainder) = rest.split_at(cut);
        DecisionRecord {
            id,
            model: self.model.clone(),
            variant: encoded(&self.ranking[0]),
            count: self.variants.len(),
            givens: self.givens.clone(),
            runners_up: runners_up.iter().map(encoded).collect(),
            sample: remainder.choose(&mut rand::thread_rng()).map(encoded),
        }
    }
}
