use itertools::Itertools;
use serde::Serialize;
use serde_json::{Map, Value};
use std::fmt;
use std::sync::Arc;
use tracing::{debug, warn};
use crate::config::TrackingOptions;
use crate::context::DecisionContext;
use crate::decision::Decision;
use crate::encoder::FeatureEncoder;
use crate::errors::{DecisionError, Result};
use crate::givens::{self, GivensProvider, NoGivens};
use crate::predictors::{Predictor, Registry};
use crate::provider::MapFeatureProvider;
use crate::ranking::{descending_gaussians, rank_indices};

const MAX_NAME_LEN: usize = 64;

/// A named model that scores and ranks variants.
///
/// Until a predictor is loaded the model still answers: scores are random
/// but sorted high to low, so the first variant always wins.
pub struct DecisionModel {
    name: String,
    predictor: Option<Arc<dyn Predictor>>,
    givens_provider: Arc<dyn GivensProvider>,
    encoder: FeatureEncoder,
    tracking: TrackingOptions,
}

impl fmt::Debug for DecisionModel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("DecisionModel")
            .field("name", &self.name)
            .field("predictor", &self.predictor.as_ref().map(|p| p.kind()))
            .field("tracking", &self.tracking)
            .finish()
    }
}

impl DecisionModel {
    pub fn new(name: impl Into<String>) -> Result<Self> {
        let name = name.into();
        validate_name(&name)?;
        Ok(Self {
            name,
            predictor: None,
            givens_provider: Arc::new(NoGivens),
            encoder: FeatureEncoder::new(),
            tracking: TrackingOptions::default(),
        })
    }

    pub fn with_predictor(mut self, predictor: Arc<dyn Predictor>) -> Self {
        self.load(predictor);
        self
    }

    pub fn with_givens_provider(mut self, provider: Arc<dyn GivensProvider>) -> Self {
        self.givens_provider = provider;
        self
    }

    pub fn with_tracking(mut self, tracking: TrackingOptions) -> Self {
        self.tracking = tracking;
        self
    }

    pub fn load(&mut self, predictor: Arc<dyn Predictor>) {
        debug!(model = %self.name, kind = predictor.kind(), "predictor loaded");
        self.predictor = Some(predictor);
    }

    /// Load the predictor registered under this model's name.
    pub fn load_from(&mut self, registry: &Registry) -> Result<()> {
        let predictor = registry
            .get(&self.name)
            .ok_or_else(|| DecisionError::Config(format!("no predictor registered for '{}'", self.name)))?;
        self.load(predictor);
        Ok(())
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn is_loaded(&self) -> bool {
        self.predictor.is_some()
    }

    /// Bind `givens` for a series of decisions.
    pub fn given(&self, givens: Option<Map<String, Value>>) -> DecisionContext<'_> {
        DecisionContext::new(self, givens)
    }

    pub fn score<T: Serialize>(&self, variants: &[T]) -> Result<Vec<f64>> {
        self.score_with(variants, None)
    }

    pub fn choose_from<T: Serialize>(&self, variants: Vec<T>) -> Result<Decision<T>> {
        self.choose_with(variants, None)
    }

    pub fn choose_multivariate(&self, variants: &Map<String, Value>) -> Result<Decision<Value>> {
        self.choose_multivariate_with(variants, None)
    }

    /// Best of `variants`.
    pub fn which<T: Serialize>(&self, variants: Vec<T>) -> Result<T> {
        Ok(self.choose_from(variants)?.into_best())
    }

    /// Best of the first `n` items of `variants`.
    pub fn which_n<T, I>(&self, n: usize, variants: I) -> Result<T>
    where
        T: Serialize,
        I: IntoIterator<Item = T>,
    {
        self.which(take_exactly(n, variants)?)
    }

    pub(crate) fn score_with<T: Serialize>(
        &self,
        variants: &[T],
        context_givens: Option<&Map<String, Value>>,
    ) -> Result<Vec<f64>> {
        let encoded = encode_variants(variants)?;
        let givens = self.merged_givens(context_givens);
        self.score_encoded(&encoded, givens.as_ref())
    }

    pub(crate) fn choose_with<T: Serialize>(
        &self,
        variants: Vec<T>,
        context_givens: Option<&Map<String, Value>>,
    ) -> Result<Decision<T>> {
        let encoded = encode_variants(&variants)?;
        let givens = self.merged_givens(context_givens);
        let scores = self.score_encoded(&encoded, givens.as_ref())?;
        let ranking = rank_indices(&scores);
        Ok(Decision::new(
            self.name.clone(),
            variants,
            encoded,
            givens,
            scores,
            ranking,
            self.tracking.max_runners_up,
        ))
    }

    pub(crate) fn choose_multivariate_with(
        &self,
        variants: &Map<String, Value>,
        context_givens: Option<&Map<String, Value>>,
    ) -> Result<Decision<Value>> {
        self.choose_with(combinations(variants)?, context_givens)
    }

    fn merged_givens(&self, context_givens: Option<&Map<String, Value>>) -> Option<Map<String, Value>> {
        givens::merge(self.givens_provider.givens(&self.name), context_givens)
    }

    fn score_encoded(&self, encoded: &[Value], givens: Option<&Map<String, Value>>) -> Result<Vec<f64>> {
        debug!(model = %self.name, variants = encoded.len(), loaded = self.is_loaded(), "scoring");
        let Some(predictor) = &self.predictor else {
            warn!(model = %self.name, "model not loaded, variants keep their input order");
            return Ok(descending_gaussians(encoded.len(), &mut rand::thread_rng()));
        };
        let names = predictor.feature_names();
        encoded
            .iter()
            .map(|variant| {
                let features = self.encoder.encode(variant, givens);
                let provider = MapFeatureProvider::new(&features, names);
                predictor.predict(&provider)
            })
            .collect()
    }
}

/// Unpack a JSON variant list, rejecting `null`, non-arrays and empty arrays.
pub fn variants_from_json(value: Value) -> Result<Vec<Value>> {
    match value {
        Value::Null => Err(DecisionError::invalid("variants must not be null")),
        Value::Array(a) if a.is_empty() => Err(DecisionError::invalid("variants must not be empty")),
        Value::Array(a) => Ok(a),
        other => Err(DecisionError::invalid(format!("variants must be an array, got {other}"))),
    }
}

fn encode_variants<T: Serialize>(variants: &[T]) -> Result<Vec<Value>> {
    if variants.is_empty() {
        return Err(DecisionError::invalid("variants must not be empty"));
    }
    variants
        .iter()
        .map(|v| serde_json::to_value(v).map_err(DecisionError::from))
        .collect()
}

pub(crate) fn take_exactly<T, I: IntoIterator<Item = T>>(n: usize, items: I) -> Result<Vec<T>> {
    if n == 0 {
        return Err(DecisionError::invalid("variant count must be positive"));
    }
    let out: Vec<T> = items.into_iter().take(n).collect();
    if out.len() < n {
        return Err(DecisionError::invalid(format!(
            "expected {n} variants, got {}",
            out.len()
        )));
    }
    Ok(out)
}

/// Cartesian product over named slots, first key varying slowest.
/// Array values list a slot's candidates; scalars are a single candidate;
/// empty arrays drop the slot.
fn combinations(slots: &Map<String, Value>) -> Result<Vec<Value>> {
    let slots: Vec<(&String, &[Value])> = slots
        .iter()
        .map(|(k, v)| match v {
            Value::Array(a) => (k, a.as_slice()),
            other => (k, std::slice::from_ref(other)),
        })
        .filter(|(_, candidates)| !candidates.is_empty())
        .collect();
    if slots.is_empty() {
        return Err(DecisionError::invalid("variants must have at least one non-empty slot"));
    }
    Ok(slots
        .iter()
        .map(|(_, candidates)| candidates.iter())
        .multi_cartesian_product()
        .map(|combo| {
            Value::Object(
                slots
                    .iter()
                    .map(|(k, _)| (*k).clone())
                    .zip(combo.into_iter().cloned())
                    .collect(),
            )
        })
        .collect())
}

fn validate_name(name: &str) -> Result<()> {
    let mut chars = name.chars();
    let ok = name.len() <= MAX_NAME_LEN
        && chars.next().is_some_and(|c| c.is_ascii_alphanumeric())
        && chars.all(|c| c.is_ascii_alphanumeric() || matches!(c, '.' | '-' | '_'));
    if ok {
        Ok(())
    } else {
        Err(DecisionError::invalid(format!("invalid model name '{name}'")))
    }
}
