use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::{BTreeMap, BTreeSet, HashMap};
use std::sync::Arc;
use crate::errors::{DecisionError, Result};
use crate::provider::FeatureProvider;

/// Trait for pluggable scorers used by the decision model.
pub trait Predictor: Send + Sync {
    fn kind(&self) -> &'static str;
    /// Input features this predictor reads. The model only exposes these.
    fn feature_names(&self) -> &BTreeSet<String>;
    fn predict(&self, features: &dyn FeatureProvider) -> Result<f64>;
}

/// Serialized form of the built-in predictors, as found in model files.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(tag = "type", rename_all = "snake_case", deny_unknown_fields)]
pub enum PredictorSpec {
    Linear {
        #[serde(default)]
        bias: f64,
        weights: BTreeMap<String, f64>,
    },
    Constant { score: f64 },
}

impl PredictorSpec {
    pub fn build(self) -> Arc<dyn Predictor> {
        match self {
            PredictorSpec::Linear { bias, weights } => Arc::new(builtins::Linear::new(bias, weights)),
            PredictorSpec::Constant { score } => Arc::new(builtins::Constant::new(score)),
        }
    }
}

/// Thread-safe registry of loaded predictors, keyed by model name.
#[derive(Clone, Default)]
pub struct Registry {
    inner: Arc<HashMap<String, Arc<dyn Predictor>>>,
}

impl Registry {
    pub fn new() -> Self { Self::default() }

    pub fn register(&mut self, model_name: impl Into<String>, predictor: Arc<dyn Predictor>) {
        let mut_map = Arc::make_mut(&mut self.inner);
        mut_map.insert(model_name.into(), predictor);
    }

    pub fn get(&self, model_name: &str) -> Option<Arc<dyn Predictor>> {
        self.inner.get(model_name).cloned()
    }
}

pub mod builtins {
    use super::*;

    /// `bias + sum(weight * value)` over the weighted features.
    /// Missing and null features count as zero.
    pub struct Linear {
        bias: f64,
        weights: BTreeMap<String, f64>,
        names: BTreeSet<String>,
    }

    impl Linear {
        pub fn new(bias: f64, weights: BTreeMap<String, f64>) -> Self {
            let names = weights.keys().cloned().collect();
            Self { bias, weights, names }
        }
    }

    impl Predictor for Linear {
        fn kind(&self) -> &'static str { "linear" }
        fn feature_names(&self) -> &BTreeSet<String> { &self.names }
        fn predict(&self, features: &dyn FeatureProvider) -> Result<f64> {
            let mut total = self.bias;
            for (name, weight) in &self.weights {
                let x = match features.feature_value(name) {
                    None | Some(Value::Null) => 0.0,
                    Some(Value::Number(n)) => n.as_f64().unwrap_or(0.0),
                    Some(other) => {
                        return Err(DecisionError::Model(format!(
                            "feature '{name}' is not numeric: {other}"
                        )))
                    }
                };
                total += weight * x;
            }
            Ok(total)
        }
    }

    /// Scores every variant the same.
    pub struct Constant {
        score: f64,
        names: BTreeSet<String>,
    }

    impl Constant {
        pub fn new(score: f64) -> Self {
            Self { score, names: BTreeSet::new() }
        }
    }

    impl Predictor for Constant {
        fn kind(&self) -> &'static str { "constant" }
        fn feature_names(&self) -> &BTreeSet<String> { &self.names }
        fn predict(&self, _features: &dyn FeatureProvider) -> Result<f64> {
            Ok(self.score)
        }
    }
}
