use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::{fs, path::Path, sync::Arc};
use crate::errors::{DecisionError, Result};
use crate::givens::StaticGivens;
use crate::model::DecisionModel;
use crate::predictors::PredictorSpec;
use crate::tracker::DEFAULT_MAX_RUNNERS_UP;

const fn default_max_runners_up() -> usize {
    DEFAULT_MAX_RUNNERS_UP
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(deny_unknown_fields)]
pub struct TrackingOptions {
    /// How many variants after the best one are recorded when tracking.
    #[serde(default = "default_max_runners_up")]
    pub max_runners_up: usize,
}

impl Default for TrackingOptions {
    fn default() -> Self {
        Self { max_runners_up: default_max_runners_up() }
    }
}

/// On-disk description of a decision model.
///
/// ```json
/// {
///   "name": "greetings",
///   "predictor": {"type": "linear", "bias": 0.0, "weights": {"variant=Hi": 1.0}},
///   "givens": {"app": "demo"},
///   "tracking": {"max_runners_up": 10}
/// }
/// ```
///
/// Without a `predictor` the model stays unloaded.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(deny_unknown_fields)]
pub struct ModelFile {
    pub name: String,
    #[serde(default)]
    pub predictor: Option<PredictorSpec>,
    #[serde(default)]
    pub givens: Option<Map<String, Value>>,
    #[serde(default)]
    pub tracking: TrackingOptions,
}

impl ModelFile {
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let text = fs::read_to_string(path)?;
        Self::from_str(&text)
            .map_err(|e| DecisionError::Config(format!("{}: {e}", path.display())))
    }

    #[allow(clippy::should_implement_trait)]
    pub fn from_str(text: &str) -> Result<Self> {
        serde_json::from_str(text).map_err(|e| DecisionError::Config(e.to_string()))
    }

    pub fn into_model(self) -> Result<DecisionModel> {
        let mut model = DecisionModel::new(self.name)?.with_tracking(self.tracking);
        if let Some(spec) = self.predictor {
            model.load(spec.build());
        }
        if let Some(givens) = self.givens {
            model = model.with_givens_provider(Arc::new(StaticGivens(givens)));
        }
        Ok(model)
    }
}
