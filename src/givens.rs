use serde_json::{Map, Value};

/// Supplies model-level givens that every decision of a model sees.
pub trait GivensProvider: Send + Sync {
    fn givens(&self, model_name: &str) -> Map<String, Value>;
}

/// Provides nothing.
#[derive(Debug, Default, Clone, Copy)]
pub struct NoGivens;

impl GivensProvider for NoGivens {
    fn givens(&self, _model_name: &str) -> Map<String, Value> {
        Map::new()
    }
}

/// The same fixed givens for every decision.
#[derive(Debug, Default, Clone)]
pub struct StaticGivens(pub Map<String, Value>);

impl GivensProvider for StaticGivens {
    fn givens(&self, _model_name: &str) -> Map<String, Value> {
        self.0.clone()
    }
}

/// Provider givens overlaid with the caller's givens; the caller wins on key clashes.
/// `None` when both sides are empty.
pub fn merge(provided: Map<String, Value>, context: Option<&Map<String, Value>>) -> Option<Map<String, Value>> {
    let mut out = provided;
    if let Some(context) = context {
        out.extend(context.iter().map(|(k, v)| (k.clone(), v.clone())));
    }
    if out.is_empty() {
        None
    } else {
        Some(out)
    }
}
