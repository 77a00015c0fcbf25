use serde_json::{Map, Value};
use std::borrow::Cow;
use std::collections::BTreeSet;

static NULL: Value = Value::Null;

/// Contract a predictor uses to pull named input values.
pub trait FeatureProvider {
    /// The names this provider can be asked about.
    fn feature_names(&self) -> &BTreeSet<String>;

    /// Value for `name`, or `None` when `name` is not one of `feature_names()`.
    fn feature_value(&self, name: &str) -> Option<&Value>;
}

/// Read-only view over a feature map, restricted to a fixed name set.
///
/// Every committed name resolves: either to the stored value or to
/// `Value::Null` when the map has no entry for it. Names outside the
/// committed set are invisible.
#[derive(Debug, Clone)]
pub struct MapFeatureProvider<'a> {
    features: &'a Map<String, Value>,
    names: Cow<'a, BTreeSet<String>>,
}

impl<'a> MapFeatureProvider<'a> {
    /// Borrow an existing name set, e.g. a predictor's declared inputs.
    pub fn new(features: &'a Map<String, Value>, names: &'a BTreeSet<String>) -> Self {
        Self { features, names: Cow::Borrowed(names) }
    }

    pub fn with_names<I, S>(features: &'a Map<String, Value>, names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            features,
            names: Cow::Owned(names.into_iter().map(Into::into).collect()),
        }
    }

    /// Commit to exactly the keys already present in `features`.
    pub fn from_map(features: &'a Map<String, Value>) -> Self {
        Self::with_names(features, features.keys().cloned())
    }
}

impl FeatureProvider for MapFeatureProvider<'_> {
    fn feature_names(&self) -> &BTreeSet<String> {
        &self.names
    }

    fn feature_value(&self, name: &str) -> Option<&Value> {
        if !self.names.contains(name) {
            return None;
        }
        Some(self.features.get(name).unwrap_or(&NULL))
    }
}
