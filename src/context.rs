use serde::Serialize;
use serde_json::{Map, Value};
use crate::decision::Decision;
use crate::errors::Result;
use crate::model::{take_exactly, DecisionModel};

/// A model bound to a set of givens.
///
/// Stateless between calls: every operation forwards to the model with the
/// same givens, which are layered over the model's own provider givens.
#[derive(Debug, Clone)]
pub struct DecisionContext<'a> {
    model: &'a DecisionModel,
    givens: Option<Map<String, Value>>,
}

impl<'a> DecisionContext<'a> {
    pub fn new(model: &'a DecisionModel, givens: Option<Map<String, Value>>) -> Self {
        Self { model, givens }
    }

    pub fn model(&self) -> &'a DecisionModel {
        self.model
    }

    pub fn givens(&self) -> Option<&Map<String, Value>> {
        self.givens.as_ref()
    }

    /// See [`DecisionModel::choose_from`].
    pub fn choose_from<T: Serialize>(&self, variants: Vec<T>) -> Result<Decision<T>> {
        self.model.choose_with(variants, self.givens.as_ref())
    }

    /// See [`DecisionModel::choose_multivariate`].
    pub fn choose_multivariate(&self, variants: &Map<String, Value>) -> Result<Decision<Value>> {
        self.model.choose_multivariate_with(variants, self.givens.as_ref())
    }

    /// One score per variant, in input order. Fails on an empty slice.
    pub fn score<T: Serialize>(&self, variants: &[T]) -> Result<Vec<f64>> {
        self.model.score_with(variants, self.givens.as_ref())
    }

    pub fn which<T: Serialize>(&self, variants: Vec<T>) -> Result<T> {
        Ok(self.choose_from(variants)?.into_best())
    }

    pub fn which_n<T, I>(&self, n: usize, variants: I) -> Result<T>
    where
        T: Serialize,
        I: IntoIterator<Item = T>,
    {
        self.which(take_exactly(n, variants)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::givens::StaticGivens;
    use crate::predictors::builtins::Linear;
    use pretty_assertions::assert_eq;
    use serde_json::json;
    use std::collections::BTreeMap;
    use std::sync::Arc;

    fn obj(v: Value) -> Map<String, Value> {
        match v {
            Value::Object(m) => m,
            _ => unreachable!(),
        }
    }

    #[test]
    fn context_givens_override_provider_givens() {
        let weights = BTreeMap::from([("givens.tier=gold".to_string(), 5.0)]);
        let model = DecisionModel::new("m")
            .unwrap()
            .with_predictor(Arc::new(Linear::new(0.0, weights)))
            .with_givens_provider(Arc::new(StaticGivens(obj(json!({"tier": "silver", "app": "x"})))));

        assert_eq!(model.score(&["a"]).unwrap(), vec![0.0]);

        let ctx = model.given(Some(obj(json!({"tier": "gold"}))));
        assert_eq!(ctx.score(&["a"]).unwrap(), vec![5.0]);
        let d = ctx.choose_from(vec!["a"]).unwrap();
        assert_eq!(d.givens(), Some(&obj(json!({"tier": "gold", "app": "x"}))));
    }

    #[test]
    fn without_givens_matches_model() {
        let weights = BTreeMap::from([("variant".to_string(), 1.0)]);
        let model = DecisionModel::new("m")
            .unwrap()
            .with_predictor(Arc::new(Linear::new(0.0, weights)));
        let ctx = DecisionContext::new(&model, None);
        assert_eq!(ctx.score(&[2, 1]).unwrap(), model.score(&[2, 1]).unwrap());
        assert_eq!(ctx.which(vec![2, 5, 1]).unwrap(), 5);
        assert_eq!(ctx.which_n(2, [2, 1, 9]).unwrap(), 2);
    }
}
