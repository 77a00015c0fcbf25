//! Pick among variants with a scoring model, optionally scoped by givens.
//!
//! ```
//! use std::collections::BTreeMap;
//! use std::sync::Arc;
//! use serde_json::json;
//! use variant_decisions::{predictors::builtins::Linear, DecisionModel};
//!
//! let weights = BTreeMap::from([("variant=Hello".to_string(), 1.0)]);
//! let model = DecisionModel::new("greetings")?
//!     .with_predictor(Arc::new(Linear::new(0.0, weights)));
//!
//! let givens = json!({"language": "en"}).as_object().cloned();
//! let best = model.given(givens).which(vec!["Hi", "Hello", "Hey"])?;
//! assert_eq!(best, "Hello");
//! # Ok::<(), variant_decisions::DecisionError>(())
//! ```

pub mod errors;
pub mod config;
pub mod context;
pub mod decision;
pub mod encoder;
pub mod givens;
pub mod model;
pub mod predictors;  // inference seam
pub mod provider;
pub mod ranking;
pub mod tracker;

pub use config::{ModelFile, TrackingOptions};
pub use context::DecisionContext;
pub use decision::Decision;
pub use errors::{DecisionError, Result};
pub use model::{variants_from_json, DecisionModel};
pub use predictors::{Predictor, PredictorSpec, Registry};
pub use provider::{FeatureProvider, MapFeatureProvider};
pub use ranking::rank;
pub use tracker::{MemoryTracker, Tracker};
