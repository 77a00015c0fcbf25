use serde_json::{Map, Value};

pub const VARIANT_PREFIX: &str = "variant";
pub const GIVENS_PREFIX: &str = "givens";

/// Flattens a variant and its givens into a flat feature map.
///
/// Nested maps extend the feature name with `.key`, arrays with `.index`.
/// Numbers are kept, booleans become `1`/`0`, strings become a one-hot
/// feature `name=string` set to `1`, and nulls produce nothing.
///
/// `\`, `.` and `=` inside map keys are backslash-escaped, so the first
/// unescaped `=` always starts a one-hot value and every unescaped `.`
/// is a nesting step.
#[derive(Debug, Default, Clone, Copy)]
pub struct FeatureEncoder;

impl FeatureEncoder {
    pub fn new() -> Self {
        Self
    }

    pub fn encode(&self, variant: &Value, givens: Option<&Map<String, Value>>) -> Map<String, Value> {
        let mut out = Map::new();
        flatten(VARIANT_PREFIX, variant, &mut out);
        if let Some(givens) = givens {
            for (k, v) in givens {
                flatten(&join(GIVENS_PREFIX, k), v, &mut out);
            }
        }
        out
    }
}

fn join(prefix: &str, key: &str) -> String {
    let mut out = String::with_capacity(prefix.len() + key.len() + 1);
    out.push_str(prefix);
    out.push('.');
    for c in key.chars() {
        if matches!(c, '\\' | '.' | '=') {
            out.push('\\');
        }
        out.push(c);
    }
    out
}

fn flatten(name: &str, value: &Value, out: &mut Map<String, Value>) {
    match value {
        Value::Null => {}
        Value::Bool(b) => {
            out.insert(name.to_string(), Value::from(u8::from(*b)));
        }
        Value::Number(_) => {
            out.insert(name.to_string(), value.clone());
        }
        Value::String(s) => {
            out.insert(format!("{name}={s}"), Value::from(1));
        }
        Value::Array(items) => {
            for (i, item) in items.iter().enumerate() {
                flatten(&format!("{name}.{i}"), item, out);
            }
        }
        Value::Object(map) => {
            for (k, v) in map {
                flatten(&join(name, k), v, out);
            }
        }
    }
}
