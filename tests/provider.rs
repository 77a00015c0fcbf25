use serde_json::{json, Value};
use std::collections::BTreeSet;
use variant_decisions as vd;
use vd::FeatureProvider;

#[test]
fn test_adapter_exposes_exactly_the_committed_names() {
    let features = json!({"variant": 1, "givens.lang=en": 1, "extra": 3});
    let map = features.as_object().unwrap();
    let committed: BTreeSet<String> = ["variant", "givens.hour"].iter().map(|s| s.to_string()).collect();
    let p = vd::MapFeatureProvider::new(map, &committed);

    assert_eq!(p.feature_names(), &committed);
    for name in &committed {
        assert!(p.feature_value(name).is_some());
    }
    assert_eq!(p.feature_value("givens.hour"), Some(&Value::Null));
    assert_eq!(p.feature_value("extra"), None);
}
