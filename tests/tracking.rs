use serde_json::json;
use variant_decisions as vd;

#[test]
fn test_tracked_decision_records_runners_up_and_rewards() {
    let model = vd::ModelFile::from_str(
        r#"{"name": "songs", "givens": {"app": "radio"}, "tracking": {"max_runners_up": 2}}"#,
    )
    .unwrap()
    .into_model()
    .unwrap();
    let tracker = vd::MemoryTracker::new();

    let mut decision = model
        .given(json!({"hour": 9}).as_object().cloned())
        .choose_from(vec!["a", "b", "c", "d", "e"])
        .unwrap();
    let id = decision.track(&tracker).unwrap();
    decision.add_reward(1.0, &tracker).unwrap();
    decision.add_reward(0.25, &tracker).unwrap();

    let records = tracker.decisions();
    assert_eq!(records.len(), 1);
    let r = &records[0];
    assert_eq!(r.id, id);
    assert_eq!(r.model, "songs");
    assert_eq!(r.variant, json!("a"));
    assert_eq!(r.count, 5);
    assert_eq!(r.runners_up, vec![json!("b"), json!("c")]);
    assert!(r.sample.is_some());
    assert_eq!(
        r.givens.clone().map(serde_json::Value::Object),
        Some(json!({"app": "radio", "hour": 9}))
    );
    assert_eq!(tracker.total_reward(&id), Some(1.25));
}

#[test]
fn test_untracked_decision_cannot_be_rewarded() {
    let model = vd::DecisionModel::new("songs").unwrap();
    let tracker = vd::MemoryTracker::new();
    let decision = model.choose_from(vec![1, 2]).unwrap();
    assert!(matches!(
        decision.add_reward(1.0, &tracker),
        Err(vd::DecisionError::NotTracked)
    ));
}
