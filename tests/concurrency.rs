use std::collections::BTreeMap;
use std::sync::Arc;
use std::thread;
use variant_decisions as vd;
use vd::predictors::builtins::Linear;

fn assert_send_sync<T: Send + Sync>() {}

#[test]
fn test_shared_types_are_send_and_sync() {
    assert_send_sync::<vd::DecisionModel>();
    assert_send_sync::<vd::DecisionContext<'static>>();
    assert_send_sync::<vd::MemoryTracker>();
    assert_send_sync::<vd::Registry>();
}

#[test]
fn test_one_context_many_threads() {
    let weights = BTreeMap::from([("variant".to_string(), 1.0)]);
    let model = vd::DecisionModel::new("shared")
        .unwrap()
        .with_predictor(Arc::new(Linear::new(0.0, weights)));
    let ctx = model.given(None);
    let tracker = vd::MemoryTracker::new();

    // Each thread tracks 10 decisions and rewards each one with its thread number.
    let ids: Vec<(String, f64)> = thread::scope(|s| {
        let handles: Vec<_> = (1..=4)
            .map(|t| {
                let ctx = &ctx;
                let tracker = &tracker;
                s.spawn(move || {
                    (0..10)
                        .map(|_| {
                            let mut d = ctx.choose_from(vec![1, 3, 2]).unwrap();
                            assert_eq!(*d.best(), 3);
                            let id = d.track(tracker).unwrap();
                            d.add_reward(t as f64, tracker).unwrap();
                            (id, t as f64)
                        })
                        .collect::<Vec<_>>()
                })
            })
            .collect();
        handles.into_iter().flat_map(|h| h.join().unwrap()).collect()
    });

    assert_eq!(ids.len(), 40);
    assert_eq!(tracker.decisions().len(), 40);
    for (id, reward) in &ids {
        assert_eq!(tracker.total_reward(id), Some(*reward));
    }
    let total: f64 = ids.iter().filter_map(|(id, _)| tracker.total_reward(id)).sum();
    assert_eq!(total, 10.0 * (1.0 + 2.0 + 3.0 + 4.0));
}
