use elementkv_types::{State, merge_shallow};
use pretty_assertions::assert_eq;
use proptest::prelude::*;
use serde_json::{Value, json};

fn state(value: Value) -> State {
    match value {
        Value::Object(map) => map,
        other => panic!("expected object, got {other}"),
    }
}

#[test]
fn patch_keys_overwrite() {
    let mut s = state(json!({"a": 1, "b": 2}));
    merge_shallow(&mut s, state(json!({"b": 3})));
    assert_eq!(Value::Object(s), json!({"a": 1, "b": 3}));
}

#[test]
fn nested_objects_are_replaced_not_merged() {
    let mut s = state(json!({"meta": {"x": 1, "y": 2}}));
    merge_shallow(&mut s, state(json!({"meta": {"x": 9}})));
    assert_eq!(Value::Object(s), json!({"meta": {"x": 9}}));
}

#[test]
fn empty_patch_is_noop() {
    let mut s = state(json!({"a": 1}));
    merge_shallow(&mut s, State::new());
    assert_eq!(Value::Object(s), json!({"a": 1}));
}

fn small_state() -> impl Strategy<Value = State> {
    prop::collection::btree_map("[a-e]", any::<i64>(), 0..5).prop_map(|m| {
        m.into_iter()
            .map(|(k, v)| (k, Value::from(v)))
            .collect::<State>()
    })
}

proptest! {
    /// Later patches win over earlier ones, and every key survives.
    #[test]
    fn sequential_merges_equal_union(
        initial in small_state(),
        p1 in small_state(),
        p2 in small_state(),
    ) {
        let mut s = initial.clone();
        merge_shallow(&mut s, p1.clone());
        merge_shallow(&mut s, p2.clone());

        let keys: std::collections::BTreeSet<_> =
            initial.keys().chain(p1.keys()).chain(p2.keys()).cloned().collect();
        prop_assert_eq!(s.len(), keys.len());
        for key in keys {
            let expected = p2.get(&key).or_else(|| p1.get(&key)).or_else(|| initial.get(&key));
            prop_assert_eq!(s.get(&key), expected);
        }
    }
}
