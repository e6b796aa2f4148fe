use serde_json::{Map, Value};

/// An element's state: an ordered mapping from field name to JSON value.
pub type State = Map<String, Value>;

/// Shallow-merges `patch` into `state`.
///
/// Keys present in `patch` replace the same keys in `state` wholesale (nested
/// objects are not merged); every other key of `state` is kept.
pub fn merge_shallow(state: &mut State, patch: State) {
    for (key, value) in patch {
        state.insert(key, value);
    }
}
