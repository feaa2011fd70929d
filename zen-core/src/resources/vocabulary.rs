use serde_json::{Map, Value};

/// Which tier of the vocabulary to read or replace
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum VocabularyKind {
    /// Built-in definitions
    System,
    /// User definitions, merged over the system tier
    User,
}

/// Recursively merge `overlay` into `base`. Objects merge key by key, any other
/// value in `overlay` replaces the one in `base`.
pub fn deep_merge(base: &mut Value, overlay: &Value) {
    match (base, overlay) {
        (Value::Object(base), Value::Object(overlay)) => {
            for (key, value) in overlay {
                match base.get_mut(key) {
                    Some(existing) => deep_merge(existing, value),
                    None => {
                        base.insert(key.clone(), value.clone());
                    }
                }
            }
        }
        (base, overlay) => *base = overlay.clone(),
    }
}

/// Object entries of `value` whose values are strings
pub fn string_entries(value: Option<&Value>) -> impl Iterator<Item = (&String, &str)> {
    value
        .and_then(Value::as_object)
        .into_iter()
        .flat_map(Map::iter)
        .filter_map(|(k, v)| v.as_str().map(|s| (k, s)))
}
