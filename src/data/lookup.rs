use serde_json::{Map, Value};

use crate::fill::seed::Seed;

/// Pulls the value for one field out of a structured seed.
///
/// `scope` is an optional hint naming a sub-object to search first. An
/// absent result is not an error: the caller falls back to generated data.
pub trait StructuredLookup {
    fn lookup(&self, seed: &Seed, scope: Option<&str>, key: &str) -> Option<Value>;
}

/// Field lookup over JSON objects (including serialized Rust models).
///
/// Keys match exactly first, then ignoring ASCII case, then ignoring `-`
/// and `_` as well, so `first-name` and `firstName` both reach a
/// `first_name` field. `null` fields count as absent.
#[derive(Debug, Clone, Copy, Default)]
pub struct JsonLookup;

impl StructuredLookup for JsonLookup {
    fn lookup(&self, seed: &Seed, scope: Option<&str>, key: &str) -> Option<Value> {
        let Seed::Structured(Value::Object(root)) = seed else {
            return None;
        };

        let scoped = scope
            .and_then(|s| find_field(root, s))
            .and_then(Value::as_object);

        scoped
            .and_then(|obj| find_field(obj, key))
            .or_else(|| find_field(root, key))
            .filter(|v| !v.is_null())
            .cloned()
    }
}

fn find_field<'a>(obj: &'a Map<String, Value>, key: &str) -> Option<&'a Value> {
    if let Some(v) = obj.get(key) {
        return Some(v);
    }

    if let Some((_, v)) = obj.iter().find(|(k, _)| k.eq_ignore_ascii_case(key)) {
        return Some(v);
    }

    let wanted = normalize_key(key);
    if wanted.is_empty() {
        return None;
    }
    obj.iter()
        .find(|(k, _)| normalize_key(k) == wanted)
        .map(|(_, v)| v)
}

/// Lower-case a key and drop `-`/`_` separators.
pub fn normalize_key(key: &str) -> String {
    key.chars()
        .filter(|c| *c != '-' && *c != '_')
        .map(|c| c.to_ascii_lowercase())
        .collect()
}
