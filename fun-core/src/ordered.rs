//! Insertion-ordered containers keyed by arbitrary JSON values
//!
//! `serde_json::Map` only admits string keys; the wrapped-mapping layer needs
//! mappings keyed by any JSON value (inversion produces integer- and
//! float-keyed mappings). Entries live in a vector to preserve insertion
//! order, with a hash index over the canonical key rendering for lookups.

use ahash::AHashMap;
use serde_json::Value;

/// Canonical rendering of a value used for key identity.
///
/// Compact JSON keeps distinct kinds distinct (`1`, `1.0`, and `"1"` render
/// differently); objects render with sorted keys, so structurally equal
/// objects collapse to one key.
pub(crate) fn key_repr(value: &Value) -> String {
    value.to_string()
}

/// True for values countable as themselves; arrays and objects fall back to
/// their canonical rendering.
pub(crate) fn is_scalar(value: &Value) -> bool {
    !matches!(value, Value::Array(_) | Value::Object(_))
}

/// Insertion-ordered map from JSON values to JSON values.
///
/// Replacing a value keeps the key's original position. Equality is
/// order-insensitive (same keys mapping to equal values).
#[derive(Debug, Clone, Default)]
pub(crate) struct ValueMap {
    entries: Vec<(Value, Value)>,
    index: AHashMap<String, usize>,
}

impl ValueMap {
    pub(crate) fn new() -> Self {
        Self::default()
    }

    pub(crate) fn with_capacity(capacity: usize) -> Self {
        Self {
            entries: Vec::with_capacity(capacity),
            index: AHashMap::with_capacity(capacity),
        }
    }

    pub(crate) fn len(&self) -> usize {
        self.entries.len()
    }

    pub(crate) fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub(crate) fn contains(&self, key: &Value) -> bool {
        self.index.contains_key(&key_repr(key))
    }

    pub(crate) fn get(&self, key: &Value) -> Option<&Value> {
        let position = *self.index.get(&key_repr(key))?;
        Some(&self.entries[position].1)
    }

    pub(crate) fn get_mut(&mut self, key: &Value) -> Option<&mut Value> {
        let position = *self.index.get(&key_repr(key))?;
        Some(&mut self.entries[position].1)
    }

    /// Insert or replace; returns the previous value when the key existed.
    pub(crate) fn insert(&mut self, key: Value, value: Value) -> Option<Value> {
        match self.index.get(&key_repr(&key)) {
            Some(&position) => {
                let slot = &mut self.entries[position].1;
                Some(std::mem::replace(slot, value))
            }
            None => {
                self.index.insert(key_repr(&key), self.entries.len());
                self.entries.push((key, value));
                None
            }
        }
    }

    pub(crate) fn iter(&self) -> impl Iterator<Item = (&Value, &Value)> {
        self.entries.iter().map(|(key, value)| (key, value))
    }

    pub(crate) fn keys(&self) -> impl Iterator<Item = &Value> {
        self.entries.iter().map(|(key, _)| key)
    }

    pub(crate) fn values(&self) -> impl Iterator<Item = &Value> {
        self.entries.iter().map(|(_, value)| value)
    }

    pub(crate) fn into_entries(self) -> Vec<(Value, Value)> {
        self.entries
    }
}

impl PartialEq for ValueMap {
    fn eq(&self, other: &Self) -> bool {
        self.len() == other.len()
            && self
                .iter()
                .all(|(key, value)| other.get(key) == Some(value))
    }
}

impl FromIterator<(Value, Value)> for ValueMap {
    fn from_iter<I: IntoIterator<Item = (Value, Value)>>(iter: I) -> Self {
        let mut map = ValueMap::new();
        for (key, value) in iter {
            map.insert(key, value);
        }
        map
    }
}

/// Insertion-ordered set of unique JSON values.
#[derive(Debug, Clone, Default)]
pub(crate) struct ValueSet {
    items: Vec<Value>,
    index: AHashMap<String, usize>,
}

impl ValueSet {
    pub(crate) fn new() -> Self {
        Self::default()
    }

    pub(crate) fn len(&self) -> usize {
        self.items.len()
    }

    pub(crate) fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub(crate) fn contains(&self, value: &Value) -> bool {
        self.index.contains_key(&key_repr(value))
    }

    /// Insert; returns false when the value was already present.
    pub(crate) fn insert(&mut self, value: Value) -> bool {
        let repr = key_repr(&value);
        if self.index.contains_key(&repr) {
            return false;
        }
        self.index.insert(repr, self.items.len());
        self.items.push(value);
        true
    }

    pub(crate) fn iter(&self) -> std::slice::Iter<'_, Value> {
        self.items.iter()
    }

    pub(crate) fn into_items(self) -> Vec<Value> {
        self.items
    }
}

impl PartialEq for ValueSet {
    fn eq(&self, other: &Self) -> bool {
        self.len() == other.len() && self.iter().all(|value| other.contains(value))
    }
}

impl FromIterator<Value> for ValueSet {
    fn from_iter<I: IntoIterator<Item = Value>>(iter: I) -> Self {
        let mut set = ValueSet::new();
        for value in iter {
            set.insert(value);
        }
        set
    }
}
