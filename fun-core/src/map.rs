//! Wrapped mapping

use std::fmt;

use serde_json::Value;

use crate::capability::{count_frequencies, rewrap_pairs, stable_sort_by_key};
use crate::error::{FunError, Result};
use crate::ordered::ValueMap;
use crate::seq::FunSeq;
use crate::wrap::{wrap, Wrapped};

/// Selection spec for [`FunMap::select`]: keep a key as-is or rename it.
#[derive(Debug, Clone, PartialEq)]
pub enum Select {
    /// Keep the entry under its own key.
    Key(Value),
    /// Keep the entry under a new key: `As(key, alias)`.
    As(Value, Value),
}

impl Select {
    /// Spec keeping `key` under its own name.
    pub fn key(key: impl Into<Value>) -> Self {
        Select::Key(key.into())
    }

    /// Spec renaming `key` to `alias` on output.
    pub fn renamed(key: impl Into<Value>, alias: impl Into<Value>) -> Self {
        Select::As(key.into(), alias.into())
    }
}

/// Insertion-ordered mapping from JSON values to JSON values with chainable
/// transforms.
///
/// Keys may be any JSON value and stay unique by canonical rendering. Every
/// operation returns a fresh owned container; the receiver is never mutated.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct FunMap {
    entries: ValueMap,
}

impl FunMap {
    /// Empty mapping.
    pub fn new() -> Self {
        Self::default()
    }

    pub(crate) fn from_ordered(entries: ValueMap) -> Self {
        FunMap { entries }
    }

    /// Build from a raw JSON object, preserving its entry order.
    pub fn from_object(object: serde_json::Map<String, Value>) -> Self {
        object
            .into_iter()
            .map(|(key, value)| (Value::String(key), value))
            .collect()
    }

    /// Insert or replace an entry; replacing keeps the key's position.
    pub fn insert(&mut self, key: Value, value: Value) -> Option<Value> {
        self.entries.insert(key, value)
    }

    /// Number of entries.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// True when the mapping holds no entries.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// True when `key` is present.
    pub fn contains(&self, key: &Value) -> bool {
        self.entries.contains(key)
    }

    /// Entry access with lazy re-wrapping: container values come back as
    /// fresh wrapped variants.
    pub fn get(&self, key: &Value) -> Option<Wrapped> {
        self.entries.get(key).map(|value| wrap(value.clone()))
    }

    /// Borrow the raw value stored under `key`.
    pub fn get_raw(&self, key: &Value) -> Option<&Value> {
        self.entries.get(key)
    }

    /// Iterate entries in insertion order.
    pub fn iter(&self) -> impl Iterator<Item = (&Value, &Value)> {
        self.entries.iter()
    }

    /// Keys as a sequence, in insertion order.
    pub fn keys(&self) -> FunSeq {
        self.entries.keys().cloned().collect()
    }

    /// Values as a sequence, in insertion order.
    pub fn values(&self) -> FunSeq {
        self.entries.values().cloned().collect()
    }

    /// Entries as a sequence of `[key, value]` pairs.
    pub fn items(&self) -> FunSeq {
        self.entries
            .iter()
            .map(|(key, value)| Value::Array(vec![key.clone(), value.clone()]))
            .collect()
    }

    /// Apply `f` to each `(key, value)` entry. The results become a mapping
    /// when every one is a two-element pair with unique keys, otherwise a
    /// sequence of the raw results.
    pub fn map<F>(&self, mut f: F) -> Wrapped
    where
        F: FnMut(&Value, &Value) -> Value,
    {
        let results: Vec<Value> = self.entries.iter().map(|(key, value)| f(key, value)).collect();
        rewrap_pairs(results)
    }

    /// Left fold over entries; the closure receives `(accumulator, key,
    /// value)`. Without an initial value the first `[key, value]` pair seeds
    /// the accumulator and folding starts at the second entry; an empty
    /// mapping then fails with [`FunError::EmptyReduction`].
    pub fn reduce<F>(&self, mut f: F, initial: Option<Value>) -> Result<Wrapped>
    where
        F: FnMut(Value, &Value, &Value) -> Value,
    {
        let mut entries = self.entries.iter();
        let mut acc = match initial {
            Some(seed) => seed,
            None => {
                let (key, value) = entries.next().ok_or(FunError::EmptyReduction)?;
                Value::Array(vec![key.clone(), value.clone()])
            }
        };
        for (key, value) in entries {
            acc = f(acc, key, value);
        }
        Ok(wrap(acc))
    }

    /// Stable re-ordering of entries by a key projected from `(key, value)`.
    /// The result is still keyed as before; only iteration order changes.
    pub fn sort_by<F>(&self, mut key_fn: F, reverse: bool) -> FunMap
    where
        F: FnMut(&Value, &Value) -> Value,
    {
        let mut entries: Vec<(Value, Value)> = self
            .entries
            .iter()
            .map(|(key, value)| (key.clone(), value.clone()))
            .collect();
        stable_sort_by_key(&mut entries, |(key, value)| key_fn(key, value), reverse);
        entries.into_iter().collect()
    }

    /// Stable sort of entries by key.
    pub fn key_sort(&self) -> FunMap {
        self.key_sort_by(|key| key.clone())
    }

    /// Stable sort of entries by a key projection.
    pub fn key_sort_by<F>(&self, mut f: F) -> FunMap
    where
        F: FnMut(&Value) -> Value,
    {
        self.sort_by(|key, _| f(key), false)
    }

    /// Stable sort of entries by value.
    pub fn value_sort(&self) -> FunMap {
        self.value_sort_by(|value| value.clone())
    }

    /// Stable sort of entries by a value projection.
    pub fn value_sort_by<F>(&self, mut f: F) -> FunMap
    where
        F: FnMut(&Value) -> Value,
    {
        self.sort_by(|_, value| f(value), false)
    }

    /// Keep entries whose key satisfies `pred`, preserving relative order.
    pub fn key_filter<F>(&self, mut pred: F) -> FunMap
    where
        F: FnMut(&Value) -> bool,
    {
        self.entries
            .iter()
            .filter(|(key, _)| pred(key))
            .map(|(key, value)| (key.clone(), value.clone()))
            .collect()
    }

    /// Keep entries whose value satisfies `pred`, preserving relative order.
    pub fn value_filter<F>(&self, mut pred: F) -> FunMap
    where
        F: FnMut(&Value) -> bool,
    {
        self.entries
            .iter()
            .filter(|(_, value)| pred(value))
            .map(|(key, value)| (key.clone(), value.clone()))
            .collect()
    }

    /// Project keys into a plain sequence (not re-keyed).
    pub fn key_map<F>(&self, mut f: F) -> FunSeq
    where
        F: FnMut(&Value) -> Value,
    {
        self.entries.keys().map(|key| f(key)).collect()
    }

    /// Project values into a plain sequence (not re-keyed).
    pub fn value_map<F>(&self, mut f: F) -> FunSeq
    where
        F: FnMut(&Value) -> Value,
    {
        self.entries.values().map(|value| f(value)).collect()
    }

    /// Build a new mapping containing only the requested entries, in spec
    /// order. Fails with [`FunError::MissingKey`] when a requested key is
    /// absent.
    pub fn select(&self, specs: &[Select]) -> Result<FunMap> {
        let mut selected = ValueMap::with_capacity(specs.len());
        for spec in specs {
            let (key, alias) = match spec {
                Select::Key(key) => (key, key),
                Select::As(key, alias) => (key, alias),
            };
            let value = self
                .entries
                .get(key)
                .ok_or_else(|| FunError::MissingKey {
                    key: key.to_string(),
                })?;
            selected.insert(alias.clone(), value.clone());
        }
        Ok(FunMap::from_ordered(selected))
    }

    /// Count occurrences of each value in first-seen order. Container values
    /// are counted by their canonical rendering.
    pub fn frequency(&self) -> FunMap {
        count_frequencies(self.entries.values(), None::<fn(&Value) -> bool>)
    }

    /// [`frequency`](Self::frequency) with values failing `pred` excluded
    /// before counting.
    pub fn frequency_if<F>(&self, pred: F) -> FunMap
    where
        F: FnMut(&Value) -> bool,
    {
        count_frequencies(self.entries.values(), Some(pred))
    }

    /// Total leaf count across values: sequences count their length, nested
    /// mappings count recursively, scalars count one.
    pub fn value_len(&self) -> usize {
        self.entries.values().map(leaf_count).sum()
    }

    /// Raw-value view (an object) without consuming the mapping. Non-string
    /// keys render as their canonical form.
    pub fn to_value(&self) -> Value {
        let mut object = serde_json::Map::new();
        for (key, value) in self.entries.iter() {
            object.insert(object_key(key), value.clone());
        }
        Value::Object(object)
    }

    /// Convert into a raw object value.
    pub fn into_value(self) -> Value {
        self.to_value()
    }
}

fn leaf_count(value: &Value) -> usize {
    match value {
        Value::Array(items) => items.len(),
        Value::Object(object) => object.values().map(leaf_count).sum(),
        _ => 1,
    }
}

fn object_key(key: &Value) -> String {
    match key {
        Value::String(text) => text.clone(),
        other => other.to_string(),
    }
}

impl FromIterator<(Value, Value)> for FunMap {
    fn from_iter<I: IntoIterator<Item = (Value, Value)>>(iter: I) -> Self {
        FunMap {
            entries: iter.into_iter().collect(),
        }
    }
}

impl fmt::Display for FunMap {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.to_value())
    }
}
