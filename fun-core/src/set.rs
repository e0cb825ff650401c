//! Wrapped set

use std::fmt;

use serde_json::Value;

use crate::capability::count_frequencies;
use crate::error::{FunError, Result};
use crate::map::FunMap;
use crate::ordered::ValueSet;
use crate::seq::FunSeq;
use crate::wrap::{wrap, Wrapped};

/// Insertion-ordered set of unique JSON values with chainable transforms.
///
/// Uniqueness follows the canonical value rendering, so `1` and `1.0` are
/// distinct members. Every operation returns a fresh owned container.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct FunSet {
    items: ValueSet,
}

impl FunSet {
    /// Empty set.
    pub fn new() -> Self {
        Self::default()
    }

    /// Build from any value iterator, de-duplicating in first-seen order.
    pub fn from_values(values: impl IntoIterator<Item = Value>) -> Self {
        values.into_iter().collect()
    }

    /// Insert; returns false when the value was already present.
    pub fn insert(&mut self, value: Value) -> bool {
        self.items.insert(value)
    }

    /// Number of members.
    pub fn len(&self) -> usize {
        self.items.len()
    }

    /// True when the set holds no members.
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// True when `value` is a member.
    pub fn contains(&self, value: &Value) -> bool {
        self.items.contains(value)
    }

    /// Iterate members in first-seen order.
    pub fn iter(&self) -> std::slice::Iter<'_, Value> {
        self.items.iter()
    }

    /// Apply `f` to each member; results are de-duplicated into a new set.
    pub fn map<F>(&self, mut f: F) -> FunSet
    where
        F: FnMut(&Value) -> Value,
    {
        self.items.iter().map(|item| f(item)).collect()
    }

    /// Left fold over members in first-seen order. Without an initial value
    /// the first member seeds the accumulator; an empty set then fails with
    /// [`FunError::EmptyReduction`]. The result is re-wrapped.
    pub fn reduce<F>(&self, mut f: F, initial: Option<Value>) -> Result<Wrapped>
    where
        F: FnMut(Value, &Value) -> Value,
    {
        let mut iter = self.items.iter();
        let mut acc = match initial {
            Some(seed) => seed,
            None => iter.next().cloned().ok_or(FunError::EmptyReduction)?,
        };
        for item in iter {
            acc = f(acc, item);
        }
        Ok(wrap(acc))
    }

    /// Members sorted by the canonical value ordering. A set cannot carry
    /// order, so the result is a sequence.
    pub fn sort(&self, reverse: bool) -> FunSeq {
        self.to_sequence().sort(reverse)
    }

    /// Members sorted by a projected key, as a sequence.
    pub fn sort_by<F>(&self, key_fn: F, reverse: bool) -> FunSeq
    where
        F: FnMut(&Value) -> Value,
    {
        self.to_sequence().sort_by(key_fn, reverse)
    }

    /// Count members (each counts once). Container members are counted by
    /// their canonical rendering.
    pub fn frequency(&self) -> FunMap {
        count_frequencies(self.items.iter(), None::<fn(&Value) -> bool>)
    }

    /// [`frequency`](Self::frequency) with members failing `pred` excluded
    /// before counting.
    pub fn frequency_if<F>(&self, pred: F) -> FunMap
    where
        F: FnMut(&Value) -> bool,
    {
        count_frequencies(self.items.iter(), Some(pred))
    }

    /// Members as a sequence in first-seen order.
    pub fn to_sequence(&self) -> FunSeq {
        self.items.iter().cloned().collect()
    }

    /// Raw-value view (an array in first-seen order) without consuming the
    /// set.
    pub fn to_value(&self) -> Value {
        Value::Array(self.items.iter().cloned().collect())
    }

    /// Convert into a raw array value in first-seen order.
    pub fn into_value(self) -> Value {
        Value::Array(self.items.into_items())
    }
}

impl FromIterator<Value> for FunSet {
    fn from_iter<I: IntoIterator<Item = Value>>(iter: I) -> Self {
        FunSet {
            items: iter.into_iter().collect(),
        }
    }
}

impl fmt::Display for FunSet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.to_value())
    }
}
