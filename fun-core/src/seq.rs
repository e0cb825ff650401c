//! Wrapped sequence

use std::fmt;

use serde_json::Value;

use crate::capability::{
    add_numeric, count_frequencies, numeric_value, stable_sort_by_key, NumAcc,
};
use crate::error::{FunError, Result};
use crate::map::FunMap;
use crate::ordered::ValueMap;
use crate::set::FunSet;
use crate::wrap::{wrap, Wrapped};

/// Insertion-ordered sequence of JSON values with chainable transforms.
///
/// Every operation returns a fresh owned container; the receiver is never
/// mutated, so a failed operation cannot leave it corrupted.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct FunSeq {
    items: Vec<Value>,
}

impl FunSeq {
    /// Empty sequence.
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of elements.
    pub fn len(&self) -> usize {
        self.items.len()
    }

    /// True when the sequence holds no elements.
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Borrow the underlying elements.
    pub fn items(&self) -> &[Value] {
        &self.items
    }

    /// Iterate the elements in order.
    pub fn iter(&self) -> std::slice::Iter<'_, Value> {
        self.items.iter()
    }

    /// Element access with lazy re-wrapping: container elements come back as
    /// fresh wrapped variants.
    pub fn get(&self, index: usize) -> Option<Wrapped> {
        self.items.get(index).map(|value| wrap(value.clone()))
    }

    /// First element, or `None` on an empty sequence.
    pub fn head(&self) -> Option<Wrapped> {
        self.get(0)
    }

    /// Last element, or `None` on an empty sequence.
    pub fn tail(&self) -> Option<Wrapped> {
        self.items.last().map(|value| wrap(value.clone()))
    }

    /// Apply `f` to each element, yielding a new sequence.
    pub fn map<F>(&self, mut f: F) -> FunSeq
    where
        F: FnMut(&Value) -> Value,
    {
        self.items.iter().map(|item| f(item)).collect()
    }

    /// Keep elements satisfying `pred`, preserving relative order.
    pub fn filter<F>(&self, mut pred: F) -> FunSeq
    where
        F: FnMut(&Value) -> bool,
    {
        self.items
            .iter()
            .filter(|item| pred(item))
            .cloned()
            .collect()
    }

    /// Left fold. Without an initial value the first element seeds the
    /// accumulator and folding starts at the second; an empty sequence then
    /// fails with [`FunError::EmptyReduction`]. The result is re-wrapped.
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

    /// Stable sort by the canonical value ordering.
    pub fn sort(&self, reverse: bool) -> FunSeq {
        self.sort_by(|item| item.clone(), reverse)
    }

    /// Stable sort by a projected key.
    pub fn sort_by<F>(&self, key_fn: F, reverse: bool) -> FunSeq
    where
        F: FnMut(&Value) -> Value,
    {
        let mut items = self.items.clone();
        stable_sort_by_key(&mut items, key_fn, reverse);
        FunSeq { items }
    }

    /// Count occurrences of each element in first-seen order. Container
    /// elements are counted by their canonical rendering.
    pub fn frequency(&self) -> FunMap {
        count_frequencies(self.items.iter(), None::<fn(&Value) -> bool>)
    }

    /// [`frequency`](Self::frequency) with elements failing `pred` excluded
    /// before counting.
    pub fn frequency_if<F>(&self, pred: F) -> FunMap
    where
        F: FnMut(&Value) -> bool,
    {
        count_frequencies(self.items.iter(), Some(pred))
    }

    /// Splice one level of sub-sequences in place; other elements are kept
    /// as-is.
    pub fn flatten(&self) -> FunSeq {
        let mut flat = Vec::with_capacity(self.items.len());
        for item in &self.items {
            match item {
                Value::Array(inner) => flat.extend(inner.iter().cloned()),
                other => flat.push(other.clone()),
            }
        }
        FunSeq { items: flat }
    }

    /// Sum of numeric elements. Integer totals promote to float when a float
    /// appears or the integer range overflows; any non-numeric element fails
    /// with [`FunError::NonNumeric`]. An empty sequence sums to zero.
    pub fn sum(&self) -> Result<Value> {
        let mut acc = NumAcc::Int(0);
        for item in &self.items {
            acc = add_numeric(acc, item)?;
        }
        Ok(numeric_value(acc))
    }

    /// Build a mapping from a sequence of two-element pairs; later pairs
    /// overwrite earlier ones. Fails with [`FunError::MalformedPair`] on the
    /// first element that is not a pair.
    pub fn to_mapping(&self) -> Result<FunMap> {
        let mut entries = ValueMap::with_capacity(self.items.len());
        for (index, item) in self.items.iter().enumerate() {
            let (key, value) = pair_of(item, index)?;
            entries.insert(key, value);
        }
        Ok(FunMap::from_ordered(entries))
    }

    /// Build a mapping keyed by `key_fn(element)`, keeping each element as
    /// the value; later collisions overwrite.
    pub fn to_mapping_by<F>(&self, mut key_fn: F) -> FunMap
    where
        F: FnMut(&Value) -> Value,
    {
        let mut entries = ValueMap::with_capacity(self.items.len());
        for item in &self.items {
            entries.insert(key_fn(item), item.clone());
        }
        FunMap::from_ordered(entries)
    }

    /// Build a mapping from two-element pairs where colliding keys
    /// accumulate a sequence of their values.
    pub fn group_pairs(&self) -> Result<FunMap> {
        let mut grouped = ValueMap::new();
        for (index, item) in self.items.iter().enumerate() {
            let (key, value) = pair_of(item, index)?;
            push_group(&mut grouped, key, value);
        }
        Ok(FunMap::from_ordered(grouped))
    }

    /// Group elements by `key_fn(element)`: each key accumulates the
    /// sequence of elements that produced it, in encounter order.
    pub fn group_by<F>(&self, mut key_fn: F) -> FunMap
    where
        F: FnMut(&Value) -> Value,
    {
        let mut grouped = ValueMap::new();
        for item in &self.items {
            push_group(&mut grouped, key_fn(item), item.clone());
        }
        FunMap::from_ordered(grouped)
    }

    /// Merge a sequence of mappings into one mapping where each key
    /// accumulates the sequence of values seen for it; sequence-valued
    /// entries splice their elements into the group. Fails with
    /// [`FunError::MalformedMerge`] if any element is not a mapping.
    pub fn merge_mappings(&self) -> Result<FunMap> {
        for (index, item) in self.items.iter().enumerate() {
            if !matches!(item, Value::Object(_)) {
                return Err(FunError::MalformedMerge { index });
            }
        }
        let mut merged = ValueMap::new();
        for item in &self.items {
            if let Value::Object(object) = item {
                for (key, value) in object {
                    let key = Value::String(key.clone());
                    match value {
                        Value::Array(inner) => {
                            for element in inner {
                                push_group(&mut merged, key.clone(), element.clone());
                            }
                        }
                        other => push_group(&mut merged, key.clone(), other.clone()),
                    }
                }
            }
        }
        Ok(FunMap::from_ordered(merged))
    }

    /// De-duplicate into a set, keeping first-seen order.
    pub fn to_set(&self) -> FunSet {
        self.items.iter().cloned().collect()
    }

    /// Raw-value view (an array) without consuming the sequence.
    pub fn to_value(&self) -> Value {
        Value::Array(self.items.clone())
    }

    /// Convert into a raw array value.
    pub fn into_value(self) -> Value {
        Value::Array(self.items)
    }
}

fn pair_of(value: &Value, index: usize) -> Result<(Value, Value)> {
    match value {
        Value::Array(pair) if pair.len() == 2 => Ok((pair[0].clone(), pair[1].clone())),
        _ => Err(FunError::MalformedPair { index }),
    }
}

fn push_group(grouped: &mut ValueMap, key: Value, value: Value) {
    match grouped.get_mut(&key) {
        Some(Value::Array(group)) => group.push(value),
        _ => {
            grouped.insert(key, Value::Array(vec![value]));
        }
    }
}

impl From<Vec<Value>> for FunSeq {
    fn from(items: Vec<Value>) -> Self {
        FunSeq { items }
    }
}

impl FromIterator<Value> for FunSeq {
    fn from_iter<I: IntoIterator<Item = Value>>(iter: I) -> Self {
        FunSeq {
            items: iter.into_iter().collect(),
        }
    }
}

impl fmt::Display for FunSeq {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.to_value())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn seq(values: Vec<Value>) -> FunSeq {
        FunSeq::from(values)
    }

    #[test]
    fn filter_preserves_order() {
        let filtered = seq(vec![json!(3), json!(1), json!(4), json!(1), json!(5)])
            .filter(|v| v.as_i64().unwrap() > 1);
        assert_eq!(filtered.items(), &[json!(3), json!(4), json!(5)]);
    }

    #[test]
    fn reduce_without_initial_seeds_from_first() {
        let total = seq(vec![json!(1), json!(2), json!(3)])
            .reduce(
                |acc, item| json!(acc.as_i64().unwrap() + item.as_i64().unwrap()),
                None,
            )
            .unwrap();
        assert_eq!(total.as_scalar(), Some(&json!(6)));
    }

    #[test]
    fn reduce_on_empty_without_initial_fails() {
        let result = FunSeq::new().reduce(|acc, _| acc, None);
        assert!(matches!(result, Err(FunError::EmptyReduction)));
    }

    #[test]
    fn flatten_splices_one_level() {
        let flat = seq(vec![json!([1, 2]), json!(3), json!([[4], 5])]).flatten();
        assert_eq!(flat.items(), &[json!(1), json!(2), json!(3), json!([4]), json!(5)]);
    }

    #[test]
    fn sum_promotes_to_float_when_floats_appear() {
        assert_eq!(seq(vec![json!(1), json!(2)]).sum().unwrap(), json!(3));
        assert_eq!(seq(vec![json!(1), json!(2.5)]).sum().unwrap(), json!(3.5));
        assert_eq!(FunSeq::new().sum().unwrap(), json!(0));
    }

    #[test]
    fn sum_rejects_non_numeric_content() {
        let result = seq(vec![json!(1), json!("two")]).sum();
        assert!(matches!(
            result,
            Err(FunError::NonNumeric { found: "string" })
        ));
    }

    #[test]
    fn to_mapping_requires_pairs() {
        let result = seq(vec![json!(["a", 1]), json!([1, 2, 3])]).to_mapping();
        assert!(matches!(result, Err(FunError::MalformedPair { index: 1 })));
    }

    #[test]
    fn group_by_accumulates_in_encounter_order() {
        let grouped = seq(vec![json!(["a", 1]), json!(["a", 2]), json!(["b", 3])])
            .group_by(|pair| pair[0].clone());
        assert_eq!(
            grouped.get_raw(&json!("a")),
            Some(&json!([["a", 1], ["a", 2]]))
        );
        assert_eq!(grouped.get_raw(&json!("b")), Some(&json!([["b", 3]])));
    }

    #[test]
    fn merge_mappings_accumulates_and_splices() {
        let merged = seq(vec![
            json!({"a": 1, "b": [2, 3]}),
            json!({"a": 4}),
        ])
        .merge_mappings()
        .unwrap();
        assert_eq!(merged.get_raw(&json!("a")), Some(&json!([1, 4])));
        assert_eq!(merged.get_raw(&json!("b")), Some(&json!([2, 3])));
    }

    #[test]
    fn merge_mappings_rejects_non_mappings() {
        let result = seq(vec![json!({"a": 1}), json!(2)]).merge_mappings();
        assert!(matches!(result, Err(FunError::MalformedMerge { index: 1 })));
    }

    #[test]
    fn head_and_tail_rewrap_containers() {
        let sequence = seq(vec![json!([1]), json!(2), json!({"k": 3})]);
        assert!(matches!(sequence.head(), Some(Wrapped::Sequence(_))));
        assert!(matches!(sequence.tail(), Some(Wrapped::Mapping(_))));
        assert_eq!(FunSeq::new().head(), None);
        assert_eq!(FunSeq::new().tail(), None);
    }
}
