//! Shared transform algorithms behind the capability layer
//!
//! Every wrapped variant delegates here, so map/reduce/sort/frequency behave
//! identically regardless of the receiver's kind.

use std::cmp::Ordering;

use serde_json::{Number, Value};

use crate::error::{FunError, Result};
use crate::map::FunMap;
use crate::ordered::{is_scalar, key_repr, ValueMap};
use crate::seq::FunSeq;
use crate::wrap::Wrapped;

/// Human-readable kind of a value, used in error messages.
pub(crate) fn kind_name(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "sequence",
        Value::Object(_) => "mapping",
    }
}

fn type_rank(value: &Value) -> u8 {
    match value {
        Value::Null => 0,
        Value::Bool(_) => 1,
        Value::Number(_) => 2,
        Value::String(_) => 3,
        Value::Array(_) => 4,
        Value::Object(_) => 5,
    }
}

fn number_cmp(a: &Number, b: &Number) -> Ordering {
    if let (Some(x), Some(y)) = (a.as_i64(), b.as_i64()) {
        return x.cmp(&y);
    }
    let x = a.as_f64().unwrap_or(0.0);
    let y = b.as_f64().unwrap_or(0.0);
    x.partial_cmp(&y).unwrap_or(Ordering::Equal)
}

/// Total ordering over JSON values: type rank first, then within-kind order.
///
/// Heterogeneous elements sort by kind (null, bool, number, string,
/// sequence, mapping) rather than failing.
pub(crate) fn value_cmp(a: &Value, b: &Value) -> Ordering {
    match (a, b) {
        (Value::Null, Value::Null) => Ordering::Equal,
        (Value::Bool(x), Value::Bool(y)) => x.cmp(y),
        (Value::Number(x), Value::Number(y)) => number_cmp(x, y),
        (Value::String(x), Value::String(y)) => x.cmp(y),
        (Value::Array(x), Value::Array(y)) => {
            for (left, right) in x.iter().zip(y.iter()) {
                let ordering = value_cmp(left, right);
                if ordering != Ordering::Equal {
                    return ordering;
                }
            }
            x.len().cmp(&y.len())
        }
        (Value::Object(_), Value::Object(_)) => key_repr(a).cmp(&key_repr(b)),
        _ => type_rank(a).cmp(&type_rank(b)),
    }
}

/// Stable sort by a projected key, optionally reversed.
///
/// Ties keep their original relative order in both directions.
pub(crate) fn stable_sort_by_key<T, F>(items: &mut Vec<T>, mut key_of: F, reverse: bool)
where
    F: FnMut(&T) -> Value,
{
    let mut decorated: Vec<(Value, T)> = items.drain(..).map(|item| (key_of(&item), item)).collect();
    decorated.sort_by(|a, b| {
        let ordering = value_cmp(&a.0, &b.0);
        if reverse {
            ordering.reverse()
        } else {
            ordering
        }
    });
    items.extend(decorated.into_iter().map(|(_, item)| item));
}

/// Count occurrences of each value in first-seen order.
///
/// Arrays and objects are counted by their canonical rendering instead of
/// failing. The predicate sees the value as counted (post-fallback) and
/// excludes failures before counting.
pub(crate) fn count_frequencies<'a, I, F>(values: I, mut pred: Option<F>) -> FunMap
where
    I: Iterator<Item = &'a Value>,
    F: FnMut(&Value) -> bool,
{
    let mut counts = ValueMap::new();
    for value in values {
        let counted = if is_scalar(value) {
            value.clone()
        } else {
            Value::String(key_repr(value))
        };
        if let Some(pred) = pred.as_mut() {
            if !pred(&counted) {
                continue;
            }
        }
        let next = counts.get(&counted).and_then(Value::as_i64).unwrap_or(0) + 1;
        counts.insert(counted, Value::from(next));
    }
    FunMap::from_ordered(counts)
}

/// Choose the wrapped shape for mapping-map results.
///
/// A mapping when every result is a two-element pair and the pair keys are
/// unique; otherwise a sequence of the raw results.
pub(crate) fn rewrap_pairs(results: Vec<Value>) -> Wrapped {
    let mut pairs = ValueMap::with_capacity(results.len());
    let mut is_mapping = true;
    for value in &results {
        match value {
            Value::Array(pair) if pair.len() == 2 => {
                if pairs.insert(pair[0].clone(), pair[1].clone()).is_some() {
                    is_mapping = false;
                    break;
                }
            }
            _ => {
                is_mapping = false;
                break;
            }
        }
    }
    if is_mapping {
        Wrapped::Mapping(FunMap::from_ordered(pairs))
    } else {
        Wrapped::Sequence(FunSeq::from(results))
    }
}

/// Numeric accumulator for `sum`: integer until a float appears or the
/// integer range overflows, float afterwards.
pub(crate) enum NumAcc {
    Int(i64),
    Float(f64),
}

pub(crate) fn add_numeric(acc: NumAcc, value: &Value) -> Result<NumAcc> {
    let number = match value {
        Value::Number(number) => number,
        other => {
            return Err(FunError::NonNumeric {
                found: kind_name(other),
            })
        }
    };
    Ok(match acc {
        NumAcc::Int(total) => {
            if let Some(int) = number.as_i64() {
                match total.checked_add(int) {
                    Some(sum) => NumAcc::Int(sum),
                    None => NumAcc::Float(total as f64 + int as f64),
                }
            } else {
                NumAcc::Float(total as f64 + number.as_f64().unwrap_or(0.0))
            }
        }
        NumAcc::Float(total) => NumAcc::Float(total + number.as_f64().unwrap_or(0.0)),
    })
}

pub(crate) fn numeric_value(acc: NumAcc) -> Value {
    match acc {
        NumAcc::Int(total) => Value::from(total),
        NumAcc::Float(total) => Value::from(total),
    }
}
