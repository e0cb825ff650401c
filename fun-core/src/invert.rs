//! Structural inversion of wrapped mappings
//!
//! Inversion turns a mapping into its value-to-keys inverse. The "how to
//! invert" policy differs per value kind, so the operation first classifies
//! every value and requires the kinds to be homogeneous.

use serde_json::Value;

use crate::capability::kind_name;
use crate::error::{FunError, Result};
use crate::map::FunMap;
use crate::ordered::ValueMap;

/// Tally of invertible value kinds seen during classification.
#[derive(Debug, Default)]
struct KindTally {
    mapping: usize,
    string: usize,
    integer: usize,
    float: usize,
}

impl KindTally {
    fn record(&mut self, value: &Value) -> Result<()> {
        match value {
            Value::Object(_) => self.mapping += 1,
            Value::String(_) => self.string += 1,
            Value::Number(number) if number.is_i64() || number.is_u64() => self.integer += 1,
            Value::Number(_) => self.float += 1,
            other => {
                return Err(FunError::UnsupportedValueType {
                    found: kind_name(other),
                })
            }
        }
        Ok(())
    }

    fn buckets_present(&self) -> usize {
        [self.mapping, self.string, self.integer, self.float]
            .iter()
            .filter(|&&count| count > 0)
            .count()
    }

    fn summary(&self) -> String {
        format!(
            "{{mapping: {}, string: {}, integer: {}, float: {}}}",
            self.mapping, self.string, self.integer, self.float
        )
    }
}

impl FunMap {
    /// Invert into a mapping from each distinct value to the keys that
    /// mapped to it, preserving first-seen order of values and of keys
    /// within each group.
    ///
    /// Values must be homogeneous over {string, integer, float}: a mix of
    /// kinds fails with [`FunError::AmbiguousValueTypes`], and any value
    /// outside the classifiable set -- mapping-valued entries included --
    /// fails with [`FunError::UnsupportedValueType`]. An empty mapping
    /// inverts to an empty mapping without classification.
    ///
    /// With `smart_flatten`, singleton key groups are unwrapped to their
    /// sole element, but only when every group is a singleton (a 1:1
    /// mapping stays pleasant to work with; mixed group sizes are left
    /// untouched).
    pub fn invert(&self, smart_flatten: bool) -> Result<FunMap> {
        if self.is_empty() {
            return Ok(FunMap::new());
        }

        let mut tally = KindTally::default();
        for (_, value) in self.iter() {
            tally.record(value)?;
        }
        if tally.buckets_present() > 1 {
            return Err(FunError::AmbiguousValueTypes {
                tally: tally.summary(),
            });
        }
        if tally.mapping > 0 {
            // Nested-mapping inversion has no coherent group shape; reject
            // rather than guess.
            return Err(FunError::UnsupportedValueType { found: "mapping" });
        }

        let mut inverse = ValueMap::new();
        for (key, value) in self.iter() {
            match inverse.get_mut(value) {
                Some(Value::Array(group)) => group.push(key.clone()),
                _ => {
                    inverse.insert(value.clone(), Value::Array(vec![key.clone()]));
                }
            }
        }

        if smart_flatten {
            let all_singletons = inverse
                .values()
                .all(|group| matches!(group, Value::Array(group) if group.len() == 1));
            if all_singletons {
                inverse = inverse
                    .into_entries()
                    .into_iter()
                    .map(|(value, group)| match group {
                        Value::Array(mut group) => (value, group.swap_remove(0)),
                        other => (value, other),
                    })
                    .collect();
            }
        }

        Ok(FunMap::from_ordered(inverse))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn mapping(object: Value) -> FunMap {
        match object {
            Value::Object(object) => FunMap::from_object(object),
            other => panic!("expected object, got {other}"),
        }
    }

    #[test]
    fn inverts_grouping_keys_in_first_seen_order() {
        let inverse = mapping(json!({"a": "x", "b": "y", "c": "x"}))
            .invert(false)
            .unwrap();
        assert_eq!(inverse.get_raw(&json!("x")), Some(&json!(["a", "c"])));
        assert_eq!(inverse.get_raw(&json!("y")), Some(&json!(["b"])));
        let order: Vec<_> = inverse.keys().items().to_vec();
        assert_eq!(order, vec![json!("x"), json!("y")]);
    }

    #[test]
    fn smart_flatten_unwraps_uniform_singletons() {
        let source = mapping(json!({"a": 1, "b": 2}));
        let flattened = source.invert(true).unwrap();
        assert_eq!(flattened.get_raw(&json!(1)), Some(&json!("a")));
        assert_eq!(flattened.get_raw(&json!(2)), Some(&json!("b")));
    }

    #[test]
    fn smart_flatten_leaves_mixed_group_sizes_untouched() {
        let source = mapping(json!({"a": 1, "b": 1, "c": 2}));
        let inverted = source.invert(true).unwrap();
        assert_eq!(inverted.get_raw(&json!(1)), Some(&json!(["a", "b"])));
        assert_eq!(inverted.get_raw(&json!(2)), Some(&json!(["c"])));
        assert_eq!(inverted, source.invert(false).unwrap());
    }

    #[test]
    fn heterogeneous_values_are_rejected() {
        let result = mapping(json!({"a": 1, "b": "x"})).invert(true);
        match result {
            Err(FunError::AmbiguousValueTypes { tally }) => {
                assert!(tally.contains("string: 1"));
                assert!(tally.contains("integer: 1"));
            }
            other => panic!("expected ambiguity error, got {other:?}"),
        }
    }

    #[test]
    fn unsupported_kinds_are_rejected() {
        let result = mapping(json!({"a": [1, 2]})).invert(true);
        assert!(matches!(
            result,
            Err(FunError::UnsupportedValueType { found: "sequence" })
        ));

        let result = mapping(json!({"a": true})).invert(true);
        assert!(matches!(
            result,
            Err(FunError::UnsupportedValueType { found: "boolean" })
        ));
    }

    #[test]
    fn mapping_valued_entries_are_rejected_even_when_homogeneous() {
        let result = mapping(json!({"a": {"x": 1}, "b": {"y": 2}})).invert(true);
        assert!(matches!(
            result,
            Err(FunError::UnsupportedValueType { found: "mapping" })
        ));
    }

    #[test]
    fn empty_mapping_inverts_without_classification() {
        let inverse = FunMap::new().invert(true).unwrap();
        assert!(inverse.is_empty());
    }

    #[test]
    fn float_values_classify_as_floats() {
        let inverse = mapping(json!({"a": 1.5, "b": 2.5})).invert(false).unwrap();
        assert_eq!(inverse.get_raw(&json!(1.5)), Some(&json!(["a"])));
    }
}
