//! Deterministic call-key derivation

use serde_json::Value;
use smallvec::SmallVec;

/// Positional and keyword arguments of a cache-wrapped call.
///
/// The derived key is independent of caller-supplied keyword order: keyword
/// pairs sort by name before rendering, so `f(a=1, b=2)` and `f(b=2, a=1)`
/// land in the same cache slot.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct CallArgs {
    positional: SmallVec<[Value; 4]>,
    keywords: SmallVec<[(String, Value); 4]>,
}

impl CallArgs {
    /// No arguments.
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a positional argument.
    pub fn arg(mut self, value: impl Into<Value>) -> Self {
        self.positional.push(value.into());
        self
    }

    /// Append a keyword argument.
    pub fn kwarg(mut self, name: impl Into<String>, value: impl Into<Value>) -> Self {
        self.keywords.push((name.into(), value.into()));
        self
    }

    /// Positional arguments in call order.
    pub fn positional(&self) -> &[Value] {
        &self.positional
    }

    /// Keyword arguments in call order.
    pub fn keywords(&self) -> &[(String, Value)] {
        &self.keywords
    }

    /// Look up a keyword argument by name.
    pub fn keyword(&self, name: &str) -> Option<&Value> {
        self.keywords
            .iter()
            .find(|(keyword, _)| keyword == name)
            .map(|(_, value)| value)
    }

    /// Render the deterministic cache key: a JSON
    /// `[positional, sorted keyword pairs]` pair. This is also the key
    /// format of persisted cache documents.
    pub fn key(&self) -> String {
        let mut sorted: Vec<&(String, Value)> = self.keywords.iter().collect();
        sorted.sort_by(|a, b| a.0.cmp(&b.0));
        let keywords: Vec<Value> = sorted
            .into_iter()
            .map(|(name, value)| Value::Array(vec![Value::String(name.clone()), value.clone()]))
            .collect();
        Value::Array(vec![
            Value::Array(self.positional.to_vec()),
            Value::Array(keywords),
        ])
        .to_string()
    }
}
