//! Wrap dispatcher and the tagged wrapped-container type

use std::fmt;
use std::io::Write;

use serde_json::Value;

use crate::map::FunMap;
use crate::seq::FunSeq;
use crate::set::FunSet;

/// A raw value classified into its wrapped variant.
///
/// Transforms whose output shape depends on the data (mapping `map`,
/// `reduce`, element access) return this type; the caller matches on the
/// tag or converts back to a raw value with [`Wrapped::into_value`].
#[derive(Debug, Clone, PartialEq)]
pub enum Wrapped {
    /// Ordered sequence of values.
    Sequence(FunSeq),
    /// Insertion-ordered mapping.
    Mapping(FunMap),
    /// Insertion-ordered set of unique values.
    Set(FunSet),
    /// Scalar passed through unchanged (strings included).
    Scalar(Value),
}

/// Classify a raw value into its wrapped variant.
///
/// Strings pass through unchanged: they are iterable in spirit but are never
/// treated as sequences of characters here. Objects become mappings, arrays
/// become sequences, and remaining scalars pass through. Raw JSON has no set
/// kind; sets enter the system through [`FunSet`] constructors and
/// [`FunSeq::to_set`].
pub fn wrap(value: Value) -> Wrapped {
    match value {
        Value::Object(map) => Wrapped::Mapping(FunMap::from_object(map)),
        Value::Array(items) => Wrapped::Sequence(FunSeq::from(items)),
        scalar => Wrapped::Scalar(scalar),
    }
}

/// Adapt a pure function so every return value re-enters the capability
/// system already classified.
///
/// The function must be pure for cache compatibility; this is a documented
/// contract, not an enforced one.
pub fn auto_wrap<A, F>(f: F) -> impl Fn(A) -> Wrapped
where
    F: Fn(A) -> Value,
{
    move |input| wrap(f(input))
}

impl Wrapped {
    /// Convert back to a raw value. Sets render as arrays in insertion order.
    pub fn into_value(self) -> Value {
        match self {
            Wrapped::Sequence(seq) => seq.into_value(),
            Wrapped::Mapping(map) => map.into_value(),
            Wrapped::Set(set) => set.into_value(),
            Wrapped::Scalar(value) => value,
        }
    }

    /// Raw-value view without consuming the wrapper.
    pub fn to_value(&self) -> Value {
        self.clone().into_value()
    }

    /// Borrow the sequence variant, if that is what this is.
    pub fn as_sequence(&self) -> Option<&FunSeq> {
        match self {
            Wrapped::Sequence(seq) => Some(seq),
            _ => None,
        }
    }

    /// Borrow the mapping variant, if that is what this is.
    pub fn as_mapping(&self) -> Option<&FunMap> {
        match self {
            Wrapped::Mapping(map) => Some(map),
            _ => None,
        }
    }

    /// Borrow the set variant, if that is what this is.
    pub fn as_set(&self) -> Option<&FunSet> {
        match self {
            Wrapped::Set(set) => Some(set),
            _ => None,
        }
    }

    /// Borrow the scalar, if that is what this is.
    pub fn as_scalar(&self) -> Option<&Value> {
        match self {
            Wrapped::Scalar(value) => Some(value),
            _ => None,
        }
    }

    /// Send the plain string form to an export sink.
    pub fn export<S: ExportSink>(&self, sink: &mut S) -> std::io::Result<()> {
        sink.accept(&self.to_string())
    }

    /// Send the pretty-printed JSON form to an export sink.
    pub fn export_json<S: ExportSink>(&self, sink: &mut S) -> std::io::Result<()> {
        let pretty = serde_json::to_string_pretty(&self.to_value()).map_err(std::io::Error::other)?;
        sink.accept(&pretty)
    }
}

impl fmt::Display for Wrapped {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.to_value())
    }
}

impl From<FunSeq> for Wrapped {
    fn from(seq: FunSeq) -> Self {
        Wrapped::Sequence(seq)
    }
}

impl From<FunMap> for Wrapped {
    fn from(map: FunMap) -> Self {
        Wrapped::Mapping(map)
    }
}

impl From<FunSet> for Wrapped {
    fn from(set: FunSet) -> Self {
        Wrapped::Set(set)
    }
}

/// External sink accepting exported string payloads.
///
/// Clipboard-style integrations implement this seam; the core never touches
/// the transport itself.
pub trait ExportSink {
    /// Accept one exported payload.
    fn accept(&mut self, payload: &str) -> std::io::Result<()>;
}

/// Sink adapter over any [`std::io::Write`] target.
#[derive(Debug)]
pub struct WriterSink<W: Write>(pub W);

impl<W: Write> ExportSink for WriterSink<W> {
    fn accept(&mut self, payload: &str) -> std::io::Result<()> {
        self.0.write_all(payload.as_bytes())
    }
}
