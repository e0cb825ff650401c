//! Error types for the functional collection layer

use thiserror::Error;

/// Errors raised by wrapped-collection transforms
#[derive(Debug, Error)]
pub enum FunError {
    /// Reduce was called on an empty collection with no initial value.
    #[error("Cannot reduce an empty collection without an initial value")]
    EmptyReduction,
    /// Sequence-to-mapping conversion met an element that is not a two-element pair.
    #[error("Element at index {index} is not a two-element pair")]
    MalformedPair {
        /// Position of the offending element.
        index: usize,
    },
    /// Mapping merge met an element that is not a mapping.
    #[error("Element at index {index} is not a mapping")]
    MalformedMerge {
        /// Position of the offending element.
        index: usize,
    },
    /// Select requested a key the mapping does not contain.
    #[error("Key not found: {key}")]
    MissingKey {
        /// Rendering of the requested key.
        key: String,
    },
    /// Inversion requires all values to share one invertible type.
    #[error("Mapping values must share a single invertible type, found {tally}")]
    AmbiguousValueTypes {
        /// Tally of value kinds encountered.
        tally: String,
    },
    /// Inversion met a value kind outside the invertible set.
    #[error("Values of type {found} cannot be inverted")]
    UnsupportedValueType {
        /// Kind of the offending value.
        found: &'static str,
    },
    /// Numeric fold met a non-numeric element.
    #[error("Sum requires numeric elements, found {found}")]
    NonNumeric {
        /// Kind of the offending element.
        found: &'static str,
    },
    /// Pattern compilation failed.
    #[error("Invalid pattern: {0}")]
    Pattern(#[from] regex::Error),
}

/// Result type alias
pub type Result<T> = std::result::Result<T, FunError>;
