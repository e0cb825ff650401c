//! Fun Core - Functional collection primitives
//!
//! This crate provides the wrapped-container layer with no I/O dependencies.
//! It includes:
//!
//! - A wrap dispatcher classifying raw JSON values into wrapped variants
//! - Wrapped sequence, mapping, and set variants with chainable transforms
//! - The shared capability layer (map, reduce, sort, frequency)
//! - Structural inversion with value-type ambiguity detection
//! - An export-sink seam for clipboard-style integrations
//! - An explicitly owned compiled-pattern cache
//!
//! Transforms never mutate their receiver: every operation returns a fresh
//! owned container, so chains compose freely.

#![deny(unsafe_code)]
#![warn(missing_docs)]

pub mod error;
pub mod map;
pub mod pattern;
pub mod seq;
pub mod set;
pub mod wrap;

mod capability;
mod invert;
mod ordered;

// Re-export commonly used types
pub use error::{FunError, Result};
pub use map::{FunMap, Select};
pub use pattern::PatternCache;
pub use seq::FunSeq;
pub use set::FunSet;
pub use wrap::{auto_wrap, wrap, ExportSink, Wrapped, WriterSink};
