//! Fun Cache - Context-scoped memoization with selective persistence
//!
//! This crate provides the memoization layer for cache-owning instances:
//!
//! - Deterministic call-key derivation from positional and keyword arguments
//! - A three-level entry space (context, operation name, call key)
//! - Operation wrapping with outermost-wrapper enforcement
//! - A backing-store seam with a file-backed JSON implementation
//!
//! Everything here is single-threaded and synchronous; callers needing
//! concurrency must serialize access themselves.

#![deny(unsafe_code)]
#![warn(missing_docs)]

pub mod call_key;
pub mod context;
pub mod error;
pub mod memo;
pub mod op;
pub mod store;

// Re-export commonly used types
pub use call_key::CallArgs;
pub use context::Context;
pub use error::{CacheError, Result};
pub use memo::{CacheStats, MemoCache};
pub use op::{cached, cached_contextless, op, Cacheable, Cached, OpFn, Operation};
pub use store::{BackingStore, Document, JsonFileStore, MemoryStore};
