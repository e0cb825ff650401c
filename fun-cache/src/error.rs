//! Error types for the memoization cache

use thiserror::Error;

/// Cache layer error types
#[derive(Debug, Error)]
pub enum CacheError {
    /// Cache wrapper invoked on a receiver that owns no cache.
    #[error("Cache wrapping requires a cache-owning receiver")]
    NotCacheable,
    /// Cache wrapper applied around another cache wrapper.
    #[error("Cache must be the outermost wrapper")]
    DecoratorOrder,
    /// Persisted document lacked the operation -> call-key -> value shape.
    #[error("Malformed cache document: {name}")]
    MalformedDocument {
        /// Instance name of the offending document.
        name: String,
    },
    /// I/O failed while touching the backing store.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
    /// JSON serialization or parsing failed.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

/// Result type alias
pub type Result<T> = std::result::Result<T, CacheError>;
