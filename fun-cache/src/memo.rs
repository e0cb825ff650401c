//! Context-scoped memoization cache

use ahash::AHashMap;
use serde::Serialize;
use serde_json::Value;
use tracing::debug;

use crate::context::Context;
use crate::error::{CacheError, Result};
use crate::store::{BackingStore, Document};

/// Per-operation slice: call key -> stored value.
type OpEntries = AHashMap<String, Value>;
/// Per-context slice: operation name -> call key -> stored value.
type ContextEntries = AHashMap<String, OpEntries>;

/// Hit/miss counters surfaced for cache introspection.
#[derive(Debug, Clone, Copy, Default, Serialize)]
pub struct CacheStats {
    /// Lookups answered from the cache.
    pub hits: u64,
    /// Lookups that fell through to the wrapped operation.
    pub misses: u64,
}

/// Context-scoped memoization cache with selective persistence.
///
/// Entries live under `(context, operation name, call key)`. For a fixed
/// triple the stored value is computed at most once per process lifetime
/// unless explicitly cleared. The contextless slice loads from the backing
/// store at construction and is written back only on an explicit save.
///
/// Not thread-safe: concurrent access to one instance is out of contract
/// and must be serialized by the caller.
#[derive(Debug)]
pub struct MemoCache {
    name: String,
    active: Context,
    entries: AHashMap<Context, ContextEntries>,
    store: Box<dyn BackingStore>,
    stats: CacheStats,
}

impl MemoCache {
    /// Open the cache for `name`, loading the persisted contextless slice
    /// through `store` (created empty when no document exists yet).
    pub fn open(name: impl Into<String>, mut store: Box<dyn BackingStore>) -> Result<Self> {
        let name = name.into();
        let document = store.load(&name)?;
        let contextless = from_document(&name, document)?;
        let mut entries = AHashMap::new();
        entries.insert(Context::Contextless, contextless);
        debug!(name = %name, "opened memo cache");
        Ok(Self {
            name,
            active: Context::Contextless,
            entries,
            store,
            stats: CacheStats::default(),
        })
    }

    /// Instance name identifying the persisted document.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Currently active context.
    pub fn context(&self) -> &Context {
        &self.active
    }

    /// Switch the active context for subsequent cached calls. Entries
    /// already stored under other contexts are unaffected.
    pub fn set_context(&mut self, context: impl Into<Context>) {
        self.active = context.into();
    }

    /// Hit/miss counters.
    pub fn stats(&self) -> CacheStats {
        self.stats
    }

    pub(crate) fn lookup(&mut self, context: &Context, op: &str, key: &str) -> Option<Value> {
        let found = self
            .entries
            .get(context)
            .and_then(|ops| ops.get(op))
            .and_then(|entries| entries.get(key))
            .cloned();
        if found.is_some() {
            self.stats.hits += 1;
        } else {
            self.stats.misses += 1;
        }
        found
    }

    pub(crate) fn store_value(&mut self, context: Context, op: &str, key: String, value: Value) {
        self.entries
            .entry(context)
            .or_default()
            .entry(op.to_string())
            .or_default()
            .insert(key, value);
    }

    /// Drop every entry stored under the active context.
    pub fn clear(&mut self) {
        let active = self.active.clone();
        self.entries.remove(&active);
    }

    /// Drop every entry for every context.
    pub fn clear_all(&mut self) {
        self.entries.clear();
    }

    /// Persist the contextless slice to the backing store.
    ///
    /// Everything cached contextlessly is a JSON value already, so the
    /// slice is persistable by construction.
    pub fn save_contextless(&mut self) -> Result<()> {
        let document = to_document(self.entries.get(&Context::Contextless));
        self.store.save(&self.name, &document)
    }

    /// Erase the persisted document and the in-memory contextless slice.
    pub fn clear_contextless(&mut self) -> Result<()> {
        self.store.clear(&self.name)?;
        self.entries.remove(&Context::Contextless);
        Ok(())
    }
}

fn from_document(name: &str, document: Document) -> Result<ContextEntries> {
    let mut contextless = ContextEntries::new();
    for (op, entries) in document {
        match entries {
            Value::Object(entries) => {
                contextless.insert(op, entries.into_iter().collect());
            }
            _ => {
                return Err(CacheError::MalformedDocument {
                    name: name.to_string(),
                })
            }
        }
    }
    Ok(contextless)
}

fn to_document(contextless: Option<&ContextEntries>) -> Document {
    let mut document = Document::new();
    let Some(ops) = contextless else {
        return document;
    };
    // Sorted rendering keeps persisted documents deterministic.
    let mut op_names: Vec<&String> = ops.keys().collect();
    op_names.sort();
    for op in op_names {
        let entries = &ops[op];
        let mut keys: Vec<&String> = entries.keys().collect();
        keys.sort();
        let mut object = serde_json::Map::new();
        for key in keys {
            object.insert(key.clone(), entries[key].clone());
        }
        document.insert(op.clone(), Value::Object(object));
    }
    document
}
