//! Backing stores for the contextless cache slice

use std::fs;
use std::path::{Path, PathBuf};

use ahash::AHashMap;
use serde_json::{Map, Value};
use tracing::debug;

use crate::error::{CacheError, Result};

/// Persisted document shape: operation name -> call key -> stored value.
pub type Document = Map<String, Value>;

/// External key-value store holding one JSON document per cache-owning
/// instance name.
pub trait BackingStore: std::fmt::Debug {
    /// Load the document for `name`, creating it empty when absent.
    fn load(&mut self, name: &str) -> Result<Document>;
    /// Replace the document for `name`.
    fn save(&mut self, name: &str, document: &Document) -> Result<()>;
    /// Erase the document for `name`.
    fn clear(&mut self, name: &str) -> Result<()>;
}

/// File-backed store keeping one JSON document per instance name under an
/// injected root directory.
///
/// Saves follow the atomic-replace discipline: the document is written to a
/// temporary sibling and renamed over the target, so a failed write cannot
/// truncate an existing document.
#[derive(Debug, Clone)]
pub struct JsonFileStore {
    root: PathBuf,
}

impl JsonFileStore {
    /// Store rooted at `root`; the directory is created on first write.
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    /// Root directory the documents live under.
    pub fn root(&self) -> &Path {
        &self.root
    }

    fn document_path(&self, name: &str) -> PathBuf {
        self.root.join(format!("{name}.json"))
    }

    fn write_atomic(&self, name: &str, payload: &[u8]) -> Result<()> {
        fs::create_dir_all(&self.root)?;
        let target = self.document_path(name);
        let temp = self.root.join(format!("{name}.json.tmp"));
        fs::write(&temp, payload)?;
        fs::rename(&temp, &target)?;
        Ok(())
    }
}

impl BackingStore for JsonFileStore {
    fn load(&mut self, name: &str) -> Result<Document> {
        let path = self.document_path(name);
        if !path.is_file() {
            debug!(name, "creating empty cache document");
            self.write_atomic(name, b"{}")?;
            return Ok(Document::new());
        }
        let raw = fs::read(&path)?;
        let document: Value = serde_json::from_slice(&raw)?;
        match document {
            Value::Object(document) => {
                debug!(name, operations = document.len(), "loaded cache document");
                Ok(document)
            }
            _ => Err(CacheError::MalformedDocument {
                name: name.to_string(),
            }),
        }
    }

    fn save(&mut self, name: &str, document: &Document) -> Result<()> {
        let payload = serde_json::to_vec(document)?;
        self.write_atomic(name, &payload)?;
        debug!(name, operations = document.len(), "saved cache document");
        Ok(())
    }

    fn clear(&mut self, name: &str) -> Result<()> {
        self.write_atomic(name, b"{}")?;
        debug!(name, "cleared cache document");
        Ok(())
    }
}

/// In-memory store, primarily a test double.
#[derive(Debug, Default)]
pub struct MemoryStore {
    documents: AHashMap<String, Document>,
}

impl MemoryStore {
    /// Empty store.
    pub fn new() -> Self {
        Self::default()
    }
}

impl BackingStore for MemoryStore {
    fn load(&mut self, name: &str) -> Result<Document> {
        Ok(self
            .documents
            .entry(name.to_string())
            .or_default()
            .clone())
    }

    fn save(&mut self, name: &str, document: &Document) -> Result<()> {
        self.documents.insert(name.to_string(), document.clone());
        Ok(())
    }

    fn clear(&mut self, name: &str) -> Result<()> {
        self.documents.insert(name.to_string(), Document::new());
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn memory_store_round_trips_documents() {
        let mut store = MemoryStore::new();
        assert!(store.load("sample").unwrap().is_empty());

        let mut document = Document::new();
        document.insert("op".to_string(), json!({"[[],[]]": 7}));
        store.save("sample", &document).unwrap();
        assert_eq!(store.load("sample").unwrap(), document);

        store.clear("sample").unwrap();
        assert!(store.load("sample").unwrap().is_empty());
    }
}
