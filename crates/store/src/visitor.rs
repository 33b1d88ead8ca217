//! Visitor-scoped key-value persistence boundary.

use std::sync::Arc;

use dashmap::DashMap;

/// Per-visitor string store. Implementations mirror device-local storage
/// semantics: infallible, last-write-wins, no expiry of their own.
pub trait VisitorStore: Send + Sync {
    fn get(&self, key: &str) -> Option<String>;
    fn set(&self, key: &str, value: String);
    fn remove(&self, key: &str);
}

/// In-memory store for tests and hosts without durable visitor storage.
#[derive(Default)]
pub struct MemoryStore {
    entries: DashMap<String, String>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl VisitorStore for MemoryStore {
    fn get(&self, key: &str) -> Option<String> {
        self.entries.get(key).map(|entry| entry.value().clone())
    }

    fn set(&self, key: &str, value: String) {
        self.entries.insert(key.to_string(), value);
    }

    fn remove(&self, key: &str) {
        self.entries.remove(key);
    }
}

/// Convenience: create an in-memory store behind the usual `Arc`.
pub fn memory_store() -> Arc<MemoryStore> {
    Arc::new(MemoryStore::new())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_set_get_remove_roundtrip() {
        let store = MemoryStore::new();
        assert!(store.is_empty());
        assert_eq!(store.get("survey_nps"), None);

        store.set("survey_nps", "12345".to_string());
        assert_eq!(store.get("survey_nps"), Some("12345".to_string()));
        assert_eq!(store.len(), 1);

        store.set("survey_nps", "67890".to_string());
        assert_eq!(store.get("survey_nps"), Some("67890".to_string()));

        store.remove("survey_nps");
        assert_eq!(store.get("survey_nps"), None);
        // removing again is a no-op
        store.remove("survey_nps");
    }
}
