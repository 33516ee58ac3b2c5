//! In-memory storage backend

use super::Storage;
use anyhow::Result;
use std::collections::BTreeMap;
use std::sync::RwLock;

/// Thread-safe in-memory key-value storage
#[derive(Debug, Default)]
pub struct MemoryStorage {
    items: RwLock<BTreeMap<String, String>>,
}

impl MemoryStorage {
    /// Create an empty storage
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of stored keys
    pub fn len(&self) -> usize {
        self.items.read().unwrap().len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.read().unwrap().is_empty()
    }

    /// All stored keys in sorted order
    pub fn keys(&self) -> Vec<String> {
        self.items.read().unwrap().keys().cloned().collect()
    }

    /// Remove every stored key
    pub fn clear(&self) {
        self.items.write().unwrap().clear();
    }
}

impl Storage for MemoryStorage {
    fn get_item(&self, key: &str) -> Result<Option<String>> {
        Ok(self.items.read().unwrap().get(key).cloned())
    }

    fn set_item(&self, key: &str, value: &str) -> Result<()> {
        self.items
            .write()
            .unwrap()
            .insert(key.to_string(), value.to_string());
        Ok(())
    }
}
