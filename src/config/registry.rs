//! Registry of declared variable definitions

use super::definitions::VariableDefinition;
use anyhow::Result;
use std::collections::BTreeMap;

/// Variable definitions keyed by name, built once at config load
#[derive(Debug, Default)]
pub struct VariableRegistry {
    definitions: BTreeMap<String, VariableDefinition>,
}

impl VariableRegistry {
    /// Create a new empty registry
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a new definition
    ///
    /// Returns an error if the definition is invalid or the name is taken
    pub fn register(&mut self, def: VariableDefinition) -> Result<()> {
        def.validate()?;

        if self.definitions.contains_key(&def.name) {
            anyhow::bail!("Variable '{}' is already declared", def.name);
        }
        log::debug!("Registered variable: {} ({})", def.name, def.kind);
        self.definitions.insert(def.name.clone(), def);
        Ok(())
    }

    /// Get definition by name
    pub fn get(&self, name: &str) -> Option<&VariableDefinition> {
        self.definitions.get(name)
    }

    /// Get definition by name, failing with a helpful message
    pub fn require(&self, name: &str) -> Result<&VariableDefinition> {
        self.get(name)
            .ok_or_else(|| anyhow::anyhow!("Variable '{}' is not declared", name))
    }

    pub fn contains(&self, name: &str) -> bool {
        self.definitions.contains_key(name)
    }

    /// Get total number of declared variables
    pub fn count(&self) -> usize {
        self.definitions.len()
    }

    /// All definitions in name order
    pub fn list_all(&self) -> Vec<&VariableDefinition> {
        self.definitions.values().collect()
    }
}
