//! Declared variables and their kinds

use crate::record::RecordStore;
use crate::variable::{parse, BooleanVariable, Variable};
use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::fmt;
use std::sync::Arc;

/// Value kind of a declared variable
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum VariableKind {
    Bool,
    Number,
    String,
    Json,
}

impl VariableKind {
    /// Check if a JSON value is acceptable for this kind
    pub fn matches(&self, value: &Value) -> bool {
        match (self, value) {
            (VariableKind::Bool, Value::Bool(_)) => true,
            (VariableKind::Number, Value::Number(_)) => true,
            (VariableKind::String, Value::String(_)) => true,
            (VariableKind::Json, _) => true,
            _ => false,
        }
    }

    /// Parse user input into a value of this kind
    ///
    /// Strings are taken verbatim, bools use JavaScript truthiness and never
    /// fail, numbers and JSON must be valid JSON literals.
    pub fn parse(&self, raw: &str) -> Result<Value> {
        match self {
            VariableKind::Bool => Ok(Value::Bool(parse::lenient_bool(raw))),
            VariableKind::String => Ok(Value::String(raw.to_string())),
            VariableKind::Number => {
                let value: Value = serde_json::from_str(raw)
                    .with_context(|| format!("'{}' is not a number", raw))?;
                if !value.is_number() {
                    anyhow::bail!("'{}' is not a number", raw);
                }
                Ok(value)
            }
            VariableKind::Json => {
                serde_json::from_str(raw).with_context(|| format!("'{}' is not valid JSON", raw))
            }
        }
    }
}

impl fmt::Display for VariableKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            VariableKind::Bool => "bool",
            VariableKind::Number => "number",
            VariableKind::String => "string",
            VariableKind::Json => "json",
        };
        write!(f, "{}", name)
    }
}

/// A variable declared in the configuration file
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VariableDefinition {
    pub name: String,
    pub kind: VariableKind,
    pub default: Value,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

impl VariableDefinition {
    pub fn new(name: &str, kind: VariableKind, default: Value) -> Self {
        Self {
            name: name.to_string(),
            kind,
            default,
            description: None,
        }
    }

    /// Check that the definition is usable
    pub fn validate(&self) -> Result<()> {
        if self.name.is_empty() {
            anyhow::bail!("Variable name must not be empty");
        }
        if !self.kind.matches(&self.default) {
            anyhow::bail!(
                "Default of '{}' does not match kind {}: {}",
                self.name,
                self.kind,
                self.default
            );
        }
        Ok(())
    }

    /// Build an untyped accessor that parses input according to the kind
    pub fn variable(&self, store: Arc<RecordStore>) -> Variable<Value> {
        let kind = self.kind;
        let variable = Variable::new(self.name.clone(), self.default.clone(), store)
            .with_parser(move |raw| kind.parse(raw));
        match &self.description {
            Some(description) => variable.with_description(description.clone()),
            None => variable,
        }
    }

    /// Build a boolean accessor; fails for non-bool kinds
    pub fn boolean(&self, store: Arc<RecordStore>) -> Result<BooleanVariable> {
        let &Value::Bool(default) = &self.default else {
            anyhow::bail!("Variable '{}' is a {}, not a bool", self.name, self.kind);
        };
        let variable = BooleanVariable::new(self.name.clone(), default, store);
        Ok(match &self.description {
            Some(description) => variable.with_description(description.clone()),
            None => variable,
        })
    }
}
