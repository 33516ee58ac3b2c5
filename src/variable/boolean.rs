//! Boolean variables with toggle and lenient string input

use super::{parse, Variable};
use crate::domain::Domain;
use crate::error::Result;
use crate::record::RecordStore;
use log::debug;
use serde_json::Value;
use std::ops::Deref;
use std::sync::Arc;

/// A [`Variable<bool>`] that can be toggled and accepts any string
#[derive(Debug)]
pub struct BooleanVariable {
    inner: Variable<bool>,
}

impl BooleanVariable {
    pub fn new(name: impl Into<String>, default: bool, store: Arc<RecordStore>) -> Self {
        Self {
            inner: Variable::new(name, default, store).with_parser(|raw| Ok(parse::lenient_bool(raw))),
        }
    }

    /// Set the description (help text)
    pub fn with_description(self, description: impl Into<String>) -> Self {
        Self {
            inner: self.inner.with_description(description),
        }
    }

    /// Register the change hook, replacing any previous one
    pub fn on_change(self, hook: impl Fn(&bool, Option<&str>) + Send + Sync + 'static) -> Self {
        Self {
            inner: self.inner.on_change(hook),
        }
    }

    /// Flip the effective value in `domain` and return the new value
    ///
    /// The read and the write happen inside one record update.
    pub fn toggle(&self, domain: impl Into<Domain>) -> Result<bool> {
        let domain = domain.into();
        let inner = &self.inner;

        let new_value = inner.store.update(&domain, |record| {
            let new_value = !inner.effective(record, &domain)?;
            record.insert(inner.name.clone(), Value::Bool(new_value));
            Ok(new_value)
        })?;
        debug!("Toggled variable {} in {} to {}", inner.name, domain, new_value);

        inner.notify(&domain)?;
        Ok(new_value)
    }

    /// Store the truthiness of `raw`
    ///
    /// Never rejects input: `"0"`, `"false"`, `"null"` and `""` are false,
    /// anything else that is not falsy JSON (including `"abc"`) is true.
    pub fn set_with_string(&self, raw: &str, domain: impl Into<Domain>) -> Result<bool> {
        self.inner.set(parse::lenient_bool(raw), domain)?;
        Ok(true)
    }

    pub fn as_variable(&self) -> &Variable<bool> {
        &self.inner
    }
}

impl Deref for BooleanVariable {
    type Target = Variable<bool>;

    fn deref(&self) -> &Self::Target {
        &self.inner
    }
}
