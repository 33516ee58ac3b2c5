//! Per-domain JSON records on top of a [`Storage`] backend

use crate::domain::Domain;
use crate::error::{Result, VariableError};
use crate::storage::Storage;
use log::debug;
use std::sync::{Arc, Mutex};

/// JSON object holding every variable's value for one domain
pub type Record = serde_json::Map<String, serde_json::Value>;

/// Repository of domain records
///
/// Every variable sharing a `RecordStore` and a domain lives in the same
/// record, so mutations rewrite the whole record. [`update`](Self::update)
/// runs the read-modify-write under an in-process lock. Other stores or
/// processes writing the same backend still race, last write wins.
pub struct RecordStore {
    storage: Arc<dyn Storage>,
    write_lock: Mutex<()>,
}

impl RecordStore {
    pub fn new(storage: Arc<dyn Storage>) -> Self {
        Self {
            storage,
            write_lock: Mutex::new(()),
        }
    }

    /// Wrap a concrete backend
    pub fn from_storage(storage: impl Storage + 'static) -> Self {
        Self::new(Arc::new(storage))
    }

    /// The underlying storage backend
    pub fn storage(&self) -> &Arc<dyn Storage> {
        &self.storage
    }

    /// Read and decode the record for `domain`
    ///
    /// A missing or empty item is an empty record.
    pub fn load(&self, domain: &Domain) -> Result<Record> {
        let key = domain.record_key();
        let raw = self.storage.get_item(key)?;

        match raw.as_deref() {
            None | Some("") => Ok(Record::new()),
            Some(raw) => serde_json::from_str(raw).map_err(|source| {
                VariableError::CorruptRecord {
                    key: key.to_string(),
                    source,
                }
            }),
        }
    }

    /// Encode and write the record for `domain`
    pub fn save(&self, domain: &Domain, record: &Record) -> Result<()> {
        let key = domain.record_key();
        let raw = serde_json::to_string(record).map_err(|source| VariableError::Encode {
            name: key.to_string(),
            source,
        })?;
        self.storage.set_item(key, &raw)?;
        debug!("Wrote record {}: {}", key, raw);
        Ok(())
    }

    /// Read-modify-write the record for `domain` as one unit
    ///
    /// The record is written back even if `f` left it unchanged. If `f` fails
    /// nothing is written.
    pub fn update<R>(
        &self,
        domain: &Domain,
        f: impl FnOnce(&mut Record) -> Result<R>,
    ) -> Result<R> {
        let _guard = self.write_lock.lock().unwrap_or_else(|e| e.into_inner());
        let mut record = self.load(domain)?;
        let result = f(&mut record)?;
        self.save(domain, &record)?;
        Ok(result)
    }
}

impl std::fmt::Debug for RecordStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RecordStore").finish_non_exhaustive()
    }
}
