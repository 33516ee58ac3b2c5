//! Typed variables persisted in a flat key-value store
//!
//! Values are grouped into one JSON record per domain (namespace). Records of
//! the absent domain live under [`DEFAULT_RECORD_KEY`].
//!
//! ```
//! use std::sync::Arc;
//! use kv_variables::{BooleanVariable, Domain, RecordStore, Variable};
//! use kv_variables::storage::MemoryStorage;
//!
//! let store = Arc::new(RecordStore::from_storage(MemoryStorage::new()));
//! let num = Variable::new("num", 123, store.clone());
//! num.set(321, Domain::NONE)?;
//! assert_eq!(num.get(Domain::NONE)?, 321);
//! num.clear(Domain::NONE)?;
//! assert_eq!(num.get(Domain::NONE)?, 123);
//!
//! let flag = BooleanVariable::new("flag", true, store);
//! assert_eq!(flag.toggle("work")?, false);
//! # Ok::<(), kv_variables::VariableError>(())
//! ```

pub mod config;
pub mod domain;
pub mod error;
pub mod record;
pub mod storage;
pub mod variable;

pub use domain::{Domain, DEFAULT_RECORD_KEY};
pub use error::{Result, VariableError};
pub use record::{Record, RecordStore};
pub use storage::Storage;
pub use variable::{BooleanVariable, Variable};
