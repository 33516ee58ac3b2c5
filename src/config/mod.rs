//! TOML configuration for the `kv-variables` binary
//!
//! The configuration file declares where records are stored and which
//! variables exist:
//!
//! ```toml
//! storage_dir = "/home/me/.local/share/kv-variables/store"
//!
//! [[variables]]
//! name = "dark_mode"
//! kind = "bool"
//! default = false
//! description = "Use the dark color theme"
//! ```

pub mod definitions;
pub mod registry;

pub use definitions::{VariableDefinition, VariableKind};
pub use registry::VariableRegistry;

use crate::record::RecordStore;
use crate::storage::FileStorage;
use anyhow::{Context, Result};
use log::{debug, info};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Arc;

/// On-disk shape of the configuration file
#[derive(Debug, Default, Serialize, Deserialize)]
pub struct ConfigFile {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub storage_dir: Option<PathBuf>,
    #[serde(default)]
    pub variables: Vec<VariableDefinition>,
}

/// Loaded configuration
pub struct Config {
    pub storage_dir: PathBuf,
    pub registry: VariableRegistry,
}

impl Config {
    fn app_dir(base: Option<PathBuf>) -> Result<PathBuf> {
        let dir = if cfg!(target_os = "linux") {
            // XDG directories on Linux
            base.context("Failed to get XDG directory")?.join("kv-variables")
        } else {
            dirs::home_dir()
                .context("Failed to get home directory")?
                .join(".kv-variables")
        };
        Ok(dir)
    }

    /// Default path of the configuration file
    pub fn get_config_path() -> Result<PathBuf> {
        Ok(Self::app_dir(dirs::config_dir())?.join("config.toml"))
    }

    /// Default directory holding the stored records
    pub fn default_storage_dir() -> Result<PathBuf> {
        Ok(Self::app_dir(dirs::data_dir())?.join("store"))
    }

    /// Load from the default configuration path
    pub fn load() -> Result<Self> {
        Self::load_from(&Self::get_config_path()?)
    }

    /// Load from `path`; a missing file gives an empty configuration
    pub fn load_from(path: &Path) -> Result<Self> {
        debug!("Loading config from: {:?}", path);

        if !path.exists() {
            info!("Config file doesn't exist, using defaults");
            return Self::from_file(ConfigFile::default());
        }

        let content = fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {:?}", path))?;
        Self::parse(&content).with_context(|| format!("Failed to parse config file: {:?}", path))
    }

    /// Parse configuration from TOML text
    pub fn parse(content: &str) -> Result<Self> {
        let file: ConfigFile = toml::from_str(content).context("Invalid configuration TOML")?;
        Self::from_file(file)
    }

    fn from_file(file: ConfigFile) -> Result<Self> {
        let storage_dir = match file.storage_dir {
            Some(dir) => dir,
            None => Self::default_storage_dir()?,
        };

        let mut registry = VariableRegistry::new();
        for def in file.variables {
            let name = def.name.clone();
            registry
                .register(def)
                .with_context(|| format!("Invalid declaration of variable '{}'", name))?;
        }

        info!(
            "Loaded config with {} variables, storage at {:?}",
            registry.count(),
            storage_dir
        );
        Ok(Self {
            storage_dir,
            registry,
        })
    }

    /// Open the record store in the configured storage directory
    pub fn open_store(&self) -> Arc<RecordStore> {
        Arc::new(RecordStore::from_storage(FileStorage::new(&self.storage_dir)))
    }
}
