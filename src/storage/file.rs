//! Directory-backed storage: one file per key

use super::Storage;
use anyhow::{Context, Result};
use log::debug;
use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

/// Storage keeping each key in its own file under a directory
///
/// File names are the URL-encoded keys, so any key string maps to a single
/// flat file. The directory is created on first write.
#[derive(Debug, Clone)]
pub struct FileStorage {
    dir: PathBuf,
}

impl FileStorage {
    /// Open (without creating) a storage rooted at `dir`
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    /// Root directory of this storage
    pub fn dir(&self) -> &Path {
        &self.dir
    }

    fn path_for(&self, key: &str) -> Result<PathBuf> {
        if key.is_empty() || key == "." || key == ".." {
            anyhow::bail!("Invalid storage key: '{}'", key);
        }
        Ok(self.dir.join(urlencoding::encode(key).as_ref()))
    }

    /// All stored keys in sorted order
    pub fn keys(&self) -> Result<Vec<String>> {
        let entries = match fs::read_dir(&self.dir) {
            Ok(entries) => entries,
            Err(e) if e.kind() == ErrorKind::NotFound => return Ok(Vec::new()),
            Err(e) => {
                return Err(e)
                    .with_context(|| format!("Failed to read storage directory: {:?}", self.dir));
            }
        };

        let mut keys = Vec::new();
        for entry in entries {
            let entry = entry.context("Failed to read storage directory entry")?;
            if !entry.file_type()?.is_file() {
                continue;
            }
            let file_name = entry.file_name();
            let Some(name) = file_name.to_str() else {
                continue;
            };
            let key = urlencoding::decode(name)
                .with_context(|| format!("Storage file name is not a valid key: {}", name))?;
            keys.push(key.into_owned());
        }
        keys.sort();
        Ok(keys)
    }

    /// Number of stored keys
    pub fn len(&self) -> Result<usize> {
        Ok(self.keys()?.len())
    }

    /// Remove every stored key
    pub fn clear(&self) -> Result<()> {
        for key in self.keys()? {
            let path = self.path_for(&key)?;
            fs::remove_file(&path)
                .with_context(|| format!("Failed to remove storage file: {:?}", path))?;
        }
        Ok(())
    }
}

impl Storage for FileStorage {
    fn get_item(&self, key: &str) -> Result<Option<String>> {
        let path = self.path_for(key)?;
        match fs::read_to_string(&path) {
            Ok(content) => Ok(Some(content)),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(None),
            Err(e) => Err(e).with_context(|| format!("Failed to read storage file: {:?}", path)),
        }
    }

    fn set_item(&self, key: &str, value: &str) -> Result<()> {
        let path = self.path_for(key)?;
        if !self.dir.exists() {
            fs::create_dir_all(&self.dir)
                .with_context(|| format!("Failed to create storage directory: {:?}", self.dir))?;
            debug!("Created storage directory: {:?}", self.dir);
        }
        fs::write(&path, value)
            .with_context(|| format!("Failed to write storage file: {:?}", path))
    }
}
