//! Storage Service
//!
//! Per-request access to named storages under the configured root.
//!
//! ## Responsibilities
//! - Validate storage names as single path components
//! - Resolve key type names
//! - Open, operate on and close a storage for every call
//!
//! Each call opens its own handle, so two requests on the same storage do
//! not share a lock. Concurrent writers to one storage are not coordinated.

use std::path::PathBuf;

use bytes::Bytes;
use serde_json::Value;

use crate::codec::KeyType;
use crate::config::Config;
use crate::engine::Engine;
use crate::error::{KvError, Result};
use crate::metadata::Metadata;
use crate::protocol::key_from_json;

/// Named-storage operations on top of the engine
#[derive(Debug, Clone)]
pub struct StorageService {
    config: Config,
}

impl StorageService {
    pub fn new(config: Config) -> Self {
        Self { config }
    }

    /// Get the configuration
    pub fn config(&self) -> &Config {
        &self.config
    }

    /// Create a storage with the configured default capacity and hash
    pub fn create(&self, name: &str, key_type: &str) -> Result<()> {
        let path = self.storage_path(name)?;
        if path.exists() {
            return Err(KvError::AlreadyExists(path));
        }

        let key_type: KeyType = key_type.parse()?;
        let metadata = Metadata::builder(key_type)
            .capacity(self.config.default_capacity)
            .hash_fn(self.config.hash_fn)
            .build()?;

        Engine::create_with(&path, metadata)?.close()?;
        tracing::info!(storage = name, %key_type, "created storage");
        Ok(())
    }

    /// Map a JSON key to a value
    pub fn put(&self, name: &str, key: &Value, value: Bytes) -> Result<()> {
        self.with_storage(name, |engine| {
            let key = key_from_json(key, engine.key_type())?;
            engine.put(&key, value)
        })
    }

    /// Look up a JSON key; an absent key is `KeyNotFound`
    pub fn get(&self, name: &str, key: &Value) -> Result<Bytes> {
        self.with_storage(name, |engine| {
            let key = key_from_json(key, engine.key_type())?;
            engine.get(&key)?.ok_or(KvError::KeyNotFound)
        })
    }

    /// Metadata snapshot of a storage
    pub fn info(&self, name: &str) -> Result<Metadata> {
        self.with_storage(name, |engine| Ok(engine.metadata()))
    }

    /// Resolve a storage name to its directory
    pub fn storage_path(&self, name: &str) -> Result<PathBuf> {
        validate_storage_name(name)?;
        Ok(self.config.storage_root.join(name))
    }

    /// Open, run `op`, close. Close runs even when `op` fails
    fn with_storage<T>(&self, name: &str, op: impl FnOnce(&Engine) -> Result<T>) -> Result<T> {
        let engine = Engine::open(self.storage_path(name)?)?;
        let result = op(&engine);
        let closed = engine.close();

        if let Err(e) = &result {
            tracing::debug!(storage = name, "operation failed: {}", e);
        }
        let value = result?;
        closed?;
        Ok(value)
    }
}

/// Check that a storage name is usable as a single path component
pub fn validate_storage_name(name: &str) -> Result<()> {
    if name.is_empty() {
        return Err(KvError::InvalidStorageName(
            name.to_string(),
            "name is empty",
        ));
    }
    if name == "." || name == ".." {
        return Err(KvError::InvalidStorageName(
            name.to_string(),
            "name is a relative path component",
        ));
    }
    if name
        .chars()
        .any(|c| matches!(c, '/' | '\\' | '\0' | '\n' | '\r'))
    {
        return Err(KvError::InvalidStorageName(
            name.to_string(),
            "name can't contain path separators or line breaks",
        ));
    }
    Ok(())
}
