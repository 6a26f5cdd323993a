//! Configuration for bucketkv
//!
//! Centralized configuration with sensible defaults.

use std::path::PathBuf;

use crate::metadata::{HashFunction, DEFAULT_CAPACITY};

/// Main configuration for the storage front end
#[derive(Debug, Clone)]
pub struct Config {
    // -------------------------------------------------------------------------
    // Storage Configuration
    // -------------------------------------------------------------------------
    /// Directory under which named storages are created
    /// Internal structure:
    ///   {storage_root}/
    ///     └── {storage name}/
    ///           ├── parameters
    ///           └── data/
    pub storage_root: PathBuf,

    /// Initial bucket count of newly created storages
    pub default_capacity: u32,

    /// Hash function of newly created storages (None = structural hash)
    pub hash_fn: Option<HashFunction>,

    // -------------------------------------------------------------------------
    // Network Configuration
    // -------------------------------------------------------------------------
    /// HTTP listen address
    pub listen_addr: String,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            storage_root: PathBuf::from("./bucketkv_data"),
            default_capacity: DEFAULT_CAPACITY,
            hash_fn: None,
            listen_addr: "127.0.0.1:8080".to_string(),
        }
    }
}

impl Config {
    /// Create a new config builder
    pub fn builder() -> ConfigBuilder {
        ConfigBuilder::default()
    }
}

/// Builder for Config
#[derive(Default)]
pub struct ConfigBuilder {
    config: Config,
}

impl ConfigBuilder {
    /// Set the directory holding all storages
    pub fn storage_root(mut self, path: impl Into<PathBuf>) -> Self {
        self.config.storage_root = path.into();
        self
    }

    /// Set the initial capacity of new storages
    pub fn default_capacity(mut self, capacity: u32) -> Self {
        self.config.default_capacity = capacity;
        self
    }

    /// Set the hash function of new storages
    pub fn hash_fn(mut self, hash_fn: Option<HashFunction>) -> Self {
        self.config.hash_fn = hash_fn;
        self
    }

    /// Set the HTTP listen address
    pub fn listen_addr(mut self, addr: impl Into<String>) -> Self {
        self.config.listen_addr = addr.into();
        self
    }

    pub fn build(self) -> Config {
        self.config
    }
}
