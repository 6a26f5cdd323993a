//! Metadata Store Module
//!
//! The persisted configuration and state of one storage.
//!
//! ## Responsibilities
//! - Bucket count (capacity) and live-entry count (size)
//! - Declared key type and optional hash function identifier
//! - Bucket addressing: `hash(key) mod capacity`
//! - Reading and writing the `parameters` file
//!
//! ## File Format
//! ```text
//! ┌──────────┬────────────┬──────────────────────────────────────┐
//! │Magic (4) │Version (2) │ bincode {capacity, size, key_type,   │
//! │  "BKVP"  │    LE      │          hash_fn}                    │
//! └──────────┴────────────┴──────────────────────────────────────┘
//! ```

mod hash;

pub use hash::{structural_hash, HashFunction};

use std::fs;
use std::io::{ErrorKind, Write};
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::codec::{self, Key, KeyType};
use crate::error::{KvError, Result};

/// Magic bytes at the start of every parameters file
pub const MAGIC: &[u8; 4] = b"BKVP";

/// Parameters file format version
pub const VERSION: u16 = 1;

/// Magic + version
pub const HEADER_SIZE: usize = 6;

/// Bucket count of a storage created without an explicit capacity
pub const DEFAULT_CAPACITY: u32 = 4;

/// State of one storage
///
/// Setters are crate-private: the engine only mutates metadata while holding
/// its write lock, and hands out clones to everyone else.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Metadata {
    capacity: u32,
    size: u32,
    key_type: KeyType,
    hash_fn: Option<HashFunction>,
}

impl Metadata {
    /// Create a new metadata builder
    pub fn builder(key_type: KeyType) -> MetadataBuilder {
        MetadataBuilder {
            key_type,
            capacity: DEFAULT_CAPACITY,
            hash_fn: None,
        }
    }

    /// Hash a key with the configured function, or the structural hash
    pub fn hash(&self, key: &Key) -> u64 {
        match &self.hash_fn {
            Some(f) => f.hash(key),
            None => structural_hash(key),
        }
    }

    /// Bucket index for a key under the current capacity
    pub fn bucket_index(&self, key: &Key) -> u64 {
        self.hash(key) % self.capacity as u64
    }

    /// Same key type and hash function, new capacity, size reset to zero
    pub fn clone_with(&self, capacity: u32) -> Self {
        Self {
            capacity,
            size: 0,
            key_type: self.key_type,
            hash_fn: self.hash_fn,
        }
    }

    pub fn capacity(&self) -> u32 {
        self.capacity
    }

    pub fn size(&self) -> u32 {
        self.size
    }

    pub fn key_type(&self) -> KeyType {
        self.key_type
    }

    pub fn hash_fn(&self) -> Option<HashFunction> {
        self.hash_fn
    }

    pub(crate) fn set_capacity(&mut self, capacity: u32) {
        self.capacity = capacity;
    }

    pub(crate) fn set_size(&mut self, size: u32) {
        self.size = size;
    }

    // =========================================================================
    // Persistence
    // =========================================================================

    /// Read a parameters file
    ///
    /// A missing file is a decode failure: the storage directory exists but
    /// its metadata does not.
    pub fn load(path: &Path) -> Result<Self> {
        let bytes = match fs::read(path) {
            Ok(bytes) => bytes,
            Err(e) if e.kind() == ErrorKind::NotFound => {
                return Err(KvError::Decode(format!(
                    "missing parameters file {}",
                    path.display()
                )));
            }
            Err(e) => return Err(e.into()),
        };

        if bytes.len() < HEADER_SIZE {
            return Err(KvError::Decode(format!(
                "parameters file too short: {} bytes",
                bytes.len()
            )));
        }

        if &bytes[0..4] != MAGIC {
            return Err(KvError::Decode(format!(
                "invalid parameters magic: expected BKVP, got {:?}",
                &bytes[0..4]
            )));
        }

        let version = u16::from_le_bytes([bytes[4], bytes[5]]);
        if version != VERSION {
            return Err(KvError::Decode(format!(
                "unsupported parameters version: {}",
                version
            )));
        }

        let metadata: Metadata = codec::decode(&bytes[HEADER_SIZE..])?;

        if metadata.capacity == 0 || metadata.size > metadata.capacity {
            return Err(KvError::Decode(format!(
                "inconsistent parameters: size {} with capacity {}",
                metadata.size, metadata.capacity
            )));
        }

        Ok(metadata)
    }

    /// Write the parameters file, replacing any previous one atomically
    pub fn store(&self, path: &Path) -> Result<()> {
        let dir = path.parent().ok_or_else(|| {
            KvError::Config(format!("parameters path {} has no parent", path.display()))
        })?;
        let payload = codec::encode(self)?;

        let mut temp = tempfile::Builder::new()
            .prefix(".parameters-")
            .tempfile_in(dir)?;
        temp.write_all(MAGIC)?;
        temp.write_all(&VERSION.to_le_bytes())?;
        temp.write_all(&payload)?;
        temp.as_file().sync_all()?;
        temp.persist(path).map_err(|e| KvError::Io(e.error))?;

        Ok(())
    }
}

/// Builder for Metadata
pub struct MetadataBuilder {
    key_type: KeyType,
    capacity: u32,
    hash_fn: Option<HashFunction>,
}

impl MetadataBuilder {
    /// Set the initial number of buckets
    pub fn capacity(mut self, capacity: u32) -> Self {
        self.capacity = capacity;
        self
    }

    /// Set the hash function (None = structural hash)
    pub fn hash_fn(mut self, hash_fn: Option<HashFunction>) -> Self {
        self.hash_fn = hash_fn;
        self
    }

    pub fn build(self) -> Result<Metadata> {
        if self.capacity == 0 {
            return Err(KvError::InvalidCapacity(self.capacity as u64));
        }
        Ok(Metadata {
            capacity: self.capacity,
            size: 0,
            key_type: self.key_type,
            hash_fn: self.hash_fn,
        })
    }
}
