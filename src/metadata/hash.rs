//! Hash functions
//!
//! Bucket addressing hashes. Storages persist a [`HashFunction`] identifier,
//! never code; the identifier is resolved to an implementation here.

use std::fmt;
use std::hash::{Hash, Hasher};
use std::str::FromStr;

use rustc_hash::FxHasher;
use serde::{Deserialize, Serialize};

use crate::codec::Key;
use crate::error::{KvError, Result};

/// Registry of pluggable key hash functions
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum HashFunction {
    /// CRC32 over the key's byte form
    Crc32,
    /// Integer keys hash to their own two's-complement bits; other keys
    /// fall back to CRC32
    Identity,
}

impl HashFunction {
    pub fn hash(&self, key: &Key) -> u64 {
        match self {
            HashFunction::Crc32 => crc32_hash(key),
            HashFunction::Identity => match key {
                Key::Integer(v) => *v as u32 as u64,
                Key::Long(v) => *v as u64,
                _ => crc32_hash(key),
            },
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            HashFunction::Crc32 => "crc32",
            HashFunction::Identity => "identity",
        }
    }
}

impl fmt::Display for HashFunction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for HashFunction {
    type Err = KvError;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "crc32" => Ok(HashFunction::Crc32),
            "identity" => Ok(HashFunction::Identity),
            _ => Err(KvError::Config(format!("unknown hash function: {}", s))),
        }
    }
}

/// Default hash when a storage has no hash function configured.
///
/// FxHash is unseeded, so the same key lands in the same bucket across
/// process restarts. The output depends on pointer width, so storages
/// shared between platforms should use [`HashFunction::Crc32`].
pub fn structural_hash(key: &Key) -> u64 {
    let mut hasher = FxHasher::default();
    key.hash(&mut hasher);
    hasher.finish()
}

fn crc32_hash(key: &Key) -> u64 {
    crc32fast::hash(&key.as_bytes()) as u64
}
