//! Record definitions
//!
//! Typed keys, the closed set of key types, and the key-value record stored
//! in bucket files.

use std::borrow::Cow;
use std::fmt;
use std::str::FromStr;

use bytes::Bytes;
use serde::{Deserialize, Serialize};

use crate::error::{KvError, Result};

/// The declared type of every key in a storage
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum KeyType {
    /// 32-bit signed integer
    Integer,
    /// 64-bit signed integer
    Long,
    /// UTF-8 string
    String,
    /// Raw byte string
    Bytes,
}

impl KeyType {
    /// Canonical lowercase name
    pub fn name(&self) -> &'static str {
        match self {
            KeyType::Integer => "integer",
            KeyType::Long => "long",
            KeyType::String => "string",
            KeyType::Bytes => "bytes",
        }
    }
}

impl fmt::Display for KeyType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for KeyType {
    type Err = KvError;

    /// Resolve a user-supplied type name (case-insensitive)
    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "integer" | "int" | "i32" => Ok(KeyType::Integer),
            "long" | "i64" => Ok(KeyType::Long),
            "string" | "str" => Ok(KeyType::String),
            "bytes" => Ok(KeyType::Bytes),
            _ => Err(KvError::NoSuchKeyType(s.to_string())),
        }
    }
}

/// A typed key
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Key {
    Integer(i32),
    Long(i64),
    String(String),
    Bytes(Vec<u8>),
}

impl Key {
    /// The runtime type tag of this key
    pub fn key_type(&self) -> KeyType {
        match self {
            Key::Integer(_) => KeyType::Integer,
            Key::Long(_) => KeyType::Long,
            Key::String(_) => KeyType::String,
            Key::Bytes(_) => KeyType::Bytes,
        }
    }

    /// Parse a textual key as the given type.
    ///
    /// Bytes keys are taken verbatim from the UTF-8 input.
    pub fn parse(input: &str, key_type: KeyType) -> Result<Self> {
        match key_type {
            KeyType::Integer => input
                .parse()
                .map(Key::Integer)
                .map_err(|_| KvError::invalid_key_type(key_type, format!("{:?}", input))),
            KeyType::Long => input
                .parse()
                .map(Key::Long)
                .map_err(|_| KvError::invalid_key_type(key_type, format!("{:?}", input))),
            KeyType::String => Ok(Key::String(input.to_string())),
            KeyType::Bytes => Ok(Key::Bytes(input.as_bytes().to_vec())),
        }
    }

    /// Little-endian byte form used by byte-oriented hash functions
    pub fn as_bytes(&self) -> Cow<'_, [u8]> {
        match self {
            Key::Integer(v) => Cow::Owned(v.to_le_bytes().to_vec()),
            Key::Long(v) => Cow::Owned(v.to_le_bytes().to_vec()),
            Key::String(s) => Cow::Borrowed(s.as_bytes()),
            Key::Bytes(b) => Cow::Borrowed(b.as_slice()),
        }
    }
}

impl fmt::Display for Key {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Key::Integer(v) => write!(f, "{}", v),
            Key::Long(v) => write!(f, "{}", v),
            Key::String(s) => write!(f, "{:?}", s),
            Key::Bytes(b) => write!(f, "{:?}", b),
        }
    }
}

impl From<i32> for Key {
    fn from(v: i32) -> Self {
        Key::Integer(v)
    }
}

impl From<i64> for Key {
    fn from(v: i64) -> Self {
        Key::Long(v)
    }
}

impl From<&str> for Key {
    fn from(v: &str) -> Self {
        Key::String(v.to_string())
    }
}

impl From<String> for Key {
    fn from(v: String) -> Self {
        Key::String(v)
    }
}

impl From<Vec<u8>> for Key {
    fn from(v: Vec<u8>) -> Self {
        Key::Bytes(v)
    }
}

/// A key-value pair as stored in a bucket
///
/// Two records are equal iff their keys are equal; the value is ignored.
/// Put relies on this to replace rather than duplicate.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Record {
    pub key: Key,
    pub value: Bytes,
}

impl Record {
    pub fn new(key: Key, value: impl Into<Bytes>) -> Self {
        Self {
            key,
            value: value.into(),
        }
    }
}

impl PartialEq for Record {
    fn eq(&self, other: &Self) -> bool {
        self.key == other.key
    }
}

impl Eq for Record {}
