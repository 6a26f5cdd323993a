//! # bucketkv
//!
//! An on-disk key-value store built as a bucketed hash table:
//! - One directory per storage, one file per bucket
//! - Typed keys checked against the storage's declared key type
//! - Grow-and-rehash (capacity doubling) when the table fills up
//! - Single-writer/multi-reader concurrency per open handle
//! - Thin HTTP front end
//!
//! ## Architecture Overview
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────┐
//! │                  HTTP Server (axum)                         │
//! │          POST /create   PUT /put   GET /get                 │
//! └─────────────────────┬───────────────────────────────────────┘
//!                       │
//! ┌─────────────────────▼───────────────────────────────────────┐
//! │                  Storage Service                            │
//! │      (name validation, key types, open/close per call)      │
//! └─────────────────────┬───────────────────────────────────────┘
//!                       │
//! ┌─────────────────────▼───────────────────────────────────────┐
//! │                      Engine                                 │
//! │        (RwLock, upsert, grow-and-rehash)                    │
//! └──────────┬──────────────────────────────┬───────────────────┘
//!            │                              │
//!            ▼                              ▼
//!   ┌─────────────────┐            ┌─────────────────┐
//!   │    Metadata     │            │  Bucket Store   │
//!   │  (parameters)   │            │   (data/<i>)    │
//!   └────────┬────────┘            └────────┬────────┘
//!            └──────────────┬───────────────┘
//!                           ▼
//!                   ┌───────────────┐
//!                   │ Record Codec  │
//!                   │   (bincode)   │
//!                   └───────────────┘
//! ```

// =============================================================================
// Module Declarations
// =============================================================================

pub mod error;
pub mod config;

pub mod codec;
pub mod metadata;
pub mod storage;
pub mod engine;

pub mod protocol;
pub mod service;
pub mod server;

// =============================================================================
// Public API Re-exports
// =============================================================================

pub use codec::{Key, KeyType};
pub use config::Config;
pub use engine::Engine;
pub use error::{KvError, Result};
pub use metadata::{HashFunction, Metadata};
pub use service::StorageService;

// =============================================================================
// Version Info
// =============================================================================

/// Current version of bucketkv
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
