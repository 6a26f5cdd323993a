//! Engine Module
//!
//! The storage engine: one open handle on one storage directory.
//!
//! ## Responsibilities
//! - Create, open and close storages
//! - Typed get/put with key-only upsert
//! - Grow-and-rehash when the table is full
//! - Readers-writer locking per handle

use std::fs;
use std::io::ErrorKind;
use std::ops::ControlFlow;
use std::path::{Path, PathBuf};

use bytes::Bytes;
use parking_lot::{RwLock, RwLockReadGuard};

use crate::codec::{Key, KeyType, Record};
use crate::error::{KvError, Result};
use crate::metadata::{HashFunction, Metadata};
use crate::storage::BucketStore;

/// An open storage
///
/// ## Concurrency Model: Single-Writer / Multiple-Reader (SWMR)
///
/// - **Reads** (get): shared lock on `metadata`, any number at once
/// - **Writes** (put, including growth): exclusive lock on `metadata`
///
/// The lock is `parking_lot`'s task-fair RwLock, so a steady stream of
/// readers cannot starve a writer or the other way round.
///
/// The lock lives in the handle. Two handles opened on the same path do not
/// see each other's lock and must not write concurrently.
///
/// ## Crash Consistency
/// A bucket rewrite is atomic (rename). Growth is not: a crash or error
/// while draining leaves the already drained records only in `data/copy`.
/// Those keys read as absent (`Ok(None)`) and the next growth fails with
/// `AlreadyExists` on that directory until it is dealt with.
pub struct Engine {
    /// Storage root directory
    root: PathBuf,

    /// `<root>/parameters`
    parameters_path: PathBuf,

    /// Bucket files under `<root>/data`
    buckets: BucketStore,

    /// Declared key type (immutable, checked before taking the lock)
    key_type: KeyType,

    /// In-memory metadata; the lock around it is the handle's lock
    metadata: RwLock<Metadata>,

    /// Set once metadata no longer needs flushing on drop
    closed: bool,
}

impl Engine {
    // =========================================================================
    // Internal Path Constants
    // =========================================================================
    const PARAMETERS_FILENAME: &'static str = "parameters";
    const DATA_DIR: &'static str = "data";
    const SCRATCH_DIR: &'static str = "copy";

    /// Create a storage with default capacity and the structural hash
    pub fn create(path: impl AsRef<Path>, key_type: KeyType) -> Result<Self> {
        Self::create_with(path, Metadata::builder(key_type).build()?)
    }

    /// Create a storage with explicit capacity and hash function
    pub fn create_with_options(
        path: impl AsRef<Path>,
        key_type: KeyType,
        hash_fn: Option<HashFunction>,
        capacity: u32,
    ) -> Result<Self> {
        let metadata = Metadata::builder(key_type)
            .capacity(capacity)
            .hash_fn(hash_fn)
            .build()?;
        Self::create_with(path, metadata)
    }

    /// Create a storage from prepared metadata
    ///
    /// Steps:
    /// 1. Refuse an existing path
    /// 2. Create the root and data directories
    /// 3. Write the parameters file with size 0
    ///
    /// If step 2 or 3 fails, everything created is removed before the error
    /// is returned.
    pub fn create_with(path: impl AsRef<Path>, metadata: Metadata) -> Result<Self> {
        let root = path.as_ref().to_path_buf();
        if root.exists() {
            return Err(KvError::AlreadyExists(root));
        }

        let mut metadata = metadata;
        metadata.set_size(0);

        match fs::create_dir(&root) {
            Ok(()) => {}
            Err(e) if e.kind() == ErrorKind::AlreadyExists => {
                return Err(KvError::AlreadyExists(root));
            }
            Err(e) => return Err(e.into()),
        }

        let engine = Self::new(root, metadata);

        let setup = fs::create_dir(engine.buckets.data_dir())
            .map_err(KvError::from)
            .and_then(|_| engine.metadata.read().store(&engine.parameters_path));

        if let Err(e) = setup {
            // Nothing was handed out yet, so no flush on drop
            let mut engine = engine;
            engine.closed = true;
            if let Err(cleanup) = fs::remove_dir_all(&engine.root) {
                tracing::warn!(
                    "Failed to roll back partial storage {}: {}",
                    engine.root.display(),
                    cleanup
                );
            }
            return Err(e);
        }

        tracing::debug!(
            path = %engine.root.display(),
            key_type = %engine.key_type,
            "storage created"
        );
        Ok(engine)
    }

    /// Open an existing storage
    pub fn open(path: impl AsRef<Path>) -> Result<Self> {
        let root = path.as_ref().to_path_buf();
        if !root.exists() {
            return Err(KvError::NotFound(root));
        }

        let metadata = Metadata::load(&root.join(Self::PARAMETERS_FILENAME))?;
        tracing::debug!(
            path = %root.display(),
            capacity = metadata.capacity(),
            size = metadata.size(),
            "storage opened"
        );

        Ok(Self::new(root, metadata))
    }

    fn new(root: PathBuf, metadata: Metadata) -> Self {
        let data_dir = root.join(Self::DATA_DIR);
        Self {
            parameters_path: root.join(Self::PARAMETERS_FILENAME),
            buckets: BucketStore::new(&data_dir),
            key_type: metadata.key_type(),
            metadata: RwLock::new(metadata),
            closed: false,
            root,
        }
    }

    /// Get the value stored under a key
    ///
    /// Returns `Ok(None)` if the key was never put. A stored empty value is
    /// `Ok(Some(empty))`, never `None`.
    pub fn get(&self, key: &Key) -> Result<Option<Bytes>> {
        self.check_key_type(key)?;
        let metadata = self.metadata.read();

        let index = metadata.bucket_index(key);
        self.buckets.scan(index, |record| {
            Ok(if record.key == *key {
                ControlFlow::Break(record.value)
            } else {
                ControlFlow::Continue(())
            })
        })
    }

    /// Put a key-value pair
    ///
    /// Steps:
    /// 1. Acquire the write lock
    /// 2. Grow if the table is full
    /// 3. Rewrite the target bucket, replacing the record with an equal key
    ///    or appending a new one
    /// 4. Count the key if it was new
    pub fn put(&self, key: &Key, value: impl Into<Bytes>) -> Result<()> {
        self.check_key_type(key)?;
        let record = Record::new(key.clone(), value);

        let mut metadata = self.metadata.write();

        if metadata.size() == metadata.capacity() {
            self.grow(&mut metadata)?;
        }

        let index = metadata.bucket_index(key);
        let replaced = self.buckets.rewrite(index, |out| {
            let mut replaced = false;
            self.buckets.scan(index, |existing| {
                if existing != record {
                    out.write(&existing)?;
                } else if !replaced {
                    out.write(&record)?;
                    replaced = true;
                }
                Ok(ControlFlow::<()>::Continue(()))
            })?;

            if !replaced {
                out.write(&record)?;
            }
            Ok(replaced)
        })?;

        if !replaced {
            let size = metadata.size() + 1;
            metadata.set_size(size);
        }

        Ok(())
    }

    /// Write the in-memory metadata to the parameters file
    pub fn flush(&self) -> Result<()> {
        self.metadata.read().store(&self.parameters_path)
    }

    /// Close the storage, flushing metadata
    ///
    /// Bucket files are already durable as of each put.
    pub fn close(mut self) -> Result<()> {
        self.closed = true;
        let result = self.flush();
        tracing::debug!(path = %self.root.display(), "storage closed");
        result
    }

    // =========================================================================
    // Grow-and-rehash
    // =========================================================================

    /// Double the bucket count and redistribute every record
    ///
    /// Runs under the caller's write lock. The scratch storage is a separate
    /// engine with its own lock, so putting into it cannot deadlock.
    fn grow(&self, metadata: &mut Metadata) -> Result<()> {
        let old_capacity = metadata.capacity();
        let new_capacity = old_capacity
            .checked_mul(2)
            .ok_or(KvError::InvalidCapacity(old_capacity as u64 * 2))?;

        tracing::info!(
            path = %self.root.display(),
            old_capacity,
            new_capacity,
            entries = metadata.size(),
            "growing storage"
        );

        let scratch_root = self.buckets.data_dir().join(Self::SCRATCH_DIR);
        let scratch = Engine::create_with(&scratch_root, metadata.clone_with(new_capacity))?;

        // Drain: every record moves into the scratch storage
        self.buckets
            .for_each_bucket(old_capacity as u64, |path, _| {
                BucketStore::scan_path(path, |record| {
                    scratch.put(&record.key, record.value)?;
                    Ok(ControlFlow::<()>::Continue(()))
                })?;
                Ok(())
            })?;

        let moved = scratch.metadata.read().size();
        if moved != metadata.size() {
            tracing::warn!(
                expected = metadata.size(),
                moved,
                "entry count changed during rehash"
            );
        }

        // Move back: scratch buckets take their index in this storage
        scratch
            .buckets
            .for_each_bucket(new_capacity as u64, |path, index| {
                fs::rename(path, self.buckets.bucket_path(index))?;
                Ok(())
            })?;

        scratch.discard()?;
        metadata.set_capacity(new_capacity);

        Ok(())
    }

    /// Remove this storage from disk without flushing metadata
    fn discard(mut self) -> Result<()> {
        self.closed = true;
        fs::remove_dir_all(&self.root)?;
        Ok(())
    }

    fn check_key_type(&self, key: &Key) -> Result<()> {
        if key.key_type() != self.key_type {
            return Err(KvError::invalid_key_type(self.key_type, key.key_type()));
        }
        Ok(())
    }

    // =========================================================================
    // Accessors (for testing and debugging)
    // =========================================================================

    /// Get the storage root path
    pub fn path(&self) -> &Path {
        &self.root
    }

    /// Get the bucket store
    pub fn buckets(&self) -> &BucketStore {
        &self.buckets
    }

    /// Snapshot of the current metadata
    pub fn metadata(&self) -> Metadata {
        self.metadata.read().clone()
    }

    /// Number of distinct live keys
    pub fn size(&self) -> u32 {
        self.metadata.read().size()
    }

    /// Current number of buckets
    pub fn capacity(&self) -> u32 {
        self.metadata.read().capacity()
    }

    /// Declared key type
    pub fn key_type(&self) -> KeyType {
        self.key_type
    }

    /// Take the shared lock and hold it until the guard drops
    ///
    /// Puts block while the guard is alive. The lock is task-fair, so once a
    /// put is waiting, other calls on this handle from the guard's thread
    /// will deadlock: read through the guard instead.
    pub fn read_guard(&self) -> RwLockReadGuard<'_, Metadata> {
        self.metadata.read()
    }
}

impl Drop for Engine {
    fn drop(&mut self) {
        if self.closed {
            return;
        }
        if let Err(e) = self.flush() {
            tracing::warn!(
                "Failed to flush metadata for {} on drop: {}",
                self.root.display(),
                e
            );
        }
    }
}
