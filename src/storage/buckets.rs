//! Bucket Store
//!
//! Reads, rewrites and drains the bucket files of one data directory.

use std::fs::{self, File};
use std::io::ErrorKind;
use std::ops::ControlFlow;
use std::path::{Path, PathBuf};

use crate::codec::{Record, RecordReader, RecordWriter};
use crate::error::{KvError, Result};

/// Prefix of in-flight bucket rewrites (never a valid bucket name)
const TEMP_PREFIX: &str = ".bucket-";

/// Manages the bucket files of one storage
///
/// Holds no file handles between calls; every operation opens what it needs.
/// Callers serialize access (the engine's readers-writer lock).
#[derive(Debug, Clone)]
pub struct BucketStore {
    /// Directory holding the bucket files
    data_dir: PathBuf,
}

impl BucketStore {
    pub fn new(data_dir: &Path) -> Self {
        Self {
            data_dir: data_dir.to_path_buf(),
        }
    }

    /// Get the data directory path
    pub fn data_dir(&self) -> &Path {
        &self.data_dir
    }

    /// Path of the bucket file for an index (it may not exist yet)
    pub fn bucket_path(&self, index: u64) -> PathBuf {
        self.data_dir.join(index.to_string())
    }

    /// Scan a bucket's records in order
    ///
    /// The callback returns `Break(result)` to stop early; `scan` then yields
    /// `Some(result)`. A bucket without a file scans as empty.
    pub fn scan<B, F>(&self, index: u64, callback: F) -> Result<Option<B>>
    where
        F: FnMut(Record) -> Result<ControlFlow<B>>,
    {
        Self::scan_path(&self.bucket_path(index), callback)
    }

    /// Scan the records of an arbitrary bucket file
    pub fn scan_path<B, F>(path: &Path, mut callback: F) -> Result<Option<B>>
    where
        F: FnMut(Record) -> Result<ControlFlow<B>>,
    {
        let mut reader = match RecordReader::open(path) {
            Ok(reader) => reader,
            Err(KvError::Io(e)) if e.kind() == ErrorKind::NotFound => return Ok(None),
            Err(e) => return Err(e),
        };

        while let Some(record) = reader.next_record()? {
            if let ControlFlow::Break(result) = callback(record)? {
                return Ok(Some(result));
            }
        }

        Ok(None)
    }

    /// Replace a bucket with whatever `write` emits
    ///
    /// Records go to a temporary file in the data directory which is synced
    /// and renamed over the bucket. If `write` or any I/O step fails the
    /// temporary file is removed and the old bucket is left as it was.
    pub fn rewrite<T, F>(&self, index: u64, write: F) -> Result<T>
    where
        F: FnOnce(&mut RecordWriter<&mut File>) -> Result<T>,
    {
        let path = self.bucket_path(index);
        let mut temp = tempfile::Builder::new()
            .prefix(TEMP_PREFIX)
            .tempfile_in(&self.data_dir)?;

        let output = {
            let mut writer = RecordWriter::new(temp.as_file_mut());
            let output = write(&mut writer)?;
            tracing::trace!(bucket = index, records = writer.records_written(), "rewriting bucket");
            writer.finish()?;
            output
        };

        temp.as_file().sync_data()?;
        temp.persist(&path).map_err(|e| KvError::Io(e.error))?;

        Ok(output)
    }

    /// Visit and then delete every existing bucket in `0..count`
    ///
    /// Missing indices are skipped. A visitor may move the file away itself;
    /// the delete only applies to a file still in place.
    pub fn for_each_bucket<F>(&self, count: u64, mut visitor: F) -> Result<()>
    where
        F: FnMut(&Path, u64) -> Result<()>,
    {
        for index in 0..count {
            let path = self.bucket_path(index);
            if !path.exists() {
                continue;
            }

            visitor(&path, index)?;

            match fs::remove_file(&path) {
                Ok(()) => {}
                Err(e) if e.kind() == ErrorKind::NotFound => {}
                Err(e) => return Err(e.into()),
            }
        }

        Ok(())
    }

    /// Indices of the bucket files present on disk, ascending
    pub fn bucket_files(&self) -> Result<Vec<u64>> {
        let mut indices = Vec::new();

        for entry in fs::read_dir(&self.data_dir)? {
            let entry = entry?;
            if !entry.file_type()?.is_file() {
                continue;
            }
            if let Some(index) = Self::parse_bucket_index(&entry.path()) {
                indices.push(index);
            }
        }

        indices.sort_unstable();
        Ok(indices)
    }

    // =========================================================================
    // Private Helpers
    // =========================================================================

    /// "17" → Some(17); temporaries and "017" → None
    fn parse_bucket_index(path: &Path) -> Option<u64> {
        let name = path.file_name()?.to_str()?;
        let index: u64 = name.parse().ok()?;
        (index.to_string() == name).then_some(index)
    }
}
