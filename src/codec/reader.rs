//! Record Reader
//!
//! Sequential iteration over the records of a bucket stream.

use std::fs::File;
use std::io::{BufRead, BufReader, ErrorKind};
use std::path::Path;

use bincode::Options;

use crate::error::{KvError, Result};

use super::{options, Record};

/// Read buffer for bucket files
const BUFFER_SIZE: usize = 64 * 1024;

/// Reads records one after another until end of stream
pub struct RecordReader<R> {
    reader: R,
    /// Records decoded so far (for error messages)
    records_read: u64,
}

impl RecordReader<BufReader<File>> {
    /// Open a bucket file for reading
    pub fn open(path: &Path) -> Result<Self> {
        let file = File::open(path)?;
        Ok(Self::new(BufReader::with_capacity(BUFFER_SIZE, file)))
    }
}

impl<R: BufRead> RecordReader<R> {
    pub fn new(reader: R) -> Self {
        Self {
            reader,
            records_read: 0,
        }
    }

    /// Read the next record
    ///
    /// Returns `Ok(None)` only at a clean record boundary; a stream that ends
    /// inside a record is reported as `Decode`.
    pub fn next_record(&mut self) -> Result<Option<Record>> {
        if self.reader.fill_buf()?.is_empty() {
            return Ok(None);
        }

        let record: Record = options()
            .deserialize_from(&mut self.reader)
            .map_err(|e| self.decode_error(*e))?;

        self.records_read += 1;
        Ok(Some(record))
    }

    /// Number of records decoded so far
    pub fn records_read(&self) -> u64 {
        self.records_read
    }

    fn decode_error(&self, err: bincode::ErrorKind) -> KvError {
        match err {
            bincode::ErrorKind::Io(e) if e.kind() == ErrorKind::UnexpectedEof => KvError::Decode(
                format!("truncated record after {} complete records", self.records_read),
            ),
            bincode::ErrorKind::Io(e) => KvError::Io(e),
            other => KvError::Decode(format!("record {}: {}", self.records_read, other)),
        }
    }
}

impl<R: BufRead> Iterator for RecordReader<R> {
    type Item = Result<Record>;

    fn next(&mut self) -> Option<Self::Item> {
        self.next_record().transpose()
    }
}
