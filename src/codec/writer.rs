//! Record Writer
//!
//! Appends encoded records to a buffered stream.

use std::io::{BufWriter, Write};

use bincode::Options;

use crate::error::{KvError, Result};

use super::{options, Record};

/// Write buffer for bucket files
const BUFFER_SIZE: usize = 64 * 1024;

/// Writes records back to back
pub struct RecordWriter<W: Write> {
    writer: BufWriter<W>,
    /// Number of records written
    records_written: u64,
}

impl<W: Write> RecordWriter<W> {
    pub fn new(inner: W) -> Self {
        Self {
            writer: BufWriter::with_capacity(BUFFER_SIZE, inner),
            records_written: 0,
        }
    }

    /// Append a record
    pub fn write(&mut self, record: &Record) -> Result<()> {
        options()
            .serialize_into(&mut self.writer, record)
            .map_err(|e| match *e {
                bincode::ErrorKind::Io(io) => KvError::Io(io),
                other => KvError::Serialization(other.to_string()),
            })?;
        self.records_written += 1;
        Ok(())
    }

    /// Number of records written so far
    pub fn records_written(&self) -> u64 {
        self.records_written
    }

    /// Flush buffered records and hand back the underlying stream
    pub fn finish(self) -> Result<W> {
        self.writer
            .into_inner()
            .map_err(|e| KvError::Io(e.into_error()))
    }
}
