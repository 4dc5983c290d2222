//! Datastore trait definition.

use crate::error::StoreResult;
use cipherlab_codec::{Record, Schema};

/// A store of schema-ordered records.
///
/// Every datastore is constructed with a fixed [`Schema`] that governs the
/// serialization order of its records. Backends differ in lifecycle and
/// capacity but share identical read-back semantics: records come back in
/// write order, and end-of-stream is reported as `Ok(None)`, never as an
/// error.
///
/// Datastores are single-writer, single-reader and provide no internal
/// locking; not sharing a store across concurrent producers or consumers is
/// a caller obligation.
///
/// # Implementors
///
/// - [`crate::FileStore`] - one record file on disk
/// - [`crate::MemoryStore`] - in-process FIFO queue
/// - [`crate::SplitFileStore`] - write-only sharded multi-file store
pub trait Datastore {
    /// Returns the schema governing this store's records.
    fn schema(&self) -> &Schema;

    /// Writes a single record to the store.
    ///
    /// # Errors
    ///
    /// Returns an error if the record cannot be encoded, the backend cannot
    /// accept writes, or an I/O error occurs.
    fn write_record(&mut self, record: &Record) -> StoreResult<()>;

    /// Reads the next available record.
    ///
    /// Returns `Ok(None)` at end-of-stream.
    ///
    /// # Errors
    ///
    /// Returns an error if the stored data is corrupted, the backend does
    /// not support reads, or an I/O error occurs.
    fn read_next_record(&mut self) -> StoreResult<Option<Record>>;

    /// Reads all remaining records by calling [`Self::read_next_record`]
    /// until end-of-stream.
    ///
    /// # Errors
    ///
    /// Returns the first error encountered while reading.
    fn read_all(&mut self) -> StoreResult<Vec<Record>> {
        let mut results = Vec::new();
        while let Some(record) = self.read_next_record()? {
            results.push(record);
        }
        Ok(results)
    }
}
