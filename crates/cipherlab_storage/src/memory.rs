//! In-memory FIFO datastore.

use crate::error::StoreResult;
use crate::store::Datastore;
use cipherlab_codec::{Record, Schema};
use std::collections::VecDeque;

/// An in-memory datastore backed by a FIFO queue.
///
/// Records are held as-is, with no serialization; the store has no
/// persistence and is bounded only by process memory. Reading a record
/// removes it from the queue.
///
/// # Example
///
/// ```
/// use cipherlab_codec::{Record, Schema};
/// use cipherlab_storage::{Datastore, MemoryStore};
///
/// let schema = Schema::new(vec!["payload".into()]).unwrap();
/// let mut store = MemoryStore::new(schema);
///
/// let mut record = Record::new();
/// record.set_bytes("payload", vec![1, 2, 3]);
/// store.write_record(&record).unwrap();
///
/// assert_eq!(store.pending_count(), 1);
/// assert!(store.read_next_record().unwrap().is_some());
/// assert!(!store.has_more());
/// ```
#[derive(Debug)]
pub struct MemoryStore {
    schema: Schema,
    queue: VecDeque<Record>,
}

impl MemoryStore {
    /// Creates an empty in-memory store.
    #[must_use]
    pub fn new(schema: Schema) -> Self {
        Self {
            schema,
            queue: VecDeque::new(),
        }
    }

    /// Returns the number of unread records.
    #[must_use]
    pub fn pending_count(&self) -> usize {
        self.queue.len()
    }

    /// Returns `true` if at least one unread record is available.
    #[must_use]
    pub fn has_more(&self) -> bool {
        !self.queue.is_empty()
    }
}

impl Datastore for MemoryStore {
    fn schema(&self) -> &Schema {
        &self.schema
    }

    fn write_record(&mut self, record: &Record) -> StoreResult<()> {
        self.queue.push_back(record.clone());
        Ok(())
    }

    fn read_next_record(&mut self) -> StoreResult<Option<Record>> {
        Ok(self.queue.pop_front())
    }
}
