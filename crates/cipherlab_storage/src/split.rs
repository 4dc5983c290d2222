//! Write-only sharded multi-file datastore.

use crate::error::{StoreError, StoreResult};
use crate::file::FileStore;
use crate::store::Datastore;
use cipherlab_codec::{Record, Schema};
use std::path::{Path, PathBuf};
use tracing::debug;

/// A write-only datastore that splits records over multiple shard files.
///
/// The store keeps a running record index and a fixed shard size. Whenever
/// the index is a multiple of the shard size, the previously open shard (if
/// any) is closed and a new one is created, named from the configured
/// prefix, the 1-based shard number and suffix: `{prefix}{n}{suffix}`.
///
/// Reading is not supported; individual shards are plain [`FileStore`]
/// files and must be read with that backend directly.
///
/// [`SplitFileStore::close`] finishes the last shard; skipping it may leave
/// unflushed data in the final shard. The store exclusively owns at most
/// one open shard at a time.
pub struct SplitFileStore {
    schema: Schema,
    records_per_shard: u64,
    directory: PathBuf,
    prefix: String,
    suffix: String,
    current: Option<FileStore>,
    index: u64,
    closed: bool,
}

impl SplitFileStore {
    /// Creates a sharded store writing into `directory`.
    ///
    /// No file is created until the first record is written.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::InvalidShardSize`] if `records_per_shard` is 0.
    pub fn new(
        schema: Schema,
        records_per_shard: u64,
        directory: impl AsRef<Path>,
        prefix: impl Into<String>,
        suffix: impl Into<String>,
    ) -> StoreResult<Self> {
        if records_per_shard == 0 {
            return Err(StoreError::InvalidShardSize);
        }

        Ok(Self {
            schema,
            records_per_shard,
            directory: directory.as_ref().to_path_buf(),
            prefix: prefix.into(),
            suffix: suffix.into(),
            current: None,
            index: 0,
            closed: false,
        })
    }

    /// Returns the path of the shard with the given 1-based number.
    #[must_use]
    pub fn shard_path(&self, shard_no: u64) -> PathBuf {
        self.directory
            .join(format!("{}{}{}", self.prefix, shard_no, self.suffix))
    }

    /// Returns the number of records written so far.
    #[must_use]
    pub fn records_written(&self) -> u64 {
        self.index
    }

    /// Closes the last open shard. Closing is final.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::Closed`] if already closed, or an I/O error if
    /// the final shard cannot be flushed.
    pub fn close(&mut self) -> StoreResult<()> {
        if self.closed {
            return Err(StoreError::Closed);
        }
        if let Some(mut shard) = self.current.take() {
            shard.close()?;
        }
        self.closed = true;
        Ok(())
    }
}

impl Datastore for SplitFileStore {
    fn schema(&self) -> &Schema {
        &self.schema
    }

    fn write_record(&mut self, record: &Record) -> StoreResult<()> {
        if self.closed {
            return Err(StoreError::Closed);
        }

        if self.index % self.records_per_shard == 0 {
            if let Some(mut previous) = self.current.take() {
                previous.close()?;
            }

            let shard_no = 1 + self.index / self.records_per_shard;
            let path = self.shard_path(shard_no);
            debug!(shard = shard_no, path = %path.display(), "rotating to new shard");
            self.current = Some(FileStore::create(self.schema.clone(), path)?);
        }

        let Some(shard) = self.current.as_mut() else {
            return Err(StoreError::Closed);
        };
        shard.write_record(record)?;
        self.index += 1;
        Ok(())
    }

    fn read_next_record(&mut self) -> StoreResult<Option<Record>> {
        Err(StoreError::unsupported(
            "read_next_record on a write-only split store; read shards with FileStore",
        ))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    fn schema() -> Schema {
        Schema::new(vec!["data".into()]).unwrap()
    }

    fn record(byte: u8) -> Record {
        let mut record = Record::new();
        record.set_bytes("data", vec![byte]);
        record
    }

    fn shard_record_count(schema: &Schema, path: &Path) -> usize {
        let mut reader = FileStore::open(schema.clone(), path).unwrap();
        reader.read_all().unwrap().len()
    }

    #[test]
    fn zero_shard_size_rejected() {
        let dir = tempdir().unwrap();
        let result = SplitFileStore::new(schema(), 0, dir.path(), "train_", ".bin");
        assert!(matches!(result, Err(StoreError::InvalidShardSize)));
    }

    #[test]
    fn shards_hold_bounded_runs() {
        let dir = tempdir().unwrap();
        let mut store = SplitFileStore::new(schema(), 3, dir.path(), "train_", ".bin").unwrap();

        // 7 records with shard size 3 -> shards of 3, 3 and 1.
        for i in 0..7u8 {
            store.write_record(&record(i)).unwrap();
        }
        store.close().unwrap();

        assert_eq!(shard_record_count(&schema(), &store.shard_path(1)), 3);
        assert_eq!(shard_record_count(&schema(), &store.shard_path(2)), 3);
        assert_eq!(shard_record_count(&schema(), &store.shard_path(3)), 1);
        assert!(!store.shard_path(4).exists());
    }

    #[test]
    fn exact_multiple_fills_last_shard() {
        let dir = tempdir().unwrap();
        let mut store = SplitFileStore::new(schema(), 2, dir.path(), "s", ".bin").unwrap();

        for i in 0..6u8 {
            store.write_record(&record(i)).unwrap();
        }
        store.close().unwrap();

        for shard_no in 1..=3 {
            assert_eq!(shard_record_count(&schema(), &store.shard_path(shard_no)), 2);
        }
        assert!(!store.shard_path(4).exists());
    }

    #[test]
    fn shards_preserve_write_order() {
        let dir = tempdir().unwrap();
        let mut store = SplitFileStore::new(schema(), 4, dir.path(), "s", ".bin").unwrap();

        for i in 0..10u8 {
            store.write_record(&record(i)).unwrap();
        }
        store.close().unwrap();

        let mut seen = Vec::new();
        for shard_no in 1..=3 {
            let mut reader = FileStore::open(schema(), store.shard_path(shard_no)).unwrap();
            for rec in reader.read_all().unwrap() {
                seen.push(rec.get("data").unwrap().as_bytes()[0]);
            }
        }
        assert_eq!(seen, (0..10u8).collect::<Vec<_>>());
    }

    #[test]
    fn no_files_until_first_write() {
        let dir = tempdir().unwrap();
        let store = SplitFileStore::new(schema(), 5, dir.path(), "s", ".bin").unwrap();
        assert!(!store.shard_path(1).exists());
    }

    #[test]
    fn read_is_unsupported() {
        let dir = tempdir().unwrap();
        let mut store = SplitFileStore::new(schema(), 5, dir.path(), "s", ".bin").unwrap();
        assert!(matches!(
            store.read_next_record(),
            Err(StoreError::Unsupported { .. })
        ));
    }

    #[test]
    fn write_after_close_fails() {
        let dir = tempdir().unwrap();
        let mut store = SplitFileStore::new(schema(), 5, dir.path(), "s", ".bin").unwrap();
        store.write_record(&record(0)).unwrap();
        store.close().unwrap();

        assert!(matches!(
            store.write_record(&record(1)),
            Err(StoreError::Closed)
        ));
        assert!(matches!(store.close(), Err(StoreError::Closed)));
    }

    #[test]
    fn records_written_counter() {
        let dir = tempdir().unwrap();
        let mut store = SplitFileStore::new(schema(), 2, dir.path(), "s", ".bin").unwrap();
        assert_eq!(store.records_written(), 0);
        store.write_record(&record(0)).unwrap();
        store.write_record(&record(1)).unwrap();
        store.write_record(&record(2)).unwrap();
        assert_eq!(store.records_written(), 3);
        store.close().unwrap();
    }
}
