//! Mini-batch access for training loops.
//!
//! A [`BatchSource`] hands out records one mini-batch at a time. The
//! shard-backed implementation maps batch `i` to shard file `i + 1`, so a
//! training loop learns the batch count without reading any data; the
//! online implementation generates a fresh batch on every request, which
//! makes overfitting to the data impossible.

use std::fs;
use std::path::{Path, PathBuf};

use cipherlab_codec::{Record, Schema};
use cipherlab_storage::{Datastore, FileStore, MemoryStore};
use tracing::debug;

use crate::error::{CoreError, CoreResult};
use crate::fields;
use crate::generate::DatasetGenerator;
use crate::pool::{CipherPool, SourcePool};

/// A provider of training mini-batches.
pub trait BatchSource {
    /// Returns the number of available batches.
    fn batch_count(&self) -> usize;

    /// Loads the records of batch `index` (zero-based).
    ///
    /// # Errors
    ///
    /// Returns an error when the index is out of range or the batch
    /// cannot be read.
    fn load_batch(&mut self, index: usize) -> CoreResult<Vec<Record>>;
}

/// Serves batches from the shard files a
/// [`SplitFileStore`](cipherlab_storage::SplitFileStore) wrote.
///
/// Shard files are numbered from 1, so batch `index` reads the file
/// `{prefix}{index + 1}{suffix}`. The batch count is fixed at
/// construction by counting matching files in the directory.
#[derive(Debug)]
pub struct ShardBatchSource {
    schema: Schema,
    directory: PathBuf,
    prefix: String,
    suffix: String,
    batch_count: usize,
}

impl ShardBatchSource {
    /// Scans `directory` for shard files and builds the source.
    ///
    /// # Errors
    ///
    /// Returns [`CoreError::Io`] when the directory cannot be listed.
    pub fn new(
        schema: Schema,
        directory: impl AsRef<Path>,
        prefix: impl Into<String>,
        suffix: impl Into<String>,
    ) -> CoreResult<Self> {
        let directory = directory.as_ref().to_path_buf();
        let prefix = prefix.into();
        let suffix = suffix.into();

        let mut batch_count = 0;
        for entry in fs::read_dir(&directory)? {
            let entry = entry?;
            let name = entry.file_name();
            let Some(name) = name.to_str() else { continue };
            if name.starts_with(&prefix) && name.ends_with(&suffix) {
                batch_count += 1;
            }
        }
        debug!(shards = batch_count, directory = %directory.display(), "indexed shard files");

        Ok(Self {
            schema,
            directory,
            prefix,
            suffix,
            batch_count,
        })
    }
}

impl BatchSource for ShardBatchSource {
    fn batch_count(&self) -> usize {
        self.batch_count
    }

    fn load_batch(&mut self, index: usize) -> CoreResult<Vec<Record>> {
        if index >= self.batch_count {
            return Err(CoreError::configuration(format!(
                "batch index {index} is out of range, only {} shards exist",
                self.batch_count
            )));
        }
        let path = self
            .directory
            .join(format!("{}{}{}", self.prefix, index + 1, self.suffix));
        let mut store = FileStore::open(self.schema.clone(), &path)?;
        let records = store.read_all()?;
        store.close()?;
        Ok(records)
    }
}

/// Generates a fresh batch of records on every request.
pub struct OnlineBatchSource {
    generator: DatasetGenerator<MemoryStore>,
    batch_size: u64,
}

impl OnlineBatchSource {
    /// Creates an online source generating `batch_size` records per batch.
    ///
    /// # Errors
    ///
    /// Returns [`CoreError::Configuration`] when `batch_size` is zero or
    /// either pool is empty.
    pub fn new(ciphers: CipherPool, sources: SourcePool, batch_size: u64) -> CoreResult<Self> {
        if batch_size == 0 {
            return Err(CoreError::configuration("batch size must be at least 1"));
        }
        let store = MemoryStore::new(fields::dataset_schema());
        let generator = DatasetGenerator::new(store, ciphers, sources)?;
        Ok(Self {
            generator,
            batch_size,
        })
    }
}

impl BatchSource for OnlineBatchSource {
    /// Always 1: the single batch is regenerated on every load.
    fn batch_count(&self) -> usize {
        1
    }

    fn load_batch(&mut self, _index: usize) -> CoreResult<Vec<Record>> {
        self.generator.generate(self.batch_size)?;
        Ok(self.generator.store_mut().read_all()?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use cipherlab_storage::SplitFileStore;

    use crate::plaintext::{BinarySource, SizeBounds};

    fn small_sources() -> SourcePool {
        let bounds = SizeBounds::new(10, 20).unwrap();
        let mut sources = SourcePool::new();
        sources.add(Box::new(BinarySource::new(bounds))).unwrap();
        sources
    }

    fn write_shards(dir: &Path, records: u64, per_shard: u64) {
        let store = SplitFileStore::new(
            fields::dataset_schema(),
            per_shard,
            dir,
            "train_",
            ".bin",
        )
        .unwrap();
        let mut generator =
            DatasetGenerator::new(store, CipherPool::ecb_only().unwrap(), small_sources())
                .unwrap();
        generator.generate(records).unwrap();
        generator.into_store().close().unwrap();
    }

    #[test]
    fn shard_source_counts_matching_files() {
        let dir = tempfile::tempdir().unwrap();
        write_shards(dir.path(), 10, 4);
        // Unrelated files are not counted.
        std::fs::write(dir.path().join("notes.txt"), b"x").unwrap();

        let source =
            ShardBatchSource::new(fields::dataset_schema(), dir.path(), "train_", ".bin")
                .unwrap();
        assert_eq!(source.batch_count(), 3);
    }

    #[test]
    fn shard_source_serves_each_batch() {
        let dir = tempfile::tempdir().unwrap();
        write_shards(dir.path(), 10, 4);

        let mut source =
            ShardBatchSource::new(fields::dataset_schema(), dir.path(), "train_", ".bin")
                .unwrap();
        assert_eq!(source.load_batch(0).unwrap().len(), 4);
        assert_eq!(source.load_batch(1).unwrap().len(), 4);
        assert_eq!(source.load_batch(2).unwrap().len(), 2);
    }

    #[test]
    fn shard_source_rejects_out_of_range_index() {
        let dir = tempfile::tempdir().unwrap();
        write_shards(dir.path(), 4, 2);

        let mut source =
            ShardBatchSource::new(fields::dataset_schema(), dir.path(), "train_", ".bin")
                .unwrap();
        assert!(source.load_batch(2).is_err());
    }

    #[test]
    fn empty_directory_yields_zero_batches() {
        let dir = tempfile::tempdir().unwrap();
        let source =
            ShardBatchSource::new(fields::dataset_schema(), dir.path(), "train_", ".bin")
                .unwrap();
        assert_eq!(source.batch_count(), 0);
    }

    #[test]
    fn online_source_regenerates_every_batch() {
        let mut source =
            OnlineBatchSource::new(CipherPool::ecb_only().unwrap(), small_sources(), 8).unwrap();
        assert_eq!(source.batch_count(), 1);
        assert_eq!(source.load_batch(0).unwrap().len(), 8);
        assert_eq!(source.load_batch(0).unwrap().len(), 8);
    }

    #[test]
    fn online_source_rejects_zero_batch_size() {
        let result =
            OnlineBatchSource::new(CipherPool::ecb_only().unwrap(), small_sources(), 0);
        assert!(matches!(result, Err(CoreError::Configuration { .. })));
    }
}
