//! File-backed datastore.

use crate::error::{StoreError, StoreResult};
use crate::store::Datastore;
use cipherlab_codec::{
    check_frame_payload, decode_record, encode_record, frame_record, parse_frame_len, Record,
    Schema, LEN_FIELD_SIZE,
};
use std::fs::{File, OpenOptions};
use std::io::{BufReader, BufWriter, Read, Write};
use std::path::{Path, PathBuf};

enum FileHandle {
    Reading(BufReader<File>),
    Writing(BufWriter<File>),
}

/// A datastore backed by a single file.
///
/// The store exclusively owns its file handle for its whole lifetime. A
/// store is opened either for writing ([`FileStore::create`]) or for
/// reading ([`FileStore::open`]); the wire format is the record frame
/// defined by `cipherlab_codec`, with all lengths little-endian.
///
/// Writes are buffered. An autoflush threshold greater than zero flushes
/// the buffer after every N-th chunk written (each record is written as two
/// chunks: its length header and its payload). [`FileStore::close`] flushes
/// and releases the handle; any operation afterwards fails with
/// [`StoreError::Closed`].
///
/// # Example
///
/// ```no_run
/// use cipherlab_codec::{Record, Schema};
/// use cipherlab_storage::{Datastore, FileStore};
///
/// let schema = Schema::new(vec!["payload".into()]).unwrap();
/// let mut store = FileStore::create(schema.clone(), "data.bin").unwrap();
/// let mut record = Record::new();
/// record.set_bytes("payload", vec![1, 2, 3]);
/// store.write_record(&record).unwrap();
/// store.close().unwrap();
///
/// let mut reader = FileStore::open(schema, "data.bin").unwrap();
/// let records = reader.read_all().unwrap();
/// assert_eq!(records.len(), 1);
/// ```
pub struct FileStore {
    schema: Schema,
    path: PathBuf,
    handle: Option<FileHandle>,
    autoflush_chunks: u64,
    chunks_written: u64,
}

impl FileStore {
    /// Creates (or truncates) a file for writing records.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be created.
    pub fn create(schema: Schema, path: impl AsRef<Path>) -> StoreResult<Self> {
        Self::create_with_autoflush(schema, path, 0)
    }

    /// Creates a writing store that flushes after every `autoflush_chunks`
    /// chunk writes.
    ///
    /// A threshold of 0 disables autoflush; data then reaches the OS only on
    /// [`FileStore::flush`] or [`FileStore::close`].
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be created.
    pub fn create_with_autoflush(
        schema: Schema,
        path: impl AsRef<Path>,
        autoflush_chunks: u64,
    ) -> StoreResult<Self> {
        let file = OpenOptions::new()
            .write(true)
            .create(true)
            .truncate(true)
            .open(path.as_ref())?;

        Ok(Self {
            schema,
            path: path.as_ref().to_path_buf(),
            handle: Some(FileHandle::Writing(BufWriter::new(file))),
            autoflush_chunks,
            chunks_written: 0,
        })
    }

    /// Opens an existing record file for reading.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be opened.
    pub fn open(schema: Schema, path: impl AsRef<Path>) -> StoreResult<Self> {
        let file = OpenOptions::new().read(true).open(path.as_ref())?;

        Ok(Self {
            schema,
            path: path.as_ref().to_path_buf(),
            handle: Some(FileHandle::Reading(BufReader::new(file))),
            autoflush_chunks: 0,
            chunks_written: 0,
        })
    }

    /// Returns the path of the underlying file.
    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Flushes buffered writes to the OS.
    ///
    /// A no-op for reading stores.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::Closed`] after [`FileStore::close`], or an I/O
    /// error if the flush fails.
    pub fn flush(&mut self) -> StoreResult<()> {
        match self.handle.as_mut() {
            Some(FileHandle::Writing(writer)) => {
                writer.flush()?;
                Ok(())
            }
            Some(FileHandle::Reading(_)) => Ok(()),
            None => Err(StoreError::Closed),
        }
    }

    /// Flushes and releases the file handle. Closing is final: every
    /// subsequent operation fails with [`StoreError::Closed`].
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::Closed`] if already closed, or an I/O error if
    /// the final flush fails.
    pub fn close(&mut self) -> StoreResult<()> {
        self.flush()?;
        self.handle = None;
        Ok(())
    }

    /// Writes one chunk and advances the autoflush counter.
    fn write_chunk(&mut self, data: &[u8]) -> StoreResult<()> {
        match self.handle.as_mut() {
            Some(FileHandle::Writing(writer)) => {
                writer.write_all(data)?;
            }
            Some(FileHandle::Reading(_)) => {
                return Err(StoreError::unsupported("write on a store opened for reading"));
            }
            None => return Err(StoreError::Closed),
        }

        self.chunks_written += 1;
        if self.autoflush_chunks > 0 && self.chunks_written % self.autoflush_chunks == 0 {
            self.flush()?;
        }

        Ok(())
    }

    /// Reads up to `len` bytes, looping until the requested length is
    /// satisfied or the file reports end-of-file.
    ///
    /// Returns whatever accumulated; the codec frame helpers classify a
    /// short result as end-of-stream or corruption.
    fn read_chunk(&mut self, len: usize) -> StoreResult<Vec<u8>> {
        let reader = match self.handle.as_mut() {
            Some(FileHandle::Reading(reader)) => reader,
            Some(FileHandle::Writing(_)) => {
                return Err(StoreError::unsupported("read on a store opened for writing"));
            }
            None => return Err(StoreError::Closed),
        };

        let mut data = vec![0u8; len];
        let mut filled = 0usize;
        while filled < len {
            let n = reader.read(&mut data[filled..])?;
            if n == 0 {
                break;
            }
            filled += n;
        }

        data.truncate(filled);
        Ok(data)
    }
}

impl Datastore for FileStore {
    fn schema(&self) -> &Schema {
        &self.schema
    }

    fn write_record(&mut self, record: &Record) -> StoreResult<()> {
        let framed = frame_record(&encode_record(record, &self.schema)?);
        // Still two chunk writes per record (header, then payload) so
        // the autoflush cadence counts a record as two chunks.
        let (header, payload) = framed.split_at(LEN_FIELD_SIZE);
        self.write_chunk(header)?;
        self.write_chunk(payload)?;
        Ok(())
    }

    fn read_next_record(&mut self) -> StoreResult<Option<Record>> {
        let header = self.read_chunk(LEN_FIELD_SIZE)?;
        let Some(payload_len) = parse_frame_len(&header)? else {
            return Ok(None);
        };

        let payload = self.read_chunk(payload_len)?;
        check_frame_payload(&payload, payload_len)?;

        let record = decode_record(&payload, &self.schema)?;
        Ok(Some(record))
    }
}
