//! # Cipherlab Storage
//!
//! Record datastore trait and backends for cipherlab.
//!
//! All backends share one capability set - write a record, read the next
//! record (with `Ok(None)` as the end-of-stream signal) and read everything
//! remaining - while differing in lifecycle and capacity:
//!
//! - [`FileStore`] persists records to a single file using the
//!   `cipherlab_codec` frame format and exclusively owns its file handle.
//! - [`MemoryStore`] keeps records in a FIFO queue with no persistence.
//! - [`SplitFileStore`] is a write-only store that rotates over multiple
//!   shard files; shards are read back individually with [`FileStore`].
//!
//! Backends provide no internal locking and must not be shared across
//! concurrent producers or consumers.

mod error;
mod file;
mod memory;
mod split;
mod store;

pub use error::{StoreError, StoreResult};
pub use file::FileStore;
pub use memory::MemoryStore;
pub use split::SplitFileStore;
pub use store::Datastore;
