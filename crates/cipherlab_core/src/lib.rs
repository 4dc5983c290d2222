//! Randomized generation of labeled cryptanalysis training datasets.
//!
//! This crate ties the record codec and storage backends together with a
//! cipher engine: plaintexts drawn from configurable sources are encrypted
//! under randomly selected ciphers and written out as labeled records,
//! each carrying the plaintext, ciphertext, key material and the labels a
//! model is trained to predict.
//!
//! # Example
//!
//! ```
//! use cipherlab_core::fields::dataset_schema;
//! use cipherlab_core::plaintext::{BinarySource, SizeBounds};
//! use cipherlab_core::{CipherPool, DatasetGenerator, SourcePool};
//! use cipherlab_storage::MemoryStore;
//!
//! let mut sources = SourcePool::new();
//! sources.add(Box::new(BinarySource::new(SizeBounds::new(100, 300)?)))?;
//!
//! let store = MemoryStore::new(dataset_schema());
//! let mut generator = DatasetGenerator::new(store, CipherPool::all()?, sources)?;
//! generator.generate(10)?;
//! assert_eq!(generator.into_store().pending_count(), 10);
//! # Ok::<(), cipherlab_core::CoreError>(())
//! ```

pub mod batch;
pub mod cipher;
mod error;
pub mod fields;
mod generate;
pub mod plaintext;
mod pool;

pub use batch::{BatchSource, OnlineBatchSource, ShardBatchSource};
pub use cipher::{BlockMode, CipherConfig, CipherEngine, CipherMethod, EncryptionOutput, KeyMaterial};
pub use error::{CoreError, CoreResult};
pub use generate::DatasetGenerator;
pub use pool::{CipherPool, CipherSelection, SourcePool};
