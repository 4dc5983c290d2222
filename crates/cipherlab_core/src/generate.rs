//! Randomized dataset generation.

use cipherlab_codec::Record;
use cipherlab_storage::Datastore;
use tracing::{debug, info};

use crate::error::{CoreError, CoreResult};
use crate::fields;
use crate::pool::{CipherPool, CipherSelection, SourcePool};

/// Generates labeled records by pairing random plaintexts with random
/// cipher configurations and writing the results to a datastore.
///
/// Each record draws its plaintext source and its cipher slot in two
/// independent uniform picks, so every `(source, cipher)` combination
/// appears with equal probability. For encrypted records the key is read
/// off the engine before encrypting, since rotating engines discard it
/// immediately afterwards.
pub struct DatasetGenerator<S: Datastore> {
    store: S,
    ciphers: CipherPool,
    sources: SourcePool,
}

impl<S: Datastore> DatasetGenerator<S> {
    /// Creates a generator writing to `store`.
    ///
    /// # Errors
    ///
    /// Returns [`CoreError::Configuration`] when either pool is empty or
    /// the store's schema is missing one of the dataset fields.
    pub fn new(store: S, ciphers: CipherPool, sources: SourcePool) -> CoreResult<Self> {
        if ciphers.is_empty() {
            return Err(CoreError::configuration("cipher pool is empty"));
        }
        if sources.is_empty() {
            return Err(CoreError::configuration("source pool is empty"));
        }
        for field in fields::ALL_FIELDS {
            if !store.schema().contains(field) {
                return Err(CoreError::configuration(format!(
                    "store schema is missing the {field} field"
                )));
            }
        }
        Ok(Self {
            store,
            ciphers,
            sources,
        })
    }

    /// Generates `count` records.
    ///
    /// # Errors
    ///
    /// Propagates cipher and storage errors; records written before the
    /// failure stay written.
    pub fn generate(&mut self, count: u64) -> CoreResult<u64> {
        info!(records = count, "generating dataset");
        for written in 0..count {
            let record = self.next_record()?;
            self.store.write_record(&record)?;
            if written % 100 == 0 {
                debug!(written, "generation progress");
            }
        }
        info!(records = count, "dataset generation finished");
        Ok(count)
    }

    fn next_record(&mut self) -> CoreResult<Record> {
        let source = self.sources.pick_mut()?;
        let plaintext_type = source.type_label();
        let plaintext = source.generate();

        let mut record = Record::new();
        record.set_text(fields::PLAINTEXT_TYPE, plaintext_type);

        match self.ciphers.pick_mut()? {
            CipherSelection::Cipher(engine) => {
                let key = engine.key()?.as_bytes().to_vec();
                let out = engine.encrypt(&plaintext)?;

                record.set_text(fields::ENCRYPTION_METHOD, engine.method().label());
                record.set_text(fields::BLOCK_MODE, engine.mode().label());
                record.set_bytes(fields::ENCRYPTION_KEY, key);
                if let Some(nonce) = out.nonce {
                    record.set_bytes(fields::NONCE, nonce);
                }
                if let Some(iv) = out.iv {
                    record.set_bytes(fields::IV, iv);
                }
                record.set_bytes(fields::CIPHERTEXT, out.ciphertext);
            }
            CipherSelection::Passthrough => {
                record.set_text(fields::ENCRYPTION_METHOD, fields::PASSTHROUGH_LABEL);
                record.set_text(fields::BLOCK_MODE, fields::PASSTHROUGH_LABEL);
                record.set_bytes(fields::CIPHERTEXT, plaintext.clone());
            }
        }

        record.set_bytes(fields::PLAINTEXT, plaintext);
        Ok(record)
    }

    /// Returns the datastore the generator writes to.
    pub fn store_mut(&mut self) -> &mut S {
        &mut self.store
    }

    /// Consumes the generator and returns the datastore, so the caller
    /// can flush or close it.
    pub fn into_store(self) -> S {
        self.store
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use cipherlab_storage::MemoryStore;

    use crate::cipher::{BlockMode, CipherConfig, CipherMethod, KeyMaterial};
    use crate::plaintext::{BinarySource, DictionarySource, SizeBounds};

    fn test_sources() -> SourcePool {
        let bounds = SizeBounds::new(20, 50).unwrap();
        let mut sources = SourcePool::new();
        sources.add(Box::new(BinarySource::new(bounds))).unwrap();
        sources
            .add(Box::new(
                DictionarySource::from_words(
                    vec!["lorem".to_string(), "ipsum".to_string()],
                    bounds,
                )
                .unwrap(),
            ))
            .unwrap();
        sources
    }

    fn field_text(record: &Record, name: &str) -> String {
        String::from_utf8(record.get(name).unwrap().as_bytes().to_vec()).unwrap()
    }

    #[test]
    fn generates_the_requested_number_of_records() {
        let store = MemoryStore::new(fields::dataset_schema());
        let mut generator =
            DatasetGenerator::new(store, CipherPool::all().unwrap(), test_sources()).unwrap();
        assert_eq!(generator.generate(25).unwrap(), 25);
        assert_eq!(generator.into_store().pending_count(), 25);
    }

    #[test]
    fn encrypted_records_carry_decryptable_material() {
        let store = MemoryStore::new(fields::dataset_schema());
        let mut generator =
            DatasetGenerator::new(store, CipherPool::all().unwrap(), test_sources()).unwrap();
        generator.generate(40).unwrap();

        let mut store = generator.into_store();
        while let Some(record) = store.read_next_record().unwrap() {
            let method_label = field_text(&record, fields::ENCRYPTION_METHOD);
            let mode_label = field_text(&record, fields::BLOCK_MODE);
            let method = parse_method(&method_label);
            let mode = parse_mode(&mode_label);

            let key = record.get(fields::ENCRYPTION_KEY).unwrap().as_bytes();
            let ciphertext = record.get(fields::CIPHERTEXT).unwrap().as_bytes();
            let plaintext = record.get(fields::PLAINTEXT).unwrap().as_bytes();
            let nonce = record.get(fields::NONCE).map(|v| v.as_bytes().to_vec());
            let iv = record.get(fields::IV).map(|v| v.as_bytes().to_vec());

            let engine = CipherConfig::new(method, mode)
                .fixed_key(KeyMaterial::from_bytes(key.to_vec()))
                .build()
                .unwrap();
            let recovered = engine
                .decrypt(ciphertext, nonce.as_deref(), iv.as_deref())
                .unwrap();
            assert_eq!(recovered, plaintext);
        }
    }

    #[test]
    fn passthrough_records_copy_the_plaintext() {
        let store = MemoryStore::new(fields::dataset_schema());
        let ciphers = CipherPool::new().with_passthrough().unwrap();
        let mut generator = DatasetGenerator::new(store, ciphers, test_sources()).unwrap();
        generator.generate(10).unwrap();

        let mut store = generator.into_store();
        while let Some(record) = store.read_next_record().unwrap() {
            assert_eq!(field_text(&record, fields::ENCRYPTION_METHOD), "NONE");
            assert_eq!(field_text(&record, fields::BLOCK_MODE), "NONE");
            assert_eq!(
                record.get(fields::CIPHERTEXT).unwrap().as_bytes(),
                record.get(fields::PLAINTEXT).unwrap().as_bytes()
            );
            assert!(record.get(fields::ENCRYPTION_KEY).is_none());
            assert!(record.get(fields::NONCE).is_none());
            assert!(record.get(fields::IV).is_none());
        }
    }

    #[test]
    fn plaintext_type_labels_are_recognized() {
        let store = MemoryStore::new(fields::dataset_schema());
        let mut generator =
            DatasetGenerator::new(store, CipherPool::ecb_only().unwrap(), test_sources())
                .unwrap();
        generator.generate(30).unwrap();

        let mut store = generator.into_store();
        while let Some(record) = store.read_next_record().unwrap() {
            let label = field_text(&record, fields::PLAINTEXT_TYPE);
            assert!(label == "binary" || label == "dict", "unexpected {label}");
        }
    }

    #[test]
    fn empty_pools_are_rejected() {
        let store = MemoryStore::new(fields::dataset_schema());
        let result = DatasetGenerator::new(store, CipherPool::new(), test_sources());
        assert!(result.is_err());

        let store = MemoryStore::new(fields::dataset_schema());
        let result =
            DatasetGenerator::new(store, CipherPool::all().unwrap(), SourcePool::new());
        assert!(result.is_err());
    }

    #[test]
    fn incomplete_schema_is_rejected() {
        let schema =
            cipherlab_codec::Schema::new(vec!["plaintext".to_string()]).unwrap();
        let store = MemoryStore::new(schema);
        let result =
            DatasetGenerator::new(store, CipherPool::all().unwrap(), test_sources());
        assert!(matches!(result, Err(CoreError::Configuration { .. })));
    }

    fn parse_method(label: &str) -> CipherMethod {
        match label {
            "AES" => CipherMethod::Aes,
            "DES3" => CipherMethod::Des3,
            "DES" => CipherMethod::Des,
            "SHIFT" => CipherMethod::Shift,
            "XOR" => CipherMethod::Xor,
            other => panic!("unknown method label {other}"),
        }
    }

    fn parse_mode(label: &str) -> BlockMode {
        match label {
            "ECB" => BlockMode::Ecb,
            "CBC" => BlockMode::Cbc,
            "CFB" => BlockMode::Cfb,
            "OFB" => BlockMode::Ofb,
            "CTR" => BlockMode::Ctr,
            other => panic!("unknown mode label {other}"),
        }
    }
}
