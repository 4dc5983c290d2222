//! End-to-end dataset flow: generate records into shard files, index them
//! as mini-batches and verify every ciphertext decrypts back to its
//! stored plaintext.

use cipherlab_core::fields;
use cipherlab_core::plaintext::{BinarySource, DictionarySource, SizeBounds};
use cipherlab_core::{
    BatchSource, BlockMode, CipherConfig, CipherMethod, CipherPool, DatasetGenerator,
    KeyMaterial, ShardBatchSource, SourcePool,
};
use cipherlab_codec::Record;
use cipherlab_storage::SplitFileStore;

fn sources() -> SourcePool {
    let bounds = SizeBounds::new(50, 200).unwrap();
    let mut pool = SourcePool::new();
    pool.add(Box::new(BinarySource::new(bounds))).unwrap();
    pool.add(Box::new(
        DictionarySource::from_words(
            vec![
                "cipher".to_string(),
                "block".to_string(),
                "stream".to_string(),
                "training".to_string(),
            ],
            bounds,
        )
        .unwrap(),
    ))
    .unwrap();
    pool
}

fn method_from_label(label: &str) -> CipherMethod {
    match label {
        "AES" => CipherMethod::Aes,
        "DES3" => CipherMethod::Des3,
        "DES" => CipherMethod::Des,
        "SHIFT" => CipherMethod::Shift,
        "XOR" => CipherMethod::Xor,
        other => panic!("unknown method label {other}"),
    }
}

fn mode_from_label(label: &str) -> BlockMode {
    match label {
        "ECB" => BlockMode::Ecb,
        "CBC" => BlockMode::Cbc,
        "CFB" => BlockMode::Cfb,
        "OFB" => BlockMode::Ofb,
        "CTR" => BlockMode::Ctr,
        other => panic!("unknown mode label {other}"),
    }
}

fn text_field(record: &Record, name: &str) -> String {
    String::from_utf8(record.get(name).unwrap().as_bytes().to_vec()).unwrap()
}

fn verify_record(record: &Record) {
    let plaintext_type = text_field(record, fields::PLAINTEXT_TYPE);
    assert!(plaintext_type == "binary" || plaintext_type == "dict");

    let plaintext = record.get(fields::PLAINTEXT).unwrap().as_bytes();
    let ciphertext = record.get(fields::CIPHERTEXT).unwrap().as_bytes();

    let method_label = text_field(record, fields::ENCRYPTION_METHOD);
    if method_label == "NONE" {
        assert_eq!(text_field(record, fields::BLOCK_MODE), "NONE");
        assert_eq!(ciphertext, plaintext);
        assert!(record.get(fields::ENCRYPTION_KEY).is_none());
        return;
    }

    let method = method_from_label(&method_label);
    let mode = mode_from_label(&text_field(record, fields::BLOCK_MODE));
    let key = record.get(fields::ENCRYPTION_KEY).unwrap().as_bytes();
    let nonce = record.get(fields::NONCE).map(|v| v.as_bytes().to_vec());
    let iv = record.get(fields::IV).map(|v| v.as_bytes().to_vec());

    let engine = CipherConfig::new(method, mode)
        .fixed_key(KeyMaterial::from_bytes(key.to_vec()))
        .build()
        .unwrap();
    let recovered = engine
        .decrypt(ciphertext, nonce.as_deref(), iv.as_deref())
        .unwrap();
    assert_eq!(recovered, plaintext, "{method_label} record must roundtrip");
}

#[test]
fn sharded_dataset_roundtrips_through_batches() {
    let dir = tempfile::tempdir().unwrap();

    let store =
        SplitFileStore::new(fields::dataset_schema(), 6, dir.path(), "train_", ".bin").unwrap();
    let ciphers = CipherPool::all().unwrap().with_passthrough().unwrap();
    let mut generator = DatasetGenerator::new(store, ciphers, sources()).unwrap();
    generator.generate(20).unwrap();

    let mut store = generator.into_store();
    assert_eq!(store.records_written(), 20);
    store.close().unwrap();

    let mut batches =
        ShardBatchSource::new(fields::dataset_schema(), dir.path(), "train_", ".bin").unwrap();
    // 20 records over shards of 6: four files.
    assert_eq!(batches.batch_count(), 4);

    let mut total = 0;
    for index in 0..batches.batch_count() {
        let records = batches.load_batch(index).unwrap();
        assert!(!records.is_empty());
        total += records.len();
        for record in &records {
            verify_record(record);
        }
    }
    assert_eq!(total, 20);
}
