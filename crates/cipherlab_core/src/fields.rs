//! Field names and canonical schema for generated dataset records.

use cipherlab_codec::Schema;

/// Label naming the plaintext source that produced the record.
pub const PLAINTEXT_TYPE: &str = "plaintext_type";
/// The raw generated plaintext.
pub const PLAINTEXT: &str = "plaintext";
/// Label of the cipher method used.
pub const ENCRYPTION_METHOD: &str = "encryption_method";
/// Label of the block mode used.
pub const BLOCK_MODE: &str = "block_mode";
/// The key used for this record's encryption, captured before rotation.
pub const ENCRYPTION_KEY: &str = "encryption_key";
/// Nonce returned by the cipher, when the mode needed one.
pub const NONCE: &str = "nonce";
/// Initialization vector returned by the cipher, when the mode needed one.
pub const IV: &str = "iv";
/// The encryption output (equal to the plaintext for passthrough records).
pub const CIPHERTEXT: &str = "ciphertext";

/// Plaintext-type label for the binary source.
pub const PLAINTEXT_TYPE_BINARY: &str = "binary";
/// Plaintext-type label for the dictionary source.
pub const PLAINTEXT_TYPE_DICT: &str = "dict";

/// Method and mode label written for passthrough (unencrypted) records.
pub const PASSTHROUGH_LABEL: &str = "NONE";

/// All dataset field names in canonical serialization order.
pub const ALL_FIELDS: [&str; 8] = [
    PLAINTEXT_TYPE,
    PLAINTEXT,
    ENCRYPTION_METHOD,
    BLOCK_MODE,
    ENCRYPTION_KEY,
    NONCE,
    IV,
    CIPHERTEXT,
];

/// Returns the canonical schema for generated dataset records.
#[must_use]
pub fn dataset_schema() -> Schema {
    // The field constants are unique by construction.
    Schema::new(ALL_FIELDS.iter().map(|f| (*f).to_string()).collect())
        .expect("canonical field names are unique and non-empty")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn canonical_schema_order() {
        let schema = dataset_schema();
        let fields: Vec<_> = schema.fields().collect();
        assert_eq!(
            fields,
            vec![
                "plaintext_type",
                "plaintext",
                "encryption_method",
                "block_mode",
                "encryption_key",
                "nonce",
                "iv",
                "ciphertext",
            ]
        );
    }
}
