//! # Cipherlab Codec
//!
//! Schema-ordered binary record encoding and decoding for cipherlab.
//!
//! A record is a mapping from field name to a binary or text payload. A
//! schema is a fixed, ordered list of unique field names that governs the
//! wire encoding: for every field in schema order the encoder writes a
//! 4-byte little-endian length followed by that many bytes. A length of
//! zero means the field is absent and carries no data bytes.
//!
//! On top of the field encoding sits an outer frame: a 4-byte little-endian
//! total length followed by the encoded payload. The frame helpers
//! distinguish a clean end-of-stream (zero bytes where a header was
//! expected, reported as `Ok(None)`) from corruption (a partial header or a
//! short payload, reported as [`CodecError::Corrupted`]).
//!
//! All length fields are little-endian. The byte order is fixed here once
//! and never mixed within one file.
//!
//! ## Usage
//!
//! ```
//! use cipherlab_codec::{decode_record, encode_record, Record, Schema};
//!
//! let schema = Schema::new(vec!["label".into(), "payload".into()]).unwrap();
//!
//! let mut record = Record::new();
//! record.set_text("label", "sample");
//! record.set_bytes("payload", vec![1, 2, 3]);
//!
//! let bytes = encode_record(&record, &schema).unwrap();
//! let decoded = decode_record(&bytes, &schema).unwrap();
//! assert_eq!(decoded.get("label").unwrap().as_bytes(), b"sample");
//! ```

mod decoder;
mod encoder;
mod error;
mod record;
mod schema;

pub use decoder::{check_frame_payload, decode_record, parse_frame_len};
pub use encoder::{encode_record, frame_record};
pub use error::{CodecError, CodecResult};
pub use record::{FieldValue, Record};
pub use schema::Schema;

/// Maximum encoded size of a single record payload, in bytes.
pub const MAX_RECORD_SIZE: usize = 1024 * 1024;

/// Size of every length field on the wire, in bytes.
pub const LEN_FIELD_SIZE: usize = 4;

#[cfg(test)]
mod tests {
    use super::*;

    fn schema() -> Schema {
        Schema::new(vec!["a".into(), "b".into(), "c".into()]).unwrap()
    }

    #[test]
    fn roundtrip_mixed_fields() {
        let mut record = Record::new();
        record.set_bytes("a", vec![0xCA, 0xFE]);
        record.set_text("b", "hello");

        let bytes = encode_record(&record, &schema()).unwrap();
        let decoded = decode_record(&bytes, &schema()).unwrap();

        assert_eq!(decoded.get("a").unwrap().as_bytes(), &[0xCA, 0xFE]);
        assert_eq!(decoded.get("b").unwrap().as_bytes(), b"hello");
        assert!(decoded.get("c").is_none());
    }

    #[test]
    fn roundtrip_all_absent() {
        let record = Record::new();
        let bytes = encode_record(&record, &schema()).unwrap();
        // Three zero-length headers, nothing else.
        assert_eq!(bytes.len(), 3 * LEN_FIELD_SIZE);

        let decoded = decode_record(&bytes, &schema()).unwrap();
        assert!(decoded.is_empty());
    }

    #[test]
    fn fields_outside_schema_are_not_encoded() {
        let mut record = Record::new();
        record.set_bytes("not_in_schema", vec![1, 2, 3]);

        let bytes = encode_record(&record, &schema()).unwrap();
        let decoded = decode_record(&bytes, &schema()).unwrap();
        assert!(decoded.is_empty());
    }
}
