//! Record decoding and frame classification.

use crate::error::{CodecError, CodecResult};
use crate::record::Record;
use crate::schema::Schema;
use crate::{LEN_FIELD_SIZE, MAX_RECORD_SIZE};

/// Classifies the bytes read where a frame header was expected.
///
/// Returns `Ok(None)` when `bytes` is empty: a clean end-of-stream, which is
/// a distinct non-error signal. Returns the payload length when a full
/// 4-byte little-endian header is present.
///
/// # Errors
///
/// Returns [`CodecError::Corrupted`] when the header is present but
/// truncated (1 to 3 bytes), or when the declared length exceeds
/// [`MAX_RECORD_SIZE`].
pub fn parse_frame_len(bytes: &[u8]) -> CodecResult<Option<usize>> {
    if bytes.is_empty() {
        return Ok(None);
    }

    if bytes.len() < LEN_FIELD_SIZE {
        return Err(CodecError::corrupted(format!(
            "truncated record header: expected {} bytes, got {}",
            LEN_FIELD_SIZE,
            bytes.len()
        )));
    }

    let len = u32::from_le_bytes([bytes[0], bytes[1], bytes[2], bytes[3]]) as usize;
    if len > MAX_RECORD_SIZE {
        return Err(CodecError::corrupted(format!(
            "record length {len} exceeds maximum of {MAX_RECORD_SIZE}"
        )));
    }

    Ok(Some(len))
}

/// Verifies that a frame payload was read in full.
///
/// # Errors
///
/// Returns [`CodecError::Corrupted`] when fewer than `expected` bytes were
/// available, i.e. the stream ended mid-record.
pub fn check_frame_payload(payload: &[u8], expected: usize) -> CodecResult<()> {
    if payload.len() != expected {
        return Err(CodecError::corrupted(format!(
            "unexpected end-of-stream: expected record of {} bytes, got {}",
            expected,
            payload.len()
        )));
    }
    Ok(())
}

/// Decodes a schema-ordered binary payload into a record.
///
/// Fields with a zero length are omitted from the result. All decoded
/// values are binary; the wire format carries no type information.
///
/// # Errors
///
/// Returns [`CodecError::Corrupted`] if a field header or field payload is
/// truncated, or if trailing bytes remain after the last schema field.
pub fn decode_record(bytes: &[u8], schema: &Schema) -> CodecResult<Record> {
    let mut record = Record::new();
    let mut cursor = 0usize;

    for field in schema.fields() {
        if cursor + LEN_FIELD_SIZE > bytes.len() {
            return Err(CodecError::corrupted(format!(
                "truncated length header for field '{field}'"
            )));
        }

        let len = u32::from_le_bytes([
            bytes[cursor],
            bytes[cursor + 1],
            bytes[cursor + 2],
            bytes[cursor + 3],
        ]) as usize;
        cursor += LEN_FIELD_SIZE;

        if len > 0 {
            if cursor + len > bytes.len() {
                return Err(CodecError::corrupted(format!(
                    "truncated data for field '{field}': expected {len} bytes, got {}",
                    bytes.len() - cursor
                )));
            }
            record.set_bytes(field, bytes[cursor..cursor + len].to_vec());
            cursor += len;
        }
    }

    if cursor != bytes.len() {
        return Err(CodecError::corrupted(format!(
            "trailing bytes after last field: expected {} bytes, got {}",
            cursor,
            bytes.len()
        )));
    }

    Ok(record)
}
