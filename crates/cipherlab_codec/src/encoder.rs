//! Record encoding.

use crate::error::{CodecError, CodecResult};
use crate::record::Record;
use crate::schema::Schema;
use crate::{LEN_FIELD_SIZE, MAX_RECORD_SIZE};

/// Encodes a record to its schema-ordered binary payload.
///
/// For each field in schema order, writes a 4-byte little-endian length
/// followed by the payload bytes. Absent fields are written as a zero
/// length with no trailing bytes. Text values are encoded as UTF-8.
///
/// # Errors
///
/// Returns [`CodecError::RecordTooLarge`] if the encoded payload would
/// exceed [`MAX_RECORD_SIZE`]. Oversized records fail fast instead of being
/// silently truncated.
pub fn encode_record(record: &Record, schema: &Schema) -> CodecResult<Vec<u8>> {
    let mut buf = Vec::new();

    for field in schema.fields() {
        match record.get(field) {
            Some(value) => {
                let data = value.as_bytes();
                // Field lengths are u32 on the wire; the record-level size
                // check below also bounds every individual field.
                let len = u32::try_from(data.len()).map_err(|_| CodecError::RecordTooLarge {
                    size: data.len(),
                    max: MAX_RECORD_SIZE,
                })?;
                buf.extend_from_slice(&len.to_le_bytes());
                buf.extend_from_slice(data);
            }
            None => {
                buf.extend_from_slice(&0u32.to_le_bytes());
            }
        }
    }

    if buf.len() > MAX_RECORD_SIZE {
        return Err(CodecError::RecordTooLarge {
            size: buf.len(),
            max: MAX_RECORD_SIZE,
        });
    }

    Ok(buf)
}

/// Wraps an encoded payload in the outer write frame.
///
/// The frame is a 4-byte little-endian total length followed by the payload.
#[must_use]
pub fn frame_record(payload: &[u8]) -> Vec<u8> {
    let mut framed = Vec::with_capacity(LEN_FIELD_SIZE + payload.len());
    // Safe cast: encode_record bounds payloads well below u32::MAX.
    framed.extend_from_slice(&(payload.len() as u32).to_le_bytes());
    framed.extend_from_slice(payload);
    framed
}
