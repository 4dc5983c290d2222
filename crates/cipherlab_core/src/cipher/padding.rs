//! PKCS#7-style padding with a configurable block unit.
//!
//! Padding is applied before encryption and removed after decryption for
//! every method, stream ciphers included; the pad unit is the engine's
//! configured block size, which is independent of the underlying cipher's
//! own block length.

use crate::error::{CoreError, CoreResult};

/// Pads `data` up to a multiple of `unit` bytes.
///
/// Always adds at least one byte: input already on a boundary gains a full
/// extra block. Each padding byte holds the padding length, so `unit` must
/// be at most 255 (enforced at engine construction).
pub(crate) fn pad(data: &[u8], unit: usize) -> Vec<u8> {
    let pad_len = unit - data.len() % unit;
    let mut padded = Vec::with_capacity(data.len() + pad_len);
    padded.extend_from_slice(data);
    padded.resize(data.len() + pad_len, pad_len as u8);
    padded
}

/// Removes the padding added by [`pad`].
///
/// # Errors
///
/// Returns [`CoreError::InvalidPadding`] if the data is empty, is not a
/// multiple of `unit`, declares a padding length outside `1..=unit`, or
/// carries padding bytes that disagree with the declared length.
pub(crate) fn unpad(data: &[u8], unit: usize) -> CoreResult<Vec<u8>> {
    if data.is_empty() || data.len() % unit != 0 {
        return Err(CoreError::invalid_padding(format!(
            "data length {} is not a positive multiple of the {unit}-byte block",
            data.len()
        )));
    }

    let pad_len = data[data.len() - 1] as usize;
    if pad_len == 0 || pad_len > unit {
        return Err(CoreError::invalid_padding(format!(
            "declared padding length {pad_len} is outside 1..={unit}"
        )));
    }

    let body_len = data.len() - pad_len;
    if data[body_len..].iter().any(|&b| b as usize != pad_len) {
        return Err(CoreError::invalid_padding(
            "padding bytes disagree with declared length",
        ));
    }

    Ok(data[..body_len].to_vec())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn pad_fills_to_boundary() {
        let padded = pad(&[1, 2, 3], 8);
        assert_eq!(padded, vec![1, 2, 3, 5, 5, 5, 5, 5]);
    }

    #[test]
    fn aligned_input_gains_a_full_block() {
        let padded = pad(&[9; 8], 8);
        assert_eq!(padded.len(), 16);
        assert_eq!(&padded[8..], &[8; 8]);
    }

    #[test]
    fn empty_input_pads_to_one_block() {
        let padded = pad(&[], 4);
        assert_eq!(padded, vec![4, 4, 4, 4]);
    }

    #[test]
    fn roundtrip() {
        for len in [0usize, 1, 7, 8, 9, 100] {
            let data = vec![0xAB; len];
            let unpadded = unpad(&pad(&data, 8), 8).unwrap();
            assert_eq!(unpadded, data, "pad/unpad must roundtrip at length {len}");
        }
    }

    #[test]
    fn unpad_rejects_empty() {
        assert!(matches!(
            unpad(&[], 8),
            Err(CoreError::InvalidPadding { .. })
        ));
    }

    #[test]
    fn unpad_rejects_misaligned_length() {
        assert!(matches!(
            unpad(&[1, 2, 3], 8),
            Err(CoreError::InvalidPadding { .. })
        ));
    }

    #[test]
    fn unpad_rejects_bad_declared_length() {
        // Declared padding of 0 and of more than a block.
        assert!(unpad(&[1, 1, 1, 0], 4).is_err());
        assert!(unpad(&[1, 1, 1, 5], 4).is_err());
    }

    #[test]
    fn unpad_rejects_inconsistent_bytes() {
        assert!(unpad(&[1, 1, 2, 3], 4).is_err());
    }
}
