//! Byte-oriented toy stream ciphers.
//!
//! These exist to give datasets weak, easily-learned ciphers alongside the
//! real block ciphers. Both operate bytewise with a cyclically repeated
//! key, so key length is configurable and has no alignment requirement.

/// Adds each key byte to the corresponding data byte, wrapping on overflow.
pub(crate) fn shift_encrypt(key: &[u8], buf: &mut [u8]) {
    for (b, k) in buf.iter_mut().zip(key.iter().cycle()) {
        *b = b.wrapping_add(*k);
    }
}

/// Inverse of [`shift_encrypt`].
pub(crate) fn shift_decrypt(key: &[u8], buf: &mut [u8]) {
    for (b, k) in buf.iter_mut().zip(key.iter().cycle()) {
        *b = b.wrapping_sub(*k);
    }
}

/// XORs each data byte with the cyclically repeated key. Self-inverse.
pub(crate) fn xor_apply(key: &[u8], buf: &mut [u8]) {
    for (b, k) in buf.iter_mut().zip(key.iter().cycle()) {
        *b ^= *k;
    }
}
