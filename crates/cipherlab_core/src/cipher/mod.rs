//! Cipher engine unifying block and stream ciphers behind one interface.
//!
//! Block ciphers (AES-256, triple DES, single DES) run in the classic
//! modes of operation; the toy stream ciphers ([`shift`](CipherMethod::Shift)
//! and [`xor`](CipherMethod::Xor)) only make sense in ECB. All methods pad
//! the plaintext to the engine's pad unit before encrypting, so ciphertext
//! length never reveals the exact plaintext length.

mod engine;
mod key;
mod padding;
mod stream;

pub use engine::{CipherConfig, CipherEngine, EncryptionOutput};
pub use key::KeyMaterial;

/// Default pad unit in bytes. A multiple of every supported cipher block
/// length, so it is valid for all methods out of the box.
pub const DEFAULT_PAD_UNIT: usize = 32;

/// Cipher algorithm selector.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CipherMethod {
    /// AES-256.
    Aes,
    /// Triple DES (EDE, three-key).
    Des3,
    /// Single DES. Cryptographically broken; useful here precisely
    /// because models should learn to spot it.
    Des,
    /// Bytewise additive cipher with a cyclic key.
    Shift,
    /// Bytewise XOR cipher with a cyclic key.
    Xor,
}

impl CipherMethod {
    /// Stable label written into dataset records.
    #[must_use]
    pub fn label(self) -> &'static str {
        match self {
            Self::Aes => "AES",
            Self::Des3 => "DES3",
            Self::Des => "DES",
            Self::Shift => "SHIFT",
            Self::Xor => "XOR",
        }
    }

    /// Required key length in bytes for block methods; the default key
    /// length for stream methods.
    #[must_use]
    pub fn default_key_len(self) -> usize {
        match self {
            Self::Aes => 32,
            Self::Des3 => 24,
            Self::Des | Self::Shift | Self::Xor => 8,
        }
    }

    /// Cipher block length in bytes, or `None` for stream methods.
    #[must_use]
    pub fn block_len(self) -> Option<usize> {
        match self {
            Self::Aes => Some(16),
            Self::Des3 | Self::Des => Some(8),
            Self::Shift | Self::Xor => None,
        }
    }

    /// Returns `true` for the bytewise stream methods.
    #[must_use]
    pub fn is_stream(self) -> bool {
        matches!(self, Self::Shift | Self::Xor)
    }
}

/// Block mode of operation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum BlockMode {
    /// Electronic codebook. The only mode stream methods accept.
    Ecb,
    /// Cipher block chaining, random IV per encryption.
    Cbc,
    /// Cipher feedback, random IV per encryption.
    Cfb,
    /// Output feedback, random IV per encryption.
    Ofb,
    /// Counter mode, random half-block nonce with a zero initial counter.
    Ctr,
}

impl BlockMode {
    /// Stable label written into dataset records.
    #[must_use]
    pub fn label(self) -> &'static str {
        match self {
            Self::Ecb => "ECB",
            Self::Cbc => "CBC",
            Self::Cfb => "CFB",
            Self::Ofb => "OFB",
            Self::Ctr => "CTR",
        }
    }

    /// Returns `true` if this mode consumes a full-block IV.
    #[must_use]
    pub fn needs_iv(self) -> bool {
        matches!(self, Self::Cbc | Self::Cfb | Self::Ofb)
    }

    /// Returns `true` if this mode consumes a half-block nonce.
    #[must_use]
    pub fn needs_nonce(self) -> bool {
        matches!(self, Self::Ctr)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn method_labels_are_stable() {
        assert_eq!(CipherMethod::Aes.label(), "AES");
        assert_eq!(CipherMethod::Des3.label(), "DES3");
        assert_eq!(CipherMethod::Des.label(), "DES");
        assert_eq!(CipherMethod::Shift.label(), "SHIFT");
        assert_eq!(CipherMethod::Xor.label(), "XOR");
    }

    #[test]
    fn block_lengths() {
        assert_eq!(CipherMethod::Aes.block_len(), Some(16));
        assert_eq!(CipherMethod::Des3.block_len(), Some(8));
        assert_eq!(CipherMethod::Des.block_len(), Some(8));
        assert_eq!(CipherMethod::Shift.block_len(), None);
        assert_eq!(CipherMethod::Xor.block_len(), None);
    }

    #[test]
    fn default_pad_unit_covers_all_block_lengths() {
        for method in [CipherMethod::Aes, CipherMethod::Des3, CipherMethod::Des] {
            let block = method.block_len().unwrap();
            assert_eq!(DEFAULT_PAD_UNIT % block, 0);
        }
    }
}
