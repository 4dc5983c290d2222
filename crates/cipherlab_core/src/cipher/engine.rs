//! The cipher engine: configuration, key rotation and the mode dispatch.

use cipher::generic_array::GenericArray;
use cipher::{
    AsyncStreamCipher, BlockDecryptMut, BlockEncryptMut, KeyInit, KeyIvInit, StreamCipher,
};

use aes::Aes256;
use ctr::{Ctr32BE, Ctr64BE};
use des::{Des, TdesEde3};
use rand::RngCore;
use tracing::debug;

use super::{padding, stream, BlockMode, CipherMethod, KeyMaterial, DEFAULT_PAD_UNIT};
use crate::error::{CoreError, CoreResult};

/// Result of a single encryption.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EncryptionOutput {
    /// The ciphertext. Its length is always the padded plaintext length.
    pub ciphertext: Vec<u8>,
    /// Random nonce drawn for this encryption, present only in CTR mode.
    pub nonce: Option<Vec<u8>>,
    /// Random IV drawn for this encryption, present in CBC, CFB and OFB.
    pub iv: Option<Vec<u8>>,
}

/// Builder for [`CipherEngine`].
///
/// ```
/// use cipherlab_core::cipher::{BlockMode, CipherConfig, CipherMethod};
///
/// let mut engine = CipherConfig::new(CipherMethod::Aes, BlockMode::Cbc).build()?;
/// let out = engine.encrypt(b"hello")?;
/// assert!(out.iv.is_some());
/// # Ok::<(), cipherlab_core::CoreError>(())
/// ```
#[derive(Debug)]
pub struct CipherConfig {
    method: CipherMethod,
    mode: BlockMode,
    fixed_key: Option<KeyMaterial>,
    key_len: Option<usize>,
    pad_unit: usize,
}

impl CipherConfig {
    /// Starts a configuration for the given method and mode.
    #[must_use]
    pub fn new(method: CipherMethod, mode: BlockMode) -> Self {
        Self {
            method,
            mode,
            fixed_key: None,
            key_len: None,
            pad_unit: DEFAULT_PAD_UNIT,
        }
    }

    /// Pins the engine to a caller-supplied key and disables key rotation.
    #[must_use]
    pub fn fixed_key(mut self, key: KeyMaterial) -> Self {
        self.fixed_key = Some(key);
        self
    }

    /// Overrides the key length. Only the stream methods accept a length
    /// other than their default; block methods have fixed key sizes.
    #[must_use]
    pub fn key_len(mut self, len: usize) -> Self {
        self.key_len = Some(len);
        self
    }

    /// Overrides the pad unit (default [`DEFAULT_PAD_UNIT`]).
    #[must_use]
    pub fn pad_unit(mut self, unit: usize) -> Self {
        self.pad_unit = unit;
        self
    }

    /// Validates the configuration and builds the engine.
    ///
    /// # Errors
    ///
    /// Returns [`CoreError::Configuration`] when the pad unit is outside
    /// `1..=255`, a stream method is paired with a mode other than ECB,
    /// a block method's key length is overridden, the pad unit does not
    /// cover the cipher block in ECB or CBC mode, or a fixed key has the
    /// wrong length.
    pub fn build(self) -> CoreResult<CipherEngine> {
        if self.pad_unit == 0 || self.pad_unit > 255 {
            return Err(CoreError::configuration(format!(
                "pad unit {} is outside 1..=255",
                self.pad_unit
            )));
        }

        let key_len = match self.method.block_len() {
            None => {
                if self.mode != BlockMode::Ecb {
                    return Err(CoreError::configuration(format!(
                        "{} is a stream method and only supports ECB, not {}",
                        self.method.label(),
                        self.mode.label()
                    )));
                }
                let len = self.key_len.unwrap_or_else(|| self.method.default_key_len());
                if len == 0 {
                    return Err(CoreError::configuration("key length must be at least 1"));
                }
                len
            }
            Some(block_len) => {
                let default = self.method.default_key_len();
                if let Some(len) = self.key_len {
                    if len != default {
                        return Err(CoreError::configuration(format!(
                            "{} requires a {default}-byte key, got {len}",
                            self.method.label()
                        )));
                    }
                }
                if matches!(self.mode, BlockMode::Ecb | BlockMode::Cbc)
                    && self.pad_unit % block_len != 0
                {
                    return Err(CoreError::configuration(format!(
                        "pad unit {} is not a multiple of the {block_len}-byte {} block",
                        self.pad_unit,
                        self.method.label()
                    )));
                }
                default
            }
        };

        let (key, rotate) = match self.fixed_key {
            Some(key) => {
                if key.len() != key_len {
                    return Err(CoreError::configuration(format!(
                        "fixed key is {} bytes, {} expects {key_len}",
                        key.len(),
                        self.method.label()
                    )));
                }
                (key, false)
            }
            None => (KeyMaterial::random(key_len), true),
        };

        Ok(CipherEngine {
            method: self.method,
            mode: self.mode,
            key: Some(key),
            key_len,
            pad_unit: self.pad_unit,
            rotate,
        })
    }
}

/// A configured cipher ready to encrypt and decrypt.
///
/// Unless a fixed key was configured, the engine draws a fresh random key
/// at construction and again after every encryption. [`CipherEngine::key`]
/// therefore returns the key the *next* encryption will use; callers that
/// record keys alongside ciphertexts must read it before encrypting.
#[derive(Debug)]
pub struct CipherEngine {
    method: CipherMethod,
    mode: BlockMode,
    key: Option<KeyMaterial>,
    key_len: usize,
    pad_unit: usize,
    rotate: bool,
}

impl CipherEngine {
    /// Returns the cipher method.
    #[must_use]
    pub fn method(&self) -> CipherMethod {
        self.method
    }

    /// Returns the block mode.
    #[must_use]
    pub fn mode(&self) -> BlockMode {
        self.mode
    }

    /// Returns the pad unit in bytes.
    #[must_use]
    pub fn pad_unit(&self) -> usize {
        self.pad_unit
    }

    /// Returns the key the next encryption (or decryption) will use.
    ///
    /// # Errors
    ///
    /// Returns [`CoreError::KeyNotSet`] if no key is bound.
    pub fn key(&self) -> CoreResult<&KeyMaterial> {
        self.key.as_ref().ok_or(CoreError::KeyNotSet)
    }

    /// Binds a specific key, e.g. one recorded alongside a stored
    /// ciphertext, for a subsequent [`CipherEngine::decrypt`].
    ///
    /// # Errors
    ///
    /// Returns [`CoreError::Configuration`] if the key length does not
    /// match the engine's key length.
    pub fn set_key(&mut self, key: KeyMaterial) -> CoreResult<()> {
        if key.len() != self.key_len {
            return Err(CoreError::configuration(format!(
                "key is {} bytes, engine expects {}",
                key.len(),
                self.key_len
            )));
        }
        self.key = Some(key);
        Ok(())
    }

    /// Pads and encrypts `plaintext` under the currently bound key, then
    /// rotates the key unless the engine was built with a fixed key.
    ///
    /// # Errors
    ///
    /// Returns [`CoreError::KeyNotSet`] if no key is bound, or
    /// [`CoreError::Configuration`] if the cipher rejects the material.
    pub fn encrypt(&mut self, plaintext: &[u8]) -> CoreResult<EncryptionOutput> {
        let padded = padding::pad(plaintext, self.pad_unit);
        let key = self.key.as_ref().ok_or(CoreError::KeyNotSet)?;

        let out = match self.method {
            CipherMethod::Aes => self.mode_encrypt::<
                ecb::Encryptor<Aes256>,
                cbc::Encryptor<Aes256>,
                cfb_mode::Encryptor<Aes256>,
                ofb::Ofb<Aes256>,
                Ctr64BE<Aes256>,
            >(key.as_bytes(), padded)?,
            CipherMethod::Des3 => self.mode_encrypt::<
                ecb::Encryptor<TdesEde3>,
                cbc::Encryptor<TdesEde3>,
                cfb_mode::Encryptor<TdesEde3>,
                ofb::Ofb<TdesEde3>,
                Ctr32BE<TdesEde3>,
            >(key.as_bytes(), padded)?,
            CipherMethod::Des => self.mode_encrypt::<
                ecb::Encryptor<Des>,
                cbc::Encryptor<Des>,
                cfb_mode::Encryptor<Des>,
                ofb::Ofb<Des>,
                Ctr32BE<Des>,
            >(key.as_bytes(), padded)?,
            CipherMethod::Shift => {
                let mut buf = padded;
                stream::shift_encrypt(key.as_bytes(), &mut buf);
                EncryptionOutput {
                    ciphertext: buf,
                    nonce: None,
                    iv: None,
                }
            }
            CipherMethod::Xor => {
                let mut buf = padded;
                stream::xor_apply(key.as_bytes(), &mut buf);
                EncryptionOutput {
                    ciphertext: buf,
                    nonce: None,
                    iv: None,
                }
            }
        };

        if self.rotate {
            self.key = Some(KeyMaterial::random(self.key_len));
            debug!(method = self.method.label(), "rotated encryption key");
        }
        Ok(out)
    }

    /// Decrypts `ciphertext` under the currently bound key and removes
    /// the padding.
    ///
    /// `nonce` and `iv` must match what the encrypting mode produced:
    /// a half-block nonce for CTR, a full-block IV for CBC, CFB and OFB,
    /// and neither for ECB and the stream methods.
    ///
    /// # Errors
    ///
    /// Returns [`CoreError::Configuration`] when the nonce or IV is
    /// missing, superfluous or the wrong length, [`CoreError::KeyNotSet`]
    /// if no key is bound, and [`CoreError::InvalidPadding`] when the
    /// decrypted bytes do not end in valid padding.
    pub fn decrypt(
        &self,
        ciphertext: &[u8],
        nonce: Option<&[u8]>,
        iv: Option<&[u8]>,
    ) -> CoreResult<Vec<u8>> {
        let key = self.key.as_ref().ok_or(CoreError::KeyNotSet)?;
        self.check_material(nonce, iv)?;

        let mut buf = ciphertext.to_vec();
        match self.method {
            CipherMethod::Aes => self.mode_decrypt::<
                ecb::Decryptor<Aes256>,
                cbc::Decryptor<Aes256>,
                cfb_mode::Decryptor<Aes256>,
                ofb::Ofb<Aes256>,
                Ctr64BE<Aes256>,
            >(key.as_bytes(), &mut buf, nonce, iv)?,
            CipherMethod::Des3 => self.mode_decrypt::<
                ecb::Decryptor<TdesEde3>,
                cbc::Decryptor<TdesEde3>,
                cfb_mode::Decryptor<TdesEde3>,
                ofb::Ofb<TdesEde3>,
                Ctr32BE<TdesEde3>,
            >(key.as_bytes(), &mut buf, nonce, iv)?,
            CipherMethod::Des => self.mode_decrypt::<
                ecb::Decryptor<Des>,
                cbc::Decryptor<Des>,
                cfb_mode::Decryptor<Des>,
                ofb::Ofb<Des>,
                Ctr32BE<Des>,
            >(key.as_bytes(), &mut buf, nonce, iv)?,
            CipherMethod::Shift => stream::shift_decrypt(key.as_bytes(), &mut buf),
            CipherMethod::Xor => stream::xor_apply(key.as_bytes(), &mut buf),
        }
        padding::unpad(&buf, self.pad_unit)
    }

    /// Validates nonce/IV presence and lengths against the method and mode.
    fn check_material(&self, nonce: Option<&[u8]>, iv: Option<&[u8]>) -> CoreResult<()> {
        let Some(block_len) = self.method.block_len() else {
            if nonce.is_some() || iv.is_some() {
                return Err(CoreError::configuration(
                    "stream methods take neither a nonce nor an IV",
                ));
            }
            return Ok(());
        };

        match self.mode {
            BlockMode::Ecb => {
                if nonce.is_some() || iv.is_some() {
                    return Err(CoreError::configuration(
                        "ECB takes neither a nonce nor an IV",
                    ));
                }
            }
            BlockMode::Cbc | BlockMode::Cfb | BlockMode::Ofb => {
                if nonce.is_some() {
                    return Err(CoreError::configuration(format!(
                        "{} takes an IV, not a nonce",
                        self.mode.label()
                    )));
                }
                match iv {
                    None => {
                        return Err(CoreError::configuration(format!(
                            "{} requires a {block_len}-byte IV",
                            self.mode.label()
                        )))
                    }
                    Some(iv) if iv.len() != block_len => {
                        return Err(CoreError::configuration(format!(
                            "IV is {} bytes, {} expects {block_len}",
                            iv.len(),
                            self.mode.label()
                        )))
                    }
                    Some(_) => {}
                }
            }
            BlockMode::Ctr => {
                if iv.is_some() {
                    return Err(CoreError::configuration("CTR takes a nonce, not an IV"));
                }
                let nonce_len = block_len / 2;
                match nonce {
                    None => {
                        return Err(CoreError::configuration(format!(
                            "CTR requires a {nonce_len}-byte nonce"
                        )))
                    }
                    Some(nonce) if nonce.len() != nonce_len => {
                        return Err(CoreError::configuration(format!(
                            "nonce is {} bytes, CTR expects {nonce_len}",
                            nonce.len()
                        )))
                    }
                    Some(_) => {}
                }
            }
        }
        Ok(())
    }

    /// Mode dispatch over one cipher's concrete mode wrappers. IV and
    /// nonce lengths come from each wrapper's own IV size, so the caller
    /// only names the five types.
    fn mode_encrypt<EcbE, CbcE, CfbE, OfbE, CtrE>(
        &self,
        key: &[u8],
        mut buf: Vec<u8>,
    ) -> CoreResult<EncryptionOutput>
    where
        EcbE: KeyInit + BlockEncryptMut,
        CbcE: KeyIvInit + BlockEncryptMut,
        CfbE: KeyIvInit + AsyncStreamCipher + BlockEncryptMut,
        OfbE: KeyIvInit + StreamCipher,
        CtrE: KeyIvInit + StreamCipher,
    {
        match self.mode {
            BlockMode::Ecb => {
                let enc = EcbE::new_from_slice(key).map_err(material_error)?;
                apply_block_encrypt(enc, &mut buf)?;
                Ok(EncryptionOutput {
                    ciphertext: buf,
                    nonce: None,
                    iv: None,
                })
            }
            BlockMode::Cbc => {
                let iv = random_bytes(CbcE::iv_size());
                let enc = CbcE::new_from_slices(key, &iv).map_err(material_error)?;
                apply_block_encrypt(enc, &mut buf)?;
                Ok(EncryptionOutput {
                    ciphertext: buf,
                    nonce: None,
                    iv: Some(iv),
                })
            }
            BlockMode::Cfb => {
                let iv = random_bytes(CfbE::iv_size());
                CfbE::new_from_slices(key, &iv)
                    .map_err(material_error)?
                    .encrypt(&mut buf);
                Ok(EncryptionOutput {
                    ciphertext: buf,
                    nonce: None,
                    iv: Some(iv),
                })
            }
            BlockMode::Ofb => {
                let iv = random_bytes(OfbE::iv_size());
                let mut keystream = OfbE::new_from_slices(key, &iv).map_err(material_error)?;
                keystream.apply_keystream(&mut buf);
                Ok(EncryptionOutput {
                    ciphertext: buf,
                    nonce: None,
                    iv: Some(iv),
                })
            }
            BlockMode::Ctr => {
                // Half-block random nonce, zero initial counter in the
                // remaining bytes.
                let nonce = random_bytes(CtrE::iv_size() / 2);
                let mut full = nonce.clone();
                full.resize(CtrE::iv_size(), 0);
                let mut keystream = CtrE::new_from_slices(key, &full).map_err(material_error)?;
                keystream.apply_keystream(&mut buf);
                Ok(EncryptionOutput {
                    ciphertext: buf,
                    nonce: Some(nonce),
                    iv: None,
                })
            }
        }
    }

    fn mode_decrypt<EcbD, CbcD, CfbD, OfbD, CtrD>(
        &self,
        key: &[u8],
        buf: &mut [u8],
        nonce: Option<&[u8]>,
        iv: Option<&[u8]>,
    ) -> CoreResult<()>
    where
        EcbD: KeyInit + BlockDecryptMut,
        CbcD: KeyIvInit + BlockDecryptMut,
        CfbD: KeyIvInit + AsyncStreamCipher + BlockDecryptMut,
        OfbD: KeyIvInit + StreamCipher,
        CtrD: KeyIvInit + StreamCipher,
    {
        match self.mode {
            BlockMode::Ecb => {
                let dec = EcbD::new_from_slice(key).map_err(material_error)?;
                apply_block_decrypt(dec, buf)
            }
            BlockMode::Cbc => {
                let iv = require_iv(iv)?;
                let dec = CbcD::new_from_slices(key, iv).map_err(material_error)?;
                apply_block_decrypt(dec, buf)
            }
            BlockMode::Cfb => {
                let iv = require_iv(iv)?;
                CfbD::new_from_slices(key, iv)
                    .map_err(material_error)?
                    .decrypt(buf);
                Ok(())
            }
            BlockMode::Ofb => {
                let iv = require_iv(iv)?;
                let mut keystream = OfbD::new_from_slices(key, iv).map_err(material_error)?;
                keystream.apply_keystream(buf);
                Ok(())
            }
            BlockMode::Ctr => {
                let nonce =
                    nonce.ok_or_else(|| CoreError::configuration("CTR requires a nonce"))?;
                let mut full = nonce.to_vec();
                full.resize(CtrD::iv_size(), 0);
                let mut keystream = CtrD::new_from_slices(key, &full).map_err(material_error)?;
                keystream.apply_keystream(buf);
                Ok(())
            }
        }
    }
}

fn require_iv(iv: Option<&[u8]>) -> CoreResult<&[u8]> {
    iv.ok_or_else(|| CoreError::configuration("this mode requires an IV"))
}

fn material_error(err: cipher::InvalidLength) -> CoreError {
    CoreError::configuration(format!("cipher rejected key or IV material: {err}"))
}

fn random_bytes(len: usize) -> Vec<u8> {
    let mut bytes = vec![0u8; len];
    rand::thread_rng().fill_bytes(&mut bytes);
    bytes
}

fn apply_block_encrypt<M: BlockEncryptMut>(mut mode: M, buf: &mut [u8]) -> CoreResult<()> {
    let block = M::block_size();
    if buf.len() % block != 0 {
        return Err(CoreError::configuration(format!(
            "data length {} is not a multiple of the {block}-byte cipher block",
            buf.len()
        )));
    }
    for chunk in buf.chunks_exact_mut(block) {
        mode.encrypt_block_mut(GenericArray::from_mut_slice(chunk));
    }
    Ok(())
}

fn apply_block_decrypt<M: BlockDecryptMut>(mut mode: M, buf: &mut [u8]) -> CoreResult<()> {
    let block = M::block_size();
    if buf.len() % block != 0 {
        return Err(CoreError::configuration(format!(
            "data length {} is not a multiple of the {block}-byte cipher block",
            buf.len()
        )));
    }
    for chunk in buf.chunks_exact_mut(block) {
        mode.decrypt_block_mut(GenericArray::from_mut_slice(chunk));
    }
    Ok(())
}
