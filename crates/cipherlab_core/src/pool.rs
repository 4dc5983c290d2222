//! Pools of ciphers and plaintext sources for random selection.
//!
//! A [`CipherPool`] holds the cipher configurations a dataset draws from,
//! keyed by their `(method, mode)` labels; a [`SourcePool`] does the same
//! for plaintext sources. The stock presets mirror the combinations most
//! datasets want.

use std::collections::HashSet;
use std::path::Path;

use rand::Rng;

use crate::cipher::{BlockMode, CipherConfig, CipherEngine, CipherMethod};
use crate::error::{CoreError, CoreResult};
use crate::plaintext::{BinarySource, DictionarySource, PlaintextSource, SizeBounds};

/// One selectable cipher slot.
#[derive(Debug)]
pub enum CipherSelection {
    /// Encrypt with the contained engine.
    Cipher(CipherEngine),
    /// Record the plaintext unencrypted. Passthrough records carry the
    /// `NONE` method and mode labels and no key, nonce or IV.
    Passthrough,
}

/// A pool of cipher configurations, drawn from uniformly per record.
#[derive(Debug, Default)]
pub struct CipherPool {
    entries: Vec<CipherSelection>,
    seen: HashSet<(CipherMethod, BlockMode)>,
    has_passthrough: bool,
}

impl CipherPool {
    /// Creates an empty pool.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Every supported combination: AES in all five modes, triple DES and
    /// single DES in ECB, CBC, CFB and OFB, and the stream ciphers in ECB.
    ///
    /// # Errors
    ///
    /// Propagates engine construction failures; the stock combinations
    /// all build successfully.
    pub fn all() -> CoreResult<Self> {
        let mut pool = Self::new();
        pool.extend_with(&Self::AES_PAIRS)?;
        pool.extend_with(&Self::DES3_PAIRS)?;
        pool.extend_with(&Self::DES_PAIRS)?;
        pool.extend_with(&[
            (CipherMethod::Shift, BlockMode::Ecb),
            (CipherMethod::Xor, BlockMode::Ecb),
        ])?;
        Ok(pool)
    }

    /// AES-256 in all five modes.
    ///
    /// # Errors
    ///
    /// Propagates engine construction failures.
    pub fn aes() -> CoreResult<Self> {
        let mut pool = Self::new();
        pool.extend_with(&Self::AES_PAIRS)?;
        Ok(pool)
    }

    /// Triple DES in ECB, CBC, CFB and OFB.
    ///
    /// # Errors
    ///
    /// Propagates engine construction failures.
    pub fn triple_des() -> CoreResult<Self> {
        let mut pool = Self::new();
        pool.extend_with(&Self::DES3_PAIRS)?;
        Ok(pool)
    }

    /// Single DES in ECB, CBC, CFB and OFB.
    ///
    /// # Errors
    ///
    /// Propagates engine construction failures.
    pub fn des() -> CoreResult<Self> {
        let mut pool = Self::new();
        pool.extend_with(&Self::DES_PAIRS)?;
        Ok(pool)
    }

    /// Every method in ECB mode only.
    ///
    /// # Errors
    ///
    /// Propagates engine construction failures.
    pub fn ecb_only() -> CoreResult<Self> {
        let mut pool = Self::new();
        pool.extend_with(&[
            (CipherMethod::Aes, BlockMode::Ecb),
            (CipherMethod::Des3, BlockMode::Ecb),
            (CipherMethod::Des, BlockMode::Ecb),
            (CipherMethod::Shift, BlockMode::Ecb),
            (CipherMethod::Xor, BlockMode::Ecb),
        ])?;
        Ok(pool)
    }

    const AES_PAIRS: [(CipherMethod, BlockMode); 5] = [
        (CipherMethod::Aes, BlockMode::Ecb),
        (CipherMethod::Aes, BlockMode::Cbc),
        (CipherMethod::Aes, BlockMode::Cfb),
        (CipherMethod::Aes, BlockMode::Ofb),
        (CipherMethod::Aes, BlockMode::Ctr),
    ];
    const DES3_PAIRS: [(CipherMethod, BlockMode); 4] = [
        (CipherMethod::Des3, BlockMode::Ecb),
        (CipherMethod::Des3, BlockMode::Cbc),
        (CipherMethod::Des3, BlockMode::Cfb),
        (CipherMethod::Des3, BlockMode::Ofb),
    ];
    const DES_PAIRS: [(CipherMethod, BlockMode); 4] = [
        (CipherMethod::Des, BlockMode::Ecb),
        (CipherMethod::Des, BlockMode::Cbc),
        (CipherMethod::Des, BlockMode::Cfb),
        (CipherMethod::Des, BlockMode::Ofb),
    ];

    fn extend_with(&mut self, pairs: &[(CipherMethod, BlockMode)]) -> CoreResult<()> {
        for &(method, mode) in pairs {
            self.add(CipherConfig::new(method, mode).build()?)?;
        }
        Ok(())
    }

    /// Adds a cipher engine to the pool.
    ///
    /// # Errors
    ///
    /// Returns [`CoreError::Configuration`] if the pool already holds an
    /// engine with the same method and mode.
    pub fn add(&mut self, engine: CipherEngine) -> CoreResult<()> {
        let key = (engine.method(), engine.mode());
        if !self.seen.insert(key) {
            return Err(CoreError::configuration(format!(
                "pool already holds {}/{}",
                key.0.label(),
                key.1.label()
            )));
        }
        self.entries.push(CipherSelection::Cipher(engine));
        Ok(())
    }

    /// Adds the passthrough (unencrypted) slot.
    ///
    /// # Errors
    ///
    /// Returns [`CoreError::Configuration`] if the pool already holds it.
    pub fn add_passthrough(&mut self) -> CoreResult<()> {
        if self.has_passthrough {
            return Err(CoreError::configuration(
                "pool already holds the passthrough slot",
            ));
        }
        self.has_passthrough = true;
        self.entries.push(CipherSelection::Passthrough);
        Ok(())
    }

    /// Builder-style [`CipherPool::add_passthrough`].
    ///
    /// # Errors
    ///
    /// Returns [`CoreError::Configuration`] if the pool already holds it.
    pub fn with_passthrough(mut self) -> CoreResult<Self> {
        self.add_passthrough()?;
        Ok(self)
    }

    /// Returns the number of selectable slots.
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Returns `true` if the pool has no slots.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Picks a slot uniformly at random.
    ///
    /// # Errors
    ///
    /// Returns [`CoreError::Configuration`] if the pool is empty.
    pub fn pick_mut(&mut self) -> CoreResult<&mut CipherSelection> {
        if self.entries.is_empty() {
            return Err(CoreError::configuration("cipher pool is empty"));
        }
        let index = rand::thread_rng().gen_range(0..self.entries.len());
        Ok(&mut self.entries[index])
    }
}

/// A pool of plaintext sources, drawn from uniformly per record.
#[derive(Default)]
pub struct SourcePool {
    sources: Vec<Box<dyn PlaintextSource>>,
    seen: HashSet<&'static str>,
}

impl SourcePool {
    /// Creates an empty pool.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// The stock source pairing: random binary plus a dictionary loaded
    /// from `vocabulary`, both with the default length bounds
    /// ([`SizeBounds::default`]).
    ///
    /// # Errors
    ///
    /// Returns [`CoreError::Io`] when the vocabulary file cannot be read
    /// and [`CoreError::Configuration`] when it yields no words.
    pub fn stock(vocabulary: impl AsRef<Path>) -> CoreResult<Self> {
        Self::stock_with_bounds(vocabulary, SizeBounds::default())
    }

    /// [`SourcePool::stock`] with caller-supplied length bounds.
    ///
    /// # Errors
    ///
    /// Returns [`CoreError::Io`] when the vocabulary file cannot be read
    /// and [`CoreError::Configuration`] when it yields no words.
    pub fn stock_with_bounds(
        vocabulary: impl AsRef<Path>,
        bounds: SizeBounds,
    ) -> CoreResult<Self> {
        let mut pool = Self::new();
        pool.add(Box::new(BinarySource::new(bounds)))?;
        pool.add(Box::new(DictionarySource::from_file(vocabulary, bounds)?))?;
        Ok(pool)
    }

    /// Adds a plaintext source.
    ///
    /// # Errors
    ///
    /// Returns [`CoreError::Configuration`] if the pool already holds a
    /// source with the same type label.
    pub fn add(&mut self, source: Box<dyn PlaintextSource>) -> CoreResult<()> {
        let label = source.type_label();
        if !self.seen.insert(label) {
            return Err(CoreError::configuration(format!(
                "pool already holds a {label} source"
            )));
        }
        self.sources.push(source);
        Ok(())
    }

    /// Returns the number of sources.
    #[must_use]
    pub fn len(&self) -> usize {
        self.sources.len()
    }

    /// Returns `true` if the pool has no sources.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.sources.is_empty()
    }

    /// Picks a source uniformly at random.
    ///
    /// # Errors
    ///
    /// Returns [`CoreError::Configuration`] if the pool is empty.
    pub fn pick_mut(&mut self) -> CoreResult<&mut dyn PlaintextSource> {
        if self.sources.is_empty() {
            return Err(CoreError::configuration("source pool is empty"));
        }
        let index = rand::thread_rng().gen_range(0..self.sources.len());
        Ok(self.sources[index].as_mut())
    }
}

impl std::fmt::Debug for SourcePool {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SourcePool")
            .field("labels", &self.seen)
            .finish()
    }
}
