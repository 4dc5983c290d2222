//! Plaintext sources for dataset generation.
//!
//! A source produces one plaintext per call, with its length governed by
//! inclusive [`SizeBounds`]. The binary source emits uniform random bytes;
//! the dictionary source emits space-joined natural-language words, which
//! gives records realistic byte statistics.

use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::Path;

use rand::seq::SliceRandom;
use rand::{Rng, RngCore};

use crate::error::{CoreError, CoreResult};
use crate::fields::{PLAINTEXT_TYPE_BINARY, PLAINTEXT_TYPE_DICT};

/// Inclusive plaintext length bounds in bytes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SizeBounds {
    min: usize,
    max: usize,
}

impl SizeBounds {
    /// Creates bounds covering `min..=max` bytes.
    ///
    /// A minimum of zero is valid and permits empty plaintexts.
    ///
    /// # Errors
    ///
    /// Returns [`CoreError::Configuration`] when `min` exceeds `max`.
    pub fn new(min: usize, max: usize) -> CoreResult<Self> {
        if min > max {
            return Err(CoreError::configuration(format!(
                "minimum plaintext size {min} exceeds maximum {max}"
            )));
        }
        Ok(Self { min, max })
    }

    /// Returns the minimum length.
    #[must_use]
    pub fn min(&self) -> usize {
        self.min
    }

    /// Returns the maximum length.
    #[must_use]
    pub fn max(&self) -> usize {
        self.max
    }

    fn sample(&self) -> usize {
        rand::thread_rng().gen_range(self.min..=self.max)
    }
}

/// Default minimum plaintext length in bytes.
pub const DEFAULT_MIN_SIZE: usize = 1000;

/// Default maximum plaintext length in bytes.
pub const DEFAULT_MAX_SIZE: usize = 3000;

impl Default for SizeBounds {
    fn default() -> Self {
        Self {
            min: DEFAULT_MIN_SIZE,
            max: DEFAULT_MAX_SIZE,
        }
    }
}

/// Something that can produce labeled plaintexts.
pub trait PlaintextSource {
    /// Stable label written into the `plaintext_type` record field.
    fn type_label(&self) -> &'static str;

    /// Produces one plaintext.
    fn generate(&mut self) -> Vec<u8>;
}

/// Produces uniform random bytes with a length drawn from the bounds.
#[derive(Debug, Clone)]
pub struct BinarySource {
    bounds: SizeBounds,
}

impl BinarySource {
    /// Creates a binary source with the given length bounds.
    #[must_use]
    pub fn new(bounds: SizeBounds) -> Self {
        Self { bounds }
    }
}

impl PlaintextSource for BinarySource {
    fn type_label(&self) -> &'static str {
        PLAINTEXT_TYPE_BINARY
    }

    fn generate(&mut self) -> Vec<u8> {
        let mut bytes = vec![0u8; self.bounds.sample()];
        rand::thread_rng().fill_bytes(&mut bytes);
        bytes
    }
}

/// Produces space-joined words drawn at random from a vocabulary.
///
/// Each word is appended together with a trailing space, then the length
/// is checked against a target drawn from the bounds. The text therefore
/// always ends in a separator, and the last word may push the plaintext
/// past the target (and past the configured maximum).
#[derive(Debug, Clone)]
pub struct DictionarySource {
    words: Vec<String>,
    bounds: SizeBounds,
}

impl DictionarySource {
    /// Creates a dictionary source from an in-memory vocabulary.
    ///
    /// # Errors
    ///
    /// Returns [`CoreError::Configuration`] when the vocabulary is empty.
    pub fn from_words(words: Vec<String>, bounds: SizeBounds) -> CoreResult<Self> {
        if words.is_empty() {
            return Err(CoreError::configuration("vocabulary must not be empty"));
        }
        Ok(Self { words, bounds })
    }

    /// Loads a vocabulary from a word-per-line file.
    ///
    /// Only the first whitespace-separated token of each line is used, so
    /// embedding files that carry vectors after the word (GloVe and
    /// friends) load as-is. Blank lines are skipped.
    ///
    /// # Errors
    ///
    /// Returns [`CoreError::Io`] when the file cannot be read and
    /// [`CoreError::Configuration`] when it yields no words.
    pub fn from_file(path: impl AsRef<Path>, bounds: SizeBounds) -> CoreResult<Self> {
        let reader = BufReader::new(File::open(path)?);
        let mut words = Vec::new();
        for line in reader.lines() {
            let line = line?;
            if let Some(word) = line.split_whitespace().next() {
                words.push(word.to_string());
            }
        }
        Self::from_words(words, bounds)
    }

    /// Returns the vocabulary size.
    #[must_use]
    pub fn vocabulary_len(&self) -> usize {
        self.words.len()
    }
}

impl PlaintextSource for DictionarySource {
    fn type_label(&self) -> &'static str {
        PLAINTEXT_TYPE_DICT
    }

    fn generate(&mut self) -> Vec<u8> {
        let target = self.bounds.sample();
        let mut rng = rand::thread_rng();
        let mut text = String::new();
        while text.len() < target {
            // The vocabulary is non-empty by construction. The separator
            // goes in before the length check, so it counts toward the
            // target.
            if let Some(word) = self.words.choose(&mut rng) {
                text.push_str(word);
                text.push(' ');
            }
        }
        text.into_bytes()
    }
}
