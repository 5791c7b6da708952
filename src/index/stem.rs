//! Word → stem lookup with layered caching
//!
//! Lookups go memory → `stems` table → stemmer, and a computed stem is written
//! back to both layers. Losing either layer only costs a recomputation.

use crate::storage::{Storage, StorageError};
use parking_lot::RwLock;
use rust_stemmers::Algorithm;
use std::collections::HashMap;
use thiserror::Error;

/// Errors from the stemming layers; the affected token is dropped
#[derive(Debug, Error)]
pub enum StemError {
    #[error("stemmer produced no stem for '{0}'")]
    Empty(String),

    #[error("stemmer failed for '{word}': {message}")]
    Backend { word: String, message: String },

    #[error("stem store error: {0}")]
    Storage(#[from] StorageError),
}

/// The stemming capability: maps a surface word to its canonical stem
pub trait Stemmer: Send + Sync {
    fn stem(&self, word: &str) -> Result<String, StemError>;
}

/// Snowball English stemmer
pub struct SnowballStemmer {
    inner: rust_stemmers::Stemmer,
}

impl SnowballStemmer {
    pub fn english() -> Self {
        Self {
            inner: rust_stemmers::Stemmer::create(Algorithm::English),
        }
    }
}

impl Default for SnowballStemmer {
    fn default() -> Self {
        Self::english()
    }
}

impl Stemmer for SnowballStemmer {
    fn stem(&self, word: &str) -> Result<String, StemError> {
        let stem = self.inner.stem(word);
        if stem.is_empty() {
            return Err(StemError::Empty(word.to_string()));
        }
        Ok(stem.into_owned())
    }
}

/// In-memory word → stem memo
#[derive(Debug, Default)]
pub struct StemCache {
    stems: RwLock<HashMap<String, String>>,
}

impl StemCache {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, word: &str) -> Option<String> {
        self.stems.read().get(word).cloned()
    }

    pub fn insert(&self, word: &str, stem: &str) {
        self.stems
            .write()
            .insert(word.to_string(), stem.to_string());
    }

    pub fn len(&self) -> usize {
        self.stems.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.stems.read().is_empty()
    }
}

/// Layered stem resolver
pub struct StemIndex {
    cache: StemCache,
    stemmer: Box<dyn Stemmer>,
}

impl StemIndex {
    pub fn new(stemmer: Box<dyn Stemmer>) -> Self {
        Self {
            cache: StemCache::new(),
            stemmer,
        }
    }

    /// Resolves the stem of `word`, persisting freshly computed stems
    pub fn stem<S: Storage + ?Sized>(&self, storage: &mut S, word: &str) -> Result<String, StemError> {
        if let Some(stem) = self.cache.get(word) {
            return Ok(stem);
        }

        if let Some(stem) = storage.find_stem(word)? {
            self.cache.insert(word, &stem);
            return Ok(stem);
        }

        let stem = self.stemmer.stem(word)?;
        storage.insert_stem(word, &stem)?;
        self.cache.insert(word, &stem);
        Ok(stem)
    }

    pub fn cache(&self) -> &StemCache {
        &self.cache
    }
}

impl Default for StemIndex {
    fn default() -> Self {
        Self::new(Box::new(SnowballStemmer::english()))
    }
}
