//! Page indexing
//!
//! Turns page text into per-stem counts and commits them atomically.

use crate::index::stem::StemIndex;
use crate::index::tokenize::tokenize;
use crate::storage::{Storage, StorageResult, TermCounts};

/// Summary of a committed page
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IndexedPage {
    pub page_id: i64,
    /// Number of distinct stems recorded
    pub distinct_terms: usize,
    /// Number of tokens that contributed to the counts
    pub counted_tokens: u32,
}

/// Builds index entries for fetched pages
pub struct PageIndexer {
    stems: StemIndex,
}

impl PageIndexer {
    pub fn new(stems: StemIndex) -> Self {
        Self { stems }
    }

    /// Counts stemmed occurrences in `text`
    ///
    /// Tokens whose stem cannot be resolved are left out of the counts.
    pub fn term_counts<S: Storage + ?Sized>(&self, storage: &mut S, text: &str) -> TermCounts {
        let mut counts = TermCounts::new();

        for token in tokenize(text) {
            match self.stems.stem(storage, &token) {
                Ok(stem) => *counts.entry(stem).or_insert(0) += 1,
                Err(e) => tracing::debug!("Dropping token '{}': {}", token, e),
            }
        }

        counts
    }

    /// Indexes `text` as the page at `path`
    ///
    /// Stems are resolved (and memoized) first; the page, term and page-term
    /// rows are then written in one transaction. On error nothing from this
    /// page is visible in the store.
    pub fn index_page<S: Storage + ?Sized>(
        &self,
        storage: &mut S,
        domain_id: i64,
        path: &str,
        text: &str,
    ) -> StorageResult<IndexedPage> {
        let counts = self.term_counts(storage, text);
        let page_id = storage.index_page(domain_id, path, &counts)?;

        Ok(IndexedPage {
            page_id,
            distinct_terms: counts.len(),
            counted_tokens: counts.values().sum(),
        })
    }

    pub fn stems(&self) -> &StemIndex {
        &self.stems
    }
}

impl Default for PageIndexer {
    fn default() -> Self {
        Self::new(StemIndex::default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::index::stem::{StemError, Stemmer};
    use crate::storage::SqliteStorage;

    /// Refuses to stem anything containing a digit
    struct NoDigits;

    impl Stemmer for NoDigits {
        fn stem(&self, word: &str) -> Result<String, StemError> {
            if word.chars().any(|c| c.is_ascii_digit()) {
                return Err(StemError::Backend {
                    word: word.to_string(),
                    message: "digits not supported".to_string(),
                });
            }
            Ok(word.to_string())
        }
    }

    #[test]
    fn test_term_frequencies_follow_stems() {
        let indexer = PageIndexer::default();
        let mut storage = SqliteStorage::new_in_memory().unwrap();

        let counts = indexer.term_counts(&mut storage, "Cats and dogs run. Dogs run fast.");

        assert_eq!(counts.get("dog"), Some(&2));
        assert_eq!(counts.get("run"), Some(&2));
        assert_eq!(counts.get("cat"), Some(&1));
        assert_eq!(counts.get("fast"), Some(&1));
    }

    #[test]
    fn test_failed_stems_are_dropped() {
        let indexer = PageIndexer::new(StemIndex::new(Box::new(NoDigits)));
        let mut storage = SqliteStorage::new_in_memory().unwrap();

        let counts = indexer.term_counts(&mut storage, "alpha 42 alpha b2b beta");

        assert_eq!(counts.len(), 2);
        assert_eq!(counts.get("alpha"), Some(&2));
        assert_eq!(counts.get("beta"), Some(&1));
    }

    #[test]
    fn test_index_page_commits_counts() {
        let indexer = PageIndexer::default();
        let mut storage = SqliteStorage::new_in_memory().unwrap();
        let domain_id = storage.insert_domain("example.com", true).unwrap();

        let page = indexer
            .index_page(&mut storage, domain_id, "/", "Cats and dogs run. Dogs run fast.")
            .unwrap();

        assert_eq!(page.counted_tokens, 7);
        assert_eq!(page.distinct_terms, 5);

        let dog = storage
            .page_terms(page.page_id)
            .unwrap()
            .into_iter()
            .find(|p| p.term == "dog")
            .unwrap();
        assert_eq!(dog.term_frequency, 2);
        assert_eq!(storage.find_term("dog").unwrap().unwrap().document_frequency, 1);
    }

    #[test]
    fn test_second_index_of_same_path_fails_cleanly() {
        let indexer = PageIndexer::default();
        let mut storage = SqliteStorage::new_in_memory().unwrap();
        let domain_id = storage.insert_domain("example.com", true).unwrap();

        indexer
            .index_page(&mut storage, domain_id, "/", "dogs")
            .unwrap();
        let again = indexer.index_page(&mut storage, domain_id, "/", "dogs");

        assert!(again.is_err());
        assert_eq!(storage.find_term("dog").unwrap().unwrap().document_frequency, 1);
    }
}
