use parking_lot::RwLock;
use std::collections::{HashMap, HashSet};

/// Run-scoped memory of paths indexed per domain
///
/// Cleared at the start of every domain crawl; the store remains the record
/// of what has been indexed across runs.
#[derive(Debug, Default)]
pub struct ScrapedPaths {
    paths: RwLock<HashMap<String, HashSet<String>>>,
}

impl ScrapedPaths {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&self, domain: &str, path: &str) {
        self.paths
            .write()
            .entry(domain.to_string())
            .or_default()
            .insert(path.to_string());
    }

    pub fn contains(&self, domain: &str, path: &str) -> bool {
        self.paths
            .read()
            .get(domain)
            .map(|paths| paths.contains(path))
            .unwrap_or(false)
    }

    /// Forgets every path recorded for `domain`
    pub fn clear_domain(&self, domain: &str) {
        self.paths.write().remove(domain);
    }

    pub fn count(&self, domain: &str) -> usize {
        self.paths.read().get(domain).map(HashSet::len).unwrap_or(0)
    }
}
