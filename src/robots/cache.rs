//! Robots.txt caching implementation
//!
//! Rules are kept for the lifetime of the process; there is no expiry.

use crate::robots::RobotsRules;
use parking_lot::RwLock;
use std::collections::HashMap;
use std::sync::Arc;

/// Per-domain cache of parsed robots rules
#[derive(Debug, Default)]
pub struct RobotsCache {
    rules: RwLock<HashMap<String, Arc<RobotsRules>>>,
}

impl RobotsCache {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, domain: &str) -> Option<Arc<RobotsRules>> {
        self.rules.read().get(domain).cloned()
    }

    /// Stores `rules` for `domain` and returns the shared handle
    pub fn insert(&self, domain: &str, rules: RobotsRules) -> Arc<RobotsRules> {
        let rules = Arc::new(rules);
        self.rules
            .write()
            .insert(domain.to_string(), Arc::clone(&rules));
        rules
    }

    pub fn len(&self) -> usize {
        self.rules.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.rules.read().is_empty()
    }
}
