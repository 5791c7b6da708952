//! Domain registration
//!
//! Resolves a domain to its stored id and reachable protocol, probing the
//! network only when neither the cache nor the store knows the domain.

use crate::crawler::fetcher::get_with_fallback;
use crate::state::{DomainCache, DomainEntry, Protocol};
use crate::storage::Storage;
use crate::{IndexerError, Result};
use parking_lot::Mutex;
use reqwest::Client;

/// Memoizing front end to the `domains` table
#[derive(Debug, Default)]
pub struct DomainRegistry {
    cache: DomainCache,
}

impl DomainRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the cached entry for `domain` without touching the store
    pub fn lookup(&self, domain: &str) -> Option<DomainEntry> {
        self.cache.get(domain)
    }

    /// Registers `domain`, or returns its existing registration
    ///
    /// # Resolution order
    ///
    /// 1. Memory cache
    /// 2. `domains` table (no network probe on a hit)
    /// 3. GET `/` over HTTPS, then HTTP; the first protocol that answers is
    ///    recorded in a new row
    ///
    /// A domain that answers on neither protocol yields
    /// `IndexerError::Registration` and leaves no row and no cache entry.
    pub async fn register<S: Storage>(
        &self,
        domain: &str,
        client: &Client,
        storage: &Mutex<S>,
    ) -> Result<DomainEntry> {
        if let Some(entry) = self.cache.get(domain) {
            tracing::debug!("Domain cache hit for {}", domain);
            return Ok(entry);
        }

        let existing = {
            let store = storage.lock();
            store.find_domain(domain)?
        };

        if let Some(record) = existing {
            let entry = DomainEntry {
                id: record.id,
                protocol: Protocol::from_is_https(record.is_https),
            };
            tracing::debug!("Domain {} already registered as id {}", domain, entry.id);
            self.cache.insert(domain, entry.clone());
            return Ok(entry);
        }

        let protocol = match get_with_fallback(client, domain, "/").await {
            Ok((protocol, _)) => protocol,
            Err(e) => {
                return Err(IndexerError::Registration {
                    domain: domain.to_string(),
                    message: e.to_string(),
                });
            }
        };

        let id = {
            let mut store = storage.lock();
            store.insert_domain(domain, protocol.is_https())?
        };

        let entry = DomainEntry { id, protocol };
        tracing::info!("Registered {} as id {} over {}", domain, id, protocol);
        self.cache.insert(domain, entry.clone());
        Ok(entry)
    }

    pub fn cache(&self) -> &DomainCache {
        &self.cache
    }
}
