//! In-memory cache in front of the terminology API.

use std::sync::Arc;
use std::time::Duration;

use moka::future::Cache as MokaCache;

use super::client::RxNavClient;
use super::error::AlternativesError;

/// Configuration for the alternatives cache.
#[derive(Debug, Clone)]
pub struct AlternativesCacheConfig {
    /// TTL for cached entries.
    pub ttl: Duration,

    /// Maximum number of cached drugs.
    pub max_capacity: u64,
}

impl Default for AlternativesCacheConfig {
    fn default() -> Self {
        Self {
            ttl: Duration::from_secs(60 * 60),
            max_capacity: 500,
        }
    }
}

/// Cache key for a drug name.
fn cache_key(name: &str) -> String {
    name.trim().to_lowercase()
}

/// RxNav client with caching.
pub struct CachedAlternatives {
    client: RxNavClient,
    cache: MokaCache<String, Arc<Vec<String>>>,
}

impl CachedAlternatives {
    pub fn new(client: RxNavClient, config: &AlternativesCacheConfig) -> Self {
        let cache = MokaCache::builder()
            .time_to_live(config.ttl)
            .max_capacity(config.max_capacity)
            .build();

        Self { client, cache }
    }

    /// Alternatives for `name`, served from cache when fresh.
    pub async fn alternatives(&self, name: &str) -> Result<Arc<Vec<String>>, AlternativesError> {
        let key = cache_key(name);

        if let Some(cached) = self.cache.get(&key).await {
            return Ok(cached);
        }

        let names = Arc::new(self.client.alternatives(name.trim()).await?);
        self.cache.insert(key, names.clone()).await;
        Ok(names)
    }
}
