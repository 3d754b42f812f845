use crate::source::ArticleSource;
use crate::store::CacheStore;
use devcards_core::feed::{should_store, FeedOutcome, CACHE_KEY};
use std::sync::Arc;

/// Single-key article cache in front of an [`ArticleSource`]
///
/// Concurrent misses are not de-duplicated: each caller that finds the slot
/// empty issues its own request.
pub struct ArticleCache<S> {
    source: S,
    store: Arc<dyn CacheStore>,
    ttl_secs: u64,
}

impl<S: ArticleSource> ArticleCache<S> {
    pub fn new(source: S, store: Arc<dyn CacheStore>, ttl_secs: u64) -> Self {
        Self {
            source,
            store,
            ttl_secs,
        }
    }

    pub fn source(&self) -> &S {
        &self.source
    }

    /// Serve the cached list, or fetch and store a fresh one
    ///
    /// Never fails: store errors are logged and treated as a miss, and source
    /// errors come back as [`FeedOutcome::Degraded`]. Empty and failed
    /// results are not stored.
    pub async fn get_or_fetch(&self) -> FeedOutcome {
        match self.store.get(CACHE_KEY) {
            Ok(Some(articles)) if !articles.is_empty() => {
                log::debug!("Cache hit for {CACHE_KEY} ({} articles)", articles.len());
                return FeedOutcome::Cached(articles);
            }
            Ok(_) => log::debug!("Cache miss for {CACHE_KEY}"),
            Err(e) => log::warn!("Ignoring unreadable cache entry {CACHE_KEY}: {e}"),
        }

        match self.source.fetch_articles().await {
            Ok(articles) if should_store(&articles) => {
                if let Err(e) = self.store.set(CACHE_KEY, &articles, self.ttl_secs) {
                    log::warn!("Failed to store {CACHE_KEY}: {e}");
                }
                FeedOutcome::Fetched(articles)
            }
            Ok(_) => FeedOutcome::Empty,
            Err(e) => FeedOutcome::Degraded {
                reason: e.to_string(),
            },
        }
    }
}
