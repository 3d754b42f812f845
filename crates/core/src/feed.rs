//! Feed outcomes and cache entries
//!
//! The fetch/cache layer reports *what happened* as a [`FeedOutcome`]; the
//! caller decides what to render with [`resolve_articles`]. Cache freshness is
//! computed here from timestamps handed in by the shell.

use crate::article::{demo_articles, Article};
use crate::config::FallbackPolicy;
use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};

/// Key of the single cached article list
pub const CACHE_KEY: &str = "devcards_articles";

/// Default cache lifetime in seconds
pub const DEFAULT_TTL_SECS: u64 = 3600;

/// Result of asking the cache/source pipeline for articles
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FeedOutcome {
    /// Served from a fresh cache entry
    Cached(Vec<Article>),
    /// Fetched from the live source and stored
    Fetched(Vec<Article>),
    /// The live source answered with an empty list
    Empty,
    /// The live source could not be reached or its answer was unusable
    Degraded { reason: String },
}

impl FeedOutcome {
    /// Short label for logs
    pub fn label(&self) -> &'static str {
        match self {
            FeedOutcome::Cached(_) => "cached",
            FeedOutcome::Fetched(_) => "fetched",
            FeedOutcome::Empty => "empty",
            FeedOutcome::Degraded { .. } => "degraded",
        }
    }
}

/// Turn a feed outcome into the list of articles to render
///
/// An empty result is always rendered as empty. A degraded result becomes
/// empty under [`FallbackPolicy::Warn`] and the demo dataset under
/// [`FallbackPolicy::Demo`].
pub fn resolve_articles(outcome: FeedOutcome, policy: FallbackPolicy) -> Vec<Article> {
    match (outcome, policy) {
        (FeedOutcome::Cached(articles), _) | (FeedOutcome::Fetched(articles), _) => articles,
        (FeedOutcome::Empty, _) => Vec::new(),
        (FeedOutcome::Degraded { .. }, FallbackPolicy::Warn) => Vec::new(),
        (FeedOutcome::Degraded { .. }, FallbackPolicy::Demo) => demo_articles(),
    }
}

/// Whether a freshly fetched list may be stored
///
/// Only non-empty lists are cached, so an outage or an empty answer is never
/// pinned for a whole TTL.
pub fn should_store(articles: &[Article]) -> bool {
    !articles.is_empty()
}

/// Stored article list with its timestamp
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CacheEntry {
    pub stored_at: DateTime<Utc>,
    pub ttl_secs: u64,
    pub articles: Vec<Article>,
}

impl CacheEntry {
    pub fn new(articles: Vec<Article>, stored_at: DateTime<Utc>, ttl_secs: u64) -> Self {
        Self {
            stored_at,
            ttl_secs,
            articles,
        }
    }

    /// Instant at which the entry stops being served
    pub fn expires_at(&self) -> DateTime<Utc> {
        let ttl = i64::try_from(self.ttl_secs).unwrap_or(i64::MAX);
        Duration::try_seconds(ttl)
            .and_then(|ttl| self.stored_at.checked_add_signed(ttl))
            .unwrap_or(DateTime::<Utc>::MAX_UTC)
    }

    /// Fresh while `now` is before the expiry instant
    pub fn is_fresh(&self, now: DateTime<Utc>) -> bool {
        now < self.expires_at()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn create_test_articles(n: u64) -> Vec<Article> {
        (1..=n)
            .map(|id| Article {
                id: id.to_string(),
                title: Some(format!("Article {id}")),
                description: None,
                url: None,
                published_at: None,
                cover_image: None,
                reading_time_minutes: None,
                reactions_count: None,
                user: None,
            })
            .collect()
    }

    fn at(secs: i64) -> DateTime<Utc> {
        Utc.timestamp_opt(1_700_000_000 + secs, 0).unwrap()
    }

    #[test]
    fn test_resolve_articles_passes_through_live_data() {
        let articles = create_test_articles(2);

        assert_eq!(
            resolve_articles(FeedOutcome::Cached(articles.clone()), FallbackPolicy::Demo),
            articles
        );
        assert_eq!(
            resolve_articles(FeedOutcome::Fetched(articles.clone()), FallbackPolicy::Warn),
            articles
        );
    }

    #[test]
    fn test_resolve_articles_empty_is_never_replaced() {
        assert!(resolve_articles(FeedOutcome::Empty, FallbackPolicy::Demo).is_empty());
        assert!(resolve_articles(FeedOutcome::Empty, FallbackPolicy::Warn).is_empty());
    }

    #[test]
    fn test_resolve_articles_degraded() {
        let degraded = FeedOutcome::Degraded {
            reason: "connection refused".to_string(),
        };

        assert!(resolve_articles(degraded.clone(), FallbackPolicy::Warn).is_empty());
        assert_eq!(
            resolve_articles(degraded, FallbackPolicy::Demo),
            demo_articles()
        );
    }

    #[test]
    fn test_should_store() {
        assert!(!should_store(&[]));
        assert!(should_store(&create_test_articles(1)));
    }

    #[test]
    fn test_cache_entry_freshness() {
        let entry = CacheEntry::new(create_test_articles(1), at(0), DEFAULT_TTL_SECS);

        assert!(entry.is_fresh(at(0)));
        assert!(entry.is_fresh(at(3599)));
        assert!(!entry.is_fresh(at(3600)));
        assert!(!entry.is_fresh(at(7200)));
    }

    #[test]
    fn test_cache_entry_zero_ttl_is_never_fresh() {
        let entry = CacheEntry::new(create_test_articles(1), at(0), 0);
        assert!(!entry.is_fresh(at(0)));
    }

    #[test]
    fn test_cache_entry_huge_ttl_does_not_overflow() {
        let entry = CacheEntry::new(create_test_articles(1), at(0), u64::MAX);
        assert!(entry.is_fresh(at(10_000_000)));
    }

    #[test]
    fn test_cache_entry_round_trips_through_json() {
        let entry = CacheEntry::new(create_test_articles(2), at(0), 60);

        let json = serde_json::to_string(&entry).unwrap();
        let parsed: CacheEntry = serde_json::from_str(&json).unwrap();

        assert_eq!(parsed, entry);
    }
}
