//! Query cache for API reads
//!
//! Each read is cached under a `QueryKey` with a stale time that depends on
//! the kind of data. Mutations invalidate whole families of keys.

use dashmap::DashMap;
use serde::de::DeserializeOwned;
use serde::Serialize;
use sitegen_types::VisibilityFilter;
use std::sync::Arc;
use std::time::Duration;
use tokio::time::Instant;
use tracing::debug;

/// Website listings stay fresh for five minutes
pub const LIST_STALE_TIME: Duration = Duration::from_secs(5 * 60);
/// Single websites and previews stay fresh for ten minutes
pub const WEBSITE_STALE_TIME: Duration = Duration::from_secs(10 * 60);
/// Health reports stay fresh for fifteen seconds
pub const HEALTH_STALE_TIME: Duration = Duration::from_secs(15);

/// Identity of a cached read
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum QueryKey {
    Websites {
        page: u32,
        limit: u32,
        search: Option<String>,
        filter: VisibilityFilter,
    },
    PublicWebsites {
        page: u32,
        limit: u32,
    },
    Website(String),
    Preview(String),
    Health,
}

impl QueryKey {
    pub fn stale_time(&self) -> Duration {
        match self {
            QueryKey::Websites { .. } | QueryKey::PublicWebsites { .. } => LIST_STALE_TIME,
            QueryKey::Website(_) | QueryKey::Preview(_) => WEBSITE_STALE_TIME,
            QueryKey::Health => HEALTH_STALE_TIME,
        }
    }
}

/// A family of keys to drop together
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Invalidate {
    /// Every listing, public or not
    Lists,
    /// One website and its preview
    Website(String),
    Health,
    All,
}

impl Invalidate {
    fn matches(&self, key: &QueryKey) -> bool {
        match (self, key) {
            (Invalidate::All, _) => true,
            (Invalidate::Lists, QueryKey::Websites { .. })
            | (Invalidate::Lists, QueryKey::PublicWebsites { .. }) => true,
            (Invalidate::Website(id), QueryKey::Website(key_id))
            | (Invalidate::Website(id), QueryKey::Preview(key_id)) => id == key_id,
            (Invalidate::Health, QueryKey::Health) => true,
            _ => false,
        }
    }
}

struct CacheEntry {
    value: serde_json::Value,
    fresh_until: Instant,
}

/// Stale-time based cache shared between clones
#[derive(Clone, Default)]
pub struct QueryCache {
    data: Arc<DashMap<QueryKey, CacheEntry>>,
}

impl QueryCache {
    pub fn new() -> Self {
        Self::default()
    }

    /// Fresh cached value for a key. Stale entries are dropped on read.
    pub fn get<T: DeserializeOwned>(&self, key: &QueryKey) -> Option<T> {
        let value = {
            let entry = self.data.get(key)?;
            if Instant::now() >= entry.fresh_until {
                None
            } else {
                Some(entry.value.clone())
            }
        };

        match value {
            Some(value) => serde_json::from_value(value).ok(),
            None => {
                debug!("Cache entry {:?} is stale", key);
                self.data.remove(key);
                None
            }
        }
    }

    /// Store a value under its key's stale time
    pub fn insert<T: Serialize>(&self, key: QueryKey, value: &T) {
        let Ok(value) = serde_json::to_value(value) else {
            return;
        };
        let fresh_until = Instant::now() + key.stale_time();
        self.data.insert(key, CacheEntry { value, fresh_until });
    }

    pub fn contains(&self, key: &QueryKey) -> bool {
        self.get::<serde_json::Value>(key).is_some()
    }

    /// Drop every key in a family
    pub fn invalidate(&self, scope: Invalidate) {
        let before = self.data.len();
        self.data.retain(|key, _| !scope.matches(key));
        debug!(
            "Invalidated {:?} ({} entries)",
            scope,
            before.saturating_sub(self.data.len())
        );
    }

    pub fn len(&self) -> usize {
        self.data.len()
    }

    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use sitegen_types::PreviewPayload;

    fn list_key(page: u32) -> QueryKey {
        QueryKey::Websites {
            page,
            limit: 12,
            search: None,
            filter: VisibilityFilter::All,
        }
    }

    #[tokio::test(start_paused = true)]
    async fn test_entries_go_stale() {
        let cache = QueryCache::new();
        cache.insert(QueryKey::Health, &serde_json::json!({ "status": "healthy" }));
        cache.insert(list_key(1), &vec![1, 2, 3]);

        assert!(cache.contains(&QueryKey::Health));

        tokio::time::advance(Duration::from_secs(16)).await;
        assert!(!cache.contains(&QueryKey::Health));
        assert_eq!(cache.get::<Vec<u32>>(&list_key(1)), Some(vec![1, 2, 3]));

        tokio::time::advance(LIST_STALE_TIME).await;
        assert_eq!(cache.get::<Vec<u32>>(&list_key(1)), None);
        assert!(cache.is_empty());
    }

    #[tokio::test(start_paused = true)]
    async fn test_invalidate_families() {
        let cache = QueryCache::new();
        cache.insert(list_key(1), &1);
        cache.insert(list_key(2), &2);
        cache.insert(QueryKey::PublicWebsites { page: 1, limit: 12 }, &3);
        cache.insert(QueryKey::Website("a".into()), &4);
        cache.insert(QueryKey::Preview("a".into()), &PreviewPayload::default());
        cache.insert(QueryKey::Website("b".into()), &5);
        cache.insert(QueryKey::Health, &6);

        cache.invalidate(Invalidate::Lists);
        assert_eq!(cache.len(), 4);

        cache.invalidate(Invalidate::Website("a".into()));
        assert_eq!(cache.len(), 2);
        assert!(cache.contains(&QueryKey::Website("b".into())));

        cache.invalidate(Invalidate::All);
        assert!(cache.is_empty());
    }

    #[tokio::test(start_paused = true)]
    async fn test_keys_distinguish_filters() {
        let cache = QueryCache::new();
        cache.insert(list_key(1), &"all");

        let private = QueryKey::Websites {
            page: 1,
            limit: 12,
            search: None,
            filter: VisibilityFilter::PrivateOnly,
        };
        assert_eq!(cache.get::<String>(&private), None);
        assert_eq!(cache.get::<String>(&list_key(1)), Some("all".to_string()));
    }
}
