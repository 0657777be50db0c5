use std::collections::HashMap;
use std::future::Future;

use tokio::sync::RwLock;

/// Page id -> page-scoped access token, for the lifetime of one client.
///
/// Only successful lookups are stored, so a page whose lookup failed is
/// retried on the next call.
pub struct TokenCache {
    tokens: RwLock<HashMap<String, String>>,
}

impl TokenCache {
    pub fn new() -> Self {
        Self {
            tokens: RwLock::new(HashMap::new()),
        }
    }

    pub async fn get(&self, key: &str) -> Option<String> {
        self.tokens.read().await.get(key).cloned()
    }

    /// Cached token for `key`, or the result of `fetch` (stored if `Some`).
    pub async fn get_or_fetch<F, Fut>(&self, key: &str, fetch: F) -> Option<String>
    where
        F: FnOnce() -> Fut,
        Fut: Future<Output = Option<String>>,
    {
        if let Some(token) = self.get(key).await {
            return Some(token);
        }

        let token = fetch().await?;
        self.tokens
            .write()
            .await
            .insert(key.to_string(), token.clone());
        Some(token)
    }

    pub async fn len(&self) -> usize {
        self.tokens.read().await.len()
    }
}

impl Default for TokenCache {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};

    #[tokio::test]
    async fn fetches_once_per_key() {
        let cache = TokenCache::new();
        let lookups = AtomicUsize::new(0);

        for _ in 0..3 {
            let token = cache
                .get_or_fetch("page-1", || async {
                    lookups.fetch_add(1, Ordering::Relaxed);
                    Some("tok-1".to_string())
                })
                .await;
            assert_eq!(token.as_deref(), Some("tok-1"));
        }

        assert_eq!(lookups.load(Ordering::Relaxed), 1);
        assert_eq!(cache.len().await, 1);
    }

    #[tokio::test]
    async fn failed_lookup_not_cached() {
        let cache = TokenCache::new();

        let missing = cache.get_or_fetch("page-2", || async { None }).await;
        assert!(missing.is_none());
        assert_eq!(cache.len().await, 0);

        let retried = cache
            .get_or_fetch("page-2", || async { Some("tok-2".to_string()) })
            .await;
        assert_eq!(retried.as_deref(), Some("tok-2"));
        assert_eq!(cache.get("page-2").await.as_deref(), Some("tok-2"));
    }
}
