use async_trait::async_trait;
use std::collections::HashMap;
use std::hash::Hash;
use std::time::{Duration, Instant};
use tokio::sync::RwLock;

use crate::errors::Result;
use crate::ports::cache::StatementCache;

/// in-memory TTL cache for account statements
///
/// Entries expire lazily: an expired entry is treated as a miss on read.
pub struct InMemoryStatementCache<K, S> {
    entries: RwLock<HashMap<K, (S, Instant)>>,
}

impl<K, S> InMemoryStatementCache<K, S> {
    pub fn new() -> Self {
        Self {
            entries: RwLock::new(HashMap::new()),
        }
    }
}

impl<K, S> Default for InMemoryStatementCache<K, S> {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl<K, S> StatementCache<K, S> for InMemoryStatementCache<K, S>
where
    K: Eq + Hash + Clone + Send + Sync,
    S: Clone + Send + Sync,
{
    async fn get(&self, key: &K) -> Result<Option<S>> {
        let entries = self.entries.read().await;
        match entries.get(key) {
            Some((value, deadline)) if *deadline > Instant::now() => Ok(Some(value.clone())),
            _ => Ok(None),
        }
    }

    async fn set(&self, key: &K, statement: &S, ttl: Duration) -> Result<()> {
        let mut entries = self.entries.write().await;
        entries.insert(key.clone(), (statement.clone(), Instant::now() + ttl));
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_set_get_and_expiry() {
        let cache: InMemoryStatementCache<u32, String> = InMemoryStatementCache::new();

        cache
            .set(&1, &"cached".to_string(), Duration::from_secs(60))
            .await
            .unwrap();
        assert_eq!(cache.get(&1).await.unwrap().as_deref(), Some("cached"));

        cache
            .set(&2, &"gone".to_string(), Duration::from_millis(1))
            .await
            .unwrap();
        tokio::time::sleep(Duration::from_millis(10)).await;
        assert_eq!(cache.get(&2).await.unwrap(), None);
    }
}
