use async_trait::async_trait;
use std::time::Duration;

use crate::errors::Result;

/// read-through cache for computed account statements
///
/// A derived, eventually-consistent layer: the store stays the source of
/// truth. Callers treat every failure as a miss (fail-open) — a cache outage
/// must never prevent a correct, if slower, read. The use cases enforce that
/// by logging and discarding errors from this port.
#[async_trait]
pub trait StatementCache<K, S>: Send + Sync
where
    K: Send + Sync,
    S: Send + Sync,
{
    async fn get(&self, key: &K) -> Result<Option<S>>;

    async fn set(&self, key: &K, statement: &S, ttl: Duration) -> Result<()>;
}

/// cache that stores nothing, for running without a cache backend
#[derive(Debug, Clone, Copy, Default)]
pub struct NullCache;

#[async_trait]
impl<K, S> StatementCache<K, S> for NullCache
where
    K: Send + Sync,
    S: Send + Sync,
{
    async fn get(&self, _key: &K) -> Result<Option<S>> {
        Ok(None)
    }

    async fn set(&self, _key: &K, _statement: &S, _ttl: Duration) -> Result<()> {
        Ok(())
    }
}
