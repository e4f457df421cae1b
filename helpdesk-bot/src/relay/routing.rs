//! Routing resolver: user → forum topic, read through a process-local cache.
//!
//! The directory is the source of truth. The cache only memoizes directory answers and topics
//! bound through this resolver; a thread-not-found from the transport must call [`RoutingResolver::invalidate`].

use std::collections::HashMap;
use std::sync::Arc;

use storage::{StorageError, TopicDirectory};
use tokio::sync::RwLock;
use tracing::{debug, info, instrument};

/// `user_id -> topic_id` memo. Entries are never evicted, so it holds at most one entry per user
/// seen since startup.
#[derive(Default)]
pub struct TopicCache {
    entries: RwLock<HashMap<i64, i32>>,
}

impl TopicCache {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn get(&self, user_id: i64) -> Option<i32> {
        self.entries.read().await.get(&user_id).copied()
    }

    pub async fn put(&self, user_id: i64, topic_id: i32) {
        self.entries.write().await.insert(user_id, topic_id);
    }

    pub async fn invalidate(&self, user_id: i64) -> Option<i32> {
        self.entries.write().await.remove(&user_id)
    }

    pub async fn len(&self) -> usize {
        self.entries.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.entries.read().await.is_empty()
    }
}

pub struct RoutingResolver {
    directory: Arc<dyn TopicDirectory>,
    cache: TopicCache,
}

impl RoutingResolver {
    pub fn new(directory: Arc<dyn TopicDirectory>) -> Self {
        Self {
            directory,
            cache: TopicCache::new(),
        }
    }

    /// Topic the user's messages go to, or `None` when one must be created.
    ///
    /// A caller-supplied `hint` is returned as-is without validation.
    #[instrument(skip(self))]
    pub async fn resolve_topic(
        &self,
        user_id: i64,
        hint: Option<i32>,
    ) -> Result<Option<i32>, StorageError> {
        if let Some(topic_id) = hint {
            return Ok(Some(topic_id));
        }

        if let Some(topic_id) = self.cache.get(user_id).await {
            debug!(user_id, topic_id, "Topic cache hit");
            return Ok(Some(topic_id));
        }

        let record = self.directory.latest_for_user(user_id).await?;
        if let Some(record) = &record {
            self.cache.put(user_id, record.topic_id).await;
        }
        Ok(record.map(|r| r.topic_id))
    }

    /// Persists a new binding and makes it the cached route for the user.
    pub async fn bind(&self, user_id: i64, topic_id: i32) -> Result<(), StorageError> {
        self.directory.bind(user_id, topic_id).await?;
        self.cache.put(user_id, topic_id).await;
        info!(user_id, topic_id, "Bound user to topic");
        Ok(())
    }

    pub async fn invalidate(&self, user_id: i64) {
        if let Some(topic_id) = self.cache.invalidate(user_id).await {
            debug!(user_id, topic_id, "Invalidated cached topic");
        }
    }

    /// User most recently bound to `topic_id`.
    pub async fn user_for_topic(&self, topic_id: i32) -> Result<Option<i64>, StorageError> {
        Ok(self
            .directory
            .latest_for_topic(topic_id)
            .await?
            .map(|r| r.user_id))
    }

    pub fn cache(&self) -> &TopicCache {
        &self.cache
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use storage::{TopicRecord, TopicRepository};

    /// Wraps the SQLite repository and counts user lookups that reach the directory.
    struct CountingDirectory {
        inner: TopicRepository,
        lookups: AtomicUsize,
    }

    #[async_trait]
    impl TopicDirectory for CountingDirectory {
        async fn bind(&self, user_id: i64, topic_id: i32) -> Result<TopicRecord, StorageError> {
            self.inner.bind(user_id, topic_id).await
        }

        async fn latest_for_user(
            &self,
            user_id: i64,
        ) -> Result<Option<TopicRecord>, StorageError> {
            self.lookups.fetch_add(1, Ordering::SeqCst);
            self.inner.latest_for_user(user_id).await
        }

        async fn latest_for_topic(
            &self,
            topic_id: i32,
        ) -> Result<Option<TopicRecord>, StorageError> {
            self.inner.latest_for_topic(topic_id).await
        }

        async fn history_for_user(&self, user_id: i64) -> Result<Vec<TopicRecord>, StorageError> {
            self.inner.history_for_user(user_id).await
        }
    }

    async fn counting_directory() -> Arc<CountingDirectory> {
        Arc::new(CountingDirectory {
            inner: TopicRepository::new("sqlite::memory:").await.unwrap(),
            lookups: AtomicUsize::new(0),
        })
    }

    #[tokio::test]
    async fn test_resolve_unknown_user_is_none() {
        let directory = counting_directory().await;
        let resolver = RoutingResolver::new(directory.clone());

        assert_eq!(resolver.resolve_topic(1, None).await.unwrap(), None);
        assert!(resolver.cache().is_empty().await);
    }

    #[tokio::test]
    async fn test_hint_short_circuits_directory() {
        let directory = counting_directory().await;
        let resolver = RoutingResolver::new(directory.clone());

        assert_eq!(resolver.resolve_topic(1, Some(99)).await.unwrap(), Some(99));
        assert_eq!(directory.lookups.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn test_read_through_cache() {
        let directory = counting_directory().await;
        directory.bind(1, 10).await.unwrap();
        directory.bind(1, 11).await.unwrap();
        let resolver = RoutingResolver::new(directory.clone());

        assert_eq!(resolver.resolve_topic(1, None).await.unwrap(), Some(11));
        assert_eq!(resolver.resolve_topic(1, None).await.unwrap(), Some(11));
        assert_eq!(directory.lookups.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn test_invalidate_forces_directory_lookup() {
        let directory = counting_directory().await;
        directory.bind(1, 10).await.unwrap();
        let resolver = RoutingResolver::new(directory.clone());

        resolver.resolve_topic(1, None).await.unwrap();
        resolver.invalidate(1).await;
        resolver.resolve_topic(1, None).await.unwrap();

        assert_eq!(directory.lookups.load(Ordering::SeqCst), 2);
    }

    #[tokio::test]
    async fn test_bind_updates_directory_and_cache() {
        let directory = counting_directory().await;
        let resolver = RoutingResolver::new(directory.clone());

        resolver.bind(1, 20).await.unwrap();

        assert_eq!(resolver.cache().get(1).await, Some(20));
        assert_eq!(resolver.resolve_topic(1, None).await.unwrap(), Some(20));
        assert_eq!(directory.lookups.load(Ordering::SeqCst), 0);
        assert_eq!(resolver.user_for_topic(20).await.unwrap(), Some(1));
        assert_eq!(resolver.user_for_topic(21).await.unwrap(), None);
    }

    #[tokio::test]
    async fn test_cache_holds_one_entry_per_user() {
        let cache = TopicCache::new();

        cache.put(1, 10).await;
        cache.put(1, 11).await;
        cache.put(2, 20).await;

        assert_eq!(cache.len().await, 2);
        assert_eq!(cache.get(1).await, Some(11));
    }
}
