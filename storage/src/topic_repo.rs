//! Topic repository: user → forum topic bindings.
//!
//! Uses SqlitePoolManager and [`TopicRecord`]; implements [`TopicDirectory`].

use async_trait::async_trait;
use tracing::{debug, info};

use crate::error::StorageError;
use crate::models::TopicRecord;
use crate::repository::TopicDirectory;
use crate::sqlite_pool::SqlitePoolManager;

#[derive(Clone)]
pub struct TopicRepository {
    pool_manager: SqlitePoolManager,
}

impl TopicRepository {
    pub async fn new(database_url: &str) -> Result<Self, StorageError> {
        let pool_manager = SqlitePoolManager::new(database_url).await?;
        Self::with_pool(pool_manager).await
    }

    /// Shares an existing pool (e.g. with [`crate::MessageLinkRepository`]) and creates the table.
    pub async fn with_pool(pool_manager: SqlitePoolManager) -> Result<Self, StorageError> {
        let repo = Self { pool_manager };
        repo.init().await?;
        Ok(repo)
    }

    async fn init(&self) -> Result<(), StorageError> {
        info!("Creating topics table if not exist");

        let pool = self.pool_manager.pool();

        sqlx::query(
            r#"
            CREATE TABLE IF NOT EXISTS topics (
                id TEXT PRIMARY KEY,
                user_id INTEGER NOT NULL,
                topic_id INTEGER NOT NULL,
                created_at TEXT NOT NULL,
                CONSTRAINT unique_topics_pairs UNIQUE (user_id, topic_id)
            )
            "#,
        )
        .execute(pool)
        .await?;

        sqlx::query("CREATE INDEX IF NOT EXISTS idx_topics_user_id ON topics(user_id)")
            .execute(pool)
            .await?;
        sqlx::query("CREATE INDEX IF NOT EXISTS idx_topics_topic_id ON topics(topic_id)")
            .execute(pool)
            .await?;

        Ok(())
    }
}

#[async_trait]
impl TopicDirectory for TopicRepository {
    async fn bind(&self, user_id: i64, topic_id: i32) -> Result<TopicRecord, StorageError> {
        let record = TopicRecord::new(user_id, topic_id);

        sqlx::query(
            "INSERT INTO topics (id, user_id, topic_id, created_at) VALUES (?, ?, ?, ?)",
        )
        .bind(&record.id)
        .bind(record.user_id)
        .bind(record.topic_id)
        .bind(record.created_at)
        .execute(self.pool_manager.pool())
        .await?;

        info!(user_id, topic_id, "Saved topic binding");
        Ok(record)
    }

    async fn latest_for_user(&self, user_id: i64) -> Result<Option<TopicRecord>, StorageError> {
        let record = sqlx::query_as::<_, TopicRecord>(
            "SELECT id, user_id, topic_id, created_at FROM topics
             WHERE user_id = ? ORDER BY created_at DESC, rowid DESC LIMIT 1",
        )
        .bind(user_id)
        .fetch_optional(self.pool_manager.pool())
        .await?;

        debug!(user_id, found = record.is_some(), "Looked up topic by user");
        Ok(record)
    }

    async fn latest_for_topic(&self, topic_id: i32) -> Result<Option<TopicRecord>, StorageError> {
        let record = sqlx::query_as::<_, TopicRecord>(
            "SELECT id, user_id, topic_id, created_at FROM topics
             WHERE topic_id = ? ORDER BY created_at DESC, rowid DESC LIMIT 1",
        )
        .bind(topic_id)
        .fetch_optional(self.pool_manager.pool())
        .await?;

        debug!(topic_id, found = record.is_some(), "Looked up user by topic");
        Ok(record)
    }

    async fn history_for_user(&self, user_id: i64) -> Result<Vec<TopicRecord>, StorageError> {
        let records = sqlx::query_as::<_, TopicRecord>(
            "SELECT id, user_id, topic_id, created_at FROM topics
             WHERE user_id = ? ORDER BY created_at DESC, rowid DESC",
        )
        .bind(user_id)
        .fetch_all(self.pool_manager.pool())
        .await?;

        Ok(records)
    }
}
