//! Message link repository: persistence and directional lookups for relayed messages.

use async_trait::async_trait;
use tracing::{debug, info};

use crate::error::StorageError;
use crate::models::{LinkSide, MessageLink};
use crate::repository::MessageLinkStore;
use crate::sqlite_pool::SqlitePoolManager;

#[derive(Clone)]
pub struct MessageLinkRepository {
    pool_manager: SqlitePoolManager,
}

impl MessageLinkRepository {
    pub async fn new(database_url: &str) -> Result<Self, StorageError> {
        let pool_manager = SqlitePoolManager::new(database_url).await?;
        Self::with_pool(pool_manager).await
    }

    pub async fn with_pool(pool_manager: SqlitePoolManager) -> Result<Self, StorageError> {
        let repo = Self { pool_manager };
        repo.init().await?;
        Ok(repo)
    }

    async fn init(&self) -> Result<(), StorageError> {
        info!("Creating messages table if not exist");

        let pool = self.pool_manager.pool();

        sqlx::query(
            r#"
            CREATE TABLE IF NOT EXISTS messages (
                id TEXT PRIMARY KEY,
                from_chat_id INTEGER NOT NULL,
                from_message_id INTEGER NOT NULL,
                to_chat_id INTEGER NOT NULL,
                to_message_id INTEGER NOT NULL,
                created_at TEXT NOT NULL,
                CONSTRAINT unique_messages_ids_combinations
                    UNIQUE (from_chat_id, from_message_id, to_chat_id, to_message_id)
            )
            "#,
        )
        .execute(pool)
        .await?;

        sqlx::query(
            "CREATE INDEX IF NOT EXISTS idx_messages_from ON messages(from_chat_id, from_message_id)",
        )
        .execute(pool)
        .await?;
        sqlx::query(
            "CREATE INDEX IF NOT EXISTS idx_messages_to ON messages(to_chat_id, to_message_id)",
        )
        .execute(pool)
        .await?;

        Ok(())
    }
}

#[async_trait]
impl MessageLinkStore for MessageLinkRepository {
    async fn record(
        &self,
        from_chat_id: i64,
        from_message_id: i32,
        to_chat_id: i64,
        to_message_id: i32,
    ) -> Result<MessageLink, StorageError> {
        let link = MessageLink::new(from_chat_id, from_message_id, to_chat_id, to_message_id);

        sqlx::query(
            r#"
            INSERT INTO messages (id, from_chat_id, from_message_id, to_chat_id, to_message_id, created_at)
            VALUES (?, ?, ?, ?, ?, ?)
            "#,
        )
        .bind(&link.id)
        .bind(link.from_chat_id)
        .bind(link.from_message_id)
        .bind(link.to_chat_id)
        .bind(link.to_message_id)
        .bind(link.created_at)
        .execute(self.pool_manager.pool())
        .await?;

        info!(
            from_chat_id,
            from_message_id, to_chat_id, to_message_id, "Saved message link"
        );
        Ok(link)
    }

    async fn find(
        &self,
        chat_id: i64,
        message_id: i32,
        side: LinkSide,
    ) -> Result<Option<MessageLink>, StorageError> {
        let sql = match side {
            LinkSide::From => {
                "SELECT id, from_chat_id, from_message_id, to_chat_id, to_message_id, created_at
                 FROM messages WHERE from_chat_id = ? AND from_message_id = ?
                 ORDER BY created_at DESC, rowid DESC LIMIT 1"
            }
            LinkSide::To => {
                "SELECT id, from_chat_id, from_message_id, to_chat_id, to_message_id, created_at
                 FROM messages WHERE to_chat_id = ? AND to_message_id = ?
                 ORDER BY created_at DESC, rowid DESC LIMIT 1"
            }
        };

        let link = sqlx::query_as::<_, MessageLink>(sql)
            .bind(chat_id)
            .bind(message_id)
            .fetch_optional(self.pool_manager.pool())
            .await?;

        debug!(chat_id, message_id, side = ?side, found = link.is_some(), "Looked up message link");
        Ok(link)
    }
}
