//! Query contracts for the relay's persistent state. [`TopicRepository`](crate::TopicRepository)
//! and [`MessageLinkRepository`](crate::MessageLinkRepository) provide the SQLite implementations.

use async_trait::async_trait;

use crate::error::StorageError;
use crate::models::{LinkSide, MessageLink, TopicRecord};

/// User → forum topic bindings.
#[async_trait]
pub trait TopicDirectory: Send + Sync {
    /// Appends a new binding. Fails with `AlreadyExists` if the exact pair is already stored.
    async fn bind(&self, user_id: i64, topic_id: i32) -> Result<TopicRecord, StorageError>;
    /// Most recently created binding for the user.
    async fn latest_for_user(&self, user_id: i64) -> Result<Option<TopicRecord>, StorageError>;
    /// Most recently created binding for the topic.
    async fn latest_for_topic(&self, topic_id: i32) -> Result<Option<TopicRecord>, StorageError>;
    /// Every binding of the user, newest first.
    async fn history_for_user(&self, user_id: i64) -> Result<Vec<TopicRecord>, StorageError>;
}

/// Bidirectional (chat, message) ↔ (chat, message) links.
#[async_trait]
pub trait MessageLinkStore: Send + Sync {
    /// Appends a link. Fails with `AlreadyExists` if the 4-tuple is already stored.
    async fn record(
        &self,
        from_chat_id: i64,
        from_message_id: i32,
        to_chat_id: i64,
        to_message_id: i32,
    ) -> Result<MessageLink, StorageError>;
    /// Finds the link whose `side` equals `(chat_id, message_id)`.
    async fn find(
        &self,
        chat_id: i64,
        message_id: i32,
        side: LinkSide,
    ) -> Result<Option<MessageLink>, StorageError>;
}
