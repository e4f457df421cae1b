//! Messaging transport abstraction.
//!
//! [`Transport`] is the narrow set of chat-API capabilities the relay consumes. relay-telegram
//! implements it via teloxide; tests substitute a recording mock.

use async_trait::async_trait;
use teloxide::types::MessageEntity;

use crate::error::TransportResult;
use crate::types::MediaEdit;

/// A chat, optionally narrowed to one forum thread.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ChatTarget {
    pub chat_id: i64,
    pub thread_id: Option<i32>,
}

impl ChatTarget {
    pub fn chat(chat_id: i64) -> Self {
        Self {
            chat_id,
            thread_id: None,
        }
    }

    pub fn thread(chat_id: i64, thread_id: i32) -> Self {
        Self {
            chat_id,
            thread_id: Some(thread_id),
        }
    }
}

#[async_trait]
pub trait Transport: Send + Sync {
    /// Copies `message_id` from `from_chat_id` into `to`. When `reply_to` is set the copy replies
    /// to it, and a missing reply target is tolerated. Returns the id of the new message.
    /// Fails with [`crate::TransportError::ThreadNotFound`] when the target thread is gone.
    async fn copy_message(
        &self,
        to: ChatTarget,
        from_chat_id: i64,
        message_id: i32,
        reply_to: Option<i32>,
    ) -> TransportResult<i32>;

    /// Creates a forum topic in `chat_id` and returns its thread id.
    async fn create_forum_topic(&self, chat_id: i64, name: &str) -> TransportResult<i32>;

    /// Sends plain text and returns the new message id.
    async fn send_text(&self, to: ChatTarget, text: &str) -> TransportResult<i32>;

    /// Sends plain text as a reply to `reply_to` in the same chat.
    async fn reply_text(&self, chat_id: i64, reply_to: i32, text: &str) -> TransportResult<()>;

    async fn edit_text(
        &self,
        chat_id: i64,
        message_id: i32,
        text: &str,
        entities: &[MessageEntity],
    ) -> TransportResult<()>;

    async fn edit_media(
        &self,
        chat_id: i64,
        message_id: i32,
        media: &MediaEdit,
    ) -> TransportResult<()>;
}
