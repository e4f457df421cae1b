//! Core types: sender identity, inbound and edited messages, edit content and direction tags.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use teloxide::types::MessageEntity;

/// Captions longer than this are rejected before any relay attempt.
pub const MAX_CAPTION_LEN: usize = 1023;

/// Identity of the person who sent a message (shown on the visitor card and used for topic titles).
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Sender {
    pub id: i64,
    pub first_name: String,
    pub last_name: Option<String>,
    pub username: Option<String>,
    pub is_premium: bool,
    pub language_code: Option<String>,
}

impl Sender {
    /// First and last name joined by a space, as Telegram clients display it.
    pub fn full_name(&self) -> String {
        match &self.last_name {
            Some(last) if !last.is_empty() => format!("{} {}", self.first_name, last),
            _ => self.first_name.clone(),
        }
    }
}

/// Coarse classification of an inbound message's content.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub enum ContentClass {
    /// Content that can be copied to another chat.
    Forwardable,
    /// Service notifications (joins, pins, topic events); ignored.
    Service,
    /// Anything else; the sender is told it cannot be delivered.
    Unsupported,
}

/// A new (non-edited) message received from either side of the relay.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct InboundMessage {
    pub id: i32,
    pub chat_id: i64,
    /// Forum thread the message was posted in, if any.
    pub thread_id: Option<i32>,
    pub sender: Option<Sender>,
    pub class: ContentClass,
    pub caption: Option<String>,
    pub reply_to_message_id: Option<i32>,
    pub created_at: DateTime<Utc>,
}

impl InboundMessage {
    /// Caption length in Unicode scalar values, if the message has a caption.
    pub fn caption_len(&self) -> Option<usize> {
        self.caption.as_ref().map(|c| c.chars().count())
    }

    pub fn caption_too_long(&self) -> bool {
        self.caption_len().is_some_and(|len| len > MAX_CAPTION_LEN)
    }
}

/// Which side of the relay an edit came from. Selects the direction of the link lookup.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub enum EditOrigin {
    /// Edited in the user's private chat; the link is searched by its `from` side.
    User,
    /// Edited inside a forum topic; the link is searched by its `to` side.
    Group,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub enum MediaKind {
    Animation,
    Audio,
    Document,
    Photo,
    Video,
}

/// Replacement media for an edited message. `file_id` is reused as-is; nothing is re-uploaded.
#[derive(Debug, Clone, PartialEq)]
pub struct MediaEdit {
    pub kind: MediaKind,
    pub file_id: String,
    pub caption: Option<String>,
    pub caption_entities: Vec<MessageEntity>,
}

#[derive(Debug, Clone, PartialEq)]
pub enum EditContent {
    Text {
        text: String,
        entities: Vec<MessageEntity>,
    },
    Media(MediaEdit),
    /// Edits we cannot mirror (e.g. live locations); dropped.
    Unsupported,
}

/// An edit of a previously sent message.
#[derive(Debug, Clone, PartialEq)]
pub struct EditedMessage {
    pub chat_id: i64,
    pub message_id: i32,
    pub content: EditContent,
}

/// Converts a transport-specific user type to [`Sender`].
pub trait ToSender: Send + Sync {
    fn to_sender(&self) -> Sender;
}

/// Converts a transport-specific message into relay types.
pub trait ToRelayMessage: Send + Sync {
    fn to_inbound(&self) -> InboundMessage;
    fn to_edited(&self) -> EditedMessage;
}
