//! Message link model. Maps to the `messages` table.
//!
//! The private-chat side of a relayed pair is stored as `from_*`, the forum side as `to_*`,
//! whichever direction the message travelled.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Which half of a link a lookup key refers to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum LinkSide {
    From,
    To,
}

impl LinkSide {
    pub fn opposite(self) -> Self {
        match self {
            LinkSide::From => LinkSide::To,
            LinkSide::To => LinkSide::From,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, sqlx::FromRow)]
pub struct MessageLink {
    pub id: String,
    pub from_chat_id: i64,
    pub from_message_id: i32,
    pub to_chat_id: i64,
    pub to_message_id: i32,
    pub created_at: DateTime<Utc>,
}

impl MessageLink {
    /// Creates a new link with a generated UUID and current timestamp.
    pub fn new(from_chat_id: i64, from_message_id: i32, to_chat_id: i64, to_message_id: i32) -> Self {
        Self {
            id: Uuid::new_v4().to_string(),
            from_chat_id,
            from_message_id,
            to_chat_id,
            to_message_id,
            created_at: Utc::now(),
        }
    }

    /// `(chat_id, message_id)` of the given side.
    pub fn side(&self, side: LinkSide) -> (i64, i32) {
        match side {
            LinkSide::From => (self.from_chat_id, self.from_message_id),
            LinkSide::To => (self.to_chat_id, self.to_message_id),
        }
    }
}
