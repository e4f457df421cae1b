//! Topic binding model. Maps to the `topics` table.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Binding between a user and a forum thread. A user may own several over time; the newest wins.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, sqlx::FromRow)]
pub struct TopicRecord {
    pub id: String,
    pub user_id: i64,
    pub topic_id: i32,
    pub created_at: DateTime<Utc>,
}

impl TopicRecord {
    /// Creates a new record with a generated UUID and current timestamp.
    pub fn new(user_id: i64, topic_id: i32) -> Self {
        Self {
            id: Uuid::new_v4().to_string(),
            user_id,
            topic_id,
            created_at: Utc::now(),
        }
    }
}
