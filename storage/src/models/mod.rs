//! Data models for storage (topic bindings and message links).

mod message_link;
mod topic_record;

pub use message_link::{LinkSide, MessageLink};
pub use topic_record::TopicRecord;
