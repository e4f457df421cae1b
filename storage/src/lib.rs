//! Storage crate: topic bindings and message links, persisted in SQLite.
//!
//! ## Modules
//!
//! - [`error`] – Storage error types
//! - [`models`] – TopicRecord, MessageLink, LinkSide
//! - [`repository`] – TopicDirectory and MessageLinkStore traits
//! - [`topic_repo`] – TopicRepository (SQLite)
//! - [`link_repo`] – MessageLinkRepository (SQLite)
//! - [`sqlite_pool`] – SqlitePoolManager
//!
//! Both tables are append-only: records are inserted and queried, never updated or deleted.

mod error;
mod link_repo;
mod models;
mod repository;
mod sqlite_pool;
mod topic_repo;

pub use error::StorageError;
pub use link_repo::MessageLinkRepository;
pub use models::{LinkSide, MessageLink, TopicRecord};
pub use repository::{MessageLinkStore, TopicDirectory};
pub use sqlite_pool::SqlitePoolManager;
pub use topic_repo::TopicRepository;
