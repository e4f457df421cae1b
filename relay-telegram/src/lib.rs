//! # relay-telegram
//!
//! Telegram layer of the relay: adapters from teloxide messages to relay-core types,
//! [`relay_core::Transport`] implementation, minimal connection config.
//! No routing, persistence or relay policy lives here.

mod adapters;
mod config;
mod transport;

pub use adapters::{TelegramMessageWrapper, TelegramUserWrapper};
pub use config::TelegramConfig;
pub use transport::{classify_request_error, TelegramTransport};
