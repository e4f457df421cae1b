//! # relay-core
//!
//! Core types and traits for the helpdesk relay: [`Transport`], inbound/edited message types,
//! edit content and direction tags, error types, and tracing initialization.
//! Transport-agnostic; used by relay-telegram and helpdesk-bot.

pub mod error;
pub mod logger;
pub mod transport;
pub mod types;

pub use error::{RelayError, Result, TransportError, TransportResult};
pub use logger::init_tracing;
pub use transport::{ChatTarget, Transport};
pub use types::{
    ContentClass, EditContent, EditOrigin, EditedMessage, InboundMessage, MediaEdit, MediaKind,
    Sender, ToRelayMessage, ToSender, MAX_CAPTION_LEN,
};
