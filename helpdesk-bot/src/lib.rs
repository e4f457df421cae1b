//! # Helpdesk relay bot
//!
//! Each user's private chat with the bot is mirrored into a dedicated topic of a forum group.
//! Staff answers inside the topic are copied back, and edits on either side are re-applied
//! to the counterpart. Wires relay-core, relay-telegram and storage; loads config from env.

pub mod cli;
pub mod components;
pub mod config;
pub mod l10n;
pub mod relay;
pub mod runner;

pub use cli::{load_config, print_topics, topic_history_lines, Cli, Commands};
pub use components::{build_bot_components, open_stores, BotComponents};
pub use config::{BaseConfig, BotConfig, RelayConfig};
pub use l10n::Texts;
pub use relay::{
    EditOutcome, EditPropagator, RelayContext, RelayEngine, RoutingResolver, TopicCache, UserLocks,
};
pub use runner::{run_bot, ChatRole, HelpdeskBot};
