//! Bot configuration: BaseConfig (Telegram + log + DB) + RelayConfig (forum group, texts).

mod base;
mod bot_config;
mod relay;


pub use base::{database_url_from_env, BaseConfig, DEFAULT_DATABASE_URL};
pub use bot_config::BotConfig;
pub use relay::RelayConfig;
