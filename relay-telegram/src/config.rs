//! Minimal Telegram connection config: token and optional Bot API URL.

use anyhow::Result;

pub struct TelegramConfig {
    pub bot_token: String,
    pub telegram_api_url: Option<String>,
}

impl TelegramConfig {
    /// Builds with the given token and the default Bot API URL.
    pub fn with_token(bot_token: String) -> Self {
        Self {
            bot_token,
            telegram_api_url: None,
        }
    }

    /// Creates the teloxide bot, pointing it at `telegram_api_url` when set.
    pub fn build_bot(&self) -> Result<teloxide::Bot> {
        let bot = teloxide::Bot::new(self.bot_token.clone());
        match &self.telegram_api_url {
            Some(url) => {
                let url = reqwest::Url::parse(url)
                    .map_err(|e| anyhow::anyhow!("Invalid Telegram API URL {}: {}", url, e))?;
                Ok(bot.set_api_url(url))
            }
            None => Ok(bot),
        }
    }
}
