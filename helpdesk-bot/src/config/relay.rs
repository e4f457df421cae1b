//! Relay config: the forum group hosting topics and the texts catalogue.

use anyhow::{Context, Result};
use std::env;
use std::path::PathBuf;

use crate::l10n::Texts;

#[derive(Debug, Clone)]
pub struct RelayConfig {
    /// FORUM_CHAT_ID: supergroup with topics enabled.
    pub forum_chat_id: i64,
    /// TEXTS_FILE: optional JSON overriding the default texts.
    pub texts_file: Option<PathBuf>,
    pub texts: Texts,
}

impl RelayConfig {
    pub fn from_env() -> Result<Self> {
        let forum_chat_id = env::var("FORUM_CHAT_ID")
            .map_err(|_| anyhow::anyhow!("FORUM_CHAT_ID not set"))?
            .trim()
            .parse::<i64>()
            .context("FORUM_CHAT_ID must be an integer chat id")?;
        let texts_file = env::var("TEXTS_FILE")
            .ok()
            .filter(|s| !s.trim().is_empty())
            .map(PathBuf::from);
        let texts = match &texts_file {
            Some(path) => Texts::from_file(path)?,
            None => Texts::default(),
        };

        Ok(Self {
            forum_chat_id,
            texts_file,
            texts,
        })
    }

    /// Supergroup ids are negative; a positive id points at a user, not a forum.
    pub fn validate(&self) -> Result<()> {
        if self.forum_chat_id >= 0 {
            anyhow::bail!(
                "FORUM_CHAT_ID must be a supergroup id (negative), got {}",
                self.forum_chat_id
            );
        }
        Ok(())
    }
}
