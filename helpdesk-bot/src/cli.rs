//! CLI parser and config loading.

use anyhow::Result;
use clap::{Parser, Subcommand};
use storage::TopicDirectory;

use crate::components::open_stores;
use crate::config::{database_url_from_env, BotConfig};

#[derive(Parser)]
#[command(name = "helpdesk-bot")]
#[command(about = "Relays private chats into forum topics", long_about = None)]
#[command(version)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Run the relay bot (config from env; token can override BOT_TOKEN).
    Run {
        #[arg(short, long)]
        token: Option<String>,
    },
    /// Print the topic history of a user, newest first (DATABASE_URL from env).
    Topics {
        user_id: i64,
    },
}

/// Load BotConfig from environment. If `token` is provided it overrides BOT_TOKEN.
pub fn load_config(token: Option<String>) -> Result<BotConfig> {
    BotConfig::load(token)
}

/// Lines printed by `topics`: `<topic_id>\t<created_at>` per binding, newest first.
pub async fn topic_history_lines(database_url: &str, user_id: i64) -> Result<Vec<String>> {
    let (topics, _) = open_stores(database_url).await?;
    let history = topics.history_for_user(user_id).await?;
    Ok(history
        .iter()
        .map(|r| format!("{}\t{}", r.topic_id, r.created_at.to_rfc3339()))
        .collect())
}

pub async fn print_topics(user_id: i64) -> Result<()> {
    let lines = topic_history_lines(&database_url_from_env(), user_id).await?;
    if lines.is_empty() {
        println!("No topics for user {}", user_id);
    }
    for line in lines {
        println!("{}", line);
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_run_with_token() {
        let cli = Cli::parse_from(["helpdesk-bot", "run", "--token", "abc"]);
        match cli.command {
            Commands::Run { token } => assert_eq!(token.as_deref(), Some("abc")),
            _ => panic!("expected run"),
        }
    }

    #[test]
    fn test_parse_topics() {
        let cli = Cli::parse_from(["helpdesk-bot", "topics", "42"]);
        match cli.command {
            Commands::Topics { user_id } => assert_eq!(user_id, 42),
            _ => panic!("expected topics"),
        }
    }

    #[tokio::test]
    async fn test_topic_history_lines_newest_first() {
        let dir = tempfile::tempdir().unwrap();
        let url = format!("sqlite:{}", dir.path().join("topics.db").display());

        let (topics, _) = open_stores(&url).await.unwrap();
        topics.bind(42, 10).await.unwrap();
        topics.bind(42, 11).await.unwrap();
        drop(topics);

        let lines = topic_history_lines(&url, 42).await.unwrap();
        assert_eq!(lines.len(), 2);
        assert!(lines[0].starts_with("11\t"));
        assert!(lines[1].starts_with("10\t"));
        assert!(topic_history_lines(&url, 7).await.unwrap().is_empty());
    }
}
