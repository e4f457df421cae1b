//! Component factory: builds BotComponents from config. Isolates assembly logic from runner.

use anyhow::Result;
use relay_core::Transport;
use relay_telegram::TelegramTransport;
use std::sync::Arc;
use storage::{
    MessageLinkRepository, MessageLinkStore, SqlitePoolManager, TopicDirectory, TopicRepository,
};
use tracing::{error, info, instrument};

use crate::config::BotConfig;
use crate::l10n::Texts;
use crate::relay::{EditPropagator, RelayEngine, RoutingResolver};

/// Shared dependencies of the dispatcher and the message handlers.
#[derive(Clone)]
pub struct BotComponents {
    pub teloxide_bot: teloxide::Bot,
    pub transport: Arc<dyn Transport>,
    pub topics: Arc<dyn TopicDirectory>,
    pub links: Arc<dyn MessageLinkStore>,
    pub resolver: Arc<RoutingResolver>,
    pub engine: Arc<RelayEngine>,
    pub editor: Arc<EditPropagator>,
    pub texts: Arc<Texts>,
}

/// Opens both repositories on one pool.
#[instrument]
pub async fn open_stores(
    database_url: &str,
) -> Result<(Arc<TopicRepository>, Arc<MessageLinkRepository>)> {
    let pool = SqlitePoolManager::new(database_url).await.map_err(|e| {
        error!(error = %e, database_url = %database_url, "Failed to open database");
        anyhow::anyhow!("Failed to open database: {}", e)
    })?;

    let topics = TopicRepository::with_pool(pool.clone()).await.map_err(|e| {
        error!(error = %e, "Failed to initialize topic storage");
        anyhow::anyhow!("Failed to initialize topic storage: {}", e)
    })?;
    let links = MessageLinkRepository::with_pool(pool).await.map_err(|e| {
        error!(error = %e, "Failed to initialize message link storage");
        anyhow::anyhow!("Failed to initialize message link storage: {}", e)
    })?;

    Ok((Arc::new(topics), Arc::new(links)))
}

/// Builds BotComponents. `transport_override` replaces the teloxide transport (tests).
#[instrument(skip(config, transport_override))]
pub async fn build_bot_components(
    config: &BotConfig,
    transport_override: Option<Arc<dyn Transport>>,
) -> Result<BotComponents> {
    let (topic_repo, link_repo) = open_stores(config.database_url()).await?;
    let topics: Arc<dyn TopicDirectory> = topic_repo;
    let links: Arc<dyn MessageLinkStore> = link_repo;

    let teloxide_bot = config.base().telegram().build_bot()?;
    let transport: Arc<dyn Transport> = match transport_override {
        Some(t) => t,
        None => Arc::new(TelegramTransport::new(teloxide_bot.clone())),
    };

    let texts = Arc::new(config.relay().texts.clone());
    let resolver = Arc::new(RoutingResolver::new(topics.clone()));
    let engine = Arc::new(RelayEngine::new(
        transport.clone(),
        resolver.clone(),
        links.clone(),
        texts.clone(),
        config.forum_chat_id(),
    ));
    let editor = Arc::new(EditPropagator::new(transport.clone(), links.clone()));

    info!(forum_chat_id = config.forum_chat_id(), "Bot components ready");

    Ok(BotComponents {
        teloxide_bot,
        transport,
        topics,
        links,
        resolver,
        engine,
        editor,
        texts,
    })
}
