//! Runner: classifies inbound updates by chat and drives the relay; wires the teloxide dispatcher.

use anyhow::Result;
use relay_core::{
    init_tracing, ContentClass, EditOrigin, EditedMessage, InboundMessage, RelayError,
    ToRelayMessage,
};
use relay_telegram::TelegramMessageWrapper;
use std::sync::Arc;
use storage::MessageLink;
use teloxide::prelude::*;
use tracing::{debug, error, info, instrument, warn};

use crate::components::{build_bot_components, BotComponents};
use crate::config::BotConfig;
use crate::relay::EditOutcome;

/// Which side of the relay a chat belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChatRole {
    /// A user's private chat with the bot.
    Private,
    /// The forum group hosting the topics.
    Forum,
    /// Anything else; ignored.
    Other,
}

/// HelpdeskBot: config and components. Entry point for every inbound update.
pub struct HelpdeskBot {
    pub config: BotConfig,
    pub components: BotComponents,
}

impl HelpdeskBot {
    pub fn new(config: BotConfig, components: BotComponents) -> Self {
        Self { config, components }
    }

    pub fn role_of(&self, chat_id: i64) -> ChatRole {
        if chat_id == self.config.forum_chat_id() {
            ChatRole::Forum
        } else if chat_id > 0 {
            ChatRole::Private
        } else {
            ChatRole::Other
        }
    }

    /// Handles one new message. Returns the recorded link when the message was relayed.
    ///
    /// Relay failures are logged here; replies to the sender were already sent by the engine.
    #[instrument(skip(self, message), fields(chat_id = message.chat_id, message_id = message.id))]
    pub async fn handle_message(&self, message: &InboundMessage) -> Option<MessageLink> {
        let role = self.role_of(message.chat_id);
        let origin = match role {
            ChatRole::Private => EditOrigin::User,
            ChatRole::Forum if message.thread_id.is_some() => EditOrigin::Group,
            ChatRole::Forum => {
                debug!("Message outside any topic, ignoring");
                return None;
            }
            ChatRole::Other => {
                debug!("Message from unrelated chat, ignoring");
                return None;
            }
        };

        match message.class {
            ContentClass::Service => {
                debug!("Service message, ignoring");
                return None;
            }
            ContentClass::Unsupported => {
                let e = self.components.engine.reject_unsupported(message).await;
                info!(error = %e, "Rejected message");
                return None;
            }
            ContentClass::Forwardable => {}
        }

        let engine = &self.components.engine;
        let ctx = engine.prepare_context(message, origin).await;
        let result = match origin {
            EditOrigin::User => engine.relay_to_group(message, &ctx).await.map(Some),
            EditOrigin::Group => engine.relay_to_user(message, &ctx).await,
        };

        match result {
            Ok(link) => link,
            Err(e @ (RelayError::CaptionTooLong(_) | RelayError::Upstream(_))) => {
                info!(error = %e, "Message not relayed");
                None
            }
            Err(e) => {
                error!(error = %e, "Relay failed");
                None
            }
        }
    }

    /// Handles one edited message. Returns `None` for chats outside the relay or on failure.
    #[instrument(skip(self, edit), fields(chat_id = edit.chat_id, message_id = edit.message_id))]
    pub async fn handle_edit(&self, edit: &EditedMessage) -> Option<EditOutcome> {
        let origin = match self.role_of(edit.chat_id) {
            ChatRole::Private => EditOrigin::User,
            ChatRole::Forum => EditOrigin::Group,
            ChatRole::Other => return None,
        };

        match self.components.editor.propagate(edit, origin).await {
            Ok(outcome) => {
                debug!(?outcome, "Edit handled");
                Some(outcome)
            }
            Err(e) => {
                warn!(error = %e, "Edit propagation failed");
                None
            }
        }
    }
}

async fn on_message(msg: Message, helpdesk: Arc<HelpdeskBot>) -> ResponseResult<()> {
    let inbound = TelegramMessageWrapper(&msg).to_inbound();
    helpdesk.handle_message(&inbound).await;
    Ok(())
}

async fn on_edited_message(msg: Message, helpdesk: Arc<HelpdeskBot>) -> ResponseResult<()> {
    let edit = TelegramMessageWrapper(&msg).to_edited();
    helpdesk.handle_edit(&edit).await;
    Ok(())
}

/// Main entry: validate config, init logging, build components, then long-poll until Ctrl-C.
#[instrument(skip(config))]
pub async fn run_bot(config: BotConfig) -> Result<()> {
    config.validate()?;
    init_tracing(config.log_file())?;

    info!(
        database_url = %config.database_url(),
        forum_chat_id = config.forum_chat_id(),
        "Initializing bot"
    );

    let components = build_bot_components(&config, None).await?;
    let teloxide_bot = components.teloxide_bot.clone();
    let helpdesk = Arc::new(HelpdeskBot::new(config, components));

    let handler = dptree::entry()
        .branch(Update::filter_message().endpoint(on_message))
        .branch(Update::filter_edited_message().endpoint(on_edited_message));

    info!("Bot started successfully");

    Dispatcher::builder(teloxide_bot, handler)
        .dependencies(dptree::deps![helpdesk])
        .enable_ctrlc_handler()
        .build()
        .dispatch()
        .await;

    info!("Bot stopped");
    Ok(())
}
