//! Relay engine: copies messages between private chats and forum topics and records the links.
//!
//! User → group: resolve (or open) the user's topic, copy, recover once from a deleted topic.
//! Group → user: resolve the topic's user, copy back into the private chat.
//! Every failure ends in a log entry and, where the sender can act on it, a reply.

use std::sync::Arc;

use relay_core::{
    ChatTarget, EditOrigin, InboundMessage, RelayError, Result, Sender, Transport, TransportError,
};
use storage::{MessageLink, MessageLinkStore};
use tracing::{debug, error, info, instrument, warn};

use super::locks::UserLocks;
use super::routing::RoutingResolver;
use super::visitor_card::{topic_title, visitor_card};
use super::lookup_side;
use crate::l10n::Texts;

/// Per-message inputs supplied by the caller before relaying.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RelayContext {
    /// Topic already known for this interaction; used without re-validation.
    pub topic_hint: Option<i32>,
    /// Upstream failure; echoed to the sender instead of relaying.
    pub error: Option<String>,
    /// Message in the destination chat the copy should reply to.
    pub reply_to_message_id: Option<i32>,
}

pub struct RelayEngine {
    transport: Arc<dyn Transport>,
    resolver: Arc<RoutingResolver>,
    links: Arc<dyn MessageLinkStore>,
    texts: Arc<Texts>,
    forum_chat_id: i64,
    locks: UserLocks,
}

impl RelayEngine {
    pub fn new(
        transport: Arc<dyn Transport>,
        resolver: Arc<RoutingResolver>,
        links: Arc<dyn MessageLinkStore>,
        texts: Arc<Texts>,
        forum_chat_id: i64,
    ) -> Self {
        Self {
            transport,
            resolver,
            links,
            texts,
            forum_chat_id,
            locks: UserLocks::new(),
        }
    }

    pub fn forum_chat_id(&self) -> i64 {
        self.forum_chat_id
    }

    /// Builds the relay context for `message`: maps its reply target onto the other side.
    /// A lookup failure becomes the context's error annotation.
    pub async fn prepare_context(&self, message: &InboundMessage, origin: EditOrigin) -> RelayContext {
        let mut ctx = RelayContext::default();
        let Some(reply_to) = message.reply_to_message_id else {
            return ctx;
        };

        let side = lookup_side(origin);
        match self.links.find(message.chat_id, reply_to, side).await {
            Ok(Some(link)) => ctx.reply_to_message_id = Some(link.side(side.opposite()).1),
            Ok(None) => debug!(chat_id = message.chat_id, reply_to, "Reply target has no link"),
            Err(e) => {
                error!(error = %e, chat_id = message.chat_id, reply_to, "Failed to resolve reply target");
                ctx.error = Some(self.texts.storage_error.clone());
            }
        }
        ctx
    }

    /// Relays a private-chat message into the sender's topic.
    #[instrument(skip(self, message, ctx), fields(chat_id = message.chat_id, message_id = message.id))]
    pub async fn relay_to_group(
        &self,
        message: &InboundMessage,
        ctx: &RelayContext,
    ) -> Result<MessageLink> {
        if let Some(err) = &ctx.error {
            self.answer(message.chat_id, err).await;
            return Err(RelayError::Upstream(err.clone()));
        }

        if message.caption_too_long() {
            let len = message.caption_len().unwrap_or_default();
            info!(caption_len = len, "Caption too long, not relaying");
            self.reply(message.chat_id, message.id, &self.texts.caption_too_long)
                .await;
            return Err(RelayError::CaptionTooLong(len));
        }

        let sender = message.sender.as_ref().ok_or(RelayError::NoSender)?;
        let _guard = self.locks.lock(sender.id).await;

        let topic_id = match self.resolver.resolve_topic(sender.id, ctx.topic_hint).await {
            Ok(Some(topic_id)) => topic_id,
            Ok(None) => match self.open_topic(sender).await {
                Ok(topic_id) => topic_id,
                Err(e) => {
                    self.reply_failure(message, &e).await;
                    return Err(e);
                }
            },
            Err(e) => {
                error!(error = %e, user_id = sender.id, "Failed to resolve topic");
                self.reply(message.chat_id, message.id, &self.texts.storage_error)
                    .await;
                return Err(RelayError::Database(e.to_string()));
            }
        };

        let copied = match self
            .copy_to_topic(message, topic_id, ctx.reply_to_message_id)
            .await
        {
            Ok(copied) => copied,
            Err(TransportError::ThreadNotFound) => {
                warn!(user_id = sender.id, topic_id, "Topic is gone, opening a new one");
                self.resolver.invalidate(sender.id).await;

                let new_topic_id = match self.open_topic(sender).await {
                    Ok(topic_id) => topic_id,
                    Err(e) => {
                        self.reply_failure(message, &e).await;
                        return Err(e);
                    }
                };

                // The reply target lives in the old topic, so the retry is sent without it.
                match self.copy_to_topic(message, new_topic_id, None).await {
                    Ok(copied) => copied,
                    Err(e) => {
                        let e = RelayError::from(e);
                        error!(error = %e, user_id = sender.id, topic_id = new_topic_id, "Retry after topic recreation failed");
                        self.reply_failure(message, &e).await;
                        return Err(e);
                    }
                }
            }
            Err(e) => {
                let e = RelayError::from(e);
                error!(error = %e, user_id = sender.id, topic_id, "Failed to send message from private chat to forum group");
                self.reply_failure(message, &e).await;
                return Err(e);
            }
        };

        self.record_link(message.chat_id, message.id, self.forum_chat_id, copied)
            .await
    }

    /// Relays a staff message from a topic back to the topic's user.
    /// Returns `Ok(None)` when the message is not in a user topic.
    #[instrument(skip(self, message, ctx), fields(thread_id = ?message.thread_id, message_id = message.id))]
    pub async fn relay_to_user(
        &self,
        message: &InboundMessage,
        ctx: &RelayContext,
    ) -> Result<Option<MessageLink>> {
        let Some(topic_id) = message.thread_id else {
            return Ok(None);
        };

        if let Some(err) = &ctx.error {
            self.reply(message.chat_id, message.id, err).await;
            return Err(RelayError::Upstream(err.clone()));
        }

        let user_id = match self.resolver.user_for_topic(topic_id).await {
            Ok(Some(user_id)) => user_id,
            Ok(None) => {
                debug!(topic_id, "Topic is not bound to a user, ignoring");
                return Ok(None);
            }
            Err(e) => {
                error!(error = %e, topic_id, "Failed to resolve topic owner");
                self.reply(message.chat_id, message.id, &self.texts.storage_error)
                    .await;
                return Err(RelayError::Database(e.to_string()));
            }
        };

        if message.caption_too_long() {
            let len = message.caption_len().unwrap_or_default();
            self.reply(message.chat_id, message.id, &self.texts.caption_too_long)
                .await;
            return Err(RelayError::CaptionTooLong(len));
        }

        let copied = match self
            .transport
            .copy_message(
                ChatTarget::chat(user_id),
                message.chat_id,
                message.id,
                ctx.reply_to_message_id,
            )
            .await
        {
            Ok(copied) => copied,
            Err(e) => {
                error!(error = %e, user_id, topic_id, "Failed to send message from forum group to private chat");
                self.reply(message.chat_id, message.id, &self.texts.error_from_group_to_pm)
                    .await;
                return Err(e.into());
            }
        };

        self.record_link(user_id, copied, message.chat_id, message.id)
            .await
            .map(Some)
    }

    /// Tells the sender their content type cannot be relayed.
    pub async fn reject_unsupported(&self, message: &InboundMessage) -> RelayError {
        self.reply(message.chat_id, message.id, &self.texts.non_forwardable_type)
            .await;
        RelayError::UnsupportedContent
    }

    /// Creates a topic for the sender, persists the binding and posts the visitor card.
    async fn open_topic(&self, sender: &Sender) -> Result<i32> {
        let title = topic_title(sender);
        let topic_id = self
            .transport
            .create_forum_topic(self.forum_chat_id, &title)
            .await
            .map_err(|e| {
                error!(error = %e, user_id = sender.id, "Failed to create forum topic");
                RelayError::from(e)
            })?;

        self.resolver.bind(sender.id, topic_id).await.map_err(|e| {
            error!(error = %e, user_id = sender.id, topic_id, "Failed to persist topic binding");
            RelayError::Database(e.to_string())
        })?;

        info!(user_id = sender.id, topic_id, title = %title, "Opened topic");
        self.post_visitor_card(topic_id, sender).await;
        Ok(topic_id)
    }

    /// Fire-and-forget: a failed card is logged and the relay continues.
    async fn post_visitor_card(&self, topic_id: i32, sender: &Sender) {
        let card = visitor_card(&self.texts, sender);
        if let Err(e) = self
            .transport
            .send_text(ChatTarget::thread(self.forum_chat_id, topic_id), &card)
            .await
        {
            error!(error = %e, user_id = sender.id, topic_id, "Failed to send visitor card");
        }
    }

    async fn copy_to_topic(
        &self,
        message: &InboundMessage,
        topic_id: i32,
        reply_to: Option<i32>,
    ) -> std::result::Result<i32, TransportError> {
        self.transport
            .copy_message(
                ChatTarget::thread(self.forum_chat_id, topic_id),
                message.chat_id,
                message.id,
                reply_to,
            )
            .await
    }

    async fn record_link(
        &self,
        from_chat_id: i64,
        from_message_id: i32,
        to_chat_id: i64,
        to_message_id: i32,
    ) -> Result<MessageLink> {
        self.links
            .record(from_chat_id, from_message_id, to_chat_id, to_message_id)
            .await
            .map_err(|e| {
                error!(
                    error = %e,
                    from_chat_id, from_message_id, to_chat_id, to_message_id,
                    "Message relayed but its link was not saved"
                );
                RelayError::Database(e.to_string())
            })
    }

    async fn reply_failure(&self, message: &InboundMessage, err: &RelayError) {
        let text = match err {
            RelayError::Database(_) => &self.texts.storage_error,
            _ => &self.texts.error_from_pm_to_group,
        };
        self.reply(message.chat_id, message.id, text).await;
    }

    async fn reply(&self, chat_id: i64, reply_to: i32, text: &str) {
        if let Err(e) = self.transport.reply_text(chat_id, reply_to, text).await {
            warn!(error = %e, chat_id, reply_to, "Failed to send reply");
        }
    }

    async fn answer(&self, chat_id: i64, text: &str) {
        if let Err(e) = self.transport.send_text(ChatTarget::chat(chat_id), text).await {
            warn!(error = %e, chat_id, "Failed to send answer");
        }
    }
}
