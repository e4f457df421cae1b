//! Wraps teloxide::Bot and implements [`relay_core::Transport`]. Production code talks to
//! Telegram; tests substitute another Transport impl.

use async_trait::async_trait;
use relay_core::{ChatTarget, MediaEdit, MediaKind, Transport, TransportError, TransportResult};
use teloxide::prelude::*;
use teloxide::types::{
    ChatId, FileId, InputFile, InputMedia, InputMediaAnimation, InputMediaAudio,
    InputMediaDocument, InputMediaPhoto, InputMediaVideo, MessageEntity, MessageId,
    ReplyParameters, ThreadId,
};
use teloxide::{ApiError, RequestError};
use tracing::debug;

/// Error descriptions Telegram uses when a forum thread is gone.
const THREAD_GONE_MARKERS: [&str; 2] = ["message thread not found", "topic_deleted"];

/// Maps a teloxide request failure onto [`TransportError`], recognizing a missing forum thread.
pub fn classify_request_error(err: RequestError) -> TransportError {
    match err {
        RequestError::Api(api) => classify_api_error(&api),
        RequestError::Network(e) => TransportError::Network(e.to_string()),
        other => TransportError::Api(other.to_string()),
    }
}

fn classify_api_error(api: &ApiError) -> TransportError {
    let description = api.to_string();
    let lowered = description.to_lowercase();
    if THREAD_GONE_MARKERS.iter().any(|m| lowered.contains(m)) {
        TransportError::ThreadNotFound
    } else {
        TransportError::Api(description)
    }
}

fn reply_parameters(message_id: i32) -> ReplyParameters {
    ReplyParameters::new(MessageId(message_id)).allow_sending_without_reply()
}

/// Applies caption and caption entities only when the edited message has a caption.
macro_rules! captioned {
    ($media:expr, $caption:expr, $entities:expr) => {{
        let media = $media;
        match $caption {
            Some(caption) => media.caption(caption).caption_entities($entities),
            None => media,
        }
    }};
}

fn input_media(media: &MediaEdit) -> InputMedia {
    let file = InputFile::file_id(FileId(media.file_id.clone()));
    let caption = media.caption.clone();
    let entities = media.caption_entities.clone();

    match media.kind {
        MediaKind::Animation => {
            InputMedia::Animation(captioned!(InputMediaAnimation::new(file), caption, entities))
        }
        MediaKind::Audio => {
            InputMedia::Audio(captioned!(InputMediaAudio::new(file), caption, entities))
        }
        MediaKind::Document => {
            InputMedia::Document(captioned!(InputMediaDocument::new(file), caption, entities))
        }
        MediaKind::Photo => {
            InputMedia::Photo(captioned!(InputMediaPhoto::new(file), caption, entities))
        }
        MediaKind::Video => {
            InputMedia::Video(captioned!(InputMediaVideo::new(file), caption, entities))
        }
    }
}

/// Thin wrapper around teloxide::Bot that implements relay-core's Transport trait.
#[derive(Clone)]
pub struct TelegramTransport {
    bot: teloxide::Bot,
}

impl TelegramTransport {
    pub fn new(bot: teloxide::Bot) -> Self {
        Self { bot }
    }

    /// Returns the underlying teloxide::Bot for direct API use when needed.
    pub fn inner(&self) -> &teloxide::Bot {
        &self.bot
    }
}

#[async_trait]
impl Transport for TelegramTransport {
    async fn copy_message(
        &self,
        to: ChatTarget,
        from_chat_id: i64,
        message_id: i32,
        reply_to: Option<i32>,
    ) -> TransportResult<i32> {
        let mut request =
            self.bot
                .copy_message(ChatId(to.chat_id), ChatId(from_chat_id), MessageId(message_id));
        if let Some(thread_id) = to.thread_id {
            request = request.message_thread_id(ThreadId(MessageId(thread_id)));
        }
        if let Some(reply_to) = reply_to {
            request = request.reply_parameters(reply_parameters(reply_to));
        }

        let copied = request.await.map_err(classify_request_error)?;
        debug!(
            to_chat_id = to.chat_id,
            thread_id = ?to.thread_id,
            copied_id = copied.0,
            "Copied message"
        );
        Ok(copied.0)
    }

    async fn create_forum_topic(&self, chat_id: i64, name: &str) -> TransportResult<i32> {
        let topic = self
            .bot
            .create_forum_topic(ChatId(chat_id), name)
            .await
            .map_err(classify_request_error)?;
        Ok(topic.thread_id.0 .0)
    }

    async fn send_text(&self, to: ChatTarget, text: &str) -> TransportResult<i32> {
        let mut request = self.bot.send_message(ChatId(to.chat_id), text);
        if let Some(thread_id) = to.thread_id {
            request = request.message_thread_id(ThreadId(MessageId(thread_id)));
        }
        let sent = request.await.map_err(classify_request_error)?;
        Ok(sent.id.0)
    }

    async fn reply_text(&self, chat_id: i64, reply_to: i32, text: &str) -> TransportResult<()> {
        self.bot
            .send_message(ChatId(chat_id), text)
            .reply_parameters(reply_parameters(reply_to))
            .await
            .map_err(classify_request_error)?;
        Ok(())
    }

    async fn edit_text(
        &self,
        chat_id: i64,
        message_id: i32,
        text: &str,
        entities: &[MessageEntity],
    ) -> TransportResult<()> {
        self.bot
            .edit_message_text(ChatId(chat_id), MessageId(message_id), text)
            .entities(entities.to_vec())
            .await
            .map_err(classify_request_error)?;
        Ok(())
    }

    async fn edit_media(
        &self,
        chat_id: i64,
        message_id: i32,
        media: &MediaEdit,
    ) -> TransportResult<()> {
        self.bot
            .edit_message_media(ChatId(chat_id), MessageId(message_id), input_media(media))
            .await
            .map_err(classify_request_error)?;
        Ok(())
    }
}
