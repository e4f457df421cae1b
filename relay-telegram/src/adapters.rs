//! Adapters from Telegram (teloxide) types to relay_core types.
//! Depends only on teloxide and relay_core type definitions.

use relay_core::{
    ContentClass, EditContent, EditedMessage, InboundMessage, MediaEdit, MediaKind, Sender,
    ToRelayMessage, ToSender,
};
use teloxide::types::{MessageEntity, MessageKind};

/// Wraps a teloxide User for conversion to [`Sender`].
pub struct TelegramUserWrapper<'a>(pub &'a teloxide::types::User);

impl<'a> ToSender for TelegramUserWrapper<'a> {
    fn to_sender(&self) -> Sender {
        Sender {
            id: self.0.id.0 as i64,
            first_name: self.0.first_name.clone(),
            last_name: self.0.last_name.clone(),
            username: self.0.username.clone(),
            is_premium: self.0.is_premium,
            language_code: self.0.language_code.clone(),
        }
    }
}

/// Wraps a teloxide Message for conversion to [`InboundMessage`] / [`EditedMessage`].
pub struct TelegramMessageWrapper<'a>(pub &'a teloxide::types::Message);

impl<'a> ToRelayMessage for TelegramMessageWrapper<'a> {
    fn to_inbound(&self) -> InboundMessage {
        InboundMessage {
            id: self.0.id.0,
            chat_id: self.0.chat.id.0,
            thread_id: self.0.thread_id.map(|t| t.0 .0),
            sender: self
                .0
                .from
                .as_ref()
                .map(|u| TelegramUserWrapper(u).to_sender()),
            class: self.classify(),
            caption: self.0.caption().map(str::to_string),
            reply_to_message_id: self.reply_to_message_id(),
            created_at: self.0.date,
        }
    }

    fn to_edited(&self) -> EditedMessage {
        EditedMessage {
            chat_id: self.0.chat.id.0,
            message_id: self.0.id.0,
            content: self.edit_content(),
        }
    }
}

impl<'a> TelegramMessageWrapper<'a> {
    /// Topic messages implicitly reply to the topic's root message; that is not a real reply.
    fn reply_to_message_id(&self) -> Option<i32> {
        let reply_id = self.0.reply_to_message()?.id.0;
        match self.0.thread_id {
            Some(thread) if thread.0 .0 == reply_id => None,
            _ => Some(reply_id),
        }
    }

    /// Service messages are anything outside `MessageKind::Common`; common messages are
    /// forwardable when they carry one of the copyable content types.
    fn classify(&self) -> ContentClass {
        let msg = self.0;
        if !matches!(msg.kind, MessageKind::Common(_)) {
            return ContentClass::Service;
        }

        let forwardable = msg.text().is_some()
            || msg.photo().is_some()
            || msg.video().is_some()
            || msg.animation().is_some()
            || msg.audio().is_some()
            || msg.document().is_some()
            || msg.voice().is_some()
            || msg.video_note().is_some()
            || msg.sticker().is_some()
            || msg.contact().is_some()
            || msg.location().is_some()
            || msg.venue().is_some()
            || msg.dice().is_some()
            || msg.poll().is_some();

        if forwardable {
            ContentClass::Forwardable
        } else {
            ContentClass::Unsupported
        }
    }

    fn edit_content(&self) -> EditContent {
        let msg = self.0;

        if let Some(text) = msg.text() {
            return EditContent::Text {
                text: text.to_string(),
                entities: entities(msg.entities()),
            };
        }

        let media = if let Some(animation) = msg.animation() {
            Some((MediaKind::Animation, animation.file.id.0.clone()))
        } else if let Some(audio) = msg.audio() {
            Some((MediaKind::Audio, audio.file.id.0.clone()))
        } else if let Some(document) = msg.document() {
            Some((MediaKind::Document, document.file.id.0.clone()))
        } else if let Some(photo) = msg.photo().and_then(|sizes| sizes.last()) {
            Some((MediaKind::Photo, photo.file.id.0.clone()))
        } else if let Some(video) = msg.video() {
            Some((MediaKind::Video, video.file.id.0.clone()))
        } else {
            None
        };

        match media {
            Some((kind, file_id)) => EditContent::Media(MediaEdit {
                kind,
                file_id,
                caption: msg.caption().map(str::to_string),
                caption_entities: entities(msg.caption_entities()),
            }),
            None => EditContent::Unsupported,
        }
    }
}

fn entities(entities: Option<&[MessageEntity]>) -> Vec<MessageEntity> {
    entities.map(<[MessageEntity]>::to_vec).unwrap_or_default()
}
