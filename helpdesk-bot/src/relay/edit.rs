//! Re-applies edits to the counterpart of a relayed message.

use std::sync::Arc;

use relay_core::{EditContent, EditOrigin, EditedMessage, RelayError, Result, Transport};
use storage::MessageLinkStore;
use tracing::{debug, error, instrument};

use super::lookup_side;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EditOutcome {
    /// The counterpart was updated.
    Applied,
    /// No link recorded for the edited message; dropped.
    NoCounterpart,
    /// Content kind cannot be mirrored; dropped.
    Unsupported,
}

pub struct EditPropagator {
    transport: Arc<dyn Transport>,
    links: Arc<dyn MessageLinkStore>,
}

impl EditPropagator {
    pub fn new(transport: Arc<dyn Transport>, links: Arc<dyn MessageLinkStore>) -> Self {
        Self { transport, links }
    }

    pub async fn propagate(&self, edit: &EditedMessage, origin: EditOrigin) -> Result<EditOutcome> {
        self.propagate_edit(edit.chat_id, edit.message_id, origin, &edit.content)
            .await
    }

    /// Applies `content` to the message linked with `(chat_id, message_id)`.
    ///
    /// `origin` picks the side of the link the key is matched against. Transport failures are
    /// logged and returned; nothing is sent to the editor.
    #[instrument(skip(self, content))]
    pub async fn propagate_edit(
        &self,
        chat_id: i64,
        message_id: i32,
        origin: EditOrigin,
        content: &EditContent,
    ) -> Result<EditOutcome> {
        if matches!(content, EditContent::Unsupported) {
            debug!("Edit content cannot be mirrored");
            return Ok(EditOutcome::Unsupported);
        }

        let side = lookup_side(origin);
        let link = self
            .links
            .find(chat_id, message_id, side)
            .await
            .map_err(|e| {
                error!(error = %e, "Failed to look up edited message");
                RelayError::Database(e.to_string())
            })?;

        let Some(link) = link else {
            debug!("No counterpart for edited message");
            return Ok(EditOutcome::NoCounterpart);
        };

        let (target_chat, target_message) = link.side(side.opposite());
        let applied = match content {
            EditContent::Text { text, entities } => {
                self.transport
                    .edit_text(target_chat, target_message, text, entities)
                    .await
            }
            EditContent::Media(media) => {
                self.transport
                    .edit_media(target_chat, target_message, media)
                    .await
            }
            EditContent::Unsupported => return Ok(EditOutcome::Unsupported),
        };

        applied.map_err(|e| {
            error!(error = %e, target_chat, target_message, "Failed to apply edit to counterpart");
            RelayError::from(e)
        })?;

        debug!(target_chat, target_message, "Edit applied");
        Ok(EditOutcome::Applied)
    }
}
