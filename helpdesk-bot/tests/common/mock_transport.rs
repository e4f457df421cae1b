//! Mock implementation of [`relay_core::Transport`] for integration tests.
//!
//! Records every call in order. Copy results can be scripted per call; otherwise copies and
//! topic creations succeed with increasing ids.

use async_trait::async_trait;
use relay_core::{ChatTarget, MediaEdit, Transport, TransportError, TransportResult};
use std::collections::VecDeque;
use std::sync::Mutex;
use std::time::Duration;
use teloxide::types::MessageEntity;

/// One recorded transport call.
#[derive(Debug, Clone, PartialEq)]
pub enum Call {
    Copy {
        to: ChatTarget,
        from_chat_id: i64,
        message_id: i32,
        reply_to: Option<i32>,
    },
    CreateTopic {
        chat_id: i64,
        name: String,
    },
    SendText {
        to: ChatTarget,
        text: String,
    },
    ReplyText {
        chat_id: i64,
        reply_to: i32,
        text: String,
    },
    EditText {
        chat_id: i64,
        message_id: i32,
        text: String,
        entities: Vec<MessageEntity>,
    },
    EditMedia {
        chat_id: i64,
        message_id: i32,
        media: MediaEdit,
    },
}

#[derive(Default)]
struct State {
    calls: Vec<Call>,
    copy_results: VecDeque<TransportResult<i32>>,
    next_message_id: i32,
    next_topic_id: i32,
}

pub struct MockTransport {
    state: Mutex<State>,
    fail_edits: Option<TransportError>,
    fail_topic_creation: Option<TransportError>,
    fail_send_text: Option<TransportError>,
    copy_delay: Option<Duration>,
}

impl MockTransport {
    /// Copies return 1000, 1001, ...; topics are created as 100, 101, ...
    pub fn new() -> Self {
        Self {
            state: Mutex::new(State {
                next_message_id: 1000,
                next_topic_id: 100,
                ..Default::default()
            }),
            fail_edits: None,
            fail_topic_creation: None,
            fail_send_text: None,
            copy_delay: None,
        }
    }

    pub fn failing_edits(mut self, err: TransportError) -> Self {
        self.fail_edits = Some(err);
        self
    }

    pub fn failing_topic_creation(mut self, err: TransportError) -> Self {
        self.fail_topic_creation = Some(err);
        self
    }

    /// Every `send_text` (visitor cards, upstream error echoes) fails with `err`.
    pub fn failing_send_text(mut self, err: TransportError) -> Self {
        self.fail_send_text = Some(err);
        self
    }

    /// Suspends inside every copy so concurrent relays interleave.
    pub fn with_copy_delay(mut self, delay: Duration) -> Self {
        self.copy_delay = Some(delay);
        self
    }

    /// Queues the result of the next copy; unscripted copies succeed.
    pub fn script_copy(&self, result: TransportResult<i32>) {
        self.state.lock().unwrap().copy_results.push_back(result);
    }

    pub fn calls(&self) -> Vec<Call> {
        self.state.lock().unwrap().calls.clone()
    }

    pub fn copies(&self) -> Vec<Call> {
        self.calls()
            .into_iter()
            .filter(|c| matches!(c, Call::Copy { .. }))
            .collect()
    }

    pub fn created_topics(&self) -> Vec<String> {
        self.calls()
            .into_iter()
            .filter_map(|c| match c {
                Call::CreateTopic { name, .. } => Some(name),
                _ => None,
            })
            .collect()
    }

    pub fn replies(&self) -> Vec<(i64, i32, String)> {
        self.calls()
            .into_iter()
            .filter_map(|c| match c {
                Call::ReplyText {
                    chat_id,
                    reply_to,
                    text,
                } => Some((chat_id, reply_to, text)),
                _ => None,
            })
            .collect()
    }

    pub fn sent_texts(&self) -> Vec<(ChatTarget, String)> {
        self.calls()
            .into_iter()
            .filter_map(|c| match c {
                Call::SendText { to, text } => Some((to, text)),
                _ => None,
            })
            .collect()
    }

    fn record(&self, call: Call) {
        self.state.lock().unwrap().calls.push(call);
    }
}

#[async_trait]
impl Transport for MockTransport {
    async fn copy_message(
        &self,
        to: ChatTarget,
        from_chat_id: i64,
        message_id: i32,
        reply_to: Option<i32>,
    ) -> TransportResult<i32> {
        self.record(Call::Copy {
            to,
            from_chat_id,
            message_id,
            reply_to,
        });
        if let Some(delay) = self.copy_delay {
            tokio::time::sleep(delay).await;
        }
        let mut state = self.state.lock().unwrap();
        match state.copy_results.pop_front() {
            Some(result) => result,
            None => {
                let id = state.next_message_id;
                state.next_message_id += 1;
                Ok(id)
            }
        }
    }

    async fn create_forum_topic(&self, chat_id: i64, name: &str) -> TransportResult<i32> {
        self.record(Call::CreateTopic {
            chat_id,
            name: name.to_string(),
        });
        if let Some(err) = &self.fail_topic_creation {
            return Err(err.clone());
        }
        let mut state = self.state.lock().unwrap();
        let id = state.next_topic_id;
        state.next_topic_id += 1;
        Ok(id)
    }

    async fn send_text(&self, to: ChatTarget, text: &str) -> TransportResult<i32> {
        self.record(Call::SendText {
            to,
            text: text.to_string(),
        });
        if let Some(err) = &self.fail_send_text {
            return Err(err.clone());
        }
        let mut state = self.state.lock().unwrap();
        let id = state.next_message_id;
        state.next_message_id += 1;
        Ok(id)
    }

    async fn reply_text(&self, chat_id: i64, reply_to: i32, text: &str) -> TransportResult<()> {
        self.record(Call::ReplyText {
            chat_id,
            reply_to,
            text: text.to_string(),
        });
        Ok(())
    }

    async fn edit_text(
        &self,
        chat_id: i64,
        message_id: i32,
        text: &str,
        entities: &[MessageEntity],
    ) -> TransportResult<()> {
        self.record(Call::EditText {
            chat_id,
            message_id,
            text: text.to_string(),
            entities: entities.to_vec(),
        });
        match &self.fail_edits {
            Some(err) => Err(err.clone()),
            None => Ok(()),
        }
    }

    async fn edit_media(
        &self,
        chat_id: i64,
        message_id: i32,
        media: &MediaEdit,
    ) -> TransportResult<()> {
        self.record(Call::EditMedia {
            chat_id,
            message_id,
            media: media.clone(),
        });
        match &self.fail_edits {
            Some(err) => Err(err.clone()),
            None => Ok(()),
        }
    }
}
