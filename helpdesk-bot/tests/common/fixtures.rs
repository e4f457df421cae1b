//! Test harness: engine, propagator and stores over an in-memory database and a [`MockTransport`].

use chrono::Utc;
use helpdesk_bot::{open_stores, EditPropagator, RelayEngine, RoutingResolver, Texts};
use relay_core::{ContentClass, InboundMessage, Sender, Transport};
use std::sync::Arc;
use storage::{MessageLinkRepository, MessageLinkStore, TopicDirectory, TopicRepository};

use super::mock_transport::MockTransport;

pub const FORUM: i64 = -1001234567890;

pub struct Harness {
    pub transport: Arc<MockTransport>,
    pub topics: Arc<TopicRepository>,
    pub links: Arc<MessageLinkRepository>,
    pub resolver: Arc<RoutingResolver>,
    pub engine: RelayEngine,
    pub editor: EditPropagator,
    pub texts: Arc<Texts>,
}

impl Harness {
    pub async fn new() -> Self {
        Self::with_transport(MockTransport::new()).await
    }

    pub async fn with_transport(transport: MockTransport) -> Self {
        let transport = Arc::new(transport);
        let (topics, links) = open_stores("sqlite::memory:").await.unwrap();
        let texts = Arc::new(Texts::default());

        let directory: Arc<dyn TopicDirectory> = topics.clone();
        let link_store: Arc<dyn MessageLinkStore> = links.clone();
        let dyn_transport: Arc<dyn Transport> = transport.clone();

        let resolver = Arc::new(RoutingResolver::new(directory));
        let engine = RelayEngine::new(
            dyn_transport.clone(),
            resolver.clone(),
            link_store.clone(),
            texts.clone(),
            FORUM,
        );
        let editor = EditPropagator::new(dyn_transport, link_store);

        Self {
            transport,
            topics,
            links,
            resolver,
            engine,
            editor,
            texts,
        }
    }
}

pub fn sender(user_id: i64) -> Sender {
    Sender {
        id: user_id,
        first_name: "Ann".to_string(),
        last_name: Some("Lee".to_string()),
        username: Some("annlee".to_string()),
        is_premium: false,
        language_code: Some("en".to_string()),
    }
}

/// A forwardable message in the user's private chat.
pub fn private_message(user_id: i64, message_id: i32) -> InboundMessage {
    InboundMessage {
        id: message_id,
        chat_id: user_id,
        thread_id: None,
        sender: Some(sender(user_id)),
        class: ContentClass::Forwardable,
        caption: None,
        reply_to_message_id: None,
        created_at: Utc::now(),
    }
}

/// A forwardable staff message inside `topic_id` of the forum.
pub fn forum_message(topic_id: i32, message_id: i32) -> InboundMessage {
    InboundMessage {
        id: message_id,
        chat_id: FORUM,
        thread_id: Some(topic_id),
        sender: Some(Sender {
            id: 7,
            first_name: "Staff".to_string(),
            last_name: None,
            username: None,
            is_premium: false,
            language_code: None,
        }),
        class: ContentClass::Forwardable,
        caption: None,
        reply_to_message_id: None,
        created_at: Utc::now(),
    }
}
