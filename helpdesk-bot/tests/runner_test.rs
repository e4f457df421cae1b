//! Integration tests: HelpdeskBot routes updates by chat role and content class.

mod common;

use helpdesk_bot::{build_bot_components, BaseConfig, BotConfig, ChatRole, HelpdeskBot, RelayConfig, Texts};
use relay_core::{ContentClass, EditContent, EditedMessage, Transport};
use std::sync::Arc;
use storage::TopicDirectory;

use common::fixtures::{forum_message, private_message, FORUM};
use common::mock_transport::{Call, MockTransport};

const USER: i64 = 42;

fn config() -> BotConfig {
    BotConfig {
        base: BaseConfig {
            bot_token: "123456:TEST".to_string(),
            telegram_api_url: None,
            log_file: "logs/test.log".to_string(),
            database_url: "sqlite::memory:".to_string(),
        },
        relay: RelayConfig {
            forum_chat_id: FORUM,
            texts_file: None,
            texts: Texts::default(),
        },
    }
}

async fn bot() -> (HelpdeskBot, Arc<MockTransport>) {
    let transport = Arc::new(MockTransport::new());
    let dyn_transport: Arc<dyn Transport> = transport.clone();
    let config = config();
    let components = build_bot_components(&config, Some(dyn_transport))
        .await
        .unwrap();
    (HelpdeskBot::new(config, components), transport)
}

#[tokio::test]
async fn chat_roles() {
    let (bot, _) = bot().await;

    assert_eq!(bot.role_of(USER), ChatRole::Private);
    assert_eq!(bot.role_of(FORUM), ChatRole::Forum);
    assert_eq!(bot.role_of(-100999), ChatRole::Other);
}

/// **Given** a private message and then a staff answer, **then** both are relayed and linked.
#[tokio::test]
async fn round_trip_through_topic() {
    let (bot, transport) = bot().await;

    let link = bot.handle_message(&private_message(USER, 1)).await.unwrap();
    assert_eq!(link.to_chat_id, FORUM);

    let topic = bot
        .components
        .topics
        .latest_for_user(USER)
        .await
        .unwrap()
        .unwrap()
        .topic_id;

    let answer = bot.handle_message(&forum_message(topic, 500)).await.unwrap();
    assert_eq!((answer.from_chat_id, answer.to_message_id), (USER, 500));
    assert_eq!(transport.copies().len(), 2);
}

/// **Given** a staff reply to the user's relayed message, **then** the copy to the user replies
/// to the user's original message.
#[tokio::test]
async fn staff_reply_targets_original_message() {
    let (bot, transport) = bot().await;

    let link = bot.handle_message(&private_message(USER, 1)).await.unwrap();
    let topic = bot
        .components
        .resolver
        .resolve_topic(USER, None)
        .await
        .unwrap()
        .unwrap();

    let mut answer = forum_message(topic, 500);
    answer.reply_to_message_id = Some(link.to_message_id);
    bot.handle_message(&answer).await.unwrap();

    assert!(matches!(
        transport.copies().last(),
        Some(Call::Copy { reply_to: Some(1), .. })
    ));
}

/// **Given** service messages, general-thread posts and foreign chats, **then** nothing is sent.
#[tokio::test]
async fn ignored_updates_send_nothing() {
    let (bot, transport) = bot().await;

    let mut service = private_message(USER, 1);
    service.class = ContentClass::Service;
    assert!(bot.handle_message(&service).await.is_none());

    let mut general = forum_message(1, 2);
    general.thread_id = None;
    assert!(bot.handle_message(&general).await.is_none());

    let mut foreign = private_message(USER, 3);
    foreign.chat_id = -100999;
    assert!(bot.handle_message(&foreign).await.is_none());

    assert!(transport.calls().is_empty());
}

/// **Given** unsupported content, **then** the sender gets the localized reply only.
#[tokio::test]
async fn unsupported_content_is_rejected() {
    let (bot, transport) = bot().await;
    let mut msg = private_message(USER, 4);
    msg.class = ContentClass::Unsupported;

    assert!(bot.handle_message(&msg).await.is_none());
    assert_eq!(
        transport.replies(),
        vec![(USER, 4, bot.components.texts.non_forwardable_type.clone())]
    );
}

/// **Given** an edit in a foreign chat, **then** it is not handled; in the forum it is.
#[tokio::test]
async fn edits_are_routed_by_chat() {
    let (bot, _) = bot().await;
    let content = EditContent::Text {
        text: "x".to_string(),
        entities: Vec::new(),
    };

    let foreign = EditedMessage {
        chat_id: -100999,
        message_id: 1,
        content: content.clone(),
    };
    assert!(bot.handle_edit(&foreign).await.is_none());

    let forum = EditedMessage {
        chat_id: FORUM,
        message_id: 1,
        content,
    };
    assert_eq!(
        bot.handle_edit(&forum).await,
        Some(helpdesk_bot::EditOutcome::NoCounterpart)
    );
}
