//! Visitor card and topic title for a newly opened topic.

use relay_core::Sender;

use crate::l10n::{render, Texts};

/// Telegram limit for forum topic names, in characters.
pub const MAX_TOPIC_NAME_LEN: usize = 128;

/// `"{full_name} ({id})"`, shortening the name so the whole title fits [`MAX_TOPIC_NAME_LEN`].
pub fn topic_title(sender: &Sender) -> String {
    let suffix = format!(" ({})", sender.id);
    let budget = MAX_TOPIC_NAME_LEN.saturating_sub(suffix.chars().count());
    let name: String = sender.full_name().chars().take(budget).collect();
    format!("{}{}", name.trim_end(), suffix)
}

pub fn visitor_card(texts: &Texts, sender: &Sender) -> String {
    let username = match &sender.username {
        Some(username) => format!("@{}", username),
        None => texts.no.clone(),
    };
    let premium = if sender.is_premium { &texts.yes } else { &texts.no };
    let language = sender.language_code.as_deref().unwrap_or(&texts.unknown);
    let full_name = sender.full_name();

    render(
        &texts.user_info,
        &[
            ("full_name", full_name.as_str()),
            ("username", username.as_str()),
            ("premium", premium.as_str()),
            ("language", language),
        ],
    )
}
