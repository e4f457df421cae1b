//! Texts sent to users and staff. English defaults; a JSON file can override any subset of keys.

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Texts {
    pub caption_too_long: String,
    pub non_forwardable_type: String,
    pub error_from_pm_to_group: String,
    pub error_from_group_to_pm: String,
    pub storage_error: String,
    pub yes: String,
    pub no: String,
    pub unknown: String,
    /// Visitor card template. Placeholders: `{full_name}`, `{username}`, `{premium}`, `{language}`.
    pub user_info: String,
}

impl Default for Texts {
    fn default() -> Self {
        Self {
            caption_too_long: "This caption is too long. Please keep it under 1024 characters."
                .to_string(),
            non_forwardable_type: "Sorry, this type of message cannot be delivered.".to_string(),
            error_from_pm_to_group: "Failed to deliver your message. Please try again later."
                .to_string(),
            error_from_group_to_pm: "Failed to deliver this message to the user.".to_string(),
            storage_error: "Something went wrong. Please try again later.".to_string(),
            yes: "yes".to_string(),
            no: "no".to_string(),
            unknown: "unknown".to_string(),
            user_info: "New visitor: {full_name}\nUsername: {username}\nPremium: {premium}\nLanguage: {language}"
                .to_string(),
        }
    }
}

impl Texts {
    /// Loads overrides from a JSON object; missing keys keep their defaults.
    pub fn from_file(path: &Path) -> Result<Self> {
        let raw = fs::read_to_string(path)
            .with_context(|| format!("Failed to read texts file {}", path.display()))?;
        let texts = serde_json::from_str(&raw)
            .with_context(|| format!("Invalid texts file {}", path.display()))?;
        Ok(texts)
    }
}

/// Replaces each `{key}` in `template` with its value in one pass; inserted values are not
/// scanned again. Unknown placeholders are left as-is.
pub fn render(template: &str, values: &[(&str, &str)]) -> String {
    let mut out = String::with_capacity(template.len());
    let mut rest = template;

    while let Some(open) = rest.find('{') {
        out.push_str(&rest[..open]);
        let after = &rest[open + 1..];
        let Some(close) = after.find('}') else {
            out.push_str(&rest[open..]);
            return out;
        };

        let key = &after[..close];
        match values.iter().find(|(k, _)| *k == key) {
            Some((_, value)) => out.push_str(value),
            None => out.push_str(&rest[open..open + close + 2]),
        }
        rest = &after[close + 1..];
    }

    out.push_str(rest);
    out
}
