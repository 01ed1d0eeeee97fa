//! Resilient messaging with automatic retry for Telegram API operations.
//!
//! Wraps `sendMessage` so transient network failures are retried with
//! exponential backoff and jitter before the caller sees an error.

use anyhow::Result;
use teloxide::prelude::*;
use teloxide::types::{ChatId, Message};

/// Maximum message length for Telegram with safety margin.
/// Telegram's official limit is 4096.
pub const TELEGRAM_MESSAGE_LIMIT: usize = 4000;

/// Send a message with automatic retry on network failures.
///
/// Uses [`crate::utils::retry_telegram_operation`] with exponential backoff.
/// Text above [`TELEGRAM_MESSAGE_LIMIT`] characters is truncated.
///
/// # Errors
///
/// Returns an error after all retries are exhausted.
///
/// # Examples
///
/// ```ignore
/// let msg = send_message_resilient(&bot, chat_id, "Работа взята на проверку ревьюером.").await?;
/// ```
pub async fn send_message_resilient(
    bot: &Bot,
    chat_id: ChatId,
    text: impl Into<String>,
) -> Result<Message> {
    let text: String = text.into();
    let text = fit_message(&text);
    crate::utils::retry_telegram_operation(|| async {
        bot.send_message(chat_id, text.clone())
            .await
            .map_err(|e| anyhow::anyhow!("Telegram send error: {e}"))
    })
    .await
}

/// Truncates text that does not fit into a single Telegram message.
#[must_use]
pub fn fit_message(text: &str) -> String {
    if text.chars().count() > TELEGRAM_MESSAGE_LIMIT {
        let truncated = crate::utils::truncate_str(text, TELEGRAM_MESSAGE_LIMIT);
        format!("{truncated}…")
    } else {
        text.to_string()
    }
}
