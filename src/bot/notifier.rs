//! Duplicate-suppressing delivery of notifications.
//!
//! The last delivered text is an explicit [`LastSent`] value owned by the
//! caller: it goes into [`send_message`] and comes back updated, so nothing
//! here holds process-wide state.

use super::resilient::send_message_resilient;
use crate::error::DeliveryError;
use async_trait::async_trait;
use teloxide::prelude::*;
use teloxide::types::ChatId;
use tracing::{error, info};

/// Interface for messaging backends
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait MessageSink: Send + Sync {
    /// Deliver plain text to the configured recipient.
    async fn send_text(&self, text: &str) -> Result<(), DeliveryError>;
}

/// Delivers notifications to a single Telegram chat
pub struct TelegramSink {
    bot: Bot,
    chat_id: ChatId,
}

impl TelegramSink {
    /// Creates a sink for `chat_id` authenticated with `token`.
    #[must_use]
    pub fn new(token: impl Into<String>, chat_id: i64) -> Self {
        Self {
            bot: Bot::new(token),
            chat_id: ChatId(chat_id),
        }
    }
}

#[async_trait]
impl MessageSink for TelegramSink {
    async fn send_text(&self, text: &str) -> Result<(), DeliveryError> {
        send_message_resilient(&self.bot, self.chat_id, text)
            .await
            .map(|_| ())
            .map_err(|e| DeliveryError(e.to_string()))
    }
}

/// Most recently delivered notification text.
///
/// Holds at most one value; empty until the first successful delivery.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LastSent(Option<String>);

impl LastSent {
    /// The last delivered text, if any.
    #[must_use]
    pub fn get(&self) -> Option<&str> {
        self.0.as_deref()
    }

    /// Whether `message` equals the last delivered text.
    #[must_use]
    pub fn is_repeat(&self, message: &str) -> bool {
        self.get() == Some(message)
    }
}

/// Result of a single delivery attempt
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DeliveryOutcome {
    /// Text was sent and recorded as last sent
    Delivered,
    /// Text equals the last sent one and was skipped
    Suppressed,
    /// Sending failed; last sent is unchanged
    Failed(DeliveryError),
}

/// Sends `message` unless it repeats the last delivered text.
///
/// The returned [`LastSent`] is updated only on successful delivery, so a
/// message that failed to send is retried on the next cycle.
///
/// # Examples
///
/// ```ignore
/// let (outcome, last_sent) = send_message(&sink, &message, last_sent).await;
/// ```
pub async fn send_message<S>(
    sink: &S,
    message: &str,
    last_sent: LastSent,
) -> (DeliveryOutcome, LastSent)
where
    S: MessageSink + ?Sized,
{
    if last_sent.is_repeat(message) {
        info!("Message repeated, skipping delivery");
        return (DeliveryOutcome::Suppressed, last_sent);
    }

    match sink.send_text(message).await {
        Ok(()) => {
            info!("Message sent");
            (
                DeliveryOutcome::Delivered,
                LastSent(Some(message.to_string())),
            )
        }
        Err(e) => {
            error!(error = %e, "Failed to send message");
            (DeliveryOutcome::Failed(e), last_sent)
        }
    }
}
