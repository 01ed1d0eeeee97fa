/// Duplicate-suppressing notification delivery
pub mod notifier;
/// Telegram sends with retry
pub mod resilient;

pub use notifier::{send_message, DeliveryOutcome, LastSent, MessageSink, TelegramSink};
