#![deny(missing_docs)]
//! Homework review status bot.
//!
//! Polls the Practicum homework API and relays status changes to a Telegram chat.

/// Practicum API client.
pub mod api;
/// Telegram delivery and duplicate suppression.
pub mod bot;
/// Configuration and settings management.
pub mod config;
/// Error types shared by the polling pipeline.
pub mod error;
/// Log output redaction.
pub mod logging;
/// Polling loop entrypoint.
pub mod runner;
/// Response validation and status rendering.
pub mod status;
/// Utility functions.
pub mod utils;
