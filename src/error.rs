//! Errors raised while fetching and interpreting homework statuses.

use thiserror::Error;

/// Errors that can occur during a poll cycle
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum HomeworkError {
    /// The API could not be reached, answered with a non-success status,
    /// or returned an unreadable body
    #[error("API не отвечает ({endpoint}): {reason}")]
    RemoteUnavailable {
        /// Endpoint that was requested
        endpoint: String,
        /// Transport error or HTTP status
        reason: String,
    },
    /// The response does not have the expected structure
    #[error("Некорректный ответ API: {0}")]
    Shape(String),
    /// A homework record lacks a required key
    #[error("Ключ `{0}` отсутствует в записи о работе")]
    MissingField(&'static str),
    /// A homework record carries a status code with no known verdict
    #[error("Неизвестный статус работы: {0}")]
    UnknownStatus(String),
}

/// Error returned by a messaging backend when a text cannot be delivered
#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[error("Сбой отправки сообщения: {0}")]
pub struct DeliveryError(pub String);
