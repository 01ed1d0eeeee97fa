//! Response validation and status rendering
//!
//! Checks the shape of an API answer and turns a homework record into the
//! notification text sent to the chat.

use crate::error::HomeworkError;
use serde_json::Value;

/// Review status codes known to the bot
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HomeworkStatus {
    /// Review finished, no remarks
    Approved,
    /// A reviewer picked the work up
    Reviewing,
    /// Review finished with remarks
    Rejected,
}

impl HomeworkStatus {
    /// Parses a status code as returned by the API.
    #[must_use]
    pub fn from_code(code: &str) -> Option<Self> {
        match code {
            "approved" => Some(Self::Approved),
            "reviewing" => Some(Self::Reviewing),
            "rejected" => Some(Self::Rejected),
            _ => None,
        }
    }

    /// Human-readable verdict for the status.
    #[must_use]
    pub const fn verdict(self) -> &'static str {
        match self {
            Self::Approved => "Работа проверена: ревьюеру всё понравилось. Ура!",
            Self::Reviewing => "Работа взята на проверку ревьюером.",
            Self::Rejected => "Работа проверена: у ревьюера есть замечания.",
        }
    }
}

/// Validates the API answer and returns its homework list.
///
/// An empty list is a valid answer: no homework changed since `from_date`.
///
/// # Errors
///
/// Returns `HomeworkError::Shape` if the answer is not an object, has no
/// `homeworks` key, or `homeworks` is not a list.
///
/// # Examples
///
/// ```
/// use homework_bot::status::check_response;
/// use serde_json::json;
///
/// let response = json!({"homeworks": [], "current_date": 1});
/// assert!(matches!(check_response(&response), Ok(list) if list.is_empty()));
/// ```
pub fn check_response(response: &Value) -> Result<&[Value], HomeworkError> {
    let object = response
        .as_object()
        .ok_or_else(|| HomeworkError::Shape("ожидается словарь".to_string()))?;

    let homeworks = object
        .get("homeworks")
        .ok_or_else(|| HomeworkError::Shape("ключ `homeworks` отсутствует".to_string()))?;

    homeworks
        .as_array()
        .map(Vec::as_slice)
        .ok_or_else(|| HomeworkError::Shape("`homeworks` не является списком".to_string()))
}

/// Renders the notification text for a single homework record.
///
/// # Errors
///
/// - `HomeworkError::MissingField` if `status` or `homework_name` is absent
/// - `HomeworkError::UnknownStatus` if the status code has no verdict
/// - `HomeworkError::Shape` if the record is not an object or the name is not a string
pub fn parse_status(homework: &Value) -> Result<String, HomeworkError> {
    let record = homework
        .as_object()
        .ok_or_else(|| HomeworkError::Shape("запись о работе не является словарём".to_string()))?;

    let status = record
        .get("status")
        .ok_or(HomeworkError::MissingField("status"))?;
    let name = record
        .get("homework_name")
        .ok_or(HomeworkError::MissingField("homework_name"))?;

    let name = name
        .as_str()
        .ok_or_else(|| HomeworkError::Shape("`homework_name` не является строкой".to_string()))?;

    let status = status
        .as_str()
        .and_then(HomeworkStatus::from_code)
        .ok_or_else(|| HomeworkError::UnknownStatus(display_code(status)))?;

    Ok(format!(
        "Изменился статус проверки работы \"{name}\". {}",
        status.verdict()
    ))
}

fn display_code(value: &Value) -> String {
    value
        .as_str()
        .map_or_else(|| value.to_string(), str::to_string)
}
