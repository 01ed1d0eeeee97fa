//! Practicum API client
//!
//! Provides the homework status source polled by the runner.

mod http_utils;
/// Practicum implementation of the status source.
pub mod practicum;

pub use practicum::PracticumClient;

use crate::error::HomeworkError;
use async_trait::async_trait;
use serde_json::Value;

/// Interface for homework status sources
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait HomeworkSource: Send + Sync {
    /// Fetch homework statuses changed since `from_date` (unix seconds).
    ///
    /// A `from_date` of zero means "now".
    async fn get_api_answer(&self, from_date: i64) -> Result<Value, HomeworkError>;
}

/// Resolves the `from_date` filter, substituting the current time for zero.
#[must_use]
pub fn resolve_from_date(from_date: i64) -> i64 {
    if from_date == 0 {
        chrono::Utc::now().timestamp()
    } else {
        from_date
    }
}
