//! Polling loop: fetch, validate, render, notify, sleep.

use crate::api::{HomeworkSource, PracticumClient};
use crate::bot::{send_message, DeliveryOutcome, LastSent, MessageSink, TelegramSink};
use crate::config::{Credentials, RETRY_TIME_SECS};
use crate::error::HomeworkError;
use crate::status::{check_response, parse_status};
use std::time::Duration;
use tracing::{debug, error, info, warn};

/// Prefix of the diagnostic sent to the chat when a cycle fails.
pub const FAILURE_PREFIX: &str = "Сбой в работе программы";

/// What a single poll cycle did
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CycleOutcome {
    /// The API reported no homework
    Idle,
    /// A status notification went through the notifier
    Status(DeliveryOutcome),
    /// The cycle failed and a diagnostic went through the notifier
    Failed {
        /// Error that aborted the cycle
        error: HomeworkError,
        /// What happened to the diagnostic message
        delivery: DeliveryOutcome,
    },
}

/// Fetches statuses and renders the notification for the first homework.
///
/// Only the first record of the list is inspected. Returns `None` when the
/// list is empty.
///
/// # Errors
///
/// Propagates any `HomeworkError` from the source, validator or extractor.
pub async fn check_homework<H>(source: &H, from_date: i64) -> Result<Option<String>, HomeworkError>
where
    H: HomeworkSource + ?Sized,
{
    let response = source.get_api_answer(from_date).await?;
    let homeworks = check_response(&response)?;
    homeworks.first().map(parse_status).transpose()
}

/// Runs one poll cycle and returns the updated last-sent state.
///
/// Errors never escape: they are turned into a diagnostic message that goes
/// through the same duplicate check as status notifications.
pub async fn run_cycle<H, M>(
    source: &H,
    sink: &M,
    from_date: i64,
    last_sent: LastSent,
) -> (CycleOutcome, LastSent)
where
    H: HomeworkSource + ?Sized,
    M: MessageSink + ?Sized,
{
    match check_homework(source, from_date).await {
        Ok(None) => (CycleOutcome::Idle, last_sent),
        Ok(Some(message)) => {
            let (delivery, last_sent) = send_message(sink, &message, last_sent).await;
            (CycleOutcome::Status(delivery), last_sent)
        }
        Err(e) => {
            let message = format!("{FAILURE_PREFIX}: {e}");
            error!("{message}");
            let (delivery, last_sent) = send_message(sink, &message, last_sent).await;
            (CycleOutcome::Failed { error: e, delivery }, last_sent)
        }
    }
}

/// Endless poller over a status source and a messaging sink
pub struct Poller<H, M> {
    source: H,
    sink: M,
    from_date: i64,
    interval: Duration,
}

impl<H, M> Poller<H, M>
where
    H: HomeworkSource,
    M: MessageSink,
{
    /// Creates a poller that requests statuses changed since `from_date`.
    #[must_use]
    pub fn new(source: H, sink: M, from_date: i64) -> Self {
        Self {
            source,
            sink,
            from_date,
            interval: Duration::from_secs(RETRY_TIME_SECS),
        }
    }

    /// Overrides the pause between cycles.
    #[must_use]
    pub fn with_interval(mut self, interval: Duration) -> Self {
        self.interval = interval;
        self
    }

    /// Polls forever, sleeping the same interval after every cycle.
    pub async fn run(&self) {
        let mut last_sent = LastSent::default();

        loop {
            let (outcome, next) =
                run_cycle(&self.source, &self.sink, self.from_date, last_sent).await;
            last_sent = next;
            log_outcome(&outcome);

            tokio::time::sleep(self.interval).await;
        }
    }
}

fn log_outcome(outcome: &CycleOutcome) {
    match outcome {
        CycleOutcome::Idle => debug!("No homework updates"),
        CycleOutcome::Status(DeliveryOutcome::Delivered) => info!("Status notification delivered"),
        CycleOutcome::Status(DeliveryOutcome::Suppressed) => debug!("Status unchanged"),
        CycleOutcome::Status(DeliveryOutcome::Failed(e)) => {
            warn!(error = %e, "Status notification not delivered");
        }
        CycleOutcome::Failed {
            delivery: DeliveryOutcome::Failed(e),
            ..
        } => warn!(error = %e, "Failure report not delivered"),
        CycleOutcome::Failed { .. } => {}
    }
}

/// Run the polling runtime until Ctrl-C.
pub async fn run_bot(credentials: Credentials) {
    let source = PracticumClient::new(credentials.practicum_token);
    let sink = TelegramSink::new(credentials.telegram_token, credentials.chat_id);
    let from_date = chrono::Utc::now().timestamp();

    info!(
        endpoint = source.endpoint(),
        chat_id = credentials.chat_id,
        interval_secs = RETRY_TIME_SECS,
        "Bot is polling..."
    );

    let poller = Poller::new(source, sink, from_date);

    tokio::select! {
        () = poller.run() => {}
        result = tokio::signal::ctrl_c() => {
            if let Err(e) = result {
                error!("Failed to listen for Ctrl-C: {}", e);
            }
            info!("Shutting down.");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::MockHomeworkSource;
    use crate::bot::notifier::MockMessageSink;
    use crate::error::DeliveryError;
    use serde_json::json;

    const APPROVED_HW1: &str =
        "Изменился статус проверки работы \"hw1\". Работа проверена: ревьюеру всё понравилось. Ура!";

    fn source_returning(payload: serde_json::Value) -> MockHomeworkSource {
        let mut source = MockHomeworkSource::new();
        source
            .expect_get_api_answer()
            .returning(move |_| Ok(payload.clone()));
        source
    }

    #[tokio::test]
    async fn test_empty_homeworks_is_idle() {
        let source = source_returning(json!({"homeworks": [], "current_date": 1}));
        let mut sink = MockMessageSink::new();
        sink.expect_send_text().never();

        let (outcome, last_sent) = run_cycle(&source, &sink, 1, LastSent::default()).await;

        assert_eq!(outcome, CycleOutcome::Idle);
        assert_eq!(last_sent, LastSent::default());
    }

    #[tokio::test]
    async fn test_only_first_homework_is_reported() {
        let source = source_returning(json!({"homeworks": [
            {"status": "approved", "homework_name": "hw1"},
            {"status": "rejected", "homework_name": "hw0"}
        ]}));

        let message = check_homework(&source, 1).await;
        assert_eq!(message, Ok(Some(APPROVED_HW1.to_string())));
    }

    #[tokio::test]
    async fn test_from_date_is_forwarded() {
        let mut source = MockHomeworkSource::new();
        source
            .expect_get_api_answer()
            .withf(|from_date| *from_date == 1_549_962_000)
            .times(1)
            .returning(|_| Ok(json!({"homeworks": []})));

        assert_eq!(check_homework(&source, 1_549_962_000).await, Ok(None));
    }

    #[tokio::test]
    async fn test_error_becomes_diagnostic_message() {
        let mut source = MockHomeworkSource::new();
        source.expect_get_api_answer().returning(|_| {
            Err(HomeworkError::RemoteUnavailable {
                endpoint: "https://example.test/".to_string(),
                reason: "HTTP 503 Service Unavailable".to_string(),
            })
        });
        let mut sink = MockMessageSink::new();
        sink.expect_send_text().times(1).returning(|_| Ok(()));

        let (outcome, last_sent) = run_cycle(&source, &sink, 1, LastSent::default()).await;
        let (repeat, _) = run_cycle(&source, &sink, 1, last_sent.clone()).await;

        assert!(matches!(
            outcome,
            CycleOutcome::Failed {
                error: HomeworkError::RemoteUnavailable { .. },
                delivery: DeliveryOutcome::Delivered,
            }
        ));
        assert_eq!(
            last_sent.get(),
            Some(
                "Сбой в работе программы: API не отвечает (https://example.test/): \
                 HTTP 503 Service Unavailable"
            )
        );
        assert!(matches!(
            repeat,
            CycleOutcome::Failed {
                delivery: DeliveryOutcome::Suppressed,
                ..
            }
        ));
    }

    #[tokio::test]
    async fn test_unknown_status_reported_as_failure() {
        let source = source_returning(json!({"homeworks": [
            {"status": "archived", "homework_name": "hw1"}
        ]}));
        let mut sink = MockMessageSink::new();
        sink.expect_send_text().times(1).returning(|_| Ok(()));

        let (outcome, _) = run_cycle(&source, &sink, 1, LastSent::default()).await;

        assert!(matches!(
            outcome,
            CycleOutcome::Failed {
                error: HomeworkError::UnknownStatus(ref code),
                delivery: DeliveryOutcome::Delivered,
            } if code == "archived"
        ));
    }

    #[tokio::test]
    async fn test_delivery_failure_does_not_stop_cycle() {
        let source = source_returning(json!({"homeworks": [
            {"status": "approved", "homework_name": "hw1"}
        ]}));
        let mut sink = MockMessageSink::new();
        sink.expect_send_text()
            .returning(|_| Err(DeliveryError("timeout".to_string())));

        let (outcome, last_sent) = run_cycle(&source, &sink, 1, LastSent::default()).await;

        assert_eq!(
            outcome,
            CycleOutcome::Status(DeliveryOutcome::Failed(DeliveryError(
                "timeout".to_string()
            )))
        );
        assert_eq!(last_sent, LastSent::default());
    }

    #[tokio::test(start_paused = true)]
    async fn test_poller_sleeps_between_cycles() {
        let mut source = MockHomeworkSource::new();
        source
            .expect_get_api_answer()
            .times(3)
            .returning(|_| Ok(json!({"homeworks": [{"status": "approved", "homework_name": "hw1"}]})));
        let mut sink = MockMessageSink::new();
        sink.expect_send_text().times(1).returning(|_| Ok(()));

        let poller = Poller::new(source, sink, 1);

        // Cycles run at 0s, 600s and 1200s
        let stopped = tokio::time::timeout(Duration::from_secs(1500), poller.run()).await;
        assert!(stopped.is_err());
    }
}
