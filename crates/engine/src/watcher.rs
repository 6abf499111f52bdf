//! Status watcher — the poll → validate → interpret → notify loop.
//!
//! Each iteration:
//! 1. Fetches the full homework history (cursor [`ALL_HOMEWORKS`])
//! 2. Validates the payload and picks the current record
//! 3. Renders the status message
//! 4. Sends it unless it matches the last delivered message
//!
//! Any failure in steps 1-3 is logged and relayed as a failure report under
//! the same de-duplication rule. Nothing raised inside an iteration stops the
//! loop.

use std::time::Duration;

use homework_common::error::AppError;
use homework_common::types::{ALL_HOMEWORKS, HomeworkSource, Notifier};

use crate::dedup::LastMessage;
use crate::interpreter::parse_status;
use crate::validator::check_response;

/// What a single iteration did.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TickOutcome {
    /// A notification was delivered.
    Sent(String),
    /// The text matched the last delivered message; nothing was sent.
    Unchanged,
    /// Delivery failed; the text will be retried on a later iteration.
    SendFailed(String),
}

/// Polling loop that notifies about homework status changes.
pub struct StatusWatcher<S, N> {
    source: S,
    notifier: N,
    retry_period: Duration,
    last_message: LastMessage,
}

impl<S, N> StatusWatcher<S, N>
where
    S: HomeworkSource,
    N: Notifier,
{
    pub fn new(source: S, notifier: N, retry_period: Duration) -> Self {
        Self {
            source,
            notifier,
            retry_period,
            last_message: LastMessage::new(),
        }
    }

    /// Run iterations forever, sleeping `retry_period` after each one
    /// regardless of its outcome.
    pub async fn run(&mut self) {
        tracing::info!(
            retry_period_secs = self.retry_period.as_secs(),
            "Status watcher started"
        );

        loop {
            let outcome = self.tick().await;
            tracing::debug!(?outcome, "Iteration finished");
            tokio::time::sleep(self.retry_period).await;
        }
    }

    /// Run a single iteration without sleeping.
    pub async fn tick(&mut self) -> TickOutcome {
        match self.check().await {
            Ok(message) => self.deliver(&message).await,
            Err(err) => {
                let report = Self::failure_report(&err);
                self.deliver(&report).await
            }
        }
    }

    pub fn last_message(&self) -> &LastMessage {
        &self.last_message
    }

    async fn check(&self) -> Result<String, AppError> {
        let response = self.source.fetch(ALL_HOMEWORKS).await?;
        let homework = check_response(&response)?;
        parse_status(homework)
    }

    async fn deliver(&mut self, text: &str) -> TickOutcome {
        if !self.last_message.should_send(text) {
            return TickOutcome::Unchanged;
        }

        match self.notifier.send(text).await {
            Ok(()) => {
                self.last_message.record_sent(text);
                TickOutcome::Sent(text.to_string())
            }
            Err(e) => {
                tracing::error!(error = %e, "Notification not sent");
                self.last_message.record_failed(text);
                TickOutcome::SendFailed(text.to_string())
            }
        }
    }

    /// Log a polling failure and build the report relayed to the user.
    fn failure_report(err: &AppError) -> String {
        match err {
            AppError::Connection(_) => {
                tracing::error!(error = %err, "Review API unreachable");
            }
            AppError::ApiResponse(_) => {
                tracing::error!(error = %err, "Review API returned an error");
            }
            AppError::TypeMismatch(_) | AppError::MissingKey(_) => {
                tracing::error!(error = %err, "Review API response has an unexpected shape");
            }
            AppError::UnknownStatus(_) => {
                tracing::error!(error = %err, "Homework status could not be interpreted");
            }
            AppError::ConfigMissing(_) | AppError::Config(_) | AppError::Notification(_) => {
                tracing::error!(error = %err, "Unexpected failure while polling");
            }
        }

        format!("Program failure: {err}")
    }
}
