//! De-duplication state — suppresses a notification whose text matches the
//! last one delivered.
//!
//! Only a successful send updates the state, so a failed send is retried with
//! the same text on the next iteration. A text that fails to send and is then
//! replaced by a different one is dropped; that loss is logged at warn level.

/// Last successfully delivered notification text.
#[derive(Debug, Default)]
pub struct LastMessage {
    sent: Option<String>,
    undelivered: Option<String>,
}

impl LastMessage {
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns `true` if `text` differs from the last delivered message.
    pub fn should_send(&self, text: &str) -> bool {
        let allowed = self.sent.as_deref() != Some(text);

        if !allowed {
            tracing::debug!("No change since the last notification");
        }

        allowed
    }

    /// Record a successful delivery of `text`.
    pub fn record_sent(&mut self, text: &str) {
        if let Some(dropped) = self.undelivered.take().filter(|d| d != text) {
            tracing::warn!(
                message = %dropped,
                "Undelivered notification superseded by a newer one"
            );
        }
        self.sent = Some(text.to_string());
    }

    /// Record a failed delivery of `text`. The delivered state is unchanged.
    pub fn record_failed(&mut self, text: &str) {
        self.undelivered = Some(text.to_string());
    }

    /// Text of the last delivered message, if any.
    pub fn last_sent(&self) -> Option<&str> {
        self.sent.as_deref()
    }

    /// Text that failed to send and has not been delivered since.
    pub fn undelivered(&self) -> Option<&str> {
        self.undelivered.as_deref()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_first_message_is_sent() {
        let state = LastMessage::new();
        assert!(state.should_send("A"));
    }

    #[test]
    fn test_repeat_is_suppressed() {
        let mut state = LastMessage::new();
        state.record_sent("A");
        assert!(!state.should_send("A"));
        assert!(state.should_send("B"));
    }

    #[test]
    fn test_failed_send_keeps_previous_state() {
        let mut state = LastMessage::new();
        state.record_sent("A");
        state.record_failed("B");
        assert_eq!(state.last_sent(), Some("A"));
        assert!(state.should_send("B"));
        assert_eq!(state.undelivered(), Some("B"));
    }

    #[test]
    fn test_successful_retry_clears_undelivered() {
        let mut state = LastMessage::new();
        state.record_failed("B");
        state.record_sent("B");
        assert_eq!(state.undelivered(), None);
        assert_eq!(state.last_sent(), Some("B"));
    }

    #[test]
    fn test_superseded_message_is_dropped() {
        let mut state = LastMessage::new();
        state.record_failed("B");
        state.record_sent("C");
        assert_eq!(state.undelivered(), None);
        assert!(state.should_send("B"));
    }
}
