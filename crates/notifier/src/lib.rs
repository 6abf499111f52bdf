//! Telegram delivery for status notifications.
//!
//! Messages go through the Bot API `sendMessage` method to a single chat.

use std::time::Duration;

use reqwest::StatusCode;
use serde::{Deserialize, Serialize};

use homework_common::config::AppConfig;
use homework_common::error::AppError;
use homework_common::types::Notifier;

#[derive(Debug, Serialize)]
struct SendMessageRequest<'a> {
    chat_id: &'a str,
    text: &'a str,
}

#[derive(Debug, Deserialize)]
struct BotApiReply {
    ok: bool,
    description: Option<String>,
}

/// Sends notifications to a fixed Telegram chat.
pub struct TelegramNotifier {
    client: reqwest::Client,
    api_url: String,
    token: String,
    chat_id: String,
}

impl TelegramNotifier {
    pub fn new(
        api_url: String,
        token: String,
        chat_id: String,
        timeout: Duration,
    ) -> Result<Self, AppError> {
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| AppError::Config(format!("failed to build HTTP client: {e}")))?;

        Ok(Self {
            client,
            api_url: api_url.trim_end_matches('/').to_string(),
            token,
            chat_id,
        })
    }

    pub fn from_config(config: &AppConfig) -> Result<Self, AppError> {
        Self::new(
            config.telegram_api_url.clone(),
            config.telegram_token.clone(),
            config.telegram_chat_id.clone(),
            config.request_timeout,
        )
    }

    fn send_message_url(&self) -> String {
        format!("{}/bot{}/sendMessage", self.api_url, self.token)
    }

    /// `sendMessage` POST for `text` addressed to the configured chat.
    fn request(&self, text: &str) -> reqwest::RequestBuilder {
        let request = SendMessageRequest {
            chat_id: &self.chat_id,
            text,
        };
        self.client.post(self.send_message_url()).json(&request)
    }
}

impl Notifier for TelegramNotifier {
    async fn send(&self, text: &str) -> Result<(), AppError> {
        // The URL embeds the bot token, so reqwest errors are logged without it.
        let response = self
            .request(text)
            .send()
            .await
            .map_err(|e| AppError::Notification(e.without_url().to_string()))?;

        let status = response.status();
        let body = response
            .text()
            .await
            .map_err(|e| AppError::Notification(e.without_url().to_string()))?;

        interpret_reply(status, &body)?;

        tracing::debug!(message = %text, "Message sent");
        Ok(())
    }
}

/// Map a Bot API reply to success or a notification error.
fn interpret_reply(status: StatusCode, body: &str) -> Result<(), AppError> {
    let reply: Option<BotApiReply> = serde_json::from_str(body).ok();

    match reply {
        Some(BotApiReply { ok: true, .. }) if status.is_success() => Ok(()),
        Some(BotApiReply {
            description: Some(description),
            ..
        }) => Err(AppError::Notification(description)),
        _ => Err(AppError::Notification(format!(
            "Bot API returned HTTP {}",
            status.as_u16()
        ))),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn notifier(api_url: &str) -> TelegramNotifier {
        TelegramNotifier::new(
            api_url.to_string(),
            "123:abc".to_string(),
            "42".to_string(),
            Duration::from_secs(5),
        )
        .unwrap()
    }

    #[test]
    fn test_send_message_url() {
        let n = notifier("https://api.telegram.org/");
        assert_eq!(
            n.send_message_url(),
            "https://api.telegram.org/bot123:abc/sendMessage"
        );
    }

    #[test]
    fn test_request_body_shape() {
        let body = serde_json::to_value(SendMessageRequest {
            chat_id: "42",
            text: "hello",
        })
        .unwrap();
        assert_eq!(body, serde_json::json!({"chat_id": "42", "text": "hello"}));
    }

    #[test]
    fn test_request_posts_json_to_send_message() {
        let n = notifier("https://api.telegram.org");
        let request = n.request("hello").build().unwrap();

        assert_eq!(request.method(), &reqwest::Method::POST);
        assert_eq!(request.url().path(), "/bot123:abc/sendMessage");
        assert_eq!(
            request.headers()[reqwest::header::CONTENT_TYPE],
            "application/json"
        );

        let body = request.body().and_then(|b| b.as_bytes()).unwrap();
        let body: serde_json::Value = serde_json::from_slice(body).unwrap();
        assert_eq!(body, serde_json::json!({"chat_id": "42", "text": "hello"}));
    }

    #[test]
    fn test_ok_reply() {
        let body = r#"{"ok": true, "result": {"message_id": 7}}"#;
        assert!(interpret_reply(StatusCode::OK, body).is_ok());
    }

    #[test]
    fn test_error_reply_carries_description() {
        let body = r#"{"ok": false, "error_code": 400, "description": "Bad Request: chat not found"}"#;
        let err = interpret_reply(StatusCode::BAD_REQUEST, body).unwrap_err();
        assert!(matches!(err, AppError::Notification(m) if m == "Bad Request: chat not found"));
    }

    #[test]
    fn test_unparseable_reply() {
        let err = interpret_reply(StatusCode::BAD_GATEWAY, "<html>").unwrap_err();
        assert!(matches!(err, AppError::Notification(m) if m == "Bot API returned HTTP 502"));
    }
}
