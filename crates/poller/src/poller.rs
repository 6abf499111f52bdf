use std::time::Duration;

use reqwest::StatusCode;
use reqwest::header::AUTHORIZATION;
use serde_json::Value;

use homework_common::config::AppConfig;
use homework_common::error::AppError;
use homework_common::types::HomeworkSource;

/// Client for the homework review API.
pub struct ReviewApiClient {
    client: reqwest::Client,
    endpoint: String,
    token: String,
}

impl ReviewApiClient {
    pub fn new(endpoint: String, token: String, timeout: Duration) -> Result<Self, AppError> {
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| AppError::Config(format!("failed to build HTTP client: {e}")))?;

        Ok(Self {
            client,
            endpoint,
            token,
        })
    }

    pub fn from_config(config: &AppConfig) -> Result<Self, AppError> {
        Self::new(
            config.endpoint.clone(),
            config.practicum_token.clone(),
            config.request_timeout,
        )
    }

    /// Authenticated GET for the statuses updated since `from_date`.
    fn request(&self, from_date: i64) -> reqwest::RequestBuilder {
        self.client
            .get(&self.endpoint)
            .header(AUTHORIZATION, format!("OAuth {}", self.token))
            .query(&[("from_date", from_date)])
    }
}

impl HomeworkSource for ReviewApiClient {
    /// Request the homework statuses updated since `from_date`.
    async fn fetch(&self, from_date: i64) -> Result<Value, AppError> {
        let response = self
            .request(from_date)
            .send()
            .await
            .map_err(|e| {
                tracing::error!(endpoint = %self.endpoint, error = %e, "Failed to connect to the API");
                AppError::Connection(e.to_string())
            })?;

        let status = response.status();
        let body = response
            .text()
            .await
            .map_err(|e| AppError::Connection(format!("failed to read response body: {e}")))?;

        interpret_response(status, &body)
    }
}

/// Map an HTTP status and raw body to the decoded payload or a typed error.
///
/// Error bodies come in two shapes:
/// - `{"code": .., "message": "..."}`
/// - `{"code": .., "error": {"error": "..."}}`
pub fn interpret_response(status: StatusCode, body: &str) -> Result<Value, AppError> {
    if status == StatusCode::OK {
        tracing::info!("Endpoint reachable");
        return serde_json::from_str(body).map_err(|e| {
            tracing::error!(error = %e, "Response body is not valid JSON");
            AppError::ApiResponse(format!("invalid JSON in response: {e}"))
        });
    }

    tracing::warn!(status = status.as_u16(), "API returned an error status");

    let parsed: Value = serde_json::from_str(body).unwrap_or(Value::Null);
    let message = match parsed.get("code").filter(|code| is_set(code)) {
        Some(code) => error_message(&parsed)
            .map(str::to_string)
            .unwrap_or_else(|| format!("API returned error code {code}")),
        None => format!("endpoint returned HTTP {}", status.as_u16()),
    };

    tracing::error!(error = %message, "Error in API response");
    Err(AppError::ApiResponse(message))
}

fn error_message(body: &Value) -> Option<&str> {
    body.get("message")
        .and_then(Value::as_str)
        .filter(|m| !m.is_empty())
        .or_else(|| {
            body.get("error")
                .and_then(|e| e.get("error"))
                .and_then(Value::as_str)
        })
}

fn is_set(value: &Value) -> bool {
    match value {
        Value::Null => false,
        Value::Bool(b) => *b,
        Value::Number(n) => n.as_f64() != Some(0.0),
        Value::String(s) => !s.is_empty(),
        Value::Array(a) => !a.is_empty(),
        Value::Object(o) => !o.is_empty(),
    }
}

#[cfg(test)]
mod tests {
    use homework_common::types::ALL_HOMEWORKS;

    use super::*;

    #[test]
    fn test_ok_body_is_decoded() {
        let body = r#"{"homeworks": [{"homework_name": "proj1", "status": "approved"}], "current_date": 1}"#;
        let value = interpret_response(StatusCode::OK, body).unwrap();
        assert_eq!(value["homeworks"][0]["status"], "approved");
    }

    #[test]
    fn test_ok_body_that_is_not_json() {
        let err = interpret_response(StatusCode::OK, "<html>").unwrap_err();
        assert!(matches!(err, AppError::ApiResponse(m) if m.starts_with("invalid JSON")));
    }

    #[test]
    fn test_error_with_message_field() {
        let body = r#"{"code": "not_authenticated", "message": "Учетные данные не были предоставлены."}"#;
        let err = interpret_response(StatusCode::UNAUTHORIZED, body).unwrap_err();
        assert!(
            matches!(err, AppError::ApiResponse(m) if m == "Учетные данные не были предоставлены.")
        );
    }

    #[test]
    fn test_error_with_nested_error_field() {
        let body = r#"{"code": "UnknownError", "error": {"error": "Wrong from_date format"}}"#;
        let err = interpret_response(StatusCode::BAD_REQUEST, body).unwrap_err();
        assert!(matches!(err, AppError::ApiResponse(m) if m == "Wrong from_date format"));
    }

    #[test]
    fn test_error_code_without_message() {
        let body = r#"{"code": "throttled"}"#;
        let err = interpret_response(StatusCode::TOO_MANY_REQUESTS, body).unwrap_err();
        assert!(matches!(err, AppError::ApiResponse(m) if m.contains("throttled")));
    }

    #[test]
    fn test_non_ok_without_code() {
        let err = interpret_response(StatusCode::SERVICE_UNAVAILABLE, "").unwrap_err();
        assert!(matches!(err, AppError::ApiResponse(m) if m == "endpoint returned HTTP 503"));
    }

    #[test]
    fn test_empty_code_is_ignored() {
        let body = r#"{"code": "", "message": "ignored"}"#;
        let err = interpret_response(StatusCode::NOT_FOUND, body).unwrap_err();
        assert!(matches!(err, AppError::ApiResponse(m) if m == "endpoint returned HTTP 404"));
    }

    #[test]
    fn test_request_carries_cursor_and_oauth_header() {
        let client = ReviewApiClient::new(
            "http://localhost:8080/statuses/".to_string(),
            "tok".to_string(),
            Duration::from_secs(5),
        )
        .unwrap();

        let request = client.request(ALL_HOMEWORKS).build().unwrap();

        assert_eq!(request.method(), &reqwest::Method::GET);
        assert_eq!(request.url().path(), "/statuses/");
        assert_eq!(request.url().query(), Some("from_date=0"));
        assert_eq!(request.headers()[AUTHORIZATION], "OAuth tok");
    }

    #[test]
    fn test_request_uses_given_cursor() {
        let client = ReviewApiClient::new(
            "http://localhost:8080/statuses/".to_string(),
            "tok".to_string(),
            Duration::from_secs(5),
        )
        .unwrap();

        let request = client.request(1_700_000_000).build().unwrap();
        assert_eq!(request.url().query(), Some("from_date=1700000000"));
    }

    #[test]
    fn test_client_builds_from_config() {
        let config = AppConfig::from_lookup(|key| match key {
            "PRACTICUM_TOKEN" => Some("p".to_string()),
            "TELEGRAM_TOKEN" => Some("t".to_string()),
            "TELEGRAM_CHAT_ID" => Some("1".to_string()),
            _ => None,
        })
        .unwrap();
        let client = ReviewApiClient::from_config(&config).unwrap();
        assert_eq!(client.endpoint, config.endpoint);
    }
}
