//! Response validator — checks the decoded review API payload against the
//! documented shape and picks the record to report on.
//!
//! The API returns `homeworks` most-recent-first, so the record at
//! [`LAST_HOMEWORK`] is always the current one.

use serde_json::Value;

use homework_common::error::AppError;
use homework_common::types::LAST_HOMEWORK;

/// Key holding the homework list in a successful response.
pub const HOMEWORKS_KEY: &str = "homeworks";

/// Validate `response` and return the most recent homework record.
pub fn check_response(response: &Value) -> Result<&Value, AppError> {
    let Some(body) = response.as_object() else {
        return Err(AppError::TypeMismatch(format!(
            "response is not a mapping (got {})",
            kind(response)
        )));
    };

    let homeworks = match body.get(HOMEWORKS_KEY) {
        None | Some(Value::Null) => return Err(AppError::MissingKey(HOMEWORKS_KEY.to_string())),
        Some(Value::Array(list)) => list,
        Some(other) => {
            return Err(AppError::TypeMismatch(format!(
                "\"{HOMEWORKS_KEY}\" is not a list (got {})",
                kind(other)
            )));
        }
    };

    let Some(current) = homeworks.get(LAST_HOMEWORK) else {
        return Err(AppError::MissingKey(HOMEWORKS_KEY.to_string()));
    };

    if !current.is_object() {
        return Err(AppError::TypeMismatch(format!(
            "homework record is not a mapping (got {})",
            kind(current)
        )));
    }

    Ok(current)
}

fn kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "bool",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "list",
        Value::Object(_) => "mapping",
    }
}
