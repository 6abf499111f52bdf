//! Status interpreter — turns a homework record into notification text.

use serde_json::Value;

use homework_common::error::AppError;
use homework_common::types::{Homework, HomeworkStatus};

/// Extract the required fields from a raw homework record.
pub fn parse_homework(record: &Value) -> Result<Homework, AppError> {
    let name = record
        .get("homework_name")
        .and_then(|v| v.as_str())
        .filter(|s| !s.is_empty())
        .ok_or_else(|| AppError::MissingKey("homework_name".to_string()))?;

    let status = match record.get("status") {
        Some(Value::String(raw)) => raw.parse::<HomeworkStatus>().inspect_err(|_| {
            tracing::error!(status = %raw, "Homework status not recognised");
        })?,
        Some(other) => {
            tracing::error!(status = %other, "Homework status not recognised");
            return Err(AppError::UnknownStatus(other.to_string()));
        }
        None => return Err(AppError::UnknownStatus("<missing>".to_string())),
    };

    tracing::debug!(homework = %name, %status, "Homework status parsed");

    Ok(Homework {
        name: name.to_string(),
        status,
    })
}

/// Render the status-change message for a raw homework record.
pub fn parse_status(record: &Value) -> Result<String, AppError> {
    parse_homework(record).map(|hw| hw.status_message())
}
