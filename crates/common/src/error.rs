use thiserror::Error;

/// Common error types used across the application.
#[derive(Debug, Error)]
pub enum AppError {
    #[error("Required environment variable {0} is missing")]
    ConfigMissing(&'static str),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Failed to connect to the API: {0}")]
    Connection(String),

    #[error("API response error: {0}")]
    ApiResponse(String),

    #[error("Unexpected type: {0}")]
    TypeMismatch(String),

    #[error("Key not found: \"{0}\"")]
    MissingKey(String),

    #[error("Unknown homework status: {0}")]
    UnknownStatus(String),

    #[error("Notification error: {0}")]
    Notification(String),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display_names_the_missing_key() {
        let err = AppError::MissingKey("homeworks".into());
        assert_eq!(err.to_string(), "Key not found: \"homeworks\"");
    }
}
