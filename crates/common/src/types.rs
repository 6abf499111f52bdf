use std::future::Future;
use std::str::FromStr;

use crate::error::AppError;

/// `from_date` cursor that asks the API for the full homework history.
pub const ALL_HOMEWORKS: i64 = 0;

/// Index of the most recent record in the `homeworks` list.
pub const LAST_HOMEWORK: usize = 0;

/// Review status of a submitted homework.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HomeworkStatus {
    Approved,
    Reviewing,
    Rejected,
}

impl HomeworkStatus {
    /// Human-readable verdict sent to the user.
    pub fn verdict(&self) -> &'static str {
        match self {
            HomeworkStatus::Approved => "Работа проверена: ревьюеру всё понравилось. Ура!",
            HomeworkStatus::Reviewing => "Работа взята на проверку ревьюером.",
            HomeworkStatus::Rejected => "Работа проверена: у ревьюера есть замечания.",
        }
    }
}

impl std::fmt::Display for HomeworkStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            HomeworkStatus::Approved => write!(f, "approved"),
            HomeworkStatus::Reviewing => write!(f, "reviewing"),
            HomeworkStatus::Rejected => write!(f, "rejected"),
        }
    }
}

impl FromStr for HomeworkStatus {
    type Err = AppError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "approved" => Ok(HomeworkStatus::Approved),
            "reviewing" => Ok(HomeworkStatus::Reviewing),
            "rejected" => Ok(HomeworkStatus::Rejected),
            other => Err(AppError::UnknownStatus(other.to_string())),
        }
    }
}

/// A homework record once its required fields have been checked.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Homework {
    pub name: String,
    pub status: HomeworkStatus,
}

impl Homework {
    /// Render the status-change notification for this record.
    pub fn status_message(&self) -> String {
        format!(
            "Status changed for submission \"{}\". {}",
            self.name,
            self.status.verdict()
        )
    }
}

/// Source of raw review API payloads.
pub trait HomeworkSource {
    /// Fetch the homework list updated since `from_date` (a unix timestamp).
    fn fetch(
        &self,
        from_date: i64,
    ) -> impl Future<Output = Result<serde_json::Value, AppError>>;
}

/// Channel used to deliver text notifications to the user.
pub trait Notifier {
    fn send(&self, text: &str) -> impl Future<Output = Result<(), AppError>>;
}
