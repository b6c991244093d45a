//! Task Entity

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use tb_common::TsidGenerator;

/// Task lifecycle state.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub enum TaskStatus {
    Open,
    Closed,
}

/// Task record, keyed by a time-sorted ID.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct Task {
    /// Storage key (TSID)
    #[serde(rename = "_id")]
    pub id: String,

    /// Task title
    pub task_name: String,

    /// Username of the account the task belongs to
    pub user_id: String,

    /// Lifecycle state
    pub task_status: TaskStatus,

    /// Free-form comments
    #[serde(skip_serializing_if = "Option::is_none")]
    pub comments: Option<String>,

    /// When the task was opened
    pub task_start_date: DateTime<Utc>,

    /// When the task was closed; stamped by the server on the transition
    /// to `Closed`
    #[serde(skip_serializing_if = "Option::is_none")]
    pub task_close_date: Option<DateTime<Utc>>,
}

impl Task {
    /// Create a task. New tasks always start `Open` with the start date
    /// stamped server-side; callers cannot pre-close a task.
    pub fn new(
        task_name: impl Into<String>,
        user_id: impl Into<String>,
        comments: Option<String>,
    ) -> Self {
        Self {
            id: TsidGenerator::generate(),
            task_name: task_name.into(),
            user_id: user_id.into(),
            task_status: TaskStatus::Open,
            comments,
            task_start_date: Utc::now(),
            task_close_date: None,
        }
    }

    /// Apply an update. Moving to `Closed` stamps the close date once;
    /// reopening clears it.
    pub fn apply_update(&mut self, task_name: String, status: TaskStatus, comments: Option<String>) {
        self.task_name = task_name;
        self.comments = comments;

        match (self.task_status, status) {
            (TaskStatus::Open, TaskStatus::Closed) => {
                self.task_close_date = Some(Utc::now());
            }
            (TaskStatus::Closed, TaskStatus::Open) => {
                self.task_close_date = None;
            }
            _ => {}
        }
        self.task_status = status;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_task_starts_open() {
        let task = Task::new("Report Generation", "ramesh", None);
        assert_eq!(task.task_status, TaskStatus::Open);
        assert!(task.task_close_date.is_none());
        assert_eq!(task.id.len(), 13);
    }

    #[test]
    fn test_closing_stamps_close_date() {
        let mut task = Task::new("Report Generation", "ramesh", None);
        task.apply_update("Report Generation".to_string(), TaskStatus::Closed, None);

        assert_eq!(task.task_status, TaskStatus::Closed);
        assert!(task.task_close_date.is_some());
    }

    #[test]
    fn test_reopening_clears_close_date() {
        let mut task = Task::new("Report Generation", "ramesh", None);
        task.apply_update("Report Generation".to_string(), TaskStatus::Closed, None);
        task.apply_update("Report Generation".to_string(), TaskStatus::Open, None);

        assert_eq!(task.task_status, TaskStatus::Open);
        assert!(task.task_close_date.is_none());
    }

    #[test]
    fn test_status_wire_format() {
        assert_eq!(serde_json::to_string(&TaskStatus::Open).unwrap(), "\"Open\"");
        assert_eq!(
            serde_json::to_string(&TaskStatus::Closed).unwrap(),
            "\"Closed\""
        );
    }
}
