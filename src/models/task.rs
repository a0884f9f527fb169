use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use std::fmt;
use validator::Validate;

use super::{present, Pagination, Priority};

/// Represents the status of a task.
/// Corresponds to the `task_status` SQL enum.
#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq, Eq, Default, sqlx::Type)]
#[sqlx(type_name = "task_status", rename_all = "snake_case")]
#[serde(rename_all = "snake_case")]
pub enum TaskStatus {
    /// Task is yet to be started.
    #[default]
    Todo,
    /// Task is currently being worked on.
    InProgress,
    /// Task is finished and waiting for review.
    InReview,
    /// Task is completed.
    Done,
}

impl TaskStatus {
    /// Every status, in board column order.
    pub const ALL: [TaskStatus; 4] = [
        TaskStatus::Todo,
        TaskStatus::InProgress,
        TaskStatus::InReview,
        TaskStatus::Done,
    ];

    pub fn label(self) -> &'static str {
        match self {
            TaskStatus::Todo => "To do",
            TaskStatus::InProgress => "In progress",
            TaskStatus::InReview => "In review",
            TaskStatus::Done => "Done",
        }
    }

    /// A task counts as completed exactly when its status is `Done`.
    pub fn is_completed(self) -> bool {
        self == TaskStatus::Done
    }
}

impl fmt::Display for TaskStatus {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Represents a task entity as stored in the database and returned by the API.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Task {
    pub id: i32,
    pub title: String,
    pub description: Option<String>,
    pub status: TaskStatus,
    pub priority: Priority,
    /// Derived from `status` whenever a status is written.
    pub is_completed: bool,
    pub due_date: Option<DateTime<Utc>>,
    /// The project this task belongs to. Ownership of the task follows the project.
    pub project_id: i32,
    pub assignee_id: Option<i32>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Input structure for creating a task.
#[derive(Debug, Serialize, Deserialize, Validate)]
pub struct TaskInput {
    /// Must be between 1 and 200 characters.
    #[validate(length(min = 1, max = 200))]
    pub title: String,
    pub description: Option<String>,
    #[serde(default)]
    pub status: TaskStatus,
    #[serde(default)]
    pub priority: Priority,
    pub due_date: Option<DateTime<Utc>>,
    /// Must reference a project owned by the caller.
    pub project_id: i32,
    pub assignee_id: Option<i32>,
}

impl TaskInput {
    pub fn is_completed(&self) -> bool {
        self.status.is_completed()
    }
}

/// Input structure for a partial task update.
///
/// Absent keys leave the stored value untouched. `description`, `due_date` and
/// `assignee_id` can be cleared with an explicit `null`.
#[derive(Debug, Default, Deserialize, Validate)]
pub struct TaskUpdate {
    #[validate(length(min = 1, max = 200))]
    pub title: Option<String>,
    #[serde(default, deserialize_with = "present")]
    pub description: Option<Option<String>>,
    pub status: Option<TaskStatus>,
    pub priority: Option<Priority>,
    /// Ignored when `status` is supplied, which always decides completion.
    pub is_completed: Option<bool>,
    #[serde(default, deserialize_with = "present")]
    pub due_date: Option<Option<DateTime<Utc>>>,
    pub project_id: Option<i32>,
    #[serde(default, deserialize_with = "present")]
    pub assignee_id: Option<Option<i32>>,
}

impl TaskUpdate {
    /// Merges the supplied fields into `task`, re-deriving `is_completed` when the
    /// status changes.
    pub fn apply_to(self, task: &mut Task) {
        if let Some(title) = self.title {
            task.title = title;
        }
        if let Some(description) = self.description {
            task.description = description;
        }
        if let Some(priority) = self.priority {
            task.priority = priority;
        }
        if let Some(due_date) = self.due_date {
            task.due_date = due_date;
        }
        if let Some(project_id) = self.project_id {
            task.project_id = project_id;
        }
        if let Some(assignee_id) = self.assignee_id {
            task.assignee_id = assignee_id;
        }
        match (self.status, self.is_completed) {
            (Some(status), _) => {
                task.status = status;
                task.is_completed = status.is_completed();
            }
            (None, Some(is_completed)) => task.is_completed = is_completed,
            (None, None) => {}
        }
    }
}

/// Query parameters accepted when listing tasks.
#[derive(Debug, Deserialize, Validate)]
pub struct TaskQuery {
    /// Restrict the listing to one project.
    pub project_id: Option<i32>,
    #[serde(default)]
    #[validate(range(min = 0))]
    pub skip: i64,
    #[serde(default = "super::default_limit")]
    #[validate(range(min = 1, max = 1000))]
    pub limit: i64,
}

impl TaskQuery {
    pub fn pagination(&self) -> Pagination {
        Pagination {
            skip: self.skip,
            limit: self.limit,
        }
    }
}
