use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use std::str::FromStr;
use uuid::Uuid;
use validator::Validate;

/// Represents the status of a task.
/// Corresponds to the `task_status` SQL enum.
#[derive(Debug, Default, Serialize, Deserialize, Clone, Copy, PartialEq, Eq, sqlx::Type)]
#[sqlx(type_name = "task_status")]
pub enum TaskStatus {
    /// Task is yet to be started.
    #[default]
    #[serde(rename = "To-do")]
    #[sqlx(rename = "To-do")]
    Todo,
    /// Task is currently being worked on.
    #[serde(rename = "In-Progress")]
    #[sqlx(rename = "In-Progress")]
    InProgress,
    /// Task is completed.
    Done,
}

/// Exact, case-sensitive parse of the wire spelling.
impl FromStr for TaskStatus {
    type Err = ();

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "To-do" => Ok(TaskStatus::Todo),
            "In-Progress" => Ok(TaskStatus::InProgress),
            "Done" => Ok(TaskStatus::Done),
            _ => Err(()),
        }
    }
}

/// Input structure for creating a task under a project.
#[derive(Debug, Serialize, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct TaskInput {
    /// The title of the task.
    /// Must be between 1 and 200 characters.
    #[validate(length(min = 1, max = 200, message = "Title is required"))]
    pub title: String,

    /// An optional description for the task.
    /// Maximum length of 1000 characters if provided.
    #[validate(length(max = 1000))]
    pub description: Option<String>,

    /// Defaults to `To-do` when omitted.
    pub status: Option<TaskStatus>,

    /// Optional due date (`YYYY-MM-DD`).
    pub due_date: Option<NaiveDate>,
}

/// Partial update for a task. The parent project is fixed at creation and is
/// not part of the patch.
#[derive(Debug, Default, Serialize, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct TaskPatch {
    #[validate(length(min = 1, max = 200, message = "Title must not be empty"))]
    pub title: Option<String>,

    #[validate(length(max = 1000))]
    pub description: Option<String>,

    pub status: Option<TaskStatus>,

    pub due_date: Option<NaiveDate>,
}

/// Represents a task entity as stored in the database and returned by the API.
///
/// A task has no owner of its own: whoever owns `project_id` owns the task.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Task {
    /// Unique identifier for the task (UUID v4).
    pub id: Uuid,
    /// The project this task belongs to.
    pub project_id: Uuid,
    pub title: String,
    pub description: Option<String>,
    pub status: TaskStatus,
    pub due_date: Option<NaiveDate>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Task {
    /// Creates a new `Task` under `project_id`.
    /// Sets `created_at`, `updated_at` to the current time, and `id` to a new UUID.
    pub fn new(input: TaskInput, project_id: Uuid) -> Self {
        let now = Utc::now();
        Self {
            id: Uuid::new_v4(),
            project_id,
            title: input.title,
            description: input.description,
            status: input.status.unwrap_or_default(),
            due_date: input.due_date,
            created_at: now,
            updated_at: now,
        }
    }

    /// Applies a patch in place and bumps `updated_at`.
    pub fn apply(&mut self, patch: &TaskPatch, now: DateTime<Utc>) {
        if let Some(title) = &patch.title {
            self.title = title.clone();
        }
        if let Some(description) = &patch.description {
            self.description = Some(description.clone());
        }
        if let Some(status) = patch.status {
            self.status = status;
        }
        if let Some(due_date) = patch.due_date {
            self.due_date = Some(due_date);
        }
        self.updated_at = now;
    }
}
