//! Storage contract.
//!
//! The stores above this layer only ever talk to these traits, so the same
//! business rules run against PostgreSQL in production and against
//! [`MemoryStore`] in tests. Every read goes to the backend; nothing is cached.

pub mod memory;
pub mod postgres;
pub mod seed;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use uuid::Uuid;

use crate::models::{PageRequest, Project, ProjectPatch, Task, TaskPatch, TaskStatus, User};

pub use memory::MemoryStore;
pub use postgres::PgStore;

#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    /// A user with this email already exists.
    #[error("email already registered")]
    DuplicateEmail,

    #[error("database error: {0}")]
    Database(#[from] sqlx::Error),

    #[error("database migration failed: {0}")]
    Migration(#[from] sqlx::migrate::MigrateError),
}

/// Filter for project listings: always scoped to one owner.
#[derive(Debug, Clone, Copy)]
pub struct ProjectFilter<'a> {
    pub owner: Uuid,
    /// Case-insensitive substring matched against title or description.
    pub search: Option<&'a str>,
}

/// Filter for task listings: always scoped to one project.
#[derive(Debug, Clone, Copy)]
pub struct TaskFilter {
    pub project_id: Uuid,
    /// Exact status match.
    pub status: Option<TaskStatus>,
}

#[async_trait]
pub trait UserRepository: Send + Sync {
    async fn find_user_by_email(&self, email: &str) -> Result<Option<User>, StoreError>;

    /// Fails with [`StoreError::DuplicateEmail`] if the email is taken.
    async fn insert_user(&self, user: &User) -> Result<(), StoreError>;
}

#[async_trait]
pub trait ProjectRepository: Send + Sync {
    async fn insert_project(&self, project: &Project) -> Result<(), StoreError>;

    async fn find_project(&self, id: Uuid) -> Result<Option<Project>, StoreError>;

    async fn count_projects(&self, filter: ProjectFilter<'_>) -> Result<u64, StoreError>;

    /// Newest-created first.
    async fn list_projects(
        &self,
        filter: ProjectFilter<'_>,
        page: PageRequest,
    ) -> Result<Vec<Project>, StoreError>;

    /// Applies `patch` to the project matching both `id` and `owner`.
    /// Returns `None` when no such project exists.
    async fn update_project(
        &self,
        owner: Uuid,
        id: Uuid,
        patch: &ProjectPatch,
        now: DateTime<Utc>,
    ) -> Result<Option<Project>, StoreError>;

    /// Deletes the project matching both `id` and `owner` together with all of
    /// its tasks, as one unit. Returns `false` when no such project exists.
    async fn delete_project_with_tasks(&self, owner: Uuid, id: Uuid) -> Result<bool, StoreError>;
}

#[async_trait]
pub trait TaskRepository: Send + Sync {
    async fn insert_task(&self, task: &Task) -> Result<(), StoreError>;

    async fn find_task(&self, id: Uuid) -> Result<Option<Task>, StoreError>;

    async fn count_tasks(&self, filter: TaskFilter) -> Result<u64, StoreError>;

    /// Oldest-created first.
    async fn list_tasks(&self, filter: TaskFilter, page: PageRequest) -> Result<Vec<Task>, StoreError>;

    async fn update_task(
        &self,
        id: Uuid,
        patch: &TaskPatch,
        now: DateTime<Utc>,
    ) -> Result<Option<Task>, StoreError>;

    /// Returns `false` when the task did not exist.
    async fn delete_task(&self, id: Uuid) -> Result<bool, StoreError>;
}

/// A backend that provides every repository.
pub trait Store: UserRepository + ProjectRepository + TaskRepository {}

impl<T> Store for T where T: UserRepository + ProjectRepository + TaskRepository {}
