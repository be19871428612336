use chrono::Utc;
use std::sync::Arc;
use uuid::Uuid;
use validator::Validate;

use crate::db::{ProjectRepository, TaskFilter, TaskRepository};
use crate::error::AppError;
use crate::models::{Page, PageRequest, Pagination, Project, Task, TaskInput, TaskPatch, TaskStatus};
use crate::ownership::{ensure_owner, Boundary};
use crate::services::projects::PROJECT_NOT_FOUND_OR_NOT_AUTHORIZED;

pub const TASK_NOT_FOUND: &str = "Task not found";

/// CRUD over tasks. A task is owned by whoever owns its project, and that is
/// re-checked against the store on every call.
pub struct TaskStore {
    projects: Arc<dyn ProjectRepository>,
    tasks: Arc<dyn TaskRepository>,
}

impl TaskStore {
    pub fn new(projects: Arc<dyn ProjectRepository>, tasks: Arc<dyn TaskRepository>) -> Self {
        Self { projects, tasks }
    }

    /// Creates a task under `project_id`, which must exist and belong to
    /// `actor`.
    pub async fn create(
        &self,
        actor: Uuid,
        project_id: Uuid,
        input: TaskInput,
    ) -> Result<Task, AppError> {
        self.owned_project(actor, project_id).await?;
        input.validate()?;

        let task = Task::new(input, project_id);
        self.tasks.insert_task(&task).await?;
        Ok(task)
    }

    /// Lists a project's tasks oldest first. A blank `status` is the same as
    /// none; otherwise it must match one of the exact status spellings and
    /// anything else matches no task.
    pub async fn list_for_project(
        &self,
        actor: Uuid,
        project_id: Uuid,
        status: Option<&str>,
        page: PageRequest,
    ) -> Result<Page<Task>, AppError> {
        self.owned_project(actor, project_id).await?;

        let status = match status.map(str::trim).filter(|s| !s.is_empty()) {
            None => None,
            Some(raw) => match raw.parse::<TaskStatus>() {
                Ok(status) => Some(status),
                Err(()) => {
                    return Ok(Page {
                        items: Vec::new(),
                        pagination: Pagination::for_page(0, page),
                    })
                }
            },
        };
        let filter = TaskFilter { project_id, status };

        let total = self.tasks.count_tasks(filter).await?;
        let items = self.tasks.list_tasks(filter, page).await?;

        Ok(Page {
            items,
            pagination: Pagination::for_page(total, page),
        })
    }

    pub async fn update(&self, actor: Uuid, task_id: Uuid, patch: TaskPatch) -> Result<Task, AppError> {
        self.resolve_for_mutation(actor, task_id).await?;
        patch.validate()?;

        self.tasks
            .update_task(task_id, &patch, Utc::now())
            .await?
            .ok_or_else(|| AppError::NotFound(TASK_NOT_FOUND.into()))
    }

    pub async fn delete(&self, actor: Uuid, task_id: Uuid) -> Result<(), AppError> {
        self.resolve_for_mutation(actor, task_id).await?;

        if !self.tasks.delete_task(task_id).await? {
            return Err(AppError::NotFound(TASK_NOT_FOUND.into()));
        }
        Ok(())
    }

    /// Lookup boundary: "no such project" and "not yours" look the same.
    async fn owned_project(&self, actor: Uuid, project_id: Uuid) -> Result<Project, AppError> {
        let project = self
            .projects
            .find_project(project_id)
            .await?
            .ok_or_else(|| AppError::NotFound(PROJECT_NOT_FOUND_OR_NOT_AUTHORIZED.into()))?;

        ensure_owner(
            actor,
            Some(project.owner),
            Boundary::Lookup,
            PROJECT_NOT_FOUND_OR_NOT_AUTHORIZED,
        )?;
        Ok(project)
    }

    /// Mutation boundary: the task is resolved first, then its parent
    /// project's owner is compared with `actor`.
    async fn resolve_for_mutation(&self, actor: Uuid, task_id: Uuid) -> Result<Task, AppError> {
        let task = self
            .tasks
            .find_task(task_id)
            .await?
            .ok_or_else(|| AppError::NotFound(TASK_NOT_FOUND.into()))?;

        let owner = self
            .projects
            .find_project(task.project_id)
            .await?
            .map(|project| project.owner);
        if owner.is_none() {
            log::warn!("task {} references missing project {}", task.id, task.project_id);
        }

        ensure_owner(actor, owner, Boundary::Mutation, TASK_NOT_FOUND)?;
        Ok(task)
    }
}
