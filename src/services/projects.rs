use chrono::Utc;
use std::sync::Arc;
use uuid::Uuid;
use validator::Validate;

use crate::db::{ProjectFilter, ProjectRepository};
use crate::error::AppError;
use crate::models::{Page, PageRequest, Pagination, Project, ProjectInput, ProjectPatch};
use crate::ownership::{ensure_owner, Boundary};

pub const PROJECT_NOT_FOUND: &str = "Project not found";
pub const PROJECT_NOT_FOUND_OR_NOT_AUTHORIZED: &str = "Project not found or not authorized";

/// Owner-scoped CRUD over projects.
///
/// Every operation takes the authenticated user as `owner`; records belonging
/// to anyone else behave exactly as if they did not exist.
pub struct ProjectStore {
    projects: Arc<dyn ProjectRepository>,
}

impl ProjectStore {
    pub fn new(projects: Arc<dyn ProjectRepository>) -> Self {
        Self { projects }
    }

    /// Creates a project owned by `owner` and returns it with the owner's
    /// updated totals, so a client can tell when the new record opened a
    /// new page.
    pub async fn create(
        &self,
        owner: Uuid,
        input: ProjectInput,
    ) -> Result<(Project, Pagination), AppError> {
        input.validate()?;

        let project = Project::new(input, owner);
        self.projects.insert_project(&project).await?;

        let total = self.owner_total(owner).await?;
        Ok((project, Pagination::summary(total)))
    }

    /// Lists `owner`'s projects, newest first, one page at a time. A blank
    /// `search` is the same as none.
    pub async fn list(
        &self,
        owner: Uuid,
        page: PageRequest,
        search: Option<&str>,
    ) -> Result<Page<Project>, AppError> {
        let search = search.map(str::trim).filter(|s| !s.is_empty());
        let filter = ProjectFilter { owner, search };

        let total = self.projects.count_projects(filter).await?;
        let items = self.projects.list_projects(filter, page).await?;

        Ok(Page {
            items,
            pagination: Pagination::for_page(total, page),
        })
    }

    pub async fn get_by_id(&self, owner: Uuid, id: Uuid) -> Result<Project, AppError> {
        let project = self
            .projects
            .find_project(id)
            .await?
            .ok_or_else(|| AppError::NotFound(PROJECT_NOT_FOUND.into()))?;

        ensure_owner(owner, Some(project.owner), Boundary::Lookup, PROJECT_NOT_FOUND)?;
        Ok(project)
    }

    /// Applies a partial update. The owner filter is part of the write itself,
    /// so a concurrent ownership change cannot slip between check and update.
    pub async fn update(
        &self,
        owner: Uuid,
        id: Uuid,
        patch: ProjectPatch,
    ) -> Result<Project, AppError> {
        patch.validate()?;

        self.projects
            .update_project(owner, id, &patch, Utc::now())
            .await?
            .ok_or_else(|| AppError::NotFound(PROJECT_NOT_FOUND_OR_NOT_AUTHORIZED.into()))
    }

    /// Deletes the project and all of its tasks, then reports the owner's
    /// remaining totals.
    pub async fn delete(&self, owner: Uuid, id: Uuid) -> Result<Pagination, AppError> {
        if !self.projects.delete_project_with_tasks(owner, id).await? {
            return Err(AppError::NotFound(PROJECT_NOT_FOUND_OR_NOT_AUTHORIZED.into()));
        }

        log::info!("project {} deleted by {}", id, owner);
        let total = self.owner_total(owner).await?;
        Ok(Pagination::summary(total))
    }

    async fn owner_total(&self, owner: Uuid) -> Result<u64, AppError> {
        let filter = ProjectFilter {
            owner,
            search: None,
        };
        Ok(self.projects.count_projects(filter).await?)
    }
}
