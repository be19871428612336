//! Demo data for local development.

use uuid::Uuid;

use super::{ProjectFilter, Store, StoreError};
use crate::auth::password::hash_password;
use crate::error::AppError;
use crate::models::{PageRequest, Project, ProjectInput, Task, TaskInput, TaskStatus, User};

pub const DEMO_EMAIL: &str = "test@example.com";
pub const DEMO_PASSWORD: &str = "Test@123";
pub const DEMO_NAME: &str = "Seed User";

const DEMO_PROJECTS: [(&str, &str); 2] = [
    ("Project Alpha", "Seed project alpha"),
    ("Project Beta", "Seed project beta"),
];

const DEMO_TASKS: [(&str, &str, TaskStatus); 3] = [
    ("Setup repo", "Initialize repository, readme", TaskStatus::Todo),
    ("Build auth", "Auth endpoints and JWT", TaskStatus::InProgress),
    ("Write tests", "Add unit tests", TaskStatus::Todo),
];

/// What a seeding run produced.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SeedReport {
    pub user_id: Uuid,
    pub user_created: bool,
    pub projects_removed: u64,
    pub projects_created: usize,
    pub tasks_created: usize,
}

/// Makes sure the demo user exists, wipes its projects (with their tasks) and
/// recreates the demo projects. Safe to run repeatedly.
pub async fn seed_demo<S: Store + ?Sized>(store: &S, bcrypt_cost: u32) -> Result<SeedReport, AppError> {
    let (user_id, user_created) = match store.find_user_by_email(DEMO_EMAIL).await? {
        Some(user) => (user.id, false),
        None => {
            let hash = hash_password(DEMO_PASSWORD, bcrypt_cost).await?;
            let user = User::new(DEMO_EMAIL.into(), hash, Some(DEMO_NAME.into()));
            store.insert_user(&user).await?;
            (user.id, true)
        }
    };

    let projects_removed = remove_projects(store, user_id).await?;

    let mut tasks_created = 0;
    for (title, description) in DEMO_PROJECTS {
        let project = Project::new(
            ProjectInput {
                title: title.into(),
                description: Some(description.into()),
                status: None,
            },
            user_id,
        );
        store.insert_project(&project).await?;

        for (title, description, status) in DEMO_TASKS {
            let task = Task::new(
                TaskInput {
                    title: title.into(),
                    description: Some(description.into()),
                    status: Some(status),
                    due_date: None,
                },
                project.id,
            );
            store.insert_task(&task).await?;
            tasks_created += 1;
        }
    }

    Ok(SeedReport {
        user_id,
        user_created,
        projects_removed,
        projects_created: DEMO_PROJECTS.len(),
        tasks_created,
    })
}

async fn remove_projects<S: Store + ?Sized>(store: &S, owner: Uuid) -> Result<u64, StoreError> {
    let filter = ProjectFilter { owner, search: None };
    let mut removed = 0;
    loop {
        let batch = store.list_projects(filter, PageRequest::default()).await?;
        if batch.is_empty() {
            return Ok(removed);
        }
        let before = removed;
        for project in batch {
            if store.delete_project_with_tasks(owner, project.id).await? {
                removed += 1;
            }
        }
        if removed == before {
            return Ok(removed);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::{MemoryStore, TaskFilter, TaskRepository};
    use crate::services::ProjectStore;
    use std::sync::Arc;

    #[actix_rt::test]
    async fn test_seed_is_repeatable() {
        let store = Arc::new(MemoryStore::new());

        let first = seed_demo(store.as_ref(), 4).await.unwrap();
        assert!(first.user_created);
        assert_eq!(first.projects_removed, 0);
        assert_eq!(first.tasks_created, 6);

        let second = seed_demo(store.as_ref(), 4).await.unwrap();
        assert!(!second.user_created);
        assert_eq!(second.user_id, first.user_id);
        assert_eq!(second.projects_removed, 2);

        let projects = ProjectStore::new(store.clone());
        let page = projects
            .list(first.user_id, PageRequest::default(), None)
            .await
            .unwrap();
        assert_eq!(page.pagination.total, 2);
        for project in page.items {
            let filter = TaskFilter {
                project_id: project.id,
                status: None,
            };
            assert_eq!(store.count_tasks(filter).await.unwrap(), 3);
        }
    }
}
