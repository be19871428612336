use async_trait::async_trait;
use chrono::{DateTime, Utc};
use tokio::sync::RwLock;
use uuid::Uuid;

use super::{
    ProjectFilter, ProjectRepository, StoreError, TaskFilter, TaskRepository, UserRepository,
};
use crate::models::{PageRequest, Project, ProjectPatch, Task, TaskPatch, User};

#[derive(Default)]
struct Collections {
    users: Vec<User>,
    // Insertion order doubles as the tie-breaker for equal timestamps.
    projects: Vec<Project>,
    tasks: Vec<Task>,
}

/// In-process backend. Used by the test suite and for trying the API without
/// a database; state lives only as long as the value.
#[derive(Default)]
pub struct MemoryStore {
    inner: RwLock<Collections>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

fn window<T>(items: Vec<T>, page: PageRequest) -> Vec<T> {
    items
        .into_iter()
        .skip(page.offset() as usize)
        .take(page.limit() as usize)
        .collect()
}

fn project_matches(project: &Project, filter: &ProjectFilter<'_>) -> bool {
    project.owner == filter.owner
        && filter
            .search
            .map_or(true, |needle| project.matches_search(needle))
}

fn task_matches(task: &Task, filter: &TaskFilter) -> bool {
    task.project_id == filter.project_id && filter.status.map_or(true, |s| task.status == s)
}

#[async_trait]
impl UserRepository for MemoryStore {
    async fn find_user_by_email(&self, email: &str) -> Result<Option<User>, StoreError> {
        let data = self.inner.read().await;
        Ok(data.users.iter().find(|u| u.email == email).cloned())
    }

    async fn insert_user(&self, user: &User) -> Result<(), StoreError> {
        let mut data = self.inner.write().await;
        if data.users.iter().any(|u| u.email == user.email) {
            return Err(StoreError::DuplicateEmail);
        }
        data.users.push(user.clone());
        Ok(())
    }
}

#[async_trait]
impl ProjectRepository for MemoryStore {
    async fn insert_project(&self, project: &Project) -> Result<(), StoreError> {
        self.inner.write().await.projects.push(project.clone());
        Ok(())
    }

    async fn find_project(&self, id: Uuid) -> Result<Option<Project>, StoreError> {
        let data = self.inner.read().await;
        Ok(data.projects.iter().find(|p| p.id == id).cloned())
    }

    async fn count_projects(&self, filter: ProjectFilter<'_>) -> Result<u64, StoreError> {
        let data = self.inner.read().await;
        Ok(data
            .projects
            .iter()
            .filter(|p| project_matches(p, &filter))
            .count() as u64)
    }

    async fn list_projects(
        &self,
        filter: ProjectFilter<'_>,
        page: PageRequest,
    ) -> Result<Vec<Project>, StoreError> {
        let data = self.inner.read().await;
        // Walk newest insertion first so the stable sort keeps later records
        // ahead of earlier ones that share a timestamp.
        let mut matching: Vec<Project> = data
            .projects
            .iter()
            .rev()
            .filter(|p| project_matches(p, &filter))
            .cloned()
            .collect();
        matching.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        Ok(window(matching, page))
    }

    async fn update_project(
        &self,
        owner: Uuid,
        id: Uuid,
        patch: &ProjectPatch,
        now: DateTime<Utc>,
    ) -> Result<Option<Project>, StoreError> {
        let mut data = self.inner.write().await;
        Ok(data
            .projects
            .iter_mut()
            .find(|p| p.id == id && p.owner == owner)
            .map(|project| {
                project.apply(patch, now);
                project.clone()
            }))
    }

    async fn delete_project_with_tasks(&self, owner: Uuid, id: Uuid) -> Result<bool, StoreError> {
        // One write guard covers both removals.
        let mut data = self.inner.write().await;
        let before = data.projects.len();
        data.projects.retain(|p| !(p.id == id && p.owner == owner));
        if data.projects.len() == before {
            return Ok(false);
        }
        data.tasks.retain(|t| t.project_id != id);
        Ok(true)
    }
}

#[async_trait]
impl TaskRepository for MemoryStore {
    async fn insert_task(&self, task: &Task) -> Result<(), StoreError> {
        self.inner.write().await.tasks.push(task.clone());
        Ok(())
    }

    async fn find_task(&self, id: Uuid) -> Result<Option<Task>, StoreError> {
        let data = self.inner.read().await;
        Ok(data.tasks.iter().find(|t| t.id == id).cloned())
    }

    async fn count_tasks(&self, filter: TaskFilter) -> Result<u64, StoreError> {
        let data = self.inner.read().await;
        Ok(data.tasks.iter().filter(|t| task_matches(t, &filter)).count() as u64)
    }

    async fn list_tasks(&self, filter: TaskFilter, page: PageRequest) -> Result<Vec<Task>, StoreError> {
        let data = self.inner.read().await;
        let mut matching: Vec<Task> = data
            .tasks
            .iter()
            .filter(|t| task_matches(t, &filter))
            .cloned()
            .collect();
        matching.sort_by(|a, b| a.created_at.cmp(&b.created_at));
        Ok(window(matching, page))
    }

    async fn update_task(
        &self,
        id: Uuid,
        patch: &TaskPatch,
        now: DateTime<Utc>,
    ) -> Result<Option<Task>, StoreError> {
        let mut data = self.inner.write().await;
        Ok(data.tasks.iter_mut().find(|t| t.id == id).map(|task| {
            task.apply(patch, now);
            task.clone()
        }))
    }

    async fn delete_task(&self, id: Uuid) -> Result<bool, StoreError> {
        let mut data = self.inner.write().await;
        let before = data.tasks.len();
        data.tasks.retain(|t| t.id != id);
        Ok(data.tasks.len() != before)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{ProjectInput, TaskInput, TaskStatus};

    fn project(owner: Uuid, title: &str) -> Project {
        Project::new(
            ProjectInput {
                title: title.to_string(),
                description: None,
                status: None,
            },
            owner,
        )
    }

    fn task(project_id: Uuid, title: &str, status: TaskStatus) -> Task {
        Task::new(
            TaskInput {
                title: title.to_string(),
                description: None,
                status: Some(status),
                due_date: None,
            },
            project_id,
        )
    }

    #[actix_rt::test]
    async fn test_duplicate_email_rejected() {
        let store = MemoryStore::new();
        let user = User::new("dup@example.com".into(), "hash".into(), None);
        store.insert_user(&user).await.unwrap();

        let again = User::new("dup@example.com".into(), "other".into(), Some("Other".into()));
        assert!(matches!(
            store.insert_user(&again).await,
            Err(StoreError::DuplicateEmail)
        ));
    }

    #[actix_rt::test]
    async fn test_projects_listed_newest_first_even_with_equal_timestamps() {
        let store = MemoryStore::new();
        let owner = Uuid::new_v4();
        let first = project(owner, "first");
        let mut second = project(owner, "second");
        second.created_at = first.created_at;
        store.insert_project(&first).await.unwrap();
        store.insert_project(&second).await.unwrap();

        let filter = ProjectFilter { owner, search: None };
        let listed = store.list_projects(filter, PageRequest::default()).await.unwrap();
        let titles: Vec<&str> = listed.iter().map(|p| p.title.as_str()).collect();
        assert_eq!(titles, vec!["second", "first"]);
    }

    #[actix_rt::test]
    async fn test_update_requires_matching_owner() {
        let store = MemoryStore::new();
        let owner = Uuid::new_v4();
        let p = project(owner, "mine");
        store.insert_project(&p).await.unwrap();

        let patch = ProjectPatch {
            title: Some("stolen".into()),
            ..Default::default()
        };
        let result = store
            .update_project(Uuid::new_v4(), p.id, &patch, Utc::now())
            .await
            .unwrap();
        assert!(result.is_none());
        assert_eq!(store.find_project(p.id).await.unwrap().unwrap().title, "mine");
    }

    #[actix_rt::test]
    async fn test_delete_project_removes_only_its_tasks() {
        let store = MemoryStore::new();
        let owner = Uuid::new_v4();
        let doomed = project(owner, "doomed");
        let kept = project(owner, "kept");
        store.insert_project(&doomed).await.unwrap();
        store.insert_project(&kept).await.unwrap();
        store.insert_task(&task(doomed.id, "a", TaskStatus::Todo)).await.unwrap();
        store.insert_task(&task(doomed.id, "b", TaskStatus::Done)).await.unwrap();
        let survivor = task(kept.id, "c", TaskStatus::Todo);
        store.insert_task(&survivor).await.unwrap();

        assert!(!store.delete_project_with_tasks(Uuid::new_v4(), doomed.id).await.unwrap());
        assert!(store.delete_project_with_tasks(owner, doomed.id).await.unwrap());

        let doomed_filter = TaskFilter { project_id: doomed.id, status: None };
        assert_eq!(store.count_tasks(doomed_filter).await.unwrap(), 0);
        assert!(store.find_task(survivor.id).await.unwrap().is_some());
    }

    #[actix_rt::test]
    async fn test_task_status_filter_is_exact() {
        let store = MemoryStore::new();
        let project_id = Uuid::new_v4();
        store.insert_task(&task(project_id, "a", TaskStatus::Todo)).await.unwrap();
        store.insert_task(&task(project_id, "b", TaskStatus::Done)).await.unwrap();

        let done = TaskFilter {
            project_id,
            status: Some(TaskStatus::Done),
        };
        let listed = store.list_tasks(done, PageRequest::default()).await.unwrap();
        assert_eq!(listed.len(), 1);
        assert_eq!(listed[0].title, "b");
    }
}
