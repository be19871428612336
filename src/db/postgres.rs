use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::postgres::PgPoolOptions;
use sqlx::PgPool;
use uuid::Uuid;

use super::{
    ProjectFilter, ProjectRepository, StoreError, TaskFilter, TaskRepository, UserRepository,
};
use crate::models::{PageRequest, Project, ProjectPatch, Task, TaskPatch, User};

const PROJECT_COLUMNS: &str = "id, owner, title, description, status, created_at, updated_at";
const TASK_COLUMNS: &str =
    "id, project_id, title, description, status, due_date, created_at, updated_at";

/// PostgreSQL backend built on a shared `sqlx` pool.
#[derive(Clone)]
pub struct PgStore {
    pool: PgPool,
}

impl PgStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Opens a pool against `url` and brings the schema up to date.
    pub async fn connect(url: &str, max_connections: u32) -> Result<Self, StoreError> {
        let pool = PgPoolOptions::new()
            .max_connections(max_connections)
            .connect(url)
            .await?;
        sqlx::migrate!("./migrations").run(&pool).await?;
        log::info!("database connected and migrations applied");
        Ok(Self::new(pool))
    }
}

/// Turns a free-text search term into an `ILIKE` pattern that matches it as a
/// literal substring.
fn like_pattern(term: &str) -> String {
    let mut escaped = String::with_capacity(term.len() + 2);
    escaped.push('%');
    for c in term.chars() {
        if matches!(c, '\\' | '%' | '_') {
            escaped.push('\\');
        }
        escaped.push(c);
    }
    escaped.push('%');
    escaped
}

fn to_i64(value: u64) -> i64 {
    i64::try_from(value).unwrap_or(i64::MAX)
}

#[async_trait]
impl UserRepository for PgStore {
    async fn find_user_by_email(&self, email: &str) -> Result<Option<User>, StoreError> {
        let user = sqlx::query_as::<_, User>(
            "SELECT id, email, password_hash, name, created_at FROM users WHERE email = $1",
        )
        .bind(email)
        .fetch_optional(&self.pool)
        .await?;
        Ok(user)
    }

    async fn insert_user(&self, user: &User) -> Result<(), StoreError> {
        let result = sqlx::query(
            "INSERT INTO users (id, email, password_hash, name, created_at) VALUES ($1, $2, $3, $4, $5)",
        )
        .bind(user.id)
        .bind(&user.email)
        .bind(&user.password_hash)
        .bind(&user.name)
        .bind(user.created_at)
        .execute(&self.pool)
        .await;

        match result {
            Ok(_) => Ok(()),
            Err(sqlx::Error::Database(db_err)) if db_err.is_unique_violation() => {
                Err(StoreError::DuplicateEmail)
            }
            Err(e) => Err(e.into()),
        }
    }
}

#[async_trait]
impl ProjectRepository for PgStore {
    async fn insert_project(&self, project: &Project) -> Result<(), StoreError> {
        sqlx::query(
            "INSERT INTO projects (id, owner, title, description, status, created_at, updated_at)
             VALUES ($1, $2, $3, $4, $5, $6, $7)",
        )
        .bind(project.id)
        .bind(project.owner)
        .bind(&project.title)
        .bind(&project.description)
        .bind(project.status)
        .bind(project.created_at)
        .bind(project.updated_at)
        .execute(&self.pool)
        .await?;
        Ok(())
    }

    async fn find_project(&self, id: Uuid) -> Result<Option<Project>, StoreError> {
        let sql = format!("SELECT {} FROM projects WHERE id = $1", PROJECT_COLUMNS);
        let project = sqlx::query_as::<_, Project>(&sql)
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;
        Ok(project)
    }

    async fn count_projects(&self, filter: ProjectFilter<'_>) -> Result<u64, StoreError> {
        let count: i64 = sqlx::query_scalar(
            r"SELECT COUNT(*) FROM projects
              WHERE owner = $1
                AND ($2::text IS NULL OR title ILIKE $2 ESCAPE '\' OR description ILIKE $2 ESCAPE '\')",
        )
        .bind(filter.owner)
        .bind(filter.search.map(like_pattern))
        .fetch_one(&self.pool)
        .await?;
        Ok(count as u64)
    }

    async fn list_projects(
        &self,
        filter: ProjectFilter<'_>,
        page: PageRequest,
    ) -> Result<Vec<Project>, StoreError> {
        let sql = format!(
            r"SELECT {} FROM projects
              WHERE owner = $1
                AND ($2::text IS NULL OR title ILIKE $2 ESCAPE '\' OR description ILIKE $2 ESCAPE '\')
              ORDER BY created_at DESC, id DESC
              LIMIT $3 OFFSET $4",
            PROJECT_COLUMNS
        );
        let projects = sqlx::query_as::<_, Project>(&sql)
            .bind(filter.owner)
            .bind(filter.search.map(like_pattern))
            .bind(to_i64(page.limit()))
            .bind(to_i64(page.offset()))
            .fetch_all(&self.pool)
            .await?;
        Ok(projects)
    }

    async fn update_project(
        &self,
        owner: Uuid,
        id: Uuid,
        patch: &ProjectPatch,
        now: DateTime<Utc>,
    ) -> Result<Option<Project>, StoreError> {
        let sql = format!(
            "UPDATE projects
             SET title = COALESCE($3, title),
                 description = COALESCE($4, description),
                 status = COALESCE($5, status),
                 updated_at = $6
             WHERE id = $1 AND owner = $2
             RETURNING {}",
            PROJECT_COLUMNS
        );
        let project = sqlx::query_as::<_, Project>(&sql)
            .bind(id)
            .bind(owner)
            .bind(&patch.title)
            .bind(&patch.description)
            .bind(patch.status)
            .bind(now)
            .fetch_optional(&self.pool)
            .await?;
        Ok(project)
    }

    async fn delete_project_with_tasks(&self, owner: Uuid, id: Uuid) -> Result<bool, StoreError> {
        let mut tx = self.pool.begin().await?;

        let locked: Option<Uuid> =
            sqlx::query_scalar("SELECT id FROM projects WHERE id = $1 AND owner = $2 FOR UPDATE")
                .bind(id)
                .bind(owner)
                .fetch_optional(&mut *tx)
                .await?;
        if locked.is_none() {
            tx.rollback().await?;
            return Ok(false);
        }

        let removed_tasks = sqlx::query("DELETE FROM tasks WHERE project_id = $1")
            .bind(id)
            .execute(&mut *tx)
            .await?
            .rows_affected();
        sqlx::query("DELETE FROM projects WHERE id = $1")
            .bind(id)
            .execute(&mut *tx)
            .await?;

        tx.commit().await?;
        log::debug!("deleted project {} and {} tasks", id, removed_tasks);
        Ok(true)
    }
}

#[async_trait]
impl TaskRepository for PgStore {
    async fn insert_task(&self, task: &Task) -> Result<(), StoreError> {
        sqlx::query(
            "INSERT INTO tasks (id, project_id, title, description, status, due_date, created_at, updated_at)
             VALUES ($1, $2, $3, $4, $5, $6, $7, $8)",
        )
        .bind(task.id)
        .bind(task.project_id)
        .bind(&task.title)
        .bind(&task.description)
        .bind(task.status)
        .bind(task.due_date)
        .bind(task.created_at)
        .bind(task.updated_at)
        .execute(&self.pool)
        .await?;
        Ok(())
    }

    async fn find_task(&self, id: Uuid) -> Result<Option<Task>, StoreError> {
        let sql = format!("SELECT {} FROM tasks WHERE id = $1", TASK_COLUMNS);
        let task = sqlx::query_as::<_, Task>(&sql)
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;
        Ok(task)
    }

    async fn count_tasks(&self, filter: TaskFilter) -> Result<u64, StoreError> {
        let count: i64 = sqlx::query_scalar(
            "SELECT COUNT(*) FROM tasks
             WHERE project_id = $1 AND ($2::task_status IS NULL OR status = $2)",
        )
        .bind(filter.project_id)
        .bind(filter.status)
        .fetch_one(&self.pool)
        .await?;
        Ok(count as u64)
    }

    async fn list_tasks(&self, filter: TaskFilter, page: PageRequest) -> Result<Vec<Task>, StoreError> {
        let sql = format!(
            "SELECT {} FROM tasks
             WHERE project_id = $1 AND ($2::task_status IS NULL OR status = $2)
             ORDER BY created_at ASC, id ASC
             LIMIT $3 OFFSET $4",
            TASK_COLUMNS
        );
        let tasks = sqlx::query_as::<_, Task>(&sql)
            .bind(filter.project_id)
            .bind(filter.status)
            .bind(to_i64(page.limit()))
            .bind(to_i64(page.offset()))
            .fetch_all(&self.pool)
            .await?;
        Ok(tasks)
    }

    async fn update_task(
        &self,
        id: Uuid,
        patch: &TaskPatch,
        now: DateTime<Utc>,
    ) -> Result<Option<Task>, StoreError> {
        let sql = format!(
            "UPDATE tasks
             SET title = COALESCE($2, title),
                 description = COALESCE($3, description),
                 status = COALESCE($4, status),
                 due_date = COALESCE($5, due_date),
                 updated_at = $6
             WHERE id = $1
             RETURNING {}",
            TASK_COLUMNS
        );
        let task = sqlx::query_as::<_, Task>(&sql)
            .bind(id)
            .bind(&patch.title)
            .bind(&patch.description)
            .bind(patch.status)
            .bind(patch.due_date)
            .bind(now)
            .fetch_optional(&self.pool)
            .await?;
        Ok(task)
    }

    async fn delete_task(&self, id: Uuid) -> Result<bool, StoreError> {
        let result = sqlx::query("DELETE FROM tasks WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }
}
