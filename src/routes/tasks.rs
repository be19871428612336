use crate::{
    auth::AuthenticatedUser,
    error::AppError,
    models::{PageRequest, TaskInput, TaskPatch},
    routes::QueryParams,
    state::AppState,
};
use actix_web::{delete, get, post, put, web, HttpResponse, Responder};
use serde_json::json;
use uuid::Uuid;

/// Creates a task inside one of the caller's projects.
///
/// ## Request Body:
/// - `title`: required, non-empty.
/// - `description` (optional).
/// - `status` (optional): `To-do` (default), `In-Progress` or `Done`.
/// - `dueDate` (optional): `YYYY-MM-DD`.
///
/// ## Responses:
/// - `201 Created`: `{success, task}`.
/// - `400 Bad Request`: validation failure.
/// - `404 Not Found`: the project does not exist or is not the caller's.
#[post("/{project_id}/tasks")]
pub async fn create_task(
    state: web::Data<AppState>,
    user: AuthenticatedUser,
    project_id: web::Path<Uuid>,
    task_data: web::Json<TaskInput>,
) -> Result<impl Responder, AppError> {
    let task = state
        .tasks
        .create(user.id(), project_id.into_inner(), task_data.into_inner())
        .await?;

    Ok(HttpResponse::Created().json(json!({ "success": true, "task": task })))
}

/// Lists a project's tasks, oldest first, seven per page.
///
/// ## Query Parameters:
/// - `status` (optional): exact status spelling; blank means no filter, any
///   other value yields an empty page.
/// - `page` (optional): 1-based page number.
///
/// ## Responses:
/// - `200 OK`: `{success, tasks, pagination: {total, pages, page}}`.
/// - `404 Not Found`: the project does not exist or is not the caller's.
#[get("/{project_id}/tasks")]
pub async fn list_tasks(
    state: web::Data<AppState>,
    user: AuthenticatedUser,
    project_id: web::Path<Uuid>,
    query: web::Query<QueryParams>,
) -> Result<impl Responder, AppError> {
    let page = PageRequest::parse(query.get("page"));
    let result = state
        .tasks
        .list_for_project(user.id(), project_id.into_inner(), query.get("status"), page)
        .await?;

    Ok(HttpResponse::Ok().json(json!({
        "success": true,
        "tasks": result.items,
        "pagination": result.pagination,
    })))
}

/// Partially updates a task. Ownership is resolved through its project.
///
/// ## Responses:
/// - `200 OK`: `{success, task}`.
/// - `400 Bad Request`: a present title is empty.
/// - `403 Forbidden`: the task exists but its project is not the caller's.
/// - `404 Not Found`: no such task.
#[put("/{id}")]
pub async fn update_task(
    state: web::Data<AppState>,
    user: AuthenticatedUser,
    task_id: web::Path<Uuid>,
    patch: web::Json<TaskPatch>,
) -> Result<impl Responder, AppError> {
    let task = state
        .tasks
        .update(user.id(), task_id.into_inner(), patch.into_inner())
        .await?;

    Ok(HttpResponse::Ok().json(json!({ "success": true, "task": task })))
}

/// Deletes a task.
///
/// ## Responses:
/// - `200 OK`: `{success, message}`.
/// - `403 Forbidden`: the task exists but its project is not the caller's.
/// - `404 Not Found`: no such task.
#[delete("/{id}")]
pub async fn delete_task(
    state: web::Data<AppState>,
    user: AuthenticatedUser,
    task_id: web::Path<Uuid>,
) -> Result<impl Responder, AppError> {
    state.tasks.delete(user.id(), task_id.into_inner()).await?;

    Ok(HttpResponse::Ok().json(json!({ "success": true, "message": "Task deleted" })))
}
