use crate::{
    auth::AuthenticatedUser,
    error::AppError,
    models::{PageRequest, ProjectInput, ProjectPatch},
    routes::QueryParams,
    state::AppState,
};
use actix_web::{delete, get, post, put, web, HttpResponse, Responder};
use serde_json::json;
use uuid::Uuid;

/// Lists the caller's projects, newest first, seven per page.
///
/// ## Query Parameters:
/// - `page` (optional): 1-based page number; anything unusable means page 1.
/// - `search` (optional): case-insensitive substring of title or description.
///
/// ## Responses:
/// - `200 OK`: `{success, projects, pagination: {total, pages, page}}`.
/// - `401 Unauthorized`: missing or invalid token.
#[get("")]
pub async fn list_projects(
    state: web::Data<AppState>,
    user: AuthenticatedUser,
    query: web::Query<QueryParams>,
) -> Result<impl Responder, AppError> {
    let page = PageRequest::parse(query.get("page"));
    let result = state
        .projects
        .list(user.id(), page, query.get("search"))
        .await?;

    Ok(HttpResponse::Ok().json(json!({
        "success": true,
        "projects": result.items,
        "pagination": result.pagination,
    })))
}

/// Creates a project owned by the caller.
///
/// ## Request Body:
/// - `title`: required, non-empty.
/// - `description` (optional).
/// - `status` (optional): `Active` (default) or `Completed`.
///
/// ## Responses:
/// - `201 Created`: `{success, project, pagination: {total, pages}}`.
/// - `400 Bad Request`: validation failure.
/// - `401 Unauthorized`: missing or invalid token.
#[post("")]
pub async fn create_project(
    state: web::Data<AppState>,
    user: AuthenticatedUser,
    project_data: web::Json<ProjectInput>,
) -> Result<impl Responder, AppError> {
    let (project, pagination) = state
        .projects
        .create(user.id(), project_data.into_inner())
        .await?;

    Ok(HttpResponse::Created().json(json!({
        "success": true,
        "project": project,
        "pagination": pagination,
    })))
}

/// Fetches one of the caller's projects. Someone else's project is reported
/// exactly like a missing one.
///
/// ## Responses:
/// - `200 OK`: `{success, project}`.
/// - `404 Not Found`: no such project, or not owned by the caller.
#[get("/{id}")]
pub async fn get_project(
    state: web::Data<AppState>,
    user: AuthenticatedUser,
    project_id: web::Path<Uuid>,
) -> Result<impl Responder, AppError> {
    let project = state
        .projects
        .get_by_id(user.id(), project_id.into_inner())
        .await?;

    Ok(HttpResponse::Ok().json(json!({ "success": true, "project": project })))
}

/// Partially updates a project. Absent fields keep their value.
///
/// ## Responses:
/// - `200 OK`: `{success, project}` with the stored state after the update.
/// - `400 Bad Request`: a present title is empty.
/// - `404 Not Found`: no such project, or not owned by the caller.
#[put("/{id}")]
pub async fn update_project(
    state: web::Data<AppState>,
    user: AuthenticatedUser,
    project_id: web::Path<Uuid>,
    patch: web::Json<ProjectPatch>,
) -> Result<impl Responder, AppError> {
    let project = state
        .projects
        .update(user.id(), project_id.into_inner(), patch.into_inner())
        .await?;

    Ok(HttpResponse::Ok().json(json!({ "success": true, "project": project })))
}

/// Deletes a project together with all of its tasks.
///
/// ## Responses:
/// - `200 OK`: `{success, message, pagination: {total, pages}}` with the
///   caller's remaining totals.
/// - `404 Not Found`: no such project, or not owned by the caller.
#[delete("/{id}")]
pub async fn delete_project(
    state: web::Data<AppState>,
    user: AuthenticatedUser,
    project_id: web::Path<Uuid>,
) -> Result<impl Responder, AppError> {
    let pagination = state
        .projects
        .delete(user.id(), project_id.into_inner())
        .await?;

    Ok(HttpResponse::Ok().json(json!({
        "success": true,
        "message": "Project deleted",
        "pagination": pagination,
    })))
}
