pub mod auth;
pub mod health;
pub mod projects;
pub mod tasks;

use actix_web::web;
use serde::Deserialize;

use crate::auth::AuthMiddleware;
use crate::error::{json_error_handler, path_error_handler, query_error_handler};

/// Query string as raw `key=value` pairs in arrival order.
///
/// Listing parameters are all optional and lenient, so they are read from
/// the pairs instead of a typed struct; a repeated key resolves to its first
/// value rather than failing the request.
#[derive(Debug, Default, Deserialize)]
#[serde(transparent)]
pub struct QueryParams(Vec<(String, String)>);

impl QueryParams {
    pub fn get(&self, key: &str) -> Option<&str> {
        self.0
            .iter()
            .find(|(name, _)| name == key)
            .map(|(_, value)| value.as_str())
    }
}

/// Mounts the whole API under `/api`. Everything below `/projects` and
/// `/tasks` sits behind [`AuthMiddleware`].
pub fn config(cfg: &mut web::ServiceConfig) {
    cfg.app_data(web::JsonConfig::default().error_handler(json_error_handler))
        .app_data(web::PathConfig::default().error_handler(path_error_handler))
        .app_data(web::QueryConfig::default().error_handler(query_error_handler))
        .service(
            web::scope("/api")
                .service(health::health)
                .service(
                    web::scope("/auth")
                        .service(auth::register)
                        .service(auth::login)
                        .service(auth::logout),
                )
                .service(
                    web::scope("/projects")
                        .wrap(AuthMiddleware)
                        .service(projects::list_projects)
                        .service(projects::create_project)
                        .service(tasks::create_task)
                        .service(tasks::list_tasks)
                        .service(projects::get_project)
                        .service(projects::update_project)
                        .service(projects::delete_project),
                )
                .service(
                    web::scope("/tasks")
                        .wrap(AuthMiddleware)
                        .service(tasks::update_task)
                        .service(tasks::delete_task),
                ),
        );
}
