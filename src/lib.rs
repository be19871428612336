#![doc = "The `projectforge` library crate."]
#![doc = ""]
#![doc = "Domain models, authentication, storage backends, owner-scoped project and"]
#![doc = "task stores, routing configuration and error handling for the ProjectForge"]
#![doc = "API. The server and seed binaries assemble an application from these parts."]

pub mod auth;
pub mod config;
pub mod db;
pub mod error;
pub mod models;
pub mod ownership;
pub mod routes;
pub mod services;
pub mod state;

pub use crate::config::Config;
pub use crate::error::AppError;
pub use crate::state::AppState;
