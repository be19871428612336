use std::sync::Arc;

use crate::auth::{CredentialStore, TokenService};
use crate::config::Config;
use crate::db::Store;
use crate::services::{ProjectStore, TaskStore};

/// Everything a request handler needs, assembled once at startup and shared
/// through `web::Data`. Holds no per-request state.
pub struct AppState {
    pub credentials: CredentialStore,
    pub tokens: TokenService,
    pub projects: ProjectStore,
    pub tasks: TaskStore,
}

impl AppState {
    pub fn new<S>(store: Arc<S>, jwt_secret: &str, bcrypt_cost: u32) -> Self
    where
        S: Store + 'static,
    {
        Self {
            credentials: CredentialStore::new(store.clone(), bcrypt_cost),
            tokens: TokenService::new(jwt_secret),
            projects: ProjectStore::new(store.clone()),
            tasks: TaskStore::new(store.clone(), store),
        }
    }

    pub fn from_config<S>(store: Arc<S>, config: &Config) -> Self
    where
        S: Store + 'static,
    {
        Self::new(store, &config.jwt_secret, config.bcrypt_cost)
    }
}
