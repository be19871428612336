use std::sync::Arc;
use uuid::Uuid;

use crate::auth::password::{hash_password, verify_password};
use crate::db::UserRepository;
use crate::error::AppError;
use crate::models::User;

/// Holds user accounts and checks passwords against them.
///
/// Password policy (valid email, minimum length) is enforced by request
/// validation before calls reach this type.
pub struct CredentialStore {
    users: Arc<dyn UserRepository>,
    bcrypt_cost: u32,
}

impl CredentialStore {
    pub fn new(users: Arc<dyn UserRepository>, bcrypt_cost: u32) -> Self {
        Self { users, bcrypt_cost }
    }

    /// Creates an account and returns its id. Only the bcrypt hash of
    /// `password` is stored.
    pub async fn register(
        &self,
        email: &str,
        password: &str,
        name: Option<String>,
    ) -> Result<Uuid, AppError> {
        if self.users.find_user_by_email(email).await?.is_some() {
            return Err(AppError::DuplicateEmail);
        }

        let password_hash = hash_password(password, self.bcrypt_cost).await?;
        let user = User::new(email.to_string(), password_hash, name);
        // A concurrent registration can still win the race; the unique
        // constraint surfaces it as DuplicateEmail.
        self.users.insert_user(&user).await?;

        log::info!("registered user {}", user.id);
        Ok(user.id)
    }

    /// Returns the user id when `password` matches the account for `email`.
    /// Unknown email and wrong password produce the same error.
    pub async fn verify(&self, email: &str, password: &str) -> Result<Uuid, AppError> {
        let user = self
            .users
            .find_user_by_email(email)
            .await?
            .ok_or(AppError::InvalidCredentials)?;

        if verify_password(password, &user.password_hash).await? {
            Ok(user.id)
        } else {
            Err(AppError::InvalidCredentials)
        }
    }
}
