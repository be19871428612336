use crate::error::AppError;
use bcrypt::{hash, verify};

/// bcrypt's own default work factor.
pub const DEFAULT_COST: u32 = 12;

/// Hashes a password on the blocking pool so the request's worker thread
/// stays free while bcrypt runs.
pub async fn hash_password(password: &str, cost: u32) -> Result<String, AppError> {
    let password = password.to_owned();
    let hashed = actix_web::web::block(move || hash(password, cost)).await??;
    Ok(hashed)
}

/// Checks a password against a stored bcrypt hash on the blocking pool.
/// The comparison inside bcrypt is constant-time.
pub async fn verify_password(password: &str, hashed_password: &str) -> Result<bool, AppError> {
    let password = password.to_owned();
    let hashed_password = hashed_password.to_owned();
    let matches = actix_web::web::block(move || verify(password, &hashed_password)).await??;
    Ok(matches)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[actix_rt::test]
    async fn test_password_hashing_and_verification() {
        let password = "test_password123";
        let hashed = hash_password(password, 4).await.unwrap();

        assert_ne!(hashed, password);
        assert!(verify_password(password, &hashed).await.unwrap());
        assert!(!verify_password("wrong_password", &hashed).await.unwrap());
    }

    #[actix_rt::test]
    async fn test_verify_with_invalid_hash() {
        match verify_password("test_password123", "invalidhashformat").await {
            Err(AppError::ServerError(msg)) => {
                assert!(msg.contains("password hashing failed"));
            }
            Ok(false) => {
                // Some bcrypt versions report a malformed hash as a plain mismatch.
            }
            Ok(true) => panic!("Password verification should fail for invalid hash format"),
            Err(e) => panic!("Unexpected error: {:?}", e),
        }
    }
}
