use crate::{
    auth::{AuthResponse, LoginRequest, RegisterRequest, RegisterResponse, RegisteredUser},
    error::AppError,
    state::AppState,
};
use actix_web::{post, web, HttpResponse, Responder};
use serde_json::json;
use validator::Validate;

/// Register a new user
///
/// Creates an account from `{email, password, name?}`. No token is issued;
/// the client logs in separately.
///
/// ## Responses:
/// - `201 Created`: `{success, message, user: {id, email}}`.
/// - `400 Bad Request`: invalid email, short password, or the email is taken.
#[post("/register")]
pub async fn register(
    state: web::Data<AppState>,
    register_data: web::Json<RegisterRequest>,
) -> Result<impl Responder, AppError> {
    register_data.validate()?;
    let RegisterRequest {
        email,
        password,
        name,
    } = register_data.into_inner();

    let id = state.credentials.register(&email, &password, name).await?;

    Ok(HttpResponse::Created().json(RegisterResponse {
        success: true,
        message: "User registered successfully".into(),
        user: RegisteredUser { id, email },
    }))
}

/// Login user
///
/// Checks the credentials and returns a bearer token valid for 24 hours.
///
/// ## Responses:
/// - `200 OK`: `{success, token}`.
/// - `400 Bad Request`: malformed input, or `Invalid credentials` for an
///   unknown email as well as a wrong password.
#[post("/login")]
pub async fn login(
    state: web::Data<AppState>,
    login_data: web::Json<LoginRequest>,
) -> Result<impl Responder, AppError> {
    login_data.validate()?;

    let user_id = state
        .credentials
        .verify(&login_data.email, &login_data.password)
        .await?;
    let token = state.tokens.issue(user_id)?;

    Ok(HttpResponse::Ok().json(AuthResponse {
        success: true,
        token,
    }))
}

/// Logout user
///
/// Tokens are stateless, so there is nothing to revoke server-side; the
/// client drops its copy.
#[post("/logout")]
pub async fn logout() -> impl Responder {
    HttpResponse::Ok().json(json!({
        "success": true,
        "message": "Logged out successfully"
    }))
}
