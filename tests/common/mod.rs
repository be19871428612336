#![allow(dead_code)]

use actix_web::{body::MessageBody, dev::ServiceResponse, http::StatusCode, test, web};
use serde_json::{json, Value};
use std::sync::Arc;

use projectforge::db::MemoryStore;
use projectforge::AppState;

pub const TEST_SECRET: &str = "integration-secret";

/// Application state over a fresh in-memory store with the cheapest bcrypt
/// cost, so each test starts empty and runs fast.
pub fn state() -> web::Data<AppState> {
    web::Data::new(AppState::new(Arc::new(MemoryStore::new()), TEST_SECRET, 4))
}

/// Sends a request and returns its status and JSON body. Errors raised by
/// middleware are rendered the same way the server would render them.
pub async fn send(
    app: &impl actix_web::dev::Service<
        actix_http::Request,
        Response = ServiceResponse<impl MessageBody>,
        Error = actix_web::Error,
    >,
    req: actix_http::Request,
) -> (StatusCode, Value) {
    match test::try_call_service(app, req).await {
        Ok(resp) => {
            let status = resp.status();
            let body = test::read_body(resp).await;
            (status, serde_json::from_slice(&body).unwrap_or(Value::Null))
        }
        Err(err) => {
            let resp = err.error_response();
            let status = resp.status();
            let body = actix_web::body::to_bytes(resp.into_body())
                .await
                .unwrap_or_default();
            (status, serde_json::from_slice(&body).unwrap_or(Value::Null))
        }
    }
}

/// Registers `email` and logs in, returning the bearer token.
pub async fn register_and_login(
    app: &impl actix_web::dev::Service<
        actix_http::Request,
        Response = ServiceResponse<impl MessageBody>,
        Error = actix_web::Error,
    >,
    email: &str,
    password: &str,
) -> String {
    let req = test::TestRequest::post()
        .uri("/api/auth/register")
        .set_json(json!({ "email": email, "password": password }))
        .to_request();
    let (status, body) = send(app, req).await;
    assert_eq!(status, StatusCode::CREATED, "register failed: {}", body);

    let req = test::TestRequest::post()
        .uri("/api/auth/login")
        .set_json(json!({ "email": email, "password": password }))
        .to_request();
    let (status, body) = send(app, req).await;
    assert_eq!(status, StatusCode::OK, "login failed: {}", body);

    body["token"]
        .as_str()
        .expect("login response carries a token")
        .to_string()
}

pub fn bearer(token: &str) -> (&'static str, String) {
    ("Authorization", format!("Bearer {}", token))
}
