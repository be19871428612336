use actix_web::{
    dev::{forward_ready, Service, ServiceRequest, ServiceResponse, Transform},
    http::header,
    web, Error, HttpMessage,
};
use futures::future::{ready, LocalBoxFuture, Ready};

use crate::auth::extractors::AuthenticatedUser;
use crate::error::AppError;
use crate::state::AppState;

/// Access guard for every project and task route.
///
/// Reads the `Authorization: Bearer <token>` header, verifies the token with
/// the application's [`TokenService`](crate::auth::TokenService) and stores
/// the resolved [`AuthenticatedUser`] in the request extensions. Extensions
/// are dropped with the request, so the identity never outlives it.
pub struct AuthMiddleware;

impl<S, B> Transform<S, ServiceRequest> for AuthMiddleware
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error>,
    S::Future: 'static,
    B: 'static,
{
    type Response = ServiceResponse<B>;
    type Error = Error;
    type Transform = AuthMiddlewareService<S>;
    type InitError = ();
    type Future = Ready<Result<Self::Transform, Self::InitError>>;

    fn new_transform(&self, service: S) -> Self::Future {
        ready(Ok(AuthMiddlewareService { service }))
    }
}

pub struct AuthMiddlewareService<S> {
    service: S,
}

impl<S, B> Service<ServiceRequest> for AuthMiddlewareService<S>
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error>,
    S::Future: 'static,
    B: 'static,
{
    type Response = ServiceResponse<B>;
    type Error = Error;
    type Future = LocalBoxFuture<'static, Result<Self::Response, Self::Error>>;

    forward_ready!(service);

    fn call(&self, req: ServiceRequest) -> Self::Future {
        match authenticate(&req) {
            Ok(user) => {
                req.extensions_mut().insert(user);
                Box::pin(self.service.call(req))
            }
            Err(app_err) => Box::pin(async move { Err(app_err.into()) }),
        }
    }
}

fn authenticate(req: &ServiceRequest) -> Result<AuthenticatedUser, AppError> {
    let token = bearer_token(req)
        .ok_or_else(|| AppError::Unauthenticated("No token provided".into()))?;

    let state = req
        .app_data::<web::Data<AppState>>()
        .ok_or_else(|| AppError::ServerError("application state is not registered".into()))?;

    state.tokens.verify(token).map(AuthenticatedUser)
}

/// Token from `Authorization: Bearer <token>`. The scheme name is matched
/// case-insensitively.
fn bearer_token(req: &ServiceRequest) -> Option<&str> {
    let value = req.headers().get(header::AUTHORIZATION)?.to_str().ok()?;
    let (scheme, token) = value.trim().split_once(' ')?;
    if !scheme.eq_ignore_ascii_case("bearer") {
        return None;
    }
    Some(token.trim()).filter(|token| !token.is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::MemoryStore;
    use actix_web::{get, http::StatusCode, test, App, HttpResponse, Responder};
    use std::sync::Arc;
    use uuid::Uuid;

    #[get("/whoami")]
    async fn whoami(user: AuthenticatedUser) -> impl Responder {
        HttpResponse::Ok().body(user.0.to_string())
    }

    fn state() -> web::Data<AppState> {
        web::Data::new(AppState::new(Arc::new(MemoryStore::new()), "guard-secret", 4))
    }

    #[actix_rt::test]
    async fn test_valid_token_reaches_handler() {
        let state = state();
        let user_id = Uuid::new_v4();
        let token = state.tokens.issue(user_id).unwrap();
        let app = test::init_service(
            App::new()
                .app_data(state.clone())
                .service(web::scope("").wrap(AuthMiddleware).service(whoami)),
        )
        .await;

        let req = test::TestRequest::get()
            .uri("/whoami")
            .insert_header((header::AUTHORIZATION, format!("Bearer {}", token)))
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::OK);
        let body = test::read_body(resp).await;
        assert_eq!(body, user_id.to_string());
    }

    #[actix_rt::test]
    async fn test_bearer_scheme_is_case_insensitive() {
        let state = state();
        let token = state.tokens.issue(Uuid::new_v4()).unwrap();
        let app = test::init_service(
            App::new()
                .app_data(state.clone())
                .service(web::scope("").wrap(AuthMiddleware).service(whoami)),
        )
        .await;

        for scheme in ["bearer", "BEARER", "Bearer"] {
            let req = test::TestRequest::get()
                .uri("/whoami")
                .insert_header((header::AUTHORIZATION, format!("{} {}", scheme, token)))
                .to_request();
            let resp = test::call_service(&app, req).await;
            assert_eq!(resp.status(), StatusCode::OK, "scheme {}", scheme);
        }
    }

    #[actix_rt::test]
    async fn test_missing_or_bad_token_is_rejected() {
        let app = test::init_service(
            App::new()
                .app_data(state())
                .service(web::scope("").wrap(AuthMiddleware).service(whoami)),
        )
        .await;

        let cases = [
            None,
            Some("Bearer ".to_string()),
            Some("Basic dXNlcjpwdw==".to_string()),
            Some("Bearer not.a.token".to_string()),
        ];
        for header_value in cases {
            let mut req = test::TestRequest::get().uri("/whoami");
            if let Some(value) = &header_value {
                req = req.insert_header((header::AUTHORIZATION, value.clone()));
            }
            let result = test::try_call_service(&app, req.to_request()).await;
            let status = match result {
                Ok(resp) => resp.status(),
                Err(err) => err.as_response_error().status_code(),
            };
            assert_eq!(status, StatusCode::UNAUTHORIZED, "header {:?}", header_value);
        }
    }
}
