//! Dashboard authentication middleware and extractor.
//!
//! ```text
//! Request → auth_middleware → injects AuthenticatedUser into extensions
//!                                      ↓
//!                              Handler → RequireAuth reads it back
//! ```
//!
//! The middleware only depends on the `SessionValidator` port, so the JWT
//! validator and the test mock plug in the same way.

use std::sync::Arc;

use async_trait::async_trait;
use axum::{
    extract::{FromRequestParts, Request, State},
    http::{header, request::Parts},
    middleware::Next,
    response::{IntoResponse, Response},
};

use crate::adapters::http::error::ApiError;
use crate::domain::foundation::AuthenticatedUser;
use crate::ports::SessionValidator;

pub type AuthState = Arc<dyn SessionValidator>;

/// Validates `Authorization: Bearer <token>` when present.
///
/// A missing header passes through untouched so [`RequireAuth`] can answer
/// with 401; a bad token is rejected here.
pub async fn auth_middleware(
    State(validator): State<AuthState>,
    mut request: Request,
    next: Next,
) -> Response {
    let token = request
        .headers()
        .get(header::AUTHORIZATION)
        .and_then(|h| h.to_str().ok())
        .and_then(|h| h.strip_prefix("Bearer "))
        .map(str::to_owned);

    let Some(token) = token else {
        return next.run(request).await;
    };

    match validator.validate(&token).await {
        Ok(user) => {
            tracing::debug!(user_id = %user.id, business_id = %user.business_id, "Dashboard user authenticated");
            request.extensions_mut().insert(user);
            next.run(request).await
        }
        Err(e) => {
            tracing::debug!(error = %e, "Rejected dashboard token");
            ApiError::from(e).into_response()
        }
    }
}

/// Extractor for handlers that need a dashboard user.
#[derive(Debug, Clone)]
pub struct RequireAuth(pub AuthenticatedUser);

#[async_trait]
impl<S> FromRequestParts<S> for RequireAuth
where
    S: Send + Sync,
{
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        parts
            .extensions
            .get::<AuthenticatedUser>()
            .cloned()
            .map(RequireAuth)
            .ok_or_else(|| ApiError::unauthorized("Authentication required"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapters::auth::MockSessionValidator;
    use crate::domain::foundation::{AuthError, BusinessId, ErrorCode, Role, UserId};
    use axum::{body::Body, http::StatusCode, middleware, routing::get, Router};
    use tower::ServiceExt;

    fn test_user(business_id: BusinessId) -> AuthenticatedUser {
        AuthenticatedUser::new(UserId::new("user-123").unwrap(), business_id, Role::Staff)
    }

    fn app(validator: MockSessionValidator) -> Router {
        let state: AuthState = Arc::new(validator);
        Router::new()
            .route(
                "/me",
                get(|RequireAuth(user): RequireAuth| async move { user.business_id.to_string() }),
            )
            .layer(middleware::from_fn_with_state(state, auth_middleware))
    }

    fn get_me(token: Option<&str>) -> Request {
        let mut builder = axum::http::Request::builder().uri("/me");
        if let Some(token) = token {
            builder = builder.header("Authorization", format!("Bearer {}", token));
        }
        builder.body(Body::empty()).unwrap()
    }

    #[tokio::test]
    async fn valid_token_reaches_handler() {
        let business_id = BusinessId::new();
        let app = app(MockSessionValidator::new().with_user("good", test_user(business_id)));

        let response = app.oneshot(get_me(Some("good"))).await.unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX).await.unwrap();
        assert_eq!(bytes, business_id.to_string());
    }

    #[tokio::test]
    async fn missing_token_is_rejected_by_extractor() {
        let response = app(MockSessionValidator::new())
            .oneshot(get_me(None))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    }

    #[tokio::test]
    async fn unknown_token_is_rejected_by_middleware() {
        let response = app(MockSessionValidator::new())
            .oneshot(get_me(Some("forged")))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    }

    #[tokio::test]
    async fn expired_token_is_unauthorized() {
        let validator = MockSessionValidator::new().with_error(AuthError::TokenExpired);

        let response = app(validator).oneshot(get_me(Some("any"))).await.unwrap();

        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    }

    #[tokio::test]
    async fn require_auth_reads_extensions() {
        let mut request = axum::http::Request::builder().uri("/").body(()).unwrap();
        request.extensions_mut().insert(test_user(BusinessId::new()));
        let (mut parts, _) = request.into_parts();

        let RequireAuth(user) = RequireAuth::from_request_parts(&mut parts, &()).await.unwrap();

        assert_eq!(user.role, Role::Staff);
    }

    #[tokio::test]
    async fn require_auth_without_user_fails() {
        let request = axum::http::Request::builder().uri("/").body(()).unwrap();
        let (mut parts, _) = request.into_parts();

        let err = RequireAuth::from_request_parts(&mut parts, &()).await.unwrap_err();

        assert_eq!(err.code(), ErrorCode::Unauthorized);
    }
}
