//! Bearer token middleware and the `RequireAuth` extractor

use axum::{
    extract::{FromRequestParts, Request},
    http::{request::Parts, StatusCode},
    middleware::Next,
};
use std::sync::Arc;

use datapulse_core::error_builder;
use datapulse_core::problemdetails::Problem;

use crate::context::AuthContext;
use crate::state::AuthState;

/// Verifies the `Authorization: Bearer <token>` header if present and
/// attaches the resulting [`AuthContext`] as a request extension.
///
/// Requests without a valid token continue through the stack; routes that
/// need authentication enforce it with the `RequireAuth` extractor.
pub async fn auth_middleware(
    auth_state: Arc<AuthState>,
    mut req: Request,
    next: Next,
) -> Result<axum::response::Response, StatusCode> {
    if let Some(ctx) = extract_auth_from_request(&req, &auth_state) {
        req.extensions_mut().insert(ctx);
    }

    Ok(next.run(req).await)
}

fn extract_auth_from_request(req: &Request, auth_state: &Arc<AuthState>) -> Option<AuthContext> {
    let auth_header = req.headers().get("authorization")?.to_str().ok()?;
    let token = auth_header.strip_prefix("Bearer ")?;

    auth_state.token_service.verify_token(token).ok()
}

/// Extractor that rejects the request with a 401 problem response when no
/// verified authentication context is attached.
pub struct RequireAuth(pub AuthContext);

impl<S> FromRequestParts<S> for RequireAuth
where
    S: Send + Sync,
{
    type Rejection = Problem;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        parts
            .extensions
            .get::<AuthContext>()
            .cloned()
            .map(RequireAuth)
            .ok_or_else(|| {
                error_builder::unauthorized()
                    .detail("A valid bearer token is required to access this resource")
                    .build()
            })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::Request as HttpRequest;

    #[tokio::test]
    async fn test_require_auth_rejects_missing_context() {
        let request = HttpRequest::builder().uri("/").body(()).unwrap();
        let (mut parts, _) = request.into_parts();

        let result = RequireAuth::from_request_parts(&mut parts, &()).await;
        assert!(result.is_err());
        let problem = result.err().unwrap();
        assert_eq!(problem.status_code, StatusCode::UNAUTHORIZED);
    }

    #[tokio::test]
    async fn test_require_auth_returns_context() {
        let request = HttpRequest::builder().uri("/").body(()).unwrap();
        let (mut parts, _) = request.into_parts();
        parts.extensions.insert(AuthContext {
            user_id: 3,
            email: "user@example.com".to_string(),
            org_id: 9,
        });

        let RequireAuth(ctx) = RequireAuth::from_request_parts(&mut parts, &())
            .await
            .unwrap();
        assert_eq!(ctx.user_id, 3);
        assert_eq!(ctx.org_id, 9);
    }
}
