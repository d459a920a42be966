//! HTTP handlers for authentication endpoints

use axum::routing::{get, post};
use axum::{
    extract::State,
    http::StatusCode,
    Json, Router,
};
use std::sync::Arc;
use tracing::error;
use utoipa::OpenApi;

use datapulse_core::error_builder;
use datapulse_core::problemdetails::Problem;

use crate::auth_service::{AuthError, UserWithOrg};
use crate::middleware::RequireAuth;
use crate::state::AuthState;
use crate::types::{AuthTokenResponse, LoginRequest, RegisterRequest, UserResponse};

#[derive(OpenApi)]
#[openapi(
    paths(register, login, get_current_user),
    components(schemas(
        RegisterRequest,
        LoginRequest,
        AuthTokenResponse,
        UserResponse,
        datapulse_core::ProblemDetails
    )),
    tags(
        (name = "Authentication", description = "Account registration, login and profile")
    )
)]
pub struct ApiDoc;

pub fn configure_routes() -> Router<Arc<AuthState>> {
    Router::new()
        .route("/auth/register", post(register))
        .route("/auth/login", post(login))
        .route("/auth/me", get(get_current_user))
}

fn user_response(result: &UserWithOrg) -> UserResponse {
    UserResponse {
        id: result.user.id,
        email: result.user.email.clone(),
        name: result.user.name.clone(),
        company: result.user.company.clone(),
        role: result.user.role.clone(),
        org_id: result.org.id,
        org_name: result.org.name.clone(),
        plan: result.org.plan.clone(),
        member_role: result.member_role.clone(),
    }
}

fn map_auth_error(err: AuthError) -> Problem {
    match err {
        AuthError::EmailTaken => error_builder::conflict()
            .detail("An account with this email already exists")
            .build(),
        AuthError::InvalidCredentials => error_builder::unauthorized()
            .detail("Invalid email or password")
            .build(),
        AuthError::UserNotFound => error_builder::not_found().detail("User not found").build(),
        err => {
            error!("Auth service error: {}", err);
            error_builder::internal_server_error().build()
        }
    }
}

#[utoipa::path(
    post,
    path = "/auth/register",
    request_body = RegisterRequest,
    responses(
        (status = 201, description = "Account created", body = AuthTokenResponse),
        (status = 400, description = "Validation failed", body = datapulse_core::ProblemDetails),
        (status = 409, description = "Email already registered", body = datapulse_core::ProblemDetails),
        (status = 500, description = "Internal server error", body = datapulse_core::ProblemDetails)
    ),
    tag = "Authentication"
)]
pub async fn register(
    State(state): State<Arc<AuthState>>,
    Json(request): Json<RegisterRequest>,
) -> Result<(StatusCode, Json<AuthTokenResponse>), Problem> {
    let errors = request.validate();
    if !errors.is_empty() {
        return Err(error_builder::validation_failed(errors).build());
    }

    let result = state
        .auth_service
        .register(
            &request.email,
            &request.password,
            &request.name,
            request.company.as_deref(),
        )
        .await
        .map_err(map_auth_error)?;

    let token = state
        .token_service
        .generate_token(result.user.id, &result.user.email, result.org.id)
        .map_err(|e| {
            error!("Failed to issue token after registration: {}", e);
            error_builder::internal_server_error().build()
        })?;

    Ok((
        StatusCode::CREATED,
        Json(AuthTokenResponse {
            token,
            user: user_response(&result),
        }),
    ))
}

#[utoipa::path(
    post,
    path = "/auth/login",
    request_body = LoginRequest,
    responses(
        (status = 200, description = "Login successful", body = AuthTokenResponse),
        (status = 400, description = "Validation failed", body = datapulse_core::ProblemDetails),
        (status = 401, description = "Invalid credentials", body = datapulse_core::ProblemDetails),
        (status = 500, description = "Internal server error", body = datapulse_core::ProblemDetails)
    ),
    tag = "Authentication"
)]
pub async fn login(
    State(state): State<Arc<AuthState>>,
    Json(request): Json<LoginRequest>,
) -> Result<Json<AuthTokenResponse>, Problem> {
    let errors = request.validate();
    if !errors.is_empty() {
        return Err(error_builder::validation_failed(errors).build());
    }

    let result = state
        .auth_service
        .login(&request.email, &request.password)
        .await
        .map_err(map_auth_error)?;

    let token = state
        .token_service
        .generate_token(result.user.id, &result.user.email, result.org.id)
        .map_err(|e| {
            error!("Failed to issue token after login: {}", e);
            error_builder::internal_server_error().build()
        })?;

    Ok(Json(AuthTokenResponse {
        token,
        user: user_response(&result),
    }))
}

#[utoipa::path(
    get,
    path = "/auth/me",
    responses(
        (status = 200, description = "Current user profile", body = UserResponse),
        (status = 401, description = "Unauthorized", body = datapulse_core::ProblemDetails),
        (status = 404, description = "User not found", body = datapulse_core::ProblemDetails)
    ),
    security(("bearer_auth" = [])),
    tag = "Authentication"
)]
pub async fn get_current_user(
    State(state): State<Arc<AuthState>>,
    RequireAuth(auth): RequireAuth,
) -> Result<Json<UserResponse>, Problem> {
    let result = state
        .auth_service
        .get_profile(auth.user_id)
        .await
        .map_err(map_auth_error)?;

    Ok(Json(user_response(&result)))
}
