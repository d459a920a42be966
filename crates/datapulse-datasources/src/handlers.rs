//! HTTP handlers for data source endpoints

use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::Json,
    routing::{delete, get},
    Router,
};
use std::sync::Arc;
use tracing::error;
use utoipa::OpenApi;

use datapulse_auth::RequireAuth;
use datapulse_core::error_builder;
use datapulse_core::problemdetails::Problem;

use crate::service::{DatasourceError, DatasourceService};
use crate::types::{
    CreateDatasourceRequest, DatasourceEnvelope, DatasourceListResponse, DatasourceResponse,
    MessageResponse,
};

pub struct AppState {
    pub datasource_service: Arc<DatasourceService>,
}

#[derive(OpenApi)]
#[openapi(
    paths(list_datasources, create_datasource, delete_datasource),
    components(schemas(
        CreateDatasourceRequest,
        DatasourceResponse,
        DatasourceListResponse,
        DatasourceEnvelope,
        MessageResponse
    )),
    tags(
        (name = "Data Sources", description = "Organization-scoped data source connections")
    )
)]
pub struct ApiDoc;

pub fn configure_routes() -> Router<Arc<AppState>> {
    Router::new()
        .route(
            "/datasources",
            get(list_datasources).post(create_datasource),
        )
        .route("/datasources/{id}", delete(delete_datasource))
}

fn map_datasource_error(err: DatasourceError) -> Problem {
    match err {
        DatasourceError::Validation(errors) => error_builder::validation_failed(errors).build(),
        DatasourceError::NotFound => error_builder::not_found()
            .detail("Data source not found")
            .build(),
        DatasourceError::Database(e) => {
            error!("Data source database error: {}", e);
            error_builder::internal_server_error().build()
        }
    }
}

#[utoipa::path(
    get,
    path = "/datasources",
    responses(
        (status = 200, description = "Data sources in the caller's organization", body = DatasourceListResponse),
        (status = 401, description = "Unauthorized", body = datapulse_core::ProblemDetails),
        (status = 500, description = "Internal server error", body = datapulse_core::ProblemDetails)
    ),
    security(("bearer_auth" = [])),
    tag = "Data Sources"
)]
pub async fn list_datasources(
    RequireAuth(auth): RequireAuth,
    State(state): State<Arc<AppState>>,
) -> Result<Json<DatasourceListResponse>, Problem> {
    let datasources = state
        .datasource_service
        .list_datasources(auth.org_id)
        .await
        .map_err(map_datasource_error)?;

    Ok(Json(DatasourceListResponse {
        datasources: datasources.into_iter().map(Into::into).collect(),
    }))
}

#[utoipa::path(
    post,
    path = "/datasources",
    request_body = CreateDatasourceRequest,
    responses(
        (status = 201, description = "Data source created", body = DatasourceEnvelope),
        (status = 400, description = "Validation failed", body = datapulse_core::ProblemDetails),
        (status = 401, description = "Unauthorized", body = datapulse_core::ProblemDetails),
        (status = 500, description = "Internal server error", body = datapulse_core::ProblemDetails)
    ),
    security(("bearer_auth" = [])),
    tag = "Data Sources"
)]
pub async fn create_datasource(
    RequireAuth(auth): RequireAuth,
    State(state): State<Arc<AppState>>,
    Json(request): Json<CreateDatasourceRequest>,
) -> Result<(StatusCode, Json<DatasourceEnvelope>), Problem> {
    let datasource = state
        .datasource_service
        .create_datasource(auth.org_id, auth.user_id, request)
        .await
        .map_err(map_datasource_error)?;

    Ok((
        StatusCode::CREATED,
        Json(DatasourceEnvelope {
            datasource: datasource.into(),
        }),
    ))
}

#[utoipa::path(
    delete,
    path = "/datasources/{id}",
    params(("id" = i32, Path, description = "Data source id")),
    responses(
        (status = 200, description = "Data source deleted", body = MessageResponse),
        (status = 401, description = "Unauthorized", body = datapulse_core::ProblemDetails),
        (status = 404, description = "Data source not found", body = datapulse_core::ProblemDetails),
        (status = 500, description = "Internal server error", body = datapulse_core::ProblemDetails)
    ),
    security(("bearer_auth" = [])),
    tag = "Data Sources"
)]
pub async fn delete_datasource(
    RequireAuth(auth): RequireAuth,
    State(state): State<Arc<AppState>>,
    Path(id): Path<i32>,
) -> Result<Json<MessageResponse>, Problem> {
    state
        .datasource_service
        .delete_datasource(auth.org_id, id)
        .await
        .map_err(map_datasource_error)?;

    Ok(Json(MessageResponse {
        message: "Data source deleted successfully".to_string(),
    }))
}
