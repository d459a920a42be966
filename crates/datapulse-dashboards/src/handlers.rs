//! HTTP handlers for dashboard and widget endpoints

use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::Json,
    routing::{get, post, put},
    Router,
};
use std::sync::Arc;
use tracing::error;
use utoipa::OpenApi;

use datapulse_auth::RequireAuth;
use datapulse_core::error_builder;
use datapulse_core::problemdetails::Problem;

use crate::service::{DashboardError, DashboardService};
use crate::types::{
    CreateDashboardRequest, CreateWidgetRequest, DashboardDetailResponse, DashboardEnvelope,
    DashboardListResponse, DashboardResponse, DashboardSummary, MessageResponse,
    UpdateDashboardRequest, UpdateWidgetRequest, WidgetEnvelope, WidgetResponse,
};

pub struct AppState {
    pub dashboard_service: Arc<DashboardService>,
}

#[derive(OpenApi)]
#[openapi(
    paths(
        list_dashboards,
        create_dashboard,
        get_dashboard,
        update_dashboard,
        delete_dashboard,
        create_widget,
        update_widget,
        delete_widget
    ),
    components(schemas(
        CreateDashboardRequest,
        UpdateDashboardRequest,
        CreateWidgetRequest,
        UpdateWidgetRequest,
        DashboardSummary,
        DashboardResponse,
        WidgetResponse,
        DashboardListResponse,
        DashboardEnvelope,
        DashboardDetailResponse,
        WidgetEnvelope,
        MessageResponse
    )),
    tags(
        (name = "Dashboards", description = "Organization-scoped dashboards and their widgets")
    )
)]
pub struct ApiDoc;

pub fn configure_routes() -> Router<Arc<AppState>> {
    Router::new()
        .route("/dashboards", get(list_dashboards).post(create_dashboard))
        .route(
            "/dashboards/{id}",
            get(get_dashboard)
                .put(update_dashboard)
                .delete(delete_dashboard),
        )
        .route("/dashboards/{id}/widgets", post(create_widget))
        .route("/widgets/{id}", put(update_widget).delete(delete_widget))
}

fn map_dashboard_error(err: DashboardError) -> Problem {
    match err {
        DashboardError::DashboardNotFound => error_builder::not_found()
            .detail("Dashboard not found")
            .build(),
        DashboardError::WidgetNotFound => error_builder::not_found()
            .detail("Widget not found")
            .build(),
        DashboardError::Database(e) => {
            error!("Dashboard database error: {}", e);
            error_builder::internal_server_error().build()
        }
    }
}

#[utoipa::path(
    get,
    path = "/dashboards",
    responses(
        (status = 200, description = "Dashboards in the caller's organization", body = DashboardListResponse),
        (status = 401, description = "Unauthorized", body = datapulse_core::ProblemDetails),
        (status = 500, description = "Internal server error", body = datapulse_core::ProblemDetails)
    ),
    security(("bearer_auth" = [])),
    tag = "Dashboards"
)]
pub async fn list_dashboards(
    RequireAuth(auth): RequireAuth,
    State(state): State<Arc<AppState>>,
) -> Result<Json<DashboardListResponse>, Problem> {
    let dashboards = state
        .dashboard_service
        .list_dashboards(auth.org_id)
        .await
        .map_err(map_dashboard_error)?;

    Ok(Json(DashboardListResponse { dashboards }))
}

#[utoipa::path(
    post,
    path = "/dashboards",
    request_body = CreateDashboardRequest,
    responses(
        (status = 201, description = "Dashboard created", body = DashboardEnvelope),
        (status = 400, description = "Validation failed", body = datapulse_core::ProblemDetails),
        (status = 401, description = "Unauthorized", body = datapulse_core::ProblemDetails),
        (status = 500, description = "Internal server error", body = datapulse_core::ProblemDetails)
    ),
    security(("bearer_auth" = [])),
    tag = "Dashboards"
)]
pub async fn create_dashboard(
    RequireAuth(auth): RequireAuth,
    State(state): State<Arc<AppState>>,
    Json(request): Json<CreateDashboardRequest>,
) -> Result<(StatusCode, Json<DashboardEnvelope>), Problem> {
    let errors = request.validate();
    if !errors.is_empty() {
        return Err(error_builder::validation_failed(errors).build());
    }

    let dashboard = state
        .dashboard_service
        .create_dashboard(auth.org_id, auth.user_id, request)
        .await
        .map_err(map_dashboard_error)?;

    Ok((
        StatusCode::CREATED,
        Json(DashboardEnvelope {
            dashboard: dashboard.into(),
        }),
    ))
}

#[utoipa::path(
    get,
    path = "/dashboards/{id}",
    params(("id" = i32, Path, description = "Dashboard id")),
    responses(
        (status = 200, description = "Dashboard with its widgets", body = DashboardDetailResponse),
        (status = 401, description = "Unauthorized", body = datapulse_core::ProblemDetails),
        (status = 404, description = "Dashboard not found", body = datapulse_core::ProblemDetails),
        (status = 500, description = "Internal server error", body = datapulse_core::ProblemDetails)
    ),
    security(("bearer_auth" = [])),
    tag = "Dashboards"
)]
pub async fn get_dashboard(
    RequireAuth(auth): RequireAuth,
    State(state): State<Arc<AppState>>,
    Path(id): Path<i32>,
) -> Result<Json<DashboardDetailResponse>, Problem> {
    let (dashboard, widgets) = state
        .dashboard_service
        .get_dashboard(auth.org_id, id)
        .await
        .map_err(map_dashboard_error)?;

    Ok(Json(DashboardDetailResponse {
        dashboard,
        widgets: widgets.into_iter().map(Into::into).collect(),
    }))
}

#[utoipa::path(
    put,
    path = "/dashboards/{id}",
    params(("id" = i32, Path, description = "Dashboard id")),
    request_body = UpdateDashboardRequest,
    responses(
        (status = 200, description = "Dashboard updated", body = DashboardEnvelope),
        (status = 400, description = "Validation failed", body = datapulse_core::ProblemDetails),
        (status = 401, description = "Unauthorized", body = datapulse_core::ProblemDetails),
        (status = 404, description = "Dashboard not found", body = datapulse_core::ProblemDetails),
        (status = 500, description = "Internal server error", body = datapulse_core::ProblemDetails)
    ),
    security(("bearer_auth" = [])),
    tag = "Dashboards"
)]
pub async fn update_dashboard(
    RequireAuth(auth): RequireAuth,
    State(state): State<Arc<AppState>>,
    Path(id): Path<i32>,
    Json(request): Json<UpdateDashboardRequest>,
) -> Result<Json<DashboardEnvelope>, Problem> {
    let errors = request.validate();
    if !errors.is_empty() {
        return Err(error_builder::validation_failed(errors).build());
    }

    let dashboard = state
        .dashboard_service
        .update_dashboard(auth.org_id, id, request)
        .await
        .map_err(map_dashboard_error)?;

    Ok(Json(DashboardEnvelope {
        dashboard: dashboard.into(),
    }))
}

#[utoipa::path(
    delete,
    path = "/dashboards/{id}",
    params(("id" = i32, Path, description = "Dashboard id")),
    responses(
        (status = 200, description = "Dashboard deleted", body = MessageResponse),
        (status = 401, description = "Unauthorized", body = datapulse_core::ProblemDetails),
        (status = 404, description = "Dashboard not found", body = datapulse_core::ProblemDetails),
        (status = 500, description = "Internal server error", body = datapulse_core::ProblemDetails)
    ),
    security(("bearer_auth" = [])),
    tag = "Dashboards"
)]
pub async fn delete_dashboard(
    RequireAuth(auth): RequireAuth,
    State(state): State<Arc<AppState>>,
    Path(id): Path<i32>,
) -> Result<Json<MessageResponse>, Problem> {
    state
        .dashboard_service
        .delete_dashboard(auth.org_id, id)
        .await
        .map_err(map_dashboard_error)?;

    Ok(Json(MessageResponse {
        message: "Dashboard deleted successfully".to_string(),
    }))
}

#[utoipa::path(
    post,
    path = "/dashboards/{id}/widgets",
    params(("id" = i32, Path, description = "Dashboard id")),
    request_body = CreateWidgetRequest,
    responses(
        (status = 201, description = "Widget created", body = WidgetEnvelope),
        (status = 400, description = "Validation failed", body = datapulse_core::ProblemDetails),
        (status = 401, description = "Unauthorized", body = datapulse_core::ProblemDetails),
        (status = 404, description = "Dashboard not found", body = datapulse_core::ProblemDetails),
        (status = 500, description = "Internal server error", body = datapulse_core::ProblemDetails)
    ),
    security(("bearer_auth" = [])),
    tag = "Dashboards"
)]
pub async fn create_widget(
    RequireAuth(auth): RequireAuth,
    State(state): State<Arc<AppState>>,
    Path(id): Path<i32>,
    Json(request): Json<CreateWidgetRequest>,
) -> Result<(StatusCode, Json<WidgetEnvelope>), Problem> {
    let errors = request.validate();
    if !errors.is_empty() {
        return Err(error_builder::validation_failed(errors).build());
    }

    let widget = state
        .dashboard_service
        .create_widget(auth.org_id, id, request)
        .await
        .map_err(map_dashboard_error)?;

    Ok((
        StatusCode::CREATED,
        Json(WidgetEnvelope {
            widget: widget.into(),
        }),
    ))
}

#[utoipa::path(
    put,
    path = "/widgets/{id}",
    params(("id" = i32, Path, description = "Widget id")),
    request_body = UpdateWidgetRequest,
    responses(
        (status = 200, description = "Widget updated", body = WidgetEnvelope),
        (status = 401, description = "Unauthorized", body = datapulse_core::ProblemDetails),
        (status = 404, description = "Widget not found", body = datapulse_core::ProblemDetails),
        (status = 500, description = "Internal server error", body = datapulse_core::ProblemDetails)
    ),
    security(("bearer_auth" = [])),
    tag = "Dashboards"
)]
pub async fn update_widget(
    RequireAuth(auth): RequireAuth,
    State(state): State<Arc<AppState>>,
    Path(id): Path<i32>,
    Json(request): Json<UpdateWidgetRequest>,
) -> Result<Json<WidgetEnvelope>, Problem> {
    let widget = state
        .dashboard_service
        .update_widget(auth.org_id, id, request)
        .await
        .map_err(map_dashboard_error)?;

    Ok(Json(WidgetEnvelope {
        widget: widget.into(),
    }))
}

#[utoipa::path(
    delete,
    path = "/widgets/{id}",
    params(("id" = i32, Path, description = "Widget id")),
    responses(
        (status = 200, description = "Widget deleted", body = MessageResponse),
        (status = 401, description = "Unauthorized", body = datapulse_core::ProblemDetails),
        (status = 404, description = "Widget not found", body = datapulse_core::ProblemDetails),
        (status = 500, description = "Internal server error", body = datapulse_core::ProblemDetails)
    ),
    security(("bearer_auth" = [])),
    tag = "Dashboards"
)]
pub async fn delete_widget(
    RequireAuth(auth): RequireAuth,
    State(state): State<Arc<AppState>>,
    Path(id): Path<i32>,
) -> Result<Json<MessageResponse>, Problem> {
    state
        .dashboard_service
        .delete_widget(auth.org_id, id)
        .await
        .map_err(map_dashboard_error)?;

    Ok(Json(MessageResponse {
        message: "Widget deleted successfully".to_string(),
    }))
}
