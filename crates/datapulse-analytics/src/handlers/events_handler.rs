//! HTTP handlers for event ingestion, aggregation queries and insights

use axum::{
    extract::{Query, State},
    http::StatusCode,
    response::Json,
    routing::{get, post},
    Router,
};
use std::sync::Arc;
use tracing::error;
use utoipa::OpenApi;

use datapulse_auth::RequireAuth;
use datapulse_core::error_builder;
use datapulse_core::problemdetails::Problem;

use crate::services::{generate_insights, AnalyticsError, AnalyticsService};
use crate::types::{
    AnalyticsQuery, EventPayload, GroupBy, IngestEventsRequest, IngestResponse, Insight,
    InsightsResponse, InsightsSummary, NameBucket, QueryResponse, TimeBucket,
};

pub struct AppState {
    pub analytics_service: Arc<AnalyticsService>,
}

#[derive(OpenApi)]
#[openapi(
    paths(ingest_events, query_analytics, get_insights),
    components(schemas(
        IngestEventsRequest,
        EventPayload,
        IngestResponse,
        AnalyticsQuery,
        GroupBy,
        QueryResponse,
        NameBucket,
        TimeBucket,
        Insight,
        InsightsSummary,
        InsightsResponse
    )),
    tags(
        (name = "Analytics", description = "Event ingestion, aggregation queries and insights")
    )
)]
pub struct ApiDoc;

pub fn configure_routes() -> Router<Arc<AppState>> {
    Router::new()
        .route("/analytics/events", post(ingest_events))
        .route("/analytics/query", get(query_analytics))
        .route("/analytics/insights", get(get_insights))
}

fn map_analytics_error(err: AnalyticsError) -> Problem {
    match err {
        AnalyticsError::Validation(errors) => error_builder::validation_failed(errors).build(),
        AnalyticsError::Database(e) => {
            error!("Analytics database error: {}", e);
            error_builder::internal_server_error().build()
        }
    }
}

/// Ingest a batch of analytics events
#[utoipa::path(
    post,
    path = "/analytics/events",
    request_body = IngestEventsRequest,
    responses(
        (status = 201, description = "Events ingested", body = IngestResponse),
        (status = 400, description = "Validation failed", body = datapulse_core::ProblemDetails),
        (status = 401, description = "Unauthorized", body = datapulse_core::ProblemDetails),
        (status = 500, description = "Internal server error", body = datapulse_core::ProblemDetails)
    ),
    security(("bearer_auth" = [])),
    tag = "Analytics"
)]
pub async fn ingest_events(
    RequireAuth(auth): RequireAuth,
    State(state): State<Arc<AppState>>,
    Json(request): Json<IngestEventsRequest>,
) -> Result<(StatusCode, Json<IngestResponse>), Problem> {
    let count = state
        .analytics_service
        .ingest_batch(auth.org_id, request.events)
        .await
        .map_err(map_analytics_error)?;

    Ok((
        StatusCode::CREATED,
        Json(IngestResponse {
            ingested: count,
            message: format!("{} events ingested successfully", count),
        }),
    ))
}

/// Aggregate events by name, day or hour
#[utoipa::path(
    get,
    path = "/analytics/query",
    params(
        ("event_name" = Option<String>, Query, description = "Restrict to a single event name"),
        ("start_date" = Option<String>, Query, description = "Inclusive ISO 8601 lower bound"),
        ("end_date" = Option<String>, Query, description = "Inclusive ISO 8601 upper bound"),
        ("group_by" = Option<String>, Query, description = "Bucketing dimension: name (default), day or hour")
    ),
    responses(
        (status = 200, description = "Aggregated counts", body = QueryResponse),
        (status = 400, description = "Invalid query parameters", body = datapulse_core::ProblemDetails),
        (status = 401, description = "Unauthorized", body = datapulse_core::ProblemDetails),
        (status = 500, description = "Internal server error", body = datapulse_core::ProblemDetails)
    ),
    security(("bearer_auth" = [])),
    tag = "Analytics"
)]
pub async fn query_analytics(
    RequireAuth(auth): RequireAuth,
    State(state): State<Arc<AppState>>,
    Query(query): Query<AnalyticsQuery>,
) -> Result<Json<QueryResponse>, Problem> {
    let data = state
        .analytics_service
        .query(auth.org_id, query)
        .await
        .map_err(map_analytics_error)?;

    Ok(Json(QueryResponse { data }))
}

/// Heuristic insights over the organization's event stream
#[utoipa::path(
    get,
    path = "/analytics/insights",
    responses(
        (status = 200, description = "Generated insights with summary", body = InsightsResponse),
        (status = 401, description = "Unauthorized", body = datapulse_core::ProblemDetails),
        (status = 500, description = "Internal server error", body = datapulse_core::ProblemDetails)
    ),
    security(("bearer_auth" = [])),
    tag = "Analytics"
)]
pub async fn get_insights(
    RequireAuth(auth): RequireAuth,
    State(state): State<Arc<AppState>>,
) -> Result<Json<InsightsResponse>, Problem> {
    let service = &state.analytics_service;

    let total_events = service
        .total_events(auth.org_id)
        .await
        .map_err(map_analytics_error)?;
    let top_events = service
        .top_events(auth.org_id)
        .await
        .map_err(map_analytics_error)?;
    let recent_trend = service
        .recent_trend(auth.org_id)
        .await
        .map_err(map_analytics_error)?;

    let insights = generate_insights(total_events, &top_events, &recent_trend);

    Ok(Json(InsightsResponse {
        insights,
        summary: InsightsSummary {
            total_events,
            top_events,
            recent_trend,
        },
    }))
}
