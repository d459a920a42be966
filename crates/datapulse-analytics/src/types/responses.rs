//! Response types for analytics endpoints

use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct IngestResponse {
    /// Number of events written by this batch
    #[schema(example = 3)]
    pub ingested: usize,
    #[schema(example = "3 events ingested successfully")]
    pub message: String,
}

/// A count bucket keyed by event name
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct NameBucket {
    pub name: String,
    pub count: i64,
}

/// A count bucket keyed by day or hour
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct TimeBucket {
    /// "YYYY-MM-DD" for daily buckets, "YYYY-MM-DD HH:00" for hourly
    #[schema(example = "2024-01-15")]
    pub date: String,
    pub count: i64,
}

#[derive(Debug, Clone, PartialEq, Serialize, ToSchema)]
#[serde(untagged)]
pub enum QueryBucket {
    Name(NameBucket),
    Time(TimeBucket),
}

#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct QueryResponse {
    pub data: Vec<QueryBucket>,
}

/// Severity-ranked observation derived from the event stream
#[derive(Debug, Clone, PartialEq, Serialize, ToSchema)]
pub struct Insight {
    /// One of "positive", "warning" or "info"
    #[serde(rename = "type")]
    #[schema(example = "positive")]
    pub insight_type: String,
    #[schema(example = "Traffic Surge Detected")]
    pub title: String,
    pub description: String,
    /// One of "high", "medium" or "low"
    #[schema(example = "high")]
    pub priority: String,
}

#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct InsightsSummary {
    pub total_events: i64,
    pub top_events: Vec<NameBucket>,
    pub recent_trend: Vec<TimeBucket>,
}

#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct InsightsResponse {
    pub insights: Vec<Insight>,
    pub summary: InsightsSummary,
}
