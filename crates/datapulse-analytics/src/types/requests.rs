//! Request types for analytics endpoints

use datapulse_core::DateTime;
use serde::Deserialize;
use utoipa::ToSchema;

/// A single event submitted by a tracking client
#[derive(Debug, Clone, Deserialize, ToSchema)]
pub struct EventPayload {
    /// Event name, e.g. "page_view" or "checkout_completed"
    #[schema(example = "page_view")]
    pub name: String,
    /// Arbitrary event properties. Defaults to an empty object.
    pub properties: Option<serde_json::Value>,
    /// Identifier of the end user the event belongs to
    pub user_id: Option<String>,
    pub session_id: Option<String>,
    /// Event time in ISO 8601. Defaults to the server time on arrival.
    #[schema(value_type = Option<String>, example = "2024-01-15T14:30:00Z")]
    pub timestamp: Option<DateTime>,
}

#[derive(Debug, Clone, Deserialize, ToSchema)]
pub struct IngestEventsRequest {
    pub events: Vec<EventPayload>,
}

/// Bucketing dimension for aggregation queries
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize, ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum GroupBy {
    /// One bucket per event name (default)
    #[default]
    Name,
    /// One bucket per calendar day
    Day,
    /// One bucket per hour
    Hour,
}

#[derive(Debug, Clone, Default, Deserialize, ToSchema)]
pub struct AnalyticsQuery {
    /// Restrict the aggregation to a single event name
    #[serde(default, deserialize_with = "empty_string_as_none")]
    pub event_name: Option<String>,
    #[serde(default, deserialize_with = "empty_string_as_none")]
    #[schema(value_type = Option<String>, example = "2024-01-01T00:00:00Z")]
    pub start_date: Option<DateTime>,
    #[serde(default, deserialize_with = "empty_string_as_none")]
    #[schema(value_type = Option<String>, example = "2024-01-31T23:59:59Z")]
    pub end_date: Option<DateTime>,
    #[serde(default, deserialize_with = "empty_string_as_none")]
    pub group_by: Option<GroupBy>,
}

/// Query-string parameters arrive as strings; clients commonly send
/// `?group_by=&start_date=` for filters they left blank. An empty value
/// means the parameter is absent.
fn empty_string_as_none<'de, D, T>(deserializer: D) -> Result<Option<T>, D::Error>
where
    D: serde::Deserializer<'de>,
    T: serde::de::DeserializeOwned,
{
    let value: Option<String> = Deserialize::deserialize(deserializer)?;
    match value {
        None => Ok(None),
        Some(s) if s.is_empty() => Ok(None),
        Some(s) => serde_json::from_value(serde_json::Value::String(s))
            .map(Some)
            .map_err(serde::de::Error::custom),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_group_by_deserializes_lowercase() {
        assert_eq!(
            serde_json::from_str::<GroupBy>("\"day\"").unwrap(),
            GroupBy::Day
        );
        assert_eq!(
            serde_json::from_str::<GroupBy>("\"hour\"").unwrap(),
            GroupBy::Hour
        );
        assert_eq!(
            serde_json::from_str::<GroupBy>("\"name\"").unwrap(),
            GroupBy::Name
        );
        assert!(serde_json::from_str::<GroupBy>("\"week\"").is_err());
    }

    #[test]
    fn test_query_treats_empty_values_as_absent() {
        let json = r#"{
            "event_name": "",
            "start_date": "",
            "end_date": "",
            "group_by": ""
        }"#;
        let query: AnalyticsQuery = serde_json::from_str(json).unwrap();
        assert!(query.event_name.is_none());
        assert!(query.start_date.is_none());
        assert!(query.end_date.is_none());
        assert!(query.group_by.is_none());
    }

    #[test]
    fn test_query_still_parses_populated_values() {
        let json = r#"{
            "event_name": "page_view",
            "start_date": "2024-01-01T00:00:00Z",
            "group_by": "day"
        }"#;
        let query: AnalyticsQuery = serde_json::from_str(json).unwrap();
        assert_eq!(query.event_name.as_deref(), Some("page_view"));
        assert!(query.start_date.is_some());
        assert_eq!(query.group_by, Some(GroupBy::Day));

        let invalid: Result<AnalyticsQuery, _> =
            serde_json::from_str(r#"{"group_by":"week"}"#);
        assert!(invalid.is_err());
    }

    #[test]
    fn test_event_payload_minimal() {
        let payload: EventPayload = serde_json::from_str(r#"{"name":"signup"}"#).unwrap();
        assert_eq!(payload.name, "signup");
        assert!(payload.properties.is_none());
        assert!(payload.timestamp.is_none());
    }

    #[test]
    fn test_event_payload_full() {
        let json = r#"{
            "name": "purchase",
            "properties": {"amount": 42},
            "user_id": "u-1",
            "session_id": "s-1",
            "timestamp": "2024-01-15T14:30:00Z"
        }"#;
        let payload: EventPayload = serde_json::from_str(json).unwrap();
        assert_eq!(payload.properties.unwrap()["amount"], 42);
        assert!(payload.timestamp.is_some());
    }
}
