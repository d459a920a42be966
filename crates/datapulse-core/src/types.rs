//! Custom types for common data structures and validation

use chrono::{DateTime as ChronoDateTime, NaiveDateTime, Utc};
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::ops::Deref;
use utoipa::ToSchema;

/// Database DateTime type used across all DataPulse crates
///
/// This is the canonical datetime type for TIMESTAMPTZ columns.
pub type DBDateTime = ChronoDateTime<Utc>;

/// Standard UTC DateTime type used across all DataPulse crates
///
/// Canonical datetime type for API responses (serializes as ISO 8601 with
/// 'Z' suffix) and database TIMESTAMPTZ columns.
///
/// # OpenAPI Schema
/// When using with utoipa, add the schema attribute:
/// ```rust,ignore
/// #[schema(value_type = String, format = DateTime)]
/// pub field: UtcDateTime,
/// ```
pub type UtcDateTime = ChronoDateTime<Utc>;

/// Wrapper type for DateTime<Utc> that automatically parses ISO 8601 format
/// Accepts multiple formats:
/// - `2024-01-15T14:30:00` (naive datetime, assumes UTC)
/// - `2024-01-15T14:30:00Z` (UTC)
/// - `2024-01-15T14:30:00+00:00` (with timezone offset)
///
/// All formats are converted to DateTime<Utc>. Serializes in RFC 3339.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, ToSchema)]
#[schema(value_type = String, example = "2024-01-15T14:30:00Z")]
pub struct DateTime(pub ChronoDateTime<Utc>);

impl<'de> Deserialize<'de> for DateTime {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let s: String = Deserialize::deserialize(deserializer)?;

        // Try parsing as RFC3339 (with timezone) first
        if let Ok(dt) = s.parse::<ChronoDateTime<Utc>>() {
            return Ok(DateTime(dt));
        }

        // Try parsing as naive datetime (YYYY-MM-DDTHH:MM:SS) and assume UTC
        if let Ok(naive_dt) = NaiveDateTime::parse_from_str(&s, "%Y-%m-%dT%H:%M:%S") {
            let dt = ChronoDateTime::<Utc>::from_naive_utc_and_offset(naive_dt, Utc);
            return Ok(DateTime(dt));
        }

        Err(serde::de::Error::custom(
            "Invalid datetime format. Use ISO 8601: YYYY-MM-DDTHH:MM:SSZ",
        ))
    }
}

impl Serialize for DateTime {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        let formatted = self.0.to_rfc3339();
        serializer.serialize_str(&formatted)
    }
}

// Allow using DateTime like DateTime<Utc>
impl Deref for DateTime {
    type Target = ChronoDateTime<Utc>;

    fn deref(&self) -> &Self::Target {
        &self.0
    }
}

// Conversions
impl From<ChronoDateTime<Utc>> for DateTime {
    fn from(dt: ChronoDateTime<Utc>) -> Self {
        DateTime(dt)
    }
}

impl From<DateTime> for ChronoDateTime<Utc> {
    fn from(dt: DateTime) -> Self {
        dt.0
    }
}
