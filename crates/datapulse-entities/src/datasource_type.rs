//! Data source type definitions
//!
//! Determines how a connected data source is read:
//! - `Postgresql` / `Mysql`: live database connections
//! - `Csv`: uploaded flat files
//! - `Api`: polled HTTP endpoints
//! - `Webhook`: pushed payloads
//! - `Javascript`: browser SDK instrumentation

use sea_orm::{DeriveActiveEnum, EnumIter};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    Serialize,
    Deserialize,
    ToSchema,
    DeriveActiveEnum,
    EnumIter,
)]
#[sea_orm(rs_type = "String", db_type = "Text")]
#[serde(rename_all = "snake_case")]
pub enum DatasourceType {
    #[sea_orm(string_value = "postgresql")]
    Postgresql,

    #[sea_orm(string_value = "mysql")]
    Mysql,

    #[sea_orm(string_value = "csv")]
    Csv,

    #[sea_orm(string_value = "api")]
    Api,

    #[sea_orm(string_value = "webhook")]
    Webhook,

    #[sea_orm(string_value = "javascript")]
    Javascript,
}

impl std::fmt::Display for DatasourceType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            DatasourceType::Postgresql => write!(f, "postgresql"),
            DatasourceType::Mysql => write!(f, "mysql"),
            DatasourceType::Csv => write!(f, "csv"),
            DatasourceType::Api => write!(f, "api"),
            DatasourceType::Webhook => write!(f, "webhook"),
            DatasourceType::Javascript => write!(f, "javascript"),
        }
    }
}

impl DatasourceType {
    /// Returns true if this source type holds database connection credentials
    pub fn is_database(&self) -> bool {
        matches!(self, DatasourceType::Postgresql | DatasourceType::Mysql)
    }

    /// Returns true if data arrives by being pushed to us rather than pulled
    pub fn is_push_based(&self) -> bool {
        matches!(self, DatasourceType::Webhook | DatasourceType::Javascript)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_datasource_type_display() {
        assert_eq!(DatasourceType::Postgresql.to_string(), "postgresql");
        assert_eq!(DatasourceType::Mysql.to_string(), "mysql");
        assert_eq!(DatasourceType::Csv.to_string(), "csv");
        assert_eq!(DatasourceType::Api.to_string(), "api");
        assert_eq!(DatasourceType::Webhook.to_string(), "webhook");
        assert_eq!(DatasourceType::Javascript.to_string(), "javascript");
    }

    #[test]
    fn test_is_database() {
        assert!(DatasourceType::Postgresql.is_database());
        assert!(DatasourceType::Mysql.is_database());
        assert!(!DatasourceType::Csv.is_database());
        assert!(!DatasourceType::Webhook.is_database());
    }

    #[test]
    fn test_is_push_based() {
        assert!(DatasourceType::Webhook.is_push_based());
        assert!(DatasourceType::Javascript.is_push_based());
        assert!(!DatasourceType::Api.is_push_based());
        assert!(!DatasourceType::Postgresql.is_push_based());
    }

    #[test]
    fn test_serde_round_trip() {
        assert_eq!(
            serde_json::to_string(&DatasourceType::Postgresql).unwrap(),
            "\"postgresql\""
        );
        assert_eq!(
            serde_json::from_str::<DatasourceType>("\"webhook\"").unwrap(),
            DatasourceType::Webhook
        );
        assert!(serde_json::from_str::<DatasourceType>("\"sqlite\"").is_err());
    }
}
