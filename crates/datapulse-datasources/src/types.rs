//! Request and response types for data source endpoints

use datapulse_core::UtcDateTime;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use datapulse_entities::datasource_type::DatasourceType;
use datapulse_entities::datasources;

pub const MAX_NAME_LENGTH: usize = 200;

#[derive(Debug, Deserialize, ToSchema)]
pub struct CreateDatasourceRequest {
    pub name: String,
    /// One of the supported source types; invalid values are rejected with
    /// the full list of accepted ones.
    #[serde(rename = "type")]
    pub source_type: String,
    pub config: Option<serde_json::Value>,
}

impl CreateDatasourceRequest {
    pub fn validate(&self) -> Vec<String> {
        let mut errors = Vec::new();
        if self.name.trim().is_empty() {
            errors.push("name is required".to_string());
        } else if self.name.len() > MAX_NAME_LENGTH {
            errors.push(format!("name must be at most {} characters", MAX_NAME_LENGTH));
        }
        if let Err(message) = self.parse_type() {
            errors.push(message);
        }
        errors
    }

    pub fn parse_type(&self) -> Result<DatasourceType, String> {
        serde_json::from_value(serde_json::Value::String(self.source_type.clone())).map_err(|_| {
            let valid: Vec<String> = <DatasourceType as sea_orm::Iterable>::iter()
                .map(|t| t.to_string())
                .collect();
            format!("Invalid type. Must be one of: {}", valid.join(", "))
        })
    }
}

#[derive(Debug, Serialize, ToSchema)]
pub struct DatasourceResponse {
    pub id: i32,
    pub org_id: i32,
    #[serde(rename = "type")]
    pub source_type: DatasourceType,
    pub name: String,
    pub status: String,
    #[schema(value_type = String, format = DateTime)]
    pub created_at: UtcDateTime,
}

impl From<datasources::Model> for DatasourceResponse {
    fn from(model: datasources::Model) -> Self {
        Self {
            id: model.id,
            org_id: model.org_id,
            source_type: model.source_type,
            name: model.name,
            status: model.status,
            created_at: model.created_at,
        }
    }
}

#[derive(Debug, Serialize, ToSchema)]
pub struct DatasourceListResponse {
    pub datasources: Vec<DatasourceResponse>,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct DatasourceEnvelope {
    pub datasource: DatasourceResponse,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct MessageResponse {
    pub message: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_valid_request_parses_type() {
        let request = CreateDatasourceRequest {
            name: "Production DB".to_string(),
            source_type: "postgresql".to_string(),
            config: None,
        };
        assert!(request.validate().is_empty());
        assert_eq!(request.parse_type(), Ok(DatasourceType::Postgresql));
    }

    #[test]
    fn test_unknown_type_lists_accepted_values() {
        let request = CreateDatasourceRequest {
            name: "Legacy".to_string(),
            source_type: "sqlite".to_string(),
            config: None,
        };
        let errors = request.validate();
        assert_eq!(
            errors,
            vec!["Invalid type. Must be one of: postgresql, mysql, csv, api, webhook, javascript"]
        );
    }

    #[test]
    fn test_blank_name_rejected() {
        let request = CreateDatasourceRequest {
            name: " ".to_string(),
            source_type: "csv".to_string(),
            config: None,
        };
        assert_eq!(request.validate(), vec!["name is required"]);
    }
}
