//! Request and response types for dashboard and widget endpoints

use datapulse_core::UtcDateTime;
use sea_orm::FromQueryResult;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use datapulse_entities::widgets;

pub const MAX_NAME_LENGTH: usize = 200;
pub const MAX_DESCRIPTION_LENGTH: usize = 1000;

#[derive(Debug, Deserialize, ToSchema)]
pub struct CreateDashboardRequest {
    pub name: String,
    pub description: Option<String>,
    /// Opaque grid layout blob owned by the frontend. Defaults to `{}`.
    pub layout: Option<serde_json::Value>,
}

impl CreateDashboardRequest {
    pub fn validate(&self) -> Vec<String> {
        let mut errors = Vec::new();
        validate_name(Some(&self.name), &mut errors);
        validate_description(self.description.as_deref(), &mut errors);
        errors
    }
}

#[derive(Debug, Deserialize, ToSchema)]
pub struct UpdateDashboardRequest {
    pub name: Option<String>,
    pub description: Option<String>,
    pub layout: Option<serde_json::Value>,
}

impl UpdateDashboardRequest {
    pub fn validate(&self) -> Vec<String> {
        let mut errors = Vec::new();
        if self.name.is_some() {
            validate_name(self.name.as_deref(), &mut errors);
        }
        validate_description(self.description.as_deref(), &mut errors);
        errors
    }
}

#[derive(Debug, Deserialize, ToSchema)]
pub struct CreateWidgetRequest {
    pub title: String,
    #[serde(rename = "type")]
    pub widget_type: String,
    pub config: Option<serde_json::Value>,
    pub position_x: Option<i32>,
    pub position_y: Option<i32>,
    pub width: Option<i32>,
    pub height: Option<i32>,
}

impl CreateWidgetRequest {
    pub fn validate(&self) -> Vec<String> {
        let mut errors = Vec::new();
        if self.title.trim().is_empty() {
            errors.push("title is required".to_string());
        } else if self.title.len() > MAX_NAME_LENGTH {
            errors.push(format!("title must be at most {} characters", MAX_NAME_LENGTH));
        }
        if self.widget_type.trim().is_empty() {
            errors.push("type is required".to_string());
        }
        errors
    }
}

#[derive(Debug, Default, Deserialize, ToSchema)]
pub struct UpdateWidgetRequest {
    pub title: Option<String>,
    #[serde(rename = "type")]
    pub widget_type: Option<String>,
    pub config: Option<serde_json::Value>,
    pub position_x: Option<i32>,
    pub position_y: Option<i32>,
    pub width: Option<i32>,
    pub height: Option<i32>,
}

fn validate_name(name: Option<&str>, errors: &mut Vec<String>) {
    match name {
        Some(name) if name.trim().is_empty() => {
            errors.push("name is required".to_string());
        }
        Some(name) if name.len() > MAX_NAME_LENGTH => {
            errors.push(format!("name must be at most {} characters", MAX_NAME_LENGTH));
        }
        _ => {}
    }
}

fn validate_description(description: Option<&str>, errors: &mut Vec<String>) {
    if let Some(description) = description {
        if description.len() > MAX_DESCRIPTION_LENGTH {
            errors.push(format!(
                "description must be at most {} characters",
                MAX_DESCRIPTION_LENGTH
            ));
        }
    }
}

/// Dashboard row joined with its creator's name and widget count
#[derive(Debug, Clone, Serialize, FromQueryResult, ToSchema)]
pub struct DashboardSummary {
    pub id: i32,
    pub org_id: i32,
    pub name: String,
    pub description: Option<String>,
    pub layout: serde_json::Value,
    pub created_by: i32,
    pub creator_name: String,
    pub widget_count: i64,
    #[schema(value_type = String, format = DateTime)]
    pub created_at: UtcDateTime,
    #[schema(value_type = String, format = DateTime)]
    pub updated_at: UtcDateTime,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct DashboardResponse {
    pub id: i32,
    pub org_id: i32,
    pub name: String,
    pub description: Option<String>,
    pub layout: serde_json::Value,
    pub created_by: i32,
    #[schema(value_type = String, format = DateTime)]
    pub created_at: UtcDateTime,
    #[schema(value_type = String, format = DateTime)]
    pub updated_at: UtcDateTime,
}

impl From<datapulse_entities::dashboards::Model> for DashboardResponse {
    fn from(model: datapulse_entities::dashboards::Model) -> Self {
        Self {
            id: model.id,
            org_id: model.org_id,
            name: model.name,
            description: model.description,
            layout: model.layout,
            created_by: model.created_by,
            created_at: model.created_at,
            updated_at: model.updated_at,
        }
    }
}

#[derive(Debug, Serialize, ToSchema)]
pub struct WidgetResponse {
    pub id: i32,
    pub dashboard_id: i32,
    #[serde(rename = "type")]
    pub widget_type: String,
    pub title: String,
    pub config: serde_json::Value,
    pub position_x: i32,
    pub position_y: i32,
    pub width: i32,
    pub height: i32,
    #[schema(value_type = String, format = DateTime)]
    pub created_at: UtcDateTime,
    #[schema(value_type = String, format = DateTime)]
    pub updated_at: UtcDateTime,
}

impl From<widgets::Model> for WidgetResponse {
    fn from(model: widgets::Model) -> Self {
        Self {
            id: model.id,
            dashboard_id: model.dashboard_id,
            widget_type: model.widget_type,
            title: model.title,
            config: model.config,
            position_x: model.position_x,
            position_y: model.position_y,
            width: model.width,
            height: model.height,
            created_at: model.created_at,
            updated_at: model.updated_at,
        }
    }
}

#[derive(Debug, Serialize, ToSchema)]
pub struct DashboardListResponse {
    pub dashboards: Vec<DashboardSummary>,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct DashboardEnvelope {
    pub dashboard: DashboardResponse,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct DashboardDetailResponse {
    pub dashboard: DashboardSummary,
    pub widgets: Vec<WidgetResponse>,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct WidgetEnvelope {
    pub widget: WidgetResponse,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct MessageResponse {
    pub message: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_create_dashboard_requires_name() {
        let request = CreateDashboardRequest {
            name: "   ".to_string(),
            description: None,
            layout: None,
        };
        assert_eq!(request.validate(), vec!["name is required"]);
    }

    #[test]
    fn test_create_dashboard_bounds_lengths() {
        let request = CreateDashboardRequest {
            name: "x".repeat(201),
            description: Some("y".repeat(1001)),
            layout: None,
        };
        let errors = request.validate();
        assert_eq!(errors.len(), 2);
        assert!(errors[0].contains("200"));
        assert!(errors[1].contains("1000"));
    }

    #[test]
    fn test_update_dashboard_allows_omitted_fields() {
        let request = UpdateDashboardRequest {
            name: None,
            description: None,
            layout: None,
        };
        assert!(request.validate().is_empty());
    }

    #[test]
    fn test_update_dashboard_rejects_blank_name() {
        let request = UpdateDashboardRequest {
            name: Some("".to_string()),
            description: None,
            layout: None,
        };
        assert_eq!(request.validate(), vec!["name is required"]);
    }

    #[test]
    fn test_widget_type_deserializes_from_type_key() {
        let request: CreateWidgetRequest =
            serde_json::from_str(r#"{"title":"Signups","type":"line_chart"}"#).unwrap();
        assert_eq!(request.widget_type, "line_chart");
        assert!(request.validate().is_empty());
    }
}
