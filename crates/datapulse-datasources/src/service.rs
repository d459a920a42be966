//! Data source persistence

use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, ModelTrait, QueryFilter,
    QueryOrder, Set,
};
use std::sync::Arc;
use thiserror::Error;
use tracing::debug;

use datapulse_entities::datasources;

use crate::types::CreateDatasourceRequest;

/// Status assigned to newly created data sources
pub const INITIAL_STATUS: &str = "active";

#[derive(Debug, Error)]
pub enum DatasourceError {
    #[error("Database error: {0}")]
    Database(#[from] sea_orm::DbErr),
    #[error("Data source not found")]
    NotFound,
    #[error("Validation failed: {0:?}")]
    Validation(Vec<String>),
}

pub struct DatasourceService {
    db: Arc<DatabaseConnection>,
}

impl DatasourceService {
    pub fn new(db: Arc<DatabaseConnection>) -> Self {
        Self { db }
    }

    /// All data sources in an organization, newest first.
    pub async fn list_datasources(
        &self,
        org_id: i32,
    ) -> Result<Vec<datasources::Model>, DatasourceError> {
        let rows = datasources::Entity::find()
            .filter(datasources::Column::OrgId.eq(org_id))
            .order_by_desc(datasources::Column::CreatedAt)
            .all(self.db.as_ref())
            .await?;

        Ok(rows)
    }

    pub async fn create_datasource(
        &self,
        org_id: i32,
        created_by: i32,
        request: CreateDatasourceRequest,
    ) -> Result<datasources::Model, DatasourceError> {
        let errors = request.validate();
        if !errors.is_empty() {
            return Err(DatasourceError::Validation(errors));
        }

        // validate() already proved the type parses
        let source_type = request
            .parse_type()
            .map_err(|message| DatasourceError::Validation(vec![message]))?;

        let datasource = datasources::ActiveModel {
            org_id: Set(org_id),
            name: Set(request.name),
            source_type: Set(source_type),
            connection_config: Set(request.config.unwrap_or_else(|| serde_json::json!({}))),
            status: Set(INITIAL_STATUS.to_string()),
            created_by: Set(created_by),
            ..Default::default()
        }
        .insert(self.db.as_ref())
        .await?;

        debug!(org_id, datasource_id = datasource.id, "Data source created");

        Ok(datasource)
    }

    // A data source outside the caller's organization is indistinguishable
    // from one that does not exist.
    pub async fn delete_datasource(
        &self,
        org_id: i32,
        datasource_id: i32,
    ) -> Result<(), DatasourceError> {
        let existing = datasources::Entity::find()
            .filter(datasources::Column::Id.eq(datasource_id))
            .filter(datasources::Column::OrgId.eq(org_id))
            .one(self.db.as_ref())
            .await?
            .ok_or(DatasourceError::NotFound)?;

        existing.delete(self.db.as_ref()).await?;

        debug!(org_id, datasource_id, "Data source deleted");

        Ok(())
    }
}
