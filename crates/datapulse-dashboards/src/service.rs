//! Dashboard and widget persistence

use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseBackend, DatabaseConnection, EntityTrait,
    FromQueryResult, ModelTrait, QueryFilter, QueryOrder, Set, Statement,
};
use std::sync::Arc;
use thiserror::Error;
use tracing::debug;

use datapulse_entities::{dashboards, widgets};

use crate::types::{
    CreateDashboardRequest, CreateWidgetRequest, DashboardSummary, UpdateDashboardRequest,
    UpdateWidgetRequest,
};

/// Grid defaults applied when a widget is created without a position or size
pub const DEFAULT_WIDGET_WIDTH: i32 = 4;
pub const DEFAULT_WIDGET_HEIGHT: i32 = 3;

#[derive(Debug, Error)]
pub enum DashboardError {
    #[error("Database error: {0}")]
    Database(#[from] sea_orm::DbErr),
    #[error("Dashboard not found")]
    DashboardNotFound,
    #[error("Widget not found")]
    WidgetNotFound,
}

pub struct DashboardService {
    db: Arc<DatabaseConnection>,
}

impl DashboardService {
    pub fn new(db: Arc<DatabaseConnection>) -> Self {
        Self { db }
    }

    /// All dashboards in an organization, most recently updated first.
    ///
    /// Each row carries the creator's display name and the widget count so
    /// the overview page renders without further round trips.
    pub async fn list_dashboards(
        &self,
        org_id: i32,
    ) -> Result<Vec<DashboardSummary>, DashboardError> {
        let rows = DashboardSummary::find_by_statement(Statement::from_sql_and_values(
            DatabaseBackend::Postgres,
            r#"
            SELECT d.id, d.org_id, d.name, d.description, d.layout, d.created_by,
                   u.name AS creator_name,
                   COUNT(w.id) AS widget_count,
                   d.created_at, d.updated_at
            FROM dashboards d
            JOIN users u ON d.created_by = u.id
            LEFT JOIN widgets w ON w.dashboard_id = d.id
            WHERE d.org_id = $1
            GROUP BY d.id, u.name
            ORDER BY d.updated_at DESC
            "#,
            [org_id.into()],
        ))
        .all(self.db.as_ref())
        .await?;

        Ok(rows)
    }

    pub async fn create_dashboard(
        &self,
        org_id: i32,
        created_by: i32,
        request: CreateDashboardRequest,
    ) -> Result<dashboards::Model, DashboardError> {
        let dashboard = dashboards::ActiveModel {
            org_id: Set(org_id),
            name: Set(request.name),
            description: Set(request.description),
            layout: Set(request.layout.unwrap_or_else(|| serde_json::json!({}))),
            created_by: Set(created_by),
            ..Default::default()
        }
        .insert(self.db.as_ref())
        .await?;

        debug!(org_id, dashboard_id = dashboard.id, "Dashboard created");

        Ok(dashboard)
    }

    /// A single dashboard with its widgets in grid order (top-to-bottom,
    /// then left-to-right).
    pub async fn get_dashboard(
        &self,
        org_id: i32,
        dashboard_id: i32,
    ) -> Result<(DashboardSummary, Vec<widgets::Model>), DashboardError> {
        let dashboard = DashboardSummary::find_by_statement(Statement::from_sql_and_values(
            DatabaseBackend::Postgres,
            r#"
            SELECT d.id, d.org_id, d.name, d.description, d.layout, d.created_by,
                   u.name AS creator_name,
                   COUNT(w.id) AS widget_count,
                   d.created_at, d.updated_at
            FROM dashboards d
            JOIN users u ON d.created_by = u.id
            LEFT JOIN widgets w ON w.dashboard_id = d.id
            WHERE d.id = $1 AND d.org_id = $2
            GROUP BY d.id, u.name
            "#,
            [dashboard_id.into(), org_id.into()],
        ))
        .one(self.db.as_ref())
        .await?
        .ok_or(DashboardError::DashboardNotFound)?;

        let widgets = widgets::Entity::find()
            .filter(widgets::Column::DashboardId.eq(dashboard_id))
            .order_by_asc(widgets::Column::PositionY)
            .order_by_asc(widgets::Column::PositionX)
            .all(self.db.as_ref())
            .await?;

        Ok((dashboard, widgets))
    }

    /// Apply the fields present in the request; omitted fields keep their
    /// stored values.
    pub async fn update_dashboard(
        &self,
        org_id: i32,
        dashboard_id: i32,
        request: UpdateDashboardRequest,
    ) -> Result<dashboards::Model, DashboardError> {
        let existing = self.find_org_dashboard(org_id, dashboard_id).await?;

        let mut active: dashboards::ActiveModel = existing.into();
        if let Some(name) = request.name {
            active.name = Set(name);
        }
        if let Some(description) = request.description {
            active.description = Set(Some(description));
        }
        if let Some(layout) = request.layout {
            active.layout = Set(layout);
        }

        let updated = active.update(self.db.as_ref()).await?;
        Ok(updated)
    }

    /// Delete a dashboard; its widgets go with it via the cascading foreign key.
    pub async fn delete_dashboard(
        &self,
        org_id: i32,
        dashboard_id: i32,
    ) -> Result<(), DashboardError> {
        let existing = self.find_org_dashboard(org_id, dashboard_id).await?;
        existing.delete(self.db.as_ref()).await?;

        debug!(org_id, dashboard_id, "Dashboard deleted");

        Ok(())
    }

    pub async fn create_widget(
        &self,
        org_id: i32,
        dashboard_id: i32,
        request: CreateWidgetRequest,
    ) -> Result<widgets::Model, DashboardError> {
        // The dashboard lookup doubles as the tenancy check
        self.find_org_dashboard(org_id, dashboard_id).await?;

        let widget = widgets::ActiveModel {
            dashboard_id: Set(dashboard_id),
            widget_type: Set(request.widget_type),
            title: Set(request.title),
            config: Set(request.config.unwrap_or_else(|| serde_json::json!({}))),
            position_x: Set(request.position_x.unwrap_or(0)),
            position_y: Set(request.position_y.unwrap_or(0)),
            width: Set(request.width.unwrap_or(DEFAULT_WIDGET_WIDTH)),
            height: Set(request.height.unwrap_or(DEFAULT_WIDGET_HEIGHT)),
            ..Default::default()
        }
        .insert(self.db.as_ref())
        .await?;

        debug!(org_id, dashboard_id, widget_id = widget.id, "Widget created");

        Ok(widget)
    }

    pub async fn update_widget(
        &self,
        org_id: i32,
        widget_id: i32,
        request: UpdateWidgetRequest,
    ) -> Result<widgets::Model, DashboardError> {
        let existing = self.find_org_widget(org_id, widget_id).await?;

        let mut active: widgets::ActiveModel = existing.into();
        if let Some(title) = request.title {
            active.title = Set(title);
        }
        if let Some(widget_type) = request.widget_type {
            active.widget_type = Set(widget_type);
        }
        if let Some(config) = request.config {
            active.config = Set(config);
        }
        if let Some(position_x) = request.position_x {
            active.position_x = Set(position_x);
        }
        if let Some(position_y) = request.position_y {
            active.position_y = Set(position_y);
        }
        if let Some(width) = request.width {
            active.width = Set(width);
        }
        if let Some(height) = request.height {
            active.height = Set(height);
        }

        let updated = active.update(self.db.as_ref()).await?;
        Ok(updated)
    }

    pub async fn delete_widget(&self, org_id: i32, widget_id: i32) -> Result<(), DashboardError> {
        let existing = self.find_org_widget(org_id, widget_id).await?;
        existing.delete(self.db.as_ref()).await?;

        debug!(org_id, widget_id, "Widget deleted");

        Ok(())
    }

    async fn find_org_dashboard(
        &self,
        org_id: i32,
        dashboard_id: i32,
    ) -> Result<dashboards::Model, DashboardError> {
        dashboards::Entity::find()
            .filter(dashboards::Column::Id.eq(dashboard_id))
            .filter(dashboards::Column::OrgId.eq(org_id))
            .one(self.db.as_ref())
            .await?
            .ok_or(DashboardError::DashboardNotFound)
    }

    // A widget outside the caller's organization is indistinguishable from
    // one that does not exist.
    async fn find_org_widget(
        &self,
        org_id: i32,
        widget_id: i32,
    ) -> Result<widgets::Model, DashboardError> {
        widgets::Entity::find()
            .filter(widgets::Column::Id.eq(widget_id))
            .inner_join(dashboards::Entity)
            .filter(dashboards::Column::OrgId.eq(org_id))
            .one(self.db.as_ref())
            .await?
            .ok_or(DashboardError::WidgetNotFound)
    }
}
