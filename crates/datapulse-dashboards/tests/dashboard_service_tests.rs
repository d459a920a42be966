//! Integration tests for dashboard and widget CRUD against a real database

use datapulse_dashboards::service::{DashboardError, DashboardService};
use datapulse_dashboards::types::{
    CreateDashboardRequest, CreateWidgetRequest, UpdateDashboardRequest, UpdateWidgetRequest,
};
use datapulse_database::test_utils::TestDatabase;
use sea_orm::{ActiveModelTrait, Set};

async fn create_org(test_db: &TestDatabase, name: &str) -> anyhow::Result<i32> {
    let org = datapulse_entities::organizations::ActiveModel {
        name: Set(name.to_string()),
        ..Default::default()
    }
    .insert(test_db.connection())
    .await?;
    Ok(org.id)
}

async fn create_user(test_db: &TestDatabase, email: &str, name: &str) -> anyhow::Result<i32> {
    let user = datapulse_entities::users::ActiveModel {
        email: Set(email.to_string()),
        password_hash: Set("not-a-real-hash".to_string()),
        name: Set(name.to_string()),
        role: Set("admin".to_string()),
        ..Default::default()
    }
    .insert(test_db.connection())
    .await?;
    Ok(user.id)
}

fn dashboard_request(name: &str) -> CreateDashboardRequest {
    CreateDashboardRequest {
        name: name.to_string(),
        description: None,
        layout: None,
    }
}

fn widget_request(title: &str) -> CreateWidgetRequest {
    CreateWidgetRequest {
        title: title.to_string(),
        widget_type: "line_chart".to_string(),
        config: None,
        position_x: None,
        position_y: None,
        width: None,
        height: None,
    }
}

#[tokio::test]
async fn test_list_includes_creator_name_and_widget_count() -> anyhow::Result<()> {
    let test_db = TestDatabase::with_migrations().await?;
    let service = DashboardService::new(test_db.connection_arc());
    let org_id = create_org(&test_db, "acme").await?;
    let user_id = create_user(&test_db, "jo@acme.test", "Jo Smith").await?;

    let dashboard = service
        .create_dashboard(org_id, user_id, dashboard_request("KPIs"))
        .await?;
    service
        .create_widget(org_id, dashboard.id, widget_request("Signups"))
        .await?;
    service
        .create_widget(org_id, dashboard.id, widget_request("Revenue"))
        .await?;

    let dashboards = service.list_dashboards(org_id).await?;

    assert_eq!(dashboards.len(), 1);
    assert_eq!(dashboards[0].name, "KPIs");
    assert_eq!(dashboards[0].creator_name, "Jo Smith");
    assert_eq!(dashboards[0].widget_count, 2);

    Ok(())
}

#[tokio::test]
async fn test_list_orders_by_most_recently_updated() -> anyhow::Result<()> {
    let test_db = TestDatabase::with_migrations().await?;
    let service = DashboardService::new(test_db.connection_arc());
    let org_id = create_org(&test_db, "acme").await?;
    let user_id = create_user(&test_db, "jo@acme.test", "Jo").await?;

    let first = service
        .create_dashboard(org_id, user_id, dashboard_request("First"))
        .await?;
    service
        .create_dashboard(org_id, user_id, dashboard_request("Second"))
        .await?;

    // Updating the older dashboard bumps it back to the top
    service
        .update_dashboard(
            org_id,
            first.id,
            UpdateDashboardRequest {
                name: Some("First (renamed)".to_string()),
                description: None,
                layout: None,
            },
        )
        .await?;

    let dashboards = service.list_dashboards(org_id).await?;
    let names: Vec<&str> = dashboards.iter().map(|d| d.name.as_str()).collect();
    assert_eq!(names, vec!["First (renamed)", "Second"]);

    Ok(())
}

#[tokio::test]
async fn test_get_returns_widgets_in_grid_order() -> anyhow::Result<()> {
    let test_db = TestDatabase::with_migrations().await?;
    let service = DashboardService::new(test_db.connection_arc());
    let org_id = create_org(&test_db, "acme").await?;
    let user_id = create_user(&test_db, "jo@acme.test", "Jo").await?;

    let dashboard = service
        .create_dashboard(org_id, user_id, dashboard_request("Layout"))
        .await?;

    let mut bottom = widget_request("Bottom");
    bottom.position_y = Some(4);
    let mut top_right = widget_request("Top right");
    top_right.position_x = Some(6);
    let top_left = widget_request("Top left");

    service.create_widget(org_id, dashboard.id, bottom).await?;
    service
        .create_widget(org_id, dashboard.id, top_right)
        .await?;
    service
        .create_widget(org_id, dashboard.id, top_left)
        .await?;

    let (_, widgets) = service.get_dashboard(org_id, dashboard.id).await?;
    let titles: Vec<&str> = widgets.iter().map(|w| w.title.as_str()).collect();
    assert_eq!(titles, vec!["Top left", "Top right", "Bottom"]);

    Ok(())
}

#[tokio::test]
async fn test_dashboard_invisible_to_other_organizations() -> anyhow::Result<()> {
    let test_db = TestDatabase::with_migrations().await?;
    let service = DashboardService::new(test_db.connection_arc());
    let org_a = create_org(&test_db, "org-a").await?;
    let org_b = create_org(&test_db, "org-b").await?;
    let user_id = create_user(&test_db, "jo@a.test", "Jo").await?;

    let dashboard = service
        .create_dashboard(org_a, user_id, dashboard_request("Private"))
        .await?;

    let result = service.get_dashboard(org_b, dashboard.id).await;
    assert!(matches!(result, Err(DashboardError::DashboardNotFound)));

    let result = service.delete_dashboard(org_b, dashboard.id).await;
    assert!(matches!(result, Err(DashboardError::DashboardNotFound)));

    // The dashboard is untouched for its own organization
    assert!(service.get_dashboard(org_a, dashboard.id).await.is_ok());

    Ok(())
}

#[tokio::test]
async fn test_partial_update_keeps_other_fields() -> anyhow::Result<()> {
    let test_db = TestDatabase::with_migrations().await?;
    let service = DashboardService::new(test_db.connection_arc());
    let org_id = create_org(&test_db, "acme").await?;
    let user_id = create_user(&test_db, "jo@acme.test", "Jo").await?;

    let dashboard = service
        .create_dashboard(
            org_id,
            user_id,
            CreateDashboardRequest {
                name: "Sales".to_string(),
                description: Some("Quarterly numbers".to_string()),
                layout: None,
            },
        )
        .await?;

    let updated = service
        .update_dashboard(
            org_id,
            dashboard.id,
            UpdateDashboardRequest {
                name: Some("Sales 2024".to_string()),
                description: None,
                layout: None,
            },
        )
        .await?;

    assert_eq!(updated.name, "Sales 2024");
    assert_eq!(updated.description.as_deref(), Some("Quarterly numbers"));

    Ok(())
}

#[tokio::test]
async fn test_layout_defaults_empty_and_updates_partially() -> anyhow::Result<()> {
    let test_db = TestDatabase::with_migrations().await?;
    let service = DashboardService::new(test_db.connection_arc());
    let org_id = create_org(&test_db, "acme").await?;
    let user_id = create_user(&test_db, "jo@acme.test", "Jo").await?;

    let dashboard = service
        .create_dashboard(org_id, user_id, dashboard_request("Grid"))
        .await?;
    assert_eq!(dashboard.layout, serde_json::json!({}));

    let grid = serde_json::json!({"columns": 12, "rows": [1, 2, 3]});
    let updated = service
        .update_dashboard(
            org_id,
            dashboard.id,
            UpdateDashboardRequest {
                name: None,
                description: None,
                layout: Some(grid.clone()),
            },
        )
        .await?;
    assert_eq!(updated.layout, grid);
    assert_eq!(updated.name, "Grid");

    // An update without a layout leaves the stored one alone
    let renamed = service
        .update_dashboard(
            org_id,
            dashboard.id,
            UpdateDashboardRequest {
                name: Some("Grid v2".to_string()),
                description: None,
                layout: None,
            },
        )
        .await?;
    assert_eq!(renamed.layout, grid);

    let summaries = service.list_dashboards(org_id).await?;
    assert_eq!(summaries[0].layout, grid);

    Ok(())
}

#[tokio::test]
async fn test_create_widget_applies_grid_defaults() -> anyhow::Result<()> {
    let test_db = TestDatabase::with_migrations().await?;
    let service = DashboardService::new(test_db.connection_arc());
    let org_id = create_org(&test_db, "acme").await?;
    let user_id = create_user(&test_db, "jo@acme.test", "Jo").await?;

    let dashboard = service
        .create_dashboard(org_id, user_id, dashboard_request("Defaults"))
        .await?;
    let widget = service
        .create_widget(org_id, dashboard.id, widget_request("Counter"))
        .await?;

    assert_eq!(widget.position_x, 0);
    assert_eq!(widget.position_y, 0);
    assert_eq!(widget.width, 4);
    assert_eq!(widget.height, 3);
    assert_eq!(widget.config, serde_json::json!({}));

    Ok(())
}

#[tokio::test]
async fn test_widget_update_scoped_through_dashboard_org() -> anyhow::Result<()> {
    let test_db = TestDatabase::with_migrations().await?;
    let service = DashboardService::new(test_db.connection_arc());
    let org_a = create_org(&test_db, "org-a").await?;
    let org_b = create_org(&test_db, "org-b").await?;
    let user_id = create_user(&test_db, "jo@a.test", "Jo").await?;

    let dashboard = service
        .create_dashboard(org_a, user_id, dashboard_request("Private"))
        .await?;
    let widget = service
        .create_widget(org_a, dashboard.id, widget_request("Secret"))
        .await?;

    let result = service
        .update_widget(
            org_b,
            widget.id,
            UpdateWidgetRequest {
                title: Some("Hijacked".to_string()),
                ..Default::default()
            },
        )
        .await;
    assert!(matches!(result, Err(DashboardError::WidgetNotFound)));

    let updated = service
        .update_widget(
            org_a,
            widget.id,
            UpdateWidgetRequest {
                title: Some("Renamed".to_string()),
                ..Default::default()
            },
        )
        .await?;
    assert_eq!(updated.title, "Renamed");

    Ok(())
}

#[tokio::test]
async fn test_delete_dashboard_cascades_to_widgets() -> anyhow::Result<()> {
    let test_db = TestDatabase::with_migrations().await?;
    let service = DashboardService::new(test_db.connection_arc());
    let org_id = create_org(&test_db, "acme").await?;
    let user_id = create_user(&test_db, "jo@acme.test", "Jo").await?;

    let dashboard = service
        .create_dashboard(org_id, user_id, dashboard_request("Doomed"))
        .await?;
    service
        .create_widget(org_id, dashboard.id, widget_request("Orphan-to-be"))
        .await?;

    service.delete_dashboard(org_id, dashboard.id).await?;

    let rows = test_db.query_sql("SELECT id FROM widgets").await?;
    assert!(rows.is_empty(), "widgets must be removed with their dashboard");

    Ok(())
}
