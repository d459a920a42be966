//! Dashboards plugin wiring for the DataPulse plugin system

use std::future::Future;
use std::pin::Pin;
use std::sync::Arc;

use datapulse_core::plugin::{
    DatapulsePlugin, PluginContext, PluginError, PluginRoutes, ServiceRegistrationContext,
};
use utoipa::openapi::OpenApi;
use utoipa::OpenApi as OpenApiTrait;

use crate::handlers::{self, AppState};
use crate::service::DashboardService;

pub struct DashboardsPlugin;

impl DashboardsPlugin {
    pub fn new() -> Self {
        Self
    }
}

impl Default for DashboardsPlugin {
    fn default() -> Self {
        Self::new()
    }
}

impl DatapulsePlugin for DashboardsPlugin {
    fn name(&self) -> &'static str {
        "dashboards"
    }

    fn register_services<'a>(
        &'a self,
        context: &'a ServiceRegistrationContext,
    ) -> Pin<Box<dyn Future<Output = Result<(), PluginError>> + Send + 'a>> {
        Box::pin(async move {
            let db = context.require_service::<sea_orm::DatabaseConnection>();

            let dashboard_service = Arc::new(DashboardService::new(db));
            context.register_service(dashboard_service);

            tracing::debug!("Dashboards plugin services registered");
            Ok(())
        })
    }

    fn configure_routes(&self, context: &PluginContext) -> Option<PluginRoutes> {
        let dashboard_service = context.require_service::<DashboardService>();

        let state = Arc::new(AppState { dashboard_service });
        let router = handlers::configure_routes().with_state(state);
        Some(PluginRoutes { router })
    }

    fn openapi_schema(&self) -> Option<OpenApi> {
        Some(<handlers::ApiDoc as OpenApiTrait>::openapi())
    }
}
