//! Analytics plugin wiring for the DataPulse plugin system

use std::future::Future;
use std::pin::Pin;
use std::sync::Arc;

use datapulse_core::plugin::{
    DatapulsePlugin, PluginContext, PluginError, PluginRoutes, ServiceRegistrationContext,
};
use utoipa::openapi::OpenApi;
use utoipa::OpenApi as OpenApiTrait;

use crate::handlers::{self, AppState};
use crate::services::AnalyticsService;

pub struct AnalyticsPlugin;

impl AnalyticsPlugin {
    pub fn new() -> Self {
        Self
    }
}

impl Default for AnalyticsPlugin {
    fn default() -> Self {
        Self::new()
    }
}

impl DatapulsePlugin for AnalyticsPlugin {
    fn name(&self) -> &'static str {
        "analytics"
    }

    fn register_services<'a>(
        &'a self,
        context: &'a ServiceRegistrationContext,
    ) -> Pin<Box<dyn Future<Output = Result<(), PluginError>> + Send + 'a>> {
        Box::pin(async move {
            let db = context.require_service::<sea_orm::DatabaseConnection>();

            let analytics_service = Arc::new(AnalyticsService::new(db));
            context.register_service(analytics_service);

            tracing::debug!("Analytics plugin services registered");
            Ok(())
        })
    }

    fn configure_routes(&self, context: &PluginContext) -> Option<PluginRoutes> {
        let analytics_service = context.require_service::<AnalyticsService>();

        let state = Arc::new(AppState { analytics_service });
        let router = handlers::configure_routes().with_state(state);
        Some(PluginRoutes { router })
    }

    fn openapi_schema(&self) -> Option<OpenApi> {
        Some(<handlers::ApiDoc as OpenApiTrait>::openapi())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_analytics_plugin_name() {
        let plugin = AnalyticsPlugin::new();
        assert_eq!(plugin.name(), "analytics");
    }
}
