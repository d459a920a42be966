//! Data sources plugin wiring for the DataPulse plugin system

use std::future::Future;
use std::pin::Pin;
use std::sync::Arc;

use datapulse_core::plugin::{
    DatapulsePlugin, PluginContext, PluginError, PluginRoutes, ServiceRegistrationContext,
};
use utoipa::openapi::OpenApi;
use utoipa::OpenApi as OpenApiTrait;

use crate::handlers::{self, AppState};
use crate::service::DatasourceService;

pub struct DatasourcesPlugin;

impl DatasourcesPlugin {
    pub fn new() -> Self {
        Self
    }
}

impl Default for DatasourcesPlugin {
    fn default() -> Self {
        Self::new()
    }
}

impl DatapulsePlugin for DatasourcesPlugin {
    fn name(&self) -> &'static str {
        "datasources"
    }

    fn register_services<'a>(
        &'a self,
        context: &'a ServiceRegistrationContext,
    ) -> Pin<Box<dyn Future<Output = Result<(), PluginError>> + Send + 'a>> {
        Box::pin(async move {
            let db = context.require_service::<sea_orm::DatabaseConnection>();

            let datasource_service = Arc::new(DatasourceService::new(db));
            context.register_service(datasource_service);

            tracing::debug!("Data sources plugin services registered");
            Ok(())
        })
    }

    fn configure_routes(&self, context: &PluginContext) -> Option<PluginRoutes> {
        let datasource_service = context.require_service::<DatasourceService>();

        let state = Arc::new(AppState { datasource_service });
        let router = handlers::configure_routes().with_state(state);
        Some(PluginRoutes { router })
    }

    fn openapi_schema(&self) -> Option<OpenApi> {
        Some(<handlers::ApiDoc as OpenApiTrait>::openapi())
    }
}
