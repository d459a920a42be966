//! HTTP API server command

use clap::Args;
use std::sync::Arc;
use tracing::{debug, info};

use axum::{routing::get, Json, Router};
use tokio::net::TcpListener;
use tower_http::{catch_panic::CatchPanicLayer, cors::CorsLayer, trace::TraceLayer};
use utoipa_swagger_ui::SwaggerUi;

use datapulse_analytics::AnalyticsPlugin;
use datapulse_auth::{AuthPlugin, JwtConfig};
use datapulse_core::plugin::PluginManager;
use datapulse_dashboards::DashboardsPlugin;
use datapulse_datasources::DatasourcesPlugin;

#[derive(Args)]
pub struct ServeCommand {
    /// Address to bind the server to
    #[arg(long, default_value = "127.0.0.1:3000", env = "DATAPULSE_ADDRESS")]
    pub address: String,

    /// Database connection URL
    #[arg(long, env = "DATAPULSE_DATABASE_URL")]
    pub database_url: String,

    /// Secret used to sign and verify bearer tokens
    #[arg(long, env = "DATAPULSE_JWT_SECRET")]
    pub jwt_secret: String,
}

impl ServeCommand {
    pub fn execute(self) -> anyhow::Result<()> {
        let rt = tokio::runtime::Runtime::new()?;
        rt.block_on(self.run())
    }

    async fn run(self) -> anyhow::Result<()> {
        debug!("Initializing database connection...");
        let db = datapulse_database::establish_connection(&self.database_url).await?;

        let mut plugin_manager = PluginManager::new();

        // Core services the plugins depend on
        let service_context = plugin_manager.service_context();
        service_context.register_service(db.clone());
        service_context.register_service(Arc::new(JwtConfig {
            secret: self.jwt_secret.clone(),
        }));

        // Registration order matters: AuthPlugin provides the services the
        // resource plugins consume
        debug!("Registering AuthPlugin");
        plugin_manager.register_plugin(Box::new(AuthPlugin::new()));

        debug!("Registering AnalyticsPlugin");
        plugin_manager.register_plugin(Box::new(AnalyticsPlugin::new()));

        debug!("Registering DashboardsPlugin");
        plugin_manager.register_plugin(Box::new(DashboardsPlugin::new()));

        debug!("Registering DatasourcesPlugin");
        plugin_manager.register_plugin(Box::new(DatasourcesPlugin::new()));

        debug!("Initializing plugins");
        plugin_manager
            .initialize_plugins()
            .await
            .map_err(|e| anyhow::anyhow!("Plugin initialization failed: {}", e))?;
        debug!("All plugins initialized successfully");

        let app = plugin_manager
            .build_application()
            .map_err(|e| anyhow::anyhow!("Failed to build application: {}", e))?
            .merge(create_swagger_router(&plugin_manager)?)
            .route("/api/health", get(health))
            .layer(CorsLayer::permissive())
            .layer(TraceLayer::new_for_http())
            .layer(CatchPanicLayer::new());

        let listener = TcpListener::bind(&self.address).await?;
        info!("DataPulse API server listening on {}", self.address);

        axum::serve(listener, app).await?;
        info!("DataPulse API server exited");
        Ok(())
    }
}

fn create_swagger_router(plugin_manager: &PluginManager) -> anyhow::Result<Router> {
    let api_doc = plugin_manager
        .get_unified_openapi()
        .map_err(|e| anyhow::anyhow!("Failed to build unified OpenAPI schema: {}", e))?;

    Ok(Router::new().merge(SwaggerUi::new("/swagger-ui").url("/api-docs/openapi.json", api_doc)))
}

async fn health() -> Json<serde_json::Value> {
    Json(serde_json::json!({
        "status": "ok",
        "timestamp": chrono::Utc::now().to_rfc3339(),
        "version": env!("CARGO_PKG_VERSION"),
    }))
}
