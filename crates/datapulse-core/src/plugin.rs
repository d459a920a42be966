//! Plugin system for modular service registration and route configuration
//!
//! This module provides a trait-based plugin system that enables:
//! - Type-safe service dependency injection
//! - Automatic route registration and OpenAPI aggregation
//! - Clear dependency management with fail-fast error handling

use std::any::{Any, TypeId};
use std::collections::HashMap;
use std::future::Future;
use std::pin::Pin;
use std::sync::{Arc, Mutex};

use axum::extract::Request;
use axum::response::Response;
use axum::{middleware::Next, Router};
use thiserror::Error;
use tracing::debug;
use utoipa::openapi::security::SecurityScheme;
use utoipa::openapi::{ComponentsBuilder, OpenApi};

// Re-export for plugin implementations
pub use axum;
pub use utoipa;

/// Middleware execution priority
/// Lower numbers execute first, higher numbers execute later
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum MiddlewarePriority {
    /// Security middleware (authentication, authorization) - executes first
    Security,
    /// Logging and metrics middleware
    Observability,
    /// Business logic middleware
    Business,
    /// Custom middleware with explicit priority
    Custom(u16),
}

impl MiddlewarePriority {
    pub fn value(&self) -> u16 {
        match self {
            MiddlewarePriority::Security => 0,
            MiddlewarePriority::Observability => 100,
            MiddlewarePriority::Business => 400,
            MiddlewarePriority::Custom(value) => *value,
        }
    }
}

/// Type alias for middleware handler function
pub type MiddlewareHandler = Arc<
    dyn Fn(
            Request,
            Next,
        )
            -> Pin<Box<dyn Future<Output = Result<Response, axum::http::StatusCode>> + Send>>
        + Send
        + Sync,
>;

/// Plugin middleware definition
pub struct PluginMiddleware {
    /// Unique name for this middleware
    pub name: String,
    /// Plugin that provides this middleware
    pub plugin_name: String,
    /// Execution priority
    pub priority: MiddlewarePriority,
    /// The actual middleware function
    pub handler: MiddlewareHandler,
}

impl std::fmt::Debug for PluginMiddleware {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PluginMiddleware")
            .field("name", &self.name)
            .field("plugin_name", &self.plugin_name)
            .field("priority", &self.priority)
            .field("handler", &"<function>")
            .finish()
    }
}

/// Collection of middleware from a plugin
#[derive(Default)]
pub struct PluginMiddlewareCollection {
    pub middleware: Vec<PluginMiddleware>,
}

impl PluginMiddlewareCollection {
    pub fn new() -> Self {
        Self {
            middleware: Vec::new(),
        }
    }

    pub fn add_middleware<F, Fut>(
        &mut self,
        name: impl Into<String>,
        plugin_name: impl Into<String>,
        priority: MiddlewarePriority,
        handler: F,
    ) where
        F: Fn(Request, Next) -> Fut + Send + Sync + 'static,
        Fut: Future<Output = Result<Response, axum::http::StatusCode>> + Send + 'static,
    {
        self.middleware.push(PluginMiddleware {
            name: name.into(),
            plugin_name: plugin_name.into(),
            priority,
            handler: Arc::new(move |req, next| Box::pin(handler(req, next))),
        });
    }

    /// Add authentication middleware
    pub fn add_auth_middleware<F, Fut>(
        &mut self,
        name: impl Into<String>,
        plugin_name: impl Into<String>,
        handler: F,
    ) where
        F: Fn(Request, Next) -> Fut + Send + Sync + 'static,
        Fut: Future<Output = Result<Response, axum::http::StatusCode>> + Send + 'static,
    {
        self.add_middleware(name, plugin_name, MiddlewarePriority::Security, handler);
    }
}

/// Errors that can occur during plugin operations
#[derive(Error, Debug)]
pub enum PluginError {
    #[error("Plugin registration failed for '{plugin_name}': {error}")]
    PluginRegistrationFailed { plugin_name: String, error: String },

    #[error("Service '{service_type}' is required but not registered")]
    ServiceNotFound { service_type: String },

    #[error("Failed to initialize plugin system: {0}")]
    InitializationFailed(String),

    #[error("OpenAPI schema merge failed: {0}")]
    OpenApiMergeFailed(String),
}

/// Core plugin trait that defines the plugin interface
pub trait DatapulsePlugin: Send + Sync {
    /// Unique identifier for this plugin
    fn name(&self) -> &'static str;

    /// Register services that this plugin provides
    ///
    /// Use `context.require_service::<T>()` to get dependencies.
    /// Use `context.register_service(service)` to provide services for other plugins.
    fn register_services<'a>(
        &'a self,
        context: &'a ServiceRegistrationContext,
    ) -> Pin<Box<dyn Future<Output = Result<(), PluginError>> + Send + 'a>>;

    /// Configure HTTP routes for this plugin
    ///
    /// Return None if this plugin doesn't provide HTTP endpoints.
    fn configure_routes(&self, _context: &PluginContext) -> Option<PluginRoutes> {
        None
    }

    /// Provide OpenAPI schema for this plugin's endpoints
    ///
    /// Return None if this plugin doesn't have API documentation.
    fn openapi_schema(&self) -> Option<OpenApi> {
        None
    }

    /// Configure middleware for this plugin
    ///
    /// Return None if this plugin doesn't provide middleware.
    fn configure_middleware(&self, _context: &PluginContext) -> Option<PluginMiddlewareCollection> {
        None
    }
}

/// Route configuration returned by plugins
pub struct PluginRoutes {
    /// The actual router with handlers
    pub router: Router,
}

impl PluginRoutes {
    /// Create plugin routes with no path prefix
    pub fn new(router: Router) -> Self {
        Self { router }
    }
}

/// Type-safe service registry for dependency injection
pub struct ServiceRegistry {
    services: Mutex<HashMap<TypeId, Box<dyn Any + Send + Sync>>>,
}

impl Default for ServiceRegistry {
    fn default() -> Self {
        Self::new()
    }
}

impl ServiceRegistry {
    /// Create a new service registry
    pub fn new() -> Self {
        Self {
            services: Mutex::new(HashMap::new()),
        }
    }

    /// Register a service for other plugins to use
    pub fn register<T: Send + Sync + 'static + ?Sized>(&self, service: Arc<T>) {
        debug!("Registering service: {}", std::any::type_name::<T>());
        self.services
            .lock()
            .unwrap()
            .insert(TypeId::of::<T>(), Box::new(service));
    }

    /// Get a service if it's registered
    pub fn get<T: Send + Sync + 'static + ?Sized>(&self) -> Option<Arc<T>> {
        self.services
            .lock()
            .unwrap()
            .get(&TypeId::of::<T>())
            .and_then(|any| any.downcast_ref::<Arc<T>>())
            .cloned()
    }

    /// Require a service - panics with helpful error if not available
    pub fn require<T: Send + Sync + 'static + ?Sized>(&self) -> Arc<T> {
        self.get::<T>().unwrap_or_else(|| {
            panic!(
                "Service '{}' is required but not registered. \
                 Make sure the plugin providing this service is registered before plugins that depend on it.",
                std::any::type_name::<T>()
            )
        })
    }
}

/// Read-only context provided to plugins for service access
pub struct PluginContext {
    service_registry: Arc<ServiceRegistry>,
}

impl PluginContext {
    pub fn new(registry: Arc<ServiceRegistry>) -> Self {
        Self {
            service_registry: registry,
        }
    }

    /// Get a service if it's available (for optional dependencies)
    pub fn get_service<T: Send + Sync + 'static + ?Sized>(&self) -> Option<Arc<T>> {
        self.service_registry.get::<T>()
    }

    /// Require a service - panics with clear error if not available
    pub fn require_service<T: Send + Sync + 'static + ?Sized>(&self) -> Arc<T> {
        self.service_registry.require::<T>()
    }
}

/// Special context for service registration that allows mutable access
pub struct ServiceRegistrationContext {
    service_registry: Arc<ServiceRegistry>,
}

impl Default for ServiceRegistrationContext {
    fn default() -> Self {
        Self::new()
    }
}

impl ServiceRegistrationContext {
    pub fn new() -> Self {
        Self {
            service_registry: Arc::new(ServiceRegistry::new()),
        }
    }

    /// Register a service for other plugins to use
    pub fn register_service<T: Send + Sync + 'static + ?Sized>(&self, service: Arc<T>) {
        self.service_registry.register(service);
    }

    /// Get a service if it's available (for dependencies)
    pub fn get_service<T: Send + Sync + 'static + ?Sized>(&self) -> Option<Arc<T>> {
        self.service_registry.get::<T>()
    }

    /// Require a service - panics with clear error if not available
    pub fn require_service<T: Send + Sync + 'static + ?Sized>(&self) -> Arc<T> {
        self.service_registry.require::<T>()
    }

    /// Create a read-only context for plugin operations
    pub fn create_plugin_context(&self) -> PluginContext {
        PluginContext::new(self.service_registry.clone())
    }
}

/// Main plugin manager that handles plugin registration, initialization, and
/// application building
pub struct PluginManager {
    plugins: Vec<Box<dyn DatapulsePlugin>>,
    context: ServiceRegistrationContext,
}

impl Default for PluginManager {
    fn default() -> Self {
        Self::new()
    }
}

impl PluginManager {
    /// Create a new plugin manager
    pub fn new() -> Self {
        Self {
            plugins: Vec::new(),
            context: ServiceRegistrationContext::new(),
        }
    }

    /// Register a plugin (order matters for dependencies)
    pub fn register_plugin(&mut self, plugin: Box<dyn DatapulsePlugin>) {
        debug!("Registering plugin: {}", plugin.name());
        self.plugins.push(plugin);
    }

    /// Initialize all plugins in registration order
    pub async fn initialize_plugins(&mut self) -> Result<(), PluginError> {
        debug!("Initializing {} plugins", self.plugins.len());

        for plugin in &self.plugins {
            debug!("Initializing plugin: {}", plugin.name());

            plugin.register_services(&self.context).await.map_err(|e| {
                PluginError::PluginRegistrationFailed {
                    plugin_name: plugin.name().to_string(),
                    error: e.to_string(),
                }
            })?;

            debug!("Successfully initialized plugin: {}", plugin.name());
        }

        Ok(())
    }

    /// Build the complete application with routes, middleware, and OpenAPI
    pub fn build_application(&self) -> Result<Router, PluginError> {
        debug!("Building application with {} plugins", self.plugins.len());

        let plugin_context = self.context.create_plugin_context();
        let mut api_router = Router::new();

        // Collect routes from all plugins
        for plugin in &self.plugins {
            if let Some(plugin_routes) = plugin.configure_routes(&plugin_context) {
                debug!("Adding routes for plugin: {}", plugin.name());
                api_router = api_router.merge(plugin_routes.router);
            }
        }

        // Collect and apply middleware from all plugins
        let middleware = self.collect_middleware(&plugin_context);
        api_router = Self::apply_middleware_to_router(api_router, middleware);

        Ok(Router::new().nest("/api", api_router))
    }

    /// Get the unified OpenAPI schema from all plugins
    pub fn get_unified_openapi(&self) -> Result<OpenApi, PluginError> {
        self.build_unified_openapi()
    }

    /// Build unified OpenAPI schema from all plugins
    fn build_unified_openapi(&self) -> Result<OpenApi, PluginError> {
        use utoipa::openapi::*;

        let mut combined_openapi = OpenApiBuilder::new()
            .info(
                InfoBuilder::new()
                    .title("DataPulse")
                    .description(Some(
                        "Multi-tenant analytics API for event ingestion, aggregation queries, and insights",
                    ))
                    .version("1.0.0")
                    .build(),
            )
            .servers(Some(vec![ServerBuilder::new()
                .url("/api")
                .description(Some("Base path for all API endpoints"))
                .build()]))
            .components(Some(
                ComponentsBuilder::new()
                    .security_scheme("bearer_auth", self.create_bearer_auth_scheme())
                    .build(),
            ))
            .build();

        // Merge OpenAPI schemas from all plugins
        for plugin in &self.plugins {
            if let Some(plugin_openapi) = plugin.openapi_schema() {
                debug!("Merging OpenAPI schema for plugin: {}", plugin.name());
                combined_openapi = Self::merge_openapi_schemas(combined_openapi, plugin_openapi)?;
            }
        }

        Ok(combined_openapi)
    }

    /// Merge two OpenAPI schemas
    fn merge_openapi_schemas(
        mut base: OpenApi,
        plugin_schema: OpenApi,
    ) -> Result<OpenApi, PluginError> {
        for (path, path_item) in plugin_schema.paths.paths {
            base.paths.paths.insert(path, path_item);
        }

        if let Some(plugin_components) = plugin_schema.components {
            let base_components = base
                .components
                .get_or_insert_with(|| ComponentsBuilder::new().build());

            for (name, schema) in plugin_components.schemas {
                base_components.schemas.insert(name, schema);
            }

            for (name, response) in plugin_components.responses {
                base_components.responses.insert(name, response);
            }
        }

        if let Some(plugin_tags) = plugin_schema.tags {
            let base_tags = base.tags.get_or_insert_with(Vec::new);
            base_tags.extend(plugin_tags);
        }

        Ok(base)
    }

    /// Create bearer authentication scheme for OpenAPI
    fn create_bearer_auth_scheme(&self) -> SecurityScheme {
        use utoipa::openapi::security::*;

        let mut http_scheme = Http::new(HttpAuthScheme::Bearer);
        http_scheme.description = Some(
            "Bearer token authentication. Use format: `Bearer <your-token>`. \
             Tokens are issued by the /auth/login and /auth/register endpoints."
                .to_string(),
        );

        SecurityScheme::Http(http_scheme)
    }

    /// Get access to the service registration context for manual service registration
    /// This is typically used before plugin initialization to register core services
    pub fn service_context(&self) -> &ServiceRegistrationContext {
        &self.context
    }

    /// Collect middleware from all plugins, ordered by priority
    fn collect_middleware(&self, plugin_context: &PluginContext) -> Vec<PluginMiddleware> {
        let mut all_middleware = Vec::new();

        for plugin in &self.plugins {
            if let Some(middleware_collection) = plugin.configure_middleware(plugin_context) {
                debug!("Collecting middleware from plugin: {}", plugin.name());
                all_middleware.extend(middleware_collection.middleware);
            }
        }

        // Lower priority values execute first
        all_middleware.sort_by_key(|mw| mw.priority.value());

        all_middleware
    }

    /// Apply collected middleware to a router
    fn apply_middleware_to_router(
        mut router: Router,
        middleware: Vec<PluginMiddleware>,
    ) -> Router {
        for mw in middleware {
            debug!(
                "Applying middleware: {} from plugin: {}",
                mw.name, mw.plugin_name
            );

            let handler = mw.handler.clone();
            router = router.layer(axum::middleware::from_fn(
                move |req: Request, next: Next| {
                    let handler = handler.clone();
                    async move { handler(req, next).await }
                },
            ));
        }

        router
    }
}
