//! Auth plugin for the DataPulse plugin system
//!
//! Registers the AuthService and TokenService, exposes the authentication
//! routes and installs the bearer token middleware that runs ahead of every
//! other plugin's routes.

use std::future::Future;
use std::pin::Pin;
use std::sync::Arc;

use datapulse_core::plugin::{
    DatapulsePlugin, PluginContext, PluginError, PluginMiddlewareCollection, PluginRoutes,
    ServiceRegistrationContext,
};
use utoipa::openapi::OpenApi;
use utoipa::OpenApi as OpenApiTrait;

use crate::{
    auth_service::AuthService, handlers, middleware::auth_middleware, state::AuthState,
    state::JwtConfig, token_service::TokenService,
};

pub struct AuthPlugin;

impl AuthPlugin {
    pub fn new() -> Self {
        Self
    }
}

impl Default for AuthPlugin {
    fn default() -> Self {
        Self::new()
    }
}

impl DatapulsePlugin for AuthPlugin {
    fn name(&self) -> &'static str {
        "auth"
    }

    fn register_services<'a>(
        &'a self,
        context: &'a ServiceRegistrationContext,
    ) -> Pin<Box<dyn Future<Output = Result<(), PluginError>> + Send + 'a>> {
        Box::pin(async move {
            let db = context.require_service::<sea_orm::DatabaseConnection>();
            let jwt_config = context.require_service::<JwtConfig>();

            let auth_service = Arc::new(AuthService::new(db.clone()));
            context.register_service(auth_service.clone());

            let token_service = Arc::new(TokenService::new(&jwt_config.secret));
            context.register_service(token_service.clone());

            let auth_state = Arc::new(AuthState::new(auth_service, token_service));
            context.register_service(auth_state);

            tracing::debug!("Auth plugin services registered");
            Ok(())
        })
    }

    fn configure_routes(&self, context: &PluginContext) -> Option<PluginRoutes> {
        let auth_state = context.require_service::<AuthState>();

        let router = handlers::configure_routes().with_state(auth_state);
        Some(PluginRoutes { router })
    }

    fn openapi_schema(&self) -> Option<OpenApi> {
        Some(<handlers::ApiDoc as OpenApiTrait>::openapi())
    }

    fn configure_middleware(&self, context: &PluginContext) -> Option<PluginMiddlewareCollection> {
        let auth_state = context.require_service::<AuthState>();

        let mut middleware_collection = PluginMiddlewareCollection::new();
        middleware_collection.add_auth_middleware(
            "bearer_token_auth",
            self.name(),
            move |req, next| {
                let auth_state = auth_state.clone();
                auth_middleware(auth_state, req, next)
            },
        );

        Some(middleware_collection)
    }
}
