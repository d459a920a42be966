//! Authentication and organization membership for DataPulse
//!
//! Provides JWT-based authentication, user registration with organization
//! bootstrap, and the `RequireAuth` extractor used by all protected routes.

pub mod auth_service;
pub mod context;
pub mod handlers;
pub mod middleware;
pub mod plugin;
pub mod state;
pub mod token_service;
pub mod types;
pub mod validation;

pub use auth_service::{AuthError, AuthService};
pub use context::AuthContext;
pub use middleware::{auth_middleware, RequireAuth};
pub use plugin::AuthPlugin;
pub use state::{AuthState, JwtConfig};
pub use token_service::{Claims, TokenService};
