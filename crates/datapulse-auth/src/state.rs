//! Shared state for authentication handlers and middleware

use std::sync::Arc;

use crate::auth_service::AuthService;
use crate::token_service::TokenService;

/// JWT signing configuration, registered by the host application before
/// plugin initialization.
pub struct JwtConfig {
    pub secret: String,
}

pub struct AuthState {
    pub auth_service: Arc<AuthService>,
    pub token_service: Arc<TokenService>,
}

impl AuthState {
    pub fn new(auth_service: Arc<AuthService>, token_service: Arc<TokenService>) -> Self {
        Self {
            auth_service,
            token_service,
        }
    }
}
