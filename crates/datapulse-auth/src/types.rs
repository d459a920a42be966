//! Request and response types for authentication endpoints

use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::validation::{validate_company, validate_email, validate_name, validate_password};

#[derive(Debug, Clone, Deserialize, ToSchema)]
pub struct RegisterRequest {
    #[schema(example = "ada@example.com")]
    pub email: String,
    #[schema(example = "correct-horse-battery")]
    pub password: String,
    #[schema(example = "Ada Lovelace")]
    pub name: String,
    /// Organization name. Defaults to "<name>'s Organization" when omitted.
    #[schema(example = "Analytical Engines Ltd")]
    pub company: Option<String>,
}

impl RegisterRequest {
    pub fn validate(&self) -> Vec<String> {
        let mut errors = Vec::new();
        validate_email(&self.email, &mut errors);
        validate_password(&self.password, &mut errors);
        validate_name(&self.name, "name", &mut errors);
        if let Some(company) = &self.company {
            validate_company(company, &mut errors);
        }
        errors
    }
}

#[derive(Debug, Clone, Deserialize, ToSchema)]
pub struct LoginRequest {
    #[schema(example = "ada@example.com")]
    pub email: String,
    pub password: String,
}

impl LoginRequest {
    pub fn validate(&self) -> Vec<String> {
        let mut errors = Vec::new();
        validate_email(&self.email, &mut errors);
        if self.password.is_empty() {
            errors.push("password is required".to_string());
        }
        errors
    }
}

#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct UserResponse {
    pub id: i32,
    pub email: String,
    pub name: String,
    pub company: Option<String>,
    pub role: String,
    pub org_id: i32,
    pub org_name: String,
    /// Billing plan of the user's organization
    pub plan: String,
    /// The user's role within the organization
    pub member_role: String,
}

#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct AuthTokenResponse {
    /// Bearer token for subsequent API calls
    pub token: String,
    pub user: UserResponse,
}
