//! User registration, login and profile lookup

use argon2::{PasswordHasher, PasswordVerifier};
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, QueryFilter, Set,
    TransactionTrait,
};
use std::sync::Arc;
use thiserror::Error;
use tracing::{debug, info, warn};

use datapulse_entities::{dashboards, org_members, organizations, users};

const DEFAULT_DASHBOARD_NAME: &str = "My First Dashboard";
const DEFAULT_DASHBOARD_DESCRIPTION: &str = "Get started by adding widgets to track your KPIs";

#[derive(Error, Debug)]
pub enum AuthError {
    #[error("Database error: {0}")]
    DatabaseError(String),

    #[error("An account with this email already exists")]
    EmailTaken,

    #[error("Invalid email or password")]
    InvalidCredentials,

    #[error("User not found")]
    UserNotFound,

    #[error("User has no organization membership")]
    NoMembership,

    #[error("Password hashing failed")]
    PasswordHashError,
}

impl From<sea_orm::DbErr> for AuthError {
    fn from(error: sea_orm::DbErr) -> Self {
        AuthError::DatabaseError(error.to_string())
    }
}

/// A user together with the organization they belong to
#[derive(Debug)]
pub struct UserWithOrg {
    pub user: users::Model,
    pub org: organizations::Model,
    pub member_role: String,
}

pub struct AuthService {
    db: Arc<DatabaseConnection>,
}

impl AuthService {
    pub fn new(db: Arc<DatabaseConnection>) -> Self {
        Self { db }
    }

    /// Register a new account.
    ///
    /// Creates the organization, the user, the owner membership and a
    /// starter dashboard in a single transaction.
    pub async fn register(
        &self,
        email: &str,
        password: &str,
        name: &str,
        company: Option<&str>,
    ) -> Result<UserWithOrg, AuthError> {
        let email = email.to_lowercase();

        let existing = users::Entity::find()
            .filter(users::Column::Email.eq(&email))
            .one(self.db.as_ref())
            .await?;

        if existing.is_some() {
            warn!("Registration attempt with existing email");
            return Err(AuthError::EmailTaken);
        }

        let password_hash = hash_password(password)?;

        let org_name = match company {
            Some(company) if !company.trim().is_empty() => company.to_string(),
            _ => format!("{}'s Organization", name),
        };

        let txn = self.db.begin().await?;

        let org = organizations::ActiveModel {
            name: Set(org_name),
            ..Default::default()
        }
        .insert(&txn)
        .await?;

        let user = users::ActiveModel {
            email: Set(email),
            name: Set(name.to_string()),
            company: Set(company
                .filter(|c| !c.trim().is_empty())
                .map(String::from)),
            password_hash: Set(password_hash),
            role: Set("admin".to_string()),
            ..Default::default()
        }
        .insert(&txn)
        .await?;

        org_members::ActiveModel {
            org_id: Set(org.id),
            user_id: Set(user.id),
            role: Set("owner".to_string()),
            ..Default::default()
        }
        .insert(&txn)
        .await?;

        dashboards::ActiveModel {
            org_id: Set(org.id),
            name: Set(DEFAULT_DASHBOARD_NAME.to_string()),
            description: Set(Some(DEFAULT_DASHBOARD_DESCRIPTION.to_string())),
            created_by: Set(user.id),
            ..Default::default()
        }
        .insert(&txn)
        .await?;

        txn.commit().await?;

        info!(user_id = user.id, org_id = org.id, "New account registered");

        Ok(UserWithOrg {
            user,
            org,
            member_role: "owner".to_string(),
        })
    }

    /// Verify credentials and return the user with their organization.
    ///
    /// Both unknown email and wrong password map to `InvalidCredentials` so
    /// the response does not reveal which accounts exist.
    pub async fn login(&self, email: &str, password: &str) -> Result<UserWithOrg, AuthError> {
        let email = email.to_lowercase();

        let user = users::Entity::find()
            .filter(users::Column::Email.eq(&email))
            .one(self.db.as_ref())
            .await?
            .ok_or(AuthError::InvalidCredentials)?;

        if !verify_password(password, &user.password_hash) {
            warn!(user_id = user.id, "Invalid password attempt");
            return Err(AuthError::InvalidCredentials);
        }

        debug!(user_id = user.id, "Password verified");

        self.membership_for(user).await
    }

    /// Load the profile for an authenticated user
    pub async fn get_profile(&self, user_id: i32) -> Result<UserWithOrg, AuthError> {
        let user = users::Entity::find_by_id(user_id)
            .one(self.db.as_ref())
            .await?
            .ok_or(AuthError::UserNotFound)?;

        self.membership_for(user).await
    }

    async fn membership_for(&self, user: users::Model) -> Result<UserWithOrg, AuthError> {
        let membership = org_members::Entity::find()
            .filter(org_members::Column::UserId.eq(user.id))
            .one(self.db.as_ref())
            .await?
            .ok_or(AuthError::NoMembership)?;

        let org = organizations::Entity::find_by_id(membership.org_id)
            .one(self.db.as_ref())
            .await?
            .ok_or(AuthError::NoMembership)?;

        Ok(UserWithOrg {
            user,
            org,
            member_role: membership.role,
        })
    }
}

fn hash_password(password: &str) -> Result<String, AuthError> {
    use argon2::password_hash::{rand_core::OsRng, SaltString};

    let argon2 = argon2::Argon2::default();
    let salt = SaltString::generate(&mut OsRng);

    Ok(argon2
        .hash_password(password.as_bytes(), &salt)
        .map_err(|_| AuthError::PasswordHashError)?
        .to_string())
}

fn verify_password(password: &str, password_hash: &str) -> bool {
    let Ok(parsed_hash) = argon2::password_hash::PasswordHash::new(password_hash) else {
        return false;
    };

    argon2::Argon2::default()
        .verify_password(password.as_bytes(), &parsed_hash)
        .is_ok()
}
