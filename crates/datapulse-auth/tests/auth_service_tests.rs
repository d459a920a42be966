//! Integration tests for registration and login against a real database

use datapulse_auth::auth_service::{AuthError, AuthService};
use datapulse_database::test_utils::TestDatabase;
use sea_orm::{ColumnTrait, EntityTrait, QueryFilter};

#[tokio::test]
async fn test_register_bootstraps_org_membership_and_dashboard() -> anyhow::Result<()> {
    let test_db = TestDatabase::with_migrations().await?;
    let service = AuthService::new(test_db.connection_arc());

    let result = service
        .register("Ada@Example.com", "correct-horse-battery", "Ada", None)
        .await?;

    // Email is stored lowercased
    assert_eq!(result.user.email, "ada@example.com");
    assert_eq!(result.user.role, "admin");
    assert_eq!(result.member_role, "owner");
    assert_eq!(result.org.name, "Ada's Organization");
    assert_eq!(result.org.plan, "starter");
    assert_eq!(result.user.company, None);

    // Owner membership exists
    let membership = datapulse_entities::org_members::Entity::find()
        .filter(datapulse_entities::org_members::Column::UserId.eq(result.user.id))
        .one(test_db.connection())
        .await?
        .expect("membership should exist");
    assert_eq!(membership.org_id, result.org.id);

    // Starter dashboard was created in the same transaction
    let dashboards = datapulse_entities::dashboards::Entity::find()
        .filter(datapulse_entities::dashboards::Column::OrgId.eq(result.org.id))
        .all(test_db.connection())
        .await?;
    assert_eq!(dashboards.len(), 1);
    assert_eq!(dashboards[0].name, "My First Dashboard");
    assert_eq!(dashboards[0].created_by, result.user.id);

    Ok(())
}

#[tokio::test]
async fn test_register_uses_company_as_org_name() -> anyhow::Result<()> {
    let test_db = TestDatabase::with_migrations().await?;
    let service = AuthService::new(test_db.connection_arc());

    let result = service
        .register(
            "grace@example.com",
            "correct-horse-battery",
            "Grace",
            Some("Compilers Inc"),
        )
        .await?;

    assert_eq!(result.org.name, "Compilers Inc");
    assert_eq!(result.user.company.as_deref(), Some("Compilers Inc"));
    Ok(())
}

#[tokio::test]
async fn test_profile_carries_company_plan_and_member_role() -> anyhow::Result<()> {
    let test_db = TestDatabase::with_migrations().await?;
    let service = AuthService::new(test_db.connection_arc());

    let registered = service
        .register(
            "lin@example.com",
            "correct-horse-battery",
            "Lin",
            Some("Looms Ltd"),
        )
        .await?;

    let profile = service.get_profile(registered.user.id).await?;
    assert_eq!(profile.user.company.as_deref(), Some("Looms Ltd"));
    assert_eq!(profile.org.plan, "starter");
    assert_eq!(profile.member_role, "owner");

    Ok(())
}

#[tokio::test]
async fn test_register_rejects_duplicate_email() -> anyhow::Result<()> {
    let test_db = TestDatabase::with_migrations().await?;
    let service = AuthService::new(test_db.connection_arc());

    service
        .register("dup@example.com", "correct-horse-battery", "First", None)
        .await?;

    let err = service
        .register("DUP@example.com", "another-password-8", "Second", None)
        .await
        .expect_err("duplicate email should be rejected");

    assert!(matches!(err, AuthError::EmailTaken));
    Ok(())
}

#[tokio::test]
async fn test_login_does_not_reveal_which_accounts_exist() -> anyhow::Result<()> {
    let test_db = TestDatabase::with_migrations().await?;
    let service = AuthService::new(test_db.connection_arc());

    service
        .register("ada@example.com", "correct-horse-battery", "Ada", None)
        .await?;

    // Wrong password and unknown email produce the same error
    let wrong_password = service
        .login("ada@example.com", "not-the-password")
        .await
        .expect_err("wrong password should fail");
    let unknown_email = service
        .login("nobody@example.com", "correct-horse-battery")
        .await
        .expect_err("unknown email should fail");

    assert!(matches!(wrong_password, AuthError::InvalidCredentials));
    assert!(matches!(unknown_email, AuthError::InvalidCredentials));

    // Correct credentials succeed, case-insensitively on email
    let result = service
        .login("ADA@example.com", "correct-horse-battery")
        .await?;
    assert_eq!(result.user.email, "ada@example.com");

    Ok(())
}
