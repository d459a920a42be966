//! Test utilities for database integration tests
//!
//! Provides a shared PostgreSQL container for integration testing across
//! all datapulse crates.

use crate::DbConnection;
use datapulse_migrations::Migrator;
use sea_orm::*;
use sea_orm_migration::MigratorTrait;
use std::sync::Arc;
use testcontainers::{runners::AsyncRunner, ContainerAsync, GenericImage, ImageExt};
use tokio::sync::{Mutex, OnceCell};

/// Shared test database container that lives for the duration of the test run
static TEST_CONTAINER: OnceCell<Arc<Mutex<SharedContainer>>> = OnceCell::const_new();

/// Global migration lock so only one test runs migrations at a time
static MIGRATION_LOCK: OnceCell<Arc<Mutex<()>>> = OnceCell::const_new();

/// Shared container wrapper that holds the database container and connection details
struct SharedContainer {
    #[allow(dead_code)]
    container: ContainerAsync<GenericImage>,
    database_url: String,
}

impl SharedContainer {
    async fn new() -> anyhow::Result<Self> {
        let db_name = "test_db";
        let username = "test_user";
        let password = "test_password";

        let postgres_container = GenericImage::new("postgres", "17-alpine")
            .with_env_var("POSTGRES_DB", db_name)
            .with_env_var("POSTGRES_USER", username)
            .with_env_var("POSTGRES_PASSWORD", password)
            .with_env_var("POSTGRES_HOST_AUTH_METHOD", "trust")
            .start()
            .await?;

        let port = postgres_container.get_host_port_ipv4(5432).await?;
        let database_url = format!(
            "postgresql://{}:{}@localhost:{}/{}",
            username, password, port, db_name
        );

        // Wait for the database to be ready
        tokio::time::sleep(tokio::time::Duration::from_secs(3)).await;

        Ok(Self {
            container: postgres_container,
            database_url,
        })
    }
}

/// Test database backed by a shared PostgreSQL container
pub struct TestDatabase {
    pub db: Arc<DbConnection>,
    pub database_url: String,
}

impl TestDatabase {
    async fn get_or_create_container() -> anyhow::Result<Arc<Mutex<SharedContainer>>> {
        TEST_CONTAINER
            .get_or_try_init(|| async {
                let container = SharedContainer::new().await?;
                Ok(Arc::new(Mutex::new(container)))
            })
            .await
            .map(Arc::clone)
    }

    /// Create a new test database handle (uses the shared container)
    ///
    /// Cleans up all tables afterwards to ensure test isolation.
    pub async fn new() -> anyhow::Result<Self> {
        let container = Self::get_or_create_container().await?;
        let container_lock = container.lock().await;
        let database_url = container_lock.database_url.clone();
        drop(container_lock);

        let db = Self::connect_with_retry(&database_url, 20).await?;

        let test_db = TestDatabase {
            db: Arc::new(db),
            database_url,
        };

        test_db
            .test_connection()
            .await
            .map_err(|e| anyhow::anyhow!("Initial connection test failed: {}", e))?;

        // Ignore errors if no tables exist yet
        test_db.cleanup_all_tables().await.ok();

        Ok(test_db)
    }

    /// Create a test database and run migrations
    ///
    /// Migrations are run only once per shared container - subsequent calls
    /// skip migration if the schema already exists.
    pub async fn with_migrations() -> anyhow::Result<Self> {
        let test_db = Self::new().await?;

        let migrations_table_exists = test_db.migrations_table_exists().await?;

        if !migrations_table_exists {
            let migration_lock = MIGRATION_LOCK
                .get_or_init(|| async { Arc::new(Mutex::new(())) })
                .await;
            let _lock = migration_lock.lock().await;

            // Double-check migrations weren't run by another test while we
            // waited for the lock
            if !test_db.migrations_table_exists().await? {
                Migrator::up(&*test_db.db, None)
                    .await
                    .map_err(|e| anyhow::anyhow!("Failed to run migrations: {}", e))?;
            }
        }

        // Clean tables but preserve schema
        test_db.cleanup_all_tables().await.ok();

        Ok(test_db)
    }

    async fn migrations_table_exists(&self) -> anyhow::Result<bool> {
        let result = self
            .query_sql(
                "SELECT EXISTS (
                    SELECT FROM information_schema.tables
                    WHERE table_schema = 'public'
                    AND table_name = 'seaql_migrations'
                )",
            )
            .await?;

        Ok(result
            .first()
            .and_then(|row| row.try_get::<bool>("", "exists").ok())
            .unwrap_or(false))
    }

    /// Connect to database with retry logic
    async fn connect_with_retry(
        database_url: &str,
        max_retries: u32,
    ) -> anyhow::Result<DbConnection> {
        use std::time::Duration;

        let mut retries = max_retries;

        let mut opt = ConnectOptions::new(database_url.to_owned());
        opt.max_connections(5)
            .min_connections(1)
            .connect_timeout(Duration::from_secs(10))
            .acquire_timeout(Duration::from_secs(10))
            .idle_timeout(Duration::from_secs(10))
            .max_lifetime(Duration::from_secs(60))
            .sqlx_logging(false);

        loop {
            match Database::connect(opt.clone()).await {
                Ok(db) => {
                    let test = Statement::from_string(
                        DatabaseBackend::Postgres,
                        "SELECT 1".to_owned(),
                    );

                    match db.execute(test).await {
                        Ok(_) => return Ok(db),
                        Err(e) if retries > 0 => {
                            eprintln!(
                                "Database connected but test query failed (retries left: {}): {}",
                                retries, e
                            );
                        }
                        Err(e) => {
                            return Err(anyhow::anyhow!(
                                "Database connected but not responsive: {}",
                                e
                            ));
                        }
                    }
                }
                Err(e) if retries > 0 => {
                    eprintln!(
                        "Failed to connect to database (retries left: {}): {}",
                        retries, e
                    );
                }
                Err(e) => {
                    return Err(anyhow::anyhow!("Failed to connect to database: {}", e));
                }
            }

            if retries > 0 {
                retries -= 1;
                tokio::time::sleep(Duration::from_secs(1)).await;
            } else {
                return Err(anyhow::anyhow!(
                    "Failed to connect to database after {} retries",
                    max_retries
                ));
            }
        }
    }

    /// Execute raw SQL for testing
    pub async fn execute_sql(&self, sql: &str) -> anyhow::Result<ExecResult> {
        let statement = Statement::from_string(DatabaseBackend::Postgres, sql.to_owned());
        let result = self
            .db
            .execute(statement)
            .await
            .map_err(anyhow::Error::from)?;
        Ok(result)
    }

    /// Query raw SQL and return results
    pub async fn query_sql(&self, sql: &str) -> anyhow::Result<Vec<QueryResult>> {
        let statement = Statement::from_string(DatabaseBackend::Postgres, sql.to_owned());
        let result = self
            .db
            .query_all(statement)
            .await
            .map_err(anyhow::Error::from)?;
        Ok(result)
    }

    /// Truncate all tables except migration bookkeeping tables
    pub async fn cleanup_all_tables(&self) -> anyhow::Result<()> {
        let tables = self
            .query_sql(
                "SELECT tablename FROM pg_tables
             WHERE schemaname = 'public'
             AND tablename NOT IN ('seaql_migrations', '_sqlx_migrations')
             ORDER BY tablename DESC",
            )
            .await?;

        for table in tables {
            if let Ok(table_name) = table.try_get::<String>("", "tablename") {
                let sql = format!("TRUNCATE TABLE {} RESTART IDENTITY CASCADE", table_name);
                self.execute_sql(&sql).await?;
            }
        }

        Ok(())
    }

    /// Test database connectivity
    pub async fn test_connection(&self) -> anyhow::Result<()> {
        let statement = Statement::from_string(DatabaseBackend::Postgres, "SELECT 1".to_owned());
        let result = self.db.query_one(statement).await?;

        if result.is_none() {
            return Err(anyhow::anyhow!("Connection test failed"));
        }

        Ok(())
    }

    /// Get the database connection
    pub fn connection(&self) -> &DbConnection {
        &self.db
    }

    /// Get the database connection as Arc
    pub fn connection_arc(&self) -> Arc<DbConnection> {
        Arc::clone(&self.db)
    }
}
