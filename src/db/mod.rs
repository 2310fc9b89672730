use anyhow::Result;
use sea_orm::{ConnectOptions, ConnectionTrait, Database, DatabaseConnection, Statement};
use std::path::Path;
use std::time::Duration;
use tracing::info;

pub mod migrator;
pub mod repositories;
pub mod username;

pub use repositories::stats::EntityCounts;
pub use repositories::student::NewStudent;
pub use repositories::user::User;

#[derive(Clone)]
pub struct Store {
    pub conn: DatabaseConnection,
}

impl Store {
    /// Open a connection without touching the schema. Admin commands must be
    /// able to inspect a database that has not been migrated yet.
    pub async fn connect(db_url: &str) -> Result<Self> {
        Self::with_pool_options(db_url, 5, 1, false).await
    }

    /// Open a connection using the configured URL and pool sizes.
    pub async fn from_config(config: &crate::config::Config) -> Result<Self> {
        let url = config.database.url()?;
        Self::with_pool_options(
            &url,
            config.general.max_db_connections,
            config.general.min_db_connections,
            false,
        )
        .await
    }

    /// Open a connection and bring the schema up to date.
    pub async fn connect_and_migrate(db_url: &str) -> Result<Self> {
        Self::with_pool_options(db_url, 5, 1, true).await
    }

    pub async fn with_pool_options(
        db_url: &str,
        max_connections: u32,
        min_connections: u32,
        migrate: bool,
    ) -> Result<Self> {
        if let Some(path_str) = db_url.strip_prefix("sqlite:")
            && !path_str.contains(":memory:")
        {
            if let Some(parent) = Path::new(path_str).parent() {
                tokio::fs::create_dir_all(parent).await.ok();
            }
            if !Path::new(path_str).exists() {
                std::fs::File::create(path_str)?;
            }
        }

        let mut opt = ConnectOptions::new(db_url.to_string());
        opt.max_connections(max_connections)
            .min_connections(min_connections)
            .connect_timeout(Duration::from_secs(10))
            .acquire_timeout(Duration::from_secs(10))
            .idle_timeout(Duration::from_secs(300))
            .max_lifetime(Duration::from_secs(600))
            .sqlx_logging(false);

        let conn = Database::connect(opt).await?;

        let store = Self { conn };

        if migrate {
            store.migrate().await?;
            info!(
                "Database connected & migrations applied (pool: {}-{})",
                min_connections, max_connections
            );
        }

        Ok(store)
    }

    /// Apply all pending migrations.
    pub async fn migrate(&self) -> Result<()> {
        use sea_orm_migration::MigratorTrait;

        migrator::Migrator::up(&self.conn, None).await?;
        Ok(())
    }

    pub async fn ping(&self) -> Result<()> {
        let backend = self.conn.get_database_backend();
        self.conn
            .query_one(Statement::from_string(backend, "SELECT 1".to_string()))
            .await?;
        Ok(())
    }

    #[must_use]
    pub fn user_repo(&self) -> repositories::user::UserRepository {
        repositories::user::UserRepository::new(self.conn.clone())
    }

    #[must_use]
    pub fn student_repo(&self) -> repositories::student::StudentRepository {
        repositories::student::StudentRepository::new(self.conn.clone())
    }

    #[must_use]
    pub fn stats_repo(&self) -> repositories::stats::StatsRepository {
        repositories::stats::StatsRepository::new(self.conn.clone())
    }

    pub async fn list_users(&self) -> Result<Vec<User>> {
        self.user_repo().list().await
    }

    pub async fn get_user_by_email(&self, email: &str) -> Result<Option<User>> {
        self.user_repo().get_by_email(email).await
    }

    pub async fn get_user_by_username(&self, username: &str) -> Result<Option<User>> {
        self.user_repo().get_by_username(username).await
    }

    pub async fn set_username(&self, id: i32, username: &str) -> Result<()> {
        self.user_repo().set_username(id, username).await
    }

    pub async fn users_missing_username(&self) -> Result<Vec<User>> {
        self.user_repo().missing_username().await
    }

    pub async fn missing_username_count(&self) -> Result<u64> {
        self.user_repo().missing_username_count().await
    }

    pub async fn taken_usernames(&self) -> Result<Vec<String>> {
        self.user_repo().taken_usernames().await
    }

    pub async fn duplicate_usernames(&self) -> Result<Vec<(String, i64)>> {
        self.user_repo().duplicate_usernames().await
    }

    pub async fn add_student(&self, student: &NewStudent) -> Result<i32> {
        self.student_repo().add(student).await
    }

    pub async fn get_student(&self, id: i32) -> Result<Option<crate::entities::students::Model>> {
        self.student_repo().get(id).await
    }

    pub async fn list_students(&self) -> Result<Vec<crate::entities::students::Model>> {
        self.student_repo().list().await
    }

    pub async fn count_students(&self) -> Result<u64> {
        self.student_repo().count().await
    }

    pub async fn entity_counts(&self) -> Result<EntityCounts> {
        self.stats_repo().counts().await
    }
}
