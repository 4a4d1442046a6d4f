use crate::config::DatabaseConfig;
use crate::error::AppResult;
use migration::{Migrator, MigratorTrait};
use sea_orm::{ConnectOptions, ConnectionTrait, Database, DatabaseConnection};
use std::time::Duration;

pub type DbPool = DatabaseConnection;

/// 支持 postgres:// 与 sqlite:// 两种连接串
pub async fn create_pool(config: &DatabaseConfig) -> AppResult<DbPool> {
    let mut options = ConnectOptions::new(config.url.clone());
    options
        .max_connections(config.max_connections)
        .acquire_timeout(Duration::from_secs(10))
        .sqlx_logging(false);

    let pool = Database::connect(options).await?;
    log::info!("Connected to {:?} database", pool.get_database_backend());

    Ok(pool)
}

/// 启动时建表，已执行的迁移会被跳过
pub async fn run_migrations(pool: &DbPool) -> AppResult<()> {
    Migrator::up(pool, None).await?;
    log::info!("Database migrations are up to date");
    Ok(())
}
