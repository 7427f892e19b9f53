//! SQL storage implementations.
//!
//! The `SqlCrmStore` implementation is shared between PostgreSQL and
//! SQLite, parameterized by database type using the `SqlDatabase` trait.

use std::sync::Arc;

use tracing::info;

use crate::config::StorageConfig;
use crate::interfaces::{CrmStore, StorageError};

pub mod migrate;
pub mod schema;
mod store;

pub use store::SqlCrmStore;

/// Builds backend-specific SQL from sea-query statements.
pub trait SqlDatabase: Send + Sync + 'static {
    type Pool;

    fn build_select(stmt: sea_query::SelectStatement) -> String;
    fn build_insert(stmt: sea_query::InsertStatement) -> String;
    fn build_update(stmt: sea_query::UpdateStatement) -> String;
    fn build_delete(stmt: sea_query::DeleteStatement) -> String;
}

#[cfg(feature = "postgres")]
pub mod postgres {
    //! PostgreSQL database backend.

    use sea_query::PostgresQueryBuilder;
    use sqlx::PgPool;

    /// PostgreSQL database marker type.
    #[derive(Debug)]
    pub struct Postgres;

    impl super::SqlDatabase for Postgres {
        type Pool = PgPool;

        fn build_select(stmt: sea_query::SelectStatement) -> String {
            stmt.to_string(PostgresQueryBuilder)
        }

        fn build_insert(stmt: sea_query::InsertStatement) -> String {
            stmt.to_string(PostgresQueryBuilder)
        }

        fn build_update(stmt: sea_query::UpdateStatement) -> String {
            stmt.to_string(PostgresQueryBuilder)
        }

        fn build_delete(stmt: sea_query::DeleteStatement) -> String {
            stmt.to_string(PostgresQueryBuilder)
        }
    }

    /// PostgreSQL CRM store.
    pub type PostgresCrmStore = super::SqlCrmStore<Postgres>;
}

#[cfg(feature = "sqlite")]
pub mod sqlite {
    //! SQLite database backend.

    use sea_query::SqliteQueryBuilder;
    use sqlx::SqlitePool;

    /// SQLite database marker type.
    #[derive(Debug)]
    pub struct Sqlite;

    impl super::SqlDatabase for Sqlite {
        type Pool = SqlitePool;

        fn build_select(stmt: sea_query::SelectStatement) -> String {
            stmt.to_string(SqliteQueryBuilder)
        }

        fn build_insert(stmt: sea_query::InsertStatement) -> String {
            stmt.to_string(SqliteQueryBuilder)
        }

        fn build_update(stmt: sea_query::UpdateStatement) -> String {
            stmt.to_string(SqliteQueryBuilder)
        }

        fn build_delete(stmt: sea_query::DeleteStatement) -> String {
            stmt.to_string(SqliteQueryBuilder)
        }
    }

    /// SQLite CRM store.
    pub type SqliteCrmStore = super::SqlCrmStore<Sqlite>;
}

/// Initialize storage based on configuration.
///
/// Connects only; migrations are applied separately via
/// [`CrmStore::migrate`] so bootstrap stays an explicit step.
pub async fn init_storage(config: &StorageConfig) -> Result<Arc<dyn CrmStore>, StorageError> {
    info!("Storage: {} at {}", config.storage_type, config.url);

    match config.storage_type.as_str() {
        #[cfg(feature = "sqlite")]
        "sqlite" => {
            let path = config.url.trim_start_matches("sqlite:");

            if path != ":memory:" {
                if let Some(parent) = std::path::Path::new(path).parent() {
                    if !parent.as_os_str().is_empty() {
                        std::fs::create_dir_all(parent)?;
                    }
                }
            }

            let options = sqlx::sqlite::SqliteConnectOptions::new()
                .filename(path)
                .create_if_missing(true)
                .foreign_keys(true);

            // In-memory databases are per-connection; a larger pool would
            // hand out unrelated empty databases.
            let max_connections = if path == ":memory:" { 1 } else { 5 };

            let pool = sqlx::sqlite::SqlitePoolOptions::new()
                .max_connections(max_connections)
                .connect_with(options)
                .await?;

            Ok(Arc::new(sqlite::SqliteCrmStore::new(pool)))
        }
        #[cfg(feature = "postgres")]
        "postgres" => {
            let pool = sqlx::PgPool::connect(&config.url).await?;
            Ok(Arc::new(postgres::PostgresCrmStore::new(pool)))
        }
        other => Err(StorageError::UnsupportedBackend(other.to_string())),
    }
}
