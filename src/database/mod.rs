use crate::config::DatabaseConfig;
use log::{info, warn};
use migration::{Migrator, MigratorTrait};
use sea_orm::{ConnectOptions, Database as SeaDatabase};
use std::{
    fs::{create_dir_all, File},
    io,
    path::Path,
};
use thiserror::Error;

pub mod entities;
mod migration;

// Re-exports of database types
pub use sea_orm::DatabaseConnection;
pub use sea_orm::DbErr;

/// Database error result type
pub type DbResult<T> = Result<T, DbErr>;

/// Errors that can occur while setting up the database
#[derive(Debug, Error)]
pub enum SetupError {
    #[error("Unable to create sqlite database file: {0}")]
    File(#[from] io::Error),
    #[error("Unable to create database connection: {0}")]
    Connect(DbErr),
    #[error("Failed to run database migrations: {0}")]
    Migration(DbErr),
}

/// Connects to the database and applies any pending migrations
///
/// `config` The database configuration
pub async fn init(config: &DatabaseConfig) -> Result<DatabaseConnection, SetupError> {
    let connection = connect_database(&config.file).await?;
    info!("Connected to database..");

    // Run migrations
    if let Err(err) = Migrator::up(&connection, None).await {
        if let DbErr::Custom(custom_err) = &err {
            if custom_err
                .contains("is missing, this migration has been applied but its file is missing")
            {
                // Forward migrations are not always a failure, so its just a warning
                warn!(
                    "It looks like your database has been used with a newer version \
                    of this server, you may encounter unexpected issues: {}",
                    custom_err
                );
                return Ok(connection);
            }
        }

        // Other errors should be considered fatal
        return Err(SetupError::Migration(err));
    }

    Ok(connection)
}

/// Drops every table in the database and recreates them from the
/// migrations leaving an empty schema
///
/// `db` The database connection
pub async fn reset(db: &DatabaseConnection) -> DbResult<()> {
    Migrator::fresh(db).await
}

/// Connects to the sqlite database at the provided path creating
/// the database file (and its parent directories) when missing
///
/// `file` The path to the database file
async fn connect_database(file: &str) -> Result<DatabaseConnection, SetupError> {
    let path = Path::new(file);

    // Create path to database file if missing
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() && !parent.exists() {
            create_dir_all(parent)?;
        }
    }

    // Create the database if file is missing
    if !path.exists() {
        File::create(path)?;
    }

    let url = format!("sqlite:{file}");
    let mut options = ConnectOptions::new(url);
    options.sqlx_logging(false);

    SeaDatabase::connect(options)
        .await
        .map_err(SetupError::Connect)
}

/// Creates a fresh in-memory database with all the migrations
/// applied for use within tests
#[cfg(test)]
pub async fn connect_test() -> DatabaseConnection {
    let mut options = ConnectOptions::new("sqlite::memory:".to_string());
    // Each connection to an in-memory database is a separate database
    options
        .max_connections(1)
        .min_connections(1)
        .sqlx_logging(false);

    let connection = SeaDatabase::connect(options)
        .await
        .expect("Failed to connect to test database");
    Migrator::up(&connection, None)
        .await
        .expect("Failed to migrate test database");
    connection
}
