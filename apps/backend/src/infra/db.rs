use std::time::Duration;

use migration::{migrate, MigrationCommand};
use sea_orm::{ConnectOptions, ConnectionTrait, Database, DatabaseConnection};
use tracing::info;

use crate::error::AppError;

fn is_sqlite_memory(url: &str) -> bool {
    url.starts_with("sqlite:") && url.contains(":memory:")
}

/// Connect to `database_url` and bring the schema up to date.
pub async fn connect_and_migrate(database_url: &str) -> Result<DatabaseConnection, AppError> {
    let mut opts = ConnectOptions::new(database_url.to_string());
    opts.connect_timeout(Duration::from_secs(10))
        .acquire_timeout(Duration::from_secs(10))
        .sqlx_logging(false);

    // Each SQLite memory connection is its own database
    if is_sqlite_memory(database_url) {
        opts.max_connections(1).min_connections(1);
    }

    let conn = Database::connect(opts).await?;
    migrate(&conn, MigrationCommand::Up).await?;

    info!(backend = ?conn.get_database_backend(), "database ready");
    Ok(conn)
}
