pub mod pool;
pub mod sqlite;
pub mod store;

use std::path::Path;
use std::sync::Arc;

pub use pool::{create_memory_pool, create_pool};
pub use sqlite::SqliteStore;
pub use store::{AddedHobby, Snapshot, Store};

use crate::error::Result;

/// Store handle type (Arc-wrapped for sharing across handlers and workers)
pub type Db = Arc<dyn Store>;

/// Open or create the SQLite database at the given path
///
/// Applies pending migrations before returning.
pub async fn open_database(path: impl AsRef<Path>) -> Result<SqliteStore> {
    let path = path.as_ref();
    tracing::info!("Opening database at: {:?}", path);

    // Create parent directory if it doesn't exist
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() && !parent.exists() {
            std::fs::create_dir_all(parent).map_err(|e| {
                tracing::error!("Failed to create database directory: {}", e);
                sqlx::Error::Io(e)
            })?;
        }
    }

    let pool = create_pool(path).await?;
    migrate(&pool).await?;

    tracing::info!("Database initialized successfully");

    Ok(SqliteStore::new(pool))
}

/// Open a fresh in-memory database with the schema applied
pub async fn open_in_memory() -> Result<SqliteStore> {
    let pool = create_memory_pool().await?;
    migrate(&pool).await?;
    Ok(SqliteStore::new(pool))
}

async fn migrate(pool: &sqlx::SqlitePool) -> Result<()> {
    tracing::info!("Running database migrations...");
    sqlx::migrate!("./migrations").run(pool).await?;
    tracing::info!("Migrations complete");
    Ok(())
}
