use std::path::{Path, PathBuf};
use std::sync::Arc;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use hobby_match_server::similarity::rebuild_relations;
use hobby_match_server::{open_database, LexicalSimilarity, Store};

/// File suffixes removed by `delete-db` (database plus WAL sidecars)
const DB_FILE_SUFFIXES: [&str; 3] = [".db", ".db-wal", ".db-shm"];

#[derive(Parser)]
#[command(name = "hobbyctl")]
#[command(version)]
#[command(about = "Maintenance tasks for the hobby match database")]
#[command(subcommand_required = true, arg_required_else_help = true)]
struct Cli {
    /// Path to the SQLite database
    #[arg(long, env = "DATABASE_PATH", default_value = "./data/hobbies.db")]
    database: PathBuf,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Recompute every hobby's user count from memberships
    Recount,
    /// Recompute similarity scores between all hobbies
    RebuildRelations,
    /// Write users, hobbies, memberships and meetings as JSON
    Export {
        /// Output file
        output: PathBuf,
    },
    /// Delete every database file in a directory
    DeleteDb {
        /// Directory to clean
        dir: PathBuf,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    dotenvy::dotenv().ok();

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "hobby_match_server=info,hobbyctl=info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Recount => {
            let store = open_database(&cli.database).await?;
            let corrected = store.recount_hobbies().await?;
            println!("Corrected {} hobby counters", corrected);
        }
        Commands::RebuildRelations => {
            let store = open_database(&cli.database).await?;
            let written = rebuild_relations(&store, Arc::new(LexicalSimilarity)).await?;
            println!("Stored {} hobby relations", written);
        }
        Commands::Export { output } => {
            let store = open_database(&cli.database).await?;
            let snapshot = store.snapshot().await?;
            let json = serde_json::to_string_pretty(&snapshot)?;
            tokio::fs::write(&output, json)
                .await
                .with_context(|| format!("failed to write {}", output.display()))?;
            println!(
                "Exported {} users and {} hobbies to {}",
                snapshot.users.len(),
                snapshot.hobbies.len(),
                output.display()
            );
        }
        Commands::DeleteDb { dir } => {
            let removed = delete_db_files(&dir)?;
            println!("Removed {} file(s) from {}", removed, dir.display());
        }
    }

    Ok(())
}

fn is_db_file(path: &Path) -> bool {
    path.file_name()
        .and_then(|name| name.to_str())
        .is_some_and(|name| DB_FILE_SUFFIXES.iter().any(|suffix| name.ends_with(suffix)))
}

fn delete_db_files(dir: &Path) -> Result<usize> {
    let entries =
        std::fs::read_dir(dir).with_context(|| format!("failed to read {}", dir.display()))?;

    let mut removed = 0;
    for entry in entries {
        let path = entry?.path();
        if path.is_file() && is_db_file(&path) {
            std::fs::remove_file(&path)
                .with_context(|| format!("failed to remove {}", path.display()))?;
            tracing::info!("Removed {}", path.display());
            removed += 1;
        }
    }
    Ok(removed)
}
