use std::net::SocketAddr;
use std::sync::Arc;

use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use hobby_match_server::{
    build_router, open_database, spawn_relation_worker, AppState, Config, Db, LexicalSimilarity,
    RelationQueue,
};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize tracing
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "hobby_match_server=info,tower_http=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    tracing::info!("Starting Hobby Match Server...");

    // Load configuration
    let config = Config::from_env().map_err(|e| anyhow::anyhow!(e))?;

    tracing::info!(
        "Environment: {}, Server: {}",
        config.environment,
        config.server_address()
    );

    let db: Db = Arc::new(open_database(&config.database_path).await?);

    let relations = if config.similarity_enabled {
        let (queue, _worker) = spawn_relation_worker(
            db.clone(),
            Arc::new(LexicalSimilarity),
            config.similarity_queue_capacity,
        );
        queue
    } else {
        tracing::info!("Hobby similarity disabled");
        RelationQueue::disabled()
    };

    let addr: SocketAddr = config.server_address().parse()?;
    let app = build_router(AppState::new(db, config, relations));

    tracing::info!("Server listening on {}", addr);

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
