//! Hobby Match Server Library
//!
//! This module exports the core types and functions for testing and reuse.

pub mod config;
pub mod constants;
pub mod db;
pub mod error;
pub mod models;
pub mod routes;
pub mod security;
pub mod services;
pub mod similarity;

pub use config::Config;
pub use db::{open_database, open_in_memory, Db, SqliteStore, Store};
pub use error::{AppError, Result};
pub use routes::build_router;
pub use similarity::{spawn_relation_worker, LexicalSimilarity, RelationQueue, SimilarityModel};

use services::{Accounts, HobbyCatalog, Matcher, PopularityReporter, Scheduler};

/// Application state shared across all handlers
#[derive(Clone)]
pub struct AppState {
    pub db: Db,
    pub config: Config,
    pub accounts: Accounts,
    pub catalog: HobbyCatalog,
    pub matcher: Matcher,
    pub scheduler: Scheduler,
    pub popularity: PopularityReporter,
}

impl AppState {
    /// Wire every component to the shared store
    pub fn new(db: Db, config: Config, relations: RelationQueue) -> Self {
        Self {
            accounts: Accounts::new(db.clone()),
            catalog: HobbyCatalog::new(db.clone(), relations),
            matcher: Matcher::new(db.clone()),
            scheduler: Scheduler::new(db.clone()),
            popularity: PopularityReporter::new(db.clone(), config.popular_page_size),
            db,
            config,
        }
    }
}
