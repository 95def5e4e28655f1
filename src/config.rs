use std::env;

use crate::constants::{
    DEFAULT_POPULAR_PAGE_SIZE, DEFAULT_SESSION_TTL_SECS, DEFAULT_SIMILARITY_QUEUE_CAPACITY,
};

/// Application configuration loaded from environment variables
#[derive(Debug, Clone)]
pub struct Config {
    pub server_host: String,
    pub server_port: u16,
    pub database_path: String,
    pub allowed_origins: Vec<String>,
    pub environment: String,
    pub session_secret: String,
    pub session_ttl_secs: i64,
    pub popular_page_size: u32,
    pub similarity_enabled: bool,
    pub similarity_queue_capacity: usize,
}

impl Config {
    /// Load configuration from environment variables
    pub fn from_env() -> Result<Self, String> {
        // Load .env file if it exists (development)
        dotenvy::dotenv().ok();

        let server_host = env::var("SERVER_HOST").unwrap_or_else(|_| "0.0.0.0".to_string());
        let server_port = env::var("SERVER_PORT")
            .unwrap_or_else(|_| "8080".to_string())
            .parse()
            .map_err(|_| "Invalid SERVER_PORT")?;

        let database_path =
            env::var("DATABASE_PATH").unwrap_or_else(|_| "./data/hobbies.db".to_string());

        let allowed_origins = env::var("ALLOWED_ORIGINS")
            .unwrap_or_else(|_| "http://localhost:5173".to_string())
            .split(',')
            .map(|s| s.trim().to_string())
            .filter(|s| !s.is_empty())
            .collect();

        let environment = env::var("ENVIRONMENT").unwrap_or_else(|_| "development".to_string());

        let session_secret = env::var("SESSION_SECRET")
            .map_err(|_| "SESSION_SECRET must be set for signing session cookies")?;
        if session_secret.is_empty() {
            return Err("SESSION_SECRET must not be empty".to_string());
        }

        let session_ttl_secs = env::var("SESSION_TTL_SECS")
            .unwrap_or_else(|_| DEFAULT_SESSION_TTL_SECS.to_string())
            .parse::<i64>()
            .ok()
            .filter(|ttl| *ttl > 0)
            .ok_or("Invalid SESSION_TTL_SECS")?;

        let popular_page_size = env::var("POPULAR_PAGE_SIZE")
            .unwrap_or_else(|_| DEFAULT_POPULAR_PAGE_SIZE.to_string())
            .parse::<u32>()
            .ok()
            .filter(|size| *size > 0)
            .ok_or("Invalid POPULAR_PAGE_SIZE")?;

        let similarity_enabled = env::var("SIMILARITY_ENABLED")
            .map(|v| parse_bool(&v))
            .unwrap_or(Ok(true))
            .map_err(|_| "Invalid SIMILARITY_ENABLED")?;

        let similarity_queue_capacity = env::var("SIMILARITY_QUEUE_CAPACITY")
            .unwrap_or_else(|_| DEFAULT_SIMILARITY_QUEUE_CAPACITY.to_string())
            .parse::<usize>()
            .ok()
            .filter(|cap| *cap > 0)
            .ok_or("Invalid SIMILARITY_QUEUE_CAPACITY")?;

        Ok(Config {
            server_host,
            server_port,
            database_path,
            allowed_origins,
            environment,
            session_secret,
            session_ttl_secs,
            popular_page_size,
            similarity_enabled,
            similarity_queue_capacity,
        })
    }

    /// Get server address as string
    pub fn server_address(&self) -> String {
        format!("{}:{}", self.server_host, self.server_port)
    }
}

fn parse_bool(value: &str) -> Result<bool, ()> {
    match value.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Ok(true),
        "0" | "false" | "no" | "off" => Ok(false),
        _ => Err(()),
    }
}
