use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::constants::{ERR_EMPTY_USERNAME, ERR_USERNAME_TOO_LONG, MAX_NAME_LENGTH};
use crate::error::{AppError, Result};

/// User row as stored, including the password hash
#[derive(Debug, Clone, sqlx::FromRow)]
pub struct UserRecord {
    pub id: i64,
    pub username: String,
    /// Argon2 PHC string
    pub password_hash: String,
    pub email: Option<String>,
    pub created_at: DateTime<Utc>,
}

/// User model for API responses
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, sqlx::FromRow)]
pub struct User {
    pub id: i64,
    pub username: String,
    pub email: Option<String>,
    pub created_at: DateTime<Utc>,
}

impl User {
    /// Validate a username for registration.
    ///
    /// Usernames are case-sensitive; only surrounding whitespace is removed.
    pub fn validate_username(raw: &str) -> Result<String> {
        let username = raw.trim();
        if username.is_empty() {
            return Err(AppError::Validation(ERR_EMPTY_USERNAME.to_string()));
        }
        if username.chars().count() > MAX_NAME_LENGTH {
            return Err(AppError::Validation(ERR_USERNAME_TOO_LONG.to_string()));
        }
        Ok(username.to_string())
    }
}

impl From<UserRecord> for User {
    fn from(record: UserRecord) -> Self {
        Self {
            id: record.id,
            username: record.username,
            email: record.email,
            created_at: record.created_at,
        }
    }
}

/// Number of hobbies another user shares with the user being matched
#[derive(Debug, Clone, Copy, PartialEq, Eq, sqlx::FromRow)]
pub struct SharedHobbyCount {
    pub user_id: i64,
    pub shared: i64,
}
