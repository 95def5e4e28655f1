use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::constants::{ERR_EMPTY_HOBBY_NAME, ERR_HOBBY_NAME_TOO_LONG, MAX_NAME_LENGTH};
use crate::error::{AppError, Result};

/// Catalog entry shared by every user practicing the hobby
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, sqlx::FromRow)]
pub struct Hobby {
    pub id: i64,
    /// Canonical name (trimmed, lowercase)
    pub name: String,
    /// Number of users holding this hobby
    pub user_count: i64,
    pub created_at: DateTime<Utc>,
}

impl Hobby {
    /// Canonicalize a raw hobby name: trim surrounding whitespace, lowercase.
    pub fn normalize_name(raw: &str) -> Result<String> {
        let name = raw.trim().to_lowercase();
        if name.is_empty() {
            return Err(AppError::Validation(ERR_EMPTY_HOBBY_NAME.to_string()));
        }
        if name.chars().count() > MAX_NAME_LENGTH {
            return Err(AppError::Validation(ERR_HOBBY_NAME_TOO_LONG.to_string()));
        }
        Ok(name)
    }
}

/// Membership edge: "this user practices this hobby"
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, sqlx::FromRow)]
pub struct Membership {
    pub user_id: i64,
    pub hobby_id: i64,
    pub created_at: DateTime<Utc>,
}

/// Pairwise similarity between two hobbies, stored with `hobby_id1 > hobby_id2`
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize, sqlx::FromRow)]
pub struct HobbyRelation {
    pub hobby_id1: i64,
    pub hobby_id2: i64,
    pub score: f64,
}

impl HobbyRelation {
    /// Build a symmetry-reduced relation. Returns `None` for a self-pair.
    ///
    /// The score is clamped into `[0, 1]`; NaN becomes 0.
    pub fn new(a: i64, b: i64, score: f64) -> Option<Self> {
        if a == b {
            return None;
        }
        let score = if score.is_nan() { 0.0 } else { score.clamp(0.0, 1.0) };
        Some(Self {
            hobby_id1: a.max(b),
            hobby_id2: a.min(b),
            score,
        })
    }
}

/// A hobby related to another one, for display
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, sqlx::FromRow)]
pub struct RelatedHobby {
    pub id: i64,
    pub name: String,
    pub score: f64,
}
