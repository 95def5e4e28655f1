use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::error::Result;
use crate::models::{
    Hobby, HobbyRelation, Membership, OneOnOne, OneOnOneView, RelatedHobby, SharedHobbyCount,
    User, UserRecord,
};

/// Outcome of adding a hobby to a user
#[derive(Debug, Clone)]
pub struct AddedHobby {
    /// The catalog entry, with its counter already incremented
    pub hobby: Hobby,
    /// True when this call created the catalog entry
    pub created: bool,
}

/// Full dump of persisted state (password hashes excluded)
#[derive(Debug, Clone, Serialize)]
pub struct Snapshot {
    pub exported_at: DateTime<Utc>,
    pub users: Vec<User>,
    pub hobbies: Vec<Hobby>,
    pub memberships: Vec<Membership>,
    pub hobby_relations: Vec<HobbyRelation>,
    pub one_on_ones: Vec<OneOnOne>,
}

/// Storage backend for users, the hobby catalog, the user-hobby graph and meetings.
///
/// Every mutating method is a single transaction. Lookups return `Option`;
/// callers decide how absence is reported.
#[async_trait]
pub trait Store: Send + Sync {
    /// Cheap connectivity check
    async fn ping(&self) -> Result<()>;

    // -------------------------------------------------------------------------
    // Users
    // -------------------------------------------------------------------------

    /// Insert a user. Fails with `Conflict` when the username is taken.
    async fn insert_user(
        &self,
        username: &str,
        password_hash: &str,
        email: Option<&str>,
    ) -> Result<User>;

    async fn find_user(&self, user_id: i64) -> Result<Option<User>>;

    async fn find_user_by_username(&self, username: &str) -> Result<Option<UserRecord>>;

    // -------------------------------------------------------------------------
    // Catalog
    // -------------------------------------------------------------------------

    /// Create the hobby if needed, insert the membership edge and bump the counter.
    ///
    /// `name` must already be normalized. Fails with `NotFound` for an unknown
    /// user and `Conflict` when the user already holds the hobby; in both cases
    /// nothing is written.
    async fn add_hobby_to_user(&self, user_id: i64, name: &str) -> Result<AddedHobby>;

    /// Delete the membership edge and decrement the counter.
    ///
    /// Fails with `NotFound` when the hobby does not exist or is not held.
    async fn remove_hobby_from_user(&self, user_id: i64, hobby_id: i64) -> Result<()>;

    /// Overwrite every counter with the true edge count. Returns how many
    /// hobbies had a drifted counter.
    async fn recount_hobbies(&self) -> Result<u64>;

    async fn find_hobby(&self, hobby_id: i64) -> Result<Option<Hobby>>;

    async fn find_hobby_by_name(&self, name: &str) -> Result<Option<Hobby>>;

    /// Hobbies by `user_count` descending, ties in insertion order
    async fn popular_hobbies(&self, limit: u32, offset: u64) -> Result<Vec<Hobby>>;

    async fn count_hobbies(&self) -> Result<u64>;

    async fn all_hobbies(&self) -> Result<Vec<Hobby>>;

    // -------------------------------------------------------------------------
    // User-hobby graph
    // -------------------------------------------------------------------------

    async fn user_hobbies(&self, user_id: i64) -> Result<Vec<Hobby>>;

    async fn users_by_hobby(&self, hobby_id: i64) -> Result<Vec<User>>;

    /// For every other user sharing at least one hobby with `user_id`, the
    /// number of shared hobbies. Order is unspecified.
    async fn shared_hobby_counts(&self, user_id: i64) -> Result<Vec<SharedHobbyCount>>;

    /// Ids of every user with at least one one-on-one record with `user_id`
    async fn met_user_ids(&self, user_id: i64) -> Result<Vec<i64>>;

    // -------------------------------------------------------------------------
    // Hobby relations
    // -------------------------------------------------------------------------

    async fn upsert_relations(&self, relations: &[HobbyRelation]) -> Result<()>;

    async fn related_hobbies(
        &self,
        hobby_id: i64,
        min_score: f64,
        limit: u32,
    ) -> Result<Vec<RelatedHobby>>;

    // -------------------------------------------------------------------------
    // One-on-ones
    // -------------------------------------------------------------------------

    async fn insert_one_on_one(
        &self,
        user_id1: i64,
        user_id2: i64,
        date: DateTime<Utc>,
    ) -> Result<OneOnOne>;

    async fn find_one_on_one(&self, meeting_id: i64) -> Result<Option<OneOnOne>>;

    /// Delete the meeting if `participant_id` is one of its users.
    /// Returns false when no such row exists.
    async fn delete_one_on_one(&self, meeting_id: i64, participant_id: i64) -> Result<bool>;

    /// Meetings of `user_id` joined with the counterpart, by date ascending
    async fn one_on_ones_for_user(&self, user_id: i64) -> Result<Vec<OneOnOneView>>;

    // -------------------------------------------------------------------------
    // Maintenance
    // -------------------------------------------------------------------------

    async fn snapshot(&self) -> Result<Snapshot>;
}
