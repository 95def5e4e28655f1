use std::collections::HashSet;

use serde::Serialize;

use crate::constants::{ERR_NO_COMMON_USER, ERR_USER_NOT_FOUND};
use crate::db::Db;
use crate::error::{AppError, Result};
use crate::models::{Hobby, SharedHobbyCount, User};

/// Recommendation: the user sharing the most hobbies
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CommonUser {
    pub user: User,
    pub shared_hobbies: i64,
}

/// Pick the candidate with the most shared hobbies, skipping `excluded`.
///
/// Ties go to the lowest user id. Candidates with no shared hobby never win.
pub fn pick_most_common(
    candidates: &[SharedHobbyCount],
    excluded: &HashSet<i64>,
) -> Option<SharedHobbyCount> {
    candidates
        .iter()
        .filter(|c| c.shared > 0 && !excluded.contains(&c.user_id))
        .max_by(|a, b| a.shared.cmp(&b.shared).then(b.user_id.cmp(&a.user_id)))
        .copied()
}

/// Queries over the user-hobby graph
#[derive(Clone)]
pub struct Matcher {
    store: Db,
}

impl Matcher {
    pub fn new(store: Db) -> Self {
        Self { store }
    }

    pub async fn get_user_hobbies(&self, user_id: i64) -> Result<Vec<Hobby>> {
        self.store.user_hobbies(user_id).await
    }

    pub async fn get_users_by_hobby(&self, hobby_id: i64) -> Result<Vec<User>> {
        self.store.users_by_hobby(hobby_id).await
    }

    /// The other user sharing the largest number of hobbies with `user_id`
    pub async fn get_most_common_user(&self, user_id: i64) -> Result<CommonUser> {
        self.most_common(user_id, HashSet::new()).await
    }

    /// Like [`Matcher::get_most_common_user`], but skips anyone with a
    /// one-on-one record with `user_id`, past or future
    pub async fn get_most_common_user_never_met(&self, user_id: i64) -> Result<CommonUser> {
        let met: HashSet<i64> = self.store.met_user_ids(user_id).await?.into_iter().collect();
        self.most_common(user_id, met).await
    }

    async fn most_common(&self, user_id: i64, excluded: HashSet<i64>) -> Result<CommonUser> {
        let candidates = self.store.shared_hobby_counts(user_id).await?;

        let best = pick_most_common(&candidates, &excluded)
            .ok_or_else(|| AppError::NotFound(ERR_NO_COMMON_USER.to_string()))?;

        let user = self
            .store
            .find_user(best.user_id)
            .await?
            .ok_or_else(|| AppError::NotFound(ERR_USER_NOT_FOUND.to_string()))?;

        tracing::debug!(
            "Most common user for {} is {} ({} shared hobbies, {} candidates)",
            user_id,
            user.id,
            best.shared,
            candidates.len()
        );

        Ok(CommonUser {
            user,
            shared_hobbies: best.shared,
        })
    }
}
