use serde::Serialize;

use crate::constants::{ERR_HOBBY_NOT_FOUND, RELATED_HOBBY_LIMIT, RELATED_HOBBY_MIN_SCORE};
use crate::db::Db;
use crate::error::{AppError, Result};
use crate::models::{Hobby, RelatedHobby, User};
use crate::services::Matcher;
use crate::similarity::RelationQueue;

/// Hobby page: the catalog entry, its members and close hobbies
#[derive(Debug, Clone, Serialize)]
pub struct HobbyDetail {
    pub hobby: Hobby,
    pub members: Vec<User>,
    pub related: Vec<RelatedHobby>,
}

/// Global hobby catalog with popularity counters
#[derive(Clone)]
pub struct HobbyCatalog {
    store: Db,
    graph: Matcher,
    relations: RelationQueue,
}

impl HobbyCatalog {
    pub fn new(store: Db, relations: RelationQueue) -> Self {
        Self {
            graph: Matcher::new(store.clone()),
            store,
            relations,
        }
    }

    /// Add a hobby (by raw name) to a user, creating the catalog entry on first use
    pub async fn add_hobby_to_user(&self, user_id: i64, raw_name: &str) -> Result<Hobby> {
        let name = Hobby::normalize_name(raw_name)?;
        let added = self.store.add_hobby_to_user(user_id, &name).await?;

        if added.created {
            tracing::info!("New hobby in catalog: '{}' (id {})", added.hobby.name, added.hobby.id);
            // Scored after commit, off the request path
            self.relations.enqueue(added.hobby.id);
        }

        tracing::debug!(
            "User {} added hobby '{}' (now {} users)",
            user_id,
            added.hobby.name,
            added.hobby.user_count
        );
        Ok(added.hobby)
    }

    pub async fn remove_hobby_from_user(&self, user_id: i64, hobby_id: i64) -> Result<()> {
        self.store.remove_hobby_from_user(user_id, hobby_id).await?;
        tracing::debug!("User {} removed hobby {}", user_id, hobby_id);
        Ok(())
    }

    /// Repair counter drift. Returns the number of corrected hobbies.
    pub async fn recount_hobbies(&self) -> Result<u64> {
        let corrected = self.store.recount_hobbies().await?;
        if corrected > 0 {
            tracing::warn!("Recount corrected {} hobby counters", corrected);
        } else {
            tracing::info!("Recount found no drift");
        }
        Ok(corrected)
    }

    pub async fn get_most_popular_hobbies(&self, limit: u32, offset: u64) -> Result<Vec<Hobby>> {
        self.store.popular_hobbies(limit, offset).await
    }

    pub async fn hobby_detail(&self, hobby_id: i64) -> Result<HobbyDetail> {
        let hobby = self
            .store
            .find_hobby(hobby_id)
            .await?
            .ok_or_else(|| AppError::NotFound(ERR_HOBBY_NOT_FOUND.to_string()))?;

        let members = self.graph.get_users_by_hobby(hobby_id).await?;
        let related = self
            .store
            .related_hobbies(hobby_id, RELATED_HOBBY_MIN_SCORE, RELATED_HOBBY_LIMIT)
            .await?;

        Ok(HobbyDetail {
            hobby,
            members,
            related,
        })
    }
}
