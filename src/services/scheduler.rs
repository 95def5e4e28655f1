use chrono::{DateTime, Utc};

use crate::constants::{
    ERR_MEETING_IN_PAST, ERR_MEETING_NOT_FOUND, ERR_MEETING_WITH_SELF, ERR_NOT_A_PARTICIPANT,
    ERR_USER_NOT_FOUND,
};
use crate::db::Db;
use crate::error::{AppError, Result};
use crate::models::{OneOnOne, OneOnOneView};

/// Records and cancels one-on-one meetings
#[derive(Clone)]
pub struct Scheduler {
    store: Db,
}

impl Scheduler {
    pub fn new(store: Db) -> Self {
        Self { store }
    }

    /// Schedule a meeting between `requester_id` and `other_id` at `when`
    pub async fn schedule_one_on_one(
        &self,
        requester_id: i64,
        other_id: i64,
        when: DateTime<Utc>,
    ) -> Result<OneOnOne> {
        self.schedule_at(requester_id, other_id, when, Utc::now()).await
    }

    /// Same as [`Scheduler::schedule_one_on_one`] with an explicit current time
    pub async fn schedule_at(
        &self,
        requester_id: i64,
        other_id: i64,
        when: DateTime<Utc>,
        now: DateTime<Utc>,
    ) -> Result<OneOnOne> {
        if when <= now {
            return Err(AppError::Validation(ERR_MEETING_IN_PAST.to_string()));
        }
        if requester_id == other_id {
            return Err(AppError::Validation(ERR_MEETING_WITH_SELF.to_string()));
        }

        // Users are never deleted, so these checks cannot go stale before the insert.
        // A session can outlive its user when the database is recreated.
        for user_id in [requester_id, other_id] {
            if self.store.find_user(user_id).await?.is_none() {
                return Err(AppError::NotFound(ERR_USER_NOT_FOUND.to_string()));
            }
        }

        let meeting = self
            .store
            .insert_one_on_one(requester_id, other_id, when)
            .await?;

        tracing::info!(
            "One-on-one {} scheduled between {} and {} at {}",
            meeting.id,
            requester_id,
            other_id,
            when.to_rfc3339()
        );
        Ok(meeting)
    }

    /// Cancel a meeting. Only its participants may do so.
    pub async fn cancel_one_on_one(&self, caller_id: i64, meeting_id: i64) -> Result<()> {
        let meeting = self
            .store
            .find_one_on_one(meeting_id)
            .await?
            .ok_or_else(|| AppError::NotFound(ERR_MEETING_NOT_FOUND.to_string()))?;

        if !meeting.involves(caller_id) {
            tracing::warn!(
                "User {} tried to cancel one-on-one {} without participating",
                caller_id,
                meeting_id
            );
            return Err(AppError::Authorization(ERR_NOT_A_PARTICIPANT.to_string()));
        }

        // A concurrent cancel may have won the race
        if !self.store.delete_one_on_one(meeting_id, caller_id).await? {
            return Err(AppError::NotFound(ERR_MEETING_NOT_FOUND.to_string()));
        }

        tracing::info!("One-on-one {} cancelled by {}", meeting_id, caller_id);
        Ok(())
    }

    /// Every meeting (past and future) `user_id` takes part in
    pub async fn get_user_one_on_ones(&self, user_id: i64) -> Result<Vec<OneOnOneView>> {
        if self.store.find_user(user_id).await?.is_none() {
            return Err(AppError::NotFound(ERR_USER_NOT_FOUND.to_string()));
        }
        self.store.one_on_ones_for_user(user_id).await
    }
}
