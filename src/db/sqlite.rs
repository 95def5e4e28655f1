use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::SqlitePool;

use super::store::{AddedHobby, Snapshot, Store};
use crate::constants::{
    ERR_HOBBY_ALREADY_HELD, ERR_HOBBY_NOT_FOUND, ERR_HOBBY_NOT_HELD, ERR_USERNAME_TAKEN,
    ERR_USER_NOT_FOUND,
};
use crate::error::{AppError, Result};
use crate::models::{
    Hobby, HobbyRelation, Membership, OneOnOne, OneOnOneView, PartnerMeetingRow, RelatedHobby,
    SharedHobbyCount, User, UserRecord,
};

const HOBBY_COLUMNS: &str = "id, name, user_count, created_at";
const USER_COLUMNS: &str = "id, username, email, created_at";

/// SQLite implementation of [`Store`] over an sqlx pool.
///
/// Write transactions always start with a write statement so SQLite takes the
/// write lock up front; concurrent writers then queue on the busy timeout
/// instead of failing on a read-to-write lock upgrade.
///
/// Statements on the shared pool are always stepped to completion (`execute`
/// or `fetch_all`). A statement left mid-result keeps its connection inside an
/// open transaction, hiding its writes from the rest of the pool and pinning a
/// stale read snapshot.
#[derive(Clone)]
pub struct SqliteStore {
    pool: SqlitePool,
}

impl SqliteStore {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    pub fn pool(&self) -> &SqlitePool {
        &self.pool
    }
}

fn to_i64(value: u64) -> i64 {
    i64::try_from(value).unwrap_or(i64::MAX)
}

fn to_u64(value: i64) -> u64 {
    u64::try_from(value).unwrap_or(0)
}

#[async_trait]
impl Store for SqliteStore {
    async fn ping(&self) -> Result<()> {
        sqlx::query("SELECT 1").execute(&self.pool).await?;
        Ok(())
    }

    async fn insert_user(
        &self,
        username: &str,
        password_hash: &str,
        email: Option<&str>,
    ) -> Result<User> {
        let mut tx = self.pool.begin().await?;

        let user_id = sqlx::query(
            "INSERT INTO users (username, password_hash, email, created_at) VALUES (?, ?, ?, ?)",
        )
        .bind(username)
        .bind(password_hash)
        .bind(email)
        .bind(Utc::now())
        .execute(&mut *tx)
        .await
        .map_err(|e| {
            if AppError::is_unique_violation(&e) {
                AppError::Conflict(ERR_USERNAME_TAKEN.to_string())
            } else {
                AppError::Database(e)
            }
        })?
        .last_insert_rowid();

        let sql = format!("SELECT {USER_COLUMNS} FROM users WHERE id = ?");
        let user = sqlx::query_as::<_, User>(&sql)
            .bind(user_id)
            .fetch_all(&mut *tx)
            .await?
            .into_iter()
            .next()
            .ok_or(sqlx::Error::RowNotFound)?;

        tx.commit().await?;
        Ok(user)
    }

    async fn find_user(&self, user_id: i64) -> Result<Option<User>> {
        let sql = format!("SELECT {USER_COLUMNS} FROM users WHERE id = ?");
        let user = sqlx::query_as::<_, User>(&sql)
            .bind(user_id)
            .fetch_all(&self.pool)
            .await?
            .into_iter()
            .next();
        Ok(user)
    }

    async fn find_user_by_username(&self, username: &str) -> Result<Option<UserRecord>> {
        let record = sqlx::query_as::<_, UserRecord>(
            "SELECT id, username, password_hash, email, created_at FROM users WHERE username = ?",
        )
        .bind(username)
        .fetch_all(&self.pool)
        .await?
        .into_iter()
        .next();
        Ok(record)
    }

    async fn add_hobby_to_user(&self, user_id: i64, name: &str) -> Result<AddedHobby> {
        let now = Utc::now();
        let mut tx = self.pool.begin().await?;

        // 1. Lazily create the catalog entry (takes the write lock)
        let new_entries = sqlx::query(
            "INSERT INTO hobbies (name, user_count, created_at) VALUES (?, 0, ?) \
             ON CONFLICT(name) DO NOTHING",
        )
        .bind(name)
        .bind(now)
        .execute(&mut *tx)
        .await?
        .rows_affected();
        let created = new_entries == 1;

        // 2. Verify user exists
        let user_exists: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM users WHERE id = ?")
            .bind(user_id)
            .fetch_all(&mut *tx)
            .await?
            .into_iter()
            .next()
            .ok_or(sqlx::Error::RowNotFound)?;
        if user_exists == 0 {
            tracing::warn!("Hobby add for non-existent user {}", user_id);
            return Err(AppError::NotFound(ERR_USER_NOT_FOUND.to_string()));
        }

        let hobby_id: i64 = sqlx::query_scalar("SELECT id FROM hobbies WHERE name = ?")
            .bind(name)
            .fetch_all(&mut *tx)
            .await?
            .into_iter()
            .next()
            .ok_or(sqlx::Error::RowNotFound)?;

        // 3. Insert the membership edge; an existing edge means a duplicate add
        let inserted = sqlx::query(
            "INSERT INTO user_hobbies (user_id, hobby_id, created_at) VALUES (?, ?, ?) \
             ON CONFLICT(user_id, hobby_id) DO NOTHING",
        )
        .bind(user_id)
        .bind(hobby_id)
        .bind(now)
        .execute(&mut *tx)
        .await?
        .rows_affected();
        if inserted == 0 {
            return Err(AppError::Conflict(ERR_HOBBY_ALREADY_HELD.to_string()));
        }

        // 4. Bump the popularity counter
        sqlx::query("UPDATE hobbies SET user_count = user_count + 1 WHERE id = ?")
            .bind(hobby_id)
            .execute(&mut *tx)
            .await?;

        let sql = format!("SELECT {HOBBY_COLUMNS} FROM hobbies WHERE id = ?");
        let hobby = sqlx::query_as::<_, Hobby>(&sql)
            .bind(hobby_id)
            .fetch_all(&mut *tx)
            .await?
            .into_iter()
            .next()
            .ok_or(sqlx::Error::RowNotFound)?;

        tx.commit().await?;

        Ok(AddedHobby { hobby, created })
    }

    async fn remove_hobby_from_user(&self, user_id: i64, hobby_id: i64) -> Result<()> {
        let mut tx = self.pool.begin().await?;

        let removed = sqlx::query("DELETE FROM user_hobbies WHERE user_id = ? AND hobby_id = ?")
            .bind(user_id)
            .bind(hobby_id)
            .execute(&mut *tx)
            .await?
            .rows_affected();

        if removed == 0 {
            let hobby_exists: i64 =
                sqlx::query_scalar("SELECT COUNT(*) FROM hobbies WHERE id = ?")
                    .bind(hobby_id)
                    .fetch_all(&mut *tx)
                    .await?
                    .into_iter()
                    .next()
                    .ok_or(sqlx::Error::RowNotFound)?;
            let message = if hobby_exists == 0 {
                ERR_HOBBY_NOT_FOUND
            } else {
                ERR_HOBBY_NOT_HELD
            };
            return Err(AppError::NotFound(message.to_string()));
        }

        sqlx::query("UPDATE hobbies SET user_count = MAX(user_count - 1, 0) WHERE id = ?")
            .bind(hobby_id)
            .execute(&mut *tx)
            .await?;

        tx.commit().await?;
        Ok(())
    }

    async fn recount_hobbies(&self) -> Result<u64> {
        let corrected = sqlx::query(
            "UPDATE hobbies \
             SET user_count = (SELECT COUNT(*) FROM user_hobbies WHERE hobby_id = hobbies.id) \
             WHERE user_count <> (SELECT COUNT(*) FROM user_hobbies WHERE hobby_id = hobbies.id)",
        )
        .execute(&self.pool)
        .await?
        .rows_affected();
        Ok(corrected)
    }

    async fn find_hobby(&self, hobby_id: i64) -> Result<Option<Hobby>> {
        let sql = format!("SELECT {HOBBY_COLUMNS} FROM hobbies WHERE id = ?");
        let hobby = sqlx::query_as::<_, Hobby>(&sql)
            .bind(hobby_id)
            .fetch_all(&self.pool)
            .await?
            .into_iter()
            .next();
        Ok(hobby)
    }

    async fn find_hobby_by_name(&self, name: &str) -> Result<Option<Hobby>> {
        let sql = format!("SELECT {HOBBY_COLUMNS} FROM hobbies WHERE name = ?");
        let hobby = sqlx::query_as::<_, Hobby>(&sql)
            .bind(name)
            .fetch_all(&self.pool)
            .await?
            .into_iter()
            .next();
        Ok(hobby)
    }

    async fn popular_hobbies(&self, limit: u32, offset: u64) -> Result<Vec<Hobby>> {
        let sql = format!(
            "SELECT {HOBBY_COLUMNS} FROM hobbies ORDER BY user_count DESC, id ASC LIMIT ? OFFSET ?"
        );
        let hobbies = sqlx::query_as::<_, Hobby>(&sql)
            .bind(i64::from(limit))
            .bind(to_i64(offset))
            .fetch_all(&self.pool)
            .await?;
        Ok(hobbies)
    }

    async fn count_hobbies(&self) -> Result<u64> {
        let counts: Vec<i64> = sqlx::query_scalar("SELECT COUNT(*) FROM hobbies")
            .fetch_all(&self.pool)
            .await?;
        Ok(to_u64(counts.into_iter().next().unwrap_or(0)))
    }

    async fn all_hobbies(&self) -> Result<Vec<Hobby>> {
        let sql = format!("SELECT {HOBBY_COLUMNS} FROM hobbies ORDER BY id ASC");
        let hobbies = sqlx::query_as::<_, Hobby>(&sql)
            .fetch_all(&self.pool)
            .await?;
        Ok(hobbies)
    }

    async fn user_hobbies(&self, user_id: i64) -> Result<Vec<Hobby>> {
        let hobbies = sqlx::query_as::<_, Hobby>(
            "SELECT h.id, h.name, h.user_count, h.created_at \
             FROM hobbies h JOIN user_hobbies uh ON uh.hobby_id = h.id \
             WHERE uh.user_id = ? ORDER BY h.name ASC",
        )
        .bind(user_id)
        .fetch_all(&self.pool)
        .await?;
        Ok(hobbies)
    }

    async fn users_by_hobby(&self, hobby_id: i64) -> Result<Vec<User>> {
        let users = sqlx::query_as::<_, User>(
            "SELECT u.id, u.username, u.email, u.created_at \
             FROM users u JOIN user_hobbies uh ON uh.user_id = u.id \
             WHERE uh.hobby_id = ? ORDER BY u.id ASC",
        )
        .bind(hobby_id)
        .fetch_all(&self.pool)
        .await?;
        Ok(users)
    }

    async fn shared_hobby_counts(&self, user_id: i64) -> Result<Vec<SharedHobbyCount>> {
        let counts = sqlx::query_as::<_, SharedHobbyCount>(
            "SELECT other.user_id AS user_id, COUNT(*) AS shared \
             FROM user_hobbies mine \
             JOIN user_hobbies other ON other.hobby_id = mine.hobby_id \
             WHERE mine.user_id = ? AND other.user_id <> ? \
             GROUP BY other.user_id",
        )
        .bind(user_id)
        .bind(user_id)
        .fetch_all(&self.pool)
        .await?;
        Ok(counts)
    }

    async fn met_user_ids(&self, user_id: i64) -> Result<Vec<i64>> {
        let ids: Vec<i64> = sqlx::query_scalar(
            "SELECT user_id2 FROM one_on_ones WHERE user_id1 = ? \
             UNION \
             SELECT user_id1 FROM one_on_ones WHERE user_id2 = ?",
        )
        .bind(user_id)
        .bind(user_id)
        .fetch_all(&self.pool)
        .await?;
        Ok(ids)
    }

    async fn upsert_relations(&self, relations: &[HobbyRelation]) -> Result<()> {
        if relations.is_empty() {
            return Ok(());
        }

        let mut tx = self.pool.begin().await?;
        for relation in relations {
            sqlx::query(
                "INSERT INTO hobby_relations (hobby_id1, hobby_id2, score) VALUES (?, ?, ?) \
                 ON CONFLICT(hobby_id1, hobby_id2) DO UPDATE SET score = excluded.score",
            )
            .bind(relation.hobby_id1)
            .bind(relation.hobby_id2)
            .bind(relation.score)
            .execute(&mut *tx)
            .await?;
        }
        tx.commit().await?;
        Ok(())
    }

    async fn related_hobbies(
        &self,
        hobby_id: i64,
        min_score: f64,
        limit: u32,
    ) -> Result<Vec<RelatedHobby>> {
        let related = sqlx::query_as::<_, RelatedHobby>(
            "SELECT h.id, h.name, r.score \
             FROM hobby_relations r \
             JOIN hobbies h \
               ON h.id = CASE WHEN r.hobby_id1 = ? THEN r.hobby_id2 ELSE r.hobby_id1 END \
             WHERE (r.hobby_id1 = ? OR r.hobby_id2 = ?) AND r.score >= ? \
             ORDER BY r.score DESC, h.id ASC LIMIT ?",
        )
        .bind(hobby_id)
        .bind(hobby_id)
        .bind(hobby_id)
        .bind(min_score)
        .bind(i64::from(limit))
        .fetch_all(&self.pool)
        .await?;
        Ok(related)
    }

    async fn insert_one_on_one(
        &self,
        user_id1: i64,
        user_id2: i64,
        date: DateTime<Utc>,
    ) -> Result<OneOnOne> {
        let mut tx = self.pool.begin().await?;

        let meeting_id = sqlx::query(
            "INSERT INTO one_on_ones (user_id1, user_id2, date, created_at) VALUES (?, ?, ?, ?)",
        )
        .bind(user_id1)
        .bind(user_id2)
        .bind(date)
        .bind(Utc::now())
        .execute(&mut *tx)
        .await?
        .last_insert_rowid();

        let meeting = sqlx::query_as::<_, OneOnOne>(
            "SELECT id, user_id1, user_id2, date, created_at FROM one_on_ones WHERE id = ?",
        )
        .bind(meeting_id)
        .fetch_all(&mut *tx)
        .await?
        .into_iter()
        .next()
        .ok_or(sqlx::Error::RowNotFound)?;

        tx.commit().await?;
        Ok(meeting)
    }

    async fn find_one_on_one(&self, meeting_id: i64) -> Result<Option<OneOnOne>> {
        let meeting = sqlx::query_as::<_, OneOnOne>(
            "SELECT id, user_id1, user_id2, date, created_at FROM one_on_ones WHERE id = ?",
        )
        .bind(meeting_id)
        .fetch_all(&self.pool)
        .await?
        .into_iter()
        .next();
        Ok(meeting)
    }

    async fn delete_one_on_one(&self, meeting_id: i64, participant_id: i64) -> Result<bool> {
        let deleted = sqlx::query(
            "DELETE FROM one_on_ones WHERE id = ? AND (user_id1 = ? OR user_id2 = ?)",
        )
        .bind(meeting_id)
        .bind(participant_id)
        .bind(participant_id)
        .execute(&self.pool)
        .await?
        .rows_affected();
        Ok(deleted > 0)
    }

    async fn one_on_ones_for_user(&self, user_id: i64) -> Result<Vec<OneOnOneView>> {
        let rows = sqlx::query_as::<_, PartnerMeetingRow>(
            "SELECT o.id AS meeting_id, o.date AS date, \
                    u.id AS partner_id, u.username AS partner_username, \
                    u.email AS partner_email, u.created_at AS partner_created_at \
             FROM one_on_ones o \
             JOIN users u ON u.id = CASE WHEN o.user_id1 = ? THEN o.user_id2 ELSE o.user_id1 END \
             WHERE o.user_id1 = ? OR o.user_id2 = ? \
             ORDER BY o.date ASC, o.id ASC",
        )
        .bind(user_id)
        .bind(user_id)
        .bind(user_id)
        .fetch_all(&self.pool)
        .await?;
        Ok(rows.into_iter().map(OneOnOneView::from).collect())
    }

    async fn snapshot(&self) -> Result<Snapshot> {
        // One read transaction so the dump is consistent
        let mut tx = self.pool.begin().await?;

        let users_sql = format!("SELECT {USER_COLUMNS} FROM users ORDER BY id ASC");
        let users = sqlx::query_as::<_, User>(&users_sql)
            .fetch_all(&mut *tx)
            .await?;

        let hobbies_sql = format!("SELECT {HOBBY_COLUMNS} FROM hobbies ORDER BY id ASC");
        let hobbies = sqlx::query_as::<_, Hobby>(&hobbies_sql)
            .fetch_all(&mut *tx)
            .await?;

        let memberships = sqlx::query_as::<_, Membership>(
            "SELECT user_id, hobby_id, created_at FROM user_hobbies ORDER BY user_id, hobby_id",
        )
        .fetch_all(&mut *tx)
        .await?;

        let hobby_relations = sqlx::query_as::<_, HobbyRelation>(
            "SELECT hobby_id1, hobby_id2, score FROM hobby_relations ORDER BY hobby_id1, hobby_id2",
        )
        .fetch_all(&mut *tx)
        .await?;

        let one_on_ones = sqlx::query_as::<_, OneOnOne>(
            "SELECT id, user_id1, user_id2, date, created_at FROM one_on_ones ORDER BY id ASC",
        )
        .fetch_all(&mut *tx)
        .await?;

        tx.commit().await?;

        Ok(Snapshot {
            exported_at: Utc::now(),
            users,
            hobbies,
            memberships,
            hobby_relations,
            one_on_ones,
        })
    }
}
