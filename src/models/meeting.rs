use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::User;

/// A scheduled one-on-one between two distinct users
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, sqlx::FromRow)]
pub struct OneOnOne {
    pub id: i64,
    /// The user who requested the meeting
    pub user_id1: i64,
    pub user_id2: i64,
    pub date: DateTime<Utc>,
    pub created_at: DateTime<Utc>,
}

impl OneOnOne {
    pub fn involves(&self, user_id: i64) -> bool {
        self.user_id1 == user_id || self.user_id2 == user_id
    }
}

/// Meeting row joined with the counterpart user, as seen by one participant
#[derive(Debug, Clone, sqlx::FromRow)]
pub struct PartnerMeetingRow {
    pub meeting_id: i64,
    pub date: DateTime<Utc>,
    pub partner_id: i64,
    pub partner_username: String,
    pub partner_email: Option<String>,
    pub partner_created_at: DateTime<Utc>,
}

/// Meeting as listed for one participant
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OneOnOneView {
    pub meeting_id: i64,
    pub partner: User,
    pub date: DateTime<Utc>,
}

impl From<PartnerMeetingRow> for OneOnOneView {
    fn from(row: PartnerMeetingRow) -> Self {
        Self {
            meeting_id: row.meeting_id,
            partner: User {
                id: row.partner_id,
                username: row.partner_username,
                email: row.partner_email,
                created_at: row.partner_created_at,
            },
            date: row.date,
        }
    }
}
