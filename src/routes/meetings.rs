use axum::{extract::State, Json};
use serde::Serialize;
use serde_json::{json, Value};

use crate::error::Result;
use crate::models::OneOnOneView;
use crate::routes::extract::Path;
use crate::routes::validation::parse_meeting_datetime;
use crate::routes::SessionUser;
use crate::AppState;

#[derive(Debug, Serialize)]
pub struct ScheduleResponse {
    pub success: bool,
    pub meeting_id: i64,
}

#[derive(Debug, Serialize)]
pub struct OneOnOnesResponse {
    pub one_on_ones: Vec<OneOnOneView>,
}

/// Schedule a one-on-one between the logged-in user and `user_id`
///
/// POST /schedule_one_on_one/:user_id/:datetime
///
/// The datetime must be ISO-8601 and strictly in the future (400 otherwise).
pub async fn schedule_one_on_one(
    State(state): State<AppState>,
    session: SessionUser,
    Path((other_id, datetime)): Path<(i64, String)>,
) -> Result<Json<ScheduleResponse>> {
    let when = parse_meeting_datetime(&datetime)?;
    let meeting = state
        .scheduler
        .schedule_one_on_one(session.user_id, other_id, when)
        .await?;

    Ok(Json(ScheduleResponse {
        success: true,
        meeting_id: meeting.id,
    }))
}

/// Cancel a one-on-one. Only its two participants may (403 otherwise).
pub async fn cancel_one_on_one(
    State(state): State<AppState>,
    session: SessionUser,
    Path(meeting_id): Path<i64>,
) -> Result<Json<Value>> {
    state
        .scheduler
        .cancel_one_on_one(session.user_id, meeting_id)
        .await?;

    Ok(Json(json!({ "success": true })))
}

pub async fn get_user_one_on_ones(
    State(state): State<AppState>,
    _session: SessionUser,
    Path(user_id): Path<i64>,
) -> Result<Json<OneOnOnesResponse>> {
    let one_on_ones = state.scheduler.get_user_one_on_ones(user_id).await?;
    Ok(Json(OneOnOnesResponse { one_on_ones }))
}
