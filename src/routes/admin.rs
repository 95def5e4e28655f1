use axum::{extract::State, Json};
use serde::Serialize;

use crate::error::Result;
use crate::routes::SessionUser;
use crate::AppState;

#[derive(Debug, Serialize)]
pub struct RecountResponse {
    pub success: bool,
    /// Hobbies whose stored user count had drifted
    pub corrected: u64,
}

/// Recompute every hobby's user count from memberships
///
/// GET /recount_hobbies (logged-in users only)
pub async fn recount_hobbies(
    State(state): State<AppState>,
    session: SessionUser,
) -> Result<Json<RecountResponse>> {
    tracing::info!("Hobby recount requested by user {}", session.user_id);
    let corrected = state.catalog.recount_hobbies().await?;

    Ok(Json(RecountResponse {
        success: true,
        corrected,
    }))
}
