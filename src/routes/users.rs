use axum::{extract::State, Json};
use serde::Serialize;

use crate::constants::ERR_USER_NOT_FOUND;
use crate::error::{AppError, Result};
use crate::models::{Hobby, User};
use crate::routes::extract::Path;
use crate::routes::SessionUser;
use crate::services::CommonUser;
use crate::AppState;

#[derive(Debug, Serialize)]
pub struct ProfileResponse {
    pub user: User,
    pub hobbies: Vec<Hobby>,
    /// True when the viewer is looking at their own profile
    pub is_self: bool,
}

#[derive(Debug, Serialize)]
pub struct CommonUserResponse {
    pub success: bool,
    #[serde(flatten)]
    pub common: CommonUser,
}

/// Public profile: the user and their hobbies
pub async fn user_profile(
    State(state): State<AppState>,
    viewer: Option<SessionUser>,
    Path(username): Path<String>,
) -> Result<Json<ProfileResponse>> {
    let user = state
        .accounts
        .find_by_username(username.trim())
        .await?
        .ok_or_else(|| AppError::NotFound(ERR_USER_NOT_FOUND.to_string()))?;

    let hobbies = state.matcher.get_user_hobbies(user.id).await?;
    let is_self = viewer.is_some_and(|v| v.user_id == user.id);

    Ok(Json(ProfileResponse {
        user,
        hobbies,
        is_self,
    }))
}

/// The user sharing the most hobbies with the logged-in user
pub async fn most_common_user(
    State(state): State<AppState>,
    session: SessionUser,
) -> Result<Json<CommonUserResponse>> {
    let common = state.matcher.get_most_common_user(session.user_id).await?;
    Ok(Json(CommonUserResponse {
        success: true,
        common,
    }))
}

/// Same, restricted to users the logged-in user has no one-on-one with
pub async fn most_common_user_never_met(
    State(state): State<AppState>,
    session: SessionUser,
) -> Result<Json<CommonUserResponse>> {
    let common = state
        .matcher
        .get_most_common_user_never_met(session.user_id)
        .await?;
    Ok(Json(CommonUserResponse {
        success: true,
        common,
    }))
}
