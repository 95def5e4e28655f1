use axum::{extract::State, Json};
use serde::Serialize;
use serde_json::{json, Value};

use crate::error::Result;
use crate::routes::extract::Path;
use crate::routes::validation::parse_page;
use crate::routes::SessionUser;
use crate::services::{HobbyDetail, PopularPage};
use crate::AppState;

#[derive(Debug, Serialize)]
pub struct AddHobbyResponse {
    pub success: bool,
    pub hobby_id: i64,
}

/// Add a hobby to the logged-in user
///
/// The name is trimmed and lowercased, so "Chess" and "chess " are the same
/// hobby. Returns 409 Conflict if the user already holds it.
pub async fn add_hobby(
    State(state): State<AppState>,
    session: SessionUser,
    Path(name): Path<String>,
) -> Result<Json<AddHobbyResponse>> {
    let hobby = state
        .catalog
        .add_hobby_to_user(session.user_id, &name)
        .await?;

    Ok(Json(AddHobbyResponse {
        success: true,
        hobby_id: hobby.id,
    }))
}

/// Remove a hobby from the logged-in user
pub async fn remove_hobby(
    State(state): State<AppState>,
    session: SessionUser,
    Path(hobby_id): Path<i64>,
) -> Result<Json<Value>> {
    state
        .catalog
        .remove_hobby_from_user(session.user_id, hobby_id)
        .await?;

    Ok(Json(json!({ "success": true })))
}

/// Hobbies ranked by number of users, one page at a time
pub async fn popular_hobbies(
    State(state): State<AppState>,
    Path(page): Path<String>,
) -> Result<Json<PopularPage>> {
    let page = parse_page(&page)?;
    Ok(Json(state.popularity.page(page).await?))
}

pub async fn hobby_detail(
    State(state): State<AppState>,
    Path(hobby_id): Path<i64>,
) -> Result<Json<HobbyDetail>> {
    Ok(Json(state.catalog.hobby_detail(hobby_id).await?))
}
