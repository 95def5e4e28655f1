use axum::{extract::State, http::header, response::IntoResponse, Json};
use serde::{Deserialize, Serialize};

use crate::error::{AppError, Result};
use crate::routes::extract::Form;
use crate::routes::session::{session_clear_cookie, session_set_cookie};
use crate::AppState;

#[derive(Debug, Deserialize)]
pub struct RegisterForm {
    pub username: String,
    pub password: String,
    #[serde(default)]
    pub email: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct RegisterResponse {
    pub success: bool,
    pub user_id: i64,
}

#[derive(Debug, Deserialize)]
pub struct LoginForm {
    pub username: String,
    pub password: String,
}

#[derive(Debug, Serialize)]
pub struct LoginResponse {
    pub success: bool,
    pub username: String,
}

/// Register a new user
///
/// Usernames are trimmed and must be unique; only the Argon2 hash of the
/// password is stored.
///
/// Returns 409 Conflict if the username already exists.
pub async fn register_user(
    State(state): State<AppState>,
    Form(form): Form<RegisterForm>,
) -> Result<Json<RegisterResponse>> {
    let user = state
        .accounts
        .add_user(&form.username, &form.password, form.email.as_deref())
        .await?;

    Ok(Json(RegisterResponse {
        success: true,
        user_id: user.id,
    }))
}

/// Log in with username and password
///
/// On success sets a signed `session` cookie valid for `SESSION_TTL_SECS`.
/// Unknown user and wrong password are indistinguishable (401).
pub async fn login(
    State(state): State<AppState>,
    Form(form): Form<LoginForm>,
) -> Result<impl IntoResponse> {
    let user = state
        .accounts
        .authenticate(form.username.trim(), &form.password)
        .await?
        .ok_or(AppError::InvalidCredentials)?;

    let cookie = session_set_cookie(
        user.id,
        &state.config.session_secret,
        state.config.session_ttl_secs,
    )
    .ok_or_else(|| AppError::Session("failed to sign session token".to_string()))?;

    tracing::info!("User {} logged in", user.id);

    Ok((
        [(header::SET_COOKIE, cookie)],
        Json(LoginResponse {
            success: true,
            username: user.username,
        }),
    ))
}

/// Log out by expiring the session cookie. Always succeeds.
pub async fn logout() -> impl IntoResponse {
    (
        [(header::SET_COOKIE, session_clear_cookie())],
        Json(serde_json::json!({ "success": true })),
    )
}
