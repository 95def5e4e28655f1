use axum::{
    async_trait,
    extract::FromRequestParts,
    http::{header, request::Parts, HeaderMap},
};
use chrono::Utc;

use crate::constants::SESSION_COOKIE_NAME;
use crate::error::AppError;
use crate::security::{issue_session_token, verify_session_token};
use crate::AppState;

/// The logged-in user, resolved from the signed session cookie.
///
/// Handlers taking `SessionUser` reject anonymous requests with 401;
/// `Option<SessionUser>` makes the session optional.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SessionUser {
    pub user_id: i64,
}

#[async_trait]
impl FromRequestParts<AppState> for SessionUser {
    type Rejection = AppError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let token = session_cookie(&parts.headers).ok_or(AppError::Unauthorized)?;
        let user_id = verify_session_token(
            token,
            &state.config.session_secret,
            Utc::now().timestamp(),
        )
        .ok_or(AppError::Unauthorized)?;

        Ok(SessionUser { user_id })
    }
}

/// Extract the session token from the `Cookie` header(s)
pub fn session_cookie(headers: &HeaderMap) -> Option<&str> {
    headers
        .get_all(header::COOKIE)
        .iter()
        .filter_map(|value| value.to_str().ok())
        .flat_map(|value| value.split(';'))
        .filter_map(|pair| pair.trim().split_once('='))
        .find(|(name, _)| *name == SESSION_COOKIE_NAME)
        .map(|(_, value)| value)
        .filter(|value| !value.is_empty())
}

/// `Set-Cookie` value starting a session for `user_id`
pub fn session_set_cookie(user_id: i64, secret: &str, ttl_secs: i64) -> Option<String> {
    let expires_at = Utc::now().timestamp() + ttl_secs;
    let token = issue_session_token(user_id, expires_at, secret)?;
    Some(format!(
        "{}={}; Path=/; HttpOnly; SameSite=Lax; Max-Age={}",
        SESSION_COOKIE_NAME, token, ttl_secs
    ))
}

/// `Set-Cookie` value clearing the session
pub fn session_clear_cookie() -> String {
    format!(
        "{}=; Path=/; HttpOnly; SameSite=Lax; Max-Age=0",
        SESSION_COOKIE_NAME
    )
}
