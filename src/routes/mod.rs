pub mod admin;
pub mod auth;
pub mod extract;
pub mod health;
pub mod hobbies;
pub mod meetings;
pub mod session;
pub mod users;
pub mod validation;

pub use admin::recount_hobbies;
pub use auth::{login, logout, register_user};
pub use health::health_check;
pub use hobbies::{add_hobby, hobby_detail, popular_hobbies, remove_hobby};
pub use meetings::{cancel_one_on_one, get_user_one_on_ones, schedule_one_on_one};
pub use session::SessionUser;
pub use users::{most_common_user, most_common_user_never_met, user_profile};
pub use validation::{parse_meeting_datetime, parse_page};

use axum::{
    http::{HeaderValue, Method},
    routing::{delete, get, post},
    Router,
};
use tower_http::cors::{AllowOrigin, CorsLayer};
use tower_http::trace::TraceLayer;

use crate::AppState;

/// Build the application router with CORS and request tracing
pub fn build_router(state: AppState) -> Router {
    let origins: Vec<HeaderValue> = state
        .config
        .allowed_origins
        .iter()
        .filter_map(|origin| match origin.parse() {
            Ok(value) => Some(value),
            Err(_) => {
                tracing::warn!("Ignoring invalid CORS origin: {}", origin);
                None
            }
        })
        .collect();

    // Cookies need explicit origins; credentials cannot be combined with `Any`
    let cors = CorsLayer::new()
        .allow_origin(AllowOrigin::list(origins))
        .allow_methods([Method::GET, Method::POST, Method::DELETE])
        .allow_headers([axum::http::header::CONTENT_TYPE])
        .allow_credentials(true);

    Router::new()
        .route("/health", get(health_check))
        .route("/register", post(register_user))
        .route("/login", post(login))
        .route("/logout", get(logout))
        .route("/add_hobby/:name", post(add_hobby))
        .route("/remove_hobby/:id", delete(remove_hobby))
        .route("/popular_hobbies/:page", get(popular_hobbies))
        .route("/hobby/:id", get(hobby_detail))
        .route("/user/:username", get(user_profile))
        .route("/most_common_user", get(most_common_user))
        .route("/most_common_user_never_met", get(most_common_user_never_met))
        .route(
            "/schedule_one_on_one/:user_id/:datetime",
            post(schedule_one_on_one),
        )
        .route("/cancel_one_on_one/:id", delete(cancel_one_on_one))
        .route("/get_user_one_on_ones/:user_id", get(get_user_one_on_ones))
        .route("/recount_hobbies", get(recount_hobbies))
        .layer(TraceLayer::new_for_http())
        .layer(cors)
        .with_state(state)
}
