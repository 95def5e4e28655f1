//! Integration tests for the Hobby Match Server API
//!
//! These tests verify the complete request/response cycle for all endpoints.

use axum::{
    body::Body,
    http::{header, Request, StatusCode},
    Router,
};
use http_body_util::BodyExt;
use serde_json::Value;
use std::sync::Arc;
use tempfile::TempDir;
use tower::ServiceExt;

use hobby_match_server::similarity::rebuild_relations;
use hobby_match_server::{
    build_router, open_database, AppError, AppState, Config, Db, LexicalSimilarity,
    RelationQueue, SqliteStore, Store,
};

// Test configuration constants
const TEST_SECRET: &str = "test-session-secret";
const TEST_PASSWORD: &str = "correct horse battery staple";
const FUTURE: &str = "2099-01-01T10:00:00";

// =============================================================================
// Test Helpers
// =============================================================================

/// Create a test configuration
fn test_config() -> Config {
    Config {
        server_host: "127.0.0.1".to_string(),
        server_port: 0,
        database_path: "".to_string(), // Set per test
        allowed_origins: vec!["http://localhost:5173".to_string()],
        environment: "test".to_string(),
        session_secret: TEST_SECRET.to_string(),
        session_ttl_secs: 3600,
        popular_page_size: 5,
        similarity_enabled: false,
        similarity_queue_capacity: 16,
    }
}

/// Router plus the store behind it. Keeps the temp directory alive.
struct TestApp {
    _temp_dir: TempDir,
    store: Arc<SqliteStore>,
    router: Router,
}

impl TestApp {
    async fn new() -> Self {
        let temp_dir = TempDir::new().unwrap();
        let db_path = temp_dir.path().join("test.db");
        let store = Arc::new(open_database(&db_path).await.unwrap());

        let mut config = test_config();
        config.database_path = db_path.to_string_lossy().into_owned();

        let db: Db = store.clone();
        let router = build_router(AppState::new(db, config, RelationQueue::disabled()));

        Self {
            _temp_dir: temp_dir,
            store,
            router,
        }
    }

    async fn send(&self, request: Request<Body>) -> (StatusCode, Value) {
        let response = self.router.clone().oneshot(request).await.unwrap();
        let status = response.status();
        (status, body_to_json(response.into_body()).await)
    }

    /// Register and log in, returning (user_id, cookie header value)
    async fn signup(&self, username: &str) -> (i64, String) {
        let (status, body) = self
            .send(make_form_request("/register", &register_form(username)))
            .await;
        assert_eq!(status, StatusCode::OK, "register failed: {}", body);
        let user_id = body["user_id"].as_i64().unwrap();

        let response = self
            .router
            .clone()
            .oneshot(make_form_request(
                "/login",
                &format!("username={}&password={}", username, encode(TEST_PASSWORD)),
            ))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);

        (user_id, session_cookie_from(&response))
    }
}

fn encode(raw: &str) -> String {
    raw.replace(' ', "+")
}

fn register_form(username: &str) -> String {
    format!("username={}&password={}", username, encode(TEST_PASSWORD))
}

/// The `name=value` part of the response's `Set-Cookie` header
fn session_cookie_from(response: &axum::response::Response) -> String {
    response
        .headers()
        .get(header::SET_COOKIE)
        .expect("missing Set-Cookie")
        .to_str()
        .unwrap()
        .split(';')
        .next()
        .unwrap()
        .to_string()
}

/// Parse response body as JSON
async fn body_to_json(body: Body) -> Value {
    let bytes = body.collect().await.unwrap().to_bytes();
    serde_json::from_slice(&bytes).unwrap()
}

/// Create a POST request with a urlencoded form body
fn make_form_request(uri: &str, body: &str) -> Request<Body> {
    Request::builder()
        .method("POST")
        .uri(uri)
        .header("content-type", "application/x-www-form-urlencoded")
        .body(Body::from(body.to_string()))
        .unwrap()
}

/// Create a request carrying an optional session cookie
fn make_request(method: &str, uri: &str, cookie: Option<&str>) -> Request<Body> {
    let mut builder = Request::builder().method(method).uri(uri);
    if let Some(cookie) = cookie {
        builder = builder.header(header::COOKIE, cookie);
    }
    builder.body(Body::empty()).unwrap()
}

// =============================================================================
// Health Check Tests
// =============================================================================

#[tokio::test]
async fn test_health_check_returns_healthy() {
    let app = TestApp::new().await;

    let (status, body) = app.send(make_request("GET", "/health", None)).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "healthy");
    assert_eq!(body["database"], "connected");
    assert!(body["version"].as_str().is_some());
}

// =============================================================================
// Registration & Login Tests
// =============================================================================

#[tokio::test]
async fn test_register_and_duplicate() {
    let app = TestApp::new().await;

    let (status, body) = app
        .send(make_form_request("/register", &register_form("alice")))
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["success"], true);
    assert!(body["user_id"].as_i64().is_some());

    let (status, body) = app
        .send(make_form_request("/register", &register_form("alice")))
        .await;
    assert_eq!(status, StatusCode::CONFLICT);
    assert_eq!(body["success"], false);
    assert!(body["message"].as_str().is_some());
}

#[tokio::test]
async fn test_register_rejects_blank_username() {
    let app = TestApp::new().await;

    let (status, _) = app
        .send(make_form_request("/register", "username=+++&password=pw"))
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_password_is_not_stored_in_plain_text() {
    let app = TestApp::new().await;
    app.signup("alice").await;

    let record = app.store.find_user_by_username("alice").await.unwrap().unwrap();
    assert_ne!(record.password_hash, TEST_PASSWORD);
    assert!(record.password_hash.starts_with("$argon2"));
}

#[tokio::test]
async fn test_login_with_wrong_password() {
    let app = TestApp::new().await;
    app.signup("alice").await;

    let (status, body) = app
        .send(make_form_request("/login", "username=alice&password=nope"))
        .await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(body["success"], false);

    let (status, _) = app
        .send(make_form_request("/login", "username=nobody&password=nope"))
        .await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn test_logout_expires_cookie() {
    let app = TestApp::new().await;

    let response = app
        .router
        .clone()
        .oneshot(make_request("GET", "/logout", None))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let set_cookie = response.headers().get(header::SET_COOKIE).unwrap();
    assert!(set_cookie.to_str().unwrap().contains("Max-Age=0"));
}

#[tokio::test]
async fn test_tampered_session_is_rejected() {
    let app = TestApp::new().await;
    let (user_id, _) = app.signup("alice").await;

    let forged = format!("session={}.9999999999.deadbeef", user_id);
    let (status, _) = app
        .send(make_request("POST", "/add_hobby/chess", Some(&forged)))
        .await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
}

// =============================================================================
// Hobby Tests
// =============================================================================

#[tokio::test]
async fn test_add_hobby_requires_session() {
    let app = TestApp::new().await;

    let (status, body) = app
        .send(make_request("POST", "/add_hobby/chess", None))
        .await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(body["success"], false);
}

#[tokio::test]
async fn test_add_hobby_normalizes_and_rejects_duplicate() {
    let app = TestApp::new().await;
    let (user_id, cookie) = app.signup("alice").await;

    let (status, body) = app
        .send(make_request("POST", "/add_hobby/Chess", Some(&cookie)))
        .await;
    assert_eq!(status, StatusCode::OK);
    let hobby_id = body["hobby_id"].as_i64().unwrap();

    // "chess " normalizes to the same catalog entry
    let (status, _) = app
        .send(make_request("POST", "/add_hobby/chess%20", Some(&cookie)))
        .await;
    assert_eq!(status, StatusCode::CONFLICT);

    let hobby = app.store.find_hobby(hobby_id).await.unwrap().unwrap();
    assert_eq!(hobby.name, "chess");
    assert_eq!(hobby.user_count, 1);
    assert_eq!(app.store.user_hobbies(user_id).await.unwrap().len(), 1);
}

#[tokio::test]
async fn test_add_blank_hobby_is_invalid() {
    let app = TestApp::new().await;
    let (_, cookie) = app.signup("alice").await;

    let (status, _) = app
        .send(make_request("POST", "/add_hobby/%20%20", Some(&cookie)))
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_remove_hobby() {
    let app = TestApp::new().await;
    let (_, alice) = app.signup("alice").await;
    let (_, bob) = app.signup("bob").await;

    let (_, body) = app
        .send(make_request("POST", "/add_hobby/golf", Some(&alice)))
        .await;
    let golf = body["hobby_id"].as_i64().unwrap();
    app.send(make_request("POST", "/add_hobby/golf", Some(&bob)))
        .await;

    let uri = format!("/remove_hobby/{}", golf);
    let (status, body) = app.send(make_request("DELETE", &uri, Some(&alice))).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["success"], true);
    assert_eq!(app.store.find_hobby(golf).await.unwrap().unwrap().user_count, 1);

    // Removing again is an error and leaves the counter alone
    let (status, _) = app.send(make_request("DELETE", &uri, Some(&alice))).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(app.store.find_hobby(golf).await.unwrap().unwrap().user_count, 1);
}

#[tokio::test]
async fn test_popular_hobbies_pages() {
    let app = TestApp::new().await;
    let (_, alice) = app.signup("alice").await;
    let (_, bob) = app.signup("bob").await;

    for i in 0..7 {
        let uri = format!("/add_hobby/hobby{}", i);
        app.send(make_request("POST", &uri, Some(&alice))).await;
    }
    app.send(make_request("POST", "/add_hobby/hobby3", Some(&bob)))
        .await;

    let (status, body) = app
        .send(make_request("GET", "/popular_hobbies/1", None))
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["total_pages"], 2);
    assert_eq!(body["start"], 1);
    let hobbies = body["hobbies"].as_array().unwrap();
    assert_eq!(hobbies.len(), 5);
    assert_eq!(hobbies[0]["name"], "hobby3");
    assert_eq!(hobbies[0]["user_count"], 2);

    let (_, body) = app
        .send(make_request("GET", "/popular_hobbies/2", None))
        .await;
    assert_eq!(body["start"], 6);
    assert_eq!(body["hobbies"].as_array().unwrap().len(), 2);

    let (status, _) = app
        .send(make_request("GET", "/popular_hobbies/0", None))
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_hobby_detail_with_members_and_related() {
    let app = TestApp::new().await;
    let (_, alice) = app.signup("alice").await;
    let (_, bob) = app.signup("bob").await;

    let (_, body) = app
        .send(make_request("POST", "/add_hobby/rock%20climbing", Some(&alice)))
        .await;
    let climbing = body["hobby_id"].as_i64().unwrap();
    app.send(make_request("POST", "/add_hobby/rock%20climbing", Some(&bob)))
        .await;
    app.send(make_request("POST", "/add_hobby/ice%20climbing", Some(&bob)))
        .await;
    app.send(make_request("POST", "/add_hobby/knitting", Some(&bob)))
        .await;

    rebuild_relations(app.store.as_ref(), Arc::new(LexicalSimilarity))
        .await
        .unwrap();

    let (status, body) = app
        .send(make_request("GET", &format!("/hobby/{}", climbing), None))
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["hobby"]["name"], "rock climbing");
    assert_eq!(body["members"].as_array().unwrap().len(), 2);

    let related = body["related"].as_array().unwrap();
    assert!(related.iter().any(|r| r["name"] == "ice climbing"));
    assert!(related.iter().all(|r| r["name"] != "knitting"));

    let (status, _) = app.send(make_request("GET", "/hobby/9999", None)).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

// =============================================================================
// Profile & Matching Tests
// =============================================================================

#[tokio::test]
async fn test_user_profile() {
    let app = TestApp::new().await;
    let (alice_id, alice) = app.signup("alice").await;
    let (_, bob) = app.signup("bob").await;
    app.send(make_request("POST", "/add_hobby/chess", Some(&alice)))
        .await;

    let (status, body) = app
        .send(make_request("GET", "/user/alice", Some(&alice)))
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["user"]["id"], alice_id);
    assert_eq!(body["hobbies"][0]["name"], "chess");
    assert_eq!(body["is_self"], true);
    assert!(body["user"].get("password_hash").is_none());

    let (_, body) = app.send(make_request("GET", "/user/alice", Some(&bob))).await;
    assert_eq!(body["is_self"], false);

    let (status, body) = app.send(make_request("GET", "/user/alice", None)).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["is_self"], false);

    let (status, _) = app.send(make_request("GET", "/user/nobody", None)).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_most_common_user_and_never_met() {
    let app = TestApp::new().await;
    let (_, alice) = app.signup("alice").await;
    let (bob_id, bob) = app.signup("bob").await;
    let (carol_id, carol) = app.signup("carol").await;

    for name in ["chess", "golf", "tennis"] {
        let uri = format!("/add_hobby/{}", name);
        app.send(make_request("POST", &uri, Some(&alice))).await;
        app.send(make_request("POST", &uri, Some(&bob))).await;
    }
    app.send(make_request("POST", "/add_hobby/chess", Some(&carol)))
        .await;

    let (status, body) = app
        .send(make_request("GET", "/most_common_user", Some(&alice)))
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["success"], true);
    assert_eq!(body["user"]["id"], bob_id);
    assert_eq!(body["shared_hobbies"], 3);

    let uri = format!("/schedule_one_on_one/{}/{}", bob_id, FUTURE);
    let (status, _) = app.send(make_request("POST", &uri, Some(&alice))).await;
    assert_eq!(status, StatusCode::OK);

    let (_, body) = app
        .send(make_request("GET", "/most_common_user_never_met", Some(&alice)))
        .await;
    assert_eq!(body["user"]["id"], carol_id);
    assert_eq!(body["shared_hobbies"], 1);

    // Without a session both are 401
    let (status, _) = app
        .send(make_request("GET", "/most_common_user", None))
        .await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn test_most_common_user_without_overlap() {
    let app = TestApp::new().await;
    let (_, alice) = app.signup("alice").await;
    let (_, bob) = app.signup("bob").await;
    app.send(make_request("POST", "/add_hobby/chess", Some(&alice)))
        .await;
    app.send(make_request("POST", "/add_hobby/golf", Some(&bob)))
        .await;

    let (status, body) = app
        .send(make_request("GET", "/most_common_user", Some(&alice)))
        .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["success"], false);
}

// =============================================================================
// One-on-one Tests
// =============================================================================

#[tokio::test]
async fn test_schedule_in_past_is_rejected() {
    let app = TestApp::new().await;
    let (_, alice) = app.signup("alice").await;
    let (bob_id, _) = app.signup("bob").await;

    let uri = format!("/schedule_one_on_one/{}/2001-01-01T10:00:00", bob_id);
    let (status, body) = app.send(make_request("POST", &uri, Some(&alice))).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["success"], false);

    let uri = format!("/schedule_one_on_one/{}/next-tuesday", bob_id);
    let (status, _) = app.send(make_request("POST", &uri, Some(&alice))).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_schedule_list_and_cancel() {
    let app = TestApp::new().await;
    let (alice_id, alice) = app.signup("alice").await;
    let (bob_id, bob) = app.signup("bob").await;
    let (_, mallory) = app.signup("mallory").await;

    // Explicit offset: 12:00+02:00 is 10:00 UTC
    let uri = format!(
        "/schedule_one_on_one/{}/2099-01-01T12:00:00%2B02:00",
        bob_id
    );
    let (status, body) = app.send(make_request("POST", &uri, Some(&alice))).await;
    assert_eq!(status, StatusCode::OK);
    let meeting_id = body["meeting_id"].as_i64().unwrap();

    let list_uri = format!("/get_user_one_on_ones/{}", bob_id);
    let (status, body) = app.send(make_request("GET", &list_uri, Some(&bob))).await;
    assert_eq!(status, StatusCode::OK);
    let meetings = body["one_on_ones"].as_array().unwrap();
    assert_eq!(meetings.len(), 1);
    assert_eq!(meetings[0]["meeting_id"], meeting_id);
    assert_eq!(meetings[0]["partner"]["id"], alice_id);
    assert!(meetings[0]["date"].as_str().unwrap().starts_with("2099-01-01T10:00:00"));

    let cancel_uri = format!("/cancel_one_on_one/{}", meeting_id);
    let (status, _) = app
        .send(make_request("DELETE", &cancel_uri, Some(&mallory)))
        .await;
    assert_eq!(status, StatusCode::FORBIDDEN);

    let (status, body) = app
        .send(make_request("DELETE", &cancel_uri, Some(&bob)))
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["success"], true);

    let (_, body) = app.send(make_request("GET", &list_uri, Some(&bob))).await;
    assert!(body["one_on_ones"].as_array().unwrap().is_empty());

    let (status, _) = app
        .send(make_request("DELETE", &cancel_uri, Some(&alice)))
        .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_schedule_with_unknown_user() {
    let app = TestApp::new().await;
    let (_, alice) = app.signup("alice").await;

    let uri = format!("/schedule_one_on_one/9999/{}", FUTURE);
    let (status, _) = app.send(make_request("POST", &uri, Some(&alice))).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

// =============================================================================
// Maintenance Tests
// =============================================================================

#[tokio::test]
async fn test_recount_hobbies() {
    let app = TestApp::new().await;
    let (_, alice) = app.signup("alice").await;
    let (_, body) = app
        .send(make_request("POST", "/add_hobby/chess", Some(&alice)))
        .await;
    let chess = body["hobby_id"].as_i64().unwrap();

    // Simulate drift
    sqlx::query("UPDATE hobbies SET user_count = 42 WHERE id = ?")
        .bind(chess)
        .execute(app.store.pool())
        .await
        .unwrap();

    let (status, _) = app.send(make_request("GET", "/recount_hobbies", None)).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);

    let (status, body) = app
        .send(make_request("GET", "/recount_hobbies", Some(&alice)))
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["corrected"], 1);
    assert_eq!(app.store.find_hobby(chess).await.unwrap().unwrap().user_count, 1);
}

// =============================================================================
// Concurrency Tests
// =============================================================================

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn test_concurrent_adds_keep_count_exact() {
    let app = TestApp::new().await;

    let mut users = Vec::new();
    for i in 0..8 {
        let user = app
            .store
            .insert_user(&format!("user{}", i), "hash", None)
            .await
            .unwrap();
        users.push(user.id);
    }

    let mut handles = Vec::new();
    for user_id in users {
        let store = app.store.clone();
        handles.push(tokio::spawn(async move {
            store.add_hobby_to_user(user_id, "chess").await
        }));
    }

    let mut created = 0;
    for handle in handles {
        if handle.await.unwrap().unwrap().created {
            created += 1;
        }
    }
    assert_eq!(created, 1);

    let chess = app.store.find_hobby_by_name("chess").await.unwrap().unwrap();
    assert_eq!(chess.user_count, 8);
    assert_eq!(app.store.count_hobbies().await.unwrap(), 1);
    assert_eq!(app.store.recount_hobbies().await.unwrap(), 0);
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn test_same_pair_concurrent_adds_succeed_once() {
    let app = TestApp::new().await;
    let alice = app.store.insert_user("alice", "hash", None).await.unwrap().id;

    let mut handles = Vec::new();
    for _ in 0..16 {
        let store = app.store.clone();
        handles.push(tokio::spawn(async move {
            store.add_hobby_to_user(alice, "chess").await
        }));
    }

    let mut succeeded = 0;
    for handle in handles {
        match handle.await.unwrap() {
            Ok(_) => succeeded += 1,
            Err(err) => assert!(matches!(err, AppError::Conflict(_)), "{:?}", err),
        }
    }
    assert_eq!(succeeded, 1);

    let chess = app.store.find_hobby_by_name("chess").await.unwrap().unwrap();
    assert_eq!(chess.user_count, 1);
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn test_inserts_visible_to_every_pool_connection() {
    let app = TestApp::new().await;
    let when = chrono::Utc::now() + chrono::Duration::days(1);

    let mut users = Vec::new();
    let mut meetings = Vec::new();
    for i in 0..20 {
        let user = app
            .store
            .insert_user(&format!("user{}", i), "hash", None)
            .await
            .unwrap();
        if let Some(previous) = users.last() {
            let meeting = app
                .store
                .insert_one_on_one(user.id, *previous, when)
                .await
                .unwrap();
            meetings.push(meeting.id);
        }
        users.push(user.id);
    }

    // Concurrent readers check out different connections from the pool
    let mut handles = Vec::new();
    for _ in 0..4 {
        let store = app.store.clone();
        let meetings = meetings.clone();
        handles.push(tokio::spawn(async move {
            let mut missing = 0;
            for i in 0..20 {
                let name = format!("user{}", i);
                if store.find_user_by_username(&name).await.unwrap().is_none() {
                    missing += 1;
                }
            }
            for id in meetings {
                if store.find_one_on_one(id).await.unwrap().is_none() {
                    missing += 1;
                }
            }
            missing
        }));
    }

    for handle in handles {
        assert_eq!(handle.await.unwrap(), 0);
    }
}

#[tokio::test]
async fn test_repeated_signups_can_always_log_in() {
    let app = TestApp::new().await;

    // signup asserts that login succeeds right after registration
    for i in 0..10 {
        app.signup(&format!("user{}", i)).await;
    }
}

// =============================================================================
// Malformed Input Tests
// =============================================================================

#[tokio::test]
async fn test_malformed_path_ids_get_json_errors() {
    let app = TestApp::new().await;
    let (_, alice) = app.signup("alice").await;

    let schedule_uri = format!("/schedule_one_on_one/abc/{}", FUTURE);
    let requests = [
        ("DELETE", "/remove_hobby/abc"),
        ("DELETE", "/cancel_one_on_one/xyz"),
        ("POST", schedule_uri.as_str()),
        ("GET", "/get_user_one_on_ones/nope"),
    ];

    for (method, uri) in requests {
        let (status, body) = app.send(make_request(method, uri, Some(&alice))).await;
        assert_eq!(status, StatusCode::BAD_REQUEST, "{} {}", method, uri);
        assert_eq!(body["success"], false);
        assert!(body["message"].as_str().is_some());
    }

    let (status, body) = app.send(make_request("GET", "/hobby/abc", None)).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["success"], false);
}

#[tokio::test]
async fn test_malformed_forms_get_json_errors() {
    let app = TestApp::new().await;

    // Missing password field
    let (status, body) = app
        .send(make_form_request("/register", "username=alice"))
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["success"], false);

    // Wrong content type
    let request = Request::builder()
        .method("POST")
        .uri("/login")
        .header("content-type", "application/json")
        .body(Body::from(r#"{"username":"alice","password":"pw"}"#))
        .unwrap();
    let (status, body) = app.send(request).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["success"], false);
}
