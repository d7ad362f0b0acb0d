//! HTTP integration tests.
//!
//! The full router runs against an in-memory SQLite database and an
//! in-process session store, driven request by request with `oneshot`.

use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use axum::{
    body::{to_bytes, Body},
    http::{header, HeaderMap, Method, Request, StatusCode},
    Router,
};
use sea_orm::{ConnectOptions, Database as SeaDatabase};
use serde_json::{json, Value};
use tower::ServiceExt;

use task_manager::api::{create_router, AppState};
use task_manager::config::{Config, CSRF_HEADER_NAME, SESSION_COOKIE_NAME};
use task_manager::errors::AppResult;
use task_manager::infra::{Database, SessionData, SessionStore};

// =============================================================================
// Test Infrastructure
// =============================================================================

/// Session store kept in process memory
#[derive(Default)]
struct MemorySessionStore {
    records: Mutex<HashMap<String, SessionData>>,
}

impl MemorySessionStore {
    fn contains(&self, token: &str) -> bool {
        self.records.lock().unwrap().contains_key(token)
    }
}

#[async_trait]
impl SessionStore for MemorySessionStore {
    async fn load(&self, token: &str) -> AppResult<Option<SessionData>> {
        Ok(self.records.lock().unwrap().get(token).cloned())
    }

    async fn save(&self, token: &str, data: &SessionData, _ttl_seconds: u64) -> AppResult<()> {
        self.records
            .lock()
            .unwrap()
            .insert(token.to_string(), data.clone());
        Ok(())
    }

    async fn destroy(&self, token: &str) -> AppResult<()> {
        self.records.lock().unwrap().remove(token);
        Ok(())
    }

    async fn ping(&self) -> AppResult<()> {
        Ok(())
    }
}

async fn test_app() -> (Router, Arc<MemorySessionStore>) {
    let mut options = ConnectOptions::new("sqlite::memory:");
    options.max_connections(1).sqlx_logging(false);
    let connection = SeaDatabase::connect(options).await.unwrap();

    let database = Database::from_connection(connection);
    database.run_migrations().await.unwrap();

    let sessions = Arc::new(MemorySessionStore::default());
    let config = Config {
        cookie_secure: false,
        ..Config::default()
    };

    let state = AppState::from_config(Arc::new(database), sessions.clone(), config).unwrap();
    (create_router(state), sessions)
}

/// A browser-like client: keeps the session cookie and echoes the CSRF token
struct Client {
    app: Router,
    cookie: Option<String>,
    csrf: Option<String>,
}

struct TestResponse {
    status: StatusCode,
    headers: HeaderMap,
    body: Value,
}

impl Client {
    fn new(app: &Router) -> Self {
        Self {
            app: app.clone(),
            cookie: None,
            csrf: None,
        }
    }

    async fn send(&mut self, method: Method, uri: &str, body: Option<Value>) -> TestResponse {
        let mut builder = Request::builder().method(method).uri(uri);
        if let Some(cookie) = &self.cookie {
            builder = builder.header(header::COOKIE, cookie);
        }
        if let Some(csrf) = &self.csrf {
            builder = builder.header(CSRF_HEADER_NAME, csrf);
        }

        let request = match body {
            Some(json) => builder
                .header(header::CONTENT_TYPE, "application/json")
                .body(Body::from(json.to_string()))
                .unwrap(),
            None => builder.body(Body::empty()).unwrap(),
        };

        let response = self.app.clone().oneshot(request).await.unwrap();
        let status = response.status();
        let headers = response.headers().clone();

        if let Some(set_cookie) = headers.get(header::SET_COOKIE) {
            let pair = set_cookie.to_str().unwrap().split(';').next().unwrap();
            self.cookie = Some(pair.to_string());
        }

        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        let body = serde_json::from_slice(&bytes)
            .unwrap_or_else(|_| Value::String(String::from_utf8_lossy(&bytes).into_owned()));

        TestResponse {
            status,
            headers,
            body,
        }
    }

    async fn get(&mut self, uri: &str) -> TestResponse {
        self.send(Method::GET, uri, None).await
    }

    async fn post(&mut self, uri: &str, body: Value) -> TestResponse {
        self.send(Method::POST, uri, Some(body)).await
    }

    async fn put(&mut self, uri: &str, body: Value) -> TestResponse {
        self.send(Method::PUT, uri, Some(body)).await
    }

    async fn delete(&mut self, uri: &str) -> TestResponse {
        self.send(Method::DELETE, uri, None).await
    }

    fn session_token(&self) -> Option<String> {
        self.cookie
            .as_deref()
            .and_then(|pair| pair.strip_prefix(&format!("{SESSION_COOKIE_NAME}=")))
            .map(str::to_string)
    }

    /// Obtain a session and its CSRF token
    async fn start_session(&mut self) {
        let response = self.get("/auth/csrf").await;
        assert_eq!(response.status, StatusCode::OK);
        self.csrf = Some(response.body["csrf_token"].as_str().unwrap().to_string());
    }

    async fn register(&mut self, email: &str) -> i32 {
        let response = self
            .post(
                "/auth/register",
                json!({
                    "first_name": "Test",
                    "last_name": "User",
                    "email": email,
                    "password": "secret123"
                }),
            )
            .await;
        assert_eq!(response.status, StatusCode::CREATED, "{:?}", response.body);
        response.body["id"].as_i64().unwrap() as i32
    }

    async fn login(&mut self, email: &str) -> i32 {
        let response = self
            .post(
                "/auth/login",
                json!({ "email": email, "password": "secret123" }),
            )
            .await;
        assert_eq!(response.status, StatusCode::OK, "{:?}", response.body);
        self.csrf = Some(response.body["csrf_token"].as_str().unwrap().to_string());
        response.body["user_id"].as_i64().unwrap() as i32
    }

    /// Fresh session, register and log in
    async fn sign_up(&mut self, email: &str) -> i32 {
        self.start_session().await;
        self.register(email).await;
        self.login(email).await
    }

    async fn create_workspace(&mut self, title: &str) -> i64 {
        let response = self
            .post(
                "/workspaces",
                json!({ "title": title, "description": "Shared work" }),
            )
            .await;
        assert_eq!(response.status, StatusCode::CREATED, "{:?}", response.body);
        response.body["id"].as_i64().unwrap()
    }

    async fn create_task(&mut self, workspace_id: i64, title: &str, priority: &str) -> i64 {
        let response = self
            .post(
                &format!("/workspaces/{workspace_id}/tasks"),
                json!({ "title": title, "content": "Details", "priority": priority }),
            )
            .await;
        assert_eq!(response.status, StatusCode::CREATED, "{:?}", response.body);
        response.body["id"].as_i64().unwrap()
    }
}

// =============================================================================
// Health & Headers
// =============================================================================

#[tokio::test]
async fn test_ping_and_health() {
    let (app, _) = test_app().await;
    let mut client = Client::new(&app);

    let ping = client.get("/ping").await;
    assert_eq!(ping.status, StatusCode::OK);
    assert_eq!(ping.body, Value::String("OK".to_string()));

    let health = client.get("/health").await;
    assert_eq!(health.status, StatusCode::OK);
    assert_eq!(health.body["status"], "healthy");
}

#[tokio::test]
async fn test_security_headers_on_every_response() {
    let (app, _) = test_app().await;
    let mut client = Client::new(&app);

    for uri in ["/ping", "/does-not-exist"] {
        let response = client.get(uri).await;
        assert_eq!(response.headers["x-content-type-options"], "nosniff");
        assert_eq!(response.headers["x-frame-options"], "deny");
        assert_eq!(response.headers["x-xss-protection"], "0");
        assert_eq!(response.headers["referrer-policy"], "origin-when-cross-origin");
        assert!(response.headers.contains_key("content-security-policy"));
    }
}

// =============================================================================
// Authentication
// =============================================================================

#[tokio::test]
async fn test_post_without_csrf_token_is_rejected() {
    let (app, _) = test_app().await;
    let mut client = Client::new(&app);

    let response = client
        .post(
            "/auth/register",
            json!({
                "first_name": "Test",
                "last_name": "User",
                "email": "alice@example.com",
                "password": "secret123"
            }),
        )
        .await;

    assert_eq!(response.status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_post_with_wrong_csrf_token_is_rejected() {
    let (app, _) = test_app().await;
    let mut client = Client::new(&app);
    client.start_session().await;
    client.csrf = Some("forged".to_string());

    let response = client
        .post("/auth/login", json!({ "email": "a@example.com", "password": "secret123" }))
        .await;

    assert_eq!(response.status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_register_validation_and_duplicates() {
    let (app, _) = test_app().await;
    let mut client = Client::new(&app);
    client.start_session().await;

    let invalid = client
        .post(
            "/auth/register",
            json!({
                "first_name": " ",
                "last_name": "User",
                "email": "not-an-email",
                "password": "123"
            }),
        )
        .await;
    assert_eq!(invalid.status, StatusCode::UNPROCESSABLE_ENTITY);

    client.register("alice@example.com").await;

    let duplicate = client
        .post(
            "/auth/register",
            json!({
                "first_name": "Other",
                "last_name": "Alice",
                "email": "alice@example.com",
                "password": "secret123"
            }),
        )
        .await;
    assert_eq!(duplicate.status, StatusCode::CONFLICT);
}

#[tokio::test]
async fn test_bad_credentials_look_the_same() {
    let (app, _) = test_app().await;
    let mut client = Client::new(&app);
    client.start_session().await;
    client.register("alice@example.com").await;

    let wrong_password = client
        .post(
            "/auth/login",
            json!({ "email": "alice@example.com", "password": "wrong-password" }),
        )
        .await;
    let unknown_email = client
        .post(
            "/auth/login",
            json!({ "email": "nobody@example.com", "password": "secret123" }),
        )
        .await;

    assert_eq!(wrong_password.status, StatusCode::UNAUTHORIZED);
    assert_eq!(unknown_email.status, StatusCode::UNAUTHORIZED);
    assert_eq!(wrong_password.body, unknown_email.body);
}

#[tokio::test]
async fn test_login_renews_session() {
    let (app, sessions) = test_app().await;
    let mut client = Client::new(&app);
    client.start_session().await;
    client.register("alice@example.com").await;

    let anonymous_token = client.session_token().unwrap();
    let anonymous_csrf = client.csrf.clone().unwrap();
    assert!(sessions.contains(&anonymous_token));

    client.login("alice@example.com").await;

    let authenticated_token = client.session_token().unwrap();
    assert_ne!(authenticated_token, anonymous_token);
    assert_ne!(client.csrf.clone().unwrap(), anonymous_csrf);
    assert!(!sessions.contains(&anonymous_token));
    assert!(sessions.contains(&authenticated_token));

    let logout = client.post("/auth/logout", json!({})).await;
    assert_eq!(logout.status, StatusCode::OK);
    assert_ne!(client.session_token().unwrap(), authenticated_token);
    assert!(!sessions.contains(&authenticated_token));

    let after_logout = client.get("/workspaces").await;
    assert_eq!(after_logout.status, StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn test_protected_routes_need_login() {
    let (app, _) = test_app().await;
    let mut client = Client::new(&app);

    let response = client.get("/workspaces").await;
    assert_eq!(response.status, StatusCode::UNAUTHORIZED);

    let response = client.get("/tasks/1").await;
    assert_eq!(response.status, StatusCode::UNAUTHORIZED);
}

// =============================================================================
// Workspaces & Tasks
// =============================================================================

#[tokio::test]
async fn test_workspace_and_task_flow() {
    let (app, _) = test_app().await;
    let mut alice = Client::new(&app);
    let alice_id = alice.sign_up("alice@example.com").await;

    let workspace_id = alice.create_workspace("Platform").await;

    let overview = alice.get("/workspaces").await;
    assert_eq!(overview.status, StatusCode::OK);
    assert_eq!(overview.headers[header::CACHE_CONTROL], "no-store");
    assert_eq!(overview.body["owned"].as_array().unwrap().len(), 1);
    assert_eq!(overview.body["invited"].as_array().unwrap().len(), 0);
    assert_eq!(overview.body["can_create"], true);

    let detail = alice.get(&format!("/workspaces/{workspace_id}")).await;
    assert_eq!(detail.status, StatusCode::OK);
    assert_eq!(detail.body["is_admin"], true);
    assert_eq!(detail.body["members"][0]["id"], alice_id);
    assert_eq!(detail.body["members"][0]["role"], "ADMIN");

    let alpha = alice.create_task(workspace_id, "Alpha", "LOW").await;
    let beta = alice.create_task(workspace_id, "Beta", "HIGH").await;

    let completed = alice
        .put(
            &format!("/tasks/{beta}"),
            json!({
                "title": "Beta",
                "content": "Details",
                "priority": "HIGH",
                "user_id": alice_id,
                "status": "Completed"
            }),
        )
        .await;
    assert_eq!(completed.status, StatusCode::OK);
    assert!(!completed.body["finished"].is_null());

    let filtered = alice
        .get(&format!("/workspaces/{workspace_id}/tasks?title=Al&sort=asc"))
        .await;
    assert_eq!(filtered.status, StatusCode::OK);
    assert_eq!(filtered.body["meta"]["total"], 1);
    assert_eq!(filtered.body["data"][0]["id"], alpha);

    let high = alice
        .get(&format!("/workspaces/{workspace_id}/tasks?priority=HIGH"))
        .await;
    assert_eq!(high.body["meta"]["total"], 1);

    let task = alice.get(&format!("/tasks/{alpha}")).await;
    assert_eq!(task.status, StatusCode::OK);
    assert_eq!(task.body["task"]["status"], "To Do");
    assert_eq!(task.body["assignee"]["id"], alice_id);
    assert_eq!(task.body["can_delete"], true);

    let deleted = alice.delete(&format!("/workspaces/{workspace_id}")).await;
    assert_eq!(deleted.status, StatusCode::NO_CONTENT);

    let gone = alice.get(&format!("/tasks/{alpha}")).await;
    assert_eq!(gone.status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_task_validation() {
    let (app, _) = test_app().await;
    let mut alice = Client::new(&app);
    alice.sign_up("alice@example.com").await;
    let workspace_id = alice.create_workspace("Platform").await;

    let response = alice
        .post(
            &format!("/workspaces/{workspace_id}/tasks"),
            json!({ "title": "", "content": "Details", "priority": "URGENT" }),
        )
        .await;
    assert_eq!(response.status, StatusCode::UNPROCESSABLE_ENTITY);

    let malformed = alice
        .post(&format!("/workspaces/{workspace_id}/tasks"), json!({ "title": 5 }))
        .await;
    assert_eq!(malformed.status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_non_members_get_not_found() {
    let (app, _) = test_app().await;
    let mut alice = Client::new(&app);
    alice.sign_up("alice@example.com").await;
    let workspace_id = alice.create_workspace("Private").await;
    let task_id = alice.create_task(workspace_id, "Secret", "LOW").await;

    let mut mallory = Client::new(&app);
    mallory.sign_up("mallory@example.com").await;

    assert_eq!(
        mallory.get(&format!("/workspaces/{workspace_id}")).await.status,
        StatusCode::NOT_FOUND
    );
    assert_eq!(
        mallory
            .get(&format!("/workspaces/{workspace_id}/tasks"))
            .await
            .status,
        StatusCode::NOT_FOUND
    );
    assert_eq!(
        mallory.get(&format!("/tasks/{task_id}")).await.status,
        StatusCode::NOT_FOUND
    );
    assert_eq!(
        mallory.delete(&format!("/tasks/{task_id}")).await.status,
        StatusCode::NOT_FOUND
    );
    assert_eq!(
        mallory.get("/workspaces/not-a-number").await.status,
        StatusCode::NOT_FOUND
    );
}

#[tokio::test]
async fn test_member_rights() {
    let (app, _) = test_app().await;
    let mut alice = Client::new(&app);
    alice.sign_up("alice@example.com").await;
    let workspace_id = alice.create_workspace("Team").await;

    let mut bob = Client::new(&app);
    let bob_id = bob.sign_up("bob@example.com").await;

    let invitee = alice
        .get(&format!(
            "/workspaces/{workspace_id}/members/invite?email=bob@example.com"
        ))
        .await;
    assert_eq!(invitee.status, StatusCode::OK);
    assert_eq!(invitee.body["id"], bob_id);
    assert!(invitee.body.get("password_hash").is_none());

    let added = alice
        .post(
            &format!("/workspaces/{workspace_id}/members"),
            json!({ "user_id": bob_id }),
        )
        .await;
    assert_eq!(added.status, StatusCode::NO_CONTENT);

    // Bob can read and create tasks, but cannot administer
    let task_id = bob.create_task(workspace_id, "From Bob", "MEDIUM").await;
    let detail = bob.get(&format!("/tasks/{task_id}")).await;
    assert_eq!(detail.body["can_delete"], false);
    assert_eq!(
        bob.delete(&format!("/tasks/{task_id}")).await.status,
        StatusCode::NOT_FOUND
    );
    assert_eq!(
        bob.delete(&format!("/workspaces/{workspace_id}")).await.status,
        StatusCode::NOT_FOUND
    );

    let overview = bob.get("/workspaces").await;
    assert_eq!(overview.body["invited"].as_array().unwrap().len(), 1);

    let removed = alice
        .delete(&format!("/workspaces/{workspace_id}/members/{bob_id}"))
        .await;
    assert_eq!(removed.status, StatusCode::NO_CONTENT);
    assert_eq!(
        bob.get(&format!("/workspaces/{workspace_id}")).await.status,
        StatusCode::NOT_FOUND
    );

    assert_eq!(
        alice.delete(&format!("/tasks/{task_id}")).await.status,
        StatusCode::NO_CONTENT
    );
}
