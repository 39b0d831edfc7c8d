#![allow(dead_code)]

use std::collections::{BTreeMap, HashMap};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use axum::extract::{Path, Query, State};
use axum::http::{HeaderMap, StatusCode, header};
use axum::response::{Html, IntoResponse, Response};
use axum::routing::{get, post};
use axum::{Json, Router};
use futures::channel::mpsc::UnboundedReceiver;
use futures::{FutureExt, StreamExt};
use serde::Deserialize;
use serde_json::{Value, json};
use taskboard_core::{
    ApiClient, AuthService, ClientConfig, SessionEvent, SessionStore, Task, TaskDraft,
    TaskRepository,
};

pub const EMAIL: &str = "a@b.com";
pub const PASSWORD: &str = "secret123";
pub const TAKEN_EMAIL: &str = "taken@b.com";
pub const REFRESH_TOKEN: &str = "refresh-token";
pub const CSRF_TOKEN: &str = "csrf-123";

struct MockState {
    version: u64,
    refresh_succeeds: bool,
    refresh_delay: Duration,
    refresh_calls: usize,
    profile_fails: bool,
    calls: HashMap<&'static str, usize>,
    last_csrf: Option<String>,
    tasks: BTreeMap<u64, Task>,
    next_id: u64,
}

impl Default for MockState {
    fn default() -> Self {
        Self {
            version: 1,
            refresh_succeeds: true,
            refresh_delay: Duration::from_millis(50),
            refresh_calls: 0,
            profile_fails: false,
            calls: HashMap::new(),
            last_csrf: None,
            tasks: BTreeMap::new(),
            next_id: 1,
        }
    }
}

/// In-process stand-in for the task API, served by axum on an ephemeral port.
///
/// Access tokens look like `access-{version}`; [`MockApi::expire`] bumps the
/// version so every token handed out so far stops working.
#[derive(Clone, Default)]
pub struct MockApi {
    state: Arc<Mutex<MockState>>,
}

impl MockApi {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn expire(&self) {
        self.lock().version += 1;
    }

    pub fn fail_refresh(&self) {
        self.lock().refresh_succeeds = false;
    }

    /// Makes `/api/profile/` answer 500 from now on.
    pub fn fail_profile(&self) {
        self.lock().profile_fails = true;
    }

    pub fn refresh_calls(&self) -> usize {
        self.lock().refresh_calls
    }

    /// Requests received by the named route.
    pub fn calls(&self, route: &str) -> usize {
        self.lock().calls.get(route).copied().unwrap_or(0)
    }

    pub fn total_calls(&self) -> usize {
        let state = self.lock();
        state.calls.values().sum::<usize>() + state.refresh_calls
    }

    pub fn last_csrf(&self) -> Option<String> {
        self.lock().last_csrf.clone()
    }

    pub fn task_count(&self) -> usize {
        self.lock().tasks.len()
    }

    pub fn seed(&self, title: &str) -> Task {
        let mut state = self.lock();
        let id = state.next_id;
        state.next_id += 1;
        let task = stored(id, TaskDraft::new(title));
        state.tasks.insert(id, task.clone());
        task
    }

    pub fn router(&self) -> Router {
        Router::new()
            .route("/api/token/", post(login))
            .route("/api/token/refresh/", post(refresh))
            .route("/api/register/", post(register))
            .route("/api/logout/", post(logout))
            .route("/api/profile/", get(profile))
            .route("/api/tasks/", get(list_tasks).post(create_task))
            .route("/api/tasks/summary/", get(summary))
            .route("/api/tasks/statistics/", get(statistics))
            .route(
                "/api/tasks/{id}/",
                get(get_task).put(update_task).delete(delete_task),
            )
            .route("/api/broken/", get(broken))
            .route("/api/html/", get(html_rejection))
            .route("/api/locked/", get(locked))
            .with_state(self.clone())
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, MockState> {
        self.state.lock().unwrap()
    }

    fn record(&self, route: &'static str, headers: &HeaderMap) {
        let mut state = self.lock();
        *state.calls.entry(route).or_default() += 1;
        if let Some(token) = headers.get("x-csrftoken").and_then(|v| v.to_str().ok()) {
            state.last_csrf = Some(token.to_string());
        }
    }

    fn authorize(&self, headers: &HeaderMap) -> Result<(), Response> {
        let expected = format!("Bearer access-{}", self.lock().version);
        let presented = headers
            .get(header::AUTHORIZATION)
            .and_then(|value| value.to_str().ok());
        if presented == Some(expected.as_str()) {
            Ok(())
        } else {
            Err((
                StatusCode::UNAUTHORIZED,
                Json(json!({"detail": "Given token not valid for any token type"})),
            )
                .into_response())
        }
    }
}

/// Binds the mock to `127.0.0.1:0` and returns its base address.
pub async fn spawn(api: &MockApi) -> anyhow::Result<String> {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await?;
    let addr = listener.local_addr()?;
    let app = api.router();
    tokio::spawn(async move { axum::serve(listener, app).await });
    Ok(format!("http://{addr}"))
}

pub fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_test_writer()
        .try_init();
}

pub struct Harness {
    pub api: MockApi,
    pub session: Arc<SessionStore>,
    pub client: ApiClient,
    pub auth: AuthService,
    pub tasks: TaskRepository,
}

pub async fn harness() -> anyhow::Result<Harness> {
    init_tracing();
    let api = MockApi::new();
    let base = spawn(&api).await?;
    let session = Arc::new(SessionStore::new());
    let client = ApiClient::new(
        ClientConfig::default().with_api_base_url(base),
        session.clone(),
    )?;
    Ok(Harness {
        api,
        session,
        auth: AuthService::new(client.clone()),
        tasks: TaskRepository::new(client.clone()),
        client,
    })
}

pub async fn signed_in() -> anyhow::Result<Harness> {
    let harness = harness().await?;
    harness.auth.login(EMAIL, PASSWORD).await?;
    Ok(harness)
}

/// Events delivered so far, without waiting for more.
pub fn drain(events: &mut UnboundedReceiver<SessionEvent>) -> Vec<SessionEvent> {
    let mut seen = Vec::new();
    while let Some(Some(event)) = events.next().now_or_never() {
        seen.push(event);
    }
    seen
}

fn stored(id: u64, draft: TaskDraft) -> Task {
    Task {
        id,
        title: draft.title,
        description: draft.description,
        status: draft.status,
        priority: draft.priority,
        category: draft.category,
        due_date: draft.due_date,
        created_at: None,
        updated_at: None,
    }
}

fn not_found() -> Response {
    (StatusCode::NOT_FOUND, Json(json!({"detail": "Not found."}))).into_response()
}

#[derive(Deserialize)]
struct LoginBody {
    email: String,
    password: String,
}

async fn login(State(api): State<MockApi>, headers: HeaderMap, Json(body): Json<LoginBody>) -> Response {
    api.record("login", &headers);
    if body.email != EMAIL || body.password != PASSWORD {
        return (
            StatusCode::UNAUTHORIZED,
            Json(json!({"detail": "No active account found with the given credentials"})),
        )
            .into_response();
    }
    let access = format!("access-{}", api.lock().version);
    (
        [(header::SET_COOKIE, format!("csrftoken={CSRF_TOKEN}; Path=/"))],
        Json(json!({"access": access, "refresh": REFRESH_TOKEN})),
    )
        .into_response()
}

async fn refresh(State(api): State<MockApi>, Json(body): Json<Value>) -> Response {
    let delay = {
        let mut state = api.lock();
        state.refresh_calls += 1;
        state.refresh_delay
    };
    tokio::time::sleep(delay).await;

    let mut state = api.lock();
    let presented = body.get("refresh").and_then(Value::as_str);
    if !state.refresh_succeeds || presented != Some(REFRESH_TOKEN) {
        return (
            StatusCode::UNAUTHORIZED,
            Json(json!({"detail": "Token is invalid or expired"})),
        )
            .into_response();
    }
    state.version += 1;
    Json(json!({"access": format!("access-{}", state.version)})).into_response()
}

async fn register(State(api): State<MockApi>, headers: HeaderMap, Json(body): Json<Value>) -> Response {
    api.record("register", &headers);
    if body.get("email").and_then(Value::as_str) == Some(TAKEN_EMAIL) {
        return (
            StatusCode::BAD_REQUEST,
            Json(json!({"email": ["A user with that email already exists."]})),
        )
            .into_response();
    }
    (
        StatusCode::CREATED,
        Json(json!({"id": 2, "email": body["email"], "username": body["username"]})),
    )
        .into_response()
}

async fn logout(State(api): State<MockApi>, headers: HeaderMap) -> Response {
    api.record("logout", &headers);
    StatusCode::RESET_CONTENT.into_response()
}

async fn profile(State(api): State<MockApi>, headers: HeaderMap) -> Response {
    api.record("profile", &headers);
    if api.lock().profile_fails {
        return (
            StatusCode::INTERNAL_SERVER_ERROR,
            Json(json!({"detail": "Internal server error."})),
        )
            .into_response();
    }
    if let Err(rejection) = api.authorize(&headers) {
        return rejection;
    }
    Json(json!({"id": 1, "email": EMAIL, "username": "alice"})).into_response()
}

async fn list_tasks(
    State(api): State<MockApi>,
    headers: HeaderMap,
    Query(params): Query<HashMap<String, String>>,
) -> Response {
    api.record("tasks.list", &headers);
    if let Err(rejection) = api.authorize(&headers) {
        return rejection;
    }
    let page: usize = params
        .get("page")
        .and_then(|p| p.parse().ok())
        .unwrap_or(1usize)
        .max(1);
    let page_size: usize = params
        .get("page_size")
        .and_then(|p| p.parse().ok())
        .unwrap_or(10);
    let state = api.lock();
    let all: Vec<&Task> = state.tasks.values().collect();
    let results: Vec<&Task> = all
        .iter()
        .skip((page - 1) * page_size)
        .take(page_size)
        .copied()
        .collect();
    let next = (page * page_size < all.len()).then(|| format!("/api/tasks/?page={}", page + 1));
    let previous = (page > 1).then(|| format!("/api/tasks/?page={}", page - 1));
    Json(json!({
        "count": all.len(),
        "next": next,
        "previous": previous,
        "results": results,
    }))
    .into_response()
}

async fn create_task(State(api): State<MockApi>, headers: HeaderMap, Json(draft): Json<TaskDraft>) -> Response {
    api.record("tasks.create", &headers);
    if let Err(rejection) = api.authorize(&headers) {
        return rejection;
    }
    if draft.category.len() > 50 {
        return (
            StatusCode::BAD_REQUEST,
            Json(json!({"category": ["Ensure this field has no more than 50 characters."]})),
        )
            .into_response();
    }
    let mut state = api.lock();
    let id = state.next_id;
    state.next_id += 1;
    let task = stored(id, draft);
    state.tasks.insert(id, task.clone());
    (StatusCode::CREATED, Json(task)).into_response()
}

async fn get_task(State(api): State<MockApi>, headers: HeaderMap, Path(id): Path<u64>) -> Response {
    api.record("tasks.get", &headers);
    if let Err(rejection) = api.authorize(&headers) {
        return rejection;
    }
    match api.lock().tasks.get(&id) {
        Some(task) => Json(task.clone()).into_response(),
        None => not_found(),
    }
}

async fn update_task(
    State(api): State<MockApi>,
    headers: HeaderMap,
    Path(id): Path<u64>,
    Json(draft): Json<TaskDraft>,
) -> Response {
    api.record("tasks.update", &headers);
    if let Err(rejection) = api.authorize(&headers) {
        return rejection;
    }
    let mut state = api.lock();
    if !state.tasks.contains_key(&id) {
        return not_found();
    }
    let task = stored(id, draft);
    state.tasks.insert(id, task.clone());
    Json(task).into_response()
}

async fn delete_task(State(api): State<MockApi>, headers: HeaderMap, Path(id): Path<u64>) -> Response {
    api.record("tasks.delete", &headers);
    if let Err(rejection) = api.authorize(&headers) {
        return rejection;
    }
    match api.lock().tasks.remove(&id) {
        Some(_) => StatusCode::NO_CONTENT.into_response(),
        None => not_found(),
    }
}

async fn summary(State(api): State<MockApi>, headers: HeaderMap) -> Response {
    api.record("tasks.summary", &headers);
    if let Err(rejection) = api.authorize(&headers) {
        return rejection;
    }
    let state = api.lock();
    let done = state
        .tasks
        .values()
        .filter(|task| task.status == taskboard_core::TaskStatus::Done)
        .count();
    Json(json!({
        "total": state.tasks.len(),
        "open": state.tasks.len() - done,
        "done": done,
    }))
    .into_response()
}

async fn statistics(State(api): State<MockApi>, headers: HeaderMap) -> Response {
    api.record("tasks.statistics", &headers);
    if let Err(rejection) = api.authorize(&headers) {
        return rejection;
    }
    let state = api.lock();
    let mut by_priority: BTreeMap<&str, u64> = BTreeMap::new();
    for task in state.tasks.values() {
        *by_priority.entry(task.priority.as_str()).or_default() += 1;
    }
    Json(json!({
        "total": state.tasks.len(),
        "completion_rate": 0.0,
        "by_priority": by_priority,
    }))
    .into_response()
}

async fn broken(State(api): State<MockApi>, headers: HeaderMap) -> Response {
    api.record("broken", &headers);
    (
        StatusCode::BAD_GATEWAY,
        Html("<html><body><h1>502 Bad Gateway</h1></body></html>"),
    )
        .into_response()
}

async fn html_rejection(State(api): State<MockApi>, headers: HeaderMap) -> Response {
    api.record("html", &headers);
    (StatusCode::BAD_REQUEST, Html("<h1>Bad Request</h1>")).into_response()
}

/// Rejects every request as unauthorized, whatever token it carries.
async fn locked(State(api): State<MockApi>, headers: HeaderMap) -> Response {
    api.record("locked", &headers);
    (
        StatusCode::UNAUTHORIZED,
        Json(json!({"detail": "You do not have access to this resource."})),
    )
        .into_response()
}
