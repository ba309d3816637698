//! In-process QMS backend for black-box tests.
//!
//! Serves a small subset of `/api/v1` on an ephemeral port. The backend accepts
//! exactly one access token at a time; `/auth/refresh` rotates it. Everything a
//! test wants to assert on (refresh calls, Authorization headers, raw queries,
//! multipart uploads) is recorded in [`Mock`].

#![allow(dead_code)]

use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use axum::extract::{Multipart, Path, RawQuery, State};
use axum::http::{HeaderMap, StatusCode, header};
use axum::response::{IntoResponse, Response};
use axum::routing::{get, post, put};
use axum::{Form, Json, Router};
use serde::Deserialize;
use serde_json::{Value, json};

use qms_client::{ApiClient, ClientConfig, MemoryAuthStore, NavigateFn, TokenPair};

pub const USERNAME: &str = "qa.manager";
pub const PASSWORD: &str = "correct-horse";
pub const REFRESH_TOKEN: &str = "refresh-1";
/// Access token the tests seed to provoke a 401.
pub const EXPIRED_TOKEN: &str = "expired";

#[derive(Debug, Clone, PartialEq)]
pub struct ReceivedPart {
    pub name: String,
    pub file_name: Option<String>,
    pub bytes: Vec<u8>,
}

pub struct Mock {
    access_token: Mutex<String>,
    issued: AtomicUsize,
    pub refresh_calls: AtomicUsize,
    pub fail_refresh: AtomicBool,
    pub fail_logout: AtomicBool,
    pub refresh_delay: Duration,
    pub authorizations: Mutex<Vec<Option<String>>>,
    pub queries: Mutex<Vec<String>>,
    pub uploads: Mutex<Vec<Vec<ReceivedPart>>>,
    pub refresh_bodies: Mutex<Vec<Value>>,
    pub login_content_types: Mutex<Vec<String>>,
    /// Authorization headers seen by the route that rejects every token.
    pub locked_authorizations: Mutex<Vec<Option<String>>>,
}

impl Mock {
    fn new() -> Self {
        Self {
            access_token: Mutex::new("access-0".to_string()),
            issued: AtomicUsize::new(0),
            refresh_calls: AtomicUsize::new(0),
            fail_refresh: AtomicBool::new(false),
            fail_logout: AtomicBool::new(false),
            refresh_delay: Duration::from_millis(50),
            authorizations: Mutex::new(Vec::new()),
            queries: Mutex::new(Vec::new()),
            uploads: Mutex::new(Vec::new()),
            refresh_bodies: Mutex::new(Vec::new()),
            login_content_types: Mutex::new(Vec::new()),
            locked_authorizations: Mutex::new(Vec::new()),
        }
    }

    pub fn access_token(&self) -> String {
        self.access_token.lock().unwrap().clone()
    }

    pub fn refresh_count(&self) -> usize {
        self.refresh_calls.load(Ordering::SeqCst)
    }

    fn issue(&self) -> String {
        let n = self.issued.fetch_add(1, Ordering::SeqCst) + 1;
        let token = format!("access-{n}");
        *self.access_token.lock().unwrap() = token.clone();
        token
    }

    /// Record the Authorization header and check it against the live token.
    fn authorize(&self, headers: &HeaderMap) -> Result<(), Response> {
        let presented = headers
            .get(header::AUTHORIZATION)
            .and_then(|v| v.to_str().ok())
            .map(str::to_string);
        self.authorizations.lock().unwrap().push(presented.clone());

        let expected = format!("Bearer {}", self.access_token());
        if presented.as_deref() == Some(expected.as_str()) {
            Ok(())
        } else {
            Err((
                StatusCode::UNAUTHORIZED,
                Json(json!({ "detail": "Could not validate credentials" })),
            )
                .into_response())
        }
    }

    fn record_query(&self, query: Option<String>) {
        self.queries.lock().unwrap().push(query.unwrap_or_default());
    }
}

pub struct MockBackend {
    pub origin: String,
    pub base_url: String,
    pub state: Arc<Mock>,
    handle: tokio::task::JoinHandle<()>,
}

impl MockBackend {
    pub async fn spawn() -> Self {
        qms_observability::init();

        let state = Arc::new(Mock::new());
        let app = Router::new().nest("/api/v1", routes()).with_state(state.clone());

        let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
            .await
            .expect("failed to bind ephemeral port");
        let addr = listener.local_addr().unwrap();
        let origin = format!("http://{addr}");
        let base_url = format!("{origin}/api/v1");

        let handle = tokio::spawn(async move {
            axum::serve(listener, app).await.unwrap();
        });

        Self {
            origin,
            base_url,
            state,
            handle,
        }
    }

    /// Client pointed at this backend, sharing `store`, recording navigations.
    pub fn client(&self, store: Arc<MemoryAuthStore>) -> (ApiClient, Arc<Mutex<Vec<String>>>) {
        let navigations = Arc::new(Mutex::new(Vec::new()));
        let sink = navigations.clone();

        let client = ApiClient::builder(ClientConfig::new(&self.origin).with_api_url(&self.base_url))
            .store(store)
            .navigator(Arc::new(NavigateFn(move |route: &str| {
                sink.lock().unwrap().push(route.to_string())
            })))
            .build()
            .expect("client builds");

        (client, navigations)
    }

    /// Client whose stored access token the backend no longer accepts.
    pub fn client_with_expired_token(&self) -> (ApiClient, Arc<MemoryAuthStore>, Arc<Mutex<Vec<String>>>) {
        let store = Arc::new(MemoryAuthStore::with_tokens(&TokenPair::new(EXPIRED_TOKEN, REFRESH_TOKEN)));
        let (client, navigations) = self.client(store.clone());
        (client, store, navigations)
    }

    /// Client holding the token the backend currently accepts.
    pub fn authenticated_client(&self) -> (ApiClient, Arc<MemoryAuthStore>) {
        let store = Arc::new(MemoryAuthStore::with_tokens(&TokenPair::new(
            self.state.access_token(),
            REFRESH_TOKEN,
        )));
        let (client, _) = self.client(store.clone());
        (client, store)
    }
}

impl Drop for MockBackend {
    fn drop(&mut self) {
        self.handle.abort();
    }
}

fn enveloped(data: Value) -> Response {
    Json(json!({ "success": true, "message": "ok", "data": data })).into_response()
}

fn user_json(id: i64) -> Value {
    json!({
        "id": id,
        "username": USERNAME,
        "email": "qa@example.com",
        "full_name": "QA Manager",
        "role": "QA_MANAGER",
        "department_id": 2,
        "is_active": true,
        "last_login": "2024-05-02T07:30:00.123456",
        "phone": "+44 1234"
    })
}

fn document_json(id: i64) -> Value {
    json!({
        "id": id,
        "title": "Cleaning SOP",
        "document_number": "SOP-001",
        "category": "haccp",
        "status": "approved",
        "version": "1.2",
        "updated_at": "2024-05-01T10:00:00Z",
        "owner_name": "QA Manager"
    })
}

fn routes() -> Router<Arc<Mock>> {
    Router::new()
        .route("/auth/login", post(login))
        .route("/auth/refresh", post(refresh))
        .route("/auth/logout", post(logout))
        .route("/auth/me", get(me))
        .route("/documents", get(list_documents).post(create_document))
        .route("/documents/:id/download", get(download_document))
        .route("/suppliers/materials", get(list_materials))
        .route("/notifications/unread-count", get(unread_count))
        .route("/notifications/read-all", put(read_all))
        .route("/departments", get(list_departments))
        .route("/risk/stats", get(risk_stats))
        .route("/nonconformance", post(create_nonconformance))
        .route("/audits/:id", get(locked_audit))
}

#[derive(Deserialize)]
struct LoginForm {
    username: String,
    password: String,
}

async fn login(State(mock): State<Arc<Mock>>, headers: HeaderMap, Form(form): Form<LoginForm>) -> Response {
    let content_type = headers.get(header::CONTENT_TYPE).and_then(|v| v.to_str().ok()).unwrap_or_default();
    mock.login_content_types.lock().unwrap().push(content_type.to_string());

    if form.username != USERNAME || form.password != PASSWORD {
        return (
            StatusCode::UNAUTHORIZED,
            Json(json!({ "detail": "Incorrect username or password" })),
        )
            .into_response();
    }
    let access = mock.issue();
    enveloped(json!({ "access_token": access, "refresh_token": REFRESH_TOKEN, "token_type": "bearer" }))
}

async fn refresh(State(mock): State<Arc<Mock>>, headers: HeaderMap, Json(body): Json<Value>) -> Response {
    mock.refresh_calls.fetch_add(1, Ordering::SeqCst);
    mock.refresh_bodies.lock().unwrap().push(body.clone());
    mock.authorizations
        .lock()
        .unwrap()
        .push(headers.get(header::AUTHORIZATION).and_then(|v| v.to_str().ok()).map(str::to_string));

    // Keep the exchange in flight long enough for concurrent 401s to queue up.
    tokio::time::sleep(mock.refresh_delay).await;

    if mock.fail_refresh.load(Ordering::SeqCst) || body["refresh_token"] != REFRESH_TOKEN {
        return (StatusCode::UNAUTHORIZED, Json(json!({ "detail": "Invalid refresh token" }))).into_response();
    }
    // The refresh token is not rotated.
    enveloped(json!({ "access_token": mock.issue(), "token_type": "bearer" }))
}

async fn logout(State(mock): State<Arc<Mock>>) -> Response {
    if mock.fail_logout.load(Ordering::SeqCst) {
        return (StatusCode::INTERNAL_SERVER_ERROR, Json(json!({ "detail": "logout failed" }))).into_response();
    }
    Json(json!({ "success": true, "message": "Logged out" })).into_response()
}

async fn me(State(mock): State<Arc<Mock>>, headers: HeaderMap) -> Response {
    if let Err(denied) = mock.authorize(&headers) {
        return denied;
    }
    enveloped(user_json(7))
}

async fn list_documents(State(mock): State<Arc<Mock>>, headers: HeaderMap, RawQuery(query): RawQuery) -> Response {
    if let Err(denied) = mock.authorize(&headers) {
        return denied;
    }
    mock.record_query(query);
    enveloped(json!({ "items": [document_json(1)], "total": 1, "page": 1, "size": 20, "pages": 1 }))
}

async fn create_document(State(mock): State<Arc<Mock>>, headers: HeaderMap, mut multipart: Multipart) -> Response {
    // Drain the body before judging the token so a rejected upload still
    // arrives in full.
    let mut parts = Vec::new();
    while let Some(field) = multipart.next_field().await.unwrap() {
        let name = field.name().unwrap_or_default().to_string();
        let file_name = field.file_name().map(str::to_string);
        let bytes = field.bytes().await.unwrap().to_vec();
        parts.push(ReceivedPart { name, file_name, bytes });
    }
    mock.uploads.lock().unwrap().push(parts);

    if let Err(denied) = mock.authorize(&headers) {
        return denied;
    }
    enveloped(document_json(42))
}

async fn download_document(State(mock): State<Arc<Mock>>, headers: HeaderMap, Path(id): Path<i64>) -> Response {
    if let Err(denied) = mock.authorize(&headers) {
        return denied;
    }
    (
        [
            (header::CONTENT_TYPE, "application/pdf".to_string()),
            (
                header::CONTENT_DISPOSITION,
                format!("attachment; filename=\"doc-{id}.pdf\"; filename*=UTF-8''Cleaning%20SOP%20v1.2.pdf"),
            ),
        ],
        b"%PDF-1.7 fake".to_vec(),
    )
        .into_response()
}

async fn list_materials(State(mock): State<Arc<Mock>>, headers: HeaderMap, RawQuery(query): RawQuery) -> Response {
    if let Err(denied) = mock.authorize(&headers) {
        return denied;
    }
    mock.record_query(query);
    enveloped(json!({ "items": [], "total": 0, "page": 1, "size": 20, "pages": 0 }))
}

async fn unread_count(State(mock): State<Arc<Mock>>, headers: HeaderMap) -> Response {
    if let Err(denied) = mock.authorize(&headers) {
        return denied;
    }
    Json(json!({ "unread_count": 3 })).into_response()
}

async fn read_all(State(mock): State<Arc<Mock>>, headers: HeaderMap) -> Response {
    if let Err(denied) = mock.authorize(&headers) {
        return denied;
    }
    StatusCode::NO_CONTENT.into_response()
}

async fn list_departments(State(mock): State<Arc<Mock>>, headers: HeaderMap) -> Response {
    if let Err(denied) = mock.authorize(&headers) {
        return denied;
    }
    Json(json!([
        { "id": 1, "department_code": "QA", "name": "Quality Assurance", "status": "active" },
        { "id": 2, "department_code": "PROD", "name": "Production", "manager_id": 7 }
    ]))
    .into_response()
}

async fn risk_stats(State(mock): State<Arc<Mock>>, headers: HeaderMap) -> Response {
    if let Err(denied) = mock.authorize(&headers) {
        return denied;
    }
    Json(json!({ "success": false, "message": "Risk register is disabled", "data": null })).into_response()
}

async fn create_nonconformance(State(mock): State<Arc<Mock>>, headers: HeaderMap) -> Response {
    if let Err(denied) = mock.authorize(&headers) {
        return denied;
    }
    (
        StatusCode::UNPROCESSABLE_ENTITY,
        Json(json!({ "detail": [
            { "loc": ["body", "title"], "msg": "field required", "type": "value_error.missing" }
        ]})),
    )
        .into_response()
}

/// Rejects every token, including freshly refreshed ones.
async fn locked_audit(State(mock): State<Arc<Mock>>, headers: HeaderMap) -> Response {
    let presented = headers
        .get(header::AUTHORIZATION)
        .and_then(|v| v.to_str().ok())
        .map(str::to_string);
    mock.locked_authorizations.lock().unwrap().push(presented);
    (
        StatusCode::UNAUTHORIZED,
        Json(json!({ "detail": "Audit is restricted to the lead auditor" })),
    )
        .into_response()
}
