//! ApiClient and LogSync against a local fake backend.

use std::sync::{Arc, Mutex};

use axum::extract::{Path, State};
use axum::http::{HeaderMap, StatusCode};
use axum::response::{IntoResponse, Response};
use axum::routing::{delete, get, post};
use axum::{Json, Router};
use chrono::{TimeZone, Utc};
use serde_json::{json, Value};

use glucolog_core::{
    ApiClient, ApiError, Confirmation, CreateOutcome, DeleteOutcome, FetchOutcome, Gender,
    GlucoseApi, LogDraft, LogStore, LogSync, MemoryStore, NewGlucoseLog, NewProfile,
    ReadingContext, SyncError, SyncPhase,
};

const TOKEN: &str = "tok-1";

#[derive(Clone, Default)]
struct Backend {
    logs: Arc<Mutex<Vec<Value>>>,
    next_id: Arc<Mutex<u32>>,
    /// Answer creates without an `id`.
    omit_id: Arc<Mutex<bool>>,
    received: Arc<Mutex<Vec<Value>>>,
}

impl Backend {
    fn seed(&self, logs: Vec<Value>) {
        *self.logs.lock().unwrap() = logs;
    }
}

fn authorized(headers: &HeaderMap) -> bool {
    headers
        .get("authorization")
        .and_then(|v| v.to_str().ok())
        .map(|v| v == format!("Bearer {}", TOKEN))
        .unwrap_or(false)
}

fn unauthorized() -> Response {
    (StatusCode::UNAUTHORIZED, Json(json!({ "error": "Unauthorized" }))).into_response()
}

async fn request_otp(Json(body): Json<Value>) -> Response {
    if body["phone"] == "+910000000000" {
        return (
            StatusCode::BAD_REQUEST,
            Json(json!({ "error": "Phone number not allowed" })),
        )
            .into_response();
    }
    Json(json!({ "message": "OTP sent" })).into_response()
}

async fn verify_otp(Json(body): Json<Value>) -> Response {
    match body["otp"].as_str() {
        Some("123456") => Json(json!({ "token": TOKEN })).into_response(),
        Some("000000") => Json(json!({ "message": "ok" })).into_response(),
        _ => (StatusCode::BAD_REQUEST, Json(json!({ "error": "OTP expired" }))).into_response(),
    }
}

async fn create_profile(headers: HeaderMap, Json(body): Json<Value>) -> Response {
    if !authorized(&headers) {
        return unauthorized();
    }
    let mut user = body;
    user["id"] = json!("u1");
    Json(json!({ "message": "created", "user": user })).into_response()
}

async fn list_logs(State(backend): State<Backend>, headers: HeaderMap) -> Response {
    if !authorized(&headers) {
        return unauthorized();
    }
    let logs = backend.logs.lock().unwrap().clone();
    Json(Value::Array(logs)).into_response()
}

async fn create_log(
    State(backend): State<Backend>,
    headers: HeaderMap,
    Json(body): Json<Value>,
) -> Response {
    if !authorized(&headers) {
        return unauthorized();
    }
    backend.received.lock().unwrap().push(body.clone());

    let mut record = body;
    if !*backend.omit_id.lock().unwrap() {
        let mut next = backend.next_id.lock().unwrap();
        *next += 1;
        record["id"] = json!(format!("srv-{}", *next));
        backend.logs.lock().unwrap().insert(0, record.clone());
    }
    (StatusCode::CREATED, Json(record)).into_response()
}

async fn delete_log(
    State(backend): State<Backend>,
    headers: HeaderMap,
    Path(id): Path<String>,
) -> Response {
    if !authorized(&headers) {
        return unauthorized();
    }
    if id == "locked" {
        return (
            StatusCode::INTERNAL_SERVER_ERROR,
            Json(json!({ "error": "Failed to delete" })),
        )
            .into_response();
    }
    backend.logs.lock().unwrap().retain(|l| l["id"] != id.as_str());
    Json(json!({ "message": "deleted" })).into_response()
}

async fn spawn_backend(backend: Backend) -> String {
    let app = Router::new()
        .route("/auth/request-otp", post(request_otp))
        .route("/auth/verify-otp", post(verify_otp))
        .route("/profile/create", post(create_profile))
        .route("/glucose", get(list_logs).post(create_log))
        .route("/glucose/{id}", delete(delete_log))
        .with_state(backend);

    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });
    format!("http://{}", addr)
}

fn log_json(id: &str, value: i32, context: &str) -> Value {
    json!({
        "id": id,
        "value": value,
        "context": context,
        "takenAt": "2025-01-01T08:00:00.000Z"
    })
}

fn ids(store: &LogStore) -> Vec<String> {
    store.snapshot().into_iter().map(|l| l.id).collect()
}

// ---- ApiClient ---------------------------------------------------------

#[tokio::test]
async fn test_list_logs_decodes_records() {
    let backend = Backend::default();
    backend.seed(vec![log_json("a", 120, "fasting"), json!({
        "id": 42,
        "value": 180,
        "context": "after_lunch",
        "takenAt": "2025-01-01T13:00:00.000Z"
    })]);
    let client = ApiClient::new(spawn_backend(backend).await);

    let logs = client.list_logs(TOKEN).await.unwrap();

    assert_eq!(logs.len(), 2);
    assert_eq!(logs[0].id, "a");
    assert_eq!(logs[1].id, "42");
    assert_eq!(logs[1].context, "after_lunch");
}

#[tokio::test]
async fn test_bad_token_surfaces_server_error() {
    let client = ApiClient::new(spawn_backend(Backend::default()).await);

    let err = client.list_logs("nope").await.unwrap_err();

    assert_eq!(
        err,
        ApiError::Status {
            status: 401,
            message: Some("Unauthorized".to_string())
        }
    );
}

#[tokio::test]
async fn test_create_log_sends_camel_case_body() {
    let backend = Backend::default();
    let client = ApiClient::new(spawn_backend(backend.clone()).await);
    let taken_at = Utc.with_ymd_and_hms(2025, 3, 4, 7, 30, 0).unwrap();

    let body = client
        .create_log(TOKEN, &NewGlucoseLog::new(95, ReadingContext::BeforeBreakfast, taken_at))
        .await
        .unwrap();

    assert_eq!(body["id"], "srv-1");
    let received = backend.received.lock().unwrap().clone();
    assert_eq!(
        received,
        vec![json!({
            "value": 95,
            "context": "before_breakfast",
            "takenAt": "2025-03-04T07:30:00.000Z"
        })]
    );
}

#[tokio::test]
async fn test_delete_error_message() {
    let client = ApiClient::new(spawn_backend(Backend::default()).await);

    let err = client.delete_log(TOKEN, "locked").await.unwrap_err();

    assert_eq!(err.status(), Some(500));
    assert_eq!(err.server_message(), Some("Failed to delete"));
}

#[tokio::test]
async fn test_unreachable_server_is_network_error() {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    drop(listener);
    let client = ApiClient::new(format!("http://{}", addr));

    let err = client.list_logs(TOKEN).await.unwrap_err();

    assert!(matches!(err, ApiError::Network(_)));
}

#[tokio::test]
async fn test_otp_flow() {
    let client = ApiClient::new(spawn_backend(Backend::default()).await);

    client.request_otp("+919876543210").await.unwrap();
    let err = client.request_otp("+910000000000").await.unwrap_err();
    assert_eq!(err.server_message(), Some("Phone number not allowed"));

    assert_eq!(
        client.verify_otp("+919876543210", "123456").await.unwrap(),
        Some(TOKEN.to_string())
    );
    assert_eq!(
        client.verify_otp("+919876543210", "000000").await.unwrap(),
        None
    );
    let err = client
        .verify_otp("+919876543210", "999999")
        .await
        .unwrap_err();
    assert_eq!(err.server_message(), Some("OTP expired"));
}

#[tokio::test]
async fn test_create_profile_returns_user() {
    let client = ApiClient::new(spawn_backend(Backend::default()).await);
    let profile = NewProfile {
        name: "Asha".to_string(),
        email: "asha@example.com".to_string(),
        gender: Gender::Female,
        age: 34,
    };

    let user = client.create_profile(TOKEN, &profile).await.unwrap();

    assert_eq!(user["id"], "u1");
    assert_eq!(user["name"], "Asha");
    assert_eq!(user["gender"], "female");
    assert_eq!(user["age"], 34);
}

// ---- LogSync over HTTP -------------------------------------------------

fn sync_for(url: String) -> LogSync<ApiClient, MemoryStore> {
    LogSync::new(ApiClient::new(url), MemoryStore::with_token(TOKEN), LogStore::new())
}

#[tokio::test]
async fn test_sync_create_then_delete() {
    let backend = Backend::default();
    backend.seed(vec![log_json("a", 120, "fasting")]);
    let sync = sync_for(spawn_backend(backend.clone()).await);

    assert_eq!(sync.focus().await.unwrap(), FetchOutcome::Applied(1));

    let outcome = sync
        .create(&LogDraft::new("150", ReadingContext::AfterDinner))
        .await
        .unwrap();
    assert!(matches!(outcome, CreateOutcome::Applied(ref log) if log.id == "srv-1"));
    assert_eq!(ids(sync.store()), vec!["srv-1", "a"]);

    let outcome = sync.delete("a", Confirmation::Confirm).await.unwrap();
    assert_eq!(outcome, DeleteOutcome::Deleted { removed: 1 });
    assert_eq!(ids(sync.store()), vec!["srv-1"]);

    // Server and local store agree after a refetch.
    sync.refresh().await.unwrap();
    assert_eq!(ids(sync.store()), vec!["srv-1"]);
}

#[tokio::test]
async fn test_sync_create_without_id_is_not_applied() {
    let backend = Backend::default();
    *backend.omit_id.lock().unwrap() = true;
    let sync = sync_for(spawn_backend(backend).await);

    let outcome = sync
        .create(&LogDraft::new("168", ReadingContext::Fasting))
        .await
        .unwrap();

    assert_eq!(outcome, CreateOutcome::Dropped);
    assert!(sync.store().is_empty());
}

#[tokio::test]
async fn test_sync_failed_delete_keeps_record() {
    let backend = Backend::default();
    backend.seed(vec![log_json("locked", 120, "fasting"), log_json("b", 99, "random")]);
    let sync = sync_for(spawn_backend(backend).await);
    sync.focus().await.unwrap();

    let err = sync
        .delete("locked", Confirmation::Confirm)
        .await
        .unwrap_err();

    assert!(matches!(err, SyncError::Api(ApiError::Status { status: 500, .. })));
    assert_eq!(err.user_message("Failed to delete glucose log"), "Failed to delete");
    assert_eq!(ids(sync.store()), vec!["locked", "b"]);
}

#[tokio::test]
async fn test_sync_odd_record_does_not_hide_the_list() {
    let backend = Backend::default();
    backend.seed(vec![
        log_json("a", 120, "fasting"),
        json!({
            "id": "b",
            "value": 120.5,
            "context": "after_lunch",
            "takenAt": "2025-01-01T13:00:00.000Z"
        }),
        json!({ "id": "c", "value": 99, "context": "random" }),
        json!({ "value": 80, "context": "random" }),
    ]);
    let sync = sync_for(spawn_backend(backend).await);

    assert_eq!(sync.focus().await.unwrap(), FetchOutcome::Applied(3));

    assert_eq!(ids(sync.store()), vec!["a", "b", "c"]);
    assert_eq!(sync.store().snapshot()[1].value, 121);
    assert_eq!(sync.phase(), SyncPhase::Idle);
}

#[tokio::test]
async fn test_sync_fetch_failure_sets_error_phase() {
    let backend = Backend::default();
    backend.seed(vec![log_json("a", 120, "fasting")]);
    let url = spawn_backend(backend).await;
    let sync = sync_for(url.clone());
    sync.focus().await.unwrap();

    // Same store, revoked token.
    let revoked = LogSync::new(
        ApiClient::new(url),
        MemoryStore::with_token("revoked"),
        sync.store().clone(),
    );
    assert!(revoked.refresh().await.is_err());

    assert!(matches!(revoked.phase(), SyncPhase::Error(_)));
    assert_eq!(ids(sync.store()), vec!["a"]);
}
