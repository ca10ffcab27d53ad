//! Integration tests for the HTTP API
//!
//! Requests are driven through the router with `tower::ServiceExt::oneshot`;
//! search-engine endpoints are wiremock servers and history lives in a
//! temporary SQLite file.

use axum::body::{to_bytes, Body};
use axum::http::{Request, StatusCode};
use axum::Router;
use index_courier::config::UserAgentConfig;
use index_courier::server::{create_router, AppState};
use index_courier::storage::SqliteStorage;
use index_courier::submit::{
    build_http_client, BatchRunner, Engine, Orchestrator, SubmissionPlan, SubmissionSettings,
    UrlResult, UrlSubmitter,
};
use serde_json::{json, Value};
use std::sync::{Arc, Mutex};
use std::time::Duration;
use tempfile::TempDir;
use tower::ServiceExt;
use wiremock::matchers::{method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

struct TestApp {
    router: Router,
    storage: Arc<Mutex<SqliteStorage>>,
    _db_dir: TempDir,
}

fn mock_settings(server: &MockServer) -> SubmissionSettings {
    let uri = server.uri();
    SubmissionSettings {
        engines: vec![
            Engine {
                name: "Bing".to_string(),
                endpoint: format!("{}/bing/indexnow", uri),
            },
            Engine {
                name: "Yandex".to_string(),
                endpoint: format!("{}/yandex/indexnow", uri),
            },
        ],
        post_endpoint: format!("{}/indexnow", uri),
        pacing_delay: Duration::ZERO,
        ..SubmissionSettings::default()
    }
}

fn build_test_app(submitter: Arc<dyn UrlSubmitter>, default_key: Option<&str>) -> TestApp {
    let db_dir = tempfile::tempdir().expect("Failed to create temp dir");
    let storage =
        SqliteStorage::new(&db_dir.path().join("history.db")).expect("Failed to open storage");
    let runner = Arc::new(BatchRunner::with_pacing(submitter, Duration::ZERO));

    let mut state = AppState::new(runner, storage, "test-hash".to_string());
    state.default_protocol_key = default_key.map(str::to_string);

    TestApp {
        storage: Arc::clone(&state.storage),
        router: create_router(state),
        _db_dir: db_dir,
    }
}

async fn mock_engine_app(default_key: Option<&str>) -> (TestApp, MockServer) {
    let server = MockServer::start().await;
    let client = build_http_client(&UserAgentConfig::default()).unwrap();
    let orchestrator = Orchestrator::new(client, mock_settings(&server));
    (build_test_app(Arc::new(orchestrator), default_key), server)
}

async fn send(router: &Router, request: Request<Body>) -> (StatusCode, Value) {
    let response = router.clone().oneshot(request).await.unwrap();
    let status = response.status();
    let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    let body = serde_json::from_slice(&bytes).unwrap_or(Value::Null);
    (status, body)
}

/// Polls history until the background write has landed
async fn wait_for_history(router: &Router, expected: u64) -> Value {
    for _ in 0..100 {
        let (_, history) = send(router, get("/api/history")).await;
        if history["total"] == expected {
            return history;
        }
        tokio::time::sleep(Duration::from_millis(20)).await;
    }
    panic!("history never reached {} records", expected);
}

fn get(uri: &str) -> Request<Body> {
    Request::builder().uri(uri).body(Body::empty()).unwrap()
}

fn post_json(uri: &str, body: Value) -> Request<Body> {
    Request::builder()
        .method("POST")
        .uri(uri)
        .header("content-type", "application/json")
        .body(Body::from(body.to_string()))
        .unwrap()
}

#[tokio::test]
async fn test_health() {
    let (app, _server) = mock_engine_app(None).await;
    let (status, body) = send(&app.router, get("/api/health")).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "healthy");
    assert_eq!(body["service"], "index-courier");
    assert!(body["timestamp"].is_string());
}

#[tokio::test]
async fn test_status_idle_before_any_batch() {
    let (app, _server) = mock_engine_app(None).await;
    let (status, body) = send(&app.router, get("/api/status")).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(
        body,
        json!({ "status": "idle", "in_progress": false, "message": "Ready to index" })
    );
}

#[tokio::test]
async fn test_index_requires_urls_array() {
    let (app, _server) = mock_engine_app(None).await;

    for body in [json!({}), json!({ "urls": "https://a.com" })] {
        let (status, response) = send(&app.router, post_json("/api/index", body)).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(response["error"], "URLs array is required");
    }
}

#[tokio::test]
async fn test_index_rejects_invalid_urls() {
    let (app, _server) = mock_engine_app(None).await;
    let (status, body) = send(
        &app.router,
        post_json("/api/index", json!({ "urls": ["ftp://a.com", "nope"] })),
    )
    .await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(
        body["error"],
        "No valid URLs provided (must start with http:// or https://)"
    );
}

#[tokio::test]
async fn test_index_rejects_vendor_without_credentials() {
    let (app, _server) = mock_engine_app(None).await;
    let (status, body) = send(
        &app.router,
        post_json(
            "/api/index",
            json!({ "urls": ["https://a.com"], "use_google_api": true }),
        ),
    )
    .await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], "Google API requested but no credentials provided");
}

#[tokio::test]
async fn test_index_uses_default_key_and_records_history() {
    let (app, server) = mock_engine_app(Some("default-key")).await;
    for engine in ["bing", "yandex"] {
        Mock::given(method("GET"))
            .and(path(format!("/{}/indexnow", engine)))
            .and(query_param("key", "default-key"))
            .respond_with(ResponseTemplate::new(200))
            .expect(1)
            .mount(&server)
            .await;
    }

    let (status, body) = send(
        &app.router,
        post_json("/api/index", json!({ "urls": ["https://a.com/page", "bad"] })),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "success");
    assert_eq!(body["message"], "Processed 1 URLs");
    assert_eq!(body["total"], 1);
    assert_eq!(body["successful"], 1);
    assert_eq!(body["failed"], 0);
    assert_eq!(body["results"][0]["url"], "https://a.com/page");
    assert_eq!(body["results"][0]["methods_used"][0]["method"], "IndexNow (GET)");
    assert_eq!(
        body["results"][0]["methods_used"][0]["message"],
        "Submitted to Bing, Yandex"
    );

    let (_, status_body) = send(&app.router, get("/api/status")).await;
    assert_eq!(status_body["status"], "complete");
    assert_eq!(status_body["in_progress"], false);
    assert_eq!(status_body["total"], 1);

    let history = wait_for_history(&app.router, 1).await;
    assert_eq!(history["showing"], 1);
    assert_eq!(history["history"][0]["url"], "https://a.com/page");
    assert_eq!(history["history"][0]["status"], "success");

    let (_, stats) = send(&app.router, get("/api/history?stats=true")).await;
    assert_eq!(stats["total"], 1);
    assert_eq!(stats["successRate"], "100.0");
    assert_eq!(stats["last7Days"]["successful"], 1);
}

#[tokio::test]
async fn test_request_key_overrides_default() {
    let (app, server) = mock_engine_app(Some("default-key")).await;
    Mock::given(method("GET"))
        .and(query_param("key", "request-key"))
        .respond_with(ResponseTemplate::new(202))
        .expect(2)
        .mount(&server)
        .await;

    let (status, body) = send(
        &app.router,
        post_json(
            "/api/index",
            json!({ "urls": ["https://a.com"], "indexnow_key": "request-key" }),
        ),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["successful"], 1);
}

#[tokio::test]
async fn test_history_limit_and_clear() {
    let (app, server) = mock_engine_app(Some("k")).await;
    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(200))
        .mount(&server)
        .await;

    send(
        &app.router,
        post_json(
            "/api/index",
            json!({ "urls": ["https://a.com", "https://b.com", "https://c.com"] }),
        ),
    )
    .await;
    wait_for_history(&app.router, 3).await;

    let (_, history) = send(&app.router, get("/api/history?limit=2")).await;
    assert_eq!(history["showing"], 2);
    assert_eq!(history["history"].as_array().unwrap().len(), 2);

    let request = Request::builder()
        .method("DELETE")
        .uri("/api/history")
        .body(Body::empty())
        .unwrap();
    let (status, body) = send(&app.router, request).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["message"], "History cleared successfully");

    let (_, history) = send(&app.router, get("/api/history")).await;
    assert_eq!(history["total"], 0);
}

#[tokio::test]
async fn test_index_rejects_malformed_json_with_error_body() {
    let (app, _server) = mock_engine_app(None).await;

    let not_json = Request::builder()
        .method("POST")
        .uri("/api/index")
        .header("content-type", "application/json")
        .body(Body::from("{\"urls\": ["))
        .unwrap();
    let (status, body) = send(&app.router, not_json).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(body["error"]
        .as_str()
        .unwrap()
        .starts_with("Invalid request"));

    let no_content_type = Request::builder()
        .method("POST")
        .uri("/api/index")
        .body(Body::from(json!({ "urls": ["https://a.com"] }).to_string()))
        .unwrap();
    let (status, body) = send(&app.router, no_content_type).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(body["error"].is_string());
}

#[tokio::test]
async fn test_index_rejects_scalar_vendor_credentials() {
    let (app, _server) = mock_engine_app(None).await;

    for credentials in [json!(""), json!(false), json!(0)] {
        let (status, body) = send(
            &app.router,
            post_json(
                "/api/index",
                json!({
                    "urls": ["https://a.com"],
                    "use_google_api": true,
                    "google_credentials": credentials,
                }),
            ),
        )
        .await;

        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["error"], "Google API requested but no credentials provided");
    }
}

/// Returns a failed result immediately
struct InstantSubmitter;

#[async_trait::async_trait]
impl UrlSubmitter for InstantSubmitter {
    async fn submit_url(&self, url: &str, _plan: &SubmissionPlan) -> UrlResult {
        UrlResult::from_outcomes(url, vec![])
    }
}

#[tokio::test]
async fn test_index_responds_while_history_is_locked() {
    let app = build_test_app(Arc::new(InstantSubmitter), None);

    let held = app.storage.lock().unwrap();
    let (status, body) = tokio::time::timeout(
        Duration::from_secs(5),
        send(
            &app.router,
            post_json("/api/index", json!({ "urls": ["https://a.com"] })),
        ),
    )
    .await
    .expect("response waited on the history write");
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["failed"], 1);
    drop(held);

    let history = wait_for_history(&app.router, 1).await;
    assert_eq!(history["history"][0]["url"], "https://a.com");
    assert_eq!(history["history"][0]["status"], "failed");
}

/// Blocks inside its first submission until released
struct GatedSubmitter {
    started: tokio::sync::Notify,
    release: tokio::sync::Notify,
}

#[async_trait::async_trait]
impl UrlSubmitter for GatedSubmitter {
    async fn submit_url(&self, url: &str, _plan: &SubmissionPlan) -> UrlResult {
        self.started.notify_one();
        self.release.notified().await;
        UrlResult::from_outcomes(url, vec![])
    }
}

#[tokio::test]
async fn test_busy_while_batch_runs() {
    let submitter = Arc::new(GatedSubmitter {
        started: tokio::sync::Notify::new(),
        release: tokio::sync::Notify::new(),
    });
    let app = build_test_app(submitter.clone(), None);

    let router = app.router.clone();
    let first = tokio::spawn(async move {
        send(
            &router,
            post_json("/api/index", json!({ "urls": ["https://a.com"] })),
        )
        .await
    });
    submitter.started.notified().await;

    let (_, status_body) = send(&app.router, get("/api/status")).await;
    assert_eq!(status_body["status"], "indexing");
    assert_eq!(status_body["in_progress"], true);

    // Busy is reported even for a request that would fail validation
    let (status, body) = send(&app.router, post_json("/api/index", json!({}))).await;
    assert_eq!(status, StatusCode::CONFLICT);
    assert_eq!(body["error"], "Indexing already in progress");

    submitter.release.notify_one();
    let (status, body) = first.await.unwrap();
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["failed"], 1);
}

struct PanickingSubmitter;

#[async_trait::async_trait]
impl UrlSubmitter for PanickingSubmitter {
    async fn submit_url(&self, _url: &str, _plan: &SubmissionPlan) -> UrlResult {
        panic!("unexpected fault");
    }
}

#[tokio::test]
async fn test_panicking_batch_returns_500_and_releases_guard() {
    let app = build_test_app(Arc::new(PanickingSubmitter), None);
    let request = || post_json("/api/index", json!({ "urls": ["https://a.com"] }));

    let (status, body) = send(&app.router, request()).await;
    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(body["error"], "Internal server error");

    let (_, status_body) = send(&app.router, get("/api/status")).await;
    assert_eq!(status_body["status"], "idle");

    // Not stuck busy
    let (status, _) = send(&app.router, request()).await;
    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
}

fn multipart_request(file_name: &str, content: &str) -> Request<Body> {
    let boundary = "courier-test-boundary";
    let body = format!(
        "--{b}\r\nContent-Disposition: form-data; name=\"file\"; filename=\"{f}\"\r\nContent-Type: application/octet-stream\r\n\r\n{c}\r\n--{b}--\r\n",
        b = boundary,
        f = file_name,
        c = content
    );
    Request::builder()
        .method("POST")
        .uri("/api/extract-urls")
        .header(
            "content-type",
            format!("multipart/form-data; boundary={}", boundary),
        )
        .body(Body::from(body))
        .unwrap()
}

#[tokio::test]
async fn test_extract_urls_from_document() {
    let (app, _server) = mock_engine_app(None).await;
    let content = "See https://a.com/x, and https://b.com/y. Again https://a.com/x!";

    let (status, body) = send(&app.router, multipart_request("links.pdf", content)).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["success"], true);
    assert_eq!(body["count"], 2);
    assert_eq!(body["urls"], json!(["https://a.com/x", "https://b.com/y"]));
}

#[tokio::test]
async fn test_extract_urls_from_plain_text_keeps_duplicates() {
    let (app, _server) = mock_engine_app(None).await;
    let content = "https://a.com\nnot a url\n  https://a.com  \n";

    let (_, body) = send(&app.router, multipart_request("urls.txt", content)).await;

    assert_eq!(body["urls"], json!(["https://a.com", "https://a.com"]));
}

#[tokio::test]
async fn test_extract_urls_requires_file_field() {
    let (app, _server) = mock_engine_app(None).await;
    let boundary = "b";
    let request = Request::builder()
        .method("POST")
        .uri("/api/extract-urls")
        .header(
            "content-type",
            format!("multipart/form-data; boundary={}", boundary),
        )
        .body(Body::from(format!(
            "--{b}\r\nContent-Disposition: form-data; name=\"other\"\r\n\r\nx\r\n--{b}--\r\n",
            b = boundary
        )))
        .unwrap();

    let (status, body) = send(&app.router, request).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], "No file provided");
}
