//! Integration tests for the chart relay HTTP surface, using a stub chart
//! source so no browser is involved.

use std::{
    net::SocketAddr,
    sync::{
        Arc,
        atomic::{AtomicUsize, Ordering},
    },
};

use {async_trait::async_trait, serde_json::Value, tokio::net::TcpListener};

use {
    chartrelay_browser::{ChartSource, FetchError},
    chartrelay_gateway::{AppState, build_app},
};

type StubResult = Box<dyn Fn() -> Result<Value, FetchError> + Send + Sync>;

/// Chart source that returns a canned result and counts invocations.
struct StubSource {
    result: StubResult,
    calls: AtomicUsize,
}

impl StubSource {
    fn new(result: impl Fn() -> Result<Value, FetchError> + Send + Sync + 'static) -> Arc<Self> {
        Arc::new(Self {
            result: Box::new(result),
            calls: AtomicUsize::new(0),
        })
    }

    fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl ChartSource for StubSource {
    async fn fetch_chart(&self, _pid: &str) -> Result<Value, FetchError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        (self.result)()
    }
}

async fn start_server(source: Arc<StubSource>) -> SocketAddr {
    let origins = vec!["http://localhost".to_string()];
    let app = build_app(
        AppState {
            source: source.clone(),
        },
        &origins,
    );

    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });
    addr
}

fn parse_error() -> FetchError {
    FetchError::Parse(serde_json::from_str::<Value>("<html>").unwrap_err())
}

#[tokio::test]
async fn valid_pid_relays_upstream_json_verbatim() {
    let source = StubSource::new(|| Ok(serde_json::json!({"data": [[1700000000, 1.23]]})));
    let addr = start_server(source.clone()).await;

    let resp = reqwest::get(format!("http://{addr}/17920")).await.unwrap();
    assert_eq!(resp.status(), 200);

    let body: Value = resp.json().await.unwrap();
    assert_eq!(body, serde_json::json!({"data": [[1700000000, 1.23]]}));
    assert_eq!(source.calls(), 1);
}

#[tokio::test]
async fn missing_pid_is_rejected_without_fetch() {
    let source = StubSource::new(|| Ok(Value::Null));
    let addr = start_server(source.clone()).await;

    let resp = reqwest::get(format!("http://{addr}/")).await.unwrap();
    assert_eq!(resp.status(), 400);

    let body: Value = resp.json().await.unwrap();
    assert_eq!(body["error"], "Bad Request");
    assert_eq!(body["message"], "PID is required");
    assert_eq!(source.calls(), 0);
}

#[tokio::test]
async fn whitespace_pid_is_rejected_without_fetch() {
    let source = StubSource::new(|| Ok(Value::Null));
    let addr = start_server(source.clone()).await;

    let resp = reqwest::get(format!("http://{addr}/%20%20")).await.unwrap();
    assert_eq!(resp.status(), 400);

    let body: Value = resp.json().await.unwrap();
    assert_eq!(body["message"], "PID is required");
    assert_eq!(source.calls(), 0);
}

#[tokio::test]
async fn challenge_page_maps_to_client_error() {
    let source = StubSource::new(|| Err(FetchError::ChallengeDetected));
    let addr = start_server(source.clone()).await;

    let resp = reqwest::get(format!("http://{addr}/17920")).await.unwrap();
    assert_eq!(resp.status(), 400);

    let body: Value = resp.json().await.unwrap();
    assert_eq!(body["error"], "Error");
    assert_eq!(body["message"], "couldn't bypass CloudFlare protection");
    assert_eq!(source.calls(), 1);
}

#[tokio::test]
async fn empty_upstream_body_maps_to_server_error() {
    let source = StubSource::new(|| Err(FetchError::EmptyBody));
    let addr = start_server(source).await;

    let resp = reqwest::get(format!("http://{addr}/17920")).await.unwrap();
    assert_eq!(resp.status(), 500);

    let body: Value = resp.json().await.unwrap();
    assert_eq!(body["error"], "Internal Server Error");
    assert_eq!(body["message"], "Empty response from API");
}

#[tokio::test]
async fn unparseable_upstream_body_maps_to_server_error() {
    let source = StubSource::new(|| Err(parse_error()));
    let addr = start_server(source).await;

    let resp = reqwest::get(format!("http://{addr}/17920")).await.unwrap();
    assert_eq!(resp.status(), 500);

    let body: Value = resp.json().await.unwrap();
    assert_eq!(body["message"], "Failed to parse API response as JSON");
}

#[tokio::test]
async fn launch_failure_surfaces_its_message() {
    let source = StubSource::new(|| Err(FetchError::LaunchFailed("spawn failed".into())));
    let addr = start_server(source).await;

    let resp = reqwest::get(format!("http://{addr}/17920")).await.unwrap();
    assert_eq!(resp.status(), 500);

    let body: Value = resp.json().await.unwrap();
    assert_eq!(body["error"], "Internal Server Error");
    assert_eq!(body["message"], "browser launch failed: spawn failed");
}

#[tokio::test]
async fn health_endpoint_responds() {
    let source = StubSource::new(|| Ok(Value::Null));
    let addr = start_server(source).await;

    let resp = reqwest::get(format!("http://{addr}/health")).await.unwrap();
    assert_eq!(resp.status(), 200);

    let body: Value = resp.json().await.unwrap();
    assert_eq!(body["status"], "ok");
}

#[tokio::test]
async fn allowed_origin_gets_cors_header() {
    let source = StubSource::new(|| Ok(serde_json::json!({"data": []})));
    let addr = start_server(source).await;

    let client = reqwest::Client::new();
    let resp = client
        .get(format!("http://{addr}/17920"))
        .header("Origin", "http://localhost")
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), 200);
    assert_eq!(
        resp.headers()
            .get("access-control-allow-origin")
            .and_then(|v| v.to_str().ok()),
        Some("http://localhost")
    );
}

#[tokio::test]
async fn disallowed_origin_gets_no_cors_header() {
    let source = StubSource::new(|| Ok(serde_json::json!({"data": []})));
    let addr = start_server(source).await;

    let client = reqwest::Client::new();
    let resp = client
        .get(format!("http://{addr}/17920"))
        .header("Origin", "https://evil.example")
        .send()
        .await
        .unwrap();
    // The request still succeeds server-side; the browser enforces CORS.
    assert_eq!(resp.status(), 200);
    assert!(
        resp.headers().get("access-control-allow-origin").is_none()
    );
}

#[tokio::test]
async fn concurrent_requests_each_complete_independently() {
    let source = StubSource::new(|| Ok(serde_json::json!({"data": [[1, 2.0]]})));
    let addr = start_server(source.clone()).await;

    let mut tasks = Vec::new();
    for pid in 0..8 {
        tasks.push(tokio::spawn(async move {
            reqwest::get(format!("http://{addr}/{pid}")).await.unwrap()
        }));
    }

    for task in tasks {
        let resp = task.await.unwrap();
        assert_eq!(resp.status(), 200);
    }
    assert_eq!(source.calls(), 8);
}
