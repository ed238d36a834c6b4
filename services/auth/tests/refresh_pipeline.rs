//! Integration tests for the authenticated request pipeline
//!
//! A mock backend built with axum accepts only the bearer token `fresh`,
//! mints it from the refresh token `refresh-1`, and counts refresh calls.

use std::sync::{
    Arc, Mutex,
    atomic::{AtomicBool, AtomicUsize, Ordering},
};
use std::time::Duration;

use auth::{
    AuthPipeline, LoginError, LoginFlow, PipelineError, RefreshError, SessionEvent, SessionStore,
};
use axum::{
    Json, Router,
    extract::State,
    http::{HeaderMap, StatusCode},
    response::IntoResponse,
    routing::{get, post},
};
use common::{MemoryStorage, Navigator};
use reqwest::Method;
use serde_json::{Value, json};
use tokio::net::TcpListener;
use url::Url;

const CURRENT_PATH: &str = "/courses/1/videos/2";

#[derive(Default)]
struct MockBackend {
    refresh_calls: AtomicUsize,
    protected_calls: AtomicUsize,
    reject_refresh: AtomicBool,
    reject_everything: AtomicBool,
    fail_logout: AtomicBool,
}

fn bearer(headers: &HeaderMap) -> Option<&str> {
    headers
        .get("authorization")
        .and_then(|value| value.to_str().ok())
        .and_then(|value| value.strip_prefix("Bearer "))
}

async fn protected(State(state): State<Arc<MockBackend>>, headers: HeaderMap) -> impl IntoResponse {
    state.protected_calls.fetch_add(1, Ordering::SeqCst);

    if !state.reject_everything.load(Ordering::SeqCst) && bearer(&headers) == Some("fresh") {
        (StatusCode::OK, Json(json!({ "ok": true })))
    } else {
        (
            StatusCode::UNAUTHORIZED,
            Json(json!({ "code": "UNAUTHORIZED", "message": "請先登入" })),
        )
    }
}

async fn refresh(State(state): State<Arc<MockBackend>>, Json(body): Json<Value>) -> impl IntoResponse {
    state.refresh_calls.fetch_add(1, Ordering::SeqCst);
    tokio::time::sleep(Duration::from_millis(100)).await;

    if state.reject_refresh.load(Ordering::SeqCst) || body["refresh_token"] != "refresh-1" {
        return (
            StatusCode::UNAUTHORIZED,
            Json(json!({ "code": "INVALID_REFRESH_TOKEN", "message": "無效的刷新權杖" })),
        );
    }

    (
        StatusCode::OK,
        Json(json!({ "access_token": "fresh", "token_type": "Bearer", "expires_in": 900 })),
    )
}

async fn session(headers: HeaderMap) -> impl IntoResponse {
    if bearer(&headers) != Some("fresh") {
        return (StatusCode::UNAUTHORIZED, Json(json!({})));
    }

    (
        StatusCode::OK,
        Json(json!({
            "user_id": 42,
            "nickname": "Lin",
            "email": "lin@example.com",
            "level": 5,
            "role": "TEACHER",
            "oauth_providers": ["google"]
        })),
    )
}

async fn logout(State(state): State<Arc<MockBackend>>) -> StatusCode {
    if state.fail_logout.load(Ordering::SeqCst) {
        StatusCode::INTERNAL_SERVER_ERROR
    } else {
        StatusCode::NO_CONTENT
    }
}

async fn spawn_backend(state: Arc<MockBackend>) -> Url {
    let app = Router::new()
        .route("/api/protected", get(protected))
        .route("/auth/refresh", post(refresh))
        .route("/auth/session", get(session))
        .route("/auth/logout", post(logout))
        .with_state(state);

    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });

    format!("http://{}", addr).parse().unwrap()
}

#[derive(Default)]
struct RecordingNavigator {
    visited: Mutex<Vec<String>>,
}

impl RecordingNavigator {
    fn visited(&self) -> Vec<String> {
        self.visited.lock().unwrap().clone()
    }
}

impl Navigator for RecordingNavigator {
    fn current_path(&self) -> String {
        CURRENT_PATH.to_string()
    }

    fn navigate(&self, path: &str) {
        self.visited.lock().unwrap().push(path.to_string());
    }
}

struct Harness {
    backend: Arc<MockBackend>,
    navigator: Arc<RecordingNavigator>,
    pipeline: AuthPipeline,
}

impl Harness {
    async fn new() -> Self {
        let backend = Arc::new(MockBackend::default());
        let base_url = spawn_backend(backend.clone()).await;
        let navigator = Arc::new(RecordingNavigator::default());
        let session = SessionStore::new(Arc::new(MemoryStorage::new()));
        let pipeline = AuthPipeline::with_http_client(
            reqwest::Client::new(),
            base_url,
            session,
            navigator.clone(),
        )
        .unwrap();

        Self {
            backend,
            navigator,
            pipeline,
        }
    }

    fn session(&self) -> &SessionStore {
        self.pipeline.session()
    }

    async fn get_protected(&self) -> Result<reqwest::Response, PipelineError> {
        let builder = self.pipeline.request(Method::GET, "/api/protected")?;
        self.pipeline.execute(builder).await
    }

    fn refresh_calls(&self) -> usize {
        self.backend.refresh_calls.load(Ordering::SeqCst)
    }
}

#[tokio::test]
async fn test_valid_token_is_attached() -> anyhow::Result<()> {
    let harness = Harness::new().await;
    harness.session().set_tokens("fresh", Some("refresh-1"))?;

    let response = harness.get_protected().await?;

    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(harness.refresh_calls(), 0);
    Ok(())
}

#[tokio::test]
async fn test_expired_token_is_refreshed_and_request_retried() -> anyhow::Result<()> {
    let harness = Harness::new().await;
    harness.session().set_tokens("stale", Some("refresh-1"))?;
    let mut events = harness.session().subscribe();

    let response = harness.get_protected().await?;

    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(harness.refresh_calls(), 1);
    assert_eq!(harness.backend.protected_calls.load(Ordering::SeqCst), 2);
    assert_eq!(harness.session().access_token()?, Some("fresh".to_string()));
    assert_eq!(
        harness.session().refresh_token()?,
        Some("refresh-1".to_string())
    );
    assert_eq!(events.recv().await?, SessionEvent::TokenRefreshed);
    Ok(())
}

#[tokio::test]
async fn test_concurrent_unauthorized_requests_share_one_refresh() -> anyhow::Result<()> {
    let harness = Harness::new().await;
    harness.session().set_tokens("stale", Some("refresh-1"))?;

    let (first, second, third) = tokio::join!(
        harness.get_protected(),
        harness.get_protected(),
        harness.get_protected()
    );

    assert_eq!(first?.status(), StatusCode::OK);
    assert_eq!(second?.status(), StatusCode::OK);
    assert_eq!(third?.status(), StatusCode::OK);
    assert_eq!(harness.refresh_calls(), 1);
    Ok(())
}

#[tokio::test]
async fn test_second_unauthorized_is_returned_without_another_refresh() -> anyhow::Result<()> {
    let harness = Harness::new().await;
    harness.session().set_tokens("stale", Some("refresh-1"))?;
    harness.backend.reject_everything.store(true, Ordering::SeqCst);

    let response = harness.get_protected().await?;

    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    assert_eq!(harness.refresh_calls(), 1);
    assert_eq!(harness.backend.protected_calls.load(Ordering::SeqCst), 2);
    assert!(harness.navigator.visited().is_empty());
    Ok(())
}

#[tokio::test]
async fn test_missing_refresh_token_propagates_unauthorized() -> anyhow::Result<()> {
    let harness = Harness::new().await;
    harness.session().set_tokens("stale", None)?;

    let response = harness.get_protected().await?;

    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    assert_eq!(harness.refresh_calls(), 0);
    assert_eq!(harness.session().access_token()?, Some("stale".to_string()));
    Ok(())
}

#[tokio::test]
async fn test_refresh_failure_expires_session_once() -> anyhow::Result<()> {
    let harness = Harness::new().await;
    harness.session().set_tokens("stale", Some("refresh-1"))?;
    harness.backend.reject_refresh.store(true, Ordering::SeqCst);

    let (first, second) = tokio::join!(harness.get_protected(), harness.get_protected());

    for result in [first, second] {
        match result {
            Err(PipelineError::RefreshFailed(RefreshError::Rejected(status))) => {
                assert_eq!(status, 401)
            }
            other => panic!("expected refresh failure, got {:?}", other.map(|r| r.status())),
        }
    }

    assert_eq!(harness.refresh_calls(), 1);
    assert_eq!(harness.session().access_token()?, None);
    assert_eq!(harness.session().refresh_token()?, None);
    assert_eq!(
        harness.session().take_redirect()?,
        Some(CURRENT_PATH.to_string())
    );
    assert_eq!(harness.navigator.visited(), vec!["/login".to_string()]);
    Ok(())
}

#[tokio::test]
async fn test_login_callback_establishes_session() -> anyhow::Result<()> {
    let harness = Harness::new().await;
    let flow = LoginFlow::new(harness.pipeline.clone(), harness.navigator.clone());
    let mut events = harness.session().subscribe();
    harness.session().save_redirect("/courses/3")?;

    let callback: Url =
        "http://localhost:3000/oauth/callback?access_token=fresh&refresh_token=refresh-1".parse()?;
    let redirect = flow.complete(&callback).await?;

    assert_eq!(redirect, "/courses/3");
    let user = harness.session().user()?.expect("user cached");
    assert_eq!(user.user_id, 42);
    assert_eq!(user.role, auth::UserRole::Teacher);
    assert!(matches!(events.recv().await?, SessionEvent::LoggedIn(_)));

    // Redirect was consumed; the next login lands on the home page
    let redirect = flow.complete(&callback).await?;
    assert_eq!(redirect, "/");
    Ok(())
}

#[tokio::test]
async fn test_login_callback_errors() -> anyhow::Result<()> {
    let harness = Harness::new().await;
    let flow = LoginFlow::new(harness.pipeline.clone(), harness.navigator.clone());

    let denied: Url = "http://localhost:3000/oauth/callback?error=access_denied".parse()?;
    assert!(matches!(
        flow.complete(&denied).await,
        Err(LoginError::Provider(message)) if message == "access_denied"
    ));

    let empty: Url = "http://localhost:3000/oauth/callback".parse()?;
    assert!(matches!(
        flow.complete(&empty).await,
        Err(LoginError::MissingAccessToken)
    ));
    assert_eq!(harness.session().access_token()?, None);
    Ok(())
}

#[tokio::test]
async fn test_logout_clears_session_even_when_backend_fails() -> anyhow::Result<()> {
    let harness = Harness::new().await;
    let flow = LoginFlow::new(harness.pipeline.clone(), harness.navigator.clone());
    harness.session().set_tokens("fresh", Some("refresh-1"))?;
    harness.backend.fail_logout.store(true, Ordering::SeqCst);

    flow.logout().await?;

    assert_eq!(harness.session().access_token()?, None);
    assert_eq!(harness.session().refresh_token()?, None);
    assert_eq!(harness.navigator.visited(), vec!["/login".to_string()]);
    Ok(())
}
