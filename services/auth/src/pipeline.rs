//! Authenticated request pipeline
//!
//! Attaches the stored bearer credential to outbound requests and recovers
//! from an expired access token by running one refresh exchange and
//! re-issuing the request exactly once.

use std::sync::Arc;

use common::{ClientConfig, Navigator};
use reqwest::{
    Method, Request, RequestBuilder, Response, StatusCode,
    header::{AUTHORIZATION, HeaderValue},
};
use tracing::{debug, info, warn};
use url::Url;

use crate::{
    error::{PipelineError, PipelineResult},
    refresh::{RefreshOutcome, Refresher},
    session::SessionStore,
};

/// Refresh endpoint path
pub const REFRESH_PATH: &str = "/auth/refresh";

/// HTTP client that injects and refreshes bearer credentials
#[derive(Clone)]
pub struct AuthPipeline {
    http: reqwest::Client,
    base_url: Url,
    session: SessionStore,
    refresher: Arc<Refresher>,
}

impl AuthPipeline {
    /// Create a new pipeline for the configured backend
    pub fn new(
        config: &ClientConfig,
        session: SessionStore,
        navigator: Arc<dyn Navigator>,
    ) -> PipelineResult<Self> {
        let http = reqwest::Client::builder()
            .timeout(config.request_timeout())
            .build()?;

        Self::with_http_client(http, config.backend_url.clone(), session, navigator)
    }

    /// Use a custom HTTP client (for connection pool reuse or testing)
    pub fn with_http_client(
        http: reqwest::Client,
        base_url: Url,
        session: SessionStore,
        navigator: Arc<dyn Navigator>,
    ) -> PipelineResult<Self> {
        let base_url = with_trailing_slash(base_url);
        let refresh_url = resolve(&base_url, REFRESH_PATH)?;
        let refresher = Refresher::new(http.clone(), refresh_url, session.clone(), navigator);

        Ok(Self {
            http,
            base_url,
            session,
            refresher: Arc::new(refresher),
        })
    }

    /// Session store the pipeline reads credentials from
    pub fn session(&self) -> &SessionStore {
        &self.session
    }

    /// Backend base URL
    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    /// Resolve an application path against the backend URL
    ///
    /// Paths are appended to the base, so a backend mounted under a prefix
    /// keeps it.
    pub fn url(&self, path: &str) -> PipelineResult<Url> {
        resolve(&self.base_url, path)
    }

    /// Start building a request for the given path
    ///
    /// The bearer credential is attached by [`AuthPipeline::send`], not here.
    pub fn request(&self, method: Method, path: &str) -> PipelineResult<RequestBuilder> {
        Ok(self.http.request(method, self.url(path)?))
    }

    /// Build and send a request through the pipeline
    pub async fn execute(&self, builder: RequestBuilder) -> PipelineResult<Response> {
        self.send(builder.build()?).await
    }

    /// Send a request, refreshing the access token once on 401
    ///
    /// Whatever the retried request returns is handed back as-is, including a
    /// second 401.
    pub async fn send(&self, request: Request) -> PipelineResult<Response> {
        let used_token = self.session.access_token()?;
        let retry = request.try_clone();

        let response = self.dispatch(request, used_token.as_deref()).await?;
        if response.status() != StatusCode::UNAUTHORIZED {
            return Ok(response);
        }

        let Some(retry) = retry else {
            warn!("Received 401 for a request that cannot be replayed");
            return Ok(response);
        };

        debug!("Received 401 for {} {}", retry.method(), retry.url());

        match self.refresher.refresh(used_token.as_deref()).await? {
            RefreshOutcome::Refreshed(token) => {
                info!("Retrying {} {} with refreshed token", retry.method(), retry.url());
                self.dispatch(retry, Some(&token)).await
            }
            RefreshOutcome::Unavailable => Ok(response),
            RefreshOutcome::Failed(e) => Err(PipelineError::RefreshFailed(e)),
        }
    }

    async fn dispatch(&self, mut request: Request, token: Option<&str>) -> PipelineResult<Response> {
        if let Some(token) = token {
            let value = HeaderValue::from_str(&format!("Bearer {}", token))
                .map_err(|_| PipelineError::InvalidToken)?;
            request.headers_mut().insert(AUTHORIZATION, value);
        } else {
            request.headers_mut().remove(AUTHORIZATION);
        }

        Ok(self.http.execute(request).await?)
    }
}

fn with_trailing_slash(mut base_url: Url) -> Url {
    if !base_url.path().ends_with('/') {
        let path = format!("{}/", base_url.path());
        base_url.set_path(&path);
    }
    base_url
}

fn resolve(base_url: &Url, path: &str) -> PipelineResult<Url> {
    Ok(base_url.join(path.trim_start_matches('/'))?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use common::MemoryStorage;

    struct StaticNavigator;

    impl Navigator for StaticNavigator {
        fn current_path(&self) -> String {
            "/".to_string()
        }

        fn navigate(&self, _path: &str) {}
    }

    fn pipeline_at(backend_url: &str) -> AuthPipeline {
        let session = SessionStore::new(Arc::new(MemoryStorage::new()));
        let config = ClientConfig::new(backend_url.parse().unwrap());
        AuthPipeline::new(&config, session, Arc::new(StaticNavigator)).unwrap()
    }

    fn pipeline() -> AuthPipeline {
        pipeline_at("http://localhost:8080")
    }

    #[test]
    fn test_paths_resolve_against_backend() {
        let pipeline = pipeline();

        assert_eq!(
            pipeline.url("/api/videos/5/progress").unwrap().as_str(),
            "http://localhost:8080/api/videos/5/progress"
        );
        assert_eq!(
            pipeline.url(REFRESH_PATH).unwrap().as_str(),
            "http://localhost:8080/auth/refresh"
        );
    }

    #[test]
    fn test_paths_keep_backend_prefix() {
        for backend_url in ["http://localhost:8080/backend/", "http://localhost:8080/backend"] {
            let pipeline = pipeline_at(backend_url);

            assert_eq!(
                pipeline.url("/api/courses/1").unwrap().as_str(),
                "http://localhost:8080/backend/api/courses/1"
            );
            assert_eq!(
                pipeline.url(REFRESH_PATH).unwrap().as_str(),
                "http://localhost:8080/backend/auth/refresh"
            );
        }
    }

    #[test]
    fn test_request_builder_carries_no_credential() {
        let pipeline = pipeline();
        pipeline.session().set_tokens("secret", None).unwrap();

        let request = pipeline
            .request(Method::GET, "/api/courses")
            .unwrap()
            .build()
            .unwrap();

        assert!(request.headers().get(AUTHORIZATION).is_none());
    }
}
