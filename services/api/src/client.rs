//! JSON client over the authenticated request pipeline

use auth::AuthPipeline;
use reqwest::{Method, RequestBuilder, Response};
use serde::{Serialize, de::DeserializeOwned};
use tracing::{debug, warn};

use crate::error::{ApiError, ApiResult};

/// Typed access to the backend REST API
#[derive(Clone)]
pub struct ApiClient {
    pipeline: AuthPipeline,
}

impl ApiClient {
    /// Create a new API client
    pub fn new(pipeline: AuthPipeline) -> Self {
        Self { pipeline }
    }

    /// Underlying request pipeline
    pub fn pipeline(&self) -> &AuthPipeline {
        &self.pipeline
    }

    /// Start building a request for the given path
    pub fn request(&self, method: Method, path: &str) -> ApiResult<RequestBuilder> {
        Ok(self.pipeline.request(method, path)?)
    }

    /// GET a JSON resource
    pub async fn get<T: DeserializeOwned>(&self, path: &str) -> ApiResult<T> {
        self.fetch(self.request(Method::GET, path)?).await
    }

    /// POST a JSON body and decode the JSON answer
    pub async fn post<B, T>(&self, path: &str, body: &B) -> ApiResult<T>
    where
        B: Serialize + ?Sized,
        T: DeserializeOwned,
    {
        self.fetch(self.request(Method::POST, path)?.json(body)).await
    }

    /// POST without a body and decode the JSON answer
    pub async fn post_empty<T: DeserializeOwned>(&self, path: &str) -> ApiResult<T> {
        self.fetch(self.request(Method::POST, path)?).await
    }

    /// PUT a JSON body and decode the JSON answer
    pub async fn put<B, T>(&self, path: &str, body: &B) -> ApiResult<T>
    where
        B: Serialize + ?Sized,
        T: DeserializeOwned,
    {
        self.fetch(self.request(Method::PUT, path)?.json(body)).await
    }

    /// DELETE a resource and decode the JSON answer
    pub async fn delete<T: DeserializeOwned>(&self, path: &str) -> ApiResult<T> {
        self.fetch(self.request(Method::DELETE, path)?).await
    }

    /// Send a prepared request and decode a JSON body
    pub async fn fetch<T: DeserializeOwned>(&self, builder: RequestBuilder) -> ApiResult<T> {
        let response = self.send(builder).await?;
        let body = response.bytes().await?;
        Ok(serde_json::from_slice(&body)?)
    }

    /// Send a prepared request; non-success statuses become [`ApiError`]
    pub async fn send(&self, builder: RequestBuilder) -> ApiResult<Response> {
        let response = self.pipeline.execute(builder).await?;
        let status = response.status();

        if status.is_success() {
            debug!("{} {}", status, response.url().path());
            return Ok(response);
        }

        let path = response.url().path().to_string();
        let body = response.bytes().await.unwrap_or_default();
        let error = ApiError::from_response(status, &body);

        if status.is_server_error() {
            warn!("{} {}: {}", status, path, error);
        } else {
            debug!("{} {}: {}", status, path, error);
        }

        Err(error)
    }
}
