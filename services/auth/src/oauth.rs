//! OAuth login and logout flow
//!
//! The provider exchange itself happens on the backend. The client starts it
//! by sending the user to the backend's authorize endpoint and finishes it on
//! the callback URL, where the backend hands back the access token.

use std::sync::Arc;

use common::{
    Navigator,
    navigation::{HOME_PATH, LOGIN_PATH},
};
use reqwest::Method;
use serde::{Deserialize, Serialize};
use tracing::{error, info, warn};
use url::Url;

use crate::{
    error::{LoginError, LoginResult, PipelineResult},
    models::SessionInfo,
    pipeline::AuthPipeline,
};

/// Session information endpoint
pub const SESSION_PATH: &str = "/auth/session";

/// Logout endpoint
pub const LOGOUT_PATH: &str = "/auth/logout";

/// OAuth2 provider types
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum OAuthProvider {
    Google,
    Facebook,
}

impl OAuthProvider {
    /// Get the provider name as a string
    pub fn as_str(&self) -> &'static str {
        match self {
            OAuthProvider::Google => "google",
            OAuthProvider::Facebook => "facebook",
        }
    }
}

impl std::str::FromStr for OAuthProvider {
    type Err = LoginError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "google" => Ok(OAuthProvider::Google),
            "facebook" => Ok(OAuthProvider::Facebook),
            other => Err(LoginError::Provider(format!("unsupported provider: {}", other))),
        }
    }
}

/// Login and logout against the backend
#[derive(Clone)]
pub struct LoginFlow {
    pipeline: AuthPipeline,
    navigator: Arc<dyn Navigator>,
}

impl LoginFlow {
    /// Create a new login flow
    pub fn new(pipeline: AuthPipeline, navigator: Arc<dyn Navigator>) -> Self {
        Self {
            pipeline,
            navigator,
        }
    }

    /// Backend URL that starts the provider authorization
    pub fn authorize_url(&self, provider: OAuthProvider) -> PipelineResult<Url> {
        self.pipeline
            .url(&format!("/auth/oauth/{}/authorize", provider.as_str()))
    }

    /// Finish a login from the callback URL the backend redirected to
    ///
    /// Returns the path to continue to: the pending post-login redirect, or
    /// the home page.
    pub async fn complete(&self, callback: &Url) -> LoginResult<String> {
        let mut access_token = None;
        let mut refresh_token = None;

        for (key, value) in callback.query_pairs() {
            match &*key {
                "error" => return Err(LoginError::Provider(value.into_owned())),
                "access_token" if !value.is_empty() => access_token = Some(value.into_owned()),
                "refresh_token" if !value.is_empty() => refresh_token = Some(value.into_owned()),
                _ => {}
            }
        }

        let access_token = access_token.ok_or(LoginError::MissingAccessToken)?;
        let session = self.pipeline.session();
        session.set_tokens(&access_token, refresh_token.as_deref())?;

        let user = self.load_session().await?;
        info!("Login completed for user: {}", user.user_id);
        session.establish(&user)?;

        let redirect = session
            .take_redirect()?
            .unwrap_or_else(|| HOME_PATH.to_string());
        Ok(redirect)
    }

    /// Reload the current user; clears the credentials when that fails
    pub async fn fetch_session(&self) -> LoginResult<Option<SessionInfo>> {
        let session = self.pipeline.session();
        if !session.is_authenticated()? {
            return Ok(None);
        }

        match self.load_session().await {
            Ok(user) => {
                session.set_user(&user)?;
                Ok(Some(user))
            }
            Err(e) => {
                warn!("Failed to fetch session: {}", e);
                session.clear_tokens()?;
                Err(e)
            }
        }
    }

    /// Log out on the backend and locally
    ///
    /// Local credentials are cleared and the login view shown even when the
    /// backend call fails.
    pub async fn logout(&self) -> PipelineResult<()> {
        let result = match self.pipeline.request(Method::POST, LOGOUT_PATH) {
            Ok(builder) => self.pipeline.execute(builder).await.map(|_| ()),
            Err(e) => Err(e),
        };

        if let Err(e) = &result {
            error!("Logout failed: {}", e);
        }

        self.pipeline.session().clear()?;
        self.navigator.navigate(LOGIN_PATH);
        Ok(())
    }

    async fn load_session(&self) -> LoginResult<SessionInfo> {
        let builder = self.pipeline.request(Method::GET, SESSION_PATH)?;
        let response = self.pipeline.execute(builder).await?;

        let status = response.status();
        if !status.is_success() {
            return Err(LoginError::Session(status.as_u16()));
        }

        let body = response.bytes().await?;
        Ok(serde_json::from_slice(&body)?)
    }
}
