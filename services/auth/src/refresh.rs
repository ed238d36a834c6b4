//! Single-flight access token refresh
//!
//! At most one `POST /auth/refresh` exchange runs per session store. The
//! first request to hit a 401 leads the exchange; requests that hit a 401
//! while it is pending subscribe to its outcome instead of starting their
//! own. Failure side effects (clearing credentials, redirecting to login)
//! are performed by the leader only.

use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use common::{Navigator, navigation::LOGIN_PATH};
use tokio::sync::broadcast;
use tracing::{error, info, warn};
use url::Url;

use crate::{
    error::{PipelineResult, RefreshError},
    models::{RefreshTokenRequest, TokenResponse},
    session::SessionStore,
};

/// Result of a refresh attempt as seen by a request that received a 401
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RefreshOutcome {
    /// A usable access token, either freshly minted or minted by someone else
    Refreshed(String),
    /// No refresh token is stored; the 401 stands
    Unavailable,
    /// The exchange failed and the session was expired
    Failed(RefreshError),
}

type InflightSlot = Mutex<Option<broadcast::Sender<RefreshOutcome>>>;

fn lock(slot: &InflightSlot) -> MutexGuard<'_, Option<broadcast::Sender<RefreshOutcome>>> {
    slot.lock().unwrap_or_else(PoisonError::into_inner)
}

/// Releases waiting requests if the leading future is dropped mid-exchange
struct InflightGuard<'a> {
    slot: &'a InflightSlot,
}

impl InflightGuard<'_> {
    fn finish(self, outcome: RefreshOutcome) {
        if let Some(sender) = lock(self.slot).take() {
            let _ = sender.send(outcome);
        }
    }
}

impl Drop for InflightGuard<'_> {
    fn drop(&mut self) {
        if let Some(sender) = lock(self.slot).take() {
            let _ = sender.send(RefreshOutcome::Failed(RefreshError::Abandoned));
        }
    }
}

enum Role {
    Lead,
    Follow(broadcast::Receiver<RefreshOutcome>),
    AlreadyRefreshed(String),
}

/// Coordinates refresh exchanges for one session store
pub struct Refresher {
    http: reqwest::Client,
    refresh_url: Url,
    session: SessionStore,
    navigator: Arc<dyn Navigator>,
    inflight: InflightSlot,
}

impl Refresher {
    /// Create a new refresher
    pub fn new(
        http: reqwest::Client,
        refresh_url: Url,
        session: SessionStore,
        navigator: Arc<dyn Navigator>,
    ) -> Self {
        Self {
            http,
            refresh_url,
            session,
            navigator,
            inflight: Mutex::new(None),
        }
    }

    /// Obtain a new access token after a request sent with `stale_token`
    /// was rejected
    pub async fn refresh(&self, stale_token: Option<&str>) -> PipelineResult<RefreshOutcome> {
        let role = {
            let mut slot = lock(&self.inflight);

            match slot.as_ref() {
                Some(sender) => Role::Follow(sender.subscribe()),
                None => match self.session.access_token()? {
                    // A refresh that completed after our request left has
                    // already replaced the token we used
                    Some(current) if Some(current.as_str()) != stale_token => {
                        Role::AlreadyRefreshed(current)
                    }
                    _ => {
                        let (sender, _) = broadcast::channel(1);
                        *slot = Some(sender);
                        Role::Lead
                    }
                },
            }
        };

        match role {
            Role::AlreadyRefreshed(token) => Ok(RefreshOutcome::Refreshed(token)),
            Role::Follow(mut receiver) => {
                info!("Waiting for pending token refresh");
                Ok(receiver
                    .recv()
                    .await
                    .unwrap_or(RefreshOutcome::Failed(RefreshError::Abandoned)))
            }
            Role::Lead => {
                let guard = InflightGuard {
                    slot: &self.inflight,
                };
                let outcome = self.lead().await?;
                guard.finish(outcome.clone());
                Ok(outcome)
            }
        }
    }

    async fn lead(&self) -> PipelineResult<RefreshOutcome> {
        let Some(refresh_token) = self.session.refresh_token()? else {
            info!("No refresh token stored, leaving 401 unrecovered");
            return Ok(RefreshOutcome::Unavailable);
        };

        info!("Refreshing access token");

        match self.exchange(refresh_token).await {
            Ok(token) => {
                self.session.set_access_token(&token.access_token)?;
                info!("Access token refreshed, expires in {}s", token.expires_in);
                Ok(RefreshOutcome::Refreshed(token.access_token))
            }
            Err(e) => {
                error!("Token refresh failed: {}", e);

                let current_path = self.navigator.current_path();
                self.session.expire(&current_path)?;
                self.navigator.navigate(LOGIN_PATH);
                Ok(RefreshOutcome::Failed(e))
            }
        }
    }

    async fn exchange(&self, refresh_token: String) -> Result<TokenResponse, RefreshError> {
        let response = self
            .http
            .post(self.refresh_url.clone())
            .json(&RefreshTokenRequest { refresh_token })
            .send()
            .await
            .map_err(|e| RefreshError::Transport(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            warn!("Refresh endpoint answered {}", status);
            return Err(RefreshError::Rejected(status.as_u16()));
        }

        response
            .json::<TokenResponse>()
            .await
            .map_err(|e| RefreshError::Transport(e.to_string()))
    }
}
