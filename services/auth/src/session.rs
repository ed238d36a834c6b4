//! Session management on top of client storage
//!
//! `SessionStore` owns the credential pair, the cached user and the pending
//! post-login redirect. Every mutation is announced on a broadcast channel so
//! navigation bars and route guards can subscribe instead of polling storage.

use std::sync::Arc;

use common::{Storage, StorageResult, storage::keys};
use tokio::sync::broadcast;
use tracing::{info, warn};

use crate::models::SessionInfo;

const EVENT_CAPACITY: usize = 16;

/// Change notification published by the session store
#[derive(Debug, Clone, PartialEq)]
pub enum SessionEvent {
    /// Login completed and the user is known
    LoggedIn(SessionInfo),
    /// Cached user information was replaced
    UserChanged(SessionInfo),
    /// A refresh exchange stored a new access token
    TokenRefreshed,
    /// Credentials and user were cleared by an explicit logout
    LoggedOut,
    /// The session could not be recovered; the user must log in again
    LoginRequired { redirect: String },
}

/// Session store shared by the pipeline and UI components
#[derive(Clone)]
pub struct SessionStore {
    storage: Arc<dyn Storage>,
    events: broadcast::Sender<SessionEvent>,
}

impl SessionStore {
    /// Create a new session store over the given storage
    pub fn new(storage: Arc<dyn Storage>) -> Self {
        let (events, _) = broadcast::channel(EVENT_CAPACITY);
        Self { storage, events }
    }

    /// Register for session change notifications
    pub fn subscribe(&self) -> broadcast::Receiver<SessionEvent> {
        self.events.subscribe()
    }

    fn publish(&self, event: SessionEvent) {
        // No subscribers is a normal state
        let _ = self.events.send(event);
    }

    /// Current access token, if any
    pub fn access_token(&self) -> StorageResult<Option<String>> {
        self.storage.get(keys::ACCESS_TOKEN)
    }

    /// Current refresh token, if any
    pub fn refresh_token(&self) -> StorageResult<Option<String>> {
        self.storage.get(keys::REFRESH_TOKEN)
    }

    /// Whether an access token is stored
    pub fn is_authenticated(&self) -> StorageResult<bool> {
        Ok(self.access_token()?.is_some())
    }

    /// Store the credential pair issued at login
    ///
    /// The refresh token is optional because some login paths only hand out
    /// an access token.
    pub fn set_tokens(&self, access_token: &str, refresh_token: Option<&str>) -> StorageResult<()> {
        self.storage.set(keys::ACCESS_TOKEN, access_token)?;
        if let Some(refresh_token) = refresh_token {
            self.storage.set(keys::REFRESH_TOKEN, refresh_token)?;
        }
        Ok(())
    }

    /// Overwrite the access token after a successful refresh
    pub fn set_access_token(&self, access_token: &str) -> StorageResult<()> {
        self.storage.set(keys::ACCESS_TOKEN, access_token)?;
        self.publish(SessionEvent::TokenRefreshed);
        Ok(())
    }

    /// Destroy both tokens
    pub fn clear_tokens(&self) -> StorageResult<()> {
        self.storage.remove(keys::ACCESS_TOKEN)?;
        self.storage.remove(keys::REFRESH_TOKEN)?;
        Ok(())
    }

    /// Cached user, if any
    ///
    /// A corrupt entry is treated as absent.
    pub fn user(&self) -> StorageResult<Option<SessionInfo>> {
        let Some(raw) = self.storage.get(keys::USER)? else {
            return Ok(None);
        };

        match serde_json::from_str(&raw) {
            Ok(user) => Ok(Some(user)),
            Err(e) => {
                warn!("Discarding unreadable cached user: {}", e);
                Ok(None)
            }
        }
    }

    /// Replace the cached user and notify subscribers
    pub fn set_user(&self, user: &SessionInfo) -> StorageResult<()> {
        let raw = serde_json::to_string(user)?;
        self.storage.set(keys::USER, &raw)?;
        self.publish(SessionEvent::UserChanged(user.clone()));
        Ok(())
    }

    /// Record a completed login
    pub(crate) fn establish(&self, user: &SessionInfo) -> StorageResult<()> {
        info!("Establishing session for user: {}", user.user_id);

        let raw = serde_json::to_string(user)?;
        self.storage.set(keys::USER, &raw)?;
        self.publish(SessionEvent::LoggedIn(user.clone()));
        Ok(())
    }

    /// Clear credentials and user (logout)
    pub fn clear(&self) -> StorageResult<()> {
        info!("Clearing session");

        self.clear_tokens()?;
        self.storage.remove(keys::USER)?;
        self.publish(SessionEvent::LoggedOut);
        Ok(())
    }

    /// Clear credentials after an irrecoverable refresh failure
    ///
    /// The current location is kept for the post-login redirect.
    pub fn expire(&self, current_path: &str) -> StorageResult<()> {
        info!("Session expired, will return to {}", current_path);

        self.clear_tokens()?;
        self.save_redirect(current_path)?;
        self.publish(SessionEvent::LoginRequired {
            redirect: current_path.to_string(),
        });
        Ok(())
    }

    /// Remember where to go once the user has logged in
    pub fn save_redirect(&self, path: &str) -> StorageResult<()> {
        self.storage.set(keys::REDIRECT_AFTER_LOGIN, path)
    }

    /// Get the pending redirect and clear it
    pub fn take_redirect(&self) -> StorageResult<Option<String>> {
        let redirect = self.storage.get(keys::REDIRECT_AFTER_LOGIN)?;
        if redirect.is_some() {
            self.storage.remove(keys::REDIRECT_AFTER_LOGIN)?;
        }
        Ok(redirect)
    }
}
