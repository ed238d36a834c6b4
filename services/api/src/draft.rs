//! Unsaved profile edits kept across a session expiry
//!
//! When the session expires in the middle of a profile edit the form is
//! parked in storage; after the user logs in again it is restored, provided
//! it is less than a day old.

use std::sync::Arc;

use chrono::{DateTime, Duration, Utc};
use common::{Storage, StorageResult, storage::keys};
use serde::{Deserialize, Serialize};
use tracing::{info, warn};

use crate::models::UpdateProfileRequest;

/// How long a parked draft stays restorable
pub const DRAFT_MAX_AGE_HOURS: i64 = 24;

#[derive(Serialize, Deserialize)]
struct StoredDraft {
    data: UpdateProfileRequest,
    timestamp: DateTime<Utc>,
}

/// Profile draft persistence
#[derive(Clone)]
pub struct ProfileDraftStore {
    storage: Arc<dyn Storage>,
}

impl ProfileDraftStore {
    /// Create a new draft store over the given storage
    pub fn new(storage: Arc<dyn Storage>) -> Self {
        Self { storage }
    }

    /// Park the form contents
    pub fn save(&self, draft: &UpdateProfileRequest) -> StorageResult<()> {
        self.save_at(draft, Utc::now())
    }

    fn save_at(&self, draft: &UpdateProfileRequest, now: DateTime<Utc>) -> StorageResult<()> {
        let stored = StoredDraft {
            data: draft.clone(),
            timestamp: now,
        };
        self.storage
            .set(keys::PROFILE_DRAFT, &serde_json::to_string(&stored)?)
    }

    /// Get the parked form contents if they are still fresh
    ///
    /// Stale drafts are deleted; unreadable ones are ignored.
    pub fn restore(&self) -> StorageResult<Option<UpdateProfileRequest>> {
        self.restore_at(Utc::now())
    }

    fn restore_at(&self, now: DateTime<Utc>) -> StorageResult<Option<UpdateProfileRequest>> {
        let Some(raw) = self.storage.get(keys::PROFILE_DRAFT)? else {
            return Ok(None);
        };

        let stored: StoredDraft = match serde_json::from_str(&raw) {
            Ok(stored) => stored,
            Err(e) => {
                warn!("Failed to restore profile draft: {}", e);
                return Ok(None);
            }
        };

        if now - stored.timestamp > Duration::hours(DRAFT_MAX_AGE_HOURS) {
            info!("Discarding profile draft saved at {}", stored.timestamp);
            self.clear()?;
            return Ok(None);
        }

        Ok(Some(stored.data))
    }

    /// Drop the draft after a successful save
    pub fn clear(&self) -> StorageResult<()> {
        self.storage.remove(keys::PROFILE_DRAFT)
    }
}
