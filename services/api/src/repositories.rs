//! Repositories over the backend REST endpoints
//!
//! Each repository wraps an [`ApiClient`] and owns the paths of one area of
//! the API.

use tracing::info;

use crate::{client::ApiClient, error::ApiResult, models::AccountDeletion};

pub mod admin;
pub mod course;
pub mod order;
pub mod profile;
pub mod video;

pub use admin::UserAdminRepository;
pub use course::CourseRepository;
pub use order::OrderRepository;
pub use profile::ProfileRepository;
pub use video::VideoRepository;

/// Account repository
#[derive(Clone)]
pub struct AccountRepository {
    client: ApiClient,
}

impl AccountRepository {
    /// Create a new account repository
    pub fn new(client: ApiClient) -> Self {
        Self { client }
    }

    /// Permanently delete the current account
    ///
    /// The caller is expected to clear the local session afterwards.
    pub async fn delete(&self) -> ApiResult<AccountDeletion> {
        info!("Deleting current account");
        self.client.delete("/api/account").await
    }
}
