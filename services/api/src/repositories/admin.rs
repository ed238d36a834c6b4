//! User management repository (admin only)

use auth::UserRole;
use reqwest::Method;
use tracing::info;

use crate::{
    client::ApiClient,
    error::ApiResult,
    models::{Page, UpdateUserRoleRequest, UserSummary},
};

/// Default page size of the user listing
pub const DEFAULT_PAGE_SIZE: u32 = 20;

/// User management repository
#[derive(Clone)]
pub struct UserAdminRepository {
    client: ApiClient,
}

impl UserAdminRepository {
    /// Create a new user management repository
    pub fn new(client: ApiClient) -> Self {
        Self { client }
    }

    /// Get one page of users, newest first; `page` is zero-based
    pub async fn get_page(&self, page: u32, size: u32) -> ApiResult<Page<UserSummary>> {
        let builder = self
            .client
            .request(Method::GET, "/admin/users")?
            .query(&[("page", page), ("size", size)]);
        self.client.fetch(builder).await
    }

    /// Get every user without pagination
    pub async fn get_all(&self) -> ApiResult<Vec<UserSummary>> {
        self.client.get("/admin/users/all").await
    }

    /// Get a user by ID
    pub async fn get_by_id(&self, user_id: i64) -> ApiResult<UserSummary> {
        self.client.get(&format!("/admin/users/{}", user_id)).await
    }

    /// Change the role of a user
    pub async fn update_role(&self, user_id: i64, role: UserRole) -> ApiResult<UserSummary> {
        info!("Updating role for user {} to {}", user_id, role);
        self.client
            .put(
                &format!("/admin/users/{}/role", user_id),
                &UpdateUserRoleRequest { role },
            )
            .await
    }
}
