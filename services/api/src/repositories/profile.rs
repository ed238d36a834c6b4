//! Profile repository

use tracing::info;

use crate::{
    client::ApiClient,
    error::{ApiError, ApiResult},
    models::{Profile, ProfileUpdateResponse, UpdateProfileRequest},
    validation::validate_profile,
};

const PROFILE_PATH: &str = "/api/profile";

/// Profile repository
#[derive(Clone)]
pub struct ProfileRepository {
    client: ApiClient,
}

impl ProfileRepository {
    /// Create a new profile repository
    pub fn new(client: ApiClient) -> Self {
        Self { client }
    }

    /// Get the profile of the current user
    pub async fn get(&self) -> ApiResult<Profile> {
        self.client.get(PROFILE_PATH).await
    }

    /// Update the profile of the current user
    ///
    /// The request is validated locally first; nothing is sent when a field
    /// is rejected.
    pub async fn update(&self, request: &UpdateProfileRequest) -> ApiResult<ProfileUpdateResponse> {
        validate_profile(request).map_err(ApiError::InvalidInput)?;

        let response: ProfileUpdateResponse = self.client.put(PROFILE_PATH, request).await?;
        info!("Profile updated for user: {}", response.profile.user_id);
        Ok(response)
    }
}
