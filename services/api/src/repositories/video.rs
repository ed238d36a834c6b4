//! Video progress and completion repository

use tracing::info;

use crate::{
    client::ApiClient,
    error::ApiResult,
    models::{CompletionStatus, SaveProgressRequest, VideoCompletion, VideoProgress},
};

/// Video repository
#[derive(Clone)]
pub struct VideoRepository {
    client: ApiClient,
}

impl VideoRepository {
    /// Create a new video repository
    pub fn new(client: ApiClient) -> Self {
        Self { client }
    }

    /// Get the stored watch progress of a video
    pub async fn get_progress(&self, video_id: i64) -> ApiResult<VideoProgress> {
        self.client
            .get(&format!("/api/videos/{}/progress", video_id))
            .await
    }

    /// Save the current playhead position, in whole seconds
    pub async fn save_progress(
        &self,
        video_id: i64,
        current_position_seconds: i32,
    ) -> ApiResult<VideoProgress> {
        self.client
            .post(
                &format!("/api/videos/{}/progress", video_id),
                &SaveProgressRequest {
                    current_position_seconds,
                },
            )
            .await
    }

    /// Mark a video complete and collect its experience reward
    pub async fn complete(&self, video_id: i64) -> ApiResult<VideoCompletion> {
        let completion: VideoCompletion = self
            .client
            .post_empty(&format!("/api/videos/{}/complete", video_id))
            .await?;

        if completion.already_completed {
            info!("Video {} was already completed", video_id);
        } else {
            info!(
                "Video {} completed, awarded {} exp",
                video_id, completion.exp_awarded
            );
        }

        Ok(completion)
    }

    /// Check whether the current user completed a video
    pub async fn completion_status(&self, video_id: i64) -> ApiResult<CompletionStatus> {
        self.client
            .get(&format!("/api/videos/{}/completion-status", video_id))
            .await
    }
}
