//! Backend calls the video session controller depends on

use api::{
    ApiResult, ApiState,
    models::{CourseDetail, VideoCompletion, VideoProgress},
};
use async_trait::async_trait;

/// Course and progress endpoints used during playback
#[async_trait]
pub trait VideoBackend: Send + Sync {
    /// Course structure with dungeons and videos
    async fn course(&self, course_id: i64) -> ApiResult<CourseDetail>;

    /// Stored watch progress
    async fn progress(&self, video_id: i64) -> ApiResult<VideoProgress>;

    /// Persist the playhead position in whole seconds
    async fn save_progress(&self, video_id: i64, position: i32) -> ApiResult<VideoProgress>;

    /// Mark the video complete
    async fn complete(&self, video_id: i64) -> ApiResult<VideoCompletion>;
}

#[async_trait]
impl VideoBackend for ApiState {
    async fn course(&self, course_id: i64) -> ApiResult<CourseDetail> {
        self.course_repository.get_by_id(course_id).await
    }

    async fn progress(&self, video_id: i64) -> ApiResult<VideoProgress> {
        self.video_repository.get_progress(video_id).await
    }

    async fn save_progress(&self, video_id: i64, position: i32) -> ApiResult<VideoProgress> {
        self.video_repository.save_progress(video_id, position).await
    }

    async fn complete(&self, video_id: i64) -> ApiResult<VideoCompletion> {
        self.video_repository.complete(video_id).await
    }
}
