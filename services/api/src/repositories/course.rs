//! Course repository

use crate::{
    client::ApiClient,
    error::ApiResult,
    models::{CourseDetail, CourseSummary},
};

/// Course repository
#[derive(Clone)]
pub struct CourseRepository {
    client: ApiClient,
}

impl CourseRepository {
    /// Create a new course repository
    pub fn new(client: ApiClient) -> Self {
        Self { client }
    }

    /// Get all published courses
    pub async fn get_all(&self) -> ApiResult<Vec<CourseSummary>> {
        self.client.get("/api/courses").await
    }

    /// Get a course with its dungeons and videos
    pub async fn get_by_id(&self, course_id: i64) -> ApiResult<CourseDetail> {
        self.client.get(&format!("/api/courses/{}", course_id)).await
    }

    /// Get the courses the current user owns
    pub async fn get_owned(&self) -> ApiResult<Vec<CourseSummary>> {
        self.client.get("/api/courses/owned").await
    }
}
