//! Flattened playback order of a course

use api::models::{CourseDetail, Video};

/// Every video of a course in playback order, with the course's access flags
#[derive(Debug, Clone)]
pub struct VideoSequence {
    course_id: i64,
    owned: bool,
    free: bool,
    videos: Vec<Video>,
}

impl VideoSequence {
    /// Flatten a course: dungeons in order, then videos by `orderIndex`
    ///
    /// Entries without an `orderIndex` keep the position the backend gave
    /// them, after the indexed ones.
    pub fn from_course(course: &CourseDetail) -> Self {
        let mut dungeons: Vec<_> = course.dungeons.iter().collect();
        dungeons.sort_by_key(|d| d.order_index.unwrap_or(i32::MAX));

        let videos = dungeons
            .into_iter()
            .flat_map(|dungeon| {
                let mut videos = dungeon.videos.clone();
                videos.sort_by_key(|v| v.order_index.unwrap_or(i32::MAX));
                videos
            })
            .collect();

        Self {
            course_id: course.course_id,
            owned: course.owned,
            free: course.free,
            videos,
        }
    }

    /// Course the sequence belongs to
    pub fn course_id(&self) -> i64 {
        self.course_id
    }

    /// Videos in playback order
    pub fn videos(&self) -> &[Video] {
        &self.videos
    }

    /// Locate a video and the one that follows it
    pub fn locate(&self, video_id: i64) -> Option<(&Video, Option<&Video>)> {
        let index = self.videos.iter().position(|v| v.video_id == video_id)?;
        Some((&self.videos[index], self.videos.get(index + 1)))
    }

    /// Whether the viewer may move on to `next` without buying anything
    pub fn is_entitled(&self, next: &Video) -> bool {
        next.demo || self.owned || self.free
    }
}
