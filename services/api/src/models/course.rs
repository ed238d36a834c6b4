//! Course models

use serde::{Deserialize, Serialize};

/// Course as listed in the catalogue
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct CourseSummary {
    pub course_id: i64,
    pub title: String,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub cover_image_url: Option<String>,
    #[serde(default)]
    pub instructor_name: Option<String>,
    #[serde(default)]
    pub instructor_avatar_url: Option<String>,
    #[serde(default)]
    pub price: f64,
    #[serde(default)]
    pub free: bool,
    #[serde(default)]
    pub owned: bool,
    #[serde(default)]
    pub total_dungeons: i32,
    #[serde(default)]
    pub total_videos: i32,
}

/// Course with its dungeons and videos
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct CourseDetail {
    pub course_id: i64,
    pub title: String,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub cover_image_url: Option<String>,
    #[serde(default)]
    pub instructor_name: Option<String>,
    #[serde(default)]
    pub price: f64,
    #[serde(default)]
    pub free: bool,
    #[serde(default)]
    pub owned: bool,
    #[serde(default)]
    pub total_dungeons: i32,
    #[serde(default)]
    pub total_videos: i32,
    #[serde(default)]
    pub dungeons: Vec<Dungeon>,
}

impl CourseDetail {
    /// Whether the current user may watch every video of this course
    pub fn is_accessible(&self) -> bool {
        self.owned || self.free
    }

    /// All videos in playback order: dungeon order, then position within
    /// the dungeon, as delivered by the backend
    pub fn videos(&self) -> impl Iterator<Item = &Video> {
        self.dungeons.iter().flat_map(|d| d.videos.iter())
    }
}

/// Chapter of a course
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Dungeon {
    pub dungeon_id: i64,
    pub title: String,
    #[serde(default)]
    pub dungeon_number: Option<i32>,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub difficulty: Option<i32>,
    #[serde(default)]
    pub order_index: Option<i32>,
    #[serde(default)]
    pub videos: Vec<Video>,
}

/// Video entry inside a dungeon
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Video {
    pub video_id: i64,
    pub title: String,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub duration_seconds: Option<i32>,
    #[serde(default)]
    pub video_url: String,
    #[serde(default)]
    pub thumbnail_url: Option<String>,
    #[serde(default)]
    pub order_index: Option<i32>,
    #[serde(default)]
    pub exp_reward: Option<i32>,
    /// Preview video anyone may watch
    #[serde(default)]
    pub demo: bool,
    #[serde(default)]
    pub completed: bool,
}
