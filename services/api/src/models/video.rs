//! Video progress and completion models

use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

/// Stored watch progress for one video
///
/// A video never watched comes back with zero position and no timestamp.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct VideoProgress {
    #[serde(default)]
    pub watch_percentage: f64,
    #[serde(default)]
    pub last_position_seconds: i32,
    #[serde(default)]
    pub is_completed: bool,
    #[serde(default)]
    pub updated_at: Option<NaiveDateTime>,
}

/// Body of a progress save
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct SaveProgressRequest {
    pub current_position_seconds: i32,
}

/// Result of marking a video complete
///
/// Completion is idempotent on the backend: repeating it reports
/// `already_completed` and awards no further experience.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct VideoCompletion {
    #[serde(default)]
    pub completion_id: Option<i64>,
    pub video_id: i64,
    #[serde(default)]
    pub user_id: Option<i64>,
    #[serde(default)]
    pub exp_awarded: i32,
    #[serde(default)]
    pub leveled_up: bool,
    #[serde(default)]
    pub current_level: Option<i32>,
    #[serde(default)]
    pub current_exp: Option<i32>,
    #[serde(default)]
    pub exp_for_next_level: Option<i32>,
    #[serde(default)]
    pub exp_progress_percentage: Option<i32>,
    #[serde(default)]
    pub completed_at: Option<NaiveDateTime>,
    #[serde(default)]
    pub already_completed: bool,
}

impl VideoCompletion {
    /// Experience gained by this call; zero when it was a repeat
    pub fn newly_awarded_exp(&self) -> i32 {
        if self.already_completed {
            0
        } else {
            self.exp_awarded
        }
    }
}

/// Whether the current user completed a video
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct CompletionStatus {
    pub video_id: i64,
    #[serde(default)]
    pub is_completed: bool,
    #[serde(default)]
    pub completed_at: Option<NaiveDateTime>,
    #[serde(default)]
    pub exp_awarded: Option<i32>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_progress_wire_format() {
        let raw = r#"{"watchPercentage": 41.5, "lastPositionSeconds": 249,
                      "isCompleted": false, "updatedAt": "2025-03-01T10:15:30"}"#;

        let progress: VideoProgress = serde_json::from_str(raw).unwrap();

        assert_eq!(progress.last_position_seconds, 249);
        assert!(!progress.is_completed);
        assert!(progress.updated_at.is_some());

        let empty: VideoProgress = serde_json::from_str(
            r#"{"watchPercentage": 0, "lastPositionSeconds": 0, "isCompleted": false, "updatedAt": null}"#,
        )
        .unwrap();
        assert_eq!(empty, VideoProgress::default());
    }

    #[test]
    fn test_save_body_is_camel_case() {
        let body = serde_json::to_value(SaveProgressRequest {
            current_position_seconds: 7,
        })
        .unwrap();

        assert_eq!(body, serde_json::json!({ "currentPositionSeconds": 7 }));
    }

    #[test]
    fn test_repeated_completion_awards_nothing() {
        let raw = r#"{"video_id": 5, "exp_awarded": 100, "leveled_up": false,
                      "current_level": 3, "current_exp": 450,
                      "completed_at": "2025-03-01T10:15:30", "already_completed": true}"#;

        let completion: VideoCompletion = serde_json::from_str(raw).unwrap();

        assert!(completion.already_completed);
        assert_eq!(completion.newly_awarded_exp(), 0);
    }
}
