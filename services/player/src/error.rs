//! Custom error types for the player

use api::ApiError;
use common::ConfigError;
use thiserror::Error;

/// Custom error type for the video session controller
#[derive(Error, Debug)]
pub enum PlayerError {
    /// Backend call failed
    #[error(transparent)]
    Api(#[from] ApiError),

    /// The requested video is not part of the course
    #[error("Video {video_id} not found in course {course_id}")]
    VideoNotFound { course_id: i64, video_id: i64 },

    /// The operation is not valid in the current phase
    #[error("Cannot {action} while {phase}")]
    InvalidPhase {
        action: &'static str,
        phase: &'static str,
    },

    /// Playback rate outside the supported set
    #[error("Unsupported playback speed: {0}")]
    UnsupportedSpeed(f64),

    /// Settings could not be loaded
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),
}

/// Type alias for player results
pub type PlayerResult<T> = Result<T, PlayerError>;
