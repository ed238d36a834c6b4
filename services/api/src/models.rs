//! API models for request and response payloads
//!
//! Course, video and profile payloads use camelCase on the wire; completion,
//! admin and account payloads use snake_case. Each model carries its own
//! serde attributes accordingly.

use serde::{Deserialize, Serialize};

pub mod admin;
pub mod course;
pub mod order;
pub mod profile;
pub mod video;

pub use admin::{Page, UpdateUserRoleRequest, UserSummary};
pub use course::{CourseDetail, CourseSummary, Dungeon, Video};
pub use order::{Order, OrderItem, PaymentStatus};
pub use profile::{Achievement, Profile, ProfileUpdateResponse, UpdateProfileRequest};
pub use video::{
    CompletionStatus, SaveProgressRequest, VideoCompletion, VideoProgress,
};

/// Plain acknowledgement returned by mutating endpoints
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct MessageResponse {
    pub message: String,
}

/// Response for account deletion
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct AccountDeletion {
    pub message: String,
    #[serde(default)]
    pub url: Option<String>,
    #[serde(default)]
    pub confirmation_code: Option<String>,
}
