//! Profile models

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// Profile of the logged-in user
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Profile {
    pub user_id: i64,
    pub nickname: String,
    pub email: String,
    #[serde(default)]
    pub gender: Option<String>,
    #[serde(default)]
    pub birthday: Option<NaiveDate>,
    #[serde(default)]
    pub location: Option<String>,
    #[serde(default)]
    pub occupation: Option<String>,
    #[serde(default)]
    pub github_link: Option<String>,
    #[serde(default)]
    pub level: Option<i32>,
    #[serde(default)]
    pub exp: Option<i32>,
    #[serde(default)]
    pub exp_for_next_level: Option<i32>,
    #[serde(default)]
    pub exp_progress_percentage: Option<f64>,
    #[serde(default)]
    pub achievements: Vec<Achievement>,
}

/// Badge earned by the user
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Achievement {
    pub achievement_type: String,
    pub achievement_name: String,
    #[serde(default)]
    pub earned_at: Option<String>,
}

/// Editable profile fields
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct UpdateProfileRequest {
    pub nickname: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub gender: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub birthday: Option<NaiveDate>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub location: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub occupation: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub github_link: Option<String>,
}

impl From<&Profile> for UpdateProfileRequest {
    fn from(profile: &Profile) -> Self {
        Self {
            nickname: profile.nickname.clone(),
            gender: profile.gender.clone(),
            birthday: profile.birthday,
            location: profile.location.clone(),
            occupation: profile.occupation.clone(),
            github_link: profile.github_link.clone(),
        }
    }
}

/// Response for a profile update
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ProfileUpdateResponse {
    pub message: String,
    pub profile: Profile,
}
