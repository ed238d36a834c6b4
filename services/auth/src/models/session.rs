//! Session model and related functionality

use serde::{Deserialize, Serialize};

use super::role::UserRole;

/// Session information returned by `GET /auth/session`
///
/// Stored serialized under the `user` storage key.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SessionInfo {
    pub user_id: i64,
    pub nickname: String,
    pub email: String,
    pub level: i32,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub exp: Option<i32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub exp_for_next_level: Option<i32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub exp_progress_percentage: Option<i32>,
    pub role: UserRole,
    #[serde(default)]
    pub oauth_providers: Vec<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_session_info_from_backend_payload() {
        let payload = r#"{
            "user_id": 12,
            "nickname": "Ada",
            "email": "ada@example.com",
            "level": 3,
            "exp": 250,
            "exp_for_next_level": 400,
            "exp_progress_percentage": 62,
            "role": "STUDENT",
            "oauth_providers": ["google"]
        }"#;

        let info: SessionInfo = serde_json::from_str(payload).unwrap();
        assert_eq!(info.user_id, 12);
        assert_eq!(info.role, UserRole::Student);
        assert_eq!(info.oauth_providers, vec!["google".to_string()]);
        assert_eq!(info.exp, Some(250));
    }
}
