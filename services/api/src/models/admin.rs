//! User management models

use auth::UserRole;
use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

/// User as listed in the admin console
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct UserSummary {
    pub user_id: i64,
    pub nickname: String,
    pub email: String,
    pub role: UserRole,
    #[serde(default)]
    pub level: Option<i32>,
    #[serde(default)]
    pub created_at: Option<NaiveDateTime>,
    #[serde(default)]
    pub oauth_providers: Vec<String>,
}

/// Body of a role change
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub struct UpdateUserRoleRequest {
    pub role: UserRole,
}

/// One page of a paginated listing
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Page<T> {
    pub content: Vec<T>,
    /// Zero-based page index
    pub number: u32,
    pub size: u32,
    pub total_elements: u64,
    pub total_pages: u32,
    #[serde(default)]
    pub first: bool,
    #[serde(default)]
    pub last: bool,
}

impl<T> Page<T> {
    /// Whether another page follows this one
    pub fn has_next(&self) -> bool {
        self.number + 1 < self.total_pages
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_user_page_wire_format() {
        let raw = r#"{
            "content": [{"user_id": 3, "nickname": "Ada", "email": "ada@example.com",
                         "role": "ADMIN", "level": 9, "created_at": "2025-01-01T00:00:00",
                         "oauth_providers": ["google"]}],
            "number": 0, "size": 20, "totalElements": 21, "totalPages": 2,
            "first": true, "last": false
        }"#;

        let page: Page<UserSummary> = serde_json::from_str(raw).unwrap();

        assert_eq!(page.content[0].role, UserRole::Admin);
        assert!(page.has_next());
    }

    #[test]
    fn test_role_request_is_upper_case() {
        let body = serde_json::to_string(&UpdateUserRoleRequest {
            role: UserRole::Teacher,
        })
        .unwrap();

        assert_eq!(body, r#"{"role":"TEACHER"}"#);
    }
}
