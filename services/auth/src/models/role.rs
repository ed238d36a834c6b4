//! Role model and related functionality

use serde::{Deserialize, Serialize};

/// Platform role, ordered from least to most privileged
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum UserRole {
    Guest,
    Student,
    Teacher,
    Admin,
}

impl UserRole {
    /// Get the role name as sent on the wire
    pub fn as_str(&self) -> &'static str {
        match self {
            UserRole::Guest => "GUEST",
            UserRole::Student => "STUDENT",
            UserRole::Teacher => "TEACHER",
            UserRole::Admin => "ADMIN",
        }
    }

    /// Check if this role has the required role or higher privileges
    ///
    /// Hierarchy: ADMIN > TEACHER > STUDENT > GUEST
    pub fn has_access(&self, required: UserRole) -> bool {
        *self >= required
    }
}

impl std::fmt::Display for UserRole {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for UserRole {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "GUEST" => Ok(UserRole::Guest),
            "STUDENT" => Ok(UserRole::Student),
            "TEACHER" => Ok(UserRole::Teacher),
            "ADMIN" => Ok(UserRole::Admin),
            other => Err(format!("unknown role: {}", other)),
        }
    }
}
