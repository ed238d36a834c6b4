//! Navigation seam between client logic and the embedding UI

/// Login view path
pub const LOGIN_PATH: &str = "/login";

/// Landing path used when no redirect is pending
pub const HOME_PATH: &str = "/";

/// Router of the embedding application
///
/// The request pipeline uses it to send the user to the login view when the
/// session cannot be recovered, and the player uses it to auto-advance.
pub trait Navigator: Send + Sync {
    /// Path currently displayed, recorded before redirecting to login
    fn current_path(&self) -> String;

    /// Navigate to the given application path
    fn navigate(&self, path: &str);
}

/// Course page path
pub fn course_path(course_id: i64) -> String {
    format!("/courses/{}", course_id)
}

/// Video player page path
pub fn video_path(course_id: i64, video_id: i64) -> String {
    format!("/courses/{}/videos/{}", course_id, video_id)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_paths() {
        assert_eq!(course_path(3), "/courses/3");
        assert_eq!(video_path(3, 42), "/courses/3/videos/42");
    }
}
