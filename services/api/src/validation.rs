//! Input validation for profile edits
//!
//! Mirrors the rules the backend enforces so a bad form can be rejected
//! before it costs a round trip.

use regex::Regex;
use serde::Serialize;
use std::sync::OnceLock;

use crate::models::UpdateProfileRequest;

/// Longest accepted value for free-text profile fields
pub const MAX_FIELD_LENGTH: usize = 255;

/// Accepted gender values
pub const GENDERS: [&str; 4] = ["男", "女", "其他", "不透露"];

/// A rejected form field
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FieldError {
    pub field: &'static str,
    pub message: String,
}

impl FieldError {
    fn new(field: &'static str, message: impl Into<String>) -> Self {
        Self {
            field,
            message: message.into(),
        }
    }
}

/// Validate nickname
pub fn validate_nickname(nickname: &str) -> Result<(), String> {
    if nickname.trim().is_empty() {
        return Err("暱稱不能為空".to_string());
    }

    if nickname.chars().count() > MAX_FIELD_LENGTH {
        return Err("暱稱長度必須在1-255字元之間".to_string());
    }

    Ok(())
}

/// Validate gender
pub fn validate_gender(gender: &str) -> Result<(), String> {
    if !GENDERS.contains(&gender) {
        return Err("性別必須是：男、女、其他、不透露".to_string());
    }

    Ok(())
}

/// Validate a bounded free-text field
pub fn validate_length(label: &str, value: &str) -> Result<(), String> {
    if value.chars().count() > MAX_FIELD_LENGTH {
        return Err(format!("{}長度不能超過255字元", label));
    }

    Ok(())
}

/// Validate GitHub profile link; empty is allowed
pub fn validate_github_link(link: &str) -> Result<(), String> {
    static GITHUB_REGEX: OnceLock<Result<Regex, regex::Error>> = OnceLock::new();
    let regex = GITHUB_REGEX
        .get_or_init(|| Regex::new(r"^(https://github\.com/[a-zA-Z0-9\-]+)?$"))
        .as_ref()
        .map_err(|e| e.to_string())?;

    if !regex.is_match(link) {
        return Err("請輸入有效的 GitHub 網址".to_string());
    }

    Ok(())
}

/// Validate a whole profile update, collecting every failing field
pub fn validate_profile(request: &UpdateProfileRequest) -> Result<(), Vec<FieldError>> {
    let mut errors = Vec::new();

    if let Err(e) = validate_nickname(&request.nickname) {
        errors.push(FieldError::new("nickname", e));
    }

    if let Some(gender) = request.gender.as_deref() {
        if let Err(e) = validate_gender(gender) {
            errors.push(FieldError::new("gender", e));
        }
    }

    if let Some(location) = request.location.as_deref() {
        if let Err(e) = validate_length("地點", location) {
            errors.push(FieldError::new("location", e));
        }
    }

    if let Some(occupation) = request.occupation.as_deref() {
        if let Err(e) = validate_length("職業", occupation) {
            errors.push(FieldError::new("occupation", e));
        }
    }

    if let Some(link) = request.github_link.as_deref() {
        if let Err(e) = validate_github_link(link) {
            errors.push(FieldError::new("githubLink", e));
        }
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn request() -> UpdateProfileRequest {
        UpdateProfileRequest {
            nickname: "水球".to_string(),
            gender: Some("其他".to_string()),
            location: Some("Taipei".to_string()),
            github_link: Some("https://github.com/waterball-sa".to_string()),
            ..Default::default()
        }
    }

    #[test]
    fn test_valid_profile() {
        assert_eq!(validate_profile(&request()), Ok(()));
    }

    #[test]
    fn test_nickname_rules() {
        assert!(validate_nickname("a").is_ok());
        assert!(validate_nickname("   ").is_err());
        assert!(validate_nickname(&"長".repeat(255)).is_ok());
        assert!(validate_nickname(&"長".repeat(256)).is_err());
    }

    #[test]
    fn test_github_link_rules() {
        assert!(validate_github_link("").is_ok());
        assert!(validate_github_link("https://github.com/octo-cat").is_ok());
        assert!(validate_github_link("http://github.com/octocat").is_err());
        assert!(validate_github_link("https://github.com/octo/repo").is_err());
        assert!(validate_github_link("https://gitlab.com/octocat").is_err());
    }

    #[test]
    fn test_every_failing_field_is_reported() {
        let request = UpdateProfileRequest {
            nickname: String::new(),
            gender: Some("unknown".to_string()),
            occupation: Some("x".repeat(256)),
            github_link: Some("github.com/octocat".to_string()),
            ..Default::default()
        };

        let fields: Vec<&str> = validate_profile(&request)
            .unwrap_err()
            .iter()
            .map(|e| e.field)
            .collect();

        assert_eq!(fields, vec!["nickname", "gender", "occupation", "githubLink"]);
    }
}
