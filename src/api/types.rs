// ABOUTME: Request and response payloads exchanged with the marketplace backend

use crate::models::SocialLinks;
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize)]
pub struct LoginRequest {
    pub username: String,
    pub password: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RegisterRequest {
    pub username: String,
    pub email: String,
    pub password: String,
    pub password2: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct TokenResponse {
    #[serde(alias = "access", alias = "auth_token", alias = "key")]
    pub token: String,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct RegisterResponse {
    #[serde(default)]
    pub message: Option<String>,
    #[serde(default)]
    pub username: Option<String>,
}

/// Editable part of the signed-in user's profile
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct ProfileUpdate {
    #[serde(rename = "description")]
    pub bio: String,
    pub specialization: String,
    #[serde(rename = "hourlyRate", skip_serializing_if = "Option::is_none")]
    pub hourly_rate: Option<f64>,
    pub skills: Vec<String>,
    #[serde(flatten)]
    pub links: SocialLinks,
    pub available_for_hire: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct NewTask {
    pub title: String,
    pub description: String,
    pub budget: f64,
    pub deadline: NaiveDate,
    pub skills: Vec<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct AvatarResponse {
    #[serde(default, alias = "avatar_url")]
    pub avatar: Option<String>,
}

/// Skill catalogue entries come back either as plain strings or `{id, name}` objects
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(untagged)]
pub enum SkillEntry {
    Name(String),
    Record { name: String },
}

impl SkillEntry {
    pub fn into_name(self) -> String {
        match self {
            Self::Name(name) | Self::Record { name } => name,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use serde_json::json;

    #[test]
    fn test_token_aliases() {
        let token: TokenResponse = serde_json::from_value(json!({"access": "abc"})).unwrap();
        assert_eq!(token.token, "abc");
        let token: TokenResponse = serde_json::from_value(json!({"token": "xyz"})).unwrap();
        assert_eq!(token.token, "xyz");
    }

    #[test]
    fn test_profile_update_wire_names() {
        let update = ProfileUpdate {
            bio: "Backend dev".into(),
            hourly_rate: Some(40.0),
            skills: vec!["Rust".into()],
            links: SocialLinks {
                github_url: Some("https://github.com/alice".into()),
                ..SocialLinks::default()
            },
            ..ProfileUpdate::default()
        };

        let value = serde_json::to_value(&update).unwrap();
        assert_eq!(value["description"], "Backend dev");
        assert_eq!(value["hourlyRate"], 40.0);
        assert_eq!(value["github_url"], "https://github.com/alice");
        assert!(value.get("bio").is_none());
    }

    #[test]
    fn test_new_task_deadline_format() {
        let task = NewTask {
            title: "Logo".into(),
            description: "Need a logo".into(),
            budget: 100.0,
            deadline: NaiveDate::from_ymd_opt(2026, 12, 1).unwrap(),
            skills: vec![],
        };
        let value = serde_json::to_value(&task).unwrap();
        assert_eq!(value["deadline"], "2026-12-01");
    }

    #[test]
    fn test_skill_entries_both_shapes() {
        let entries: Vec<SkillEntry> =
            serde_json::from_value(json!(["Rust", {"id": 2, "name": "Go"}])).unwrap();
        let names: Vec<String> = entries.into_iter().map(SkillEntry::into_name).collect();
        assert_eq!(names, vec!["Rust".to_string(), "Go".to_string()]);
    }
}
