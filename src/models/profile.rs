// ABOUTME: User profile models for the signed-in user and for public lookups

use super::numeric::{self, Amount, Rating};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SocialLinks {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub portfolio_url: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub github_url: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub linkedin_url: Option<String>,
}

impl SocialLinks {
    /// Present links with their labels, blanks skipped
    pub fn entries(&self) -> Vec<(&'static str, &str)> {
        [
            ("Portfolio", self.portfolio_url.as_deref()),
            ("GitHub", self.github_url.as_deref()),
            ("LinkedIn", self.linkedin_url.as_deref()),
        ]
        .into_iter()
        .filter_map(|(label, url)| url.filter(|u| !u.trim().is_empty()).map(|u| (label, u)))
        .collect()
    }
}

/// The signed-in user's own profile
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct UserProfile {
    #[serde(default)]
    pub username: String,
    #[serde(default)]
    pub email: String,
    #[serde(default, alias = "fullName")]
    pub full_name: Option<String>,
    #[serde(default)]
    pub balance: Amount,
    #[serde(default, alias = "description")]
    pub bio: Option<String>,
    #[serde(default)]
    pub avatar: Option<String>,
    #[serde(default, deserialize_with = "skill_list")]
    pub skills: Vec<String>,
    #[serde(default, deserialize_with = "skill_list")]
    pub languages: Vec<String>,
    #[serde(flatten)]
    pub links: SocialLinks,
    #[serde(default, deserialize_with = "numeric::optional")]
    pub rating: Option<Rating>,
    #[serde(default, alias = "hourlyRate", deserialize_with = "numeric::optional")]
    pub hourly_rate: Option<Amount>,
    #[serde(default)]
    pub specialization: Option<String>,
    #[serde(default)]
    pub experience_level: Option<String>,
    #[serde(default)]
    pub completed_projects: Option<u32>,
    #[serde(default)]
    pub available_for_hire: bool,
}

/// What anyone can see about another user
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PublicProfile {
    #[serde(default)]
    pub username: String,
    #[serde(default, alias = "fullName")]
    pub full_name: Option<String>,
    #[serde(default, alias = "description")]
    pub bio: Option<String>,
    #[serde(default)]
    pub avatar: Option<String>,
    #[serde(default, deserialize_with = "skill_list")]
    pub skills: Vec<String>,
    #[serde(default, deserialize_with = "skill_list")]
    pub languages: Vec<String>,
    #[serde(flatten)]
    pub links: SocialLinks,
    #[serde(default, deserialize_with = "numeric::optional")]
    pub rating: Option<Rating>,
    #[serde(default)]
    pub specialization: Option<String>,
    #[serde(default)]
    pub experience_level: Option<String>,
    #[serde(default)]
    pub completed_projects: Option<u32>,
    #[serde(default)]
    pub available_for_hire: bool,
}

impl UserProfile {
    /// Skills, falling back to the older `languages` list
    pub fn skill_tags(&self) -> &[String] {
        if self.skills.is_empty() {
            &self.languages
        } else {
            &self.skills
        }
    }
}

impl PublicProfile {
    pub fn skill_tags(&self) -> &[String] {
        if self.skills.is_empty() {
            &self.languages
        } else {
            &self.skills
        }
    }
}

/// Skills arrive as a list, occasionally null
fn skill_list<'de, D>(deserializer: D) -> Result<Vec<String>, D::Error>
where
    D: serde::Deserializer<'de>,
{
    Ok(Option::<Vec<String>>::deserialize(deserializer)?.unwrap_or_default())
}

/// Split comma separated input into trimmed, non-empty entries
pub fn parse_skills(input: &str) -> Vec<String> {
    input
        .split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(ToString::to_string)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_profile_with_string_numbers() {
        let json = r#"{
            "username": "alice",
            "email": "alice@example.com",
            "balance": "150.5",
            "description": "Rust developer",
            "languages": ["Rust", "Go"],
            "rating": "4.82",
            "hourlyRate": "45.00",
            "github_url": "https://github.com/alice",
            "portfolio_url": "",
            "available_for_hire": true
        }"#;

        let profile: UserProfile = serde_json::from_str(json).unwrap();
        assert_eq!(profile.balance.to_string(), "150.50");
        assert_eq!(profile.bio.as_deref(), Some("Rust developer"));
        assert!(profile.skills.is_empty());
        assert_eq!(profile.skill_tags(), ["Rust".to_string(), "Go".to_string()]);
        assert_eq!(profile.rating.unwrap().to_string(), "4.8");
        assert_eq!(profile.hourly_rate.unwrap().to_string(), "45.00");
        assert_eq!(profile.links.entries(), vec![("GitHub", "https://github.com/alice")]);
        assert!(profile.available_for_hire);
    }

    #[test]
    fn test_sparse_profile_uses_defaults() {
        let profile: UserProfile =
            serde_json::from_str(r#"{"username": "bob", "skills": null}"#).unwrap();
        assert_eq!(profile.balance.to_string(), "0.00");
        assert!(profile.skills.is_empty());
        assert_eq!(profile.rating, None);
    }

    #[test]
    fn test_parse_skills() {
        assert_eq!(
            parse_skills(" rust,  react ,, sql ,"),
            vec!["rust".to_string(), "react".to_string(), "sql".to_string()]
        );
        assert!(parse_skills("  ").is_empty());
    }
}
