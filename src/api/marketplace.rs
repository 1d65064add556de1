// ABOUTME: Marketplace endpoints: authentication, profiles, avatars, tasks and the skill catalogue

use crate::api::client::ApiClient;
use crate::api::error::ApiError;
use crate::api::types::{
    AvatarResponse, LoginRequest, NewTask, ProfileUpdate, RegisterRequest, RegisterResponse,
    SkillEntry, TokenResponse,
};
use crate::models::{PublicProfile, Task, UserProfile};
use crate::session::SessionError;
use reqwest::multipart::{Form, Part};
use serde_json::Value;
use tracing::{info, warn};

pub mod paths {
    pub const LOGIN: &str = "/auth/login/";
    pub const REGISTER: &str = "/auth/register/";
    pub const LOGOUT: &str = "/users/logout/";
    pub const PROFILE: &str = "/auth/profile/";
    pub const PROFILE_UPDATE: &str = "/users/profile/";
    pub const AVATAR: &str = "/auth/upload-avatar/";
    pub const SKILLS: &str = "/auth/skills/";
    pub const TASKS: &str = "/tasks/";

    pub fn public_profile(username: &str) -> String {
        format!("/auth/profile/{}/", super::encode_segment(username))
    }
}

/// Multipart field the backend reads the avatar from
pub const AVATAR_FIELD: &str = "avatar";

/// An image ready to be uploaded
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AvatarUpload {
    pub file_name: String,
    pub bytes: Vec<u8>,
}

impl AvatarUpload {
    pub fn mime_type(&self) -> &'static str {
        let ext = self
            .file_name
            .rsplit('.')
            .next()
            .unwrap_or_default()
            .to_ascii_lowercase();
        match ext.as_str() {
            "png" => "image/png",
            "gif" => "image/gif",
            "webp" => "image/webp",
            _ => "image/jpeg",
        }
    }
}

impl ApiClient {
    /// Exchange credentials for a token. The session is not touched here;
    /// the caller decides whether the result still matters.
    pub async fn login(&self, username: &str, password: &str) -> Result<String, ApiError> {
        let request = LoginRequest {
            username: username.to_string(),
            password: password.to_string(),
        };
        let response: TokenResponse = self.post(paths::LOGIN, &request).await?;
        if response.token.trim().is_empty() {
            return Err(ApiError::UnexpectedResponse(
                "login succeeded but no token was returned".to_string(),
            ));
        }
        Ok(response.token)
    }

    pub async fn register(&self, request: &RegisterRequest) -> Result<RegisterResponse, ApiError> {
        let response: Option<RegisterResponse> = self.post(paths::REGISTER, request).await?;
        info!("Registered account {}", request.username);
        Ok(response.unwrap_or_default())
    }

    /// Best-effort server logout followed by a local clear.
    /// Calling it while signed out makes no request.
    pub async fn logout(&self) -> Result<(), SessionError> {
        let Some(token) = self.session().get_token() else {
            return Ok(());
        };
        self.revoke_token(&token).await;
        self.session().expire_token(&token).map(|_| ())
    }

    /// Tell the backend to end the session `token` belongs to. Failures are
    /// logged and otherwise ignored; the local store is left alone.
    pub async fn revoke_token(&self, token: &str) {
        let result: Result<Option<Value>, ApiError> =
            self.post_as(paths::LOGOUT, token, &serde_json::json!({})).await;
        if let Err(e) = result {
            warn!("Server-side logout failed: {}", e);
        }
    }

    pub async fn fetch_profile(&self) -> Result<UserProfile, ApiError> {
        self.get(paths::PROFILE).await
    }

    pub async fn fetch_public_profile(&self, username: &str) -> Result<PublicProfile, ApiError> {
        if username.trim().is_empty() {
            return Err(ApiError::NotFound);
        }
        self.get(&paths::public_profile(username.trim())).await
    }

    pub async fn save_profile(&self, update: &ProfileUpdate) -> Result<(), ApiError> {
        let _: Option<Value> = self.put(paths::PROFILE_UPDATE, update).await?;
        Ok(())
    }

    /// Upload a new avatar, returning the stored image URL when the backend reports one
    pub async fn upload_avatar(&self, upload: AvatarUpload) -> Result<Option<String>, ApiError> {
        let mime = upload.mime_type();
        let part = Part::bytes(upload.bytes)
            .file_name(upload.file_name)
            .mime_str(mime)
            .map_err(|e| ApiError::UnexpectedResponse(e.to_string()))?;
        let form = Form::new().part(AVATAR_FIELD, part);

        let response: Option<AvatarResponse> = self.post_multipart(paths::AVATAR, form).await?;
        Ok(response.and_then(|r| r.avatar))
    }

    pub async fn list_tasks(&self) -> Result<Vec<Task>, ApiError> {
        self.get(paths::TASKS).await
    }

    pub async fn create_task(&self, task: &NewTask) -> Result<Option<Task>, ApiError> {
        let created: Option<Value> = self.post(paths::TASKS, task).await?;
        // Some deployments answer with a bare message instead of the record
        Ok(created.and_then(|v| serde_json::from_value(v).ok()))
    }

    pub async fn list_skills(&self) -> Result<Vec<String>, ApiError> {
        let entries: Vec<SkillEntry> = self.get(paths::SKILLS).await?;
        Ok(entries.into_iter().map(SkillEntry::into_name).collect())
    }
}

/// Percent-encode one path segment
fn encode_segment(segment: &str) -> String {
    url::form_urlencoded::byte_serialize(segment.as_bytes())
        .collect::<String>()
        .replace('+', "%20")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_public_profile_path_is_encoded() {
        assert_eq!(paths::public_profile("alice"), "/auth/profile/alice/");
        assert_eq!(paths::public_profile("a b/c"), "/auth/profile/a%20b%2Fc/");
    }

    #[test]
    fn test_avatar_mime_from_extension() {
        let upload = AvatarUpload {
            file_name: "me.PNG".into(),
            bytes: vec![],
        };
        assert_eq!(upload.mime_type(), "image/png");

        let upload = AvatarUpload {
            file_name: "photo".into(),
            bytes: vec![],
        };
        assert_eq!(upload.mime_type(), "image/jpeg");
    }
}
