// ABOUTME: Profile editing form, seeded from the loaded profile and saved explicitly

use crate::api::{ApiClient, ApiError, AvatarUpload, ProfileUpdate};
use crate::app::form::{FormStatus, Notice, SubmitBlocked, SubmitTicket};
use crate::models::{parse_skills, SocialLinks, UserProfile};
use std::path::{Path, PathBuf};
use tracing::{info, warn};

const AVATAR_EXTENSIONS: [&str; 5] = ["jpg", "jpeg", "png", "gif", "webp"];

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum ProfileField {
    Bio,
    Specialization,
    HourlyRate,
    Skills,
    PortfolioUrl,
    GithubUrl,
    LinkedinUrl,
    AvailableForHire,
    AvatarPath,
}

impl ProfileField {
    pub const ALL: [Self; 9] = [
        Self::Bio,
        Self::Specialization,
        Self::HourlyRate,
        Self::Skills,
        Self::PortfolioUrl,
        Self::GithubUrl,
        Self::LinkedinUrl,
        Self::AvailableForHire,
        Self::AvatarPath,
    ];

    pub const fn label(self) -> &'static str {
        match self {
            Self::Bio => "About",
            Self::Specialization => "Specialization",
            Self::HourlyRate => "Hourly rate",
            Self::Skills => "Skills (comma separated)",
            Self::PortfolioUrl => "Portfolio URL",
            Self::GithubUrl => "GitHub URL",
            Self::LinkedinUrl => "LinkedIn URL",
            Self::AvailableForHire => "Available for hire",
            Self::AvatarPath => "New avatar (file path)",
        }
    }

    pub fn from_backend(name: &str) -> Option<Self> {
        match name {
            "bio" | "description" => Some(Self::Bio),
            "specialization" => Some(Self::Specialization),
            "hourlyRate" | "hourly_rate" => Some(Self::HourlyRate),
            "skills" | "languages" => Some(Self::Skills),
            "portfolio_url" => Some(Self::PortfolioUrl),
            "github_url" => Some(Self::GithubUrl),
            "linkedin_url" => Some(Self::LinkedinUrl),
            "available_for_hire" => Some(Self::AvailableForHire),
            "avatar" => Some(Self::AvatarPath),
            _ => None,
        }
    }
}

/// What a save sends: the profile update, then optionally an avatar file
#[derive(Debug, Clone, PartialEq)]
pub struct ProfileSave {
    pub update: ProfileUpdate,
    pub avatar: Option<PathBuf>,
}

#[derive(Debug, Clone)]
pub struct ProfileSubmission {
    pub ticket: SubmitTicket,
    pub save: ProfileSave,
}

/// Result of a save whose profile update went through
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SaveReport {
    /// The details were stored but the avatar upload failed
    pub avatar_error: Option<ApiError>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ProfileTransition {
    /// Saved; the profile should be re-fetched
    Saved { avatar_error: Option<ApiError> },
    Stay,
    Discarded,
}

#[derive(Debug, Clone)]
pub struct ProfileForm {
    pub bio: String,
    pub specialization: String,
    pub hourly_rate: String,
    pub skills: String,
    pub portfolio_url: String,
    pub github_url: String,
    pub linkedin_url: String,
    pub available_for_hire: bool,
    pub avatar_path: String,
    pub focused: ProfileField,
    pub status: FormStatus<ProfileField>,
}

impl ProfileForm {
    pub fn from_profile(profile: &UserProfile) -> Self {
        let link = |url: &Option<String>| url.clone().unwrap_or_default();
        Self {
            bio: profile.bio.clone().unwrap_or_default(),
            specialization: profile.specialization.clone().unwrap_or_default(),
            hourly_rate: profile
                .hourly_rate
                .map(|rate| rate.to_string())
                .unwrap_or_default(),
            skills: profile.skill_tags().join(", "),
            portfolio_url: link(&profile.links.portfolio_url),
            github_url: link(&profile.links.github_url),
            linkedin_url: link(&profile.links.linkedin_url),
            available_for_hire: profile.available_for_hire,
            avatar_path: String::new(),
            focused: ProfileField::Bio,
            status: FormStatus::new(),
        }
    }

    /// Text shown for a field; the availability flag renders as yes/no
    pub fn display_value(&self, field: ProfileField) -> &str {
        match field {
            ProfileField::AvailableForHire => {
                if self.available_for_hire {
                    "yes"
                } else {
                    "no"
                }
            }
            other => self.text(other).map_or("", |s| s.as_str()),
        }
    }

    const fn text(&self, field: ProfileField) -> Option<&String> {
        match field {
            ProfileField::Bio => Some(&self.bio),
            ProfileField::Specialization => Some(&self.specialization),
            ProfileField::HourlyRate => Some(&self.hourly_rate),
            ProfileField::Skills => Some(&self.skills),
            ProfileField::PortfolioUrl => Some(&self.portfolio_url),
            ProfileField::GithubUrl => Some(&self.github_url),
            ProfileField::LinkedinUrl => Some(&self.linkedin_url),
            ProfileField::AvatarPath => Some(&self.avatar_path),
            ProfileField::AvailableForHire => None,
        }
    }

    fn text_mut(&mut self, field: ProfileField) -> Option<&mut String> {
        match field {
            ProfileField::Bio => Some(&mut self.bio),
            ProfileField::Specialization => Some(&mut self.specialization),
            ProfileField::HourlyRate => Some(&mut self.hourly_rate),
            ProfileField::Skills => Some(&mut self.skills),
            ProfileField::PortfolioUrl => Some(&mut self.portfolio_url),
            ProfileField::GithubUrl => Some(&mut self.github_url),
            ProfileField::LinkedinUrl => Some(&mut self.linkedin_url),
            ProfileField::AvatarPath => Some(&mut self.avatar_path),
            ProfileField::AvailableForHire => None,
        }
    }

    /// Typed character; space flips the availability toggle
    pub fn input_char(&mut self, c: char) {
        let field = self.focused;
        if field == ProfileField::AvailableForHire {
            if c == ' ' {
                self.available_for_hire = !self.available_for_hire;
            }
        } else if let Some(value) = self.text_mut(field) {
            value.push(c);
        }
    }

    pub fn backspace(&mut self) {
        let field = self.focused;
        if let Some(value) = self.text_mut(field) {
            value.pop();
        }
    }

    pub fn focus_next(&mut self) {
        let all = ProfileField::ALL;
        let index = all.iter().position(|f| *f == self.focused).unwrap_or(0);
        self.focused = all[(index + 1) % all.len()];
    }

    pub fn focus_prev(&mut self) {
        let all = ProfileField::ALL;
        let index = all.iter().position(|f| *f == self.focused).unwrap_or(0);
        self.focused = all[(index + all.len() - 1) % all.len()];
    }

    fn checked_url(&mut self, field: ProfileField) -> Option<String> {
        let url = self.text(field).map(|s| s.trim().to_string()).unwrap_or_default();
        if !url.is_empty() && !(url.starts_with("http://") || url.starts_with("https://")) {
            self.status
                .add_field_error(field, "Links must start with http:// or https://");
        }
        Some(url)
    }

    pub fn validate(&mut self) -> Option<ProfileSave> {
        self.status.clear_messages();

        let hourly_rate = match self.hourly_rate.trim() {
            "" => None,
            raw => match raw.replace(',', ".").parse::<f64>() {
                Ok(rate) if rate.is_finite() && rate >= 0.0 => Some(rate),
                Ok(rate) if rate.is_finite() => {
                    self.status.add_field_error(
                        ProfileField::HourlyRate,
                        "Hourly rate cannot be negative.",
                    );
                    None
                }
                Ok(_) | Err(_) => {
                    self.status
                        .add_field_error(ProfileField::HourlyRate, "Hourly rate must be a number.");
                    None
                }
            },
        };

        let links = SocialLinks {
            portfolio_url: self.checked_url(ProfileField::PortfolioUrl),
            github_url: self.checked_url(ProfileField::GithubUrl),
            linkedin_url: self.checked_url(ProfileField::LinkedinUrl),
        };

        let avatar = match self.avatar_path.trim() {
            "" => None,
            raw => {
                let path = PathBuf::from(raw);
                let extension = path
                    .extension()
                    .and_then(|e| e.to_str())
                    .map(str::to_ascii_lowercase)
                    .unwrap_or_default();
                if !path.is_file() {
                    self.status
                        .add_field_error(ProfileField::AvatarPath, "File not found.");
                } else if !AVATAR_EXTENSIONS.contains(&extension.as_str()) {
                    self.status.add_field_error(
                        ProfileField::AvatarPath,
                        "Avatar must be a jpg, png, gif or webp image.",
                    );
                }
                Some(path)
            }
        };

        if self.status.has_errors() {
            return None;
        }

        Some(ProfileSave {
            update: ProfileUpdate {
                bio: self.bio.trim().to_string(),
                specialization: self.specialization.trim().to_string(),
                hourly_rate,
                skills: parse_skills(&self.skills),
                links,
                available_for_hire: self.available_for_hire,
            },
            avatar,
        })
    }

    pub fn begin_submit(&mut self) -> Result<ProfileSubmission, SubmitBlocked> {
        if self.status.is_submitting() {
            return Err(SubmitBlocked::InFlight);
        }
        let Some(save) = self.validate() else {
            return Err(SubmitBlocked::Invalid);
        };
        let ticket = self.status.begin()?;
        Ok(ProfileSubmission { ticket, save })
    }

    pub fn finish_submit(
        &mut self,
        ticket: SubmitTicket,
        result: Result<SaveReport, ApiError>,
    ) -> ProfileTransition {
        if !self.status.settle(ticket) {
            return ProfileTransition::Discarded;
        }
        match result {
            Ok(SaveReport { avatar_error: None }) => {
                self.avatar_path.clear();
                self.status
                    .set_notice(Notice::Success("Profile saved.".to_string()));
                ProfileTransition::Saved { avatar_error: None }
            }
            Ok(SaveReport {
                avatar_error: Some(e),
            }) => {
                self.status.set_notice(Notice::Error(format!(
                    "Profile saved, but the avatar was not uploaded: {e}"
                )));
                ProfileTransition::Saved {
                    avatar_error: Some(e),
                }
            }
            Err(e) => {
                self.status.apply_api_error(&e, ProfileField::from_backend);
                ProfileTransition::Stay
            }
        }
    }

    pub fn abandon(&mut self) {
        self.status.reset();
    }
}

/// Save the profile, then upload the avatar if one was chosen. Only a
/// failed profile update is an error; an avatar failure after a stored
/// update is reported alongside the success.
pub async fn dispatch(api: &ApiClient, save: ProfileSave) -> Result<SaveReport, ApiError> {
    api.save_profile(&save.update).await?;

    let Some(path) = save.avatar else {
        return Ok(SaveReport::default());
    };
    let avatar_error = upload_avatar(api, &path).await.err();
    if let Some(e) = &avatar_error {
        warn!("Profile saved but avatar upload failed: {}", e);
    }
    Ok(SaveReport { avatar_error })
}

async fn upload_avatar(api: &ApiClient, path: &Path) -> Result<(), ApiError> {
    let bytes = tokio::fs::read(path).await.map_err(|e| {
        warn!("Could not read avatar {}: {}", path.display(), e);
        ApiError::validation("avatar", "Could not read the avatar file.")
    })?;
    let file_name = path
        .file_name()
        .and_then(|name| name.to_str())
        .unwrap_or("avatar.jpg")
        .to_string();
    api.upload_avatar(AvatarUpload { file_name, bytes }).await?;
    info!("Avatar uploaded from {}", path.display());
    Ok(())
}
