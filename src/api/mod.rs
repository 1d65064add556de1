// ABOUTME: Marketplace REST API gateway

pub mod client;
pub mod error;
pub mod marketplace;
pub mod types;

pub use client::ApiClient;
pub use error::{ApiError, FieldErrors, GENERAL_FIELD};
pub use marketplace::{paths, AvatarUpload};
pub use types::{NewTask, ProfileUpdate, RegisterRequest};
