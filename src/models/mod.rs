// ABOUTME: Core data models for marketplace profiles and tasks

pub mod numeric;
pub mod profile;
pub mod task;

pub use numeric::{Amount, Rating};
pub use profile::{parse_skills, PublicProfile, SocialLinks, UserProfile};
pub use task::{Task, DEADLINE_FORMAT};
