// ABOUTME: CLI skills command - list the marketplace skill catalogue

use super::output::emit;
use super::{api_failure, OutputFormat};
use crate::api::ApiClient;
use anyhow::Result;

/// Execute the skills command
pub async fn execute(api: &ApiClient, format: OutputFormat) -> Result<()> {
    let skills = api.list_skills().await.map_err(api_failure)?;
    emit(format, &skills, |skills| {
        if skills.is_empty() {
            println!("No skills found.");
        }
        for skill in skills {
            println!("{skill}");
        }
    })
}
