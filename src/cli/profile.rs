// ABOUTME: CLI profile command - show your own profile or a user's public profile

use super::output::emit;
use super::{api_failure, require_session, OutputFormat, ProfileArgs};
use crate::api::ApiClient;
use crate::components::ProfileCard;
use anyhow::Result;

/// Execute the profile command
pub async fn execute(api: &ApiClient, args: ProfileArgs, format: OutputFormat) -> Result<()> {
    match args.user {
        Some(username) => {
            let profile = api
                .fetch_public_profile(&username)
                .await
                .map_err(api_failure)?;
            emit(format, &profile, |p| print_card(&ProfileCard::from(p)))
        }
        None => {
            require_session(api)?;
            let profile = api.fetch_profile().await.map_err(api_failure)?;
            emit(format, &profile, |p| print_card(&ProfileCard::from(p)))
        }
    }
}

fn print_card(card: &ProfileCard) {
    println!("{}", card.username);
    println!("{}", "-".repeat(card.username.chars().count().max(20)));
    for (label, value) in card.detail_rows() {
        println!("{label:<20} {value}");
    }
    if !card.skills.is_empty() {
        println!("{:<20} {}", "Skills", card.skills.join(", "));
    }
    for (label, url) in &card.links {
        println!("{label:<20} {url}");
    }
    if let Some(bio) = &card.bio {
        println!();
        println!("{bio}");
    }
}
