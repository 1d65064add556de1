// ABOUTME: CLI config command - print the effective configuration or write it to disk

use super::output::emit;
use super::{ConfigArgs, OutputFormat};
use crate::config::{gigboard_home, AppConfig};
use anyhow::Result;

/// Execute the config command
pub fn execute(args: ConfigArgs, format: OutputFormat) -> Result<()> {
    let config = AppConfig::load()?;

    if args.init {
        let path = config.save()?;
        println!("Wrote {}", path.display());
        return Ok(());
    }

    let home = gigboard_home()?;
    emit(format, &config, |config| {
        println!("{:<20} {}", "Home", home.display());
        println!("{:<20} {}", "API base URL", config.api.base_url);
        println!("{:<20} {}s", "Request timeout", config.api.timeout_secs);
        println!("{:<20} {:?}", "Credential storage", config.credentials.storage);
        println!("{:<20} {}", "Mask passwords", config.ui_preferences.mask_passwords);
    })
}
