// ABOUTME: CLI argument parsing and shared plumbing for gigboard commands
//
// Provides command-line interface for:
// - Signing in and out (login, register, logout)
// - Reading profiles (profile, profile --user NAME)
// - Browsing and posting tasks (tasks list, tasks create)
// - Listing the skill catalogue (skills)
// - Inspecting configuration (config)
// - Launching TUI (tui, default)

pub mod account;
pub mod config;
pub mod output;
pub mod profile;
pub mod skills;
pub mod tasks;

use crate::api::{ApiClient, ApiError};
use crate::app::form::FormStatus;
use crate::config::{gigboard_home, AppConfig};
use crate::session::SessionStore;
use anyhow::{anyhow, Context, Result};
use clap::{Parser, Subcommand, ValueEnum};
use std::sync::Arc;

/// Shown whenever a command needs a session the CLI does not have
pub const LOGIN_HINT: &str = "You are not logged in or your session has expired. Run `gigboard login` to sign in again.";

/// Terminal client for the gigboard freelance marketplace
#[derive(Parser)]
#[command(name = "gigboard")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Option<Commands>,

    /// Output format
    #[arg(long, global = true, default_value = "text")]
    pub format: OutputFormat,
}

/// Output format for commands
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    #[default]
    Text,
    Json,
}

/// Available CLI commands
#[derive(Subcommand)]
pub enum Commands {
    /// Launch the TUI (default if no command given)
    Tui,

    /// Log in and store the session token
    Login(LoginArgs),

    /// Create an account (log in afterwards)
    Register(RegisterArgs),

    /// Log out and forget the session token
    Logout,

    /// Show your profile or another user's public profile
    Profile(ProfileArgs),

    /// Browse or post tasks
    #[command(subcommand)]
    Tasks(TaskCommands),

    /// List the skills known to the marketplace
    Skills,

    /// Show the effective configuration
    Config(ConfigArgs),
}

/// Arguments for the login command
#[derive(clap::Args)]
pub struct LoginArgs {
    pub username: String,

    /// Password (prefer the environment variable to keep it out of shell history)
    #[arg(long, env = "GIGBOARD_PASSWORD", hide_env_values = true)]
    pub password: String,
}

/// Arguments for the register command
#[derive(clap::Args)]
pub struct RegisterArgs {
    pub username: String,

    #[arg(long)]
    pub email: String,

    #[arg(long, env = "GIGBOARD_PASSWORD", hide_env_values = true)]
    pub password: String,

    /// Password confirmation; defaults to the password itself
    #[arg(long, env = "GIGBOARD_PASSWORD_CONFIRM", hide_env_values = true)]
    pub confirm: Option<String>,
}

/// Arguments for the profile command
#[derive(clap::Args)]
pub struct ProfileArgs {
    /// Show this user's public profile instead of your own
    #[arg(long)]
    pub user: Option<String>,
}

#[derive(Subcommand)]
pub enum TaskCommands {
    /// List open tasks
    List,

    /// Post a new task
    Create(CreateTaskArgs),
}

/// Arguments for posting a task
#[derive(clap::Args)]
pub struct CreateTaskArgs {
    #[arg(long)]
    pub title: String,

    #[arg(long)]
    pub description: String,

    /// Budget, e.g. 300 or 149.99
    #[arg(long)]
    pub budget: String,

    /// Deadline as YYYY-MM-DD
    #[arg(long)]
    pub deadline: String,

    /// Comma separated skills
    #[arg(long, default_value = "")]
    pub skills: String,
}

/// Arguments for the config command
#[derive(clap::Args)]
pub struct ConfigArgs {
    /// Write the effective configuration to the user config file
    #[arg(long)]
    pub init: bool,
}

/// Load config, restore the stored session and build the API client
pub fn connect() -> Result<ApiClient> {
    let config = AppConfig::load()?;
    let home = gigboard_home()?;
    let session = Arc::new(SessionStore::from_config(&config, &home));
    ApiClient::new(&config.api, session).context("Failed to create API client")
}

/// Fail early when a command needs a session
pub fn require_session(api: &ApiClient) -> Result<()> {
    if api.session().is_authenticated() {
        Ok(())
    } else {
        Err(anyhow!(LOGIN_HINT))
    }
}

/// Turn a gateway error into a CLI error, with the re-login hint for auth failures
pub fn api_failure(error: ApiError) -> anyhow::Error {
    if error.is_unauthenticated() {
        anyhow!(LOGIN_HINT)
    } else {
        anyhow!(error)
    }
}

/// Collect a form's messages into one error
pub fn form_failure<F: Ord + Copy>(status: &FormStatus<F>, label: impl Fn(F) -> &'static str) -> anyhow::Error {
    let mut lines: Vec<String> = status
        .field_errors()
        .iter()
        .map(|(field, message)| format!("{}: {}", label(*field), message))
        .collect();
    if let Some(notice) = status.notice() {
        lines.insert(0, notice.text().to_string());
    }
    if lines.is_empty() {
        lines.push("The request could not be completed.".to_string());
    }
    anyhow!(lines.join("\n"))
}
