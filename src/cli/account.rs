// ABOUTME: CLI login, register and logout commands
//
// Uses the same auth form as the TUI so validation and error mapping match

use super::output::emit;
use super::{form_failure, LoginArgs, OutputFormat, RegisterArgs};
use crate::api::ApiClient;
use crate::app::auth_flow::{self, AuthField, AuthForm, AuthMode, AuthTransition};
use crate::app::form::SubmitBlocked;
use anyhow::{anyhow, Result};
use serde::Serialize;
use tracing::info;

#[derive(Debug, Serialize)]
struct AccountResult<'a> {
    status: &'a str,
    username: &'a str,
    message: &'a str,
}

/// Execute the login command
pub async fn login(api: &ApiClient, args: LoginArgs, format: OutputFormat) -> Result<()> {
    let mut form = AuthForm::new(AuthMode::Login);
    form.username = args.username;
    form.password = args.password;

    match submit(api, &mut form).await? {
        AuthTransition::Authenticated => {
            let username = form.username.trim();
            info!("CLI login for {}", username);
            let result = AccountResult {
                status: "logged_in",
                username,
                message: "Logged in.",
            };
            emit(format, &result, |r| println!("Logged in as {}.", r.username))
        }
        _ => Err(form_failure(&form.status, AuthField::label)),
    }
}

/// Execute the register command
pub async fn register(api: &ApiClient, args: RegisterArgs, format: OutputFormat) -> Result<()> {
    let mut form = AuthForm::new(AuthMode::Register);
    form.username = args.username;
    form.email = args.email;
    form.password_confirm = args.confirm.unwrap_or_else(|| args.password.clone());
    form.password = args.password;

    match submit(api, &mut form).await? {
        AuthTransition::Registered => {
            let message = form
                .status
                .notice()
                .map_or(auth_flow::REGISTERED_NOTICE, |n| n.text());
            let result = AccountResult {
                status: "registered",
                username: form.username.trim(),
                message,
            };
            emit(format, &result, |r| {
                println!("{}", r.message);
                println!("Run `gigboard login {}` to sign in.", r.username);
            })
        }
        _ => Err(form_failure(&form.status, AuthField::label)),
    }
}

/// Execute the logout command; succeeds even when already logged out
pub async fn logout(api: &ApiClient, format: OutputFormat) -> Result<()> {
    let was_signed_in = api.session().is_authenticated();
    api.logout().await?;

    let result = AccountResult {
        status: "logged_out",
        username: "",
        message: if was_signed_in { "Logged out." } else { "Already logged out." },
    };
    emit(format, &result, |r| println!("{}", r.message))
}

async fn submit(api: &ApiClient, form: &mut AuthForm) -> Result<AuthTransition> {
    let submission = match form.begin_submit() {
        Ok(submission) => submission,
        Err(SubmitBlocked::Invalid) => return Err(form_failure(&form.status, AuthField::label)),
        Err(SubmitBlocked::InFlight) => return Err(anyhow!("A submission is already in progress.")),
    };
    let result = auth_flow::dispatch(api, submission.request).await;
    Ok(form.finish_submit(submission.ticket, result, api.session()))
}
