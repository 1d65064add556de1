// ABOUTME: Login / registration form state machine
// Validates locally, hands requests to the API gateway and applies settled results to the session

use crate::api::{ApiClient, ApiError, RegisterRequest};
use crate::app::form::{FormStatus, Notice, SubmitBlocked, SubmitTicket};
use crate::session::SessionStore;
use lazy_static::lazy_static;
use regex::Regex;
use tracing::{debug, info, warn};

pub const REGISTERED_NOTICE: &str = "Registration successful. Please log in.";
const BAD_CREDENTIALS: &str = "Invalid username or password.";

lazy_static! {
    static ref EMAIL: Regex = Regex::new(r"^[^@\s]+@[^@\s]+\.[^@\s]+$").unwrap();
}
const PASSWORD_MISMATCH: &str = "Passwords do not match.";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AuthMode {
    Login,
    Register,
}

impl AuthMode {
    pub const fn toggled(self) -> Self {
        match self {
            Self::Login => Self::Register,
            Self::Register => Self::Login,
        }
    }

    pub const fn title(self) -> &'static str {
        match self {
            Self::Login => "Log in",
            Self::Register => "Create account",
        }
    }

    pub const fn fields(self) -> &'static [AuthField] {
        match self {
            Self::Login => &[AuthField::Username, AuthField::Password],
            Self::Register => &[
                AuthField::Username,
                AuthField::Email,
                AuthField::Password,
                AuthField::PasswordConfirm,
            ],
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum AuthField {
    Username,
    Email,
    Password,
    PasswordConfirm,
}

impl AuthField {
    pub const fn label(self) -> &'static str {
        match self {
            Self::Username => "Username",
            Self::Email => "Email",
            Self::Password => "Password",
            Self::PasswordConfirm => "Confirm password",
        }
    }

    pub const fn is_secret(self) -> bool {
        matches!(self, Self::Password | Self::PasswordConfirm)
    }

    /// Map a backend field name onto a form field
    pub fn from_backend(name: &str) -> Option<Self> {
        match name {
            "username" => Some(Self::Username),
            "email" => Some(Self::Email),
            "password" | "password1" => Some(Self::Password),
            "password2" | "password_confirm" => Some(Self::PasswordConfirm),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AuthRequest {
    Login { username: String, password: String },
    Register(RegisterRequest),
}

/// A validated request tied to the form instance that produced it
#[derive(Debug, Clone)]
pub struct AuthSubmission {
    pub ticket: SubmitTicket,
    pub request: AuthRequest,
}

/// What a successful call returned
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AuthOutcome {
    LoggedIn(String),
    Registered,
}

/// What the surrounding app should do after a submission settled
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AuthTransition {
    /// Token stored; go to the profile
    Authenticated,
    /// Account created; form is back in login mode
    Registered,
    /// Errors are on the form
    Stay,
    /// The form was abandoned before the result arrived
    Discarded,
}

#[derive(Debug, Clone)]
pub struct AuthForm {
    pub mode: AuthMode,
    pub username: String,
    pub email: String,
    pub password: String,
    pub password_confirm: String,
    pub focused: AuthField,
    pub status: FormStatus<AuthField>,
}

impl Default for AuthForm {
    fn default() -> Self {
        Self::new(AuthMode::Login)
    }
}

impl AuthForm {
    pub fn new(mode: AuthMode) -> Self {
        Self {
            mode,
            username: String::new(),
            email: String::new(),
            password: String::new(),
            password_confirm: String::new(),
            focused: AuthField::Username,
            status: FormStatus::new(),
        }
    }

    /// Switch between login and registration. Ignored while a submit is outstanding.
    pub fn toggle_mode(&mut self) -> bool {
        if self.status.is_submitting() {
            return false;
        }
        self.mode = self.mode.toggled();
        self.clear_passwords();
        self.status.clear_messages();
        if !self.mode.fields().contains(&self.focused) {
            self.focused = AuthField::Username;
        }
        true
    }

    pub fn value(&self, field: AuthField) -> &str {
        match field {
            AuthField::Username => &self.username,
            AuthField::Email => &self.email,
            AuthField::Password => &self.password,
            AuthField::PasswordConfirm => &self.password_confirm,
        }
    }

    fn value_mut(&mut self, field: AuthField) -> &mut String {
        match field {
            AuthField::Username => &mut self.username,
            AuthField::Email => &mut self.email,
            AuthField::Password => &mut self.password,
            AuthField::PasswordConfirm => &mut self.password_confirm,
        }
    }

    pub fn input_char(&mut self, c: char) {
        let field = self.focused;
        self.value_mut(field).push(c);
    }

    pub fn backspace(&mut self) {
        let field = self.focused;
        self.value_mut(field).pop();
    }

    pub fn focus_next(&mut self) {
        self.focused = cycle(self.mode.fields(), self.focused, 1);
    }

    pub fn focus_prev(&mut self) {
        let fields = self.mode.fields();
        self.focused = cycle(fields, self.focused, fields.len() - 1);
    }

    fn clear_passwords(&mut self) {
        self.password.clear();
        self.password_confirm.clear();
    }

    /// Leave the form: outstanding results will be ignored, secrets dropped
    pub fn abandon(&mut self) {
        self.clear_passwords();
        self.status.reset();
    }

    /// Client-side checks; on failure the messages are left on the form
    pub fn validate(&mut self) -> bool {
        self.status.clear_messages();

        if self.username.trim().is_empty() {
            self.status
                .add_field_error(AuthField::Username, "Username is required.");
        }
        if self.password.is_empty() {
            self.status
                .add_field_error(AuthField::Password, "Password is required.");
        }

        if self.mode == AuthMode::Register {
            let email = self.email.trim();
            if email.is_empty() {
                self.status.add_field_error(AuthField::Email, "Email is required.");
            } else if !EMAIL.is_match(email) {
                self.status
                    .add_field_error(AuthField::Email, "Enter a valid email address.");
            }

            if self.password_confirm.is_empty() {
                self.status
                    .add_field_error(AuthField::PasswordConfirm, "Please confirm the password.");
            } else if self.password.as_bytes() != self.password_confirm.as_bytes() {
                self.status
                    .add_field_error(AuthField::PasswordConfirm, PASSWORD_MISMATCH);
            }
        }

        !self.status.has_errors()
    }

    /// Validate and, if everything is in order, mark the form as submitting
    pub fn begin_submit(&mut self) -> Result<AuthSubmission, SubmitBlocked> {
        if self.status.is_submitting() {
            return Err(SubmitBlocked::InFlight);
        }
        if !self.validate() {
            debug!("Auth form blocked by local validation");
            return Err(SubmitBlocked::Invalid);
        }

        let ticket = self.status.begin()?;
        let username = self.username.trim().to_string();
        let request = match self.mode {
            AuthMode::Login => AuthRequest::Login {
                username,
                password: self.password.clone(),
            },
            AuthMode::Register => AuthRequest::Register(RegisterRequest {
                username,
                email: self.email.trim().to_string(),
                password: self.password.clone(),
                password2: self.password_confirm.clone(),
            }),
        };
        Ok(AuthSubmission { ticket, request })
    }

    /// Apply a settled call. Always releases the submitting flag of the
    /// instance that started it.
    pub fn finish_submit(
        &mut self,
        ticket: SubmitTicket,
        result: Result<AuthOutcome, ApiError>,
        session: &SessionStore,
    ) -> AuthTransition {
        if !self.status.settle(ticket) {
            debug!("Discarding auth result for an abandoned form");
            return AuthTransition::Discarded;
        }

        match result {
            Ok(AuthOutcome::LoggedIn(token)) => {
                if let Err(e) = session.set_token(token) {
                    warn!("Logged in, but the session will not survive a restart: {}", e);
                }
                info!("User {} logged in", self.username.trim());
                self.clear_passwords();
                self.status.clear_messages();
                AuthTransition::Authenticated
            }
            Ok(AuthOutcome::Registered) => {
                self.mode = AuthMode::Login;
                self.email.clear();
                self.clear_passwords();
                self.focused = AuthField::Password;
                self.status.clear_messages();
                self.status
                    .set_notice(Notice::Success(REGISTERED_NOTICE.to_string()));
                AuthTransition::Registered
            }
            Err(ApiError::Unauthenticated) if self.mode == AuthMode::Login => {
                self.status
                    .set_notice(Notice::Error(BAD_CREDENTIALS.to_string()));
                AuthTransition::Stay
            }
            Err(e) => {
                self.status.apply_api_error(&e, AuthField::from_backend);
                AuthTransition::Stay
            }
        }
    }
}

fn cycle(fields: &[AuthField], current: AuthField, step: usize) -> AuthField {
    let index = fields.iter().position(|f| *f == current).unwrap_or(0);
    fields[(index + step) % fields.len()]
}

/// Perform the network half of a submission
pub async fn dispatch(api: &ApiClient, request: AuthRequest) -> Result<AuthOutcome, ApiError> {
    match request {
        AuthRequest::Login { username, password } => {
            api.login(&username, &password).await.map(AuthOutcome::LoggedIn)
        }
        AuthRequest::Register(request) => {
            api.register(&request).await?;
            Ok(AuthOutcome::Registered)
        }
    }
}
