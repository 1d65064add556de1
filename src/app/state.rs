// ABOUTME: Application state, screen routing and application of async results for the gigboard TUI

use crate::api::ApiError;
use crate::app::auth_flow::{AuthForm, AuthMode, AuthOutcome, AuthSubmission, AuthTransition};
use crate::app::form::{SubmitBlocked, SubmitTicket};
use crate::app::profile_form::{ProfileForm, ProfileSubmission, ProfileTransition, SaveReport};
use crate::app::resource_view::{FetchTicket, ResolveOutcome, ResourceView};
use crate::app::task_form::{TaskForm, TaskSubmission, TaskTransition};
use crate::config::UiPreferences;
use crate::models::{PublicProfile, Task, UserProfile};
use crate::session::{AuthStatus, SessionSnapshot, SessionStore};
use std::collections::VecDeque;
use std::sync::Arc;
use std::time::{Duration, Instant};
use tracing::{debug, info, warn};

pub const SESSION_EXPIRED: &str = "Your session has expired. Please log in again.";

/// Notification system for TUI messages
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum NotificationType {
    Success,
    Error,
    Info,
    Warning,
}

#[derive(Debug, Clone)]
pub struct Notification {
    pub message: String,
    pub notification_type: NotificationType,
    pub created_at: Instant,
    pub duration: Duration,
}

impl Notification {
    fn with(message: impl Into<String>, notification_type: NotificationType, secs: u64) -> Self {
        Self {
            message: message.into(),
            notification_type,
            created_at: Instant::now(),
            duration: Duration::from_secs(secs),
        }
    }

    pub fn success(message: impl Into<String>) -> Self {
        Self::with(message, NotificationType::Success, 3)
    }

    pub fn error(message: impl Into<String>) -> Self {
        Self::with(message, NotificationType::Error, 5)
    }

    pub fn info(message: impl Into<String>) -> Self {
        Self::with(message, NotificationType::Info, 3)
    }

    pub fn warning(message: impl Into<String>) -> Self {
        Self::with(message, NotificationType::Warning, 4)
    }

    pub fn is_expired(&self) -> bool {
        self.created_at.elapsed() > self.duration
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum View {
    Login,
    Profile,
    PublicProfile,
    Tasks,
    PostTask,
    EditProfile,
}

impl View {
    pub const fn title(self) -> &'static str {
        match self {
            Self::Login => "Sign in",
            Self::Profile => "My profile",
            Self::PublicProfile => "Profile",
            Self::Tasks => "Tasks",
            Self::PostTask => "Post a task",
            Self::EditProfile => "Edit profile",
        }
    }

    /// Screens that need a signed-in session
    pub const fn is_protected(self) -> bool {
        !matches!(self, Self::Login | Self::PublicProfile)
    }
}

/// Work the UI loop hands off to a background task
#[derive(Debug, Clone)]
pub enum AsyncAction {
    SubmitAuth(AuthSubmission),
    FetchProfile(FetchTicket<()>),
    FetchPublicProfile(FetchTicket<String>),
    FetchTasks(FetchTicket<()>),
    CreateTask(TaskSubmission),
    SaveProfile(ProfileSubmission),
    /// Revoke this token on the server; the local session is already gone
    Logout(String),
}

impl AsyncAction {
    /// Short name for logs; payloads may hold passwords
    pub const fn name(&self) -> &'static str {
        match self {
            Self::SubmitAuth(_) => "submit_auth",
            Self::FetchProfile(_) => "fetch_profile",
            Self::FetchPublicProfile(_) => "fetch_public_profile",
            Self::FetchTasks(_) => "fetch_tasks",
            Self::CreateTask(_) => "create_task",
            Self::SaveProfile(_) => "save_profile",
            Self::Logout(_) => "logout",
        }
    }
}

/// Results coming back from background tasks
#[derive(Debug)]
pub enum AppMessage {
    AuthSettled {
        ticket: SubmitTicket,
        result: Result<AuthOutcome, ApiError>,
    },
    ProfileLoaded {
        ticket: FetchTicket<()>,
        result: Result<UserProfile, ApiError>,
    },
    PublicProfileLoaded {
        ticket: FetchTicket<String>,
        result: Result<PublicProfile, ApiError>,
    },
    TasksLoaded {
        ticket: FetchTicket<()>,
        result: Result<Vec<Task>, ApiError>,
    },
    TaskCreated {
        ticket: SubmitTicket,
        result: Result<Option<Task>, ApiError>,
    },
    ProfileSaved {
        ticket: SubmitTicket,
        result: Result<SaveReport, ApiError>,
    },
    /// The server-side logout finished (successfully or not)
    LoggedOut,
}

/// One-line prompt for looking up another user's profile
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LookupPrompt {
    pub input: String,
}

pub struct AppState {
    pub current_view: View,
    pub session: Arc<SessionStore>,

    pub auth_form: AuthForm,
    pub task_form: TaskForm,
    pub profile_form: Option<ProfileForm>,

    pub profile: ResourceView<(), UserProfile>,
    pub public_profile: ResourceView<String, PublicProfile>,
    pub tasks: ResourceView<(), Vec<Task>>,
    pub selected_task: usize,

    pub lookup: Option<LookupPrompt>,
    pub help_visible: bool,
    pub mask_passwords: bool,
    pub should_quit: bool,
    pub ui_needs_refresh: bool,

    // Notification system
    pub notifications: Vec<Notification>,

    pub pending_actions: VecDeque<AsyncAction>,

    /// Where Back returns to from the public profile
    previous_view: View,
    last_session: SessionSnapshot,
}

impl AppState {
    pub fn new(session: Arc<SessionStore>, preferences: &UiPreferences) -> Self {
        let last_session = session.snapshot();
        let mut state = Self {
            current_view: View::Login,
            session,
            auth_form: AuthForm::default(),
            task_form: TaskForm::new(),
            profile_form: None,
            profile: ResourceView::protected(),
            public_profile: ResourceView::public(),
            tasks: ResourceView::protected(),
            selected_task: 0,
            lookup: None,
            help_visible: false,
            mask_passwords: preferences.mask_passwords,
            should_quit: false,
            ui_needs_refresh: true,
            notifications: Vec::new(),
            pending_actions: VecDeque::new(),
            previous_view: View::Profile,
            last_session,
        };

        if state.session.is_authenticated() {
            info!("Starting with restored session");
            state.navigate(View::Profile);
        }
        state
    }

    pub fn quit(&mut self) {
        self.should_quit = true;
    }

    pub fn toggle_help(&mut self) {
        self.help_visible = !self.help_visible;
    }

    pub fn take_pending_actions(&mut self) -> Vec<AsyncAction> {
        self.pending_actions.drain(..).collect()
    }

    // ============================================================================
    // Navigation
    // ============================================================================

    /// Switch screens, mounting the target and unmounting everything else
    pub fn navigate(&mut self, target: View) {
        if target.is_protected() && !self.session.is_authenticated() {
            debug!("Blocked navigation to {:?} without a session", target);
            self.redirect_to_login(None);
            return;
        }

        if target == View::EditProfile && self.profile_form.is_none() {
            let Some(form) = self.profile.data().map(ProfileForm::from_profile) else {
                self.add_warning_notification("Profile is still loading.");
                return;
            };
            self.profile_form = Some(form);
        }

        self.leave(self.current_view, target);
        self.current_view = target;
        self.ui_needs_refresh = true;

        match target {
            View::Profile => {
                if let Some(ticket) = self.profile.mount((), &self.session) {
                    self.pending_actions.push_back(AsyncAction::FetchProfile(ticket));
                }
            }
            View::Tasks => {
                if let Some(ticket) = self.tasks.mount((), &self.session) {
                    self.selected_task = 0;
                    self.pending_actions.push_back(AsyncAction::FetchTasks(ticket));
                }
            }
            View::Login | View::PublicProfile | View::PostTask | View::EditProfile => {}
        }
    }

    fn leave(&mut self, from: View, to: View) {
        if from == to {
            return;
        }
        match from {
            View::Login => self.auth_form.abandon(),
            View::PostTask => self.task_form.abandon(),
            View::EditProfile => {
                if let Some(form) = self.profile_form.as_mut() {
                    form.abandon();
                }
                self.profile_form = None;
            }
            View::Profile => {
                if to != View::EditProfile {
                    self.profile.unmount();
                }
            }
            View::Tasks => self.tasks.unmount(),
            View::PublicProfile => self.public_profile.unmount(),
        }
    }

    /// Show another user's profile
    pub fn open_public_profile(&mut self, username: &str) {
        let username = username.trim();
        if username.is_empty() {
            return;
        }
        if self.current_view != View::PublicProfile {
            self.leave(self.current_view, View::PublicProfile);
            self.previous_view = self.current_view;
            self.current_view = View::PublicProfile;
        }
        if let Some(ticket) = self.public_profile.mount(username.to_string(), &self.session) {
            self.pending_actions
                .push_back(AsyncAction::FetchPublicProfile(ticket));
        }
        self.ui_needs_refresh = true;
    }

    pub fn go_back(&mut self) {
        let target = match self.current_view {
            View::PublicProfile => self.previous_view,
            View::PostTask => View::Tasks,
            View::EditProfile => View::Profile,
            other => other,
        };
        let target = if target.is_protected() && !self.session.is_authenticated() {
            View::Login
        } else {
            target
        };
        self.navigate(target);
    }

    /// Re-fetch whatever the current screen shows
    pub fn refresh_current_view(&mut self) {
        let action = match self.current_view {
            View::Profile => self.profile.refresh(&self.session).map(AsyncAction::FetchProfile),
            View::Tasks => self.tasks.refresh(&self.session).map(AsyncAction::FetchTasks),
            View::PublicProfile => self
                .public_profile
                .refresh(&self.session)
                .map(AsyncAction::FetchPublicProfile),
            View::Login | View::PostTask | View::EditProfile => None,
        };
        if let Some(action) = action {
            self.pending_actions.push_back(action);
        }
    }

    /// Drop every piece of protected data and show the login screen
    pub fn redirect_to_login(&mut self, notice: Option<&str>) {
        info!("Redirecting to login");
        self.profile.unmount();
        self.tasks.unmount();
        self.public_profile.unmount();
        self.profile_form = None;
        self.task_form = TaskForm::new();
        self.selected_task = 0;
        self.lookup = None;

        if self.current_view != View::Login {
            let username = self.auth_form.username.clone();
            self.auth_form = AuthForm::new(AuthMode::Login);
            self.auth_form.username = username;
        }
        self.current_view = View::Login;
        self.previous_view = View::Profile;
        self.ui_needs_refresh = true;

        if let Some(message) = notice {
            self.add_warning_notification(message);
        }
    }

    /// Called whenever the session store reports a change
    pub fn on_session_changed(&mut self, snapshot: SessionSnapshot) {
        if snapshot == self.last_session {
            return;
        }
        self.last_session = snapshot;

        if snapshot.status == AuthStatus::SignedOut && self.current_view != View::Login {
            self.redirect_to_login(Some(SESSION_EXPIRED));
        }
    }

    // ============================================================================
    // Form submissions
    // ============================================================================

    pub fn submit_current_form(&mut self) {
        let action = match self.current_view {
            View::Login => self.auth_form.begin_submit().map(AsyncAction::SubmitAuth),
            View::PostTask => self.task_form.begin_submit().map(AsyncAction::CreateTask),
            View::EditProfile => match self.profile_form.as_mut() {
                Some(form) => form.begin_submit().map(AsyncAction::SaveProfile),
                None => return,
            },
            _ => return,
        };

        match action {
            Ok(action) => self.pending_actions.push_back(action),
            Err(SubmitBlocked::InFlight) => debug!("Submit ignored, request still outstanding"),
            Err(SubmitBlocked::Invalid) => self.ui_needs_refresh = true,
        }
    }

    /// Sign out right away; the server call follows in the background and
    /// only ever concerns the token captured here
    pub fn logout(&mut self) {
        let token = self.session.get_token();
        match self.session.clear_token() {
            Ok(()) => self.add_info_notification("Logged out."),
            Err(e) => {
                warn!("Logout incomplete: {}", e);
                self.add_warning_notification(e.to_string());
            }
        }
        self.last_session = self.session.snapshot();
        self.redirect_to_login(None);

        if let Some(token) = token {
            self.pending_actions.push_back(AsyncAction::Logout(token));
        }
    }

    // ============================================================================
    // Async results
    // ============================================================================

    pub fn apply_message(&mut self, message: AppMessage) {
        self.ui_needs_refresh = true;
        match message {
            AppMessage::AuthSettled { ticket, result } => {
                match self.auth_form.finish_submit(ticket, result, &self.session) {
                    AuthTransition::Authenticated => {
                        self.last_session = self.session.snapshot();
                        self.add_success_notification("Logged in.");
                        self.navigate(View::Profile);
                    }
                    AuthTransition::Registered => {
                        self.add_success_notification("Account created. Please log in.");
                    }
                    AuthTransition::Stay | AuthTransition::Discarded => {}
                }
            }
            AppMessage::ProfileLoaded { ticket, result } => {
                let outcome = self.profile.resolve(&ticket, result, &self.session);
                self.after_resolve(outcome);
            }
            AppMessage::PublicProfileLoaded { ticket, result } => {
                let outcome = self.public_profile.resolve(&ticket, result, &self.session);
                self.after_resolve(outcome);
            }
            AppMessage::TasksLoaded { ticket, result } => {
                let outcome = self.tasks.resolve(&ticket, result, &self.session);
                if let Some(tasks) = self.tasks.data() {
                    self.selected_task = self.selected_task.min(tasks.len().saturating_sub(1));
                }
                self.after_resolve(outcome);
            }
            AppMessage::TaskCreated { ticket, result } => {
                let unauthenticated = is_unauthenticated(&result);
                match self.task_form.finish_submit(ticket, result) {
                    TaskTransition::Created => {
                        self.add_success_notification("Task posted.");
                        self.navigate(View::Tasks);
                    }
                    TaskTransition::Stay if unauthenticated => {
                        self.redirect_to_login(Some(SESSION_EXPIRED));
                    }
                    TaskTransition::Stay | TaskTransition::Discarded => {}
                }
            }
            AppMessage::ProfileSaved { ticket, result } => {
                let unauthenticated = is_unauthenticated(&result);
                let transition = match self.profile_form.as_mut() {
                    Some(form) => form.finish_submit(ticket, result),
                    None => ProfileTransition::Discarded,
                };
                match transition {
                    ProfileTransition::Saved {
                        avatar_error: Some(ApiError::Unauthenticated),
                    } => {
                        self.redirect_to_login(Some(SESSION_EXPIRED));
                    }
                    ProfileTransition::Saved { avatar_error } => {
                        match avatar_error {
                            Some(e) => self.add_warning_notification(format!(
                                "Profile saved, but the avatar was not uploaded: {e}"
                            )),
                            None => self.add_success_notification("Profile saved."),
                        }
                        self.navigate(View::Profile);
                        if let Some(ticket) = self.profile.refresh(&self.session) {
                            self.pending_actions.push_back(AsyncAction::FetchProfile(ticket));
                        }
                    }
                    ProfileTransition::Stay if unauthenticated => {
                        self.redirect_to_login(Some(SESSION_EXPIRED));
                    }
                    ProfileTransition::Stay | ProfileTransition::Discarded => {}
                }
            }
            AppMessage::LoggedOut => debug!("Server-side logout settled"),
        }
    }

    fn after_resolve(&mut self, outcome: ResolveOutcome) {
        if outcome == ResolveOutcome::RedirectToLogin {
            self.redirect_to_login(Some(SESSION_EXPIRED));
        }
    }

    // ============================================================================
    // Task list selection
    // ============================================================================

    pub fn selected_task(&self) -> Option<&Task> {
        self.tasks.data().and_then(|tasks| tasks.get(self.selected_task))
    }

    pub fn select_next_task(&mut self) {
        if let Some(tasks) = self.tasks.data() {
            if !tasks.is_empty() {
                self.selected_task = (self.selected_task + 1) % tasks.len();
            }
        }
    }

    pub fn select_previous_task(&mut self) {
        if let Some(tasks) = self.tasks.data() {
            if !tasks.is_empty() {
                self.selected_task = (self.selected_task + tasks.len() - 1) % tasks.len();
            }
        }
    }

    pub fn open_selected_author(&mut self) {
        let author = self.selected_task().and_then(|t| t.author_name.clone());
        match author {
            Some(author) => self.open_public_profile(&author),
            None => self.add_info_notification("This task has no author on record."),
        }
    }

    // ============================================================================
    // Notifications
    // ============================================================================

    /// Add a notification to the notification queue
    pub fn add_notification(&mut self, notification: Notification) {
        self.notifications.push(notification);
    }

    pub fn add_success_notification(&mut self, message: impl Into<String>) {
        self.add_notification(Notification::success(message));
    }

    pub fn add_error_notification(&mut self, message: impl Into<String>) {
        self.add_notification(Notification::error(message));
    }

    pub fn add_info_notification(&mut self, message: impl Into<String>) {
        self.add_notification(Notification::info(message));
    }

    pub fn add_warning_notification(&mut self, message: impl Into<String>) {
        self.add_notification(Notification::warning(message));
    }

    /// Remove expired notifications
    pub fn cleanup_expired_notifications(&mut self) {
        self.notifications.retain(|n| !n.is_expired());
    }

    /// Get current notifications (non-expired)
    pub fn get_current_notifications(&self) -> Vec<&Notification> {
        self.notifications.iter().filter(|n| !n.is_expired()).collect()
    }
}

fn is_unauthenticated<T>(result: &Result<T, ApiError>) -> bool {
    matches!(result, Err(ApiError::Unauthenticated))
}

#[cfg(test)]
#[path = "state_tests.rs"]
mod state_tests;
