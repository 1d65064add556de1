// ABOUTME: Runs queued async actions on background tasks and feeds their results back to the UI loop

use crate::api::ApiClient;
use crate::app::auth_flow;
use crate::app::profile_form;
use crate::app::state::{AppMessage, AppState, AsyncAction};
use crate::config::UiPreferences;
use crate::session::SessionSnapshot;
use tokio::sync::{mpsc, watch};
use tracing::{debug, info};

pub struct App {
    pub state: AppState,
    api: ApiClient,
    tx: mpsc::UnboundedSender<AppMessage>,
    rx: mpsc::UnboundedReceiver<AppMessage>,
    session_rx: watch::Receiver<SessionSnapshot>,
}

impl App {
    pub fn new(api: ApiClient, preferences: &UiPreferences) -> Self {
        let (tx, rx) = mpsc::unbounded_channel();
        let session = api.session().clone();
        let session_rx = session.subscribe();

        Self {
            state: AppState::new(session, preferences),
            api,
            tx,
            rx,
            session_rx,
        }
    }

    /// Spawn every queued action. Must be called from within a tokio runtime.
    pub fn dispatch_pending(&mut self) {
        for action in self.state.take_pending_actions() {
            debug!("Dispatching {}", action.name());
            let api = self.api.clone();
            let tx = self.tx.clone();
            tokio::spawn(async move {
                let message = execute(&api, action).await;
                // The receiver is gone once the UI has shut down
                let _ = tx.send(message);
            });
        }
    }

    /// Apply every result that has arrived so far
    pub fn drain_messages(&mut self) -> usize {
        let mut applied = 0;
        while let Ok(message) = self.rx.try_recv() {
            self.state.apply_message(message);
            applied += 1;
        }
        applied
    }

    /// Wait for the next result and apply it
    pub async fn process_next_message(&mut self) -> bool {
        match self.rx.recv().await {
            Some(message) => {
                self.state.apply_message(message);
                true
            }
            None => false,
        }
    }

    /// Forward session changes (logout, token rejected elsewhere) to the state
    pub fn sync_session(&mut self) {
        if self.session_rx.has_changed().unwrap_or(false) {
            let snapshot = *self.session_rx.borrow_and_update();
            info!("Session changed: {:?} (epoch {})", snapshot.status, snapshot.epoch);
            self.state.on_session_changed(snapshot);
        }
    }

    pub fn tick(&mut self) {
        self.state.cleanup_expired_notifications();
        self.sync_session();
        self.drain_messages();
        self.dispatch_pending();
    }

    /// Check if UI needs immediate refresh and clear the flag
    pub fn needs_ui_refresh(&mut self) -> bool {
        std::mem::take(&mut self.state.ui_needs_refresh)
    }
}

/// Perform one action against the backend
pub async fn execute(api: &ApiClient, action: AsyncAction) -> AppMessage {
    match action {
        AsyncAction::SubmitAuth(submission) => AppMessage::AuthSettled {
            ticket: submission.ticket,
            result: auth_flow::dispatch(api, submission.request).await,
        },
        AsyncAction::FetchProfile(ticket) => AppMessage::ProfileLoaded {
            result: api.fetch_profile().await,
            ticket,
        },
        AsyncAction::FetchPublicProfile(ticket) => {
            let result = api.fetch_public_profile(&ticket.key).await;
            AppMessage::PublicProfileLoaded { ticket, result }
        }
        AsyncAction::FetchTasks(ticket) => AppMessage::TasksLoaded {
            result: api.list_tasks().await,
            ticket,
        },
        AsyncAction::CreateTask(submission) => AppMessage::TaskCreated {
            ticket: submission.ticket,
            result: api.create_task(&submission.task).await,
        },
        AsyncAction::SaveProfile(submission) => AppMessage::ProfileSaved {
            ticket: submission.ticket,
            result: profile_form::dispatch(api, submission.save).await,
        },
        AsyncAction::Logout(token) => {
            api.revoke_token(&token).await;
            AppMessage::LoggedOut
        }
    }
}
