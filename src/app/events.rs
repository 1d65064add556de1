// ABOUTME: Event handling system for keyboard input and app actions

use crate::app::state::{AppState, LookupPrompt, View};
use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use tracing::debug;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AppEvent {
    Quit,
    ToggleHelp,
    Navigate(View),
    Back,
    Refresh,
    Logout,
    // Form editing
    NextField,
    PrevField,
    InputChar(char),
    Backspace,
    Submit,
    ToggleAuthMode,
    // Task list
    SelectNextTask,
    SelectPrevTask,
    OpenTaskAuthor,
    // Public profile lookup prompt
    StartLookup,
    LookupInputChar(char),
    LookupBackspace,
    LookupConfirm,
    LookupCancel,
}

pub struct EventHandler;

impl EventHandler {
    pub fn handle_key_event(key_event: KeyEvent, state: &AppState) -> Option<AppEvent> {
        if key_event.modifiers.contains(KeyModifiers::CONTROL)
            && key_event.code == KeyCode::Char('c')
        {
            return Some(AppEvent::Quit);
        }

        if state.help_visible {
            return match key_event.code {
                KeyCode::Char('?') | KeyCode::Esc | KeyCode::F(1) => Some(AppEvent::ToggleHelp),
                _ => None,
            };
        }

        if state.lookup.is_some() {
            return Self::handle_lookup_keys(key_event);
        }

        match state.current_view {
            View::Login => Self::handle_login_keys(key_event),
            View::PostTask | View::EditProfile => Self::handle_form_keys(key_event),
            View::Profile => Self::handle_profile_keys(key_event),
            View::Tasks => Self::handle_tasks_keys(key_event),
            View::PublicProfile => Self::handle_public_profile_keys(key_event),
        }
    }

    fn handle_lookup_keys(key_event: KeyEvent) -> Option<AppEvent> {
        match key_event.code {
            KeyCode::Enter => Some(AppEvent::LookupConfirm),
            KeyCode::Esc => Some(AppEvent::LookupCancel),
            KeyCode::Backspace => Some(AppEvent::LookupBackspace),
            KeyCode::Char(ch) => Some(AppEvent::LookupInputChar(ch)),
            _ => None,
        }
    }

    /// Text-entry screens: printable keys type, navigation uses Tab/arrows
    fn handle_text_entry(key_event: KeyEvent) -> Option<AppEvent> {
        match key_event.code {
            KeyCode::Tab | KeyCode::Down => Some(AppEvent::NextField),
            KeyCode::BackTab | KeyCode::Up => Some(AppEvent::PrevField),
            KeyCode::Enter => Some(AppEvent::Submit),
            KeyCode::Backspace => Some(AppEvent::Backspace),
            KeyCode::F(1) => Some(AppEvent::ToggleHelp),
            KeyCode::Char(ch) if !key_event.modifiers.contains(KeyModifiers::CONTROL) => {
                Some(AppEvent::InputChar(ch))
            }
            _ => None,
        }
    }

    fn handle_login_keys(key_event: KeyEvent) -> Option<AppEvent> {
        match key_event.code {
            KeyCode::Esc => Some(AppEvent::Quit),
            KeyCode::F(2) => Some(AppEvent::ToggleAuthMode),
            KeyCode::Char('r') if key_event.modifiers.contains(KeyModifiers::CONTROL) => {
                Some(AppEvent::ToggleAuthMode)
            }
            _ => Self::handle_text_entry(key_event),
        }
    }

    fn handle_form_keys(key_event: KeyEvent) -> Option<AppEvent> {
        match key_event.code {
            KeyCode::Esc => Some(AppEvent::Back),
            _ => Self::handle_text_entry(key_event),
        }
    }

    /// Keys shared by the read-only screens
    fn handle_common_keys(key_event: KeyEvent) -> Option<AppEvent> {
        match key_event.code {
            KeyCode::Char('q') => Some(AppEvent::Quit),
            KeyCode::Char('?') | KeyCode::F(1) => Some(AppEvent::ToggleHelp),
            KeyCode::Char('r') => Some(AppEvent::Refresh),
            KeyCode::Char('p') => Some(AppEvent::Navigate(View::Profile)),
            KeyCode::Char('t') => Some(AppEvent::Navigate(View::Tasks)),
            KeyCode::Char('n') => Some(AppEvent::Navigate(View::PostTask)),
            KeyCode::Char('u') => Some(AppEvent::StartLookup),
            KeyCode::Char('l') => Some(AppEvent::Logout),
            _ => None,
        }
    }

    fn handle_profile_keys(key_event: KeyEvent) -> Option<AppEvent> {
        match key_event.code {
            KeyCode::Char('e') => Some(AppEvent::Navigate(View::EditProfile)),
            _ => Self::handle_common_keys(key_event),
        }
    }

    fn handle_tasks_keys(key_event: KeyEvent) -> Option<AppEvent> {
        match key_event.code {
            KeyCode::Down | KeyCode::Char('j') => Some(AppEvent::SelectNextTask),
            KeyCode::Up | KeyCode::Char('k') => Some(AppEvent::SelectPrevTask),
            KeyCode::Enter => Some(AppEvent::OpenTaskAuthor),
            _ => Self::handle_common_keys(key_event),
        }
    }

    fn handle_public_profile_keys(key_event: KeyEvent) -> Option<AppEvent> {
        match key_event.code {
            KeyCode::Esc | KeyCode::Char('b') => Some(AppEvent::Back),
            _ => Self::handle_common_keys(key_event),
        }
    }

    pub fn process_event(event: AppEvent, state: &mut AppState) {
        debug!("Processing {:?} on {:?}", redact(&event), state.current_view);
        state.ui_needs_refresh = true;

        match event {
            AppEvent::Quit => state.quit(),
            AppEvent::ToggleHelp => state.toggle_help(),
            AppEvent::Navigate(view) => state.navigate(view),
            AppEvent::Back => state.go_back(),
            AppEvent::Refresh => state.refresh_current_view(),
            AppEvent::Logout => state.logout(),
            AppEvent::Submit => state.submit_current_form(),
            AppEvent::ToggleAuthMode => {
                state.auth_form.toggle_mode();
            }
            AppEvent::NextField => match state.current_view {
                View::Login => state.auth_form.focus_next(),
                View::PostTask => state.task_form.focus_next(),
                View::EditProfile => {
                    if let Some(form) = state.profile_form.as_mut() {
                        form.focus_next();
                    }
                }
                _ => {}
            },
            AppEvent::PrevField => match state.current_view {
                View::Login => state.auth_form.focus_prev(),
                View::PostTask => state.task_form.focus_prev(),
                View::EditProfile => {
                    if let Some(form) = state.profile_form.as_mut() {
                        form.focus_prev();
                    }
                }
                _ => {}
            },
            AppEvent::InputChar(ch) => match state.current_view {
                View::Login => state.auth_form.input_char(ch),
                View::PostTask => state.task_form.input_char(ch),
                View::EditProfile => {
                    if let Some(form) = state.profile_form.as_mut() {
                        form.input_char(ch);
                    }
                }
                _ => {}
            },
            AppEvent::Backspace => match state.current_view {
                View::Login => state.auth_form.backspace(),
                View::PostTask => state.task_form.backspace(),
                View::EditProfile => {
                    if let Some(form) = state.profile_form.as_mut() {
                        form.backspace();
                    }
                }
                _ => {}
            },
            AppEvent::SelectNextTask => state.select_next_task(),
            AppEvent::SelectPrevTask => state.select_previous_task(),
            AppEvent::OpenTaskAuthor => state.open_selected_author(),
            AppEvent::StartLookup => state.lookup = Some(LookupPrompt::default()),
            AppEvent::LookupInputChar(ch) => {
                if let Some(prompt) = state.lookup.as_mut() {
                    prompt.input.push(ch);
                }
            }
            AppEvent::LookupBackspace => {
                if let Some(prompt) = state.lookup.as_mut() {
                    prompt.input.pop();
                }
            }
            AppEvent::LookupConfirm => {
                if let Some(prompt) = state.lookup.take() {
                    state.open_public_profile(&prompt.input);
                }
            }
            AppEvent::LookupCancel => state.lookup = None,
        }
    }
}

/// Typed characters may belong to a password
fn redact(event: &AppEvent) -> AppEvent {
    match event {
        AppEvent::InputChar(_) => AppEvent::InputChar('*'),
        other => other.clone(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::UiPreferences;
    use crate::session::SessionStore;
    use std::sync::Arc;

    fn key(code: KeyCode) -> KeyEvent {
        KeyEvent::new(code, KeyModifiers::NONE)
    }

    fn state() -> AppState {
        AppState::new(Arc::new(SessionStore::in_memory()), &UiPreferences::default())
    }

    #[test]
    fn test_login_screen_types_letters() {
        let state = state();
        assert_eq!(
            EventHandler::handle_key_event(key(KeyCode::Char('q')), &state),
            Some(AppEvent::InputChar('q'))
        );
        assert_eq!(
            EventHandler::handle_key_event(key(KeyCode::F(2)), &state),
            Some(AppEvent::ToggleAuthMode)
        );
    }

    #[test]
    fn test_ctrl_c_always_quits() {
        let mut state = state();
        state.help_visible = true;
        let event = KeyEvent::new(KeyCode::Char('c'), KeyModifiers::CONTROL);
        assert_eq!(
            EventHandler::handle_key_event(event, &state),
            Some(AppEvent::Quit)
        );
    }

    #[test]
    fn test_help_overlay_swallows_keys() {
        let mut state = state();
        state.help_visible = true;
        assert_eq!(EventHandler::handle_key_event(key(KeyCode::Enter), &state), None);
        assert_eq!(
            EventHandler::handle_key_event(key(KeyCode::Esc), &state),
            Some(AppEvent::ToggleHelp)
        );
    }

    #[test]
    fn test_typing_fills_focused_field() {
        let mut state = state();
        for ch in "bob".chars() {
            EventHandler::process_event(AppEvent::InputChar(ch), &mut state);
        }
        EventHandler::process_event(AppEvent::NextField, &mut state);
        EventHandler::process_event(AppEvent::InputChar('x'), &mut state);
        EventHandler::process_event(AppEvent::Backspace, &mut state);

        assert_eq!(state.auth_form.username, "bob");
        assert!(state.auth_form.password.is_empty());
    }

    #[test]
    fn test_lookup_prompt_opens_public_profile() {
        let mut state = state();
        EventHandler::process_event(AppEvent::StartLookup, &mut state);
        assert_eq!(
            EventHandler::handle_key_event(key(KeyCode::Char('t')), &state),
            Some(AppEvent::LookupInputChar('t'))
        );
        for ch in "carol".chars() {
            EventHandler::process_event(AppEvent::LookupInputChar(ch), &mut state);
        }
        EventHandler::process_event(AppEvent::LookupConfirm, &mut state);

        assert_eq!(state.current_view, View::PublicProfile);
        assert_eq!(state.public_profile.key().map(String::as_str), Some("carol"));
        assert_eq!(state.pending_actions.len(), 1);
    }
}
