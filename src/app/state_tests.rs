// ABOUTME: Tests for AppState routing, async result application and the global login redirect

#[cfg(test)]
mod tests {
    use super::super::*;
    use crate::app::auth_flow::AuthOutcome;
    use crate::models::{Amount, Task};
    use chrono::NaiveDate;

    fn signed_out() -> AppState {
        AppState::new(Arc::new(SessionStore::in_memory()), &UiPreferences::default())
    }

    fn signed_in() -> AppState {
        let session = Arc::new(SessionStore::in_memory());
        session.set_token("abc123").unwrap();
        AppState::new(session, &UiPreferences::default())
    }

    fn task(id: i64, author: &str) -> Task {
        Task {
            id,
            title: format!("Task {id}"),
            description: "Something to do".to_string(),
            budget: Amount(100.0),
            deadline: NaiveDate::from_ymd_opt(2026, 12, 1).unwrap(),
            skills: vec![],
            author_name: Some(author.to_string()),
            created_at: None,
        }
    }

    fn take_profile_ticket(state: &mut AppState) -> FetchTicket<()> {
        match state.take_pending_actions().pop() {
            Some(AsyncAction::FetchProfile(ticket)) => ticket,
            other => panic!("expected a profile fetch, got {:?}", other.map(|a| a.name())),
        }
    }

    #[test]
    fn test_starts_on_login_without_session() {
        let state = signed_out();
        assert_eq!(state.current_view, View::Login);
        assert!(state.pending_actions.is_empty());
    }

    #[test]
    fn test_restored_session_fetches_profile_once() {
        let mut state = signed_in();
        assert_eq!(state.current_view, View::Profile);
        assert_eq!(state.pending_actions.len(), 1);

        // Navigating to the mounted view again does not fetch again
        state.take_pending_actions();
        state.navigate(View::Profile);
        assert!(state.pending_actions.is_empty());
    }

    #[test]
    fn test_protected_view_requires_session() {
        let mut state = signed_out();
        state.navigate(View::Tasks);
        assert_eq!(state.current_view, View::Login);
        assert!(state.pending_actions.is_empty());
    }

    #[test]
    fn test_login_success_navigates_to_profile_once() {
        let mut state = signed_out();
        state.auth_form.username = "alice".into();
        state.auth_form.password = "secret".into();
        state.submit_current_form();

        let Some(AsyncAction::SubmitAuth(submission)) = state.take_pending_actions().pop() else {
            panic!("expected an auth submission");
        };

        state.apply_message(AppMessage::AuthSettled {
            ticket: submission.ticket,
            result: Ok(AuthOutcome::LoggedIn("abc123".into())),
        });

        assert_eq!(state.session.get_token().as_deref(), Some("abc123"));
        assert_eq!(state.current_view, View::Profile);
        let fetches = state.take_pending_actions();
        assert_eq!(fetches.len(), 1);
        assert_eq!(fetches[0].name(), "fetch_profile");
    }

    #[test]
    fn test_unauthenticated_result_redirects_and_clears_data() {
        let mut state = signed_in();
        let ticket = take_profile_ticket(&mut state);
        state.apply_message(AppMessage::ProfileLoaded {
            ticket,
            result: Ok(UserProfile {
                username: "alice".into(),
                ..UserProfile::default()
            }),
        });
        assert!(state.profile.data().is_some());

        state.refresh_current_view();
        let ticket = take_profile_ticket(&mut state);
        // The gateway clears the session before the result comes back
        state.session.clear_token().unwrap();
        state.apply_message(AppMessage::ProfileLoaded {
            ticket,
            result: Err(ApiError::Unauthenticated),
        });

        assert_eq!(state.current_view, View::Login);
        assert!(state.profile.data().is_none());
        assert!(state
            .get_current_notifications()
            .iter()
            .any(|n| n.message == SESSION_EXPIRED));
    }

    #[test]
    fn test_session_subscription_redirects_from_any_screen() {
        let mut state = signed_in();
        state.navigate(View::Tasks);
        let mut rx = state.session.subscribe();

        state.session.clear_token().unwrap();
        assert!(rx.has_changed().unwrap());
        state.on_session_changed(*rx.borrow_and_update());

        assert_eq!(state.current_view, View::Login);
        assert!(state.tasks.data().is_none());
    }

    #[test]
    fn test_late_result_after_logout_is_ignored() {
        let mut state = signed_in();
        let ticket = take_profile_ticket(&mut state);

        state.logout();
        assert_eq!(state.current_view, View::Login);
        assert_eq!(state.take_pending_actions()[0].name(), "logout");

        state.apply_message(AppMessage::ProfileLoaded {
            ticket,
            result: Ok(UserProfile::default()),
        });
        assert!(state.profile.data().is_none());
        assert_eq!(state.current_view, View::Login);
    }

    #[test]
    fn test_logout_clears_session_before_server_call() {
        let mut state = signed_in();
        state.take_pending_actions();

        state.logout();
        assert!(!state.session.is_authenticated());
        match state.take_pending_actions().as_slice() {
            [AsyncAction::Logout(token)] => assert_eq!(token, "abc123"),
            other => panic!("expected one logout, got {}", other.len()),
        }

        // A new login must survive the old logout settling
        state.session.set_token("fresh").unwrap();
        state.apply_message(AppMessage::LoggedOut);
        assert_eq!(state.session.get_token().as_deref(), Some("fresh"));
    }

    #[test]
    fn test_logout_while_signed_out_queues_nothing() {
        let mut state = signed_out();
        state.logout();
        assert!(state.pending_actions.is_empty());
        assert_eq!(state.current_view, View::Login);
    }

    /// Signed in, profile loaded, editor open with a save in flight
    fn saving_profile() -> (AppState, SubmitTicket) {
        let mut state = signed_in();
        let ticket = take_profile_ticket(&mut state);
        state.apply_message(AppMessage::ProfileLoaded {
            ticket,
            result: Ok(UserProfile::default()),
        });
        state.navigate(View::EditProfile);
        state.submit_current_form();
        match state.take_pending_actions().pop() {
            Some(AsyncAction::SaveProfile(submission)) => (state, submission.ticket),
            other => panic!("expected a profile save, got {:?}", other.map(|a| a.name())),
        }
    }

    fn queued_profile_fetches(state: &mut AppState) -> usize {
        state
            .take_pending_actions()
            .iter()
            .filter(|a| matches!(a, AsyncAction::FetchProfile(_)))
            .count()
    }

    #[test]
    fn test_profile_saved_refetches_once() {
        let (mut state, ticket) = saving_profile();
        state.apply_message(AppMessage::ProfileSaved {
            ticket,
            result: Ok(SaveReport::default()),
        });

        assert_eq!(state.current_view, View::Profile);
        assert!(state.profile_form.is_none());
        assert_eq!(queued_profile_fetches(&mut state), 1);
        assert!(state
            .get_current_notifications()
            .iter()
            .any(|n| n.message == "Profile saved."));
    }

    #[test]
    fn test_failed_avatar_still_refetches_profile() {
        let (mut state, ticket) = saving_profile();
        state.apply_message(AppMessage::ProfileSaved {
            ticket,
            result: Ok(SaveReport {
                avatar_error: Some(ApiError::Transport),
            }),
        });

        assert_eq!(state.current_view, View::Profile);
        assert_eq!(queued_profile_fetches(&mut state), 1);
        assert!(state
            .get_current_notifications()
            .iter()
            .any(|n| n.notification_type == NotificationType::Warning
                && n.message.starts_with("Profile saved, but the avatar")));
    }

    #[test]
    fn test_profile_save_rejected_session_redirects() {
        let (mut state, ticket) = saving_profile();
        // The gateway clears the session before the result arrives
        state.session.clear_token().unwrap();
        state.apply_message(AppMessage::ProfileSaved {
            ticket,
            result: Err(ApiError::Unauthenticated),
        });

        assert_eq!(state.current_view, View::Login);
        assert!(state.profile_form.is_none());
        assert!(state.profile.data().is_none());
        assert!(state.pending_actions.is_empty());
        assert!(state
            .get_current_notifications()
            .iter()
            .any(|n| n.message == SESSION_EXPIRED));
    }

    #[test]
    fn test_task_created_refetches_list() {
        let mut state = signed_in();
        state.take_pending_actions();
        state.navigate(View::PostTask);
        state.task_form.title = "Logo".into();
        state.task_form.description = "Need a logo".into();
        state.task_form.budget = "300".into();
        state.task_form.deadline = "2026-12-01".into();
        state.submit_current_form();

        let Some(AsyncAction::CreateTask(submission)) = state.take_pending_actions().pop() else {
            panic!("expected a task submission");
        };
        state.apply_message(AppMessage::TaskCreated {
            ticket: submission.ticket,
            result: Ok(None),
        });

        assert_eq!(state.current_view, View::Tasks);
        let actions = state.take_pending_actions();
        assert_eq!(actions.len(), 1);
        assert_eq!(actions[0].name(), "fetch_tasks");
    }

    #[test]
    fn test_empty_task_title_makes_no_request() {
        let mut state = signed_in();
        state.take_pending_actions();
        state.navigate(View::PostTask);
        state.submit_current_form();

        assert!(state.pending_actions.is_empty());
        assert!(state.task_form.status.has_errors());
    }

    #[test]
    fn test_task_selection_and_author_lookup() {
        let mut state = signed_in();
        state.take_pending_actions();
        state.navigate(View::Tasks);
        let Some(AsyncAction::FetchTasks(ticket)) = state.take_pending_actions().pop() else {
            panic!("expected a task fetch");
        };
        state.apply_message(AppMessage::TasksLoaded {
            ticket,
            result: Ok(vec![task(1, "alice"), task(2, "bob")]),
        });

        state.select_next_task();
        assert_eq!(state.selected_task().map(|t| t.id), Some(2));
        state.select_next_task();
        assert_eq!(state.selected_task().map(|t| t.id), Some(1));
        state.select_previous_task();

        state.open_selected_author();
        assert_eq!(state.current_view, View::PublicProfile);
        assert_eq!(state.public_profile.key().map(String::as_str), Some("bob"));

        state.go_back();
        assert_eq!(state.current_view, View::Tasks);
    }

    #[test]
    fn test_edit_profile_needs_loaded_profile() {
        let mut state = signed_in();
        state.navigate(View::EditProfile);
        assert_eq!(state.current_view, View::Profile);
        assert!(state.profile_form.is_none());
    }

    #[test]
    fn test_notifications_expire() {
        let mut state = signed_out();
        state.add_notification(Notification {
            message: "old".into(),
            notification_type: NotificationType::Info,
            created_at: Instant::now() - Duration::from_secs(10),
            duration: Duration::from_secs(1),
        });
        state.add_info_notification("fresh");

        state.cleanup_expired_notifications();
        let current = state.get_current_notifications();
        assert_eq!(current.len(), 1);
        assert_eq!(current[0].message, "fresh");
    }
}
