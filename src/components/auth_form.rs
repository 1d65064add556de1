// ABOUTME: Login and registration screen

use super::form_fields::{mask, FieldRow, FormFrame};
use super::layout::centered_rect;
use crate::app::auth_flow::{AuthForm, AuthMode};
use ratatui::prelude::*;

pub struct AuthFormComponent;

impl AuthFormComponent {
    pub fn new() -> Self {
        Self
    }

    pub fn render(&self, frame: &mut Frame, area: Rect, form: &AuthForm, mask_passwords: bool) {
        let rows = form
            .mode
            .fields()
            .iter()
            .map(|&field| {
                let raw = form.value(field);
                let value = if field.is_secret() && mask_passwords {
                    mask(raw)
                } else {
                    raw.to_string()
                };
                FieldRow::new(field.label(), value)
                    .focused(form.focused == field)
                    .error(form.status.error_for(field))
            })
            .collect();

        let hint = match form.mode {
            AuthMode::Login => "Enter: log in • Tab: next field • F2: create an account • Esc: quit",
            AuthMode::Register => "Enter: register • Tab: next field • F2: back to log in • Esc: quit",
        };

        let popup = centered_rect(60, 90, area);
        FormFrame {
            title: form.mode.title(),
            rows,
            notice: form.status.notice(),
            submitting: form.status.is_submitting(),
            hint,
        }
        .render(frame, popup);
    }
}

impl Default for AuthFormComponent {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::components::test_support::render_to_string;

    #[test]
    fn test_password_is_masked() {
        let mut form = AuthForm::new(AuthMode::Login);
        form.username = "alice".into();
        form.password = "hunter2".into();

        let screen = render_to_string(100, 40, |frame| {
            let area = frame.size();
            AuthFormComponent::new().render(frame, area, &form, true);
        });
        assert!(screen.contains("alice"));
        assert!(!screen.contains("hunter2"));
        assert!(screen.contains("•••••••"));
    }

    #[test]
    fn test_register_mode_shows_confirmation_error() {
        let mut form = AuthForm::new(AuthMode::Register);
        form.username = "bob".into();
        form.email = "bob@example.com".into();
        form.password = "one".into();
        form.password_confirm = "two".into();
        assert!(!form.validate());

        let screen = render_to_string(100, 40, |frame| {
            let area = frame.size();
            AuthFormComponent::new().render(frame, area, &form, true);
        });
        assert!(screen.contains("Create account"));
        assert!(screen.contains("Passwords do not match."));
    }
}
