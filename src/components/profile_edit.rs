// ABOUTME: Profile editing screen split into details and links/avatar columns

use super::form_fields::{FieldRow, FormFrame};
use crate::app::profile_form::{ProfileField, ProfileForm};
use ratatui::prelude::*;

const DETAIL_FIELDS: [ProfileField; 5] = [
    ProfileField::Bio,
    ProfileField::Specialization,
    ProfileField::HourlyRate,
    ProfileField::Skills,
    ProfileField::AvailableForHire,
];

const LINK_FIELDS: [ProfileField; 4] = [
    ProfileField::PortfolioUrl,
    ProfileField::GithubUrl,
    ProfileField::LinkedinUrl,
    ProfileField::AvatarPath,
];

pub struct ProfileEditComponent;

impl ProfileEditComponent {
    pub fn new() -> Self {
        Self
    }

    pub fn render(&self, frame: &mut Frame, area: Rect, form: &ProfileForm) {
        let chunks = Layout::default()
            .direction(Direction::Horizontal)
            .constraints([Constraint::Percentage(50), Constraint::Percentage(50)])
            .split(area);

        FormFrame {
            title: "Edit profile",
            rows: rows(form, &DETAIL_FIELDS),
            notice: form.status.notice(),
            submitting: form.status.is_submitting(),
            hint: "Enter: save • Space: toggle availability • Esc: back",
        }
        .render(frame, chunks[0]);

        FormFrame {
            title: "Links & avatar",
            rows: rows(form, &LINK_FIELDS),
            notice: None,
            submitting: form.status.is_submitting(),
            hint: "Tab: next field",
        }
        .render(frame, chunks[1]);
    }
}

fn rows<'a>(form: &'a ProfileForm, fields: &[ProfileField]) -> Vec<FieldRow<'a>> {
    fields
        .iter()
        .map(|&field| {
            FieldRow::new(field.label(), form.display_value(field))
                .focused(form.focused == field)
                .error(form.status.error_for(field))
        })
        .collect()
}

impl Default for ProfileEditComponent {
    fn default() -> Self {
        Self::new()
    }
}
