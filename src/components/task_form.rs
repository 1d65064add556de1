// ABOUTME: Post-a-task screen

use super::form_fields::{FieldRow, FormFrame};
use crate::app::task_form::{TaskField, TaskForm};
use ratatui::prelude::*;

pub struct TaskFormComponent;

impl TaskFormComponent {
    pub fn new() -> Self {
        Self
    }

    pub fn render(&self, frame: &mut Frame, area: Rect, form: &TaskForm) {
        let rows = TaskField::ALL
            .iter()
            .map(|&field| {
                FieldRow::new(field.label(), form.value(field))
                    .focused(form.focused == field)
                    .error(form.status.error_for(field))
            })
            .collect();

        FormFrame {
            title: "Post a task",
            rows,
            notice: form.status.notice(),
            submitting: form.status.is_submitting(),
            hint: "Enter: post task • Tab: next field • Esc: back",
        }
        .render(frame, area);
    }
}

impl Default for TaskFormComponent {
    fn default() -> Self {
        Self::new()
    }
}
