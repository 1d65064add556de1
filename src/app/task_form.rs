// ABOUTME: Task posting form with required-field enforcement before any request is made

use crate::api::{ApiError, NewTask};
use crate::app::form::{FormStatus, Notice, SubmitBlocked, SubmitTicket};
use crate::models::{parse_skills, Task, DEADLINE_FORMAT};
use chrono::NaiveDate;
use tracing::debug;

const TITLE_MAX_CHARS: usize = 200;
const BUDGET_MAX: f64 = 99_999_999.99;

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum TaskField {
    Title,
    Description,
    Budget,
    Deadline,
    Skills,
}

impl TaskField {
    pub const ALL: [Self; 5] = [
        Self::Title,
        Self::Description,
        Self::Budget,
        Self::Deadline,
        Self::Skills,
    ];

    pub const fn label(self) -> &'static str {
        match self {
            Self::Title => "Title",
            Self::Description => "Description",
            Self::Budget => "Budget",
            Self::Deadline => "Deadline (YYYY-MM-DD)",
            Self::Skills => "Skills (comma separated)",
        }
    }

    pub fn from_backend(name: &str) -> Option<Self> {
        match name {
            "title" => Some(Self::Title),
            "description" => Some(Self::Description),
            "budget" => Some(Self::Budget),
            "deadline" => Some(Self::Deadline),
            "skills" => Some(Self::Skills),
            _ => None,
        }
    }
}

#[derive(Debug, Clone)]
pub struct TaskSubmission {
    pub ticket: SubmitTicket,
    pub task: NewTask,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TaskTransition {
    /// Posted; the list should be re-fetched
    Created,
    Stay,
    Discarded,
}

#[derive(Debug, Clone)]
pub struct TaskForm {
    pub title: String,
    pub description: String,
    pub budget: String,
    pub deadline: String,
    pub skills: String,
    pub focused: TaskField,
    pub status: FormStatus<TaskField>,
}

impl Default for TaskForm {
    fn default() -> Self {
        Self::new()
    }
}

impl TaskForm {
    pub fn new() -> Self {
        Self {
            title: String::new(),
            description: String::new(),
            budget: String::new(),
            deadline: String::new(),
            skills: String::new(),
            focused: TaskField::Title,
            status: FormStatus::new(),
        }
    }

    pub fn value(&self, field: TaskField) -> &str {
        match field {
            TaskField::Title => &self.title,
            TaskField::Description => &self.description,
            TaskField::Budget => &self.budget,
            TaskField::Deadline => &self.deadline,
            TaskField::Skills => &self.skills,
        }
    }

    fn value_mut(&mut self, field: TaskField) -> &mut String {
        match field {
            TaskField::Title => &mut self.title,
            TaskField::Description => &mut self.description,
            TaskField::Budget => &mut self.budget,
            TaskField::Deadline => &mut self.deadline,
            TaskField::Skills => &mut self.skills,
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
        let index = TaskField::ALL.iter().position(|f| *f == self.focused).unwrap_or(0);
        self.focused = TaskField::ALL[(index + 1) % TaskField::ALL.len()];
    }

    pub fn focus_prev(&mut self) {
        let index = TaskField::ALL.iter().position(|f| *f == self.focused).unwrap_or(0);
        self.focused = TaskField::ALL[(index + TaskField::ALL.len() - 1) % TaskField::ALL.len()];
    }

    /// Build the request, or leave per-field messages on the form
    pub fn validate(&mut self) -> Option<NewTask> {
        self.status.clear_messages();

        let title = self.title.trim();
        if title.is_empty() {
            self.status.add_field_error(TaskField::Title, "Title is required.");
        } else if title.chars().count() > TITLE_MAX_CHARS {
            self.status.add_field_error(
                TaskField::Title,
                format!("Title must be at most {TITLE_MAX_CHARS} characters."),
            );
        }

        let description = self.description.trim();
        if description.is_empty() {
            self.status
                .add_field_error(TaskField::Description, "Description is required.");
        }

        let budget = match self.budget.trim().replace(',', ".").parse::<f64>() {
            Ok(value) if value.is_finite() && (0.0..=BUDGET_MAX).contains(&value) => Some(value),
            Ok(value) if value < 0.0 => {
                self.status
                    .add_field_error(TaskField::Budget, "Budget cannot be negative.");
                None
            }
            Ok(value) if value > BUDGET_MAX => {
                self.status
                    .add_field_error(TaskField::Budget, "Budget is too large.");
                None
            }
            _ if self.budget.trim().is_empty() => {
                self.status.add_field_error(TaskField::Budget, "Budget is required.");
                None
            }
            _ => {
                self.status
                    .add_field_error(TaskField::Budget, "Budget must be a number.");
                None
            }
        };

        let deadline = match NaiveDate::parse_from_str(self.deadline.trim(), DEADLINE_FORMAT) {
            Ok(date) => Some(date),
            Err(_) if self.deadline.trim().is_empty() => {
                self.status
                    .add_field_error(TaskField::Deadline, "Deadline is required.");
                None
            }
            Err(_) => {
                self.status
                    .add_field_error(TaskField::Deadline, "Use the YYYY-MM-DD format.");
                None
            }
        };

        if self.status.has_errors() {
            return None;
        }

        Some(NewTask {
            title: title.to_string(),
            description: description.to_string(),
            budget: budget?,
            deadline: deadline?,
            skills: parse_skills(&self.skills),
        })
    }

    pub fn begin_submit(&mut self) -> Result<TaskSubmission, SubmitBlocked> {
        if self.status.is_submitting() {
            return Err(SubmitBlocked::InFlight);
        }
        let Some(task) = self.validate() else {
            debug!("Task form blocked by local validation");
            return Err(SubmitBlocked::Invalid);
        };
        let ticket = self.status.begin()?;
        Ok(TaskSubmission { ticket, task })
    }

    pub fn finish_submit(
        &mut self,
        ticket: SubmitTicket,
        result: Result<Option<Task>, ApiError>,
    ) -> TaskTransition {
        if !self.status.settle(ticket) {
            return TaskTransition::Discarded;
        }
        match result {
            Ok(_) => {
                *self = Self::new();
                self.status
                    .set_notice(Notice::Success("Task posted.".to_string()));
                TaskTransition::Created
            }
            Err(e) => {
                self.status.apply_api_error(&e, TaskField::from_backend);
                TaskTransition::Stay
            }
        }
    }

    /// Leave the form without posting
    pub fn abandon(&mut self) {
        self.status.reset();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn filled() -> TaskForm {
        let mut form = TaskForm::new();
        form.title = "Landing page".into();
        form.description = "One page, responsive".into();
        form.budget = "1500.5".into();
        form.deadline = "2026-12-01".into();
        form.skills = "HTML, CSS,".into();
        form
    }

    #[test]
    fn test_valid_form_builds_request() {
        let mut form = filled();
        let submission = form.begin_submit().unwrap();
        assert_eq!(submission.task.budget, 1500.5);
        assert_eq!(submission.task.deadline.to_string(), "2026-12-01");
        assert_eq!(submission.task.skills, vec!["HTML".to_string(), "CSS".to_string()]);
        assert!(form.status.is_submitting());
    }

    #[test]
    fn test_blank_title_blocks_submit() {
        let mut form = filled();
        form.title = "   ".into();

        assert_eq!(form.begin_submit().unwrap_err(), SubmitBlocked::Invalid);
        assert_eq!(form.status.error_for(TaskField::Title), Some("Title is required."));
        assert!(!form.status.is_submitting());
    }

    #[test]
    fn test_budget_and_deadline_rules() {
        let mut form = filled();
        form.budget = "-5".into();
        form.deadline = "01.12.2026".into();

        assert!(form.validate().is_none());
        assert_eq!(
            form.status.error_for(TaskField::Budget),
            Some("Budget cannot be negative.")
        );
        assert_eq!(
            form.status.error_for(TaskField::Deadline),
            Some("Use the YYYY-MM-DD format.")
        );

        form.budget = "abc".into();
        form.validate();
        assert_eq!(
            form.status.error_for(TaskField::Budget),
            Some("Budget must be a number.")
        );
    }

    #[test]
    fn test_success_resets_form() {
        let mut form = filled();
        let submission = form.begin_submit().unwrap();

        assert_eq!(
            form.finish_submit(submission.ticket, Ok(None)),
            TaskTransition::Created
        );
        assert!(form.title.is_empty());
        assert!(!form.status.is_submitting());
        assert!(!form.status.notice().unwrap().is_error());
    }

    #[test]
    fn test_server_rejection_keeps_input() {
        let mut form = filled();
        let submission = form.begin_submit().unwrap();

        let result = Err(ApiError::validation("deadline", "Deadline cannot be in the past."));
        assert_eq!(form.finish_submit(submission.ticket, result), TaskTransition::Stay);
        assert_eq!(form.title, "Landing page");
        assert_eq!(
            form.status.error_for(TaskField::Deadline),
            Some("Deadline cannot be in the past.")
        );
    }
}
