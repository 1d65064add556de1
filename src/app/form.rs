// ABOUTME: Submission bookkeeping shared by the auth, task and profile forms
// Tracks per-field errors, a general notice, the submitting flag and the form instance id

use crate::api::{ApiError, GENERAL_FIELD};
use std::collections::BTreeMap;
use std::sync::atomic::{AtomicU64, Ordering};

static NEXT_INSTANCE: AtomicU64 = AtomicU64::new(1);

fn next_instance() -> u64 {
    NEXT_INSTANCE.fetch_add(1, Ordering::Relaxed)
}

/// Non-field message shown above a form
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Notice {
    Success(String),
    Error(String),
}

impl Notice {
    pub fn text(&self) -> &str {
        match self {
            Self::Success(text) | Self::Error(text) => text,
        }
    }

    pub const fn is_error(&self) -> bool {
        matches!(self, Self::Error(_))
    }
}

/// Proof that a submission was started by a particular form instance
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SubmitTicket {
    instance: u64,
}

/// Why a submit did not produce a request
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SubmitBlocked {
    /// A previous submission has not settled yet
    InFlight,
    /// Client-side validation failed; errors are on the form
    Invalid,
}

#[derive(Debug, Clone)]
pub struct FormStatus<F: Ord> {
    field_errors: BTreeMap<F, String>,
    notice: Option<Notice>,
    submitting: bool,
    instance: u64,
}

impl<F: Ord + Copy> Default for FormStatus<F> {
    fn default() -> Self {
        Self::new()
    }
}

impl<F: Ord + Copy> FormStatus<F> {
    pub fn new() -> Self {
        Self {
            field_errors: BTreeMap::new(),
            notice: None,
            submitting: false,
            instance: next_instance(),
        }
    }

    pub const fn is_submitting(&self) -> bool {
        self.submitting
    }

    pub fn error_for(&self, field: F) -> Option<&str> {
        self.field_errors.get(&field).map(String::as_str)
    }

    pub const fn field_errors(&self) -> &BTreeMap<F, String> {
        &self.field_errors
    }

    pub fn has_errors(&self) -> bool {
        !self.field_errors.is_empty()
    }

    pub const fn notice(&self) -> Option<&Notice> {
        self.notice.as_ref()
    }

    pub fn set_notice(&mut self, notice: Notice) {
        self.notice = Some(notice);
    }

    /// Multiple messages for one field are joined
    pub fn add_field_error(&mut self, field: F, message: impl Into<String>) {
        let message = message.into();
        self.field_errors
            .entry(field)
            .and_modify(|existing| {
                existing.push(' ');
                existing.push_str(&message);
            })
            .or_insert(message);
    }

    pub fn clear_messages(&mut self) {
        self.field_errors.clear();
        self.notice = None;
    }

    /// Start a submission. Fails while another one is outstanding.
    pub fn begin(&mut self) -> Result<SubmitTicket, SubmitBlocked> {
        if self.submitting {
            return Err(SubmitBlocked::InFlight);
        }
        self.submitting = true;
        Ok(SubmitTicket {
            instance: self.instance,
        })
    }

    /// Settle a submission. Returns whether its result may still be applied;
    /// the submitting flag is cleared either way.
    pub fn settle(&mut self, ticket: SubmitTicket) -> bool {
        let current = ticket.instance == self.instance;
        if current {
            self.submitting = false;
        }
        current
    }

    /// Abandon this instance: results of outstanding submissions will be
    /// discarded and the form is usable again immediately
    pub fn reset(&mut self) {
        self.field_errors.clear();
        self.notice = None;
        self.submitting = false;
        self.instance = next_instance();
    }

    /// File an API error under the form's fields, using `map_field` to
    /// translate backend field names. Anything unmapped becomes the notice.
    pub fn apply_api_error(&mut self, error: &ApiError, map_field: impl Fn(&str) -> Option<F>) {
        match error {
            ApiError::ValidationFailed(fields) => {
                let mut general = Vec::new();
                for (name, messages) in fields {
                    let target = if name == GENERAL_FIELD {
                        None
                    } else {
                        map_field(name)
                    };
                    match target {
                        Some(field) => {
                            for message in messages {
                                self.add_field_error(field, message.clone());
                            }
                        }
                        None => general.extend(messages.iter().cloned()),
                    }
                }
                if !general.is_empty() {
                    self.notice = Some(Notice::Error(general.join(" ")));
                }
            }
            other => self.notice = Some(Notice::Error(other.to_string())),
        }
    }
}
