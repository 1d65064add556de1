// ABOUTME: The single tagged error type every API call resolves to
// Raw response bodies stop here; callers only ever see short readable messages

use serde_json::Value;
use std::collections::BTreeMap;
use thiserror::Error;

/// Field name -> messages, in the order the backend sent them
pub type FieldErrors = BTreeMap<String, Vec<String>>;

/// Key used for messages that do not belong to any single field
pub const GENERAL_FIELD: &str = "non_field_errors";

const MAX_MESSAGE_LEN: usize = 200;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ApiError {
    /// Field-addressable rejection of submitted data
    #[error("{}", summarize_fields(.0))]
    ValidationFailed(FieldErrors),

    /// 401/403; the session has already been cleared
    #[error("Your session has expired. Please log in again.")]
    Unauthenticated,

    /// No response was received
    #[error("Could not reach the server. Check your connection and try again.")]
    Transport,

    #[error("Not found.")]
    NotFound,

    #[error("Server error ({status}): {message}")]
    Server { status: u16, message: String },

    #[error("Unexpected response from server: {0}")]
    UnexpectedResponse(String),
}

impl ApiError {
    pub fn is_unauthenticated(&self) -> bool {
        matches!(self, Self::Unauthenticated)
    }

    /// Single validation message for one field
    pub fn validation(field: &str, message: impl Into<String>) -> Self {
        let mut fields = FieldErrors::new();
        fields.insert(field.to_string(), vec![message.into()]);
        Self::ValidationFailed(fields)
    }
}

fn summarize_fields(fields: &FieldErrors) -> String {
    let parts: Vec<String> = fields
        .iter()
        .flat_map(|(field, messages)| {
            messages.iter().map(move |m| {
                if field == GENERAL_FIELD {
                    m.clone()
                } else {
                    format!("{field}: {m}")
                }
            })
        })
        .collect();

    if parts.is_empty() {
        "The server rejected the submitted data.".to_string()
    } else {
        parts.join("; ")
    }
}

/// Pull a field -> messages map out of a 400 body.
///
/// Accepts `{"field": "msg"}`, `{"field": ["msg", ...]}`, nested serializer
/// errors (`{"user": {"email": [...]}}` becomes `user.email`) and a bare
/// `{"detail": "..."}`, which is filed under [`GENERAL_FIELD`].
pub fn parse_field_errors(body: &Value) -> FieldErrors {
    let mut fields = FieldErrors::new();
    if let Value::Object(map) = body {
        for (key, value) in map {
            let key = if key == "detail" { GENERAL_FIELD } else { key.as_str() };
            collect_messages(key, value, &mut fields);
        }
    }
    fields
}

fn collect_messages(key: &str, value: &Value, fields: &mut FieldErrors) {
    match value {
        Value::String(message) => push_message(fields, key, message),
        Value::Array(items) => {
            for item in items {
                collect_messages(key, item, fields);
            }
        }
        Value::Object(nested) => {
            for (sub, value) in nested {
                collect_messages(&format!("{key}.{sub}"), value, fields);
            }
        }
        Value::Null => {}
        other => push_message(fields, key, &other.to_string()),
    }
}

fn push_message(fields: &mut FieldErrors, key: &str, message: &str) {
    fields
        .entry(key.to_string())
        .or_default()
        .push(shorten(message));
}

/// Best human-readable message in an error body, if there is one
pub fn extract_message(body: &Value) -> Option<String> {
    ["detail", "message", "error"]
        .iter()
        .find_map(|key| body.get(key).and_then(Value::as_str))
        .map(shorten)
}

fn shorten(message: &str) -> String {
    let message = message.trim();
    if message.chars().count() <= MAX_MESSAGE_LEN {
        message.to_string()
    } else {
        let cut: String = message.chars().take(MAX_MESSAGE_LEN).collect();
        format!("{cut}…")
    }
}
