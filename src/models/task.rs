// ABOUTME: Task model for marketplace job postings

use super::numeric::Amount;
use chrono::{DateTime, NaiveDate, NaiveDateTime, Utc};
use serde::{Deserialize, Deserializer, Serialize};

/// Calendar format used for deadlines on the wire and in forms
pub const DEADLINE_FORMAT: &str = "%Y-%m-%d";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Task {
    pub id: i64,
    pub title: String,
    #[serde(default)]
    pub description: String,
    pub budget: Amount,
    pub deadline: NaiveDate,
    #[serde(default)]
    pub skills: Vec<String>,
    #[serde(default, alias = "author")]
    pub author_name: Option<String>,
    #[serde(default, deserialize_with = "lenient_timestamp")]
    pub created_at: Option<DateTime<Utc>>,
}

/// Accepts RFC 3339 or a naive `YYYY-MM-DD[T ]HH:MM:SS[.f]` taken as UTC;
/// anything else becomes `None` instead of failing the whole task
fn lenient_timestamp<'de, D: Deserializer<'de>>(
    deserializer: D,
) -> Result<Option<DateTime<Utc>>, D::Error> {
    let Some(raw) = Option::<serde_json::Value>::deserialize(deserializer)? else {
        return Ok(None);
    };
    let Some(raw) = raw.as_str().map(str::trim) else {
        return Ok(None);
    };

    if let Ok(parsed) = DateTime::parse_from_rfc3339(raw) {
        return Ok(Some(parsed.with_timezone(&Utc)));
    }
    Ok(["%Y-%m-%dT%H:%M:%S%.f", "%Y-%m-%d %H:%M:%S%.f"]
        .iter()
        .find_map(|format| NaiveDateTime::parse_from_str(raw, format).ok())
        .map(|naive| naive.and_utc()))
}

impl Task {
    pub fn author(&self) -> &str {
        self.author_name.as_deref().unwrap_or("unknown")
    }

    pub fn deadline_display(&self) -> String {
        self.deadline.format(DEADLINE_FORMAT).to_string()
    }

    /// Days left until the deadline, negative once it has passed
    pub fn days_left(&self, today: NaiveDate) -> i64 {
        (self.deadline - today).num_days()
    }
}
