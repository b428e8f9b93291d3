use std::fmt;

use serde::{Deserialize, Serialize};
use chrono::{DateTime, NaiveDate, Utc};
use sqlx::FromRow;
use thiserror::Error;
use uuid::Uuid;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ExceptionKind {
    Updated,
    Deleted,
}

impl ExceptionKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            ExceptionKind::Updated => "updated",
            ExceptionKind::Deleted => "deleted",
        }
    }
}

impl fmt::Display for ExceptionKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Error)]
#[error("unknown exception kind: {0}")]
pub struct UnknownExceptionKind(pub String);

impl TryFrom<String> for ExceptionKind {
    type Error = UnknownExceptionKind;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        match value.as_str() {
            "updated" => Ok(ExceptionKind::Updated),
            "deleted" => Ok(ExceptionKind::Deleted),
            _ => Err(UnknownExceptionKind(value)),
        }
    }
}

/// Per-date override of one rule's occurrence. At most one per (rule_id, date).
#[derive(Debug, Serialize, Deserialize, FromRow, Clone, PartialEq, Eq)]
pub struct RuleException {
    pub id: String,
    pub rule_id: String,
    pub date: NaiveDate,
    #[sqlx(try_from = "String")]
    pub kind: ExceptionKind,
    pub override_start: Option<String>,
    pub override_end: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl RuleException {
    pub fn updated(rule_id: String, date: NaiveDate, start: String, end: String) -> Self {
        Self::build(rule_id, date, ExceptionKind::Updated, Some(start), Some(end))
    }

    pub fn deleted(rule_id: String, date: NaiveDate) -> Self {
        Self::build(rule_id, date, ExceptionKind::Deleted, None, None)
    }

    fn build(
        rule_id: String,
        date: NaiveDate,
        kind: ExceptionKind,
        override_start: Option<String>,
        override_end: Option<String>,
    ) -> Self {
        let now = Utc::now();
        Self {
            id: Uuid::new_v4().to_string(),
            rule_id,
            date,
            kind,
            override_start,
            override_end,
            created_at: now,
            updated_at: now,
        }
    }
}
