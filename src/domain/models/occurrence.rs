use serde::{Deserialize, Serialize};
use chrono::NaiveDate;

use crate::domain::models::rule::RecurringRule;

/// A concrete, dated instance of a rule. Computed on demand, never stored.
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Eq)]
pub struct Occurrence {
    pub id: String,
    pub date: NaiveDate,
    pub start_time: String,
    pub end_time: String,
    pub is_exception: bool,
    pub original_rule_id: String,
}

impl Occurrence {
    pub fn id_for(rule_id: &str, date: NaiveDate) -> String {
        format!("{}-{}", rule_id, date.format("%Y-%m-%d"))
    }

    pub fn regular(rule: &RecurringRule, date: NaiveDate) -> Self {
        Self {
            id: Self::id_for(&rule.id, date),
            date,
            start_time: rule.start_time.clone(),
            end_time: rule.end_time.clone(),
            is_exception: false,
            original_rule_id: rule.id.clone(),
        }
    }

    /// Missing override fields fall back to the rule's own times.
    pub fn overridden(
        rule: &RecurringRule,
        date: NaiveDate,
        start: Option<&str>,
        end: Option<&str>,
    ) -> Self {
        Self {
            id: Self::id_for(&rule.id, date),
            date,
            start_time: start.unwrap_or(&rule.start_time).to_string(),
            end_time: end.unwrap_or(&rule.end_time).to_string(),
            is_exception: true,
            original_rule_id: rule.id.clone(),
        }
    }
}
