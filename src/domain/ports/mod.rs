use crate::domain::models::{rule::RecurringRule, rule_exception::RuleException};
use crate::error::AppError;
use async_trait::async_trait;
use chrono::NaiveDate;

/// Canonical store of recurring rules. No business validation lives here.
#[async_trait]
pub trait RuleRepository: Send + Sync {
    async fn create(&self, rule: &RecurringRule) -> Result<RecurringRule, AppError>;
    /// Ordered by `start_time`.
    async fn find_by_day_of_week(&self, day_of_week: i32) -> Result<Vec<RecurringRule>, AppError>;
    async fn find_by_id(&self, id: &str) -> Result<Option<RecurringRule>, AppError>;
    /// Ordered by `(day_of_week, start_time)`.
    async fn find_all(&self) -> Result<Vec<RecurringRule>, AppError>;
    /// Cascades to every exception referencing the rule.
    async fn delete(&self, id: &str) -> Result<(), AppError>;
}

/// Per-date overrides keyed by `(rule_id, date)`.
#[async_trait]
pub trait ExceptionRepository: Send + Sync {
    /// Insert-or-update in one statement; an existing row keeps its id.
    async fn upsert(&self, exception: &RuleException) -> Result<RuleException, AppError>;
    async fn find_by_rule_and_date(&self, rule_id: &str, date: NaiveDate) -> Result<Option<RuleException>, AppError>;
    /// Inclusive on both ends.
    async fn list_by_range(&self, start: NaiveDate, end: NaiveDate) -> Result<Vec<RuleException>, AppError>;
    async fn list_by_rule(&self, rule_id: &str) -> Result<Vec<RuleException>, AppError>;
}
