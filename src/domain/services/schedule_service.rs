use std::sync::Arc;

use chrono::NaiveDate;
use serde::Serialize;
use tokio::sync::Mutex;
use tracing::info;

use crate::config::SlotPolicy;
use crate::domain::{
    models::{occurrence::Occurrence, rule::RecurringRule, rule_exception::RuleException},
    ports::{ExceptionRepository, RuleRepository},
    services::{
        civil_time::{day_of_week, parse_calendar_date},
        validator::{self, SlotCandidate, ValidationError},
    },
};
use crate::error::AppError;

#[derive(Debug, Clone)]
pub struct NewRule {
    pub day_of_week: i32,
    pub start_time: String,
    pub end_time: String,
}

/// New bounds for one occurrence; `None` or blank keeps the rule's own value.
#[derive(Debug, Clone, Default)]
pub struct OccurrenceChange {
    pub start_time: Option<String>,
    pub end_time: Option<String>,
}

#[derive(Debug, Clone, Serialize)]
pub struct RuleDeletion {
    pub rule_id: String,
    pub exceptions_removed: usize,
}

/// Validates and applies every change to the rule set.
///
/// Read-validate-write sequences hold the lock of the affected weekday, so two
/// concurrent creates cannot both pass the capacity check. Per-date edits
/// never touch the rule row; they upsert an exception instead.
pub struct ScheduleService {
    rule_repo: Arc<dyn RuleRepository>,
    exception_repo: Arc<dyn ExceptionRepository>,
    policy: SlotPolicy,
    day_locks: [Mutex<()>; 7],
}

impl ScheduleService {
    pub fn new(
        rule_repo: Arc<dyn RuleRepository>,
        exception_repo: Arc<dyn ExceptionRepository>,
        policy: SlotPolicy,
    ) -> Self {
        Self {
            rule_repo,
            exception_repo,
            policy,
            day_locks: std::array::from_fn(|_| Mutex::new(())),
        }
    }

    pub async fn list_rules(&self) -> Result<Vec<RecurringRule>, AppError> {
        self.rule_repo.find_all().await
    }

    pub async fn find_rule(&self, rule_id: &str) -> Result<RecurringRule, AppError> {
        self.rule_repo
            .find_by_id(rule_id)
            .await?
            .ok_or_else(|| AppError::NotFound("Slot not found".into()))
    }

    pub async fn create_rule(&self, new_rule: NewRule) -> Result<RecurringRule, AppError> {
        let candidate = SlotCandidate {
            day_of_week: new_rule.day_of_week,
            start_time: &new_rule.start_time,
            end_time: &new_rule.end_time,
        };

        // Stateless checks first so a bad day index never reaches the store.
        validator::validate_candidate(&candidate, &self.policy)?;

        let _guard = self.day_lock(new_rule.day_of_week)?.lock().await;

        let existing = self.rule_repo.find_by_day_of_week(new_rule.day_of_week).await?;
        let range = validator::validate_slot_creation(&candidate, &existing, &self.policy)?;

        let rule = RecurringRule::new(new_rule.day_of_week, range.start, range.end);
        let created = self.rule_repo.create(&rule).await?;

        info!(
            rule_id = %created.id,
            day_of_week = created.day_of_week,
            start = %created.start_time,
            end = %created.end_time,
            "Created recurring rule"
        );
        Ok(created)
    }

    pub async fn update_occurrence(
        &self,
        rule_id: &str,
        date: &str,
        change: OccurrenceChange,
    ) -> Result<Occurrence, AppError> {
        let date = parse_calendar_date(date)?;
        let rule = self.find_rule(rule_id).await?;
        ensure_weekday(&rule, date)?;

        // Blank fields keep the rule's own time.
        let start = change.start_time.as_deref().filter(|t| !t.is_empty()).unwrap_or(&rule.start_time);
        let end = change.end_time.as_deref().filter(|t| !t.is_empty()).unwrap_or(&rule.end_time);

        let _guard = self.day_lock(rule.day_of_week)?.lock().await;

        let others: Vec<RecurringRule> = self
            .rule_repo
            .find_by_day_of_week(rule.day_of_week)
            .await?
            .into_iter()
            .filter(|other| other.id != rule.id)
            .collect();

        let range = validator::validate_occurrence_update(start, end, &others, &self.policy)?;

        let saved = self
            .exception_repo
            .upsert(&RuleException::updated(rule.id.clone(), date, range.start, range.end))
            .await?;

        info!(
            rule_id = %rule.id,
            %date,
            exception_id = %saved.id,
            "Updated occurrence"
        );

        Ok(Occurrence::overridden(
            &rule,
            date,
            saved.override_start.as_deref(),
            saved.override_end.as_deref(),
        ))
    }

    /// Cancels a single occurrence; the rule keeps recurring on other dates.
    pub async fn delete_occurrence(&self, rule_id: &str, date: &str) -> Result<(), AppError> {
        let date = parse_calendar_date(date)?;
        let rule = self.find_rule(rule_id).await?;
        ensure_weekday(&rule, date)?;

        let _guard = self.day_lock(rule.day_of_week)?.lock().await;

        let saved = self
            .exception_repo
            .upsert(&RuleException::deleted(rule.id.clone(), date))
            .await?;

        info!(rule_id = %rule.id, %date, exception_id = %saved.id, "Cancelled occurrence");
        Ok(())
    }

    /// Removes the whole pattern together with all of its exceptions.
    pub async fn delete_rule(&self, rule_id: &str) -> Result<RuleDeletion, AppError> {
        let rule = self.find_rule(rule_id).await?;

        let _guard = self.day_lock(rule.day_of_week)?.lock().await;

        let exceptions_removed = self.exception_repo.list_by_rule(&rule.id).await?.len();
        self.rule_repo.delete(&rule.id).await?;

        info!(rule_id = %rule.id, exceptions_removed, "Deleted recurring rule");
        Ok(RuleDeletion {
            rule_id: rule.id,
            exceptions_removed,
        })
    }

    fn day_lock(&self, day_of_week: i32) -> Result<&Mutex<()>, AppError> {
        usize::try_from(day_of_week)
            .ok()
            .and_then(|idx| self.day_locks.get(idx))
            .ok_or_else(|| ValidationError::DayOutOfRange(day_of_week).into())
    }
}

fn ensure_weekday(rule: &RecurringRule, date: NaiveDate) -> Result<(), ValidationError> {
    let actual = day_of_week(date);
    if actual != rule.day_of_week {
        return Err(ValidationError::WeekdayMismatch {
            date,
            expected: rule.day_of_week,
            actual,
        });
    }
    Ok(())
}
