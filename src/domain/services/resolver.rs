use std::collections::HashMap;
use std::sync::Arc;

use chrono::NaiveDate;
use tracing::debug;

use crate::domain::models::{
    occurrence::Occurrence,
    rule::RecurringRule,
    rule_exception::{ExceptionKind, RuleException},
};
use crate::domain::ports::{ExceptionRepository, RuleRepository};
use crate::domain::services::civil_time::{add_days, day_of_week, week_dates};
use crate::error::AppError;

/// Expands `rules` over the seven days starting at `week_start` and applies
/// the matching exceptions. Output is ordered by date, then start time.
pub fn expand_week(
    week_start: NaiveDate,
    rules: &[RecurringRule],
    exceptions: &[RuleException],
) -> Vec<Occurrence> {
    let lookup: HashMap<(&str, NaiveDate), &RuleException> = exceptions
        .iter()
        .map(|exception| ((exception.rule_id.as_str(), exception.date), exception))
        .collect();

    let mut occurrences = Vec::new();

    for date in week_dates(week_start) {
        let weekday = day_of_week(date);

        for rule in rules.iter().filter(|r| r.day_of_week == weekday) {
            match lookup.get(&(rule.id.as_str(), date)) {
                Some(exception) if exception.kind == ExceptionKind::Deleted => {}
                Some(exception) => occurrences.push(Occurrence::overridden(
                    rule,
                    date,
                    exception.override_start.as_deref(),
                    exception.override_end.as_deref(),
                )),
                None => occurrences.push(Occurrence::regular(rule, date)),
            }
        }
    }

    occurrences.sort_by(|a, b| a.date.cmp(&b.date).then_with(|| a.start_time.cmp(&b.start_time)));
    occurrences
}

/// Read-only; safe to call concurrently with itself and with mutations.
pub struct RecurrenceResolver {
    rule_repo: Arc<dyn RuleRepository>,
    exception_repo: Arc<dyn ExceptionRepository>,
}

impl RecurrenceResolver {
    pub fn new(rule_repo: Arc<dyn RuleRepository>, exception_repo: Arc<dyn ExceptionRepository>) -> Self {
        Self { rule_repo, exception_repo }
    }

    pub async fn occurrences_for_week(&self, week_start: NaiveDate) -> Result<Vec<Occurrence>, AppError> {
        let week_end = add_days(week_start, 6);

        let (rules, exceptions) = tokio::try_join!(
            self.rule_repo.find_all(),
            self.exception_repo.list_by_range(week_start, week_end),
        )?;

        let occurrences = expand_week(week_start, &rules, &exceptions);
        debug!(
            %week_start,
            rules = rules.len(),
            exceptions = exceptions.len(),
            occurrences = occurrences.len(),
            "Resolved week"
        );
        Ok(occurrences)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(raw: &str) -> NaiveDate {
        NaiveDate::parse_from_str(raw, "%Y-%m-%d").unwrap()
    }

    fn rule(day: i32, start: &str, end: &str) -> RecurringRule {
        RecurringRule::new(day, start.to_string(), end.to_string())
    }

    // Week of Sunday 2024-03-10
    const SUNDAY: &str = "2024-03-10";
    const MONDAY: &str = "2024-03-11";
    const WEDNESDAY: &str = "2024-03-13";

    #[test]
    fn test_regular_week_without_exceptions() {
        let rules = vec![rule(1, "09:00", "10:00"), rule(3, "10:00", "11:00")];
        let out = expand_week(date(SUNDAY), &rules, &[]);

        assert_eq!(out.len(), 2);
        assert_eq!(out[0].date, date(MONDAY));
        assert_eq!(out[0].start_time, "09:00");
        assert_eq!(out[1].date, date(WEDNESDAY));
        assert!(out.iter().all(|o| !o.is_exception));
        assert_eq!(out[0].id, format!("{}-{}", rules[0].id, MONDAY));
        assert_eq!(out[0].original_rule_id, rules[0].id);
    }

    #[test]
    fn test_updated_exception_replaces_times() {
        let rules = vec![rule(1, "09:00", "10:00"), rule(3, "10:00", "11:00")];
        let exceptions = vec![RuleException::updated(
            rules[0].id.clone(),
            date(MONDAY),
            "11:00".into(),
            "12:00".into(),
        )];

        let out = expand_week(date(SUNDAY), &rules, &exceptions);
        let monday = out.iter().find(|o| o.date == date(MONDAY)).unwrap();

        assert_eq!((monday.start_time.as_str(), monday.end_time.as_str()), ("11:00", "12:00"));
        assert!(monday.is_exception);
        assert!(!out.iter().find(|o| o.date == date(WEDNESDAY)).unwrap().is_exception);
    }

    #[test]
    fn test_deleted_exception_drops_occurrence() {
        let rules = vec![rule(1, "09:00", "10:00"), rule(3, "10:00", "11:00")];
        let exceptions = vec![RuleException::deleted(rules[0].id.clone(), date(MONDAY))];

        let out = expand_week(date(SUNDAY), &rules, &exceptions);
        assert_eq!(out.len(), 1);
        assert_eq!(out[0].date, date(WEDNESDAY));
    }

    #[test]
    fn test_missing_override_field_falls_back_to_rule() {
        let rules = vec![rule(1, "09:00", "10:00")];
        let mut exception =
            RuleException::updated(rules[0].id.clone(), date(MONDAY), "09:30".into(), "10:00".into());
        exception.override_end = None;

        let out = expand_week(date(SUNDAY), &rules, &[exception]);
        assert_eq!(out[0].start_time, "09:30");
        assert_eq!(out[0].end_time, "10:00");
        assert!(out[0].is_exception);
    }

    #[test]
    fn test_exception_for_other_week_is_ignored() {
        let rules = vec![rule(1, "09:00", "10:00")];
        let exceptions = vec![RuleException::deleted(rules[0].id.clone(), date("2024-03-18"))];

        let out = expand_week(date(SUNDAY), &rules, &exceptions);
        assert_eq!(out.len(), 1);
        assert!(!out[0].is_exception);
    }

    #[test]
    fn test_same_day_sorted_by_start_time() {
        let rules = vec![rule(2, "14:00", "15:00"), rule(2, "08:00", "09:00")];
        let exceptions = vec![RuleException::updated(
            rules[0].id.clone(),
            date("2024-03-12"),
            "07:00".into(),
            "07:30".into(),
        )];

        let out = expand_week(date(SUNDAY), &rules, &exceptions);
        let starts: Vec<&str> = out.iter().map(|o| o.start_time.as_str()).collect();
        assert_eq!(starts, vec!["07:00", "08:00"]);
    }

    #[test]
    fn test_empty_rules_yield_empty_week() {
        assert!(expand_week(date(SUNDAY), &[], &[]).is_empty());
    }

    #[test]
    fn test_window_crossing_year_end() {
        let rules = vec![rule(0, "09:00", "10:00"), rule(6, "09:00", "10:00")];
        let out = expand_week(date("2024-12-29"), &rules, &[]);

        assert_eq!(out.len(), 2);
        assert_eq!(out[0].date, date("2024-12-29"));
        assert_eq!(out[1].date, date("2025-01-04"));
    }
}
