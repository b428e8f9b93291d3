use chrono::NaiveDate;
use thiserror::Error;

use crate::config::SlotPolicy;
use crate::domain::models::rule::RecurringRule;
use crate::domain::services::civil_time::{minutes_between, normalize_time};

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("Invalid time format: {0}. Use HH:MM format")]
    MalformedTime(String),
    #[error("Invalid date format: {0}. Use YYYY-MM-DD format")]
    MalformedDate(String),
    #[error("Date {date} falls on day {actual}, but the slot recurs on day {expected}")]
    WeekdayMismatch { date: NaiveDate, expected: i32, actual: i32 },
    #[error("Start time must be before end time")]
    EndNotAfterStart,
    #[error("Slot must last between {min} and {max} minutes, got {actual}")]
    DurationOutOfBounds { actual: i64, min: i64, max: i64 },
    #[error("Invalid day_of_week {0}. Must be between 0 (Sunday) and 6 (Saturday)")]
    DayOutOfRange(i32),
    #[error("Maximum {max} slots per day allowed")]
    CapacityExceeded { max: usize },
    #[error("Time slot conflicts with existing slot {start}-{end}")]
    Overlap { rule_id: String, start: String, end: String },
}

/// A rule as submitted, before any normalization.
#[derive(Debug, Clone, Copy)]
pub struct SlotCandidate<'a> {
    pub day_of_week: i32,
    pub start_time: &'a str,
    pub end_time: &'a str,
}

/// Zero-padded `HH:MM` bounds that passed validation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TimeRange {
    pub start: String,
    pub end: String,
}

pub fn validate_time_format(time: &str) -> Result<(), ValidationError> {
    normalize_time(time).map(|_| ())
}

/// Expects zero-padded times; string order is time order.
pub fn validate_time_range(start: &str, end: &str) -> Result<(), ValidationError> {
    if start < end {
        Ok(())
    } else {
        Err(ValidationError::EndNotAfterStart)
    }
}

pub fn validate_duration(start: &str, end: &str, policy: &SlotPolicy) -> Result<(), ValidationError> {
    let actual = minutes_between(start, end)?;
    if actual < policy.min_duration_minutes || actual > policy.max_duration_minutes {
        return Err(ValidationError::DurationOutOfBounds {
            actual,
            min: policy.min_duration_minutes,
            max: policy.max_duration_minutes,
        });
    }
    Ok(())
}

pub fn validate_day_of_week(day_of_week: i32) -> Result<(), ValidationError> {
    if (0..=6).contains(&day_of_week) {
        Ok(())
    } else {
        Err(ValidationError::DayOutOfRange(day_of_week))
    }
}

/// Half-open overlap: touching intervals do not overlap.
pub fn has_overlap(start_a: &str, end_a: &str, start_b: &str, end_b: &str) -> bool {
    start_a < end_b && end_a > start_b
}

pub fn check_capacity(existing_count: usize, max: usize) -> Result<(), ValidationError> {
    if existing_count >= max {
        Err(ValidationError::CapacityExceeded { max })
    } else {
        Ok(())
    }
}

pub fn check_overlaps(range: &TimeRange, existing: &[RecurringRule]) -> Result<(), ValidationError> {
    match existing
        .iter()
        .find(|rule| has_overlap(&range.start, &range.end, &rule.start_time, &rule.end_time))
    {
        Some(rule) => Err(ValidationError::Overlap {
            rule_id: rule.id.clone(),
            start: rule.start_time.clone(),
            end: rule.end_time.clone(),
        }),
        None => Ok(()),
    }
}

/// Format, then range, then duration. Returns the normalized bounds.
pub fn validate_times(start: &str, end: &str, policy: &SlotPolicy) -> Result<TimeRange, ValidationError> {
    let start = normalize_time(start)?;
    let end = normalize_time(end)?;
    validate_time_range(&start, &end)?;
    validate_duration(&start, &end, policy)?;
    Ok(TimeRange { start, end })
}

/// Checks that need no stored state: format, range, duration, day of week.
pub fn validate_candidate(candidate: &SlotCandidate<'_>, policy: &SlotPolicy) -> Result<TimeRange, ValidationError> {
    let range = validate_times(candidate.start_time, candidate.end_time, policy)?;
    validate_day_of_week(candidate.day_of_week)?;
    Ok(range)
}

/// Full creation check against the rules already stored on the same weekday.
/// Stops at the first failure: format, range, duration, day, capacity, overlap.
pub fn validate_slot_creation(
    candidate: &SlotCandidate<'_>,
    existing_on_day: &[RecurringRule],
    policy: &SlotPolicy,
) -> Result<TimeRange, ValidationError> {
    let range = validate_candidate(candidate, policy)?;
    check_capacity(existing_on_day.len(), policy.max_rules_per_day)?;
    check_overlaps(&range, existing_on_day)?;
    Ok(range)
}

/// `others_on_day` must already exclude the rule being edited.
pub fn validate_occurrence_update(
    start: &str,
    end: &str,
    others_on_day: &[RecurringRule],
    policy: &SlotPolicy,
) -> Result<TimeRange, ValidationError> {
    let range = validate_times(start, end, policy)?;
    check_overlaps(&range, others_on_day)?;
    Ok(range)
}
