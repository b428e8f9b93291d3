use chrono::NaiveDate;
use serde::Serialize;

use crate::domain::models::{occurrence::Occurrence, rule::RecurringRule};

#[derive(Serialize)]
pub struct WeekSlotsResponse {
    pub week_start: NaiveDate,
    pub slots: Vec<Occurrence>,
}

#[derive(Serialize)]
pub struct RuleResponse {
    pub slot: RecurringRule,
}

#[derive(Serialize)]
pub struct OccurrenceResponse {
    pub slot: Occurrence,
}

#[derive(Serialize)]
pub struct RulesResponse {
    pub rules: Vec<RecurringRule>,
}
