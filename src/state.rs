use std::sync::Arc;
use crate::config::Config;
use crate::domain::ports::{ExceptionRepository, RuleRepository};
use crate::domain::services::{
    civil_time::CivilClock, resolver::RecurrenceResolver, schedule_service::ScheduleService,
};

#[derive(Clone)]
pub struct AppState {
    pub clock: CivilClock,
    pub rule_repo: Arc<dyn RuleRepository>,
    pub exception_repo: Arc<dyn ExceptionRepository>,
    pub schedule_service: Arc<ScheduleService>,
    pub resolver: Arc<RecurrenceResolver>,
}

impl AppState {
    pub fn new(
        config: &Config,
        rule_repo: Arc<dyn RuleRepository>,
        exception_repo: Arc<dyn ExceptionRepository>,
    ) -> Self {
        let schedule_service = Arc::new(ScheduleService::new(
            rule_repo.clone(),
            exception_repo.clone(),
            config.policy,
        ));
        let resolver = Arc::new(RecurrenceResolver::new(rule_repo.clone(), exception_repo.clone()));

        Self {
            clock: CivilClock::new(config.civil_offset),
            rule_repo,
            exception_repo,
            schedule_service,
            resolver,
        }
    }
}
