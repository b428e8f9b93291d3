use std::env;
use std::str::FromStr;

use chrono::{FixedOffset, Offset, Utc};

use crate::error::StartupError;

/// Limits applied when validating rules and occurrence edits.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SlotPolicy {
    pub max_rules_per_day: usize,
    pub min_duration_minutes: i64,
    pub max_duration_minutes: i64,
}

impl Default for SlotPolicy {
    fn default() -> Self {
        Self {
            max_rules_per_day: 2,
            min_duration_minutes: 15,
            max_duration_minutes: 480,
        }
    }
}

#[derive(Clone)]
pub struct Config {
    pub database_url: String,
    pub port: u16,
    pub civil_offset: FixedOffset,
    pub policy: SlotPolicy,
}

impl Config {
    pub fn from_env() -> Result<Self, StartupError> {
        let defaults = SlotPolicy::default();

        let civil_offset = match env::var("CIVIL_OFFSET") {
            Ok(raw) => parse_offset(&raw)?,
            Err(_) => default_offset(),
        };

        let policy = SlotPolicy {
            max_rules_per_day: parse_var("MAX_SLOTS_PER_DAY", defaults.max_rules_per_day)?,
            min_duration_minutes: parse_var("MIN_SLOT_MINUTES", defaults.min_duration_minutes)?,
            max_duration_minutes: parse_var("MAX_SLOT_MINUTES", defaults.max_duration_minutes)?,
        };

        if policy.min_duration_minutes > policy.max_duration_minutes {
            return Err(StartupError::Config(
                "MIN_SLOT_MINUTES must not exceed MAX_SLOT_MINUTES".into(),
            ));
        }

        Ok(Self {
            database_url: env::var("DATABASE_URL").unwrap_or_else(|_| "sqlite://slots.db".to_string()),
            port: parse_var("PORT", 3000)?,
            civil_offset,
            policy,
        })
    }
}

/// IST, the offset the schedule has always been kept in.
pub fn default_offset() -> FixedOffset {
    const IST_SECONDS: i32 = 5 * 3600 + 30 * 60;
    FixedOffset::east_opt(IST_SECONDS).unwrap_or_else(|| Utc.fix())
}

/// Parses `+HH:MM` / `-HH:MM` into a fixed offset.
pub fn parse_offset(raw: &str) -> Result<FixedOffset, StartupError> {
    FixedOffset::from_str(raw.trim())
        .map_err(|_| StartupError::Config(format!("CIVIL_OFFSET must look like +05:30, got {raw}")))
}

fn parse_var<T: FromStr>(name: &str, default: T) -> Result<T, StartupError> {
    match env::var(name) {
        Ok(raw) => raw
            .trim()
            .parse()
            .map_err(|_| StartupError::Config(format!("{name} has an invalid value: {raw}"))),
        Err(_) => Ok(default),
    }
}
