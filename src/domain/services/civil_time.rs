//! Calendar and clock-time handling in the schedule's fixed civil offset.
//!
//! Every "what day is it" question in the crate is answered here. Other
//! modules only ever see `NaiveDate` values and zero-padded `HH:MM` strings
//! that have already been normalized by these functions.

use chrono::{DateTime, Datelike, Duration, FixedOffset, NaiveDate, NaiveTime, TimeZone, Utc};

use crate::domain::services::validator::ValidationError;

pub const DATE_FORMAT: &str = "%Y-%m-%d";
pub const TIME_FORMAT: &str = "%H:%M";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CivilClock {
    offset: FixedOffset,
}

impl CivilClock {
    pub fn new(offset: FixedOffset) -> Self {
        Self { offset }
    }

    /// The calendar date `instant` falls on in the civil offset.
    pub fn civil_date(&self, instant: DateTime<Utc>) -> NaiveDate {
        instant.with_timezone(&self.offset).date_naive()
    }

    pub fn format_date(&self, instant: DateTime<Utc>) -> String {
        format_calendar_date(self.civil_date(instant))
    }

    /// Midnight of `raw` in the civil offset.
    pub fn parse_date(&self, raw: &str) -> Result<DateTime<Utc>, ValidationError> {
        let date = parse_calendar_date(raw)?;
        self.offset
            .from_local_datetime(&date.and_time(NaiveTime::MIN))
            .single()
            .map(|local| local.with_timezone(&Utc))
            .ok_or_else(|| ValidationError::MalformedDate(raw.to_string()))
    }

    /// The Sunday on or before `instant`, in the civil offset.
    pub fn week_start(&self, instant: DateTime<Utc>) -> String {
        format_calendar_date(sunday_on_or_before(self.civil_date(instant)))
    }

    pub fn today(&self) -> NaiveDate {
        self.civil_date(Utc::now())
    }

    pub fn current_week_start(&self) -> NaiveDate {
        sunday_on_or_before(self.today())
    }
}

/// Strict `YYYY-MM-DD`: ten characters, zero padded, a real calendar date.
pub fn parse_calendar_date(raw: &str) -> Result<NaiveDate, ValidationError> {
    let bytes = raw.as_bytes();
    let well_shaped = bytes.len() == 10
        && bytes[4] == b'-'
        && bytes[7] == b'-'
        && bytes
            .iter()
            .enumerate()
            .all(|(i, b)| i == 4 || i == 7 || b.is_ascii_digit());

    if !well_shaped {
        return Err(ValidationError::MalformedDate(raw.to_string()));
    }

    NaiveDate::parse_from_str(raw, DATE_FORMAT)
        .map_err(|_| ValidationError::MalformedDate(raw.to_string()))
}

pub fn format_calendar_date(date: NaiveDate) -> String {
    date.format(DATE_FORMAT).to_string()
}

/// 0 = Sunday .. 6 = Saturday.
pub fn day_of_week(date: NaiveDate) -> i32 {
    date.weekday().num_days_from_sunday() as i32
}

pub fn sunday_on_or_before(date: NaiveDate) -> NaiveDate {
    add_days(date, -i64::from(day_of_week(date)))
}

pub fn add_days(date: NaiveDate, days: i64) -> NaiveDate {
    date + Duration::days(days)
}

pub fn add_weeks(date: NaiveDate, weeks: i64) -> NaiveDate {
    date + Duration::weeks(weeks)
}

pub fn week_dates(week_start: NaiveDate) -> [NaiveDate; 7] {
    std::array::from_fn(|i| add_days(week_start, i as i64))
}

/// Accepts `H:MM` or `HH:MM`, 24-hour.
pub fn parse_time(raw: &str) -> Result<NaiveTime, ValidationError> {
    let malformed = || ValidationError::MalformedTime(raw.to_string());

    let (hours, minutes) = raw.split_once(':').ok_or_else(malformed)?;
    let well_shaped = (1..=2).contains(&hours.len())
        && minutes.len() == 2
        && hours.bytes().chain(minutes.bytes()).all(|b| b.is_ascii_digit());

    if !well_shaped {
        return Err(malformed());
    }

    let h: u32 = hours.parse().map_err(|_| malformed())?;
    let m: u32 = minutes.parse().map_err(|_| malformed())?;

    NaiveTime::from_hms_opt(h, m, 0).ok_or_else(malformed)
}

/// Zero-pads a valid time so that string order equals time order.
pub fn normalize_time(raw: &str) -> Result<String, ValidationError> {
    Ok(parse_time(raw)?.format(TIME_FORMAT).to_string())
}

pub fn minutes_between(start: &str, end: &str) -> Result<i64, ValidationError> {
    Ok((parse_time(end)? - parse_time(start)?).num_minutes())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ist() -> CivilClock {
        CivilClock::new(FixedOffset::east_opt(5 * 3600 + 30 * 60).unwrap())
    }

    fn date(raw: &str) -> NaiveDate {
        NaiveDate::parse_from_str(raw, DATE_FORMAT).unwrap()
    }

    #[test]
    fn test_parse_then_format_round_trips() {
        let clock = ist();
        for raw in ["2024-01-01", "2024-02-29", "2023-12-31", "2025-06-15"] {
            let instant = clock.parse_date(raw).unwrap();
            assert_eq!(clock.format_date(instant), raw);
        }
    }

    #[test]
    fn test_parse_date_is_midnight_in_offset() {
        let instant = ist().parse_date("2024-03-10").unwrap();
        assert_eq!(instant.to_rfc3339(), "2024-03-09T18:30:00+00:00");
    }

    #[test]
    fn test_civil_date_differs_from_utc_near_midnight() {
        let clock = ist();
        // 20:00 UTC on a Saturday is already Sunday 01:30 in IST
        let instant = Utc.with_ymd_and_hms(2024, 3, 9, 20, 0, 0).unwrap();
        assert_eq!(clock.format_date(instant), "2024-03-10");
        assert_eq!(clock.week_start(instant), "2024-03-10");

        let utc_clock = CivilClock::new(FixedOffset::east_opt(0).unwrap());
        assert_eq!(utc_clock.week_start(instant), "2024-03-03");
    }

    #[test]
    fn test_rejects_malformed_dates() {
        for raw in ["2024-1-05", "2024/01/05", "24-01-05", "2024-02-30", "", "2024-01-05T00:00"] {
            assert!(parse_calendar_date(raw).is_err(), "{raw} should be rejected");
        }
    }

    #[test]
    fn test_day_of_week_sunday_is_zero() {
        assert_eq!(day_of_week(date("2024-03-10")), 0);
        assert_eq!(day_of_week(date("2024-03-11")), 1);
        assert_eq!(day_of_week(date("2024-03-16")), 6);
    }

    #[test]
    fn test_sunday_on_or_before() {
        assert_eq!(sunday_on_or_before(date("2024-03-10")), date("2024-03-10"));
        assert_eq!(sunday_on_or_before(date("2024-03-13")), date("2024-03-10"));
        assert_eq!(sunday_on_or_before(date("2024-03-01")), date("2024-02-25"));
    }

    #[test]
    fn test_add_days_and_weeks_cross_month_boundaries() {
        assert_eq!(add_days(date("2024-02-28"), 2), date("2024-03-01"));
        assert_eq!(add_weeks(date("2024-12-29"), 1), date("2025-01-05"));
        assert_eq!(add_weeks(date("2024-01-07"), -1), date("2023-12-31"));
    }

    #[test]
    fn test_week_dates_spans_seven_days() {
        let dates = week_dates(date("2024-12-29"));
        assert_eq!(dates[0], date("2024-12-29"));
        assert_eq!(dates[6], date("2025-01-04"));
    }

    #[test]
    fn test_time_parsing_follows_hh_mm_shape() {
        assert_eq!(normalize_time("9:05").unwrap(), "09:05");
        assert_eq!(normalize_time("23:59").unwrap(), "23:59");
        assert_eq!(normalize_time("00:00").unwrap(), "00:00");

        for raw in ["24:00", "12:60", "12:5", "123:00", "1200", "ab:cd", "", "12:00:00", " 9:00"] {
            assert!(parse_time(raw).is_err(), "{raw} should be rejected");
        }
    }

    #[test]
    fn test_minutes_between() {
        assert_eq!(minutes_between("09:00", "10:30").unwrap(), 90);
        assert_eq!(minutes_between("10:00", "09:00").unwrap(), -60);
    }
}
