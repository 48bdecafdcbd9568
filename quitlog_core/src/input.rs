//! Parsers for questionnaire answers.
//!
//! Each parser takes one line of user input and either produces a
//! validated value or an [`Error::Input`] the caller can show before
//! asking again.

use crate::{Error, Plan, Result, Sex};
use chrono::{Datelike, Duration, NaiveDate, NaiveDateTime};

/// Date format used for input and display
pub const DATE_FORMAT: &str = "%Y-%m-%d";

/// Human-readable form of [`DATE_FORMAT`] for prompts
pub const DATE_PATTERN: &str = "yyyy-MM-dd";

const DAYS_PER_YEAR: f64 = 365.0;

pub fn parse_sex(input: &str) -> Result<Sex> {
    match input.trim().to_lowercase().as_str() {
        "m" | "male" => Ok(Sex::Male),
        "f" | "female" => Ok(Sex::Female),
        other => Err(Error::Input(format!("unknown sex '{}'", other))),
    }
}

/// Parse a `yyyy-MM-dd` birthday, anchored at midnight
pub fn parse_birth_day(input: &str) -> Result<NaiveDateTime> {
    let date = NaiveDate::parse_from_str(input.trim(), DATE_FORMAT).map_err(|e| {
        Error::Input(format!(
            "'{}' is not a {} date: {}",
            input.trim(),
            DATE_PATTERN,
            e
        ))
    })?;
    date.and_hms_opt(0, 0, 0)
        .ok_or_else(|| Error::Input(format!("no midnight on {}", date)))
}

/// Parse a birthday that lies at least one full year before `today`.
///
/// Durations are bounded by age, so a birthday that yields an age of
/// zero would leave no valid duration answer.
pub fn parse_birth_day_before(input: &str, today: NaiveDate) -> Result<NaiveDateTime> {
    let birth_day = parse_birth_day(input)?;
    if age_on(birth_day.date(), today) < 1 {
        return Err(Error::Input(format!(
            "birthday {} must be at least a year before {}",
            birth_day.format(DATE_FORMAT),
            today.format(DATE_FORMAT)
        )));
    }
    Ok(birth_day)
}

/// Parse the numbered plan menu choice
pub fn parse_plan(input: &str) -> Result<Plan> {
    match input.trim() {
        "1" => Ok(Plan::StartAbstention),
        "2" => Ok(Plan::KeepSmoking),
        "3" => Ok(Plan::AlreadyAbstaining),
        other => Err(Error::Input(format!("no plan numbered '{}'", other))),
    }
}

pub fn parse_cigarettes_per_day(input: &str) -> Result<u32> {
    input
        .trim()
        .parse::<u32>()
        .map_err(|_| Error::Input(format!("'{}' is not a cigarette count", input.trim())))
}

/// Parse a "years months" answer into a day-based duration.
///
/// Months are optional. Surplus months roll over into years, and the
/// resulting years must be non-negative and below `age` before
/// converting at 365 days per year.
pub fn parse_duration(input: &str, age: i32) -> Result<Duration> {
    let mut parts = input.split_whitespace();
    let years = parse_component(parts.next(), "years")?;
    let months = match parts.next() {
        Some(raw) => parse_component(Some(raw), "months")?,
        None => 0,
    };
    if parts.next().is_some() {
        return Err(Error::Input("expected at most two numbers".into()));
    }

    let total_years = years
        .checked_add(months / 12)
        .ok_or_else(|| Error::Input("duration is too long".into()))?;
    if total_years >= i64::from(age) {
        return Err(Error::Input(format!(
            "{} years is not less than your age ({})",
            total_years, age
        )));
    }

    duration_from_years_months(years, months)
}

fn parse_component(raw: Option<&str>, name: &str) -> Result<i64> {
    let raw = raw.ok_or_else(|| Error::Input(format!("missing {}", name)))?;
    let value = raw
        .parse::<i64>()
        .map_err(|_| Error::Input(format!("'{}' is not a number of {}", raw, name)))?;
    if value < 0 {
        return Err(Error::Input(format!("{} cannot be negative", name)));
    }
    Ok(value)
}

/// `trunc((years + months / 12) * 365)` days, after normalising months
pub fn duration_from_years_months(years: i64, months: i64) -> Result<Duration> {
    let too_long = || Error::Input(format!("{} years {} months is too long", years, months));
    let whole_years = years.checked_add(months / 12).ok_or_else(too_long)?;
    let months = months % 12;
    let days = ((whole_years as f64 + months as f64 / 12.0) * DAYS_PER_YEAR) as i64;
    Duration::try_days(days).ok_or_else(too_long)
}

/// Whole years between two dates, counting a year only once the
/// anniversary has been reached.
pub fn age_on(birth: NaiveDate, today: NaiveDate) -> i32 {
    let mut years = today.year() - birth.year();
    if (today.month(), today.day()) < (birth.month(), birth.day()) {
        years -= 1;
    }
    years
}
