use std::{collections::BTreeSet, str::FromStr};

use cron::Schedule;
use thiserror::Error;

/// Every 15 minutes, on the quarter hour.
pub const DEFAULT_UPDATE_SCHEDULE: &str = "*/15 * * * *";

#[derive(Debug, Error)]
pub enum ScheduleError {
    #[error("invalid update schedule `{expression}`: {reason}")]
    Invalid { expression: String, reason: String },
}

/// Parse a cron expression.
///
/// Standard 5-field expressions (minute precision) get a `0` seconds field
/// prepended and their day-of-week field translated from the Unix numbering
/// (`0` or `7` is Sunday) to the `cron` crate's one (`1` is Sunday).
/// 6 and 7-field expressions are used as they are.
pub fn parse_schedule(expression: &str) -> Result<Schedule, ScheduleError> {
    let expression = expression.trim();
    let invalid = |reason: String| ScheduleError::Invalid {
        expression: expression.to_string(),
        reason,
    };

    let fields: Vec<&str> = expression.split_whitespace().collect();
    let normalized = if let [minute, hour, day_of_month, month, day_of_week] = fields[..] {
        let day_of_week = unix_day_of_week(day_of_week).map_err(invalid)?;
        format!("0 {minute} {hour} {day_of_month} {month} {day_of_week}")
    } else {
        expression.to_string()
    };

    Schedule::from_str(&normalized).map_err(|e| invalid(e.to_string()))
}

/// Rewrite a Unix day-of-week field as an explicit list of `cron` crate ordinals.
fn unix_day_of_week(field: &str) -> Result<String, String> {
    if field == "*" || field == "?" {
        return Ok(field.to_string());
    }

    let mut days = BTreeSet::new();
    for item in field.split(',') {
        let (base, step) = match item.split_once('/') {
            Some((base, step)) => {
                let step = step
                    .parse::<u32>()
                    .ok()
                    .filter(|step| *step > 0)
                    .ok_or_else(|| format!("invalid day-of-week step `{step}`"))?;
                (base, step)
            }
            None => (item, 1),
        };

        let (first, last) = match base.split_once('-') {
            _ if base == "*" => (0, 6),
            Some((first, last)) => (unix_weekday(first)?, unix_weekday(last)?),
            // `5/2` runs from the given day to the end of the week.
            None if step > 1 => (unix_weekday(base)?, 6),
            None => {
                let day = unix_weekday(base)?;
                (day, day)
            }
        };
        if first > last {
            return Err(format!("invalid day-of-week range `{base}`"));
        }

        days.extend((first..=last).step_by(step as usize).map(|day| day % 7 + 1));
    }

    Ok(days
        .iter()
        .map(u32::to_string)
        .collect::<Vec<_>>()
        .join(","))
}

/// Unix weekday number, `0` (or `7`) for Sunday up to `6` for Saturday.
fn unix_weekday(value: &str) -> Result<u32, String> {
    if let Ok(day) = value.parse::<u32>() {
        return if day <= 7 {
            Ok(day)
        } else {
            Err(format!("day of week `{value}` is out of range"))
        };
    }

    match value.to_ascii_lowercase().as_str() {
        "sun" | "sunday" => Ok(0),
        "mon" | "monday" => Ok(1),
        "tue" | "tues" | "tuesday" => Ok(2),
        "wed" | "wednesday" => Ok(3),
        "thu" | "thurs" | "thursday" => Ok(4),
        "fri" | "friday" => Ok(5),
        "sat" | "saturday" => Ok(6),
        _ => Err(format!("`{value}` is not a day of the week")),
    }
}
