//! Resume-time arithmetic for delay and wait_until nodes.
//!
//! Computes the instant a waiting record should be handed back to the
//! executor, honoring weekend skipping, business-hours clamping and
//! fixed-time-of-day delivery.
//!
//! Rules, applied in this order:
//! 1. Day/week amounts with `skipWeekends` count business days only, so a
//!    2-day delay started on Friday resumes Tuesday, not Sunday.
//! 2. Minute/hour amounts that land on a weekend roll forward to Monday at
//!    the same time of day.
//! 3. `businessHoursOnly` moves an out-of-window instant to the next window
//!    start.
//! 4. `specificTime` pins the time of day last, advancing a day when the
//!    pinned time has already passed.

use chrono::{DateTime, Datelike, Duration, NaiveTime, Timelike, Utc, Weekday};

use crate::{
    ReachflowError, Result,
    config::BusinessHours,
    workflow::config::{DelayConfig, DelayUnit},
};

/// Compute when a record delayed at `now` should resume.
pub fn resume_at(
    config: &DelayConfig,
    now: DateTime<Utc>,
    hours: &BusinessHours,
) -> Result<DateTime<Utc>> {
    if config.amount <= 0 {
        return Err(ReachflowError::Node("delay amount must be positive".to_string()));
    }

    let mut resume = match config.unit {
        DelayUnit::Minutes => now + Duration::minutes(config.amount),
        DelayUnit::Hours => now + Duration::hours(config.amount),
        DelayUnit::Days | DelayUnit::Weeks => {
            let days = match config.unit {
                DelayUnit::Weeks => config.amount * 7,
                _ => config.amount,
            };
            if config.skip_weekends {
                add_business_days(now, days)
            } else {
                now + Duration::days(days)
            }
        }
    };

    if config.skip_weekends {
        resume = roll_off_weekend(resume);
    }

    if config.business_hours_only {
        resume = clamp_to_business_hours(resume, hours, config.skip_weekends);
    }

    if let Some(specific) = &config.specific_time {
        let time = parse_time(specific)?;
        resume = pin_time_of_day(resume, time, config.skip_weekends);
    }

    Ok(resume)
}

/// Advance `days` counting weekdays only, preserving the time of day.
fn add_business_days(
    from: DateTime<Utc>,
    days: i64,
) -> DateTime<Utc> {
    let mut current = from;
    let mut remaining = days;
    while remaining > 0 {
        current += Duration::days(1);
        if !is_weekend(current) {
            remaining -= 1;
        }
    }
    current
}

fn is_weekend(at: DateTime<Utc>) -> bool {
    matches!(at.weekday(), Weekday::Sat | Weekday::Sun)
}

/// Move a weekend instant forward to Monday at the same time of day.
fn roll_off_weekend(at: DateTime<Utc>) -> DateTime<Utc> {
    let mut current = at;
    while is_weekend(current) {
        current += Duration::days(1);
    }
    current
}

fn clamp_to_business_hours(
    at: DateTime<Utc>,
    hours: &BusinessHours,
    skip_weekends: bool,
) -> DateTime<Utc> {
    let hour = at.hour();
    let mut clamped = if hour < hours.start_hour {
        with_hour(at, hours.start_hour)
    } else if hour >= hours.end_hour {
        with_hour(at + Duration::days(1), hours.start_hour)
    } else {
        at
    };
    if skip_weekends {
        clamped = roll_off_weekend(clamped);
    }
    clamped
}

fn with_hour(
    at: DateTime<Utc>,
    hour: u32,
) -> DateTime<Utc> {
    at.date_naive().and_hms_opt(hour, 0, 0).map(|naive| naive.and_utc()).unwrap_or(at)
}

fn pin_time_of_day(
    at: DateTime<Utc>,
    time: NaiveTime,
    skip_weekends: bool,
) -> DateTime<Utc> {
    let mut pinned = at.date_naive().and_time(time).and_utc();
    if pinned < at {
        pinned += Duration::days(1);
    }
    if skip_weekends {
        pinned = roll_off_weekend(pinned);
    }
    pinned
}

/// Parse a "HH:MM" clock string.
pub fn parse_time(value: &str) -> Result<NaiveTime> {
    NaiveTime::parse_from_str(value, "%H:%M").map_err(|_| ReachflowError::Node(format!("invalid time of day '{}', expected HH:MM", value)))
}
