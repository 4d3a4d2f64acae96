//! Commit timestamps with a shortened, human readable age.

use crate::error::Error;
use chrono::{Local, TimeZone, Utc};
use lazy_static::lazy_static;
use regex::{Captures, Regex};
use std::cmp::Ordering;
use std::fmt::Display;

const DATE_FORMAT: &str = "%Y-%m-%d %H:%M %z";

lazy_static! {
    static ref AGE_UNIT: Regex =
        Regex::new(r"(?:(\d+)\s*)?\b(year|month|week|day|hour|minute|second)s?\b").unwrap();
}

/// The time of the last commit on a branch.
///
/// Equality and ordering only consider the absolute instant,
/// the relative text is for display.
#[derive(Debug, Clone)]
pub struct CommitTime {
    seconds: i64,
    relative: String,
}

impl CommitTime {
    /// Creates a commit time from seconds since the epoch and a relative age like `3 days ago`.
    pub fn new(seconds: i64, relative: &str) -> Self {
        CommitTime {
            seconds,
            relative: shorten_age(relative),
        }
    }

    /// Parses the raw fields of a branch dump record.
    pub fn parse(raw_instant: &str, raw_relative: &str) -> Result<Self, Error> {
        let seconds = raw_instant.trim().parse::<i64>().map_err(|err| {
            Error::InvalidArgument(format!("bad commit timestamp '{}': {}", raw_instant, err))
        })?;
        if Utc.timestamp_opt(seconds, 0).single().is_none() {
            return Err(Error::InvalidArgument(format!(
                "commit timestamp {} out of range",
                seconds
            )));
        }
        Ok(CommitTime::new(seconds, raw_relative.trim()))
    }

    pub fn as_integer(&self) -> i64 {
        self.seconds
    }

    /// The shortened relative age, e.g. `99d ago`.
    pub fn relative(&self) -> &str {
        &self.relative
    }

    /// Renders as `YYYY-MM-DD HH:MM +HHMM (<age>)` in the local time zone.
    pub fn render(&self) -> String {
        self.render_in(&Local)
    }

    pub fn render_in<Tz: TimeZone>(&self, tz: &Tz) -> String
    where
        Tz::Offset: Display,
    {
        match tz.timestamp_opt(self.seconds, 0).earliest() {
            Some(date) => format!("{} ({})", date.format(DATE_FORMAT), self.relative),
            None => format!("{} ({})", self.seconds, self.relative),
        }
    }
}

impl PartialEq for CommitTime {
    fn eq(&self, other: &Self) -> bool {
        self.seconds == other.seconds
    }
}

impl Eq for CommitTime {}

impl PartialOrd for CommitTime {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for CommitTime {
    fn cmp(&self, other: &Self) -> Ordering {
        self.seconds.cmp(&other.seconds)
    }
}

/// Abbreviates the unit words of a relative age: `2 years, 3 months ago` becomes `2y, 3mo ago`.
///
/// Text without a known unit is returned unchanged.
pub fn shorten_age(relative: &str) -> String {
    AGE_UNIT
        .replace_all(relative, |caps: &Captures| {
            let unit = match &caps[2] {
                "year" => "y",
                "month" => "mo",
                "week" => "w",
                "day" => "d",
                "hour" => "h",
                "minute" => "m",
                _ => "s",
            };
            format!("{}{}", caps.get(1).map_or("", |m| m.as_str()), unit)
        })
        .into_owned()
}

/// Describes an age in seconds the way `git log --date=relative` does.
pub fn describe_age(age: i64) -> String {
    if age < 0 {
        return "in the future".to_string();
    }
    if age < 90 {
        return ago(age, "second");
    }
    let minutes = (age + 30) / 60;
    if minutes < 90 {
        return ago(minutes, "minute");
    }
    let hours = (minutes + 30) / 60;
    if hours < 36 {
        return ago(hours, "hour");
    }
    let days = (hours + 12) / 24;
    if days < 14 {
        return ago(days, "day");
    }
    if days < 70 {
        return ago((days + 3) / 7, "week");
    }
    if days < 365 {
        return ago((days + 15) / 30, "month");
    }
    if days < 1825 {
        let total_months = (days * 12 * 2 + 365) / (365 * 2);
        let years = total_months / 12;
        let months = total_months % 12;
        if months > 0 {
            return format!("{}, {}", plural(years, "year"), ago(months, "month"));
        }
        return ago(years, "year");
    }
    ago((days + 183) / 365, "year")
}

fn ago(count: i64, unit: &str) -> String {
    format!("{} ago", plural(count, unit))
}

fn plural(count: i64, unit: &str) -> String {
    if count == 1 {
        format!("{} {}", count, unit)
    } else {
        format!("{} {}s", count, unit)
    }
}
