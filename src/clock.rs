//! resolving "today" for condition evaluation
//!
//! the core never reads the wall clock itself; callers resolve a date here
//! (configured timezone, or an explicit test date) and pass it in

use std::fmt;

use anyhow::{anyhow, Result};
use chrono::{DateTime, FixedOffset, Local, NaiveDate, NaiveDateTime, Utc};
use lazy_static::lazy_static;
use regex::Regex;
use tracing::warn;

lazy_static! {
    static ref OFFSET: Regex = Regex::new(r"^([+-])(\d{2}):?(\d{2})$").unwrap();
}

/// date formats accepted for explicit test dates
const DATETIME_FORMATS: [&str; 3] = ["%Y-%m-%d %H:%M:%S", "%Y-%m-%d %H:%M", "%Y-%m-%dT%H:%M:%S"];

/// where "now" is read from
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum TimeZoneSetting {
    #[default]
    Local,
    Utc,
    Fixed(FixedOffset),
}

impl TimeZoneSetting {
    /// parse `local`, `utc`, `+HH:MM`, `-HH:MM` or `+HHMM`
    pub fn parse(s: &str) -> Option<Self> {
        let s = s.trim();
        match s.to_lowercase().as_str() {
            "local" | "" => return Some(TimeZoneSetting::Local),
            "utc" | "z" => return Some(TimeZoneSetting::Utc),
            _ => {}
        }

        let caps = OFFSET.captures(s)?;
        let hours: i32 = caps[2].parse().ok()?;
        let minutes: i32 = caps[3].parse().ok()?;
        if hours > 23 || minutes > 59 {
            return None;
        }
        let seconds = (hours * 3600 + minutes * 60) * if &caps[1] == "-" { -1 } else { 1 };
        FixedOffset::east_opt(seconds).map(TimeZoneSetting::Fixed)
    }

    /// parse a configured timezone, falling back to local time
    pub fn from_config(s: &str) -> Self {
        Self::parse(s).unwrap_or_else(|| {
            warn!(timezone = s, "unknown timezone, using local time");
            TimeZoneSetting::Local
        })
    }

    pub fn now(&self) -> NaiveDateTime {
        match self {
            TimeZoneSetting::Local => Local::now().naive_local(),
            TimeZoneSetting::Utc => Utc::now().naive_utc(),
            TimeZoneSetting::Fixed(offset) => Utc::now().with_timezone(offset).naive_local(),
        }
    }

    pub fn today(&self) -> NaiveDate {
        self.now().date()
    }
}

impl fmt::Display for TimeZoneSetting {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TimeZoneSetting::Local => write!(f, "local"),
            TimeZoneSetting::Utc => write!(f, "utc"),
            TimeZoneSetting::Fixed(offset) => write!(f, "{}", offset),
        }
    }
}

/// parse an explicit date, with or without a time of day
pub fn parse_datetime(s: &str) -> Result<NaiveDateTime> {
    let s = s.trim();

    if let Ok(date) = NaiveDate::parse_from_str(s, "%Y-%m-%d") {
        if let Some(midnight) = date.and_hms_opt(0, 0, 0) {
            return Ok(midnight);
        }
    }
    for format in DATETIME_FORMATS {
        if let Ok(datetime) = NaiveDateTime::parse_from_str(s, format) {
            return Ok(datetime);
        }
    }
    if let Ok(datetime) = DateTime::parse_from_rfc3339(s) {
        return Ok(datetime.naive_local());
    }

    Err(anyhow!(
        "invalid date '{}': expected YYYY-MM-DD or YYYY-MM-DD HH:MM[:SS]",
        s
    ))
}
