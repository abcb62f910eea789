//! calendar tables and date arithmetic for conditions
//!
//! supports:
//! - day names: "mon".."sun" and "monday".."sunday"
//! - month names: "jan".."dec", "january".."december", plus "sept"
//! - wrapping ranges: "sat..mon" over days, "nov..feb" over months
//! - ordinal weekdays: "2nd monday", "last friday" within a month

use chrono::{Datelike, NaiveDate, Weekday};

/// canonical lowercase day names, monday first (ISO order)
pub const DAY_NAMES: [&str; 7] = [
    "monday",
    "tuesday",
    "wednesday",
    "thursday",
    "friday",
    "saturday",
    "sunday",
];

/// canonical lowercase month names, january first
pub const MONTH_NAMES: [&str; 12] = [
    "january",
    "february",
    "march",
    "april",
    "may",
    "june",
    "july",
    "august",
    "september",
    "october",
    "november",
    "december",
];

/// all weekdays in ISO order (Mon=1..Sun=7)
pub const WEEKDAYS: [Weekday; 7] = [
    Weekday::Mon,
    Weekday::Tue,
    Weekday::Wed,
    Weekday::Thu,
    Weekday::Fri,
    Weekday::Sat,
    Weekday::Sun,
];

/// parse a weekday from its abbreviation or full name (case-insensitive)
pub fn parse_weekday(s: &str) -> Option<Weekday> {
    match s.to_lowercase().as_str() {
        "mon" | "monday" => Some(Weekday::Mon),
        "tue" | "tuesday" => Some(Weekday::Tue),
        "wed" | "wednesday" => Some(Weekday::Wed),
        "thu" | "thursday" => Some(Weekday::Thu),
        "fri" | "friday" => Some(Weekday::Fri),
        "sat" | "saturday" => Some(Weekday::Sat),
        "sun" | "sunday" => Some(Weekday::Sun),
        _ => None,
    }
}

/// full lowercase name of a weekday
pub fn day_name(day: Weekday) -> &'static str {
    DAY_NAMES[day.num_days_from_monday() as usize]
}

/// parse a month name into its number (1-12)
pub fn parse_month_name(s: &str) -> Option<u32> {
    let month = match s.to_lowercase().as_str() {
        "jan" | "january" => 1,
        "feb" | "february" => 2,
        "mar" | "march" => 3,
        "apr" | "april" => 4,
        "may" => 5,
        "jun" | "june" => 6,
        "jul" | "july" => 7,
        "aug" | "august" => 8,
        "sep" | "sept" | "september" => 9,
        "oct" | "october" => 10,
        "nov" | "november" => 11,
        "dec" | "december" => 12,
        _ => return None,
    };
    Some(month)
}

/// parse a month given either as a name or as a number 1-12
pub fn parse_month(s: &str) -> Option<u32> {
    if !s.is_empty() && s.bytes().all(|b| b.is_ascii_digit()) {
        return s.parse::<u32>().ok().filter(|m| (1..=12).contains(m));
    }
    parse_month_name(s)
}

/// full lowercase name of a month number
pub fn month_name(month: u32) -> Option<&'static str> {
    MONTH_NAMES.get(month.checked_sub(1)? as usize).copied()
}

/// expand a day range like "mon..fri" into the list of weekdays it covers
/// walks forward and wraps past sunday, so "sat..mon" is sat, sun, mon
pub fn expand_day_range(start: Weekday, end: Weekday) -> Vec<Weekday> {
    let mut days = vec![start];
    let mut current = start;

    while current != end {
        current = current.succ();
        days.push(current);
    }

    days
}

/// expand a month range like "nov..feb" into month numbers, wrapping past december
pub fn expand_month_range(start: u32, end: u32) -> Vec<u32> {
    let mut months = vec![start];
    let mut current = start;

    while current != end {
        current = current % 12 + 1;
        months.push(current);
    }

    months
}

/// saturday and sunday
pub fn is_weekend(day: Weekday) -> bool {
    matches!(day, Weekday::Sat | Weekday::Sun)
}

/// weekday reached after moving `offset` calendar days from `day`
///
/// only the offset modulo 7 matters, so arbitrarily large offsets never
/// overflow the date range
pub fn shift_weekday(day: Weekday, offset: i64) -> Weekday {
    let index = (day.num_days_from_monday() as i64 + offset.rem_euclid(7)).rem_euclid(7);
    WEEKDAYS[index as usize]
}

/// number of days in the given month
pub fn days_in_month(year: i32, month: u32) -> Option<u32> {
    let (next_year, next_month) = if month == 12 {
        (year + 1, 1)
    } else {
        (year, month + 1)
    };
    NaiveDate::from_ymd_opt(next_year, next_month, 1)?
        .pred_opt()
        .map(|d| d.day())
}

/// day-of-month of the n-th occurrence of `weekday` in the month
///
/// returns None when the month has fewer than `n` such weekdays
/// (e.g. the 5th monday of a month with four mondays) or when `n` is 0
pub fn nth_weekday_of_month(year: i32, month: u32, weekday: Weekday, n: u32) -> Option<u32> {
    if n == 0 || n > 5 {
        return None;
    }

    let first = NaiveDate::from_ymd_opt(year, month, 1)?;
    let delta = (7 + weekday.num_days_from_monday() - first.weekday().num_days_from_monday()) % 7;
    let day = 1 + delta + 7 * (n - 1);

    if day <= days_in_month(year, month)? {
        Some(day)
    } else {
        None
    }
}

/// day-of-month of the last occurrence of `weekday` in the month
pub fn last_weekday_of_month(year: i32, month: u32, weekday: Weekday) -> Option<u32> {
    let last_day = days_in_month(year, month)?;
    let last = NaiveDate::from_ymd_opt(year, month, last_day)?;
    let back = (7 + last.weekday().num_days_from_monday() - weekday.num_days_from_monday()) % 7;
    Some(last_day - back)
}

/// most recent date strictly before `base` that falls on `weekday`
pub fn previous_weekday(base: NaiveDate, weekday: Weekday) -> Option<NaiveDate> {
    let mut date = base.pred_opt()?;
    while date.weekday() != weekday {
        date = date.pred_opt()?;
    }
    Some(date)
}
