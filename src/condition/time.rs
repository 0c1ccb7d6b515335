//! Time-window and weekday conditions
//!
//! Two grammars, mirroring the stored policy text:
//!
//! - clock time: `HH:MM` or `HH:MM-HH:MM` (a range may wrap past midnight)
//! - absolute datetime: `dd:mm:yyyy HH:MM`, single or `-`-separated range
//!
//! A single value is an upper bound, not an instant: `"17:00"` allows any
//! moment up to 17:00 today, and a single datetime allows anything up to
//! that datetime.

use crate::error::{AclError, Result};
use chrono::{Datelike, NaiveDateTime, NaiveTime, Weekday};

const DATETIME_FORMAT: &str = "%d:%m:%Y %H:%M";

/// A parsed time condition entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TimeRule {
    /// `HH:MM` - allowed until this clock time today.
    ClockUntil(NaiveTime),
    /// `HH:MM-HH:MM` - allowed inside the window; `end < start` means the
    /// window crosses midnight.
    ClockWindow { start: NaiveTime, end: NaiveTime },
    /// `dd:mm:yyyy HH:MM` - allowed until this datetime.
    DateUntil(NaiveDateTime),
    /// `dd:mm:yyyy HH:MM-dd:mm:yyyy HH:MM` - allowed inside the inclusive
    /// window.
    DateWindow {
        start: NaiveDateTime,
        end: NaiveDateTime,
    },
}

impl TimeRule {
    /// Parse one entry, enforcing the window-ordering rules: a clock range
    /// must not have `start == end`, and a datetime range must end at least
    /// one minute after it starts.
    pub fn parse(raw: &str) -> Result<Self> {
        let err = || AclError::InvalidTime(raw.to_string());
        let parts: Vec<&str> = raw.split('-').map(str::trim).collect();

        match parts.as_slice() {
            [single] => {
                if let Some(dt) = parse_datetime(single) {
                    Ok(TimeRule::DateUntil(dt))
                } else if let Some(t) = parse_clock(single) {
                    Ok(TimeRule::ClockUntil(t))
                } else {
                    Err(err())
                }
            }
            [first, second] => {
                if let (Some(start), Some(end)) = (parse_datetime(first), parse_datetime(second)) {
                    // End must be at least one minute after the start.
                    if end < start + chrono::Duration::minutes(1) {
                        return Err(err());
                    }
                    Ok(TimeRule::DateWindow { start, end })
                } else if let (Some(start), Some(end)) = (parse_clock(first), parse_clock(second)) {
                    if start == end {
                        return Err(err());
                    }
                    Ok(TimeRule::ClockWindow { start, end })
                } else {
                    Err(err())
                }
            }
            _ => Err(err()),
        }
    }

    /// Whether `now` falls inside this rule's window.
    pub fn contains(&self, now: NaiveDateTime) -> bool {
        match *self {
            TimeRule::ClockUntil(end) => now.time() <= end,
            TimeRule::ClockWindow { start, end } => {
                let t = now.time();
                if start <= end {
                    start <= t && t <= end
                } else {
                    // Wraps past midnight.
                    t >= start || t <= end
                }
            }
            TimeRule::DateUntil(end) => now <= end,
            TimeRule::DateWindow { start, end } => start <= now && now <= end,
        }
    }
}

/// Strict `HH:MM` (two digits each, 00:00-23:59).
fn parse_clock(raw: &str) -> Option<NaiveTime> {
    let bytes = raw.as_bytes();
    if bytes.len() != 5 || bytes[2] != b':' {
        return None;
    }
    if ![0, 1, 3, 4].iter().all(|&i| bytes[i].is_ascii_digit()) {
        return None;
    }
    NaiveTime::parse_from_str(raw, "%H:%M").ok()
}

/// Strict `dd:mm:yyyy HH:MM`.
fn parse_datetime(raw: &str) -> Option<NaiveDateTime> {
    let bytes = raw.as_bytes();
    if bytes.len() != 16 || bytes[2] != b':' || bytes[5] != b':' || bytes[10] != b' ' {
        return None;
    }
    let parsed = NaiveDateTime::parse_from_str(raw, DATETIME_FORMAT).ok()?;
    // Round-trip to reject shapes chrono is lenient about.
    if parsed.format(DATETIME_FORMAT).to_string() != raw {
        return None;
    }
    Some(parsed)
}

/// True iff `entries` is empty or `now` satisfies at least one window.
/// Entries that fail to parse are treated as unsatisfied.
pub fn time_allowed(entries: &[String], now: NaiveDateTime) -> bool {
    if entries.is_empty() {
        return true;
    }
    entries
        .iter()
        .filter_map(|e| TimeRule::parse(e).ok())
        .any(|rule| rule.contains(now))
}

/// True iff `days` is empty or `now`'s weekday is listed.
pub fn weekday_allowed(days: &[String], now: NaiveDateTime) -> bool {
    if days.is_empty() {
        return true;
    }
    let today = now.weekday();
    days.iter()
        .filter_map(|d| parse_weekday(d))
        .any(|day| day == today)
}

/// Exact match on the seven capitalised English weekday names.
pub fn parse_weekday(name: &str) -> Option<Weekday> {
    match name {
        "Monday" => Some(Weekday::Mon),
        "Tuesday" => Some(Weekday::Tue),
        "Wednesday" => Some(Weekday::Wed),
        "Thursday" => Some(Weekday::Thu),
        "Friday" => Some(Weekday::Fri),
        "Saturday" => Some(Weekday::Sat),
        "Sunday" => Some(Weekday::Sun),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn at(y: i32, m: u32, d: u32, hh: u32, mm: u32) -> NaiveDateTime {
        NaiveDate::from_ymd_opt(y, m, d)
            .unwrap()
            .and_hms_opt(hh, mm, 0)
            .unwrap()
    }

    fn entries(list: &[&str]) -> Vec<String> {
        list.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn test_parse_clock_forms() {
        assert!(matches!(
            TimeRule::parse("09:00").unwrap(),
            TimeRule::ClockUntil(_)
        ));
        assert!(matches!(
            TimeRule::parse("09:00-17:00").unwrap(),
            TimeRule::ClockWindow { .. }
        ));
        assert!(TimeRule::parse("9:00").is_err());
        assert!(TimeRule::parse("24:00").is_err());
        assert!(TimeRule::parse("09:60").is_err());
        assert!(TimeRule::parse("09:00-09:00").is_err());
    }

    #[test]
    fn test_parse_datetime_forms() {
        assert!(matches!(
            TimeRule::parse("01:06:2024 09:00").unwrap(),
            TimeRule::DateUntil(_)
        ));
        assert!(matches!(
            TimeRule::parse("01:06:2024 09:00-02:06:2024 09:00").unwrap(),
            TimeRule::DateWindow { .. }
        ));
        // End before start
        assert!(TimeRule::parse("02:06:2024 09:00-01:06:2024 09:00").is_err());
        // End equal to start (needs >= 1 minute)
        assert!(TimeRule::parse("01:06:2024 09:00-01:06:2024 09:00").is_err());
        // Invalid calendar date
        assert!(TimeRule::parse("32:01:2024 09:00").is_err());
    }

    #[test]
    fn test_single_clock_is_upper_bound() {
        let rules = entries(&["17:00"]);
        assert!(time_allowed(&rules, at(2024, 6, 3, 9, 0)));
        assert!(time_allowed(&rules, at(2024, 6, 3, 17, 0)));
        assert!(!time_allowed(&rules, at(2024, 6, 3, 17, 1)));
    }

    #[test]
    fn test_clock_window() {
        let rules = entries(&["09:00-17:00"]);
        assert!(!time_allowed(&rules, at(2024, 6, 3, 8, 59)));
        assert!(time_allowed(&rules, at(2024, 6, 3, 9, 0)));
        assert!(time_allowed(&rules, at(2024, 6, 3, 17, 0)));
        assert!(!time_allowed(&rules, at(2024, 6, 3, 17, 1)));
    }

    #[test]
    fn test_clock_window_wraps_midnight() {
        let rules = entries(&["22:00-02:00"]);
        assert!(time_allowed(&rules, at(2024, 6, 3, 23, 30)));
        assert!(time_allowed(&rules, at(2024, 6, 3, 1, 0)));
        assert!(time_allowed(&rules, at(2024, 6, 3, 2, 0)));
        assert!(!time_allowed(&rules, at(2024, 6, 3, 3, 0)));
        assert!(!time_allowed(&rules, at(2024, 6, 3, 21, 59)));
    }

    #[test]
    fn test_datetime_window_inclusive() {
        let rules = entries(&["01:06:2024 09:00-02:06:2024 18:00"]);
        assert!(!time_allowed(&rules, at(2024, 5, 31, 12, 0)));
        assert!(time_allowed(&rules, at(2024, 6, 1, 9, 0)));
        assert!(time_allowed(&rules, at(2024, 6, 2, 18, 0)));
        assert!(!time_allowed(&rules, at(2024, 6, 2, 18, 1)));
    }

    #[test]
    fn test_single_datetime_is_upper_bound() {
        let rules = entries(&["01:06:2024 09:00"]);
        assert!(time_allowed(&rules, at(2024, 5, 1, 0, 0)));
        assert!(!time_allowed(&rules, at(2024, 6, 1, 9, 1)));
    }

    #[test]
    fn test_or_semantics_across_entries() {
        let rules = entries(&["09:00-10:00", "15:00-16:00"]);
        assert!(time_allowed(&rules, at(2024, 6, 3, 9, 30)));
        assert!(time_allowed(&rules, at(2024, 6, 3, 15, 30)));
        assert!(!time_allowed(&rules, at(2024, 6, 3, 12, 0)));
    }

    #[test]
    fn test_empty_entries_allow_everything() {
        assert!(time_allowed(&[], at(2024, 6, 3, 12, 0)));
    }

    #[test]
    fn test_weekday_allowed() {
        // 2024-06-03 is a Monday.
        let monday = at(2024, 6, 3, 12, 0);
        assert!(weekday_allowed(&entries(&["Monday", "Friday"]), monday));
        assert!(!weekday_allowed(&entries(&["Tuesday"]), monday));
        assert!(weekday_allowed(&[], monday));
    }

    #[test]
    fn test_weekday_names_are_strict() {
        assert!(parse_weekday("Monday").is_some());
        assert!(parse_weekday("monday").is_none());
        assert!(parse_weekday("Mon").is_none());
    }
}
