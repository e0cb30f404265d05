//! Daily schedule semantics: `HH:MM` parsing and next-occurrence math.
//!
//! The scheduled trigger itself (cron, systemd timer, host task runner)
//! lives outside this crate; what lives here is the contract those
//! triggers rely on: the configured time of day is 24-hour `HH:MM`, and
//! anything unparsable falls back to 03:00 rather than erroring; a bad
//! config value should shift the nightly run, not silently disable it.

use chrono::{Days, NaiveDateTime, NaiveTime};

/// Fallback run time when the configured value does not parse.
pub fn default_time_of_day() -> NaiveTime {
    NaiveTime::from_hms_opt(3, 0, 0).unwrap()
}

/// Parse a configured `HH:MM` time of day, falling back to 03:00.
pub fn parse_time_of_day(raw: &str) -> NaiveTime {
    NaiveTime::parse_from_str(raw.trim(), "%H:%M").unwrap_or_else(|_| default_time_of_day())
}

/// The next occurrence of `time_of_day` strictly after `now`.
///
/// A run scheduled for exactly `now` counts as already fired and moves to
/// tomorrow.
pub fn next_run_after(now: NaiveDateTime, time_of_day: NaiveTime) -> NaiveDateTime {
    let today = now.date().and_time(time_of_day);
    if today > now {
        today
    } else {
        (now.date() + Days::new(1)).and_time(time_of_day)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn at(h: u32, m: u32) -> NaiveTime {
        NaiveTime::from_hms_opt(h, m, 0).unwrap()
    }

    fn on(day: u32, h: u32, m: u32) -> NaiveDateTime {
        NaiveDate::from_ymd_opt(2026, 8, day).unwrap().and_time(at(h, m))
    }

    #[test]
    fn parses_valid_times() {
        assert_eq!(parse_time_of_day("03:00"), at(3, 0));
        assert_eq!(parse_time_of_day("22:45"), at(22, 45));
        assert_eq!(parse_time_of_day("00:00"), at(0, 0));
        assert_eq!(parse_time_of_day(" 07:30 "), at(7, 30));
    }

    #[test]
    fn unparsable_values_fall_back_to_three_am() {
        for bad in ["", "3am", "25:00", "12:61", "noonish", "12.30"] {
            assert_eq!(parse_time_of_day(bad), at(3, 0), "input {bad:?}");
        }
    }

    #[test]
    fn next_run_later_today() {
        let next = next_run_after(on(30, 1, 15), at(3, 0));
        assert_eq!(next, on(30, 3, 0));
    }

    #[test]
    fn next_run_rolls_to_tomorrow() {
        let next = next_run_after(on(30, 9, 0), at(3, 0));
        assert_eq!(next, on(31, 3, 0));
    }

    #[test]
    fn exact_scheduled_instant_moves_to_tomorrow() {
        let next = next_run_after(on(30, 3, 0), at(3, 0));
        assert_eq!(next, on(31, 3, 0));
    }
}
