//! ISO-8601 week timekeeping.
//!
//! `(year, week)` is a storage key for the `weeks` table, so the
//! computation here is the canonical one: shift the date to the Thursday
//! of its UTC week, take that Thursday's year as the ISO year, and number
//! the week as `ceil(day_of_year / 7)` within that year.

use chrono::{DateTime, Datelike, Duration, NaiveTime, TimeZone, Utc};

use crate::types::Timestamp;

/// ISO-8601 week identity.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct IsoWeek {
    pub year: i32,
    pub week: i32,
}

/// Monday-start / Friday-noon window of a week. The deadline is advisory:
/// the rollover check reads it, nothing enforces it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct WeekWindow {
    /// Monday 00:00:00 UTC of the week.
    pub start: Timestamp,
    /// Friday 12:00:00 UTC of the week (`start + 4 days 12 hours`).
    pub deadline: Timestamp,
}

/// Compute the ISO year and week number of a UTC instant.
pub fn iso_week_of(date: DateTime<Utc>) -> IsoWeek {
    let day = date.date_naive();
    // Monday=1 .. Sunday=7.
    let dow = i64::from(day.weekday().number_from_monday());
    let thursday = day + Duration::days(4 - dow);
    // `ordinal` is 1-based day-of-year, so this is ceil(ordinal / 7).
    let week = (thursday.ordinal() as i32 + 6) / 7;
    IsoWeek {
        year: thursday.year(),
        week,
    }
}

/// Compute the Monday-start / Friday-noon window of the week containing a
/// UTC instant.
pub fn week_window_of(date: DateTime<Utc>) -> WeekWindow {
    let day = date.date_naive();
    let monday = day - Duration::days(i64::from(day.weekday().num_days_from_monday()));
    let start = Utc.from_utc_datetime(&monday.and_time(NaiveTime::MIN));
    WeekWindow {
        start,
        deadline: start + Duration::days(4) + Duration::hours(12),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn at(y: i32, m: u32, d: u32, h: u32, min: u32) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(y, m, d, h, min, 0).unwrap()
    }

    #[test]
    fn jan_first_2024_is_week_one() {
        let week = iso_week_of(at(2024, 1, 1, 0, 0));
        assert_eq!(week, IsoWeek { year: 2024, week: 1 });
    }

    #[test]
    fn jan_first_2023_belongs_to_prior_year() {
        // 2023-01-01 is a Sunday; its Thursday is 2022-12-29.
        let week = iso_week_of(at(2023, 1, 1, 12, 0));
        assert_eq!(week, IsoWeek { year: 2022, week: 52 });
    }

    #[test]
    fn late_december_can_belong_to_next_year() {
        // 2024-12-30 is a Monday; its Thursday is 2025-01-02.
        let week = iso_week_of(at(2024, 12, 30, 8, 0));
        assert_eq!(week, IsoWeek { year: 2025, week: 1 });
    }

    #[test]
    fn long_year_has_week_53() {
        let week = iso_week_of(at(2020, 12, 31, 0, 0));
        assert_eq!(week, IsoWeek { year: 2020, week: 53 });
    }

    #[test]
    fn agrees_with_chrono_iso_week() {
        // Sweep four years of days against chrono's own ISO calendar.
        let mut day = NaiveDate::from_ymd_opt(2022, 1, 1).unwrap();
        let end = NaiveDate::from_ymd_opt(2026, 1, 1).unwrap();
        while day < end {
            let instant = Utc.from_utc_datetime(&day.and_time(NaiveTime::MIN));
            let ours = iso_week_of(instant);
            let theirs = day.iso_week();
            assert_eq!((ours.year, ours.week), (theirs.year(), theirs.week() as i32), "{day}");
            day += Duration::days(1);
        }
    }

    #[test]
    fn window_starts_monday_midnight() {
        // 2024-05-15 is a Wednesday.
        let window = week_window_of(at(2024, 5, 15, 17, 30));
        assert_eq!(window.start, at(2024, 5, 13, 0, 0));
        assert_eq!(window.deadline, at(2024, 5, 17, 12, 0));
    }

    #[test]
    fn window_of_monday_is_its_own_week() {
        let window = week_window_of(at(2024, 5, 13, 0, 0));
        assert_eq!(window.start, at(2024, 5, 13, 0, 0));
    }

    #[test]
    fn window_of_sunday_reaches_back_to_monday() {
        let window = week_window_of(at(2024, 5, 19, 23, 59));
        assert_eq!(window.start, at(2024, 5, 13, 0, 0));
        assert_eq!(window.deadline, at(2024, 5, 17, 12, 0));
    }
}
