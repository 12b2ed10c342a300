//! Calendar helpers: day bounds and month ranges.

use chrono::{Datelike, Duration, NaiveDate, NaiveDateTime, NaiveTime};

/// 00:00:00.000 on the given day.
pub fn start_of_day(day: NaiveDate) -> NaiveDateTime {
    day.and_time(NaiveTime::MIN)
}

/// 23:59:59.999 on the given day.
pub fn end_of_day(day: NaiveDate) -> NaiveDateTime {
    // 23:59:59.999 is always a valid time of day
    let last = NaiveTime::from_hms_milli_opt(23, 59, 59, 999).unwrap_or(NaiveTime::MIN);
    day.and_time(last)
}

/// First and last calendar day of the month containing `day`.
pub fn month_bounds(day: NaiveDate) -> (NaiveDate, NaiveDate) {
    let first = day.with_day(1).unwrap_or(day);
    let next_month_first = if first.month() == 12 {
        NaiveDate::from_ymd_opt(first.year() + 1, 1, 1)
    } else {
        NaiveDate::from_ymd_opt(first.year(), first.month() + 1, 1)
    };
    let last = next_month_first
        .map(|d| d - Duration::days(1))
        .unwrap_or(first);
    (first, last)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Timelike;

    #[test]
    fn test_day_bounds() {
        let day = NaiveDate::from_ymd_opt(2025, 3, 9).unwrap();
        assert_eq!(start_of_day(day).hour(), 0);
        let end = end_of_day(day);
        assert_eq!((end.hour(), end.minute(), end.second()), (23, 59, 59));
        assert_eq!(end.nanosecond(), 999_000_000);
        assert_eq!(end.date(), day);
    }

    #[test]
    fn test_month_bounds_february_leap_year() {
        let (first, last) = month_bounds(NaiveDate::from_ymd_opt(2024, 2, 17).unwrap());
        assert_eq!(first, NaiveDate::from_ymd_opt(2024, 2, 1).unwrap());
        assert_eq!(last, NaiveDate::from_ymd_opt(2024, 2, 29).unwrap());
    }

    #[test]
    fn test_month_bounds_december_rolls_year() {
        let (first, last) = month_bounds(NaiveDate::from_ymd_opt(2025, 12, 5).unwrap());
        assert_eq!(first, NaiveDate::from_ymd_opt(2025, 12, 1).unwrap());
        assert_eq!(last, NaiveDate::from_ymd_opt(2025, 12, 31).unwrap());
    }
}
