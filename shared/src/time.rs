use chrono::{Datelike, Duration, NaiveDate};

/// Length of the scheduling horizon in days (13 full weeks).
pub const QUARTER_DAYS: i64 = 91;

/// Last day included in a quarter starting at `quarter_start`.
///
/// The horizon is `[quarter_start, quarter_start + 91)`, so the last
/// included day is `quarter_start + 90`. All code in this workspace uses
/// this inclusive-end convention.
pub fn quarter_end(quarter_start: NaiveDate) -> NaiveDate {
    quarter_start + Duration::days(QUARTER_DAYS - 1)
}

/// Iterate every day of the quarter in ascending order.
pub fn quarter_dates(quarter_start: NaiveDate) -> impl Iterator<Item = NaiveDate> {
    (0..QUARTER_DAYS).map(move |offset| quarter_start + Duration::days(offset))
}

/// Quarters start on the 1st of January, April, July or October.
pub fn is_quarter_start(date: NaiveDate) -> bool {
    date.day() == 1 && matches!(date.month(), 1 | 4 | 7 | 10)
}

/// ISO weekday number, 1 = Monday .. 7 = Sunday.
pub fn iso_weekday(date: NaiveDate) -> u8 {
    date.weekday().number_from_monday() as u8
}

/// German two-letter weekday label as used in plan exports.
pub fn weekday_label(date: NaiveDate) -> &'static str {
    match iso_weekday(date) {
        1 => "Mo",
        2 => "Di",
        3 => "Mi",
        4 => "Do",
        5 => "Fr",
        6 => "Sa",
        _ => "So",
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn quarter_end_is_ninety_days_after_start() {
        let start = NaiveDate::from_ymd_opt(2026, 4, 1).unwrap();
        assert_eq!(quarter_end(start), NaiveDate::from_ymd_opt(2026, 6, 30).unwrap());
        assert_eq!(quarter_dates(start).count(), 91);
    }

    #[test]
    fn quarter_starts() {
        assert!(is_quarter_start(NaiveDate::from_ymd_opt(2026, 4, 1).unwrap()));
        assert!(is_quarter_start(NaiveDate::from_ymd_opt(2026, 10, 1).unwrap()));
        assert!(!is_quarter_start(NaiveDate::from_ymd_opt(2026, 5, 1).unwrap()));
        assert!(!is_quarter_start(NaiveDate::from_ymd_opt(2026, 4, 2).unwrap()));
    }

    #[test]
    fn weekday_labels() {
        // 2026-04-01 is a Wednesday
        let wednesday = NaiveDate::from_ymd_opt(2026, 4, 1).unwrap();
        assert_eq!(weekday_label(wednesday), "Mi");
        assert_eq!(iso_weekday(wednesday), 3);
        let saturday = NaiveDate::from_ymd_opt(2026, 4, 4).unwrap();
        assert_eq!(weekday_label(saturday), "Sa");
        assert_eq!(iso_weekday(saturday), 6);
    }
}
