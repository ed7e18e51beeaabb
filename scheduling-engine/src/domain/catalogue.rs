use chrono::{Datelike, NaiveDate, Weekday};
use shared::time::{quarter_dates, quarter_end};
use shared::ShiftType;

use crate::domain::entities::Shift;

/// All shift slots required on a single day: every day one night shift,
/// Saturdays and Sundays three weekend shifts on top.
pub fn shifts_for_date(date: NaiveDate) -> Vec<Shift> {
    let mut shifts = Vec::with_capacity(4);

    match date.weekday() {
        Weekday::Sat => {
            shifts.push(Shift::new(date, ShiftType::Saturday1019));
            shifts.push(Shift::new(date, ShiftType::Saturday1021));
            shifts.push(Shift::new(date, ShiftType::Saturday1022));
        }
        Weekday::Sun => {
            shifts.push(Shift::new(date, ShiftType::Sunday820));
            shifts.push(Shift::new(date, ShiftType::Sunday1022));
            shifts.push(Shift::new(date, ShiftType::Sunday82030));
        }
        _ => {}
    }

    shifts.push(Shift::new(date, ShiftType::night_for_weekday(date.weekday())));
    shifts.sort();
    shifts
}

/// All shift slots between two dates, end inclusive, ordered by
/// (date, shift type).
pub fn shifts_between(start: NaiveDate, end_inclusive: NaiveDate) -> Vec<Shift> {
    let mut shifts = Vec::new();
    let mut date = start;
    while date <= end_inclusive {
        shifts.extend(shifts_for_date(date));
        date = date.succ_opt().expect("date overflow");
    }
    shifts
}

/// The deterministic 91-day shift catalogue of a quarter.
pub fn generate_quarter_shifts(quarter_start: NaiveDate) -> Vec<Shift> {
    let mut shifts: Vec<Shift> = quarter_dates(quarter_start).flat_map(shifts_for_date).collect();
    shifts.sort();
    shifts
}

/// Convenience: the catalogue together with the quarter's inclusive end.
pub fn quarter_catalogue(quarter_start: NaiveDate) -> (Vec<Shift>, NaiveDate) {
    (generate_quarter_shifts(quarter_start), quarter_end(quarter_start))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn quarter_catalogue_has_expected_shape() {
        // Q2/2026: April 1 - June 30, 91 days, 13 Saturdays, 13 Sundays
        let start = NaiveDate::from_ymd_opt(2026, 4, 1).unwrap();
        let shifts = generate_quarter_shifts(start);

        let nights = shifts.iter().filter(|s| s.is_night_shift()).count();
        let saturdays = shifts.iter().filter(|s| s.shift_type.is_saturday_shift()).count();
        let sundays = shifts.iter().filter(|s| s.shift_type.is_sunday_shift()).count();

        assert_eq!(nights, 91);
        assert_eq!(saturdays, 39);
        assert_eq!(sundays, 39);
        assert_eq!(shifts.len(), 169);
    }

    #[test]
    fn every_shift_sits_on_its_weekday() {
        let start = NaiveDate::from_ymd_opt(2026, 7, 1).unwrap();
        for shift in generate_quarter_shifts(start) {
            assert!(shift.weekday_matches(), "{shift:?} on wrong weekday");
        }
    }

    #[test]
    fn catalogue_is_sorted_and_deterministic() {
        let start = NaiveDate::from_ymd_opt(2026, 4, 1).unwrap();
        let first = generate_quarter_shifts(start);
        let second = generate_quarter_shifts(start);
        assert_eq!(first, second);

        let mut sorted = first.clone();
        sorted.sort();
        assert_eq!(first, sorted);
    }

    #[test]
    fn one_night_per_day_matching_the_weekday() {
        let saturday = NaiveDate::from_ymd_opt(2026, 4, 4).unwrap();
        let shifts = shifts_for_date(saturday);
        assert_eq!(shifts.len(), 4);
        assert!(shifts.iter().any(|s| s.shift_type == ShiftType::NightSatSun));

        let monday = NaiveDate::from_ymd_opt(2026, 4, 6).unwrap();
        let shifts = shifts_for_date(monday);
        assert_eq!(shifts.len(), 1);
        assert_eq!(shifts[0].shift_type, ShiftType::NightMonTue);
    }
}
