use chrono::{Datelike, Duration, NaiveDate};
use serde::{Deserialize, Serialize};
use shared::ShiftType;

/// A single shift slot in the quarter catalogue.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Shift {
    pub date: NaiveDate,
    pub shift_type: ShiftType,
}

impl Shift {
    pub fn new(date: NaiveDate, shift_type: ShiftType) -> Self {
        Self { date, shift_type }
    }

    /// Whether the shift type's weekday matches the date it is placed on.
    pub fn weekday_matches(&self) -> bool {
        self.shift_type.weekday() == self.date.weekday()
    }

    pub fn is_night_shift(&self) -> bool {
        self.shift_type.is_night_shift()
    }

    pub fn is_weekend_shift(&self) -> bool {
        self.shift_type.is_weekend_shift()
    }

    /// The day after the shift date (the morning a night shift ends on).
    pub fn next_day(&self) -> NaiveDate {
        self.date + Duration::days(1)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn weekday_matching() {
        let saturday = NaiveDate::from_ymd_opt(2026, 4, 4).unwrap();
        assert!(Shift::new(saturday, ShiftType::Saturday1019).weekday_matches());
        assert!(Shift::new(saturday, ShiftType::NightSatSun).weekday_matches());
        assert!(!Shift::new(saturday, ShiftType::NightFriSat).weekday_matches());
        assert!(!Shift::new(saturday, ShiftType::Sunday820).weekday_matches());
    }
}
