use std::collections::BTreeSet;

use chrono::NaiveDate;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use shared::time::iso_weekday;
use shared::{DomainError, DomainResult, Department, Role, ShiftType};

/// A recurring calendar day (birthday), serialized as "MM-DD".
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct MonthDay {
    pub month: u32,
    pub day: u32,
}

impl MonthDay {
    pub fn new(month: u32, day: u32) -> DomainResult<Self> {
        // 2000 is a leap year, so Feb 29 is accepted here.
        NaiveDate::from_ymd_opt(2000, month, day)
            .ok_or_else(|| DomainError::InvalidInput(format!("invalid month-day {month:02}-{day:02}")))?;
        Ok(Self { month, day })
    }

    pub fn parse(value: &str) -> DomainResult<Self> {
        let (month, day) = value
            .split_once('-')
            .ok_or_else(|| DomainError::InvalidInput(format!("invalid birthday '{value}', expected MM-DD")))?;
        let month = month
            .parse::<u32>()
            .map_err(|_| DomainError::InvalidInput(format!("invalid birthday '{value}', expected MM-DD")))?;
        let day = day
            .parse::<u32>()
            .map_err(|_| DomainError::InvalidInput(format!("invalid birthday '{value}', expected MM-DD")))?;
        Self::new(month, day)
    }

    /// The concrete date in the given year, if it exists (Feb 29 in a
    /// non-leap year does not).
    pub fn in_year(&self, year: i32) -> Option<NaiveDate> {
        NaiveDate::from_ymd_opt(year, self.month, self.day)
    }
}

impl std::fmt::Display for MonthDay {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{:02}-{:02}", self.month, self.day)
    }
}

impl Serialize for MonthDay {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.to_string())
    }
}

impl<'de> Deserialize<'de> for MonthDay {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let value = String::deserialize(deserializer)?;
        MonthDay::parse(&value).map_err(serde::de::Error::custom)
    }
}

/// Staff member with Notdienst capabilities.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Staff {
    pub identifier: String,
    pub name: String,
    pub role: Role,
    pub adult: bool,
    /// Weekly contracted hours
    pub weekly_hours: u32,
    pub department: Department,
    /// Can staff the reception desk
    pub reception_capable: bool,
    /// Can do night shifts at all
    pub night_possible: bool,
    /// Works nights strictly solo (false = must pair on regular nights)
    pub night_alone: bool,
    /// Longest allowed run of consecutive nights; None = unbounded
    pub night_max_consecutive: Option<u32>,
    /// Shortest allowed run of consecutive nights
    pub night_min_consecutive: u32,
    /// ISO weekdays (1 = Mon .. 7 = Sun) on which nights are excluded
    pub night_exception_weekdays: BTreeSet<u8>,
    pub birthday: Option<MonthDay>,
}

impl Staff {
    /// Default minimum night-run length for a role.
    pub fn default_min_consecutive(role: Role) -> u32 {
        match role {
            Role::Azubi => 1,
            _ => 2,
        }
    }

    pub fn validate(&self) -> DomainResult<()> {
        if self.identifier.trim().is_empty() {
            return Err(DomainError::InvalidInput("staff identifier must not be empty".into()));
        }
        if self.weekly_hours == 0 || self.weekly_hours > 60 {
            return Err(DomainError::InvalidInput(format!(
                "staff {}: weekly_hours must be in 1..=60, got {}",
                self.identifier, self.weekly_hours
            )));
        }
        if self.night_min_consecutive == 0 {
            return Err(DomainError::InvalidInput(format!(
                "staff {}: night_min_consecutive must be at least 1",
                self.identifier
            )));
        }
        if self.role == Role::Azubi && !(1..=2).contains(&self.night_min_consecutive) {
            return Err(DomainError::InvalidInput(format!(
                "staff {}: Azubi night_min_consecutive must be 1 or 2, got {}",
                self.identifier, self.night_min_consecutive
            )));
        }
        if let Some(max) = self.night_max_consecutive {
            if max < self.night_min_consecutive {
                return Err(DomainError::InvalidInput(format!(
                    "staff {}: night_max_consecutive {} below night_min_consecutive {}",
                    self.identifier, max, self.night_min_consecutive
                )));
            }
        }
        if let Some(weekday) = self.night_exception_weekdays.iter().find(|w| !(1..=7).contains(*w)) {
            return Err(DomainError::InvalidInput(format!(
                "staff {}: night exception weekday {} outside 1..=7",
                self.identifier, weekday
            )));
        }
        Ok(())
    }

    /// Basic eligibility of this staff member for a shift type on a date.
    ///
    /// Pairing rules are enforced by the constraint model, not here.
    pub fn can_work(&self, shift_type: ShiftType, date: NaiveDate) -> bool {
        // Minors cannot work Sundays
        if !self.adult && shift_type.is_sunday_shift() {
            return false;
        }

        // Interns never work weekends
        if self.role == Role::Intern && shift_type.is_weekend_shift() {
            return false;
        }

        if shift_type.is_night_shift() {
            if !self.night_possible {
                return false;
            }
            if self.night_exception_weekdays.contains(&iso_weekday(date)) {
                return false;
            }
        }

        match shift_type {
            ShiftType::Saturday1019 => self.role == Role::Azubi,
            ShiftType::Saturday1021 => match self.role {
                Role::Tfa => true,
                Role::Azubi => self.reception_capable,
                Role::Intern => false,
            },
            ShiftType::Saturday1022 | ShiftType::Sunday820 | ShiftType::Sunday1022 => {
                self.role == Role::Tfa
            }
            ShiftType::Sunday82030 => self.role == Role::Azubi && self.adult,
            _ => true,
        }
    }

    /// Effective night weight for fairness: paired nights count half for
    /// TFA and interns, Azubi nights always count full.
    pub fn effective_night_weight(&self, is_paired: bool) -> f64 {
        if self.role == Role::Azubi {
            1.0
        } else if is_paired {
            0.5
        } else {
            1.0
        }
    }

    /// Number of weekdays on which this staff member may work nights.
    pub fn allowed_night_weekdays(&self) -> u32 {
        7 - self.night_exception_weekdays.len() as u32
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn tfa(identifier: &str) -> Staff {
        Staff {
            identifier: identifier.to_string(),
            name: identifier.to_string(),
            role: Role::Tfa,
            adult: true,
            weekly_hours: 40,
            department: Department::Other,
            reception_capable: true,
            night_possible: true,
            night_alone: true,
            night_max_consecutive: None,
            night_min_consecutive: 2,
            night_exception_weekdays: BTreeSet::new(),
            birthday: None,
        }
    }

    #[test]
    fn minor_cannot_work_sunday() {
        let minor = Staff {
            role: Role::Azubi,
            adult: false,
            night_possible: false,
            night_min_consecutive: 1,
            ..tfa("MT")
        };
        let sunday = NaiveDate::from_ymd_opt(2026, 4, 5).unwrap();
        let saturday = NaiveDate::from_ymd_opt(2026, 4, 4).unwrap();

        assert!(!minor.can_work(ShiftType::Sunday820, sunday));
        assert!(!minor.can_work(ShiftType::Sunday1022, sunday));
        assert!(!minor.can_work(ShiftType::Sunday82030, sunday));
        // But Saturday Azubi duty is fine
        assert!(minor.can_work(ShiftType::Saturday1019, saturday));
    }

    #[test]
    fn intern_cannot_work_weekend() {
        let intern = Staff {
            role: Role::Intern,
            ..tfa("IN1")
        };
        let saturday = NaiveDate::from_ymd_opt(2026, 4, 4).unwrap();
        let sunday = NaiveDate::from_ymd_opt(2026, 4, 5).unwrap();

        assert!(!intern.can_work(ShiftType::Saturday1021, saturday));
        assert!(!intern.can_work(ShiftType::Sunday820, sunday));
        assert!(intern.can_work(ShiftType::NightSunMon, sunday));
    }

    #[test]
    fn weekend_slot_role_gates() {
        let tfa = tfa("T1");
        let reception_azubi = Staff {
            role: Role::Azubi,
            night_possible: false,
            night_min_consecutive: 1,
            ..self::tfa("AZ1")
        };
        let plain_azubi = Staff {
            reception_capable: false,
            ..reception_azubi.clone()
        };
        let saturday = NaiveDate::from_ymd_opt(2026, 4, 4).unwrap();
        let sunday = NaiveDate::from_ymd_opt(2026, 4, 5).unwrap();

        assert!(!tfa.can_work(ShiftType::Saturday1019, saturday));
        assert!(reception_azubi.can_work(ShiftType::Saturday1019, saturday));
        assert!(plain_azubi.can_work(ShiftType::Saturday1019, saturday));

        assert!(tfa.can_work(ShiftType::Saturday1021, saturday));
        assert!(reception_azubi.can_work(ShiftType::Saturday1021, saturday));
        assert!(!plain_azubi.can_work(ShiftType::Saturday1021, saturday));

        assert!(tfa.can_work(ShiftType::Saturday1022, saturday));
        assert!(!reception_azubi.can_work(ShiftType::Saturday1022, saturday));

        assert!(tfa.can_work(ShiftType::Sunday820, sunday));
        assert!(!reception_azubi.can_work(ShiftType::Sunday820, sunday));
        assert!(reception_azubi.can_work(ShiftType::Sunday82030, sunday));
        assert!(!tfa.can_work(ShiftType::Sunday82030, sunday));
    }

    #[test]
    fn night_exceptions_block_matching_weekdays() {
        let mut staff = tfa("T1");
        staff.night_exception_weekdays = BTreeSet::from([5, 6]); // Fri, Sat
        let friday = NaiveDate::from_ymd_opt(2026, 4, 3).unwrap();
        let saturday = NaiveDate::from_ymd_opt(2026, 4, 4).unwrap();
        let tuesday = NaiveDate::from_ymd_opt(2026, 4, 7).unwrap();

        assert!(!staff.can_work(ShiftType::NightFriSat, friday));
        assert!(!staff.can_work(ShiftType::NightSatSun, saturday));
        assert!(staff.can_work(ShiftType::NightTueWed, tuesday));
        assert_eq!(staff.allowed_night_weekdays(), 5);
    }

    #[test]
    fn effective_night_weights() {
        let tfa = tfa("T1");
        let azubi = Staff {
            role: Role::Azubi,
            night_min_consecutive: 1,
            ..self::tfa("AZ1")
        };
        assert_eq!(tfa.effective_night_weight(true), 0.5);
        assert_eq!(tfa.effective_night_weight(false), 1.0);
        assert_eq!(azubi.effective_night_weight(true), 1.0);
        assert_eq!(azubi.effective_night_weight(false), 1.0);
    }

    #[test]
    fn validation_rejects_bad_attributes() {
        let mut staff = tfa("T1");
        staff.weekly_hours = 0;
        assert!(staff.validate().is_err());

        let mut staff = tfa("T1");
        staff.night_max_consecutive = Some(1);
        assert!(staff.validate().is_err());

        let mut staff = tfa("T1");
        staff.night_exception_weekdays = BTreeSet::from([8]);
        assert!(staff.validate().is_err());

        let mut azubi = tfa("AZ1");
        azubi.role = Role::Azubi;
        azubi.night_min_consecutive = 3;
        assert!(azubi.validate().is_err());

        assert!(tfa("T1").validate().is_ok());
    }

    #[test]
    fn month_day_parsing() {
        assert_eq!(MonthDay::parse("04-17").unwrap(), MonthDay { month: 4, day: 17 });
        assert!(MonthDay::parse("13-01").is_err());
        assert!(MonthDay::parse("0417").is_err());
        let leap = MonthDay::parse("02-29").unwrap();
        assert_eq!(leap.in_year(2024), NaiveDate::from_ymd_opt(2024, 2, 29));
        assert_eq!(leap.in_year(2026), None);
    }
}
