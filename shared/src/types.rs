use chrono::Weekday;
use serde::{Deserialize, Serialize};

/// Staff role/profession.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Role {
    #[serde(rename = "TFA")]
    Tfa,
    Azubi,
    Intern,
}

impl Role {
    pub fn as_str(&self) -> &'static str {
        match self {
            Role::Tfa => "TFA",
            Role::Azubi => "Azubi",
            Role::Intern => "Intern",
        }
    }
}

impl std::fmt::Display for Role {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Practice department a staff member belongs to.
///
/// `Op` and `Station` are capacity-limited sub-teams whose members must not
/// overlap on the same or consecutive nights; `Other` is exempt.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash, Default)]
#[serde(rename_all = "lowercase")]
pub enum Department {
    Op,
    Station,
    #[default]
    Other,
}

impl Department {
    pub fn is_restricted(&self) -> bool {
        !matches!(self, Department::Other)
    }
}

/// Type of shift, using the historical wire codes as serde values.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum ShiftType {
    /// Saturday Azubi duty
    #[serde(rename = "Sa_10-19")]
    Saturday1019,
    /// Saturday reception + on-call
    #[serde(rename = "Sa_10-21")]
    Saturday1021,
    /// Saturday on-call
    #[serde(rename = "Sa_10-22")]
    Saturday1022,
    #[serde(rename = "So_8-20")]
    Sunday820,
    /// Sunday on-call
    #[serde(rename = "So_10-22")]
    Sunday1022,
    /// Sunday Azubi duty (8-12 onsite, then on-call)
    #[serde(rename = "So_8-20:30")]
    Sunday82030,
    #[serde(rename = "N_Mo-Di")]
    NightMonTue,
    #[serde(rename = "N_Di-Mi")]
    NightTueWed,
    #[serde(rename = "N_Mi-Do")]
    NightWedThu,
    #[serde(rename = "N_Do-Fr")]
    NightThuFri,
    #[serde(rename = "N_Fr-Sa")]
    NightFriSat,
    #[serde(rename = "N_Sa-So")]
    NightSatSun,
    #[serde(rename = "N_So-Mo")]
    NightSunMon,
}

impl ShiftType {
    pub const ALL: [ShiftType; 13] = [
        ShiftType::Saturday1019,
        ShiftType::Saturday1021,
        ShiftType::Saturday1022,
        ShiftType::Sunday820,
        ShiftType::Sunday1022,
        ShiftType::Sunday82030,
        ShiftType::NightMonTue,
        ShiftType::NightTueWed,
        ShiftType::NightWedThu,
        ShiftType::NightThuFri,
        ShiftType::NightFriSat,
        ShiftType::NightSatSun,
        ShiftType::NightSunMon,
    ];

    /// Historical wire code, as used in CSV exports and persisted plans.
    pub fn code(&self) -> &'static str {
        match self {
            ShiftType::Saturday1019 => "Sa_10-19",
            ShiftType::Saturday1021 => "Sa_10-21",
            ShiftType::Saturday1022 => "Sa_10-22",
            ShiftType::Sunday820 => "So_8-20",
            ShiftType::Sunday1022 => "So_10-22",
            ShiftType::Sunday82030 => "So_8-20:30",
            ShiftType::NightMonTue => "N_Mo-Di",
            ShiftType::NightTueWed => "N_Di-Mi",
            ShiftType::NightWedThu => "N_Mi-Do",
            ShiftType::NightThuFri => "N_Do-Fr",
            ShiftType::NightFriSat => "N_Fr-Sa",
            ShiftType::NightSatSun => "N_Sa-So",
            ShiftType::NightSunMon => "N_So-Mo",
        }
    }

    pub fn is_saturday_shift(&self) -> bool {
        matches!(
            self,
            ShiftType::Saturday1019 | ShiftType::Saturday1021 | ShiftType::Saturday1022
        )
    }

    pub fn is_sunday_shift(&self) -> bool {
        matches!(
            self,
            ShiftType::Sunday820 | ShiftType::Sunday1022 | ShiftType::Sunday82030
        )
    }

    pub fn is_weekend_shift(&self) -> bool {
        self.is_saturday_shift() || self.is_sunday_shift()
    }

    pub fn is_night_shift(&self) -> bool {
        !self.is_weekend_shift()
    }

    /// Nights with an external veterinarian on site, which only need a
    /// single duty person.
    pub fn is_vet_present_night(&self) -> bool {
        matches!(self, ShiftType::NightSunMon | ShiftType::NightMonTue)
    }

    /// The weekday a dated instance of this shift type must fall on.
    /// Night shifts are keyed by the evening they start.
    pub fn weekday(&self) -> Weekday {
        match self {
            ShiftType::Saturday1019 | ShiftType::Saturday1021 | ShiftType::Saturday1022 => {
                Weekday::Sat
            }
            ShiftType::Sunday820 | ShiftType::Sunday1022 | ShiftType::Sunday82030 => Weekday::Sun,
            ShiftType::NightMonTue => Weekday::Mon,
            ShiftType::NightTueWed => Weekday::Tue,
            ShiftType::NightWedThu => Weekday::Wed,
            ShiftType::NightThuFri => Weekday::Thu,
            ShiftType::NightFriSat => Weekday::Fri,
            ShiftType::NightSatSun => Weekday::Sat,
            ShiftType::NightSunMon => Weekday::Sun,
        }
    }

    /// The night shift type starting on the given weekday.
    pub fn night_for_weekday(weekday: Weekday) -> ShiftType {
        match weekday {
            Weekday::Mon => ShiftType::NightMonTue,
            Weekday::Tue => ShiftType::NightTueWed,
            Weekday::Wed => ShiftType::NightWedThu,
            Weekday::Thu => ShiftType::NightThuFri,
            Weekday::Fri => ShiftType::NightFriSat,
            Weekday::Sat => ShiftType::NightSatSun,
            Weekday::Sun => ShiftType::NightSunMon,
        }
    }
}

impl std::fmt::Display for ShiftType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.code())
    }
}
