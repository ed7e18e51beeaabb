use shared::{Role, ShiftType};

use crate::domain::entities::{Shift, Staff};

/// Cheap structural checks run after an unsuccessful solve, translating
/// likely causes into human-readable hints.
pub fn diagnose_infeasibility(staff_list: &[Staff], shifts: &[Shift]) -> Vec<String> {
    let mut issues = Vec::new();

    let saturday_azubi_slots = shifts
        .iter()
        .filter(|s| s.shift_type == ShiftType::Saturday1019)
        .count();
    let azubis: Vec<&Staff> = staff_list.iter().filter(|s| s.role == Role::Azubi).collect();
    if azubis.len() * 13 < saturday_azubi_slots {
        issues.push(format!(
            "Insufficient Azubis for Saturday Sa_10-19 shifts. Have {}, need coverage for 13 weeks.",
            azubis.len()
        ));
    }

    if !azubis.iter().any(|s| s.adult) {
        issues.push("No adult Azubis available for Sunday So_8-20:30 shifts.".to_string());
    }

    let night_capable_non_azubi = staff_list
        .iter()
        .filter(|s| s.night_possible && s.role != Role::Azubi)
        .count();
    if night_capable_non_azubi < 1 {
        issues.push(format!(
            "Insufficient night-capable staff. Have {night_capable_non_azubi}, need at least 1 TFA or intern per night."
        ));
    }

    for staff in staff_list {
        if !staff.night_possible {
            continue;
        }
        if staff.allowed_night_weekdays() < staff.night_min_consecutive {
            issues.push(format!(
                "{} cannot reach {} consecutive nights with only {} allowed weekdays.",
                staff.name,
                staff.night_min_consecutive,
                staff.allowed_night_weekdays()
            ));
        } else if staff.night_exception_weekdays.len() >= 5 {
            issues.push(format!(
                "{} is required for night duty but excludes {} of 7 weekdays.",
                staff.name,
                staff.night_exception_weekdays.len()
            ));
        }
    }

    if issues.is_empty() {
        issues.push(
            "Model infeasible. Check constraint interactions or increase solve time.".to_string(),
        );
    }

    issues
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::catalogue::generate_quarter_shifts;
    use crate::domain::test_fixtures::*;

    #[test]
    fn minor_only_roster_reports_missing_adult_azubi() {
        let mut minor = azubi("MINOR");
        minor.adult = false;
        let staff = vec![minor];
        let shifts = generate_quarter_shifts(date(2026, 4, 1));

        let issues = diagnose_infeasibility(&staff, &shifts);
        assert!(issues
            .iter()
            .any(|i| i == "No adult Azubis available for Sunday So_8-20:30 shifts."));
        assert!(issues.iter().any(|i| i.contains("night-capable")));
    }

    #[test]
    fn exception_heavy_staff_is_flagged() {
        let mut member = tfa("T1");
        member.night_exception_weekdays = [1, 2, 3, 4, 5, 6].into_iter().collect();
        // 1 allowed weekday < min_consecutive 2
        let staff = vec![member, azubi("AZ1"), tfa("T2")];
        let shifts = generate_quarter_shifts(date(2026, 4, 1));

        let issues = diagnose_infeasibility(&staff, &shifts);
        assert!(issues.iter().any(|i| i.contains("consecutive nights")));
    }

    #[test]
    fn healthy_roster_gets_the_generic_hint() {
        let staff = vec![tfa("T1"), tfa("T2"), azubi("AZ1"), azubi("AZ2")];
        let shifts = generate_quarter_shifts(date(2026, 4, 1));

        let issues = diagnose_infeasibility(&staff, &shifts);
        assert_eq!(issues.len(), 1);
        assert!(issues[0].contains("increase solve time"));
    }
}
