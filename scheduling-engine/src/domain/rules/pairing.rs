use shared::Role;

use super::{format_date, ConstraintViolation, Rule, ValidationContext};

/// Azubi night rules: at most one Azubi per night, and an Azubi on a
/// regular night needs a TFA or intern alongside (on vet-present nights
/// the external vet covers this).
pub struct AzubiNightRule;

impl Rule for AzubiNightRule {
    fn check(&self, context: &ValidationContext<'_>) -> Vec<ConstraintViolation> {
        let mut violations = Vec::new();

        for (night_date, assignments) in &context.nights_by_date {
            let azubis: Vec<_> = assignments
                .iter()
                .filter(|a| context.staff_for(a).map(|s| s.role == Role::Azubi).unwrap_or(false))
                .collect();
            let non_azubi_count = assignments
                .iter()
                .filter(|a| context.staff_for(a).map(|s| s.role != Role::Azubi).unwrap_or(false))
                .count();

            if azubis.len() > 1 {
                violations.push(ConstraintViolation::hard(
                    "Multiple Azubis on Night",
                    format!(
                        "{} Azubis assigned to the night of {}",
                        azubis.len(),
                        format_date(*night_date)
                    ),
                ));
            }

            let vet_present = assignments
                .iter()
                .any(|a| a.shift.shift_type.is_vet_present_night());
            if !vet_present && non_azubi_count == 0 {
                for azubi in &azubis {
                    violations.push(ConstraintViolation::hard(
                        "Azubi Night Pairing",
                        format!(
                            "Azubi {} working night alone on {} (no TFA or intern)",
                            context.display_name(&azubi.staff_identifier),
                            format_date(*night_date)
                        ),
                    ));
                }
            }
        }

        violations
    }
}

/// Staff with `night_alone = false` must be part of a two-person crew on
/// regular nights; vet-present nights are exempt.
pub struct NightPairingRule;

impl Rule for NightPairingRule {
    fn check(&self, context: &ValidationContext<'_>) -> Vec<ConstraintViolation> {
        let mut violations = Vec::new();

        for (night_date, assignments) in &context.nights_by_date {
            if assignments.iter().any(|a| a.shift.shift_type.is_vet_present_night()) {
                continue;
            }
            let headcount = assignments.len();
            for assignment in assignments {
                let Some(staff) = context.staff_for(assignment) else {
                    continue;
                };
                if staff.role != Role::Azubi && !staff.night_alone && headcount != 2 {
                    violations.push(ConstraintViolation::hard(
                        "Night Pairing Required",
                        format!(
                            "{} (nd_alone=false) working night of {} without a partner",
                            staff.name,
                            format_date(*night_date)
                        ),
                    ));
                }
            }
        }

        violations
    }
}

/// Staff with `night_alone = true` work regular nights strictly solo.
pub struct NdAloneRule;

impl Rule for NdAloneRule {
    fn check(&self, context: &ValidationContext<'_>) -> Vec<ConstraintViolation> {
        let mut violations = Vec::new();

        for (night_date, assignments) in &context.nights_by_date {
            if assignments.iter().any(|a| a.shift.shift_type.is_vet_present_night()) {
                continue;
            }
            if assignments.len() < 2 {
                continue;
            }
            for assignment in assignments {
                let Some(staff) = context.staff_for(assignment) else {
                    continue;
                };
                if staff.role != Role::Azubi && staff.night_alone {
                    violations.push(ConstraintViolation::hard(
                        "ND Alone Improper Pairing",
                        format!(
                            "{} (nd_alone=true) shares the night of {} with {} others",
                            staff.name,
                            format_date(*night_date),
                            assignments.len() - 1
                        ),
                    ));
                }
            }
        }

        violations
    }
}

/// Interns work 6 to 9 nights per quarter.
pub struct InternNightCapRule;

impl Rule for InternNightCapRule {
    fn check(&self, context: &ValidationContext<'_>) -> Vec<ConstraintViolation> {
        let mut violations = Vec::new();

        for staff in context.staff.values() {
            if staff.role != Role::Intern || !staff.night_possible {
                continue;
            }
            let nights = context.schedule.count_night_shifts(&staff.identifier);
            if !(6..=9).contains(&nights) {
                violations.push(ConstraintViolation::hard(
                    "Intern Night Cap",
                    format!(
                        "Intern {} has {} nights this quarter (allowed 6-9)",
                        staff.name, nights
                    ),
                ));
            }
        }

        violations
    }
}
