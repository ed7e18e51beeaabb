mod common;

use common::*;
use scheduling_engine::domain::catalogue::generate_quarter_shifts;
use scheduling_engine::{
    schedule, validate_schedule, CarryForwardEntry, PreviousPlanContext, TrailingAssignment,
    Vacation, VacationCalendar,
};
use shared::{Role, ShiftType};

const TEST_BUDGET_SECONDS: u64 = 30;

#[test]
fn generates_a_full_valid_quarter_plan() {
    let staff = practice_roster();
    let result = schedule(&staff, q2_start(), &[], None, TEST_BUDGET_SECONDS, Some(7)).unwrap();
    assert!(result.success, "hints: {:?}", result.unsatisfiable_constraints);
    assert!(result.soft_penalty.is_some());

    let plan = result.schedule.unwrap();
    let validation = validate_schedule(&plan, &staff, None, None);
    assert!(validation.is_valid(), "violations: {:#?}", validation.hard_violations);

    // Every catalogue slot is staffed: 78 weekend shifts plus 91 nights
    let catalogue = generate_quarter_shifts(q2_start());
    for slot in &catalogue {
        let crew = plan
            .assignments
            .iter()
            .filter(|a| a.shift == *slot)
            .count();
        if slot.is_weekend_shift() {
            assert_eq!(crew, 1, "weekend slot {slot:?}");
        } else {
            assert!((1..=2).contains(&crew), "night slot {slot:?} has {crew}");
        }
    }
    assert!(plan.assignments.len() >= 169);

    // Interns stay inside their quarterly night band
    for identifier in ["I1", "I2"] {
        let nights = plan.count_night_shifts(identifier);
        assert!((6..=9).contains(&nights), "{identifier} has {nights} nights");
    }

    // Everyone with weekend eligibility carries at least one weekend shift
    for member in staff.iter().filter(|s| s.role != Role::Intern) {
        assert!(
            plan.count_weekend_shifts(&member.identifier) >= 1,
            "{} has no weekend shift",
            member.identifier
        );
    }
    // The night-capable Azubi takes part in night duty
    assert!(plan.count_night_shifts("A1") >= 1);
}

#[test]
fn minor_azubi_avoids_sundays_but_works_saturday_duty() {
    let mut staff = practice_roster();
    let mut minor = azubi("MINOR");
    minor.adult = false;
    minor.reception_capable = false;
    staff.push(minor);

    let result = schedule(&staff, q2_start(), &[], None, TEST_BUDGET_SECONDS, Some(7)).unwrap();
    assert!(result.success, "hints: {:?}", result.unsatisfiable_constraints);
    let plan = result.schedule.unwrap();

    let minor_assignments: Vec<_> = plan.staff_assignments("MINOR").collect();
    assert!(!minor_assignments.is_empty());
    assert!(minor_assignments
        .iter()
        .all(|a| !a.shift.shift_type.is_sunday_shift()));
    assert!(minor_assignments
        .iter()
        .any(|a| a.shift.shift_type == ShiftType::Saturday1019));
}

#[test]
fn vacations_and_birthdays_are_blackouts() {
    let mut staff = practice_roster();
    staff.iter_mut().find(|s| s.identifier == "T2").unwrap().birthday =
        Some(scheduling_engine::MonthDay { month: 5, day: 14 });
    let vacations = vec![Vacation::new("T1", date(2026, 4, 6), date(2026, 4, 12)).unwrap()];

    let result =
        schedule(&staff, q2_start(), &vacations, None, TEST_BUDGET_SECONDS, Some(7)).unwrap();
    assert!(result.success, "hints: {:?}", result.unsatisfiable_constraints);
    let plan = result.schedule.unwrap();

    assert!(plan
        .staff_assignments("T1")
        .all(|a| a.shift.date < date(2026, 4, 6) || a.shift.date > date(2026, 4, 12)));
    assert!(plan.staff_assignments("T2").all(|a| a.shift.date != date(2026, 5, 14)));

    let calendar =
        VacationCalendar::build(&staff, &vacations, plan.quarter_start, plan.quarter_end).unwrap();
    let validation = validate_schedule(&plan, &staff, Some(&calendar), None);
    assert!(validation.is_valid(), "violations: {:#?}", validation.hard_violations);
}

#[test]
fn identical_inputs_and_seed_give_identical_plans() {
    let staff = practice_roster();
    let first = schedule(&staff, q2_start(), &[], None, TEST_BUDGET_SECONDS, Some(11)).unwrap();
    let second = schedule(&staff, q2_start(), &[], None, TEST_BUDGET_SECONDS, Some(11)).unwrap();

    assert_eq!(first.success, second.success);
    assert_eq!(first.schedule, second.schedule);
    assert_eq!(first.soft_penalty, second.soft_penalty);
}

#[test]
fn carry_forward_deltas_steer_the_next_quarter() {
    let staff = practice_roster();
    let entry = |identifier: &str, delta: f64| CarryForwardEntry {
        identifier: identifier.to_string(),
        role: Role::Tfa,
        hours: 40,
        effective_nights: 10.0,
        weekend_shifts: 9,
        total_notdienst: 19.0,
        normalized_40h: 19.0 + delta,
        group_mean_40h: 19.0,
        carry_forward_delta: delta,
    };
    let previous = PreviousPlanContext {
        quarter_start: Some(date(2026, 1, 1)),
        quarter_end: Some(date(2026, 3, 31)),
        entries: vec![entry("T1", 1.0), entry("T2", -1.0)],
        trailing_assignments: vec![],
    };

    let result = schedule(
        &staff,
        q2_start(),
        &[],
        Some(&previous),
        TEST_BUDGET_SECONDS,
        Some(7),
    )
    .unwrap();
    assert!(result.success, "hints: {:?}", result.unsatisfiable_constraints);
    let plan = result.schedule.unwrap();

    // T2 arrives under-loaded and should absorb at least as much as T1
    let t1 = plan.count_total_notdienst("T1", Role::Tfa);
    let t2 = plan.count_total_notdienst("T2", Role::Tfa);
    assert!(t2 >= t1, "T1 {t1}, T2 {t2}");
}

#[test]
fn trailing_night_run_enforces_spacing_across_the_boundary() {
    let staff = practice_roster();
    // T3 finished the previous quarter with a three-night run Mar 29-31
    let trailing = |day: u32, shift_type: ShiftType| TrailingAssignment {
        staff_identifier: "T3".to_string(),
        date: date(2026, 3, day),
        shift_type,
    };
    let previous = PreviousPlanContext {
        quarter_start: Some(date(2026, 1, 1)),
        quarter_end: Some(date(2026, 3, 31)),
        entries: vec![],
        trailing_assignments: vec![
            trailing(29, ShiftType::NightSunMon),
            trailing(30, ShiftType::NightMonTue),
            trailing(31, ShiftType::NightTueWed),
        ],
    };

    let result = schedule(
        &staff,
        q2_start(),
        &[],
        Some(&previous),
        TEST_BUDGET_SECONDS,
        Some(7),
    )
    .unwrap();
    assert!(result.success, "hints: {:?}", result.unsatisfiable_constraints);
    let plan = result.schedule.unwrap();

    // The run started Mar 29, so T3's next block may start Apr 19 at the earliest
    if let Some(first_night) = plan.night_dates("T3").first() {
        assert!(
            *first_night >= date(2026, 4, 19),
            "T3 starts a night block too early: {first_night}"
        );
    }

    let validation = validate_schedule(&plan, &staff, None, Some(&previous));
    assert!(validation.is_valid(), "violations: {:#?}", validation.hard_violations);
}

#[test]
fn pair_requiring_staff_never_work_regular_nights_alone() {
    let mut staff = practice_roster();
    for identifier in ["T5", "T6"] {
        staff
            .iter_mut()
            .find(|s| s.identifier == identifier)
            .unwrap()
            .night_alone = false;
    }

    let result = schedule(&staff, q2_start(), &[], None, TEST_BUDGET_SECONDS, Some(7)).unwrap();
    assert!(result.success, "hints: {:?}", result.unsatisfiable_constraints);
    let plan = result.schedule.unwrap();

    let headcounts = plan.night_headcounts();
    for identifier in ["T5", "T6"] {
        assert!(plan.count_night_shifts(identifier) >= 1);
        for assignment in plan.staff_assignments(identifier) {
            if !assignment.shift.is_night_shift()
                || assignment.shift.shift_type.is_vet_present_night()
            {
                continue;
            }
            assert_eq!(
                headcounts.get(&assignment.shift.date),
                Some(&2),
                "{identifier} alone on regular night {}",
                assignment.shift.date
            );
        }
    }

    let validation = validate_schedule(&plan, &staff, None, None);
    assert!(validation.is_valid(), "violations: {:#?}", validation.hard_violations);
}

#[test]
fn impossible_roster_reports_diagnostics_instead_of_a_plan() {
    let mut minor = azubi("AZ");
    minor.adult = false;
    let staff = vec![minor];

    let result = schedule(&staff, q2_start(), &[], None, 5, None).unwrap();
    assert!(!result.success);
    assert!(result.schedule.is_none());
    assert!(result
        .unsatisfiable_constraints
        .iter()
        .any(|hint| hint == "No adult Azubis available for Sunday So_8-20:30 shifts."));
}

#[test]
fn malformed_rosters_are_rejected_up_front() {
    let mut bad = tfa("T1");
    bad.weekly_hours = 0;
    assert!(schedule(&[bad], q2_start(), &[], None, 5, None).is_err());

    let duplicated = vec![tfa("T1"), tfa("T1")];
    assert!(schedule(&duplicated, q2_start(), &[], None, 5, None).is_err());

    assert!(schedule(&[], q2_start(), &[], None, 5, None).is_err());
}
