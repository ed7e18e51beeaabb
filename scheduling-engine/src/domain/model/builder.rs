use std::collections::{BTreeMap, BTreeSet};

use chrono::{Duration, NaiveDate};
use shared::time::QUARTER_DAYS;
use shared::{Role, ShiftType};

use crate::domain::catalogue::generate_quarter_shifts;
use crate::domain::entities::{PreviousPlanContext, Staff, VacationCalendar};
use crate::domain::runs::consecutive_runs;

use super::constraints::{Constraint, Lit, VarId};
use super::objective::{
    carry_forward_offset, group_threshold, person_multiplier, GroupSpec, ObjectiveSpec,
    PersonExpression,
};
use super::{NightWindow, ScheduleModel};

/// Builds the boolean assignment model over a quarter catalogue.
pub struct ModelBuilder<'a> {
    staff: Vec<&'a Staff>,
    quarter_start: NaiveDate,
    calendar: &'a VacationCalendar,
    previous: Option<&'a PreviousPlanContext>,
}

impl<'a> ModelBuilder<'a> {
    pub fn new(
        staff_list: &'a [Staff],
        quarter_start: NaiveDate,
        calendar: &'a VacationCalendar,
        previous: Option<&'a PreviousPlanContext>,
    ) -> Self {
        let mut staff: Vec<&Staff> = staff_list.iter().collect();
        staff.sort_by(|a, b| a.identifier.cmp(&b.identifier));
        Self {
            staff,
            quarter_start,
            calendar,
            previous,
        }
    }

    pub fn build(self) -> ScheduleModel {
        let quarter_start = self.quarter_start;
        let quarter_end = shared::time::quarter_end(quarter_start);
        let shifts = generate_quarter_shifts(quarter_start);

        let staff_order: Vec<String> =
            self.staff.iter().map(|s| s.identifier.clone()).collect();
        let staff_lookup: BTreeMap<String, usize> = staff_order
            .iter()
            .enumerate()
            .map(|(index, id)| (id.clone(), index))
            .collect();
        let shift_lookup: BTreeMap<(NaiveDate, ShiftType), usize> = shifts
            .iter()
            .enumerate()
            .map(|(index, shift)| ((shift.date, shift.shift_type), index))
            .collect();

        let trailing_nights: BTreeMap<usize, BTreeSet<NaiveDate>> = self
            .staff
            .iter()
            .enumerate()
            .filter_map(|(si, staff)| {
                let nights = self
                    .previous
                    .map(|p| p.trailing_night_dates(&staff.identifier))
                    .unwrap_or_default();
                (!nights.is_empty()).then_some((si, nights))
            })
            .collect();

        let mut model = ScheduleModel {
            quarter_start,
            quarter_end,
            staff_order,
            shifts,
            objective: ObjectiveSpec::default(),
            var_count: 0,
            constraints: Vec::new(),
            staff_lookup,
            shift_lookup,
            assign_index: BTreeMap::new(),
            night_index: BTreeMap::new(),
            night_two_index: BTreeMap::new(),
            paired_index: BTreeMap::new(),
            paired_assigned_index: BTreeMap::new(),
            block_start_index: BTreeMap::new(),
            windows: Vec::new(),
            trailing_nights,
            slot_candidates: Vec::new(),
        };

        self.create_assign_vars(&mut model);
        self.create_pairing_vars(&mut model);
        self.add_same_day_constraints(&mut model);
        self.add_coverage_constraints(&mut model);
        self.add_pairing_constraints(&mut model);
        self.add_intern_band_constraints(&mut model);
        self.add_adjacency_constraints(&mut model);
        self.add_boundary_constraints(&mut model);
        self.add_block_spacing_constraints(&mut model);
        self.add_max_consecutive_constraints(&mut model);
        self.add_min_consecutive_constraints(&mut model);
        self.add_department_constraints(&mut model);
        self.add_participation_constraints(&mut model);
        self.build_objective(&mut model);

        model
    }

    fn new_var(model: &mut ScheduleModel) -> VarId {
        let var = VarId(model.var_count as u32);
        model.var_count += 1;
        var
    }

    fn create_assign_vars(&self, model: &mut ScheduleModel) {
        let shifts = model.shifts.clone();
        for (si, staff) in self.staff.iter().enumerate() {
            for (shi, shift) in shifts.iter().enumerate() {
                if !staff.can_work(shift.shift_type, shift.date) {
                    continue;
                }
                if self.calendar.is_blocked(&staff.identifier, shift.date) {
                    continue;
                }
                let var = Self::new_var(model);
                model.assign_index.insert((si, shi), var);
                if shift.is_night_shift() {
                    model.night_index.insert((si, shift.date), var);
                }
            }
        }
        model.slot_candidates = (0..shifts.len())
            .map(|shi| {
                (0..self.staff.len())
                    .filter(|si| model.assign_index.contains_key(&(*si, shi)))
                    .collect()
            })
            .collect();
    }

    /// Per-night "exactly two" flags, paired flags and their linkage.
    fn create_pairing_vars(&self, model: &mut ScheduleModel) {
        for date in shared::time::quarter_dates(self.quarter_start) {
            let night_vars = self.night_vars_on(model, date);
            if night_vars.is_empty() {
                continue;
            }
            let two = Self::new_var(model);
            model.night_two_index.insert(date, two);
            model.constraints.push(Constraint::CountEquality {
                label: format!("night pairing flag {date}"),
                target: two,
                vars: night_vars.iter().map(|(_, v)| *v).collect(),
                value: 2,
            });

            for (si, x) in night_vars {
                let paired = Self::new_var(model);
                model.paired_index.insert((si, date), paired);
                model.constraints.push(Constraint::AndEquality {
                    label: format!("paired linkage {} {date}", self.staff[si].identifier),
                    target: paired,
                    operands: vec![Lit::Pos(x), Lit::Pos(two)],
                });

                let paired_assigned = Self::new_var(model);
                model.paired_assigned_index.insert((si, date), paired_assigned);
                model.constraints.push(Constraint::AndEquality {
                    label: format!(
                        "paired-and-assigned linkage {} {date}",
                        self.staff[si].identifier
                    ),
                    target: paired_assigned,
                    operands: vec![Lit::Pos(x), Lit::Pos(paired)],
                });
            }
        }
    }

    fn night_vars_on(&self, model: &ScheduleModel, date: NaiveDate) -> Vec<(usize, VarId)> {
        (0..self.staff.len())
            .filter_map(|si| model.night_index.get(&(si, date)).map(|v| (si, *v)))
            .collect()
    }

    fn add_same_day_constraints(&self, model: &mut ScheduleModel) {
        let shifts = model.shifts.clone();
        for (si, staff) in self.staff.iter().enumerate() {
            let mut per_day: BTreeMap<NaiveDate, Vec<VarId>> = BTreeMap::new();
            for (shi, shift) in shifts.iter().enumerate() {
                if let Some(var) = model.assign_var(si, shi) {
                    per_day.entry(shift.date).or_default().push(var);
                }
            }
            for (date, vars) in per_day {
                if vars.len() > 1 {
                    model.constraints.push(Constraint::SumInRange {
                        label: format!("same-day overlap {} {date}", staff.identifier),
                        vars,
                        lower: 0,
                        upper: 1,
                    });
                }
            }
        }
    }

    fn add_coverage_constraints(&self, model: &mut ScheduleModel) {
        let shifts = model.shifts.clone();
        for (shi, shift) in shifts.iter().enumerate() {
            if !shift.is_weekend_shift() {
                continue;
            }
            let vars: Vec<VarId> = model.slot_candidates(shi)
                .iter()
                .filter_map(|si| model.assign_var(*si, shi))
                .collect();
            model.constraints.push(Constraint::SumInRange {
                label: format!("weekend coverage {} {}", shift.shift_type, shift.date),
                vars,
                lower: 1,
                upper: 1,
            });
        }

        for date in shared::time::quarter_dates(self.quarter_start) {
            let night_vars = self.night_vars_on(model, date);
            let all: Vec<VarId> = night_vars.iter().map(|(_, v)| *v).collect();
            let non_azubi: Vec<VarId> = night_vars
                .iter()
                .filter(|(si, _)| self.staff[*si].role != Role::Azubi)
                .map(|(_, v)| *v)
                .collect();
            let azubi: Vec<VarId> = night_vars
                .iter()
                .filter(|(si, _)| self.staff[*si].role == Role::Azubi)
                .map(|(_, v)| *v)
                .collect();

            let night_type = ShiftType::night_for_weekday(chrono::Datelike::weekday(&date));
            if night_type.is_vet_present_night() {
                model.constraints.push(Constraint::SumInRange {
                    label: format!("vet night coverage {date}"),
                    vars: non_azubi,
                    lower: 1,
                    upper: 1,
                });
            } else {
                model.constraints.push(Constraint::SumInRange {
                    label: format!("night coverage {date}"),
                    vars: all,
                    lower: 1,
                    upper: 2,
                });
                let anchor_upper = (non_azubi.len() as i64).max(1);
                model.constraints.push(Constraint::SumInRange {
                    label: format!("night anchor {date}"),
                    vars: non_azubi,
                    lower: 1,
                    upper: anchor_upper,
                });
            }
            if !azubi.is_empty() {
                model.constraints.push(Constraint::SumInRange {
                    label: format!("azubi night cap {date}"),
                    vars: azubi,
                    lower: 0,
                    upper: 1,
                });
            }
        }
    }

    fn add_pairing_constraints(&self, model: &mut ScheduleModel) {
        for date in shared::time::quarter_dates(self.quarter_start) {
            let night_vars = self.night_vars_on(model, date);
            if night_vars.is_empty() {
                continue;
            }
            let night_type = ShiftType::night_for_weekday(chrono::Datelike::weekday(&date));
            let vet_present = night_type.is_vet_present_night();

            let non_azubi_vars: Vec<VarId> = night_vars
                .iter()
                .filter(|(si, _)| self.staff[*si].role != Role::Azubi)
                .map(|(_, v)| *v)
                .collect();

            for (si, x) in &night_vars {
                let staff = self.staff[*si];

                // An Azubi on any night needs a TFA or intern alongside
                if staff.role == Role::Azubi {
                    model.constraints.push(Constraint::ImpliesSumAtLeast {
                        label: format!("azubi partner {} {date}", staff.identifier),
                        antecedent: *x,
                        vars: non_azubi_vars.clone(),
                        lower: 1,
                    });
                    continue;
                }
                if vet_present {
                    continue;
                }
                if staff.night_alone {
                    // Strictly solo on regular nights
                    for (sj, other) in &night_vars {
                        if sj != si {
                            model.constraints.push(Constraint::SumInRange {
                                label: format!("solo night {} {date}", staff.identifier),
                                vars: vec![*x, *other],
                                lower: 0,
                                upper: 1,
                            });
                        }
                    }
                } else if let Some(paired) = model.paired_index.get(&(*si, date)).copied() {
                    model.constraints.push(Constraint::Implies {
                        label: format!("pairing required {} {date}", staff.identifier),
                        antecedent: *x,
                        consequent: paired,
                    });
                }
            }
        }
    }

    fn add_intern_band_constraints(&self, model: &mut ScheduleModel) {
        for (si, staff) in self.staff.iter().enumerate() {
            if staff.role != Role::Intern {
                continue;
            }
            let vars: Vec<VarId> = model
                .night_index
                .range((si, NaiveDate::MIN)..=(si, NaiveDate::MAX))
                .map(|(_, v)| *v)
                .collect();
            if !vars.is_empty() {
                model.constraints.push(Constraint::SumInRange {
                    label: format!("intern night band {}", staff.identifier),
                    vars,
                    lower: 6,
                    upper: 9,
                });
            }
        }
    }

    /// Weekend isolation and night-to-day conflicts, deduplicated per
    /// variable pair.
    fn add_adjacency_constraints(&self, model: &mut ScheduleModel) {
        let shifts = model.shifts.clone();
        let mut pairs: BTreeMap<(VarId, VarId), String> = BTreeMap::new();

        for (si, staff) in self.staff.iter().enumerate() {
            let mut per_day: BTreeMap<NaiveDate, Vec<(ShiftType, VarId)>> = BTreeMap::new();
            for (shi, shift) in shifts.iter().enumerate() {
                if let Some(var) = model.assign_var(si, shi) {
                    per_day.entry(shift.date).or_default().push((shift.shift_type, var));
                }
            }

            for (date, cells) in &per_day {
                for (shift_type, var) in cells {
                    if shift_type.is_weekend_shift() {
                        // No duty of any kind next to a weekend shift
                        for neighbor in [*date - Duration::days(1), *date + Duration::days(1)] {
                            for (_, other) in per_day.get(&neighbor).into_iter().flatten() {
                                let key = if *var < *other { (*var, *other) } else { (*other, *var) };
                                pairs.entry(key).or_insert_with(|| {
                                    format!("weekend isolation {} {date}", staff.identifier)
                                });
                            }
                        }
                    } else {
                        // Night shift: no weekend duty the morning after
                        let next = *date + Duration::days(1);
                        for (other_type, other) in per_day.get(&next).into_iter().flatten() {
                            if other_type.is_weekend_shift() {
                                let key = if *var < *other { (*var, *other) } else { (*other, *var) };
                                pairs.entry(key).or_insert_with(|| {
                                    format!("night-day conflict {} {date}", staff.identifier)
                                });
                            }
                        }
                    }
                }
            }
        }

        for ((first, second), label) in pairs {
            model.constraints.push(Constraint::SumInRange {
                label,
                vars: vec![first, second],
                lower: 0,
                upper: 1,
            });
        }
    }

    /// The previous quarter's last night forbids day duty right after the
    /// boundary.
    fn add_boundary_constraints(&self, model: &mut ScheduleModel) {
        let Some(previous) = self.previous else {
            return;
        };
        let shifts = model.shifts.clone();
        for (si, staff) in self.staff.iter().enumerate() {
            let Some(last_night) = previous.last_trailing_night(&staff.identifier) else {
                continue;
            };
            let rest_day = last_night + Duration::days(1);
            if rest_day < self.quarter_start {
                continue;
            }
            for (shi, shift) in shifts.iter().enumerate() {
                if shift.date == rest_day && shift.is_weekend_shift() {
                    if let Some(var) = model.assign_var(si, shi) {
                        model.constraints.push(Constraint::Fixed {
                            label: format!("boundary rest {} {rest_day}", staff.identifier),
                            var,
                            value: false,
                        });
                    }
                }
            }
        }
    }

    /// Night-block starts and the 21-day spacing between them.
    fn add_block_spacing_constraints(&self, model: &mut ScheduleModel) {
        for (si, staff) in self.staff.iter().enumerate() {
            let night_dates: Vec<NaiveDate> = model
                .night_index
                .range((si, NaiveDate::MIN)..=(si, NaiveDate::MAX))
                .map(|((_, date), _)| *date)
                .collect();
            if night_dates.is_empty() {
                continue;
            }

            let trailing = model.trailing_nights.get(&si).cloned().unwrap_or_default();

            for &date in &night_dates {
                let x = model.night_var(si, date).expect("night var exists");
                let block_start = Self::new_var(model);
                model.block_start_index.insert((si, date), block_start);

                let previous_day = date - Duration::days(1);
                if let Some(prev_var) = model.night_var(si, previous_day) {
                    model.constraints.push(Constraint::AndEquality {
                        label: format!("block start linkage {} {date}", staff.identifier),
                        target: block_start,
                        operands: vec![Lit::Pos(x), Lit::Neg(prev_var)],
                    });
                } else if trailing.contains(&previous_day) {
                    // Continuation of the previous quarter's run
                    model.constraints.push(Constraint::Fixed {
                        label: format!("block start linkage {} {date}", staff.identifier),
                        var: block_start,
                        value: false,
                    });
                } else {
                    model.constraints.push(Constraint::AndEquality {
                        label: format!("block start linkage {} {date}", staff.identifier),
                        target: block_start,
                        operands: vec![Lit::Pos(x)],
                    });
                }
            }

            // Pairwise spacing inside the quarter
            for (i, &first) in night_dates.iter().enumerate() {
                for &second in &night_dates[i + 1..] {
                    let gap = (second - first).num_days();
                    if gap >= crate::domain::rules::blocks::BLOCK_SPACING_DAYS {
                        break;
                    }
                    if gap == 0 {
                        continue;
                    }
                    let first_start = model.block_start_index[&(si, first)];
                    let second_start = model.block_start_index[&(si, second)];
                    model.constraints.push(Constraint::SumInRange {
                        label: format!(
                            "block spacing {} {first}/{second}",
                            staff.identifier
                        ),
                        vars: vec![first_start, second_start],
                        lower: 0,
                        upper: 1,
                    });
                }
            }

            // Spacing against the last block begun in the previous quarter
            if let Some(last_trailing_start) = consecutive_runs(&trailing).last().map(|r| r.start) {
                for &date in &night_dates {
                    let gap = (date - last_trailing_start).num_days();
                    if gap > 0 && gap < crate::domain::rules::blocks::BLOCK_SPACING_DAYS {
                        let block_start = model.block_start_index[&(si, date)];
                        model.constraints.push(Constraint::Fixed {
                            label: format!(
                                "block spacing boundary {} {date}",
                                staff.identifier
                            ),
                            var: block_start,
                            value: false,
                        });
                    }
                }
            }
        }
    }

    fn add_max_consecutive_constraints(&self, model: &mut ScheduleModel) {
        for (si, staff) in self.staff.iter().enumerate() {
            let Some(max) = staff.night_max_consecutive else {
                continue;
            };
            let trailing = model.trailing_nights.get(&si).cloned().unwrap_or_default();
            let window = max as i64 + 1;

            let mut start = self.quarter_start - Duration::days((max as i64).min(21));
            let last_start = model.quarter_end - Duration::days(max as i64);
            while start <= last_start {
                let mut vars = Vec::new();
                let mut trailing_count = 0i64;
                for offset in 0..window {
                    let date = start + Duration::days(offset);
                    if date < self.quarter_start {
                        if trailing.contains(&date) {
                            trailing_count += 1;
                        }
                    } else if let Some(var) = model.night_var(si, date) {
                        vars.push(var);
                    }
                }
                if !vars.is_empty() {
                    let upper = (max as i64 - trailing_count).max(0);
                    if (vars.len() as i64) > upper {
                        model.constraints.push(Constraint::SumInRange {
                            label: format!("max consecutive {} {start}", staff.identifier),
                            vars,
                            lower: 0,
                            upper,
                        });
                    }
                }
                start += Duration::days(1);
            }
        }
    }

    fn add_min_consecutive_constraints(&self, model: &mut ScheduleModel) {
        for (si, staff) in self.staff.iter().enumerate() {
            let k = staff.night_min_consecutive;
            if k < 2 {
                continue;
            }
            let trailing = model.trailing_nights.get(&si).cloned().unwrap_or_default();
            let night_dates: Vec<NaiveDate> = model
                .night_index
                .range((si, NaiveDate::MIN)..=(si, NaiveDate::MAX))
                .map(|((_, date), _)| *date)
                .collect();

            if k == 2 {
                for &date in &night_dates {
                    let previous_day = date - Duration::days(1);
                    if trailing.contains(&previous_day) {
                        continue;
                    }
                    let x = model.night_var(si, date).expect("night var exists");
                    let mut literals = vec![Lit::Neg(x)];
                    if let Some(prev_var) = model.night_var(si, previous_day) {
                        literals.push(Lit::Pos(prev_var));
                    }
                    if let Some(next_var) = model.night_var(si, date + Duration::days(1)) {
                        literals.push(Lit::Pos(next_var));
                    }
                    model.constraints.push(Constraint::Clause {
                        label: format!("min consecutive {} {date}", staff.identifier),
                        literals,
                    });
                }
                continue;
            }

            // k >= 3: every assigned night must sit in a fully-assigned
            // window of length k (trailing prefix days count as assigned).
            let mut windows_by_date: BTreeMap<NaiveDate, Vec<VarId>> = BTreeMap::new();
            let first_start = self.quarter_start - Duration::days(k as i64 - 1);
            let last_start = model.quarter_end - Duration::days(k as i64 - 1);
            let mut start = first_start;
            while start <= last_start {
                let mut day_vars = Vec::new();
                let mut valid = true;
                for offset in 0..k as i64 {
                    let date = start + Duration::days(offset);
                    if date < self.quarter_start {
                        if !trailing.contains(&date) {
                            valid = false;
                            break;
                        }
                    } else if let Some(var) = model.night_var(si, date) {
                        day_vars.push(var);
                    } else {
                        valid = false;
                        break;
                    }
                }
                if valid && !day_vars.is_empty() {
                    let var = Self::new_var(model);
                    model.constraints.push(Constraint::AndEquality {
                        label: format!("window linkage {} {start}", staff.identifier),
                        target: var,
                        operands: day_vars.iter().map(|v| Lit::Pos(*v)).collect(),
                    });
                    model.windows.push(NightWindow { var, day_vars });
                    for offset in 0..k as i64 {
                        let date = start + Duration::days(offset);
                        if date >= self.quarter_start {
                            windows_by_date.entry(date).or_default().push(var);
                        }
                    }
                }
                start += Duration::days(1);
            }

            for &date in &night_dates {
                if trailing.contains(&(date - Duration::days(1))) {
                    continue;
                }
                let x = model.night_var(si, date).expect("night var exists");
                let mut literals = vec![Lit::Neg(x)];
                literals.extend(
                    windows_by_date
                        .get(&date)
                        .into_iter()
                        .flatten()
                        .map(|v| Lit::Pos(*v)),
                );
                model.constraints.push(Constraint::Clause {
                    label: format!("min consecutive {} {date}", staff.identifier),
                    literals,
                });
            }
        }
    }

    fn add_department_constraints(&self, model: &mut ScheduleModel) {
        for (si, first) in self.staff.iter().enumerate() {
            if !first.department.is_restricted() || !first.night_possible {
                continue;
            }
            for (sj, second) in self.staff.iter().enumerate().skip(si + 1) {
                if second.department != first.department || !second.night_possible {
                    continue;
                }
                for date in shared::time::quarter_dates(self.quarter_start) {
                    let a = model.night_var(si, date);
                    let b = model.night_var(sj, date);
                    if let (Some(a), Some(b)) = (a, b) {
                        model.constraints.push(Constraint::SumInRange {
                            label: format!(
                                "department overlap {}/{} {date}",
                                first.identifier, second.identifier
                            ),
                            vars: vec![a, b],
                            lower: 0,
                            upper: 1,
                        });
                    }
                    let next = date + Duration::days(1);
                    for (x, y) in [
                        (model.night_var(si, date), model.night_var(sj, next)),
                        (model.night_var(sj, date), model.night_var(si, next)),
                    ] {
                        if let (Some(x), Some(y)) = (x, y) {
                            model.constraints.push(Constraint::SumInRange {
                                label: format!(
                                    "department consecutive {}/{} {date}",
                                    first.identifier, second.identifier
                                ),
                                vars: vec![x, y],
                                lower: 0,
                                upper: 1,
                            });
                        }
                    }
                }
            }
        }
    }

    fn add_participation_constraints(&self, model: &mut ScheduleModel) {
        let shifts = model.shifts.clone();
        for (si, staff) in self.staff.iter().enumerate() {
            if staff.role != Role::Intern {
                let weekend_vars: Vec<VarId> = shifts
                    .iter()
                    .enumerate()
                    .filter(|(_, shift)| shift.is_weekend_shift())
                    .filter_map(|(shi, _)| model.assign_var(si, shi))
                    .collect();
                if !weekend_vars.is_empty() {
                    let upper = weekend_vars.len() as i64;
                    model.constraints.push(Constraint::SumInRange {
                        label: format!("weekend participation {}", staff.identifier),
                        vars: weekend_vars,
                        lower: 1,
                        upper,
                    });
                }
            }

            if staff.night_possible
                && staff.allowed_night_weekdays() >= staff.night_min_consecutive
            {
                let night_vars: Vec<VarId> = model
                    .night_index
                    .range((si, NaiveDate::MIN)..=(si, NaiveDate::MAX))
                    .map(|(_, v)| *v)
                    .collect();
                if !night_vars.is_empty() {
                    let upper = night_vars.len() as i64;
                    model.constraints.push(Constraint::SumInRange {
                        label: format!("night participation {}", staff.identifier),
                        vars: night_vars,
                        lower: 1,
                        upper,
                    });
                }
            }
        }
    }

    fn build_objective(&self, model: &mut ScheduleModel) {
        let shifts = model.shifts.clone();
        let quarter_days = QUARTER_DAYS as u32;
        let mut expressions = Vec::new();

        for (si, staff) in self.staff.iter().enumerate() {
            let available = self.calendar.available_days(&staff.identifier, quarter_days);
            let multiplier = person_multiplier(staff.weekly_hours, available, quarter_days);
            let delta = self
                .previous
                .map(|p| p.delta_for(&staff.identifier))
                .unwrap_or(0.0);

            let mut terms = Vec::new();
            let mut night_terms = Vec::new();
            for (shi, shift) in shifts.iter().enumerate() {
                let Some(var) = model.assign_var(si, shi) else {
                    continue;
                };
                if shift.is_weekend_shift() {
                    terms.push((var, 2 * multiplier));
                } else {
                    terms.push((var, 2 * multiplier));
                    night_terms.push((var, 2 * multiplier));
                }
            }
            if staff.role != Role::Azubi {
                for ((owner, _date), var) in model.paired_assigned_index.iter() {
                    if *owner == si {
                        terms.push((*var, -multiplier));
                        night_terms.push((*var, -multiplier));
                    }
                }
            }

            expressions.push(PersonExpression {
                staff_identifier: staff.identifier.clone(),
                terms,
                night_terms,
                offset: carry_forward_offset(delta),
                multiplier,
            });
        }

        let mut groups = Vec::new();
        for role in [Role::Tfa, Role::Azubi, Role::Intern] {
            let members: Vec<usize> = self
                .staff
                .iter()
                .enumerate()
                .filter(|(_, s)| {
                    s.role == role && (role != Role::Intern || s.night_possible)
                })
                .map(|(si, _)| si)
                .collect();
            if members.len() < 2 {
                continue;
            }
            let deltas: Vec<f64> = members
                .iter()
                .map(|si| {
                    self.previous
                        .map(|p| p.delta_for(&self.staff[*si].identifier))
                        .unwrap_or(0.0)
                })
                .collect();
            let spread = deltas.iter().cloned().fold(f64::MIN, f64::max)
                - deltas.iter().cloned().fold(f64::MAX, f64::min);
            groups.push(GroupSpec {
                label: role.as_str().to_string(),
                members,
                threshold: group_threshold(spread.max(0.0)),
                include_night_range: role != Role::Intern,
            });
        }

        model.objective = ObjectiveSpec {
            expressions,
            groups,
        };
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::entities::Vacation;
    use crate::domain::test_fixtures::*;

    fn build(staff: &[Staff], vacations: &[Vacation]) -> ScheduleModel {
        let start = date(2026, 4, 1);
        let calendar =
            VacationCalendar::build(staff, vacations, start, shared::time::quarter_end(start))
                .unwrap();
        ModelBuilder::new(staff, start, &calendar, None).build()
    }

    #[test]
    fn no_variables_for_blocked_or_ineligible_cells() {
        let staff = vec![tfa("T1"), azubi("AZ1")];
        let vacations = vec![Vacation::new("T1", date(2026, 4, 6), date(2026, 4, 7)).unwrap()];
        let model = build(&staff, &vacations);

        let t1 = model.staff_index("T1").unwrap();
        let az1 = model.staff_index("AZ1").unwrap();

        // Vacation days carry no variables
        assert!(model.night_var(t1, date(2026, 4, 6)).is_none());
        assert!(model.night_var(t1, date(2026, 4, 8)).is_some());
        // The Azubi is not night capable
        assert!(model.night_var(az1, date(2026, 4, 8)).is_none());
        // TFA cannot take the Azubi Saturday slot
        let sa_1019 = model.shift_index(date(2026, 4, 4), shared::ShiftType::Saturday1019).unwrap();
        assert!(model.assign_var(t1, sa_1019).is_none());
        assert!(model.assign_var(az1, sa_1019).is_some());
    }

    #[test]
    fn model_construction_is_deterministic() {
        let staff = vec![tfa("T2"), tfa("T1"), azubi("AZ1"), intern("IN1")];
        let first = build(&staff, &[]);
        let second = build(&staff, &[]);

        // Staff are ordered by identifier regardless of input order
        assert_eq!(first.staff_order, vec!["AZ1", "IN1", "T1", "T2"]);
        assert_eq!(first.staff_order, second.staff_order);
        assert_eq!(first.var_count(), second.var_count());
        assert_eq!(first.constraint_count(), second.constraint_count());
    }

    #[test]
    fn check_flags_an_empty_schedule_as_uncovered() {
        let staff = vec![tfa("T1"), tfa("T2"), azubi("AZ1")];
        let model = build(&staff, &[]);
        let empty = q2_2026_schedule();
        let candidate = model.candidate_from_schedule(&empty).unwrap();

        let violations = model.check(&candidate);
        assert!(violations.iter().any(|v| v.starts_with("night coverage")));
        assert!(violations.iter().any(|v| v.starts_with("weekend coverage")));
    }

    #[test]
    fn check_flags_double_bookings_and_solo_violations() {
        let staff = vec![tfa("T1"), tfa("T2"), azubi("AZ1")];
        let model = build(&staff, &[]);

        let mut schedule = q2_2026_schedule();
        // T1 double-booked on Saturday: weekend shift plus night
        assign(&mut schedule, (2026, 4, 4), shared::ShiftType::Saturday1021, "T1", false);
        assign_night(&mut schedule, (2026, 4, 4), "T1", false);
        // T1 (solo-only) shares a regular night with T2
        assign_night(&mut schedule, (2026, 4, 7), "T1", true);
        assign_night(&mut schedule, (2026, 4, 7), "T2", true);

        let candidate = model.candidate_from_schedule(&schedule).unwrap();
        let violations = model.check(&candidate);
        assert!(violations.iter().any(|v| v.starts_with("same-day overlap T1")));
        assert!(violations.iter().any(|v| v.starts_with("solo night")));
    }

    #[test]
    fn schedules_using_blocked_cells_are_rejected() {
        let staff = vec![tfa("T1")];
        let vacations = vec![Vacation::new("T1", date(2026, 4, 7), date(2026, 4, 7)).unwrap()];
        let model = build(&staff, &vacations);

        let mut schedule = q2_2026_schedule();
        assign_night(&mut schedule, (2026, 4, 7), "T1", false);
        assert!(model.candidate_from_schedule(&schedule).is_err());
    }

    #[test]
    fn intern_group_only_counts_night_capable_members(){
        let mut desk_intern = intern("IN3");
        desk_intern.night_possible = false;
        let staff = vec![intern("IN1"), intern("IN2"), desk_intern, tfa("T1"), tfa("T2")];
        let model = build(&staff, &[]);

        let intern_group = model
            .objective
            .groups
            .iter()
            .find(|g| g.label == "Intern")
            .unwrap();
        assert_eq!(intern_group.members.len(), 2);
        assert!(!intern_group.include_night_range);
        assert_eq!(intern_group.threshold, 300);

        let tfa_group = model.objective.groups.iter().find(|g| g.label == "TFA").unwrap();
        assert!(tfa_group.include_night_range);
    }
}
