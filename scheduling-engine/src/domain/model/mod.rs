pub mod builder;
pub mod constraints;
pub mod objective;

use std::collections::{BTreeMap, BTreeSet};

use chrono::{Duration, NaiveDate};
use shared::{DomainError, DomainResult, ShiftType};

use crate::domain::entities::{Schedule, Shift};

pub use builder::ModelBuilder;
pub use constraints::{Constraint, Lit, VarId};
pub use objective::{GroupSpec, ObjectiveSpec, PersonExpression, PRESENCE_SCALE, SCALE};

/// A full boolean assignment over the model's variables.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Candidate {
    values: Vec<bool>,
}

impl Candidate {
    pub fn new(var_count: usize) -> Self {
        Self {
            values: vec![false; var_count],
        }
    }

    pub fn value(&self, var: VarId) -> bool {
        self.values[var.0 as usize]
    }

    pub fn set(&mut self, var: VarId, value: bool) {
        self.values[var.0 as usize] = value;
    }
}

/// An all-assigned night window used for min-consecutive runs of three or
/// more; days before the quarter are trailing constants and omitted.
#[derive(Debug, Clone)]
pub(crate) struct NightWindow {
    pub var: VarId,
    /// in-quarter day variables the window spans
    pub day_vars: Vec<VarId>,
}

/// Solver-agnostic constraint model over one quarter's catalogue.
///
/// Decision variables exist only for eligible, non-blacked-out cells and
/// are created in a stable data-derived order (staff sorted by identifier,
/// shifts by date and type), so identical inputs produce identical models.
#[derive(Debug, Clone)]
pub struct ScheduleModel {
    pub quarter_start: NaiveDate,
    pub quarter_end: NaiveDate,
    /// staff identifiers, ascending
    pub staff_order: Vec<String>,
    /// the quarter catalogue, ascending by (date, shift type)
    pub shifts: Vec<Shift>,
    pub objective: ObjectiveSpec,

    pub(crate) var_count: usize,
    pub(crate) constraints: Vec<Constraint>,
    pub(crate) staff_lookup: BTreeMap<String, usize>,
    pub(crate) shift_lookup: BTreeMap<(NaiveDate, ShiftType), usize>,
    pub(crate) assign_index: BTreeMap<(usize, usize), VarId>,
    /// assign var of the (unique) night cell of a staff member and date
    pub(crate) night_index: BTreeMap<(usize, NaiveDate), VarId>,
    /// per night date: flag that exactly two staff are assigned
    pub(crate) night_two_index: BTreeMap<NaiveDate, VarId>,
    pub(crate) paired_index: BTreeMap<(usize, NaiveDate), VarId>,
    pub(crate) paired_assigned_index: BTreeMap<(usize, NaiveDate), VarId>,
    pub(crate) block_start_index: BTreeMap<(usize, NaiveDate), VarId>,
    pub(crate) windows: Vec<NightWindow>,
    /// trailing night constants from the previous quarter, per staff index
    pub(crate) trailing_nights: BTreeMap<usize, BTreeSet<NaiveDate>>,
    /// eligible staff per shift index
    pub(crate) slot_candidates: Vec<Vec<usize>>,
}

impl ScheduleModel {
    pub fn var_count(&self) -> usize {
        self.var_count
    }

    pub fn constraint_count(&self) -> usize {
        self.constraints.len()
    }

    pub fn staff_index(&self, identifier: &str) -> Option<usize> {
        self.staff_lookup.get(identifier).copied()
    }

    pub fn shift_index(&self, date: NaiveDate, shift_type: ShiftType) -> Option<usize> {
        self.shift_lookup.get(&(date, shift_type)).copied()
    }

    pub fn assign_var(&self, staff: usize, shift: usize) -> Option<VarId> {
        self.assign_index.get(&(staff, shift)).copied()
    }

    pub fn night_var(&self, staff: usize, date: NaiveDate) -> Option<VarId> {
        self.night_index.get(&(staff, date)).copied()
    }

    /// Staff indices eligible for a catalogue slot.
    pub fn slot_candidates(&self, shift: usize) -> &[usize] {
        &self.slot_candidates[shift]
    }

    pub fn trailing_nights_for(&self, staff: usize) -> Option<&BTreeSet<NaiveDate>> {
        self.trailing_nights.get(&staff)
    }

    /// Translate a schedule into a candidate assignment, deriving all
    /// auxiliary variables. Fails if the schedule uses a cell the model
    /// created no variable for (ineligible or blacked out).
    pub fn candidate_from_schedule(&self, schedule: &Schedule) -> DomainResult<Candidate> {
        let mut candidate = Candidate::new(self.var_count);

        for assignment in &schedule.assignments {
            let staff = self.staff_index(&assignment.staff_identifier).ok_or_else(|| {
                DomainError::UnknownStaff(assignment.staff_identifier.clone())
            })?;
            let shift = self
                .shift_index(assignment.shift.date, assignment.shift.shift_type)
                .ok_or_else(|| {
                    DomainError::InvalidInput(format!(
                        "shift {} on {} is outside the quarter catalogue",
                        assignment.shift.shift_type, assignment.shift.date
                    ))
                })?;
            let var = self.assign_var(staff, shift).ok_or_else(|| {
                DomainError::InvalidInput(format!(
                    "{} has no variable for {} on {} (ineligible or blacked out)",
                    assignment.staff_identifier, assignment.shift.shift_type, assignment.shift.date
                ))
            })?;
            candidate.set(var, true);
        }

        self.derive_auxiliaries(&mut candidate);
        Ok(candidate)
    }

    /// Recompute every auxiliary variable from the assign variables.
    pub fn derive_auxiliaries(&self, candidate: &mut Candidate) {
        // Per-night headcounts
        let mut headcounts: BTreeMap<NaiveDate, i64> = BTreeMap::new();
        for ((_, date), var) in &self.night_index {
            if candidate.value(*var) {
                *headcounts.entry(*date).or_insert(0) += 1;
            }
        }

        for (date, var) in &self.night_two_index {
            candidate.set(*var, headcounts.get(date).copied().unwrap_or(0) == 2);
        }

        for ((staff, date), var) in &self.paired_index {
            let assigned = self
                .night_var(*staff, *date)
                .map(|v| candidate.value(v))
                .unwrap_or(false);
            let two = headcounts.get(date).copied().unwrap_or(0) == 2;
            candidate.set(*var, assigned && two);
        }
        for ((staff, date), var) in &self.paired_assigned_index {
            let paired = self
                .paired_index
                .get(&(*staff, *date))
                .map(|v| candidate.value(*v))
                .unwrap_or(false);
            candidate.set(*var, paired);
        }

        for ((staff, date), var) in &self.block_start_index {
            let assigned = self
                .night_var(*staff, *date)
                .map(|v| candidate.value(v))
                .unwrap_or(false);
            let previous_day = *date - Duration::days(1);
            let previous_worked = self
                .night_var(*staff, previous_day)
                .map(|v| candidate.value(v))
                .unwrap_or_else(|| {
                    self.trailing_nights
                        .get(staff)
                        .is_some_and(|nights| nights.contains(&previous_day))
                });
            candidate.set(*var, assigned && !previous_worked);
        }

        for window in &self.windows {
            let all = window.day_vars.iter().all(|v| candidate.value(*v));
            candidate.set(window.var, all);
        }
    }

    /// All hard-constraint violations of a candidate, fairness bands
    /// included. Empty means feasible.
    pub fn check(&self, candidate: &Candidate) -> Vec<String> {
        let mut violated: Vec<String> = self
            .constraints
            .iter()
            .filter(|c| !c.is_satisfied(candidate))
            .map(|c| c.label().to_string())
            .collect();
        violated.extend(self.objective.range_violations(candidate));
        violated
    }

    pub fn objective_value(&self, candidate: &Candidate) -> i64 {
        self.objective.evaluate(candidate)
    }
}
