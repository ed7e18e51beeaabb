use std::collections::{BTreeMap, BTreeSet};
use std::time::Instant;

use chrono::{Datelike, Duration, NaiveDate, Weekday};
use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::SeedableRng;
use shared::{Role, ShiftType};

use crate::domain::entities::{Assignment, PreviousPlanContext, Schedule, Shift, Staff};
use crate::domain::model::{Candidate, ScheduleModel};
use crate::domain::rules::blocks::BLOCK_SPACING_DAYS;
use crate::domain::runs::consecutive_runs;

/// Result of one solve attempt series.
pub enum SearchOutcome {
    Feasible {
        schedule: Schedule,
        objective: i64,
    },
    Infeasible {
        reasons: Vec<String>,
    },
}

/// Target night-run lengths tried per restart.
const RUN_LENGTH_TARGETS: [u32; 5] = [4, 5, 3, 6, 2];
const MAX_ATTEMPTS: u64 = 10;
const MAX_IMPROVEMENT_MOVES: usize = 60;

/// Weekend slots are filled in order of how restrictive their
/// eligibility is; the flexible reception slot comes last.
fn slot_priority(shift_type: ShiftType) -> u8 {
    match shift_type {
        ShiftType::Saturday1019 => 0,
        ShiftType::Sunday82030 => 1,
        ShiftType::Sunday820 => 2,
        ShiftType::Sunday1022 => 3,
        ShiftType::Saturday1022 => 4,
        ShiftType::Saturday1021 => 5,
        _ => u8::MAX,
    }
}

/// The Saturday anchoring a weekend date's Sat/Sun pair.
fn weekend_unit_key(date: NaiveDate) -> NaiveDate {
    if date.weekday() == Weekday::Sun {
        date - Duration::days(1)
    } else {
        date
    }
}

/// Deterministic constructive backend: weekend rotation by lowest
/// adjusted load, night coverage by duty runs, then bounded improvement
/// moves, all verified against the constraint model.
pub struct SearchEngine<'a> {
    staff: Vec<&'a Staff>,
    model: &'a ScheduleModel,
    previous: Option<&'a PreviousPlanContext>,
    deadline: Instant,
    seed: u64,
    /// per staff: dates with a night variable
    night_dates: Vec<BTreeSet<NaiveDate>>,
    /// per staff: whether any weekend variable exists
    has_weekend_var: Vec<bool>,
    min_anchor_run: u32,
}

struct Construction {
    /// shift index -> assigned staff index (weekend slots)
    slot_holder: BTreeMap<usize, usize>,
    /// night date -> crew (staff indices)
    night_plan: BTreeMap<NaiveDate, Vec<usize>>,
    /// scaled adjusted load per staff
    loads: Vec<i64>,
    weekend_dates: Vec<BTreeSet<NaiveDate>>,
    night_count: Vec<u32>,
    last_block_start: Vec<Option<NaiveDate>>,
    /// nights pinned by forced continuation of the previous quarter
    forced_dates: Vec<BTreeSet<NaiveDate>>,
    /// tie-break rank per staff, permuted on restarts
    rank: Vec<usize>,
}

#[derive(Clone, Copy)]
enum RunMode {
    Solo,
    /// Sun+Mon vet-present pair worked solo by pair-requiring staff
    VetPair,
    /// two pair-requiring staff covering a regular-night window together
    Crew { partner: usize },
}

struct RunChoice {
    staff: usize,
    mode: RunMode,
    length: u32,
    urgency: u8,
}

impl<'a> SearchEngine<'a> {
    pub fn new(
        staff_list: &'a [Staff],
        model: &'a ScheduleModel,
        previous: Option<&'a PreviousPlanContext>,
        deadline: Instant,
        seed: u64,
    ) -> Self {
        let mut staff: Vec<&Staff> = staff_list.iter().collect();
        staff.sort_by(|a, b| a.identifier.cmp(&b.identifier));

        let night_dates: Vec<BTreeSet<NaiveDate>> = (0..staff.len())
            .map(|si| {
                model
                    .night_index
                    .range((si, NaiveDate::MIN)..=(si, NaiveDate::MAX))
                    .map(|((_, date), _)| *date)
                    .collect()
            })
            .collect();
        let has_weekend_var: Vec<bool> = (0..staff.len())
            .map(|si| {
                model
                    .shifts
                    .iter()
                    .enumerate()
                    .any(|(shi, shift)| {
                        shift.is_weekend_shift() && model.assign_var(si, shi).is_some()
                    })
            })
            .collect();
        let min_anchor_run = staff
            .iter()
            .filter(|s| s.role != Role::Azubi && s.night_possible)
            .map(|s| s.night_min_consecutive)
            .min()
            .unwrap_or(2);

        Self {
            staff,
            model,
            previous,
            deadline,
            seed,
            night_dates,
            has_weekend_var,
            min_anchor_run,
        }
    }

    pub fn run(&self) -> SearchOutcome {
        let mut reasons: BTreeSet<String> = BTreeSet::new();

        for attempt in 0..MAX_ATTEMPTS {
            if attempt > 0 && Instant::now() >= self.deadline {
                break;
            }
            let target = RUN_LENGTH_TARGETS[(attempt % RUN_LENGTH_TARGETS.len() as u64) as usize];
            match self.construct(attempt, target) {
                Ok(schedule) => match self.model.candidate_from_schedule(&schedule) {
                    Ok(candidate) => {
                        let violations = self.model.check(&candidate);
                        if violations.is_empty() {
                            let (schedule, objective) = self.improve(schedule, candidate);
                            return SearchOutcome::Feasible {
                                schedule,
                                objective,
                            };
                        }
                        tracing::debug!(
                            attempt,
                            violations = violations.len(),
                            "constructed schedule failed the model check"
                        );
                        reasons.extend(violations);
                    }
                    Err(error) => {
                        reasons.insert(error.to_string());
                    }
                },
                Err(reason) => {
                    reasons.insert(reason);
                }
            }
        }

        SearchOutcome::Infeasible {
            reasons: reasons.into_iter().collect(),
        }
    }

    fn multiplier(&self, si: usize) -> i64 {
        self.model.objective.expressions[si].multiplier
    }

    fn construct(&self, attempt: u64, target: u32) -> Result<Schedule, String> {
        let n = self.staff.len();
        let mut state = Construction {
            slot_holder: BTreeMap::new(),
            night_plan: BTreeMap::new(),
            loads: self
                .model
                .objective
                .expressions
                .iter()
                .map(|e| e.offset)
                .collect(),
            weekend_dates: vec![BTreeSet::new(); n],
            night_count: vec![0; n],
            last_block_start: vec![None; n],
            forced_dates: vec![BTreeSet::new(); n],
            rank: (0..n).collect(),
        };
        if attempt > 0 {
            let mut rng = StdRng::seed_from_u64(self.seed.wrapping_add(attempt));
            state.rank.shuffle(&mut rng);
        }

        for si in 0..n {
            if let Some(trailing) = self.model.trailing_nights_for(si) {
                if let Some(run) = consecutive_runs(trailing).last() {
                    state.last_block_start[si] = Some(run.start);
                }
            }
        }

        self.plan_forced_continuations(&mut state)?;
        self.fill_weekends(&mut state)?;
        self.repair_weekend_participation(&mut state)?;
        self.fill_nights(&mut state, target)?;
        self.attach_azubi_riders(&mut state)?;

        Ok(self.to_schedule(&state))
    }

    /// Previous-quarter runs shorter than the minimum must continue into
    /// this quarter.
    fn plan_forced_continuations(&self, state: &mut Construction) -> Result<(), String> {
        let start = self.model.quarter_start;
        for (si, staff) in self.staff.iter().enumerate() {
            let Some(trailing) = self.model.trailing_nights_for(si) else {
                continue;
            };
            let runs = consecutive_runs(trailing);
            let Some(run) = runs.last() else {
                continue;
            };
            if run.end != start - Duration::days(1) {
                continue;
            }
            let done = run.length_days();
            let minimum = staff.night_min_consecutive;
            if done >= minimum {
                continue;
            }
            let needed = minimum - done;
            if let Some(max) = staff.night_max_consecutive {
                if done + needed > max {
                    return Err(format!(
                        "{} ended the previous quarter mid-run and cannot legally continue",
                        staff.identifier
                    ));
                }
            }
            for offset in 0..needed {
                let date = start + Duration::days(offset as i64);
                if !self.night_dates[si].contains(&date) {
                    return Err(format!(
                        "{} must continue a night run into {date} but is unavailable",
                        staff.identifier
                    ));
                }
                if state.night_plan.contains_key(&date) {
                    return Err(format!(
                        "two staff are forced to continue runs into {date}"
                    ));
                }
                state.night_plan.insert(date, vec![si]);
                state.forced_dates[si].insert(date);
                state.night_count[si] += 1;
                state.loads[si] += 2 * self.multiplier(si);
            }
        }
        Ok(())
    }

    fn weekend_candidate_ok(
        &self,
        state: &Construction,
        si: usize,
        date: NaiveDate,
        unit_used: &BTreeSet<usize>,
    ) -> bool {
        if unit_used.contains(&si) {
            return false;
        }
        let before = date - Duration::days(1);
        let after = date + Duration::days(1);
        if state.weekend_dates[si].contains(&before) || state.weekend_dates[si].contains(&after) {
            return false;
        }
        for day in [before, date, after] {
            if state.forced_dates[si].contains(&day) {
                return false;
            }
        }
        if let Some(previous) = self.previous {
            if previous.last_trailing_night(&self.staff[si].identifier) == Some(before) {
                return false;
            }
        }
        true
    }

    fn fill_weekends(&self, state: &mut Construction) -> Result<(), String> {
        // Group weekend slots per Sat/Sun pair
        let mut units: BTreeMap<NaiveDate, Vec<(usize, Shift)>> = BTreeMap::new();
        for (shi, shift) in self.model.shifts.iter().enumerate() {
            if shift.is_weekend_shift() {
                units
                    .entry(weekend_unit_key(shift.date))
                    .or_default()
                    .push((shi, *shift));
            }
        }

        for slots in units.values_mut() {
            slots.sort_by_key(|(_, shift)| (slot_priority(shift.shift_type), shift.date));
            let mut unit_used: BTreeSet<usize> = BTreeSet::new();

            for (shi, shift) in slots.iter() {
                let chosen = self
                    .model
                    .slot_candidates(*shi)
                    .iter()
                    .copied()
                    .filter(|si| self.weekend_candidate_ok(state, *si, shift.date, &unit_used))
                    .min_by_key(|si| (state.loads[*si], state.rank[*si], *si));

                let Some(si) = chosen else {
                    return Err(format!(
                        "no eligible staff for weekend shift {} on {}",
                        shift.shift_type, shift.date
                    ));
                };
                state.slot_holder.insert(*shi, si);
                state.weekend_dates[si].insert(shift.date);
                unit_used.insert(si);
                state.loads[si] += 2 * self.multiplier(si);
            }
        }
        Ok(())
    }

    /// Everyone with weekend eligibility must carry at least one weekend
    /// shift; steal a slot from the most-loaded multi-slot holder.
    fn repair_weekend_participation(&self, state: &mut Construction) -> Result<(), String> {
        for si in 0..self.staff.len() {
            if self.staff[si].role == Role::Intern || !self.has_weekend_var[si] {
                continue;
            }
            if !state.weekend_dates[si].is_empty() {
                continue;
            }

            let mut moved = false;
            let holders: Vec<(usize, usize)> =
                state.slot_holder.iter().map(|(shi, holder)| (*shi, *holder)).collect();
            for (shi, holder) in holders {
                if state.weekend_dates[holder].len() < 2 {
                    continue;
                }
                if self.model.assign_var(si, shi).is_none() {
                    continue;
                }
                let shift = self.model.shifts[shi];
                let unit = weekend_unit_key(shift.date);
                let unit_used: BTreeSet<usize> = state
                    .slot_holder
                    .iter()
                    .filter(|(other, _)| {
                        weekend_unit_key(self.model.shifts[**other].date) == unit
                    })
                    .map(|(_, who)| *who)
                    .collect();
                if !self.weekend_candidate_ok(state, si, shift.date, &unit_used) {
                    continue;
                }
                state.slot_holder.insert(shi, si);
                state.weekend_dates[holder].remove(&shift.date);
                state.weekend_dates[si].insert(shift.date);
                state.loads[holder] -= 2 * self.multiplier(holder);
                state.loads[si] += 2 * self.multiplier(si);
                moved = true;
                break;
            }
            if !moved {
                return Err(format!(
                    "cannot give {} a weekend shift (participation)",
                    self.staff[si].identifier
                ));
            }
        }
        Ok(())
    }

    /// How many consecutive nights starting at `from` the staff member
    /// could work, considering availability and weekend adjacency.
    fn night_stretch(&self, state: &Construction, si: usize, from: NaiveDate, cap: u32) -> u32 {
        let mut length = 0;
        let mut date = from;
        while length < cap && date <= self.model.quarter_end {
            if !self.night_dates[si].contains(&date) {
                break;
            }
            let adjacent = [date - Duration::days(1), date, date + Duration::days(1)];
            if adjacent.iter().any(|d| state.weekend_dates[si].contains(d)) {
                break;
            }
            length += 1;
            date += Duration::days(1);
        }
        length
    }

    fn spacing_ok(&self, state: &Construction, si: usize, start: NaiveDate) -> bool {
        state.last_block_start[si]
            .map(|block| (start - block).num_days() >= BLOCK_SPACING_DAYS)
            .unwrap_or(true)
    }

    fn department_clash(&self, state: &Construction, si: usize, date: NaiveDate) -> bool {
        let department = self.staff[si].department;
        if !department.is_restricted() {
            return false;
        }
        for day in [date - Duration::days(1), date] {
            if let Some(crew) = state.night_plan.get(&day) {
                if crew
                    .iter()
                    .any(|other| *other != si && self.staff[*other].department == department)
                {
                    return true;
                }
            }
        }
        false
    }

    /// Clamp a run length so the quarter tail never strands a gap shorter
    /// than the shortest legal run.
    fn adjust_for_tail(
        &self,
        length: u32,
        stretch: u32,
        minimum: u32,
        maximum: u32,
        start: NaiveDate,
    ) -> Option<u32> {
        let mut length = length;
        let end = start + Duration::days(length as i64 - 1);
        let remaining = (self.model.quarter_end - end).num_days();
        if remaining > 0 && (remaining as u32) < self.min_anchor_run {
            let extended = length + remaining as u32;
            if extended <= stretch && extended <= maximum {
                length = extended;
            } else if length > minimum {
                length -= 1;
            } else {
                return None;
            }
        }
        Some(length)
    }

    fn run_choice_for(
        &self,
        state: &Construction,
        si: usize,
        cur: NaiveDate,
        target: u32,
    ) -> Option<RunChoice> {
        let staff = self.staff[si];
        if staff.role == Role::Azubi || !staff.night_possible {
            return None;
        }
        if !self.spacing_ok(state, si, cur) {
            return None;
        }
        if self.department_clash(state, si, cur) {
            return None;
        }

        let minimum = staff.night_min_consecutive;
        let maximum = staff.night_max_consecutive.unwrap_or(u32::MAX);
        let intern_headroom = if staff.role == Role::Intern {
            9u32.saturating_sub(state.night_count[si])
        } else {
            u32::MAX
        };
        let cap = maximum.min(intern_headroom);
        if cap < minimum {
            return None;
        }

        let urgency = if staff.role == Role::Intern && state.night_count[si] < 6 {
            0
        } else if state.night_count[si] == 0
            && staff.allowed_night_weekdays() >= minimum
            && !self.night_dates[si].is_empty()
        {
            1
        } else {
            2
        };

        if staff.night_alone {
            // Scan slightly past the target so tail adjustment can extend
            let scan = cap.min(target.max(minimum).saturating_add(2));
            let stretch = self.night_stretch(state, si, cur, scan);
            if stretch < minimum {
                return None;
            }
            let length = stretch.min(target.max(minimum)).min(cap);
            let length = self.adjust_for_tail(length, stretch, minimum, cap, cur)?;
            return Some(RunChoice {
                staff: si,
                mode: RunMode::Solo,
                length,
                urgency,
            });
        }

        // Pair-requiring staff: Sun+Mon vet pair worked solo...
        if cur.weekday() == Weekday::Sun && minimum <= 2 && cap >= 2 {
            let stretch = self.night_stretch(state, si, cur, 2);
            if stretch >= 2 {
                let length = self.adjust_for_tail(2, stretch, 2, cap.min(2), cur)?;
                if length == 2 {
                    return Some(RunChoice {
                        staff: si,
                        mode: RunMode::VetPair,
                        length: 2,
                        urgency,
                    });
                }
            }
        }

        // ...or a crewed window on regular nights (Tue..Sat)
        let weekday = cur.weekday();
        let days_to_saturday = match weekday {
            Weekday::Tue => 4,
            Weekday::Wed => 3,
            Weekday::Thu => 2,
            Weekday::Fri => 1,
            _ => return None,
        } + 1;

        let mut best: Option<RunChoice> = None;
        for sj in 0..self.staff.len() {
            if sj == si {
                continue;
            }
            let partner = self.staff[sj];
            if partner.role == Role::Azubi || !partner.night_possible || partner.night_alone {
                continue;
            }
            if partner.department.is_restricted() && partner.department == staff.department {
                continue;
            }
            if !self.spacing_ok(state, sj, cur) || self.department_clash(state, sj, cur) {
                continue;
            }
            let pair_minimum = minimum.max(partner.night_min_consecutive);
            let partner_headroom = if partner.role == Role::Intern {
                9u32.saturating_sub(state.night_count[sj])
            } else {
                u32::MAX
            };
            let pair_cap = cap
                .min(partner.night_max_consecutive.unwrap_or(u32::MAX))
                .min(partner_headroom)
                .min(days_to_saturday);
            if pair_cap < pair_minimum {
                continue;
            }
            let scan = pair_cap.min(target.max(pair_minimum).saturating_add(2));
            let stretch = self
                .night_stretch(state, si, cur, scan)
                .min(self.night_stretch(state, sj, cur, scan));
            if stretch < pair_minimum {
                continue;
            }
            let length = self.adjust_for_tail(
                stretch.min(target.max(pair_minimum)),
                stretch,
                pair_minimum,
                pair_cap,
                cur,
            );
            let Some(length) = length else { continue };
            let candidate = RunChoice {
                staff: si,
                mode: RunMode::Crew { partner: sj },
                length,
                urgency,
            };
            let better = match &best {
                None => true,
                Some(current) => {
                    let current_partner = match current.mode {
                        RunMode::Crew { partner } => partner,
                        _ => usize::MAX,
                    };
                    (state.loads[sj], state.rank[sj], sj)
                        < (
                            state.loads[current_partner],
                            state.rank[current_partner],
                            current_partner,
                        )
                }
            };
            if better {
                best = Some(candidate);
            }
        }
        best
    }

    fn fill_nights(&self, state: &mut Construction, target: u32) -> Result<(), String> {
        let mut cur = self.model.quarter_start;
        while cur <= self.model.quarter_end {
            if state.night_plan.contains_key(&cur) {
                cur += Duration::days(1);
                continue;
            }

            let choice = (0..self.staff.len())
                .filter_map(|si| self.run_choice_for(state, si, cur, target))
                .min_by_key(|choice| {
                    (
                        choice.urgency,
                        state.loads[choice.staff],
                        state.rank[choice.staff],
                        choice.staff,
                    )
                });

            let Some(choice) = choice else {
                return Err(format!("no staff available to cover the night of {cur}"));
            };

            let si = choice.staff;
            let crew: Vec<usize> = match choice.mode {
                RunMode::Solo | RunMode::VetPair => vec![si],
                RunMode::Crew { partner } => {
                    let mut crew = vec![si, partner];
                    crew.sort_unstable();
                    crew
                }
            };

            for offset in 0..choice.length {
                let date = cur + Duration::days(offset as i64);
                state.night_plan.insert(date, crew.clone());
            }
            for &member in &crew {
                state.night_count[member] += choice.length;
                state.last_block_start[member] = Some(cur);
                let weight = if crew.len() == 2 {
                    self.multiplier(member)
                } else {
                    2 * self.multiplier(member)
                };
                state.loads[member] += weight * choice.length as i64;
            }
            cur += Duration::days(choice.length as i64);
        }
        Ok(())
    }

    /// Night-capable Azubis ride vet-present nights as the second person,
    /// satisfying their minimum participation.
    fn attach_azubi_riders(&self, state: &mut Construction) -> Result<(), String> {
        for (si, staff) in self.staff.iter().enumerate() {
            if staff.role != Role::Azubi || !staff.night_possible {
                continue;
            }
            if staff.allowed_night_weekdays() < staff.night_min_consecutive
                || self.night_dates[si].is_empty()
            {
                continue;
            }

            let ride_length: u32 = if staff.night_max_consecutive == Some(1) { 1 } else { 2 };
            let mut placed = false;

            let mut sunday = self.model.quarter_start;
            while sunday.weekday() != Weekday::Sun {
                sunday += Duration::days(1);
            }
            'sundays: while sunday <= self.model.quarter_end {
                let days: Vec<NaiveDate> = (0..ride_length)
                    .map(|offset| sunday + Duration::days(offset as i64))
                    .collect();
                if days.iter().any(|d| *d > self.model.quarter_end) {
                    break;
                }
                if !self.spacing_ok(state, si, sunday) {
                    sunday += Duration::days(7);
                    continue;
                }
                for day in &days {
                    if !self.night_dates[si].contains(day) {
                        sunday += Duration::days(7);
                        continue 'sundays;
                    }
                    let adjacent = [*day - Duration::days(1), *day, *day + Duration::days(1)];
                    if adjacent.iter().any(|d| state.weekend_dates[si].contains(d)) {
                        sunday += Duration::days(7);
                        continue 'sundays;
                    }
                    let Some(crew) = state.night_plan.get(day) else {
                        sunday += Duration::days(7);
                        continue 'sundays;
                    };
                    if crew.len() != 1 {
                        sunday += Duration::days(7);
                        continue 'sundays;
                    }
                    if staff.department.is_restricted() {
                        let neighbors = [*day - Duration::days(1), *day, *day + Duration::days(1)];
                        for neighbor in neighbors {
                            if let Some(others) = state.night_plan.get(&neighbor) {
                                if others.iter().any(|o| {
                                    *o != si && self.staff[*o].department == staff.department
                                }) {
                                    sunday += Duration::days(7);
                                    continue 'sundays;
                                }
                            }
                        }
                    }
                }

                // Attach the rider and reweigh the now-paired anchors
                for day in &days {
                    let crew = state.night_plan.get_mut(day).expect("crew exists");
                    let anchor = crew[0];
                    crew.push(si);
                    crew.sort_unstable();
                    state.loads[anchor] -= self.multiplier(anchor);
                }
                state.night_count[si] += ride_length;
                state.last_block_start[si] = Some(sunday);
                state.loads[si] += 2 * self.multiplier(si) * ride_length as i64;
                placed = true;
                break;
            }

            if !placed {
                return Err(format!(
                    "cannot give {} a night shift (participation)",
                    staff.identifier
                ));
            }
        }
        Ok(())
    }

    fn to_schedule(&self, state: &Construction) -> Schedule {
        let mut schedule = Schedule::new(self.model.quarter_start, self.model.quarter_end);

        for (shi, si) in &state.slot_holder {
            let shift = self.model.shifts[*shi];
            schedule.assignments.push(Assignment::new(
                shift,
                self.staff[*si].identifier.clone(),
                false,
            ));
        }
        for (date, crew) in &state.night_plan {
            let shift = Shift::new(*date, ShiftType::night_for_weekday(date.weekday()));
            let paired = crew.len() >= 2;
            for si in crew {
                schedule.assignments.push(Assignment::new(
                    shift,
                    self.staff[*si].identifier.clone(),
                    paired,
                ));
            }
        }

        schedule.assignments.sort_by(|a, b| {
            (a.shift.date, a.shift.shift_type, a.staff_identifier.as_str()).cmp(&(
                b.shift.date,
                b.shift.shift_type,
                b.staff_identifier.as_str(),
            ))
        });
        schedule
    }

    /// Bounded local search: move weekend shifts from the most- to the
    /// least-loaded member of the widest group while the model accepts
    /// the move and the objective improves.
    fn improve(&self, schedule: Schedule, candidate: Candidate) -> (Schedule, i64) {
        let mut best_schedule = schedule;
        let mut best_objective = self.model.objective_value(&candidate);

        for _ in 0..MAX_IMPROVEMENT_MOVES {
            if Instant::now() >= self.deadline {
                break;
            }
            let Some((from, to)) = self.widest_group_extremes(&best_schedule) else {
                break;
            };
            let mut applied = false;

            let weekend_slots: Vec<usize> = best_schedule
                .assignments
                .iter()
                .enumerate()
                .filter(|(_, a)| {
                    a.shift.is_weekend_shift() && a.staff_identifier == self.staff[from].identifier
                })
                .map(|(index, _)| index)
                .collect();

            for index in weekend_slots {
                let shift = best_schedule.assignments[index].shift;
                let Some(shi) = self.model.shift_index(shift.date, shift.shift_type) else {
                    continue;
                };
                if self.model.assign_var(to, shi).is_none() {
                    continue;
                }
                let mut trial = best_schedule.clone();
                trial.assignments[index].staff_identifier = self.staff[to].identifier.clone();

                let Ok(trial_candidate) = self.model.candidate_from_schedule(&trial) else {
                    continue;
                };
                if !self.model.check(&trial_candidate).is_empty() {
                    continue;
                }
                let objective = self.model.objective_value(&trial_candidate);
                if objective < best_objective {
                    best_schedule = trial;
                    best_objective = objective;
                    applied = true;
                    break;
                }
            }

            if !applied {
                break;
            }
        }

        (best_schedule, best_objective)
    }

    /// The (max, min) member pair of the group with the widest adjusted
    /// range under the current schedule.
    fn widest_group_extremes(&self, schedule: &Schedule) -> Option<(usize, usize)> {
        let candidate = self.model.candidate_from_schedule(schedule).ok()?;
        let mut widest: Option<(i64, usize, usize)> = None;
        for group in &self.model.objective.groups {
            let values: Vec<(i64, usize)> = group
                .members
                .iter()
                .map(|&m| (self.model.objective.expressions[m].adjusted(&candidate), m))
                .collect();
            let max = values.iter().max()?;
            let min = values.iter().min()?;
            let range = max.0 - min.0;
            if range > 0 && widest.map(|(r, _, _)| range > r).unwrap_or(true) {
                widest = Some((range, max.1, min.1));
            }
        }
        widest.map(|(_, from, to)| (from, to))
    }
}
