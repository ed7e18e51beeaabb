use std::collections::BTreeSet;

use chrono::{Duration, NaiveDate};

/// A maximal run of consecutive duty dates.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DutyRun {
    pub start: NaiveDate,
    pub end: NaiveDate,
}

impl DutyRun {
    pub fn length_days(&self) -> u32 {
        ((self.end - self.start).num_days() + 1) as u32
    }

    pub fn contains(&self, date: NaiveDate) -> bool {
        date >= self.start && date <= self.end
    }
}

/// Split a set of dates into maximal runs of consecutive days.
pub fn consecutive_runs(dates: &BTreeSet<NaiveDate>) -> Vec<DutyRun> {
    let mut runs = Vec::new();
    let mut current: Option<DutyRun> = None;

    for &date in dates {
        match current {
            Some(run) if date - run.end == Duration::days(1) => {
                current = Some(DutyRun { start: run.start, end: date });
            }
            Some(run) => {
                runs.push(run);
                current = Some(DutyRun { start: date, end: date });
            }
            None => current = Some(DutyRun { start: date, end: date }),
        }
    }
    if let Some(run) = current {
        runs.push(run);
    }
    runs
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(day: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2026, 4, day).unwrap()
    }

    #[test]
    fn splits_into_maximal_runs() {
        let dates = BTreeSet::from([date(1), date(2), date(3), date(5), date(9), date(10)]);
        let runs = consecutive_runs(&dates);
        assert_eq!(
            runs,
            vec![
                DutyRun { start: date(1), end: date(3) },
                DutyRun { start: date(5), end: date(5) },
                DutyRun { start: date(9), end: date(10) },
            ]
        );
        assert_eq!(runs[0].length_days(), 3);
        assert_eq!(runs[1].length_days(), 1);
        assert!(runs[2].contains(date(9)));
        assert!(!runs[2].contains(date(8)));
    }

    #[test]
    fn empty_input_yields_no_runs() {
        assert!(consecutive_runs(&BTreeSet::new()).is_empty());
    }
}
