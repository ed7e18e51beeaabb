use std::collections::BTreeSet;
use std::io::Read;
use std::path::Path;

use chrono::NaiveDate;
use serde::Deserialize;
use shared::{Department, DomainError, DomainResult, Role};

use crate::domain::entities::{MonthDay, Staff, Vacation};

/// Raw staff CSV row; every field is parsed explicitly so malformed data
/// fails fast with row context, before the core ever sees it.
#[derive(Debug, Deserialize)]
struct StaffRow {
    name: String,
    identifier: String,
    adult: String,
    hours: String,
    beruf: String,
    reception: String,
    nd_possible: String,
    nd_alone: String,
    #[serde(default)]
    nd_max_consecutive: String,
    #[serde(default)]
    nd_min_consecutive: String,
    #[serde(default)]
    nd_exceptions: String,
    #[serde(default)]
    abteilung: String,
    #[serde(default)]
    birthday: String,
}

#[derive(Debug, Deserialize)]
struct VacationRow {
    identifier: String,
    start_date: String,
    end_date: String,
}

fn row_error(row: usize, message: impl std::fmt::Display) -> DomainError {
    DomainError::InvalidInput(format!("staff CSV row {row}: {message}"))
}

fn parse_bool(value: &str, field: &str, row: usize) -> DomainResult<bool> {
    match value.trim().to_ascii_lowercase().as_str() {
        "true" => Ok(true),
        "false" => Ok(false),
        other => Err(row_error(row, format!("{field} must be true/false, got '{other}'"))),
    }
}

fn parse_role(value: &str, row: usize) -> DomainResult<Role> {
    match value {
        "TFA" => Ok(Role::Tfa),
        "Azubi" => Ok(Role::Azubi),
        "Intern" => Ok(Role::Intern),
        other => Err(row_error(row, format!("beruf must be TFA/Azubi/Intern, got '{other}'"))),
    }
}

fn parse_department(value: &str, row: usize) -> DomainResult<Department> {
    match value.trim() {
        "op" => Ok(Department::Op),
        "station" => Ok(Department::Station),
        "other" | "" => Ok(Department::Other),
        other => Err(row_error(
            row,
            format!("abteilung must be op/station/other or blank, got '{other}'"),
        )),
    }
}

fn parse_exceptions(value: &str, row: usize) -> DomainResult<BTreeSet<u8>> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return Ok(BTreeSet::new());
    }
    let weekdays: Vec<u8> = serde_json::from_str(trimmed)
        .map_err(|e| row_error(row, format!("nd_exceptions must be a JSON array: {e}")))?;
    for weekday in &weekdays {
        if !(1..=7).contains(weekday) {
            return Err(row_error(row, format!("nd_exceptions weekday {weekday} outside 1..=7")));
        }
    }
    Ok(weekdays.into_iter().collect())
}

/// Parse the staff roster from CSV (columns per the legacy upload format).
pub fn parse_staff_csv<R: Read>(reader: R) -> DomainResult<Vec<Staff>> {
    let mut csv_reader = csv::Reader::from_reader(reader);
    let mut staff_list = Vec::new();

    for (index, record) in csv_reader.deserialize::<StaffRow>().enumerate() {
        let row = index + 2; // header is row 1
        let record = record.map_err(|e| row_error(row, e))?;

        let role = parse_role(&record.beruf, row)?;
        let hours: u32 = record
            .hours
            .trim()
            .parse()
            .map_err(|_| row_error(row, format!("hours must be a positive integer, got '{}'", record.hours)))?;

        let night_max_consecutive = match record.nd_max_consecutive.trim() {
            "" => None,
            value => Some(value.parse::<u32>().map_err(|_| {
                row_error(row, format!("nd_max_consecutive must be an integer, got '{value}'"))
            })?),
        };
        let night_min_consecutive = match record.nd_min_consecutive.trim() {
            "" => Staff::default_min_consecutive(role),
            value => value.parse::<u32>().map_err(|_| {
                row_error(row, format!("nd_min_consecutive must be an integer, got '{value}'"))
            })?,
        };
        let birthday = match record.birthday.trim() {
            "" => None,
            value => Some(MonthDay::parse(value).map_err(|e| row_error(row, e))?),
        };

        let staff = Staff {
            identifier: record.identifier.trim().to_string(),
            name: record.name.trim().to_string(),
            role,
            adult: parse_bool(&record.adult, "adult", row)?,
            weekly_hours: hours,
            department: parse_department(&record.abteilung, row)?,
            reception_capable: parse_bool(&record.reception, "reception", row)?,
            night_possible: parse_bool(&record.nd_possible, "nd_possible", row)?,
            night_alone: parse_bool(&record.nd_alone, "nd_alone", row)?,
            night_max_consecutive,
            night_min_consecutive,
            night_exception_weekdays: parse_exceptions(&record.nd_exceptions, row)?,
            birthday,
        };
        staff.validate().map_err(|e| row_error(row, e))?;
        staff_list.push(staff);
    }

    Ok(staff_list)
}

pub fn load_staff_csv(path: impl AsRef<Path>) -> DomainResult<Vec<Staff>> {
    let file = std::fs::File::open(path)?;
    parse_staff_csv(file)
}

/// Parse vacations from CSV: `identifier, start_date, end_date` with ISO
/// dates, end inclusive.
pub fn parse_vacations_csv<R: Read>(reader: R) -> DomainResult<Vec<Vacation>> {
    let mut csv_reader = csv::Reader::from_reader(reader);
    let mut vacations = Vec::new();

    for (index, record) in csv_reader.deserialize::<VacationRow>().enumerate() {
        let row = index + 2;
        let record = record
            .map_err(|e| DomainError::InvalidInput(format!("vacation CSV row {row}: {e}")))?;

        let parse_date = |value: &str, field: &str| -> DomainResult<NaiveDate> {
            NaiveDate::parse_from_str(value.trim(), "%Y-%m-%d").map_err(|_| {
                DomainError::InvalidInput(format!(
                    "vacation CSV row {row}: {field} must be YYYY-MM-DD, got '{value}'"
                ))
            })
        };
        let start_date = parse_date(&record.start_date, "start_date")?;
        let end_date = parse_date(&record.end_date, "end_date")?;

        vacations.push(
            Vacation::new(record.identifier.trim(), start_date, end_date).map_err(|e| {
                DomainError::InvalidInput(format!("vacation CSV row {row}: {e}"))
            })?,
        );
    }

    Ok(vacations)
}

pub fn load_vacations_csv(path: impl AsRef<Path>) -> DomainResult<Vec<Vacation>> {
    let file = std::fs::File::open(path)?;
    parse_vacations_csv(file)
}
