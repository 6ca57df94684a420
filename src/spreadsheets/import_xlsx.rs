// src/spreadsheets/import_xlsx.rs
//
// Reads an uploaded permit workbook into a Dataset. Only the first
// worksheet is looked at; headers are matched by exact trimmed name.

use crate::domain::{Dataset, PermitRecord};
use crate::errors::ServerError;
use calamine::{Data, DataType, Reader, Xlsx};
use chrono::{NaiveDate, NaiveDateTime};
use std::io::Cursor;

pub const COL_PERMIT_NUMBER: &str = "Permit Number";
pub const COL_DEPARTMENT: &str = "Department";
pub const COL_RESPONSIBILITY_AREAS: &str = "Responsibility Areas";
pub const COL_WORKFLOW_STATE: &str = "Workflow State";
pub const COL_CREATED_DATE: &str = "Created Date";

const REQUIRED_COLUMNS: [&str; 4] = [
    COL_PERMIT_NUMBER,
    COL_DEPARTMENT,
    COL_RESPONSIBILITY_AREAS,
    COL_WORKFLOW_STATE,
];

// Formats tried in order when a Created Date cell arrives as text.
const DATE_FORMATS: [&str; 4] = ["%Y-%m-%d", "%d-%m-%Y", "%d/%m/%Y", "%m/%d/%Y"];
const DATETIME_FORMATS: [&str; 4] = [
    "%Y-%m-%d %H:%M:%S",
    "%d-%m-%Y %H:%M:%S",
    "%d/%m/%Y %H:%M:%S",
    "%m/%d/%Y %H:%M:%S",
];

/// Parse the uploaded bytes as an .xlsx workbook.
///
/// The four base columns must all be present or the upload is rejected.
/// `Created Date` is optional: without it the dataset is still usable,
/// just with date filtering disabled.
pub fn import_permits(file_name: &str, bytes: &[u8]) -> Result<Dataset, ServerError> {
    let cursor = Cursor::new(bytes.to_vec());
    let mut workbook = Xlsx::new(cursor)
        .map_err(|e| ServerError::BadRequest(format!("Could not open workbook: {e}")))?;

    let range = workbook
        .worksheet_range_at(0)
        .ok_or_else(|| ServerError::BadRequest("Workbook has no worksheets".into()))?
        .map_err(|e| ServerError::BadRequest(format!("Could not read worksheet: {e}")))?;

    let mut rows = range.rows();
    let header_row = rows
        .next()
        .ok_or_else(|| ServerError::BadRequest("Worksheet is empty".into()))?;

    let columns = ColumnIndex::from_header(header_row)?;

    let mut records = Vec::new();
    for row in rows {
        let permit_number = columns.text(row, columns.permit_number);
        let department = columns.text(row, columns.department);
        let responsibility_areas = columns.text(row, columns.responsibility_areas);
        let workflow_state = columns.text(row, columns.workflow_state);

        // Fully blank lines come back from formatting artifacts; skip them.
        if permit_number.is_empty()
            && department.is_empty()
            && responsibility_areas.is_empty()
            && workflow_state.is_empty()
        {
            continue;
        }

        let created_date = columns
            .created_date
            .and_then(|idx| row.get(idx))
            .and_then(cell_to_date);

        records.push(PermitRecord {
            permit_number,
            department,
            responsibility_areas,
            workflow_state,
            created_date,
        });
    }

    Ok(Dataset {
        file_name: file_name.to_string(),
        records,
        has_created_date: columns.created_date.is_some(),
    })
}

struct ColumnIndex {
    permit_number: usize,
    department: usize,
    responsibility_areas: usize,
    workflow_state: usize,
    created_date: Option<usize>,
}

impl ColumnIndex {
    fn from_header(header_row: &[Data]) -> Result<Self, ServerError> {
        let find = |name: &str| {
            header_row
                .iter()
                .position(|cell| cell_to_string(cell) == name)
        };

        let missing: Vec<&str> = REQUIRED_COLUMNS
            .iter()
            .filter(|name| find(name).is_none())
            .copied()
            .collect();
        if !missing.is_empty() {
            return Err(ServerError::BadRequest(format!(
                "Missing required column(s): {}",
                missing.join(", ")
            )));
        }

        Ok(ColumnIndex {
            permit_number: find(COL_PERMIT_NUMBER).ok_or(ServerError::InternalError)?,
            department: find(COL_DEPARTMENT).ok_or(ServerError::InternalError)?,
            responsibility_areas: find(COL_RESPONSIBILITY_AREAS).ok_or(ServerError::InternalError)?,
            workflow_state: find(COL_WORKFLOW_STATE).ok_or(ServerError::InternalError)?,
            created_date: find(COL_CREATED_DATE),
        })
    }

    fn text(&self, row: &[Data], idx: usize) -> String {
        row.get(idx).map(cell_to_string).unwrap_or_default()
    }
}

/// Cell rendered as the trimmed text the dashboard works with. Numeric
/// cells lose a trailing `.0` so permit numbers read back as typed.
fn cell_to_string(cell: &Data) -> String {
    match cell {
        Data::String(s) => s.trim().to_string(),
        Data::Float(f) => {
            if f.is_finite() && f.fract() == 0.0 {
                format!("{}", *f as i64)
            } else {
                f.to_string()
            }
        }
        Data::Int(i) => i.to_string(),
        Data::Bool(b) => b.to_string(),
        Data::DateTime(dt) => dt
            .as_datetime()
            .map(|d| d.date().to_string())
            .unwrap_or_default(),
        Data::DateTimeIso(s) | Data::DurationIso(s) => s.trim().to_string(),
        Data::Error(_) | Data::Empty => String::new(),
    }
}

/// Created Date cell as a date: native Excel date cells first, then the
/// known text formats. Anything else is treated as missing.
fn cell_to_date(cell: &Data) -> Option<NaiveDate> {
    if let Some(dt) = cell.as_datetime() {
        return Some(dt.date());
    }
    match cell {
        Data::String(s) => parse_date_text(s),
        _ => None,
    }
}

fn parse_date_text(raw: &str) -> Option<NaiveDate> {
    let raw = raw.trim();
    if raw.is_empty() {
        return None;
    }
    for fmt in DATE_FORMATS {
        if let Ok(date) = NaiveDate::parse_from_str(raw, fmt) {
            return Some(date);
        }
    }
    for fmt in DATETIME_FORMATS {
        if let Ok(dt) = NaiveDateTime::parse_from_str(raw, fmt) {
            return Some(dt.date());
        }
    }
    None
}
