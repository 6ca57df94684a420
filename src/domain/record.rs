// src/domain/record.rs

use crate::domain::area;
use chrono::NaiveDate;

/// One row of the uploaded permit sheet, with the source fields kept exactly
/// as stored. Everything else (closed flag, status, area) is derived on
/// demand so recomputation is idempotent and order-independent.
#[derive(Debug, PartialEq, Eq, Clone)]
pub struct PermitRecord {
    pub permit_number: String,
    pub department: String,
    pub responsibility_areas: String,
    pub workflow_state: String,
    /// `None` when the column is absent, the cell is empty, or the value
    /// failed to parse.
    pub created_date: Option<NaiveDate>,
}

/// Mutually exclusive workflow classification used by the summary table.
///
/// Note that a record can be `Closed` only through its workflow state, so a
/// record never carries both a status and the closed flag in practice; the
/// two are still counted independently everywhere, matching the legacy
/// dashboard.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PermitStatus {
    Expired,
    PendingClosure,
}

impl PermitStatus {
    /// Exact match over the trimmed, upper-cased workflow state.
    pub fn classify(workflow_state: &str) -> Option<Self> {
        match workflow_state.trim().to_uppercase().as_str() {
            "PENDING CLOSURE" => Some(PermitStatus::PendingClosure),
            "EXPIRED" => Some(PermitStatus::Expired),
            _ => None,
        }
    }
}

impl PermitRecord {
    /// True iff the workflow state, trimmed and upper-cased, is `CLOSED`.
    pub fn is_closed(&self) -> bool {
        self.workflow_state.trim().to_uppercase() == "CLOSED"
    }

    pub fn status(&self) -> Option<PermitStatus> {
        PermitStatus::classify(&self.workflow_state)
    }

    /// Canonical area label for this record's responsibility areas.
    pub fn area(&self) -> &'static str {
        area::map_area(&self.responsibility_areas)
    }
}

/// An uploaded sheet, parsed. Owned by one session and replaced wholesale on
/// re-upload; the pipeline only ever reads it.
#[derive(Debug, Clone)]
pub struct Dataset {
    /// Name of the uploaded file, for display.
    pub file_name: String,
    pub records: Vec<PermitRecord>,
    /// False when the `Created Date` column was missing, in which case date
    /// filtering is skipped and the caller shows a warning.
    pub has_created_date: bool,
}

impl Dataset {
    /// Earliest and latest parseable created dates, used to seed the date
    /// pickers. `None` when no record carries a date.
    pub fn date_bounds(&self) -> Option<(NaiveDate, NaiveDate)> {
        date_bounds(&self.records)
    }
}

/// Distinct non-empty departments over a record slice, sorted.
pub fn distinct_departments(records: &[PermitRecord]) -> Vec<String> {
    let mut depts: Vec<String> = records
        .iter()
        .map(|r| r.department.clone())
        .filter(|d| !d.is_empty())
        .collect();
    depts.sort();
    depts.dedup();
    depts
}

/// Min/max created date over a record slice (filtered subsets included).
pub fn date_bounds(records: &[PermitRecord]) -> Option<(NaiveDate, NaiveDate)> {
    let mut bounds: Option<(NaiveDate, NaiveDate)> = None;
    for date in records.iter().filter_map(|r| r.created_date) {
        bounds = Some(match bounds {
            None => (date, date),
            Some((min, max)) => (min.min(date), max.max(date)),
        });
    }
    bounds
}
