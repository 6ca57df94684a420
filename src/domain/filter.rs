// src/domain/filter.rs

use crate::domain::record::PermitRecord;
use chrono::NaiveDate;

/// Inclusive date range. Construction normalizes a reversed pair, so
/// `start <= end` always holds.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DateRange {
    pub start: NaiveDate,
    pub end: NaiveDate,
}

impl DateRange {
    pub fn new(a: NaiveDate, b: NaiveDate) -> Self {
        if a <= b {
            Self { start: a, end: b }
        } else {
            Self { start: b, end: a }
        }
    }

    pub fn contains(&self, date: NaiveDate) -> bool {
        self.start <= date && date <= self.end
    }
}

/// Keeps records whose created date falls inside `range`, bounds included.
/// Records without a parseable date are silently dropped; the input is never
/// mutated.
pub fn filter_by_date(records: &[PermitRecord], range: DateRange) -> Vec<PermitRecord> {
    records
        .iter()
        .filter(|r| r.created_date.is_some_and(|d| range.contains(d)))
        .cloned()
        .collect()
}

/// Keeps records whose department matches one of the selected values
/// exactly, as stored. An empty selection filters nothing.
pub fn filter_by_departments(records: &[PermitRecord], selected: &[String]) -> Vec<PermitRecord> {
    if selected.is_empty() {
        return records.to_vec();
    }
    records
        .iter()
        .filter(|r| selected.iter().any(|d| *d == r.department))
        .cloned()
        .collect()
}
