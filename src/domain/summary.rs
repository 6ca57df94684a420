// src/domain/summary.rs
//
// The customized permit summary: one row per area, one column per canonical
// department plus the EXPIRED / PENDING CLOSURE / CLOSED counts, and a
// synthesized TOTAL row that is always the column-wise sum of the rows above
// it, over exactly the displayed columns.

use crate::domain::area::DEPARTMENT_COLUMNS;
use crate::domain::record::{PermitRecord, PermitStatus};
use std::collections::BTreeMap;

pub const AREA_HEADER: &str = "RESPONSIBILITY AREAS";
pub const TOTAL_LABEL: &str = "TOTAL";
pub const STATUS_COLUMNS: [&str; 3] = ["EXPIRED", "PENDING CLOSURE", "CLOSED"];

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SummaryRow {
    pub area: String,
    /// Aligned with the owning table's `columns`.
    pub counts: Vec<u64>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SummaryTable {
    /// Count columns; the implicit first display column is [`AREA_HEADER`].
    pub columns: Vec<String>,
    /// One row per area present in the working subset, ascending by label.
    pub rows: Vec<SummaryRow>,
    /// The TOTAL row, kept separate so it always renders and exports last.
    pub total: SummaryRow,
}

/// All selectable columns, in canonical order.
pub fn all_columns() -> Vec<String> {
    DEPARTMENT_COLUMNS
        .iter()
        .chain(STATUS_COLUMNS.iter())
        .map(|c| (*c).to_string())
        .collect()
}

/// Builds the full summary table over the working subset.
///
/// Department cells match the record's trimmed upper-cased department
/// against the canonical list; non-canonical departments simply get no
/// column here. Missing combinations stay 0.
pub fn build_summary(records: &[PermitRecord]) -> SummaryTable {
    let columns = all_columns();
    let width = columns.len();
    let expired_idx = DEPARTMENT_COLUMNS.len();
    let pending_idx = expired_idx + 1;
    let closed_idx = expired_idx + 2;

    let mut by_area: BTreeMap<String, Vec<u64>> = BTreeMap::new();
    for record in records {
        let counts = by_area
            .entry(record.area().to_string())
            .or_insert_with(|| vec![0; width]);

        let department = record.department.trim().to_uppercase();
        if let Some(idx) = DEPARTMENT_COLUMNS.iter().position(|d| *d == department) {
            counts[idx] += 1;
        }
        match record.status() {
            Some(PermitStatus::Expired) => counts[expired_idx] += 1,
            Some(PermitStatus::PendingClosure) => counts[pending_idx] += 1,
            None => {}
        }
        if record.is_closed() {
            counts[closed_idx] += 1;
        }
    }

    let rows: Vec<SummaryRow> = by_area
        .into_iter()
        .map(|(area, counts)| SummaryRow { area, counts })
        .collect();

    let mut total = vec![0u64; width];
    for row in &rows {
        for (slot, count) in total.iter_mut().zip(&row.counts) {
            *slot += count;
        }
    }

    SummaryTable {
        columns,
        rows,
        total: SummaryRow {
            area: TOTAL_LABEL.to_string(),
            counts: total,
        },
    }
}

impl SummaryTable {
    /// Projects the table onto a caller-chosen column subset, in the
    /// caller's order. Unknown names and duplicates are dropped; an empty
    /// selection leaves just the area column. The TOTAL row is projected
    /// with the same indices, so it stays the column-wise sum of what is
    /// displayed.
    pub fn select_columns(&self, selected: &[String]) -> SummaryTable {
        let mut indices: Vec<usize> = Vec::new();
        for name in selected {
            if let Some(idx) = self.columns.iter().position(|c| c == name) {
                if !indices.contains(&idx) {
                    indices.push(idx);
                }
            }
        }

        let project = |row: &SummaryRow| SummaryRow {
            area: row.area.clone(),
            counts: indices.iter().map(|&i| row.counts[i]).collect(),
        };

        SummaryTable {
            columns: indices.iter().map(|&i| self.columns[i].clone()).collect(),
            rows: self.rows.iter().map(project).collect(),
            total: project(&self.total),
        }
    }

    /// Display headers: the area column first, then the count columns.
    pub fn headers(&self) -> Vec<String> {
        let mut headers = Vec::with_capacity(self.columns.len() + 1);
        headers.push(AREA_HEADER.to_string());
        headers.extend(self.columns.iter().cloned());
        headers
    }
}
