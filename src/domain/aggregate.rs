// src/domain/aggregate.rs

use crate::domain::record::PermitRecord;
use std::collections::BTreeMap;

/// One bar of the department chart.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DeptCount {
    pub department: String,
    pub count: u64,
}

/// One slice of the workflow-state pie. `label` carries the literal count
/// for display ("OPEN (42)"); the count itself is what everything else uses.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WorkflowSlice {
    pub count: u64,
    pub label: String,
}

/// Per-column profile of the uploaded sheet, shown in the summary-statistics
/// expander: non-empty cells, distinct values, and the most frequent value.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ColumnProfile {
    pub column: String,
    pub non_empty: u64,
    pub distinct: u64,
    pub top: Option<(String, u64)>,
}

/// Groups records by stored department and counts them. Empty departments
/// are skipped. Order: descending by count, ties ascending by label.
pub fn department_counts(records: &[PermitRecord]) -> Vec<DeptCount> {
    let counts = count_values(records.iter().map(|r| r.department.as_str()));
    sorted_desc(counts)
        .into_iter()
        .map(|(department, count)| DeptCount { department, count })
        .collect()
}

/// Groups records by stored workflow state, optionally scoped to one
/// department (`None` means all). Empty states are skipped. Order matches
/// [`department_counts`].
pub fn workflow_breakdown(records: &[PermitRecord], department: Option<&str>) -> Vec<WorkflowSlice> {
    let scoped = records
        .iter()
        .filter(|r| department.is_none_or(|d| r.department == d));
    let counts = count_values(scoped.map(|r| r.workflow_state.as_str()));
    sorted_desc(counts)
        .into_iter()
        .map(|(state, count)| WorkflowSlice {
            label: format!("{state} ({count})"),
            count,
        })
        .collect()
}

/// Profiles every source column of the working subset. The top value ties
/// break toward the smaller value so the output is deterministic.
pub fn column_profiles(records: &[PermitRecord]) -> Vec<ColumnProfile> {
    let columns: [(&str, fn(&PermitRecord) -> String); 5] = [
        ("Permit Number", |r| r.permit_number.clone()),
        ("Department", |r| r.department.clone()),
        ("Responsibility Areas", |r| r.responsibility_areas.clone()),
        ("Workflow State", |r| r.workflow_state.clone()),
        ("Created Date", |r| {
            r.created_date.map(|d| d.to_string()).unwrap_or_default()
        }),
    ];

    columns
        .iter()
        .map(|(name, get)| {
            let mut counts: BTreeMap<String, u64> = BTreeMap::new();
            for record in records {
                let value = get(record);
                if !value.is_empty() {
                    *counts.entry(value).or_default() += 1;
                }
            }
            let non_empty = counts.values().sum();
            let top = counts
                .iter()
                .max_by(|a, b| a.1.cmp(b.1).then(b.0.cmp(a.0)))
                .map(|(value, count)| (value.clone(), *count));
            ColumnProfile {
                column: (*name).to_string(),
                non_empty,
                distinct: counts.len() as u64,
                top,
            }
        })
        .collect()
}

fn count_values<'a>(values: impl Iterator<Item = &'a str>) -> BTreeMap<String, u64> {
    let mut counts: BTreeMap<String, u64> = BTreeMap::new();
    for value in values {
        if !value.is_empty() {
            *counts.entry(value.to_string()).or_default() += 1;
        }
    }
    counts
}

// BTreeMap iteration is already ascending by key, so a stable sort on the
// count alone keeps ties in label order.
fn sorted_desc(counts: BTreeMap<String, u64>) -> Vec<(String, u64)> {
    let mut pairs: Vec<(String, u64)> = counts.into_iter().collect();
    pairs.sort_by(|a, b| b.1.cmp(&a.1));
    pairs
}
