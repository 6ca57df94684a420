// src/dashboard.rs
//
// Evaluates one dataset + filter-query pair into everything the dashboard
// page and the two exports show. The pipeline is pure: global date range
// first, then the results range, then the department selection; the chart
// and table builders only ever see the resulting subsets.

use crate::charts::{department_bar_svg, workflow_pie_svg};
use crate::domain::aggregate::{column_profiles, department_counts, workflow_breakdown};
use crate::domain::filter::{filter_by_date, filter_by_departments, DateRange};
use crate::domain::plant::{build_plant_summary, PlantSummary};
use crate::domain::record::{date_bounds, distinct_departments, Dataset, PermitRecord};
use crate::domain::summary::{all_columns, build_summary, SummaryTable};
use crate::errors::ServerError;
use crate::forms::FormValues;
use crate::templates::pages::UploadVm;
use chrono::NaiveDate;

pub const DEFAULT_PLANT: &str = "CPP";
pub const PREVIEW_ROWS: usize = 5;

const DATE_PARAM_FORMAT: &str = "%Y-%m-%d";

/// The filter widgets, decoded from the dashboard's GET query. Every field
/// has a default, so an empty query renders the unfiltered dashboard.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DashboardQuery {
    pub global_start: Option<NaiveDate>,
    pub global_end: Option<NaiveDate>,
    pub results_start: Option<NaiveDate>,
    pub results_end: Option<NaiveDate>,
    pub departments: Vec<String>,
    /// `None` means the "All" option.
    pub wf_dept: Option<String>,
    /// `None` when the column checkboxes were never submitted, which is
    /// different from an explicitly empty selection.
    pub columns: Option<Vec<String>>,
    pub plant: String,
}

impl DashboardQuery {
    pub fn from_form(form: &FormValues) -> Self {
        let columns = if form.has("cols_submitted") {
            Some(form.all("col").iter().map(|c| c.to_string()).collect())
        } else {
            None
        };

        DashboardQuery {
            global_start: parse_date(form.first("global_start")),
            global_end: parse_date(form.first("global_end")),
            results_start: parse_date(form.first("results_start")),
            results_end: parse_date(form.first("results_end")),
            departments: form.all("dept").iter().map(|d| d.to_string()).collect(),
            wf_dept: form
                .first("wf_dept")
                .filter(|d| !d.is_empty() && *d != "All")
                .map(|d| d.to_string()),
            columns,
            plant: form
                .first("plant")
                .filter(|p| !p.is_empty())
                .unwrap_or(DEFAULT_PLANT)
                .to_string(),
        }
    }
}

fn parse_date(value: Option<&str>) -> Option<NaiveDate> {
    NaiveDate::parse_from_str(value?, DATE_PARAM_FORMAT).ok()
}

/// The evaluated pipeline. `global_subset` feeds the preview, the column
/// profiles and the option lists; `working` feeds every chart and table.
pub struct Evaluation {
    pub global_range: Option<DateRange>,
    pub results_range: Option<DateRange>,
    pub global_subset: Vec<PermitRecord>,
    pub working: Vec<PermitRecord>,
    pub departments: Vec<String>,
    pub selected_departments: Vec<String>,
    pub wf_dept: Option<String>,
    pub selected_columns: Vec<String>,
    /// Already projected onto `selected_columns`.
    pub summary: SummaryTable,
    pub selected_plant: String,
    pub plant: Option<PlantSummary>,
}

pub fn evaluate(dataset: &Dataset, query: &DashboardQuery) -> Evaluation {
    let mut global_range = None;
    let mut results_range = None;

    // Date filtering only runs when the column exists and at least one
    // record carries a parseable date; picker defaults come from the data.
    let global_subset = match dataset.date_bounds() {
        Some((min, max)) if dataset.has_created_date => {
            let range = DateRange::new(
                query.global_start.unwrap_or(min),
                query.global_end.unwrap_or(max),
            );
            global_range = Some(range);
            filter_by_date(&dataset.records, range)
        }
        _ => dataset.records.clone(),
    };

    let mut working = match (global_range, date_bounds(&global_subset)) {
        (Some(_), Some((min, max))) => {
            let range = DateRange::new(
                query.results_start.unwrap_or(min),
                query.results_end.unwrap_or(max),
            );
            results_range = Some(range);
            filter_by_date(&global_subset, range)
        }
        _ => global_subset.clone(),
    };

    let departments = distinct_departments(&global_subset);
    let selected_departments = query.departments.clone();
    working = filter_by_departments(&working, &selected_departments);

    let selected_columns = query.columns.clone().unwrap_or_else(all_columns);
    let summary = build_summary(&working).select_columns(&selected_columns);
    let plant = build_plant_summary(&working, &query.plant);

    Evaluation {
        global_range,
        results_range,
        global_subset,
        working,
        departments,
        selected_departments,
        wf_dept: query.wf_dept.clone(),
        selected_columns,
        summary,
        selected_plant: query.plant.clone(),
        plant,
    }
}

/// Evaluates the query and renders everything below the upload widget.
pub fn upload_vm(dataset: &Dataset, form: &FormValues) -> Result<UploadVm, ServerError> {
    let query = DashboardQuery::from_form(form);
    let eval = evaluate(dataset, &query);

    let dept_counts = department_counts(&eval.working);
    let dept_chart_svg = department_bar_svg(&dept_counts)?;
    let workflow = workflow_breakdown(&eval.working, eval.wf_dept.as_deref());
    let workflow_chart_svg = workflow_pie_svg(&workflow)?;
    let export_query = export_query(&eval);

    Ok(UploadVm {
        file_name: dataset.file_name.clone(),
        total_records: dataset.records.len(),
        has_created_date: dataset.has_created_date,
        global_start: eval.global_range.map(|r| r.start),
        global_end: eval.global_range.map(|r| r.end),
        results_start: eval.results_range.map(|r| r.start),
        results_end: eval.results_range.map(|r| r.end),
        preview: eval
            .global_subset
            .iter()
            .take(PREVIEW_ROWS)
            .cloned()
            .collect(),
        profiles: column_profiles(&eval.global_subset),
        departments: eval.departments,
        selected_departments: eval.selected_departments,
        dept_chart_svg,
        total_permit_count: eval.working.len(),
        wf_dept: eval.wf_dept,
        workflow_chart_svg,
        records_after_filter: eval.working.len(),
        all_columns: all_columns(),
        selected_columns: eval.selected_columns,
        summary: eval.summary,
        selected_plant: eval.selected_plant,
        plant: eval.plant,
        export_query,
    })
}

/// Serializes the evaluated filter state back into a query string, so the
/// export links reproduce exactly what the page shows.
pub fn export_query(eval: &Evaluation) -> String {
    let mut ser = url::form_urlencoded::Serializer::new(String::new());
    if let Some(range) = eval.global_range {
        ser.append_pair("global_start", &range.start.to_string());
        ser.append_pair("global_end", &range.end.to_string());
    }
    if let Some(range) = eval.results_range {
        ser.append_pair("results_start", &range.start.to_string());
        ser.append_pair("results_end", &range.end.to_string());
    }
    for dept in &eval.selected_departments {
        ser.append_pair("dept", dept);
    }
    if let Some(dept) = &eval.wf_dept {
        ser.append_pair("wf_dept", dept);
    }
    for column in &eval.selected_columns {
        ser.append_pair("col", column);
    }
    ser.append_pair("cols_submitted", "1");
    ser.append_pair("plant", &eval.selected_plant);
    ser.finish()
}
