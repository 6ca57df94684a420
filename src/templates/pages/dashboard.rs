use crate::domain::aggregate::ColumnProfile;
use crate::domain::area::PLANT_OPTIONS;
use crate::domain::plant::{
    PlantSummary, PLANT_AREA_HEADER, PLANT_COUNT_HEADER, PLANT_DEPT_HEADER, PLANT_TOTAL_LABEL,
};
use crate::domain::record::PermitRecord;
use crate::domain::summary::{SummaryRow, SummaryTable};
use crate::spreadsheets::import_xlsx::{
    COL_CREATED_DATE, COL_DEPARTMENT, COL_PERMIT_NUMBER, COL_RESPONSIBILITY_AREAS,
    COL_WORKFLOW_STATE,
};
use crate::templates::components::{data_table, notice_banner, Notice};
use crate::templates::{desktop_layout, LayoutUser};
use crate::users::Role;
use chrono::NaiveDate;
use maud::{html, Markup, PreEscaped};

pub struct DashboardVm {
    pub username: String,
    pub role: Role,
    pub notice: Option<Notice>,
    /// `None` until the session has a successfully parsed upload.
    pub upload: Option<UploadVm>,
    /// `None` for non-admin users.
    pub admin: Option<AdminVm>,
}

/// Everything below the upload widget. All of it is derived from the
/// session's dataset plus the filter query; the page itself stays stateless.
pub struct UploadVm {
    pub file_name: String,
    pub total_records: usize,
    pub has_created_date: bool,
    pub global_start: Option<NaiveDate>,
    pub global_end: Option<NaiveDate>,
    pub results_start: Option<NaiveDate>,
    pub results_end: Option<NaiveDate>,
    pub preview: Vec<PermitRecord>,
    pub profiles: Vec<ColumnProfile>,
    /// Department options, drawn from the globally filtered frame.
    pub departments: Vec<String>,
    pub selected_departments: Vec<String>,
    pub dept_chart_svg: String,
    pub total_permit_count: usize,
    /// `None` renders as the "All" option.
    pub wf_dept: Option<String>,
    pub workflow_chart_svg: String,
    pub records_after_filter: usize,
    pub all_columns: Vec<String>,
    pub selected_columns: Vec<String>,
    /// Already projected onto `selected_columns`.
    pub summary: SummaryTable,
    pub selected_plant: String,
    pub plant: Option<PlantSummary>,
    /// Current filter state, urlencoded, for the export links.
    pub export_query: String,
}

pub struct UserRowVm {
    pub username: String,
    pub name: String,
    pub role: String,
}

pub struct AdminVm {
    pub users: Vec<UserRowVm>,
    /// Usernames the remove form offers: everyone but admin and the viewer.
    pub removable: Vec<String>,
}

pub fn dashboard_page(vm: &DashboardVm) -> Markup {
    desktop_layout(
        "Permit Dashboard",
        Some(LayoutUser {
            username: &vm.username,
            role: vm.role,
        }),
        html! {
            main class="container" {
                @if let Some(notice) = &vm.notice {
                    (notice_banner(notice))
                }

                @if let Some(admin) = &vm.admin {
                    (admin_panel(admin))
                }

                (upload_card(vm))

                @match &vm.upload {
                    Some(upload) => (dashboard_sections(upload)),
                    None => (notice_banner(&Notice::new(
                        "warning",
                        "Please upload a valid Excel file to view the dashboard.",
                    ))),
                }
            }
        },
    )
}

fn upload_card(vm: &DashboardVm) -> Markup {
    html! {
        section class="card" {
            form action="/upload" method="post" enctype="multipart/form-data" {
                label class="field" {
                    span { "Upload Permit Excel File" }
                    input type="file" name="file" accept=".xlsx" required;
                }
                button type="submit" { "Upload" }
            }
            @if let Some(upload) = &vm.upload {
                p {
                    "Current file: " strong { (upload.file_name) }
                    " (" (upload.total_records) " records)"
                }
            }
        }
    }
}

fn admin_panel(vm: &AdminVm) -> Markup {
    let headers: Vec<String> = ["Username", "Name", "Role"]
        .iter()
        .map(|h| h.to_string())
        .collect();
    let rows: Vec<Vec<String>> = vm
        .users
        .iter()
        .map(|u| vec![u.username.clone(), u.name.clone(), u.role.clone()])
        .collect();

    html! {
        details {
            summary { "👥 Admin User Management" }
            section class="card" {
                p { "Current Users:" }
                (data_table(&headers, &rows, None))

                div style="display: flex; gap: 2.5rem; flex-wrap: wrap; margin-top: 1rem;" {
                    form action="/admin/users" method="post" {
                        h4 { "Add New User" }
                        label class="field" {
                            span { "Username" }
                            input type="text" name="username" required;
                        }
                        label class="field" {
                            span { "Full Name" }
                            input type="text" name="name";
                        }
                        label class="field" {
                            span { "Password" }
                            input type="password" name="password" required;
                        }
                        label class="field" {
                            span { "Role" }
                            select name="role" {
                                option value="user" { "user" }
                                option value="admin" { "admin" }
                            }
                        }
                        button type="submit" { "Add User" }
                    }

                    form action="/admin/users/remove" method="post" {
                        h4 { "Remove User" }
                        @if vm.users.len() > 1 {
                            label class="field" {
                                span { "Select user to remove" }
                                select name="username" {
                                    @for username in &vm.removable {
                                        option value=(username) { (username) }
                                    }
                                }
                            }
                            button type="submit" { "Remove User" }
                        } @else {
                            (notice_banner(&Notice::new(
                                "warning",
                                "Cannot remove the only remaining user",
                            )))
                        }
                    }
                }
            }
        }
    }
}

fn dashboard_sections(vm: &UploadVm) -> Markup {
    let preview_headers: Vec<String> = [
        COL_PERMIT_NUMBER,
        COL_DEPARTMENT,
        COL_RESPONSIBILITY_AREAS,
        COL_WORKFLOW_STATE,
        COL_CREATED_DATE,
    ]
    .iter()
    .map(|h| h.to_string())
    .collect();
    let preview_rows: Vec<Vec<String>> = vm
        .preview
        .iter()
        .map(|r| {
            vec![
                r.permit_number.clone(),
                r.department.clone(),
                r.responsibility_areas.clone(),
                r.workflow_state.clone(),
                r.created_date.map(|d| d.to_string()).unwrap_or_default(),
            ]
        })
        .collect();

    let profile_headers: Vec<String> = ["Column", "Count", "Unique", "Top", "Freq"]
        .iter()
        .map(|h| h.to_string())
        .collect();
    let profile_rows: Vec<Vec<String>> = vm.profiles.iter().map(profile_cells).collect();

    let summary_headers = vm.summary.headers();
    let summary_rows: Vec<Vec<String>> = vm.summary.rows.iter().map(summary_cells).collect();
    let summary_total = summary_cells(&vm.summary.total);

    let plant_headers: Vec<String> = [PLANT_AREA_HEADER, PLANT_DEPT_HEADER, PLANT_COUNT_HEADER]
        .iter()
        .map(|h| h.to_string())
        .collect();
    let plant_table: Option<(Vec<Vec<String>>, Vec<String>)> = vm.plant.as_ref().map(|p| {
        let rows = p
            .rows
            .iter()
            .map(|r| vec![r.area.clone(), r.department.clone(), r.count.to_string()])
            .collect();
        let total = vec![
            PLANT_TOTAL_LABEL.to_string(),
            String::new(),
            p.total.to_string(),
        ];
        (rows, total)
    });

    html! {
        @if !vm.has_created_date {
            (notice_banner(&Notice::new(
                "warning",
                "❗ 'Created Date' column not found in uploaded file. Date-based filtering has been skipped.",
            )))
        }

        form action="/dashboard" method="get" {
            @if vm.global_start.is_some() {
                section class="card" {
                    label class="field" {
                        span { "🕵️ Select Global Date Range (applies to entire dashboard):" }
                        div style="display: flex; gap: 8px;" {
                            input type="date" name="global_start" value=[vm.global_start];
                            input type="date" name="global_end" value=[vm.global_end];
                        }
                    }
                    h3 { "🕵️ Date Filter for All Tables and Charts" }
                    p style="color: #6b7280; font-size: 0.9em;" {
                        "Filter results by Created Date for all permit analysis below."
                    }
                    label class="field" {
                        span { "Select Date Range for Result Filtering:" }
                        div style="display: flex; gap: 8px;" {
                            input type="date" name="results_start" value=[vm.results_start];
                            input type="date" name="results_end" value=[vm.results_end];
                        }
                    }
                }
            }

            section class="card" {
                h3 { "📊 Basic Dataset Preview" }
                (data_table(&preview_headers, &preview_rows, None))
            }

            details {
                summary { "📌 Summary Statistics" }
                section class="card" {
                    (data_table(&profile_headers, &profile_rows, None))
                }
            }

            section class="card" {
                h3 { "🔍 Filter Options" }
                label class="field" {
                    span { "Select Department(s):" }
                    select name="dept" multiple size="6" {
                        @for dept in &vm.departments {
                            option value=(dept) selected[vm.selected_departments.contains(dept)] {
                                (dept)
                            }
                        }
                    }
                }
                button type="submit" { "Apply Filters" }
            }

            section class="card" {
                h3 { "📈 Permit Counts by Department" }
                div class="chart" { (PreEscaped(&vm.dept_chart_svg)) }
                (notice_banner(&Notice::new(
                    "info",
                    &format!("Total Permit Count: {}", vm.total_permit_count),
                )))
            }

            section class="card" {
                h3 { "📈 Workflow State Distribution" }
                label class="field" {
                    span { "Select Department for Workflow State Breakdown (optional):" }
                    select name="wf_dept" onchange="this.form.submit()" {
                        option value="All" selected[vm.wf_dept.is_none()] { "All" }
                        @for dept in &vm.departments {
                            option value=(dept) selected[vm.wf_dept.as_deref() == Some(dept.as_str())] {
                                (dept)
                            }
                        }
                    }
                }
                h4 {
                    "Workflow State Breakdown - "
                    (vm.wf_dept.as_deref().unwrap_or("All Departments"))
                }
                div class="chart" { (PreEscaped(&vm.workflow_chart_svg)) }
                (notice_banner(&Notice::new(
                    "success",
                    &format!("Total Records After Filter: {}", vm.records_after_filter),
                )))
            }

            section class="card" {
                h3 { "📄 Customized Permit Summary Table" }
                label class="field" {
                    span { "Select Columns to Display (apart from Responsibility Areas):" }
                    div {
                        @for column in &vm.all_columns {
                            label style="display: inline-flex; align-items: center; gap: 4px; margin-right: 14px;" {
                                input type="checkbox" name="col" value=(column)
                                    checked[vm.selected_columns.contains(column)];
                                (column)
                            }
                        }
                    }
                }
                // Distinguishes "nothing checked" from "checkboxes never sent".
                input type="hidden" name="cols_submitted" value="1";
                button type="submit" { "Apply Filters" }
                (data_table(&summary_headers, &summary_rows, Some(&summary_total)))
                p {
                    a href=(format!("/export/summary?{}", vm.export_query)) {
                        "🕵 Download Custom Summary"
                    }
                }
            }

            section class="card" {
                h3 { "🏭 Plantwise Permit Summary" }
                label class="field" {
                    span { "Select a Plant:" }
                    select name="plant" onchange="this.form.submit()" {
                        @for plant in PLANT_OPTIONS {
                            option value=(plant) selected[vm.selected_plant == plant] { (plant) }
                        }
                    }
                }
                @match &plant_table {
                    Some((rows, total)) => {
                        (data_table(&plant_headers, rows, Some(total)))
                        p {
                            a href=(format!("/export/plant?{}", vm.export_query)) {
                                "🕵 Download Plantwise Summary"
                            }
                        }
                    }
                    None => (notice_banner(&Notice::new("warning", "No data found for selected plant"))),
                }
            }
        }
    }
}

fn summary_cells(row: &SummaryRow) -> Vec<String> {
    let mut cells = Vec::with_capacity(row.counts.len() + 1);
    cells.push(row.area.clone());
    cells.extend(row.counts.iter().map(|c| c.to_string()));
    cells
}

fn profile_cells(profile: &ColumnProfile) -> Vec<String> {
    vec![
        profile.column.clone(),
        profile.non_empty.to_string(),
        profile.distinct.to_string(),
        profile
            .top
            .as_ref()
            .map(|(value, _)| value.clone())
            .unwrap_or_default(),
        profile
            .top
            .as_ref()
            .map(|(_, count)| count.to_string())
            .unwrap_or_default(),
    ]
}
