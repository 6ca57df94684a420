// src/tests/router_tests/dashboard_tests.rs
//
// The dashboard itself: upload, the filter pipeline, and every section the
// page renders from it.

use crate::router::handle;
use crate::tests::utils::{
    body_string, dateless_workbook, get, location, permits_workbook, post_multipart,
    session_with_upload, sign_in, test_state, upload_body,
};

#[test]
fn dashboard_requires_login() {
    let state = test_state();

    let resp = handle(get("/dashboard", None), &state).expect("dashboard failed");
    assert_eq!(resp.status(), 302);
    assert_eq!(location(&resp), "/login");
}

#[test]
fn fresh_sessions_are_prompted_to_upload() {
    let state = test_state();
    let session = sign_in(&state, "admin", "admin123");

    let body = body_string(handle(get("/dashboard", Some(&session)), &state).unwrap());
    assert!(body.contains("Upload Permit Excel File"));
    assert!(body.contains("Please upload a valid Excel file to view the dashboard."));
    // None of the data sections render yet.
    assert!(!body.contains("📊 Basic Dataset Preview"));
    assert!(!body.contains("🏭 Plantwise Permit Summary"));
}

#[test]
fn upload_flashes_success_and_renders_every_section() {
    let state = test_state();
    let session = sign_in(&state, "admin", "admin123");

    // Step 1: upload the workbook.
    let resp = handle(
        post_multipart("/upload", upload_body(&permits_workbook()), Some(&session)),
        &state,
    )
    .expect("upload failed");
    assert_eq!(resp.status(), 302);
    let loc = location(&resp);
    assert!(loc.starts_with("/dashboard?"));
    assert!(loc.contains("File+uploaded+successfully%21"));

    // Step 2: the redirect target shows the banner.
    let body = body_string(handle(get(&loc, Some(&session)), &state).unwrap());
    assert!(body.contains("File uploaded successfully!"));

    // Step 3: every section is on the page.
    let body = body_string(handle(get("/dashboard", Some(&session)), &state).unwrap());
    assert!(body.contains("permits.xlsx"));
    assert!(body.contains("(4 records)"));
    assert!(body.contains("🕵️ Select Global Date Range (applies to entire dashboard):"));
    assert!(body.contains("🕵️ Date Filter for All Tables and Charts"));
    assert!(body.contains("Filter results by Created Date for all permit analysis below."));
    assert!(body.contains("Select Date Range for Result Filtering:"));
    assert!(body.contains("📊 Basic Dataset Preview"));
    assert!(body.contains("📌 Summary Statistics"));
    assert!(body.contains("🔍 Filter Options"));
    assert!(body.contains("📈 Permit Counts by Department"));
    assert!(body.contains("📈 Workflow State Distribution"));
    assert!(body.contains("📄 Customized Permit Summary Table"));
    assert!(body.contains("🏭 Plantwise Permit Summary"));
    assert!(body.contains("🕵 Download Custom Summary"));
    assert!(body.contains("🕵 Download Plantwise Summary"));

    // Date pickers default to the data's bounds.
    assert!(body.contains("value=\"2024-01-10\""));
    assert!(body.contains("value=\"2024-03-25\""));

    // Preview lists the raw rows.
    for permit in ["PTW-1", "PTW-2", "PTW-3", "PTW-4"] {
        assert!(body.contains(permit), "preview should list {permit}");
    }

    // Counts over the unfiltered working subset.
    assert!(body.contains("Total Permit Count: 4"));
    assert!(body.contains("Total Records After Filter: 4"));

    // Summary table: full column set plus the synthesized TOTAL row.
    assert!(body.contains("<th>RESPONSIBILITY AREAS</th>"));
    assert!(body.contains("<th>CIVIL</th>"));
    assert!(body.contains("<th>EXPIRED</th>"));
    assert!(body.contains("<th>CLOSED</th>"));
    assert!(body.contains("CPP (Including Power Plant Areas)"));
    assert!(body.contains("NCU (Including CCR Areas)"));
    assert!(body.contains("OTHERS"));
    assert!(body.contains("TOTAL"));

    // Default plant is CPP: two CIVIL permits match.
    assert!(body.contains("<option value=\"CPP\" selected>"));
    assert!(body.contains("Permit Count"));

    // Pie labels carry their counts into the inline SVG.
    assert!(body.contains("OPEN (1)"));
    assert!(body.contains("CLOSED (1)"));
}

#[test]
fn department_filter_narrows_the_working_subset_only() {
    let state = test_state();
    let session = session_with_upload(&state, &permits_workbook());

    let body = body_string(
        handle(get("/dashboard?dept=CIVIL", Some(&session)), &state).unwrap(),
    );

    // Both counters track the filtered frame.
    assert!(body.contains("Total Permit Count: 2"));
    assert!(body.contains("Total Records After Filter: 2"));
    assert!(body.contains("<option value=\"CIVIL\" selected>"));

    // The preview and the selector options stay on the global frame.
    assert!(body.contains("PTW-3"));
    assert!(body.contains("<option value=\"MECHANICAL\">"));

    // The summary collapses to the CIVIL rows: both are CPP permits.
    assert!(body.contains("CPP (Including Power Plant Areas)"));
    assert!(!body.contains("NCU (Including CCR Areas)"));
}

#[test]
fn global_range_narrows_the_whole_dashboard() {
    let state = test_state();
    let session = session_with_upload(&state, &permits_workbook());

    let body = body_string(
        handle(
            get(
                "/dashboard?global_start=2024-01-01&global_end=2024-02-28",
                Some(&session),
            ),
            &state,
        )
        .unwrap(),
    );

    // Only the two January/February permits survive, everywhere.
    assert!(body.contains("Total Permit Count: 2"));
    assert!(body.contains("PTW-1"));
    assert!(!body.contains("PTW-3"));
    // March departments drop out of the selector.
    assert!(!body.contains("<option value=\"MECHANICAL\">"));
    // The result picker re-seeds from the narrowed frame.
    assert!(body.contains("value=\"2024-02-15\""));
}

#[test]
fn results_range_filters_tables_but_not_the_preview() {
    let state = test_state();
    let session = session_with_upload(&state, &permits_workbook());

    let body = body_string(
        handle(
            get(
                "/dashboard?results_start=2024-03-01&results_end=2024-03-31",
                Some(&session),
            ),
            &state,
        )
        .unwrap(),
    );

    // March only: PTW-3 and PTW-4.
    assert!(body.contains("Total Permit Count: 2"));
    assert!(body.contains("Total Records After Filter: 2"));
    // The preview still shows the whole frame.
    assert!(body.contains("PTW-1"));
    // No CPP permit left in the working subset.
    assert!(body.contains("No data found for selected plant"));
}

#[test]
fn workflow_scope_selector_relabels_the_breakdown() {
    let state = test_state();
    let session = session_with_upload(&state, &permits_workbook());

    let body = body_string(handle(get("/dashboard", Some(&session)), &state).unwrap());
    assert!(body.contains("Workflow State Breakdown - All Departments"));

    let body = body_string(
        handle(get("/dashboard?wf_dept=CIVIL", Some(&session)), &state).unwrap(),
    );
    assert!(body.contains("Workflow State Breakdown - CIVIL"));
    assert!(body.contains("<option value=\"CIVIL\" selected>"));
    // The scope only recolors the pie; the counter still covers the frame.
    assert!(body.contains("Total Records After Filter: 4"));
    // CIVIL has one OPEN and one CLOSED permit.
    assert!(body.contains("OPEN (1)"));
    assert!(body.contains("CLOSED (1)"));
}

#[test]
fn column_selection_projects_the_summary_table() {
    let state = test_state();
    let session = session_with_upload(&state, &permits_workbook());

    // Unchecking everything but CIVIL and CLOSED drops the other columns.
    let body = body_string(
        handle(
            get(
                "/dashboard?cols_submitted=1&col=CIVIL&col=CLOSED",
                Some(&session),
            ),
            &state,
        )
        .unwrap(),
    );
    assert!(body.contains("<th>CIVIL</th>"));
    assert!(body.contains("<th>CLOSED</th>"));
    assert!(!body.contains("<th>EXPIRED</th>"));
    assert!(body.contains("value=\"CIVIL\" checked"));
    assert!(!body.contains("value=\"EXPIRED\" checked"));

    // Submitting with nothing checked leaves just the area column.
    let body = body_string(
        handle(get("/dashboard?cols_submitted=1", Some(&session)), &state).unwrap(),
    );
    assert!(body.contains("<th>RESPONSIBILITY AREAS</th>"));
    assert!(!body.contains("<th>CIVIL</th>"));

    // Without the marker the full set stays selected.
    let body = body_string(handle(get("/dashboard", Some(&session)), &state).unwrap());
    assert!(body.contains("<th>CIVIL</th>"));
    assert!(body.contains("<th>EXPIRED</th>"));
}

#[test]
fn plant_selector_switches_the_plantwise_table() {
    let state = test_state();
    let session = session_with_upload(&state, &permits_workbook());

    // HDPE matches the one FIRE permit by substring.
    let body = body_string(
        handle(get("/dashboard?plant=HDPE", Some(&session)), &state).unwrap(),
    );
    assert!(body.contains("<option value=\"HDPE\" selected>"));
    assert!(body.contains("<td>HDPE</td>"));
    assert!(!body.contains("No data found for selected plant"));

    // LLDPE matches nothing in the fixture.
    let body = body_string(
        handle(get("/dashboard?plant=LLDPE", Some(&session)), &state).unwrap(),
    );
    assert!(body.contains("<option value=\"LLDPE\" selected>"));
    assert!(body.contains("No data found for selected plant"));
}

#[test]
fn missing_created_date_column_skips_date_filtering() {
    let state = test_state();
    let session = session_with_upload(&state, &dateless_workbook());

    let body = body_string(handle(get("/dashboard", Some(&session)), &state).unwrap());
    assert!(body.contains(
        "'Created Date' column not found in uploaded file. Date-based filtering has been skipped."
    ));
    assert!(!body.contains("name=\"global_start\""));
    assert!(!body.contains("Select Date Range for Result Filtering:"));
    // The rest of the dashboard still renders.
    assert!(body.contains("PTW-9"));
    assert!(body.contains("Total Permit Count: 1"));
}

#[test]
fn broken_uploads_flash_the_reason() {
    let state = test_state();
    let session = sign_in(&state, "admin", "admin123");

    // Not an xlsx payload at all.
    let resp = handle(
        post_multipart("/upload", upload_body(b"not a workbook"), Some(&session)),
        &state,
    )
    .expect("upload failed");
    assert_eq!(resp.status(), 302);
    let loc = location(&resp);
    assert!(loc.starts_with("/dashboard?"));
    assert!(loc.contains("notice=error"));

    // The session keeps no dataset from it.
    let body = body_string(handle(get("/dashboard", Some(&session)), &state).unwrap());
    assert!(body.contains("Please upload a valid Excel file to view the dashboard."));
}

#[test]
fn reupload_replaces_the_dataset() {
    let state = test_state();
    let session = session_with_upload(&state, &permits_workbook());

    let resp = handle(
        post_multipart("/upload", upload_body(&dateless_workbook()), Some(&session)),
        &state,
    )
    .expect("upload failed");
    assert_eq!(resp.status(), 302);

    let body = body_string(handle(get("/dashboard", Some(&session)), &state).unwrap());
    assert!(body.contains("(1 records)"));
    assert!(!body.contains("PTW-1"));
    assert!(body.contains("PTW-9"));
}

#[test]
fn upload_requires_login() {
    let state = test_state();

    let resp = handle(
        post_multipart("/upload", upload_body(&permits_workbook()), None),
        &state,
    )
    .expect("upload failed");
    assert_eq!(resp.status(), 302);
    assert_eq!(location(&resp), "/login");
}
