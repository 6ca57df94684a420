// src/tests/router_tests/export_tests.rs
//
// The two download routes, read back through calamine so the files are
// checked as a spreadsheet consumer would see them.

use crate::router::handle;
use crate::tests::utils::{
    body_bytes, get, location, permits_workbook, session_with_upload, sign_in, test_state,
};
use calamine::{Data, Reader, Xlsx};
use std::io::Cursor;

fn sheet_rows(bytes: Vec<u8>, sheet: &str) -> Vec<Vec<Data>> {
    let mut workbook = Xlsx::new(Cursor::new(bytes)).expect("response should be a workbook");
    let range = workbook
        .worksheet_range(sheet)
        .unwrap_or_else(|e| panic!("missing sheet {sheet}: {e}"));
    range.rows().map(|r| r.to_vec()).collect()
}

#[test]
fn summary_export_round_trips() {
    let state = test_state();
    let session = session_with_upload(&state, &permits_workbook());

    let resp = handle(get("/export/summary", Some(&session)), &state).expect("export failed");
    assert_eq!(resp.status(), 200);
    assert_eq!(
        resp.headers().get("Content-Type").unwrap(),
        "application/vnd.openxmlformats-officedocument.spreadsheetml.sheet"
    );
    let disposition = resp
        .headers()
        .get("Content-Disposition")
        .unwrap()
        .to_str()
        .unwrap()
        .to_string();
    assert!(disposition.contains("Custom_Permit_Summary.xlsx"));

    let rows = sheet_rows(body_bytes(resp), "Custom Summary");

    // Header, three area rows, TOTAL last.
    assert_eq!(rows.len(), 5);
    assert_eq!(rows[0][0], Data::String("RESPONSIBILITY AREAS".into()));
    assert_eq!(rows[0][2], Data::String("CIVIL".into()));
    assert_eq!(rows[0][10], Data::String("CLOSED".into()));

    assert_eq!(
        rows[1][0],
        Data::String("CPP (Including Power Plant Areas)".into())
    );
    assert_eq!(rows[1][2], Data::Float(2.0)); // CIVIL
    assert_eq!(rows[1][10], Data::Float(1.0)); // CLOSED

    assert_eq!(rows[4][0], Data::String("TOTAL".into()));
    assert_eq!(rows[4][2], Data::Float(2.0)); // CIVIL
    assert_eq!(rows[4][8], Data::Float(1.0)); // EXPIRED
    assert_eq!(rows[4][9], Data::Float(1.0)); // PENDING CLOSURE
    assert_eq!(rows[4][10], Data::Float(1.0)); // CLOSED
}

#[test]
fn summary_export_honors_the_filter_query() {
    let state = test_state();
    let session = session_with_upload(&state, &permits_workbook());

    // Same query string the dashboard's download link carries.
    let resp = handle(
        get(
            "/export/summary?dept=CIVIL&cols_submitted=1&col=CIVIL&col=CLOSED",
            Some(&session),
        ),
        &state,
    )
    .expect("export failed");
    assert_eq!(resp.status(), 200);

    let rows = sheet_rows(body_bytes(resp), "Custom Summary");

    // Projected columns only, and just the CPP row survives the filter.
    assert_eq!(rows.len(), 3);
    assert_eq!(rows[0].len(), 3);
    assert_eq!(rows[0][1], Data::String("CIVIL".into()));
    assert_eq!(rows[0][2], Data::String("CLOSED".into()));
    assert_eq!(
        rows[1][0],
        Data::String("CPP (Including Power Plant Areas)".into())
    );
    assert_eq!(rows[2][0], Data::String("TOTAL".into()));
    assert_eq!(rows[2][1], Data::Float(2.0));
    assert_eq!(rows[2][2], Data::Float(1.0));
}

#[test]
fn plant_export_round_trips() {
    let state = test_state();
    let session = session_with_upload(&state, &permits_workbook());

    // No query: the plant defaults to CPP like the dashboard.
    let resp = handle(get("/export/plant", Some(&session)), &state).expect("export failed");
    assert_eq!(resp.status(), 200);
    let disposition = resp
        .headers()
        .get("Content-Disposition")
        .unwrap()
        .to_str()
        .unwrap()
        .to_string();
    assert!(disposition.contains("Plantwise_Summary.xlsx"));

    let rows = sheet_rows(body_bytes(resp), "Plantwise Summary");
    assert_eq!(rows.len(), 3);
    assert_eq!(rows[0][0], Data::String("RESPONSIBILITY AREA".into()));
    assert_eq!(rows[0][2], Data::String("Permit Count".into()));
    assert_eq!(
        rows[1][0],
        Data::String("CPP (Including Power Plant Areas)".into())
    );
    assert_eq!(rows[1][1], Data::String("CIVIL".into()));
    assert_eq!(rows[1][2], Data::Float(2.0));
    assert_eq!(rows[2][0], Data::String("TOTAL".into()));
    assert_eq!(rows[2][2], Data::Float(2.0));
}

#[test]
fn plant_export_with_no_matches_redirects_with_a_warning() {
    let state = test_state();
    let session = session_with_upload(&state, &permits_workbook());

    let resp = handle(get("/export/plant?plant=LLDPE", Some(&session)), &state)
        .expect("export failed");
    assert_eq!(resp.status(), 302);
    let loc = location(&resp);
    assert!(loc.starts_with("/dashboard?"));
    assert!(loc.contains("No+data+found+for+selected+plant"));
}

#[test]
fn exports_need_a_dataset() {
    let state = test_state();
    let session = sign_in(&state, "admin", "admin123");

    for uri in ["/export/summary", "/export/plant"] {
        let resp = handle(get(uri, Some(&session)), &state).expect("export failed");
        assert_eq!(resp.status(), 302);
        let loc = location(&resp);
        assert!(loc.starts_with("/dashboard?"));
        assert!(loc.contains("notice=warning"));
    }
}

#[test]
fn exports_need_a_login() {
    let state = test_state();

    for uri in ["/export/summary", "/export/plant"] {
        let resp = handle(get(uri, None), &state).expect("export failed");
        assert_eq!(resp.status(), 302);
        assert_eq!(location(&resp), "/login");
    }
}
