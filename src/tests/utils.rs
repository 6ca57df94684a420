use crate::app::AppState;
use crate::router::handle;
use crate::users::MemoryUserStore;
use astra::{Body, Request, Response};
use http::Method;
use std::io::Read;

pub const UPLOAD_BOUNDARY: &str = "permit-test-boundary";

/// Fresh app state over an in-memory user store seeded with the default
/// admin account ("admin" / "admin123").
pub fn test_state() -> AppState {
    AppState::new(MemoryUserStore::seeded())
}

pub fn get(uri: &str, session: Option<&str>) -> Request {
    request(Method::GET, uri, Body::empty(), None, session)
}

pub fn post_form(uri: &str, body: &str, session: Option<&str>) -> Request {
    request(
        Method::POST,
        uri,
        Body::from(body.as_bytes().to_vec()),
        Some("application/x-www-form-urlencoded".to_string()),
        session,
    )
}

pub fn post_multipart(uri: &str, body: Vec<u8>, session: Option<&str>) -> Request {
    let content_type = format!("multipart/form-data; boundary={UPLOAD_BOUNDARY}");
    request(Method::POST, uri, Body::from(body), Some(content_type), session)
}

fn request(
    method: Method,
    uri: &str,
    body: Body,
    content_type: Option<String>,
    session: Option<&str>,
) -> Request {
    let mut builder = http::Request::builder().method(method).uri(uri);
    if let Some(content_type) = content_type {
        builder = builder.header("Content-Type", content_type);
    }
    if let Some(session) = session {
        builder = builder.header("Cookie", format!("session={session}"));
    }
    builder.body(body).unwrap()
}

pub fn body_string(resp: Response) -> String {
    let mut body = String::new();
    resp.into_body()
        .reader()
        .read_to_string(&mut body)
        .unwrap();
    body
}

pub fn body_bytes(resp: Response) -> Vec<u8> {
    let mut body = Vec::new();
    resp.into_body().reader().read_to_end(&mut body).unwrap();
    body
}

/// The session id named by a response's Set-Cookie header, if present.
pub fn session_cookie(resp: &Response) -> Option<String> {
    let raw = resp.headers().get("set-cookie")?.to_str().ok()?;
    let value = raw.strip_prefix("session=")?;
    Some(value.split(';').next()?.to_string())
}

/// The Location header on a redirect response.
pub fn location(resp: &Response) -> String {
    resp.headers()
        .get("location")
        .expect("response should carry a Location header")
        .to_str()
        .unwrap()
        .to_string()
}

/// POST valid credentials and return the session id the cookie names.
pub fn sign_in(state: &AppState, username: &str, password: &str) -> String {
    let body = format!("username={username}&password={password}");
    let resp = handle(post_form("/login", &body, None), state)
        .unwrap_or_else(|e| panic!("Login request failed: {e}"));

    assert_eq!(resp.status(), 302, "login should redirect to the dashboard");
    session_cookie(&resp).expect("login response should set the session cookie")
}

/// Sign in as the seeded admin, upload the given workbook bytes, and return
/// the session id.
pub fn session_with_upload(state: &AppState, workbook: &[u8]) -> String {
    let session = sign_in(state, "admin", "admin123");
    let resp = handle(
        post_multipart("/upload", upload_body(workbook), Some(&session)),
        state,
    )
    .unwrap_or_else(|e| panic!("Upload request failed: {e}"));

    assert_eq!(resp.status(), 302, "upload should redirect to the dashboard");
    session
}

/// Wrap workbook bytes in the multipart body the upload form would send.
pub fn upload_body(workbook: &[u8]) -> Vec<u8> {
    let mut body = Vec::new();
    body.extend_from_slice(format!("--{UPLOAD_BOUNDARY}\r\n").as_bytes());
    body.extend_from_slice(
        b"Content-Disposition: form-data; name=\"file\"; filename=\"permits.xlsx\"\r\n",
    );
    body.extend_from_slice(b"Content-Type: application/octet-stream\r\n\r\n");
    body.extend_from_slice(workbook);
    body.extend_from_slice(format!("\r\n--{UPLOAD_BOUNDARY}--\r\n").as_bytes());
    body
}

/// A small permit workbook spanning several departments, areas, workflow
/// states and created dates.
pub fn permits_workbook() -> Vec<u8> {
    workbook_from_rows(&[
        ["PTW-1", "CIVIL", "CPP-A", "OPEN", "2024-01-10"],
        ["PTW-2", "CIVIL", "Power Plant 2", "CLOSED", "2024-02-15"],
        ["PTW-3", "FIRE", "HDPE Silo", "EXPIRED", "2024-03-20"],
        ["PTW-4", "MECHANICAL", "NCU Furnace", "PENDING CLOSURE", "2024-03-25"],
    ])
}

pub fn workbook_from_rows(rows: &[[&str; 5]]) -> Vec<u8> {
    let mut workbook = rust_xlsxwriter::Workbook::new();
    let worksheet = workbook.add_worksheet();

    let header = [
        "Permit Number",
        "Department",
        "Responsibility Areas",
        "Workflow State",
        "Created Date",
    ];
    for (col, name) in header.iter().enumerate() {
        worksheet.write_string(0, col as u16, *name).unwrap();
    }
    for (i, row) in rows.iter().enumerate() {
        for (col, value) in row.iter().enumerate() {
            worksheet
                .write_string((i + 1) as u32, col as u16, *value)
                .unwrap();
        }
    }

    workbook.save_to_buffer().unwrap()
}

/// A workbook whose header is missing the Created Date column entirely.
pub fn dateless_workbook() -> Vec<u8> {
    let mut workbook = rust_xlsxwriter::Workbook::new();
    let worksheet = workbook.add_worksheet();

    let header = [
        "Permit Number",
        "Department",
        "Responsibility Areas",
        "Workflow State",
    ];
    for (col, name) in header.iter().enumerate() {
        worksheet.write_string(0, col as u16, *name).unwrap();
    }
    for (col, value) in ["PTW-9", "CIVIL", "CPP-B", "OPEN"].iter().enumerate() {
        worksheet.write_string(1, col as u16, *value).unwrap();
    }

    workbook.save_to_buffer().unwrap()
}
