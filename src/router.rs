use crate::app::AppState;
use crate::auth::session::{session_id_from_request, SESSION_COOKIE};
use crate::auth::state::AuthState;
use crate::dashboard::{self, DashboardQuery};
use crate::errors::ServerError;
use crate::forms::{multipart_boundary, parse_multipart, read_body, FormValues};
use crate::responses::{
    html_response, html_response_with_status, redirect, redirect_with_notice, ResultResp,
};
use crate::spreadsheets::{export_plant_xlsx, export_summary_xlsx, import_permits};
use crate::templates::pages::{
    dashboard_page, login_page, register_page, AdminVm, DashboardVm, LoginVm, RegisterVm,
    UserRowVm,
};
use crate::templates::Notice;
use crate::users::{NewUser, RegisterError, RemoveError, Role};
use astra::{Request, Response};
use std::sync::Arc;

const NO_DATASET_MESSAGE: &str = "Please upload a valid Excel file to view the dashboard.";

pub fn handle(req: Request, state: &AppState) -> ResultResp {
    let (session_id, new_session) = resolve_session(&req, state)?;
    let auth = state
        .sessions
        .auth(&session_id)?
        .unwrap_or_else(AuthState::anonymous);

    let method = req.method().clone();
    let path = req.uri().path().to_string();

    let result = match (method.as_str(), path.as_str()) {
        ("GET", "/") => {
            if auth.signed_in_user().is_some() {
                redirect("/dashboard")
            } else {
                redirect("/login")
            }
        }
        ("GET", "/login") => get_login(&req, &auth),
        ("POST", "/login") => post_login(req, state, &session_id, &auth),
        ("GET", "/register") => get_register(&req, &auth),
        ("POST", "/register") => post_register(req, state, &auth),
        ("POST", "/logout") => post_logout(state, &session_id),
        ("GET", "/dashboard") => get_dashboard(&req, state, &session_id, &auth),
        ("POST", "/upload") => post_upload(req, state, &session_id, &auth),
        ("GET", "/export/summary") => get_export_summary(&req, state, &session_id, &auth),
        ("GET", "/export/plant") => get_export_plant(&req, state, &session_id, &auth),
        ("POST", "/admin/users") => post_admin_add(req, state, &auth),
        ("POST", "/admin/users/remove") => post_admin_remove(req, state, &auth),
        _ => Err(ServerError::NotFound),
    };

    let mut resp = result?;
    if new_session {
        attach_session_cookie(&mut resp, &session_id)?;
    }
    Ok(resp)
}

/// Reuse the session named by the cookie when it is still alive; otherwise
/// start a fresh one. The bool says whether a Set-Cookie is needed.
fn resolve_session(req: &Request, state: &AppState) -> Result<(String, bool), ServerError> {
    if let Some(id) = session_id_from_request(req) {
        if state.sessions.exists(&id)? {
            return Ok((id, false));
        }
    }
    Ok((state.sessions.create()?, true))
}

fn attach_session_cookie(resp: &mut Response, session_id: &str) -> Result<(), ServerError> {
    let value = format!("{SESSION_COOKIE}={session_id}; Path=/; HttpOnly");
    let header = value.parse().map_err(|_| ServerError::InternalError)?;
    resp.headers_mut().insert("set-cookie", header);
    Ok(())
}

/// One-shot banner carried over from a redirect.
fn notice_from_query(form: &FormValues) -> Option<Notice> {
    let kind = form.first("notice")?;
    let message = form.first("message")?;
    Some(Notice::new(kind, message))
}

fn render_login(notice: Option<Notice>, locked: bool, status: u16) -> ResultResp {
    html_response_with_status(status, login_page(&LoginVm { notice, locked }))
}

fn get_login(req: &Request, auth: &AuthState) -> ResultResp {
    if auth.is_locked() {
        return render_login(None, true, 403);
    }
    if auth.signed_in_user().is_some() {
        return redirect("/dashboard");
    }
    let form = FormValues::from_query(req.uri().query());
    render_login(notice_from_query(&form), false, 200)
}

fn post_login(req: Request, state: &AppState, session_id: &str, auth: &AuthState) -> ResultResp {
    if auth.is_locked() {
        return render_login(None, true, 403);
    }

    let form = FormValues::from_urlencoded(&read_body(req.into_body())?);
    let username = form.first("username").unwrap_or("").to_string();
    let password = form.first("password").unwrap_or("");

    let users = state.with_users(|store| store.load())?;
    match users.get(&username) {
        Some(user) if state.hasher.verify(password, &user.password_hash) => {
            state
                .sessions
                .set_auth(session_id, AuthState::signed_in(&username, user.role))?;
            log::info!("user {username} signed in");
            redirect("/dashboard")
        }
        _ => {
            let next = auth.after_failure();
            let now_locked = next.is_locked();
            state.sessions.set_auth(session_id, next)?;
            if now_locked {
                log::warn!("session locked after repeated failed logins");
                render_login(None, true, 403)
            } else {
                render_login(
                    Some(Notice::new("error", "Invalid username or password")),
                    false,
                    401,
                )
            }
        }
    }
}

fn get_register(req: &Request, auth: &AuthState) -> ResultResp {
    if auth.is_locked() {
        return redirect("/login");
    }
    if auth.signed_in_user().is_some() {
        return redirect("/dashboard");
    }
    let form = FormValues::from_query(req.uri().query());
    html_response(register_page(&RegisterVm {
        notice: notice_from_query(&form),
    }))
}

fn post_register(req: Request, state: &AppState, auth: &AuthState) -> ResultResp {
    if auth.is_locked() {
        return redirect("/login");
    }

    let form = FormValues::from_urlencoded(&read_body(req.into_body())?);
    let username = form.first("username").unwrap_or("").to_string();
    let name = form.first("name").unwrap_or("").to_string();
    let password = form.first("password").unwrap_or("").to_string();
    let confirm = form.first("confirm_password").unwrap_or("");

    // Checked before anything else, like the legacy form.
    if password != confirm {
        return redirect_with_notice("/register", "error", "Passwords do not match!");
    }

    let user = NewUser {
        username: username.clone(),
        name,
        password,
        role: Role::User,
    };
    match state.with_users(|store| store.add(user, state.hasher.as_ref())) {
        Ok(()) => redirect_with_notice(
            "/login",
            "success",
            &format!("User {username} registered successfully!"),
        ),
        Err(RegisterError::Store(err)) => Err(err),
        Err(err) => redirect_with_notice("/register", "error", &err.to_string()),
    }
}

fn post_logout(state: &AppState, session_id: &str) -> ResultResp {
    state.sessions.reset(session_id)?;
    redirect("/login")
}

fn get_dashboard(req: &Request, state: &AppState, session_id: &str, auth: &AuthState) -> ResultResp {
    let (username, role) = match auth.signed_in_user() {
        Some(user) => user,
        None => return redirect("/login"),
    };

    let form = FormValues::from_query(req.uri().query());
    let dataset = state.sessions.dataset(session_id)?;
    let upload = match &dataset {
        Some(dataset) => Some(dashboard::upload_vm(dataset, &form)?),
        None => None,
    };

    let admin = if role.is_admin() {
        let users = state.with_users(|store| store.load())?;
        Some(AdminVm {
            users: users
                .iter()
                .map(|(username, record)| UserRowVm {
                    username: username.clone(),
                    name: record.name.clone(),
                    role: record.role.label().to_string(),
                })
                .collect(),
            removable: users.removable_by(username),
        })
    } else {
        None
    };

    html_response(dashboard_page(&DashboardVm {
        username: username.to_string(),
        role,
        notice: notice_from_query(&form),
        upload,
        admin,
    }))
}

fn post_upload(req: Request, state: &AppState, session_id: &str, auth: &AuthState) -> ResultResp {
    if auth.signed_in_user().is_none() {
        return redirect("/login");
    }

    let (parts, body) = req.into_parts();
    let content_type = parts
        .headers
        .get("content-type")
        .and_then(|v| v.to_str().ok())
        .unwrap_or("");
    let boundary = multipart_boundary(content_type)
        .ok_or_else(|| ServerError::BadRequest("Expected a multipart file upload".into()))?;
    let bytes = read_body(body)?;
    let form = parse_multipart(&bytes, &boundary)?;
    let file = form
        .file("file")
        .ok_or_else(|| ServerError::BadRequest("No file was uploaded".into()))?;

    match import_permits(&file.file_name, &file.bytes) {
        Ok(dataset) => {
            log::info!(
                "session loaded {} ({} records)",
                dataset.file_name,
                dataset.records.len()
            );
            state.sessions.set_dataset(session_id, Arc::new(dataset))?;
            redirect_with_notice("/dashboard", "success", "File uploaded successfully!")
        }
        // Unreadable uploads land back on the dashboard with the reason.
        Err(ServerError::BadRequest(message)) => {
            redirect_with_notice("/dashboard", "error", &message)
        }
        Err(err) => Err(err),
    }
}

fn get_export_summary(
    req: &Request,
    state: &AppState,
    session_id: &str,
    auth: &AuthState,
) -> ResultResp {
    if auth.signed_in_user().is_none() {
        return redirect("/login");
    }
    let dataset = match state.sessions.dataset(session_id)? {
        Some(dataset) => dataset,
        None => return redirect_with_notice("/dashboard", "warning", NO_DATASET_MESSAGE),
    };

    let form = FormValues::from_query(req.uri().query());
    let eval = dashboard::evaluate(&dataset, &DashboardQuery::from_form(&form));
    export_summary_xlsx(&eval.summary)
}

fn get_export_plant(
    req: &Request,
    state: &AppState,
    session_id: &str,
    auth: &AuthState,
) -> ResultResp {
    if auth.signed_in_user().is_none() {
        return redirect("/login");
    }
    let dataset = match state.sessions.dataset(session_id)? {
        Some(dataset) => dataset,
        None => return redirect_with_notice("/dashboard", "warning", NO_DATASET_MESSAGE),
    };

    let form = FormValues::from_query(req.uri().query());
    let eval = dashboard::evaluate(&dataset, &DashboardQuery::from_form(&form));
    match &eval.plant {
        Some(plant) => export_plant_xlsx(plant),
        None => redirect_with_notice("/dashboard", "warning", "No data found for selected plant"),
    }
}

fn require_admin(auth: &AuthState) -> Result<&str, ServerError> {
    match auth.signed_in_user() {
        Some((username, role)) if role.is_admin() => Ok(username),
        _ => Err(ServerError::Unauthorized("Admin access required".into())),
    }
}

fn post_admin_add(req: Request, state: &AppState, auth: &AuthState) -> ResultResp {
    require_admin(auth)?;

    let form = FormValues::from_urlencoded(&read_body(req.into_body())?);
    let username = form.first("username").unwrap_or("").to_string();
    let user = NewUser {
        username: username.clone(),
        name: form.first("name").unwrap_or("").to_string(),
        password: form.first("password").unwrap_or("").to_string(),
        role: Role::parse(form.first("role").unwrap_or("user")),
    };

    match state.with_users(|store| store.add(user, state.hasher.as_ref())) {
        Ok(()) => redirect_with_notice(
            "/dashboard",
            "success",
            &format!("User {username} registered successfully!"),
        ),
        Err(RegisterError::Store(err)) => Err(err),
        Err(err) => redirect_with_notice("/dashboard", "error", &err.to_string()),
    }
}

fn post_admin_remove(req: Request, state: &AppState, auth: &AuthState) -> ResultResp {
    let current = require_admin(auth)?.to_string();

    let form = FormValues::from_urlencoded(&read_body(req.into_body())?);
    let username = form.first("username").unwrap_or("").to_string();

    match state.with_users(|store| store.remove(&username, &current)) {
        Ok(()) => redirect_with_notice(
            "/dashboard",
            "success",
            &format!("User {username} removed successfully!"),
        ),
        Err(RemoveError::Store(err)) => Err(err),
        Err(err) => redirect_with_notice("/dashboard", "error", &err.to_string()),
    }
}
