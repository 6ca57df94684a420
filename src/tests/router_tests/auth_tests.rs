// src/tests/router_tests/auth_tests.rs
//
// Login, lockout and logout through the router.

use crate::router::handle;
use crate::tests::utils::{
    body_string, get, location, post_form, session_cookie, sign_in, test_state,
};

#[test]
fn root_redirects_by_auth_state() {
    let state = test_state();

    // Anonymous visitors land on the login page.
    let resp = handle(get("/", None), &state).expect("root request failed");
    assert_eq!(resp.status(), 302);
    assert_eq!(location(&resp), "/login");

    // Signed-in sessions go straight to the dashboard.
    let session = sign_in(&state, "admin", "admin123");
    let resp = handle(get("/", Some(&session)), &state).expect("root request failed");
    assert_eq!(resp.status(), 302);
    assert_eq!(location(&resp), "/dashboard");
}

#[test]
fn login_page_renders_the_form() {
    let state = test_state();

    let resp = handle(get("/login", None), &state).expect("login page failed");
    assert_eq!(resp.status(), 200);

    // A fresh visitor gets a session cookie with the page.
    assert!(session_cookie(&resp).is_some());

    let body = body_string(resp);
    assert!(body.contains("🔒 Permit Dashboard Authentication"));
    assert!(body.contains("Login to Dashboard"));
    assert!(body.contains("name=\"username\""));
    assert!(body.contains("name=\"password\""));
}

#[test]
fn dead_session_cookies_get_a_replacement() {
    let state = test_state();

    // A cookie naming a session the server no longer tracks (expired or
    // never issued) is answered with a fresh one.
    let resp = handle(get("/login", Some("gone-stale")), &state).expect("login page failed");
    assert_eq!(resp.status(), 200);
    let fresh = session_cookie(&resp).expect("response should set a new session cookie");
    assert_ne!(fresh, "gone-stale");
}

#[test]
fn valid_credentials_sign_in_and_redirect() {
    let state = test_state();

    let resp = handle(
        post_form("/login", "username=admin&password=admin123", None),
        &state,
    )
    .expect("login failed");
    assert_eq!(resp.status(), 302);
    assert_eq!(location(&resp), "/dashboard");
    let session = session_cookie(&resp).expect("login should set the session cookie");

    // The session is now authenticated.
    let resp = handle(get("/dashboard", Some(&session)), &state).expect("dashboard failed");
    assert_eq!(resp.status(), 200);

    // Revisiting the login page bounces back to the dashboard.
    let resp = handle(get("/login", Some(&session)), &state).expect("login page failed");
    assert_eq!(resp.status(), 302);
    assert_eq!(location(&resp), "/dashboard");
}

#[test]
fn wrong_credentials_are_rejected_with_a_banner() {
    let state = test_state();

    let resp = handle(
        post_form("/login", "username=admin&password=nope", None),
        &state,
    )
    .expect("login failed");
    assert_eq!(resp.status(), 401);
    let body = body_string(resp);
    assert!(body.contains("Invalid username or password"));
    // The form stays up for another try.
    assert!(body.contains("name=\"username\""));

    // Unknown usernames get the same answer as bad passwords.
    let resp = handle(
        post_form("/login", "username=ghost&password=admin123", None),
        &state,
    )
    .expect("login failed");
    assert_eq!(resp.status(), 401);
}

#[test]
fn third_failure_locks_the_session() {
    let state = test_state();

    // 1️⃣ First failure establishes the session cookie.
    let resp = handle(
        post_form("/login", "username=admin&password=nope", None),
        &state,
    )
    .expect("login failed");
    assert_eq!(resp.status(), 401);
    let session = session_cookie(&resp).expect("response should set the session cookie");

    // 2️⃣ Second failure on the same session: still just rejected.
    let resp = handle(
        post_form("/login", "username=admin&password=nope", Some(&session)),
        &state,
    )
    .expect("login failed");
    assert_eq!(resp.status(), 401);

    // 3️⃣ Third failure locks the session out.
    let resp = handle(
        post_form("/login", "username=admin&password=nope", Some(&session)),
        &state,
    )
    .expect("login failed");
    assert_eq!(resp.status(), 403);
    let body = body_string(resp);
    assert!(body.contains("Too many failed attempts. Please try again later."));
    // The login form is gone.
    assert!(!body.contains("name=\"username\""));

    // 4️⃣ Correct credentials no longer help this session.
    let resp = handle(
        post_form("/login", "username=admin&password=admin123", Some(&session)),
        &state,
    )
    .expect("login failed");
    assert_eq!(resp.status(), 403);

    // GET shows the locked page too, and registration is refused.
    let resp = handle(get("/login", Some(&session)), &state).expect("login page failed");
    assert_eq!(resp.status(), 403);
    let resp = handle(get("/register", Some(&session)), &state).expect("register page failed");
    assert_eq!(resp.status(), 302);
    assert_eq!(location(&resp), "/login");

    // A fresh session is unaffected.
    let resp = handle(
        post_form("/login", "username=admin&password=admin123", None),
        &state,
    )
    .expect("login failed");
    assert_eq!(resp.status(), 302);
}

#[test]
fn successful_login_clears_the_failure_count() {
    let state = test_state();

    // Two failures, then a success on the same session.
    let resp = handle(
        post_form("/login", "username=admin&password=nope", None),
        &state,
    )
    .expect("login failed");
    let session = session_cookie(&resp).expect("response should set the session cookie");
    let resp = handle(
        post_form("/login", "username=admin&password=nope", Some(&session)),
        &state,
    )
    .expect("login failed");
    assert_eq!(resp.status(), 401);
    let resp = handle(
        post_form("/login", "username=admin&password=admin123", Some(&session)),
        &state,
    )
    .expect("login failed");
    assert_eq!(resp.status(), 302);

    // Sign out and fail twice more: the old strikes are forgotten.
    let resp = handle(post_form("/logout", "", Some(&session)), &state).expect("logout failed");
    assert_eq!(resp.status(), 302);
    for _ in 0..2 {
        let resp = handle(
            post_form("/login", "username=admin&password=nope", Some(&session)),
            &state,
        )
        .expect("login failed");
        assert_eq!(resp.status(), 401);
    }
    let resp = handle(
        post_form("/login", "username=admin&password=admin123", Some(&session)),
        &state,
    )
    .expect("login failed");
    assert_eq!(resp.status(), 302);
}

#[test]
fn logout_resets_the_session() {
    let state = test_state();
    let session = sign_in(&state, "admin", "admin123");

    let resp = handle(post_form("/logout", "", Some(&session)), &state).expect("logout failed");
    assert_eq!(resp.status(), 302);
    assert_eq!(location(&resp), "/login");

    // The old cookie no longer opens the dashboard.
    let resp = handle(get("/dashboard", Some(&session)), &state).expect("dashboard failed");
    assert_eq!(resp.status(), 302);
    assert_eq!(location(&resp), "/login");
}

#[test]
fn unknown_routes_are_not_found() {
    let state = test_state();
    let err = handle(get("/no/such/page", None), &state).unwrap_err();
    assert!(matches!(err, crate::errors::ServerError::NotFound));
}
