use axum::{
    body::Body,
    extract::FromRef,
    http::{header, Method, Request, StatusCode},
    Router,
};
use http_body_util::BodyExt;
use serde_json::{json, Value};
use time::{Duration, OffsetDateTime};
use tower::ServiceExt;

use enrolld::{app::build_app, auth::session::SessionKeys, catalog, state::AppState};

async fn test_state() -> AppState {
    let state = AppState::for_tests().await.expect("test state");
    sqlx::migrate!("./migrations")
        .run(&state.db)
        .await
        .expect("migrations");
    state
}

fn json_request(method: Method, uri: &str, body: Value) -> Request<Body> {
    Request::builder()
        .method(method)
        .uri(uri)
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from(body.to_string()))
        .expect("request")
}

fn get_request(uri: &str, cookie: Option<&str>) -> Request<Body> {
    let mut builder = Request::builder().method(Method::GET).uri(uri);
    if let Some(cookie) = cookie {
        builder = builder.header(header::COOKIE, cookie.to_string());
    }
    builder.body(Body::empty()).expect("request")
}

async fn body_json(response: axum::response::Response) -> Value {
    let bytes = response
        .into_body()
        .collect()
        .await
        .expect("body")
        .to_bytes();
    serde_json::from_slice(&bytes).expect("json body")
}

/// First `name=value` pair of the response's Set-Cookie header.
fn set_cookie_pair(response: &axum::response::Response) -> String {
    let raw = response
        .headers()
        .get(header::SET_COOKIE)
        .expect("set-cookie header")
        .to_str()
        .expect("ascii cookie");
    raw.split(';').next().unwrap().to_string()
}

async fn register(app: &Router, username: &str, password: &str) -> axum::response::Response {
    app.clone()
        .oneshot(json_request(
            Method::POST,
            "/register",
            json!({ "username": username, "password": password }),
        ))
        .await
        .unwrap()
}

async fn login(app: &Router, username: &str, password: &str) -> axum::response::Response {
    app.clone()
        .oneshot(json_request(
            Method::POST,
            "/login",
            json!({ "username": username, "password": password }),
        ))
        .await
        .unwrap()
}

#[tokio::test]
async fn register_login_dashboard_profile_scenario() {
    let state = test_state().await;
    let app = build_app(state.clone());

    let res = register(&app, "alice_01", "Passw0rd").await;
    assert_eq!(res.status(), StatusCode::CREATED);
    assert_eq!(body_json(res).await["message"], "Registration successful");

    let res = login(&app, "alice_01", "Passw0rd").await;
    assert_eq!(res.status(), StatusCode::OK);
    let cookie = set_cookie_pair(&res);
    assert!(cookie.starts_with("session="));
    assert_eq!(body_json(res).await["message"], "Login successful");

    let res = app
        .clone()
        .oneshot(get_request("/dashboard", Some(&cookie)))
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::OK);
    let dashboard = body_json(res).await;
    assert_eq!(dashboard["user"]["handle"], "alice_01");
    assert_eq!(dashboard["activities"].as_array().unwrap().len(), 0);
    assert_eq!(dashboard["courses"].as_array().unwrap().len(), 0);

    let mut req = json_request(Method::POST, "/profile", json!({ "email": "a@x.com" }));
    req.headers_mut()
        .insert(header::COOKIE, cookie.parse().unwrap());
    let res = app.clone().oneshot(req).await.unwrap();
    assert_eq!(res.status(), StatusCode::OK);
    let updated = body_json(res).await;
    assert_eq!(updated["message"], "Profile updated");
    assert_eq!(updated["profile"]["email"], "a@x.com");

    let res = app
        .clone()
        .oneshot(get_request("/profile", Some(&cookie)))
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::OK);
    let profile = body_json(res).await;
    assert_eq!(profile["email"], "a@x.com");
    assert_eq!(profile["handle"], "alice_01");
    assert!(profile.get("password_digest").is_none());
}

#[tokio::test]
async fn duplicate_registration_leaves_one_row() {
    let state = test_state().await;
    let app = build_app(state.clone());

    let res = register(&app, "bob", "Passw0rd").await;
    assert_eq!(res.status(), StatusCode::CREATED);

    let res = register(&app, "bob", "0therPass").await;
    assert_eq!(res.status(), StatusCode::BAD_REQUEST);
    assert_eq!(body_json(res).await["message"], "Username already exists");

    let count = sqlx::query_scalar::<_, i64>("SELECT COUNT(*) FROM users WHERE handle = 'bob'")
        .fetch_one(&state.db)
        .await
        .unwrap();
    assert_eq!(count, 1);
}

#[tokio::test]
async fn registration_validates_handles_and_passwords() {
    let state = test_state().await;
    let app = build_app(state);

    // Username too short.
    let res = register(&app, "ab", "Passw0rd").await;
    assert_eq!(res.status(), StatusCode::BAD_REQUEST);

    // Contains '@' so it must fail as a bad email, not pass as a username.
    let res = register(&app, "bad@x", "Passw0rd").await;
    assert_eq!(res.status(), StatusCode::BAD_REQUEST);
    assert_eq!(body_json(res).await["message"], "Invalid email address");

    // A valid email is accepted as a handle.
    let res = register(&app, "carol@example.com", "Passw0rd").await;
    assert_eq!(res.status(), StatusCode::CREATED);

    // Composition failures surface the first failing reason only.
    let res = register(&app, "dave", "abcdefg1").await;
    assert_eq!(res.status(), StatusCode::BAD_REQUEST);
    assert_eq!(
        body_json(res).await["message"],
        "Password must contain an uppercase letter"
    );

    let res = register(&app, "dave", "Ab1").await;
    assert_eq!(res.status(), StatusCode::BAD_REQUEST);
    assert_eq!(
        body_json(res).await["message"],
        "Password is too short, at least 8 characters required"
    );

    // Empty fields are rejected before classification.
    let res = register(&app, "", "").await;
    assert_eq!(res.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn incomplete_body_is_a_json_validation_error() {
    let state = test_state().await;
    let app = build_app(state);

    // Missing `password`: must come back as our 400 {message} body, not the
    // extractor's plain-text 422.
    let res = app
        .clone()
        .oneshot(json_request(
            Method::POST,
            "/register",
            json!({ "username": "alice_01" }),
        ))
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::BAD_REQUEST);
    let content_type = res.headers()[header::CONTENT_TYPE].to_str().unwrap().to_string();
    assert!(content_type.starts_with("application/json"));
    assert!(body_json(res).await["message"].is_string());

    let res = app
        .clone()
        .oneshot(json_request(
            Method::POST,
            "/login",
            json!({ "password": "Passw0rd" }),
        ))
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::BAD_REQUEST);
    assert!(body_json(res).await["message"].is_string());
}

#[tokio::test]
async fn login_does_not_distinguish_unknown_handle_from_wrong_password() {
    let state = test_state().await;
    let app = build_app(state);

    register(&app, "erin", "Passw0rd").await;

    let wrong_password = login(&app, "erin", "WrongPass1").await;
    assert_eq!(wrong_password.status(), StatusCode::UNAUTHORIZED);
    let wrong_body = body_json(wrong_password).await;

    let unknown_handle = login(&app, "nobody", "WrongPass1").await;
    assert_eq!(unknown_handle.status(), StatusCode::UNAUTHORIZED);
    let unknown_body = body_json(unknown_handle).await;

    assert_eq!(wrong_body, unknown_body);
}

#[tokio::test]
async fn login_keeps_the_legacy_length_rule() {
    let state = test_state().await;
    let app = build_app(state);

    register(&app, "frank", "Passw0rd").await;

    // Five characters fail the legacy >= 6 check with a validation error.
    let res = login(&app, "frank", "abcde").await;
    assert_eq!(res.status(), StatusCode::BAD_REQUEST);

    // Six characters pass the length gate (which registration would reject)
    // and fall through to ordinary credential verification.
    let res = login(&app, "frank", "abcdef").await;
    assert_eq!(res.status(), StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn anonymous_dashboard_redirects_to_login() {
    let state = test_state().await;
    let app = build_app(state);

    let res = app
        .clone()
        .oneshot(get_request("/dashboard", None))
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::SEE_OTHER);
    assert_eq!(res.headers()[header::LOCATION], "/login");

    let res = app
        .clone()
        .oneshot(get_request("/profile", Some("session=garbage")))
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::SEE_OTHER);
    assert_eq!(res.headers()[header::LOCATION], "/login");
}

#[tokio::test]
async fn logout_clears_the_session_cookie() {
    let state = test_state().await;
    let app = build_app(state);

    register(&app, "grace", "Passw0rd").await;
    let res = login(&app, "grace", "Passw0rd").await;
    assert_eq!(res.status(), StatusCode::OK);

    let res = app.clone().oneshot(get_request("/logout", None)).await.unwrap();
    assert_eq!(res.status(), StatusCode::SEE_OTHER);
    assert_eq!(res.headers()[header::LOCATION], "/login");
    let cleared = res.headers()[header::SET_COOKIE].to_str().unwrap();
    assert!(cleared.starts_with("session="));
    assert!(cleared.contains("Max-Age=0"));

    // With the cookie dropped, the dashboard is anonymous again.
    let res = app
        .clone()
        .oneshot(get_request("/dashboard", None))
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::SEE_OTHER);
}

#[tokio::test]
async fn expired_session_is_anonymous() {
    let state = test_state().await;
    let app = build_app(state.clone());

    register(&app, "henry", "Passw0rd").await;

    // Issue a token two hours in the past; the 3600s lifetime has elapsed.
    let keys = SessionKeys::from_ref(&state);
    let issued = OffsetDateTime::now_utc() - Duration::hours(2);
    let token = keys.issue(1, "henry", issued).unwrap();

    let res = app
        .clone()
        .oneshot(get_request("/dashboard", Some(&format!("session={token}"))))
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::SEE_OTHER);
    assert_eq!(res.headers()[header::LOCATION], "/login");
}

#[tokio::test]
async fn session_for_missing_user_is_cleared() {
    let state = test_state().await;
    let app = build_app(state.clone());

    // A validly signed session naming a user id that never existed.
    let keys = SessionKeys::from_ref(&state);
    let token = keys.issue(999, "ghost", OffsetDateTime::now_utc()).unwrap();

    let res = app
        .clone()
        .oneshot(get_request("/dashboard", Some(&format!("session={token}"))))
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::SEE_OTHER);
    assert_eq!(res.headers()[header::LOCATION], "/login");
    let cleared = res.headers()[header::SET_COOKIE].to_str().unwrap();
    assert!(cleared.contains("Max-Age=0"));
}

#[tokio::test]
async fn dashboard_lists_joined_activities_and_courses() {
    let state = test_state().await;
    catalog::seed::seed_catalog(&state.db).await.unwrap();
    let app = build_app(state.clone());

    register(&app, "ivy", "Passw0rd").await;
    let res = login(&app, "ivy", "Passw0rd").await;
    let cookie = set_cookie_pair(&res);

    let user_id =
        sqlx::query_scalar::<_, i64>("SELECT id FROM users WHERE handle = 'ivy'")
            .fetch_one(&state.db)
            .await
            .unwrap();
    sqlx::query(
        "INSERT INTO user_activities (user_id, activity_id, joined_at, status)
         VALUES (?1, 1, ?2, 'attended')",
    )
    .bind(user_id)
    .bind(OffsetDateTime::now_utc())
    .execute(&state.db)
    .await
    .unwrap();
    sqlx::query(
        "INSERT INTO user_courses (user_id, course_id, enrolled_at, progress, status)
         VALUES (?1, 2, ?2, 40, 'enrolled')",
    )
    .bind(user_id)
    .bind(OffsetDateTime::now_utc())
    .execute(&state.db)
    .await
    .unwrap();

    let res = app
        .clone()
        .oneshot(get_request("/dashboard", Some(&cookie)))
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::OK);
    let dashboard = body_json(res).await;

    let activities = dashboard["activities"].as_array().unwrap();
    assert_eq!(activities.len(), 1);
    assert_eq!(activities[0]["title"], "Morning Yoga in the Park");
    assert_eq!(activities[0]["status"], "attended");

    let courses = dashboard["courses"].as_array().unwrap();
    assert_eq!(courses.len(), 1);
    assert_eq!(courses[0]["title"], "Web Development Basics");
    assert_eq!(courses[0]["progress"], 40);
    assert_eq!(courses[0]["status"], "enrolled");
}

#[tokio::test]
async fn seeding_is_idempotent() {
    let state = test_state().await;
    catalog::seed::seed_catalog(&state.db).await.unwrap();
    catalog::seed::seed_catalog(&state.db).await.unwrap();

    let activities = sqlx::query_scalar::<_, i64>("SELECT COUNT(*) FROM activities")
        .fetch_one(&state.db)
        .await
        .unwrap();
    let courses = sqlx::query_scalar::<_, i64>("SELECT COUNT(*) FROM courses")
        .fetch_one(&state.db)
        .await
        .unwrap();
    assert_eq!(activities, 3);
    assert_eq!(courses, 3);
}

#[tokio::test]
async fn html_views_and_health() {
    let state = test_state().await;
    let app = build_app(state);

    for uri in ["/", "/register", "/login"] {
        let res = app.clone().oneshot(get_request(uri, None)).await.unwrap();
        assert_eq!(res.status(), StatusCode::OK);
        let content_type = res.headers()[header::CONTENT_TYPE].to_str().unwrap();
        assert!(content_type.starts_with("text/html"));
    }

    let res = app.clone().oneshot(get_request("/health", None)).await.unwrap();
    assert_eq!(res.status(), StatusCode::OK);
}
