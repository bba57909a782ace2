use axum::{
    extract::{rejection::JsonRejection, FromRef, State},
    http::StatusCode,
    response::{Html, Redirect},
    routing::get,
    Json, Router,
};
use axum_extra::extract::CookieJar;
use time::OffsetDateTime;
use tracing::{error, info, instrument, warn};

use crate::{
    auth::{
        dto::{CredentialsRequest, MessageResponse},
        password::{hash_password, verify_password},
        session::{removal_cookie, SessionKeys},
        validate::{self, HandleKind},
    },
    error::ApiError,
    state::AppState,
    users::repo,
};

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(index))
        .route("/register", get(register_page).post(register))
        .route("/login", get(login_page).post(login))
        .route("/logout", get(logout))
}

async fn index() -> Html<&'static str> {
    Html(REGISTER_PAGE)
}

async fn register_page() -> Html<&'static str> {
    Html(REGISTER_PAGE)
}

async fn login_page() -> Html<&'static str> {
    Html(LOGIN_PAGE)
}

#[instrument(skip(state, payload))]
pub async fn register(
    State(state): State<AppState>,
    payload: Result<Json<CredentialsRequest>, JsonRejection>,
) -> Result<(StatusCode, Json<MessageResponse>), ApiError> {
    let Json(mut payload) = payload?;
    payload.username = payload.username.trim().to_string();

    if payload.username.is_empty() || payload.password.is_empty() {
        warn!("register with empty username or password");
        return Err(ApiError::Validation(
            "Username and password are required".into(),
        ));
    }

    // An invalid string containing '@' stays an email error; it is never
    // retried against the username rules.
    match validate::classify_handle(&payload.username) {
        HandleKind::Email => {
            if !validate::is_valid_email(&payload.username) {
                warn!(handle = %payload.username, "invalid email");
                return Err(ApiError::Validation("Invalid email address".into()));
            }
        }
        HandleKind::Username => {
            if !validate::is_valid_username(&payload.username) {
                warn!(handle = %payload.username, "invalid username");
                return Err(ApiError::Validation(
                    "Username must be 3-20 characters of letters, digits, dots or underscores"
                        .into(),
                ));
            }
        }
    }

    if let Err(reason) = validate::validate_password(&payload.password) {
        warn!(reason, "password rejected");
        return Err(ApiError::Validation(reason.into()));
    }

    let digest = hash_password(&payload.password).map_err(|e| {
        error!(error = %e, "hash_password failed");
        ApiError::Internal(e)
    })?;

    let user = repo::create(&state.db, &payload.username, &digest).await?;

    info!(user_id = user.id, handle = %user.handle, "user registered");
    Ok((
        StatusCode::CREATED,
        Json(MessageResponse::new("Registration successful")),
    ))
}

#[instrument(skip(state, jar, payload))]
pub async fn login(
    State(state): State<AppState>,
    jar: CookieJar,
    payload: Result<Json<CredentialsRequest>, JsonRejection>,
) -> Result<(CookieJar, Json<MessageResponse>), ApiError> {
    let Json(mut payload) = payload?;
    payload.username = payload.username.trim().to_string();

    if payload.username.is_empty() || payload.password.is_empty() {
        warn!("login with empty username or password");
        return Err(ApiError::Validation(
            "Username and password are required".into(),
        ));
    }

    // Legacy login threshold, looser than the registration rule on purpose.
    if !validate::validate_login_password(&payload.password) {
        warn!("login password below legacy threshold");
        return Err(ApiError::Validation(
            "Password must be at least 6 characters".into(),
        ));
    }

    let user = match repo::find_by_handle(&state.db, &payload.username).await? {
        Some(u) => u,
        None => {
            warn!(handle = %payload.username, "login with unknown handle");
            return Err(ApiError::AuthenticationFailure);
        }
    };

    let ok = verify_password(&payload.password, &user.password_digest).map_err(|e| {
        error!(error = %e, "verify_password failed");
        ApiError::Internal(e)
    })?;
    if !ok {
        warn!(user_id = user.id, "login with wrong password");
        return Err(ApiError::AuthenticationFailure);
    }

    let keys = SessionKeys::from_ref(&state);
    let token = keys
        .issue(user.id, &user.handle, OffsetDateTime::now_utc())
        .map_err(|e| {
            error!(error = %e, "session issue failed");
            ApiError::Internal(e)
        })?;
    let jar = jar.add(keys.cookie(token));

    info!(user_id = user.id, handle = %user.handle, "user logged in");
    Ok((jar, Json(MessageResponse::new("Login successful"))))
}

#[instrument(skip(jar))]
pub async fn logout(jar: CookieJar) -> (CookieJar, Redirect) {
    (jar.add(removal_cookie()), Redirect::to("/login"))
}

const REGISTER_PAGE: &str = r#"<!doctype html>
<html>
<head><meta charset="utf-8"><title>Register</title></head>
<body>
  <h1>Create an account</h1>
  <form onsubmit="event.preventDefault();
      fetch('/register', {method: 'POST', headers: {'Content-Type': 'application/json'},
        body: JSON.stringify({username: username.value, password: password.value})})
      .then(r => r.json()).then(d => { result.textContent = d.message; });">
    <input id="username" placeholder="Username or email" required>
    <input id="password" type="password" placeholder="Password" required>
    <button type="submit">Register</button>
  </form>
  <p id="result"></p>
  <a href="/login">Already have an account? Log in</a>
</body>
</html>
"#;

const LOGIN_PAGE: &str = r#"<!doctype html>
<html>
<head><meta charset="utf-8"><title>Log in</title></head>
<body>
  <h1>Log in</h1>
  <form onsubmit="event.preventDefault();
      fetch('/login', {method: 'POST', headers: {'Content-Type': 'application/json'},
        body: JSON.stringify({username: username.value, password: password.value})})
      .then(r => r.ok ? location.assign('/dashboard') : r.json().then(d => { result.textContent = d.message; }));">
    <input id="username" placeholder="Username or email" required>
    <input id="password" type="password" placeholder="Password" required>
    <button type="submit">Log in</button>
  </form>
  <p id="result"></p>
  <a href="/register">Need an account? Register</a>
</body>
</html>
"#;
