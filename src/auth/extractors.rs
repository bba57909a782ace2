use axum::{
    async_trait,
    extract::{FromRef, FromRequestParts},
    http::request::Parts,
    response::{IntoResponse, Redirect, Response},
};
use axum_extra::extract::CookieJar;
use tracing::warn;

use crate::auth::session::{removal_cookie, SessionKeys, SESSION_COOKIE};
use crate::state::AppState;
use crate::users::{repo, repo_types::User};

/// The authenticated user behind the request's session cookie.
///
/// Resolution does the full Anonymous check: cookie present, signature and
/// expiry valid, and the claimed user still in the store. A session naming a
/// missing user is cleared, not honored.
pub struct CurrentUser(pub User);

/// Rejection for anonymous requests to protected routes: clear the cookie
/// and send the caller to the login page. A side effect, not an error.
pub struct AuthRedirect;

impl IntoResponse for AuthRedirect {
    fn into_response(self) -> Response {
        let jar = CookieJar::new().add(removal_cookie());
        (jar, Redirect::to("/login")).into_response()
    }
}

#[async_trait]
impl FromRequestParts<AppState> for CurrentUser {
    type Rejection = AuthRedirect;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let jar = CookieJar::from_headers(&parts.headers);
        let token = jar
            .get(SESSION_COOKIE)
            .map(|c| c.value().to_string())
            .ok_or(AuthRedirect)?;

        let keys = SessionKeys::from_ref(state);
        let claims = keys.verify(&token).map_err(|_| AuthRedirect)?;

        match repo::find_by_id(&state.db, claims.sub).await {
            Ok(Some(user)) => Ok(CurrentUser(user)),
            Ok(None) => {
                warn!(user_id = claims.sub, "session names a missing user");
                Err(AuthRedirect)
            }
            Err(e) => {
                warn!(error = %e, "user lookup failed while resolving session");
                Err(AuthRedirect)
            }
        }
    }
}
