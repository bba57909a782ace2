use axum::{
    extract::{rejection::JsonRejection, State},
    routing::get,
    Json, Router,
};
use tracing::{info, instrument, warn};

use crate::{
    auth::{extractors::CurrentUser, validate},
    error::ApiError,
    state::AppState,
};

use super::dto::{ProfileUpdate, ProfileUpdated, PublicProfile};
use super::repo;

pub fn router() -> Router<AppState> {
    Router::new().route("/profile", get(get_profile).post(update_profile))
}

#[instrument(skip_all)]
pub async fn get_profile(CurrentUser(user): CurrentUser) -> Json<PublicProfile> {
    Json(PublicProfile::from(&user))
}

#[instrument(skip_all, fields(user_id = user.0.id))]
pub async fn update_profile(
    State(state): State<AppState>,
    user: CurrentUser,
    payload: Result<Json<ProfileUpdate>, JsonRejection>,
) -> Result<Json<ProfileUpdated>, ApiError> {
    let Json(payload) = payload?;
    if let Some(email) = payload.email.as_deref() {
        if !validate::is_valid_email(email) {
            warn!("profile update with invalid email");
            return Err(ApiError::Validation("Invalid email address".into()));
        }
    }

    let updated = repo::update_profile(&state.db, user.0.id, &payload).await?;
    info!("profile updated");
    Ok(Json(ProfileUpdated {
        message: "Profile updated".into(),
        profile: PublicProfile::from(&updated),
    }))
}
