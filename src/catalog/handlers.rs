use axum::{extract::State, routing::get, Json, Router};
use tracing::instrument;

use crate::{
    auth::extractors::CurrentUser, error::ApiError, state::AppState, users::dto::PublicProfile,
};

use super::dto::DashboardResponse;
use super::repo;

pub fn router() -> Router<AppState> {
    Router::new().route("/dashboard", get(dashboard))
}

#[instrument(skip_all, fields(user_id = user.0.id))]
pub async fn dashboard(
    State(state): State<AppState>,
    user: CurrentUser,
) -> Result<Json<DashboardResponse>, ApiError> {
    let activities = repo::activities_for_user(&state.db, user.0.id).await?;
    let courses = repo::courses_for_user(&state.db, user.0.id).await?;
    Ok(Json(DashboardResponse {
        user: PublicProfile::from(&user.0),
        activities,
        courses,
    }))
}
