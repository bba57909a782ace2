use crate::state::AppState;
use axum::Router;

pub mod dto;
pub mod extractors;
pub mod handlers;
pub mod password;
pub mod session;
pub mod validate;

pub fn router() -> Router<AppState> {
    handlers::router()
}
