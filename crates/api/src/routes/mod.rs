//! Route definitions.

pub mod campaign;
pub mod health;

use axum::Router;

use crate::state::AppState;

/// All routes mounted under `/api`.
pub fn api_routes() -> Router<AppState> {
    Router::new().nest("/campaign", campaign::router())
}
