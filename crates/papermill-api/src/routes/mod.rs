//! API routes.

pub mod health;
pub mod research;

use axum::Router;

use crate::AppState;

/// Build the main API router.
pub fn router(state: AppState) -> Router {
    Router::new().nest("/api", api_router()).with_state(state)
}

fn api_router() -> Router<AppState> {
    Router::new()
        .nest("/research", research::router())
        .merge(health::router())
}
