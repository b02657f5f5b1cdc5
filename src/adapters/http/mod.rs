pub mod routes;
pub mod state;

use axum::{
    routing::{get, post},
    Router,
};

use crate::adapters::http::state::HttpState;

pub fn router(state: HttpState) -> Router {
    Router::new()
        .route("/api/detect", post(routes::detect))
        .route("/api/models", get(routes::list_models))
        .route("/api/health", get(routes::health))
        .with_state(state)
}
