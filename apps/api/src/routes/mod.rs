pub mod health;

use axum::{
    extract::DefaultBodyLimit,
    routing::{get, post},
    Router,
};

use crate::matching::handlers::handle_match_resume;
use crate::parsing::handlers::handle_parse_resume;
use crate::state::AppState;

pub fn build_router(state: AppState) -> Router {
    let upload_limit = state.config.max_upload_bytes;

    Router::new()
        .route("/health", get(health::health_handler))
        .route(
            "/parse-resume",
            post(handle_parse_resume).layer(DefaultBodyLimit::max(upload_limit)),
        )
        .route("/match-resume", post(handle_match_resume))
        .with_state(state)
}
