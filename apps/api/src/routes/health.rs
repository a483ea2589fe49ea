use axum::{extract::State, Json};
use serde_json::{json, Value};

use crate::state::AppState;

/// GET /health
/// Service status plus which optional models are loaded.
pub async fn health_handler(State(state): State<AppState>) -> Json<Value> {
    let capabilities = &state.capabilities;
    Json(json!({
        "status": "healthy",
        "models_loaded": capabilities.all_loaded(),
        "entity_annotator": capabilities.annotator.is_available(),
        "embedding_model": capabilities.embedder.is_available(),
        "version": env!("CARGO_PKG_VERSION"),
    }))
}
