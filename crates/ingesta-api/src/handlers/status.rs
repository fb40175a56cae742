use axum::Json;
use serde_json::{json, Value};

/// Liveness probe. Axum answers HEAD from the GET route with headers only.
pub async fn status() -> Json<Value> {
    Json(json!({ "status": "ok" }))
}
