use axum::Json;
use serde_json::{json, Value};

/// Liveness probe. Does not touch ffmpeg or the scratch directory.
pub async fn liveness() -> Json<Value> {
    Json(json!({ "status": "alive" }))
}
