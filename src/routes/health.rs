use axum::{extract::State, response::Json};
use serde_json::{Value, json};

use crate::server::AppState;

/// Health check endpoint handler.
///
/// # Route
/// - **Method**: GET
/// - **Path**: `/ping`
///
/// # Response Format
/// ```json
/// {
///   "status": "pong",
///   "database": "connected"
/// }
/// ```
/// `database` is `"in-memory"` when no database is configured and
/// `"unavailable"` when the configured one fails its health check. The
/// endpoint itself always answers 200 so liveness checks keep working while
/// storage recovers.
///
/// # Examples
/// ```bash
/// curl http://localhost:3000/ping
/// ```
pub async fn ping(State(state): State<AppState>) -> Json<Value> {
    let database = match &state.db {
        None => "in-memory",
        Some(db) => match db.health_check().await {
            Ok(()) => "connected",
            Err(e) => {
                tracing::warn!("Database health check failed: {:#}", e);
                "unavailable"
            }
        },
    };

    Json(json!({ "status": "pong", "database": database }))
}
