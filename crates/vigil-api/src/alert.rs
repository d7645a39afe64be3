//! Handler for `POST /buzzer/on` — the manual alert trigger.

use axum::Json;
use serde_json::{Value, json};

/// `POST /buzzer/on` — fire the buzzer signal now.
///
/// Stateless: no precondition, no debounce, no persisted record of having
/// fired. The signal surface is a structured log line picked up by the
/// hardware bridge, so rapid repeated calls each fire independently.
pub async fn trigger() -> Json<Value> {
  tracing::warn!("buzzer activated");
  Json(json!({ "message": "buzzer activated" }))
}
