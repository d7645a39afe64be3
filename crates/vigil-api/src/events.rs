//! Handlers for the telemetry endpoints.
//!
//! | Method | Path | Notes |
//! |--------|------|-------|
//! | `POST` | `/esp-data` | Body: [`ReportBody`]; returns 201 + stored event |
//! | `GET`  | `/data` | `?limit=N`, permissive parse, default 50 |

use axum::{
  Json,
  extract::{Query, State},
  http::StatusCode,
  response::IntoResponse,
};
use chrono::{DateTime, Utc};
use serde::Deserialize;
use serde_json::json;
use vigil_core::{
  event::{Event, NewEvent},
  store::PresenceStore,
};

use crate::{AppState, error::Error, timed};

/// Events returned by `GET /data` when the caller gives no usable limit.
pub const DEFAULT_LIMIT: usize = 50;

// ─── Ingest ──────────────────────────────────────────────────────────────────

/// JSON body accepted by `POST /esp-data`.
///
/// Reader firmware in the field sends two generations of field names, so
/// both are accepted: `tagId`/`rfid_tag` and `observedAt`/`timestamp`.
#[derive(Debug, Deserialize)]
pub struct ReportBody {
  #[serde(rename = "tagId", alias = "rfid_tag")]
  pub tag_id:      Option<String>,
  pub status:      Option<String>,
  #[serde(rename = "observedAt", alias = "timestamp")]
  pub observed_at: Option<DateTime<Utc>>,
}

/// `POST /esp-data` — append one tag-read event, returns 201 + the stored
/// record including the server-assigned timestamp.
pub async fn ingest<S>(
  State(state): State<AppState<S>>,
  Json(body): Json<ReportBody>,
) -> Result<impl IntoResponse, Error>
where
  S: PresenceStore,
  S::Error: std::error::Error + Send + Sync + 'static,
{
  let input = NewEvent {
    tag_id:      body.tag_id.unwrap_or_default(),
    status:      body.status.unwrap_or_default(),
    observed_at: body.observed_at,
  };
  input.validate().map_err(|e| Error::BadRequest(e.to_string()))?;

  let event = timed(
    state.config.storage_timeout(),
    state.store.append_event(input),
  )
  .await?;

  tracing::debug!(tag_id = %event.tag_id, "event stored");
  Ok((
    StatusCode::CREATED,
    Json(json!({ "message": "event stored", "event": event })),
  ))
}

// ─── List ────────────────────────────────────────────────────────────────────

/// Query params for `GET /data`.
///
/// `limit` is kept as a raw string so a malformed value falls back to the
/// default instead of rejecting the request.
#[derive(Debug, Deserialize, Default)]
pub struct ListParams {
  pub limit: Option<String>,
}

/// `GET /data[?limit=N]` — most recent events, newest first.
pub async fn list<S>(
  State(state): State<AppState<S>>,
  Query(params): Query<ListParams>,
) -> Result<Json<Vec<Event>>, Error>
where
  S: PresenceStore,
  S::Error: std::error::Error + Send + Sync + 'static,
{
  let limit = effective_limit(params.limit.as_deref());

  let events = timed(
    state.config.storage_timeout(),
    state.store.recent_events(limit),
  )
  .await?;

  Ok(Json(events))
}

/// Forgiving limit parse: absent, non-numeric, zero, or negative values all
/// fall back to [`DEFAULT_LIMIT`].
fn effective_limit(raw: Option<&str>) -> usize {
  raw
    .and_then(|s| s.trim().parse::<i64>().ok())
    .filter(|n| *n > 0)
    .map(|n| n as usize)
    .unwrap_or(DEFAULT_LIMIT)
}
