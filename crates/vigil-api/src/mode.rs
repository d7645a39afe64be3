//! Handlers for `/mode` — the shared presence flag.
//!
//! | Method | Path | Notes |
//! |--------|------|-------|
//! | `GET`  | `/mode` | Current flag |
//! | `POST` | `/mode` | Body: `{"inRoom": bool}`; unconditional overwrite |

use axum::{Json, extract::State};
use serde::Deserialize;
use serde_json::{Value, json};
use vigil_core::store::PresenceStore;

use crate::AppState;

/// JSON body accepted by `POST /mode`.
#[derive(Debug, Deserialize)]
pub struct ModeBody {
  #[serde(rename = "inRoom")]
  pub in_room: bool,
}

/// `POST /mode` — overwrite the flag, no prior-state check. Concurrent
/// writers race; whichever write completes last wins.
pub async fn set<S>(
  State(state): State<AppState<S>>,
  Json(body): Json<ModeBody>,
) -> Json<Value>
where
  S: PresenceStore,
{
  let in_room = state.mode.set(body.in_room);
  tracing::info!(in_room, "presence mode updated");
  Json(json!({ "message": "mode updated", "inRoom": in_room }))
}

/// `GET /mode` — the most recently completed write.
pub async fn get_current<S>(State(state): State<AppState<S>>) -> Json<Value>
where
  S: PresenceStore,
{
  Json(json!({ "inRoom": state.mode.get() }))
}
