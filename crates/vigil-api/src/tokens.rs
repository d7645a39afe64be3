//! Handler for `POST /token` — push-notification token registration.

use axum::{Json, extract::State};
use serde::Deserialize;
use serde_json::{Value, json};
use vigil_core::store::PresenceStore;

use crate::{AppState, error::Error, timed};

/// JSON body accepted by `POST /token`.
#[derive(Debug, Deserialize)]
pub struct TokenBody {
  pub token: Option<String>,
}

/// `POST /token` — idempotent upsert keyed by token value. Devices retry
/// registration freely; repeats refresh the registration time instead of
/// duplicating the entry.
pub async fn register<S>(
  State(state): State<AppState<S>>,
  Json(body): Json<TokenBody>,
) -> Result<Json<Value>, Error>
where
  S: PresenceStore,
  S::Error: std::error::Error + Send + Sync + 'static,
{
  let value = body.token.unwrap_or_default();
  if value.trim().is_empty() {
    return Err(Error::BadRequest(
      vigil_core::Error::MissingField("token").to_string(),
    ));
  }

  let token = timed(
    state.config.storage_timeout(),
    state.store.register_token(&value),
  )
  .await?;

  tracing::debug!(token = %token.value, "notification token registered");
  Ok(Json(json!({
    "message": "token registered",
    "registeredAt": token.registered_at,
  })))
}
