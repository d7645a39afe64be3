//! Handlers for the account endpoints `/register` and `/login`.
//!
//! | Method | Path | Notes |
//! |--------|------|-------|
//! | `POST` | `/register` | Body: [`CredentialsBody`]; 201 on success |
//! | `POST` | `/login` | Body: [`CredentialsBody`]; 200 + username |

use axum::{Json, extract::State, http::StatusCode, response::IntoResponse};
use serde::Deserialize;
use serde_json::{Value, json};
use vigil_core::store::PresenceStore;

use crate::{AppState, auth, error::Error, timed};

/// JSON body accepted by `/register` and `/login`.
#[derive(Debug, Deserialize)]
pub struct CredentialsBody {
  pub username: Option<String>,
  pub password: Option<String>,
}

impl CredentialsBody {
  /// Both fields present and non-empty, or a 400.
  fn into_parts(self) -> Result<(String, String), Error> {
    let username = self.username.unwrap_or_default();
    let password = self.password.unwrap_or_default();
    if username.trim().is_empty() || password.is_empty() {
      return Err(Error::BadRequest(
        "username and password are required".to_string(),
      ));
    }
    Ok((username, password))
  }
}

/// `POST /register` — create an account. The password is hashed before it
/// touches storage; duplicate usernames are rejected with a 400.
pub async fn register<S>(
  State(state): State<AppState<S>>,
  Json(body): Json<CredentialsBody>,
) -> Result<impl IntoResponse, Error>
where
  S: PresenceStore,
  S::Error: std::error::Error + Send + Sync + 'static,
{
  let (username, password) = body.into_parts()?;

  let existing = timed(
    state.config.storage_timeout(),
    state.store.find_credential(&username),
  )
  .await?;
  if existing.is_some() {
    return Err(Error::BadRequest(format!(
      "username already registered: {username}"
    )));
  }

  let hash = auth::hash_password(&password)?;
  timed(
    state.config.storage_timeout(),
    state.store.create_credential(&username, &hash),
  )
  .await?;

  tracing::info!(%username, "account registered");
  Ok((
    StatusCode::CREATED,
    Json(json!({ "message": "registration successful" })),
  ))
}

/// `POST /login` — stateless credential check. An unknown username and a
/// wrong password both produce the same 401.
pub async fn login<S>(
  State(state): State<AppState<S>>,
  Json(body): Json<CredentialsBody>,
) -> Result<Json<Value>, Error>
where
  S: PresenceStore,
  S::Error: std::error::Error + Send + Sync + 'static,
{
  let (username, password) = body.into_parts()?;

  let credential = timed(
    state.config.storage_timeout(),
    state.store.find_credential(&username),
  )
  .await?
  .ok_or(Error::Unauthorized)?;

  auth::verify_password(&password, &credential.password_hash)?;

  Ok(Json(json!({
    "message": "login successful",
    "username": credential.username,
  })))
}
