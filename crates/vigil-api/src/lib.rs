//! HTTP ingestion gateway for the vigil presence-monitoring backend.
//!
//! Exposes an axum [`Router`] backed by any [`PresenceStore`]. The gateway
//! validates input, delegates to the state components, and maps component
//! errors to HTTP status codes. It holds no state of its own beyond
//! request-scoped data; the process-wide presence flag lives in
//! [`AppState`] but is owned by `vigil-core`.

pub mod alert;
pub mod auth;
pub mod error;
pub mod events;
pub mod mode;
pub mod tokens;
pub mod users;

pub use error::Error;

use std::{future::Future, path::PathBuf, sync::Arc, time::Duration};

use axum::{
  Router,
  routing::{get, post},
};
use serde::Deserialize;
use tower_http::{
  cors::{Any, CorsLayer},
  trace::TraceLayer,
};
use vigil_core::{mode::PresenceMode, store::PresenceStore};

// ─── Configuration ───────────────────────────────────────────────────────────

/// Runtime server configuration, deserialised from `config.toml` with
/// `VIGIL_`-prefixed environment overrides.
#[derive(Debug, Clone, Deserialize)]
pub struct ServerConfig {
  #[serde(default = "default_host")]
  pub host:                 String,
  #[serde(default = "default_port")]
  pub port:                 u16,
  pub store_path:           PathBuf,
  #[serde(default = "default_storage_timeout_secs")]
  pub storage_timeout_secs: u64,
}

fn default_host() -> String { "0.0.0.0".to_string() }

fn default_port() -> u16 { 3000 }

fn default_storage_timeout_secs() -> u64 { 10 }

impl ServerConfig {
  /// Upper bound on any single storage operation; a stalled backend
  /// surfaces as a server error instead of hanging the request.
  pub fn storage_timeout(&self) -> Duration {
    Duration::from_secs(self.storage_timeout_secs)
  }
}

// ─── Application state ───────────────────────────────────────────────────────

/// Shared state threaded through all axum handlers.
#[derive(Clone)]
pub struct AppState<S: PresenceStore> {
  pub store:  Arc<S>,
  pub mode:   Arc<PresenceMode>,
  pub config: Arc<ServerConfig>,
}

// ─── Router ──────────────────────────────────────────────────────────────────

/// Build the axum [`Router`] for the gateway.
pub fn router<S>(state: AppState<S>) -> Router
where
  S: PresenceStore + Clone + Send + Sync + 'static,
  S::Error: std::error::Error + Send + Sync + 'static,
{
  // Readers and app clients come from anywhere on the local network with
  // no origin guarantees.
  let cors = CorsLayer::new()
    .allow_methods(Any)
    .allow_origin(Any)
    .allow_headers(Any);

  Router::new()
    .route("/",          get(greeting))
    .route("/register",  post(users::register::<S>))
    .route("/login",     post(users::login::<S>))
    .route("/data",      get(events::list::<S>))
    .route("/esp-data",  post(events::ingest::<S>))
    .route("/mode",      get(mode::get_current::<S>).post(mode::set::<S>))
    .route("/token",     post(tokens::register::<S>))
    .route("/buzzer/on", post(alert::trigger))
    .fallback(fallback)
    .layer(TraceLayer::new_for_http())
    .layer(cors)
    .with_state(state)
}

/// `GET /` — liveness greeting, plain text.
async fn greeting() -> &'static str {
  "vigil presence-monitoring server is running"
}

async fn fallback() -> Error {
  Error::NotFound("no such route".to_string())
}

// ─── Storage timeout ─────────────────────────────────────────────────────────

/// Bound a storage future so a stalled backend surfaces to the caller as a
/// server error rather than hanging the request indefinitely.
pub(crate) async fn timed<T, E>(
  limit: Duration,
  fut: impl Future<Output = Result<T, E>>,
) -> Result<T, Error>
where
  E: std::error::Error + Send + Sync + 'static,
{
  match tokio::time::timeout(limit, fut).await {
    Ok(Ok(value)) => Ok(value),
    Ok(Err(e)) => Err(Error::Store(Box::new(e))),
    Err(_) => Err(Error::Timeout),
  }
}

// ─── Integration tests ───────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
  use std::{path::PathBuf, sync::Arc};

  use axum::{
    body::Body,
    http::{Request, StatusCode, header},
  };
  use chrono::{DateTime, Utc};
  use serde_json::{Value, json};
  use tower::ServiceExt as _;
  use vigil_core::{mode::PresenceMode, store::PresenceStore as _};
  use vigil_store_sqlite::SqliteStore;

  use super::*;

  async fn make_state() -> AppState<SqliteStore> {
    AppState {
      store:  Arc::new(SqliteStore::open_in_memory().await.unwrap()),
      mode:   Arc::new(PresenceMode::new()),
      config: Arc::new(ServerConfig {
        host:                 "127.0.0.1".to_string(),
        port:                 3000,
        store_path:           PathBuf::from(":memory:"),
        storage_timeout_secs: 5,
      }),
    }
  }

  async fn send(
    state: AppState<SqliteStore>,
    method: &str,
    uri: &str,
    body: Option<Value>,
  ) -> axum::response::Response {
    let mut builder = Request::builder().method(method).uri(uri);
    let body = match body {
      Some(v) => {
        builder = builder.header(header::CONTENT_TYPE, "application/json");
        Body::from(v.to_string())
      }
      None => Body::empty(),
    };
    let req = builder.body(body).unwrap();
    router(state).oneshot(req).await.unwrap()
  }

  async fn body_json(resp: axum::response::Response) -> Value {
    let bytes = axum::body::to_bytes(resp.into_body(), usize::MAX)
      .await
      .unwrap();
    serde_json::from_slice(&bytes).unwrap()
  }

  // ── Greeting ────────────────────────────────────────────────────────────────

  #[tokio::test]
  async fn greeting_returns_200() {
    let resp = send(make_state().await, "GET", "/", None).await;
    assert_eq!(resp.status(), StatusCode::OK);
  }

  // ── Telemetry ───────────────────────────────────────────────────────────────

  #[tokio::test]
  async fn ingest_then_list_round_trips() {
    let state = make_state().await;

    let resp = send(
      state.clone(),
      "POST",
      "/esp-data",
      Some(json!({ "tagId": "A1B2", "status": "detected" })),
    )
    .await;
    assert_eq!(resp.status(), StatusCode::CREATED);

    let resp = send(state, "GET", "/data?limit=1", None).await;
    assert_eq!(resp.status(), StatusCode::OK);

    let events = body_json(resp).await;
    let events = events.as_array().unwrap();
    assert_eq!(events.len(), 1);
    assert_eq!(events[0]["tagId"], "A1B2");
    assert_eq!(events[0]["status"], "detected");
    assert!(events[0]["observedAt"].is_string());
  }

  #[tokio::test]
  async fn ingest_accepts_legacy_firmware_fields() {
    let state = make_state().await;

    let resp = send(
      state.clone(),
      "POST",
      "/esp-data",
      Some(json!({
        "rfid_tag": "C3D4",
        "status": "missing",
        "timestamp": "2026-01-01T00:00:00Z",
      })),
    )
    .await;
    assert_eq!(resp.status(), StatusCode::CREATED);

    let resp = send(state, "GET", "/data", None).await;
    let events = body_json(resp).await;
    let event = &events.as_array().unwrap()[0];
    assert_eq!(event["tagId"], "C3D4");

    let observed: DateTime<Utc> =
      event["observedAt"].as_str().unwrap().parse().unwrap();
    let expected: DateTime<Utc> = "2026-01-01T00:00:00Z".parse().unwrap();
    assert_eq!(observed, expected);
  }

  #[tokio::test]
  async fn ingest_missing_tag_returns_400() {
    let resp = send(
      make_state().await,
      "POST",
      "/esp-data",
      Some(json!({ "status": "detected" })),
    )
    .await;
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
    assert!(body_json(resp).await["error"].is_string());
  }

  #[tokio::test]
  async fn list_falls_back_on_unusable_limit() {
    let state = make_state().await;

    for i in 0..3 {
      let resp = send(
        state.clone(),
        "POST",
        "/esp-data",
        Some(json!({ "tagId": format!("TAG{i}"), "status": "detected" })),
      )
      .await;
      assert_eq!(resp.status(), StatusCode::CREATED);
    }

    for uri in ["/data?limit=abc", "/data?limit=0", "/data?limit=-3", "/data"] {
      let resp = send(state.clone(), "GET", uri, None).await;
      assert_eq!(resp.status(), StatusCode::OK);
      assert_eq!(body_json(resp).await.as_array().unwrap().len(), 3);
    }

    let resp = send(state, "GET", "/data?limit=2", None).await;
    assert_eq!(body_json(resp).await.as_array().unwrap().len(), 2);
  }

  // ── Presence mode ───────────────────────────────────────────────────────────

  #[tokio::test]
  async fn mode_round_trips() {
    let state = make_state().await;

    let resp = send(state.clone(), "GET", "/mode", None).await;
    assert_eq!(body_json(resp).await["inRoom"], json!(true));

    let resp = send(
      state.clone(),
      "POST",
      "/mode",
      Some(json!({ "inRoom": false })),
    )
    .await;
    assert_eq!(resp.status(), StatusCode::OK);
    assert_eq!(body_json(resp).await["inRoom"], json!(false));

    let resp = send(state, "GET", "/mode", None).await;
    assert_eq!(body_json(resp).await["inRoom"], json!(false));
  }

  // ── Tokens ──────────────────────────────────────────────────────────────────

  #[tokio::test]
  async fn token_registered_twice_keeps_one_record() {
    let state = make_state().await;

    for _ in 0..2 {
      let resp = send(
        state.clone(),
        "POST",
        "/token",
        Some(json!({ "token": "xyz" })),
      )
      .await;
      assert_eq!(resp.status(), StatusCode::OK);
    }

    let token = state.store.find_token("xyz").await.unwrap().unwrap();
    assert_eq!(token.value, "xyz");
  }

  #[tokio::test]
  async fn token_missing_returns_400() {
    let resp = send(make_state().await, "POST", "/token", Some(json!({}))).await;
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
    assert!(body_json(resp).await["error"].is_string());
  }

  // ── Accounts ────────────────────────────────────────────────────────────────

  #[tokio::test]
  async fn register_login_flow() {
    let state = make_state().await;
    let creds = json!({ "username": "alice", "password": "hunter2" });

    let resp = send(state.clone(), "POST", "/register", Some(creds.clone())).await;
    assert_eq!(resp.status(), StatusCode::CREATED);

    // Duplicate username: 400, no second record.
    let resp = send(state.clone(), "POST", "/register", Some(creds.clone())).await;
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);

    let resp = send(state.clone(), "POST", "/login", Some(creds)).await;
    assert_eq!(resp.status(), StatusCode::OK);
    assert_eq!(body_json(resp).await["username"], "alice");

    let resp = send(
      state.clone(),
      "POST",
      "/login",
      Some(json!({ "username": "alice", "password": "wrong" })),
    )
    .await;
    assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);

    let resp = send(
      state,
      "POST",
      "/login",
      Some(json!({ "username": "nobody", "password": "hunter2" })),
    )
    .await;
    assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);
  }

  #[tokio::test]
  async fn register_missing_fields_returns_400() {
    let resp = send(
      make_state().await,
      "POST",
      "/register",
      Some(json!({ "username": "alice" })),
    )
    .await;
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
    assert!(body_json(resp).await["error"].is_string());
  }

  #[tokio::test]
  async fn password_is_stored_hashed() {
    let state = make_state().await;

    send(
      state.clone(),
      "POST",
      "/register",
      Some(json!({ "username": "alice", "password": "hunter2" })),
    )
    .await;

    let stored = state.store.find_credential("alice").await.unwrap().unwrap();
    assert_ne!(stored.password_hash, "hunter2");
    assert!(stored.password_hash.starts_with("$argon2"));
  }

  // ── Alert ───────────────────────────────────────────────────────────────────

  #[tokio::test]
  async fn buzzer_returns_200() {
    let resp = send(make_state().await, "POST", "/buzzer/on", None).await;
    assert_eq!(resp.status(), StatusCode::OK);
    assert_eq!(body_json(resp).await["message"], "buzzer activated");
  }

  // ── Fallback ────────────────────────────────────────────────────────────────

  #[tokio::test]
  async fn unknown_route_returns_404_json() {
    let resp = send(make_state().await, "GET", "/nope", None).await;
    assert_eq!(resp.status(), StatusCode::NOT_FOUND);
    assert!(body_json(resp).await["error"].is_string());
  }
}
