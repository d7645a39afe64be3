//! [`SqliteStore`] — the SQLite implementation of [`PresenceStore`].

use std::path::Path;

use chrono::Utc;
use rusqlite::OptionalExtension as _;
use uuid::Uuid;

use vigil_core::{
  credential::Credential,
  event::{Event, NewEvent},
  store::PresenceStore,
  token::Token,
};

use crate::{
  encode::{RawCredential, RawEvent, RawToken, encode_dt, encode_uuid},
  schema::SCHEMA,
  Error, Result,
};

// ─── Store ───────────────────────────────────────────────────────────────────

/// A vigil presence store backed by a single SQLite file.
///
/// Cloning is cheap — the inner connection is reference-counted.
#[derive(Clone)]
pub struct SqliteStore {
  conn: tokio_rusqlite::Connection,
}

impl SqliteStore {
  /// Open (or create) a store at `path` and run schema initialisation.
  pub async fn open(path: impl AsRef<Path>) -> Result<Self> {
    let conn = tokio_rusqlite::Connection::open(path).await?;
    let store = Self { conn };
    store.init_schema().await?;
    Ok(store)
  }

  /// Open an in-memory store — useful for testing.
  pub async fn open_in_memory() -> Result<Self> {
    let conn = tokio_rusqlite::Connection::open_in_memory().await?;
    let store = Self { conn };
    store.init_schema().await?;
    Ok(store)
  }

  async fn init_schema(&self) -> Result<()> {
    self
      .conn
      .call(|conn| {
        conn.execute_batch(SCHEMA)?;
        Ok(())
      })
      .await?;
    Ok(())
  }
}

/// True when the error is SQLite reporting a unique-key violation.
fn is_constraint_violation(err: &tokio_rusqlite::Error) -> bool {
  matches!(
    err,
    tokio_rusqlite::Error::Rusqlite(rusqlite::Error::SqliteFailure(e, _))
      if e.code == rusqlite::ErrorCode::ConstraintViolation
  )
}

// ─── PresenceStore impl ──────────────────────────────────────────────────────

impl PresenceStore for SqliteStore {
  type Error = Error;

  // ── Events ────────────────────────────────────────────────────────────────

  async fn append_event(&self, input: NewEvent) -> Result<Event> {
    input.validate()?;

    let event = Event {
      event_id:    Uuid::new_v4(),
      tag_id:      input.tag_id,
      status:      input.status,
      observed_at: input.observed_at.unwrap_or_else(Utc::now),
    };

    let id_str  = encode_uuid(event.event_id);
    let tag     = event.tag_id.clone();
    let status  = event.status.clone();
    let at_str  = encode_dt(event.observed_at);

    self
      .conn
      .call(move |conn| {
        conn.execute(
          "INSERT INTO events (event_id, tag_id, status, observed_at)
           VALUES (?1, ?2, ?3, ?4)",
          rusqlite::params![id_str, tag, status, at_str],
        )?;
        Ok(())
      })
      .await?;

    Ok(event)
  }

  async fn recent_events(&self, limit: usize) -> Result<Vec<Event>> {
    let limit_val = limit as i64;

    let raws: Vec<RawEvent> = self
      .conn
      .call(move |conn| {
        let mut stmt = conn.prepare(
          "SELECT event_id, tag_id, status, observed_at
           FROM events
           ORDER BY observed_at DESC, rowid DESC
           LIMIT ?1",
        )?;
        let rows = stmt
          .query_map(rusqlite::params![limit_val], |row| {
            Ok(RawEvent {
              event_id:    row.get(0)?,
              tag_id:      row.get(1)?,
              status:      row.get(2)?,
              observed_at: row.get(3)?,
            })
          })?
          .collect::<rusqlite::Result<Vec<_>>>()?;
        Ok(rows)
      })
      .await?;

    raws.into_iter().map(RawEvent::into_event).collect()
  }

  // ── Tokens ────────────────────────────────────────────────────────────────

  async fn register_token(&self, value: &str) -> Result<Token> {
    if value.trim().is_empty() {
      return Err(vigil_core::Error::MissingField("token").into());
    }

    let token = Token {
      value:         value.to_owned(),
      registered_at: Utc::now(),
    };

    let value_owned = token.value.clone();
    let at_str      = encode_dt(token.registered_at);

    // The primary key on `value` makes this upsert idempotent and
    // linearizes concurrent registrations of the same token.
    self
      .conn
      .call(move |conn| {
        conn.execute(
          "INSERT INTO tokens (value, registered_at) VALUES (?1, ?2)
           ON CONFLICT(value) DO UPDATE SET registered_at = excluded.registered_at",
          rusqlite::params![value_owned, at_str],
        )?;
        Ok(())
      })
      .await?;

    Ok(token)
  }

  async fn find_token(&self, value: &str) -> Result<Option<Token>> {
    let value_owned = value.to_owned();

    let raw: Option<RawToken> = self
      .conn
      .call(move |conn| {
        Ok(
          conn
            .query_row(
              "SELECT value, registered_at FROM tokens WHERE value = ?1",
              rusqlite::params![value_owned],
              |row| {
                Ok(RawToken {
                  value:         row.get(0)?,
                  registered_at: row.get(1)?,
                })
              },
            )
            .optional()?,
        )
      })
      .await?;

    raw.map(RawToken::into_token).transpose()
  }

  // ── Accounts ──────────────────────────────────────────────────────────────

  async fn create_credential(
    &self,
    username: &str,
    password_hash: &str,
  ) -> Result<Credential> {
    let credential = Credential {
      username:      username.to_owned(),
      password_hash: password_hash.to_owned(),
      created_at:    Utc::now(),
    };

    let name_owned = credential.username.clone();
    let hash_owned = credential.password_hash.clone();
    let at_str     = encode_dt(credential.created_at);

    let result = self
      .conn
      .call(move |conn| {
        conn.execute(
          "INSERT INTO users (username, password_hash, created_at)
           VALUES (?1, ?2, ?3)",
          rusqlite::params![name_owned, hash_owned, at_str],
        )?;
        Ok(())
      })
      .await;

    match result {
      Ok(()) => Ok(credential),
      Err(e) if is_constraint_violation(&e) => {
        Err(Error::UsernameTaken(username.to_owned()))
      }
      Err(e) => Err(e.into()),
    }
  }

  async fn find_credential(&self, username: &str) -> Result<Option<Credential>> {
    let name_owned = username.to_owned();

    let raw: Option<RawCredential> = self
      .conn
      .call(move |conn| {
        Ok(
          conn
            .query_row(
              "SELECT username, password_hash, created_at
               FROM users WHERE username = ?1",
              rusqlite::params![name_owned],
              |row| {
                Ok(RawCredential {
                  username:      row.get(0)?,
                  password_hash: row.get(1)?,
                  created_at:    row.get(2)?,
                })
              },
            )
            .optional()?,
        )
      })
      .await?;

    raw.map(RawCredential::into_credential).transpose()
  }
}
