//! Encoding and decoding helpers between Rust domain types and the plain-text
//! representations stored in SQLite columns.
//!
//! All timestamps are stored as RFC 3339 strings. UUIDs are stored as
//! hyphenated lowercase strings.

use chrono::{DateTime, Utc};
use uuid::Uuid;
use vigil_core::{credential::Credential, event::Event, token::Token};

use crate::{Error, Result};

// ─── Uuid ────────────────────────────────────────────────────────────────────

pub fn encode_uuid(id: Uuid) -> String { id.hyphenated().to_string() }

pub fn decode_uuid(s: &str) -> Result<Uuid> { Ok(Uuid::parse_str(s)?) }

// ─── DateTime<Utc> ───────────────────────────────────────────────────────────

pub fn encode_dt(dt: DateTime<Utc>) -> String { dt.to_rfc3339() }

pub fn decode_dt(s: &str) -> Result<DateTime<Utc>> {
  DateTime::parse_from_rfc3339(s)
    .map(|dt| dt.with_timezone(&Utc))
    .map_err(|e| Error::DateParse(e.to_string()))
}

// ─── Row types ───────────────────────────────────────────────────────────────

/// Raw strings read directly from an `events` row.
pub struct RawEvent {
  pub event_id:    String,
  pub tag_id:      String,
  pub status:      String,
  pub observed_at: String,
}

impl RawEvent {
  pub fn into_event(self) -> Result<Event> {
    Ok(Event {
      event_id:    decode_uuid(&self.event_id)?,
      tag_id:      self.tag_id,
      status:      self.status,
      observed_at: decode_dt(&self.observed_at)?,
    })
  }
}

/// Raw strings read directly from a `tokens` row.
pub struct RawToken {
  pub value:         String,
  pub registered_at: String,
}

impl RawToken {
  pub fn into_token(self) -> Result<Token> {
    Ok(Token {
      value:         self.value,
      registered_at: decode_dt(&self.registered_at)?,
    })
  }
}

/// Raw strings read directly from a `users` row.
pub struct RawCredential {
  pub username:      String,
  pub password_hash: String,
  pub created_at:    String,
}

impl RawCredential {
  pub fn into_credential(self) -> Result<Credential> {
    Ok(Credential {
      username:      self.username,
      password_hash: self.password_hash,
      created_at:    decode_dt(&self.created_at)?,
    })
  }
}
