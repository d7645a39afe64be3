//! Event — one RFID tag observation reported by a reader.
//!
//! Events are immutable once stored and the event log is append-only: no
//! update or delete operation exists anywhere in the system.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::{Error, Result};

/// A stored tag-read event.
///
/// `tag_id` is opaque and is not validated against a known-tag list;
/// `status` is a free-form outcome string the backend does not interpret.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Event {
  pub event_id:    Uuid,
  pub tag_id:      String,
  pub status:      String,
  pub observed_at: DateTime<Utc>,
}

/// Input for [`PresenceStore::append_event`](crate::store::PresenceStore::append_event).
///
/// `observed_at` is the device-reported read time; the store substitutes its
/// own clock when the device omits it.
#[derive(Debug, Clone)]
pub struct NewEvent {
  pub tag_id:      String,
  pub status:      String,
  pub observed_at: Option<DateTime<Utc>>,
}

impl NewEvent {
  pub fn new(tag_id: impl Into<String>, status: impl Into<String>) -> Self {
    Self {
      tag_id:      tag_id.into(),
      status:      status.into(),
      observed_at: None,
    }
  }

  /// Both identifying fields must be present and non-empty before the event
  /// reaches storage.
  pub fn validate(&self) -> Result<()> {
    if self.tag_id.trim().is_empty() {
      return Err(Error::MissingField("tagId"));
    }
    if self.status.trim().is_empty() {
      return Err(Error::MissingField("status"));
    }
    Ok(())
  }
}
