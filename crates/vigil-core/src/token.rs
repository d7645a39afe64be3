//! Token — a push-notification delivery handle for one client device.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A registered notification token.
///
/// `value` is unique across the registry. Re-registering an existing value
/// refreshes `registered_at` instead of creating a second entry, so device
/// retries are harmless.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Token {
  pub value:         String,
  pub registered_at: DateTime<Utc>,
}
