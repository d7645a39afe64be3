//! Credential — a username/password account gating app access.

use chrono::{DateTime, Utc};

/// A stored user account.
///
/// `password_hash` is an argon2 PHC string; the plaintext password never
/// reaches storage. The type deliberately has no `Serialize` impl so the
/// hash cannot end up in a response body by accident.
#[derive(Debug, Clone)]
pub struct Credential {
  pub username:      String,
  pub password_hash: String,
  pub created_at:    DateTime<Utc>,
}
