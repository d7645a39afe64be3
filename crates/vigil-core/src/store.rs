//! The `PresenceStore` trait.
//!
//! The trait is implemented by storage backends (e.g. `vigil-store-sqlite`).
//! The HTTP layer depends on this abstraction, not on any concrete backend.

use std::future::Future;

use crate::{
  credential::Credential,
  event::{Event, NewEvent},
  token::Token,
};

/// Abstraction over the backing store for events, tokens, and accounts.
///
/// The event log is append-only: no method mutates or removes a stored
/// event. Token registration is an idempotent upsert keyed by token value.
///
/// All methods return `Send` futures so the trait can be used in
/// multi-threaded async runtimes (e.g. tokio with `axum`). Any method may
/// suspend while waiting on the underlying storage; callers must not assume
/// synchronous completion.
pub trait PresenceStore: Send + Sync {
  type Error: std::error::Error + Send + Sync + 'static;

  // ── Events ────────────────────────────────────────────────────────────

  /// Append one tag-read event and return the persisted record.
  ///
  /// The store assigns `event_id` and fills `observed_at` from its own
  /// clock when the input carries none. The append either fully commits or
  /// leaves no trace; a partially-written event is never visible.
  fn append_event(
    &self,
    input: NewEvent,
  ) -> impl Future<Output = Result<Event, Self::Error>> + Send + '_;

  /// A point-in-time snapshot of the most recent events, ordered by
  /// `observed_at` descending and truncated to `limit`.
  ///
  /// Events appended after the read started are not included.
  fn recent_events(
    &self,
    limit: usize,
  ) -> impl Future<Output = Result<Vec<Event>, Self::Error>> + Send + '_;

  // ── Tokens ────────────────────────────────────────────────────────────

  /// Idempotent upsert keyed by token value.
  ///
  /// A new value inserts a row; a known value refreshes its
  /// `registered_at`. The storage layer's unique-key constraint linearizes
  /// concurrent same-value registrations, so exactly one row per value
  /// survives.
  fn register_token<'a>(
    &'a self,
    value: &'a str,
  ) -> impl Future<Output = Result<Token, Self::Error>> + Send + 'a;

  /// Look up a registered token by value. Returns `None` if absent.
  fn find_token<'a>(
    &'a self,
    value: &'a str,
  ) -> impl Future<Output = Result<Option<Token>, Self::Error>> + Send + 'a;

  // ── Accounts ──────────────────────────────────────────────────────────

  /// Create a user account with an already-hashed password.
  ///
  /// Fails with the backend's conflict error when the username is taken.
  fn create_credential<'a>(
    &'a self,
    username: &'a str,
    password_hash: &'a str,
  ) -> impl Future<Output = Result<Credential, Self::Error>> + Send + 'a;

  /// Look up an account by username. Returns `None` if absent.
  fn find_credential<'a>(
    &'a self,
    username: &'a str,
  ) -> impl Future<Output = Result<Option<Credential>, Self::Error>> + Send + 'a;
}
