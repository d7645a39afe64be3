//! The process-wide presence flag.

use std::sync::atomic::{AtomicBool, Ordering};

/// Expected occupancy state of the monitored room.
///
/// A degenerate two-state machine: any write may overwrite any prior state
/// with no precondition, no compare-and-swap, and no version token.
/// Concurrent writers race and the last write to complete wins. The value is
/// a single atomically-swapped scalar, so a read can never observe a torn
/// write.
///
/// The flag is in-memory only and resets to its default on restart.
#[derive(Debug)]
pub struct PresenceMode {
  in_room: AtomicBool,
}

impl PresenceMode {
  /// The service starts out assuming the occupant is in the room.
  pub fn new() -> Self {
    Self { in_room: AtomicBool::new(true) }
  }

  /// Unconditionally overwrite the flag. Returns the value just written so
  /// callers can confirm the state they set.
  pub fn set(&self, in_room: bool) -> bool {
    self.in_room.store(in_room, Ordering::SeqCst);
    in_room
  }

  /// The most recently completed write at the time of the read.
  pub fn get(&self) -> bool {
    self.in_room.load(Ordering::SeqCst)
  }
}

impl Default for PresenceMode {
  fn default() -> Self {
    Self::new()
  }
}
