//! Password hashing and verification for the account layer.
//!
//! Credentials are stored as argon2 PHC strings; the plaintext password is
//! dropped as soon as the hash is computed or verified.

use argon2::{
  Argon2, PasswordHash, PasswordHasher, PasswordVerifier,
  password_hash::SaltString,
};
use rand_core::OsRng;

use crate::error::Error;

/// Hash a password for storage, e.g. `$argon2id$v=19$…`.
pub fn hash_password(password: &str) -> Result<String, Error> {
  let salt = SaltString::generate(&mut OsRng);
  Ok(
    Argon2::default()
      .hash_password(password.as_bytes(), &salt)
      .map_err(|e| Error::Hash(e.to_string()))?
      .to_string(),
  )
}

/// Verify a login attempt against a stored PHC string.
///
/// Any failure — an unparsable stored hash included — collapses to
/// [`Error::Unauthorized`] so the response never reveals which part failed.
pub fn verify_password(password: &str, stored_hash: &str) -> Result<(), Error> {
  let parsed = PasswordHash::new(stored_hash).map_err(|_| Error::Unauthorized)?;
  Argon2::default()
    .verify_password(password.as_bytes(), &parsed)
    .map_err(|_| Error::Unauthorized)
}
