//! Port abstraction for one-way password hashing.

use crate::domain::{PasswordHash, PlaintextPassword};

use super::define_port_error;

define_port_error! {
    /// Errors raised while producing a password hash.
    pub enum PasswordHashError {
        /// The hashing primitive rejected its input or parameters.
        Hashing { message: String } => "password hashing failed: {message}",
    }
}

/// Salted, slow password hash with constant-time verification.
///
/// Implementations are CPU bound; async callers run them on a blocking
/// thread.
#[cfg_attr(test, mockall::automock)]
pub trait PasswordHasher: Send + Sync {
    /// Hash `password` with a fresh random salt.
    fn hash(&self, password: &PlaintextPassword) -> Result<PasswordHash, PasswordHashError>;

    /// Check `password` against `hash`. Malformed hashes verify as `false`.
    fn verify(&self, password: &PlaintextPassword, hash: &PasswordHash) -> bool;
}
