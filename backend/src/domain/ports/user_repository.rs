//! Port abstraction for the credential store and its errors.
use async_trait::async_trait;
use chrono::{DateTime, Utc};

use crate::domain::{DisplayName, EmailAddress, StoredUser, User, UserId};

use super::define_port_error;

define_port_error! {
    /// Persistence errors raised by user repository adapters.
    pub enum UserPersistenceError {
        /// Repository connection could not be established.
        Connection { message: String } => "user repository connection failed: {message}",
        /// Query or mutation failed during execution.
        Query { message: String } => "user repository query failed: {message}",
        /// Another account already owns the email address.
        Conflict { message: String } => "user repository conflict: {message}",
    }
}

/// Credential store holding one record per account.
///
/// Adapters enforce email uniqueness at the storage layer so the
/// check-and-insert in [`UserRepository::insert`] is atomic.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait UserRepository: Send + Sync {
    /// Persist a new account, failing with `Conflict` when the email is taken.
    async fn insert(&self, user: &StoredUser) -> Result<(), UserPersistenceError>;

    /// Fetch an account together with its password hash.
    async fn find_by_email(
        &self,
        email: &EmailAddress,
    ) -> Result<Option<StoredUser>, UserPersistenceError>;

    /// Fetch the public view of an account.
    async fn find_by_id(&self, id: &UserId) -> Result<Option<User>, UserPersistenceError>;

    /// Replace the display name, returning the updated user if it still exists.
    async fn update_display_name(
        &self,
        id: &UserId,
        display_name: &DisplayName,
        updated_at: DateTime<Utc>,
    ) -> Result<Option<User>, UserPersistenceError>;

    /// Remove an account. Returns `false` when nothing was deleted.
    async fn delete(&self, id: &UserId) -> Result<bool, UserPersistenceError>;
}
