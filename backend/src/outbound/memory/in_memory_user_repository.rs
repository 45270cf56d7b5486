//! `UserRepository` backed by a mutex-guarded map.
//!
//! Data lives only as long as the process. The server falls back to this
//! store when no database URL is configured, and tests use it to exercise
//! the full account flow.

use std::collections::HashMap;
use std::sync::{Mutex, MutexGuard};

use async_trait::async_trait;
use chrono::{DateTime, Utc};

use crate::domain::ports::{UserPersistenceError, UserRepository};
use crate::domain::{DisplayName, EmailAddress, StoredUser, User, UserId};

#[derive(Default)]
struct Accounts {
    by_id: HashMap<UserId, StoredUser>,
    id_by_email: HashMap<EmailAddress, UserId>,
}

/// Volatile credential store.
#[derive(Default)]
pub struct InMemoryUserRepository {
    accounts: Mutex<Accounts>,
}

impl InMemoryUserRepository {
    pub fn new() -> Self {
        Self::default()
    }

    fn lock(&self) -> Result<MutexGuard<'_, Accounts>, UserPersistenceError> {
        self.accounts
            .lock()
            .map_err(|_| UserPersistenceError::query("in-memory user store is poisoned"))
    }
}

#[async_trait]
impl UserRepository for InMemoryUserRepository {
    async fn insert(&self, user: &StoredUser) -> Result<(), UserPersistenceError> {
        let mut accounts = self.lock()?;
        let email = user.user().email();
        if accounts.id_by_email.contains_key(email) {
            return Err(UserPersistenceError::conflict("email already registered"));
        }
        let id = user.user().id().clone();
        accounts.id_by_email.insert(email.clone(), id.clone());
        accounts.by_id.insert(id, user.clone());
        Ok(())
    }

    async fn find_by_email(
        &self,
        email: &EmailAddress,
    ) -> Result<Option<StoredUser>, UserPersistenceError> {
        let accounts = self.lock()?;
        Ok(accounts
            .id_by_email
            .get(email)
            .and_then(|id| accounts.by_id.get(id))
            .cloned())
    }

    async fn find_by_id(&self, id: &UserId) -> Result<Option<User>, UserPersistenceError> {
        let accounts = self.lock()?;
        Ok(accounts.by_id.get(id).map(|stored| stored.user().clone()))
    }

    async fn update_display_name(
        &self,
        id: &UserId,
        display_name: &DisplayName,
        updated_at: DateTime<Utc>,
    ) -> Result<Option<User>, UserPersistenceError> {
        let mut accounts = self.lock()?;
        let Some(stored) = accounts.by_id.get_mut(id) else {
            return Ok(None);
        };
        let renamed = stored.user().renamed(display_name.clone(), updated_at);
        *stored = StoredUser::new(renamed.clone(), stored.password_hash().clone());
        Ok(Some(renamed))
    }

    async fn delete(&self, id: &UserId) -> Result<bool, UserPersistenceError> {
        let mut accounts = self.lock()?;
        let Some(removed) = accounts.by_id.remove(id) else {
            return Ok(false);
        };
        accounts.id_by_email.remove(removed.user().email());
        Ok(true)
    }
}
