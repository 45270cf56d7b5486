//! Account orchestration: registration, login and token resolution.
//!
//! The service owns no state of its own. Storage, hashing, token signing and
//! the clock are injected so each can be swapped for a test double.

use std::sync::{Arc, OnceLock};

use async_trait::async_trait;
use mockable::Clock;
use tracing::{debug, info};

use crate::domain::ports::{
    AccountsCommand, AuthenticatedSession, PasswordHashError, PasswordHasher, TokenError,
    TokenIssuer, UserPersistenceError, UserRepository,
};
use crate::domain::{
    DisplayName, EmailAddress, Error, LoginCredentials, LoginRequest, PasswordHash,
    PlaintextPassword, Registration, RegistrationRequest, SessionToken, StoredUser, TraceId,
    User, UserId,
};

const INVALID_CREDENTIALS: &str = "invalid credentials";
const UNAUTHORIZED: &str = "unauthorized";
const EMAIL_TAKEN: &str = "email already registered";
const DUMMY_PASSWORD: &str = "dummy password for timing equalisation";

fn map_persistence_error(error: UserPersistenceError) -> Error {
    match error {
        UserPersistenceError::Connection { message } => {
            debug!(%message, "user repository unavailable");
            Error::service_unavailable("user repository unavailable")
        }
        UserPersistenceError::Query { message } => {
            Error::internal(format!("user repository error: {message}"))
        }
        UserPersistenceError::Conflict { .. } => Error::conflict(EMAIL_TAKEN),
    }
}

fn map_hash_error(error: PasswordHashError) -> Error {
    Error::internal(error.to_string())
}

fn map_signing_error(error: TokenError) -> Error {
    Error::internal(format!("failed to issue session token: {error}"))
}

/// Run CPU-heavy password work off the async executor, keeping the trace id.
async fn run_blocking<F, T>(work: F) -> Result<T, Error>
where
    F: FnOnce() -> T + Send + 'static,
    T: Send + 'static,
{
    let trace_id = TraceId::current();
    tokio::task::spawn_blocking(move || TraceId::sync_scope(trace_id, work))
        .await
        .map_err(|err| Error::internal(format!("password task failed: {err}")))
}

/// Account service implementing the [`AccountsCommand`] driving port.
pub struct AccountService<R, H, T> {
    users: Arc<R>,
    hasher: Arc<H>,
    tokens: Arc<T>,
    clock: Arc<dyn Clock>,
    dummy_hash: Arc<OnceLock<Option<PasswordHash>>>,
}

impl<R, H, T> Clone for AccountService<R, H, T> {
    fn clone(&self) -> Self {
        Self {
            users: Arc::clone(&self.users),
            hasher: Arc::clone(&self.hasher),
            tokens: Arc::clone(&self.tokens),
            clock: Arc::clone(&self.clock),
            dummy_hash: Arc::clone(&self.dummy_hash),
        }
    }
}

impl<R, H, T> AccountService<R, H, T>
where
    R: UserRepository,
    H: PasswordHasher + 'static,
    T: TokenIssuer,
{
    /// Create a service over the given adapters.
    pub fn new(users: Arc<R>, hasher: Arc<H>, tokens: Arc<T>, clock: Arc<dyn Clock>) -> Self {
        Self {
            users,
            hasher,
            tokens,
            clock,
            dummy_hash: Arc::new(OnceLock::new()),
        }
    }

    fn issue_session(&self, user: User) -> Result<AuthenticatedSession, Error> {
        let token = self
            .tokens
            .issue(user.id(), self.clock.utc())
            .map_err(map_signing_error)?;
        Ok(AuthenticatedSession { user, token })
    }

    async fn hash_password(&self, password: &PlaintextPassword) -> Result<PasswordHash, Error> {
        let hasher = Arc::clone(&self.hasher);
        let password = password.clone();
        run_blocking(move || hasher.hash(&password))
            .await?
            .map_err(map_hash_error)
    }

    /// Verify against the stored hash, or against a throwaway hash when the
    /// account does not exist so both failure paths do the same work.
    async fn verify_password(
        &self,
        password: &PlaintextPassword,
        stored: Option<PasswordHash>,
    ) -> Result<bool, Error> {
        let hasher = Arc::clone(&self.hasher);
        let dummy_hash = Arc::clone(&self.dummy_hash);
        let password = password.clone();
        run_blocking(move || match stored {
            Some(hash) => hasher.verify(&password, &hash),
            None => {
                let dummy = dummy_hash.get_or_init(|| {
                    PlaintextPassword::new(DUMMY_PASSWORD)
                        .ok()
                        .and_then(|p| hasher.hash(&p).ok())
                });
                if let Some(hash) = dummy {
                    let _ = hasher.verify(&password, hash);
                }
                false
            }
        })
        .await
    }
}

#[async_trait]
impl<R, H, T> AccountsCommand for AccountService<R, H, T>
where
    R: UserRepository,
    H: PasswordHasher + 'static,
    T: TokenIssuer,
{
    async fn register(&self, request: RegistrationRequest) -> Result<AuthenticatedSession, Error> {
        let registration = Registration::try_from_request(&request)?;

        let existing = self
            .users
            .find_by_email(registration.email())
            .await
            .map_err(map_persistence_error)?;
        if existing.is_some() {
            return Err(Error::conflict(EMAIL_TAKEN));
        }

        let password_hash = self.hash_password(registration.password()).await?;
        let user = User::new(
            UserId::random(),
            registration.display_name().clone(),
            registration.email().clone(),
            self.clock.utc(),
        );
        self.users
            .insert(&StoredUser::new(user.clone(), password_hash))
            .await
            .map_err(map_persistence_error)?;

        info!(user_id = %user.id(), "account registered");
        self.issue_session(user)
    }

    async fn login(&self, request: LoginRequest) -> Result<AuthenticatedSession, Error> {
        let credentials = LoginCredentials::try_from_request(&request)?;

        let stored = match EmailAddress::new(credentials.email()) {
            Ok(email) => self
                .users
                .find_by_email(&email)
                .await
                .map_err(map_persistence_error)?,
            Err(_) => None,
        };
        let (user, hash) = match stored {
            Some(record) => {
                let hash = record.password_hash().clone();
                (Some(record.into_user()), Some(hash))
            }
            None => (None, None),
        };

        let verified = self.verify_password(credentials.password(), hash).await?;
        match user {
            Some(user) if verified => {
                info!(user_id = %user.id(), "login succeeded");
                self.issue_session(user)
            }
            _ => {
                debug!("login rejected");
                Err(Error::unauthorized(INVALID_CREDENTIALS))
            }
        }
    }

    async fn authenticate(&self, token: &SessionToken) -> Result<User, Error> {
        let user_id = self
            .tokens
            .validate(token, self.clock.utc())
            .map_err(|err| {
                debug!(error = %err, "session token rejected");
                Error::unauthorized(UNAUTHORIZED)
            })?;

        self.users
            .find_by_id(&user_id)
            .await
            .map_err(map_persistence_error)?
            .ok_or_else(|| {
                debug!(%user_id, "session token names a deleted account");
                Error::unauthorized(UNAUTHORIZED)
            })
    }

    async fn update_profile(
        &self,
        user: &User,
        display_name: DisplayName,
    ) -> Result<User, Error> {
        if user.display_name() == &display_name {
            return Ok(user.clone());
        }

        self.users
            .update_display_name(user.id(), &display_name, self.clock.utc())
            .await
            .map_err(map_persistence_error)?
            .ok_or_else(|| Error::unauthorized(UNAUTHORIZED))
    }

    async fn delete_account(&self, user: &User) -> Result<(), Error> {
        let removed = self
            .users
            .delete(user.id())
            .await
            .map_err(map_persistence_error)?;
        if removed {
            info!(user_id = %user.id(), "account deleted");
        } else {
            debug!(user_id = %user.id(), "account already absent");
        }
        Ok(())
    }
}

#[cfg(test)]
#[path = "account_service_tests.rs"]
mod tests;
