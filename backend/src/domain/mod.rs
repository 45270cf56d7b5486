//! Domain primitives, account orchestration and hexagon ports.
//!
//! Purpose: define strongly typed entities used by the HTTP and persistence
//! adapters, and the service that ties credential storage, password hashing
//! and session tokens together. Types document their invariants in Rustdoc.
//!
//! Public surface:
//! - Error / ErrorCode — transport-agnostic failure envelope.
//! - User, StoredUser and their value types.
//! - Registration / LoginCredentials — validated inbound input.
//! - AccountService — implementation of [`ports::AccountsCommand`].

pub mod account_service;
pub mod auth;
pub mod error;
pub mod password;
pub mod ports;
pub mod token;
pub mod trace_id;
pub mod user;

pub use self::account_service::AccountService;
pub use self::auth::{
    CredentialField, CredentialValidationError, LoginCredentials, LoginRequest, Registration,
    RegistrationRequest,
};
pub use self::error::{Error, ErrorCode};
pub use self::password::{PasswordHash, PasswordValidationError, PlaintextPassword};
pub use self::token::SessionToken;
pub use self::trace_id::TraceId;
pub use self::user::{
    DisplayName, EmailAddress, StoredUser, User, UserId, UserValidationError,
};

/// HTTP header name used to propagate trace identifiers.
pub const TRACE_ID_HEADER: &str = "trace-id";

/// Convenient API result alias.
///
/// # Examples
/// ```
/// use actix_web::HttpResponse;
/// use accounts::domain::{ApiResult, Error};
///
/// fn handler() -> ApiResult<HttpResponse> {
///     Err(Error::forbidden("nope"))
/// }
/// ```
pub type ApiResult<T> = Result<T, Error>;
