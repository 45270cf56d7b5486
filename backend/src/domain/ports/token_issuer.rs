//! Port abstraction for issuing and validating session tokens.

use chrono::{DateTime, Utc};

use crate::domain::{SessionToken, UserId};

use super::define_port_error;

define_port_error! {
    /// Reasons a token could not be issued or accepted.
    pub enum TokenError {
        /// Signature does not match the service key.
        InvalidSignature => "token signature is invalid",
        /// The token expiry has elapsed.
        Expired => "token has expired",
        /// The token structure or claims could not be parsed.
        Malformed => "token is malformed",
        /// Signing a new token failed.
        Signing { message: String } => "token signing failed: {message}",
    }
}

/// Stateless signed-token issuer and validator.
///
/// There is no revocation list: a token stays valid until it expires.
#[cfg_attr(test, mockall::automock)]
pub trait TokenIssuer: Send + Sync {
    /// Issue a token bound to `user_id`, expiring one TTL after `now`.
    fn issue(&self, user_id: &UserId, now: DateTime<Utc>) -> Result<SessionToken, TokenError>;

    /// Verify `token` at time `now` and return the bound user id.
    ///
    /// Does not check that the user still exists.
    fn validate(&self, token: &SessionToken, now: DateTime<Utc>) -> Result<UserId, TokenError>;
}
