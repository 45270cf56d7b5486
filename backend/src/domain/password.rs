//! Password material: caller-supplied plaintext and the stored hash.

use std::fmt;

use zeroize::Zeroizing;

/// Maximum accepted password length in bytes.
pub const PASSWORD_MAX_BYTES: usize = 1024;

/// Errors raised when a plaintext password fails shape checks.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum PasswordValidationError {
    #[error("password must not be empty")]
    Empty,
    #[error("password must be at most {max} bytes")]
    TooLong { max: usize },
}

/// Plaintext password held only for the duration of a request.
///
/// ## Invariants
/// - Non-empty and at most [`PASSWORD_MAX_BYTES`] bytes.
/// - Whitespace is kept as given.
/// - Memory is zeroed on drop.
#[derive(Clone, PartialEq, Eq)]
pub struct PlaintextPassword(Zeroizing<String>);

impl PlaintextPassword {
    /// Validate and wrap a plaintext password.
    ///
    /// # Examples
    /// ```
    /// use accounts::domain::PlaintextPassword;
    ///
    /// let password = PlaintextPassword::new("somePassword").expect("valid");
    /// assert_eq!(password.expose(), "somePassword");
    /// assert!(PlaintextPassword::new("").is_err());
    /// ```
    pub fn new(password: impl Into<String>) -> Result<Self, PasswordValidationError> {
        let password = Zeroizing::new(password.into());
        if password.is_empty() {
            return Err(PasswordValidationError::Empty);
        }
        if password.len() > PASSWORD_MAX_BYTES {
            return Err(PasswordValidationError::TooLong {
                max: PASSWORD_MAX_BYTES,
            });
        }
        Ok(Self(password))
    }

    /// Borrow the plaintext for hashing or verification.
    pub fn expose(&self) -> &str {
        self.0.as_str()
    }
}

impl fmt::Debug for PlaintextPassword {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("PlaintextPassword(<redacted>)")
    }
}

/// Encoded password hash in PHC string format.
#[derive(Clone, PartialEq, Eq)]
pub struct PasswordHash(String);

impl PasswordHash {
    /// Wrap an encoded hash produced by a hasher or loaded from storage.
    pub fn new(encoded: impl Into<String>) -> Self {
        Self(encoded.into())
    }

    /// Encoded hash string.
    pub fn as_str(&self) -> &str {
        self.0.as_str()
    }
}

impl fmt::Debug for PasswordHash {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("PasswordHash(<redacted>)")
    }
}
