//! Token signing configuration.
//!
//! Reads the signing secret and token lifetime from the environment and
//! applies build-mode rules: debug builds warn and fall back to defaults,
//! release builds reject anything missing or unsafe.

use std::fmt;
use std::path::PathBuf;

use argon2::password_hash::rand_core::{OsRng, RngCore};
use chrono::Duration;
use mockable::Env;
use tracing::warn;
use zeroize::Zeroizing;

use crate::outbound::security::DEFAULT_TOKEN_TTL_SECONDS;

pub mod fingerprint;

pub const SECRET_ENV: &str = "JWT_SECRET_KEY";
pub const SECRET_FILE_ENV: &str = "JWT_SECRET_KEY_FILE";
pub const TTL_ENV: &str = "JWT_TTL_SECONDS";
pub const ALLOW_EPHEMERAL_ENV: &str = "JWT_ALLOW_EPHEMERAL";
/// Minimum secret length accepted by release builds.
pub const SECRET_MIN_LEN: usize = 32;
const EPHEMERAL_SECRET_LEN: usize = 32;
const BOOL_EXPECTED: &str = "1|0|true|false|yes|no|y|n";
/// Longest accepted token lifetime: ten years.
pub const TTL_MAX_SECONDS: i64 = 315_360_000;
const TTL_EXPECTED: &str = "a positive number of seconds, at most 315360000";

/// Build mode for configuration validation.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum BuildMode {
    /// Tolerates defaults and logs warnings.
    Debug,
    /// Requires explicit, valid settings.
    Release,
}

impl BuildMode {
    /// Determine the build mode from `cfg!(debug_assertions)`.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use accounts::inbound::http::token_config::BuildMode;
    ///
    /// let mode = BuildMode::from_debug_assertions();
    /// if cfg!(debug_assertions) {
    ///     assert_eq!(mode, BuildMode::Debug);
    /// } else {
    ///     assert_eq!(mode, BuildMode::Release);
    /// }
    /// ```
    #[must_use]
    pub fn from_debug_assertions() -> Self {
        if cfg!(debug_assertions) {
            Self::Debug
        } else {
            Self::Release
        }
    }

    fn is_debug(self) -> bool {
        matches!(self, Self::Debug)
    }
}

/// Resolved token signing settings.
pub struct TokenSettings {
    /// HMAC signing secret.
    pub secret: Zeroizing<Vec<u8>>,
    /// Lifetime of issued tokens.
    pub ttl: Duration,
    /// Set when the secret was generated for this process only.
    pub ephemeral: bool,
}

impl TokenSettings {
    /// Fingerprint of the signing secret, safe to log.
    pub fn fingerprint(&self) -> String {
        fingerprint::key_fingerprint(&self.secret)
    }
}

impl fmt::Debug for TokenSettings {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TokenSettings")
            .field("secret", &"<redacted>")
            .field("ttl", &self.ttl)
            .field("ephemeral", &self.ephemeral)
            .finish()
    }
}

/// Errors raised while validating token configuration.
#[derive(thiserror::Error, Debug)]
pub enum TokenConfigError {
    #[error("invalid value for {name}='{value}'; expected {expected}")]
    InvalidEnv {
        name: &'static str,
        value: String,
        expected: &'static str,
    },
    #[error("failed to read token secret at {path}: {source}")]
    KeyRead {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("token secret too short: need >= {min_len} bytes, got {length}")]
    KeyTooShort { length: usize, min_len: usize },
    #[error("no token secret configured; set JWT_SECRET_KEY or JWT_SECRET_KEY_FILE")]
    MissingKey,
    #[error("JWT_ALLOW_EPHEMERAL must be 0 in release builds")]
    EphemeralNotAllowed,
}

/// Build token settings from environment variables and build mode.
///
/// `JWT_SECRET_KEY` wins over `JWT_SECRET_KEY_FILE`. Without either, debug
/// builds generate a per-process secret unless `JWT_ALLOW_EPHEMERAL=0`.
///
/// # Examples
///
/// ```rust
/// use accounts::inbound::http::token_config::{BuildMode, token_settings_from_env};
/// use mockable::MockEnv;
///
/// let mut env = MockEnv::new();
/// env.expect_string().returning(|name| match name {
///     "JWT_SECRET_KEY" => Some("0123456789abcdef0123456789abcdef".to_string()),
///     "JWT_TTL_SECONDS" => Some("3600".to_string()),
///     _ => None,
/// });
///
/// let settings = token_settings_from_env(&env, BuildMode::Release).expect("valid settings");
/// assert_eq!(settings.ttl.num_seconds(), 3600);
/// assert!(!settings.ephemeral);
/// ```
pub fn token_settings_from_env<E: Env>(
    env: &E,
    mode: BuildMode,
) -> Result<TokenSettings, TokenConfigError> {
    let allow_ephemeral = allow_ephemeral_from_env(env, mode)?;
    let ttl = ttl_from_env(env, mode)?;

    let Some(secret) = configured_secret(env)? else {
        if !allow_ephemeral {
            return Err(TokenConfigError::MissingKey);
        }
        warn!("no token secret configured; using temporary key (dev only)");
        return Ok(TokenSettings {
            secret: ephemeral_secret(),
            ttl,
            ephemeral: true,
        });
    };

    let length = secret.len();
    if length < SECRET_MIN_LEN {
        if !mode.is_debug() {
            return Err(TokenConfigError::KeyTooShort {
                length,
                min_len: SECRET_MIN_LEN,
            });
        }
        warn!(length, min_len = SECRET_MIN_LEN, "token secret shorter than recommended");
    }

    Ok(TokenSettings {
        secret,
        ttl,
        ephemeral: false,
    })
}

fn configured_secret<E: Env>(env: &E) -> Result<Option<Zeroizing<Vec<u8>>>, TokenConfigError> {
    if let Some(inline) = env.string(SECRET_ENV).filter(|v| !v.is_empty()) {
        let inline = Zeroizing::new(inline);
        return Ok(Some(Zeroizing::new(inline.as_bytes().to_vec())));
    }
    let Some(path) = env.string(SECRET_FILE_ENV).filter(|v| !v.is_empty()) else {
        return Ok(None);
    };
    let path = PathBuf::from(path);
    let mut bytes = Zeroizing::new(
        std::fs::read(&path).map_err(|source| TokenConfigError::KeyRead {
            path: path.clone(),
            source,
        })?,
    );
    while matches!(bytes.last(), Some(b'\n' | b'\r')) {
        bytes.pop();
    }
    if bytes.is_empty() {
        return Ok(None);
    }
    Ok(Some(bytes))
}

fn ephemeral_secret() -> Zeroizing<Vec<u8>> {
    let mut secret = Zeroizing::new(vec![0_u8; EPHEMERAL_SECRET_LEN]);
    OsRng.fill_bytes(&mut secret);
    secret
}

fn allow_ephemeral_from_env<E: Env>(env: &E, mode: BuildMode) -> Result<bool, TokenConfigError> {
    let Some(value) = env.string(ALLOW_EPHEMERAL_ENV) else {
        return Ok(mode.is_debug());
    };
    match (parse_bool(&value), mode) {
        (Some(true), BuildMode::Release) => Err(TokenConfigError::EphemeralNotAllowed),
        (Some(flag), _) => Ok(flag),
        (None, BuildMode::Debug) => {
            warn!(%value, "invalid {ALLOW_EPHEMERAL_ENV}; defaulting to enabled");
            Ok(true)
        }
        (None, BuildMode::Release) => Err(TokenConfigError::InvalidEnv {
            name: ALLOW_EPHEMERAL_ENV,
            value,
            expected: BOOL_EXPECTED,
        }),
    }
}

fn ttl_from_env<E: Env>(env: &E, mode: BuildMode) -> Result<Duration, TokenConfigError> {
    let default = Duration::seconds(DEFAULT_TOKEN_TTL_SECONDS);
    let Some(value) = env.string(TTL_ENV) else {
        return Ok(default);
    };
    let parsed = value
        .trim()
        .parse::<i64>()
        .ok()
        .filter(|seconds| (1..=TTL_MAX_SECONDS).contains(seconds))
        .and_then(Duration::try_seconds);
    match parsed {
        Some(ttl) => Ok(ttl),
        None if mode.is_debug() => {
            warn!(%value, "invalid {TTL_ENV}; using default");
            Ok(default)
        }
        None => Err(TokenConfigError::InvalidEnv {
            name: TTL_ENV,
            value,
            expected: TTL_EXPECTED,
        }),
    }
}

fn parse_bool(value: &str) -> Option<bool> {
    match value.to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "y" => Some(true),
        "0" | "false" | "no" | "n" => Some(false),
        _ => None,
    }
}

#[cfg(test)]
mod tests;
