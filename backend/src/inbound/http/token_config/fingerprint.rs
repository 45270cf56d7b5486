//! Signing key fingerprints for operational visibility.
//!
//! Operators compare fingerprints across instances to confirm they share a
//! key without the key itself ever reaching the logs.

use sha2::{Digest, Sha256};

/// Length of the fingerprint in bytes before hex encoding.
const FINGERPRINT_BYTES: usize = 8;

/// Truncated SHA-256 of `secret` as 16 lowercase hex characters.
///
/// # Examples
///
/// ```rust
/// use accounts::inbound::http::token_config::fingerprint::key_fingerprint;
///
/// let fp = key_fingerprint(b"0123456789abcdef0123456789abcdef");
/// assert_eq!(fp.len(), 16);
/// assert!(fp.chars().all(|c| c.is_ascii_hexdigit()));
/// ```
#[must_use]
pub fn key_fingerprint(secret: &[u8]) -> String {
    let digest = Sha256::digest(secret);
    hex::encode(&digest[..FINGERPRINT_BYTES])
}
