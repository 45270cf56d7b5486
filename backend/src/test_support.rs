//! Test doubles shared by unit tests (in `src/`) and integration tests
//! (in `tests/`). Only compiled for tests or with the `test-support` feature.

use std::sync::{Mutex, MutexGuard, PoisonError};
use std::sync::atomic::{AtomicUsize, Ordering};

use chrono::{DateTime, Local, TimeDelta, Utc};
use mockable::Clock;

use crate::domain::ports::{PasswordHashError, PasswordHasher};
use crate::domain::{PasswordHash, PlaintextPassword};

/// Signing secret long enough to pass release-mode checks.
pub const TEST_TOKEN_SECRET: &[u8] = b"test-secret-test-secret-test-secret!";

/// Clock whose time only moves when a test says so.
pub struct MutableClock(Mutex<DateTime<Utc>>);

impl MutableClock {
    pub fn new(now: DateTime<Utc>) -> Self {
        Self(Mutex::new(now))
    }

    pub fn advance_seconds(&self, seconds: i64) {
        *self.lock_clock() += TimeDelta::seconds(seconds);
    }

    fn lock_clock(&self) -> MutexGuard<'_, DateTime<Utc>> {
        self.0.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

impl Clock for MutableClock {
    fn local(&self) -> DateTime<Local> {
        self.utc().with_timezone(&Local)
    }

    fn utc(&self) -> DateTime<Utc> {
        *self.lock_clock()
    }
}

/// Fast reversible stand-in for Argon2.
///
/// Each hash carries a call counter so repeated hashes of the same password
/// differ, mirroring salted output. Counts verifications for timing tests.
#[derive(Default)]
pub struct PlainPasswordHasher {
    hashes: AtomicUsize,
    verifications: AtomicUsize,
}

impl PlainPasswordHasher {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of `verify` calls observed so far.
    pub fn verifications(&self) -> usize {
        self.verifications.load(Ordering::SeqCst)
    }
}

impl PasswordHasher for PlainPasswordHasher {
    fn hash(&self, password: &PlaintextPassword) -> Result<PasswordHash, PasswordHashError> {
        let salt = self.hashes.fetch_add(1, Ordering::SeqCst);
        Ok(PasswordHash::new(format!("plain${salt}${}", password.expose())))
    }

    fn verify(&self, password: &PlaintextPassword, hash: &PasswordHash) -> bool {
        self.verifications.fetch_add(1, Ordering::SeqCst);
        hash.as_str()
            .splitn(3, '$')
            .nth(2)
            .is_some_and(|stored| stored == password.expose())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn clock_keeps_working_after_a_panicking_holder() {
        let start = Utc
            .with_ymd_and_hms(2026, 1, 1, 0, 0, 0)
            .single()
            .expect("fixture timestamp");
        let clock = MutableClock::new(start);

        let poisoned = std::thread::scope(|scope| {
            scope
                .spawn(|| {
                    let _guard = clock.lock_clock();
                    panic!("holder panics while the clock is locked");
                })
                .join()
        });
        assert!(poisoned.is_err());
        assert!(clock.0.is_poisoned());

        clock.advance_seconds(30);
        assert_eq!(clock.utc(), start + TimeDelta::seconds(30));
    }
}
