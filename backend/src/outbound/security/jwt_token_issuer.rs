//! HS256 JSON Web Token adapter for the `TokenIssuer` port.

use chrono::{DateTime, Duration, Utc};
use jsonwebtoken::errors::ErrorKind;
use jsonwebtoken::{Algorithm, DecodingKey, EncodingKey, Header, Validation, decode, encode};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::domain::ports::{TokenError, TokenIssuer};
use crate::domain::{SessionToken, UserId};

/// Tokens live for one day unless configured otherwise.
pub const DEFAULT_TOKEN_TTL_SECONDS: i64 = 86_400;

#[derive(Debug, Serialize, Deserialize)]
struct TokenClaims {
    sub: String,
    iat: i64,
    exp: i64,
}

/// Signs and verifies session tokens with a process-wide secret.
///
/// Expiry is checked against the caller's clock rather than the system
/// clock, with no leeway: a token is rejected once `now > exp`.
#[derive(Clone)]
pub struct JwtTokenIssuer {
    encoding: EncodingKey,
    decoding: DecodingKey,
    validation: Validation,
    ttl: Duration,
}

impl JwtTokenIssuer {
    /// Build an issuer from raw secret bytes and a token lifetime.
    pub fn new(secret: &[u8], ttl: Duration) -> Self {
        let mut validation = Validation::new(Algorithm::HS256);
        validation.leeway = 0;
        validation.validate_exp = false;
        validation.set_required_spec_claims(&["exp", "sub"]);
        Self {
            encoding: EncodingKey::from_secret(secret),
            decoding: DecodingKey::from_secret(secret),
            validation,
            ttl,
        }
    }

    /// Configured token lifetime.
    pub fn ttl(&self) -> Duration {
        self.ttl
    }
}

fn map_decode_error(error: &jsonwebtoken::errors::Error) -> TokenError {
    match error.kind() {
        ErrorKind::InvalidSignature => TokenError::invalid_signature(),
        ErrorKind::ExpiredSignature => TokenError::expired(),
        _ => TokenError::malformed(),
    }
}

impl TokenIssuer for JwtTokenIssuer {
    fn issue(&self, user_id: &UserId, now: DateTime<Utc>) -> Result<SessionToken, TokenError> {
        let expires_at = now
            .checked_add_signed(self.ttl)
            .ok_or_else(|| TokenError::signing("token expiry overflows the calendar"))?;
        let claims = TokenClaims {
            sub: user_id.to_string(),
            iat: now.timestamp(),
            exp: expires_at.timestamp(),
        };
        encode(&Header::new(Algorithm::HS256), &claims, &self.encoding)
            .map(SessionToken::new)
            .map_err(|err| TokenError::signing(err.to_string()))
    }

    fn validate(&self, token: &SessionToken, now: DateTime<Utc>) -> Result<UserId, TokenError> {
        let data = decode::<TokenClaims>(token.as_str(), &self.decoding, &self.validation)
            .map_err(|err| map_decode_error(&err))?;
        if now.timestamp() > data.claims.exp {
            return Err(TokenError::expired());
        }
        let uuid = Uuid::parse_str(&data.claims.sub).map_err(|_| TokenError::malformed())?;
        Ok(UserId::from_uuid(uuid))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use rstest::{fixture, rstest};

    const SECRET: &[u8] = b"0123456789abcdef0123456789abcdef";

    #[fixture]
    fn now() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2026, 3, 1, 12, 0, 0)
            .single()
            .expect("fixture timestamp")
    }

    #[fixture]
    fn issuer() -> JwtTokenIssuer {
        JwtTokenIssuer::new(SECRET, Duration::seconds(DEFAULT_TOKEN_TTL_SECONDS))
    }

    #[rstest]
    fn issued_token_validates_to_same_user(issuer: JwtTokenIssuer, now: DateTime<Utc>) {
        let user_id = UserId::random();
        let token = issuer.issue(&user_id, now).expect("issue");

        assert_eq!(issuer.validate(&token, now).expect("validate"), user_id);
    }

    #[rstest]
    #[case(0, true)]
    #[case(86_400, true)]
    #[case(86_401, false)]
    fn expiry_has_no_leeway(
        issuer: JwtTokenIssuer,
        now: DateTime<Utc>,
        #[case] elapsed_seconds: i64,
        #[case] accepted: bool,
    ) {
        let token = issuer.issue(&UserId::random(), now).expect("issue");
        let result = issuer.validate(&token, now + Duration::seconds(elapsed_seconds));

        match (accepted, result) {
            (true, Ok(_)) => {}
            (false, Err(err)) => assert_eq!(err, TokenError::Expired),
            (_, other) => panic!("unexpected validation outcome: {other:?}"),
        }
    }

    #[rstest]
    fn token_signed_with_other_key_is_rejected(issuer: JwtTokenIssuer, now: DateTime<Utc>) {
        let forger = JwtTokenIssuer::new(
            b"another-secret-another-secret-xx",
            Duration::seconds(DEFAULT_TOKEN_TTL_SECONDS),
        );
        let forged = forger.issue(&UserId::random(), now).expect("issue");

        assert_eq!(
            issuer.validate(&forged, now).expect_err("forged"),
            TokenError::InvalidSignature
        );
    }

    #[rstest]
    fn tampered_payload_is_rejected(issuer: JwtTokenIssuer, now: DateTime<Utc>) {
        let token = issuer.issue(&UserId::random(), now).expect("issue");
        let other = issuer.issue(&UserId::random(), now).expect("issue");
        let parts: Vec<&str> = token.as_str().split('.').collect();
        let other_parts: Vec<&str> = other.as_str().split('.').collect();
        let spliced = SessionToken::new(format!("{}.{}.{}", parts[0], other_parts[1], parts[2]));

        assert_eq!(
            issuer.validate(&spliced, now).expect_err("tampered"),
            TokenError::InvalidSignature
        );
    }

    #[rstest]
    #[case("")]
    #[case("not-a-token")]
    #[case("a.b.c")]
    fn garbage_is_malformed(issuer: JwtTokenIssuer, now: DateTime<Utc>, #[case] raw: &str) {
        assert_eq!(
            issuer.validate(&SessionToken::new(raw), now).expect_err("garbage"),
            TokenError::Malformed
        );
    }

    #[rstest]
    fn expiry_beyond_calendar_fails_to_sign(now: DateTime<Utc>) {
        let issuer = JwtTokenIssuer::new(SECRET, Duration::seconds(9_000_000_000_000));

        let err = issuer
            .issue(&UserId::random(), now)
            .expect_err("expiry out of range");
        assert!(matches!(err, TokenError::Signing { .. }));
    }
}
