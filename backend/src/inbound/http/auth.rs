//! Bearer-token authentication for HTTP handlers.
//!
//! Tokens are read from `Authorization: Bearer <token>`. The legacy
//! `api-token` header is accepted when no `Authorization` header is sent.

use actix_web::dev::Payload;
use actix_web::http::header::{AUTHORIZATION, HeaderMap};
use actix_web::{FromRequest, HttpRequest, web};
use futures_util::future::LocalBoxFuture;
use tracing::error;

use crate::domain::{Error, SessionToken, User};
use crate::inbound::http::state::HttpState;

/// Fallback header carrying a raw token.
pub const API_TOKEN_HEADER: &str = "api-token";

const BEARER_PREFIX: &str = "bearer ";

/// Pull the presented token out of request headers, if any.
pub fn token_from_headers(headers: &HeaderMap) -> Option<SessionToken> {
    if let Some(value) = headers.get(AUTHORIZATION) {
        let raw = value.to_str().ok()?.trim();
        let scheme = raw.get(..BEARER_PREFIX.len())?;
        if !scheme.eq_ignore_ascii_case(BEARER_PREFIX) {
            return None;
        }
        let token = raw[BEARER_PREFIX.len()..].trim();
        return (!token.is_empty()).then(|| SessionToken::new(token));
    }

    let raw = headers.get(API_TOKEN_HEADER)?.to_str().ok()?.trim();
    (!raw.is_empty()).then(|| SessionToken::new(raw))
}

/// The account resolved from the request's bearer token.
///
/// Extraction fails with `401 Unauthorized` when the token is missing,
/// invalid, expired, or names a deleted account.
#[derive(Debug, Clone)]
pub struct AuthenticatedUser(pub User);

impl AuthenticatedUser {
    pub fn into_inner(self) -> User {
        self.0
    }
}

impl FromRequest for AuthenticatedUser {
    type Error = Error;
    type Future = LocalBoxFuture<'static, Result<Self, Self::Error>>;

    fn from_request(req: &HttpRequest, _payload: &mut Payload) -> Self::Future {
        let state = req.app_data::<web::Data<HttpState>>().cloned();
        let token = token_from_headers(req.headers());
        Box::pin(async move {
            let Some(state) = state else {
                error!("HttpState missing from app data");
                return Err(Error::internal("authentication is not configured"));
            };
            let token = token.ok_or_else(|| Error::unauthorized("unauthorized"))?;
            state.accounts.authenticate(&token).await.map(Self)
        })
    }
}
