//! Builders wiring the account service onto its adapters.

use std::sync::Arc;

use actix_web::web;

use accounts::domain::AccountService;
use accounts::domain::ports::{AccountsCommand, UserRepository};
use accounts::inbound::http::state::HttpState;
use accounts::inbound::http::token_config::TokenSettings;
use accounts::outbound::memory::InMemoryUserRepository;
use accounts::outbound::persistence::DieselUserRepository;
use accounts::outbound::security::{Argon2PasswordHasher, JwtTokenIssuer};

use super::ServerConfig;

/// Account service over `users` with production hashing and signing.
fn build_accounts<R>(users: Arc<R>, tokens: &TokenSettings) -> Arc<dyn AccountsCommand>
where
    R: UserRepository + 'static,
{
    Arc::new(AccountService::new(
        users,
        Arc::new(Argon2PasswordHasher::new()),
        Arc::new(JwtTokenIssuer::new(&tokens.secret, tokens.ttl)),
        Arc::new(mockable::DefaultClock),
    ))
}

/// Build the shared HTTP state, using PostgreSQL when a pool is configured
/// and process memory otherwise.
pub(super) fn build_http_state(config: &ServerConfig) -> web::Data<HttpState> {
    let accounts = match &config.db_pool {
        Some(pool) => build_accounts(
            Arc::new(DieselUserRepository::new(pool.clone())),
            &config.tokens,
        ),
        None => build_accounts(Arc::new(InMemoryUserRepository::new()), &config.tokens),
    };
    web::Data::new(HttpState::new(accounts))
}
