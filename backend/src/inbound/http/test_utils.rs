//! Test helpers for inbound HTTP components.

use std::sync::Arc;

use actix_web::dev::{ServiceFactory, ServiceRequest, ServiceResponse};
use actix_web::middleware::NormalizePath;
use actix_web::{App, web};
use chrono::{Duration, TimeZone, Utc};

use crate::domain::AccountService;
use crate::domain::ports::AccountsCommand;
use crate::inbound::http::state::HttpState;
use crate::outbound::memory::InMemoryUserRepository;
use crate::outbound::security::{DEFAULT_TOKEN_TTL_SECONDS, JwtTokenIssuer};
use crate::test_support::{MutableClock, PlainPasswordHasher, TEST_TOKEN_SECRET};

/// Account service over in-memory adapters and a fixed clock.
pub fn in_memory_accounts() -> (Arc<dyn AccountsCommand>, Arc<MutableClock>) {
    let start = Utc
        .with_ymd_and_hms(2026, 6, 1, 8, 0, 0)
        .single()
        .unwrap_or_else(Utc::now);
    let clock = Arc::new(MutableClock::new(start));
    let service = AccountService::new(
        Arc::new(InMemoryUserRepository::new()),
        Arc::new(PlainPasswordHasher::new()),
        Arc::new(JwtTokenIssuer::new(
            TEST_TOKEN_SECRET,
            Duration::seconds(DEFAULT_TOKEN_TTL_SECONDS),
        )),
        clock.clone(),
    );
    (Arc::new(service), clock)
}

/// Actix app with the account routes mounted over `accounts`.
///
/// Mirrors the production wiring: trailing slashes are trimmed before
/// routing.
pub fn test_app(
    accounts: Arc<dyn AccountsCommand>,
) -> App<
    impl ServiceFactory<
        ServiceRequest,
        Config = (),
        Response = ServiceResponse,
        Error = actix_web::Error,
        InitError = (),
    >,
> {
    App::new()
        .wrap(NormalizePath::trim())
        .app_data(web::Data::new(HttpState::new(accounts)))
        .configure(super::configure_api)
}
