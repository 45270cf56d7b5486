//! HTTP inbound adapter exposing REST endpoints.

pub mod auth;
pub mod error;
pub mod health;
pub mod state;
#[cfg(test)]
pub mod test_utils;
pub mod token_config;
pub mod users;

use actix_web::{HttpResponse, web};

use crate::domain::Error;

pub use error::{ApiResult, json_error_handler};

/// Unmatched paths under the API scope answer with the JSON error envelope.
async fn unknown_endpoint() -> ApiResult<HttpResponse> {
    Err(Error::not_found("no such endpoint"))
}

/// Mount the account API and the root greeting.
///
/// Expects [`state::HttpState`] to be registered as app data. Health probes
/// are mounted separately because they need their own state.
///
/// # Examples
/// ```
/// use actix_web::App;
/// use accounts::inbound::http::configure_api;
///
/// let app = App::new().configure(configure_api);
/// ```
pub fn configure_api(cfg: &mut web::ServiceConfig) {
    cfg.app_data(web::JsonConfig::default().error_handler(json_error_handler))
        .service(
            web::scope("/api/v1")
                .service(users::register)
                .service(users::login)
                .service(users::current_user)
                .service(users::update_current_user)
                .service(users::delete_current_user)
                .default_service(web::to(unknown_endpoint)),
        )
        .service(users::hello);
}
