//! Shared HTTP adapter state.
//!
//! Handlers receive this through `actix_web::web::Data` so they depend only
//! on the driving port and stay testable without I/O.

use std::sync::Arc;

use crate::domain::ports::AccountsCommand;

/// Dependency bundle for HTTP handlers.
#[derive(Clone)]
pub struct HttpState {
    pub accounts: Arc<dyn AccountsCommand>,
}

impl HttpState {
    /// Construct state from the account use-case port.
    ///
    /// # Examples
    /// ```no_run
    /// use std::sync::Arc;
    ///
    /// use accounts::domain::ports::AccountsCommand;
    /// use accounts::inbound::http::state::HttpState;
    ///
    /// fn wire(accounts: Arc<dyn AccountsCommand>) -> HttpState {
    ///     HttpState::new(accounts)
    /// }
    /// ```
    pub fn new(accounts: Arc<dyn AccountsCommand>) -> Self {
        Self { accounts }
    }
}
