//! Accounts backend library.
//!
//! Hexagonal layout: `domain` holds entities, ports and the account service;
//! `inbound` adapts HTTP requests onto the driving port; `outbound` provides
//! PostgreSQL, in-memory and security adapters for the driven ports.

pub mod doc;
pub mod domain;
pub mod inbound;
pub mod middleware;
pub mod outbound;
#[cfg(any(test, feature = "test-support"))]
pub mod test_support;

/// Public OpenAPI surface used by Swagger UI and tooling.
pub use doc::ApiDoc;
pub use domain::TraceId;
pub use middleware::Trace;
