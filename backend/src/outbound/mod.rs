//! Outbound adapters implementing domain ports for external infrastructure.
//!
//! - **persistence**: PostgreSQL credential store using Diesel ORM
//! - **memory**: volatile credential store for development and tests
//! - **security**: Argon2 password hashing and HS256 session tokens
//!
//! Adapters translate between domain types and infrastructure
//! representations. They contain no business logic.

pub mod memory;
pub mod persistence;
pub mod security;
