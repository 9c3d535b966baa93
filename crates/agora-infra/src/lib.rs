//! # Agora Infrastructure
//!
//! Concrete implementations of the ports defined in `agora-core`:
//! SeaORM/Postgres repositories, an in-memory fallback store, and the
//! JWT + Argon2 authentication services.

pub mod auth;
pub mod database;

pub use auth::{Argon2PasswordService, JwtTokenService};
pub use database::{DatabaseConfig, DatabaseConnections, MemoryStore};
