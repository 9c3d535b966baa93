//! Persistence: SeaORM entities, Postgres repositories, and the
//! in-memory fallback store.

mod connections;
mod memory;
mod postgres_base;
mod postgres_repo;

pub mod entity;

pub use connections::{DatabaseConfig, DatabaseConnections};
pub use memory::{
    MemoryAnswerRepository, MemoryCommentRepository, MemoryQuestionRepository, MemoryStore,
    MemoryUserRepository,
};
pub use postgres_repo::{
    PostgresAnswerRepository, PostgresCommentRepository, PostgresQuestionRepository,
    PostgresUserRepository,
};

#[cfg(test)]
mod tests;
