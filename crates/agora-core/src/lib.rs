//! # Agora Core
//!
//! The domain layer of the Agora Q&A board.
//! This crate contains pure business rules with zero infrastructure dependencies.

pub mod domain;
pub mod error;
pub mod list;
pub mod ports;
pub mod rules;

pub use error::DomainError;
