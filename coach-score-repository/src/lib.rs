//! # Coach Score Repository
//! This crate provides traits and implementations for persisting reviews and
//! the votes cast on them. It includes definitions for errors, interfaces,
//! a concrete implementation for PostgreSQL and an in-memory implementation
//! with the same semantics.
pub mod errors;
pub mod interfaces;
pub mod memory;
pub mod postgres;

pub use errors::RepositoryError;
pub use interfaces::{ReviewsRepository, VotesRepository};
pub use memory::InMemoryRepository;
pub use postgres::PostgresRepository;
