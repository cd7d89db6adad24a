//! Error types for the Coach Score repository.
//! Defines the errors that can occur while reading or writing reviews and votes.
mod repository;

pub use repository::RepositoryError;
