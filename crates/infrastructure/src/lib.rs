//! Infrastructure adapters for application ports.

#![forbid(unsafe_code)]

mod database_errors;
mod in_memory_ownership_repository;
mod postgres_ownership_repository;

use database_errors::database_error;
pub use in_memory_ownership_repository::InMemoryOwnershipRepository;
pub use postgres_ownership_repository::PostgresOwnershipRepository;
