//! Repository trait definitions for the domain layer.
//!
//! The repository is the single shared mutable resource of the service. All
//! correctness for shared state (code uniqueness, click accuracy) is delegated
//! to it: implementations must reject duplicate codes on create and apply the
//! click increment as one atomic mutation.
//!
//! # Implementations
//!
//! - [`crate::infrastructure::persistence::PgLinkRepository`] - PostgreSQL
//! - [`crate::infrastructure::persistence::MemoryLinkRepository`] - process-local map
//! - `MockLinkRepository` - generated by `mockall` under `cfg(test)`

pub mod link_repository;

pub use link_repository::LinkRepository;

#[cfg(test)]
pub use link_repository::MockLinkRepository;
