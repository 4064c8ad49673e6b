//! Application layer services implementing business logic.
//!
//! Services consume the [`crate::domain::repositories::LinkRepository`] trait
//! and expose a small API to the HTTP handlers.
//!
//! # Available Services
//!
//! - [`services::CodeAllocator`] - Validates requested codes and generates free ones
//! - [`services::RedirectDispatcher`] - Resolves a code and records the visit
//! - [`services::LinkService`] - Link creation with commit-time retry, listing, deletion

pub mod services;
