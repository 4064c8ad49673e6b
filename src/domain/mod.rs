//! Domain layer containing the link entity, the store contract and domain errors.
//!
//! Nothing in here knows about HTTP or PostgreSQL. The store is reached only
//! through [`repositories::LinkRepository`], which the infrastructure layer
//! implements.
//!
//! # Modules
//!
//! - [`entities`] - Core data structures
//! - [`errors`] - Structured errors for the store, allocation and dispatch
//! - [`repositories`] - Data access trait definitions

pub mod entities;
pub mod errors;
pub mod repositories;
