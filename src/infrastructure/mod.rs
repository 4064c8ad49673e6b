//! Infrastructure layer for external integrations.
//!
//! Implements the domain's repository trait against concrete stores.
//!
//! # Modules
//!
//! - [`persistence`] - PostgreSQL and in-memory link repositories

pub mod persistence;
