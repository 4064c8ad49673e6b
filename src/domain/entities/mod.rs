//! Core domain entities.
//!
//! - [`Link`] - A short code bound to a target URL plus visit statistics
//! - [`NewLink`] - Input for creating a link
//! - [`LinkFilter`] - Search and pagination options for listing links

pub mod link;

pub use link::{Link, LinkFilter, NewLink};
